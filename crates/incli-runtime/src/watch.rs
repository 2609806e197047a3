//! Live view of non-closed incidents.
//!
//! [`LiveMonitor`] re-fetches every incident on a fixed cadence, keeps the
//! ones that are not closed, sorts them by name and hands a [`LiveSnapshot`]
//! to a [`SnapshotRenderer`]. The loop only ends when the caller raises the
//! shutdown signal, or on the first fetch error.

use std::time::Duration;

use chrono::{DateTime, Local};
use incli_api::{IncidentApi, Locator};
use incli_core::formatting::organization_slug;
use incli_core::models::Incident;
use incli_core::Result;
use tokio::sync::watch;
use tracing::{debug, info};

/// Pause between two refreshes.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(3);

// ── Public types ──────────────────────────────────────────────────────────────

/// Where the monitor currently is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    Idle,
    Polling,
    Rendering,
    Sleeping,
    Stopped,
}

/// One refresh worth of live incidents.
#[derive(Debug, Clone)]
pub struct LiveSnapshot {
    pub taken_at: DateTime<Local>,
    /// Non-closed incidents sorted by name.
    pub incidents: Vec<Incident>,
    /// Organization slug from the first incident's permalink, if any.
    pub organization: Option<String>,
}

impl LiveSnapshot {
    pub fn new(taken_at: DateTime<Local>, incidents: Vec<Incident>) -> Self {
        let organization = incidents
            .first()
            .and_then(|i| i.permalink.as_deref())
            .and_then(organization_slug)
            .map(String::from);
        Self {
            taken_at,
            incidents,
            organization,
        }
    }
}

/// Draws a snapshot somewhere (a terminal, a test buffer).
pub trait SnapshotRenderer {
    fn render(&mut self, snapshot: &LiveSnapshot) -> Result<()>;
}

/// Drop closed incidents and sort the rest by name.
///
/// The sort is stable, so incidents sharing a name keep their fetch order.
pub fn live_incidents(incidents: Vec<Incident>) -> Vec<Incident> {
    let mut live: Vec<Incident> = incidents.into_iter().filter(|i| !i.is_closed()).collect();
    live.sort_by(|a, b| a.name.cmp(&b.name));
    live
}

// ── LiveMonitor ───────────────────────────────────────────────────────────────

pub struct LiveMonitor<'a, A: IncidentApi + ?Sized, R> {
    api: &'a A,
    renderer: R,
    interval: Duration,
    state: WatchState,
    cycles: u64,
}

impl<'a, A: IncidentApi + ?Sized, R: SnapshotRenderer> LiveMonitor<'a, A, R> {
    pub fn new(api: &'a A, renderer: R) -> Self {
        Self {
            api,
            renderer,
            interval: REFRESH_INTERVAL,
            state: WatchState::Idle,
            cycles: 0,
        }
    }

    /// Override the refresh interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn state(&self) -> WatchState {
        self.state
    }

    /// Completed fetch-and-render cycles.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Run until `shutdown` turns `true` or a fetch fails.
    ///
    /// The signal is checked at the top of every cycle and races both the
    /// fetch and the sleep, so a stalled request never pins the session.
    /// Any error ends the session; nothing stale is rendered.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        info!(interval = ?self.interval, "starting live incident view");

        loop {
            if *shutdown.borrow() {
                self.stop();
                return Ok(());
            }

            let polled = tokio::select! {
                polled = self.poll() => Some(polled),
                _ = shutdown_raised(&mut shutdown) => None,
            };
            let Some(polled) = polled else {
                debug!("shutdown raised while fetching");
                self.stop();
                return Ok(());
            };

            if let Err(e) = polled.and_then(|snapshot| self.present(&snapshot)) {
                self.state = WatchState::Stopped;
                return Err(e);
            }

            self.state = WatchState::Sleeping;
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = shutdown_raised(&mut shutdown) => {}
            }
        }
    }

    /// Fetch, filter, sort and render once.
    pub async fn cycle(&mut self) -> Result<()> {
        let snapshot = self.poll().await?;
        self.present(&snapshot)
    }

    async fn poll(&mut self) -> Result<LiveSnapshot> {
        self.state = WatchState::Polling;
        let all = Locator::new(self.api).incidents().await?;
        let total = all.len();
        let live = live_incidents(all);
        debug!(total, live = live.len(), "polled incidents");
        Ok(LiveSnapshot::new(Local::now(), live))
    }

    fn present(&mut self, snapshot: &LiveSnapshot) -> Result<()> {
        self.state = WatchState::Rendering;
        self.renderer.render(snapshot)?;
        self.cycles += 1;
        Ok(())
    }

    fn stop(&mut self) {
        info!(cycles = self.cycles, "live view stopped");
        self.state = WatchState::Stopped;
    }
}

/// Resolves once `shutdown` reads `true`. Never resolves if the sender is gone.
async fn shutdown_raised(shutdown: &mut watch::Receiver<bool>) {
    if shutdown.wait_for(|stop| *stop).await.is_err() {
        std::future::pending::<()>().await;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
