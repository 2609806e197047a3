use tokio::sync::watch;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a `--log-level` value to an [`EnvFilter`] directive.
///
/// `RUST_LOG`, when set, wins. Unknown levels fall back to `"warn"`.
pub fn log_filter(log_level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    EnvFilter::try_new(log_level.to_lowercase()).unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Initialise the global `tracing` subscriber.
///
/// Everything goes to stderr; stdout is reserved for command output.
pub fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    let subscriber = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(log_filter(log_level))
        .with(subscriber)
        .try_init()?;

    Ok(())
}

// ── Shutdown signal ────────────────────────────────────────────────────────────

/// Spawn a task that flips the returned receiver to `true` on Ctrl+C.
pub fn shutdown_on_ctrl_c() -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Ctrl+C received; stopping");
            let _ = tx.send(true);
        }
    });
    rx
}

// ── Tests ──────────────────────────────────────────────────────────────────────
