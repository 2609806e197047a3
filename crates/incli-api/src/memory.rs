//! In-memory [`IncidentApi`] backend.
//!
//! Serves fixed record sets in fixed-size pages and counts every request,
//! so tests can assert on pagination and on "zero requests were made".

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Map;

use incli_core::formatting::reference_number;
use incli_core::models::{CatalogEntry, CatalogType, Incident, IncidentStatus, Page};
use incli_core::{IncliError, Result};

use crate::api::IncidentApi;

pub struct InMemoryApi {
    catalog_types: Vec<CatalogType>,
    catalog_entries: Vec<CatalogEntry>,
    incidents: Mutex<Vec<Incident>>,
    page_size: usize,
    point_lookup: bool,
    failing: AtomicBool,
    stalled: AtomicBool,
    requests: AtomicUsize,
}

impl Default for InMemoryApi {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryApi {
    pub fn new() -> Self {
        Self {
            catalog_types: Vec::new(),
            catalog_entries: Vec::new(),
            incidents: Mutex::new(Vec::new()),
            page_size: 2,
            point_lookup: true,
            failing: AtomicBool::new(false),
            stalled: AtomicBool::new(false),
            requests: AtomicUsize::new(0),
        }
    }

    pub fn with_catalog_types(mut self, types: Vec<CatalogType>) -> Self {
        self.catalog_types = types;
        self
    }

    pub fn with_catalog_entries(mut self, entries: Vec<CatalogEntry>) -> Self {
        self.catalog_entries = entries;
        self
    }

    pub fn with_incidents(self, incidents: Vec<Incident>) -> Self {
        self.set_incidents(incidents);
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Pretend the backend has no get-by-id endpoints.
    pub fn without_point_lookup(mut self) -> Self {
        self.point_lookup = false;
        self
    }

    /// Replace the incident set between watch cycles.
    pub fn set_incidents(&self, incidents: Vec<Incident>) {
        if let Ok(mut guard) = self.incidents.lock() {
            *guard = incidents;
        }
    }

    /// Make every subsequent request fail with a remote error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Make every subsequent request hang forever, like a dead connection.
    pub fn set_stalled(&self, stalled: bool) {
        self.stalled.store(stalled, Ordering::SeqCst);
    }

    /// Number of requests served so far, failed ones included.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    async fn begin_request(&self) -> Result<()> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if self.stalled.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(IncliError::Remote {
                status: Some(500),
                message: "internal server error".to_string(),
            });
        }
        Ok(())
    }

    fn page_of<T: Clone>(&self, items: &[T], after: Option<String>) -> Result<Page<T>> {
        let start = match after {
            None => 0,
            Some(cursor) => cursor
                .parse::<usize>()
                .map_err(|_| IncliError::remote(format!("bad cursor {cursor:?}")))?,
        };
        let end = (start + self.page_size).min(items.len());
        let records = items.get(start..end).unwrap_or_default().to_vec();
        let next = (end < items.len()).then(|| end.to_string());
        Ok(Page::new(records, next))
    }

    fn incidents_snapshot(&self) -> Vec<Incident> {
        self.incidents
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl IncidentApi for InMemoryApi {
    fn supports_point_lookup(&self) -> bool {
        self.point_lookup
    }

    async fn list_catalog_types(&self) -> Result<Vec<CatalogType>> {
        self.begin_request().await?;
        Ok(self.catalog_types.clone())
    }

    async fn list_catalog_entries_page(
        &self,
        catalog_type_id: &str,
        after: Option<String>,
    ) -> Result<Page<CatalogEntry>> {
        self.begin_request().await?;
        let of_type: Vec<CatalogEntry> = self
            .catalog_entries
            .iter()
            .filter(|e| e.catalog_type_id == catalog_type_id)
            .cloned()
            .collect();
        self.page_of(&of_type, after)
    }

    async fn get_catalog_entry(&self, id: &str) -> Result<CatalogEntry> {
        self.begin_request().await?;
        self.catalog_entries
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| IncliError::NotFound(format!("catalog entry {id}")))
    }

    async fn list_incidents_page(&self, after: Option<String>) -> Result<Page<Incident>> {
        self.begin_request().await?;
        let incidents = self.incidents_snapshot();
        self.page_of(&incidents, after)
    }

    async fn get_incident(&self, id_or_reference: &str) -> Result<Incident> {
        self.begin_request().await?;
        self.incidents_snapshot()
            .into_iter()
            .find(|i| i.id == id_or_reference || reference_number(&i.reference) == id_or_reference)
            .ok_or_else(|| IncliError::NotFound(format!("incident {id_or_reference}")))
    }
}

// ── Record builders ───────────────────────────────────────────────────────────

pub fn catalog_type(id: &str, name: &str, type_name: &str) -> CatalogType {
    CatalogType {
        id: id.to_string(),
        name: name.to_string(),
        type_name: type_name.to_string(),
        extra: Map::new(),
    }
}

pub fn catalog_entry(id: &str, name: &str, catalog_type_id: &str) -> CatalogEntry {
    CatalogEntry {
        id: id.to_string(),
        name: name.to_string(),
        catalog_type_id: catalog_type_id.to_string(),
        aliases: Vec::new(),
        external_id: None,
        extra: Map::new(),
    }
}

/// An incident in organization `acme` with a permalink derived from `reference`.
pub fn incident(id: &str, name: &str, reference: &str, status: &str) -> Incident {
    Incident {
        id: id.to_string(),
        name: name.to_string(),
        reference: reference.to_string(),
        permalink: Some(format!(
            "https://app.incident.io/acme/incidents/{}",
            reference_number(reference)
        )),
        incident_status: IncidentStatus {
            id: format!("status-{}", status.to_lowercase()),
            name: status.to_string(),
            category: None,
            extra: Map::new(),
        },
        extra: Map::new(),
    }
}
