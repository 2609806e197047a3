use async_trait::async_trait;

use incli_core::models::{CatalogEntry, CatalogType, Incident, Page};
use incli_core::Result;

/// Operations the incli commands need from the remote API.
///
/// Listing methods return a single page; draining them is the job of
/// [`crate::pagination::fetch_all`]. Point lookups report a missing record as
/// [`incli_core::IncliError::NotFound`] and everything else as
/// [`incli_core::IncliError::Remote`].
#[async_trait]
pub trait IncidentApi: Send + Sync {
    /// Whether records can be fetched directly by id. When `false`, lookups
    /// by id fall back to a full listing.
    fn supports_point_lookup(&self) -> bool {
        true
    }

    /// All catalog types, in the order the API lists them.
    async fn list_catalog_types(&self) -> Result<Vec<CatalogType>>;

    /// One page of entries for a catalog type.
    async fn list_catalog_entries_page(
        &self,
        catalog_type_id: &str,
        after: Option<String>,
    ) -> Result<Page<CatalogEntry>>;

    /// A catalog entry by id.
    async fn get_catalog_entry(&self, id: &str) -> Result<CatalogEntry>;

    /// One page of incidents.
    async fn list_incidents_page(&self, after: Option<String>) -> Result<Page<Incident>>;

    /// An incident by id or numeric reference.
    async fn get_incident(&self, id_or_reference: &str) -> Result<Incident>;
}
