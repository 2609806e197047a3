//! Record resolution by id, or by name within an optional catalog type scope.

use incli_core::filter::{filter, Match};
use incli_core::formatting::REFERENCE_PREFIX;
use incli_core::models::{CatalogEntry, Incident};
use incli_core::query::Scope;
use incli_core::{IncliError, Result};
use tracing::{debug, info};

use crate::api::IncidentApi;
use crate::pagination::fetch_all;

/// Resolves catalog entries and incidents against an [`IncidentApi`].
pub struct Locator<'a, A: IncidentApi + ?Sized> {
    api: &'a A,
}

impl<'a, A: IncidentApi + ?Sized> Locator<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    // ── Catalog ───────────────────────────────────────────────────────────

    /// Fetch a catalog entry by id, scanning every entry when the backend
    /// cannot look one up directly.
    pub async fn catalog_entry_by_id(&self, id: &str) -> Result<CatalogEntry> {
        if self.api.supports_point_lookup() {
            return self.api.get_catalog_entry(id).await;
        }

        debug!(id, "no point lookup; scanning all catalog entries");
        let all = self.catalog_entries(None).await?;
        filter(all, &Match::Id(id))
            .into_iter()
            .next()
            .ok_or_else(|| IncliError::NotFound(format!("catalog entry {id}")))
    }

    /// Every catalog entry within `scope`, in fetch order.
    ///
    /// Without a scope, entries of every catalog type are listed type by type.
    pub async fn catalog_entries(&self, scope: Option<&Scope>) -> Result<Vec<CatalogEntry>> {
        let type_ids = self.catalog_type_ids(scope).await?;
        let api = self.api;

        let mut entries = Vec::new();
        for type_id in &type_ids {
            let page = fetch_all("catalog entries", move |after| {
                api.list_catalog_entries_page(type_id, after)
            })
            .await?;
            entries.extend(page);
        }

        info!(types = type_ids.len(), entries = entries.len(), "listed catalog entries");
        Ok(entries)
    }

    /// All entries within `scope` whose name is exactly `name`.
    ///
    /// Names are not unique, so every match is returned in fetch order.
    /// Zero matches is [`IncliError::NotFound`].
    pub async fn catalog_entries_by_name(
        &self,
        name: &str,
        scope: Option<&Scope>,
    ) -> Result<Vec<CatalogEntry>> {
        let matches = filter(self.catalog_entries(scope).await?, &Match::Name(name));
        if matches.is_empty() {
            return Err(IncliError::NotFound(match scope {
                Some(Scope::TypeId(id)) => format!("catalog entry {name:?} with type id {id}"),
                Some(Scope::TypeName(ty)) => format!("catalog entry {name:?} of type {ty:?}"),
                None => format!("catalog entry {name:?}"),
            }));
        }
        Ok(matches)
    }

    /// Catalog type ids covered by `scope`.
    ///
    /// A type name must match exactly one catalog type, by display name or
    /// by type name.
    async fn catalog_type_ids(&self, scope: Option<&Scope>) -> Result<Vec<String>> {
        match scope {
            Some(Scope::TypeId(id)) => Ok(vec![id.clone()]),
            Some(Scope::TypeName(name)) => {
                let mut matches: Vec<_> = self
                    .api
                    .list_catalog_types()
                    .await?
                    .into_iter()
                    .filter(|t| t.answers_to(name))
                    .collect();
                match matches.len() {
                    0 => Err(IncliError::NotFound(format!("catalog type {name:?}"))),
                    1 => Ok(matches.drain(..).map(|t| t.id).collect()),
                    count => Err(IncliError::Ambiguous {
                        what: format!("catalog type {name:?}"),
                        count,
                    }),
                }
            }
            None => Ok(self
                .api
                .list_catalog_types()
                .await?
                .into_iter()
                .map(|t| t.id)
                .collect()),
        }
    }

    // ── Incidents ─────────────────────────────────────────────────────────

    pub async fn incident_by_id(&self, id: &str) -> Result<Incident> {
        if self.api.supports_point_lookup() {
            return self.api.get_incident(id).await;
        }

        filter(self.incidents().await?, &Match::Id(id))
            .into_iter()
            .next()
            .ok_or_else(|| IncliError::NotFound(format!("incident {id}")))
    }

    /// Fetch an incident by its reference number, e.g. `27` for `INC-27`.
    pub async fn incident_by_reference(&self, reference: u32) -> Result<Incident> {
        if self.api.supports_point_lookup() {
            return self.api.get_incident(&reference.to_string()).await;
        }

        let wanted = format!("{REFERENCE_PREFIX}{reference}");
        self.incidents()
            .await?
            .into_iter()
            .find(|i| i.reference == wanted)
            .ok_or_else(|| IncliError::NotFound(format!("incident {wanted}")))
    }

    /// Every incident, in server order.
    pub async fn incidents(&self) -> Result<Vec<Incident>> {
        let api = self.api;
        fetch_all("incidents", move |after| api.list_incidents_page(after)).await
    }
}
