//! `catalog get`: one entry by id, or the entries of a scope, optionally by name.

use incli_api::{IncidentApi, Locator};
use incli_core::models::{CatalogEntry, Found};
use incli_core::query::CatalogQuery;
use incli_core::Result;

pub async fn get_catalog_entries<A: IncidentApi + ?Sized>(
    api: &A,
    query: &CatalogQuery,
) -> Result<Found<CatalogEntry>> {
    let locator = Locator::new(api);

    match query {
        CatalogQuery::ById(id) => locator.catalog_entry_by_id(id).await.map(Found::One),
        CatalogQuery::Scoped {
            scope,
            name: Some(name),
        } => locator
            .catalog_entries_by_name(name, scope.as_ref())
            .await
            .map(Found::Many),
        CatalogQuery::Scoped { scope, name: None } => {
            locator.catalog_entries(scope.as_ref()).await.map(Found::Many)
        }
    }
}
