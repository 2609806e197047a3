//! `incidents get`: one incident by id or reference, or all of them.

use incli_api::{IncidentApi, Locator};
use incli_core::models::{Found, Incident};
use incli_core::query::IncidentQuery;
use incli_core::Result;

use crate::watch::live_incidents;

/// Resolve a non-interactive incident query.
///
/// [`IncidentQuery::Watch`] yields a single snapshot of what the live view
/// would show: non-closed incidents sorted by name. The refreshing view
/// itself is [`crate::watch::LiveMonitor`].
pub async fn get_incidents<A: IncidentApi + ?Sized>(
    api: &A,
    query: &IncidentQuery,
) -> Result<Found<Incident>> {
    let locator = Locator::new(api);

    match query {
        IncidentQuery::ById(id) => locator.incident_by_id(id).await.map(Found::One),
        IncidentQuery::ByReference(reference) => locator
            .incident_by_reference(*reference)
            .await
            .map(Found::One),
        IncidentQuery::All => locator.incidents().await.map(Found::Many),
        IncidentQuery::Watch => locator
            .incidents()
            .await
            .map(|all| Found::Many(live_incidents(all))),
    }
}
