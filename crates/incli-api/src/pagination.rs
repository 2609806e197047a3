//! Draining of cursor-paginated listing endpoints.

use std::collections::HashSet;
use std::future::Future;

use incli_core::models::Page;
use incli_core::{IncliError, Result};
use tracing::debug;

/// Request pages until the end marker and return every record in server order.
///
/// `fetch_page` is called with `None` first and then with each cursor the
/// previous page handed back. Requests are strictly sequential. A failing
/// page aborts the whole drain; a cursor returned twice fails with
/// [`IncliError::PaginationLoop`] instead of spinning forever.
pub async fn fetch_all<T, F, Fut>(what: &str, mut fetch_page: F) -> Result<Vec<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut records: Vec<T> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = fetch_page(cursor.take()).await?;
        pages += 1;
        records.extend(page.records);

        match page.next_cursor {
            None => break,
            Some(next) => {
                if !seen.insert(next.clone()) {
                    return Err(IncliError::PaginationLoop { cursor: next });
                }
                debug!(what, page = pages, cursor = %next, "fetching next page");
                cursor = Some(next);
            }
        }
    }

    debug!(what, pages, records = records.len(), "pagination complete");
    Ok(records)
}
