//! Pagination of remote result sets until exhaustion.

use std::collections::HashSet;
use std::future::Future;

use crate::error::GatewayResult;

/// Repeatedly fetch pages until a short page signals exhaustion, then
/// return the concatenation deduplicated by `key_of` (first occurrence
/// wins, page order preserved).
///
/// `fetch` receives the exclusive lower bound for the next page; the
/// bound for page n+1 is derived from the last element of page n via
/// `bound_of`. Pages within one call are strictly sequential. An empty
/// first page yields an empty result after a single fetch. Any fetch
/// failure aborts the whole aggregation; no partial results.
///
/// Holds no state across calls and is safe to run concurrently with
/// other aggregations.
pub async fn paginate<T, F, Fut>(
    initial_bound: String,
    page_size: usize,
    mut fetch: F,
    key_of: impl Fn(&T) -> String,
    bound_of: impl Fn(&T) -> String,
) -> GatewayResult<Vec<T>>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = GatewayResult<Vec<T>>>,
{
    let mut all = Vec::new();
    let mut bound = initial_bound;

    loop {
        let page = fetch(bound).await?;
        let exhausted = page.len() < page_size;
        let next_bound = page.last().map(&bound_of);
        all.extend(page);

        match (exhausted, next_bound) {
            (false, Some(next)) => bound = next,
            _ => break,
        }
    }

    let mut seen = HashSet::new();
    all.retain(|item| seen.insert(key_of(item)));
    Ok(all)
}
