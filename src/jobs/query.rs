use tracing::debug;
use uuid::Uuid;

use super::dto::{QueryParams, QueryResult};
use super::filter::JobFilter;
use super::pagination::Window;
use super::sort::SortOrder;
use super::store::JobStore;

/// Runs one `GET /jobs` request: filter, count, order, window.
///
/// Malformed parameters never fail here; only store errors are returned,
/// untouched.
pub async fn list_jobs(
    store: &dyn JobStore,
    owner_id: Uuid,
    params: &QueryParams,
) -> anyhow::Result<QueryResult> {
    let filter = JobFilter::from_params(owner_id, params);
    let order = SortOrder::resolve(params.sort.as_deref());
    let window = Window::resolve(params.page.as_deref(), params.limit.as_deref());

    let (total_jobs, jobs) = tokio::try_join!(
        store.count(&filter),
        store.find(&filter, order, window)
    )?;

    debug!(
        %owner_id,
        ?order,
        page = window.page,
        limit = window.limit,
        total_jobs,
        returned = jobs.len(),
        "jobs listed"
    );

    Ok(QueryResult {
        jobs,
        total_jobs,
        num_of_pages: window.num_of_pages(total_jobs),
        page: window.page,
    })
}
