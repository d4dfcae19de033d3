use uuid::Uuid;

use super::dto::{MonthlyPoint, StatsResult, StatsSnapshot};
use super::filter::JobFilter;
use super::model::{JobStatus, MonthBucket};
use super::store::JobStore;

/// How many of the most recent non-empty months are reported.
pub const MONTHS_SHOWN: usize = 6;

pub async fn compute_stats(store: &dyn JobStore, owner_id: Uuid) -> anyhow::Result<StatsResult> {
    let filter = JobFilter::owned_by(owner_id);
    let (by_status, by_month) = tokio::try_join!(
        store.count_by_status(&filter),
        store.count_by_month(&filter)
    )?;
    Ok(StatsResult {
        default_stats: status_snapshot(by_status),
        monthly_applications: monthly_series(by_month),
    })
}

pub fn status_snapshot(groups: impl IntoIterator<Item = (JobStatus, u64)>) -> StatsSnapshot {
    groups
        .into_iter()
        .fold(StatsSnapshot::default(), |mut acc, (status, count)| {
            match status {
                JobStatus::Pending => acc.pending += count,
                JobStatus::Interview => acc.interview += count,
                JobStatus::Declined => acc.declined += count,
            }
            acc
        })
}

/// Newest `MONTHS_SHOWN` buckets, emitted oldest first. Months without
/// records are skipped, not zero-filled.
pub fn monthly_series(groups: impl IntoIterator<Item = (MonthBucket, u64)>) -> Vec<MonthlyPoint> {
    let mut groups: Vec<(MonthBucket, u64)> = groups.into_iter().filter(|(_, n)| *n > 0).collect();
    groups.sort_by(|a, b| b.0.cmp(&a.0));
    groups.truncate(MONTHS_SHOWN);
    groups
        .into_iter()
        .rev()
        .map(|(bucket, count)| MonthlyPoint {
            label: bucket.label(),
            count,
        })
        .collect()
}
