use async_trait::async_trait;
use uuid::Uuid;

use super::filter::JobFilter;
use super::model::{JobPatch, JobRecord, JobStatus, MonthBucket, NewJob};
use super::pagination::Window;
use super::sort::SortOrder;

/// Persistence for job records. Every lookup is scoped to an owner; a record
/// outside that scope is reported exactly like a missing one.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn insert(&self, owner_id: Uuid, job: NewJob) -> anyhow::Result<JobRecord>;
    async fn get(&self, owner_id: Uuid, id: Uuid) -> anyhow::Result<Option<JobRecord>>;
    async fn update(
        &self,
        owner_id: Uuid,
        id: Uuid,
        patch: &JobPatch,
    ) -> anyhow::Result<Option<JobRecord>>;
    async fn delete(&self, owner_id: Uuid, id: Uuid) -> anyhow::Result<bool>;

    async fn find(
        &self,
        filter: &JobFilter,
        order: SortOrder,
        window: Window,
    ) -> anyhow::Result<Vec<JobRecord>>;
    async fn count(&self, filter: &JobFilter) -> anyhow::Result<u64>;

    /// Groups are unordered and only present when non-empty.
    async fn count_by_status(&self, filter: &JobFilter) -> anyhow::Result<Vec<(JobStatus, u64)>>;
    async fn count_by_month(&self, filter: &JobFilter) -> anyhow::Result<Vec<(MonthBucket, u64)>>;
}
