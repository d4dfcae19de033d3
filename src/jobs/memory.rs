use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::filter::JobFilter;
use super::model::{JobPatch, JobRecord, JobStatus, MonthBucket, NewJob};
use super::pagination::Window;
use super::sort::SortOrder;
use super::store::JobStore;

/// In-process store; insertion order is the natural order.
#[derive(Default)]
pub struct MemoryJobStore {
    jobs: RwLock<Vec<JobRecord>>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(jobs: Vec<JobRecord>) -> Self {
        Self {
            jobs: RwLock::new(jobs),
        }
    }

    fn read(&self) -> anyhow::Result<std::sync::RwLockReadGuard<'_, Vec<JobRecord>>> {
        self.jobs
            .read()
            .map_err(|_| anyhow::anyhow!("job store lock poisoned"))
    }

    fn write(&self) -> anyhow::Result<std::sync::RwLockWriteGuard<'_, Vec<JobRecord>>> {
        self.jobs
            .write()
            .map_err(|_| anyhow::anyhow!("job store lock poisoned"))
    }

    fn matching(&self, filter: &JobFilter) -> anyhow::Result<Vec<JobRecord>> {
        Ok(self
            .read()?
            .iter()
            .filter(|j| filter.matches(j))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn insert(&self, owner_id: Uuid, job: NewJob) -> anyhow::Result<JobRecord> {
        let now = OffsetDateTime::now_utc();
        let record = JobRecord {
            id: Uuid::new_v4(),
            owner_id,
            position: job.position,
            company: job.company,
            status: job.status,
            job_type: job.job_type,
            created_at: now,
            updated_at: now,
        };
        self.write()?.push(record.clone());
        Ok(record)
    }

    async fn get(&self, owner_id: Uuid, id: Uuid) -> anyhow::Result<Option<JobRecord>> {
        Ok(self
            .read()?
            .iter()
            .find(|j| j.id == id && j.owner_id == owner_id)
            .cloned())
    }

    async fn update(
        &self,
        owner_id: Uuid,
        id: Uuid,
        patch: &JobPatch,
    ) -> anyhow::Result<Option<JobRecord>> {
        let mut jobs = self.write()?;
        let Some(job) = jobs
            .iter_mut()
            .find(|j| j.id == id && j.owner_id == owner_id)
        else {
            return Ok(None);
        };
        patch.apply(job);
        job.updated_at = OffsetDateTime::now_utc();
        Ok(Some(job.clone()))
    }

    async fn delete(&self, owner_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let mut jobs = self.write()?;
        let before = jobs.len();
        jobs.retain(|j| !(j.id == id && j.owner_id == owner_id));
        Ok(jobs.len() != before)
    }

    async fn find(
        &self,
        filter: &JobFilter,
        order: SortOrder,
        window: Window,
    ) -> anyhow::Result<Vec<JobRecord>> {
        let mut jobs = self.matching(filter)?;
        order.apply(&mut jobs);
        Ok(window.slice(jobs))
    }

    async fn count(&self, filter: &JobFilter) -> anyhow::Result<u64> {
        Ok(self.read()?.iter().filter(|j| filter.matches(j)).count() as u64)
    }

    async fn count_by_status(&self, filter: &JobFilter) -> anyhow::Result<Vec<(JobStatus, u64)>> {
        let mut groups: HashMap<JobStatus, u64> = HashMap::new();
        for job in self.matching(filter)? {
            *groups.entry(job.status).or_default() += 1;
        }
        Ok(groups.into_iter().collect())
    }

    async fn count_by_month(&self, filter: &JobFilter) -> anyhow::Result<Vec<(MonthBucket, u64)>> {
        let mut groups: HashMap<MonthBucket, u64> = HashMap::new();
        for job in self.matching(filter)? {
            *groups.entry(MonthBucket::of(job.created_at)).or_default() += 1;
        }
        Ok(groups.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::model::JobType;

    fn new_job(position: &str) -> NewJob {
        NewJob {
            position: position.into(),
            company: "Acme".into(),
            status: JobStatus::Pending,
            job_type: JobType::FullTime,
        }
    }

    #[tokio::test]
    async fn records_are_invisible_to_other_owners() {
        let store = MemoryJobStore::new();
        let (me, other) = (Uuid::new_v4(), Uuid::new_v4());
        let job = store.insert(me, new_job("Dev")).await.unwrap();

        assert!(store.get(other, job.id).await.unwrap().is_none());
        assert!(store
            .update(other, job.id, &JobPatch::default())
            .await
            .unwrap()
            .is_none());
        assert!(!store.delete(other, job.id).await.unwrap());
        assert_eq!(store.get(me, job.id).await.unwrap(), Some(job.clone()));
        assert!(store.delete(me, job.id).await.unwrap());
        assert!(store.get(me, job.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_keeps_id_owner_and_created_at() {
        let store = MemoryJobStore::new();
        let me = Uuid::new_v4();
        let job = store.insert(me, new_job("Dev")).await.unwrap();
        let patch = JobPatch {
            company: Some("Globex".into()),
            ..Default::default()
        };
        let updated = store.update(me, job.id, &patch).await.unwrap().unwrap();
        assert_eq!(updated.id, job.id);
        assert_eq!(updated.owner_id, me);
        assert_eq!(updated.created_at, job.created_at);
        assert_eq!(updated.company, "Globex");
        assert!(updated.updated_at >= job.updated_at);
    }
}
