use anyhow::Context;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

use super::filter::{FieldMatch, JobFilter};
use super::model::{JobPatch, JobRecord, JobStatus, MonthBucket, NewJob};
use super::pagination::Window;
use super::repo_types::{JobRow, MonthCountRow, StatusCountRow};
use super::sort::SortOrder;
use super::store::JobStore;

const JOB_COLUMNS: &str =
    "id, owner_id, position, company, status, job_type, created_at, updated_at";

/// Job records in the `jobs` table; filtering, ordering and grouping run in Postgres.
#[derive(Clone)]
pub struct PgJobStore {
    db: PgPool,
}

impl PgJobStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

/// Appends the `WHERE` clause for `filter`.
fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &JobFilter) {
    qb.push(" WHERE owner_id = ").push_bind(filter.owner_id);
    if let Some(search) = &filter.search {
        qb.push(" AND position ILIKE '%' || ")
            .push_bind(escape_like(search))
            .push(" || '%'");
    }
    match filter.status {
        Some(FieldMatch::Is(status)) => {
            qb.push(" AND status = ").push_bind(status.as_str());
        }
        Some(FieldMatch::Never) => {
            qb.push(" AND FALSE");
        }
        None => {}
    }
    match filter.job_type {
        Some(FieldMatch::Is(job_type)) => {
            qb.push(" AND job_type = ").push_bind(job_type.as_str());
        }
        Some(FieldMatch::Never) => {
            qb.push(" AND FALSE");
        }
        None => {}
    }
}

/// Escapes LIKE metacharacters so the search term is matched literally.
fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn to_i64(v: u64) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}

fn select_jobs<'a>(
    filter: &JobFilter,
    order: SortOrder,
    window: Window,
) -> QueryBuilder<'a, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {JOB_COLUMNS} FROM jobs"));
    push_filter(&mut qb, filter);
    if let Some(order_by) = order.sql() {
        qb.push(" ORDER BY ").push(order_by);
    }
    qb.push(" LIMIT ")
        .push_bind(to_i64(window.limit))
        .push(" OFFSET ")
        .push_bind(to_i64(window.skip()));
    qb
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn insert(&self, owner_id: Uuid, job: NewJob) -> anyhow::Result<JobRecord> {
        let row = sqlx::query_as::<_, JobRow>(&format!(
            r#"
            INSERT INTO jobs (id, owner_id, position, company, status, job_type)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(&job.position)
        .bind(&job.company)
        .bind(job.status.as_str())
        .bind(job.job_type.as_str())
        .fetch_one(&self.db)
        .await
        .context("insert job")?;
        row.try_into()
    }

    async fn get(&self, owner_id: Uuid, id: Uuid) -> anyhow::Result<Option<JobRecord>> {
        let row = sqlx::query_as::<_, JobRow>(&format!(
            r#"
            SELECT {JOB_COLUMNS}
            FROM jobs
            WHERE id = $1 AND owner_id = $2
            "#
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.db)
        .await
        .context("get job")?;
        row.map(JobRecord::try_from).transpose()
    }

    async fn update(
        &self,
        owner_id: Uuid,
        id: Uuid,
        patch: &JobPatch,
    ) -> anyhow::Result<Option<JobRecord>> {
        let row = sqlx::query_as::<_, JobRow>(&format!(
            r#"
            UPDATE jobs
               SET position = COALESCE($3, position),
                   company = COALESCE($4, company),
                   status = COALESCE($5, status),
                   job_type = COALESCE($6, job_type),
                   updated_at = now()
             WHERE id = $1 AND owner_id = $2
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(owner_id)
        .bind(patch.position.as_deref())
        .bind(patch.company.as_deref())
        .bind(patch.status.map(|s| s.as_str()))
        .bind(patch.job_type.map(|t| t.as_str()))
        .fetch_optional(&self.db)
        .await
        .context("update job")?;
        row.map(JobRecord::try_from).transpose()
    }

    async fn delete(&self, owner_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM jobs WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.db)
            .await
            .context("delete job")?;
        Ok(res.rows_affected() > 0)
    }

    async fn find(
        &self,
        filter: &JobFilter,
        order: SortOrder,
        window: Window,
    ) -> anyhow::Result<Vec<JobRecord>> {
        let mut qb = select_jobs(filter, order, window);
        debug!(sql = qb.sql(), "find jobs");
        let rows = qb
            .build_query_as::<JobRow>()
            .fetch_all(&self.db)
            .await
            .context("find jobs")?;
        rows.into_iter().map(JobRecord::try_from).collect()
    }

    async fn count(&self, filter: &JobFilter) -> anyhow::Result<u64> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM jobs");
        push_filter(&mut qb, filter);
        let total: i64 = qb
            .build_query_scalar::<i64>()
            .fetch_one(&self.db)
            .await
            .context("count jobs")?;
        Ok(total.max(0) as u64)
    }

    async fn count_by_status(&self, filter: &JobFilter) -> anyhow::Result<Vec<(JobStatus, u64)>> {
        let mut qb = QueryBuilder::new("SELECT status, COUNT(*) AS count FROM jobs");
        push_filter(&mut qb, filter);
        qb.push(" GROUP BY status");
        let rows = qb
            .build_query_as::<StatusCountRow>()
            .fetch_all(&self.db)
            .await
            .context("count jobs by status")?;
        rows.into_iter()
            .map(|r| {
                let status = r.status.parse::<JobStatus>().context("jobs.status")?;
                Ok::<_, anyhow::Error>((status, r.count.max(0) as u64))
            })
            .collect()
    }

    async fn count_by_month(&self, filter: &JobFilter) -> anyhow::Result<Vec<(MonthBucket, u64)>> {
        let mut qb = QueryBuilder::new(
            r#"
            SELECT EXTRACT(YEAR FROM created_at AT TIME ZONE 'UTC')::int AS year,
                   EXTRACT(MONTH FROM created_at AT TIME ZONE 'UTC')::int AS month,
                   COUNT(*) AS count
            FROM jobs"#,
        );
        push_filter(&mut qb, filter);
        qb.push(" GROUP BY 1, 2");
        let rows = qb
            .build_query_as::<MonthCountRow>()
            .fetch_all(&self.db)
            .await
            .context("count jobs by month")?;
        rows.into_iter().map(MonthCountRow::into_bucket).collect()
    }
}
