use anyhow::Context;
use sqlx::FromRow;
use time::{Month, OffsetDateTime};
use uuid::Uuid;

use super::model::{JobRecord, MonthBucket};

/// Row as stored in the `jobs` table; enums are kept as text.
#[derive(Debug, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub position: String,
    pub company: String,
    pub status: String,
    pub job_type: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl TryFrom<JobRow> for JobRecord {
    type Error = anyhow::Error;

    fn try_from(r: JobRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            owner_id: r.owner_id,
            position: r.position,
            company: r.company,
            status: r.status.parse().context("jobs.status")?,
            job_type: r.job_type.parse().context("jobs.job_type")?,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub struct StatusCountRow {
    pub status: String,
    pub count: i64,
}

#[derive(Debug, FromRow)]
pub struct MonthCountRow {
    pub year: i32,
    pub month: i32,
    pub count: i64,
}

impl MonthCountRow {
    pub fn into_bucket(self) -> anyhow::Result<(MonthBucket, u64)> {
        let month = u8::try_from(self.month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .with_context(|| format!("month out of range: {}", self.month))?;
        Ok((
            MonthBucket {
                year: self.year,
                month,
            },
            self.count.max(0) as u64,
        ))
    }
}
