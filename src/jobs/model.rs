use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::{Month, OffsetDateTime};
use uuid::Uuid;

/// Where an application currently stands.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Pending,
    Interview,
    Declined,
}

impl JobStatus {
    pub const ALL: [JobStatus; 3] = [JobStatus::Pending, JobStatus::Interview, JobStatus::Declined];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Interview => "interview",
            JobStatus::Declined => "declined",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum JobType {
    #[default]
    FullTime,
    PartTime,
    Internship,
    Contract,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "full-time",
            JobType::PartTime => "part-time",
            JobType::Internship => "internship",
            JobType::Contract => "contract",
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown {kind} value: {value}")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

impl FromStr for JobStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobStatus::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "status",
                value: s.to_string(),
            })
    }
}

impl FromStr for JobType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full-time" => Ok(JobType::FullTime),
            "part-time" => Ok(JobType::PartTime),
            "internship" => Ok(JobType::Internship),
            "contract" => Ok(JobType::Contract),
            other => Err(UnknownVariant {
                kind: "jobType",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single job application owned by exactly one user.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub position: String,
    pub company: String,
    pub status: JobStatus,
    pub job_type: JobType,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Validated input for a new record. Owner and timestamps are stamped by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewJob {
    pub position: String,
    pub company: String,
    pub status: JobStatus,
    pub job_type: JobType,
}

/// Validated partial update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobPatch {
    pub position: Option<String>,
    pub company: Option<String>,
    pub status: Option<JobStatus>,
    pub job_type: Option<JobType>,
}

impl JobPatch {
    pub fn apply(&self, job: &mut JobRecord) {
        if let Some(position) = &self.position {
            job.position = position.clone();
        }
        if let Some(company) = &self.company {
            job.company = company.clone();
        }
        if let Some(status) = self.status {
            job.status = status;
        }
        if let Some(job_type) = self.job_type {
            job.job_type = job_type;
        }
    }
}

/// Calendar month key used by the monthly statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthBucket {
    pub year: i32,
    pub month: Month,
}

impl MonthBucket {
    pub fn of(at: OffsetDateTime) -> Self {
        let utc = at.to_offset(time::UtcOffset::UTC);
        Self {
            year: utc.year(),
            month: utc.month(),
        }
    }

    /// "Jan 2024"
    pub fn label(&self) -> String {
        let name = self.month.to_string();
        format!("{} {:04}", &name[..3], self.year)
    }
}

impl Ord for MonthBucket {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.year, self.month as u8).cmp(&(other.year, other.month as u8))
    }
}

impl PartialOrd for MonthBucket {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
