use std::str::FromStr;

use uuid::Uuid;

use super::dto::QueryParams;
use super::model::{JobRecord, JobStatus, JobType};

/// Sentinel query value meaning "do not filter on this field".
pub const ALL: &str = "all";

/// Constraint on an enum-valued field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldMatch<T> {
    Is(T),
    /// Requested value is not a known variant; nothing can match it.
    Never,
}

impl<T: PartialEq + Copy> FieldMatch<T> {
    pub fn accepts(&self, value: T) -> bool {
        match self {
            FieldMatch::Is(v) => *v == value,
            FieldMatch::Never => false,
        }
    }
}

/// Canonical predicate over one owner's job records.
#[derive(Debug, Clone, PartialEq)]
pub struct JobFilter {
    pub owner_id: Uuid,
    /// Case-insensitive substring of `position`, never empty.
    pub search: Option<String>,
    pub status: Option<FieldMatch<JobStatus>>,
    pub job_type: Option<FieldMatch<JobType>>,
}

impl JobFilter {
    /// Every record of `owner_id`, nothing else.
    pub fn owned_by(owner_id: Uuid) -> Self {
        Self {
            owner_id,
            search: None,
            status: None,
            job_type: None,
        }
    }

    pub fn from_params(owner_id: Uuid, params: &QueryParams) -> Self {
        let search = params
            .search
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        Self {
            owner_id,
            search,
            status: field_match(params.status.as_deref()),
            job_type: field_match(params.job_type.as_deref()),
        }
    }

    pub fn matches(&self, job: &JobRecord) -> bool {
        if job.owner_id != self.owner_id {
            return false;
        }
        if let Some(needle) = &self.search {
            if !job.position.to_lowercase().contains(&needle.to_lowercase()) {
                return false;
            }
        }
        if let Some(status) = &self.status {
            if !status.accepts(job.status) {
                return false;
            }
        }
        if let Some(job_type) = &self.job_type {
            if !job_type.accepts(job.job_type) {
                return false;
            }
        }
        true
    }
}

fn field_match<T: FromStr>(raw: Option<&str>) -> Option<FieldMatch<T>> {
    match raw {
        None | Some("") | Some(ALL) => None,
        Some(value) => Some(match value.parse::<T>() {
            Ok(v) => FieldMatch::Is(v),
            Err(_) => FieldMatch::Never,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn job(owner_id: Uuid, position: &str, status: JobStatus, job_type: JobType) -> JobRecord {
        JobRecord {
            id: Uuid::new_v4(),
            owner_id,
            position: position.into(),
            company: "Acme".into(),
            status,
            job_type,
            created_at: datetime!(2024-01-01 00:00 UTC),
            updated_at: datetime!(2024-01-01 00:00 UTC),
        }
    }

    fn params(status: Option<&str>, job_type: Option<&str>, search: Option<&str>) -> QueryParams {
        QueryParams {
            status: status.map(Into::into),
            job_type: job_type.map(Into::into),
            search: search.map(Into::into),
            ..Default::default()
        }
    }

    #[test]
    fn owner_scope_is_always_enforced() {
        let me = Uuid::new_v4();
        let filter = JobFilter::from_params(me, &params(Some("all"), Some("all"), Some("")));
        assert!(filter.matches(&job(me, "Dev", JobStatus::Pending, JobType::FullTime)));
        let stranger = Uuid::new_v4();
        assert!(!filter.matches(&job(stranger, "Dev", JobStatus::Pending, JobType::FullTime)));
    }

    #[test]
    fn all_and_absent_impose_no_constraint() {
        let me = Uuid::new_v4();
        assert_eq!(
            JobFilter::from_params(me, &params(Some("all"), Some("all"), Some(""))),
            JobFilter::owned_by(me)
        );
        assert_eq!(
            JobFilter::from_params(me, &QueryParams::default()),
            JobFilter::owned_by(me)
        );
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let me = Uuid::new_v4();
        let filter = JobFilter::from_params(me, &params(None, None, Some("engineer")));
        assert!(filter.matches(&job(
            me,
            "Senior Engineer",
            JobStatus::Pending,
            JobType::FullTime
        )));
        assert!(!filter.matches(&job(me, "Designer", JobStatus::Pending, JobType::FullTime)));
    }

    #[test]
    fn search_is_literal_not_a_pattern() {
        let me = Uuid::new_v4();
        let filter = JobFilter::from_params(me, &params(None, None, Some("c++")));
        assert!(filter.matches(&job(me, "C++ Developer", JobStatus::Pending, JobType::FullTime)));
        assert!(!filter.matches(&job(me, "C Developer", JobStatus::Pending, JobType::FullTime)));
    }

    #[test]
    fn status_and_type_must_both_match() {
        let me = Uuid::new_v4();
        let filter =
            JobFilter::from_params(me, &params(Some("interview"), Some("internship"), None));
        assert!(filter.matches(&job(me, "Dev", JobStatus::Interview, JobType::Internship)));
        assert!(!filter.matches(&job(me, "Dev", JobStatus::Interview, JobType::FullTime)));
        assert!(!filter.matches(&job(me, "Dev", JobStatus::Pending, JobType::Internship)));
    }

    #[test]
    fn unknown_values_match_nothing() {
        let me = Uuid::new_v4();
        let filter = JobFilter::from_params(me, &params(Some("hired"), None, None));
        assert_eq!(filter.status, Some(FieldMatch::Never));
        for s in JobStatus::ALL {
            assert!(!filter.matches(&job(me, "Dev", s, JobType::FullTime)));
        }
    }
}
