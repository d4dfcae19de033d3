use serde::{Deserialize, Serialize};

use super::model::{JobPatch, JobRecord, JobStatus, JobType, NewJob};
use crate::error::AppError;

const POSITION_MAX_LEN: usize = 100;
const COMPANY_MAX_LEN: usize = 50;

/// Raw `GET /jobs` query string. Everything stays textual so bad values
/// degrade to defaults instead of rejecting the request.
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    pub status: Option<String>,
    pub job_type: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl QueryParams {
    /// Collects the known keys from decoded query pairs. When a key repeats,
    /// the first value wins; unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "status" => &mut params.status,
                "jobType" => &mut params.job_type,
                "search" => &mut params.search,
                "sort" => &mut params.sort,
                "page" => &mut params.page,
                "limit" => &mut params.limit,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        params
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub jobs: Vec<JobRecord>,
    pub total_jobs: u64,
    pub num_of_pages: u64,
    pub page: u64,
}

/// Count per known status; every key is always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub pending: u64,
    pub interview: u64,
    pub declined: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyPoint {
    pub label: String,
    pub count: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResult {
    pub default_stats: StatsSnapshot,
    pub monthly_applications: Vec<MonthlyPoint>,
}

#[derive(Debug, Serialize)]
pub struct JobResponse {
    pub job: JobRecord,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    pub position: Option<String>,
    pub company: Option<String>,
    pub status: Option<JobStatus>,
    pub job_type: Option<JobType>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobRequest {
    pub position: Option<String>,
    pub company: Option<String>,
    pub status: Option<JobStatus>,
    pub job_type: Option<JobType>,
}

fn required(value: Option<String>, field: &str, max: usize) -> Result<String, AppError> {
    let value = value.map(|v| v.trim().to_string()).unwrap_or_default();
    if value.is_empty() {
        return Err(AppError::bad_request(format!("Please provide {field}")));
    }
    if value.chars().count() > max {
        return Err(AppError::bad_request(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(value)
}

impl CreateJobRequest {
    pub fn validate(self) -> Result<NewJob, AppError> {
        Ok(NewJob {
            position: required(self.position, "position", POSITION_MAX_LEN)?,
            company: required(self.company, "company", COMPANY_MAX_LEN)?,
            status: self.status.unwrap_or_default(),
            job_type: self.job_type.unwrap_or_default(),
        })
    }
}

impl UpdateJobRequest {
    pub fn validate(self) -> Result<JobPatch, AppError> {
        let blank = |v: &Option<String>| v.as_deref().is_some_and(|s| s.trim().is_empty());
        if blank(&self.company) || blank(&self.position) {
            return Err(AppError::bad_request(
                "Company or Position fields cannot be empty",
            ));
        }
        Ok(JobPatch {
            position: self
                .position
                .map(|p| required(Some(p), "position", POSITION_MAX_LEN))
                .transpose()?,
            company: self
                .company
                .map(|c| required(Some(c), "company", COMPANY_MAX_LEN))
                .transpose()?,
            status: self.status,
            job_type: self.job_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_defaults_status_and_type() {
        let req: CreateJobRequest =
            serde_json::from_str(r#"{"position":" Rust Engineer ","company":"Acme"}"#).unwrap();
        let job = req.validate().unwrap();
        assert_eq!(job.position, "Rust Engineer");
        assert_eq!(job.status, JobStatus::Pending);
        assert_eq!(job.job_type, JobType::FullTime);
    }

    #[test]
    fn create_requires_position_and_company() {
        let req: CreateJobRequest = serde_json::from_str(r#"{"company":"Acme"}"#).unwrap();
        assert!(matches!(req.validate(), Err(AppError::BadRequest(_))));
        let req: CreateJobRequest =
            serde_json::from_str(r#"{"position":"Dev","company":"   "}"#).unwrap();
        assert!(matches!(req.validate(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn create_rejects_overlong_company() {
        let req = CreateJobRequest {
            position: Some("Dev".into()),
            company: Some("x".repeat(COMPANY_MAX_LEN + 1)),
            status: None,
            job_type: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn update_rejects_explicitly_empty_fields() {
        let req: UpdateJobRequest = serde_json::from_str(r#"{"company":""}"#).unwrap();
        let err = req.validate().unwrap_err();
        assert_eq!(err.to_string(), "Company or Position fields cannot be empty");
    }

    #[test]
    fn update_passes_through_partial_fields() {
        let req: UpdateJobRequest =
            serde_json::from_str(r#"{"status":"interview","jobType":"part-time"}"#).unwrap();
        let patch = req.validate().unwrap();
        assert_eq!(patch.status, Some(JobStatus::Interview));
        assert_eq!(patch.job_type, Some(JobType::PartTime));
        assert!(patch.position.is_none() && patch.company.is_none());
    }

    #[test]
    fn query_params_keep_first_repeated_value() {
        let pairs = [
            ("page", "1"),
            ("page", "2"),
            ("jobType", "internship"),
            ("status", "pending"),
            ("status", "all"),
            ("utm_source", "mail"),
        ]
        .map(|(k, v)| (k.to_string(), v.to_string()));
        let params = QueryParams::from_pairs(pairs);
        assert_eq!(params.page.as_deref(), Some("1"));
        assert_eq!(params.status.as_deref(), Some("pending"));
        assert_eq!(params.job_type.as_deref(), Some("internship"));
        assert!(params.search.is_none() && params.sort.is_none() && params.limit.is_none());
    }

    #[test]
    fn query_result_uses_camel_case() {
        let res = QueryResult {
            jobs: vec![],
            total_jobs: 0,
            num_of_pages: 0,
            page: 1,
        };
        let json = serde_json::to_value(&res).unwrap();
        assert_eq!(json["totalJobs"], 0);
        assert_eq!(json["numOfPages"], 0);
        assert_eq!(json["page"], 1);
    }
}
