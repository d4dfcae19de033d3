use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::dto::{
    CreateJobRequest, JobResponse, QueryParams, QueryResult, StatsResult, UpdateJobRequest,
};
use super::{query, stats};
use crate::{auth::jwt::AuthUser, error::AppError, state::AppState};

pub fn job_routes() -> Router<AppState> {
    Router::new()
        .route("/jobs", get(list_jobs).post(create_job))
        .route("/jobs/stats", get(show_stats))
        .route(
            "/jobs/:id",
            get(get_job).patch(update_job).delete(delete_job),
        )
}

fn not_found(id: Uuid) -> AppError {
    AppError::not_found(format!("No job with id {id}"))
}

#[instrument(skip(state))]
pub async fn list_jobs(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<QueryResult>, AppError> {
    let params = QueryParams::from_pairs(pairs);
    let result = query::list_jobs(state.jobs.as_ref(), user_id, &params).await?;
    Ok(Json(result))
}

#[instrument(skip(state))]
pub async fn show_stats(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<StatsResult>, AppError> {
    let result = stats::compute_stats(state.jobs.as_ref(), user_id).await?;
    Ok(Json(result))
}

#[instrument(skip(state))]
pub async fn get_job(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<JobResponse>, AppError> {
    let job = state
        .jobs
        .get(user_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(JobResponse { job }))
}

#[instrument(skip(state, payload))]
pub async fn create_job(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<JobResponse>), AppError> {
    state.ensure_writable(user_id)?;
    let new_job = payload.validate().inspect_err(|e| {
        warn!(error = %e, "invalid job");
    })?;
    let job = state.jobs.insert(user_id, new_job).await?;
    info!(%user_id, job_id = %job.id, "job created");
    Ok((StatusCode::CREATED, Json(JobResponse { job })))
}

#[instrument(skip(state, payload))]
pub async fn update_job(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateJobRequest>,
) -> Result<Json<JobResponse>, AppError> {
    state.ensure_writable(user_id)?;
    let patch = payload.validate().inspect_err(|e| {
        warn!(error = %e, %id, "invalid job update");
    })?;
    let job = state
        .jobs
        .update(user_id, id, &patch)
        .await?
        .ok_or_else(|| not_found(id))?;
    info!(%user_id, job_id = %job.id, "job updated");
    Ok(Json(JobResponse { job }))
}

#[instrument(skip(state))]
pub async fn delete_job(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.ensure_writable(user_id)?;
    if !state.jobs.delete(user_id, id).await? {
        return Err(not_found(id));
    }
    info!(%user_id, job_id = %id, "job deleted");
    Ok(StatusCode::OK)
}
