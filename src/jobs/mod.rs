pub mod dto;
pub mod filter;
pub mod handlers;
#[cfg(test)]
pub mod memory;
pub mod model;
pub mod pagination;
pub mod query;
pub mod repo;
mod repo_types;
pub mod sort;
pub mod stats;
pub mod store;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::job_routes()
}
