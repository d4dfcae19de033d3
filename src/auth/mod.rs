use crate::rate_limiter::RateLimiter;
use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod repo;
pub mod repo_types;

pub fn router(limiter: RateLimiter) -> Router<AppState> {
    Router::new()
        .merge(handlers::auth_routes(limiter))
        .merge(handlers::me_routes())
}
