use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    middleware,
    routing::{get, patch, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{
            is_valid_email, AuthResponse, LoginRequest, PublicUser, RefreshRequest,
            RegisterRequest, UpdateUserRequest,
        },
        jwt::{AuthUser, JwtKeys},
        password::{hash_password, is_acceptable, verify_password, MIN_PASSWORD_LEN},
        repo_types::User,
    },
    error::AppError,
    rate_limiter::{limit_by_ip, RateLimiter},
    state::AppState,
};

/// Register and login are throttled per client IP; the other routes are not.
pub fn auth_routes(limiter: RateLimiter) -> Router<AppState> {
    let throttled = Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route_layer(middleware::from_fn_with_state(limiter, limit_by_ip));

    Router::new()
        .merge(throttled)
        .route("/auth/refresh", post(refresh))
        .route("/auth/updateUser", patch(update_user))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

fn respond(state: &AppState, user: User) -> Result<Json<AuthResponse>, AppError> {
    let tokens = JwtKeys::from_ref(state).issue_pair(user.id)?;
    Ok(Json(AuthResponse {
        tokens,
        user: user.into(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let profile = payload.profile().inspect_err(|e| {
        warn!(error = %e, "invalid registration");
    })?;

    if !is_acceptable(&payload.password) {
        warn!("password too short");
        return Err(AppError::bad_request(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    if User::find_by_email(&state.db, &profile.email).await?.is_some() {
        warn!(email = %profile.email, "email already registered");
        return Err(AppError::conflict("Email already registered"));
    }

    let hash = hash_password(&payload.password)?;
    let user = User::create(&state.db, &profile, &hash)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, "Email already registered"))?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    let body = respond(&state, user)?;
    Ok((StatusCode::CREATED, body))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let email = payload.email.trim().to_lowercase();
    if email.is_empty() || payload.password.is_empty() {
        return Err(AppError::bad_request("Please provide email and password"));
    }
    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(AppError::bad_request("Please provide a valid email"));
    }

    let Some(user) = User::find_by_email(&state.db, &email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(AppError::unauthorized("Invalid credentials"));
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(email = %email, user_id = %user.id, "login invalid password");
        return Err(AppError::unauthorized("Invalid credentials"));
    }

    info!(user_id = %user.id, "user logged in");
    respond(&state, user)
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let claims = JwtKeys::from_ref(&state)
        .verify_refresh(&payload.refresh_token)
        .map_err(|e| {
            warn!(error = %e, "refresh rejected");
            AppError::unauthorized("Authentication invalid")
        })?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| AppError::unauthorized("User not found"))?;
    respond(&state, user)
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, AppError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| {
            warn!(%user_id, "user not found");
            AppError::unauthorized("User not found")
        })?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    state.ensure_writable(user_id)?;
    let profile = payload.profile().inspect_err(|e| {
        warn!(error = %e, "invalid profile update");
    })?;

    if let Some(other) = User::find_by_email(&state.db, &profile.email).await? {
        if other.id != user_id {
            warn!(%user_id, "email taken by another user");
            return Err(AppError::conflict("Email already registered"));
        }
    }

    let user = User::update_profile(&state.db, user_id, &profile)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, "Email already registered"))?
        .ok_or_else(|| AppError::unauthorized("User not found"))?;
    info!(%user_id, "profile updated");
    respond(&state, user)
}
