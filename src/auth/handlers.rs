use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{
            AuthResponse, EmptyResponse, LoginRequest, LogoutRequest, LogoutResponse,
            PasswordResetRequest, PublicUser, RegisterRequest, ResetRequest,
        },
        errors::AuthError,
        extractors::AuthUser,
    },
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/passwordreset/request", post(request_reset))
        .route("/auth/passwordreset/reset", post(reset_password))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AuthError> {
    let Json(payload) = payload?;
    let res = state
        .auth
        .register(
            &payload.email,
            &payload.password,
            &payload.name_first,
            &payload.name_last,
        )
        .await?;
    Ok(Json(res))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AuthError> {
    let Json(payload) = payload?;
    let res = state.auth.login(&payload.email, &payload.password).await?;
    Ok(Json(res))
}

#[instrument(skip(state, payload))]
pub async fn logout(
    State(state): State<AppState>,
    payload: Result<Json<LogoutRequest>, JsonRejection>,
) -> Result<Json<LogoutResponse>, AuthError> {
    let Json(payload) = payload?;
    let res = state.auth.logout(&payload.token).await?;
    Ok(Json(res))
}

#[instrument(skip(state, payload))]
pub async fn request_reset(
    State(state): State<AppState>,
    payload: Result<Json<ResetRequest>, JsonRejection>,
) -> Result<Json<EmptyResponse>, AuthError> {
    let Json(payload) = payload?;
    state.auth.request_reset(&payload.email).await?;
    Ok(Json(EmptyResponse::default()))
}

#[instrument(skip(state, payload))]
pub async fn reset_password(
    State(state): State<AppState>,
    payload: Result<Json<PasswordResetRequest>, JsonRejection>,
) -> Result<Json<EmptyResponse>, AuthError> {
    let Json(payload) = payload?;
    state
        .auth
        .reset_password(&payload.reset_code, &payload.new_password)
        .await?;
    Ok(Json(EmptyResponse::default()))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, AuthError> {
    let user = state.auth.profile(user_id).await?;
    Ok(Json(user))
}
