//! Authentication request handlers.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::{Extension, Json};
use petconnect_core::models::auth::PublicPrincipal;

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::{AuthenticatedUser, bearer_token};
use crate::models::{AuthResponse, LoginRequest, RegisterRequest, ValidateTokenResponse};
use crate::services::auth;

/// `POST /api/auth/login`: exchange credentials for a bearer token.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let resp = auth::login(&state, &body.username_or_email, &body.password).await?;
    Ok(Json(resp))
}

/// `POST /api/auth/register`: create a principal and return its first token.
pub async fn register_handler(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> AppResult<Json<AuthResponse>> {
    let resp = auth::register(&state, &body).await?;
    Ok(Json(resp))
}

/// `GET /api/auth/validate`: report on the presented token. Always 200.
pub async fn validate_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<ValidateTokenResponse>> {
    let resp = auth::validate(&state, bearer_token(&headers)).await?;
    Ok(Json(resp))
}

/// `GET /api/auth/me`: the caller's public profile.
pub async fn me_handler(
    Extension(AuthenticatedUser(principal)): Extension<AuthenticatedUser>,
) -> Json<PublicPrincipal> {
    Json(principal)
}
