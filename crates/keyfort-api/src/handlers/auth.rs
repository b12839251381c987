//! Auth handlers — login, logout, refresh, me.

use axum::Json;
use axum::extract::State;

use keyfort_core::error::AppError;

use crate::dto::request::{LoginRequest, LogoutRequest, RefreshRequest};
use crate::dto::response::{
    LoginResponse, LogoutResponse, MeResponse, RefreshResponse, UserSummary,
};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ClientInfo};
use crate::state::AppState;

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ClientInfo(meta): ClientInfo,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let email = req
        .email
        .as_deref()
        .filter(|e| !e.is_empty())
        .ok_or_else(|| AppError::missing_field("Email is required"))?;
    let password = req
        .password
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::missing_field("Password is required"))?;

    let outcome = state.auth_service.login(email, password, &meta).await?;

    Ok(Json(LoginResponse {
        access_token: outcome.tokens.access_token,
        refresh_token: outcome.tokens.refresh_token,
        user: UserSummary::from_user(&outcome.user, &outcome.access),
    }))
}

/// POST /api/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    ClientInfo(meta): ClientInfo,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, ApiError> {
    let token = req
        .refresh_token
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::missing_field("Refresh token is required"))?;

    let pair = state.auth_service.refresh(token, &meta).await?;

    Ok(Json(RefreshResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
    }))
}

/// POST /api/auth/logout
///
/// Always answers `{"success": true}`; the body, the token, and the
/// revocation outcome are all optional as far as the caller can tell.
pub async fn logout(
    State(state): State<AppState>,
    body: Option<Json<LogoutRequest>>,
) -> Json<LogoutResponse> {
    let token = body.as_ref().and_then(|Json(req)| req.refresh_token.as_deref());
    state.auth_service.logout(token).await;

    Json(LogoutResponse { success: true })
}

/// GET /api/auth/me
pub async fn me(auth: AuthUser) -> Json<MeResponse> {
    Json(MeResponse {
        user: auth.0.into(),
    })
}
