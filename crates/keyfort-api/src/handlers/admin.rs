//! Admin handlers behind the request gate.

use axum::Json;
use axum::extract::State;

use keyfort_auth::rbac::has_permission;
use keyfort_core::error::AppError;

use crate::dto::response::{AdminUserSummary, UserListResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/admin/users
///
/// The gate normally verifies the token first and the extractor reuses its
/// claims; if the route ever falls outside the gated prefixes, the
/// extractor verifies the bearer itself. Either way the handler checks the
/// `user:read` permission embedded in the claims.
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<UserListResponse>, ApiError> {
    if !has_permission(&auth.perms, "user", "read") {
        return Err(AppError::permission_denied("Permission denied").into());
    }

    let users = state.users.list().await?;

    Ok(Json(UserListResponse {
        users: users.iter().map(AdminUserSummary::from).collect(),
    }))
}
