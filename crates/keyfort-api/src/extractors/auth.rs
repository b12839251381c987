//! `AuthUser` extractor — pulls the bearer token from the Authorization
//! header and verifies it in the access domain.

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;

use keyfort_auth::jwt::Claims;
use keyfort_core::error::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// Verified access-token claims, extracted per handler.
///
/// When the request gate already verified the token, its claims are reused
/// from the request extensions; otherwise the extractor verifies the bearer
/// itself. Handlers stay authenticated even on routes the gate does not
/// cover, and rejection is the same 401 the gate produces, so callers
/// cannot tell which layer turned them away.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl std::ops::Deref for AuthUser {
    type Target = Claims;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(claims) = parts.extensions.get::<Claims>() {
            return Ok(AuthUser(claims.clone()));
        }

        let token = bearer_token(parts)
            .ok_or_else(|| AppError::unauthorized("Unauthorized"))?;

        let claims = state
            .codec
            .verify_access(token)
            .ok_or_else(|| AppError::unauthorized("Unauthorized"))?;

        Ok(AuthUser(claims))
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header, or
/// `None` when the header is absent or shaped differently.
pub fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}
