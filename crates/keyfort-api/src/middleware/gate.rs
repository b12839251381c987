//! Bearer-token request gate for protected path prefixes.

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::state::AppState;

/// Rejects requests to protected prefixes that lack a verifiable access
/// token, before any handler runs.
///
/// A request whose path starts with one of the configured prefixes must
/// carry `Authorization: Bearer <token>` with a token the access domain
/// verifies. On success the verified claims are inserted into the request
/// extensions for downstream handlers; claims are trusted as-is for the
/// access TTL, there is no re-resolution here. Missing header, malformed
/// header, and failed verification all produce the same 401. Paths outside
/// the prefixes pass through untouched.
pub async fn request_gate(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let path = request.uri().path();
    let protected = state
        .config
        .auth
        .protected_prefixes
        .iter()
        .any(|prefix| path.starts_with(prefix.as_str()));

    if !protected {
        return next.run(request).await;
    }

    let token = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let claims = match token.and_then(|t| state.codec.verify_access(t)) {
        Some(claims) => claims,
        None => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Unauthorized" })),
            )
                .into_response();
        }
    };

    let mut request = request;
    request.extensions_mut().insert(claims);
    next.run(request).await
}
