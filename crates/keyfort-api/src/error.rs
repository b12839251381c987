//! Maps the domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use keyfort_core::error::{AppError, ErrorKind};

/// HTTP-facing wrapper around [`AppError`].
///
/// Handlers return `Result<_, ApiError>` so `?` works on any `AppResult`.
/// The wire body is `{"error": "<message>"}`; internal kinds are replaced
/// by a generic message and logged server-side, everything else passes its
/// fixed public message through.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status = match err.kind {
            ErrorKind::MissingField => StatusCode::BAD_REQUEST,
            ErrorKind::InvalidCredentials
            | ErrorKind::InvalidRefreshToken
            | ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::AccountInactive | ErrorKind::PermissionDenied => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Database | ErrorKind::Configuration | ErrorKind::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(kind = %err.kind, error = %err, "Internal server error");
            "Internal server error".to_string()
        } else {
            err.message
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_kinds_map_to_their_statuses() {
        let cases = [
            (AppError::invalid_credentials(), StatusCode::UNAUTHORIZED),
            (AppError::invalid_refresh_token(), StatusCode::UNAUTHORIZED),
            (AppError::unauthorized("Unauthorized"), StatusCode::UNAUTHORIZED),
            (AppError::account_inactive(), StatusCode::FORBIDDEN),
            (AppError::permission_denied("Permission denied"), StatusCode::FORBIDDEN),
            (AppError::missing_field("Missing credentials"), StatusCode::BAD_REQUEST),
        ];
        for (err, expected) in cases {
            let response = ApiError(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn internal_kinds_hide_their_message() {
        let response = ApiError(AppError::database("connection refused")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
