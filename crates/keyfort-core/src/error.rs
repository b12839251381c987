//! Unified application error types for Keyfort.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Login failed. Covers unknown email and wrong password alike so the
    /// response never reveals which one it was.
    InvalidCredentials,
    /// The account exists and the password matched, but the account is
    /// deactivated.
    AccountInactive,
    /// The presented refresh token is malformed, expired, revoked, or
    /// unknown. One kind for all of those.
    InvalidRefreshToken,
    /// No usable access token accompanied the request.
    Unauthorized,
    /// The caller is authenticated but lacks the required permission.
    PermissionDenied,
    /// A required request field was absent.
    MissingField,
    /// The requested resource was not found.
    NotFound,
    /// A database error occurred.
    Database,
    /// A configuration error occurred.
    Configuration,
    /// An internal server error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "INVALID_CREDENTIALS"),
            Self::AccountInactive => write!(f, "ACCOUNT_INACTIVE"),
            Self::InvalidRefreshToken => write!(f, "INVALID_REFRESH_TOKEN"),
            Self::Unauthorized => write!(f, "UNAUTHORIZED"),
            Self::PermissionDenied => write!(f, "PERMISSION_DENIED"),
            Self::MissingField => write!(f, "MISSING_FIELD"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Database => write!(f, "DATABASE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout Keyfort.
///
/// All crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls. This provides a single error type for
/// the entire application boundary.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid-credentials error with the fixed public message.
    pub fn invalid_credentials() -> Self {
        Self::new(ErrorKind::InvalidCredentials, "Invalid credentials")
    }

    /// Create an account-inactive error with the fixed public message.
    pub fn account_inactive() -> Self {
        Self::new(ErrorKind::AccountInactive, "Account is inactive")
    }

    /// Create an invalid-refresh-token error with the fixed public message.
    pub fn invalid_refresh_token() -> Self {
        Self::new(ErrorKind::InvalidRefreshToken, "Invalid refresh token")
    }

    /// Create an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    /// Create a permission-denied error.
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PermissionDenied, message)
    }

    /// Create a missing-field error.
    pub fn missing_field(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingField, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
