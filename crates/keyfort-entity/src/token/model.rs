//! Refresh-token entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A persisted refresh token.
///
/// Only the SHA-256 fingerprint of the token string is stored; the raw
/// token exists solely in the client's hands. Rows are never reused: each
/// login and each rotation inserts a fresh row, and revocation only sets
/// the markers.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RefreshToken {
    /// Unique row identifier.
    pub id: Uuid,
    /// The user this token belongs to.
    pub user_id: Uuid,
    /// SHA-256 hex fingerprint of the token string.
    pub token_hash: String,
    /// When the token stops being accepted regardless of revocation.
    pub expires_at: DateTime<Utc>,
    /// Client IP recorded at issuance.
    pub ip: Option<String>,
    /// User-Agent header recorded at issuance.
    pub user_agent: Option<String>,
    /// When the token was revoked, if it was.
    pub revoked_at: Option<DateTime<Utc>>,
    /// When the row was created (issuance time).
    pub created_at: DateTime<Utc>,
    /// Soft-delete marker, set together with revocation.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl RefreshToken {
    /// Check whether the token is still usable: not revoked, not deleted,
    /// not past its expiry.
    pub fn is_active(&self) -> bool {
        self.revoked_at.is_none() && self.deleted_at.is_none() && self.expires_at > Utc::now()
    }

    /// Check whether the token has passed its expiry instant.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

/// Data required to persist a newly issued refresh token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRefreshToken {
    /// The user the token was issued to.
    pub user_id: Uuid,
    /// SHA-256 hex fingerprint of the token string.
    pub token_hash: String,
    /// Token expiry instant.
    pub expires_at: DateTime<Utc>,
    /// Client IP at issuance.
    pub ip: Option<String>,
    /// User-Agent header at issuance.
    pub user_agent: Option<String>,
}

/// Request metadata recorded alongside issued refresh tokens.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientMeta {
    /// Client IP, typically the forwarded-for chain head.
    pub ip: Option<String>,
    /// User-Agent header value.
    pub user_agent: Option<String>,
}
