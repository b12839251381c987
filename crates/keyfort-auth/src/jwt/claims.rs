//! JWT claims structure used in access and refresh tokens.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims payload embedded in every issued token.
///
/// Roles and flattened permissions are snapshots taken at issuance; they
/// stay valid until the token expires. The `token_type` tag pins each
/// token to its signing domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject — the user ID.
    pub sub: Uuid,
    /// Email of the user at issuance time.
    pub email: String,
    /// Role names held at issuance time.
    pub roles: Vec<String>,
    /// Flattened `subject:action` permission keys held at issuance time.
    pub perms: Vec<String>,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// JWT ID, unique per issued token.
    pub jti: Uuid,
    /// Token type: "access" or "refresh".
    pub token_type: TokenType,
}

/// Distinguishes access tokens from refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    /// Short-lived access token for API requests.
    Access,
    /// Long-lived refresh token for obtaining new pairs.
    Refresh,
}
