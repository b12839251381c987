//! Token value types for issued JWT pairs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A freshly signed access/refresh token pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// The raw access-token JWT.
    pub access_token: String,
    /// The raw refresh-token JWT.
    pub refresh_token: String,
    /// When the access token expires.
    pub access_expires_at: DateTime<Utc>,
    /// When the refresh token expires.
    pub refresh_expires_at: DateTime<Utc>,
}
