//! Authentication and token configuration.

use serde::{Deserialize, Serialize};

/// Authentication, token-signing, and request-gate configuration.
///
/// Access and refresh tokens are signed in two independent HMAC domains.
/// The two secrets must differ; sharing one would let a refresh token pass
/// for an access token wherever the type tag is not checked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for the access-token signing domain (HMAC-SHA256).
    #[serde(default = "default_access_secret")]
    pub access_secret: String,
    /// Secret key for the refresh-token signing domain (HMAC-SHA256).
    #[serde(default = "default_refresh_secret")]
    pub refresh_secret: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_minutes: i64,
    /// Refresh token TTL in days.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_days: i64,
    /// Path prefixes guarded by the bearer-token request gate.
    #[serde(default = "default_protected_prefixes")]
    pub protected_prefixes: Vec<String>,
}

fn default_access_secret() -> String {
    "CHANGE_ME_ACCESS_SECRET".to_string()
}

fn default_refresh_secret() -> String {
    "CHANGE_ME_REFRESH_SECRET".to_string()
}

fn default_access_ttl() -> i64 {
    15
}

fn default_refresh_ttl() -> i64 {
    7
}

fn default_protected_prefixes() -> Vec<String> {
    vec!["/api/admin".to_string()]
}
