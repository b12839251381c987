//! Request DTOs.

use serde::{Deserialize, Serialize};

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Email address.
    pub email: Option<String>,
    /// Password.
    pub password: Option<String>,
}

/// Token refresh request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    /// Refresh token to rotate.
    pub refresh_token: Option<String>,
}

/// Logout request body. The whole body is optional on the route.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequest {
    /// Refresh token to revoke.
    pub refresh_token: Option<String>,
}
