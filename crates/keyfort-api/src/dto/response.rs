//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use keyfort_auth::jwt::Claims;
use keyfort_auth::rbac::ResolvedAccess;
use keyfort_entity::user::User;

/// Login response: the fresh token pair plus a public user summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Access token (15 minute domain).
    pub access_token: String,
    /// Refresh token (7 day domain).
    pub refresh_token: String,
    /// The authenticated user.
    pub user: UserSummary,
}

/// Public user summary returned by login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    /// User ID.
    pub id: Uuid,
    /// Email address.
    pub email: String,
    /// Display name.
    pub name: Option<String>,
    /// Role names resolved at login.
    pub roles: Vec<String>,
    /// Flattened `subject:action` permissions resolved at login.
    pub permissions: Vec<String>,
}

impl UserSummary {
    /// Builds the summary from a user row and its resolved access.
    pub fn from_user(user: &User, access: &ResolvedAccess) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            roles: access.roles.clone(),
            permissions: access.permissions.clone(),
        }
    }
}

/// Refresh response: the rotated token pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    /// New access token.
    pub access_token: String,
    /// New refresh token. The presented one no longer refreshes.
    pub refresh_token: String,
}

/// Logout response. Always `success: true`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutResponse {
    /// Always true; logout has no caller-visible failure.
    pub success: bool,
}

/// Identity response for `/api/auth/me`, read purely from token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    /// The token's identity and authorization snapshot.
    pub user: TokenIdentity,
}

/// Identity carried by a verified access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenIdentity {
    /// User ID.
    pub id: Uuid,
    /// Email at issuance.
    pub email: String,
    /// Role names at issuance.
    pub roles: Vec<String>,
    /// Flattened permissions at issuance.
    pub permissions: Vec<String>,
}

impl From<Claims> for TokenIdentity {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            roles: claims.roles,
            permissions: claims.perms,
        }
    }
}

/// Admin listing response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserListResponse {
    /// All live users, newest first.
    pub users: Vec<AdminUserSummary>,
}

/// One row of the admin user listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserSummary {
    /// User ID.
    pub id: Uuid,
    /// Email address.
    pub email: String,
    /// Display name.
    pub name: Option<String>,
    /// Whether the account may authenticate.
    pub is_active: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl From<&User> for AdminUserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Crate version.
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_fields_are_camel_case() {
        let response = LoginResponse {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
            user: UserSummary {
                id: Uuid::nil(),
                email: "a@example.com".to_string(),
                name: None,
                roles: vec![],
                permissions: vec![],
            },
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("accessToken").is_some());
        assert!(json.get("refreshToken").is_some());

        let row = AdminUserSummary {
            id: Uuid::nil(),
            email: "a@example.com".to_string(),
            name: None,
            is_active: true,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&row).unwrap();
        assert!(json.get("isActive").is_some());
        assert!(json.get("createdAt").is_some());
    }
}
