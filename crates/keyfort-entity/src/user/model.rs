//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A registered account in the Keyfort system.
///
/// The password hash is nullable: accounts provisioned for federated or
/// not-yet-activated users carry no hash, and such accounts can never
/// authenticate with a password.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Unique email address, the login identifier.
    pub email: String,
    /// Argon2 password hash, absent for accounts without a password.
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    /// Human-readable display name.
    pub name: Option<String>,
    /// Whether the account may authenticate.
    pub is_active: bool,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker. A deleted user is invisible to lookups.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// Check whether the account has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Email address, unique across live users.
    pub email: String,
    /// Pre-hashed password, or `None` for a passwordless account.
    pub password_hash: Option<String>,
    /// Display name (optional).
    pub name: Option<String>,
}
