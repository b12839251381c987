//! Role and permission entity models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A named role users can be assigned to.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Role {
    /// Unique role identifier.
    pub id: Uuid,
    /// Unique role name (for example `admin`).
    pub name: String,
    /// Human-readable description.
    pub description: Option<String>,
    /// When the role was created.
    pub created_at: DateTime<Utc>,
    /// When the role was last updated.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker. A deleted role grants nothing.
    pub deleted_at: Option<DateTime<Utc>>,
}

/// A single grantable capability identified by `(subject, action)`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Permission {
    /// Unique permission identifier.
    pub id: Uuid,
    /// The resource class the permission applies to (for example `user`).
    pub subject: String,
    /// The operation on that resource (for example `read`).
    pub action: String,
    /// When the permission was created.
    pub created_at: DateTime<Utc>,
    /// When the permission was last updated.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker. A deleted permission grants nothing.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Permission {
    /// The flattened `subject:action` key used in token claims and checks.
    pub fn key(&self) -> String {
        format!("{}:{}", self.subject, self.action)
    }
}
