//! Join-table entities linking users to roles and roles to permissions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Assignment of a role to a user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRole {
    /// Unique assignment identifier.
    pub id: Uuid,
    /// The user holding the role.
    pub user_id: Uuid,
    /// The role being held.
    pub role_id: Uuid,
    /// When the assignment was created.
    pub created_at: DateTime<Utc>,
    /// Soft-delete marker. A deleted assignment grants nothing.
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Grant of a permission to a role.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RolePermission {
    /// Unique grant identifier.
    pub id: Uuid,
    /// The role receiving the permission.
    pub role_id: Uuid,
    /// The permission granted.
    pub permission_id: Uuid,
    /// When the grant was created.
    pub created_at: DateTime<Utc>,
    /// Soft-delete marker. A deleted grant conveys nothing.
    pub deleted_at: Option<DateTime<Utc>>,
}
