//! Flattened grant rows used by permission resolution.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row of the user → role → permission join, carrying the soft-delete
/// marker of every hop.
///
/// The grant query already excludes soft-deleted user-role assignments; the
/// remaining hops are judged here so the liveness rule stays in one place.
/// A permission counts only while the role, the role-permission link, and
/// the permission itself are all live. The permission columns are `NULL`
/// for roles that carry no permissions at all.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RoleGrant {
    /// Name of the role the user is assigned to.
    pub role_name: String,
    /// Soft-delete marker of the role row.
    pub role_deleted_at: Option<DateTime<Utc>>,
    /// Soft-delete marker of the role-permission link row.
    pub link_deleted_at: Option<DateTime<Utc>>,
    /// Permission subject, absent when the role has no permission rows.
    pub subject: Option<String>,
    /// Permission action, absent when the role has no permission rows.
    pub action: Option<String>,
    /// Soft-delete marker of the permission row.
    pub permission_deleted_at: Option<DateTime<Utc>>,
}

impl RoleGrant {
    /// Whether the role hop itself is live.
    pub fn role_is_live(&self) -> bool {
        self.role_deleted_at.is_none()
    }

    /// The flattened `subject:action` key this row contributes, or `None`
    /// when any hop is soft-deleted or the role carries no permission.
    pub fn permission_key(&self) -> Option<String> {
        if !self.role_is_live()
            || self.link_deleted_at.is_some()
            || self.permission_deleted_at.is_some()
        {
            return None;
        }
        match (&self.subject, &self.action) {
            (Some(subject), Some(action)) => Some(format!("{subject}:{action}")),
            _ => None,
        }
    }
}
