//! Role and permission repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use keyfort_core::error::{AppError, ErrorKind};
use keyfort_core::result::AppResult;
use keyfort_entity::role::{Permission, Role, RoleGrant};

/// Repository for roles, permissions, and the links between them.
///
/// The `ensure_*` methods are idempotent upserts used by provisioning:
/// re-running them against an already seeded database changes nothing
/// except reviving links that were previously soft-deleted.
#[derive(Debug, Clone)]
pub struct RoleRepository {
    pool: PgPool,
}

impl RoleRepository {
    /// Create a new role repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a live role by name.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE name = $1 AND deleted_at IS NULL")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find role by name", e)
            })
    }

    /// Create a role if it does not exist, returning it either way.
    pub async fn ensure_role(&self, name: &str, description: Option<&str>) -> AppResult<Role> {
        sqlx::query_as::<_, Role>(
            "INSERT INTO roles (name, description) VALUES ($1, $2) \
             ON CONFLICT (name) DO UPDATE SET updated_at = NOW() \
             RETURNING *",
        )
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to ensure role", e))
    }

    /// Create a permission if it does not exist, returning it either way.
    pub async fn ensure_permission(&self, subject: &str, action: &str) -> AppResult<Permission> {
        sqlx::query_as::<_, Permission>(
            "INSERT INTO permissions (subject, action) VALUES ($1, $2) \
             ON CONFLICT (subject, action) DO UPDATE SET updated_at = NOW() \
             RETURNING *",
        )
        .bind(subject)
        .bind(action)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to ensure permission", e))
    }

    /// Attach a permission to a role, reviving a soft-deleted link.
    pub async fn ensure_role_permission(
        &self,
        role_id: Uuid,
        permission_id: Uuid,
    ) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO role_permissions (role_id, permission_id) VALUES ($1, $2) \
             ON CONFLICT (role_id, permission_id) DO UPDATE SET deleted_at = NULL",
        )
        .bind(role_id)
        .bind(permission_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to ensure role permission", e)
        })?;
        Ok(())
    }

    /// Assign a role to a user, reviving a soft-deleted assignment.
    pub async fn ensure_user_role(&self, user_id: Uuid, role_id: Uuid) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2) \
             ON CONFLICT (user_id, role_id) DO UPDATE SET deleted_at = NULL",
        )
        .bind(user_id)
        .bind(role_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to ensure user role", e))?;
        Ok(())
    }

    /// Soft-delete a role-permission link.
    pub async fn remove_role_permission(
        &self,
        role_id: Uuid,
        permission_id: Uuid,
    ) -> AppResult<()> {
        sqlx::query(
            "UPDATE role_permissions SET deleted_at = NOW() \
             WHERE role_id = $1 AND permission_id = $2 AND deleted_at IS NULL",
        )
        .bind(role_id)
        .bind(permission_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to remove role permission", e)
        })?;
        Ok(())
    }

    /// Fetch the flattened grant rows for a user.
    ///
    /// The live-assignment filter lives in the query; the liveness of the
    /// remaining hops travels with each row so [`RoleGrant`] can judge it.
    pub async fn grants_for_user(&self, user_id: Uuid) -> AppResult<Vec<RoleGrant>> {
        sqlx::query_as::<_, RoleGrant>(
            "SELECT r.name AS role_name, \
                    r.deleted_at AS role_deleted_at, \
                    rp.deleted_at AS link_deleted_at, \
                    p.subject AS subject, \
                    p.action AS action, \
                    p.deleted_at AS permission_deleted_at \
             FROM user_roles ur \
             JOIN roles r ON r.id = ur.role_id \
             LEFT JOIN role_permissions rp ON rp.role_id = r.id \
             LEFT JOIN permissions p ON p.id = rp.permission_id \
             WHERE ur.user_id = $1 AND ur.deleted_at IS NULL \
             ORDER BY r.name, p.subject, p.action",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to fetch user grants", e))
    }
}
