//! Permission resolution from the role grant rows.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use keyfort_core::result::AppResult;

use crate::store::GrantStore;

/// A user's resolved roles and flattened permission set.
///
/// Permissions are deduplicated; two roles granting the same capability
/// yield one key. Order carries no meaning, it is sorted only to keep the
/// output deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedAccess {
    /// Live role names the user holds.
    pub roles: Vec<String>,
    /// Deduplicated `subject:action` keys the roles convey.
    pub permissions: Vec<String>,
}

/// Resolves a user's effective access from storage.
///
/// Resolution is fresh on every call. There is no cache: login and refresh
/// are the only callers, and both want current grants.
#[derive(Clone)]
pub struct PermissionResolver {
    grants: Arc<dyn GrantStore>,
}

impl std::fmt::Debug for PermissionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionResolver").finish()
    }
}

impl PermissionResolver {
    /// Creates a resolver over the given grant store.
    pub fn new(grants: Arc<dyn GrantStore>) -> Self {
        Self { grants }
    }

    /// Resolve the live roles and permissions of a user.
    ///
    /// A role counts only while live; a permission counts only while the
    /// role, the role-permission link, and the permission are all live.
    pub async fn resolve(&self, user_id: Uuid) -> AppResult<ResolvedAccess> {
        let rows = self.grants.grants_for_user(user_id).await?;

        let mut roles = BTreeSet::new();
        let mut permissions = BTreeSet::new();
        for row in &rows {
            if row.role_is_live() {
                roles.insert(row.role_name.clone());
            }
            if let Some(key) = row.permission_key() {
                permissions.insert(key);
            }
        }

        Ok(ResolvedAccess {
            roles: roles.into_iter().collect(),
            permissions: permissions.into_iter().collect(),
        })
    }
}
