//! In-memory store implementations using Tokio mutexes.
//!
//! Suitable for tests and single-node setups only; state lives and dies
//! with the process.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use keyfort_core::result::AppResult;
use keyfort_entity::role::RoleGrant;
use keyfort_entity::token::{NewRefreshToken, RefreshToken};
use keyfort_entity::user::User;

use super::{GrantStore, RefreshTokenStore, UserStore};

/// In-memory [`UserStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<Mutex<Vec<User>>>,
}

impl MemoryUserStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user to the store.
    pub async fn add(&self, user: User) {
        self.users.lock().await.push(user);
    }

    /// Flip the active flag on a stored user.
    pub async fn set_active(&self, user_id: Uuid, active: bool) {
        let mut users = self.users.lock().await;
        if let Some(user) = users.iter_mut().find(|u| u.id == user_id) {
            user.is_active = active;
        }
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users.lock().await;
        Ok(users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email) && u.deleted_at.is_none())
            .cloned())
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let users = self.users.lock().await;
        let mut live: Vec<User> = users.iter().filter(|u| u.deleted_at.is_none()).cloned().collect();
        live.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(live)
    }
}

/// In-memory [`RefreshTokenStore`] keyed by token fingerprint.
#[derive(Debug, Clone, Default)]
pub struct MemoryRefreshTokenStore {
    rows: Arc<Mutex<HashMap<String, RefreshToken>>>,
}

impl MemoryRefreshTokenStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RefreshTokenStore for MemoryRefreshTokenStore {
    async fn persist(&self, token: &NewRefreshToken) -> AppResult<RefreshToken> {
        let row = RefreshToken {
            id: Uuid::new_v4(),
            user_id: token.user_id,
            token_hash: token.token_hash.clone(),
            expires_at: token.expires_at,
            ip: token.ip.clone(),
            user_agent: token.user_agent.clone(),
            revoked_at: None,
            created_at: Utc::now(),
            deleted_at: None,
        };
        self.rows
            .lock()
            .await
            .insert(row.token_hash.clone(), row.clone());
        Ok(row)
    }

    async fn find_active(&self, token_hash: &str) -> AppResult<Option<RefreshToken>> {
        let rows = self.rows.lock().await;
        Ok(rows.get(token_hash).filter(|t| t.is_active()).cloned())
    }

    async fn revoke(&self, token_hash: &str) -> AppResult<()> {
        let mut rows = self.rows.lock().await;
        if let Some(row) = rows.get_mut(token_hash) {
            if row.revoked_at.is_none() {
                let now = Utc::now();
                row.revoked_at = Some(now);
                row.deleted_at = Some(now);
            }
        }
        Ok(())
    }

    async fn revoke_all(&self, user_id: Uuid) -> AppResult<u64> {
        let mut rows = self.rows.lock().await;
        let now = Utc::now();
        let mut revoked = 0u64;
        for row in rows.values_mut() {
            if row.user_id == user_id && row.revoked_at.is_none() {
                row.revoked_at = Some(now);
                row.deleted_at = Some(now);
                revoked += 1;
            }
        }
        Ok(revoked)
    }
}

/// In-memory [`GrantStore`] with per-user grant rows set by hand.
#[derive(Debug, Clone, Default)]
pub struct MemoryGrantStore {
    grants: Arc<Mutex<HashMap<Uuid, Vec<RoleGrant>>>>,
}

impl MemoryGrantStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the grant rows for a user.
    pub async fn set_grants(&self, user_id: Uuid, rows: Vec<RoleGrant>) {
        self.grants.lock().await.insert(user_id, rows);
    }
}

#[async_trait]
impl GrantStore for MemoryGrantStore {
    async fn grants_for_user(&self, user_id: Uuid) -> AppResult<Vec<RoleGrant>> {
        let grants = self.grants.lock().await;
        Ok(grants.get(&user_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn new_token(user_id: Uuid, hash: &str, expires_in: Duration) -> NewRefreshToken {
        NewRefreshToken {
            user_id,
            token_hash: hash.to_string(),
            expires_at: Utc::now() + expires_in,
            ip: None,
            user_agent: None,
        }
    }

    #[tokio::test]
    async fn persist_then_find_active() {
        let store = MemoryRefreshTokenStore::new();
        let user_id = Uuid::new_v4();
        store
            .persist(&new_token(user_id, "fp-1", Duration::days(7)))
            .await
            .unwrap();

        let found = store.find_active("fp-1").await.unwrap().unwrap();
        assert_eq!(found.user_id, user_id);
        assert!(store.find_active("fp-2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn revoke_hides_token_and_stays_idempotent() {
        let store = MemoryRefreshTokenStore::new();
        store
            .persist(&new_token(Uuid::new_v4(), "fp-1", Duration::days(7)))
            .await
            .unwrap();

        store.revoke("fp-1").await.unwrap();
        assert!(store.find_active("fp-1").await.unwrap().is_none());

        // Second revoke and unknown fingerprints are no-ops.
        store.revoke("fp-1").await.unwrap();
        store.revoke("never-seen").await.unwrap();
    }

    #[tokio::test]
    async fn expired_rows_are_not_active() {
        let store = MemoryRefreshTokenStore::new();
        store
            .persist(&new_token(Uuid::new_v4(), "fp-old", Duration::seconds(-1)))
            .await
            .unwrap();
        assert!(store.find_active("fp-old").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn revoke_all_counts_only_live_rows() {
        let store = MemoryRefreshTokenStore::new();
        let user_id = Uuid::new_v4();
        store
            .persist(&new_token(user_id, "fp-1", Duration::days(7)))
            .await
            .unwrap();
        store
            .persist(&new_token(user_id, "fp-2", Duration::days(7)))
            .await
            .unwrap();
        store
            .persist(&new_token(Uuid::new_v4(), "fp-other", Duration::days(7)))
            .await
            .unwrap();
        store.revoke("fp-1").await.unwrap();

        assert_eq!(store.revoke_all(user_id).await.unwrap(), 1);
        assert!(store.find_active("fp-2").await.unwrap().is_none());
        assert!(store.find_active("fp-other").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn user_lookup_is_case_insensitive_and_skips_deleted() {
        let store = MemoryUserStore::new();
        let now = Utc::now();
        store
            .add(User {
                id: Uuid::new_v4(),
                email: "A@Example.com".to_string(),
                password_hash: None,
                name: None,
                is_active: true,
                created_at: now,
                updated_at: now,
                deleted_at: None,
            })
            .await;
        store
            .add(User {
                id: Uuid::new_v4(),
                email: "gone@example.com".to_string(),
                password_hash: None,
                name: None,
                is_active: true,
                created_at: now,
                updated_at: now,
                deleted_at: Some(now),
            })
            .await;

        assert!(store.find_by_email("a@example.com").await.unwrap().is_some());
        assert!(store.find_by_email("gone@example.com").await.unwrap().is_none());
        assert_eq!(store.list().await.unwrap().len(), 1);
    }
}
