//! PostgreSQL-backed store implementations delegating to the repositories.

use async_trait::async_trait;
use uuid::Uuid;

use keyfort_core::result::AppResult;
use keyfort_database::repositories::{RefreshTokenRepository, RoleRepository, UserRepository};
use keyfort_entity::role::RoleGrant;
use keyfort_entity::token::{NewRefreshToken, RefreshToken};
use keyfort_entity::user::User;

use super::{GrantStore, RefreshTokenStore, UserStore};

/// [`UserStore`] backed by the users table.
#[derive(Debug, Clone)]
pub struct PostgresUserStore {
    repo: UserRepository,
}

impl PostgresUserStore {
    /// Wrap a user repository.
    pub fn new(repo: UserRepository) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.repo.find_by_email(email).await
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        self.repo.list().await
    }
}

/// [`RefreshTokenStore`] backed by the refresh_tokens table.
#[derive(Debug, Clone)]
pub struct PostgresRefreshTokenStore {
    repo: RefreshTokenRepository,
}

impl PostgresRefreshTokenStore {
    /// Wrap a refresh-token repository.
    pub fn new(repo: RefreshTokenRepository) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl RefreshTokenStore for PostgresRefreshTokenStore {
    async fn persist(&self, token: &NewRefreshToken) -> AppResult<RefreshToken> {
        self.repo.insert(token).await
    }

    async fn find_active(&self, token_hash: &str) -> AppResult<Option<RefreshToken>> {
        self.repo.find_active(token_hash).await
    }

    async fn revoke(&self, token_hash: &str) -> AppResult<()> {
        self.repo.revoke(token_hash).await
    }

    async fn revoke_all(&self, user_id: Uuid) -> AppResult<u64> {
        self.repo.revoke_all_for_user(user_id).await
    }
}

/// [`GrantStore`] backed by the role join tables.
#[derive(Debug, Clone)]
pub struct PostgresGrantStore {
    repo: RoleRepository,
}

impl PostgresGrantStore {
    /// Wrap a role repository.
    pub fn new(repo: RoleRepository) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl GrantStore for PostgresGrantStore {
    async fn grants_for_user(&self, user_id: Uuid) -> AppResult<Vec<RoleGrant>> {
        self.repo.grants_for_user(user_id).await
    }
}
