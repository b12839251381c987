//! Storage seams used by the auth service.
//!
//! Two implementations are provided for each trait:
//! - PostgreSQL-backed, delegating to the `keyfort-database` repositories
//! - In-memory (using `tokio::sync::Mutex`), for tests and self-contained
//!   single-node setups

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use keyfort_core::result::AppResult;
use keyfort_entity::role::RoleGrant;
use keyfort_entity::token::{NewRefreshToken, RefreshToken};
use keyfort_entity::user::User;

pub use memory::{MemoryGrantStore, MemoryRefreshTokenStore, MemoryUserStore};
pub use postgres::{PostgresGrantStore, PostgresRefreshTokenStore, PostgresUserStore};

/// Read access to user accounts.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Find a live user by email, case-insensitively.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// List all live users, newest first.
    async fn list(&self) -> AppResult<Vec<User>>;
}

/// Persistence for issued refresh tokens.
///
/// Stores only fingerprints (see [`fingerprint`]); raw token strings never
/// reach an implementation.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync + 'static {
    /// Persist a newly issued token. Insert-only; rows are never reused.
    async fn persist(&self, token: &NewRefreshToken) -> AppResult<RefreshToken>;

    /// Find a token that is not revoked, not deleted, and not expired.
    async fn find_active(&self, token_hash: &str) -> AppResult<Option<RefreshToken>>;

    /// Revoke the token with the given fingerprint. Idempotent: unknown or
    /// already-revoked fingerprints are a no-op.
    async fn revoke(&self, token_hash: &str) -> AppResult<()>;

    /// Revoke every live token belonging to a user. Returns the number of
    /// tokens revoked.
    async fn revoke_all(&self, user_id: Uuid) -> AppResult<u64>;
}

/// Read access to the flattened role/permission grant rows of a user.
#[async_trait]
pub trait GrantStore: Send + Sync + 'static {
    /// Fetch the grant rows for all live role assignments of a user.
    async fn grants_for_user(&self, user_id: Uuid) -> AppResult<Vec<RoleGrant>>;
}

/// SHA-256 hex fingerprint of a token string, the only form a refresh
/// token is ever stored or looked up in.
pub fn fingerprint(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    hex::encode(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_stable_hex_sha256() {
        // Differs per input, stable per input, 32 bytes hex-encoded.
        let a = fingerprint("token-a");
        let b = fingerprint("token-b");
        assert_ne!(a, b);
        assert_eq!(a, fingerprint("token-a"));
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn fingerprint_matches_known_vector() {
        assert_eq!(
            fingerprint("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
