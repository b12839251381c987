//! Refresh-token repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use keyfort_core::error::{AppError, ErrorKind};
use keyfort_core::result::AppResult;
use keyfort_entity::token::{NewRefreshToken, RefreshToken};

/// Repository for persisted refresh tokens.
///
/// Rows are insert-only plus revocation markers. Revocation is a
/// conditional single-row update, so a token raced between use and revoke
/// resolves at the row level without extra locking.
#[derive(Debug, Clone)]
pub struct RefreshTokenRepository {
    pool: PgPool,
}

impl RefreshTokenRepository {
    /// Create a new refresh-token repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist a newly issued refresh token.
    pub async fn insert(&self, data: &NewRefreshToken) -> AppResult<RefreshToken> {
        sqlx::query_as::<_, RefreshToken>(
            "INSERT INTO refresh_tokens (user_id, token_hash, expires_at, ip, user_agent) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(data.user_id)
        .bind(&data.token_hash)
        .bind(data.expires_at)
        .bind(&data.ip)
        .bind(&data.user_agent)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to persist refresh token", e)
        })
    }

    /// Find a token row that is still usable: not revoked, not deleted,
    /// not expired.
    pub async fn find_active(&self, token_hash: &str) -> AppResult<Option<RefreshToken>> {
        sqlx::query_as::<_, RefreshToken>(
            "SELECT * FROM refresh_tokens \
             WHERE token_hash = $1 AND revoked_at IS NULL AND deleted_at IS NULL \
               AND expires_at > NOW()",
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find refresh token", e)
        })
    }

    /// Revoke the token with the given fingerprint.
    ///
    /// A no-op when the fingerprint is unknown or already revoked, so
    /// logout stays idempotent.
    pub async fn revoke(&self, token_hash: &str) -> AppResult<()> {
        sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = NOW(), deleted_at = NOW() \
             WHERE token_hash = $1 AND revoked_at IS NULL",
        )
        .bind(token_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to revoke refresh token", e)
        })?;
        Ok(())
    }

    /// Revoke every live token belonging to a user. Returns how many rows
    /// were revoked.
    pub async fn revoke_all_for_user(&self, user_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = NOW(), deleted_at = NOW() \
             WHERE user_id = $1 AND revoked_at IS NULL",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to revoke user tokens", e)
        })?;
        Ok(result.rows_affected())
    }
}
