//! Session lifecycle service — login, refresh, logout, current-user flows.

use std::sync::Arc;

use tracing::{info, warn};

use keyfort_core::error::AppError;
use keyfort_core::result::AppResult;
use keyfort_entity::token::{ClientMeta, NewRefreshToken, TokenPair};
use keyfort_entity::user::User;

use crate::jwt::{Claims, TokenCodec};
use crate::password::PasswordHasher;
use crate::rbac::{PermissionResolver, ResolvedAccess};
use crate::store::{RefreshTokenStore, UserStore, fingerprint};

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// Freshly signed token pair.
    pub tokens: TokenPair,
    /// The authenticated user.
    pub user: User,
    /// Roles and permissions resolved at login time.
    pub access: ResolvedAccess,
}

/// Drives the authentication lifecycle over injected storage seams.
///
/// Signing secrets live in the injected codec; the service holds no global
/// state and any number of instances behave identically against the same
/// storage.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: Arc<dyn RefreshTokenStore>,
    resolver: PermissionResolver,
    hasher: PasswordHasher,
    codec: Arc<TokenCodec>,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService").finish()
    }
}

impl AuthService {
    /// Creates a new auth service with all required dependencies.
    pub fn new(
        users: Arc<dyn UserStore>,
        tokens: Arc<dyn RefreshTokenStore>,
        resolver: PermissionResolver,
        hasher: PasswordHasher,
        codec: Arc<TokenCodec>,
    ) -> Self {
        Self {
            users,
            tokens,
            resolver,
            hasher,
            codec,
        }
    }

    /// Performs the complete login flow:
    ///
    /// 1. Find the user by email
    /// 2. Verify the password
    /// 3. Check the account is active
    /// 4. Resolve roles and permissions fresh from storage
    /// 5. Sign the token pair and persist the refresh fingerprint
    ///
    /// Unknown email, absent password hash, and wrong password all return
    /// the same invalid-credentials error; the active check runs only
    /// after the password has verified, so a probe cannot learn whether a
    /// deactivated account exists.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        meta: &ClientMeta,
    ) -> AppResult<LoginOutcome> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(AppError::invalid_credentials)?;

        if !self
            .hasher
            .verify_password(password, user.password_hash.as_deref())
        {
            return Err(AppError::invalid_credentials());
        }

        if !user.is_active {
            return Err(AppError::account_inactive());
        }

        let access = self.resolver.resolve(user.id).await?;
        let tokens = self.codec.issue_pair(user.id, &user.email, &access)?;

        self.tokens
            .persist(&NewRefreshToken {
                user_id: user.id,
                token_hash: fingerprint(&tokens.refresh_token),
                expires_at: tokens.refresh_expires_at,
                ip: meta.ip.clone(),
                user_agent: meta.user_agent.clone(),
            })
            .await?;

        info!(user_id = %user.id, "Login successful");

        Ok(LoginOutcome {
            tokens,
            user,
            access,
        })
    }

    /// Exchanges a live refresh token for a fresh pair.
    ///
    /// The token must verify in the refresh domain AND have an active
    /// store record; either failing yields the same invalid-refresh-token
    /// error. Roles and permissions are re-resolved from storage, never
    /// taken from the stale claims. The superseded token is revoked in the
    /// same flow, so it stops refreshing immediately even though its
    /// signature stays valid until expiry.
    pub async fn refresh(&self, refresh_token: &str, meta: &ClientMeta) -> AppResult<TokenPair> {
        let claims = self
            .codec
            .verify_refresh(refresh_token)
            .ok_or_else(AppError::invalid_refresh_token)?;

        let presented = fingerprint(refresh_token);
        if self.tokens.find_active(&presented).await?.is_none() {
            return Err(AppError::invalid_refresh_token());
        }

        let access = self.resolver.resolve(claims.sub).await?;
        let tokens = self.codec.issue_pair(claims.sub, &claims.email, &access)?;

        self.tokens.revoke(&presented).await?;
        self.tokens
            .persist(&NewRefreshToken {
                user_id: claims.sub,
                token_hash: fingerprint(&tokens.refresh_token),
                expires_at: tokens.refresh_expires_at,
                ip: meta.ip.clone(),
                user_agent: meta.user_agent.clone(),
            })
            .await?;

        info!(user_id = %claims.sub, "Token refreshed");

        Ok(tokens)
    }

    /// Revokes the presented refresh token, if any.
    ///
    /// Infallible from the caller's perspective: revocation failures are
    /// logged and swallowed, and absent or unknown tokens are a no-op. The
    /// token needs no valid signature to be revoked; the fingerprint is
    /// enough.
    pub async fn logout(&self, refresh_token: Option<&str>) {
        let Some(token) = refresh_token else {
            return;
        };

        if let Err(e) = self.tokens.revoke(&fingerprint(token)).await {
            warn!(error = %e, "Failed to revoke refresh token during logout");
        }
    }

    /// Returns the verified claims of an access token.
    ///
    /// Claims only; no storage read. Grant changes since issuance are
    /// invisible here and surface at the next refresh.
    pub fn current_user(&self, access_token: &str) -> AppResult<Claims> {
        self.codec
            .verify_access(access_token)
            .ok_or_else(|| AppError::unauthorized("Invalid or expired access token"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::TokenType;
    use crate::store::{MemoryGrantStore, MemoryRefreshTokenStore, MemoryUserStore};
    use chrono::Utc;
    use keyfort_core::config::AuthConfig;
    use keyfort_core::error::ErrorKind;
    use keyfort_entity::role::RoleGrant;
    use uuid::Uuid;

    struct Harness {
        service: AuthService,
        users: Arc<MemoryUserStore>,
        tokens: Arc<MemoryRefreshTokenStore>,
        grants: Arc<MemoryGrantStore>,
        codec: Arc<TokenCodec>,
        user_id: Uuid,
    }

    fn grant_row(role: &str, subject: &str, action: &str) -> RoleGrant {
        RoleGrant {
            role_name: role.to_string(),
            role_deleted_at: None,
            link_deleted_at: None,
            subject: Some(subject.to_string()),
            action: Some(action.to_string()),
            permission_deleted_at: None,
        }
    }

    /// One active user a@example.com / Secret1! holding `user` with
    /// `user:read`.
    async fn harness() -> Harness {
        let config = AuthConfig {
            access_secret: "test-access".to_string(),
            refresh_secret: "test-refresh".to_string(),
            access_ttl_minutes: 15,
            refresh_ttl_days: 7,
            protected_prefixes: vec!["/api/admin".to_string()],
        };

        let users = Arc::new(MemoryUserStore::new());
        let tokens = Arc::new(MemoryRefreshTokenStore::new());
        let grants = Arc::new(MemoryGrantStore::new());
        let codec = Arc::new(TokenCodec::new(&config));
        let hasher = PasswordHasher::new();

        let user_id = Uuid::new_v4();
        let now = Utc::now();
        users
            .add(User {
                id: user_id,
                email: "a@example.com".to_string(),
                password_hash: Some(hasher.hash_password("Secret1!").unwrap()),
                name: Some("Alice".to_string()),
                is_active: true,
                created_at: now,
                updated_at: now,
                deleted_at: None,
            })
            .await;
        grants
            .set_grants(user_id, vec![grant_row("user", "user", "read")])
            .await;

        let service = AuthService::new(
            users.clone(),
            tokens.clone(),
            PermissionResolver::new(grants.clone()),
            hasher,
            codec.clone(),
        );

        Harness {
            service,
            users,
            tokens,
            grants,
            codec,
            user_id,
        }
    }

    fn meta() -> ClientMeta {
        ClientMeta {
            ip: Some("203.0.113.9".to_string()),
            user_agent: Some("keyfort-tests".to_string()),
        }
    }

    #[tokio::test]
    async fn login_issues_tokens_carrying_resolved_access() {
        let h = harness().await;
        let outcome = h
            .service
            .login("a@example.com", "Secret1!", &meta())
            .await
            .unwrap();

        assert_eq!(outcome.user.email, "a@example.com");
        assert_eq!(outcome.access.roles, vec!["user"]);
        assert_eq!(outcome.access.permissions, vec!["user:read"]);

        let claims = h.codec.verify_access(&outcome.tokens.access_token).unwrap();
        assert_eq!(claims.sub, h.user_id);
        assert_eq!(claims.perms, vec!["user:read"]);
        assert_eq!(claims.token_type, TokenType::Access);

        // Exactly the refresh fingerprint was persisted, with client meta.
        let stored = h
            .tokens
            .find_active(&fingerprint(&outcome.tokens.refresh_token))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.user_id, h.user_id);
        assert_eq!(stored.ip.as_deref(), Some("203.0.113.9"));
        assert_eq!(stored.user_agent.as_deref(), Some("keyfort-tests"));
    }

    #[tokio::test]
    async fn concurrent_logins_persist_distinct_fingerprints() {
        let h = harness().await;

        // Two logins in the same second must not collide on the stored
        // token hash; each session gets its own revocable record.
        let first = h
            .service
            .login("a@example.com", "Secret1!", &meta())
            .await
            .unwrap();
        let second = h
            .service
            .login("a@example.com", "Secret1!", &meta())
            .await
            .unwrap();

        let fp_first = fingerprint(&first.tokens.refresh_token);
        let fp_second = fingerprint(&second.tokens.refresh_token);
        assert_ne!(fp_first, fp_second);

        // Revoking one session leaves the other live.
        h.service.logout(Some(&first.tokens.refresh_token)).await;
        assert!(h.tokens.find_active(&fp_first).await.unwrap().is_none());
        assert!(h.tokens.find_active(&fp_second).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn unknown_email_and_wrong_password_fail_identically() {
        let h = harness().await;

        let unknown = h
            .service
            .login("nobody@example.com", "Secret1!", &meta())
            .await
            .unwrap_err();
        let wrong = h
            .service
            .login("a@example.com", "wrong", &meta())
            .await
            .unwrap_err();

        assert_eq!(unknown.kind, ErrorKind::InvalidCredentials);
        assert_eq!(wrong.kind, unknown.kind);
        assert_eq!(wrong.message, unknown.message);
    }

    #[tokio::test]
    async fn passwordless_account_cannot_log_in() {
        let h = harness().await;
        let now = Utc::now();
        h.users
            .add(User {
                id: Uuid::new_v4(),
                email: "nopass@example.com".to_string(),
                password_hash: None,
                name: None,
                is_active: true,
                created_at: now,
                updated_at: now,
                deleted_at: None,
            })
            .await;

        let err = h
            .service
            .login("nopass@example.com", "anything", &meta())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidCredentials);
    }

    #[tokio::test]
    async fn inactive_account_rejected_only_after_password_verifies() {
        let h = harness().await;
        h.users.set_active(h.user_id, false).await;

        let right = h
            .service
            .login("a@example.com", "Secret1!", &meta())
            .await
            .unwrap_err();
        assert_eq!(right.kind, ErrorKind::AccountInactive);

        // A wrong password must not reveal that the account is inactive.
        let wrong = h
            .service
            .login("a@example.com", "wrong", &meta())
            .await
            .unwrap_err();
        assert_eq!(wrong.kind, ErrorKind::InvalidCredentials);
    }

    #[tokio::test]
    async fn refresh_rotates_and_kills_the_old_token() {
        let h = harness().await;
        let outcome = h
            .service
            .login("a@example.com", "Secret1!", &meta())
            .await
            .unwrap();
        let old = outcome.tokens.refresh_token.clone();

        let pair = h.service.refresh(&old, &meta()).await.unwrap();
        assert_ne!(pair.refresh_token, old);
        let claims = h.codec.verify_access(&pair.access_token).unwrap();
        assert_eq!(claims.sub, h.user_id);

        // The superseded token still verifies cryptographically but its
        // store record is gone.
        assert!(h.codec.verify_refresh(&old).is_some());
        let err = h.service.refresh(&old, &meta()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidRefreshToken);

        // The replacement keeps working.
        h.service.refresh(&pair.refresh_token, &meta()).await.unwrap();
    }

    #[tokio::test]
    async fn refresh_rejects_tokens_from_the_wrong_domain() {
        let h = harness().await;
        let outcome = h
            .service
            .login("a@example.com", "Secret1!", &meta())
            .await
            .unwrap();

        let err = h
            .service
            .refresh(&outcome.tokens.access_token, &meta())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidRefreshToken);
    }

    #[tokio::test]
    async fn refresh_rejects_unpersisted_tokens() {
        let h = harness().await;
        // Well-signed but never persisted: same secrets, separate issuance.
        let foreign = h
            .codec
            .issue_pair(
                h.user_id,
                "a@example.com",
                &ResolvedAccess {
                    roles: vec![],
                    permissions: vec![],
                },
            )
            .unwrap();

        let err = h
            .service
            .refresh(&foreign.refresh_token, &meta())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidRefreshToken);
    }

    #[tokio::test]
    async fn refresh_re_resolves_permissions_from_storage() {
        let h = harness().await;
        let outcome = h
            .service
            .login("a@example.com", "Secret1!", &meta())
            .await
            .unwrap();

        h.grants
            .set_grants(
                h.user_id,
                vec![
                    grant_row("user", "user", "read"),
                    grant_row("user", "role", "manage"),
                ],
            )
            .await;

        let pair = h
            .service
            .refresh(&outcome.tokens.refresh_token, &meta())
            .await
            .unwrap();
        let claims = h.codec.verify_access(&pair.access_token).unwrap();
        assert_eq!(claims.perms, vec!["role:manage", "user:read"]);
    }

    #[tokio::test]
    async fn logout_revokes_and_never_fails() {
        let h = harness().await;
        let outcome = h
            .service
            .login("a@example.com", "Secret1!", &meta())
            .await
            .unwrap();
        let token = outcome.tokens.refresh_token.clone();

        h.service.logout(Some(&token)).await;
        let err = h.service.refresh(&token, &meta()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidRefreshToken);

        // Repeats, garbage, and absence are all no-ops.
        h.service.logout(Some(&token)).await;
        h.service.logout(Some("not-even-a-jwt")).await;
        h.service.logout(None).await;
    }

    #[tokio::test]
    async fn current_user_reads_claims_without_storage() {
        let h = harness().await;
        let outcome = h
            .service
            .login("a@example.com", "Secret1!", &meta())
            .await
            .unwrap();

        let claims = h.service.current_user(&outcome.tokens.access_token).unwrap();
        assert_eq!(claims.sub, h.user_id);
        assert_eq!(claims.email, "a@example.com");

        let err = h.service.current_user("garbage").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
        let err = h
            .service
            .current_user(&outcome.tokens.refresh_token)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
    }

    #[tokio::test]
    async fn deactivation_blocks_new_logins_not_live_access_tokens() {
        let h = harness().await;
        let outcome = h
            .service
            .login("a@example.com", "Secret1!", &meta())
            .await
            .unwrap();

        h.users.set_active(h.user_id, false).await;

        let err = h
            .service
            .login("a@example.com", "Secret1!", &meta())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::AccountInactive);

        // Already-issued access tokens ride out their TTL.
        assert!(h.service.current_user(&outcome.tokens.access_token).is_ok());
    }
}
