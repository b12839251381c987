//! Two-domain JWT signing and verification.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use keyfort_core::config::AuthConfig;
use keyfort_core::error::AppError;
use keyfort_entity::token::TokenPair;

use crate::rbac::ResolvedAccess;

use super::claims::{Claims, TokenType};

/// One signing domain: a key pair, validation rules, a TTL, and the type
/// tag tokens of this domain must carry.
#[derive(Clone)]
struct Domain {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
    token_type: TokenType,
}

impl Domain {
    fn new(secret: &str, ttl: Duration, token_type: TokenType) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5; // 5 seconds leeway for clock skew

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
            token_type,
        }
    }

    fn sign(
        &self,
        user_id: Uuid,
        email: &str,
        access: &ResolvedAccess,
        now: DateTime<Utc>,
    ) -> Result<(String, DateTime<Utc>), AppError> {
        let expires_at = now + self.ttl;
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            roles: access.roles.clone(),
            perms: access.permissions.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            // Unique per token: two pairs signed within the same second
            // must never serialize to the same JWT, or rotation would
            // reissue the fingerprint it just revoked.
            jti: Uuid::new_v4(),
            token_type: self.token_type.clone(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode token: {e}")))?;

        Ok((token, expires_at))
    }

    /// Verify signature, expiry, and the type tag. Every failure collapses
    /// to `None`; callers get no hint which check rejected the token.
    fn verify(&self, token: &str) -> Option<Claims> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).ok()?;
        if data.claims.token_type != self.token_type {
            return None;
        }
        Some(data.claims)
    }
}

/// Signs and verifies access and refresh tokens in two independent HMAC
/// domains.
///
/// Domain separation holds by key: a token signed with the refresh secret
/// fails access verification even if its type tag were forged. The tag
/// check on top covers deployments where both secrets were configured to
/// the same value.
#[derive(Clone)]
pub struct TokenCodec {
    access: Domain,
    refresh: Domain,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("access_ttl", &self.access.ttl)
            .field("refresh_ttl", &self.refresh.ttl)
            .finish()
    }
}

impl TokenCodec {
    /// Creates a codec from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            access: Domain::new(
                &config.access_secret,
                Duration::minutes(config.access_ttl_minutes),
                TokenType::Access,
            ),
            refresh: Domain::new(
                &config.refresh_secret,
                Duration::days(config.refresh_ttl_days),
                TokenType::Refresh,
            ),
        }
    }

    /// Signs a fresh access/refresh pair carrying the same identity and
    /// resolved access snapshot, each in its own domain.
    pub fn issue_pair(
        &self,
        user_id: Uuid,
        email: &str,
        access: &ResolvedAccess,
    ) -> Result<TokenPair, AppError> {
        let now = Utc::now();
        let (access_token, access_expires_at) = self.access.sign(user_id, email, access, now)?;
        let (refresh_token, refresh_expires_at) = self.refresh.sign(user_id, email, access, now)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            access_expires_at,
            refresh_expires_at,
        })
    }

    /// Verifies a token in the access domain.
    pub fn verify_access(&self, token: &str) -> Option<Claims> {
        self.access.verify(token)
    }

    /// Verifies a token in the refresh domain.
    pub fn verify_refresh(&self, token: &str) -> Option<Claims> {
        self.refresh.verify(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AuthConfig {
        AuthConfig {
            access_secret: "test-access-secret".to_string(),
            refresh_secret: "test-refresh-secret".to_string(),
            access_ttl_minutes: 15,
            refresh_ttl_days: 7,
            protected_prefixes: vec!["/api/admin".to_string()],
        }
    }

    fn resolved() -> ResolvedAccess {
        ResolvedAccess {
            roles: vec!["admin".to_string()],
            permissions: vec!["user:read".to_string(), "user:update".to_string()],
        }
    }

    #[test]
    fn issued_pair_verifies_in_matching_domains() {
        let codec = TokenCodec::new(&config());
        let user_id = Uuid::new_v4();
        let pair = codec.issue_pair(user_id, "a@example.com", &resolved()).unwrap();

        let access = codec.verify_access(&pair.access_token).unwrap();
        assert_eq!(access.sub, user_id);
        assert_eq!(access.email, "a@example.com");
        assert_eq!(access.roles, vec!["admin"]);
        assert_eq!(access.perms, vec!["user:read", "user:update"]);
        assert_eq!(access.token_type, TokenType::Access);

        let refresh = codec.verify_refresh(&pair.refresh_token).unwrap();
        assert_eq!(refresh.sub, user_id);
        assert_eq!(refresh.token_type, TokenType::Refresh);
        assert!(refresh.exp > access.exp);
    }

    #[test]
    fn pairs_issued_back_to_back_are_distinct() {
        let codec = TokenCodec::new(&config());
        let user_id = Uuid::new_v4();

        // Same user, same claims, almost certainly the same second of
        // issuance: the tokens must still differ, or a refresh arriving
        // within a second of issuance would rotate into itself.
        let first = codec.issue_pair(user_id, "a@example.com", &resolved()).unwrap();
        let second = codec.issue_pair(user_id, "a@example.com", &resolved()).unwrap();

        assert_ne!(first.access_token, second.access_token);
        assert_ne!(first.refresh_token, second.refresh_token);

        let a = codec.verify_refresh(&first.refresh_token).unwrap();
        let b = codec.verify_refresh(&second.refresh_token).unwrap();
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn domains_reject_each_others_tokens() {
        let codec = TokenCodec::new(&config());
        let pair = codec
            .issue_pair(Uuid::new_v4(), "a@example.com", &resolved())
            .unwrap();

        assert!(codec.verify_access(&pair.refresh_token).is_none());
        assert!(codec.verify_refresh(&pair.access_token).is_none());
    }

    #[test]
    fn type_tag_rejects_cross_use_even_with_shared_secret() {
        let mut shared = config();
        shared.refresh_secret = shared.access_secret.clone();
        let codec = TokenCodec::new(&shared);
        let pair = codec
            .issue_pair(Uuid::new_v4(), "a@example.com", &resolved())
            .unwrap();

        // Signature would pass in either domain; only the tag stands.
        assert!(codec.verify_access(&pair.refresh_token).is_none());
        assert!(codec.verify_refresh(&pair.access_token).is_none());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let codec = TokenCodec::new(&config());
        let pair = codec
            .issue_pair(Uuid::new_v4(), "a@example.com", &resolved())
            .unwrap();

        let mut forged = pair.access_token.clone();
        let last = forged.pop().unwrap();
        forged.push(if last == 'A' { 'B' } else { 'A' });

        assert!(codec.verify_access(&forged).is_none());
        assert!(codec.verify_access("not.a.jwt").is_none());
        assert!(codec.verify_access("").is_none());
    }

    #[test]
    fn expired_token_is_rejected() {
        let codec = TokenCodec::new(&config());
        let now = Utc::now();
        let claims = Claims {
            sub: Uuid::new_v4(),
            email: "a@example.com".to_string(),
            roles: vec![],
            perms: vec![],
            iat: (now - Duration::minutes(30)).timestamp(),
            exp: (now - Duration::minutes(15)).timestamp(),
            jti: Uuid::new_v4(),
            token_type: TokenType::Access,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-access-secret"),
        )
        .unwrap();

        assert!(codec.verify_access(&token).is_none());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let codec = TokenCodec::new(&config());
        let mut other = config();
        other.access_secret = "a-different-secret".to_string();
        let other_codec = TokenCodec::new(&other);

        let pair = other_codec
            .issue_pair(Uuid::new_v4(), "a@example.com", &resolved())
            .unwrap();
        assert!(codec.verify_access(&pair.access_token).is_none());
    }
}
