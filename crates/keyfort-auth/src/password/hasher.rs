//! Argon2id password hashing and verification.

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use keyfort_core::error::AppError;

/// Handles password hashing and verification using Argon2id.
///
/// Hashing is CPU-bound and deliberately slow; nothing here performs I/O.
#[derive(Debug, Clone)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Creates a new password hasher instance.
    pub fn new() -> Self {
        Self
    }

    /// Hashes a plaintext password using Argon2id with a random salt.
    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

        Ok(hash.to_string())
    }

    /// Verifies a plaintext password against a stored hash.
    ///
    /// Returns `false` for an absent hash (accounts without a password can
    /// never authenticate), an unparseable hash, or a mismatch. Verification
    /// has no error path.
    pub fn verify_password(&self, password: &str, hash: Option<&str>) -> bool {
        let Some(hash) = hash else {
            return false;
        };
        let Ok(parsed_hash) = PasswordHash::new(hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_roundtrip() {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash_password("Secret1!").unwrap();
        assert!(hasher.verify_password("Secret1!", Some(&hash)));
        assert!(!hasher.verify_password("secret1!", Some(&hash)));
    }

    #[test]
    fn same_password_hashes_differently() {
        let hasher = PasswordHasher::new();
        let a = hasher.hash_password("Secret1!").unwrap();
        let b = hasher.hash_password("Secret1!").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn absent_or_garbage_hash_never_verifies() {
        let hasher = PasswordHasher::new();
        assert!(!hasher.verify_password("anything", None));
        assert!(!hasher.verify_password("anything", Some("not-a-phc-string")));
        assert!(!hasher.verify_password("anything", Some("")));
    }
}
