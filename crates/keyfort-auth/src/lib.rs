//! # keyfort-auth
//!
//! Authentication and authorization core for Keyfort.
//!
//! ## Modules
//!
//! - `jwt` — two-domain JWT signing and verification (access / refresh)
//! - `password` — Argon2id password hashing and verification
//! - `rbac` — role-based permission resolution and check predicates
//! - `store` — storage seams for users, refresh tokens, and grants
//! - `service` — the login / refresh / logout / current-user lifecycle

pub mod jwt;
pub mod password;
pub mod rbac;
pub mod service;
pub mod store;

pub use jwt::{Claims, TokenCodec, TokenType};
pub use password::PasswordHasher;
pub use rbac::{PermissionResolver, ResolvedAccess};
pub use service::{AuthService, LoginOutcome};
pub use store::{GrantStore, RefreshTokenStore, UserStore, fingerprint};
