//! Repository implementations for all Keyfort entities.

pub mod refresh_token;
pub mod role;
pub mod user;

pub use refresh_token::RefreshTokenRepository;
pub use role::RoleRepository;
pub use user::UserRepository;
