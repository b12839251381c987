//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use keyfort_auth::jwt::TokenCodec;
use keyfort_auth::service::AuthService;
use keyfort_auth::store::UserStore;
use keyfort_core::config::AppConfig;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. All fields are
/// `Arc`-wrapped for cheap cloning across tasks; the signing secrets live
/// inside the codec, built once at startup.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Two-domain token codec shared by the gate, extractors, and service.
    pub codec: Arc<TokenCodec>,
    /// The login / refresh / logout / current-user lifecycle service.
    pub auth_service: Arc<AuthService>,
    /// User store backing the admin listing.
    pub users: Arc<dyn UserStore>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish()
    }
}
