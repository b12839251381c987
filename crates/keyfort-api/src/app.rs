//! Application wiring — builds the state from configuration and runs the
//! HTTP server.

use std::sync::Arc;

use tracing::info;

use keyfort_auth::jwt::TokenCodec;
use keyfort_auth::password::PasswordHasher;
use keyfort_auth::rbac::PermissionResolver;
use keyfort_auth::service::AuthService;
use keyfort_auth::store::{PostgresGrantStore, PostgresRefreshTokenStore, PostgresUserStore};
use keyfort_core::config::AppConfig;
use keyfort_core::error::AppError;
use keyfort_database::connection::DatabasePool;
use keyfort_database::migration::run_migrations;
use keyfort_database::repositories::{RefreshTokenRepository, RoleRepository, UserRepository};

use crate::router::build_router;
use crate::state::AppState;

/// Runs the Keyfort server with the given configuration.
///
/// Connects to PostgreSQL, runs migrations, wires the Postgres-backed
/// stores into the auth service, and serves the router until Ctrl+C or
/// SIGTERM.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    info!("Starting Keyfort server...");

    let db = DatabasePool::connect(&config.database).await?;
    run_migrations(db.pool()).await?;

    let state = build_state(config, db.pool().clone());

    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!("Keyfort server listening on {addr}");

    let app = build_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    info!("Keyfort server shut down gracefully");
    Ok(())
}

/// Wires the Postgres repositories, codec, and auth service into an
/// [`AppState`].
pub fn build_state(config: AppConfig, pool: sqlx::PgPool) -> AppState {
    let users = Arc::new(PostgresUserStore::new(UserRepository::new(pool.clone())));
    let tokens = Arc::new(PostgresRefreshTokenStore::new(RefreshTokenRepository::new(
        pool.clone(),
    )));
    let grants = Arc::new(PostgresGrantStore::new(RoleRepository::new(pool)));

    let codec = Arc::new(TokenCodec::new(&config.auth));
    let auth_service = Arc::new(AuthService::new(
        users.clone(),
        tokens,
        PermissionResolver::new(grants),
        PasswordHasher::new(),
        codec.clone(),
    ));

    AppState {
        config: Arc::new(config),
        codec,
        auth_service,
        users,
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
