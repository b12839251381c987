//! # keyfort-api
//!
//! HTTP API layer for Keyfort built on Axum.
//!
//! Provides the auth endpoints (login, logout, refresh, me), the protected
//! admin surface, the bearer-token request gate, middleware, extractors,
//! DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::run_server;
pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
