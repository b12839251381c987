//! CLI command definitions and dispatch.

pub mod migrate;
pub mod seed;
pub mod user;

use clap::{Parser, Subcommand};

use keyfort_core::config::AppConfig;
use keyfort_core::error::AppError;

/// Keyfort — authentication and authorization service
#[derive(Debug, Parser)]
#[command(name = "keyfort", version, about, long_about = None)]
pub struct Cli {
    /// Configuration environment (reads config/default.toml plus
    /// config/<env>.toml)
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run pending database migrations
    Migrate(migrate::MigrateArgs),
    /// Seed roles, permissions, and initial users
    Seed(seed::SeedArgs),
    /// User account management
    User(user::UserArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, &self.env).await,
            Commands::Seed(args) => seed::execute(args, &self.env).await,
            Commands::User(args) => user::execute(args, &self.env).await,
        }
    }
}

/// Helper: load configuration for the given environment
pub fn load_config(env: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(env)
}

/// Helper: create database pool from config
pub async fn create_db_pool(config: &AppConfig) -> Result<sqlx::PgPool, AppError> {
    let pool = keyfort_database::connection::DatabasePool::connect(&config.database).await?;
    Ok(pool.pool().clone())
}
