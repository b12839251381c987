//! Database migration command.

use clap::Args;

use keyfort_core::error::AppError;

use crate::output;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {}

/// Execute the migrate command
pub async fn execute(_args: &MigrateArgs, env: &str) -> Result<(), AppError> {
    let config = super::load_config(env)?;
    let pool = super::create_db_pool(&config).await?;

    println!("Running database migrations...");
    keyfort_database::migration::run_migrations(&pool).await?;
    output::print_success("All migrations applied successfully.");

    Ok(())
}
