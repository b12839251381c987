//! User account management commands.

use clap::{Args, Subcommand};

use keyfort_core::error::AppError;
use keyfort_database::repositories::UserRepository;

use crate::output;

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// List all users
    List,
    /// Allow an account to authenticate again
    Activate {
        /// Email address
        email: String,
    },
    /// Block an account from authenticating
    Deactivate {
        /// Email address
        email: String,
    },
}

/// Execute user commands
pub async fn execute(args: &UserArgs, env: &str) -> Result<(), AppError> {
    let config = super::load_config(env)?;
    let pool = super::create_db_pool(&config).await?;
    let users = UserRepository::new(pool);

    match &args.command {
        UserCommand::List => {
            let rows = users.list().await?;
            if rows.is_empty() {
                println!("No users found.");
                return Ok(());
            }
            for user in &rows {
                println!(
                    "{}  {:<32} {:<8} {}",
                    user.id,
                    user.email,
                    if user.is_active { "active" } else { "inactive" },
                    user.created_at.format("%Y-%m-%d %H:%M"),
                );
            }
        }
        UserCommand::Activate { email } => {
            let user = find(&users, email).await?;
            users.set_active(user.id, true).await?;
            output::print_success(&format!("User '{email}' activated"));
        }
        UserCommand::Deactivate { email } => {
            let user = find(&users, email).await?;
            users.set_active(user.id, false).await?;
            output::print_success(&format!("User '{email}' deactivated"));
        }
    }

    Ok(())
}

async fn find(users: &UserRepository, email: &str) -> Result<keyfort_entity::user::User, AppError> {
    users
        .find_by_email(email)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User '{email}' not found")))
}
