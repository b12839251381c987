//! Provisioning command — seeds roles, the permission grid, and the
//! initial accounts.
//!
//! Re-runnable: every step is an idempotent upsert, so seeding an already
//! provisioned database changes nothing.

use clap::Args;
use rand::RngExt;

use keyfort_auth::password::PasswordHasher;
use keyfort_core::error::AppError;
use keyfort_database::repositories::{RoleRepository, UserRepository};
use keyfort_entity::user::CreateUser;

use crate::output;

/// Subjects of the seeded permission grid.
const SUBJECTS: [&str; 4] = ["user", "role", "permission", "auth"];

/// Actions of the seeded permission grid.
const ACTIONS: [&str; 5] = ["read", "create", "update", "delete", "manage"];

/// The one grid entry the `admin` role does not receive.
const ADMIN_EXCLUDED: (&str, &str) = ("permission", "delete");

/// Arguments for the seed command
#[derive(Debug, Args)]
pub struct SeedArgs {}

/// Execute the seed command
pub async fn execute(_args: &SeedArgs, env: &str) -> Result<(), AppError> {
    let config = super::load_config(env)?;
    let pool = super::create_db_pool(&config).await?;
    let roles = RoleRepository::new(pool.clone());
    let users = UserRepository::new(pool);
    let hasher = PasswordHasher::new();

    let super_admin = roles
        .ensure_role("super_admin", Some("Super Administrator (full access)"))
        .await?;
    let admin = roles
        .ensure_role("admin", Some("System Administrator"))
        .await?;
    let user_role = roles.ensure_role("user", Some("Regular user")).await?;

    for subject in SUBJECTS {
        for action in ACTIONS {
            let permission = roles.ensure_permission(subject, action).await?;
            roles
                .ensure_role_permission(super_admin.id, permission.id)
                .await?;
            if (subject, action) != ADMIN_EXCLUDED {
                roles.ensure_role_permission(admin.id, permission.id).await?;
            }
        }
    }

    let admin_email = std::env::var("KEYFORT_ADMIN_EMAIL")
        .map_err(|_| AppError::configuration("KEYFORT_ADMIN_EMAIL is not set"))?;
    let (admin_password, generated) = match std::env::var("KEYFORT_ADMIN_PASSWORD") {
        Ok(password) => (password, false),
        Err(_) => (random_password(14), true),
    };

    let admin_user = match users.find_by_email(&admin_email).await? {
        Some(existing) => existing,
        None => {
            users
                .create(&CreateUser {
                    email: admin_email.clone(),
                    password_hash: Some(hasher.hash_password(&admin_password)?),
                    name: Some("Super Administrator".to_string()),
                })
                .await?
        }
    };
    for role in [&super_admin, &admin, &user_role] {
        roles.ensure_user_role(admin_user.id, role.id).await?;
    }

    if users.find_by_email("user1@example.com").await?.is_none() {
        let sample = users
            .create(&CreateUser {
                email: "user1@example.com".to_string(),
                password_hash: Some(hasher.hash_password("User123!")?),
                name: Some("User One".to_string()),
            })
            .await?;
        roles.ensure_user_role(sample.id, user_role.id).await?;
    }

    output::print_success("Seed completed.");
    if generated {
        output::print_warning("Generated admin password (save it now):");
        output::print_kv(&admin_email, &admin_password);
    }

    Ok(())
}

/// Random password over a set with no look-alike characters.
fn random_password(len: usize) -> String {
    const CHARS: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz23456789!@#$%";
    let mut rng = rand::rng();
    (0..len)
        .map(|_| CHARS[rng.random_range(0..CHARS.len())] as char)
        .collect()
}
