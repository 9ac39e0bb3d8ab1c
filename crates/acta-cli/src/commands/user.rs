//! User management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use acta_auth::password::{PasswordHasher, PasswordValidator, StrengthContext};
use acta_core::config::AppConfig;
use acta_core::error::AppError;
use acta_entity::user::{CreateUser, Role, Workspace};
use acta_store::postgres::PgUserStore;
use acta_store::traits::UserStore;

use crate::output::{self, OutputFormat};

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
    /// Create a user (prompts for the password)
    Create {
        /// Email address
        email: String,
        /// Full name
        #[arg(long)]
        full_name: String,
        /// Role
        #[arg(long)]
        role: Role,
        /// Home workspace
        #[arg(long)]
        workspace: Workspace,
        /// Create the user with login disabled (no password prompt)
        #[arg(long)]
        no_password: bool,
    },
    /// List all users
    List,
    /// Reactivate a user
    Enable {
        /// Email address
        email: String,
    },
    /// Deactivate a user
    Disable {
        /// Email address
        email: String,
    },
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    /// User ID
    id: String,
    /// Email
    email: String,
    /// Full name
    full_name: String,
    /// Role
    role: String,
    /// Workspace
    workspace: String,
    /// Active flag
    active: bool,
    /// Created at
    created_at: String,
}

/// Execute user commands
pub async fn execute(
    args: &UserArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let pool = super::connect(config).await?;
    let store = PgUserStore::new(pool.pool().clone());

    match &args.command {
        UserCommand::Create {
            email,
            full_name,
            role,
            workspace,
            no_password,
        } => {
            let password_hash = if *no_password {
                None
            } else {
                let password = dialoguer::Password::new()
                    .with_prompt(format!("Password for {email}"))
                    .with_confirmation("Confirm password", "Passwords do not match")
                    .interact()
                    .map_err(|e| AppError::internal(format!("Password prompt failed: {e}")))?;

                if config.auth.enforce_password_policy {
                    let validator = PasswordValidator::new(&config.auth);
                    let report = validator.validate_strength(
                        &password,
                        &StrengthContext {
                            email: Some(email),
                            full_name: Some(full_name),
                        },
                    );
                    if !report.valid {
                        return Err(report.to_error());
                    }
                }

                let hasher = PasswordHasher::new(&config.auth)?;
                Some(hasher.hash(&password)?)
            };

            let user = store
                .create(&CreateUser {
                    email: email.clone(),
                    full_name: full_name.clone(),
                    role: *role,
                    workspace: *workspace,
                    password_hash,
                    created_by: None,
                })
                .await?;

            output::print_success(&format!("User '{}' created ({})", user.email, user.id));
        }
        UserCommand::List => {
            let users = store.list_all().await?;
            let rows: Vec<UserRow> = users
                .iter()
                .map(|u| UserRow {
                    id: u.id.to_string(),
                    email: u.email.clone(),
                    full_name: u.full_name.clone(),
                    role: u.role.to_string(),
                    workspace: u.workspace.to_string(),
                    active: u.is_active,
                    created_at: u.created_at.format("%Y-%m-%d %H:%M").to_string(),
                })
                .collect();
            output::print_list(&rows, format);
        }
        UserCommand::Enable { email } => {
            let user = find_by_email_required(&store, email).await?;
            store.set_active(user.id, true).await?;
            output::print_success(&format!("User '{}' enabled", email));
        }
        UserCommand::Disable { email } => {
            let user = find_by_email_required(&store, email).await?;
            store.set_active(user.id, false).await?;
            output::print_warning(&format!("User '{}' disabled", email));
        }
    }

    Ok(())
}

async fn find_by_email_required(
    store: &PgUserStore,
    email: &str,
) -> Result<acta_entity::user::User, AppError> {
    store
        .find_by_email(email)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User '{}' not found", email)))
}
