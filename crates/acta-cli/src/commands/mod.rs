//! CLI command definitions and shared wiring.

use clap::{Parser, Subcommand};

use acta_core::config::AppConfig;
use acta_core::error::AppError;
use acta_store::postgres::DatabasePool;

use crate::output::OutputFormat;

pub mod permission;
pub mod token;
pub mod user;

/// Acta portal administration CLI.
#[derive(Debug, Parser)]
#[command(name = "acta", about = "Acta portal administration", version)]
pub struct Cli {
    /// Configuration environment (config/<env>.toml overlay).
    #[arg(long, global = true, default_value = "development")]
    pub env: String,
    /// Output format.
    #[arg(long, global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,
    /// Subcommand.
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage users
    User(user::UserArgs),
    /// Manage the role-permission matrix
    Permission(permission::PermissionArgs),
    /// Inspect bearer tokens
    Token(token::TokenArgs),
}

impl Cli {
    /// Dispatch the selected subcommand.
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        match &self.command {
            Command::User(args) => user::execute(args, config, self.format).await,
            Command::Permission(args) => permission::execute(args, config, self.format).await,
            Command::Token(args) => token::execute(args, config, self.format).await,
        }
    }
}

/// Connect to the database and bring the schema up to date.
pub(crate) async fn connect(config: &AppConfig) -> Result<DatabasePool, AppError> {
    let pool = DatabasePool::connect(&config.database).await?;
    acta_store::postgres::migration::run_migrations(pool.pool()).await?;
    Ok(pool)
}
