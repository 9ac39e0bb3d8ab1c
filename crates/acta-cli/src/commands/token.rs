//! Token inspection CLI commands.

use std::sync::Arc;

use clap::{Args, Subcommand};

use acta_auth::jwt::{JwtDecoder, TokenBlocklist, extract_bearer};
use acta_core::config::AppConfig;
use acta_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for token commands
#[derive(Debug, Args)]
pub struct TokenArgs {
    /// Token subcommand
    #[command(subcommand)]
    pub command: TokenCommand,
}

/// Token subcommands
#[derive(Debug, Subcommand)]
pub enum TokenCommand {
    /// Verify a token against the configured secret and print its claims
    Inspect {
        /// The token, or a full `Bearer <token>` header value
        token: String,
    },
}

/// Execute token commands
pub async fn execute(
    args: &TokenArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        TokenCommand::Inspect { token } => {
            let token = extract_bearer(token).unwrap_or(token);
            // A fresh blocklist: revocations live in the server process,
            // so the CLI can only judge signature, expiry, and shape.
            let decoder = JwtDecoder::new(&config.auth, Arc::new(TokenBlocklist::new()));

            let claims = decoder
                .verify_access(token)
                .or_else(|_| decoder.verify_refresh(token))?;

            output::print_item(&claims, format);
        }
    }

    Ok(())
}
