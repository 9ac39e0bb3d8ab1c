//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod auth;
pub mod database;
pub mod logging;

use serde::{Deserialize, Serialize};

use self::auth::AuthConfig;
use self::database::DatabaseConfig;
use self::logging::LoggingConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Deployment environment: `"development"`, `"test"`, or `"production"`.
    #[serde(default = "default_environment")]
    pub environment: String,
    /// Authentication settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `ACTA__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("ACTA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// Whether this configuration targets a production deployment.
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Validate cross-field constraints.
    ///
    /// A production deployment refuses to start with a signing secret that is
    /// shorter than 32 bytes or still set to the placeholder.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.is_production() {
            if self.auth.jwt_secret.len() < 32 {
                return Err(AppError::configuration(
                    "auth.jwt_secret must be at least 32 characters in production",
                ));
            }
            if self.auth.jwt_secret == auth::default_jwt_secret() {
                return Err(AppError::configuration(
                    "auth.jwt_secret must be changed from the default in production",
                ));
            }
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            auth: AuthConfig::default(),
            database: DatabaseConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

fn default_environment() -> String {
    "development".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_production_rejects_short_secret() {
        let mut config = AppConfig::default();
        config.environment = "production".to_string();
        config.auth.jwt_secret = "short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_production_rejects_placeholder_secret() {
        let mut config = AppConfig::default();
        config.environment = "production".to_string();
        // Long enough, but still the well-known placeholder.
        config.auth.jwt_secret = auth::default_jwt_secret();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_production_accepts_strong_secret() {
        let mut config = AppConfig::default();
        config.environment = "production".to_string();
        config.auth.jwt_secret = "0123456789abcdef0123456789abcdef".to_string();
        assert!(config.validate().is_ok());
    }
}
