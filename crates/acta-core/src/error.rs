//! Unified application error types for Acta.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. Domain-expected failures (bad
//! credentials, weak passwords, illegal lifecycle transitions) are ordinary
//! `Err` values with a dedicated [`ErrorKind`]; only infrastructure faults
//! are treated as internal failures by the consuming layer.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Login rejected. Deliberately covers unknown email, inactive account,
    /// and wrong password alike so callers cannot enumerate accounts.
    InvalidCredentials,
    /// The account has been deactivated by an administrator.
    AccountDisabled,
    /// The account has no password hash; login is disabled for it.
    NoPasswordSet,
    /// A user with this email already exists.
    EmailAlreadyExists,
    /// The password failed the strength policy.
    WeakPassword,
    /// The caller does not have permission to perform the action.
    InsufficientPermissions,
    /// The token is past its expiry.
    TokenExpired,
    /// The token failed signature/shape verification or carries the wrong
    /// type discriminator.
    TokenInvalid,
    /// The token has been explicitly revoked.
    TokenRevoked,
    /// The presented refresh token was rejected for any reason.
    InvalidRefreshToken,
    /// A document transition was attempted by an actor who is neither the
    /// owner nor capability-granted on the workspace.
    NotOwnerAndNoPermission,
    /// A document transition not present in the lifecycle table.
    IllegalTransition,
    /// Too many attempts in the rate-limit window.
    RateLimited,
    /// Input validation failed.
    Validation,
    /// The requested resource was not found.
    NotFound,
    /// The password hashing primitive failed.
    Hashing,
    /// A database error occurred.
    Database,
    /// A configuration error occurred.
    Configuration,
    /// An internal error occurred.
    Internal,
}

impl ErrorKind {
    /// Whether this kind is an infrastructure fault rather than a
    /// domain-expected outcome. Transport layers map these to a generic
    /// internal failure and must not leak detail to the end caller.
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            Self::Hashing | Self::Database | Self::Configuration | Self::Internal
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "INVALID_CREDENTIALS"),
            Self::AccountDisabled => write!(f, "ACCOUNT_DISABLED"),
            Self::NoPasswordSet => write!(f, "NO_PASSWORD_SET"),
            Self::EmailAlreadyExists => write!(f, "EMAIL_ALREADY_EXISTS"),
            Self::WeakPassword => write!(f, "WEAK_PASSWORD"),
            Self::InsufficientPermissions => write!(f, "INSUFFICIENT_PERMISSIONS"),
            Self::TokenExpired => write!(f, "TOKEN_EXPIRED"),
            Self::TokenInvalid => write!(f, "TOKEN_INVALID"),
            Self::TokenRevoked => write!(f, "TOKEN_REVOKED"),
            Self::InvalidRefreshToken => write!(f, "INVALID_REFRESH_TOKEN"),
            Self::NotOwnerAndNoPermission => write!(f, "NOT_OWNER_AND_NO_PERMISSION"),
            Self::IllegalTransition => write!(f, "ILLEGAL_TRANSITION"),
            Self::RateLimited => write!(f, "RATE_LIMITED"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Hashing => write!(f, "HASHING"),
            Self::Database => write!(f, "DATABASE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout Acta.
///
/// All crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls. This provides a single error type for
/// the entire application boundary.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Whether this error is an infrastructure fault (see [`ErrorKind::is_infrastructure`]).
    pub fn is_infrastructure(&self) -> bool {
        self.kind.is_infrastructure()
    }

    /// Create an invalid-credentials error with the uniform login message.
    ///
    /// The message is fixed so that "no such user" and "wrong password" are
    /// indistinguishable to the caller.
    pub fn invalid_credentials() -> Self {
        Self::new(ErrorKind::InvalidCredentials, "Invalid email or password")
    }

    /// Create an account-disabled error.
    pub fn account_disabled(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AccountDisabled, message)
    }

    /// Create a no-password-set error.
    pub fn no_password_set(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NoPasswordSet, message)
    }

    /// Create an email-already-exists error.
    pub fn email_already_exists(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::EmailAlreadyExists, message)
    }

    /// Create a weak-password error.
    pub fn weak_password(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::WeakPassword, message)
    }

    /// Create an insufficient-permissions error.
    pub fn insufficient_permissions(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InsufficientPermissions, message)
    }

    /// Create a token-expired error.
    pub fn token_expired(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TokenExpired, message)
    }

    /// Create a token-invalid error.
    pub fn token_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TokenInvalid, message)
    }

    /// Create a token-revoked error.
    pub fn token_revoked(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TokenRevoked, message)
    }

    /// Create an invalid-refresh-token error.
    pub fn invalid_refresh_token(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidRefreshToken, message)
    }

    /// Create a rate-limited error.
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RateLimited, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a hashing error.
    pub fn hashing(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Hashing, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Internal,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_kind_and_message() {
        let err = AppError::weak_password("too short");
        assert_eq!(err.to_string(), "WEAK_PASSWORD: too short");
    }

    #[test]
    fn test_infrastructure_split() {
        assert!(AppError::hashing("argon2 failure").is_infrastructure());
        assert!(AppError::database("down").is_infrastructure());
        assert!(!AppError::invalid_credentials().is_infrastructure());
        assert!(!AppError::token_revoked("revoked").is_infrastructure());
    }

    #[test]
    fn test_invalid_credentials_message_is_uniform() {
        assert_eq!(
            AppError::invalid_credentials().to_string(),
            AppError::invalid_credentials().to_string()
        );
    }
}
