//! Authentication and credential configuration.

use serde::{Deserialize, Serialize};

/// Authentication and credential configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing (HMAC-SHA256). Must be at least 32
    /// characters in production.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Access token TTL in hours.
    #[serde(default = "default_access_ttl")]
    pub jwt_access_ttl_hours: u64,
    /// Refresh token TTL in days.
    #[serde(default = "default_refresh_ttl")]
    pub jwt_refresh_ttl_days: u64,
    /// Argon2 memory cost in KiB.
    #[serde(default = "default_argon2_memory")]
    pub argon2_memory_kib: u32,
    /// Argon2 iteration count (time cost).
    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,
    /// Argon2 lane count (parallelism).
    #[serde(default = "default_argon2_parallelism")]
    pub argon2_parallelism: u32,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Whether weak passwords are rejected at registration/password change.
    #[serde(default = "default_true")]
    pub enforce_password_policy: bool,
    /// Organization-specific terms that may not appear in passwords.
    #[serde(default = "default_forbidden_terms")]
    pub forbidden_terms: Vec<String>,
    /// Login rate limiting.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

/// Coarse per-user login rate limiting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Whether login attempts are rate limited.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Maximum burst of attempts per user.
    #[serde(default = "default_burst")]
    pub burst: u32,
    /// Attempts regained per minute.
    #[serde(default = "default_refill_per_minute")]
    pub refill_per_minute: f64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            jwt_access_ttl_hours: default_access_ttl(),
            jwt_refresh_ttl_days: default_refresh_ttl(),
            argon2_memory_kib: default_argon2_memory(),
            argon2_iterations: default_argon2_iterations(),
            argon2_parallelism: default_argon2_parallelism(),
            password_min_length: default_password_min(),
            enforce_password_policy: true,
            forbidden_terms: default_forbidden_terms(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            burst: default_burst(),
            refill_per_minute: default_refill_per_minute(),
        }
    }
}

pub(crate) fn default_jwt_secret() -> String {
    "CHANGE_ME_TO_A_LONG_RANDOM_SECRET_VALUE".to_string()
}

fn default_access_ttl() -> u64 {
    8
}

fn default_refresh_ttl() -> u64 {
    7
}

fn default_argon2_memory() -> u32 {
    19456
}

fn default_argon2_iterations() -> u32 {
    2
}

fn default_argon2_parallelism() -> u32 {
    1
}

fn default_password_min() -> usize {
    10
}

fn default_forbidden_terms() -> Vec<String> {
    ["acta", "portal", "federation", "welcome"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_burst() -> u32 {
    10
}

fn default_refill_per_minute() -> f64 {
    6.0
}

fn default_true() -> bool {
    true
}
