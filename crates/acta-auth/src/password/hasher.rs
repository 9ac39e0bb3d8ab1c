//! Argon2id password hashing and verification.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use tracing::warn;

use acta_core::config::auth::AuthConfig;
use acta_core::error::AppError;

/// Handles password hashing and verification using Argon2id.
///
/// Cost parameters come from configuration so deployments can tune the
/// work factor without a code change.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    /// Create a hasher with cost parameters from auth configuration.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        let params = Params::new(
            config.argon2_memory_kib,
            config.argon2_iterations,
            config.argon2_parallelism,
            None,
        )
        .map_err(|e| AppError::configuration(format!("Invalid Argon2 parameters: {e}")))?;

        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a plaintext password using Argon2id with a random salt.
    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::hashing(format!("Password hashing failed: {e}")))?;

        Ok(hash.to_string())
    }

    /// Verify a plaintext password against a stored Argon2id hash.
    ///
    /// Returns `Ok(true)` if the password matches, `Ok(false)` if not.
    /// A malformed stored hash also verifies to `false` (fail closed);
    /// only genuine primitive failures surface as an error.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "Stored password hash is malformed; rejecting login");
                return Ok(false);
            }
        };

        match self.argon2().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::hashing(format!(
                "Password verification failed: {e}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_hasher() -> PasswordHasher {
        // Small cost keeps the test suite fast; production values come
        // from configuration.
        let config = AuthConfig {
            argon2_memory_kib: 1024,
            argon2_iterations: 1,
            argon2_parallelism: 1,
            ..AuthConfig::default()
        };
        PasswordHasher::new(&config).unwrap()
    }

    #[test]
    fn test_hash_verify_round_trip() {
        let hasher = make_hasher();
        let hash = hasher.hash("Corr3ct-Horse!").unwrap();
        assert!(hasher.verify("Corr3ct-Horse!", &hash).unwrap());
    }

    #[test]
    fn test_wrong_password_rejected() {
        let hasher = make_hasher();
        let hash = hasher.hash("Corr3ct-Horse!").unwrap();
        assert!(!hasher.verify("wrong-password", &hash).unwrap());
    }

    #[test]
    fn test_distinct_salts_produce_distinct_hashes() {
        let hasher = make_hasher();
        let a = hasher.hash("Same-Passw0rd!").unwrap();
        let b = hasher.hash("Same-Passw0rd!").unwrap();
        assert_ne!(a, b);
        assert!(hasher.verify("Same-Passw0rd!", &a).unwrap());
        assert!(hasher.verify("Same-Passw0rd!", &b).unwrap());
    }

    #[test]
    fn test_malformed_hash_fails_closed() {
        let hasher = make_hasher();
        assert!(!hasher.verify("anything", "not-a-phc-string").unwrap());
        assert!(!hasher.verify("anything", "").unwrap());
    }
}
