//! JWT token validation and revocation.

use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::debug;

use acta_core::config::auth::AuthConfig;
use acta_core::error::AppError;

use super::blocklist::TokenBlocklist;
use super::claims::{Claims, TokenType};

/// Validates JWT tokens and checks the revocation set.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
    /// Lenient validation used when reading claims off a token being
    /// revoked (expiry not enforced).
    revoke_validation: Validation,
    /// The injected revocation set.
    blocklist: Arc<TokenBlocklist>,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration and a revocation set.
    pub fn new(config: &AuthConfig, blocklist: Arc<TokenBlocklist>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5; // 5 seconds leeway for clock skew

        let mut revoke_validation = validation.clone();
        revoke_validation.validate_exp = false;

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            revoke_validation,
            blocklist,
        }
    }

    /// Decodes and validates an access token string.
    ///
    /// Checks, in order:
    /// 1. Not revoked (by fingerprint, before any claim is trusted)
    /// 2. Signature validity and expiration
    /// 3. Token type is Access
    pub fn verify_access(&self, token: &str) -> Result<Claims, AppError> {
        self.verify(token, TokenType::Access)
    }

    /// Decodes and validates a refresh token string.
    pub fn verify_refresh(&self, token: &str) -> Result<Claims, AppError> {
        self.verify(token, TokenType::Refresh)
    }

    fn verify(&self, token: &str, expected: TokenType) -> Result<Claims, AppError> {
        if self.blocklist.contains(token) {
            return Err(AppError::token_revoked("Token has been revoked"));
        }

        let claims = self.decode_token(token)?;

        if claims.token_type != expected {
            let wanted = match expected {
                TokenType::Access => "access",
                TokenType::Refresh => "refresh",
            };
            return Err(AppError::token_invalid(format!(
                "Invalid token type: expected {wanted} token"
            )));
        }

        Ok(claims)
    }

    /// Internal decode without type checking.
    fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::token_expired("Token has expired")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidToken => {
                        AppError::token_invalid("Invalid token format")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::token_invalid("Invalid token signature")
                    }
                    _ => AppError::token_invalid(format!("Token validation failed: {e}")),
                }
            })?;

        Ok(token_data.claims)
    }

    /// Adds the token to the revocation set, keyed until its embedded
    /// expiry.
    ///
    /// Idempotent, and effective before this call returns: a verification
    /// of the same token after `revoke` observes the revocation. Tokens
    /// whose claims cannot be read (bad signature, garbage input) are
    /// still recorded, with the minimum retention.
    pub fn revoke(&self, token: &str) {
        let expires_at = decode::<Claims>(token, &self.decoding_key, &self.revoke_validation)
            .map(|data| data.claims.exp)
            .unwrap_or(0);

        self.blocklist.insert(token, expires_at);
        debug!("Token revoked");
    }

    /// Returns the injected revocation set.
    pub fn blocklist(&self) -> &Arc<TokenBlocklist> {
        &self.blocklist
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::encoder::JwtEncoder;
    use chrono::Utc;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use uuid::Uuid;

    use acta_entity::user::{Role, User, Workspace};

    fn test_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "unit-test-secret-unit-test-secret!!".to_string(),
            ..AuthConfig::default()
        }
    }

    fn test_user() -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            email: "clerk@acta.example".to_string(),
            full_name: "Records Clerk".to_string(),
            role: Role::AdministrationSecretary,
            workspace: Workspace::Administration,
            password_hash: None,
            is_active: true,
            last_login_at: None,
            preferences: serde_json::json!({}),
            created_at: now,
            updated_at: now,
            created_by: None,
        }
    }

    fn make_pair() -> (JwtEncoder, JwtDecoder) {
        let config = test_config();
        let encoder = JwtEncoder::new(&config);
        let decoder = JwtDecoder::new(&config, Arc::new(TokenBlocklist::new()));
        (encoder, decoder)
    }

    #[test]
    fn test_issue_then_verify() {
        let (encoder, decoder) = make_pair();
        let user = test_user();
        let pair = encoder.issue_pair(&user).unwrap();

        let claims = decoder.verify_access(&pair.access_token).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.role, Role::AdministrationSecretary);
        assert_eq!(claims.token_type, TokenType::Access);

        let claims = decoder.verify_refresh(&pair.refresh_token).unwrap();
        assert_eq!(claims.token_type, TokenType::Refresh);
        assert!(pair.expires_in_seconds() > 0);
    }

    #[test]
    fn test_type_confusion_rejected() {
        let (encoder, decoder) = make_pair();
        let pair = encoder.issue_pair(&test_user()).unwrap();

        let err = decoder.verify_access(&pair.refresh_token).unwrap_err();
        assert_eq!(err.kind, acta_core::ErrorKind::TokenInvalid);

        let err = decoder.verify_refresh(&pair.access_token).unwrap_err();
        assert_eq!(err.kind, acta_core::ErrorKind::TokenInvalid);
    }

    #[test]
    fn test_expired_token_rejected() {
        let config = test_config();
        let decoder = JwtDecoder::new(&config, Arc::new(TokenBlocklist::new()));
        let user = test_user();

        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            workspace: user.workspace,
            iat: now - 7200,
            exp: now - 3600,
            token_type: TokenType::Access,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
        .unwrap();

        let err = decoder.verify_access(&token).unwrap_err();
        assert_eq!(err.kind, acta_core::ErrorKind::TokenExpired);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let (encoder, _) = make_pair();
        let pair = encoder.issue_pair(&test_user()).unwrap();

        let other_config = AuthConfig {
            jwt_secret: "a-completely-different-signing-key!".to_string(),
            ..AuthConfig::default()
        };
        let decoder = JwtDecoder::new(&other_config, Arc::new(TokenBlocklist::new()));
        let err = decoder.verify_access(&pair.access_token).unwrap_err();
        assert_eq!(err.kind, acta_core::ErrorKind::TokenInvalid);
    }

    #[test]
    fn test_garbage_token_rejected() {
        let (_, decoder) = make_pair();
        let err = decoder.verify_access("not-a-jwt").unwrap_err();
        assert_eq!(err.kind, acta_core::ErrorKind::TokenInvalid);
    }

    #[test]
    fn test_revoke_then_verify() {
        let (encoder, decoder) = make_pair();
        let pair = encoder.issue_pair(&test_user()).unwrap();

        decoder.verify_access(&pair.access_token).unwrap();
        decoder.revoke(&pair.access_token);

        let err = decoder.verify_access(&pair.access_token).unwrap_err();
        assert_eq!(err.kind, acta_core::ErrorKind::TokenRevoked);

        // Revoking twice has no additional effect.
        decoder.revoke(&pair.access_token);
        let err = decoder.verify_access(&pair.access_token).unwrap_err();
        assert_eq!(err.kind, acta_core::ErrorKind::TokenRevoked);
        assert_eq!(decoder.blocklist().len(), 1);
    }

    #[test]
    fn test_revoking_one_token_leaves_the_other_valid() {
        let (encoder, decoder) = make_pair();
        let pair = encoder.issue_pair(&test_user()).unwrap();

        decoder.revoke(&pair.access_token);
        assert!(decoder.verify_refresh(&pair.refresh_token).is_ok());
    }

    #[test]
    fn test_revoke_garbage_is_harmless() {
        let (_, decoder) = make_pair();
        decoder.revoke("not-a-jwt");
        decoder.revoke("not-a-jwt");
        assert_eq!(decoder.blocklist().len(), 1);
    }
}
