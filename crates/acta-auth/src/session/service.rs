//! The session orchestrator.
//!
//! `AuthService` is the only component other layers call directly; it
//! composes the user store, password machinery, token service, and
//! permission resolver into login, registration, refresh, logout, and
//! authorization queries. Every collaborator is injected at construction.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use acta_core::{AppError, AppResult};
use acta_entity::permission::PermissionAction;
use acta_entity::user::{CreateUser, ProfileUpdate, Role, User, Workspace};
use acta_store::UserStore;

use crate::jwt::{JwtDecoder, JwtEncoder, TokenPair};
use crate::password::{PasswordHasher, PasswordValidator, StrengthContext};
use crate::permission::{PermissionResolver, ResolvedPermissions};

use super::rate_limit::LoginRateLimiter;

/// A user together with a freshly issued token pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    /// The authenticated (or newly registered) user.
    pub user: User,
    /// Issued token pair.
    pub tokens: TokenPair,
}

/// Identity plus resolved permissions, as consumed by UI affordances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// User ID.
    pub id: Uuid,
    /// Email address.
    pub email: String,
    /// Full display name.
    pub full_name: String,
    /// Assigned role.
    pub role: Role,
    /// Home workspace.
    pub workspace: Workspace,
    /// Last successful login time.
    pub last_login_at: Option<DateTime<Utc>>,
    /// Free-form preference bag.
    pub preferences: serde_json::Value,
    /// The workspaces in which the role holds each capability.
    pub permissions: ResolvedPermissions,
}

impl AuthenticatedUser {
    fn from_user(user: User, permissions: ResolvedPermissions) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            role: user.role,
            workspace: user.workspace,
            last_login_at: user.last_login_at,
            preferences: user.preferences,
            permissions,
        }
    }
}

/// Input for administrator-driven user registration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterUserInput {
    /// Email address.
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    /// Full display name.
    #[validate(length(min = 1, max = 200, message = "Full name is required"))]
    pub full_name: String,
    /// Initial password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    /// Assigned role.
    pub role: Role,
    /// Home workspace.
    pub workspace: Workspace,
}

/// Composes the authorization core into the operations other layers call.
#[derive(Clone)]
pub struct AuthService {
    /// User identity store.
    user_store: Arc<dyn UserStore>,
    /// Token issuance.
    jwt_encoder: Arc<JwtEncoder>,
    /// Token verification and revocation.
    jwt_decoder: Arc<JwtDecoder>,
    /// Password hashing.
    password_hasher: Arc<PasswordHasher>,
    /// Password strength policy.
    password_validator: Arc<PasswordValidator>,
    /// Permission resolution.
    resolver: Arc<PermissionResolver>,
    /// Optional login rate limiter.
    rate_limiter: Option<Arc<LoginRateLimiter>>,
    /// Whether weak passwords are rejected.
    enforce_password_policy: bool,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("enforce_password_policy", &self.enforce_password_policy)
            .finish()
    }
}

impl AuthService {
    /// Creates the orchestrator with all collaborators injected.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_store: Arc<dyn UserStore>,
        jwt_encoder: Arc<JwtEncoder>,
        jwt_decoder: Arc<JwtDecoder>,
        password_hasher: Arc<PasswordHasher>,
        password_validator: Arc<PasswordValidator>,
        resolver: Arc<PermissionResolver>,
        rate_limiter: Option<Arc<LoginRateLimiter>>,
        enforce_password_policy: bool,
    ) -> Self {
        Self {
            user_store,
            jwt_encoder,
            jwt_decoder,
            password_hasher,
            password_validator,
            resolver,
            rate_limiter,
            enforce_password_policy,
        }
    }

    /// Authenticates by email and password and issues a token pair.
    ///
    /// Unknown email, deactivated account, missing password hash, and
    /// wrong password all produce the same `INVALID_CREDENTIALS` error;
    /// the precise cause is only logged.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        let email = normalize_email(email);

        if let Some(limiter) = &self.rate_limiter {
            if !limiter.check(&email).await {
                warn!(email = %email, "Login rate limit exceeded");
                return Err(AppError::rate_limited(
                    "Too many login attempts. Try again later.",
                ));
            }
        }

        let Some(user) = self.user_store.find_by_email(&email).await? else {
            warn!(email = %email, "Login failed: unknown email");
            return Err(AppError::invalid_credentials());
        };

        if !user.is_active {
            warn!(user_id = %user.id, "Login failed: account deactivated");
            return Err(AppError::invalid_credentials());
        }

        let Some(hash) = user.password_hash.as_deref() else {
            warn!(user_id = %user.id, "Login failed: no password set");
            return Err(AppError::invalid_credentials());
        };

        if !self.password_hasher.verify(password, hash)? {
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(AppError::invalid_credentials());
        }

        let tokens = self.jwt_encoder.issue_pair(&user)?;

        // Best effort: a failed stamp must not fail the login.
        let _ = self.user_store.update_last_login(user.id, Utc::now()).await;

        info!(user_id = %user.id, role = %user.role, "Login successful");
        Ok(AuthSession { user, tokens })
    }

    /// Registers a new user on behalf of an administrator.
    ///
    /// All-or-nothing: on any rejection no user row is created.
    pub async fn register(
        &self,
        input: RegisterUserInput,
        requesting_admin_id: Uuid,
    ) -> AppResult<AuthSession> {
        input
            .validate()
            .map_err(|e| AppError::validation(format!("Invalid registration data: {e}")))?;

        let requester = self
            .user_store
            .find_by_id(requesting_admin_id)
            .await?
            .filter(|u| u.is_active)
            .ok_or_else(|| {
                AppError::insufficient_permissions("Only an administrator may register users")
            })?;

        if !requester.is_admin() {
            warn!(
                requester_id = %requester.id,
                role = %requester.role,
                "Registration denied: requester is not an administrator"
            );
            return Err(AppError::insufficient_permissions(
                "Only an administrator may register users",
            ));
        }

        if self.user_store.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::email_already_exists(format!(
                "A user with email '{}' already exists",
                input.email
            )));
        }

        if self.enforce_password_policy {
            let context = StrengthContext {
                email: Some(&input.email),
                full_name: Some(&input.full_name),
            };
            let report = self
                .password_validator
                .validate_strength(&input.password, &context);
            if !report.valid {
                return Err(report.to_error());
            }
        }

        let password_hash = self.password_hasher.hash(&input.password)?;

        let user = self
            .user_store
            .create(&CreateUser {
                email: input.email,
                full_name: input.full_name,
                role: input.role,
                workspace: input.workspace,
                password_hash: Some(password_hash),
                created_by: Some(requester.id),
            })
            .await?;

        let tokens = self.jwt_encoder.issue_pair(&user)?;

        info!(
            user_id = %user.id,
            role = %user.role,
            workspace = %user.workspace,
            created_by = %requester.id,
            "User registered"
        );
        Ok(AuthSession { user, tokens })
    }

    /// Exchanges a valid refresh token for a fresh pair.
    ///
    /// Every verification failure, and a missing or deactivated subject
    /// user, maps to `INVALID_REFRESH_TOKEN`. The presented refresh token
    /// stays valid until its natural expiry; explicit invalidation is
    /// `logout`'s job.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<AuthSession> {
        let claims = self.jwt_decoder.verify_refresh(refresh_token).map_err(|e| {
            if e.is_infrastructure() {
                e
            } else {
                AppError::invalid_refresh_token("Refresh token rejected")
            }
        })?;

        let user = self
            .user_store
            .find_by_id(claims.sub)
            .await?
            .filter(|u| u.is_active)
            .ok_or_else(|| AppError::invalid_refresh_token("Refresh token rejected"))?;

        let tokens = self.jwt_encoder.issue_pair(&user)?;

        info!(user_id = %user.id, "Token pair refreshed");
        Ok(AuthSession { user, tokens })
    }

    /// Revokes the supplied tokens. At least one must be present.
    ///
    /// Revocation is observable before this returns: a verification of the
    /// same token afterwards fails with `TOKEN_REVOKED`.
    pub async fn logout(
        &self,
        access_token: Option<&str>,
        refresh_token: Option<&str>,
    ) -> AppResult<()> {
        if access_token.is_none() && refresh_token.is_none() {
            return Err(AppError::validation(
                "At least one of access_token or refresh_token is required",
            ));
        }

        if let Some(token) = access_token {
            self.jwt_decoder.revoke(token);
        }
        if let Some(token) = refresh_token {
            self.jwt_decoder.revoke(token);
        }

        info!("Logout completed");
        Ok(())
    }

    /// Returns identity plus resolved permissions.
    ///
    /// Missing and deactivated users are both `None`, so callers treat
    /// either uniformly as "not authenticated".
    pub async fn get_profile(&self, user_id: Uuid) -> AppResult<Option<AuthenticatedUser>> {
        let Some(user) = self.user_store.find_by_id(user_id).await? else {
            return Ok(None);
        };
        if !user.is_active {
            return Ok(None);
        }

        let permissions = self.resolver.resolve(user.role);
        Ok(Some(AuthenticatedUser::from_user(user, permissions)))
    }

    /// Whether the user may perform the action, optionally scoped to a
    /// workspace.
    ///
    /// Fails closed: any lookup failure denies, never errors.
    pub async fn can_perform_action(
        &self,
        user_id: Uuid,
        action: PermissionAction,
        workspace: Option<Workspace>,
    ) -> bool {
        match self.get_profile(user_id).await {
            Ok(Some(profile)) => profile.permissions.allows(action, workspace),
            Ok(None) => false,
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Permission check failed; denying");
                false
            }
        }
    }

    /// Applies a profile update (name and preferences only).
    pub async fn update_profile(&self, update: &ProfileUpdate) -> AppResult<User> {
        let user = self
            .user_store
            .update_profile(update)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        info!(user_id = %user.id, "Profile updated");
        Ok(user)
    }

    /// Changes a user's password after verifying the current one.
    pub async fn change_password(
        &self,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let user = self
            .user_store
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        if !user.is_active {
            return Err(AppError::account_disabled(
                "Account is deactivated. Contact an administrator.",
            ));
        }

        let Some(hash) = user.password_hash.as_deref() else {
            return Err(AppError::no_password_set(
                "No password is set for this account",
            ));
        };

        if !self.password_hasher.verify(current_password, hash)? {
            return Err(AppError::invalid_credentials());
        }

        if self.enforce_password_policy {
            let context = StrengthContext {
                email: Some(&user.email),
                full_name: Some(&user.full_name),
            };
            let report = self
                .password_validator
                .validate_strength(new_password, &context);
            if !report.valid {
                return Err(report.to_error());
            }
        }

        let new_hash = self.password_hasher.hash(new_password)?;
        self.user_store
            .update_password_hash(user.id, &new_hash)
            .await?;

        info!(user_id = %user.id, "Password changed");
        Ok(())
    }

    /// The injected token decoder, for callers that verify bearer tokens
    /// themselves.
    pub fn decoder(&self) -> &Arc<JwtDecoder> {
        &self.jwt_decoder
    }

    /// The injected permission resolver.
    pub fn resolver(&self) -> &Arc<PermissionResolver> {
        &self.resolver
    }
}

/// Lowercase and trim an email for case-insensitive matching.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Clerk@Acta.Example "), "clerk@acta.example");
    }
}
