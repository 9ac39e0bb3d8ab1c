//! Collaborator store traits consumed by the authorization core.
//!
//! Implementations are injected at construction time, never reached through
//! process-wide singletons. "Not found" is an `Ok` value, never an error,
//! so callers can treat absence uniformly.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use acta_core::AppResult;
use acta_entity::permission::{PermissionFlags, RolePermission};
use acta_entity::user::{CreateUser, ProfileUpdate, Role, User, Workspace};

/// Persistence interface for user identity records.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Find a user by email, matched case-insensitively.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Find a user by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Create a new user and return the stored record.
    ///
    /// Fails with `ErrorKind::EmailAlreadyExists` when the email is taken.
    async fn create(&self, user: &CreateUser) -> AppResult<User>;

    /// Stamp the last successful login time.
    async fn update_last_login(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()>;

    /// Apply a profile update (name/preferences only). Returns the updated
    /// record, or `None` when the user does not exist.
    async fn update_profile(&self, update: &ProfileUpdate) -> AppResult<Option<User>>;

    /// Replace the stored password hash.
    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> AppResult<()>;

    /// Activate or deactivate an account.
    async fn set_active(&self, id: Uuid, active: bool) -> AppResult<()>;
}

/// Persistence interface for the role-permission matrix.
#[async_trait]
pub trait PermissionStore: Send + Sync + 'static {
    /// All matrix rows for the given role.
    async fn find_all_for_role(&self, role: Role) -> AppResult<Vec<RolePermission>>;

    /// Every row of the matrix.
    async fn find_all(&self) -> AppResult<Vec<RolePermission>>;

    /// Insert or update the row for (role, workspace) with the given flags.
    async fn upsert(
        &self,
        role: Role,
        workspace: Workspace,
        flags: PermissionFlags,
    ) -> AppResult<RolePermission>;
}
