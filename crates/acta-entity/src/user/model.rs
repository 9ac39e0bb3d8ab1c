//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::Role;
use super::workspace::Workspace;

/// A registered user of the portal.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Email address, unique and matched case-insensitively.
    pub email: String,
    /// Full display name.
    pub full_name: String,
    /// Assigned role.
    pub role: Role,
    /// Home workspace.
    pub workspace: Workspace,
    /// Argon2 password hash. `None` means login is disabled for this user.
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    /// Whether the account is active. Inactive users cannot authenticate.
    pub is_active: bool,
    /// Last successful login time.
    pub last_login_at: Option<DateTime<Utc>>,
    /// Free-form UI preference bag.
    pub preferences: serde_json::Value,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
    /// The administrator who created this user.
    pub created_by: Option<Uuid>,
}

impl User {
    /// Check if the user can authenticate right now.
    pub fn can_login(&self) -> bool {
        self.is_active && self.password_hash.is_some()
    }

    /// Check if this user holds the top administrative role.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Email address.
    pub email: String,
    /// Full display name.
    pub full_name: String,
    /// Assigned role.
    pub role: Role,
    /// Home workspace.
    pub workspace: Workspace,
    /// Pre-hashed password, or `None` to create the user with login disabled.
    pub password_hash: Option<String>,
    /// Creating administrator's user ID.
    pub created_by: Option<Uuid>,
}

/// Data for updating an existing user's profile.
///
/// Role, workspace, and email are administrator-level mutations handled
/// elsewhere; a profile update may only touch name and preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileUpdate {
    /// The user ID to update.
    pub id: Uuid,
    /// New full name, if changed.
    pub full_name: Option<String>,
    /// New preference bag, if changed.
    pub preferences: Option<serde_json::Value>,
}
