//! Role-permission matrix row model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::action::PermissionAction;
use crate::user::{Role, Workspace};

/// One row of the authorization matrix: what a role may do in a workspace.
///
/// At most one row exists per (role, workspace) pair; the pair carries a
/// uniqueness constraint in the store.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RolePermission {
    /// Unique row identifier.
    pub id: Uuid,
    /// The role this grant applies to.
    pub role: Role,
    /// The workspace this grant applies to.
    pub workspace: Workspace,
    /// May list and read documents.
    pub can_view: bool,
    /// May download document content.
    pub can_download: bool,
    /// May archive documents owned by others.
    pub can_archive_others: bool,
    /// May manage the workspace (store, revert, reorganize any document).
    pub can_manage_workspace: bool,
    /// When this row was created.
    pub created_at: DateTime<Utc>,
    /// When this row was last updated.
    pub updated_at: DateTime<Utc>,
}

impl RolePermission {
    /// Collapse the row into its capability flags.
    pub fn flags(&self) -> PermissionFlags {
        PermissionFlags {
            view: self.can_view,
            download: self.can_download,
            archive: self.can_archive_others,
            manage: self.can_manage_workspace,
        }
    }
}

/// The four independent capability booleans carried by a matrix row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionFlags {
    /// May list and read documents.
    pub view: bool,
    /// May download document content.
    pub download: bool,
    /// May archive documents owned by others.
    pub archive: bool,
    /// May manage the workspace.
    pub manage: bool,
}

impl PermissionFlags {
    /// Flags with every capability granted.
    pub fn all() -> Self {
        Self {
            view: true,
            download: true,
            archive: true,
            manage: true,
        }
    }

    /// Whether no capability is granted.
    pub fn is_empty(&self) -> bool {
        !(self.view || self.download || self.archive || self.manage)
    }

    /// Union with another set of flags.
    ///
    /// Duplicate (role, workspace) rows should not exist, but when they do
    /// they merge idempotently rather than counting.
    pub fn union(self, other: Self) -> Self {
        Self {
            view: self.view || other.view,
            download: self.download || other.download,
            archive: self.archive || other.archive,
            manage: self.manage || other.manage,
        }
    }

    /// Whether the flag for the given action is set.
    pub fn allows(&self, action: PermissionAction) -> bool {
        match action {
            PermissionAction::View => self.view,
            PermissionAction::Download => self.download,
            PermissionAction::Archive => self.archive,
            PermissionAction::Manage => self.manage,
        }
    }
}
