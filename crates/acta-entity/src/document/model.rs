//! Document record consumed by the lifecycle state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::status::DocumentStatus;
use crate::user::Workspace;

/// The slice of a document the authorization core reasons about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Unique document identifier.
    pub id: Uuid,
    /// The user who created the document.
    pub owner_id: Uuid,
    /// The workspace the document belongs to.
    pub workspace: Workspace,
    /// Current lifecycle status.
    pub status: DocumentStatus,
    /// When the document last entered `stored`.
    pub stored_at: Option<DateTime<Utc>>,
    /// When the document last entered `archived`.
    pub archived_at: Option<DateTime<Utc>>,
}

impl DocumentRecord {
    /// Create a fresh draft owned by the given user.
    pub fn new_draft(id: Uuid, owner_id: Uuid, workspace: Workspace) -> Self {
        Self {
            id,
            owner_id,
            workspace,
            status: DocumentStatus::Draft,
            stored_at: None,
            archived_at: None,
        }
    }

    /// Check whether the given user owns this document.
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }
}
