//! The in-memory permission matrix.
//!
//! Built once at startup from the permission store. Keying by the closed
//! (Role, Workspace) pair means a new role or workspace variant forces the
//! compiler through every authorization site.

use std::collections::HashMap;

use tracing::info;

use acta_core::AppResult;
use acta_entity::permission::{PermissionFlags, RolePermission};
use acta_entity::user::{Role, Workspace};

use acta_store::PermissionStore;

/// Immutable snapshot of the role-permission matrix.
#[derive(Debug, Clone, Default)]
pub struct PermissionMatrix {
    /// (role, workspace) → capability flags.
    entries: HashMap<(Role, Workspace), PermissionFlags>,
}

impl PermissionMatrix {
    /// Load the full matrix from the store, one role at a time.
    pub async fn load(store: &dyn PermissionStore) -> AppResult<Self> {
        let mut rows = Vec::new();
        for role in Role::ALL {
            rows.extend(store.find_all_for_role(role).await?);
        }
        let matrix = Self::from_rows(rows);
        info!(entries = matrix.len(), "Permission matrix loaded");
        Ok(matrix)
    }

    /// Build a matrix from raw rows.
    ///
    /// The store's uniqueness constraint should prevent duplicate
    /// (role, workspace) rows; if any slip through they merge by flag
    /// union, never by count.
    pub fn from_rows(rows: impl IntoIterator<Item = RolePermission>) -> Self {
        let mut entries: HashMap<(Role, Workspace), PermissionFlags> = HashMap::new();
        for row in rows {
            let flags = row.flags();
            entries
                .entry((row.role, row.workspace))
                .and_modify(|existing| *existing = existing.union(flags))
                .or_insert(flags);
        }
        Self { entries }
    }

    /// The flags granted to a role in a workspace, if any row exists.
    pub fn flags(&self, role: Role, workspace: Workspace) -> Option<PermissionFlags> {
        self.entries.get(&(role, workspace)).copied()
    }

    /// Iterate all (role, workspace) → flags entries.
    pub fn iter(&self) -> impl Iterator<Item = (&(Role, Workspace), &PermissionFlags)> {
        self.entries.iter()
    }

    /// Number of (role, workspace) entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the matrix has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
