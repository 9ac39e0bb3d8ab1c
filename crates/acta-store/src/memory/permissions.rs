//! In-memory permission-matrix store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use acta_core::AppResult;
use acta_entity::permission::{PermissionFlags, RolePermission};
use acta_entity::user::{Role, Workspace};

use crate::traits::PermissionStore;

/// In-memory [`PermissionStore`] suitable for tests and single-node development.
#[derive(Debug, Clone, Default)]
pub struct MemoryPermissionStore {
    /// Matrix rows. Kept as a plain vector; uniqueness is enforced on upsert.
    rows: Arc<RwLock<Vec<RolePermission>>>,
}

impl MemoryPermissionStore {
    /// Create an empty matrix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a raw row without the upsert uniqueness check.
    ///
    /// Test fixture hook for exercising duplicate-row handling downstream.
    pub async fn insert_raw(&self, row: RolePermission) {
        self.rows.write().await.push(row);
    }
}

#[async_trait]
impl PermissionStore for MemoryPermissionStore {
    async fn find_all_for_role(&self, role: Role) -> AppResult<Vec<RolePermission>> {
        let rows = self.rows.read().await;
        Ok(rows.iter().filter(|r| r.role == role).cloned().collect())
    }

    async fn find_all(&self) -> AppResult<Vec<RolePermission>> {
        Ok(self.rows.read().await.clone())
    }

    async fn upsert(
        &self,
        role: Role,
        workspace: Workspace,
        flags: PermissionFlags,
    ) -> AppResult<RolePermission> {
        let mut rows = self.rows.write().await;
        let now = Utc::now();

        if let Some(existing) = rows
            .iter_mut()
            .find(|r| r.role == role && r.workspace == workspace)
        {
            existing.can_view = flags.view;
            existing.can_download = flags.download;
            existing.can_archive_others = flags.archive;
            existing.can_manage_workspace = flags.manage;
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        let row = RolePermission {
            id: Uuid::new_v4(),
            role,
            workspace,
            can_view: flags.view,
            can_download: flags.download,
            can_archive_others: flags.archive,
            can_manage_workspace: flags.manage,
            created_at: now,
            updated_at: now,
        };
        rows.push(row.clone());
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upsert_replaces_existing_pair() {
        let store = MemoryPermissionStore::new();
        store
            .upsert(
                Role::FinanceSecretary,
                Workspace::Finance,
                PermissionFlags {
                    view: true,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        store
            .upsert(
                Role::FinanceSecretary,
                Workspace::Finance,
                PermissionFlags::all(),
            )
            .await
            .unwrap();

        let rows = store
            .find_all_for_role(Role::FinanceSecretary)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].can_manage_workspace);
    }

    #[tokio::test]
    async fn test_find_all_for_role_filters() {
        let store = MemoryPermissionStore::new();
        store
            .upsert(Role::President, Workspace::Presidency, PermissionFlags::all())
            .await
            .unwrap();
        store
            .upsert(
                Role::CommissionMember,
                Workspace::Legal,
                PermissionFlags {
                    view: true,
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let rows = store.find_all_for_role(Role::President).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].workspace, Workspace::Presidency);
    }
}
