//! PostgreSQL permission-matrix store implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use acta_core::error::{AppError, ErrorKind};
use acta_core::result::AppResult;
use acta_entity::permission::{PermissionFlags, RolePermission};
use acta_entity::user::{Role, Workspace};

use crate::traits::PermissionStore;

/// [`PermissionStore`] backed by the `role_permissions` table.
#[derive(Debug, Clone)]
pub struct PgPermissionStore {
    pool: PgPool,
}

impl PgPermissionStore {
    /// Create a new permission store over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PermissionStore for PgPermissionStore {
    async fn find_all_for_role(&self, role: Role) -> AppResult<Vec<RolePermission>> {
        sqlx::query_as::<_, RolePermission>(
            "SELECT * FROM role_permissions WHERE role = $1 ORDER BY workspace",
        )
        .bind(role)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list permissions for role", e)
        })
    }

    async fn find_all(&self) -> AppResult<Vec<RolePermission>> {
        sqlx::query_as::<_, RolePermission>(
            "SELECT * FROM role_permissions ORDER BY role, workspace",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list permissions", e))
    }

    async fn upsert(
        &self,
        role: Role,
        workspace: Workspace,
        flags: PermissionFlags,
    ) -> AppResult<RolePermission> {
        sqlx::query_as::<_, RolePermission>(
            "INSERT INTO role_permissions \
             (id, role, workspace, can_view, can_download, can_archive_others, can_manage_workspace) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (role, workspace) DO UPDATE SET \
             can_view = EXCLUDED.can_view, \
             can_download = EXCLUDED.can_download, \
             can_archive_others = EXCLUDED.can_archive_others, \
             can_manage_workspace = EXCLUDED.can_manage_workspace, \
             updated_at = NOW() \
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(role)
        .bind(workspace)
        .bind(flags.view)
        .bind(flags.download)
        .bind(flags.archive)
        .bind(flags.manage)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to upsert permission", e))
    }
}
