//! Permission resolution over the matrix.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use acta_entity::permission::PermissionAction;
use acta_entity::user::{Role, Workspace};

use super::matrix::PermissionMatrix;

/// The workspaces in which a role holds each capability.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPermissions {
    /// Workspaces the role may view.
    pub can_view: HashSet<Workspace>,
    /// Workspaces the role may download from.
    pub can_download: HashSet<Workspace>,
    /// Workspaces in which the role may archive others' documents.
    pub can_archive: HashSet<Workspace>,
    /// Workspaces the role may manage.
    pub can_manage: HashSet<Workspace>,
}

impl ResolvedPermissions {
    /// The workspace set for a given action.
    pub fn set_for(&self, action: PermissionAction) -> &HashSet<Workspace> {
        match action {
            PermissionAction::View => &self.can_view,
            PermissionAction::Download => &self.can_download,
            PermissionAction::Archive => &self.can_archive,
            PermissionAction::Manage => &self.can_manage,
        }
    }

    /// Whether the action is allowed.
    ///
    /// With a workspace, membership decides; without one, this is the
    /// coarse "holds the capability anywhere" check.
    pub fn allows(&self, action: PermissionAction, workspace: Option<Workspace>) -> bool {
        let set = self.set_for(action);
        match workspace {
            Some(ws) => set.contains(&ws),
            None => !set.is_empty(),
        }
    }

    /// Whether no capability is held anywhere.
    pub fn is_empty(&self) -> bool {
        self.can_view.is_empty()
            && self.can_download.is_empty()
            && self.can_archive.is_empty()
            && self.can_manage.is_empty()
    }
}

/// Answers "what may role R do in workspace W" from the loaded matrix.
///
/// Fail-closed: a role with no matrix rows holds nothing.
#[derive(Debug, Clone)]
pub struct PermissionResolver {
    matrix: PermissionMatrix,
}

impl PermissionResolver {
    /// Create a resolver over a loaded matrix.
    pub fn new(matrix: PermissionMatrix) -> Self {
        Self { matrix }
    }

    /// Partition the workspaces by the capabilities the role holds there.
    pub fn resolve(&self, role: Role) -> ResolvedPermissions {
        let mut resolved = ResolvedPermissions::default();
        for (&(entry_role, workspace), flags) in self.matrix.iter() {
            if entry_role != role {
                continue;
            }
            if flags.view {
                resolved.can_view.insert(workspace);
            }
            if flags.download {
                resolved.can_download.insert(workspace);
            }
            if flags.archive {
                resolved.can_archive.insert(workspace);
            }
            if flags.manage {
                resolved.can_manage.insert(workspace);
            }
        }
        resolved
    }

    /// Whether the role may perform the action, optionally scoped to a
    /// workspace.
    pub fn can_perform(
        &self,
        role: Role,
        action: PermissionAction,
        workspace: Option<Workspace>,
    ) -> bool {
        match workspace {
            Some(ws) => self
                .matrix
                .flags(role, ws)
                .is_some_and(|flags| flags.allows(action)),
            None => !self.resolve(role).set_for(action).is_empty(),
        }
    }

    /// The underlying matrix snapshot.
    pub fn matrix(&self) -> &PermissionMatrix {
        &self.matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use acta_entity::permission::PermissionFlags;
    use chrono::Utc;
    use uuid::Uuid;

    use acta_entity::permission::RolePermission;

    fn row(role: Role, workspace: Workspace, flags: PermissionFlags) -> RolePermission {
        let now = Utc::now();
        RolePermission {
            id: Uuid::new_v4(),
            role,
            workspace,
            can_view: flags.view,
            can_download: flags.download,
            can_archive_others: flags.archive,
            can_manage_workspace: flags.manage,
            created_at: now,
            updated_at: now,
        }
    }

    fn make_resolver() -> PermissionResolver {
        PermissionResolver::new(PermissionMatrix::from_rows([
            row(
                Role::FinanceSecretary,
                Workspace::Finance,
                PermissionFlags::all(),
            ),
            row(
                Role::FinanceSecretary,
                Workspace::Administration,
                PermissionFlags {
                    view: true,
                    download: true,
                    ..Default::default()
                },
            ),
            row(
                Role::CommissionMember,
                Workspace::Legal,
                PermissionFlags {
                    view: true,
                    ..Default::default()
                },
            ),
        ]))
    }

    #[test]
    fn test_resolve_partitions_workspaces() {
        let resolved = make_resolver().resolve(Role::FinanceSecretary);

        assert!(resolved.can_view.contains(&Workspace::Finance));
        assert!(resolved.can_view.contains(&Workspace::Administration));
        assert!(resolved.can_manage.contains(&Workspace::Finance));
        assert!(!resolved.can_manage.contains(&Workspace::Administration));
        assert!(!resolved.can_archive.contains(&Workspace::Administration));
    }

    #[test]
    fn test_role_without_rows_resolves_empty() {
        let resolved = make_resolver().resolve(Role::TerritorialOfficer);
        assert!(resolved.is_empty());

        let resolver = make_resolver();
        for action in [
            PermissionAction::View,
            PermissionAction::Download,
            PermissionAction::Archive,
            PermissionAction::Manage,
        ] {
            assert!(!resolver.can_perform(Role::TerritorialOfficer, action, None));
            for ws in Workspace::ALL {
                assert!(!resolver.can_perform(Role::TerritorialOfficer, action, Some(ws)));
            }
        }
    }

    #[test]
    fn test_can_perform_scoped_and_coarse() {
        let resolver = make_resolver();

        assert!(resolver.can_perform(
            Role::CommissionMember,
            PermissionAction::View,
            Some(Workspace::Legal)
        ));
        assert!(!resolver.can_perform(
            Role::CommissionMember,
            PermissionAction::View,
            Some(Workspace::Finance)
        ));

        // Coarse check: holds the capability in at least one workspace.
        assert!(resolver.can_perform(Role::CommissionMember, PermissionAction::View, None));
        assert!(!resolver.can_perform(Role::CommissionMember, PermissionAction::Manage, None));
    }
}
