//! Legal document status transitions and who may trigger them.
//!
//! Authorization (`can_transition`) and mutation (`apply`) are separate:
//! `apply` assumes the transition was already authorized and only computes
//! the new record.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use acta_core::{AppError, AppResult};
use acta_entity::document::{DocumentRecord, DocumentStatus};
use acta_entity::permission::PermissionAction;
use acta_entity::user::Role;

use crate::permission::PermissionResolver;

/// Why a transition was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransitionDenial {
    /// The (from, to) pair is not in the lifecycle table.
    IllegalTransition,
    /// The actor is neither the owner nor capability-granted on the
    /// document's workspace.
    NotOwnerAndNoPermission,
}

/// Structured outcome of a transition authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionCheck {
    /// Whether the transition may proceed.
    pub allowed: bool,
    /// The denial reason when not allowed.
    pub reason: Option<TransitionDenial>,
}

impl TransitionCheck {
    fn allowed() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    fn denied(reason: TransitionDenial) -> Self {
        Self {
            allowed: false,
            reason: Some(reason),
        }
    }
}

/// Capability that authorizes a non-owner to perform a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RequiredCapability {
    Manage,
    Archive,
    ArchiveOrManage,
}

/// The lifecycle table. `None` means the pair is illegal for everyone,
/// including the owner. Same-state pairs never reach this table.
fn transition_rule(from: DocumentStatus, to: DocumentStatus) -> Option<RequiredCapability> {
    use DocumentStatus::*;
    match (from, to) {
        (Draft, Stored) => Some(RequiredCapability::Manage),
        (Stored, Draft) => Some(RequiredCapability::Manage),
        (Stored, Archived) => Some(RequiredCapability::Archive),
        (Archived, Stored) => Some(RequiredCapability::ArchiveOrManage),
        // A draft must pass through `stored` before it can be archived,
        // and an archived document must be restored before re-drafting.
        (Draft, Archived) | (Archived, Draft) => None,
        (Draft, Draft) | (Stored, Stored) | (Archived, Archived) => None,
    }
}

/// Enforces the document lifecycle state machine.
#[derive(Debug, Clone)]
pub struct DocumentLifecycle {
    /// Resolver consulted when the actor is not the owner.
    resolver: Arc<PermissionResolver>,
}

impl DocumentLifecycle {
    /// Create a lifecycle enforcer over the given resolver.
    pub fn new(resolver: Arc<PermissionResolver>) -> Self {
        Self { resolver }
    }

    /// Check whether the actor may move the document to `target`.
    ///
    /// Legality of the (from, to) pair is decided first — an illegal pair
    /// is denied even for the owner. Ownership is evaluated next, then the
    /// workspace-scoped capability matching the transition.
    pub fn can_transition(
        &self,
        document: &DocumentRecord,
        actor_role: Role,
        actor_id: Uuid,
        target: DocumentStatus,
    ) -> TransitionCheck {
        if document.status == target {
            // Same-state no-op is always permitted.
            return TransitionCheck::allowed();
        }

        let Some(required) = transition_rule(document.status, target) else {
            return TransitionCheck::denied(TransitionDenial::IllegalTransition);
        };

        if document.is_owned_by(actor_id) {
            return TransitionCheck::allowed();
        }

        let workspace = Some(document.workspace);
        let granted = match required {
            RequiredCapability::Manage => {
                self.resolver
                    .can_perform(actor_role, PermissionAction::Manage, workspace)
            }
            RequiredCapability::Archive => {
                self.resolver
                    .can_perform(actor_role, PermissionAction::Archive, workspace)
            }
            RequiredCapability::ArchiveOrManage => {
                self.resolver
                    .can_perform(actor_role, PermissionAction::Archive, workspace)
                    || self
                        .resolver
                        .can_perform(actor_role, PermissionAction::Manage, workspace)
            }
        };

        if granted {
            TransitionCheck::allowed()
        } else {
            TransitionCheck::denied(TransitionDenial::NotOwnerAndNoPermission)
        }
    }

    /// `Result` form of [`can_transition`](Self::can_transition) for call
    /// sites that propagate with `?`.
    pub fn require_transition(
        &self,
        document: &DocumentRecord,
        actor_role: Role,
        actor_id: Uuid,
        target: DocumentStatus,
    ) -> AppResult<()> {
        let check = self.can_transition(document, actor_role, actor_id, target);
        match check.reason {
            None => Ok(()),
            Some(TransitionDenial::IllegalTransition) => {
                Err(AppError::new(
                    acta_core::ErrorKind::IllegalTransition,
                    format!(
                        "Cannot move a document from '{}' to '{}'",
                        document.status, target
                    ),
                ))
            }
            Some(TransitionDenial::NotOwnerAndNoPermission) => Err(AppError::new(
                acta_core::ErrorKind::NotOwnerAndNoPermission,
                "Only the owner or a permitted role may perform this transition",
            )),
        }
    }
}

/// Compute the record after moving to `target`, stamping transition times.
///
/// Entering `stored` stamps `stored_at` and clears `archived_at`; entering
/// `archived` stamps `archived_at`; returning to `draft` clears both. A
/// same-state apply returns the record unchanged. Authorization is **not**
/// re-checked here; callers go through
/// [`DocumentLifecycle::can_transition`] first.
pub fn apply(
    document: &DocumentRecord,
    target: DocumentStatus,
    now: DateTime<Utc>,
) -> DocumentRecord {
    let mut updated = document.clone();
    if document.status == target {
        return updated;
    }

    updated.status = target;
    match target {
        DocumentStatus::Draft => {
            updated.stored_at = None;
            updated.archived_at = None;
        }
        DocumentStatus::Stored => {
            updated.stored_at = Some(now);
            updated.archived_at = None;
        }
        DocumentStatus::Archived => {
            updated.archived_at = Some(now);
        }
    }
    updated
}

#[cfg(test)]
mod tests {
    use super::*;
    use acta_entity::permission::{PermissionFlags, RolePermission};
    use acta_entity::user::Workspace;

    use crate::permission::PermissionMatrix;

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

    /// Administration secretary manages Administration; territorial officer
    /// may archive there; commission member only views.
    fn make_lifecycle() -> DocumentLifecycle {
        let matrix = PermissionMatrix::from_rows([
            row(
                Role::AdministrationSecretary,
                Workspace::Administration,
                PermissionFlags {
                    view: true,
                    download: true,
                    archive: false,
                    manage: true,
                },
            ),
            row(
                Role::TerritorialOfficer,
                Workspace::Administration,
                PermissionFlags {
                    view: true,
                    download: false,
                    archive: true,
                    manage: false,
                },
            ),
            row(
                Role::CommissionMember,
                Workspace::Administration,
                PermissionFlags {
                    view: true,
                    ..Default::default()
                },
            ),
        ]);
        DocumentLifecycle::new(Arc::new(PermissionResolver::new(matrix)))
    }

    fn doc(status: DocumentStatus, owner: Uuid) -> DocumentRecord {
        let mut record = DocumentRecord::new_draft(Uuid::new_v4(), owner, Workspace::Administration);
        record.status = status;
        record
    }

    #[test]
    fn test_owner_may_store_and_revert_draft() {
        let lifecycle = make_lifecycle();
        let owner = Uuid::new_v4();
        let draft = doc(DocumentStatus::Draft, owner);

        let check =
            lifecycle.can_transition(&draft, Role::CommissionMember, owner, DocumentStatus::Stored);
        assert!(check.allowed);

        let stored = doc(DocumentStatus::Stored, owner);
        let check =
            lifecycle.can_transition(&stored, Role::CommissionMember, owner, DocumentStatus::Draft);
        assert!(check.allowed);
    }

    #[test]
    fn test_manager_may_store_someone_elses_draft() {
        let lifecycle = make_lifecycle();
        let draft = doc(DocumentStatus::Draft, Uuid::new_v4());

        let check = lifecycle.can_transition(
            &draft,
            Role::AdministrationSecretary,
            Uuid::new_v4(),
            DocumentStatus::Stored,
        );
        assert!(check.allowed);
    }

    #[test]
    fn test_archiver_without_manage_cannot_store_draft() {
        let lifecycle = make_lifecycle();
        let draft = doc(DocumentStatus::Draft, Uuid::new_v4());

        let check = lifecycle.can_transition(
            &draft,
            Role::TerritorialOfficer,
            Uuid::new_v4(),
            DocumentStatus::Stored,
        );
        assert!(!check.allowed);
        assert_eq!(
            check.reason,
            Some(TransitionDenial::NotOwnerAndNoPermission)
        );
    }

    #[test]
    fn test_archive_requires_archive_capability() {
        let lifecycle = make_lifecycle();
        let stored = doc(DocumentStatus::Stored, Uuid::new_v4());
        let actor = Uuid::new_v4();

        let check = lifecycle.can_transition(
            &stored,
            Role::TerritorialOfficer,
            actor,
            DocumentStatus::Archived,
        );
        assert!(check.allowed);

        let check = lifecycle.can_transition(
            &stored,
            Role::CommissionMember,
            actor,
            DocumentStatus::Archived,
        );
        assert!(!check.allowed);
        assert_eq!(
            check.reason,
            Some(TransitionDenial::NotOwnerAndNoPermission)
        );
    }

    #[test]
    fn test_restore_allows_archive_or_manage() {
        let lifecycle = make_lifecycle();
        let archived = doc(DocumentStatus::Archived, Uuid::new_v4());
        let actor = Uuid::new_v4();

        for role in [Role::TerritorialOfficer, Role::AdministrationSecretary] {
            let check = lifecycle.can_transition(&archived, role, actor, DocumentStatus::Stored);
            assert!(check.allowed, "{role} should be able to restore");
        }

        let check = lifecycle.can_transition(
            &archived,
            Role::CommissionMember,
            actor,
            DocumentStatus::Stored,
        );
        assert!(!check.allowed);
    }

    #[test]
    fn test_draft_cannot_skip_to_archived_even_for_owner() {
        let lifecycle = make_lifecycle();
        let owner = Uuid::new_v4();
        let draft = doc(DocumentStatus::Draft, owner);

        for (role, actor) in [
            (Role::CommissionMember, owner),
            (Role::AdministrationSecretary, Uuid::new_v4()),
            (Role::Admin, Uuid::new_v4()),
        ] {
            let check = lifecycle.can_transition(&draft, role, actor, DocumentStatus::Archived);
            assert!(!check.allowed);
            assert_eq!(check.reason, Some(TransitionDenial::IllegalTransition));
        }
    }

    #[test]
    fn test_same_state_is_a_permitted_noop() {
        let lifecycle = make_lifecycle();
        let stored = doc(DocumentStatus::Stored, Uuid::new_v4());

        // Even a role with no permissions at all may "transition" a
        // document to its current state.
        let check = lifecycle.can_transition(
            &stored,
            Role::CommissionMember,
            Uuid::new_v4(),
            DocumentStatus::Stored,
        );
        assert!(check.allowed);

        let applied = apply(&stored, DocumentStatus::Stored, Utc::now());
        assert_eq!(applied.stored_at, stored.stored_at);
        assert_eq!(applied.archived_at, stored.archived_at);
    }

    #[test]
    fn test_require_transition_maps_reasons_to_error_kinds() {
        let lifecycle = make_lifecycle();
        let draft = doc(DocumentStatus::Draft, Uuid::new_v4());

        let err = lifecycle
            .require_transition(
                &draft,
                Role::CommissionMember,
                Uuid::new_v4(),
                DocumentStatus::Archived,
            )
            .unwrap_err();
        assert_eq!(err.kind, acta_core::ErrorKind::IllegalTransition);

        let err = lifecycle
            .require_transition(
                &draft,
                Role::CommissionMember,
                Uuid::new_v4(),
                DocumentStatus::Stored,
            )
            .unwrap_err();
        assert_eq!(err.kind, acta_core::ErrorKind::NotOwnerAndNoPermission);
    }

    #[test]
    fn test_apply_stamps_and_clears() {
        let owner = Uuid::new_v4();
        let now = Utc::now();
        let draft = doc(DocumentStatus::Draft, owner);

        let stored = apply(&draft, DocumentStatus::Stored, now);
        assert_eq!(stored.status, DocumentStatus::Stored);
        assert_eq!(stored.stored_at, Some(now));
        assert_eq!(stored.archived_at, None);

        let archived = apply(&stored, DocumentStatus::Archived, now);
        assert_eq!(archived.status, DocumentStatus::Archived);
        assert_eq!(archived.archived_at, Some(now));
        assert_eq!(archived.stored_at, Some(now));

        let restored = apply(&archived, DocumentStatus::Stored, now);
        assert_eq!(restored.status, DocumentStatus::Stored);
        assert_eq!(restored.archived_at, None);
        assert_eq!(restored.stored_at, Some(now));

        let redrafted = apply(&restored, DocumentStatus::Draft, now);
        assert_eq!(redrafted.status, DocumentStatus::Draft);
        assert_eq!(redrafted.stored_at, None);
        assert_eq!(redrafted.archived_at, None);
    }
}
