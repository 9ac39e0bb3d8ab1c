//! # acta-entity
//!
//! Domain entity models for the Acta portal: users, the role and workspace
//! enumerations, the role-permission matrix rows, and the document record
//! consumed by the lifecycle state machine.

pub mod document;
pub mod permission;
pub mod user;

pub use document::{DocumentRecord, DocumentStatus};
pub use permission::{PermissionAction, PermissionFlags, RolePermission};
pub use user::{Role, User, Workspace};
