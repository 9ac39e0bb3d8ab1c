//! Permission action definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Actions that can be checked against the role-permission matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionAction {
    /// View documents in a workspace.
    View,
    /// Download document content from a workspace.
    Download,
    /// Archive documents owned by other users in a workspace.
    Archive,
    /// Manage a workspace (store, revert, and reorganize any document in it).
    Manage,
}

impl PermissionAction {
    /// Return the action as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Download => "download",
            Self::Archive => "archive",
            Self::Manage => "manage",
        }
    }
}

impl fmt::Display for PermissionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PermissionAction {
    type Err = acta_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "view" => Ok(Self::View),
            "download" => Ok(Self::Download),
            "archive" => Ok(Self::Archive),
            "manage" => Ok(Self::Manage),
            _ => Err(acta_core::AppError::validation(format!(
                "Invalid permission action: '{s}'. Expected one of: view, download, archive, manage"
            ))),
        }
    }
}
