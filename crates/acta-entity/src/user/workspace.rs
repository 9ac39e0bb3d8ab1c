//! Workspace (department) enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Organizational departments scoping documents and permission grants.
///
/// A user has exactly one home workspace but may hold cross-workspace
/// capabilities via the role-permission matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "workspace", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Workspace {
    /// Office of the president.
    Presidency,
    /// General administration.
    Administration,
    /// Finance and accounting.
    Finance,
    /// Legal affairs.
    Legal,
    /// Communications and press.
    Communications,
    /// Historical archive.
    Archive,
}

impl Workspace {
    /// Every workspace, in declaration order.
    pub const ALL: [Workspace; 6] = [
        Workspace::Presidency,
        Workspace::Administration,
        Workspace::Finance,
        Workspace::Legal,
        Workspace::Communications,
        Workspace::Archive,
    ];

    /// Return the workspace as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Presidency => "presidency",
            Self::Administration => "administration",
            Self::Finance => "finance",
            Self::Legal => "legal",
            Self::Communications => "communications",
            Self::Archive => "archive",
        }
    }
}

impl fmt::Display for Workspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Workspace {
    type Err = acta_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Workspace::ALL
            .iter()
            .find(|w| w.as_str() == s.to_lowercase())
            .copied()
            .ok_or_else(|| {
                acta_core::AppError::validation(format!(
                    "Invalid workspace: '{s}'. Expected one of: presidency, administration, \
                     finance, legal, communications, archive"
                ))
            })
    }
}
