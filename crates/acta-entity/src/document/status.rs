//! Document lifecycle status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    /// Being drafted; visible to its owner and workspace managers only.
    Draft,
    /// Filed in its workspace and visible per the permission matrix.
    Stored,
    /// Moved to the archive; read-only until restored.
    Archived,
}

impl DocumentStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Stored => "stored",
            Self::Archived => "archived",
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DocumentStatus {
    type Err = acta_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "stored" => Ok(Self::Stored),
            "archived" => Ok(Self::Archived),
            _ => Err(acta_core::AppError::validation(format!(
                "Invalid document status: '{s}'. Expected one of: draft, stored, archived"
            ))),
        }
    }
}
