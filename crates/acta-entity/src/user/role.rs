//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles available in the portal.
///
/// The set is closed: permissions are resolved from the role-permission
/// matrix, and a new role means a new variant here plus matrix rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full system administrator. The only role that may register users.
    Admin,
    /// Federation president.
    President,
    /// Federation vice-president.
    VicePresident,
    /// Secretary of the administration department.
    AdministrationSecretary,
    /// Secretary of the finance department.
    FinanceSecretary,
    /// Secretary of the legal department.
    LegalSecretary,
    /// Secretary of the communications department.
    CommunicationsSecretary,
    /// Officer representing a territorial delegation.
    TerritorialOfficer,
    /// Member of a standing commission.
    CommissionMember,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Role; 9] = [
        Role::Admin,
        Role::President,
        Role::VicePresident,
        Role::AdministrationSecretary,
        Role::FinanceSecretary,
        Role::LegalSecretary,
        Role::CommunicationsSecretary,
        Role::TerritorialOfficer,
        Role::CommissionMember,
    ];

    /// Check if this role is the top administrative role.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Return the role as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::President => "president",
            Self::VicePresident => "vice_president",
            Self::AdministrationSecretary => "administration_secretary",
            Self::FinanceSecretary => "finance_secretary",
            Self::LegalSecretary => "legal_secretary",
            Self::CommunicationsSecretary => "communications_secretary",
            Self::TerritorialOfficer => "territorial_officer",
            Self::CommissionMember => "commission_member",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = acta_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .iter()
            .find(|r| r.as_str() == s.to_lowercase())
            .copied()
            .ok_or_else(|| {
                acta_core::AppError::validation(format!(
                    "Invalid role: '{s}'. Expected one of: admin, president, vice_president, \
                     administration_secretary, finance_secretary, legal_secretary, \
                     communications_secretary, territorial_officer, commission_member"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_covers_every_variant() {
        // Round-trip through as_str keeps ALL and the match in sync.
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_from_str() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(
            "VICE_PRESIDENT".parse::<Role>().unwrap(),
            Role::VicePresident
        );
        assert!("chairman".parse::<Role>().is_err());
    }

    #[test]
    fn test_only_admin_is_admin() {
        for role in Role::ALL {
            assert_eq!(role.is_admin(), role == Role::Admin);
        }
    }
}
