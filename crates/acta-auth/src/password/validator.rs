//! Password strength policy.
//!
//! `validate_strength` is a pure function over the candidate password and
//! an optional identity context; it returns every violation found rather
//! than the first, so callers can surface the full list.

use serde::{Deserialize, Serialize};
use std::fmt;

use acta_core::config::auth::AuthConfig;
use acta_core::error::AppError;

/// Common sequences that never pass, regardless of the rest of the password.
const COMMON_SEQUENCES: &[&str] = &[
    "password", "qwerty", "123456", "abcdef", "letmein", "iloveyou", "admin",
];

/// Identity context for personalized checks.
///
/// Passwords must not contain fragments of who the user is.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrengthContext<'a> {
    /// The user's email address.
    pub email: Option<&'a str>,
    /// The user's full name.
    pub full_name: Option<&'a str>,
}

/// A single reason a password was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "violation", content = "detail")]
pub enum PasswordViolation {
    /// Shorter than the configured minimum.
    TooShort {
        /// The configured minimum length.
        minimum: usize,
    },
    /// No uppercase letter.
    MissingUppercase,
    /// No lowercase letter.
    MissingLowercase,
    /// No digit.
    MissingDigit,
    /// No symbol character.
    MissingSymbol,
    /// Contains a well-known weak sequence.
    CommonSequence(String),
    /// Contains a fragment of the user's email local-part.
    ContainsEmailFragment,
    /// Contains a fragment of the user's name.
    ContainsNameFragment,
    /// Contains an organization-forbidden term.
    ContainsForbiddenTerm(String),
    /// Estimated too guessable overall.
    LowEntropy,
}

impl fmt::Display for PasswordViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { minimum } => {
                write!(f, "must be at least {minimum} characters long")
            }
            Self::MissingUppercase => write!(f, "must contain an uppercase letter"),
            Self::MissingLowercase => write!(f, "must contain a lowercase letter"),
            Self::MissingDigit => write!(f, "must contain a digit"),
            Self::MissingSymbol => write!(f, "must contain a symbol"),
            Self::CommonSequence(seq) => write!(f, "must not contain '{seq}'"),
            Self::ContainsEmailFragment => write!(f, "must not contain parts of your email"),
            Self::ContainsNameFragment => write!(f, "must not contain parts of your name"),
            Self::ContainsForbiddenTerm(term) => write!(f, "must not contain '{term}'"),
            Self::LowEntropy => write!(f, "is too easy to guess"),
        }
    }
}

/// Outcome of a strength check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrengthReport {
    /// Whether the password is acceptable (zero violations).
    pub valid: bool,
    /// Every violation found.
    pub violations: Vec<PasswordViolation>,
}

impl StrengthReport {
    /// Convert a failed report into a weak-password error listing the
    /// violations.
    pub fn to_error(&self) -> AppError {
        let reasons = self
            .violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        AppError::weak_password(format!("Password {reasons}"))
    }
}

/// Validates password strength against the configured policy.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    /// Minimum password length.
    min_length: usize,
    /// Organization-specific forbidden terms, lowercased.
    forbidden_terms: Vec<String>,
}

impl PasswordValidator {
    /// Create a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
            forbidden_terms: config
                .forbidden_terms
                .iter()
                .map(|t| t.to_lowercase())
                .collect(),
        }
    }

    /// Check a candidate password against every policy rule.
    ///
    /// Pure: no side effects, no clock, no I/O.
    pub fn validate_strength(&self, password: &str, context: &StrengthContext) -> StrengthReport {
        let mut violations = Vec::new();
        let lowered = password.to_lowercase();

        if password.chars().count() < self.min_length {
            violations.push(PasswordViolation::TooShort {
                minimum: self.min_length,
            });
        }

        if !password.chars().any(|c| c.is_uppercase()) {
            violations.push(PasswordViolation::MissingUppercase);
        }
        if !password.chars().any(|c| c.is_lowercase()) {
            violations.push(PasswordViolation::MissingLowercase);
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            violations.push(PasswordViolation::MissingDigit);
        }
        if !password.chars().any(|c| !c.is_alphanumeric()) {
            violations.push(PasswordViolation::MissingSymbol);
        }

        for seq in COMMON_SEQUENCES {
            if lowered.contains(seq) {
                violations.push(PasswordViolation::CommonSequence((*seq).to_string()));
            }
        }

        let local_part = context.email.map(email_local_part);
        if let Some(local) = local_part {
            if shares_fragment(&lowered, local) {
                violations.push(PasswordViolation::ContainsEmailFragment);
            }
        }

        if let Some(name) = context.full_name {
            let hit = name
                .split(|c: char| !c.is_alphanumeric())
                .filter(|fragment| fragment.chars().count() > 2)
                .any(|fragment| lowered.contains(&fragment.to_lowercase()));
            if hit {
                violations.push(PasswordViolation::ContainsNameFragment);
            }
        }

        for term in &self.forbidden_terms {
            if lowered.contains(term) {
                violations.push(PasswordViolation::ContainsForbiddenTerm(term.clone()));
            }
        }

        // Entropy floor on top of the structural rules.
        let mut user_inputs: Vec<&str> = Vec::new();
        if let Some(email) = context.email {
            user_inputs.push(email);
        }
        if let Some(local) = local_part {
            user_inputs.push(local);
        }
        if let Some(name) = context.full_name {
            user_inputs.push(name);
        }
        let estimate = zxcvbn::zxcvbn(password, &user_inputs);
        if estimate.score() < zxcvbn::Score::Three {
            violations.push(PasswordViolation::LowEntropy);
        }

        StrengthReport {
            valid: violations.is_empty(),
            violations,
        }
    }
}

/// The part of an email address before the `@`.
fn email_local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

/// Whether `password` shares any substring of three or more characters
/// with `source`. Checking every 3-character window is equivalent: a longer
/// shared substring always contains a 3-character one.
fn shares_fragment(password: &str, source: &str) -> bool {
    let source = source.to_lowercase();
    let chars: Vec<char> = source.chars().collect();
    if chars.len() < 3 {
        return false;
    }
    chars.windows(3).any(|window| {
        let fragment: String = window.iter().collect();
        password.contains(&fragment)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_validator() -> PasswordValidator {
        PasswordValidator::new(&AuthConfig::default())
    }

    fn no_context() -> StrengthContext<'static> {
        StrengthContext::default()
    }

    #[test]
    fn test_strong_password_accepted() {
        let report = make_validator().validate_strength("Str0ng!Pass99", &no_context());
        assert!(report.valid, "unexpected violations: {:?}", report.violations);
    }

    #[test]
    fn test_missing_character_classes_reported() {
        let report = make_validator().validate_strength("abc12345", &no_context());
        assert!(!report.valid);
        assert!(report.violations.contains(&PasswordViolation::MissingUppercase));
        assert!(report.violations.contains(&PasswordViolation::MissingSymbol));
    }

    #[test]
    fn test_table_of_structural_violations() {
        let validator = make_validator();
        let cases: &[(&str, PasswordViolation)] = &[
            ("Ab1!", PasswordViolation::TooShort { minimum: 10 }),
            ("lower-case-0nly!", PasswordViolation::MissingUppercase),
            ("UPPER-CASE-0NLY!", PasswordViolation::MissingLowercase),
            ("No-Digits-Here!", PasswordViolation::MissingDigit),
            ("NoSymbols4Here", PasswordViolation::MissingSymbol),
            (
                "MyPassword99!",
                PasswordViolation::CommonSequence("password".to_string()),
            ),
            (
                "ActaRules99!x",
                PasswordViolation::ContainsForbiddenTerm("acta".to_string()),
            ),
        ];

        for (password, expected) in cases {
            let report = validator.validate_strength(password, &no_context());
            assert!(
                report.violations.contains(expected),
                "expected {expected:?} for '{password}', got {:?}",
                report.violations
            );
        }
    }

    #[test]
    fn test_email_fragment_rejected() {
        let context = StrengthContext {
            email: Some("nuria.soler@example.org"),
            full_name: None,
        };
        let report = make_validator().validate_strength("xxSoler!42xxQ", &context);
        assert!(report
            .violations
            .contains(&PasswordViolation::ContainsEmailFragment));
    }

    #[test]
    fn test_name_fragment_rejected() {
        let context = StrengthContext {
            email: None,
            full_name: Some("Nuria Soler"),
        };
        let report = make_validator().validate_strength("Best-Nuria-99!", &context);
        assert!(report
            .violations
            .contains(&PasswordViolation::ContainsNameFragment));
    }

    #[test]
    fn test_short_name_fragments_ignored() {
        // Two-character fragments are too common to forbid.
        let context = StrengthContext {
            email: Some("jo@example.org"),
            full_name: Some("Jo Vi"),
        };
        let report = make_validator().validate_strength("Bright-J0urnal-7!", &context);
        assert!(!report
            .violations
            .contains(&PasswordViolation::ContainsEmailFragment));
        assert!(!report
            .violations
            .contains(&PasswordViolation::ContainsNameFragment));
    }

    #[test]
    fn test_low_entropy_rejected() {
        let report = make_validator().validate_strength("Aa1!Aa1!Aa1!", &no_context());
        assert!(report.violations.contains(&PasswordViolation::LowEntropy));
    }

    #[test]
    fn test_report_to_error_lists_violations() {
        let report = make_validator().validate_strength("abc12345", &no_context());
        let err = report.to_error();
        assert_eq!(err.kind, acta_core::ErrorKind::WeakPassword);
        assert!(err.message.contains("uppercase"));
    }
}
