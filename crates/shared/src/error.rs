//! The error-class taxonomy shared by every component.
//!
//! Every component error enum maps each of its variants into exactly one
//! `ErrorClass`. The class decides how callers react: fix the input, reload
//! the entity, page an operator, or retry the integration.

use serde::{Deserialize, Serialize};

/// Coarse classification of component errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorClass {
    /// Input violates a business rule. The caller can fix the input and retry.
    Validation,
    /// The operation is not legal in the entity's current state. The caller
    /// must reload and re-decide; nothing was mutated.
    State,
    /// Reference data has a hole (no rule covers the case). An operator must
    /// register the missing rule; retrying without it will fail again.
    RuleGap,
    /// An external collaborator failed. The entity is untouched and the
    /// operation may be attempted again later.
    Integration,
}

impl ErrorClass {
    /// Returns the HTTP status code outer layers translate this class to.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::Validation => 400,
            Self::State => 409,
            Self::RuleGap => 422,
            Self::Integration => 502,
        }
    }

    /// Returns the class name for structured error payloads.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION",
            Self::State => "STATE",
            Self::RuleGap => "RULE_GAP",
            Self::Integration => "INTEGRATION",
        }
    }
}

impl std::fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
