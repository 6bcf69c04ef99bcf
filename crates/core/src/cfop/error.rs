//! CFOP determination error types.

use thiserror::Error;

use fiscus_shared::ErrorClass;

use crate::cfop::types::{JurisdictionScope, OperationNature, TaxpayerType};

/// Errors that can occur during CFOP determination.
#[derive(Debug, Error)]
pub enum CfopError {
    /// No rule, including fallbacks, applies to the inputs. The rule table
    /// must be patched; the caller must not invent a default code.
    #[error("no CFOP rule matches scope {scope}, nature {nature}, taxpayer {taxpayer}")]
    NoMatchingRule {
        /// The derived jurisdiction scope.
        scope: JurisdictionScope,
        /// The operation nature.
        nature: OperationNature,
        /// The counterparty taxpayer type.
        taxpayer: TaxpayerType,
    },

    /// The code is not a valid 4-digit CFOP.
    #[error("invalid CFOP code {0}")]
    InvalidCode(u16),

    /// The UF is not one of the 27 Brazilian states or EX (abroad).
    #[error("invalid UF {0}")]
    InvalidUf(String),
}

impl CfopError {
    /// Returns the error taxonomy class.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::NoMatchingRule { .. } => ErrorClass::RuleGap,
            Self::InvalidCode(_) | Self::InvalidUf(_) => ErrorClass::Validation,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NoMatchingRule { .. } => "NO_MATCHING_RULE",
            Self::InvalidCode(_) => "INVALID_CFOP_CODE",
            Self::InvalidUf(_) => "INVALID_UF",
        }
    }

    /// Returns true when the caller may retry without changing anything.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        false
    }
}
