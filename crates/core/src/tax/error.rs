//! Tax calculation error types.

use rust_decimal::Decimal;
use thiserror::Error;

use fiscus_shared::ErrorClass;

use crate::tax::types::{ServiceCategory, TaxKind};

/// Errors that can occur during withholding calculation.
#[derive(Debug, Error)]
pub enum TaxError {
    /// The rate table has no entry covering the category at the
    /// transaction date. Operators must register the missing rule; the
    /// caller cannot fix this by changing the request.
    #[error("no rate rule covers category {category} at {date}")]
    InvalidCategory {
        /// The uncovered service category.
        category: ServiceCategory,
        /// The transaction date the lookup ran against.
        date: chrono::NaiveDate,
    },

    /// A computed taxable base came out negative under strict mode.
    #[error("computed base {base} for {kind} is negative")]
    NegativeBase {
        /// The tax kind whose base went negative.
        kind: TaxKind,
        /// The negative base value.
        base: Decimal,
    },
}

impl TaxError {
    /// Returns the error taxonomy class.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidCategory { .. } => ErrorClass::RuleGap,
            Self::NegativeBase { .. } => ErrorClass::Validation,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCategory { .. } => "INVALID_CATEGORY",
            Self::NegativeBase { .. } => "NEGATIVE_BASE",
        }
    }

    /// Returns true when the caller may retry without changing anything.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[test]
    fn test_invalid_category_is_rule_gap() {
        let err = TaxError::InvalidCategory {
            category: ServiceCategory::FreightTransport,
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        };
        assert_eq!(err.class(), ErrorClass::RuleGap);
        assert_eq!(err.error_code(), "INVALID_CATEGORY");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_negative_base_is_validation() {
        let err = TaxError::NegativeBase {
            kind: TaxKind::Iss,
            base: dec!(-10),
        };
        assert_eq!(err.class(), ErrorClass::Validation);
        assert_eq!(err.error_code(), "NEGATIVE_BASE");
    }
}
