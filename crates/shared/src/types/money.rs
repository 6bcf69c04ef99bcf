//! Money type with decimal precision and currency.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! This type wraps `rust_decimal::Decimal` for arbitrary precision.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Represents a monetary amount with currency.
///
/// Uses `Decimal` internally to avoid floating-point precision errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// The amount with two decimal places for BRL.
    pub amount: Decimal,
    /// ISO 4217 currency code (e.g., "BRL", "USD").
    pub currency: Currency,
}

/// ISO 4217 currency codes supported by the system.
///
/// BRL is the functional currency; the others appear on import/export
/// operations only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Brazilian Real
    Brl,
    /// US Dollar
    Usd,
    /// Euro
    Eur,
}

impl Money {
    /// Creates a new Money instance.
    #[must_use]
    pub const fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Creates an amount in the functional currency (BRL).
    #[must_use]
    pub const fn brl(amount: Decimal) -> Self {
        Self {
            amount,
            currency: Currency::Brl,
        }
    }

    /// Creates a zero amount in the specified currency.
    #[must_use]
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative()
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Brl => write!(f, "BRL"),
            Self::Usd => write!(f, "USD"),
            Self::Eur => write!(f, "EUR"),
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "BRL" => Ok(Self::Brl),
            "USD" => Ok(Self::Usd),
            "EUR" => Ok(Self::Eur),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[test]
    fn test_money_new() {
        let amount = dec!(100.00);
        let money = Money::new(amount, Currency::Brl);
        assert_eq!(money.amount, amount);
        assert_eq!(money.currency, Currency::Brl);
    }

    #[test]
    fn test_money_brl() {
        let money = Money::brl(dec!(10000.00));
        assert_eq!(money.currency, Currency::Brl);
        assert_eq!(money.amount, dec!(10000.00));
    }

    #[test]
    fn test_money_zero() {
        let money = Money::zero(Currency::Brl);
        assert!(money.is_zero());
        assert_eq!(money.amount, Decimal::ZERO);
    }

    #[test]
    fn test_money_is_negative() {
        assert!(!Money::brl(dec!(10)).is_negative());
        assert!(Money::brl(dec!(-10)).is_negative());
        assert!(!Money::brl(dec!(0)).is_negative());
    }

    #[rstest]
    #[case("BRL", Currency::Brl)]
    #[case("brl", Currency::Brl)]
    #[case("USD", Currency::Usd)]
    #[case("EUR", Currency::Eur)]
    fn test_currency_from_str(#[case] input: &str, #[case] expected: Currency) {
        assert_eq!(Currency::from_str(input).unwrap(), expected);
        assert_eq!(Currency::from_str(&expected.to_string()).unwrap(), expected);
    }

    #[test]
    fn test_currency_from_str_error() {
        assert!(Currency::from_str("XXX").is_err());
        assert!(Currency::from_str("").is_err());
    }
}
