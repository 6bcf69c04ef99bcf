//! Withholding tax calculation for Fiscus.
//!
//! Brazilian service transactions retain several taxes at source. This
//! module computes the full retained breakdown for a transaction from an
//! effective-dated rate table, so historical transactions always recompute
//! identically.
//!
//! # Modules
//!
//! - `types` - Transaction input and breakdown output types
//! - `tables` - Effective-dated rate rules and the builtin Brazilian table
//! - `calculator` - The pure breakdown computation
//! - `error` - Tax-specific error types

pub mod calculator;
pub mod error;
pub mod tables;
pub mod types;

#[cfg(test)]
mod calculator_props;

pub use calculator::WithholdingCalculator;
pub use error::TaxError;
pub use tables::{RateRule, RateTable};
pub use types::{
    ServiceCategory, TaxKind, TaxRegime, TaxableTransaction, WithholdingBreakdown, WithholdingLine,
};
