//! CFOP determination for Fiscus.
//!
//! Resolves the 4-digit fiscal operation code from the jurisdiction pair,
//! operation nature, and taxpayer type. Determination is a pure rule-table
//! lookup: identical inputs always resolve to the same code, and a gap in
//! the rule table is a hard stop, never a silent default.
//!
//! # Modules
//!
//! - `types` - Code, jurisdiction, and rule types
//! - `rules` - The determination function and the builtin rule set
//! - `error` - CFOP-specific error types

pub mod error;
pub mod rules;
pub mod types;

#[cfg(test)]
mod rules_props;

pub use error::CfopError;
pub use rules::{brazil_default_rules, determine};
pub use types::{
    CfopCode, CfopDetermination, CfopRule, Justification, JurisdictionScope, OperationNature,
    TaxpayerType, Uf,
};
