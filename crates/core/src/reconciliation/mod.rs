//! Bank reconciliation for Fiscus.
//!
//! Matches imported bank statement lines against open financial titles.
//! Confident matches settle titles automatically; everything else is
//! surfaced as a suggestion for manual confirmation. Re-running a processed
//! batch is idempotent.
//!
//! # Modules
//!
//! - `types` - Bank transactions, titles, proposals, and batch outcomes
//! - `matcher` - The pure matching algorithm
//! - `service` - Batch orchestration over the title store port
//! - `error` - Reconciliation-specific error types

pub mod error;
pub mod matcher;
pub mod service;
pub mod types;

#[cfg(test)]
mod matcher_props;

pub use error::ReconciliationError;
pub use matcher::ReconciliationMatcher;
pub use service::ReconciliationService;
pub use types::{
    AppliedMatch, BankTransaction, BatchOutcome, FinancialTitle, MatchBasis, MatchProposal,
    Settlement, TitleKind, TitleStatus,
};
