//! Intercompany cost allocation for Fiscus.
//!
//! A shared cost is distributed from a source cost center to targets, by
//! percentages or fixed amounts, with the sum invariant checked before
//! anything persists. Reversal is additive: a new compensating entry with
//! inverted signs references the original, which can be reversed only once.
//!
//! # Modules
//!
//! - `types` - Entry, target, and share types
//! - `engine` - Pure validation, resolution, and reversal construction
//! - `service` - Orchestration over the allocation store
//! - `error` - Allocation-specific error types

pub mod engine;
pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod engine_props;

pub use engine::AllocationEngine;
pub use error::AllocationError;
pub use service::AllocationService;
pub use types::{AllocationEntry, AllocationMode, AllocationTarget, ResolvedTarget, TargetShare};
