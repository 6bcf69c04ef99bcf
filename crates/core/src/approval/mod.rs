//! Approval/decision workflow for Fiscus.
//!
//! One generic engine serves every decidable subject: claims, fiscal
//! document approvals, allocation reversals, and strategic plans. A
//! request carries its full ordered decision history; Approved/Rejected
//! are terminal, ChangesRequested sends the request back to an editable
//! state. Delegations resolve transitively with a cycle guard.
//!
//! # Modules
//!
//! - `types` - Request, decision, and delegation types
//! - `engine` - Pure submit/decide/resubmit logic
//! - `delegation` - Transitive delegation resolution
//! - `service` - Orchestration over the approval store
//! - `error` - Approval-specific error types

pub mod delegation;
pub mod engine;
pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod engine_props;

pub use delegation::{is_effective_decider, resolve};
pub use engine::ApprovalEngine;
pub use error::ApprovalError;
pub use service::ApprovalService;
pub use types::{
    ActorRole, ApprovalRequest, Decision, DecisionRecord, DecisionState, Delegation, SubjectKind,
};
