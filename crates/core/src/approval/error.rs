//! Approval workflow error types.

use thiserror::Error;

use fiscus_shared::ErrorClass;
use fiscus_shared::types::{ActorId, ApprovalRequestId};

use crate::approval::types::DecisionState;
use crate::ports::PortError;

/// Errors that can occur during approval operations.
#[derive(Debug, Error)]
pub enum ApprovalError {
    /// The request has already left Pending; no further decision is
    /// accepted.
    #[error("request already decided: state is {state}")]
    AlreadyDecided {
        /// The current decision state.
        state: DecisionState,
    },

    /// The actor authored the request and their role carries no
    /// self-approval exception.
    #[error("actor {actor} may not decide their own request")]
    SelfApprovalForbidden {
        /// The actor attempting the decision.
        actor: ActorId,
    },

    /// The decision requires notes for this subject kind.
    #[error("notes are required for this decision")]
    NotesRequired,

    /// The operation is not legal in the request's current state.
    #[error("operation not allowed in state {state}")]
    InvalidState {
        /// The current decision state.
        state: DecisionState,
    },

    /// Delegation resolution found a cycle and failed closed.
    #[error("delegation chain starting at {actor} contains a cycle")]
    DelegationCycle {
        /// The actor whose chain loops.
        actor: ActorId,
    },

    /// Request not found.
    #[error("approval request {0} not found")]
    NotFound(ApprovalRequestId),

    /// The request changed since it was loaded. Reload and retry.
    #[error("request was modified concurrently")]
    ConcurrentModification,

    /// Storage backend failure.
    #[error("storage error: {0}")]
    Storage(String),
}

impl ApprovalError {
    /// Returns the error taxonomy class.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::SelfApprovalForbidden { .. } | Self::NotesRequired => ErrorClass::Validation,

            Self::AlreadyDecided { .. }
            | Self::InvalidState { .. }
            | Self::NotFound(_)
            | Self::ConcurrentModification => ErrorClass::State,

            // A looping delegation chain is bad reference data an operator
            // must fix, not a user mistake.
            Self::DelegationCycle { .. } => ErrorClass::RuleGap,

            Self::Storage(_) => ErrorClass::Integration,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyDecided { .. } => "ALREADY_DECIDED",
            Self::SelfApprovalForbidden { .. } => "SELF_APPROVAL_FORBIDDEN",
            Self::NotesRequired => "NOTES_REQUIRED",
            Self::InvalidState { .. } => "INVALID_STATE",
            Self::DelegationCycle { .. } => "DELEGATION_CYCLE",
            Self::NotFound(_) => "REQUEST_NOT_FOUND",
            Self::ConcurrentModification => "CONCURRENT_MODIFICATION",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Returns true when the caller may reload and retry as-is.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrentModification)
    }

    /// Maps a port error for a specific request.
    #[must_use]
    pub fn from_port(err: PortError, id: ApprovalRequestId) -> Self {
        match err {
            PortError::NotFound => Self::NotFound(id),
            PortError::VersionConflict { .. } => Self::ConcurrentModification,
            PortError::Backend(message) => Self::Storage(message),
        }
    }
}
