//! Pure approval decision logic.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use fiscus_shared::config::ApprovalConfig;
use fiscus_shared::types::{ActorId, ApprovalRequestId};

use crate::approval::error::ApprovalError;
use crate::approval::types::{
    ActorRole, ApprovalRequest, Decision, DecisionRecord, DecisionState, SubjectKind,
};

/// Stateless engine for the approval workflow.
pub struct ApprovalEngine;

impl ApprovalEngine {
    /// Builds a freshly submitted request: Pending, empty history.
    #[must_use]
    pub fn submit(
        subject_kind: SubjectKind,
        subject_id: Uuid,
        requested_action: String,
        submitted_by: ActorId,
    ) -> ApprovalRequest {
        ApprovalRequest {
            id: ApprovalRequestId::new(),
            subject_kind,
            subject_id,
            requested_action,
            submitted_by,
            state: DecisionState::Pending,
            history: Vec::new(),
            version: 1,
        }
    }

    /// Applies a decision to a pending request.
    ///
    /// Returns the updated request with exactly one history entry
    /// appended. Approve and Reject are terminal; RequestChanges returns
    /// the request to an editable state without closing it.
    ///
    /// # Errors
    ///
    /// - `ApprovalError::AlreadyDecided` unless the request is Pending.
    /// - `ApprovalError::SelfApprovalForbidden` when the actor authored
    ///   the request and their role is not in the configured exception set.
    /// - `ApprovalError::NotesRequired` per the subject kind's rules.
    pub fn decide(
        request: &ApprovalRequest,
        actor: ActorId,
        role: ActorRole,
        decision: Decision,
        notes: Option<String>,
        config: &ApprovalConfig,
        now: DateTime<Utc>,
    ) -> Result<ApprovalRequest, ApprovalError> {
        if request.state != DecisionState::Pending {
            return Err(ApprovalError::AlreadyDecided {
                state: request.state,
            });
        }

        if actor == request.submitted_by && !Self::is_self_approval_exempt(role, config) {
            return Err(ApprovalError::SelfApprovalForbidden { actor });
        }

        request
            .subject_kind
            .validate_decision(decision, notes.as_deref())?;

        let mut updated = request.clone();
        updated.state = decision.resulting_state();
        updated.history.push(DecisionRecord {
            actor,
            decided_at: now,
            decision,
            notes,
        });
        Ok(updated)
    }

    /// Returns a ChangesRequested request to Pending for another round.
    ///
    /// # Errors
    ///
    /// Returns `ApprovalError::InvalidState` from any other state; terminal
    /// requests stay closed.
    pub fn resubmit(request: &ApprovalRequest) -> Result<ApprovalRequest, ApprovalError> {
        if request.state != DecisionState::ChangesRequested {
            return Err(ApprovalError::InvalidState {
                state: request.state,
            });
        }
        let mut updated = request.clone();
        updated.state = DecisionState::Pending;
        Ok(updated)
    }

    fn is_self_approval_exempt(role: ActorRole, config: &ApprovalConfig) -> bool {
        config
            .self_approval_exempt_roles
            .iter()
            .any(|exempt| exempt.eq_ignore_ascii_case(role.as_str()))
    }
}
