//! Approval workflow domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use fiscus_shared::types::{ActorId, ApprovalRequestId};

use crate::approval::error::ApprovalError;

/// The kinds of subject an approval request can reference.
///
/// One tagged variant per decidable subject; kind-specific rules live in
/// [`SubjectKind::validate_decision`] rather than in per-kind workflow
/// copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectKind {
    /// Insurance/expense claim decision.
    Claim,
    /// Fiscal document issuance approval.
    FiscalDocument,
    /// Intercompany allocation reversal approval.
    AllocationReversal,
    /// Strategic plan (BSC/OKR) approval.
    StrategicPlan,
}

impl SubjectKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Claim => "claim",
            Self::FiscalDocument => "fiscal_document",
            Self::AllocationReversal => "allocation_reversal",
            Self::StrategicPlan => "strategic_plan",
        }
    }

    /// Parses a kind from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "claim" => Some(Self::Claim),
            "fiscal_document" => Some(Self::FiscalDocument),
            "allocation_reversal" => Some(Self::AllocationReversal),
            "strategic_plan" => Some(Self::StrategicPlan),
            _ => None,
        }
    }

    /// Kind-specific decision validation hook.
    ///
    /// Rejections and change requests always need notes; allocation
    /// reversals additionally require notes on approval because they move
    /// money between cost centers.
    pub fn validate_decision(
        &self,
        decision: Decision,
        notes: Option<&str>,
    ) -> Result<(), ApprovalError> {
        let has_notes = notes.is_some_and(|n| !n.trim().is_empty());
        let needs_notes = match decision {
            Decision::Reject | Decision::RequestChanges => true,
            Decision::Approve => matches!(self, Self::AllocationReversal),
        };
        if needs_notes && !has_notes {
            return Err(ApprovalError::NotesRequired);
        }
        Ok(())
    }
}

impl fmt::Display for SubjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Actor roles, ordered from lowest to highest authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorRole {
    /// Prepares and submits requests.
    Analyst,
    /// First-line approver.
    Supervisor,
    /// Department-level approver.
    Manager,
    /// Top-level approver.
    Director,
}

impl ActorRole {
    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Analyst => "analyst",
            Self::Supervisor => "supervisor",
            Self::Manager => "manager",
            Self::Director => "director",
        }
    }

    /// Parses a role from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "analyst" => Some(Self::Analyst),
            "supervisor" => Some(Self::Supervisor),
            "manager" => Some(Self::Manager),
            "director" => Some(Self::Director),
            _ => None,
        }
    }
}

impl fmt::Display for ActorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Current decision state of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionState {
    /// Awaiting a decision.
    Pending,
    /// Approved; terminal.
    Approved,
    /// Rejected; terminal.
    Rejected,
    /// Sent back for changes; editable and resubmittable.
    ChangesRequested,
}

impl DecisionState {
    /// Returns the string representation of the state.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::ChangesRequested => "changes_requested",
        }
    }

    /// Parses a state from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            "changes_requested" => Some(Self::ChangesRequested),
            _ => None,
        }
    }

    /// Returns true for terminal states (no further decisions accepted).
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl fmt::Display for DecisionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A decision an actor can take on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Approve the request (terminal).
    Approve,
    /// Reject the request (terminal).
    Reject,
    /// Send the request back for changes (non-terminal).
    RequestChanges,
}

impl Decision {
    /// The state the request enters after this decision.
    #[must_use]
    pub const fn resulting_state(&self) -> DecisionState {
        match self {
            Self::Approve => DecisionState::Approved,
            Self::Reject => DecisionState::Rejected,
            Self::RequestChanges => DecisionState::ChangesRequested,
        }
    }

    /// Returns the string representation of the decision.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::RequestChanges => "request_changes",
        }
    }

    /// Parses a decision from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "approve" => Some(Self::Approve),
            "reject" => Some(Self::Reject),
            "request_changes" => Some(Self::RequestChanges),
            _ => None,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry in a request's ordered decision history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRecord {
    /// Who decided.
    pub actor: ActorId,
    /// When the decision was recorded.
    pub decided_at: DateTime<Utc>,
    /// The decision taken.
    pub decision: Decision,
    /// Optional notes accompanying the decision.
    pub notes: Option<String>,
}

/// A time-bounded delegation of decision authority.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Delegation {
    /// The delegating actor.
    pub actor: ActorId,
    /// The delegate receiving the authority.
    pub delegate: ActorId,
    /// Start of the delegation window (inclusive).
    pub valid_from: DateTime<Utc>,
    /// End of the delegation window (inclusive).
    pub valid_until: DateTime<Utc>,
}

impl Delegation {
    /// Returns true when the delegation is active at the given instant.
    #[must_use]
    pub fn is_active(&self, at: DateTime<Utc>) -> bool {
        at >= self.valid_from && at <= self.valid_until
    }
}

/// A multi-party approval request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalRequest {
    /// Unique identifier.
    pub id: ApprovalRequestId,
    /// What kind of subject is being decided.
    pub subject_kind: SubjectKind,
    /// The subject entity's identifier.
    pub subject_id: Uuid,
    /// The action being requested, free-form.
    pub requested_action: String,
    /// The submitting actor; self-approval checks key on this.
    pub submitted_by: ActorId,
    /// Current decision state.
    pub state: DecisionState,
    /// Ordered decision history, oldest first.
    pub history: Vec<DecisionRecord>,
    /// Optimistic-lock version.
    pub version: i64,
}
