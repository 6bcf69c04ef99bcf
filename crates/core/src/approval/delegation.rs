//! Transitive delegation resolution.
//!
//! An actor can delegate decision authority for a time window, and the
//! delegate may themselves have delegated onward. Resolution follows the
//! chain to its end. A chain that loops back on itself fails closed:
//! nobody resolves, rather than risking an unbounded walk or an
//! unintended approver.

use chrono::{DateTime, Utc};
use std::collections::HashSet;

use fiscus_shared::types::ActorId;

use crate::approval::error::ApprovalError;
use crate::approval::types::Delegation;

/// Resolves the effective decider for an actor at an instant.
///
/// Follows active delegations transitively. When several delegations by
/// the same actor are active, the earliest `valid_from` wins (stable,
/// deterministic choice).
///
/// # Errors
///
/// Returns `ApprovalError::DelegationCycle` when the chain revisits an
/// actor.
pub fn resolve(
    actor: ActorId,
    at: DateTime<Utc>,
    delegations: &[Delegation],
) -> Result<ActorId, ApprovalError> {
    let mut visited = HashSet::new();
    let mut current = actor;

    loop {
        if !visited.insert(current) {
            return Err(ApprovalError::DelegationCycle { actor });
        }

        let next = delegations
            .iter()
            .filter(|d| d.actor == current && d.is_active(at))
            .min_by_key(|d| d.valid_from)
            .map(|d| d.delegate);

        match next {
            Some(delegate) => current = delegate,
            None => return Ok(current),
        }
    }
}

/// Answers whether `candidate` may decide on `nominal`'s behalf at the
/// given instant: either they are the nominal approver or the chain
/// resolves to them.
///
/// # Errors
///
/// Propagates `ApprovalError::DelegationCycle` from resolution.
pub fn is_effective_decider(
    nominal: ActorId,
    candidate: ActorId,
    at: DateTime<Utc>,
    delegations: &[Delegation],
) -> Result<bool, ApprovalError> {
    if nominal == candidate {
        return Ok(true);
    }
    Ok(resolve(nominal, at, delegations)? == candidate)
}
