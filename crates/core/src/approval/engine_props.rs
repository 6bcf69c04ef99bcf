//! Property-based tests for the approval engine and delegation resolution.

use chrono::{Duration, Utc};
use proptest::prelude::*;
use uuid::Uuid;

use fiscus_shared::config::ApprovalConfig;
use fiscus_shared::types::ActorId;

use crate::approval::delegation::resolve;
use crate::approval::engine::ApprovalEngine;
use crate::approval::error::ApprovalError;
use crate::approval::types::{ActorRole, Decision, Delegation, SubjectKind};

fn arb_kind() -> impl Strategy<Value = SubjectKind> {
    prop_oneof![
        Just(SubjectKind::Claim),
        Just(SubjectKind::FiscalDocument),
        Just(SubjectKind::AllocationReversal),
        Just(SubjectKind::StrategicPlan),
    ]
}

fn arb_role() -> impl Strategy<Value = ActorRole> {
    prop_oneof![
        Just(ActorRole::Analyst),
        Just(ActorRole::Supervisor),
        Just(ActorRole::Manager),
        Just(ActorRole::Director),
    ]
}

fn arb_decision() -> impl Strategy<Value = Decision> {
    prop_oneof![
        Just(Decision::Approve),
        Just(Decision::Reject),
        Just(Decision::RequestChanges),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every accepted decision appends exactly one history entry, and the
    /// resulting state follows the decision.
    #[test]
    fn prop_decision_appends_exactly_one_entry(
        kind in arb_kind(),
        role in arb_role(),
        decision in arb_decision(),
    ) {
        let request = ApprovalEngine::submit(
            kind,
            Uuid::new_v4(),
            "action".to_string(),
            ActorId::new(),
        );
        let result = ApprovalEngine::decide(
            &request,
            ActorId::new(),
            role,
            decision,
            Some("covers every kind's notes rule".to_string()),
            &ApprovalConfig::default(),
            Utc::now(),
        );
        let updated = result.unwrap();
        prop_assert_eq!(updated.history.len(), request.history.len() + 1);
        prop_assert_eq!(updated.state, decision.resulting_state());
    }

    /// The author can never decide their own request under the default
    /// (empty) exception set, whatever their role.
    #[test]
    fn prop_self_approval_always_forbidden_by_default(
        kind in arb_kind(),
        role in arb_role(),
        decision in arb_decision(),
    ) {
        let author = ActorId::new();
        let request = ApprovalEngine::submit(
            kind,
            Uuid::new_v4(),
            "action".to_string(),
            author,
        );
        let result = ApprovalEngine::decide(
            &request,
            author,
            role,
            decision,
            Some("notes".to_string()),
            &ApprovalConfig::default(),
            Utc::now(),
        );
        let is_self_approval_err =
            matches!(result, Err(ApprovalError::SelfApprovalForbidden { .. }));
        prop_assert!(is_self_approval_err);
    }

    /// Resolution over an arbitrary delegation graph always terminates:
    /// either with an actor or with a cycle error, never by hanging.
    #[test]
    fn prop_delegation_resolution_terminates(
        edges in prop::collection::vec((0usize..6, 0usize..6), 0..12),
        start in 0usize..6,
    ) {
        let now = Utc::now();
        let actors: Vec<ActorId> = (0..6).map(|_| ActorId::new()).collect();
        let delegations: Vec<Delegation> = edges
            .into_iter()
            .map(|(from, to)| Delegation {
                actor: actors[from],
                delegate: actors[to],
                valid_from: now - Duration::days(1),
                valid_until: now + Duration::days(1),
            })
            .collect();

        match resolve(actors[start], now, &delegations) {
            Ok(resolved) => {
                // The resolved actor has no further active delegation.
                let onward = delegations
                    .iter()
                    .any(|d| d.actor == resolved && d.is_active(now));
                // With duplicate edges the earliest-from tie-break still
                // leaves exactly one onward hop, so a resolved endpoint
                // must be hop-free.
                prop_assert!(!onward);
            }
            Err(ApprovalError::DelegationCycle { .. }) => {}
            Err(other) => prop_assert!(false, "unexpected error: {other}"),
        }
    }
}
