//! Property-based tests for the reconciliation matcher.

use std::collections::HashSet;

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use fiscus_shared::config::ReconciliationConfig;
use fiscus_shared::types::{BankAccountId, BankTransactionId, FinancialTitleId};

use crate::reconciliation::matcher::ReconciliationMatcher;
use crate::reconciliation::types::{BankTransaction, FinancialTitle, TitleKind, TitleStatus};

fn arb_amount() -> impl Strategy<Value = Decimal> {
    (100i64..=10_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn arb_day() -> impl Strategy<Value = NaiveDate> {
    (1u32..=28).prop_map(|d| NaiveDate::from_ymd_opt(2024, 3, d).expect("valid day"))
}

fn arb_status() -> impl Strategy<Value = TitleStatus> {
    prop_oneof![
        Just(TitleStatus::Open),
        Just(TitleStatus::Overdue),
        Just(TitleStatus::Partial),
        Just(TitleStatus::Settled),
        Just(TitleStatus::Cancelled),
    ]
}

fn arb_descriptor() -> impl Strategy<Value = String> {
    prop::collection::vec("[A-Z]{2,8}|[0-9]{2,6}", 1..5).prop_map(|t| t.join(" "))
}

prop_compose! {
    fn arb_title(account: BankAccountId)(
        amount in arb_amount(),
        due in arb_day(),
        descriptor in arb_descriptor(),
        status in arb_status(),
    ) -> FinancialTitle {
        FinancialTitle {
            id: FinancialTitleId::new(),
            account,
            kind: TitleKind::Receivable,
            amount,
            open_amount: amount,
            due_date: due,
            descriptor,
            status,
        }
    }
}

prop_compose! {
    fn arb_txn(account: BankAccountId)(
        amount in arb_amount(),
        posted in arb_day(),
        descriptor in arb_descriptor(),
    ) -> BankTransaction {
        BankTransaction {
            id: BankTransactionId::new(),
            account,
            amount,
            posted_at: posted,
            descriptor,
        }
    }
}

fn arb_scenario() -> impl Strategy<Value = (Vec<BankTransaction>, Vec<FinancialTitle>)> {
    let account = BankAccountId::new();
    (
        prop::collection::vec(arb_txn(account), 1..6),
        prop::collection::vec(arb_title(account), 0..10),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A second run with the first run's applied links in place applies
    /// nothing further.
    #[test]
    fn prop_second_run_is_idempotent((batch, titles) in arb_scenario()) {
        let config = ReconciliationConfig::default();
        let first = ReconciliationMatcher::run(&batch, &titles, &HashSet::new(), &config);

        let linked: HashSet<BankTransactionId> = first
            .applied
            .iter()
            .map(|m| m.proposal.bank_transaction_id)
            .collect();
        let second = ReconciliationMatcher::run(&batch, &titles, &linked, &config);

        let second_applied: HashSet<BankTransactionId> = second
            .applied
            .iter()
            .map(|m| m.proposal.bank_transaction_id)
            .collect();
        prop_assert!(second_applied.is_disjoint(&linked));
        prop_assert_eq!(second.skipped_already_matched, linked.len());
    }

    /// Settled and cancelled titles never appear in any proposal.
    #[test]
    fn prop_dead_titles_are_never_proposed((batch, titles) in arb_scenario()) {
        let outcome = ReconciliationMatcher::run(
            &batch,
            &titles,
            &HashSet::new(),
            &ReconciliationConfig::default(),
        );

        let dead: HashSet<FinancialTitleId> = titles
            .iter()
            .filter(|t| !t.status.is_matchable())
            .map(|t| t.id)
            .collect();

        for proposal in outcome
            .applied
            .iter()
            .map(|m| &m.proposal)
            .chain(&outcome.suggestions)
        {
            prop_assert!(proposal.title_ids.iter().all(|id| !dead.contains(id)));
        }
    }

    /// No title is consumed by more than one proposal in a batch, and every
    /// confidence stays in `0..=1`.
    #[test]
    fn prop_titles_consumed_at_most_once((batch, titles) in arb_scenario()) {
        let outcome = ReconciliationMatcher::run(
            &batch,
            &titles,
            &HashSet::new(),
            &ReconciliationConfig::default(),
        );

        let mut seen: HashSet<FinancialTitleId> = HashSet::new();
        for proposal in outcome
            .applied
            .iter()
            .map(|m| &m.proposal)
            .chain(&outcome.suggestions)
        {
            prop_assert!(proposal.confidence >= Decimal::ZERO);
            prop_assert!(proposal.confidence <= Decimal::ONE);
            for id in &proposal.title_ids {
                prop_assert!(seen.insert(*id));
            }
        }
    }

    /// Applied settlements never exceed a title's open amount, and their sum
    /// never exceeds the bank amount.
    #[test]
    fn prop_settlements_stay_within_bounds((batch, titles) in arb_scenario()) {
        let outcome = ReconciliationMatcher::run(
            &batch,
            &titles,
            &HashSet::new(),
            &ReconciliationConfig::default(),
        );

        for applied in &outcome.applied {
            let txn = batch
                .iter()
                .find(|t| t.id == applied.proposal.bank_transaction_id)
                .expect("applied match references a batch transaction");
            let total: Decimal = applied.settlements.iter().map(|s| s.applied_amount).sum();
            prop_assert!(total <= txn.amount);

            for settlement in &applied.settlements {
                let title = titles
                    .iter()
                    .find(|t| t.id == settlement.title_id)
                    .expect("settlement references a known title");
                prop_assert!(settlement.applied_amount <= title.open_amount);
            }
        }
    }
}
