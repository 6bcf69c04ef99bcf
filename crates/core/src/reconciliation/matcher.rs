//! Pure matching over a batch of bank transactions and open titles.
//!
//! The matcher is a fold over caller-supplied data: no clock, no storage.
//! Confidence blends an amount component, a date-proximity component, and a
//! descriptor-token tie-break. Auto-apply is reserved for proposals at or
//! above the configured threshold; everything else becomes a suggestion.

use std::cmp::Reverse;
use std::collections::HashSet;

use rust_decimal::Decimal;

use fiscus_shared::config::ReconciliationConfig;
use fiscus_shared::types::{BankTransactionId, FinancialTitleId};

use crate::reconciliation::types::{
    AppliedMatch, BankTransaction, BatchOutcome, FinancialTitle, MatchBasis, MatchProposal,
    Settlement, TitleStatus,
};

/// Confidence weight of the amount component.
const WEIGHT_AMOUNT: Decimal = Decimal::from_parts(60, 0, 0, false, 2);
/// Confidence weight of the date-proximity component.
const WEIGHT_DATE: Decimal = Decimal::from_parts(25, 0, 0, false, 2);
/// Confidence weight of the descriptor-similarity component.
const WEIGHT_DESCRIPTOR: Decimal = Decimal::from_parts(15, 0, 0, false, 2);

/// Stateless reconciliation matcher.
pub struct ReconciliationMatcher;

impl ReconciliationMatcher {
    /// Matches a batch against the candidate titles.
    ///
    /// `already_linked` holds bank transaction IDs that carry a
    /// reconciliation link from a previous run; those are skipped and
    /// counted, which makes re-running a processed batch a no-op.
    ///
    /// Each title and each bank transaction is consumed by at most one
    /// proposal. Evaluation order is deterministic: confidence descending,
    /// then IDs.
    #[must_use]
    pub fn run(
        batch: &[BankTransaction],
        titles: &[FinancialTitle],
        already_linked: &HashSet<BankTransactionId>,
        config: &ReconciliationConfig,
    ) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();

        let mut candidates: Vec<MatchProposal> = Vec::new();
        for txn in batch {
            if already_linked.contains(&txn.id) {
                outcome.skipped_already_matched += 1;
                continue;
            }
            candidates.extend(proposals_for(txn, titles, config));
        }

        candidates.sort_by(|a, b| {
            Reverse(a.confidence)
                .cmp(&Reverse(b.confidence))
                .then(a.bank_transaction_id.cmp(&b.bank_transaction_id))
                .then(a.title_ids.cmp(&b.title_ids))
        });

        let mut consumed_titles: HashSet<FinancialTitleId> = HashSet::new();
        let mut consumed_txns: HashSet<BankTransactionId> = HashSet::new();

        for proposal in candidates {
            if consumed_txns.contains(&proposal.bank_transaction_id)
                || proposal.title_ids.iter().any(|t| consumed_titles.contains(t))
            {
                continue;
            }
            consumed_txns.insert(proposal.bank_transaction_id);
            consumed_titles.extend(proposal.title_ids.iter().copied());

            if proposal.confidence >= config.auto_apply_threshold {
                let txn = batch
                    .iter()
                    .find(|t| t.id == proposal.bank_transaction_id)
                    .expect("proposal came from this batch");
                let settlements = settle(txn, &proposal, titles, config.amount_tolerance);
                outcome.applied.push(AppliedMatch {
                    proposal,
                    settlements,
                });
            } else {
                outcome.suggestions.push(proposal);
            }
        }

        outcome
    }
}

/// All proposals a single bank transaction could support.
fn proposals_for(
    txn: &BankTransaction,
    titles: &[FinancialTitle],
    config: &ReconciliationConfig,
) -> Vec<MatchProposal> {
    let candidates: Vec<&FinancialTitle> = titles
        .iter()
        .filter(|t| {
            t.account == txn.account
                && t.status.is_matchable()
                && (t.due_date - txn.posted_at).num_days().abs() <= config.date_window_days
        })
        .collect();

    let mut proposals = Vec::new();

    for title in &candidates {
        let diff = (title.open_amount - txn.amount).abs();
        let basis = if diff == Decimal::ZERO {
            MatchBasis::ExactAmount
        } else if diff <= config.amount_tolerance {
            MatchBasis::AmountWithinTolerance
        } else {
            continue;
        };
        proposals.push(MatchProposal {
            bank_transaction_id: txn.id,
            title_ids: vec![title.id],
            confidence: confidence(txn, &[title], diff, config),
            basis,
        });
    }

    if config.max_combination_size >= 2 {
        let mut combo = Vec::new();
        combinations(
            txn,
            &candidates,
            0,
            Decimal::ZERO,
            &mut combo,
            config,
            &mut proposals,
        );
    }

    proposals
}

/// Bounded subset search for title combinations whose open amounts sum to
/// the bank amount within tolerance. Prunes on the running sum, so large
/// candidate sets stay cheap.
fn combinations<'a>(
    txn: &BankTransaction,
    candidates: &[&'a FinancialTitle],
    start: usize,
    sum: Decimal,
    combo: &mut Vec<&'a FinancialTitle>,
    config: &ReconciliationConfig,
    proposals: &mut Vec<MatchProposal>,
) {
    if combo.len() >= 2 {
        let diff = (sum - txn.amount).abs();
        if diff <= config.amount_tolerance {
            let mut title_ids: Vec<FinancialTitleId> = combo.iter().map(|t| t.id).collect();
            title_ids.sort_unstable();
            proposals.push(MatchProposal {
                bank_transaction_id: txn.id,
                title_ids,
                confidence: confidence(txn, combo, diff, config),
                basis: MatchBasis::CombinedTitles,
            });
        }
    }
    if combo.len() == config.max_combination_size {
        return;
    }
    for (offset, title) in candidates[start..].iter().enumerate() {
        let next = sum + title.open_amount;
        // Open amounts are positive; overshooting the target is final.
        if next > txn.amount + config.amount_tolerance {
            continue;
        }
        combo.push(title);
        combinations(txn, candidates, start + offset + 1, next, combo, config, proposals);
        combo.pop();
    }
}

/// Blends amount, date-proximity, and descriptor components into `0..=1`.
fn confidence(
    txn: &BankTransaction,
    titles: &[&FinancialTitle],
    amount_diff: Decimal,
    config: &ReconciliationConfig,
) -> Decimal {
    let amount_score = if amount_diff == Decimal::ZERO {
        Decimal::ONE
    } else {
        // Within tolerance by construction: scale down toward 0.9.
        Decimal::ONE - amount_diff / config.amount_tolerance * Decimal::new(1, 1)
    };

    let date_score = if config.date_window_days == 0 {
        Decimal::ONE
    } else {
        let total: Decimal = titles
            .iter()
            .map(|t| {
                let days = (t.due_date - txn.posted_at).num_days().abs();
                Decimal::ONE - Decimal::from(days) / Decimal::from(config.date_window_days)
            })
            .sum();
        total / Decimal::from(titles.len())
    };

    let txn_tokens = tokens(&txn.descriptor);
    let title_tokens: HashSet<String> = titles
        .iter()
        .flat_map(|t| tokens(&t.descriptor))
        .collect();
    let descriptor_score = jaccard(&txn_tokens, &title_tokens);

    WEIGHT_AMOUNT * amount_score + WEIGHT_DATE * date_score + WEIGHT_DESCRIPTOR * descriptor_score
}

/// Uppercase alphanumeric tokens of a statement descriptor.
fn tokens(descriptor: &str) -> HashSet<String> {
    descriptor
        .to_uppercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() >= 2)
        .map(ToString::to_string)
        .collect()
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> Decimal {
    if a.is_empty() || b.is_empty() {
        return Decimal::ZERO;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    Decimal::from(intersection) / Decimal::from(union)
}

/// Distributes the bank amount across the proposal's titles in order. A
/// title whose remaining open amount falls within tolerance settles; one
/// left with more than tolerance open stays partial.
fn settle(
    txn: &BankTransaction,
    proposal: &MatchProposal,
    titles: &[FinancialTitle],
    tolerance: Decimal,
) -> Vec<Settlement> {
    let mut remaining = txn.amount;
    proposal
        .title_ids
        .iter()
        .map(|id| {
            let title = titles
                .iter()
                .find(|t| t.id == *id)
                .expect("proposal title came from the candidate set");
            let applied = title.open_amount.min(remaining);
            remaining -= applied;
            let new_status = if title.open_amount - applied <= tolerance {
                TitleStatus::Settled
            } else {
                TitleStatus::Partial
            };
            Settlement {
                title_id: *id,
                applied_amount: applied,
                new_status,
            }
        })
        .collect()
}
