//! Property-based tests for the allocation engine.

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;

use fiscus_shared::types::CostCenterId;

use crate::allocation::engine::AllocationEngine;
use crate::allocation::types::{AllocationTarget, TargetShare};

/// Strategy for positive amounts up to 10,000,000.00 with cent precision.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1i64..=1_000_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Percentage splits that sum to exactly 100, in basis points.
fn arb_percentages() -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec(1u32..=10_000, 1..=8).prop_map(|weights| {
        let total: u64 = weights.iter().map(|w| u64::from(*w)).sum();
        let mut shares: Vec<u64> = weights
            .iter()
            .map(|w| u64::from(*w) * 10_000 / total)
            .collect();
        let assigned: u64 = shares.iter().sum();
        // Park the integer-division leftover on the first share.
        shares[0] += 10_000 - assigned;
        shares
            .into_iter()
            .map(|bp| Decimal::new(i64::try_from(bp).expect("fits"), 2))
            .collect()
    })
}

fn targets_from(percentages: &[Decimal]) -> Vec<AllocationTarget> {
    percentages
        .iter()
        .map(|p| AllocationTarget {
            cost_center: CostCenterId::new(),
            share: TargetShare::Percentage(*p),
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Resolved target amounts always sum exactly to the source amount.
    #[test]
    fn prop_resolved_amounts_sum_to_source(
        amount in arb_amount(),
        percentages in arb_percentages(),
    ) {
        let entry = AllocationEngine::allocate(
            CostCenterId::new(),
            amount,
            &targets_from(&percentages),
            Utc::now(),
        ).unwrap();

        let sum: Decimal = entry.targets.iter().map(|t| t.amount).sum();
        prop_assert_eq!(sum, amount.round_dp(2));
        prop_assert_eq!(entry.targets.len(), percentages.len());
    }

    /// A reversal exactly negates the original, target by target.
    #[test]
    fn prop_reversal_negates_original(
        amount in arb_amount(),
        percentages in arb_percentages(),
    ) {
        let entry = AllocationEngine::allocate(
            CostCenterId::new(),
            amount,
            &targets_from(&percentages),
            Utc::now(),
        ).unwrap();
        let reversal = AllocationEngine::reverse(&entry, Utc::now()).unwrap();

        prop_assert_eq!(reversal.source_amount, -entry.source_amount);
        for (original, reversed) in entry.targets.iter().zip(&reversal.targets) {
            prop_assert_eq!(reversed.cost_center, original.cost_center);
            prop_assert_eq!(reversed.amount, -original.amount);
        }
        prop_assert_eq!(reversal.reversal_of, Some(entry.id));
    }

    /// Resolution preserves submission order and never drops a target.
    #[test]
    fn prop_resolution_preserves_target_order(
        amount in arb_amount(),
        percentages in arb_percentages(),
    ) {
        let targets = targets_from(&percentages);
        let entry = AllocationEngine::allocate(
            CostCenterId::new(),
            amount,
            &targets,
            Utc::now(),
        ).unwrap();

        for (requested, resolved) in targets.iter().zip(&entry.targets) {
            prop_assert_eq!(resolved.cost_center, requested.cost_center);
            prop_assert!(resolved.amount >= Decimal::ZERO);
        }
    }
}
