//! Allocation validation, resolution, and reversal construction.
//!
//! Percentage shares resolve to amounts with the Largest Remainder
//! Method so the resolved targets sum exactly to the source amount, no
//! cents lost or gained.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};

use fiscus_shared::types::{AllocationEntryId, CostCenterId};

use crate::allocation::error::AllocationError;
use crate::allocation::types::{
    AllocationEntry, AllocationMode, AllocationTarget, ResolvedTarget,
};

const SCALE: u32 = 2;

/// Stateless allocation engine.
pub struct AllocationEngine;

impl AllocationEngine {
    /// Validates targets and builds a resolved entry.
    ///
    /// The sum invariant is checked before anything could persist:
    /// percentages must total exactly 100, fixed shares exactly the
    /// source amount.
    ///
    /// # Errors
    ///
    /// - `AllocationError::EmptyTargets` with no targets.
    /// - `AllocationError::NonPositiveAmount` for a zero/negative source.
    /// - `AllocationError::MixedShareModes` when shares disagree on mode.
    /// - `AllocationError::AllocationSumMismatch` when the invariant fails.
    pub fn allocate(
        source_cost_center: CostCenterId,
        source_amount: Decimal,
        targets: &[AllocationTarget],
        now: DateTime<Utc>,
    ) -> Result<AllocationEntry, AllocationError> {
        let Some(first) = targets.first() else {
            return Err(AllocationError::EmptyTargets);
        };
        if source_amount <= Decimal::ZERO {
            return Err(AllocationError::NonPositiveAmount(source_amount));
        }

        let mode = first.share.mode();
        if targets.iter().any(|t| t.share.mode() != mode) {
            return Err(AllocationError::MixedShareModes);
        }

        let sum: Decimal = targets.iter().map(|t| t.share.value()).sum();
        let expected = match mode {
            AllocationMode::Percentage => Decimal::ONE_HUNDRED,
            AllocationMode::Fixed => source_amount,
        };
        if sum != expected {
            return Err(AllocationError::AllocationSumMismatch {
                expected,
                actual: sum,
            });
        }

        let resolved = match mode {
            AllocationMode::Percentage => {
                let percentages: Vec<Decimal> =
                    targets.iter().map(|t| t.share.value()).collect();
                let amounts = largest_remainder(source_amount, &percentages);
                targets
                    .iter()
                    .zip(amounts)
                    .map(|(t, amount)| ResolvedTarget {
                        cost_center: t.cost_center,
                        amount,
                    })
                    .collect()
            }
            AllocationMode::Fixed => targets
                .iter()
                .map(|t| ResolvedTarget {
                    cost_center: t.cost_center,
                    amount: t.share.value(),
                })
                .collect(),
        };

        Ok(AllocationEntry {
            id: AllocationEntryId::new(),
            source_cost_center,
            source_amount,
            mode,
            targets: resolved,
            reversal_of: None,
            reversed_by: None,
            entered_at: now,
            version: 1,
        })
    }

    /// Builds the compensating entry for an allocation.
    ///
    /// Additive, never destructive: the new entry negates the source and
    /// every target and references the original. The caller persists both
    /// the new entry and the original's back-reference atomically.
    ///
    /// # Errors
    ///
    /// - `AllocationError::AlreadyReversed` when the entry was reversed.
    /// - `AllocationError::CannotReverseReversal` for compensating entries.
    pub fn reverse(
        entry: &AllocationEntry,
        now: DateTime<Utc>,
    ) -> Result<AllocationEntry, AllocationError> {
        if entry.is_reversed() {
            return Err(AllocationError::AlreadyReversed(entry.id));
        }
        if entry.is_reversal() {
            return Err(AllocationError::CannotReverseReversal(entry.id));
        }

        Ok(AllocationEntry {
            id: AllocationEntryId::new(),
            source_cost_center: entry.source_cost_center,
            source_amount: -entry.source_amount,
            mode: entry.mode,
            targets: entry
                .targets
                .iter()
                .map(|t| ResolvedTarget {
                    cost_center: t.cost_center,
                    amount: -t.amount,
                })
                .collect(),
            reversal_of: Some(entry.id),
            reversed_by: None,
            entered_at: now,
            version: 1,
        })
    }
}

/// Largest Remainder Method: round each exact share down, then hand the
/// leftover cents to the shares with the largest fractional parts.
fn largest_remainder(total: Decimal, percentages: &[Decimal]) -> Vec<Decimal> {
    let unit = Decimal::new(1, SCALE);
    let total_rounded =
        total.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointNearestEven);

    let exact: Vec<Decimal> = percentages
        .iter()
        .map(|p| total_rounded * *p / Decimal::ONE_HUNDRED)
        .collect();

    let mut rounded: Vec<Decimal> = exact
        .iter()
        .map(|a| a.round_dp_with_strategy(SCALE, RoundingStrategy::ToZero))
        .collect();

    let sum_rounded: Decimal = rounded.iter().copied().sum();
    let remainder = total_rounded - sum_rounded;

    let units_to_distribute = (remainder / unit)
        .round_dp_with_strategy(0, RoundingStrategy::ToZero)
        .to_u64()
        .unwrap_or(0);
    let units_to_distribute = usize::try_from(units_to_distribute).unwrap_or(0);

    if units_to_distribute == 0 {
        return rounded;
    }

    let mut remainders: Vec<(usize, Decimal)> = exact
        .iter()
        .zip(rounded.iter())
        .enumerate()
        .map(|(i, (e, r))| (i, *e - *r))
        .collect();
    remainders.sort_by(|a, b| b.1.cmp(&a.1));

    for (idx, _) in remainders.iter().take(units_to_distribute) {
        rounded[*idx] += unit;
    }

    rounded
}
