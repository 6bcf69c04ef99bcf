//! Allocation domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use fiscus_shared::types::{AllocationEntryId, CostCenterId};

/// How target shares are expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllocationMode {
    /// Shares are percentages summing to 100.
    Percentage,
    /// Shares are fixed amounts summing to the source amount.
    Fixed,
}

impl AllocationMode {
    /// Returns the string representation of the mode.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Percentage => "percentage",
            Self::Fixed => "fixed",
        }
    }

    /// Parses a mode from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "percentage" => Some(Self::Percentage),
            "fixed" => Some(Self::Fixed),
            _ => None,
        }
    }
}

impl fmt::Display for AllocationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single target's requested share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "mode", content = "value")]
pub enum TargetShare {
    /// A percentage of the source amount.
    Percentage(Decimal),
    /// A fixed amount.
    Fixed(Decimal),
}

impl TargetShare {
    /// The mode this share belongs to.
    #[must_use]
    pub const fn mode(&self) -> AllocationMode {
        match self {
            Self::Percentage(_) => AllocationMode::Percentage,
            Self::Fixed(_) => AllocationMode::Fixed,
        }
    }

    /// The raw share value.
    #[must_use]
    pub const fn value(&self) -> Decimal {
        match self {
            Self::Percentage(v) | Self::Fixed(v) => *v,
        }
    }
}

/// A requested allocation target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationTarget {
    /// The receiving cost center.
    pub cost_center: CostCenterId,
    /// The requested share.
    pub share: TargetShare,
}

/// A resolved target with its exact amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedTarget {
    /// The receiving cost center.
    pub cost_center: CostCenterId,
    /// The resolved amount. Resolved amounts sum exactly to the source.
    pub amount: Decimal,
}

/// A persisted allocation entry.
///
/// Never hard-deleted: reversal creates a compensating entry and stamps
/// `reversed_by` on the original, preserving the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationEntry {
    /// Unique identifier.
    pub id: AllocationEntryId,
    /// The cost center the cost is distributed from.
    pub source_cost_center: CostCenterId,
    /// The amount being distributed (negative on compensating entries).
    pub source_amount: Decimal,
    /// How the shares were expressed.
    pub mode: AllocationMode,
    /// Resolved targets, in submission order.
    pub targets: Vec<ResolvedTarget>,
    /// Set on compensating entries: the entry this one reverses.
    pub reversal_of: Option<AllocationEntryId>,
    /// Set on reversed originals: the compensating entry.
    pub reversed_by: Option<AllocationEntryId>,
    /// When the entry was recorded.
    pub entered_at: DateTime<Utc>,
    /// Optimistic-lock version.
    pub version: i64,
}

impl AllocationEntry {
    /// Returns true when this entry compensates another.
    #[must_use]
    pub const fn is_reversal(&self) -> bool {
        self.reversal_of.is_some()
    }

    /// Returns true when this entry has been reversed.
    #[must_use]
    pub const fn is_reversed(&self) -> bool {
        self.reversed_by.is_some()
    }
}
