//! Bank reconciliation domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use fiscus_shared::types::{BankAccountId, BankTransactionId, FinancialTitleId};

/// An imported bank statement line. An external fact: the matcher reads it,
/// never edits it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankTransaction {
    /// Unique identifier.
    pub id: BankTransactionId,
    /// The account the line was imported for.
    pub account: BankAccountId,
    /// Posted amount.
    pub amount: Decimal,
    /// Bank posting date.
    pub posted_at: NaiveDate,
    /// Free-text descriptor from the statement.
    pub descriptor: String,
}

/// Direction of an expected cash movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TitleKind {
    /// Money we owe.
    Payable,
    /// Money owed to us.
    Receivable,
}

impl TitleKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Payable => "payable",
            Self::Receivable => "receivable",
        }
    }

    /// Parses a kind from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "payable" => Some(Self::Payable),
            "receivable" => Some(Self::Receivable),
            _ => None,
        }
    }
}

/// Lifecycle status of a financial title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleStatus {
    /// Awaiting settlement.
    Open,
    /// Past due, still awaiting settlement.
    Overdue,
    /// Partially settled.
    Partial,
    /// Fully settled.
    Settled,
    /// Cancelled before settlement.
    Cancelled,
}

impl TitleStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Overdue => "overdue",
            Self::Partial => "partial",
            Self::Settled => "settled",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "open" => Some(Self::Open),
            "overdue" => Some(Self::Overdue),
            "partial" => Some(Self::Partial),
            "settled" => Some(Self::Settled),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns true when the matcher may still settle against this title.
    /// Settled and Cancelled titles are never touched.
    #[must_use]
    pub const fn is_matchable(&self) -> bool {
        matches!(self, Self::Open | Self::Overdue | Self::Partial)
    }
}

impl fmt::Display for TitleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An internal expected cash movement (payable or receivable).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialTitle {
    /// Unique identifier.
    pub id: FinancialTitleId,
    /// The account this title settles against.
    pub account: BankAccountId,
    /// Direction.
    pub kind: TitleKind,
    /// Original face amount.
    pub amount: Decimal,
    /// Amount still open after prior settlements.
    pub open_amount: Decimal,
    /// Expected settlement date.
    pub due_date: NaiveDate,
    /// Free-text descriptor (counterparty, invoice reference).
    pub descriptor: String,
    /// Current lifecycle status.
    pub status: TitleStatus,
}

/// Why a proposal matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchBasis {
    /// A single title's open amount equals the bank amount exactly.
    ExactAmount,
    /// A single title's open amount differs within the configured tolerance.
    AmountWithinTolerance,
    /// Several titles' open amounts sum to the bank amount within tolerance.
    CombinedTitles,
}

impl MatchBasis {
    /// Returns the string representation of the basis.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ExactAmount => "exact_amount",
            Self::AmountWithinTolerance => "amount_within_tolerance",
            Self::CombinedTitles => "combined_titles",
        }
    }

    /// Parses a basis from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "exact_amount" => Some(Self::ExactAmount),
            "amount_within_tolerance" => Some(Self::AmountWithinTolerance),
            "combined_titles" => Some(Self::CombinedTitles),
            _ => None,
        }
    }
}

/// A proposed association between one bank transaction and one or more
/// titles, with a confidence in `0..=1`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchProposal {
    /// The bank transaction being matched.
    pub bank_transaction_id: BankTransactionId,
    /// The titles consumed, in deterministic order.
    pub title_ids: Vec<FinancialTitleId>,
    /// Match confidence in `0..=1`.
    pub confidence: Decimal,
    /// Why the proposal matched.
    pub basis: MatchBasis,
}

/// The settlement a match applies to one title.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settlement {
    /// The settled title.
    pub title_id: FinancialTitleId,
    /// Amount applied against the title's open amount.
    pub applied_amount: Decimal,
    /// Status after applying: Settled when the remaining open amount falls
    /// within tolerance, Partial otherwise.
    pub new_status: TitleStatus,
}

/// A proposal confident enough to apply, with its per-title settlements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppliedMatch {
    /// The winning proposal.
    pub proposal: MatchProposal,
    /// One settlement per consumed title.
    pub settlements: Vec<Settlement>,
}

/// What one matcher run did with a batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchOutcome {
    /// Matches at or above the auto-apply threshold.
    pub applied: Vec<AppliedMatch>,
    /// Matches below the threshold, awaiting manual confirmation.
    pub suggestions: Vec<MatchProposal>,
    /// Bank transactions skipped because they already carry a link.
    pub skipped_already_matched: usize,
}
