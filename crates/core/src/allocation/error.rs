//! Allocation error types.

use rust_decimal::Decimal;
use thiserror::Error;

use fiscus_shared::ErrorClass;
use fiscus_shared::types::AllocationEntryId;

use crate::ports::PortError;

/// Errors that can occur during allocation operations.
#[derive(Debug, Error)]
pub enum AllocationError {
    /// Target shares do not sum to 100% (percentage mode) or to the source
    /// amount (fixed mode).
    #[error("allocation shares sum to {actual}, expected {expected}")]
    AllocationSumMismatch {
        /// 100 for percentage mode, the source amount for fixed mode.
        expected: Decimal,
        /// The submitted sum.
        actual: Decimal,
    },

    /// An allocation needs at least one target.
    #[error("allocation has no targets")]
    EmptyTargets,

    /// Percentage and fixed shares cannot be mixed in one entry.
    #[error("allocation mixes percentage and fixed shares")]
    MixedShareModes,

    /// The source amount must be positive.
    #[error("source amount {0} is not positive")]
    NonPositiveAmount(Decimal),

    /// The entry has already been reversed.
    #[error("allocation entry {0} is already reversed")]
    AlreadyReversed(AllocationEntryId),

    /// A compensating entry cannot itself be reversed.
    #[error("allocation entry {0} is a reversal and cannot be reversed")]
    CannotReverseReversal(AllocationEntryId),

    /// Entry not found.
    #[error("allocation entry {0} not found")]
    NotFound(AllocationEntryId),

    /// The entry changed since it was loaded. Reload and retry.
    #[error("allocation entry was modified concurrently")]
    ConcurrentModification,

    /// Storage backend failure.
    #[error("storage error: {0}")]
    Storage(String),
}

impl AllocationError {
    /// Returns the error taxonomy class.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::AllocationSumMismatch { .. }
            | Self::EmptyTargets
            | Self::MixedShareModes
            | Self::NonPositiveAmount(_) => ErrorClass::Validation,

            Self::AlreadyReversed(_)
            | Self::CannotReverseReversal(_)
            | Self::NotFound(_)
            | Self::ConcurrentModification => ErrorClass::State,

            Self::Storage(_) => ErrorClass::Integration,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::AllocationSumMismatch { .. } => "ALLOCATION_SUM_MISMATCH",
            Self::EmptyTargets => "EMPTY_TARGETS",
            Self::MixedShareModes => "MIXED_SHARE_MODES",
            Self::NonPositiveAmount(_) => "NON_POSITIVE_AMOUNT",
            Self::AlreadyReversed(_) => "ALREADY_REVERSED",
            Self::CannotReverseReversal(_) => "CANNOT_REVERSE_REVERSAL",
            Self::NotFound(_) => "ENTRY_NOT_FOUND",
            Self::ConcurrentModification => "CONCURRENT_MODIFICATION",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Returns true when the caller may reload and retry as-is.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrentModification)
    }

    /// Maps a port error for a specific entry.
    #[must_use]
    pub fn from_port(err: PortError, id: AllocationEntryId) -> Self {
        match err {
            PortError::NotFound => Self::NotFound(id),
            PortError::VersionConflict { .. } => Self::ConcurrentModification,
            PortError::Backend(message) => Self::Storage(message),
        }
    }
}
