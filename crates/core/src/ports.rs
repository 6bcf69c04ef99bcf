//! Port traits the core calls out through.
//!
//! The core owns these interfaces; implementations live in the adapter
//! crates (fiscus-db for persistence, the integration layer for the fiscal
//! authority). No SQL or HTTP leaks into this crate.
//!
//! Every save takes the version the caller loaded. A stale version resolves
//! to [`PortError::VersionConflict`] so the caller can reload and retry;
//! nothing is partially applied.

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use fiscus_shared::types::{
    AllocationEntryId, ApprovalRequestId, BankAccountId, BankTransactionId, DocumentId,
};

use crate::allocation::AllocationEntry;
use crate::approval::ApprovalRequest;
use crate::document::FiscalDocument;
use crate::reconciliation::{AppliedMatch, FinancialTitle};

/// Errors surfaced by persistence ports.
#[derive(Debug, Error)]
pub enum PortError {
    /// The entity does not exist.
    #[error("entity not found")]
    NotFound,

    /// The persisted version no longer matches the version the caller loaded.
    #[error("version conflict: expected version {expected}")]
    VersionConflict {
        /// The version the caller expected to overwrite.
        expected: i64,
    },

    /// The storage backend failed.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Persistence port for fiscal documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Loads a document by ID.
    async fn load(&self, id: DocumentId) -> Result<FiscalDocument, PortError>;

    /// Saves a document, succeeding only if the persisted version still
    /// equals `expected_version` (optimistic lock).
    async fn save(&self, document: &FiscalDocument, expected_version: i64)
    -> Result<(), PortError>;
}

/// Persistence port for approval requests.
#[async_trait]
pub trait ApprovalStore: Send + Sync {
    /// Loads a request (with its full decision history) by ID.
    async fn load(&self, id: ApprovalRequestId) -> Result<ApprovalRequest, PortError>;

    /// Inserts a newly submitted request.
    async fn insert(&self, request: &ApprovalRequest) -> Result<(), PortError>;

    /// Saves a decided/resubmitted request under an optimistic version check.
    async fn save(&self, request: &ApprovalRequest, expected_version: i64)
    -> Result<(), PortError>;
}

/// Persistence port for allocation entries.
#[async_trait]
pub trait AllocationStore: Send + Sync {
    /// Loads an allocation entry (with its resolved targets) by ID.
    async fn load(&self, id: AllocationEntryId) -> Result<AllocationEntry, PortError>;

    /// Inserts a validated allocation entry.
    async fn insert(&self, entry: &AllocationEntry) -> Result<(), PortError>;

    /// Atomically inserts the compensating entry and stamps the original's
    /// reversal back-reference. The version check on the original makes a
    /// racing second reversal lose.
    async fn insert_reversal(
        &self,
        reversal: &AllocationEntry,
        original: AllocationEntryId,
        expected_version: i64,
    ) -> Result<(), PortError>;
}

/// Persistence port for financial titles and reconciliation links.
#[async_trait]
pub trait TitleStore: Send + Sync {
    /// Range query: open/overdue/partial titles for an account whose due
    /// date falls within the window.
    async fn open_titles(
        &self,
        account: BankAccountId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<FinancialTitle>, PortError>;

    /// Returns the subset of the given bank transaction IDs that already
    /// carry a reconciliation link.
    async fn linked_bank_transactions(
        &self,
        batch: &[BankTransactionId],
    ) -> Result<Vec<BankTransactionId>, PortError>;

    /// Persists a batch of applied matches: link rows plus title settlement
    /// updates, all-or-nothing. A failure anywhere rolls back the whole
    /// batch.
    async fn apply_matches(&self, matches: &[AppliedMatch]) -> Result<(), PortError>;
}

/// Errors surfaced by the fiscal authority integration.
#[derive(Debug, Error)]
pub enum AuthorityError {
    /// The authority processed the request and refused it.
    #[error("authority rejected the request: {code}: {message}")]
    Rejected {
        /// Authority rejection code.
        code: String,
        /// Human-readable rejection message.
        message: String,
    },

    /// The request did not complete within the integration's timeout.
    #[error("authority request timed out")]
    Timeout,

    /// The authority could not be reached.
    #[error("authority unavailable: {0}")]
    Unavailable(String),
}

/// Integration port for the fiscal authority (SEFAZ et al.).
///
/// Treated as a black box with a bounded timeout owned by the
/// implementation. The core never retries internally; a failure is terminal
/// for the current transition attempt and leaves the document untouched.
#[async_trait]
pub trait FiscalAuthority: Send + Sync {
    /// Submits a document for authorization. Returns the authorization
    /// protocol on success.
    async fn submit_for_authorization(
        &self,
        document: &FiscalDocument,
    ) -> Result<String, AuthorityError>;

    /// Submits a document for cancellation. Returns the cancellation
    /// protocol on success.
    async fn submit_for_cancellation(
        &self,
        document: &FiscalDocument,
        justification: &str,
    ) -> Result<String, AuthorityError>;
}
