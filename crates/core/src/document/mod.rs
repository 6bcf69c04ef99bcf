//! Fiscal document lifecycle for Fiscus.
//!
//! Issued fiscal documents (NF-e, NFS-e, CT-e) move through
//! Draft → Pending → Authorized | Cancelled, with Authorized → Cancelled as
//! the only transition out of a terminal-bound state. Documents are never
//! hard-deleted: cancellation appends a protocol and justification.
//!
//! # Modules
//!
//! - `types` - Document, status, and action types
//! - `machine` - The pure transition validation
//! - `service` - Issuance orchestration over the store and authority ports
//! - `error` - Document-specific error types

pub mod error;
pub mod machine;
pub mod service;
pub mod types;

#[cfg(test)]
mod machine_props;

pub use error::DocumentError;
pub use machine::DocumentMachine;
pub use service::DocumentService;
pub use types::{DocumentAction, DocumentKind, DocumentStatus, FiscalDocument};
