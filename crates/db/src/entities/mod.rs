//! `SeaORM` entity definitions.
//!
//! Status and kind columns are stored as text and converted to the core
//! enums by the repositories; the conversion helpers are unit-tested
//! without a database.

pub mod allocation_entries;
pub mod allocation_targets;
pub mod approval_decisions;
pub mod approval_requests;
pub mod bank_transactions;
pub mod delegations;
pub mod financial_titles;
pub mod fiscal_documents;
pub mod reconciliation_links;
