//! Core fiscal logic for Fiscus.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, business-rule validation, and calculations live here;
//! persistence and the tax-authority integration are reached through the
//! port traits in [`ports`].
//!
//! # Modules
//!
//! - `tax` - Withholding tax calculation (IRRF, PIS, COFINS, CSLL, ISS, INSS)
//! - `cfop` - CFOP determination from transaction attributes
//! - `reconciliation` - Bank statement to financial title matching
//! - `document` - Fiscal document lifecycle state machine
//! - `approval` - Multi-party approval/decision workflow
//! - `allocation` - Intercompany cost allocation and reversal
//! - `ports` - Persistence and integration interfaces the core calls

pub mod allocation;
pub mod approval;
pub mod cfop;
pub mod document;
pub mod ports;
pub mod reconciliation;
pub mod tax;
