//! Shared types, errors, and configuration for Fiscus.
//!
//! This crate provides common types used across all other crates:
//! - Money types with decimal precision (BRL is the functional currency)
//! - Typed IDs for type-safe entity references
//! - The error-class taxonomy every component error maps into
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::CoreConfig;
pub use error::ErrorClass;
