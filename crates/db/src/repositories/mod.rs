//! Repository implementations of the core persistence ports.
//!
//! Each repository implements one `fiscus_core::ports` trait over `SeaORM`,
//! hiding SQL from the core. Versioned saves use `UPDATE ... WHERE id AND
//! version`; zero rows affected resolves to a version conflict or a missing
//! row.

pub mod allocation;
pub mod approval;
pub mod document;
pub mod title;

pub use allocation::AllocationRepository;
pub use approval::ApprovalRepository;
pub use document::DocumentRepository;
pub use title::TitleRepository;
