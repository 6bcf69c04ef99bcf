//! Reconciliation error types.

use thiserror::Error;

use fiscus_shared::ErrorClass;

use crate::ports::PortError;

/// Errors that can occur while running a reconciliation batch.
#[derive(Debug, Error)]
pub enum ReconciliationError {
    /// Storage backend failure. The batch is all-or-nothing, so nothing was
    /// applied.
    #[error("storage error: {0}")]
    Storage(String),
}

impl ReconciliationError {
    /// Returns the error taxonomy class.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Storage(_) => ErrorClass::Integration,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }
}

impl From<PortError> for ReconciliationError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound => Self::Storage("entity not found".to_string()),
            PortError::VersionConflict { expected } => {
                Self::Storage(format!("version conflict: expected version {expected}"))
            }
            PortError::Backend(message) => Self::Storage(message),
        }
    }
}
