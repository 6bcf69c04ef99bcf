//! Fiscal document error types.

use thiserror::Error;

use fiscus_shared::ErrorClass;
use fiscus_shared::types::DocumentId;

use crate::document::types::DocumentStatus;
use crate::ports::{AuthorityError, PortError};

/// Errors that can occur during document lifecycle operations.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Attempted an invalid status transition. State is left unchanged.
    #[error("invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: DocumentStatus,
        /// The attempted target status.
        to: DocumentStatus,
    },

    /// Authorization requires a non-empty protocol from the authority.
    #[error("authorization protocol is required")]
    MissingProtocol,

    /// Cancellation from Pending/Authorized requires the cancellation
    /// protocol unless the manual override path is taken.
    #[error("cancellation protocol is required without manual override")]
    CancellationProtocolRequired,

    /// The cancellation justification is shorter than the configured minimum.
    #[error("justification has {actual} characters, minimum is {minimum}")]
    JustificationTooShort {
        /// The configured minimum length.
        minimum: usize,
        /// The submitted length.
        actual: usize,
    },

    /// Document not found.
    #[error("document {0} not found")]
    NotFound(DocumentId),

    /// The document changed since it was loaded. Reload and retry.
    #[error("document was modified concurrently")]
    ConcurrentModification,

    /// The fiscal authority refused the submission.
    #[error("authority rejected: {code}: {message}")]
    AuthorityRejected {
        /// Authority rejection code.
        code: String,
        /// Human-readable rejection message.
        message: String,
    },

    /// The authority call did not complete in time.
    #[error("authority request timed out")]
    AuthorityTimeout,

    /// The authority could not be reached.
    #[error("authority unavailable: {0}")]
    AuthorityUnavailable(String),

    /// Storage backend failure.
    #[error("storage error: {0}")]
    Storage(String),
}

impl DocumentError {
    /// Returns the error taxonomy class.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::MissingProtocol
            | Self::CancellationProtocolRequired
            | Self::JustificationTooShort { .. } => ErrorClass::Validation,

            Self::InvalidTransition { .. }
            | Self::NotFound(_)
            | Self::ConcurrentModification => ErrorClass::State,

            Self::AuthorityRejected { .. }
            | Self::AuthorityTimeout
            | Self::AuthorityUnavailable(_)
            | Self::Storage(_) => ErrorClass::Integration,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::MissingProtocol => "MISSING_PROTOCOL",
            Self::CancellationProtocolRequired => "CANCELLATION_PROTOCOL_REQUIRED",
            Self::JustificationTooShort { .. } => "JUSTIFICATION_TOO_SHORT",
            Self::NotFound(_) => "DOCUMENT_NOT_FOUND",
            Self::ConcurrentModification => "CONCURRENT_MODIFICATION",
            Self::AuthorityRejected { .. } => "AUTHORITY_REJECTED",
            Self::AuthorityTimeout => "AUTHORITY_TIMEOUT",
            Self::AuthorityUnavailable(_) => "AUTHORITY_UNAVAILABLE",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Returns true when the caller may reload and retry as-is.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrentModification)
    }

    /// Maps a port error for a specific document.
    #[must_use]
    pub fn from_port(err: PortError, id: DocumentId) -> Self {
        match err {
            PortError::NotFound => Self::NotFound(id),
            PortError::VersionConflict { .. } => Self::ConcurrentModification,
            PortError::Backend(message) => Self::Storage(message),
        }
    }
}

impl From<AuthorityError> for DocumentError {
    fn from(err: AuthorityError) -> Self {
        match err {
            AuthorityError::Rejected { code, message } => Self::AuthorityRejected { code, message },
            AuthorityError::Timeout => Self::AuthorityTimeout,
            AuthorityError::Unavailable(message) => Self::AuthorityUnavailable(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classes() {
        let err = DocumentError::InvalidTransition {
            from: DocumentStatus::Cancelled,
            to: DocumentStatus::Authorized,
        };
        assert_eq!(err.class(), ErrorClass::State);
        assert_eq!(DocumentError::MissingProtocol.class(), ErrorClass::Validation);
        assert_eq!(
            DocumentError::AuthorityTimeout.class(),
            ErrorClass::Integration
        );
    }

    #[test]
    fn test_only_concurrency_is_retryable() {
        assert!(DocumentError::ConcurrentModification.is_retryable());
        assert!(!DocumentError::AuthorityTimeout.is_retryable());
        assert!(!DocumentError::MissingProtocol.is_retryable());
    }

    #[test]
    fn test_port_error_mapping() {
        let id = DocumentId::new();
        assert!(matches!(
            DocumentError::from_port(PortError::NotFound, id),
            DocumentError::NotFound(_)
        ));
        assert!(matches!(
            DocumentError::from_port(PortError::VersionConflict { expected: 3 }, id),
            DocumentError::ConcurrentModification
        ));
    }
}
