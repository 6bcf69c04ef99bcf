//! Fiscal document state machine.
//!
//! Pure transition validation in the same shape as the rest of the core:
//! a stateless service whose methods check the current status and return a
//! [`DocumentAction`] carrying the audit data, or an error that leaves the
//! document exactly as it was.

use chrono::{DateTime, Utc};

use fiscus_shared::config::DocumentConfig;

use crate::document::error::DocumentError;
use crate::document::types::{DocumentAction, DocumentStatus};

/// Stateless validator for document lifecycle transitions.
pub struct DocumentMachine;

impl DocumentMachine {
    /// Submit a draft document for authorization.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::InvalidTransition` unless the document is
    /// in Draft.
    pub fn submit(
        current_status: DocumentStatus,
        now: DateTime<Utc>,
    ) -> Result<DocumentAction, DocumentError> {
        match current_status {
            DocumentStatus::Draft => Ok(DocumentAction::Submit { submitted_at: now }),
            _ => Err(DocumentError::InvalidTransition {
                from: current_status,
                to: DocumentStatus::Pending,
            }),
        }
    }

    /// Record an authorization protocol on a pending document.
    ///
    /// # Errors
    ///
    /// - `DocumentError::InvalidTransition` unless the document is Pending.
    /// - `DocumentError::MissingProtocol` when the protocol is empty: a
    ///   document must never become Authorized without one.
    pub fn authorize(
        current_status: DocumentStatus,
        protocol: String,
        now: DateTime<Utc>,
    ) -> Result<DocumentAction, DocumentError> {
        if protocol.trim().is_empty() {
            return Err(DocumentError::MissingProtocol);
        }

        match current_status {
            DocumentStatus::Pending => Ok(DocumentAction::Authorize {
                protocol,
                authorized_at: now,
            }),
            _ => Err(DocumentError::InvalidTransition {
                from: current_status,
                to: DocumentStatus::Authorized,
            }),
        }
    }

    /// Cancel a document.
    ///
    /// Pending and Authorized documents cancel with the authority's
    /// cancellation protocol, or through the manual-override path. Draft
    /// documents cancel only through the override path (administrative
    /// discard). The justification is always required and length-checked.
    ///
    /// # Errors
    ///
    /// - `DocumentError::JustificationTooShort` when the trimmed
    ///   justification is under the configured minimum.
    /// - `DocumentError::CancellationProtocolRequired` when neither a
    ///   protocol nor the override flag is present.
    /// - `DocumentError::InvalidTransition` from Cancelled, or from Draft
    ///   without the override flag.
    pub fn cancel(
        current_status: DocumentStatus,
        protocol: Option<String>,
        justification: String,
        manual_override: bool,
        config: &DocumentConfig,
        now: DateTime<Utc>,
    ) -> Result<DocumentAction, DocumentError> {
        let trimmed_len = justification.trim().chars().count();
        if trimmed_len < config.min_cancellation_justification {
            return Err(DocumentError::JustificationTooShort {
                minimum: config.min_cancellation_justification,
                actual: trimmed_len,
            });
        }

        match current_status {
            DocumentStatus::Pending | DocumentStatus::Authorized => {
                let has_protocol = protocol.as_deref().is_some_and(|p| !p.trim().is_empty());
                if !has_protocol && !manual_override {
                    return Err(DocumentError::CancellationProtocolRequired);
                }
                Ok(DocumentAction::Cancel {
                    protocol: protocol.filter(|p| !p.trim().is_empty()),
                    justification,
                    manual_override,
                    cancelled_at: now,
                })
            }
            DocumentStatus::Draft if manual_override => Ok(DocumentAction::Cancel {
                protocol: None,
                justification,
                manual_override,
                cancelled_at: now,
            }),
            _ => Err(DocumentError::InvalidTransition {
                from: current_status,
                to: DocumentStatus::Cancelled,
            }),
        }
    }

    /// The transition matrix. The Draft → Cancelled edge exists only
    /// through the override path of [`DocumentMachine::cancel`].
    #[must_use]
    pub const fn is_valid_transition(from: DocumentStatus, to: DocumentStatus) -> bool {
        matches!(
            (from, to),
            (DocumentStatus::Draft, DocumentStatus::Pending)
                | (
                    DocumentStatus::Pending,
                    DocumentStatus::Authorized | DocumentStatus::Cancelled
                )
                | (DocumentStatus::Authorized, DocumentStatus::Cancelled)
        )
    }
}
