//! Document issuance service.
//!
//! Orchestrates load → pure validation → authority call → versioned save.
//! The authority is consulted only after the transition is known to be
//! legal, and a failed authority call leaves the document untouched: a
//! document can never become Authorized without a protocol, and a stale
//! save surfaces as `ConcurrentModification` for the caller to retry.

use std::sync::Arc;

use chrono::Utc;

use fiscus_shared::config::DocumentConfig;
use fiscus_shared::types::DocumentId;

use crate::document::error::DocumentError;
use crate::document::machine::DocumentMachine;
use crate::document::types::{DocumentStatus, FiscalDocument};
use crate::ports::{DocumentStore, FiscalAuthority};

/// Issuance service over the store and authority ports.
pub struct DocumentService {
    store: Arc<dyn DocumentStore>,
    authority: Arc<dyn FiscalAuthority>,
    config: DocumentConfig,
}

impl DocumentService {
    /// Creates the service with its ports wired in.
    #[must_use]
    pub fn new(
        store: Arc<dyn DocumentStore>,
        authority: Arc<dyn FiscalAuthority>,
        config: DocumentConfig,
    ) -> Self {
        Self {
            store,
            authority,
            config,
        }
    }

    /// Submits a draft document for issuance.
    ///
    /// # Errors
    ///
    /// Propagates transition, not-found, and concurrency errors.
    pub async fn submit(&self, id: DocumentId) -> Result<FiscalDocument, DocumentError> {
        let mut document = self.load(id).await?;
        let expected_version = document.version;

        let action = DocumentMachine::submit(document.status, Utc::now())?;
        document.apply(action);
        self.save(&document, expected_version).await?;
        Ok(document)
    }

    /// Requests authorization from the fiscal authority and records the
    /// protocol.
    ///
    /// # Errors
    ///
    /// Authority failures propagate as Integration-class errors with the
    /// document left unchanged.
    pub async fn authorize(&self, id: DocumentId) -> Result<FiscalDocument, DocumentError> {
        let mut document = self.load(id).await?;
        let expected_version = document.version;

        // Reject before spending an authority round-trip.
        if !DocumentMachine::is_valid_transition(document.status, DocumentStatus::Authorized) {
            return Err(DocumentError::InvalidTransition {
                from: document.status,
                to: DocumentStatus::Authorized,
            });
        }

        let protocol = self.authority.submit_for_authorization(&document).await?;
        let action = DocumentMachine::authorize(document.status, protocol, Utc::now())?;
        document.apply(action);
        self.save(&document, expected_version).await?;
        Ok(document)
    }

    /// Cancels a document, via the authority or the manual-override path.
    ///
    /// # Errors
    ///
    /// Propagates validation, transition, authority, and concurrency errors.
    pub async fn cancel(
        &self,
        id: DocumentId,
        justification: String,
        manual_override: bool,
    ) -> Result<FiscalDocument, DocumentError> {
        let mut document = self.load(id).await?;
        let expected_version = document.version;

        if !DocumentMachine::is_valid_transition(document.status, DocumentStatus::Cancelled)
            && !(document.status == DocumentStatus::Draft && manual_override)
        {
            return Err(DocumentError::InvalidTransition {
                from: document.status,
                to: DocumentStatus::Cancelled,
            });
        }

        let protocol = if manual_override {
            None
        } else {
            Some(
                self.authority
                    .submit_for_cancellation(&document, &justification)
                    .await?,
            )
        };

        let action = DocumentMachine::cancel(
            document.status,
            protocol,
            justification,
            manual_override,
            &self.config,
            Utc::now(),
        )?;
        document.apply(action);
        self.save(&document, expected_version).await?;
        Ok(document)
    }

    async fn load(&self, id: DocumentId) -> Result<FiscalDocument, DocumentError> {
        self.store
            .load(id)
            .await
            .map_err(|e| DocumentError::from_port(e, id))
    }

    async fn save(
        &self,
        document: &FiscalDocument,
        expected_version: i64,
    ) -> Result<(), DocumentError> {
        self.store
            .save(document, expected_version)
            .await
            .map_err(|e| DocumentError::from_port(e, document.id))
    }
}
