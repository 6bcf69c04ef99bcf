//! Approval service over the store port.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use fiscus_shared::config::ApprovalConfig;
use fiscus_shared::types::{ActorId, ApprovalRequestId};

use crate::approval::engine::ApprovalEngine;
use crate::approval::error::ApprovalError;
use crate::approval::types::{ActorRole, ApprovalRequest, Decision, SubjectKind};
use crate::ports::ApprovalStore;

/// Load → pure decide → versioned save orchestration.
pub struct ApprovalService {
    store: Arc<dyn ApprovalStore>,
    config: ApprovalConfig,
}

impl ApprovalService {
    /// Creates the service with its store wired in.
    #[must_use]
    pub fn new(store: Arc<dyn ApprovalStore>, config: ApprovalConfig) -> Self {
        Self { store, config }
    }

    /// Submits and persists a new request.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    pub async fn submit(
        &self,
        subject_kind: SubjectKind,
        subject_id: Uuid,
        requested_action: String,
        submitted_by: ActorId,
    ) -> Result<ApprovalRequest, ApprovalError> {
        let request =
            ApprovalEngine::submit(subject_kind, subject_id, requested_action, submitted_by);
        self.store
            .insert(&request)
            .await
            .map_err(|e| ApprovalError::from_port(e, request.id))?;
        Ok(request)
    }

    /// Applies a decision under the optimistic version check.
    ///
    /// # Errors
    ///
    /// Engine errors propagate unchanged; a stale save surfaces as
    /// `ConcurrentModification`.
    pub async fn decide(
        &self,
        id: ApprovalRequestId,
        actor: ActorId,
        role: ActorRole,
        decision: Decision,
        notes: Option<String>,
    ) -> Result<ApprovalRequest, ApprovalError> {
        let request = self.load(id).await?;
        let expected_version = request.version;

        let mut updated = ApprovalEngine::decide(
            &request,
            actor,
            role,
            decision,
            notes,
            &self.config,
            Utc::now(),
        )?;
        updated.version += 1;

        self.store
            .save(&updated, expected_version)
            .await
            .map_err(|e| ApprovalError::from_port(e, id))?;
        Ok(updated)
    }

    /// Returns a ChangesRequested request to Pending.
    ///
    /// # Errors
    ///
    /// Propagates state and concurrency errors.
    pub async fn resubmit(&self, id: ApprovalRequestId) -> Result<ApprovalRequest, ApprovalError> {
        let request = self.load(id).await?;
        let expected_version = request.version;

        let mut updated = ApprovalEngine::resubmit(&request)?;
        updated.version += 1;

        self.store
            .save(&updated, expected_version)
            .await
            .map_err(|e| ApprovalError::from_port(e, id))?;
        Ok(updated)
    }

    async fn load(&self, id: ApprovalRequestId) -> Result<ApprovalRequest, ApprovalError> {
        self.store
            .load(id)
            .await
            .map_err(|e| ApprovalError::from_port(e, id))
    }
}
