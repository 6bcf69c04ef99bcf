//! Allocation service over the store port.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;

use fiscus_shared::types::{AllocationEntryId, CostCenterId};

use crate::allocation::engine::AllocationEngine;
use crate::allocation::error::AllocationError;
use crate::allocation::types::{AllocationEntry, AllocationTarget};
use crate::ports::AllocationStore;

/// Validate → resolve → persist orchestration for allocations.
pub struct AllocationService {
    store: Arc<dyn AllocationStore>,
}

impl AllocationService {
    /// Creates the service with its store wired in.
    #[must_use]
    pub fn new(store: Arc<dyn AllocationStore>) -> Self {
        Self { store }
    }

    /// Validates and persists a new allocation entry.
    ///
    /// # Errors
    ///
    /// Engine validation errors propagate unchanged; storage failures map
    /// through the port.
    pub async fn allocate(
        &self,
        source_cost_center: CostCenterId,
        source_amount: Decimal,
        targets: &[AllocationTarget],
    ) -> Result<AllocationEntry, AllocationError> {
        let entry = AllocationEngine::allocate(
            source_cost_center,
            source_amount,
            targets,
            Utc::now(),
        )?;
        self.store
            .insert(&entry)
            .await
            .map_err(|e| AllocationError::from_port(e, entry.id))?;
        Ok(entry)
    }

    /// Reverses an allocation by persisting its compensating entry.
    ///
    /// The store stamps the original's back-reference under an optimistic
    /// version check, so a racing second reversal surfaces as
    /// `ConcurrentModification`.
    ///
    /// # Errors
    ///
    /// - `AllocationError::NotFound` when the entry does not exist.
    /// - `AllocationError::AlreadyReversed` / `CannotReverseReversal` from
    ///   the engine checks.
    /// - `AllocationError::ConcurrentModification` on a stale version.
    pub async fn reverse(
        &self,
        id: AllocationEntryId,
    ) -> Result<AllocationEntry, AllocationError> {
        let entry = self
            .store
            .load(id)
            .await
            .map_err(|e| AllocationError::from_port(e, id))?;

        let reversal = AllocationEngine::reverse(&entry, Utc::now())?;

        self.store
            .insert_reversal(&reversal, entry.id, entry.version)
            .await
            .map_err(|e| AllocationError::from_port(e, id))?;
        Ok(reversal)
    }
}
