//! Allocation repository implementing the core `AllocationStore` port.
//!
//! `insert_reversal` is the interesting operation: the compensating entry
//! and the original's back-reference land in one database transaction, with
//! the version check making a racing second reversal lose.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use fiscus_core::allocation::{AllocationEntry, AllocationMode, ResolvedTarget};
use fiscus_core::ports::{AllocationStore, PortError};
use fiscus_shared::types::{AllocationEntryId, CostCenterId};

use crate::entities::{allocation_entries, allocation_targets};

/// SeaORM-backed allocation store.
#[derive(Debug, Clone)]
pub struct AllocationRepository {
    db: DatabaseConnection,
}

impl AllocationRepository {
    /// Creates a new allocation repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn insert_entry<C: ConnectionTrait>(
        conn: &C,
        entry: &AllocationEntry,
    ) -> Result<(), PortError> {
        let model = allocation_entries::ActiveModel {
            id: Set(entry.id.0),
            source_cost_center: Set(entry.source_cost_center.0),
            source_amount: Set(entry.source_amount),
            mode: Set(entry.mode.as_str().to_string()),
            reversal_of: Set(entry.reversal_of.map(|id| id.0)),
            reversed_by: Set(entry.reversed_by.map(|id| id.0)),
            entered_at: Set(entry.entered_at.into()),
            version: Set(entry.version),
        };
        model
            .insert(conn)
            .await
            .map_err(|e| PortError::Backend(e.to_string()))?;

        for (seq, target) in entry.targets.iter().enumerate() {
            let seq = i32::try_from(seq)
                .map_err(|_| PortError::Backend("target list overflow".to_string()))?;
            let model = allocation_targets::ActiveModel {
                id: Set(Uuid::now_v7()),
                entry_id: Set(entry.id.0),
                seq: Set(seq),
                cost_center: Set(target.cost_center.0),
                amount: Set(target.amount),
            };
            model
                .insert(conn)
                .await
                .map_err(|e| PortError::Backend(e.to_string()))?;
        }
        Ok(())
    }

    /// Distinguishes a stale version from a missing row after a zero-row
    /// update.
    async fn stale_or_missing(&self, id: AllocationEntryId, expected: i64) -> PortError {
        match allocation_entries::Entity::find_by_id(id.0).one(&self.db).await {
            Ok(Some(_)) => PortError::VersionConflict { expected },
            Ok(None) => PortError::NotFound,
            Err(e) => PortError::Backend(e.to_string()),
        }
    }
}

#[async_trait]
impl AllocationStore for AllocationRepository {
    async fn load(&self, id: AllocationEntryId) -> Result<AllocationEntry, PortError> {
        let model = allocation_entries::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| PortError::Backend(e.to_string()))?
            .ok_or(PortError::NotFound)?;

        let targets = allocation_targets::Entity::find()
            .filter(allocation_targets::Column::EntryId.eq(id.0))
            .order_by_asc(allocation_targets::Column::Seq)
            .all(&self.db)
            .await
            .map_err(|e| PortError::Backend(e.to_string()))?;

        model_to_entry(&model, &targets)
    }

    async fn insert(&self, entry: &AllocationEntry) -> Result<(), PortError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PortError::Backend(e.to_string()))?;
        Self::insert_entry(&txn, entry).await?;
        txn.commit()
            .await
            .map_err(|e| PortError::Backend(e.to_string()))?;
        Ok(())
    }

    async fn insert_reversal(
        &self,
        reversal: &AllocationEntry,
        original: AllocationEntryId,
        expected_version: i64,
    ) -> Result<(), PortError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PortError::Backend(e.to_string()))?;

        let result = allocation_entries::Entity::update_many()
            .col_expr(
                allocation_entries::Column::ReversedBy,
                Expr::value(Some(reversal.id.0)),
            )
            .col_expr(
                allocation_entries::Column::Version,
                Expr::value(expected_version + 1),
            )
            .filter(allocation_entries::Column::Id.eq(original.0))
            .filter(allocation_entries::Column::Version.eq(expected_version))
            .filter(allocation_entries::Column::ReversedBy.is_null())
            .exec(&txn)
            .await
            .map_err(|e| PortError::Backend(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(self.stale_or_missing(original, expected_version).await);
        }

        Self::insert_entry(&txn, reversal).await?;

        txn.commit()
            .await
            .map_err(|e| PortError::Backend(e.to_string()))?;

        tracing::debug!(
            original = %original,
            reversal = %reversal.id,
            "allocation reversed"
        );
        Ok(())
    }
}

fn model_to_entry(
    model: &allocation_entries::Model,
    targets: &[allocation_targets::Model],
) -> Result<AllocationEntry, PortError> {
    let mode = AllocationMode::parse(&model.mode)
        .ok_or_else(|| PortError::Backend(format!("invalid allocation mode '{}'", model.mode)))?;

    Ok(AllocationEntry {
        id: AllocationEntryId(model.id),
        source_cost_center: CostCenterId(model.source_cost_center),
        source_amount: model.source_amount,
        mode,
        targets: targets
            .iter()
            .map(|t| ResolvedTarget {
                cost_center: CostCenterId(t.cost_center),
                amount: t.amount,
            })
            .collect(),
        reversal_of: model.reversal_of.map(AllocationEntryId),
        reversed_by: model.reversed_by.map(AllocationEntryId),
        entered_at: model.entered_at.with_timezone(&chrono::Utc),
        version: model.version,
    })
}
