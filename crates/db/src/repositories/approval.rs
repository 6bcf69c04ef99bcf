//! Approval repository implementing the core `ApprovalStore` port.
//!
//! Decision history is append-only: a versioned save updates the request
//! row and inserts only the history records not yet persisted, all inside
//! one database transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use fiscus_core::approval::{ApprovalRequest, Decision, DecisionRecord, DecisionState, Delegation, SubjectKind};
use fiscus_core::ports::{ApprovalStore, PortError};
use fiscus_shared::types::{ActorId, ApprovalRequestId};

use crate::entities::{approval_decisions, approval_requests, delegations};

/// SeaORM-backed approval store with optimistic version checks.
#[derive(Debug, Clone)]
pub struct ApprovalRepository {
    db: DatabaseConnection,
}

impl ApprovalRepository {
    /// Creates a new approval repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a time-bounded delegation of decision authority.
    ///
    /// # Errors
    ///
    /// Returns `PortError::Backend` when the insert fails.
    pub async fn record_delegation(&self, delegation: &Delegation) -> Result<(), PortError> {
        let model = delegations::ActiveModel {
            id: Set(Uuid::now_v7()),
            actor: Set(delegation.actor.0),
            delegate: Set(delegation.delegate.0),
            valid_from: Set(delegation.valid_from.into()),
            valid_until: Set(delegation.valid_until.into()),
            created_at: Set(Utc::now().into()),
        };
        model
            .insert(&self.db)
            .await
            .map_err(|e| PortError::Backend(e.to_string()))?;
        Ok(())
    }

    /// Loads the delegations active at the given instant, for the core's
    /// pure delegation resolution.
    ///
    /// # Errors
    ///
    /// Returns `PortError::Backend` when the query fails.
    pub async fn active_delegations(
        &self,
        at: DateTime<Utc>,
    ) -> Result<Vec<Delegation>, PortError> {
        let rows = delegations::Entity::find()
            .filter(delegations::Column::ValidFrom.lte(at))
            .filter(delegations::Column::ValidUntil.gte(at))
            .order_by_asc(delegations::Column::ValidFrom)
            .all(&self.db)
            .await
            .map_err(|e| PortError::Backend(e.to_string()))?;
        Ok(rows.iter().map(model_to_delegation).collect())
    }

    /// Distinguishes a stale version from a missing row after a zero-row
    /// update.
    async fn stale_or_missing(&self, id: ApprovalRequestId, expected: i64) -> PortError {
        match approval_requests::Entity::find_by_id(id.0).one(&self.db).await {
            Ok(Some(_)) => PortError::VersionConflict { expected },
            Ok(None) => PortError::NotFound,
            Err(e) => PortError::Backend(e.to_string()),
        }
    }
}

#[async_trait]
impl ApprovalStore for ApprovalRepository {
    async fn load(&self, id: ApprovalRequestId) -> Result<ApprovalRequest, PortError> {
        let model = approval_requests::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| PortError::Backend(e.to_string()))?
            .ok_or(PortError::NotFound)?;

        let decisions = approval_decisions::Entity::find()
            .filter(approval_decisions::Column::RequestId.eq(id.0))
            .order_by_asc(approval_decisions::Column::Seq)
            .all(&self.db)
            .await
            .map_err(|e| PortError::Backend(e.to_string()))?;

        model_to_request(&model, &decisions)
    }

    async fn insert(&self, request: &ApprovalRequest) -> Result<(), PortError> {
        let now = Utc::now().into();
        let model = approval_requests::ActiveModel {
            id: Set(request.id.0),
            subject_kind: Set(request.subject_kind.as_str().to_string()),
            subject_id: Set(request.subject_id),
            requested_action: Set(request.requested_action.clone()),
            submitted_by: Set(request.submitted_by.0),
            state: Set(request.state.as_str().to_string()),
            version: Set(request.version),
            created_at: Set(now),
            updated_at: Set(now),
        };
        model
            .insert(&self.db)
            .await
            .map_err(|e| PortError::Backend(e.to_string()))?;
        Ok(())
    }

    async fn save(
        &self,
        request: &ApprovalRequest,
        expected_version: i64,
    ) -> Result<(), PortError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PortError::Backend(e.to_string()))?;

        let result = approval_requests::Entity::update_many()
            .col_expr(
                approval_requests::Column::State,
                Expr::value(request.state.as_str()),
            )
            .col_expr(approval_requests::Column::Version, Expr::value(request.version))
            .col_expr(
                approval_requests::Column::UpdatedAt,
                Expr::value(sea_orm::prelude::DateTimeWithTimeZone::from(Utc::now())),
            )
            .filter(approval_requests::Column::Id.eq(request.id.0))
            .filter(approval_requests::Column::Version.eq(expected_version))
            .exec(&txn)
            .await
            .map_err(|e| PortError::Backend(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(self.stale_or_missing(request.id, expected_version).await);
        }

        // Append only the records the database has not seen yet.
        let persisted = approval_decisions::Entity::find()
            .filter(approval_decisions::Column::RequestId.eq(request.id.0))
            .count(&txn)
            .await
            .map_err(|e| PortError::Backend(e.to_string()))?;
        let persisted = usize::try_from(persisted).unwrap_or(usize::MAX);

        for (seq, record) in request.history.iter().enumerate().skip(persisted) {
            let seq = i32::try_from(seq)
                .map_err(|_| PortError::Backend("decision history overflow".to_string()))?;
            let model = approval_decisions::ActiveModel {
                id: Set(Uuid::now_v7()),
                request_id: Set(request.id.0),
                seq: Set(seq),
                actor: Set(record.actor.0),
                decided_at: Set(record.decided_at.into()),
                decision: Set(record.decision.as_str().to_string()),
                notes: Set(record.notes.clone()),
            };
            model
                .insert(&txn)
                .await
                .map_err(|e| PortError::Backend(e.to_string()))?;
        }

        txn.commit()
            .await
            .map_err(|e| PortError::Backend(e.to_string()))?;

        tracing::debug!(
            request_id = %request.id,
            state = request.state.as_str(),
            version = request.version,
            "approval request saved"
        );
        Ok(())
    }
}

fn model_to_request(
    model: &approval_requests::Model,
    decisions: &[approval_decisions::Model],
) -> Result<ApprovalRequest, PortError> {
    let subject_kind = SubjectKind::parse(&model.subject_kind).ok_or_else(|| {
        PortError::Backend(format!("invalid subject kind '{}'", model.subject_kind))
    })?;
    let state = DecisionState::parse(&model.state)
        .ok_or_else(|| PortError::Backend(format!("invalid decision state '{}'", model.state)))?;

    let history = decisions
        .iter()
        .map(model_to_record)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ApprovalRequest {
        id: ApprovalRequestId(model.id),
        subject_kind,
        subject_id: model.subject_id,
        requested_action: model.requested_action.clone(),
        submitted_by: ActorId(model.submitted_by),
        state,
        history,
        version: model.version,
    })
}

fn model_to_record(model: &approval_decisions::Model) -> Result<DecisionRecord, PortError> {
    let decision = Decision::parse(&model.decision)
        .ok_or_else(|| PortError::Backend(format!("invalid decision '{}'", model.decision)))?;
    Ok(DecisionRecord {
        actor: ActorId(model.actor),
        decided_at: model.decided_at.with_timezone(&Utc),
        decision,
        notes: model.notes.clone(),
    })
}

fn model_to_delegation(model: &delegations::Model) -> Delegation {
    Delegation {
        actor: ActorId(model.actor),
        delegate: ActorId(model.delegate),
        valid_from: model.valid_from.with_timezone(&Utc),
        valid_until: model.valid_until.with_timezone(&Utc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_model(kind: &str, state: &str) -> approval_requests::Model {
        let now = Utc::now().into();
        approval_requests::Model {
            id: Uuid::new_v4(),
            subject_kind: kind.to_string(),
            subject_id: Uuid::new_v4(),
            requested_action: "authorize issuance".to_string(),
            submitted_by: Uuid::new_v4(),
            state: state.to_string(),
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_model_to_request_with_ordered_history() {
        let model = request_model("fiscal_document", "approved");
        let decision = approval_decisions::Model {
            id: Uuid::new_v4(),
            request_id: model.id,
            seq: 0,
            actor: Uuid::new_v4(),
            decided_at: Utc::now().into(),
            decision: "approve".to_string(),
            notes: None,
        };

        let request = model_to_request(&model, &[decision]).unwrap();
        assert_eq!(request.subject_kind, SubjectKind::FiscalDocument);
        assert_eq!(request.state, DecisionState::Approved);
        assert_eq!(request.history.len(), 1);
        assert_eq!(request.history[0].decision, Decision::Approve);
    }

    #[test]
    fn test_model_to_request_rejects_unknown_kind() {
        let result = model_to_request(&request_model("invoice", "pending"), &[]);
        assert!(matches!(result, Err(PortError::Backend(_))));
    }

    #[test]
    fn test_model_to_record_rejects_unknown_decision() {
        let model = approval_decisions::Model {
            id: Uuid::new_v4(),
            request_id: Uuid::new_v4(),
            seq: 0,
            actor: Uuid::new_v4(),
            decided_at: Utc::now().into(),
            decision: "escalate".to_string(),
            notes: None,
        };
        assert!(matches!(model_to_record(&model), Err(PortError::Backend(_))));
    }
}
