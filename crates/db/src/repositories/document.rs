//! Fiscal document repository implementing the core `DocumentStore` port.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

use fiscus_core::document::{DocumentKind, DocumentStatus, FiscalDocument};
use fiscus_core::ports::{DocumentStore, PortError};
use fiscus_shared::types::{DocumentId, OrganizationId};

use crate::entities::fiscal_documents;

/// SeaORM-backed document store with optimistic version checks.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    db: DatabaseConnection,
}

impl DocumentRepository {
    /// Creates a new document repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts a freshly created document (outside the port: creation is an
    /// issuance concern, loads and versioned saves are the port's).
    ///
    /// # Errors
    ///
    /// Returns `PortError::Backend` when the insert fails.
    pub async fn insert(&self, document: &FiscalDocument) -> Result<(), PortError> {
        let now = Utc::now().into();
        let model = fiscal_documents::ActiveModel {
            id: Set(document.id.0),
            organization_id: Set(document.organization.0),
            number: Set(document.number),
            series: Set(document.series),
            kind: Set(document.kind.as_str().to_string()),
            status: Set(document.status.as_str().to_string()),
            authorization_protocol: Set(document.authorization_protocol.clone()),
            cancellation_protocol: Set(document.cancellation_protocol.clone()),
            cancellation_justification: Set(document.cancellation_justification.clone()),
            issued_at: Set(document.issued_at.map(Into::into)),
            version: Set(document.version),
            created_at: Set(now),
            updated_at: Set(now),
        };
        model
            .insert(&self.db)
            .await
            .map_err(|e| PortError::Backend(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for DocumentRepository {
    async fn load(&self, id: DocumentId) -> Result<FiscalDocument, PortError> {
        let model = fiscal_documents::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| PortError::Backend(e.to_string()))?
            .ok_or(PortError::NotFound)?;
        model_to_document(&model)
    }

    async fn save(
        &self,
        document: &FiscalDocument,
        expected_version: i64,
    ) -> Result<(), PortError> {
        let result = fiscal_documents::Entity::update_many()
            .col_expr(
                fiscal_documents::Column::Status,
                Expr::value(document.status.as_str()),
            )
            .col_expr(
                fiscal_documents::Column::AuthorizationProtocol,
                Expr::value(document.authorization_protocol.clone()),
            )
            .col_expr(
                fiscal_documents::Column::CancellationProtocol,
                Expr::value(document.cancellation_protocol.clone()),
            )
            .col_expr(
                fiscal_documents::Column::CancellationJustification,
                Expr::value(document.cancellation_justification.clone()),
            )
            .col_expr(
                fiscal_documents::Column::IssuedAt,
                Expr::value(document.issued_at.map(sea_orm::prelude::DateTimeWithTimeZone::from)),
            )
            .col_expr(fiscal_documents::Column::Version, Expr::value(document.version))
            .col_expr(
                fiscal_documents::Column::UpdatedAt,
                Expr::value(sea_orm::prelude::DateTimeWithTimeZone::from(Utc::now())),
            )
            .filter(fiscal_documents::Column::Id.eq(document.id.0))
            .filter(fiscal_documents::Column::Version.eq(expected_version))
            .exec(&self.db)
            .await
            .map_err(|e| PortError::Backend(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(self.stale_or_missing(document.id, expected_version).await);
        }
        tracing::debug!(
            document_id = %document.id,
            status = document.status.as_str(),
            version = document.version,
            "fiscal document saved"
        );
        Ok(())
    }
}

impl DocumentRepository {
    /// Distinguishes a stale version from a missing row after a zero-row
    /// update.
    async fn stale_or_missing(&self, id: DocumentId, expected: i64) -> PortError {
        match fiscal_documents::Entity::find_by_id(id.0).one(&self.db).await {
            Ok(Some(_)) => PortError::VersionConflict { expected },
            Ok(None) => PortError::NotFound,
            Err(e) => PortError::Backend(e.to_string()),
        }
    }
}

fn model_to_document(model: &fiscal_documents::Model) -> Result<FiscalDocument, PortError> {
    let status = DocumentStatus::parse(&model.status).ok_or_else(|| {
        PortError::Backend(format!("invalid document status '{}'", model.status))
    })?;
    let kind = DocumentKind::parse(&model.kind)
        .ok_or_else(|| PortError::Backend(format!("invalid document kind '{}'", model.kind)))?;

    Ok(FiscalDocument {
        id: DocumentId(model.id),
        organization: OrganizationId(model.organization_id),
        number: model.number,
        series: model.series,
        kind,
        status,
        authorization_protocol: model.authorization_protocol.clone(),
        cancellation_protocol: model.cancellation_protocol.clone(),
        cancellation_justification: model.cancellation_justification.clone(),
        issued_at: model.issued_at.map(|t| t.with_timezone(&Utc)),
        version: model.version,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn model(status: &str, kind: &str) -> fiscal_documents::Model {
        let now = Utc::now().into();
        fiscal_documents::Model {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            number: 42,
            series: 1,
            kind: kind.to_string(),
            status: status.to_string(),
            authorization_protocol: None,
            cancellation_protocol: None,
            cancellation_justification: None,
            issued_at: None,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_model_to_document_parses_status_and_kind() {
        let document = model_to_document(&model("pending", "nfe")).unwrap();
        assert_eq!(document.status, DocumentStatus::Pending);
        assert_eq!(document.kind, DocumentKind::Nfe);
        assert_eq!(document.number, 42);
    }

    #[test]
    fn test_model_to_document_rejects_unknown_status() {
        let result = model_to_document(&model("posted", "nfe"));
        assert!(matches!(result, Err(PortError::Backend(_))));
    }

    #[test]
    fn test_model_to_document_rejects_unknown_kind() {
        let result = model_to_document(&model("draft", "danfe"));
        assert!(matches!(result, Err(PortError::Backend(_))));
    }
}
