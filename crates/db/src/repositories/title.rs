//! Financial title repository implementing the core `TitleStore` port.
//!
//! `apply_matches` persists one whole matcher batch inside a single
//! database transaction: link rows plus title settlements commit together
//! or not at all.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use fiscus_core::ports::{PortError, TitleStore};
use fiscus_core::reconciliation::{
    AppliedMatch, BankTransaction, FinancialTitle, TitleKind, TitleStatus,
};
use fiscus_shared::types::{BankAccountId, BankTransactionId, FinancialTitleId};

use crate::entities::{bank_transactions, financial_titles, reconciliation_links};

const MATCHABLE_STATUSES: [&str; 3] = ["open", "overdue", "partial"];

/// SeaORM-backed title store.
#[derive(Debug, Clone)]
pub struct TitleRepository {
    db: DatabaseConnection,
}

impl TitleRepository {
    /// Creates a new title repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts a financial title (seeding/import concern, outside the port).
    ///
    /// # Errors
    ///
    /// Returns `PortError::Backend` when the insert fails.
    pub async fn insert_title(&self, title: &FinancialTitle) -> Result<(), PortError> {
        let now = Utc::now().into();
        let model = financial_titles::ActiveModel {
            id: Set(title.id.0),
            account_id: Set(title.account.0),
            kind: Set(title.kind.as_str().to_string()),
            amount: Set(title.amount),
            open_amount: Set(title.open_amount),
            due_date: Set(title.due_date),
            descriptor: Set(title.descriptor.clone()),
            status: Set(title.status.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };
        model
            .insert(&self.db)
            .await
            .map_err(|e| PortError::Backend(e.to_string()))?;
        Ok(())
    }

    /// Inserts an imported bank statement line (import concern, outside the
    /// port).
    ///
    /// # Errors
    ///
    /// Returns `PortError::Backend` when the insert fails.
    pub async fn insert_bank_transaction(
        &self,
        txn: &BankTransaction,
    ) -> Result<(), PortError> {
        let model = bank_transactions::ActiveModel {
            id: Set(txn.id.0),
            account_id: Set(txn.account.0),
            amount: Set(txn.amount),
            posted_at: Set(txn.posted_at),
            descriptor: Set(txn.descriptor.clone()),
            imported_at: Set(Utc::now().into()),
        };
        model
            .insert(&self.db)
            .await
            .map_err(|e| PortError::Backend(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl TitleStore for TitleRepository {
    async fn open_titles(
        &self,
        account: BankAccountId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<FinancialTitle>, PortError> {
        let models = financial_titles::Entity::find()
            .filter(financial_titles::Column::AccountId.eq(account.0))
            .filter(financial_titles::Column::Status.is_in(MATCHABLE_STATUSES))
            .filter(financial_titles::Column::DueDate.gte(from))
            .filter(financial_titles::Column::DueDate.lte(to))
            .order_by_asc(financial_titles::Column::DueDate)
            .order_by_asc(financial_titles::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| PortError::Backend(e.to_string()))?;

        models.iter().map(model_to_title).collect()
    }

    async fn linked_bank_transactions(
        &self,
        batch: &[BankTransactionId],
    ) -> Result<Vec<BankTransactionId>, PortError> {
        let ids: Vec<Uuid> = batch.iter().map(|id| id.0).collect();
        let links = reconciliation_links::Entity::find()
            .filter(reconciliation_links::Column::BankTransactionId.is_in(ids))
            .all(&self.db)
            .await
            .map_err(|e| PortError::Backend(e.to_string()))?;

        let mut linked: Vec<BankTransactionId> = links
            .iter()
            .map(|l| BankTransactionId(l.bank_transaction_id))
            .collect();
        linked.sort_unstable();
        linked.dedup();
        Ok(linked)
    }

    async fn apply_matches(&self, matches: &[AppliedMatch]) -> Result<(), PortError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PortError::Backend(e.to_string()))?;

        for m in matches {
            for settlement in &m.settlements {
                let link = reconciliation_links::ActiveModel {
                    id: Set(Uuid::now_v7()),
                    bank_transaction_id: Set(m.proposal.bank_transaction_id.0),
                    financial_title_id: Set(settlement.title_id.0),
                    applied_amount: Set(settlement.applied_amount),
                    confidence: Set(m.proposal.confidence),
                    basis: Set(m.proposal.basis.as_str().to_string()),
                    created_at: Set(Utc::now().into()),
                };
                link.insert(&txn)
                    .await
                    .map_err(|e| PortError::Backend(e.to_string()))?;

                let title = financial_titles::Entity::find_by_id(settlement.title_id.0)
                    .one(&txn)
                    .await
                    .map_err(|e| PortError::Backend(e.to_string()))?
                    .ok_or(PortError::NotFound)?;

                let new_open = title.open_amount - settlement.applied_amount;
                let mut active: financial_titles::ActiveModel = title.into();
                active.open_amount = Set(new_open);
                active.status = Set(settlement.new_status.as_str().to_string());
                active.updated_at = Set(Utc::now().into());
                active
                    .update(&txn)
                    .await
                    .map_err(|e| PortError::Backend(e.to_string()))?;
            }
        }

        txn.commit()
            .await
            .map_err(|e| PortError::Backend(e.to_string()))?;

        tracing::info!(applied = matches.len(), "reconciliation batch committed");
        Ok(())
    }
}

fn model_to_title(model: &financial_titles::Model) -> Result<FinancialTitle, PortError> {
    let status = TitleStatus::parse(&model.status)
        .ok_or_else(|| PortError::Backend(format!("invalid title status '{}'", model.status)))?;
    let kind = TitleKind::parse(&model.kind)
        .ok_or_else(|| PortError::Backend(format!("invalid title kind '{}'", model.kind)))?;

    Ok(FinancialTitle {
        id: FinancialTitleId(model.id),
        account: BankAccountId(model.account_id),
        kind,
        amount: model.amount,
        open_amount: model.open_amount,
        due_date: model.due_date,
        descriptor: model.descriptor.clone(),
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_model_to_title_parses_status_and_kind() {
        let model = financial_titles::Model {
            id: Uuid::new_v4(),
            account_id: Uuid::new_v4(),
            kind: "receivable".to_string(),
            amount: dec!(1000),
            open_amount: dec!(400),
            due_date: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            descriptor: "NF 12 ACME".to_string(),
            status: "partial".to_string(),
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        };

        let title = model_to_title(&model).unwrap();
        assert_eq!(title.status, TitleStatus::Partial);
        assert_eq!(title.kind, TitleKind::Receivable);
        assert_eq!(title.open_amount, dec!(400));
    }

    #[test]
    fn test_model_to_title_rejects_unknown_status() {
        let model = financial_titles::Model {
            id: Uuid::new_v4(),
            account_id: Uuid::new_v4(),
            kind: "payable".to_string(),
            amount: dec!(10),
            open_amount: dec!(10),
            due_date: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            descriptor: String::new(),
            status: "written_off".to_string(),
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        };
        assert!(matches!(model_to_title(&model), Err(PortError::Backend(_))));
    }
}
