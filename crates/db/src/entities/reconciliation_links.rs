//! `SeaORM` Entity for the reconciliation_links table.
//!
//! One row per (bank transaction, title) pair an applied match settled.
//! Links are created by the matcher only; they are the idempotence marker
//! that keeps a re-imported batch from settling twice.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "reconciliation_links")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub bank_transaction_id: Uuid,
    pub financial_title_id: Uuid,
    pub applied_amount: Decimal,
    pub confidence: Decimal,
    pub basis: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::bank_transactions::Entity",
        from = "Column::BankTransactionId",
        to = "super::bank_transactions::Column::Id"
    )]
    BankTransactions,
    #[sea_orm(
        belongs_to = "super::financial_titles::Entity",
        from = "Column::FinancialTitleId",
        to = "super::financial_titles::Column::Id"
    )]
    FinancialTitles,
}

impl Related<super::bank_transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BankTransactions.def()
    }
}

impl Related<super::financial_titles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FinancialTitles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
