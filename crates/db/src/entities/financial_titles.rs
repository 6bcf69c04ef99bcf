//! `SeaORM` Entity for the financial_titles table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "financial_titles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub account_id: Uuid,
    pub kind: String,
    pub amount: Decimal,
    pub open_amount: Decimal,
    pub due_date: Date,
    pub descriptor: String,
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::reconciliation_links::Entity")]
    ReconciliationLinks,
}

impl Related<super::reconciliation_links::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReconciliationLinks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
