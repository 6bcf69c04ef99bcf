//! `SeaORM` Entity for the bank_transactions table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "bank_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub account_id: Uuid,
    pub amount: Decimal,
    pub posted_at: Date,
    pub descriptor: String,
    pub imported_at: DateTimeWithTimeZone,
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
