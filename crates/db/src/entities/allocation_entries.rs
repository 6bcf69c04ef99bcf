//! `SeaORM` Entity for the allocation_entries table.
//!
//! Entries are never deleted: a reversal inserts a compensating row and
//! stamps `reversed_by` here.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "allocation_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub source_cost_center: Uuid,
    pub source_amount: Decimal,
    pub mode: String,
    pub reversal_of: Option<Uuid>,
    pub reversed_by: Option<Uuid>,
    pub entered_at: DateTimeWithTimeZone,
    pub version: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::allocation_targets::Entity")]
    AllocationTargets,
}

impl Related<super::allocation_targets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AllocationTargets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
