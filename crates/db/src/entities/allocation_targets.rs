//! `SeaORM` Entity for the allocation_targets table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "allocation_targets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub entry_id: Uuid,
    pub seq: i32,
    pub cost_center: Uuid,
    pub amount: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::allocation_entries::Entity",
        from = "Column::EntryId",
        to = "super::allocation_entries::Column::Id"
    )]
    AllocationEntries,
}

impl Related<super::allocation_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AllocationEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
