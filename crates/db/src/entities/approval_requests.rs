//! `SeaORM` Entity for the approval_requests table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "approval_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub subject_kind: String,
    pub subject_id: Uuid,
    pub requested_action: String,
    pub submitted_by: Uuid,
    pub state: String,
    pub version: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::approval_decisions::Entity")]
    ApprovalDecisions,
}

impl Related<super::approval_decisions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ApprovalDecisions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
