use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Best-effort audit record of a closing or reopening. Written after the
/// domain transaction commits; never part of it.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "audit_events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub action: String, // "close" or "reopen"
    pub offering_id: Uuid,
    pub actor_id: Uuid,
    pub detail: Json,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
