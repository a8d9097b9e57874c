use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "instructors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::instructor_assignment::Entity")]
    InstructorAssignments,
}

impl Related<super::instructor_assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InstructorAssignments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
