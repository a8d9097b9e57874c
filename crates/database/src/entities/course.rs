use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub code: String, // e.g. "MATH-201"
    pub title: String,
    pub level: i16, // position in the study plan, used for prerequisite ordering
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::course_offering::Entity")]
    CourseOfferings,
    #[sea_orm(has_many = "super::evaluation_component::Entity")]
    EvaluationComponents,
}

impl Related<super::course_offering::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CourseOfferings.def()
    }
}

impl Related<super::evaluation_component::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EvaluationComponents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
