use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One scored entry against an enrollment and an evaluation component. At
/// most one entry exists per (enrollment, component) pair; entries freeze
/// once the owning offering is closed.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "grade_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub enrollment_id: Uuid,
    pub component_id: Uuid,
    pub score: f64,
    pub recorded_by: Uuid,
    pub remarks: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::enrollment::Entity",
        from = "Column::EnrollmentId",
        to = "super::enrollment::Column::Id"
    )]
    Enrollment,
    #[sea_orm(
        belongs_to = "super::evaluation_component::Entity",
        from = "Column::ComponentId",
        to = "super::evaluation_component::Column::Id"
    )]
    EvaluationComponent,
}

impl Related<super::enrollment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollment.def()
    }
}

impl Related<super::evaluation_component::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EvaluationComponent.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
