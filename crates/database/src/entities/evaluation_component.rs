use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A named, percentage-weighted grading item belonging to a course
/// definition (not to an offering). The sum of active percentages per course
/// never exceeds 100.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "evaluation_components")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub course_id: Uuid,
    pub name: String, // e.g. "Midterm 1"
    pub percentage: f64,
    pub display_order: i16,
    pub active: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::Id"
    )]
    Course,
    #[sea_orm(has_many = "super::grade_entry::Entity")]
    GradeEntries,
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::grade_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GradeEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
