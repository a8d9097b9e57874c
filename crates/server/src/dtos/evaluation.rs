use database::entities::evaluation_components;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddComponentRequest {
    pub name: String,
    pub percentage: f64,
    pub display_order: i16,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateComponentRequest {
    pub name: Option<String>,
    pub percentage: Option<f64>,
    pub display_order: Option<i16>,
    pub active: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ComponentResponse {
    pub id: String,
    pub course_id: String,
    pub name: String,
    pub percentage: f64,
    pub display_order: i16,
    pub active: bool,
}

impl From<evaluation_components::Model> for ComponentResponse {
    fn from(component: evaluation_components::Model) -> Self {
        Self {
            id: component.id.to_string(),
            course_id: component.course_id.to_string(),
            name: component.name,
            percentage: component.percentage,
            display_order: component.display_order,
            active: component.active,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeactivationResponse {
    /// "deactivated" when grade entries keep the component alive,
    /// "deleted" otherwise
    pub outcome: String,
    pub component: Option<ComponentResponse>,
}
