use crate::auth::{self, Claims};
use crate::dtos::evaluation::{
    AddComponentRequest, ComponentResponse, DeactivationResponse, UpdateComponentRequest,
};
use crate::error::ApiError;
use axum::{Extension, Json, extract::Path};
use database::{
    db::create_connection,
    error::DomainError,
    services::evaluation::{ComponentChanges, DeactivationOutcome, EvaluationService},
};
use models::role::Role;
use sea_orm::prelude::Uuid;

/// Add an evaluation component to a course's grading scheme
#[utoipa::path(
    post,
    path = "/courses/{id}/evaluation-components",
    params(
        ("id" = Uuid, Path, description = "Course ID")
    ),
    request_body = AddComponentRequest,
    responses(
        (status = 200, description = "Component created", body = ComponentResponse),
        (status = 404, description = "Course not found"),
        (status = 422, description = "Invalid range or over-allocated scheme")
    ),
    security(("jwt" = [])),
    tag = "Evaluation"
)]
pub async fn add_component(
    Path(course_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<AddComponentRequest>,
) -> Result<Json<ComponentResponse>, ApiError> {
    let caller = auth::resolve_caller(&claims)?;
    if caller.role == Role::Student {
        return Err(DomainError::Forbidden.into());
    }

    let db = create_connection().await.map_err(DomainError::from)?;
    let component = EvaluationService::add_component(
        &db,
        course_id,
        body.name,
        body.percentage,
        body.display_order,
    )
    .await?;

    Ok(Json(component.into()))
}

/// Update an evaluation component
#[utoipa::path(
    patch,
    path = "/evaluation-components/{id}",
    params(
        ("id" = Uuid, Path, description = "Evaluation component ID")
    ),
    request_body = UpdateComponentRequest,
    responses(
        (status = 200, description = "Component updated", body = ComponentResponse),
        (status = 404, description = "Component not found"),
        (status = 422, description = "Invalid range or over-allocated scheme")
    ),
    security(("jwt" = [])),
    tag = "Evaluation"
)]
pub async fn update_component(
    Path(component_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<UpdateComponentRequest>,
) -> Result<Json<ComponentResponse>, ApiError> {
    let caller = auth::resolve_caller(&claims)?;
    if caller.role == Role::Student {
        return Err(DomainError::Forbidden.into());
    }

    let db = create_connection().await.map_err(DomainError::from)?;
    let changes = ComponentChanges {
        name: body.name,
        percentage: body.percentage,
        display_order: body.display_order,
        active: body.active,
    };
    let component = EvaluationService::update_component(&db, component_id, changes).await?;

    Ok(Json(component.into()))
}

/// Deactivate an evaluation component, deleting it when no grade entry
/// references it
#[utoipa::path(
    delete,
    path = "/evaluation-components/{id}",
    params(
        ("id" = Uuid, Path, description = "Evaluation component ID")
    ),
    responses(
        (status = 200, description = "Component deactivated or deleted", body = DeactivationResponse),
        (status = 404, description = "Component not found")
    ),
    security(("jwt" = [])),
    tag = "Evaluation"
)]
pub async fn deactivate_component(
    Path(component_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<DeactivationResponse>, ApiError> {
    let caller = auth::resolve_caller(&claims)?;
    if caller.role == Role::Student {
        return Err(DomainError::Forbidden.into());
    }

    let db = create_connection().await.map_err(DomainError::from)?;
    let response = match EvaluationService::deactivate_component(&db, component_id).await? {
        DeactivationOutcome::Deactivated(component) => DeactivationResponse {
            outcome: "deactivated".to_string(),
            component: Some(component.into()),
        },
        DeactivationOutcome::Deleted => DeactivationResponse {
            outcome: "deleted".to_string(),
            component: None,
        },
    };

    Ok(Json(response))
}
