use crate::auth::{self, Claims};
use crate::dtos::prerequisites::{
    AddPrerequisiteRequest, PrerequisiteEdgeResponse, PrerequisiteTreeResponse,
    SatisfactionResponse,
};
use crate::error::ApiError;
use axum::{Extension, Json, extract::Path};
use database::{
    db::create_connection, error::DomainError, services::prerequisites::PrerequisiteService,
};
use models::role::Role;
use sea_orm::prelude::Uuid;

/// Add a prerequisite edge to a course
#[utoipa::path(
    post,
    path = "/courses/{id}/prerequisites",
    params(
        ("id" = Uuid, Path, description = "Course ID")
    ),
    request_body = AddPrerequisiteRequest,
    responses(
        (status = 200, description = "Edge created", body = PrerequisiteEdgeResponse),
        (status = 404, description = "Course or prerequisite not found"),
        (status = 422, description = "Self reference, ordering violation, or duplicate")
    ),
    security(("jwt" = [])),
    tag = "Prerequisites"
)]
pub async fn add_prerequisite(
    Path(course_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<AddPrerequisiteRequest>,
) -> Result<Json<PrerequisiteEdgeResponse>, ApiError> {
    let caller = auth::resolve_caller(&claims)?;
    if caller.role != Role::Administrator {
        return Err(DomainError::Forbidden.into());
    }

    let db = create_connection().await.map_err(DomainError::from)?;
    let edge =
        PrerequisiteService::add_edge(&db, course_id, body.prerequisite_id, body.mandatory)
            .await?;

    Ok(Json(edge.into()))
}

/// Check whether a student satisfies the prerequisites of a course
#[utoipa::path(
    get,
    path = "/students/{student_id}/prerequisites/{course_id}",
    params(
        ("student_id" = Uuid, Path, description = "Student ID"),
        ("course_id" = Uuid, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Satisfaction report", body = SatisfactionResponse),
        (status = 404, description = "Course not found")
    ),
    security(("jwt" = [])),
    tag = "Prerequisites"
)]
pub async fn check_prerequisites(
    Path((student_id, course_id)): Path<(Uuid, Uuid)>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<SatisfactionResponse>, ApiError> {
    auth::resolve_caller(&claims)?;

    let db = create_connection().await.map_err(DomainError::from)?;
    let report = PrerequisiteService::check_satisfied(&db, student_id, course_id).await?;

    Ok(Json(report.into()))
}

/// Transitive prerequisite tree of a course
#[utoipa::path(
    get,
    path = "/courses/{id}/prerequisite-tree",
    params(
        ("id" = Uuid, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Prerequisite tree", body = PrerequisiteTreeResponse),
        (status = 404, description = "Course not found")
    ),
    security(("jwt" = [])),
    tag = "Prerequisites"
)]
pub async fn get_prerequisite_tree(
    Path(course_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<PrerequisiteTreeResponse>, ApiError> {
    auth::resolve_caller(&claims)?;

    let db = create_connection().await.map_err(DomainError::from)?;
    let tree = PrerequisiteService::build_tree(&db, course_id).await?;

    Ok(Json(tree.into()))
}
