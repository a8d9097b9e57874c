use crate::auth::{self, Claims};
use crate::dtos::grades::{GradeEntryResponse, RecordGradeRequest, WeightedGradeResponse};
use crate::error::ApiError;
use axum::{Extension, Json, extract::Path};
use database::{
    db::create_connection, error::DomainError, services::ledger::GradeLedgerService,
};
use models::role::Role;
use sea_orm::prelude::Uuid;

/// Weighted grade view for one enrollment
#[utoipa::path(
    get,
    path = "/enrollments/{id}/grade",
    params(
        ("id" = Uuid, Path, description = "Enrollment ID")
    ),
    responses(
        (status = 200, description = "Weighted grade", body = WeightedGradeResponse),
        (status = 404, description = "Enrollment not found")
    ),
    security(("jwt" = [])),
    tag = "Grades"
)]
pub async fn get_weighted_grade(
    Path(enrollment_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<WeightedGradeResponse>, ApiError> {
    auth::resolve_caller(&claims)?;

    let db = create_connection().await.map_err(DomainError::from)?;
    let summary = GradeLedgerService::weighted_summary(&db, enrollment_id).await?;

    Ok(Json(summary.into()))
}

/// Record or overwrite the score for one evaluation component
#[utoipa::path(
    put,
    path = "/enrollments/{id}/grades/{component_id}",
    params(
        ("id" = Uuid, Path, description = "Enrollment ID"),
        ("component_id" = Uuid, Path, description = "Evaluation component ID")
    ),
    request_body = RecordGradeRequest,
    responses(
        (status = 200, description = "Score recorded", body = GradeEntryResponse),
        (status = 404, description = "Enrollment or component not found"),
        (status = 409, description = "Offering is closed, ledger is frozen"),
        (status = 422, description = "Score out of range")
    ),
    security(("jwt" = [])),
    tag = "Grades"
)]
pub async fn record_grade(
    Path((enrollment_id, component_id)): Path<(Uuid, Uuid)>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<RecordGradeRequest>,
) -> Result<Json<GradeEntryResponse>, ApiError> {
    let caller = auth::resolve_caller(&claims)?;
    if caller.role == Role::Student {
        return Err(DomainError::Forbidden.into());
    }

    let db = create_connection().await.map_err(DomainError::from)?;
    let entry = GradeLedgerService::record_entry(
        &db,
        enrollment_id,
        component_id,
        body.score,
        caller.id,
        body.remarks,
    )
    .await?;

    Ok(Json(entry.into()))
}
