use crate::auth::{self, Claims};
use crate::dtos::closing::ClosingStatsResponse;
use crate::error::ApiError;
use axum::{Extension, Json, extract::Path, http::StatusCode};
use database::{
    collaborators::{SqlHistoryRecomputer, TableAuditSink},
    db::create_connection,
    error::DomainError,
    services::closing::ClosingService,
};
use sea_orm::prelude::Uuid;

/// Close a course offering, finalizing every registered enrollment
#[utoipa::path(
    post,
    path = "/offerings/{id}/close",
    params(
        ("id" = Uuid, Path, description = "Course offering ID")
    ),
    responses(
        (status = 200, description = "Offering closed", body = ClosingStatsResponse),
        (status = 403, description = "Caller may not close this offering"),
        (status = 404, description = "Offering not found"),
        (status = 409, description = "Offering is already closed"),
        (status = 503, description = "Transaction failed, safe to retry")
    ),
    security(("jwt" = [])),
    tag = "Closing"
)]
pub async fn close_offering(
    Path(id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ClosingStatsResponse>, ApiError> {
    let caller = auth::resolve_caller(&claims)?;
    let db = create_connection().await.map_err(DomainError::from)?;

    let stats =
        ClosingService::close_offering(&db, id, &caller, &SqlHistoryRecomputer, &TableAuditSink)
            .await?;

    Ok(Json(stats.into()))
}

/// Reopen a closed offering, resetting every enrollment to registered
#[utoipa::path(
    post,
    path = "/offerings/{id}/reopen",
    params(
        ("id" = Uuid, Path, description = "Course offering ID")
    ),
    responses(
        (status = 204, description = "Offering reopened"),
        (status = 403, description = "Only administrators may reopen"),
        (status = 404, description = "Offering not found"),
        (status = 409, description = "Offering is not closed"),
        (status = 503, description = "Transaction failed, safe to retry")
    ),
    security(("jwt" = [])),
    tag = "Closing"
)]
pub async fn reopen_offering(
    Path(id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<StatusCode, ApiError> {
    let caller = auth::resolve_caller(&claims)?;
    let db = create_connection().await.map_err(DomainError::from)?;

    ClosingService::reopen_offering(&db, id, &caller, &SqlHistoryRecomputer, &TableAuditSink)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
