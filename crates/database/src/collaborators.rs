use crate::entities::{academic_histories, audit_events, course_offerings, enrollments};
use async_trait::async_trait;
use chrono::Utc;
use models::{enrollment_status::EnrollmentStatus, grading::ClosingStats};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, IntoActiveModel, QueryFilter,
};
use serde::Serialize;
use uuid::Uuid;

/// Recomputes the external academic-history rollup for one student and one
/// term. Invoked by the closing coordinator inside its transaction so a
/// rollback also discards the rollup.
#[async_trait]
pub trait HistoryRecomputer: Send + Sync {
    async fn recompute(
        &self,
        txn: &DatabaseTransaction,
        student_id: Uuid,
        year: i16,
        period: &str,
    ) -> Result<(), DbErr>;
}

/// Fire-and-forget recorder of closing/reopening events. Runs after the
/// domain transaction commits; a failure here is logged by the caller and
/// never rolls anything back.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, db: &DatabaseConnection, event: &ClosureAuditEvent)
    -> Result<(), DbErr>;
}

/// Before/after summary of one closing or reopening
#[derive(Debug, Clone, Serialize)]
pub struct ClosureAuditEvent {
    pub action: &'static str,
    pub offering_id: Uuid,
    pub actor_id: Uuid,
    pub assigned_instructor: Option<Uuid>,
    pub stats: Option<ClosingStats>,
}

/// Default history collaborator: rolls the student's enrollments for the
/// term up into one `academic_histories` row
pub struct SqlHistoryRecomputer;

#[async_trait]
impl HistoryRecomputer for SqlHistoryRecomputer {
    async fn recompute(
        &self,
        txn: &DatabaseTransaction,
        student_id: Uuid,
        year: i16,
        period: &str,
    ) -> Result<(), DbErr> {
        let term_offerings = course_offerings::Entity::find()
            .filter(course_offerings::Column::Year.eq(year))
            .filter(course_offerings::Column::Period.eq(period))
            .all(txn)
            .await?;
        let offering_ids: Vec<Uuid> = term_offerings.iter().map(|o| o.id).collect();

        let term_enrollments = enrollments::Entity::find()
            .filter(enrollments::Column::StudentId.eq(student_id))
            .filter(enrollments::Column::OfferingId.is_in(offering_ids))
            .all(txn)
            .await?;

        let mut passed = 0;
        let mut failed = 0;
        let mut withdrawn = 0;
        for enrollment in &term_enrollments {
            match enrollment.status {
                EnrollmentStatus::Passed => passed += 1,
                EnrollmentStatus::Failed => failed += 1,
                EnrollmentStatus::Withdrawn => withdrawn += 1,
                EnrollmentStatus::Registered => {}
            }
        }

        let existing = academic_histories::Entity::find()
            .filter(academic_histories::Column::StudentId.eq(student_id))
            .filter(academic_histories::Column::Year.eq(year))
            .filter(academic_histories::Column::Period.eq(period))
            .one(txn)
            .await?;

        let now = Utc::now().naive_utc();
        match existing {
            Some(row) => {
                let mut rollup = row.into_active_model();
                rollup.courses_taken = Set(term_enrollments.len() as i32);
                rollup.courses_passed = Set(passed);
                rollup.courses_failed = Set(failed);
                rollup.courses_withdrawn = Set(withdrawn);
                rollup.updated_at = Set(now);
                rollup.update(txn).await?;
            }
            None => {
                academic_histories::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    student_id: Set(student_id),
                    year: Set(year),
                    period: Set(period.to_string()),
                    courses_taken: Set(term_enrollments.len() as i32),
                    courses_passed: Set(passed),
                    courses_failed: Set(failed),
                    courses_withdrawn: Set(withdrawn),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
                .insert(txn)
                .await?;
            }
        }

        Ok(())
    }
}

/// Default audit collaborator: one row per event in `audit_events`
pub struct TableAuditSink;

#[async_trait]
impl AuditSink for TableAuditSink {
    async fn record(
        &self,
        db: &DatabaseConnection,
        event: &ClosureAuditEvent,
    ) -> Result<(), DbErr> {
        audit_events::ActiveModel {
            id: Set(Uuid::new_v4()),
            action: Set(event.action.to_string()),
            offering_id: Set(event.offering_id),
            actor_id: Set(event.actor_id),
            detail: Set(serde_json::json!({
                "assigned_instructor": event.assigned_instructor,
                "stats": event.stats,
            })),
            created_at: Set(Utc::now().naive_utc()),
        }
        .insert(db)
        .await?;

        Ok(())
    }
}
