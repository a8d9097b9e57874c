use crate::collaborators::{AuditSink, ClosureAuditEvent, HistoryRecomputer};
use crate::entities::{
    course_offerings, enrollments, evaluation_components, grade_entries, instructor_assignments,
};
use crate::error::DomainError;
use chrono::Utc;
use log::{info, warn};
use models::{
    enrollment_status::EnrollmentStatus,
    grading::{ClosingStats, ScoredComponent, WeightedSummary},
    role::{Caller, Role},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, IntoActiveModel, QueryFilter, QuerySelect, TransactionTrait, sea_query::Expr,
};
use std::collections::HashMap;
use uuid::Uuid;

/// Orchestrates the one bulk mutation in the system: deciding and committing
/// the terminal status of every enrollment when a course offering is closed,
/// and the inverse reopen operation.
pub struct ClosingService;

impl ClosingService {
    /// Closes an offering: decides a terminal status for every registered
    /// enrollment from its weighted grade, persists all of them together
    /// with the history rollups and the closed flag in one transaction, and
    /// emits one audit event after commit.
    ///
    /// Allowed for administrators and for the instructor assigned to this
    /// exact offering. A concurrent close on the same offering serializes on
    /// the offering row; the loser observes `AlreadyClosed`.
    pub async fn close_offering(
        db: &DatabaseConnection,
        offering_id: Uuid,
        caller: &Caller,
        history: &dyn HistoryRecomputer,
        audit: &dyn AuditSink,
    ) -> Result<ClosingStats, DomainError> {
        let offering = course_offerings::Entity::find_by_id(offering_id)
            .one(db)
            .await?
            .ok_or(DomainError::NotFound("course offering"))?;

        let assigned_instructor = Self::authorize_closer(db, &offering, caller).await?;

        if offering.closed {
            return Err(DomainError::AlreadyClosed);
        }

        let txn = db.begin().await?;

        // Re-read under an exclusive row lock. Everything before this point
        // was advisory; this check is what makes a double close impossible.
        let offering = course_offerings::Entity::find_by_id(offering_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(DomainError::NotFound("course offering"))?;
        if offering.closed {
            return Err(DomainError::AlreadyClosed);
        }

        let open_enrollments = enrollments::Entity::find()
            .filter(enrollments::Column::OfferingId.eq(offering_id))
            .filter(enrollments::Column::Status.eq(EnrollmentStatus::Registered))
            .all(&txn)
            .await?;

        let summaries = Self::summaries_for(&txn, &offering, &open_enrollments).await?;

        let mut stats = ClosingStats::default();
        let mut ids_by_status: HashMap<EnrollmentStatus, Vec<Uuid>> = HashMap::new();
        for enrollment in &open_enrollments {
            let summary = summaries
                .get(&enrollment.id)
                .copied()
                .unwrap_or_else(|| WeightedSummary::summarize(&[]));
            let status = summary.outcome();

            stats.record(status);
            ids_by_status.entry(status).or_default().push(enrollment.id);
        }

        let now = Utc::now().naive_utc();
        for (status, enrollment_ids) in &ids_by_status {
            enrollments::Entity::update_many()
                .col_expr(enrollments::Column::Status, Expr::value(*status))
                .col_expr(enrollments::Column::UpdatedAt, Expr::value(now))
                .filter(enrollments::Column::Id.is_in(enrollment_ids.clone()))
                .exec(&txn)
                .await?;
        }

        let mut student_ids: Vec<Uuid> =
            open_enrollments.iter().map(|e| e.student_id).collect();
        student_ids.sort();
        student_ids.dedup();
        for student_id in &student_ids {
            history
                .recompute(&txn, *student_id, offering.year, &offering.period)
                .await?;
        }

        let mut closing = offering.clone().into_active_model();
        closing.closed = Set(true);
        closing.closed_at = Set(Some(now));
        closing.closed_by = Set(Some(caller.id));
        closing.updated_at = Set(now);
        closing.update(&txn).await?;

        txn.commit().await?;

        info!(
            "closed offering {offering_id} ({} {} {}): {} passed, {} failed, {} withdrawn",
            offering.year, offering.period, offering.section,
            stats.passed, stats.failed, stats.withdrawn
        );

        let event = ClosureAuditEvent {
            action: "close",
            offering_id,
            actor_id: caller.id,
            assigned_instructor: Some(assigned_instructor),
            stats: Some(stats),
        };
        if let Err(err) = audit.record(db, &event).await {
            warn!("audit sink failed for offering {offering_id}: {err}");
        }

        Ok(stats)
    }

    /// Undoes a close: resets every enrollment under the offering back to
    /// `registered` and clears the closing metadata, with the same
    /// all-or-nothing transaction scope as closing. Administrator-only.
    pub async fn reopen_offering(
        db: &DatabaseConnection,
        offering_id: Uuid,
        caller: &Caller,
        history: &dyn HistoryRecomputer,
        audit: &dyn AuditSink,
    ) -> Result<(), DomainError> {
        if !caller.is_admin() {
            return Err(DomainError::Forbidden);
        }

        let offering = course_offerings::Entity::find_by_id(offering_id)
            .one(db)
            .await?
            .ok_or(DomainError::NotFound("course offering"))?;
        if !offering.closed {
            return Err(DomainError::NotClosed);
        }

        let txn = db.begin().await?;

        let offering = course_offerings::Entity::find_by_id(offering_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(DomainError::NotFound("course offering"))?;
        if !offering.closed {
            return Err(DomainError::NotClosed);
        }

        let affected = enrollments::Entity::find()
            .filter(enrollments::Column::OfferingId.eq(offering_id))
            .all(&txn)
            .await?;

        let now = Utc::now().naive_utc();
        enrollments::Entity::update_many()
            .col_expr(
                enrollments::Column::Status,
                Expr::value(EnrollmentStatus::Registered),
            )
            .col_expr(enrollments::Column::UpdatedAt, Expr::value(now))
            .filter(enrollments::Column::OfferingId.eq(offering_id))
            .exec(&txn)
            .await?;

        let mut student_ids: Vec<Uuid> = affected.iter().map(|e| e.student_id).collect();
        student_ids.sort();
        student_ids.dedup();
        for student_id in &student_ids {
            history
                .recompute(&txn, *student_id, offering.year, &offering.period)
                .await?;
        }

        let mut reopened = offering.into_active_model();
        reopened.closed = Set(false);
        reopened.closed_at = Set(None);
        reopened.closed_by = Set(None);
        reopened.updated_at = Set(now);
        reopened.update(&txn).await?;

        txn.commit().await?;

        info!(
            "reopened offering {offering_id}: {} enrollments reset",
            affected.len()
        );

        let event = ClosureAuditEvent {
            action: "reopen",
            offering_id,
            actor_id: caller.id,
            assigned_instructor: None,
            stats: None,
        };
        if let Err(err) = audit.record(db, &event).await {
            warn!("audit sink failed for offering {offering_id}: {err}");
        }

        Ok(())
    }

    /// Resolves who may close this offering. Returns the assigned
    /// instructor's id for the audit trail.
    async fn authorize_closer(
        db: &DatabaseConnection,
        offering: &course_offerings::Model,
        caller: &Caller,
    ) -> Result<Uuid, DomainError> {
        let assignment_query = instructor_assignments::Entity::find()
            .filter(instructor_assignments::Column::CourseId.eq(offering.course_id))
            .filter(instructor_assignments::Column::Year.eq(offering.year))
            .filter(instructor_assignments::Column::Period.eq(offering.period.clone()))
            .filter(instructor_assignments::Column::Section.eq(offering.section.clone()));

        match caller.role {
            Role::Administrator => {
                // Admins may always close, but the offering must have an
                // assigned instructor on record
                let assignment = assignment_query
                    .one(db)
                    .await?
                    .ok_or(DomainError::NotFound("instructor assignment"))?;
                Ok(assignment.instructor_id)
            }
            Role::Instructor => {
                let assignment = assignment_query
                    .filter(instructor_assignments::Column::InstructorId.eq(caller.id))
                    .one(db)
                    .await?
                    .ok_or(DomainError::NotAssigned)?;
                Ok(assignment.instructor_id)
            }
            Role::Student => Err(DomainError::Forbidden),
        }
    }

    /// Weighted summaries for every open enrollment, computed from the
    /// ledger rows inside the closing transaction
    async fn summaries_for(
        txn: &DatabaseTransaction,
        offering: &course_offerings::Model,
        open_enrollments: &[enrollments::Model],
    ) -> Result<HashMap<Uuid, WeightedSummary>, DomainError> {
        if open_enrollments.is_empty() {
            return Ok(HashMap::new());
        }

        let enrollment_ids: Vec<Uuid> = open_enrollments.iter().map(|e| e.id).collect();
        let entries = grade_entries::Entity::find()
            .filter(grade_entries::Column::EnrollmentId.is_in(enrollment_ids))
            .all(txn)
            .await?;

        let components = evaluation_components::Entity::find()
            .filter(evaluation_components::Column::CourseId.eq(offering.course_id))
            .all(txn)
            .await?;
        let weight_by_component: HashMap<Uuid, f64> =
            components.iter().map(|c| (c.id, c.percentage)).collect();

        let mut scored_by_enrollment: HashMap<Uuid, Vec<ScoredComponent>> = HashMap::new();
        for entry in entries {
            let Some(&percentage) = weight_by_component.get(&entry.component_id) else {
                warn!(
                    "grade entry {} references missing component {}",
                    entry.id, entry.component_id
                );
                continue;
            };
            scored_by_enrollment
                .entry(entry.enrollment_id)
                .or_default()
                .push(ScoredComponent {
                    score: entry.score,
                    percentage,
                });
        }

        let mut summaries = HashMap::new();
        for enrollment in open_enrollments {
            let scored = scored_by_enrollment
                .remove(&enrollment.id)
                .unwrap_or_default();
            summaries.insert(enrollment.id, WeightedSummary::summarize(&scored));
        }

        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{SqlHistoryRecomputer, TableAuditSink};
    use chrono::NaiveDateTime;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn offering(closed: bool) -> course_offerings::Model {
        course_offerings::Model {
            id: Uuid::new_v4(),
            course_id: Uuid::new_v4(),
            year: 2025,
            period: "First".to_string(),
            section: "A".to_string(),
            closed,
            closed_at: None,
            closed_by: None,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    fn assignment(
        offering: &course_offerings::Model,
        instructor_id: Uuid,
    ) -> instructor_assignments::Model {
        instructor_assignments::Model {
            id: Uuid::new_v4(),
            instructor_id,
            course_id: offering.course_id,
            year: offering.year,
            period: offering.period.clone(),
            section: offering.section.clone(),
            created_at: NaiveDateTime::default(),
        }
    }

    #[tokio::test]
    async fn test_close_forbidden_for_students() {
        let open = offering(false);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![open.clone()]])
            .into_connection();

        let student = Caller::new(Uuid::new_v4(), Role::Student);
        let result = ClosingService::close_offering(
            &db,
            open.id,
            &student,
            &SqlHistoryRecomputer,
            &TableAuditSink,
        )
        .await;

        assert!(matches!(result, Err(DomainError::Forbidden)));
    }

    #[tokio::test]
    async fn test_close_rejects_unassigned_instructor() {
        let open = offering(false);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![open.clone()]])
            .append_query_results([Vec::<instructor_assignments::Model>::new()])
            .into_connection();

        let instructor = Caller::new(Uuid::new_v4(), Role::Instructor);
        let result = ClosingService::close_offering(
            &db,
            open.id,
            &instructor,
            &SqlHistoryRecomputer,
            &TableAuditSink,
        )
        .await;

        assert!(matches!(result, Err(DomainError::NotAssigned)));
    }

    #[tokio::test]
    async fn test_close_rejects_already_closed_offering() {
        let already = offering(true);
        let admin = Caller::new(Uuid::new_v4(), Role::Administrator);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![already.clone()]])
            .append_query_results([vec![assignment(&already, Uuid::new_v4())]])
            .into_connection();

        let result = ClosingService::close_offering(
            &db,
            already.id,
            &admin,
            &SqlHistoryRecomputer,
            &TableAuditSink,
        )
        .await;

        assert!(matches!(result, Err(DomainError::AlreadyClosed)));
    }

    #[tokio::test]
    async fn test_close_missing_offering() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<course_offerings::Model>::new()])
            .into_connection();

        let admin = Caller::new(Uuid::new_v4(), Role::Administrator);
        let result = ClosingService::close_offering(
            &db,
            Uuid::new_v4(),
            &admin,
            &SqlHistoryRecomputer,
            &TableAuditSink,
        )
        .await;

        assert!(matches!(
            result,
            Err(DomainError::NotFound("course offering"))
        ));
    }

    #[tokio::test]
    async fn test_reopen_forbidden_for_non_admins() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let instructor = Caller::new(Uuid::new_v4(), Role::Instructor);
        let result = ClosingService::reopen_offering(
            &db,
            Uuid::new_v4(),
            &instructor,
            &SqlHistoryRecomputer,
            &TableAuditSink,
        )
        .await;

        assert!(matches!(result, Err(DomainError::Forbidden)));
    }

    #[tokio::test]
    async fn test_reopen_rejects_open_offering() {
        let open = offering(false);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![open.clone()]])
            .into_connection();

        let admin = Caller::new(Uuid::new_v4(), Role::Administrator);
        let result = ClosingService::reopen_offering(
            &db,
            open.id,
            &admin,
            &SqlHistoryRecomputer,
            &TableAuditSink,
        )
        .await;

        assert!(matches!(result, Err(DomainError::NotClosed)));
    }
}
