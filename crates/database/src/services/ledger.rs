use crate::entities::{course_offerings, enrollments, evaluation_components, grade_entries};
use crate::error::DomainError;
use chrono::Utc;
use log::warn;
use models::grading::{ScoredComponent, WeightedSummary};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter,
};
use std::collections::HashMap;
use uuid::Uuid;

pub struct GradeLedgerService;

impl GradeLedgerService {
    /// Weighted aggregate of everything recorded against one enrollment.
    ///
    /// Components that were deactivated after their entries were recorded
    /// still contribute their historical weight.
    pub async fn weighted_summary(
        db: &DatabaseConnection,
        enrollment_id: Uuid,
    ) -> Result<WeightedSummary, DomainError> {
        enrollments::Entity::find_by_id(enrollment_id)
            .one(db)
            .await?
            .ok_or(DomainError::NotFound("enrollment"))?;

        let entries = grade_entries::Entity::find()
            .filter(grade_entries::Column::EnrollmentId.eq(enrollment_id))
            .all(db)
            .await?;

        if entries.is_empty() {
            return Ok(WeightedSummary::summarize(&[]));
        }

        let component_ids: Vec<Uuid> = entries.iter().map(|e| e.component_id).collect();
        let components = evaluation_components::Entity::find()
            .filter(evaluation_components::Column::Id.is_in(component_ids))
            .all(db)
            .await?;
        let weight_by_component: HashMap<Uuid, f64> =
            components.iter().map(|c| (c.id, c.percentage)).collect();

        let scored: Vec<ScoredComponent> = entries
            .iter()
            .filter_map(|entry| {
                let Some(&percentage) = weight_by_component.get(&entry.component_id) else {
                    warn!(
                        "grade entry {} references missing component {}",
                        entry.id, entry.component_id
                    );
                    return None;
                };
                Some(ScoredComponent {
                    score: entry.score,
                    percentage,
                })
            })
            .collect();

        Ok(WeightedSummary::summarize(&scored))
    }

    /// Records or overwrites the score for one (enrollment, component) pair.
    ///
    /// Rejected once the owning offering is closed: the ledger must be
    /// stable from that point on, since the closing decision was taken from
    /// its values.
    pub async fn record_entry(
        db: &DatabaseConnection,
        enrollment_id: Uuid,
        component_id: Uuid,
        score: f64,
        recorded_by: Uuid,
        remarks: Option<String>,
    ) -> Result<grade_entries::Model, DomainError> {
        if !(0.0..=100.0).contains(&score) {
            return Err(DomainError::InvalidRange(format!(
                "score must be between 0 and 100, got {score}"
            )));
        }

        let enrollment = enrollments::Entity::find_by_id(enrollment_id)
            .one(db)
            .await?
            .ok_or(DomainError::NotFound("enrollment"))?;

        let offering = course_offerings::Entity::find_by_id(enrollment.offering_id)
            .one(db)
            .await?
            .ok_or(DomainError::NotFound("course offering"))?;
        if offering.closed {
            return Err(DomainError::AlreadyClosed);
        }

        let component = evaluation_components::Entity::find_by_id(component_id)
            .one(db)
            .await?
            .ok_or(DomainError::NotFound("evaluation component"))?;
        if component.course_id != offering.course_id {
            return Err(DomainError::NotFound(
                "evaluation component for this course",
            ));
        }

        let now = Utc::now().naive_utc();
        let existing = grade_entries::Entity::find()
            .filter(grade_entries::Column::EnrollmentId.eq(enrollment_id))
            .filter(grade_entries::Column::ComponentId.eq(component_id))
            .one(db)
            .await?;

        let saved = match existing {
            Some(entry) => {
                let mut updated = entry.into_active_model();
                updated.score = Set(score);
                updated.recorded_by = Set(recorded_by);
                updated.remarks = Set(remarks);
                updated.updated_at = Set(now);
                updated.update(db).await?
            }
            None => {
                grade_entries::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    enrollment_id: Set(enrollment_id),
                    component_id: Set(component_id),
                    score: Set(score),
                    recorded_by: Set(recorded_by),
                    remarks: Set(remarks),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
                .insert(db)
                .await?
            }
        };

        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use models::enrollment_status::EnrollmentStatus;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn enrollment(offering_id: Uuid) -> enrollments::Model {
        enrollments::Model {
            id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            offering_id,
            status: EnrollmentStatus::Registered,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

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

    fn entry(enrollment_id: Uuid, component_id: Uuid, score: f64) -> grade_entries::Model {
        grade_entries::Model {
            id: Uuid::new_v4(),
            enrollment_id,
            component_id,
            score,
            recorded_by: Uuid::new_v4(),
            remarks: None,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    fn component(percentage: f64) -> evaluation_components::Model {
        evaluation_components::Model {
            id: Uuid::new_v4(),
            course_id: Uuid::new_v4(),
            name: "Midterm".to_string(),
            percentage,
            display_order: 1,
            active: true,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    #[tokio::test]
    async fn test_weighted_summary_math() {
        let registered = enrollment(Uuid::new_v4());
        let midterm = component(30.0);
        let exam = component(40.0);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![registered.clone()]])
            .append_query_results([vec![
                entry(registered.id, midterm.id, 80.0),
                entry(registered.id, exam.id, 90.0),
            ]])
            .append_query_results([vec![midterm, exam]])
            .into_connection();

        let summary = GradeLedgerService::weighted_summary(&db, registered.id)
            .await
            .unwrap();

        assert_eq!(summary.weighted_points, 60.0);
        assert_eq!(summary.completed_percentage, 70.0);
        assert_eq!(summary.entry_count, 2);
    }

    #[tokio::test]
    async fn test_weighted_summary_without_entries() {
        let registered = enrollment(Uuid::new_v4());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![registered.clone()]])
            .append_query_results([Vec::<grade_entries::Model>::new()])
            .into_connection();

        let summary = GradeLedgerService::weighted_summary(&db, registered.id)
            .await
            .unwrap();

        assert_eq!(summary.entry_count, 0);
        assert_eq!(summary.partial_average(), None);
    }

    #[tokio::test]
    async fn test_weighted_summary_missing_enrollment() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<enrollments::Model>::new()])
            .into_connection();

        let result = GradeLedgerService::weighted_summary(&db, Uuid::new_v4()).await;

        assert!(matches!(result, Err(DomainError::NotFound("enrollment"))));
    }

    #[tokio::test]
    async fn test_record_entry_rejects_score_out_of_range() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = GradeLedgerService::record_entry(
            &db,
            Uuid::new_v4(),
            Uuid::new_v4(),
            100.5,
            Uuid::new_v4(),
            None,
        )
        .await;

        assert!(matches!(result, Err(DomainError::InvalidRange(_))));
    }

    #[tokio::test]
    async fn test_record_entry_rejected_after_closing() {
        let closed = offering(true);
        let registered = enrollment(closed.id);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![registered.clone()]])
            .append_query_results([vec![closed]])
            .into_connection();

        let result = GradeLedgerService::record_entry(
            &db,
            registered.id,
            Uuid::new_v4(),
            85.0,
            Uuid::new_v4(),
            None,
        )
        .await;

        assert!(matches!(result, Err(DomainError::AlreadyClosed)));
    }
}
