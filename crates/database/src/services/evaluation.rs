use crate::entities::{courses, evaluation_components, grade_entries};
use crate::error::DomainError;
use chrono::Utc;
use log::info;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter,
};
use uuid::Uuid;

/// Partial update of an evaluation component; absent fields keep their
/// current value
#[derive(Debug, Clone, Default)]
pub struct ComponentChanges {
    pub name: Option<String>,
    pub percentage: Option<f64>,
    pub display_order: Option<i16>,
    pub active: Option<bool>,
}

/// How a deactivation request was resolved
#[derive(Debug, Clone, PartialEq)]
pub enum DeactivationOutcome {
    /// Grade entries reference the component; it is kept, flagged inactive,
    /// so historical weighted averages stay reproducible
    Deactivated(evaluation_components::Model),
    /// Nothing references it; the row is gone
    Deleted,
}

pub struct EvaluationService;

impl EvaluationService {
    pub async fn add_component(
        db: &DatabaseConnection,
        course_id: Uuid,
        name: String,
        percentage: f64,
        display_order: i16,
    ) -> Result<evaluation_components::Model, DomainError> {
        Self::check_range(percentage, display_order)?;

        courses::Entity::find_by_id(course_id)
            .one(db)
            .await?
            .ok_or(DomainError::NotFound("course"))?;

        let active_sum = Self::active_percentage_sum(db, course_id, None).await?;
        if active_sum + percentage > 100.0 {
            return Err(DomainError::OverAllocation {
                attempted: active_sum + percentage,
            });
        }

        let now = Utc::now().naive_utc();
        let component = evaluation_components::ActiveModel {
            id: Set(Uuid::new_v4()),
            course_id: Set(course_id),
            name: Set(name),
            percentage: Set(percentage),
            display_order: Set(display_order),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await?;

        info!(
            "added evaluation component {} ({}%) to course {course_id}",
            component.name, component.percentage
        );
        Ok(component)
    }

    pub async fn update_component(
        db: &DatabaseConnection,
        component_id: Uuid,
        changes: ComponentChanges,
    ) -> Result<evaluation_components::Model, DomainError> {
        let component = evaluation_components::Entity::find_by_id(component_id)
            .one(db)
            .await?
            .ok_or(DomainError::NotFound("evaluation component"))?;

        let percentage = changes.percentage.unwrap_or(component.percentage);
        let display_order = changes.display_order.unwrap_or(component.display_order);
        let active = changes.active.unwrap_or(component.active);

        Self::check_range(percentage, display_order)?;

        // The allocation check sums the other active components only: the
        // component's own prior percentage must not count against its new one
        if active {
            let others_sum =
                Self::active_percentage_sum(db, component.course_id, Some(component_id)).await?;
            if others_sum + percentage > 100.0 {
                return Err(DomainError::OverAllocation {
                    attempted: others_sum + percentage,
                });
            }
        }

        let mut updated = component.into_active_model();
        if let Some(name) = changes.name {
            updated.name = Set(name);
        }
        updated.percentage = Set(percentage);
        updated.display_order = Set(display_order);
        updated.active = Set(active);
        updated.updated_at = Set(Utc::now().naive_utc());

        Ok(updated.update(db).await?)
    }

    pub async fn deactivate_component(
        db: &DatabaseConnection,
        component_id: Uuid,
    ) -> Result<DeactivationOutcome, DomainError> {
        let component = evaluation_components::Entity::find_by_id(component_id)
            .one(db)
            .await?
            .ok_or(DomainError::NotFound("evaluation component"))?;

        let referencing_entries = grade_entries::Entity::find()
            .filter(grade_entries::Column::ComponentId.eq(component_id))
            .count(db)
            .await?;

        if referencing_entries > 0 {
            let mut deactivated = component.into_active_model();
            deactivated.active = Set(false);
            deactivated.updated_at = Set(Utc::now().naive_utc());

            info!(
                "soft-deactivated component {component_id} ({referencing_entries} grade entries reference it)"
            );
            Ok(DeactivationOutcome::Deactivated(
                deactivated.update(db).await?,
            ))
        } else {
            evaluation_components::Entity::delete_by_id(component_id)
                .exec(db)
                .await?;

            info!("deleted unreferenced component {component_id}");
            Ok(DeactivationOutcome::Deleted)
        }
    }

    fn check_range(percentage: f64, display_order: i16) -> Result<(), DomainError> {
        if !(0.0..=100.0).contains(&percentage) {
            return Err(DomainError::InvalidRange(format!(
                "percentage must be between 0 and 100, got {percentage}"
            )));
        }
        if display_order < 1 {
            return Err(DomainError::InvalidRange(format!(
                "display order must be at least 1, got {display_order}"
            )));
        }
        Ok(())
    }

    async fn active_percentage_sum(
        db: &DatabaseConnection,
        course_id: Uuid,
        exclude: Option<Uuid>,
    ) -> Result<f64, DomainError> {
        let mut query = evaluation_components::Entity::find()
            .filter(evaluation_components::Column::CourseId.eq(course_id))
            .filter(evaluation_components::Column::Active.eq(true));

        if let Some(component_id) = exclude {
            query = query.filter(evaluation_components::Column::Id.ne(component_id));
        }

        let components = query.all(db).await?;
        Ok(components.iter().map(|c| c.percentage).sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn course(level: i16) -> courses::Model {
        courses::Model {
            id: Uuid::new_v4(),
            code: "MATH-201".to_string(),
            title: "Calculus II".to_string(),
            level,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    fn component(course_id: Uuid, percentage: f64, active: bool) -> evaluation_components::Model {
        evaluation_components::Model {
            id: Uuid::new_v4(),
            course_id,
            name: "Midterm".to_string(),
            percentage,
            display_order: 1,
            active,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    #[tokio::test]
    async fn test_add_rejects_percentage_out_of_range() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result =
            EvaluationService::add_component(&db, Uuid::new_v4(), "Final".to_string(), 101.0, 1)
                .await;

        assert!(matches!(result, Err(DomainError::InvalidRange(_))));
    }

    #[tokio::test]
    async fn test_add_rejects_order_below_one() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result =
            EvaluationService::add_component(&db, Uuid::new_v4(), "Final".to_string(), 40.0, 0)
                .await;

        assert!(matches!(result, Err(DomainError::InvalidRange(_))));
    }

    #[tokio::test]
    async fn test_add_rejects_over_allocation() {
        let existing = course(3);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![existing.clone()]])
            .append_query_results([vec![
                component(existing.id, 60.0, true),
                component(existing.id, 30.0, true),
            ]])
            .into_connection();

        let result =
            EvaluationService::add_component(&db, existing.id, "Final".to_string(), 20.0, 3).await;

        assert!(matches!(
            result,
            Err(DomainError::OverAllocation { attempted }) if (attempted - 110.0).abs() < 1e-9
        ));
    }

    #[tokio::test]
    async fn test_add_to_missing_course() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<courses::Model>::new()])
            .into_connection();

        let result =
            EvaluationService::add_component(&db, Uuid::new_v4(), "Final".to_string(), 40.0, 1)
                .await;

        assert!(matches!(result, Err(DomainError::NotFound("course"))));
    }

    #[tokio::test]
    async fn test_update_missing_component() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<evaluation_components::Model>::new()])
            .into_connection();

        let result =
            EvaluationService::update_component(&db, Uuid::new_v4(), ComponentChanges::default())
                .await;

        assert!(matches!(
            result,
            Err(DomainError::NotFound("evaluation component"))
        ));
    }

    #[tokio::test]
    async fn test_update_excludes_own_percentage_from_sum() {
        // One other active component at 70%; raising this one from 20% to
        // 30% still fits because its old 20% does not count
        let course_id = Uuid::new_v4();
        let edited = component(course_id, 20.0, true);
        let other = component(course_id, 70.0, true);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![edited.clone()]])
            .append_query_results([vec![other]])
            .append_query_results([vec![evaluation_components::Model {
                percentage: 30.0,
                ..edited.clone()
            }]])
            .into_connection();

        let changes = ComponentChanges {
            percentage: Some(30.0),
            ..Default::default()
        };
        let updated = EvaluationService::update_component(&db, edited.id, changes)
            .await
            .unwrap();

        assert_eq!(updated.percentage, 30.0);
    }

    #[tokio::test]
    async fn test_update_over_allocation() {
        let course_id = Uuid::new_v4();
        let edited = component(course_id, 20.0, true);
        let other = component(course_id, 70.0, true);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![edited.clone()]])
            .append_query_results([vec![other]])
            .into_connection();

        let changes = ComponentChanges {
            percentage: Some(40.0),
            ..Default::default()
        };
        let result = EvaluationService::update_component(&db, edited.id, changes).await;

        assert!(matches!(result, Err(DomainError::OverAllocation { .. })));
    }
}
