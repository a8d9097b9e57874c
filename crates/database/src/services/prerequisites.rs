use crate::entities::{course_offerings, courses, enrollments, prerequisite_edges};
use crate::error::DomainError;
use chrono::Utc;
use log::info;
use models::{
    enrollment_status::EnrollmentStatus,
    prerequisite::{
        self, CourseLabel, PrereqLink, PrereqStatus, PrereqTree, SatisfactionReport,
    },
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder,
};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

pub struct PrerequisiteService;

impl PrerequisiteService {
    /// Adds a dependency edge: `course_id` requires `prerequisite_id`.
    pub async fn add_edge(
        db: &DatabaseConnection,
        course_id: Uuid,
        prerequisite_id: Uuid,
        mandatory: bool,
    ) -> Result<prerequisite_edges::Model, DomainError> {
        if course_id == prerequisite_id {
            return Err(DomainError::SelfReference);
        }

        let course = courses::Entity::find_by_id(course_id)
            .one(db)
            .await?
            .ok_or(DomainError::NotFound("course"))?;
        let prerequisite = courses::Entity::find_by_id(prerequisite_id)
            .one(db)
            .await?
            .ok_or(DomainError::NotFound("prerequisite course"))?;

        // A prerequisite must sit strictly earlier in the study plan
        if prerequisite.level >= course.level {
            return Err(DomainError::OrderingViolation);
        }

        let existing = prerequisite_edges::Entity::find()
            .filter(prerequisite_edges::Column::CourseId.eq(course_id))
            .filter(prerequisite_edges::Column::PrerequisiteId.eq(prerequisite_id))
            .one(db)
            .await?;
        if existing.is_some() {
            return Err(DomainError::DuplicateEdge);
        }

        let edge = prerequisite_edges::ActiveModel {
            id: Set(Uuid::new_v4()),
            course_id: Set(course_id),
            prerequisite_id: Set(prerequisite_id),
            mandatory: Set(mandatory),
            created_at: Set(Utc::now().naive_utc()),
        }
        .insert(db)
        .await?;

        info!(
            "added prerequisite edge {} -> {} (mandatory: {mandatory})",
            course.code, prerequisite.code
        );
        Ok(edge)
    }

    /// Checks whether a student satisfies the prerequisites of a course: all
    /// mandatory edges need a passed enrollment in the prerequisite course,
    /// from any prior term. Optional edges are reported but never block.
    pub async fn check_satisfied(
        db: &DatabaseConnection,
        student_id: Uuid,
        course_id: Uuid,
    ) -> Result<SatisfactionReport, DomainError> {
        courses::Entity::find_by_id(course_id)
            .one(db)
            .await?
            .ok_or(DomainError::NotFound("course"))?;

        let edges = prerequisite_edges::Entity::find()
            .filter(prerequisite_edges::Column::CourseId.eq(course_id))
            .order_by_asc(prerequisite_edges::Column::CreatedAt)
            .all(db)
            .await?;
        if edges.is_empty() {
            return Ok(prerequisite::evaluate_satisfaction(Vec::new()));
        }

        let prereq_ids: Vec<Uuid> = edges.iter().map(|e| e.prerequisite_id).collect();
        let prereq_courses = courses::Entity::find()
            .filter(courses::Column::Id.is_in(prereq_ids.clone()))
            .all(db)
            .await?;
        let code_by_course: HashMap<Uuid, String> = prereq_courses
            .iter()
            .map(|c| (c.id, c.code.clone()))
            .collect();

        // Every offering of the prerequisite courses, then the student's
        // passed enrollments among them
        let offerings = course_offerings::Entity::find()
            .filter(course_offerings::Column::CourseId.is_in(prereq_ids))
            .all(db)
            .await?;
        let course_by_offering: HashMap<Uuid, Uuid> =
            offerings.iter().map(|o| (o.id, o.course_id)).collect();
        let offering_ids: Vec<Uuid> = offerings.iter().map(|o| o.id).collect();

        let passed_enrollments = enrollments::Entity::find()
            .filter(enrollments::Column::StudentId.eq(student_id))
            .filter(enrollments::Column::Status.eq(EnrollmentStatus::Passed))
            .filter(enrollments::Column::OfferingId.is_in(offering_ids))
            .all(db)
            .await?;
        let passed_courses: HashSet<Uuid> = passed_enrollments
            .iter()
            .filter_map(|e| course_by_offering.get(&e.offering_id).copied())
            .collect();

        let items = edges
            .iter()
            .map(|edge| PrereqStatus {
                course_id: edge.prerequisite_id,
                code: code_by_course
                    .get(&edge.prerequisite_id)
                    .cloned()
                    .unwrap_or_default(),
                mandatory: edge.mandatory,
                passed: passed_courses.contains(&edge.prerequisite_id),
            })
            .collect();

        Ok(prerequisite::evaluate_satisfaction(items))
    }

    /// Expands the transitive prerequisites of a course into a tree. The
    /// edge table is administrative and small, so it is fetched whole and
    /// traversed in memory, cycle-safe.
    pub async fn build_tree(
        db: &DatabaseConnection,
        course_id: Uuid,
    ) -> Result<PrereqTree, DomainError> {
        let (all_courses, all_edges) = futures::try_join!(
            courses::Entity::find().all(db),
            prerequisite_edges::Entity::find()
                .order_by_asc(prerequisite_edges::Column::CreatedAt)
                .all(db),
        )?;

        let labels: HashMap<Uuid, CourseLabel> = all_courses
            .iter()
            .map(|c| {
                (
                    c.id,
                    CourseLabel {
                        code: c.code.clone(),
                        title: c.title.clone(),
                    },
                )
            })
            .collect();
        if !labels.contains_key(&course_id) {
            return Err(DomainError::NotFound("course"));
        }

        let mut edges_by_course: HashMap<Uuid, Vec<PrereqLink>> = HashMap::new();
        for edge in all_edges {
            edges_by_course
                .entry(edge.course_id)
                .or_default()
                .push(PrereqLink {
                    prerequisite_id: edge.prerequisite_id,
                    mandatory: edge.mandatory,
                });
        }

        Ok(prerequisite::build_tree(course_id, &labels, &edges_by_course))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn course(code: &str, level: i16) -> courses::Model {
        courses::Model {
            id: Uuid::new_v4(),
            code: code.to_string(),
            title: format!("{code} title"),
            level,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    #[tokio::test]
    async fn test_add_edge_rejects_self_reference() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let id = Uuid::new_v4();
        let result = PrerequisiteService::add_edge(&db, id, id, true).await;

        assert!(matches!(result, Err(DomainError::SelfReference)));
    }

    #[tokio::test]
    async fn test_add_edge_rejects_ordering_violation() {
        let dependent = course("MATH-201", 3);
        let later = course("MATH-301", 5);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![dependent.clone()]])
            .append_query_results([vec![later.clone()]])
            .into_connection();

        let result = PrerequisiteService::add_edge(&db, dependent.id, later.id, true).await;

        assert!(matches!(result, Err(DomainError::OrderingViolation)));
    }

    #[tokio::test]
    async fn test_add_edge_rejects_duplicate() {
        let dependent = course("MATH-201", 3);
        let earlier = course("MATH-101", 1);
        let edge = prerequisite_edges::Model {
            id: Uuid::new_v4(),
            course_id: dependent.id,
            prerequisite_id: earlier.id,
            mandatory: true,
            created_at: NaiveDateTime::default(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![dependent.clone()]])
            .append_query_results([vec![earlier.clone()]])
            .append_query_results([vec![edge]])
            .into_connection();

        let result = PrerequisiteService::add_edge(&db, dependent.id, earlier.id, false).await;

        assert!(matches!(result, Err(DomainError::DuplicateEdge)));
    }

    #[tokio::test]
    async fn test_check_satisfied_without_prerequisites() {
        let target = course("MATH-101", 1);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![target.clone()]])
            .append_query_results([Vec::<prerequisite_edges::Model>::new()])
            .into_connection();

        let report = PrerequisiteService::check_satisfied(&db, Uuid::new_v4(), target.id)
            .await
            .unwrap();

        assert!(report.satisfied);
        assert_eq!(report.mandatory_total, 0);
    }
}
