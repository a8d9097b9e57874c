use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Course codes are the human-facing identifier
        manager
            .create_index(
                Index::create()
                    .name("idx_courses_code")
                    .table(Courses::Table)
                    .col(Courses::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // One offering per (course, year, period, section)
        manager
            .create_index(
                Index::create()
                    .name("idx_course_offerings_course_term")
                    .table(CourseOfferings::Table)
                    .col(CourseOfferings::CourseId)
                    .col(CourseOfferings::Year)
                    .col(CourseOfferings::Period)
                    .col(CourseOfferings::Section)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // One assigned instructor per offering
        manager
            .create_index(
                Index::create()
                    .name("idx_instructor_assignments_offering")
                    .table(InstructorAssignments::Table)
                    .col(InstructorAssignments::CourseId)
                    .col(InstructorAssignments::Year)
                    .col(InstructorAssignments::Period)
                    .col(InstructorAssignments::Section)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // One enrollment per (student, offering)
        manager
            .create_index(
                Index::create()
                    .name("idx_enrollments_student_offering")
                    .table(Enrollments::Table)
                    .col(Enrollments::StudentId)
                    .col(Enrollments::OfferingId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Closing scans every enrollment of one offering
        manager
            .create_index(
                Index::create()
                    .name("idx_enrollments_offering_id")
                    .table(Enrollments::Table)
                    .col(Enrollments::OfferingId)
                    .to_owned(),
            )
            .await?;

        // One grade entry per (enrollment, component)
        manager
            .create_index(
                Index::create()
                    .name("idx_grade_entries_enrollment_component")
                    .table(GradeEntries::Table)
                    .col(GradeEntries::EnrollmentId)
                    .col(GradeEntries::ComponentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index on evaluation_components.course_id for the allocation check
        manager
            .create_index(
                Index::create()
                    .name("idx_evaluation_components_course_id")
                    .table(EvaluationComponents::Table)
                    .col(EvaluationComponents::CourseId)
                    .to_owned(),
            )
            .await?;

        // One edge per (course, prerequisite)
        manager
            .create_index(
                Index::create()
                    .name("idx_prerequisite_edges_course_prerequisite")
                    .table(PrerequisiteEdges::Table)
                    .col(PrerequisiteEdges::CourseId)
                    .col(PrerequisiteEdges::PrerequisiteId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // One rollup row per (student, year, period)
        manager
            .create_index(
                Index::create()
                    .name("idx_academic_histories_student_term")
                    .table(AcademicHistories::Table)
                    .col(AcademicHistories::StudentId)
                    .col(AcademicHistories::Year)
                    .col(AcademicHistories::Period)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop indexes in reverse order
        manager
            .drop_index(
                Index::drop()
                    .name("idx_academic_histories_student_term")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_prerequisite_edges_course_prerequisite")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_evaluation_components_course_id")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_grade_entries_enrollment_component")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(Index::drop().name("idx_enrollments_offering_id").to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_enrollments_student_offering")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_instructor_assignments_offering")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_course_offerings_course_term")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(Index::drop().name("idx_courses_code").to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Courses {
    Table,
    Code,
}

#[derive(Iden)]
enum CourseOfferings {
    Table,
    CourseId,
    Year,
    Period,
    Section,
}

#[derive(Iden)]
enum InstructorAssignments {
    Table,
    CourseId,
    Year,
    Period,
    Section,
}

#[derive(Iden)]
enum Enrollments {
    Table,
    StudentId,
    OfferingId,
}

#[derive(Iden)]
enum GradeEntries {
    Table,
    EnrollmentId,
    ComponentId,
}

#[derive(Iden)]
enum EvaluationComponents {
    Table,
    CourseId,
}

#[derive(Iden)]
enum PrerequisiteEdges {
    Table,
    CourseId,
    PrerequisiteId,
}

#[derive(Iden)]
enum AcademicHistories {
    Table,
    StudentId,
    Year,
    Period,
}
