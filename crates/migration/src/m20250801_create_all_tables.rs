use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create students table
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Students::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Students::Name).string().not_null())
                    .col(
                        ColumnDef::new(Students::CreatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Students::UpdatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Create instructors table
        manager
            .create_table(
                Table::create()
                    .table(Instructors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Instructors::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Instructors::Name).string().not_null())
                    .col(
                        ColumnDef::new(Instructors::CreatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Instructors::UpdatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Create courses table
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Courses::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Courses::Code).string().not_null())
                    .col(ColumnDef::new(Courses::Title).string().not_null())
                    .col(ColumnDef::new(Courses::Level).small_integer().not_null())
                    .col(
                        ColumnDef::new(Courses::CreatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Courses::UpdatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Create course_offerings table
        manager
            .create_table(
                Table::create()
                    .table(CourseOfferings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CourseOfferings::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CourseOfferings::CourseId).uuid().not_null())
                    .col(
                        ColumnDef::new(CourseOfferings::Year)
                            .small_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CourseOfferings::Period).string().not_null())
                    .col(ColumnDef::new(CourseOfferings::Section).string().not_null())
                    .col(
                        ColumnDef::new(CourseOfferings::Closed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(CourseOfferings::ClosedAt).date_time())
                    .col(ColumnDef::new(CourseOfferings::ClosedBy).uuid())
                    .col(
                        ColumnDef::new(CourseOfferings::CreatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(CourseOfferings::UpdatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-course_offerings-course_id")
                            .from(CourseOfferings::Table, CourseOfferings::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create instructor_assignments table
        manager
            .create_table(
                Table::create()
                    .table(InstructorAssignments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InstructorAssignments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(InstructorAssignments::InstructorId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InstructorAssignments::CourseId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InstructorAssignments::Year)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InstructorAssignments::Period)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InstructorAssignments::Section)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InstructorAssignments::CreatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-instructor_assignments-instructor_id")
                            .from(
                                InstructorAssignments::Table,
                                InstructorAssignments::InstructorId,
                            )
                            .to(Instructors::Table, Instructors::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-instructor_assignments-course_id")
                            .from(
                                InstructorAssignments::Table,
                                InstructorAssignments::CourseId,
                            )
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create evaluation_components table
        manager
            .create_table(
                Table::create()
                    .table(EvaluationComponents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EvaluationComponents::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EvaluationComponents::CourseId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationComponents::Name)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationComponents::Percentage)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationComponents::DisplayOrder)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationComponents::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(EvaluationComponents::CreatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(EvaluationComponents::UpdatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-evaluation_components-course_id")
                            .from(EvaluationComponents::Table, EvaluationComponents::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create enrollments table
        manager
            .create_table(
                Table::create()
                    .table(Enrollments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Enrollments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Enrollments::StudentId).uuid().not_null())
                    .col(ColumnDef::new(Enrollments::OfferingId).uuid().not_null())
                    .col(
                        ColumnDef::new(Enrollments::Status)
                            .string()
                            .not_null()
                            .default("registered"),
                    )
                    .col(
                        ColumnDef::new(Enrollments::CreatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Enrollments::UpdatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-enrollments-student_id")
                            .from(Enrollments::Table, Enrollments::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-enrollments-offering_id")
                            .from(Enrollments::Table, Enrollments::OfferingId)
                            .to(CourseOfferings::Table, CourseOfferings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create grade_entries table. Enrollments are never deleted while
        // grade entries reference them, hence Restrict.
        manager
            .create_table(
                Table::create()
                    .table(GradeEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GradeEntries::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GradeEntries::EnrollmentId).uuid().not_null())
                    .col(ColumnDef::new(GradeEntries::ComponentId).uuid().not_null())
                    .col(ColumnDef::new(GradeEntries::Score).double().not_null())
                    .col(ColumnDef::new(GradeEntries::RecordedBy).uuid().not_null())
                    .col(ColumnDef::new(GradeEntries::Remarks).text())
                    .col(
                        ColumnDef::new(GradeEntries::CreatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(GradeEntries::UpdatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-grade_entries-enrollment_id")
                            .from(GradeEntries::Table, GradeEntries::EnrollmentId)
                            .to(Enrollments::Table, Enrollments::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-grade_entries-component_id")
                            .from(GradeEntries::Table, GradeEntries::ComponentId)
                            .to(EvaluationComponents::Table, EvaluationComponents::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Create prerequisite_edges table
        manager
            .create_table(
                Table::create()
                    .table(PrerequisiteEdges::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PrerequisiteEdges::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PrerequisiteEdges::CourseId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PrerequisiteEdges::PrerequisiteId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PrerequisiteEdges::Mandatory)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(PrerequisiteEdges::CreatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-prerequisite_edges-course_id")
                            .from(PrerequisiteEdges::Table, PrerequisiteEdges::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-prerequisite_edges-prerequisite_id")
                            .from(PrerequisiteEdges::Table, PrerequisiteEdges::PrerequisiteId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create academic_histories table
        manager
            .create_table(
                Table::create()
                    .table(AcademicHistories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AcademicHistories::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AcademicHistories::StudentId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AcademicHistories::Year)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AcademicHistories::Period)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AcademicHistories::CoursesTaken)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(AcademicHistories::CoursesPassed)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(AcademicHistories::CoursesFailed)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(AcademicHistories::CoursesWithdrawn)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(AcademicHistories::CreatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(AcademicHistories::UpdatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-academic_histories-student_id")
                            .from(AcademicHistories::Table, AcademicHistories::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create audit_events table (no foreign keys: audit rows outlive
        // whatever they describe)
        manager
            .create_table(
                Table::create()
                    .table(AuditEvents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AuditEvents::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AuditEvents::Action).string().not_null())
                    .col(ColumnDef::new(AuditEvents::OfferingId).uuid().not_null())
                    .col(ColumnDef::new(AuditEvents::ActorId).uuid().not_null())
                    .col(ColumnDef::new(AuditEvents::Detail).json().not_null())
                    .col(
                        ColumnDef::new(AuditEvents::CreatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order due to foreign key constraints
        manager
            .drop_table(Table::drop().table(AuditEvents::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(AcademicHistories::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(PrerequisiteEdges::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(GradeEntries::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Enrollments::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(EvaluationComponents::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(InstructorAssignments::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(CourseOfferings::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Instructors::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Students {
    Table,
    Id,
    Name,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Instructors {
    Table,
    Id,
    Name,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Courses {
    Table,
    Id,
    Code,
    Title,
    Level,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum CourseOfferings {
    Table,
    Id,
    CourseId,
    Year,
    Period,
    Section,
    Closed,
    ClosedAt,
    ClosedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum InstructorAssignments {
    Table,
    Id,
    InstructorId,
    CourseId,
    Year,
    Period,
    Section,
    CreatedAt,
}

#[derive(Iden)]
enum EvaluationComponents {
    Table,
    Id,
    CourseId,
    Name,
    Percentage,
    DisplayOrder,
    Active,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Enrollments {
    Table,
    Id,
    StudentId,
    OfferingId,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum GradeEntries {
    Table,
    Id,
    EnrollmentId,
    ComponentId,
    Score,
    RecordedBy,
    Remarks,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum PrerequisiteEdges {
    Table,
    Id,
    CourseId,
    PrerequisiteId,
    Mandatory,
    CreatedAt,
}

#[derive(Iden)]
enum AcademicHistories {
    Table,
    Id,
    StudentId,
    Year,
    Period,
    CoursesTaken,
    CoursesPassed,
    CoursesFailed,
    CoursesWithdrawn,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum AuditEvents {
    Table,
    Id,
    Action,
    OfferingId,
    ActorId,
    Detail,
    CreatedAt,
}
