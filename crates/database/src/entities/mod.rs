pub mod academic_history;
pub mod audit_event;
pub mod course;
pub mod course_offering;
pub mod enrollment;
pub mod evaluation_component;
pub mod grade_entry;
pub mod instructor;
pub mod instructor_assignment;
pub mod prerequisite_edge;
pub mod student;

pub use self::academic_history as academic_histories;
pub use self::audit_event as audit_events;
pub use self::course as courses;
pub use self::course_offering as course_offerings;
pub use self::enrollment as enrollments;
pub use self::evaluation_component as evaluation_components;
pub use self::grade_entry as grade_entries;
pub use self::instructor as instructors;
pub use self::instructor_assignment as instructor_assignments;
pub use self::prerequisite_edge as prerequisite_edges;
pub use self::student as students;
