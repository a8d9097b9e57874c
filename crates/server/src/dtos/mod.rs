pub mod closing;
pub mod evaluation;
pub mod grades;
pub mod prerequisites;
