use database::entities::grade_entries;
use models::grading::WeightedSummary;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct WeightedGradeResponse {
    /// Weighted points over all recorded entries; the final score candidate
    pub final_score: f64,
    /// Average over the graded part of the scheme, absent until something
    /// is recorded
    pub partial_average: Option<f64>,
    pub completed_percentage: f64,
    pub entries_recorded: usize,
}

impl From<WeightedSummary> for WeightedGradeResponse {
    fn from(summary: WeightedSummary) -> Self {
        Self {
            final_score: summary.final_score(),
            partial_average: summary.partial_average(),
            completed_percentage: summary.completed_percentage,
            entries_recorded: summary.entry_count,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RecordGradeRequest {
    pub score: f64,
    pub remarks: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GradeEntryResponse {
    pub id: String,
    pub enrollment_id: String,
    pub component_id: String,
    pub score: f64,
    pub remarks: Option<String>,
}

impl From<grade_entries::Model> for GradeEntryResponse {
    fn from(entry: grade_entries::Model) -> Self {
        Self {
            id: entry.id.to_string(),
            enrollment_id: entry.enrollment_id.to_string(),
            component_id: entry.component_id.to_string(),
            score: entry.score,
            remarks: entry.remarks,
        }
    }
}
