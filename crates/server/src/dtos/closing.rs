use models::grading::ClosingStats;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ClosingStatsResponse {
    pub passed: u64,
    pub failed: u64,
    pub withdrawn: u64,
    pub total: u64,
}

impl From<ClosingStats> for ClosingStatsResponse {
    fn from(stats: ClosingStats) -> Self {
        Self {
            passed: stats.passed,
            failed: stats.failed,
            withdrawn: stats.withdrawn,
            total: stats.total,
        }
    }
}
