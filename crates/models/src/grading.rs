use crate::enrollment_status::EnrollmentStatus;
use serde::Serialize;

/// Minimum final score required to pass a course offering
pub const PASS_THRESHOLD: f64 = 51.0;

/// One recorded score joined to the percentage weight of its evaluation
/// component
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredComponent {
    pub score: f64,
    pub percentage: f64,
}

/// Weighted aggregate of every recorded grade entry for one enrollment.
///
/// `weighted_points` doubles as the final score candidate at closing time: a
/// component with no recorded entry simply contributes zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeightedSummary {
    pub weighted_points: f64,
    pub completed_percentage: f64,
    pub entry_count: usize,
}

impl WeightedSummary {
    pub fn summarize(entries: &[ScoredComponent]) -> Self {
        let weighted_points = entries
            .iter()
            .map(|e| e.score * e.percentage / 100.0)
            .sum();
        let completed_percentage = entries.iter().map(|e| e.percentage).sum();

        Self {
            weighted_points,
            completed_percentage,
            entry_count: entries.len(),
        }
    }

    /// Average over the components graded so far, scaled back to [0, 100].
    /// Undefined until at least one entry with nonzero weight is recorded.
    pub fn partial_average(&self) -> Option<f64> {
        if self.completed_percentage > 0.0 {
            Some(self.weighted_points / self.completed_percentage * 100.0)
        } else {
            None
        }
    }

    pub fn final_score(&self) -> f64 {
        self.weighted_points
    }

    /// Terminal status this enrollment receives when its offering is closed.
    ///
    /// An enrollment with no recorded entries at all counts as withdrawn,
    /// regardless of score; otherwise the final score decides.
    pub fn outcome(&self) -> EnrollmentStatus {
        if self.entry_count == 0 {
            EnrollmentStatus::Withdrawn
        } else if self.weighted_points >= PASS_THRESHOLD {
            EnrollmentStatus::Passed
        } else {
            EnrollmentStatus::Failed
        }
    }
}

/// Aggregate counts returned to the caller after closing an offering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClosingStats {
    pub passed: u64,
    pub failed: u64,
    pub withdrawn: u64,
    pub total: u64,
}

impl ClosingStats {
    pub fn record(&mut self, status: EnrollmentStatus) {
        match status {
            EnrollmentStatus::Passed => self.passed += 1,
            EnrollmentStatus::Failed => self.failed += 1,
            EnrollmentStatus::Withdrawn => self.withdrawn += 1,
            EnrollmentStatus::Registered => {}
        }
        self.total += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(pairs: &[(f64, f64)]) -> Vec<ScoredComponent> {
        pairs
            .iter()
            .map(|&(score, percentage)| ScoredComponent { score, percentage })
            .collect()
    }

    #[test]
    fn test_weighted_aggregation() {
        // Midterm 30% scored 80, final 40% scored 90: 24 + 36 points
        let summary = WeightedSummary::summarize(&scored(&[(80.0, 30.0), (90.0, 40.0)]));

        assert_eq!(summary.weighted_points, 60.0);
        assert_eq!(summary.completed_percentage, 70.0);
        assert_eq!(summary.entry_count, 2);
    }

    #[test]
    fn test_partial_average() {
        let summary = WeightedSummary::summarize(&scored(&[(80.0, 30.0), (90.0, 40.0)]));

        // 60 points out of 70% completed
        let avg = summary.partial_average().unwrap();
        assert!((avg - 85.714).abs() < 0.001);
    }

    #[test]
    fn test_partial_average_undefined_without_entries() {
        let summary = WeightedSummary::summarize(&[]);
        assert_eq!(summary.partial_average(), None);
    }

    #[test]
    fn test_outcome_at_threshold() {
        let summary = WeightedSummary::summarize(&scored(&[(51.0, 100.0)]));
        assert_eq!(summary.outcome(), EnrollmentStatus::Passed);
    }

    #[test]
    fn test_outcome_just_below_threshold() {
        let summary = WeightedSummary::summarize(&scored(&[(50.99, 100.0)]));
        assert_eq!(summary.outcome(), EnrollmentStatus::Failed);
    }

    #[test]
    fn test_outcome_without_entries_is_withdrawn() {
        let summary = WeightedSummary::summarize(&[]);
        assert_eq!(summary.outcome(), EnrollmentStatus::Withdrawn);
    }

    #[test]
    fn test_unscored_components_count_as_zero() {
        // Only 30% of the scheme was ever graded; the missing 70% drags the
        // final score below the threshold even though the graded part is
        // perfect
        let summary = WeightedSummary::summarize(&scored(&[(100.0, 30.0)]));

        assert_eq!(summary.final_score(), 30.0);
        assert_eq!(summary.outcome(), EnrollmentStatus::Failed);
        assert_eq!(summary.partial_average(), Some(100.0));
    }

    #[test]
    fn test_closing_stats() {
        let mut stats = ClosingStats::default();
        stats.record(EnrollmentStatus::Passed);
        stats.record(EnrollmentStatus::Passed);
        stats.record(EnrollmentStatus::Failed);
        stats.record(EnrollmentStatus::Withdrawn);

        assert_eq!(stats.passed, 2);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.withdrawn, 1);
        assert_eq!(stats.total, 4);
    }
}
