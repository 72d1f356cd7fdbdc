use crate::model::attempt::progress_percent;

/// Pass threshold applied when the server does not send one.
pub const DEFAULT_PASS_THRESHOLD: u32 = 60;

/// Per-question detail of a graded attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionReview {
    pub question_text: String,
    pub user_answer: Option<String>,
    pub is_correct: bool,
    /// Expected answer; only meaningful (and only rendered) when wrong.
    pub correct_answer: Option<String>,
    pub is_open: bool,
}

/// Grading result for one submitted attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptReport {
    pub correct: u32,
    pub total: u32,
    pub pass_threshold: Option<u32>,
    pub time_spent: Option<u64>,
    pub level_title: Option<String>,
    pub level_description: Option<String>,
    pub level_recommendations: Option<String>,
    pub details: Vec<QuestionReview>,
}

impl AttemptReport {
    /// Score as an integer percentage, `0` for an empty test.
    #[must_use]
    pub fn percentage(&self) -> u32 {
        progress_percent(self.correct as usize, self.total as usize)
    }

    #[must_use]
    pub fn threshold(&self) -> u32 {
        self.pass_threshold.unwrap_or(DEFAULT_PASS_THRESHOLD)
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.percentage() >= self.threshold()
    }

    /// Recommendations block is shown only for non-blank text.
    #[must_use]
    pub fn recommendations(&self) -> Option<&str> {
        self.level_recommendations
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}
