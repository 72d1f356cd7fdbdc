use quiz_core::model::{AttemptReport, QuestionReview};

use crate::vm::time_fmt::format_elapsed;

/// Display mapping of a graded attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportVm {
    pub percentage_label: String,
    pub passed: bool,
    pub summary_label: String,
    pub time_label: Option<String>,
    pub level_title: String,
    pub level_description: String,
    pub recommendations: Option<String>,
    pub reviews: Vec<ReviewVm>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewVm {
    pub position_label: String,
    pub question_text: String,
    pub user_answer_label: String,
    /// Present only when the answer was wrong.
    pub correct_answer: Option<String>,
    pub is_correct: bool,
}

impl From<&AttemptReport> for ReportVm {
    fn from(report: &AttemptReport) -> Self {
        Self {
            percentage_label: format!("{}%", report.percentage()),
            passed: report.passed(),
            summary_label: format!("{} из {} правильных", report.correct, report.total),
            time_label: report
                .time_spent
                .map(|seconds| format!("Время прохождения: {}", format_elapsed(seconds))),
            level_title: report
                .level_title
                .clone()
                .unwrap_or_else(|| "Завершено".to_string()),
            level_description: report.level_description.clone().unwrap_or_default(),
            recommendations: report.recommendations().map(str::to_string),
            reviews: report
                .details
                .iter()
                .enumerate()
                .map(|(index, review)| ReviewVm::from_review(index, review))
                .collect(),
        }
    }
}

impl ReviewVm {
    fn from_review(index: usize, review: &QuestionReview) -> Self {
        let user_answer_label = review
            .user_answer
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .unwrap_or("Пропущено")
            .to_string();
        Self {
            position_label: (index + 1).to_string(),
            question_text: review.question_text.clone(),
            user_answer_label,
            correct_answer: if review.is_correct {
                None
            } else {
                review.correct_answer.clone()
            },
            is_correct: review.is_correct,
        }
    }
}
