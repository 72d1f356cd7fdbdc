use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use quiz_core::model::{
    AnswerId, AnswerOption, AnswerValue, AttemptReport, Question, QuestionId, QuestionKind,
    QuestionReview, StudentResult, Test, TestDraft, TestId, TestResults,
};

/// Errors surfaced by gateway adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GatewayError {
    #[error("not found")]
    NotFound,

    #[error("server answered with status {0}")]
    Status(u16),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Everything a finished attempt sends for grading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptSubmission {
    pub answers: HashMap<QuestionId, AnswerValue>,
    pub time_spent: u64,
}

// ─── Wire payloads ─────────────────────────────────────────────────────────────
//
// These mirror the server's JSON byte for byte so the domain types stay free
// of serde shape compromises.

#[derive(Debug, Clone, Deserialize)]
pub struct AnswerOptionDto {
    pub id: u64,
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionDto {
    pub id: u64,
    pub text: String,
    #[serde(default)]
    pub image: Option<String>,
    pub question_type: String,
    #[serde(default)]
    pub answers: Option<Vec<AnswerOptionDto>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TestDto {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub questions: Vec<QuestionDto>,
}

/// Body of `POST /student/test/{id}/submit/`. Answer keys are decimal
/// question-id strings; values are either a selected option id or the
/// entered text.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitRequestDto {
    pub answers: BTreeMap<String, AnswerValue>,
    pub time_spent: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionReviewDto {
    pub question_text: String,
    #[serde(default)]
    pub user_answer: Option<String>,
    pub is_correct: bool,
    #[serde(default)]
    pub correct_answer: Option<String>,
    #[serde(default)]
    pub is_open: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponseDto {
    pub correct: u32,
    pub total: u32,
    #[serde(default)]
    pub pass_threshold: Option<u32>,
    #[serde(default)]
    pub time_spent: Option<u64>,
    #[serde(default)]
    pub level_title: Option<String>,
    #[serde(default)]
    pub level_description: Option<String>,
    #[serde(default)]
    pub level_recommendations: Option<String>,
    pub details: Vec<QuestionReviewDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StudentResultDto {
    pub student_name: String,
    pub student_username: String,
    pub student_group: String,
    pub score: u32,
    pub total: u32,
    pub percentage: u32,
    pub passed: bool,
    pub time_formatted: String,
    pub completed_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TestResultsDto {
    pub test_title: String,
    pub group_name: String,
    pub questions_count: u32,
    pub created_at: String,
    pub total_completed: u32,
    #[serde(default)]
    pub test_description: Option<String>,
    pub results: Vec<StudentResultDto>,
}

// ─── Wire ↔ domain mapping ─────────────────────────────────────────────────────

impl TestDto {
    #[must_use]
    pub fn into_test(self) -> Test {
        Test {
            id: TestId::new(self.id),
            title: self.title,
            description: self.description,
            questions: self
                .questions
                .into_iter()
                .map(QuestionDto::into_question)
                .collect(),
        }
    }
}

impl QuestionDto {
    #[must_use]
    pub fn into_question(self) -> Question {
        Question {
            id: QuestionId::new(self.id),
            text: self.text,
            image: self.image,
            kind: QuestionKind::from_wire(&self.question_type),
            answers: self
                .answers
                .unwrap_or_default()
                .into_iter()
                .map(|answer| AnswerOption {
                    id: AnswerId::new(answer.id),
                    text: answer.text,
                })
                .collect(),
        }
    }
}

impl SubmitRequestDto {
    #[must_use]
    pub fn from_submission(submission: &AttemptSubmission) -> Self {
        Self {
            answers: submission
                .answers
                .iter()
                .map(|(question, value)| (question.to_string(), value.clone()))
                .collect(),
            time_spent: submission.time_spent,
        }
    }
}

impl SubmitResponseDto {
    #[must_use]
    pub fn into_report(self) -> AttemptReport {
        AttemptReport {
            correct: self.correct,
            total: self.total,
            pass_threshold: self.pass_threshold,
            time_spent: self.time_spent,
            level_title: self.level_title,
            level_description: self.level_description,
            level_recommendations: self.level_recommendations,
            details: self
                .details
                .into_iter()
                .map(|detail| QuestionReview {
                    question_text: detail.question_text,
                    user_answer: detail.user_answer,
                    is_correct: detail.is_correct,
                    correct_answer: detail.correct_answer,
                    is_open: detail.is_open,
                })
                .collect(),
        }
    }
}

impl TestResultsDto {
    #[must_use]
    pub fn into_results(self) -> TestResults {
        TestResults {
            test_title: self.test_title,
            group_name: self.group_name,
            questions_count: self.questions_count,
            created_at: self.created_at,
            total_completed: self.total_completed,
            test_description: self.test_description,
            results: self
                .results
                .into_iter()
                .map(|row| StudentResult {
                    student_name: row.student_name,
                    student_username: row.student_username,
                    student_group: row.student_group,
                    score: row.score,
                    total: row.total,
                    percentage: row.percentage,
                    passed: row.passed,
                    time_formatted: row.time_formatted,
                    completed_at: row.completed_at,
                })
                .collect(),
        }
    }
}

// ─── Gateway contracts ─────────────────────────────────────────────────────────

/// Student-facing server operations.
#[async_trait]
pub trait TestGateway: Send + Sync {
    /// Fetch a test definition for a fresh attempt.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::NotFound` for an unknown test, or transport
    /// errors.
    async fn fetch_test(&self, id: TestId) -> Result<Test, GatewayError>;

    /// Submit answers and elapsed seconds for grading.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` when the server rejects or cannot be reached.
    async fn submit_attempt(
        &self,
        id: TestId,
        submission: &AttemptSubmission,
    ) -> Result<AttemptReport, GatewayError>;

    /// Publish an authored test.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` when the server rejects or cannot be reached.
    async fn create_test(&self, draft: &TestDraft) -> Result<(), GatewayError>;
}

/// Teacher-facing server operations.
#[async_trait]
pub trait ResultsGateway: Send + Sync {
    /// Fetch the aggregated results table for one test.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::NotFound` for an unknown test, or transport
    /// errors.
    async fn fetch_results(&self, id: TestId) -> Result<TestResults, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_maps_to_domain() {
        let raw = r#"{
            "id": 5,
            "title": "Basics",
            "questions": [
                {"id": 1, "text": "Pick", "question_type": "choice",
                 "answers": [{"id": 10, "text": "A"}, {"id": 11, "text": "B"}]},
                {"id": 2, "text": "Explain", "image": "/media/q2.png", "question_type": "open"}
            ]
        }"#;
        let dto: TestDto = serde_json::from_str(raw).unwrap();
        let test = dto.into_test();

        assert_eq!(test.id, TestId::new(5));
        assert_eq!(test.description, None);
        assert_eq!(test.questions.len(), 2);
        assert_eq!(test.questions[0].kind, QuestionKind::Choice);
        assert_eq!(test.questions[0].answers[1].id, AnswerId::new(11));
        assert_eq!(test.questions[1].kind, QuestionKind::Open);
        assert!(test.questions[1].answers.is_empty());
        assert_eq!(test.questions[1].image.as_deref(), Some("/media/q2.png"));
    }

    #[test]
    fn submit_request_serializes_mixed_answers() {
        let mut answers = HashMap::new();
        answers.insert(QuestionId::new(12), AnswerValue::Choice(AnswerId::new(3)));
        answers.insert(QuestionId::new(13), AnswerValue::Open("paris".to_string()));
        let dto = SubmitRequestDto::from_submission(&AttemptSubmission {
            answers,
            time_spent: 42,
        });

        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["time_spent"], 42);
        assert_eq!(json["answers"]["12"], 3);
        assert_eq!(json["answers"]["13"], "paris");
    }

    #[test]
    fn submit_response_defaults_optional_fields() {
        let raw = r#"{
            "correct": 2,
            "total": 3,
            "details": [
                {"question_text": "Pick", "user_answer": "A", "is_correct": true},
                {"question_text": "Explain", "is_correct": false,
                 "correct_answer": "because", "is_open": true}
            ]
        }"#;
        let report = serde_json::from_str::<SubmitResponseDto>(raw)
            .unwrap()
            .into_report();

        assert_eq!(report.pass_threshold, None);
        assert_eq!(report.percentage(), 67);
        assert!(report.passed());
        assert!(!report.details[0].is_open);
        assert!(report.details[1].is_open);
        assert_eq!(report.details[1].user_answer, None);
    }

    #[test]
    fn results_payload_maps_rows() {
        let raw = r#"{
            "test_title": "Basics",
            "group_name": "G-1",
            "questions_count": 12,
            "created_at": "2025-03-01",
            "total_completed": 1,
            "results": [
                {"student_name": "Anna", "student_username": "anna", "student_group": "G-1",
                 "score": 8, "total": 12, "percentage": 67, "passed": true,
                 "time_formatted": "04:20", "completed_at": "2025-03-02 10:00"}
            ]
        }"#;
        let results = serde_json::from_str::<TestResultsDto>(raw)
            .unwrap()
            .into_results();

        assert_eq!(results.test_description, None);
        assert_eq!(results.results.len(), 1);
        assert!(results.results[0].passed);
    }
}
