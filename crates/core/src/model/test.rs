use serde::{Deserialize, Serialize};

use crate::model::ids::{AnswerId, QuestionId, TestId};

/// How a question expects to be answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    /// One of several predefined options.
    Choice,
    /// Free-text entry, graded server-side by string comparison.
    Open,
}

impl QuestionKind {
    /// Wire representation used by the server (`question_type` field).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionKind::Choice => "choice",
            QuestionKind::Open => "open",
        }
    }

    /// Anything the server sends that is not `"open"` is a choice question.
    #[must_use]
    pub fn from_wire(value: &str) -> Self {
        if value == "open" {
            QuestionKind::Open
        } else {
            QuestionKind::Choice
        }
    }

    #[must_use]
    pub fn is_open(self) -> bool {
        matches!(self, QuestionKind::Open)
    }
}

/// One selectable option of a choice question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOption {
    pub id: AnswerId,
    pub text: String,
}

/// A single question of a test, in presentation order.
///
/// `answers` is empty for open questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    pub image: Option<String>,
    pub kind: QuestionKind,
    pub answers: Vec<AnswerOption>,
}

/// A test definition as served for an attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Test {
    pub id: TestId,
    pub title: String,
    pub description: Option<String>,
    pub questions: Vec<Question>,
}

impl Test {
    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn question_by_id(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|question| question.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_from_wire_defaults_to_choice() {
        assert_eq!(QuestionKind::from_wire("open"), QuestionKind::Open);
        assert_eq!(QuestionKind::from_wire("choice"), QuestionKind::Choice);
        assert_eq!(QuestionKind::from_wire("anything"), QuestionKind::Choice);
    }

    #[test]
    fn kind_wire_roundtrip() {
        for kind in [QuestionKind::Choice, QuestionKind::Open] {
            assert_eq!(QuestionKind::from_wire(kind.as_str()), kind);
        }
    }
}
