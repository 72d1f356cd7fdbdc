use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::{AnswerId, QuestionId, TestId};
use crate::model::test::Test;

/// A submitted value for one question.
///
/// Values are mutually exclusive by question type: choice questions carry the
/// selected option id, open questions carry the entered text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Choice(AnswerId),
    Open(String),
}

impl AnswerValue {
    /// Whether this value counts as an answer: any selection does, open text
    /// only when its trimmed form is non-empty.
    #[must_use]
    pub fn is_present(&self) -> bool {
        match self {
            AnswerValue::Choice(_) => true,
            AnswerValue::Open(text) => !text.trim().is_empty(),
        }
    }

    #[must_use]
    pub fn as_choice(&self) -> Option<AnswerId> {
        match self {
            AnswerValue::Choice(id) => Some(*id),
            AnswerValue::Open(_) => None,
        }
    }

    #[must_use]
    pub fn as_open(&self) -> Option<&str> {
        match self {
            AnswerValue::Choice(_) => None,
            AnswerValue::Open(text) => Some(text),
        }
    }
}

/// Whether open questions participate in the unanswered count shown by the
/// finish confirmation.
///
/// Both behaviours existed in the field; which one is authoritative is still
/// an open product question, so it stays configurable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OpenCountPolicy {
    /// An open question with no (trimmed) text counts as unanswered.
    #[default]
    IncludeOpen,
    /// Open questions are never reported as unanswered.
    ExcludeOpen,
}

/// Mutable state of one in-progress test attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptState {
    test_id: TestId,
    current_index: usize,
    answers: HashMap<QuestionId, AnswerValue>,
    started_at: DateTime<Utc>,
}

impl AttemptState {
    /// Fresh state for a just-started attempt: first question, no answers.
    #[must_use]
    pub fn new(test_id: TestId, started_at: DateTime<Utc>) -> Self {
        Self {
            test_id,
            current_index: 0,
            answers: HashMap::new(),
            started_at,
        }
    }

    /// Rebuild state from a persisted snapshot.
    #[must_use]
    pub fn from_parts(
        test_id: TestId,
        current_index: usize,
        answers: HashMap<QuestionId, AnswerValue>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            test_id,
            current_index,
            answers,
            started_at,
        }
    }

    #[must_use]
    pub fn test_id(&self) -> TestId {
        self.test_id
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn answers(&self) -> &HashMap<QuestionId, AnswerValue> {
        &self.answers
    }

    #[must_use]
    pub fn answer(&self, question: QuestionId) -> Option<&AnswerValue> {
        self.answers.get(&question)
    }

    /// Overwrites the stored value for `question`.
    pub fn record_answer(&mut self, question: QuestionId, value: AnswerValue) {
        self.answers.insert(question, value);
    }

    /// Moves to `index` if it is in bounds; out-of-range jumps are ignored.
    pub fn jump_to(&mut self, index: usize, total: usize) {
        if index < total {
            self.current_index = index;
        }
    }

    /// Moves forward by one, stopping at the last question.
    pub fn advance(&mut self, total: usize) {
        if self.current_index + 1 < total {
            self.current_index += 1;
        }
    }

    /// Moves back by one, stopping at the first question.
    pub fn retreat(&mut self) {
        if self.current_index > 0 {
            self.current_index -= 1;
        }
    }

    /// Number of questions with a present answer.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.values().filter(|value| value.is_present()).count()
    }

    /// Progress as an integer percentage, `0` for an empty test.
    #[must_use]
    pub fn progress_percent(&self, total: usize) -> u32 {
        progress_percent(self.answered_count(), total)
    }

    /// Questions of `test` without a present answer, honoring `policy` for
    /// open questions.
    #[must_use]
    pub fn unanswered_count(&self, test: &Test, policy: OpenCountPolicy) -> usize {
        test.questions
            .iter()
            .filter(|question| {
                if policy == OpenCountPolicy::ExcludeOpen && question.kind.is_open() {
                    return false;
                }
                !self
                    .answers
                    .get(&question.id)
                    .is_some_and(AnswerValue::is_present)
            })
            .count()
    }

    /// Whole seconds elapsed since the attempt started, recomputed from the
    /// stored start timestamp so it self-corrects across stalls.
    #[must_use]
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> u64 {
        let seconds = (now - self.started_at).num_seconds();
        u64::try_from(seconds).unwrap_or(0)
    }
}

/// `round(100 * answered / total)`, `0` when `total` is zero.
#[must_use]
pub fn progress_percent(answered: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let ratio = answered as f64 / total as f64;
    (ratio * 100.0).round() as u32
}
