use std::collections::BTreeSet;

use thiserror::Error;

use crate::model::test::QuestionKind;

/// Answer rows a new question starts with.
pub const INITIAL_ANSWER_ROWS: usize = 4;
/// Fewest answer rows a choice question may keep.
pub const MIN_ANSWER_ROWS: usize = 2;
/// Most answer rows a choice question may have.
pub const MAX_ANSWER_ROWS: usize = 5;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DraftError {
    #[error("a question holds at most {MAX_ANSWER_ROWS} answer options")]
    AnswerLimit,

    #[error("a question keeps at least {MIN_ANSWER_ROWS} answer options")]
    AnswerMinimum,

    #[error("no question at index {index}")]
    QuestionOutOfRange { index: usize },

    #[error("question {index} has no answer row {row}")]
    AnswerOutOfRange { index: usize, row: usize },

    #[error("test title is empty")]
    EmptyTitle,

    #[error("test has no questions")]
    NoQuestions,

    #[error("question {position} has no text")]
    EmptyQuestionText { position: usize },

    #[error("question {position} answer {row} is empty")]
    EmptyAnswer { position: usize, row: usize },

    #[error("question {position} has no correct option selected")]
    MissingCorrect { position: usize },

    #[error("question {position} has no expected answer text")]
    EmptyCorrectText { position: usize },
}

/// One question block being authored.
///
/// `number` is the server-facing field number and never changes once
/// assigned; display titles derive from the block's position instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDraft {
    pub number: u64,
    pub text: String,
    pub image_name: Option<String>,
    pub kind: QuestionKind,
    pub answers: Vec<String>,
    /// 1-based selected row of the correct option, for choice questions.
    pub correct: Option<usize>,
    /// Expected answer text, for open questions.
    pub correct_text: String,
}

impl QuestionDraft {
    fn new(number: u64) -> Self {
        Self {
            number,
            text: String::new(),
            image_name: None,
            kind: QuestionKind::Choice,
            answers: vec![String::new(); INITIAL_ANSWER_ROWS],
            correct: None,
            correct_text: String::new(),
        }
    }
}

/// A test under construction in the authoring form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestDraft {
    pub title: String,
    pub description: String,
    pub questions: Vec<QuestionDraft>,
    next_number: u64,
    /// Numbers of removed blocks. Local bookkeeping only; never sent to the
    /// server.
    deleted_numbers: BTreeSet<u64>,
}

impl TestDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn deleted_numbers(&self) -> &BTreeSet<u64> {
        &self.deleted_numbers
    }

    /// Appends a fresh question block and returns its index.
    pub fn add_question(&mut self) -> usize {
        self.next_number += 1;
        self.questions.push(QuestionDraft::new(self.next_number));
        self.questions.len() - 1
    }

    /// Removes the block at `index`, recording its number as deleted.
    ///
    /// # Errors
    ///
    /// Returns `DraftError::QuestionOutOfRange` if `index` does not exist.
    pub fn remove_question(&mut self, index: usize) -> Result<(), DraftError> {
        if index >= self.questions.len() {
            return Err(DraftError::QuestionOutOfRange { index });
        }
        let removed = self.questions.remove(index);
        self.deleted_numbers.insert(removed.number);
        Ok(())
    }

    /// Appends an empty answer row to question `index`.
    ///
    /// # Errors
    ///
    /// Returns `DraftError::AnswerLimit` at `MAX_ANSWER_ROWS`; the draft is
    /// left unchanged.
    pub fn add_answer(&mut self, index: usize) -> Result<(), DraftError> {
        let question = self
            .questions
            .get_mut(index)
            .ok_or(DraftError::QuestionOutOfRange { index })?;
        if question.answers.len() >= MAX_ANSWER_ROWS {
            return Err(DraftError::AnswerLimit);
        }
        question.answers.push(String::new());
        Ok(())
    }

    /// Removes answer `row` (0-based) from question `index`, shifting the
    /// correct-option selection so it keeps pointing at the same text.
    ///
    /// # Errors
    ///
    /// Returns `DraftError::AnswerMinimum` at `MIN_ANSWER_ROWS`; the draft is
    /// left unchanged.
    pub fn remove_answer(&mut self, index: usize, row: usize) -> Result<(), DraftError> {
        let question = self
            .questions
            .get_mut(index)
            .ok_or(DraftError::QuestionOutOfRange { index })?;
        if question.answers.len() <= MIN_ANSWER_ROWS {
            return Err(DraftError::AnswerMinimum);
        }
        if row >= question.answers.len() {
            return Err(DraftError::AnswerOutOfRange { index, row });
        }
        question.answers.remove(row);
        question.correct = match question.correct {
            Some(selected) if selected == row + 1 => None,
            Some(selected) if selected > row + 1 => Some(selected - 1),
            other => other,
        };
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `DraftError::QuestionOutOfRange` if `index` does not exist.
    pub fn set_kind(&mut self, index: usize, kind: QuestionKind) -> Result<(), DraftError> {
        let question = self
            .questions
            .get_mut(index)
            .ok_or(DraftError::QuestionOutOfRange { index })?;
        question.kind = kind;
        Ok(())
    }

    /// Selects the correct option (1-based) of question `index`.
    ///
    /// # Errors
    ///
    /// Returns `DraftError::AnswerOutOfRange` for a selection past the last
    /// row.
    pub fn set_correct(&mut self, index: usize, selected: Option<usize>) -> Result<(), DraftError> {
        let question = self
            .questions
            .get_mut(index)
            .ok_or(DraftError::QuestionOutOfRange { index })?;
        if let Some(row) = selected {
            if row == 0 || row > question.answers.len() {
                return Err(DraftError::AnswerOutOfRange { index, row });
            }
        }
        question.correct = selected;
        Ok(())
    }

    /// Checks the draft the way native form validation would, with answer
    /// fields of open questions exempt.
    ///
    /// # Errors
    ///
    /// Returns the first failing `DraftError`; positions are 1-based display
    /// numbers.
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.title.trim().is_empty() {
            return Err(DraftError::EmptyTitle);
        }
        if self.questions.is_empty() {
            return Err(DraftError::NoQuestions);
        }
        for (position, question) in self.questions.iter().enumerate() {
            let position = position + 1;
            if question.text.trim().is_empty() {
                return Err(DraftError::EmptyQuestionText { position });
            }
            match question.kind {
                QuestionKind::Choice => {
                    for (row, answer) in question.answers.iter().enumerate() {
                        if answer.trim().is_empty() {
                            return Err(DraftError::EmptyAnswer {
                                position,
                                row: row + 1,
                            });
                        }
                    }
                    if question.correct.is_none() {
                        return Err(DraftError::MissingCorrect { position });
                    }
                }
                QuestionKind::Open => {
                    if question.correct_text.trim().is_empty() {
                        return Err(DraftError::EmptyCorrectText { position });
                    }
                }
            }
        }
        Ok(())
    }

    /// The submission payload as ordered `(name, value)` pairs.
    ///
    /// Field names carry each block's immutable number. Open questions emit
    /// no answer rows and no correct-option field — the payload never
    /// includes stale fields for a type the author switched away from.
    #[must_use]
    pub fn form_fields(&self) -> Vec<(String, String)> {
        let mut fields = vec![
            ("test_title".to_string(), self.title.clone()),
            ("test_description".to_string(), self.description.clone()),
        ];
        for question in &self.questions {
            let n = question.number;
            fields.push((format!("question_{n}_text"), question.text.clone()));
            if let Some(image) = &question.image_name {
                fields.push((format!("question_{n}_image"), image.clone()));
            }
            fields.push((
                format!("question_{n}_type"),
                question.kind.as_str().to_string(),
            ));
            match question.kind {
                QuestionKind::Choice => {
                    for (row, answer) in question.answers.iter().enumerate() {
                        fields.push((
                            format!("question_{n}_answer_{}", row + 1),
                            answer.clone(),
                        ));
                    }
                    fields.push((
                        format!("question_{n}_correct"),
                        question
                            .correct
                            .map(|selected| selected.to_string())
                            .unwrap_or_default(),
                    ));
                }
                QuestionKind::Open => {
                    fields.push((
                        format!("question_{n}_correct_text"),
                        question.correct_text.clone(),
                    ));
                }
            }
            fields.push((
                format!("question_{n}_answers_count"),
                question.answers.len().to_string(),
            ));
        }
        fields
    }
}
