use dioxus::prelude::*;

use quiz_core::model::{DraftError, QuestionKind, TestDraft};

use crate::views::ViewError;

use super::state::{ComposeServices, ComposeState, PublishState};

/// Commands of the authoring form, consumed by a single dispatcher.
#[derive(Clone, Debug, PartialEq)]
pub enum ComposeIntent {
    SetTitle(String),
    SetDescription(String),
    AddQuestion,
    RemoveQuestion(usize),
    SetQuestionText(usize, String),
    SetImage(usize, String),
    SetKind(usize, QuestionKind),
    SetAnswerText { question: usize, row: usize, text: String },
    AddAnswer(usize),
    RemoveAnswer { question: usize, row: usize },
    SetCorrect(usize, Option<usize>),
    SetCorrectText(usize, String),
    DismissAlert,
    Publish,
}

pub struct ComposeDispatcher {
    pub dispatch: Callback<ComposeIntent>,
}

pub fn use_compose_dispatcher(
    state: &ComposeState,
    services: &ComposeServices,
) -> ComposeDispatcher {
    let state = state.clone();
    let authoring = services.authoring.clone();

    let dispatch = use_callback(move |intent: ComposeIntent| {
        let authoring = authoring.clone();
        let mut draft = state.draft;
        let mut alert = state.alert;
        let mut validation_error = state.validation_error;
        let mut publish_state = state.publish_state;

        match intent {
            ComposeIntent::SetTitle(value) => draft.write().title = value,
            ComposeIntent::SetDescription(value) => draft.write().description = value,
            ComposeIntent::AddQuestion => {
                draft.write().add_question();
            }
            ComposeIntent::RemoveQuestion(index) => {
                let _ = draft.write().remove_question(index);
            }
            ComposeIntent::SetQuestionText(index, value) => {
                if let Some(question) = draft.write().questions.get_mut(index) {
                    question.text = value;
                }
            }
            ComposeIntent::SetImage(index, name) => {
                if let Some(question) = draft.write().questions.get_mut(index) {
                    question.image_name = Some(name).filter(|name| !name.trim().is_empty());
                }
            }
            ComposeIntent::SetKind(index, kind) => {
                let _ = draft.write().set_kind(index, kind);
            }
            ComposeIntent::SetAnswerText { question, row, text } => {
                if let Some(question) = draft.write().questions.get_mut(question) {
                    if let Some(answer) = question.answers.get_mut(row) {
                        *answer = text;
                    }
                }
            }
            ComposeIntent::AddAnswer(index) => {
                let result = draft.write().add_answer(index);
                if let Err(err) = result {
                    alert.set(Some(alert_text(&err)));
                }
            }
            ComposeIntent::RemoveAnswer { question, row } => {
                let result = draft.write().remove_answer(question, row);
                if let Err(err) = result {
                    alert.set(Some(alert_text(&err)));
                }
            }
            ComposeIntent::SetCorrect(index, selected) => {
                let _ = draft.write().set_correct(index, selected);
            }
            ComposeIntent::SetCorrectText(index, value) => {
                if let Some(question) = draft.write().questions.get_mut(index) {
                    question.correct_text = value;
                }
            }
            ComposeIntent::DismissAlert => alert.set(None),
            ComposeIntent::Publish => {
                let current = draft.read().clone();
                if let Err(err) = current.validate() {
                    validation_error.set(Some(validation_text(&err)));
                    publish_state.set(PublishState::Idle);
                    return;
                }
                validation_error.set(None);
                publish_state.set(PublishState::Publishing);
                spawn(async move {
                    match authoring.publish(&current).await {
                        Ok(()) => {
                            publish_state.set(PublishState::Success);
                            let mut fresh = TestDraft::new();
                            fresh.add_question();
                            draft.set(fresh);
                        }
                        Err(_) => {
                            publish_state.set(PublishState::Error(ViewError::PublishFailed));
                        }
                    }
                });
            }
        }
    });

    ComposeDispatcher { dispatch }
}

fn alert_text(err: &DraftError) -> String {
    match err {
        DraftError::AnswerLimit => "Максимум 5 вариантов ответа!".to_string(),
        DraftError::AnswerMinimum => "Минимум 2 варианта ответа!".to_string(),
        other => other.to_string(),
    }
}

fn validation_text(err: &DraftError) -> String {
    match err {
        DraftError::EmptyTitle => "Укажите название теста.".to_string(),
        DraftError::NoQuestions => "Добавьте хотя бы один вопрос.".to_string(),
        DraftError::EmptyQuestionText { position } => {
            format!("Заполните текст вопроса {position}.")
        }
        DraftError::EmptyAnswer { position, row } => {
            format!("Заполните вариант {row} в вопросе {position}.")
        }
        DraftError::MissingCorrect { position } => {
            format!("Выберите правильный ответ в вопросе {position}.")
        }
        DraftError::EmptyCorrectText { position } => {
            format!("Укажите правильный ответ для вопроса {position}.")
        }
        other => other.to_string(),
    }
}
