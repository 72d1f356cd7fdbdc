use dioxus::prelude::*;

use quiz_core::model::{QuestionDraft, QuestionKind};

use crate::context::AppContext;

use super::actions::{ComposeIntent, use_compose_dispatcher};
use super::state::{ComposeServices, PublishState, use_compose_state};

#[component]
pub fn ComposeView() -> Element {
    let ctx = use_context::<AppContext>();
    let services = ComposeServices {
        authoring: ctx.authoring(),
    };
    let state = use_compose_state();
    let dispatcher = use_compose_dispatcher(&state, &services);
    let dispatch = dispatcher.dispatch;

    let draft = state.draft.read().clone();
    let alert = state.alert.read().clone();
    let validation_error = state.validation_error.read().clone();
    let publish_state = *state.publish_state.read();
    let has_questions = !draft.questions.is_empty();
    let publishing = publish_state == PublishState::Publishing;

    rsx! {
        div { class: "page compose-page",
            h2 { "Создание теста" }

            div { class: "form-control",
                label { r#for: "test-title", "Название теста" }
                input {
                    class: "input",
                    id: "test-title",
                    r#type: "text",
                    placeholder: "Введите название",
                    value: "{draft.title}",
                    oninput: move |evt| dispatch.call(ComposeIntent::SetTitle(evt.value())),
                }
            }
            div { class: "form-control",
                label { r#for: "test-description", "Описание (необязательно)" }
                textarea {
                    class: "input",
                    id: "test-description",
                    rows: "2",
                    value: "{draft.description}",
                    oninput: move |evt| dispatch.call(ComposeIntent::SetDescription(evt.value())),
                }
            }

            if has_questions {
                div { class: "question-blocks", id: "questions-container",
                    for (index, question) in draft.questions.iter().cloned().enumerate() {
                        QuestionBlock { index, question, on_intent: dispatch }
                    }
                }
            } else {
                p { class: "empty-state", id: "empty-state", "Пока нет ни одного вопроса." }
            }

            button {
                class: "btn btn-primary",
                id: "add-question-btn",
                r#type: "button",
                onclick: move |_| dispatch.call(ComposeIntent::AddQuestion),
                "Добавить вопрос"
            }

            div { class: "publish-row",
                button {
                    class: "btn btn-finish",
                    id: "publish-btn",
                    r#type: "button",
                    disabled: publishing,
                    onclick: move |_| dispatch.call(ComposeIntent::Publish),
                    if publishing { "Сохранение..." } else { "Сохранить тест" }
                }
                match publish_state {
                    PublishState::Success => rsx! {
                        span { class: "publish-status publish-status--ok", "Тест создан" }
                    },
                    PublishState::Error(err) => rsx! {
                        span { class: "publish-status publish-status--error", "{err.message()}" }
                    },
                    PublishState::Idle | PublishState::Publishing => rsx! {},
                }
                if let Some(message) = validation_error {
                    p { class: "validation-error", "{message}" }
                }
            }

            if let Some(message) = alert {
                div { class: "modal-overlay",
                    div { class: "modal", role: "alertdialog", aria_modal: "true",
                        p { class: "modal__message", "{message}" }
                        div { class: "modal__actions",
                            button {
                                class: "btn btn-primary",
                                r#type: "button",
                                onclick: move |_| dispatch.call(ComposeIntent::DismissAlert),
                                "ОК"
                            }
                        }
                    }
                }
            }
        }
    }
}

/// One authored question. Display numbering and every row index derive from
/// array position, so removals can never leave gaps.
#[component]
fn QuestionBlock(
    index: usize,
    question: QuestionDraft,
    on_intent: EventHandler<ComposeIntent>,
) -> Element {
    let position = index + 1;
    let is_open = question.kind.is_open();
    let answers_len = question.answers.len();
    let correct_value = question
        .correct
        .map(|selected| selected.to_string())
        .unwrap_or_default();

    rsx! {
        div { class: "question-block",
            button {
                class: "question-block__remove",
                r#type: "button",
                aria_label: "Удалить вопрос {position}",
                onclick: move |_| on_intent.call(ComposeIntent::RemoveQuestion(index)),
                "✕"
            }
            h4 { class: "question-block__title", "Вопрос {position}" }

            div { class: "form-control",
                label { "Текст вопроса" }
                textarea {
                    class: "input",
                    rows: "2",
                    placeholder: "Введите текст вопроса",
                    value: "{question.text}",
                    oninput: move |evt| {
                        on_intent.call(ComposeIntent::SetQuestionText(index, evt.value()));
                    },
                }
            }

            div { class: "form-control",
                label { "Картинка (необязательно)" }
                input {
                    class: "input",
                    r#type: "text",
                    placeholder: "Имя файла изображения",
                    value: question.image_name.clone().unwrap_or_default(),
                    oninput: move |evt| on_intent.call(ComposeIntent::SetImage(index, evt.value())),
                }
            }

            div { class: "form-control",
                label { "Тип вопроса:" }
                select {
                    class: "input question-type",
                    value: "{question.kind.as_str()}",
                    onchange: move |evt| {
                        on_intent
                            .call(ComposeIntent::SetKind(
                                index,
                                QuestionKind::from_wire(&evt.value()),
                            ));
                    },
                    option { value: "choice", selected: !is_open, "Тестовый вопрос" }
                    option { value: "open", selected: is_open, "Открытый вопрос" }
                }
            }

            if is_open {
                div { class: "form-control correct-answer-container",
                    label { "Правильный ответ" }
                    input {
                        class: "input",
                        r#type: "text",
                        placeholder: "Введите правильный ответ",
                        value: "{question.correct_text}",
                        oninput: move |evt| {
                            on_intent.call(ComposeIntent::SetCorrectText(index, evt.value()));
                        },
                    }
                }
            } else {
                div { class: "answers-container",
                    label { "Варианты ответов (макс. 5)" }
                    for (row, answer) in question.answers.iter().cloned().enumerate() {
                        AnswerRow { question_index: index, row, answer, on_intent }
                    }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| on_intent.call(ComposeIntent::AddAnswer(index)),
                        "Добавить вариант"
                    }
                }

                div { class: "form-control correct-answer-container",
                    label { "Правильный ответ" }
                    select {
                        class: "input",
                        value: "{correct_value}",
                        onchange: move |evt| {
                            on_intent
                                .call(ComposeIntent::SetCorrect(index, evt.value().parse().ok()));
                        },
                        option { value: "", selected: question.correct.is_none(), "Выберите правильный ответ" }
                        for selected in 1..=answers_len {
                            option {
                                value: "{selected}",
                                selected: question.correct == Some(selected),
                                "Вариант {selected}"
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn AnswerRow(
    question_index: usize,
    row: usize,
    answer: String,
    on_intent: EventHandler<ComposeIntent>,
) -> Element {
    rsx! {
        div { class: "answer-row",
            span { class: "answer-row__label", "Вариант {row + 1}:" }
            input {
                class: "input",
                r#type: "text",
                placeholder: "Введите вариант ответа",
                value: "{answer}",
                oninput: move |evt| {
                    on_intent
                        .call(ComposeIntent::SetAnswerText {
                            question: question_index,
                            row,
                            text: evt.value(),
                        });
                },
            }
            button {
                class: "answer-row__remove",
                r#type: "button",
                aria_label: "Удалить вариант {row + 1}",
                onclick: move |_| {
                    on_intent
                        .call(ComposeIntent::RemoveAnswer {
                            question: question_index,
                            row,
                        });
                },
                "✕"
            }
        }
    }
}
