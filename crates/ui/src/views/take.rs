use dioxus::document::eval;
use dioxus::events::{Key, Modifiers};
use dioxus::prelude::*;
use dioxus_router::use_navigator;

use quiz_core::model::{AnswerId, AnswerValue, AttemptReport, QuestionId, QuestionKind, TestId};
use quiz_core::plural::question_word;
use services::Attempt;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ERROR_BANNER_SECS, ViewError, ViewState, view_state_from_resource};
use crate::vm::{NavControls, ReportVm};

mod scripts;

use scripts::attempt_timer_script;

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

/// Commands of the taking flow. Every control and key binding funnels into
/// one dispatcher, so the bindings stay data and the handlers stay in one
/// table.
#[derive(Clone, Debug, PartialEq)]
pub enum TakeIntent {
    SaveAnswer(QuestionId, AnswerValue),
    JumpTo(usize),
    Next,
    Prev,
    Skip,
    RequestFinish,
    CancelFinish,
    ConfirmFinish,
    DismissError,
    ReturnToList,
}

#[component]
pub fn TakeView(test_id: u64) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let test_id = TestId::new(test_id);
    let attempts = ctx.attempts();

    let error = use_signal(|| None::<ViewError>);
    let mut banner_epoch = use_signal(|| 0_u32);
    let vm = use_signal(|| None::<Attempt>);
    let report = use_signal(|| None::<AttemptReport>);
    let confirm_open = use_signal(|| false);
    let submitting = use_signal(|| false);

    let attempts_for_resource = attempts.clone();
    let resource = use_resource(move || {
        let attempts = attempts_for_resource.clone();
        let mut vm = vm;
        let mut error = error;
        let mut report = report;

        async move {
            report.set(None);
            let started = attempts
                .start(test_id)
                .await
                .map_err(|_| ViewError::TestUnavailable)?;
            vm.set(Some(started));
            error.set(None);
            Ok::<_, ViewError>(())
        }
    });

    let state = view_state_from_resource(&resource);

    // Dismissable banner, auto-hidden after 8 seconds. The epoch keeps an old
    // sleeper from hiding a newer message.
    let show_error = use_callback(move |err: ViewError| {
        let mut error = error;
        error.set(Some(err));
        let epoch = banner_epoch() + 1;
        banner_epoch.set(epoch);
        spawn(async move {
            tokio::time::sleep(std::time::Duration::from_secs(ERROR_BANNER_SECS)).await;
            if banner_epoch() == epoch {
                error.set(None);
            }
        });
    });

    let attempts_for_dispatch = attempts.clone();
    let dispatch = use_callback(move |intent: TakeIntent| {
        let attempts = attempts_for_dispatch.clone();
        let mut vm = vm;
        let mut error = error;
        let mut report = report;
        let mut confirm_open = confirm_open;
        let mut submitting = submitting;

        match intent {
            TakeIntent::SaveAnswer(question, value) => {
                if let Some(attempt) = vm.write().as_mut() {
                    attempts.record_answer(attempt, question, value);
                }
            }
            TakeIntent::JumpTo(index) => {
                if let Some(attempt) = vm.write().as_mut() {
                    attempts.jump_to(attempt, index);
                }
            }
            TakeIntent::Next | TakeIntent::Skip => {
                if let Some(attempt) = vm.write().as_mut() {
                    attempts.advance(attempt);
                }
            }
            TakeIntent::Prev => {
                if let Some(attempt) = vm.write().as_mut() {
                    attempts.retreat(attempt);
                }
            }
            TakeIntent::RequestFinish => confirm_open.set(true),
            TakeIntent::CancelFinish => confirm_open.set(false),
            TakeIntent::ConfirmFinish => {
                confirm_open.set(false);
                let attempts = attempts.clone();
                spawn(async move {
                    // Deactivating the timer script is the submit-side "stop".
                    submitting.set(true);
                    let current = { vm.write().take() };
                    let Some(attempt) = current else {
                        submitting.set(false);
                        return;
                    };
                    let result = attempts.submit(&attempt).await;
                    // The attempt goes back either way: a failed submission
                    // resumes the timer with no elapsed time lost.
                    {
                        let mut guard = vm.write();
                        *guard = Some(attempt);
                    }
                    submitting.set(false);
                    match result {
                        Ok(graded) => {
                            error.set(None);
                            report.set(Some(graded));
                        }
                        Err(_) => show_error.call(ViewError::SubmitFailed),
                    }
                });
            }
            TakeIntent::DismissError => error.set(None),
            TakeIntent::ReturnToList => {
                let _ = navigator.push(Route::Home {});
            }
        }
    });

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<TakeTestHandles>() {
                handles.register(dispatch, vm, report);
            }
        }
    }

    let retry_start = use_callback(move |()| {
        let mut resource = resource;
        resource.restart();
    });

    let on_key = {
        use_callback(move |evt: KeyboardEvent| {
            if report.read().is_some() || confirm_open() {
                return;
            }
            let (current_index, total) = match vm.read().as_ref() {
                Some(attempt) => (attempt.current_index(), attempt.total_questions()),
                None => return,
            };
            let nav = NavControls::at(current_index, total);

            match evt.data.key() {
                Key::ArrowLeft => {
                    evt.prevent_default();
                    dispatch.call(TakeIntent::Prev);
                }
                Key::ArrowRight => {
                    evt.prevent_default();
                    dispatch.call(TakeIntent::Next);
                }
                Key::Enter => {
                    evt.prevent_default();
                    if nav.show_next {
                        dispatch.call(TakeIntent::Next);
                    } else {
                        dispatch.call(TakeIntent::RequestFinish);
                    }
                }
                Key::Character(value) => {
                    if evt.data.modifiers().contains(Modifiers::ALT) {
                        if value.eq_ignore_ascii_case("f") {
                            evt.prevent_default();
                            dispatch.call(TakeIntent::RequestFinish);
                        }
                        return;
                    }
                    // Digits 1-9 jump to that question, 0 to question 10.
                    let target = match value.as_str() {
                        "0" => Some(10),
                        digit => digit.parse::<usize>().ok().filter(|n| *n >= 1),
                    };
                    if let Some(number) = target {
                        if number <= total {
                            evt.prevent_default();
                            dispatch.call(TakeIntent::JumpTo(number - 1));
                        }
                    }
                }
                _ => {}
            }
        })
    };

    // Render snapshot of the current attempt.
    let vm_guard = vm.read();
    let attempt = vm_guard.as_ref();
    let test_title = attempt.map(|a| a.test().title.clone()).unwrap_or_default();
    let test_description = attempt
        .and_then(|a| a.test().description.clone())
        .unwrap_or_default();
    let current_index = attempt.map_or(0, Attempt::current_index);
    let total = attempt.map_or(0, Attempt::total_questions);
    let answered = attempt.map_or(0, Attempt::answered_count);
    let percent = attempt.map_or(0, Attempt::progress_percent);
    let question = attempt.and_then(|a| a.current_question()).cloned();
    let saved_answer =
        question.as_ref().and_then(|q| attempt.and_then(|a| a.answer(q.id).cloned()));
    let strip: Vec<(usize, bool, bool)> = attempt
        .map(|a| {
            a.test()
                .questions
                .iter()
                .enumerate()
                .map(|(index, q)| (index, a.is_answered(q.id), index == current_index))
                .collect()
        })
        .unwrap_or_default();
    let unanswered = attempt.map_or(0, |a| attempts.unanswered_count(a));
    drop(vm_guard);

    let nav = NavControls::at(current_index, total);
    let confirm_message = if unanswered > 0 {
        format!(
            "У вас осталось {unanswered} неотвеченных {}. Вы уверены, что хотите завершить тест?",
            question_word(unanswered)
        )
    } else {
        "Вы ответили на все вопросы. Завершить тест?".to_string()
    };
    let report_vm = report.read().as_ref().map(ReportVm::from);
    let banner_error = *error.read();

    use_effect(move || {
        let start_ms = vm
            .read()
            .as_ref()
            .map_or(0, |a| a.state().started_at().timestamp_millis());
        let has_attempt = vm.read().is_some();
        let active = has_attempt && report.read().is_none() && !submitting();
        let js = attempt_timer_script(start_ms, active);
        let _ = eval(&js);
    });

    rsx! {
        div { class: "page take-page", id: "take-root", tabindex: "0", onkeydown: on_key,
            if let Some(err) = banner_error {
                div { class: "error-banner", id: "error-banner", role: "alert",
                    span { class: "error-banner__message", "{err.message()}" }
                    button {
                        class: "error-banner__close",
                        r#type: "button",
                        onclick: move |_| dispatch.call(TakeIntent::DismissError),
                        "✕"
                    }
                }
            }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { class: "loading", "Загрузка теста..." }
                },
                ViewState::Error(err) => rsx! {
                    div { class: "load-error",
                        p { "{err.message()}" }
                        button {
                            class: "btn btn-secondary",
                            r#type: "button",
                            onclick: move |_| retry_start.call(()),
                            "Повторить"
                        }
                    }
                },
                ViewState::Ready(()) => rsx! {
                    if let Some(report_vm) = report_vm {
                        ResultPane { report: report_vm, on_intent: dispatch }
                    } else {
                        header { class: "take-header",
                            h2 { class: "take-title", "{test_title}" }
                            if !test_description.is_empty() {
                                p { class: "take-description", "{test_description}" }
                            }
                            div { class: "take-meta",
                                span { class: "take-timer", id: "attempt-timer", "00:00" }
                                span { class: "take-progress", id: "progress", "{answered}/{total}" }
                            }
                            div { class: "progress-track",
                                div {
                                    class: "progress-bar",
                                    id: "progress-bar",
                                    role: "progressbar",
                                    aria_valuenow: "{percent}",
                                    style: "width: {percent}%",
                                }
                            }
                        }

                        QuestionStrip { strip, on_intent: dispatch }

                        if let Some(question) = question {
                            QuestionPanel {
                                question,
                                position: current_index + 1,
                                total,
                                saved: saved_answer,
                                on_intent: dispatch,
                            }
                        }

                        footer { class: "take-nav",
                            button {
                                class: "btn btn-secondary",
                                id: "prev-btn",
                                r#type: "button",
                                disabled: nav.prev_disabled,
                                onclick: move |_| dispatch.call(TakeIntent::Prev),
                                "Назад"
                            }
                            if nav.show_skip {
                                button {
                                    class: "btn btn-ghost",
                                    id: "skip-btn",
                                    r#type: "button",
                                    onclick: move |_| dispatch.call(TakeIntent::Skip),
                                    "Пропустить"
                                }
                            }
                            if nav.show_next {
                                button {
                                    class: "btn btn-primary",
                                    id: "next-btn",
                                    r#type: "button",
                                    onclick: move |_| dispatch.call(TakeIntent::Next),
                                    "Далее"
                                }
                            }
                            if nav.show_finish {
                                button {
                                    class: "btn btn-finish",
                                    id: "finish-btn",
                                    r#type: "button",
                                    onclick: move |_| dispatch.call(TakeIntent::RequestFinish),
                                    "Завершить тест"
                                }
                            }
                        }

                        if confirm_open() {
                            div { class: "modal-overlay",
                                div {
                                    class: "modal",
                                    role: "dialog",
                                    aria_modal: "true",
                                    p { class: "modal__message", id: "confirm-message", "{confirm_message}" }
                                    div { class: "modal__actions",
                                        button {
                                            class: "btn btn-finish",
                                            r#type: "button",
                                            onclick: move |_| dispatch.call(TakeIntent::ConfirmFinish),
                                            "Завершить"
                                        }
                                        button {
                                            class: "btn btn-secondary",
                                            r#type: "button",
                                            onclick: move |_| dispatch.call(TakeIntent::CancelFinish),
                                            "Отмена"
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
            }
        }
    }
}

/// Numbered jump buttons, one per question, with answered/current marks.
#[component]
fn QuestionStrip(strip: Vec<(usize, bool, bool)>, on_intent: EventHandler<TakeIntent>) -> Element {
    rsx! {
        ol { class: "question-nav", id: "question-nav",
            for (index, answered, current) in strip {
                li {
                    button {
                        class: if current {
                            "question-nav__btn question-nav__btn--current"
                        } else if answered {
                            "question-nav__btn question-nav__btn--answered"
                        } else {
                            "question-nav__btn"
                        },
                        r#type: "button",
                        aria_label: if answered {
                            "Вопрос {index + 1}, отвечен"
                        } else {
                            "Вопрос {index + 1}, не отвечен"
                        },
                        onclick: move |_| on_intent.call(TakeIntent::JumpTo(index)),
                        "{index + 1}"
                    }
                }
            }
        }
    }
}

/// Exactly one input form per question type: a textarea for open questions,
/// a radio group for choice questions. Prior input is restored from the
/// attempt state.
#[component]
fn QuestionPanel(
    question: quiz_core::model::Question,
    position: usize,
    total: usize,
    saved: Option<AnswerValue>,
    on_intent: EventHandler<TakeIntent>,
) -> Element {
    let question_id = question.id;
    let saved_text = saved
        .as_ref()
        .and_then(|value| value.as_open())
        .unwrap_or_default()
        .to_string();
    let saved_choice = saved.as_ref().and_then(AnswerValue::as_choice);
    struct OptionRow {
        id: AnswerId,
        text: String,
        selected: bool,
        letter: char,
    }
    let options: Vec<OptionRow> = question
        .answers
        .iter()
        .enumerate()
        .map(|(index, option)| OptionRow {
            id: option.id,
            text: option.text.clone(),
            selected: saved_choice == Some(option.id),
            letter: char::from(b'A' + (index % 26) as u8),
        })
        .collect();

    rsx! {
        section { class: "question-panel",
            span { class: "question-badge", "Вопрос {position} из {total}" }
            h3 { class: "question-text", "{question.text}" }
            if let Some(image) = question.image.clone() {
                figure { class: "question-figure",
                    img { class: "question-image", src: "{image}", alt: "Изображение к вопросу {position}" }
                }
            }
            match question.kind {
                QuestionKind::Open => rsx! {
                    div { class: "open-answer",
                        label { r#for: "open-answer-input", "Ваш ответ" }
                        textarea {
                            class: "open-answer__input",
                            id: "open-answer-input",
                            rows: "4",
                            placeholder: "Введите ответ...",
                            value: "{saved_text}",
                            oninput: move |evt| {
                                on_intent
                                    .call(TakeIntent::SaveAnswer(
                                        question_id,
                                        AnswerValue::Open(evt.value()),
                                    ));
                            },
                            onkeydown: move |evt| evt.stop_propagation(),
                        }
                        p { class: "open-answer__hint", "Регистр не важен" }
                    }
                },
                QuestionKind::Choice => rsx! {
                    fieldset { class: "choice-group", role: "radiogroup",
                        legend { class: "sr-only", "Выберите один вариант ответа" }
                        for option in options {
                            label {
                                class: if option.selected { "choice-option choice-option--selected" } else { "choice-option" },
                                input {
                                    r#type: "radio",
                                    name: "question_{question_id}",
                                    value: "{option.id}",
                                    checked: option.selected,
                                    onchange: move |_| {
                                        on_intent
                                            .call(TakeIntent::SaveAnswer(
                                                question_id,
                                                AnswerValue::Choice(option.id),
                                            ));
                                    },
                                    onkeydown: move |evt| evt.stop_propagation(),
                                }
                                span { class: "choice-option__letter", "{option.letter}." }
                                span { class: "choice-option__text", "{option.text}" }
                            }
                        }
                    }
                },
            }
        }
    }
}

#[component]
fn ResultPane(report: ReportVm, on_intent: EventHandler<TakeIntent>) -> Element {
    let score_class = if report.passed {
        "result-score result-score--passed"
    } else {
        "result-score result-score--failed"
    };

    rsx! {
        section { class: "result-pane", id: "test-result",
            h2 { class: "result-level-title", "{report.level_title}" }
            if !report.level_description.is_empty() {
                p { class: "result-level-description", "{report.level_description}" }
            }
            p { class: "{score_class}", id: "result-score", "{report.percentage_label}" }
            p { class: "result-summary", "{report.summary_label}" }
            if let Some(time_label) = report.time_label.clone() {
                p { class: "result-time", "{time_label}" }
            }
            if let Some(recommendations) = report.recommendations.clone() {
                div { class: "result-recommendations",
                    h3 { "Рекомендации" }
                    p { "{recommendations}" }
                }
            }

            div { class: "result-details", id: "detailed-results",
                for review in report.reviews {
                    div {
                        class: if review.is_correct {
                            "result-detail result-detail--correct"
                        } else {
                            "result-detail result-detail--wrong"
                        },
                        span { class: "result-detail__position", "{review.position_label}" }
                        h4 { class: "result-detail__question", "{review.question_text}" }
                        p { class: "result-detail__answer",
                            span { class: "result-detail__label", "Ваш ответ" }
                            "{review.user_answer_label}"
                        }
                        if let Some(correct_answer) = review.correct_answer {
                            p { class: "result-detail__expected",
                                span { class: "result-detail__label", "Верный ответ" }
                                "{correct_answer}"
                            }
                        }
                    }
                }
            }

            button {
                class: "btn btn-primary",
                r#type: "button",
                onclick: move |_| on_intent.call(TakeIntent::ReturnToList),
                "Вернуться к списку"
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct TakeTestHandles {
    dispatch: Rc<RefCell<Option<Callback<TakeIntent>>>>,
    vm: Rc<RefCell<Option<Signal<Option<services::Attempt>>>>>,
    report: Rc<RefCell<Option<Signal<Option<AttemptReport>>>>>,
}

#[cfg(test)]
impl TakeTestHandles {
    pub(crate) fn register(
        &self,
        dispatch: Callback<TakeIntent>,
        vm: Signal<Option<services::Attempt>>,
        report: Signal<Option<AttemptReport>>,
    ) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.vm.borrow_mut() = Some(vm);
        *self.report.borrow_mut() = Some(report);
    }

    pub(crate) fn dispatch(&self) -> Callback<TakeIntent> {
        (*self.dispatch.borrow()).expect("take dispatch registered")
    }

    pub(crate) fn vm(&self) -> Signal<Option<services::Attempt>> {
        (*self.vm.borrow()).expect("take vm registered")
    }

    pub(crate) fn report(&self) -> Signal<Option<AttemptReport>> {
        (*self.report.borrow()).expect("take report registered")
    }
}
