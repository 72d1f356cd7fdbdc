use dioxus::prelude::*;
use dioxus_router::use_navigator;

use crate::context::AppContext;
use crate::routes::Route;

/// Entry point: start an attempt or open a results table by test id. A
/// previously stored attempt session is announced here, never auto-applied.
#[component]
pub fn HomeView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let attempts = ctx.attempts();

    let resumable = use_hook(|| attempts.resumable_session());
    let mut start_id = use_signal(String::new);
    let mut results_id = use_signal(String::new);

    let start_test = use_callback(move |()| {
        if let Ok(test_id) = start_id().trim().parse::<u64>() {
            let _ = navigator.push(Route::Take { test_id });
        }
    });
    let open_results = use_callback(move |()| {
        if let Ok(test_id) = results_id().trim().parse::<u64>() {
            let _ = navigator.push(Route::Results { test_id });
        }
    });

    rsx! {
        div { class: "page home-page",
            h2 { "Тесты" }

            if let Some(session) = resumable {
                p { class: "resume-notice", id: "resume-notice",
                    "Найдена незавершённая попытка теста {session.test_id}. "
                    "Автовосстановление отключено — начните тест заново."
                }
            }

            section { class: "home-card",
                h3 { "Пройти тест" }
                div { class: "home-form",
                    input {
                        class: "input",
                        id: "start-test-id",
                        r#type: "text",
                        placeholder: "Номер теста",
                        value: "{start_id}",
                        oninput: move |evt| start_id.set(evt.value()),
                    }
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        onclick: move |_| start_test.call(()),
                        "Начать тест"
                    }
                }
            }

            section { class: "home-card",
                h3 { "Результаты (для преподавателя)" }
                div { class: "home-form",
                    input {
                        class: "input",
                        id: "results-test-id",
                        r#type: "text",
                        placeholder: "Номер теста",
                        value: "{results_id}",
                        oninput: move |evt| results_id.set(evt.value()),
                    }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| open_results.call(()),
                        "Открыть результаты"
                    }
                }
            }
        }
    }
}
