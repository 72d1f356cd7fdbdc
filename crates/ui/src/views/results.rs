use dioxus::prelude::*;

use quiz_core::model::{TestId, TestResults, filter_results};

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{ResultsHeaderVm, status_filter_from_value};

/// Per-test results table for the teacher panel: async fetch, then purely
/// client-side search and status filtering over the fetched rows.
#[component]
pub fn ResultsView(test_id: u64) -> Element {
    let ctx = use_context::<AppContext>();
    let results_service = ctx.results();
    let test_id = TestId::new(test_id);

    let mut search_query = use_signal(String::new);
    let mut status_value = use_signal(|| "all".to_string());

    let resource = use_resource(move || {
        let results_service = results_service.clone();
        async move {
            results_service
                .fetch(test_id)
                .await
                .map_err(|_| ViewError::ResultsUnavailable)
        }
    });

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page results-page",
            h2 { "Результаты теста" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { class: "loading", "Загрузка результатов..." }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "load-error", "{err.message()}" }
                },
                ViewState::Ready(data) => rsx! {
                    ResultsHeader { data: data.clone() }

                    div { class: "results-filters",
                        input {
                            class: "input",
                            id: "results-search",
                            r#type: "search",
                            placeholder: "Поиск по имени или логину",
                            value: "{search_query}",
                            oninput: move |evt| search_query.set(evt.value()),
                        }
                        select {
                            class: "input",
                            id: "results-status",
                            value: "{status_value}",
                            onchange: move |evt| status_value.set(evt.value()),
                            option { value: "all", "Все" }
                            option { value: "passed", "Сдали" }
                            option { value: "failed", "Не сдали" }
                        }
                    }

                    ResultsTable {
                        data,
                        query: search_query(),
                        status_value: status_value(),
                    }
                },
            }
        }
    }
}

#[component]
fn ResultsHeader(data: TestResults) -> Element {
    let header = ResultsHeaderVm::from(&data);
    rsx! {
        header { class: "results-header",
            h3 { class: "results-title", "{header.title}" }
            p { class: "results-meta",
                span { "{header.group_label}" }
                span { "{header.questions_label}" }
                span { "{header.created_label}" }
                span { "Прошли: {header.total_completed}" }
            }
            if let Some(description) = header.description {
                p { class: "results-description", "{description}" }
            }
        }
    }
}

#[component]
fn ResultsTable(data: TestResults, query: String, status_value: String) -> Element {
    let status = status_filter_from_value(&status_value);
    let rows: Vec<_> = filter_results(&data.results, &query, status)
        .into_iter()
        .cloned()
        .collect();

    if data.results.is_empty() {
        return rsx! {
            p { class: "no-results", "Пока нет результатов." }
        };
    }
    if rows.is_empty() {
        return rsx! {
            p { class: "no-results", id: "no-results-message", "Ничего не найдено." }
        };
    }

    rsx! {
        table { class: "results-table",
            thead {
                tr {
                    th { "Студент" }
                    th { "Группа" }
                    th { "Баллы" }
                    th { "Процент" }
                    th { "Время" }
                    th { "Завершено" }
                }
            }
            tbody {
                for row in rows {
                    tr {
                        class: if row.passed { "result-row result-row--passed" } else { "result-row result-row--failed" },
                        td {
                            div { class: "result-row__name", "{row.student_name}" }
                            div { class: "result-row__username", "@{row.student_username}" }
                        }
                        td { "{row.student_group}" }
                        td { "{row.score}/{row.total}" }
                        td {
                            span {
                                class: if row.passed { "badge badge--passed" } else { "badge badge--failed" },
                                "{row.percentage}%"
                            }
                        }
                        td { "{row.time_formatted}" }
                        td { "{row.completed_at}" }
                    }
                }
            }
        }
    }
}
