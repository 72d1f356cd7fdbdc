use quiz_core::model::{StatusFilter, TestResults};
use quiz_core::plural::question_word;

/// Header block of the per-test results view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsHeaderVm {
    pub title: String,
    pub group_label: String,
    pub questions_label: String,
    pub created_label: String,
    pub total_completed: String,
    pub description: Option<String>,
}

impl From<&TestResults> for ResultsHeaderVm {
    fn from(results: &TestResults) -> Self {
        let count = results.questions_count as usize;
        Self {
            title: results.test_title.clone(),
            group_label: format!("Группа: {}", results.group_name),
            questions_label: format!("{count} {}", question_word(count)),
            created_label: format!("Создан {}", results.created_at),
            total_completed: results.total_completed.to_string(),
            description: results
                .test_description
                .clone()
                .filter(|text| !text.trim().is_empty()),
        }
    }
}

/// Maps the status `<select>` value to the shared filter.
#[must_use]
pub fn status_filter_from_value(value: &str) -> StatusFilter {
    match value {
        "passed" => StatusFilter::Passed,
        "failed" => StatusFilter::Failed,
        _ => StatusFilter::All,
    }
}
