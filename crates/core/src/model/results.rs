/// One student's row in a per-test results table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentResult {
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

/// Aggregated results for one test, as served to the teacher panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestResults {
    pub test_title: String,
    pub group_name: String,
    pub questions_count: u32,
    pub created_at: String,
    pub total_completed: u32,
    pub test_description: Option<String>,
    pub results: Vec<StudentResult>,
}

/// Pass/fail filter for result rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Passed,
    Failed,
}

impl StatusFilter {
    #[must_use]
    pub fn matches(self, passed: bool) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Passed => passed,
            StatusFilter::Failed => !passed,
        }
    }
}

/// Case-insensitive search over student name and username, AND-combined with
/// the status filter. Shared by the results table and the detail view.
#[must_use]
pub fn filter_results<'a>(
    results: &'a [StudentResult],
    query: &str,
    status: StatusFilter,
) -> Vec<&'a StudentResult> {
    let needle = query.trim().to_lowercase();
    results
        .iter()
        .filter(|row| {
            let matches_search = needle.is_empty()
                || row.student_name.to_lowercase().contains(&needle)
                || row.student_username.to_lowercase().contains(&needle);
            matches_search && status.matches(row.passed)
        })
        .collect()
}
