use std::sync::Mutex;

use async_trait::async_trait;

use quiz_core::model::{AttemptReport, Test, TestDraft, TestId, TestResults};

use crate::api::{AttemptSubmission, GatewayError, ResultsGateway, TestGateway};

#[derive(Default)]
struct Inner {
    tests: Vec<Test>,
    report: Option<AttemptReport>,
    results: Option<TestResults>,
    fail_fetch: bool,
    fail_submit: bool,
    fail_results: bool,
    fail_create: bool,
    submissions: Vec<(TestId, AttemptSubmission)>,
    created: Vec<Vec<(String, String)>>,
}

/// Scripted gateway double for services and view-harness tests.
#[derive(Default)]
pub struct InMemoryGateway {
    inner: Mutex<Inner>,
}

impl InMemoryGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_test(&self, test: Test) {
        self.lock().tests.push(test);
    }

    pub fn put_report(&self, report: AttemptReport) {
        self.lock().report = Some(report);
    }

    pub fn put_results(&self, results: TestResults) {
        self.lock().results = Some(results);
    }

    pub fn fail_fetch(&self, fail: bool) {
        self.lock().fail_fetch = fail;
    }

    pub fn fail_submit(&self, fail: bool) {
        self.lock().fail_submit = fail;
    }

    pub fn fail_results(&self, fail: bool) {
        self.lock().fail_results = fail;
    }

    pub fn fail_create(&self, fail: bool) {
        self.lock().fail_create = fail;
    }

    /// Submissions received so far, oldest first.
    #[must_use]
    pub fn submissions(&self) -> Vec<(TestId, AttemptSubmission)> {
        self.lock().submissions.clone()
    }

    /// Form payloads of published drafts, oldest first.
    #[must_use]
    pub fn created(&self) -> Vec<Vec<(String, String)>> {
        self.lock().created.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("gateway state poisoned")
    }
}

#[async_trait]
impl TestGateway for InMemoryGateway {
    async fn fetch_test(&self, id: TestId) -> Result<Test, GatewayError> {
        let inner = self.lock();
        if inner.fail_fetch {
            return Err(GatewayError::Connection("scripted failure".to_string()));
        }
        inner
            .tests
            .iter()
            .find(|test| test.id == id)
            .cloned()
            .ok_or(GatewayError::NotFound)
    }

    async fn submit_attempt(
        &self,
        id: TestId,
        submission: &AttemptSubmission,
    ) -> Result<AttemptReport, GatewayError> {
        let mut inner = self.lock();
        if inner.fail_submit {
            return Err(GatewayError::Connection("scripted failure".to_string()));
        }
        inner.submissions.push((id, submission.clone()));
        inner.report.clone().ok_or(GatewayError::NotFound)
    }

    async fn create_test(&self, draft: &TestDraft) -> Result<(), GatewayError> {
        let mut inner = self.lock();
        if inner.fail_create {
            return Err(GatewayError::Connection("scripted failure".to_string()));
        }
        inner.created.push(draft.form_fields());
        Ok(())
    }
}

#[async_trait]
impl ResultsGateway for InMemoryGateway {
    async fn fetch_results(&self, id: TestId) -> Result<TestResults, GatewayError> {
        let inner = self.lock();
        if inner.fail_results {
            return Err(GatewayError::Connection("scripted failure".to_string()));
        }
        let _ = id;
        inner.results.clone().ok_or(GatewayError::NotFound)
    }
}
