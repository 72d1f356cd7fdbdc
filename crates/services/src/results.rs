use std::sync::Arc;

use gateway::ResultsGateway;
use quiz_core::model::{TestId, TestResults};

use crate::error::ResultsError;

/// Thin query service for the teacher-facing results views.
#[derive(Clone)]
pub struct ResultsService {
    gateway: Arc<dyn ResultsGateway>,
}

impl ResultsService {
    #[must_use]
    pub fn new(gateway: Arc<dyn ResultsGateway>) -> Self {
        Self { gateway }
    }

    /// # Errors
    ///
    /// Returns `ResultsError::Gateway` when the table cannot be loaded.
    pub async fn fetch(&self, id: TestId) -> Result<TestResults, ResultsError> {
        match self.gateway.fetch_results(id).await {
            Ok(results) => Ok(results),
            Err(err) => {
                tracing::warn!(test_id = %id, error = %err, "could not load test results");
                Err(err.into())
            }
        }
    }
}
