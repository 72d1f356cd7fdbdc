use std::sync::Arc;

use services::{AttemptService, AuthoringService, ResultsService};

/// Everything the views need from the composition root (the `app` crate or
/// the test harness).
pub trait UiApp: Send + Sync {
    fn attempts(&self) -> Arc<AttemptService>;
    fn authoring(&self) -> Arc<AuthoringService>;
    fn results(&self) -> Arc<ResultsService>;
}

#[derive(Clone)]
pub struct AppContext {
    attempts: Arc<AttemptService>,
    authoring: Arc<AuthoringService>,
    results: Arc<ResultsService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            attempts: app.attempts(),
            authoring: app.authoring(),
            results: app.results(),
        }
    }

    #[must_use]
    pub fn attempts(&self) -> Arc<AttemptService> {
        Arc::clone(&self.attempts)
    }

    #[must_use]
    pub fn authoring(&self) -> Arc<AuthoringService> {
        Arc::clone(&self.authoring)
    }

    #[must_use]
    pub fn results(&self) -> Arc<ResultsService> {
        Arc::clone(&self.results)
    }
}

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
