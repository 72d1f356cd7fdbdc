use std::sync::Arc;

use gateway::TestGateway;
use quiz_core::model::TestDraft;

use crate::error::AuthoringError;

/// Publishes authored tests after a final validation pass.
#[derive(Clone)]
pub struct AuthoringService {
    gateway: Arc<dyn TestGateway>,
}

impl AuthoringService {
    #[must_use]
    pub fn new(gateway: Arc<dyn TestGateway>) -> Self {
        Self { gateway }
    }

    /// Validates the draft and posts its form payload.
    ///
    /// Validation runs against the draft's current question types, so fields
    /// belonging to a type the author switched away from can never fail it —
    /// `TestDraft::form_fields` drops them from the payload as well.
    ///
    /// # Errors
    ///
    /// Returns `AuthoringError::Draft` for an incomplete draft,
    /// `AuthoringError::Gateway` when the server rejects it.
    pub async fn publish(&self, draft: &TestDraft) -> Result<(), AuthoringError> {
        draft.validate()?;
        if let Err(err) = self.gateway.create_test(draft).await {
            tracing::warn!(error = %err, "could not publish test");
            return Err(err.into());
        }
        Ok(())
    }
}
