//! Shared error types for the services crate.

use thiserror::Error;

use gateway::{GatewayError, SessionStoreError};
use quiz_core::model::DraftError;

/// Errors emitted by `AttemptService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AttemptError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error(transparent)]
    Session(#[from] SessionStoreError),
}

/// Errors emitted by `AuthoringService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthoringError {
    #[error(transparent)]
    Draft(#[from] DraftError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Errors emitted by `ResultsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ResultsError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
