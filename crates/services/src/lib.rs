#![forbid(unsafe_code)]

pub mod attempt;
pub mod authoring;
pub mod error;
pub mod results;

pub use quiz_core::Clock;

pub use attempt::{Attempt, AttemptService};
pub use authoring::AuthoringService;
pub use error::{AttemptError, AuthoringError, ResultsError};
pub use results::ResultsService;
