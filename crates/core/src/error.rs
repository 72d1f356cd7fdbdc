use thiserror::Error;

use crate::model::{DraftError, ParseIdError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Draft(#[from] DraftError),
    #[error(transparent)]
    ParseId(#[from] ParseIdError),
}
