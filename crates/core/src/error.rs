use thiserror::Error;

use crate::model::{ParseGameTypeError, ProgressError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Progress(#[from] ProgressError),
    #[error(transparent)]
    GameType(#[from] ParseGameTypeError),
}
