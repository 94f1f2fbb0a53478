use thiserror::Error;

use crate::model::{CategoryError, QuestionError, ScoreError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Category(#[from] CategoryError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Score(#[from] ScoreError),
}
