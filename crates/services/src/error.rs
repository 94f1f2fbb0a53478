//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{Category, QuestionError, QuestionId, ScoreError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `QuestionStore`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionStoreError {
    #[error("invalid category: {0}")]
    InvalidCategory(String),
    #[error(transparent)]
    Validation(#[from] QuestionError),
    #[error("question {id} not found in {category}")]
    NotFound { category: Category, id: QuestionId },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `QuizSession`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions found for {0}")]
    EmptyCategory(Category),
    #[error("too many questions for one quiz: {0}")]
    TooManyQuestions(usize),
    #[error("please select an answer")]
    NoSelection,
    #[error("quiz already completed")]
    Completed,
    #[error("quiz is still in progress")]
    InProgress,
    #[error(transparent)]
    Score(#[from] ScoreError),
    #[error(transparent)]
    Store(#[from] QuestionStoreError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Store(#[from] QuestionStoreError),
}
