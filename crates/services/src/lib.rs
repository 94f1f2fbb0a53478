#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod question_store;
pub mod question_view;
pub mod sessions;

pub use quiz_core::Clock;

pub use app_services::QuizServices;
pub use error::{AppServicesError, QuestionStoreError, SessionError};
pub use question_store::QuestionStore;
pub use question_view::QuestionView;
pub use sessions::{AnswerOutcome, QuizSession, SessionProgress, SessionState};
