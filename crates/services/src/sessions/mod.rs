mod progress;
mod quiz;

// Public API of the quiz session subsystem.
pub use crate::error::SessionError;
pub use progress::SessionProgress;
pub use quiz::{AnswerOutcome, QuizSession, SessionState};
