mod category;
mod ids;
mod question;
mod score;

pub use category::{Category, CategoryError};
pub use ids::{ParseIdError, QuestionId};
pub use question::{OPTION_COUNT, Question, QuestionDraft, QuestionError, ValidatedQuestion};
pub use score::{ScoreBand, ScoreError, ScoreSummary};
