use quiz_core::model::{Category, OPTION_COUNT, Question, QuestionId};
use serde::Serialize;

/// Presentation shape of a question for admin listings and exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionView {
    pub id: QuestionId,
    pub category: Category,
    pub text: String,
    pub options: [String; OPTION_COUNT],
    pub correct_answer: String,
}

impl From<&Question> for QuestionView {
    fn from(question: &Question) -> Self {
        Self {
            id: question.id(),
            category: question.category(),
            text: question.text().to_owned(),
            options: question.options().clone(),
            correct_answer: question.correct_answer().to_owned(),
        }
    }
}

impl QuestionView {
    /// One-line summary: id, text, and the correct option.
    #[must_use]
    pub fn summary_line(&self) -> String {
        format!("[{}] {} (answer: {})", self.id, self.text, self.correct_answer)
    }
}
