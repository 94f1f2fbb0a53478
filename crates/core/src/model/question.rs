use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{category::Category, ids::QuestionId};

/// Number of answer options every question carries.
pub const OPTION_COUNT: usize = 4;

//
// ─── QUESTION DRAFT ────────────────────────────────────────────────────────────
//

/// Unvalidated question fields as entered by an administrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDraft {
    pub text: String,
    pub options: [String; OPTION_COUNT],
    pub correct_answer: String,
}

impl QuestionDraft {
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        options: [String; OPTION_COUNT],
        correct_answer: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            options,
            correct_answer: correct_answer.into(),
        }
    }

    /// Build a draft whose correct answer is the option at `index` (0-based).
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::CorrectOptionOutOfRange` if `index` does not name an option.
    pub fn with_correct_option(
        text: impl Into<String>,
        options: [String; OPTION_COUNT],
        index: usize,
    ) -> Result<Self, QuestionError> {
        let correct_answer = options
            .get(index)
            .cloned()
            .ok_or(QuestionError::CorrectOptionOutOfRange { index })?;
        Ok(Self::new(text, options, correct_answer))
    }

    /// Check field constraints. Values are kept exactly as given.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the text or any option is blank, or if the
    /// correct answer does not match exactly one option.
    pub fn validate(self) -> Result<ValidatedQuestion, QuestionError> {
        if self.text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }

        if let Some(position) = self.options.iter().position(|o| o.trim().is_empty()) {
            return Err(QuestionError::EmptyOption {
                position: position + 1,
            });
        }

        let correct_position = correct_position(&self.options, &self.correct_answer)?;

        Ok(ValidatedQuestion {
            text: self.text,
            options: self.options,
            correct_answer: self.correct_answer,
            correct_position,
        })
    }
}

fn correct_position(
    options: &[String; OPTION_COUNT],
    correct_answer: &str,
) -> Result<usize, QuestionError> {
    let mut matches = options
        .iter()
        .enumerate()
        .filter(|(_, option)| option.as_str() == correct_answer)
        .map(|(i, _)| i);

    match (matches.next(), matches.next()) {
        (Some(i), None) => Ok(i),
        (Some(_), Some(_)) => Err(QuestionError::AmbiguousCorrectAnswer),
        (None, _) => Err(QuestionError::CorrectAnswerNotAnOption),
    }
}

/// Question fields that passed validation but have not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedQuestion {
    text: String,
    options: [String; OPTION_COUNT],
    correct_answer: String,
    correct_position: usize,
}

impl ValidatedQuestion {
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String; OPTION_COUNT] {
        &self.options
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    /// Attach the identity and timestamps assigned by the store.
    #[must_use]
    pub fn into_question(
        self,
        id: QuestionId,
        category: Category,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Question {
        Question {
            id,
            category,
            text: self.text,
            options: self.options,
            correct_answer: self.correct_answer,
            correct_position: self.correct_position,
            created_at,
            updated_at,
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A stored multiple-choice question.
///
/// The correct answer always equals exactly one of the four options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    category: Category,
    text: String,
    options: [String; OPTION_COUNT],
    correct_answer: String,
    correct_position: usize,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Question {
    /// Rehydrate a question from persisted fields.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the stored fields no longer satisfy the
    /// question invariants.
    pub fn from_persisted(
        id: QuestionId,
        category: Category,
        text: String,
        options: [String; OPTION_COUNT],
        correct_answer: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, QuestionError> {
        let validated = QuestionDraft::new(text, options, correct_answer).validate()?;
        Ok(validated.into_question(id, category, created_at, updated_at))
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String; OPTION_COUNT] {
        &self.options
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    /// Index (0-based) of the correct option.
    #[must_use]
    pub fn correct_position(&self) -> usize {
        self.correct_position
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Exact, case-sensitive comparison against the correct answer.
    #[must_use]
    pub fn check_answer(&self, candidate: &str) -> bool {
        candidate == self.correct_answer
    }

    /// Replace every editable field, keeping identity and `created_at`.
    pub fn apply_edit(&mut self, edit: ValidatedQuestion, updated_at: DateTime<Utc>) {
        self.text = edit.text;
        self.options = edit.options;
        self.correct_answer = edit.correct_answer;
        self.correct_position = edit.correct_position;
        self.updated_at = updated_at;
    }
}

//
// ─── VALIDATION ERRORS ─────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text must not be empty")]
    EmptyText,

    #[error("option {position} must not be empty")]
    EmptyOption { position: usize },

    #[error("correct answer must match one of the options")]
    CorrectAnswerNotAnOption,

    #[error("correct answer matches more than one option")]
    AmbiguousCorrectAnswer,

    #[error("correct option index {index} is out of range")]
    CorrectOptionOutOfRange { index: usize },
}
