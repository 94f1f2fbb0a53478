use chrono::{DateTime, Utc};
use std::fmt;

use quiz_core::model::{Category, Question, QuestionId, ScoreSummary};

use super::progress::SessionProgress;
use crate::Clock;
use crate::error::SessionError;
use crate::question_store::QuestionStore;

//
// ─── ANSWER OUTCOME ────────────────────────────────────────────────────────────
//

/// Feedback for a single submitted answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub question_id: QuestionId,
    pub is_correct: bool,
    pub correct_answer: String,
    pub is_complete: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Completed,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One pass over a snapshot of a category's questions.
///
/// The snapshot is copied at start; later store edits do not affect it.
/// `score <= current <= questions.len()` holds at all times.
pub struct QuizSession {
    category: Category,
    questions: Vec<Question>,
    total: u32,
    current: usize,
    score: u32,
    clock: Clock,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// Load every question of `category` from the store and start a session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyCategory` if the category has no questions.
    /// Propagates store failures via `SessionError::Store`.
    pub async fn start(category: Category, store: &QuestionStore) -> Result<Self, SessionError> {
        let questions = store.list(category).await?;
        Self::new(category, questions, store.clock())
    }

    /// Start a session over an already loaded question sequence.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyCategory` if `questions` is empty.
    pub fn new(
        category: Category,
        questions: Vec<Question>,
        clock: Clock,
    ) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::EmptyCategory(category));
        }
        let total = snapshot_total(questions.len())?;

        tracing::debug!(%category, total, "quiz session started");
        Ok(Self {
            category,
            questions,
            total,
            current: 0,
            score: 0,
            clock,
            started_at: clock.now(),
            completed_at: None,
        })
    }

    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Zero-based index of the next question to answer.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.current == self.questions.len()
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        if self.is_complete() {
            SessionState::Completed
        } else {
            SessionState::Active
        }
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.total(),
            answered: self.current,
            remaining: self.questions.len() - self.current,
            score: self.score,
            is_complete: self.is_complete(),
        }
    }

    /// The question awaiting an answer.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` once every question has been answered.
    pub fn current(&self) -> Result<&Question, SessionError> {
        self.questions.get(self.current).ok_or(SessionError::Completed)
    }

    /// Submit the chosen option for the current question and advance.
    ///
    /// The answer is compared by exact string equality and cannot be revised.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` on a finished session and
    /// `SessionError::NoSelection` when `chosen` is empty; neither changes state.
    pub fn submit_answer(&mut self, chosen: &str) -> Result<AnswerOutcome, SessionError> {
        let question = self.current()?;
        if chosen.is_empty() {
            return Err(SessionError::NoSelection);
        }

        let is_correct = question.check_answer(chosen);
        let question_id = question.id();
        let correct_answer = question.correct_answer().to_owned();

        if is_correct {
            self.score += 1;
        }
        self.current += 1;

        if self.is_complete() {
            self.completed_at = Some(self.clock.now());
            tracing::debug!(
                category = %self.category,
                score = self.score,
                total = self.questions.len(),
                "quiz session completed"
            );
        }

        Ok(AnswerOutcome {
            question_id,
            is_correct,
            correct_answer,
            is_complete: self.is_complete(),
        })
    }

    /// Final score of a completed session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InProgress` while questions remain.
    pub fn summary(&self) -> Result<ScoreSummary, SessionError> {
        if !self.is_complete() {
            return Err(SessionError::InProgress);
        }
        Ok(ScoreSummary::new(self.score, self.total)?)
    }
}

fn snapshot_total(len: usize) -> Result<u32, SessionError> {
    u32::try_from(len).map_err(|_| SessionError::TooManyQuestions(len))
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("category", &self.category)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("score", &self.score)
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
