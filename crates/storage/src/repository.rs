use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::model::{Category, OPTION_COUNT, Question, QuestionId, ValidatedQuestion};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Insert payload for a question whose id is assigned by the repository.
#[derive(Debug, Clone)]
pub struct NewQuestionRecord {
    pub category: Category,
    pub text: String,
    pub options: [String; OPTION_COUNT],
    pub correct_answer: String,
    pub created_at: DateTime<Utc>,
}

impl NewQuestionRecord {
    #[must_use]
    pub fn from_validated(
        category: Category,
        question: &ValidatedQuestion,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            category,
            text: question.text().to_owned(),
            options: question.options().clone(),
            correct_answer: question.correct_answer().to_owned(),
            created_at,
        }
    }
}

/// Repository contract for per-category question collections.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Insert a new question and return its assigned id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the question cannot be stored.
    async fn insert_new_question(
        &self,
        record: NewQuestionRecord,
    ) -> Result<QuestionId, StorageError>;

    /// List all questions of a category in id order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on repository failures.
    async fn list_questions(&self, category: Category) -> Result<Vec<Question>, StorageError>;

    /// Fetch a question by id.
    ///
    /// Returns `Ok(None)` when the question does not exist.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on repository failures.
    async fn get_question(
        &self,
        category: Category,
        id: QuestionId,
    ) -> Result<Option<Question>, StorageError>;

    /// Overwrite the editable fields of an existing question.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the question is missing.
    async fn update_question(&self, question: &Question) -> Result<(), StorageError>;

    /// Delete a question. Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on repository failures.
    async fn delete_question(
        &self,
        category: Category,
        id: QuestionId,
    ) -> Result<bool, StorageError>;

    /// Count questions stored for a category.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on repository failures.
    async fn count_questions(&self, category: Category) -> Result<u32, StorageError>;
}

#[derive(Default)]
struct CategoryTable {
    last_id: u64,
    rows: BTreeMap<QuestionId, Question>,
}

/// Simple in-memory repository implementation for testing and prototyping.
///
/// Ids are never reused within a category, matching `AUTOINCREMENT`.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    tables: Arc<Mutex<HashMap<Category, CategoryTable>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl QuestionRepository for InMemoryRepository {
    async fn insert_new_question(
        &self,
        record: NewQuestionRecord,
    ) -> Result<QuestionId, StorageError> {
        let mut guard = self.tables.lock().map_err(poisoned)?;
        let table = guard.entry(record.category).or_default();
        let id = QuestionId::new(table.last_id + 1);
        let question = Question::from_persisted(
            id,
            record.category,
            record.text,
            record.options,
            record.correct_answer,
            record.created_at,
            record.created_at,
        )
        .map_err(|e| StorageError::Serialization(e.to_string()))?;
        table.last_id = id.value();
        table.rows.insert(id, question);
        Ok(id)
    }

    async fn list_questions(&self, category: Category) -> Result<Vec<Question>, StorageError> {
        let guard = self.tables.lock().map_err(poisoned)?;
        Ok(guard
            .get(&category)
            .map(|t| t.rows.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn get_question(
        &self,
        category: Category,
        id: QuestionId,
    ) -> Result<Option<Question>, StorageError> {
        let guard = self.tables.lock().map_err(poisoned)?;
        Ok(guard.get(&category).and_then(|t| t.rows.get(&id)).cloned())
    }

    async fn update_question(&self, question: &Question) -> Result<(), StorageError> {
        let mut guard = self.tables.lock().map_err(poisoned)?;
        let slot = guard
            .get_mut(&question.category())
            .and_then(|t| t.rows.get_mut(&question.id()))
            .ok_or(StorageError::NotFound)?;
        *slot = question.clone();
        Ok(())
    }

    async fn delete_question(
        &self,
        category: Category,
        id: QuestionId,
    ) -> Result<bool, StorageError> {
        let mut guard = self.tables.lock().map_err(poisoned)?;
        Ok(guard
            .get_mut(&category)
            .is_some_and(|t| t.rows.remove(&id).is_some()))
    }

    async fn count_questions(&self, category: Category) -> Result<u32, StorageError> {
        let guard = self.tables.lock().map_err(poisoned)?;
        let len = guard.get(&category).map_or(0, |t| t.rows.len());
        u32::try_from(len).map_err(|_| StorageError::Serialization("count overflow".into()))
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub questions: Arc<dyn QuestionRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let questions: Arc<dyn QuestionRepository> = Arc::new(InMemoryRepository::new());
        Self { questions }
    }
}
