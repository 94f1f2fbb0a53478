use std::collections::BTreeSet;
use std::sync::Arc;

use quiz_core::model::{Category, Question, QuestionDraft, QuestionId};
use storage::repository::{NewQuestionRecord, QuestionRepository, StorageError};

use crate::Clock;
use crate::error::QuestionStoreError;

/// Number of placeholder questions seeded into an empty category.
pub const DEMO_QUESTIONS_PER_CATEGORY: u32 = 10;

/// Validated CRUD over per-category question collections.
///
/// Only categories registered through [`QuestionStore::initialize`] are
/// reachable; everything else fails with `InvalidCategory` before the
/// repository is touched.
#[derive(Clone)]
pub struct QuestionStore {
    clock: Clock,
    questions: Arc<dyn QuestionRepository>,
    categories: BTreeSet<Category>,
    demo_data: bool,
}

impl QuestionStore {
    #[must_use]
    pub fn new(clock: Clock, questions: Arc<dyn QuestionRepository>) -> Self {
        Self {
            clock,
            questions,
            categories: BTreeSet::new(),
            demo_data: false,
        }
    }

    /// Seed empty categories with placeholder questions during `initialize`.
    #[must_use]
    pub fn with_demo_data(mut self, demo_data: bool) -> Self {
        self.demo_data = demo_data;
        self
    }

    /// Register categories in the allowlist. Calling it again is harmless.
    ///
    /// With demo data enabled, categories that are empty at this point are
    /// seeded with placeholder questions.
    ///
    /// # Errors
    ///
    /// Returns `QuestionStoreError::Storage` if counting or seeding fails.
    pub async fn initialize(&mut self, categories: &[Category]) -> Result<(), QuestionStoreError> {
        for &category in categories {
            self.categories.insert(category);
            if self.demo_data && self.questions.count_questions(category).await? == 0 {
                self.seed_demo_questions(category).await?;
            }
        }
        tracing::debug!(categories = ?self.categories, "question store initialized");
        Ok(())
    }

    async fn seed_demo_questions(&self, category: Category) -> Result<(), QuestionStoreError> {
        let now = self.clock.now();
        for i in 1..=DEMO_QUESTIONS_PER_CATEGORY {
            let draft = QuestionDraft::new(
                format!("Sample question {i} for {category}"),
                [
                    "Option A".to_owned(),
                    "Option B".to_owned(),
                    "Option C".to_owned(),
                    "Option D".to_owned(),
                ],
                "Option B",
            );
            let validated = draft.validate()?;
            self.questions
                .insert_new_question(NewQuestionRecord::from_validated(category, &validated, now))
                .await?;
        }
        tracing::info!(%category, count = DEMO_QUESTIONS_PER_CATEGORY, "seeded demo questions");
        Ok(())
    }

    /// Registered categories in declaration order.
    #[must_use]
    pub fn categories(&self) -> Vec<Category> {
        self.categories.iter().copied().collect()
    }

    /// Parse a caller-supplied name into a registered category.
    ///
    /// # Errors
    ///
    /// Returns `QuestionStoreError::InvalidCategory` for unknown or unregistered names.
    pub fn resolve(&self, name: &str) -> Result<Category, QuestionStoreError> {
        let category = name.parse::<Category>().map_err(|_| {
            tracing::warn!(name, "rejected unknown category");
            QuestionStoreError::InvalidCategory(name.to_owned())
        })?;
        self.ensure_registered(category)?;
        Ok(category)
    }

    fn ensure_registered(&self, category: Category) -> Result<(), QuestionStoreError> {
        if self.categories.contains(&category) {
            Ok(())
        } else {
            tracing::warn!(%category, "rejected unregistered category");
            Err(QuestionStoreError::InvalidCategory(category.name().to_owned()))
        }
    }

    /// Validate and persist a new question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionStoreError::InvalidCategory`, `QuestionStoreError::Validation`
    /// for malformed fields, or `QuestionStoreError::Storage` if persistence fails.
    pub async fn create(
        &self,
        category: Category,
        draft: QuestionDraft,
    ) -> Result<QuestionId, QuestionStoreError> {
        self.ensure_registered(category)?;
        let validated = draft.validate()?;
        let record = NewQuestionRecord::from_validated(category, &validated, self.clock.now());
        let id = self.questions.insert_new_question(record).await?;
        tracing::info!(%category, %id, "question created");
        Ok(id)
    }

    /// All questions of a category in id order; empty when there are none.
    ///
    /// # Errors
    ///
    /// Returns `QuestionStoreError::InvalidCategory` or `QuestionStoreError::Storage`.
    pub async fn list(&self, category: Category) -> Result<Vec<Question>, QuestionStoreError> {
        self.ensure_registered(category)?;
        Ok(self.questions.list_questions(category).await?)
    }

    /// Fetch a single question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionStoreError::NotFound` when the id is absent.
    pub async fn get(
        &self,
        category: Category,
        id: QuestionId,
    ) -> Result<Question, QuestionStoreError> {
        self.ensure_registered(category)?;
        self.questions
            .get_question(category, id)
            .await?
            .ok_or(QuestionStoreError::NotFound { category, id })
    }

    /// Replace every editable field of an existing question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionStoreError::Validation` for malformed fields and
    /// `QuestionStoreError::NotFound` when the id is absent.
    pub async fn update(
        &self,
        category: Category,
        id: QuestionId,
        draft: QuestionDraft,
    ) -> Result<(), QuestionStoreError> {
        self.ensure_registered(category)?;
        let validated = draft.validate()?;
        let mut question = self.get(category, id).await?;
        question.apply_edit(validated, self.clock.now());

        match self.questions.update_question(&question).await {
            Ok(()) => {}
            Err(StorageError::NotFound) => {
                return Err(QuestionStoreError::NotFound { category, id });
            }
            Err(e) => return Err(e.into()),
        }
        tracing::info!(%category, %id, "question updated");
        Ok(())
    }

    /// Delete a question. Deleting an absent id succeeds without changes.
    ///
    /// # Errors
    ///
    /// Returns `QuestionStoreError::InvalidCategory` or `QuestionStoreError::Storage`.
    pub async fn delete(&self, category: Category, id: QuestionId) -> Result<(), QuestionStoreError> {
        self.ensure_registered(category)?;
        if self.questions.delete_question(category, id).await? {
            tracing::info!(%category, %id, "question deleted");
        } else {
            tracing::debug!(%category, %id, "delete matched no question");
        }
        Ok(())
    }

    /// Number of questions stored for a category.
    ///
    /// # Errors
    ///
    /// Returns `QuestionStoreError::InvalidCategory` or `QuestionStoreError::Storage`.
    pub async fn count(&self, category: Category) -> Result<u32, QuestionStoreError> {
        self.ensure_registered(category)?;
        Ok(self.questions.count_questions(category).await?)
    }

    pub(crate) fn clock(&self) -> Clock {
        self.clock
    }
}
