use storage::repository::Storage;

use quiz_core::model::Category;

use crate::Clock;
use crate::error::{AppServicesError, SessionError};
use crate::question_store::QuestionStore;
use crate::sessions::QuizSession;

/// Assembles app-facing services over a storage backend.
#[derive(Clone)]
pub struct QuizServices {
    store: QuestionStore,
}

impl QuizServices {
    /// Build services backed by `SQLite` storage, registering every category.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or demo seeding fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        demo_data: bool,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::from_storage(&storage, clock, demo_data).await
    }

    /// Build services over an existing storage aggregate.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Store` if demo seeding fails.
    pub async fn from_storage(
        storage: &Storage,
        clock: Clock,
        demo_data: bool,
    ) -> Result<Self, AppServicesError> {
        let mut store = QuestionStore::new(clock, storage.questions.clone()).with_demo_data(demo_data);
        store.initialize(&Category::ALL).await?;
        Ok(Self { store })
    }

    #[must_use]
    pub fn store(&self) -> &QuestionStore {
        &self.store
    }

    /// Start a quiz over the named category.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Store` for unknown names and
    /// `SessionError::EmptyCategory` when it holds no questions.
    pub async fn start_quiz(&self, category_name: &str) -> Result<QuizSession, SessionError> {
        let category = self.store.resolve(category_name)?;
        QuizSession::start(category, &self.store).await
    }
}
