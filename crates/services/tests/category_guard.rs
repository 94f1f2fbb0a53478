use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use quiz_core::model::{Category, Question, QuestionDraft, QuestionId};
use quiz_core::time::fixed_now;
use services::{Clock, QuestionStore, QuestionStoreError, QuizSession, SessionError};
use storage::repository::{InMemoryRepository, NewQuestionRecord, QuestionRepository, StorageError};

/// Wraps the in-memory repository and counts every call that reaches storage.
#[derive(Default)]
struct CountingRepository {
    inner: InMemoryRepository,
    calls: AtomicUsize,
}

impl CountingRepository {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl QuestionRepository for CountingRepository {
    async fn insert_new_question(
        &self,
        record: NewQuestionRecord,
    ) -> Result<QuestionId, StorageError> {
        self.hit();
        self.inner.insert_new_question(record).await
    }

    async fn list_questions(&self, category: Category) -> Result<Vec<Question>, StorageError> {
        self.hit();
        self.inner.list_questions(category).await
    }

    async fn get_question(
        &self,
        category: Category,
        id: QuestionId,
    ) -> Result<Option<Question>, StorageError> {
        self.hit();
        self.inner.get_question(category, id).await
    }

    async fn update_question(&self, question: &Question) -> Result<(), StorageError> {
        self.hit();
        self.inner.update_question(question).await
    }

    async fn delete_question(
        &self,
        category: Category,
        id: QuestionId,
    ) -> Result<bool, StorageError> {
        self.hit();
        self.inner.delete_question(category, id).await
    }

    async fn count_questions(&self, category: Category) -> Result<u32, StorageError> {
        self.hit();
        self.inner.count_questions(category).await
    }
}

fn draft() -> QuestionDraft {
    QuestionDraft::new(
        "Q",
        ["A".to_owned(), "B".to_owned(), "C".to_owned(), "D".to_owned()],
        "A",
    )
}

#[tokio::test]
async fn unregistered_categories_never_reach_storage() {
    let repo = Arc::new(CountingRepository::default());
    let mut store = QuestionStore::new(Clock::fixed(fixed_now()), repo.clone());
    store.initialize(&[Category::History]).await.unwrap();
    let id = QuestionId::new(1);

    let results = [
        store.create(Category::Bmgt, draft()).await.map(|_| ()),
        store.list(Category::Bmgt).await.map(|_| ()),
        store.get(Category::Bmgt, id).await.map(|_| ()),
        store.update(Category::Bmgt, id, draft()).await,
        store.delete(Category::Bmgt, id).await,
        store.count(Category::Bmgt).await.map(|_| ()),
    ];
    for result in results {
        assert!(matches!(result, Err(QuestionStoreError::InvalidCategory(_))));
    }

    let err = QuizSession::start(Category::Bmgt, &store).await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Store(QuestionStoreError::InvalidCategory(_))
    ));

    assert_eq!(repo.calls(), 0);
}

#[tokio::test]
async fn validation_failures_never_reach_storage() {
    let repo = Arc::new(CountingRepository::default());
    let mut store = QuestionStore::new(Clock::fixed(fixed_now()), repo.clone());
    store.initialize(&[Category::History]).await.unwrap();

    let bad = QuestionDraft::new(
        "Q",
        ["A".to_owned(), String::new(), "C".to_owned(), "D".to_owned()],
        "A",
    );
    let err = store.create(Category::History, bad).await.unwrap_err();
    assert!(matches!(err, QuestionStoreError::Validation(_)));
    assert_eq!(repo.calls(), 0);
}
