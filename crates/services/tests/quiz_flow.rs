use std::sync::Arc;

use quiz_core::model::{Category, QuestionDraft, QuestionId, ScoreBand};
use quiz_core::time::fixed_now;
use services::{Clock, QuestionStore, QuestionStoreError, QuizServices, QuizSession, SessionError};
use storage::repository::Storage;

fn draft(text: &str, correct: &str) -> QuestionDraft {
    QuestionDraft::new(
        text,
        ["A".to_owned(), "B".to_owned(), "C".to_owned(), "D".to_owned()],
        correct,
    )
}

#[tokio::test]
async fn history_single_question_quiz_over_sqlite() {
    let services = QuizServices::new_sqlite(
        "sqlite:file:memdb_quiz_history?mode=memory&cache=shared",
        Clock::fixed(fixed_now()),
        false,
    )
    .await
    .expect("bootstrap sqlite services");
    let store = services.store();

    store
        .create(Category::History, draft("Which option is B?", "B"))
        .await
        .unwrap();

    let mut session = services.start_quiz("History").await.unwrap();
    assert_eq!(session.total(), 1);
    assert_eq!(session.current().unwrap().text(), "Which option is B?");

    let outcome = session.submit_answer("B").unwrap();
    assert!(outcome.is_correct);
    assert!(session.is_complete());

    let summary = session.summary().unwrap();
    assert_eq!((summary.score(), summary.total()), (1, 1));
    assert!((summary.percentage() - 100.0).abs() < f64::EPSILON);
    assert_eq!(summary.band(), ScoreBand::Excellent);
}

#[tokio::test]
async fn admin_crud_flow_over_sqlite() {
    let storage = Storage::sqlite("sqlite:file:memdb_admin_crud?mode=memory&cache=shared")
        .await
        .expect("connect sqlite");
    let mut store = QuestionStore::new(Clock::fixed(fixed_now()), Arc::clone(&storage.questions));
    store.initialize(&Category::ALL).await.unwrap();

    let id = store
        .create(Category::Accounting, draft("Debit or credit?", "A"))
        .await
        .unwrap();
    let fetched = store.get(Category::Accounting, id).await.unwrap();
    assert_eq!(fetched.text(), "Debit or credit?");
    assert_eq!(fetched.correct_answer(), "A");

    store
        .update(Category::Accounting, id, draft("Debit or credit? (edited)", "D"))
        .await
        .unwrap();
    let listed = store.list(Category::Accounting).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].text(), "Debit or credit? (edited)");
    assert_eq!(listed[0].correct_answer(), "D");

    let err = store
        .create(Category::Accounting, draft("bad", "Z"))
        .await
        .unwrap_err();
    assert!(matches!(err, QuestionStoreError::Validation(_)));
    assert_eq!(store.count(Category::Accounting).await.unwrap(), 1);

    store.delete(Category::Accounting, id).await.unwrap();
    store.delete(Category::Accounting, id).await.unwrap();
    assert!(matches!(
        store.get(Category::Accounting, id).await,
        Err(QuestionStoreError::NotFound { .. })
    ));
    assert!(store.list(Category::Accounting).await.unwrap().is_empty());
}

#[tokio::test]
async fn session_keeps_its_snapshot_when_store_changes() {
    let services = QuizServices::from_storage(&Storage::in_memory(), Clock::fixed(fixed_now()), false)
        .await
        .unwrap();
    let store = services.store();
    let first = store.create(Category::Bmgt, draft("first", "A")).await.unwrap();
    store.create(Category::Bmgt, draft("second", "B")).await.unwrap();

    let mut session = QuizSession::start(Category::Bmgt, store).await.unwrap();

    store
        .update(Category::Bmgt, first, draft("first (edited)", "C"))
        .await
        .unwrap();
    store.delete(Category::Bmgt, QuestionId::new(2)).await.unwrap();
    store.create(Category::Bmgt, draft("third", "D")).await.unwrap();

    assert_eq!(session.total(), 2);
    assert_eq!(session.current().unwrap().text(), "first");
    assert!(session.submit_answer("A").unwrap().is_correct);
    assert_eq!(session.current().unwrap().text(), "second");
    assert!(session.submit_answer("B").unwrap().is_correct);
    assert_eq!(session.summary().unwrap().score(), 2);
}

#[tokio::test]
async fn score_equals_number_of_matching_answers() {
    let services = QuizServices::from_storage(&Storage::in_memory(), Clock::fixed(fixed_now()), false)
        .await
        .unwrap();
    let store = services.store();
    let answers = ["A", "B", "C", "D", "A", "B", "C"];
    for (i, correct) in answers.iter().enumerate() {
        store
            .create(Category::Ds3860, draft(&format!("q{i}"), correct))
            .await
            .unwrap();
    }

    let chosen = ["A", "A", "C", "C", "A", "D", "C"];
    let expected = answers
        .iter()
        .zip(chosen.iter())
        .filter(|(a, c)| a == c)
        .count();

    let mut session = services.start_quiz("ds3860").await.unwrap();
    for (k, choice) in chosen.iter().enumerate() {
        session.submit_answer(choice).unwrap();
        assert_eq!(session.current_index(), k + 1);
    }

    let summary = session.summary().unwrap();
    assert_eq!(summary.score() as usize, expected);
    assert!(summary.score() <= summary.total());
    assert_eq!(summary.band(), ScoreBand::NeedsPractice);
}

#[tokio::test]
async fn empty_category_cannot_start() {
    let services = QuizServices::from_storage(&Storage::in_memory(), Clock::fixed(fixed_now()), false)
        .await
        .unwrap();
    for category in Category::ALL {
        assert!(services.store().list(category).await.unwrap().is_empty());
        let err = QuizSession::start(category, services.store()).await.unwrap_err();
        assert!(matches!(err, SessionError::EmptyCategory(c) if c == category));
    }
}
