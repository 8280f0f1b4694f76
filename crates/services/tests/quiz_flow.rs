use std::sync::Arc;

use async_trait::async_trait;
use lingo_core::model::{Language, Lesson, UserId};
use lingo_core::time::fixed_now;
use rand::SeedableRng;
use rand::rngs::StdRng;
use services::{AppServices, Clock, QuizError, ServiceSettings};
use storage::catalog::{ContentCatalog, InMemoryCatalog};
use storage::repository::{Storage, StorageError};

const CATALOG: &str = r#"{
    "spanish": [
        {"id": "1", "title": "Basic Greetings", "category": "Vocabulary", "difficulty": "Beginner",
         "content": [
            {"word": "Hola", "translation": "Hello", "pronunciation": "OH-lah"},
            {"word": "Adiós", "translation": "Goodbye", "pronunciation": "ah-DYOHS"},
            {"word": "Gracias", "translation": "Thank you", "pronunciation": "GRAH-syahs"},
            {"word": "Por favor", "translation": "Please", "pronunciation": "por fah-BOR"}
         ]}
    ]
}"#;

fn services() -> AppServices {
    let catalog = InMemoryCatalog::from_json(CATALOG).unwrap();
    let storage = Storage::in_memory().with_catalog(Arc::new(catalog));
    AppServices::from_storage(&storage, Clock::fixed(fixed_now()), ServiceSettings::default())
}

fn user() -> UserId {
    UserId::new("learner-1").unwrap()
}

#[tokio::test]
async fn quiz_answers_are_scored_and_recorded() {
    let app = services();
    let spanish = Language::new("spanish").unwrap();
    let mut rng = StdRng::seed_from_u64(11);

    let mut session = app
        .quizzes()
        .start_quiz_with_rng(&spanish, &mut rng)
        .await
        .unwrap();
    assert_eq!(session.len(), 4);

    // Right, wrong, right, right.
    let mut turn = 0;
    while let Some(question) = session.current().cloned() {
        let choice = if turn == 1 {
            question
                .choices
                .iter()
                .find(|c| **c != question.correct_answer)
                .cloned()
                .unwrap()
        } else {
            question.correct_answer.clone()
        };
        session.answer(&choice).unwrap();
        turn += 1;
    }

    let outcome = app.quizzes().finish_quiz(&user(), &session).await.unwrap();
    assert_eq!(outcome.result.score(), 3);
    assert_eq!(outcome.result.total(), 4);
    assert!(outcome.recorded.is_some());

    let progress = app.progress().get_progress(&user()).await;
    assert_eq!(progress.quiz_scores().len(), 1);
    let entry = &progress.quiz_scores()[0];
    assert_eq!((entry.score(), entry.total()), (3, 4));
    assert_eq!(entry.language(), &spanish);
    assert_eq!(entry.date(), fixed_now());
}

#[tokio::test]
async fn unknown_language_gives_an_empty_quiz_that_is_not_recorded() {
    let app = services();
    let german = Language::new("german").unwrap();
    let session = app.quizzes().start_quiz(&german).await.unwrap();
    assert!(session.is_empty());

    let outcome = app.quizzes().finish_quiz(&user(), &session).await.unwrap();
    assert!(outcome.recorded.is_none());
    assert_eq!(outcome.result.total(), 0);
    assert!(app.progress().get_progress(&user()).await.quiz_scores().is_empty());
}

#[tokio::test]
async fn unfinished_quiz_cannot_be_recorded() {
    let app = services();
    let spanish = Language::new("spanish").unwrap();
    let session = app.quizzes().start_quiz(&spanish).await.unwrap();
    let err = app.quizzes().finish_quiz(&user(), &session).await.unwrap_err();
    assert!(matches!(err, QuizError::Unfinished { answered: 0, total: 4 }));
}

struct BrokenCatalog;

#[async_trait]
impl ContentCatalog for BrokenCatalog {
    async fn lessons(&self, _language: &Language) -> Result<Vec<Lesson>, StorageError> {
        Err(StorageError::Connection("catalog offline".into()))
    }

    async fn languages(&self) -> Result<Vec<Language>, StorageError> {
        Err(StorageError::Connection("catalog offline".into()))
    }
}

#[tokio::test]
async fn catalog_failures_surface_from_quiz_start() {
    let storage = Storage::in_memory().with_catalog(Arc::new(BrokenCatalog));
    let app =
        AppServices::from_storage(&storage, Clock::fixed(fixed_now()), ServiceSettings::default());
    let spanish = Language::new("spanish").unwrap();
    let err = app.quizzes().start_quiz(&spanish).await.unwrap_err();
    assert!(matches!(err, QuizError::Lessons(_)));
}
