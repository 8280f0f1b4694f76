#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod flashcards;
pub mod lesson_service;
pub mod progress_service;
pub mod progress_view;
pub mod quiz;

pub use lingo_core::Clock;
pub use storage::tiered::PersistOutcome;

pub use app_services::{AppServices, ServiceSettings};
pub use error::{AppServicesError, LessonServiceError, ProgressServiceError, QuizError};
pub use flashcards::{Flashcard, FlashcardDeck};
pub use lesson_service::LessonService;
pub use progress_service::{LESSON_STUDY_MINUTES, LessonFinish, ProgressService, ProgressUpdate};
pub use progress_view::ProgressOverview;
pub use quiz::{AnswerResult, QuizOutcome, QuizService, QuizSession};
