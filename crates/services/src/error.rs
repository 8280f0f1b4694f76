//! Shared error types for the services crate.

use thiserror::Error;

use lingo_core::model::ProgressError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `ProgressService`.
///
/// Persistence failures never appear here; they are absorbed by the
/// two-tier store and reported through `PersistOutcome`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressServiceError {
    #[error(transparent)]
    Progress(#[from] ProgressError),
}

/// Errors emitted by `LessonService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LessonServiceError {
    #[error(transparent)]
    Catalog(#[from] StorageError),
}

/// Errors emitted by quiz sessions and `QuizService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz already completed")]
    Completed,
    #[error("quiz is not finished yet ({answered} of {total} answered)")]
    Unfinished { answered: usize, total: usize },
    #[error("quiz has too many questions to score: {len}")]
    TooManyQuestions { len: usize },
    #[error(transparent)]
    Score(#[from] ProgressError),
    #[error(transparent)]
    Lessons(#[from] LessonServiceError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
