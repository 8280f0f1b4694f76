use std::sync::Arc;

use chrono::FixedOffset;
use storage::catalog::ContentCatalog;
use storage::repository::Storage;

use crate::Clock;
use crate::error::AppServicesError;
use crate::lesson_service::LessonService;
use crate::progress_service::ProgressService;
use crate::quiz::{DEFAULT_QUIZ_SIZE, QuizService};

/// Knobs for assembling services.
#[derive(Debug, Clone, Copy)]
pub struct ServiceSettings {
    pub day_offset: FixedOffset,
    pub quiz_size: usize,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            day_offset: lingo_core::time::utc_offset(),
            quiz_size: DEFAULT_QUIZ_SIZE,
        }
    }
}

/// Assembles app-facing services over one `Storage`.
#[derive(Clone)]
pub struct AppServices {
    progress: Arc<ProgressService>,
    lessons: Arc<LessonService>,
    quizzes: Arc<QuizService>,
}

impl AppServices {
    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock, settings: ServiceSettings) -> Self {
        let progress =
            ProgressService::from_storage(clock, storage).with_day_offset(settings.day_offset);
        let lessons = LessonService::new(Arc::clone(&storage.catalog));
        let quizzes = QuizService::new(clock, lessons.clone(), progress.clone())
            .with_size(settings.quiz_size);

        Self {
            progress: Arc::new(progress),
            lessons: Arc::new(lessons),
            quizzes: Arc::new(quizzes),
        }
    }

    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        remote_url: &str,
        cache_url: &str,
        catalog: Arc<dyn ContentCatalog>,
        clock: Clock,
        settings: ServiceSettings,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(remote_url, cache_url)
            .await?
            .with_catalog(catalog);
        Ok(Self::from_storage(&storage, clock, settings))
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn lessons(&self) -> Arc<LessonService> {
        Arc::clone(&self.lessons)
    }

    #[must_use]
    pub fn quizzes(&self) -> Arc<QuizService> {
        Arc::clone(&self.quizzes)
    }
}
