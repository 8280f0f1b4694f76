use lingo_core::model::{Language, QuizResult, UserId};
use rand::Rng;
use tracing::info;

use super::generator::QuizGenerator;
use super::session::QuizSession;
use crate::Clock;
use crate::error::QuizError;
use crate::lesson_service::LessonService;
use crate::progress_service::{ProgressService, ProgressUpdate};

/// Final result of a quiz and, when it had questions, the progress it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizOutcome {
    pub result: QuizResult,
    pub recorded: Option<ProgressUpdate>,
}

/// Builds quizzes from catalog content and records finished ones.
#[derive(Clone)]
pub struct QuizService {
    clock: Clock,
    lessons: LessonService,
    progress: ProgressService,
    generator: QuizGenerator,
}

impl QuizService {
    #[must_use]
    pub fn new(clock: Clock, lessons: LessonService, progress: ProgressService) -> Self {
        Self {
            clock,
            lessons,
            progress,
            generator: QuizGenerator::new(),
        }
    }

    #[must_use]
    pub fn with_size(mut self, size: usize) -> Self {
        self.generator = self.generator.with_size(size);
        self
    }

    /// Start a quiz over the language's content with thread-local randomness.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Lessons` if the catalog cannot be read.
    pub async fn start_quiz(&self, language: &Language) -> Result<QuizSession, QuizError> {
        self.start_quiz_with_rng(language, &mut rand::rng()).await
    }

    /// Start a quiz using the given random source for choice ordering.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Lessons` if the catalog cannot be read.
    pub async fn start_quiz_with_rng<R>(
        &self,
        language: &Language,
        rng: &mut R,
    ) -> Result<QuizSession, QuizError>
    where
        R: Rng + ?Sized,
    {
        let pool = self.lessons.content_pool(language).await?;
        let questions = self.generator.generate(&pool, rng);
        Ok(QuizSession::new(language.clone(), questions))
    }

    /// Record a finished quiz in the user's history.
    ///
    /// Quizzes without questions are graded but not recorded.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Unfinished` if questions remain unanswered.
    pub async fn finish_quiz(
        &self,
        user_id: &UserId,
        session: &QuizSession,
    ) -> Result<QuizOutcome, QuizError> {
        let result = session.result()?;
        if session.is_empty() {
            return Ok(QuizOutcome {
                result,
                recorded: None,
            });
        }

        let score = session.finish(self.clock.now())?;
        let update = self.progress.record_quiz_score(user_id, score).await;
        info!(
            user = %user_id,
            language = %session.language(),
            score = result.score(),
            total = result.total(),
            "recorded quiz score"
        );

        Ok(QuizOutcome {
            result,
            recorded: Some(update),
        })
    }
}
