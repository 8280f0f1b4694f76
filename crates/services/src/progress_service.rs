use std::sync::Arc;

use chrono::FixedOffset;
use lingo_core::model::{LessonId, QuizScore, UserId, UserProgress};
use lingo_core::time::utc_offset;
use storage::repository::Storage;
use storage::tiered::{PersistOutcome, TieredProgressStore};
use tracing::debug;

use crate::Clock;
use crate::error::ProgressServiceError;

/// Study minutes credited each time a lesson is finished.
pub const LESSON_STUDY_MINUTES: u32 = 10;

/// Result of a progress mutation: the value now current for the user and
/// how far it got persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub progress: UserProgress,
    pub persisted: Option<PersistOutcome>,
}

impl ProgressUpdate {
    /// True when the operation changed the stored value.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.persisted.is_some()
    }
}

/// Result of finishing a lesson: whether it was newly completed, and the
/// progress after the study time was credited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonFinish {
    pub newly_completed: bool,
    pub update: ProgressUpdate,
}

/// Reads and mutates per-user progress through the two-tier store.
///
/// Every mutation is a full read-modify-write; concurrent writers for the
/// same user overwrite each other.
#[derive(Clone)]
pub struct ProgressService {
    clock: Clock,
    store: TieredProgressStore,
    day_offset: FixedOffset,
}

impl ProgressService {
    #[must_use]
    pub fn new(clock: Clock, store: TieredProgressStore) -> Self {
        Self {
            clock,
            store,
            day_offset: utc_offset(),
        }
    }

    #[must_use]
    pub fn from_storage(clock: Clock, storage: &Storage) -> Self {
        Self::new(
            clock,
            TieredProgressStore::new(Arc::clone(&storage.progress), Arc::clone(&storage.cache)),
        )
    }

    /// Offset used to decide which calendar day an instant belongs to.
    #[must_use]
    pub fn with_day_offset(mut self, offset: FixedOffset) -> Self {
        self.day_offset = offset;
        self
    }

    /// Current progress for `user_id`. Never fails: storage outages degrade
    /// to the cached copy or to zero-valued defaults.
    pub async fn get_progress(&self, user_id: &UserId) -> UserProgress {
        let loaded = self.store.load(user_id, self.clock.now()).await;
        debug!(user = %user_id, source = ?loaded.source, "loaded progress");
        loaded.progress
    }

    /// Persist `progress` as the user's current value.
    pub async fn save_progress(&self, user_id: &UserId, progress: &UserProgress) -> PersistOutcome {
        self.store.store(user_id, progress).await
    }

    /// Mark a lesson complete and update the streak.
    ///
    /// Completing an already completed lesson changes nothing and writes nothing.
    pub async fn complete_lesson(&self, user_id: &UserId, lesson_id: &LessonId) -> ProgressUpdate {
        let current = self.get_progress(user_id).await;
        let now = self.clock.now();

        let Some(completion) = current.completing_lesson(lesson_id, now, self.day_offset) else {
            debug!(user = %user_id, lesson = %lesson_id, "lesson already completed");
            return ProgressUpdate {
                progress: current,
                persisted: None,
            };
        };

        if completion.streak_extended {
            debug!(user = %user_id, streak = completion.progress.streak(), "streak extended");
        }
        let persisted = self.save_progress(user_id, &completion.progress).await;
        ProgressUpdate {
            progress: completion.progress,
            persisted: Some(persisted),
        }
    }

    /// Complete a lesson and credit `LESSON_STUDY_MINUTES` of study time.
    ///
    /// The minutes are credited on every finish, including repeats of an
    /// already completed lesson.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Progress` if the study time is rejected.
    pub async fn finish_lesson(
        &self,
        user_id: &UserId,
        lesson_id: &LessonId,
    ) -> Result<LessonFinish, ProgressServiceError> {
        let completion = self.complete_lesson(user_id, lesson_id).await;
        let update = self.add_study_time(user_id, LESSON_STUDY_MINUTES).await?;
        Ok(LessonFinish {
            newly_completed: completion.changed(),
            update,
        })
    }

    /// Add study minutes to the running total.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Progress` when `minutes` is zero.
    pub async fn add_study_time(
        &self,
        user_id: &UserId,
        minutes: u32,
    ) -> Result<ProgressUpdate, ProgressServiceError> {
        let current = self.get_progress(user_id).await;
        let next = current.with_study_time(minutes)?;
        let persisted = self.save_progress(user_id, &next).await;
        Ok(ProgressUpdate {
            progress: next,
            persisted: Some(persisted),
        })
    }

    /// Append a finished quiz to the user's history.
    pub async fn record_quiz_score(&self, user_id: &UserId, score: QuizScore) -> ProgressUpdate {
        let current = self.get_progress(user_id).await;
        let next = current.with_quiz_score(score);
        let persisted = self.save_progress(user_id, &next).await;
        ProgressUpdate {
            progress: next,
            persisted: Some(persisted),
        }
    }

    /// Whether the user has completed `lesson_id`.
    pub async fn is_lesson_completed(&self, user_id: &UserId, lesson_id: &LessonId) -> bool {
        self.get_progress(user_id).await.has_completed(lesson_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Duration;
    use lingo_core::model::Language;
    use lingo_core::time::fixed_now;
    use storage::repository::{InMemoryCache, InMemoryRepository};

    fn user() -> UserId {
        UserId::new("learner-1").unwrap()
    }

    fn lesson(id: &str) -> LessonId {
        LessonId::new(id).unwrap()
    }

    fn service_over(
        clock: Clock,
        repo: &InMemoryRepository,
        cache: &InMemoryCache,
    ) -> ProgressService {
        let store = TieredProgressStore::new(Arc::new(repo.clone()), Arc::new(cache.clone()));
        ProgressService::new(clock, store)
    }

    fn service_at(clock: Clock) -> (ProgressService, InMemoryRepository, InMemoryCache) {
        let repo = InMemoryRepository::new();
        let cache = InMemoryCache::new();
        (service_over(clock, &repo, &cache), repo, cache)
    }

    fn day(n: i64) -> Clock {
        Clock::fixed(fixed_now() + Duration::days(n))
    }

    #[tokio::test]
    async fn new_user_gets_zero_valued_progress() {
        let (service, _, _) = service_at(Clock::fixed(fixed_now()));
        let progress = service.get_progress(&user()).await;
        assert!(progress.completed_lessons().is_empty());
        assert!(progress.quiz_scores().is_empty());
        assert_eq!(progress.streak(), 0);
        assert_eq!(progress.total_study_time(), 0);
    }

    #[tokio::test]
    async fn completing_a_lesson_twice_keeps_one_entry() {
        let (service, _, _) = service_at(Clock::fixed(fixed_now()));
        let first = service.complete_lesson(&user(), &lesson("1")).await;
        assert!(first.changed());
        let second = service.complete_lesson(&user(), &lesson("1")).await;
        assert!(!second.changed());

        let progress = service.get_progress(&user()).await;
        assert_eq!(progress.completed_lessons(), &[lesson("1")]);
    }

    #[tokio::test]
    async fn same_day_completions_extend_streak_at_most_once() {
        let (service, repo, cache) = service_at(day(0));
        let before = service.get_progress(&user()).await.streak();

        let next_day = service_over(day(1), &repo, &cache);
        next_day.complete_lesson(&user(), &lesson("1")).await;
        next_day.complete_lesson(&user(), &lesson("2")).await;

        let after = next_day.get_progress(&user()).await.streak();
        assert_eq!(after - before, 1);
    }

    #[tokio::test]
    async fn completions_on_two_days_extend_streak_twice() {
        let (service, repo, cache) = service_at(day(0));
        let before = service.get_progress(&user()).await.streak();

        service_over(day(1), &repo, &cache)
            .complete_lesson(&user(), &lesson("1"))
            .await;
        let update = service_over(day(2), &repo, &cache)
            .complete_lesson(&user(), &lesson("2"))
            .await;

        assert_eq!(update.progress.streak() - before, 2);
    }

    #[tokio::test]
    async fn study_time_adds_up() {
        let (service, _, _) = service_at(Clock::fixed(fixed_now()));
        let before = service.get_progress(&user()).await.total_study_time();
        service.add_study_time(&user(), 10).await.unwrap();
        service.add_study_time(&user(), 5).await.unwrap();
        let after = service.get_progress(&user()).await.total_study_time();
        assert_eq!(after - before, 15);
    }

    #[tokio::test]
    async fn zero_study_time_is_rejected_without_writing() {
        let (service, _, cache) = service_at(Clock::fixed(fixed_now()));
        let err = service.add_study_time(&user(), 0).await.unwrap_err();
        assert!(matches!(err, ProgressServiceError::Progress(_)));
        assert!(
            storage::repository::KeyValueCache::get_item(&cache, "progress_learner-1")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn quiz_scores_append_in_order() {
        let (service, _, _) = service_at(Clock::fixed(fixed_now()));
        let spanish = Language::new("spanish").unwrap();
        for score in [2, 4] {
            let entry = QuizScore::new(score, 4, fixed_now(), spanish.clone()).unwrap();
            service.record_quiz_score(&user(), entry).await;
        }
        let scores: Vec<u32> = service
            .get_progress(&user())
            .await
            .quiz_scores()
            .iter()
            .map(QuizScore::score)
            .collect();
        assert_eq!(scores, vec![2, 4]);
    }

    #[tokio::test]
    async fn offline_remote_keeps_progress_in_cache() {
        let (service, repo, _) = service_at(Clock::fixed(fixed_now()));
        repo.set_offline(true);

        let update = service.add_study_time(&user(), 7).await.unwrap();
        assert_eq!(update.persisted, Some(PersistOutcome::CachedOnly));
        assert_eq!(service.get_progress(&user()).await.total_study_time(), 7);
    }

    #[tokio::test]
    async fn is_lesson_completed_reflects_progress() {
        let (service, _, _) = service_at(Clock::fixed(fixed_now()));
        assert!(!service.is_lesson_completed(&user(), &lesson("3")).await);
        service.complete_lesson(&user(), &lesson("3")).await;
        assert!(service.is_lesson_completed(&user(), &lesson("3")).await);
    }

    #[tokio::test]
    async fn finishing_a_lesson_credits_study_time() {
        let (service, _, _) = service_at(Clock::fixed(fixed_now()));
        let first = service.finish_lesson(&user(), &lesson("1")).await.unwrap();
        assert!(first.newly_completed);
        assert_eq!(first.update.progress.total_study_time(), LESSON_STUDY_MINUTES);
        assert_eq!(first.update.progress.completed_lessons(), &[lesson("1")]);

        let again = service.finish_lesson(&user(), &lesson("1")).await.unwrap();
        assert!(!again.newly_completed);
        assert_eq!(again.update.progress.total_study_time(), 2 * LESSON_STUDY_MINUTES);
        assert_eq!(again.update.progress.completed_lessons(), &[lesson("1")]);

        let stored = service.get_progress(&user()).await;
        assert_eq!(stored.total_study_time(), 20);
    }
}
