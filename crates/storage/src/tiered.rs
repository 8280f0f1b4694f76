//! Two-tier progress persistence: a remote document store (primary) backed by
//! a device-local blob cache (secondary).
//!
//! Reads prefer the primary and degrade to the cache, then to a fresh
//! zero-valued record. Writes go to both tiers; either one succeeding is
//! enough for the write to count. Nothing here retries.

use chrono::{DateTime, Utc};
use lingo_core::model::{UserId, UserProgress};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::repository::{
    KeyValueCache, ProgressRepository, StorageError, progress_from_json, progress_to_json,
};

/// Prefix of the cache key holding a user's progress blob.
pub const CACHE_KEY_PREFIX: &str = "progress_";

/// Cache key for a user's progress blob (`progress_<user id>`).
#[must_use]
pub fn cache_key(user_id: &UserId) -> String {
    format!("{CACHE_KEY_PREFIX}{user_id}")
}

/// Failures of a single tier. Both are recovered inside the store and only
/// reach callers through logs and the returned source/outcome.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TierError {
    #[error("remote progress store unavailable: {0}")]
    RemoteUnavailable(#[source] StorageError),
    #[error("local progress cache unavailable: {0}")]
    CacheUnavailable(#[source] StorageError),
}

/// Where a loaded progress value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// Existing remote record.
    Remote,
    /// No remote record existed; a default was created remotely.
    Created,
    /// Remote failed; the cached copy was used.
    Cache,
    /// Neither tier produced a record; an unpersisted default was used.
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loaded {
    pub progress: UserProgress,
    pub source: LoadSource,
}

/// Which tiers accepted a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    Synced,
    CachedOnly,
    RemoteOnly,
    NotPersisted,
}

impl PersistOutcome {
    fn from_tiers(remote_ok: bool, cache_ok: bool) -> Self {
        match (remote_ok, cache_ok) {
            (true, true) => PersistOutcome::Synced,
            (false, true) => PersistOutcome::CachedOnly,
            (true, false) => PersistOutcome::RemoteOnly,
            (false, false) => PersistOutcome::NotPersisted,
        }
    }

    /// True when at least one tier holds the written value.
    #[must_use]
    pub fn is_persisted(self) -> bool {
        !matches!(self, PersistOutcome::NotPersisted)
    }
}

#[derive(Clone)]
pub struct TieredProgressStore {
    primary: Arc<dyn ProgressRepository>,
    secondary: Arc<dyn KeyValueCache>,
}

impl TieredProgressStore {
    #[must_use]
    pub fn new(primary: Arc<dyn ProgressRepository>, secondary: Arc<dyn KeyValueCache>) -> Self {
        Self { primary, secondary }
    }

    /// Load progress for `user_id`, creating a default record stamped `now`
    /// when the primary has none.
    pub async fn load(&self, user_id: &UserId, now: DateTime<Utc>) -> Loaded {
        let err = match self.primary.get_progress(user_id).await {
            Ok(Some(progress)) => {
                return Loaded {
                    progress,
                    source: LoadSource::Remote,
                };
            }
            Ok(None) => {
                let fresh = UserProgress::new(now);
                match self.primary.create_progress(user_id, &fresh).await {
                    Ok(()) => {
                        info!(user = %user_id, "created default progress record");
                        return Loaded {
                            progress: fresh,
                            source: LoadSource::Created,
                        };
                    }
                    Err(err) => TierError::RemoteUnavailable(err),
                }
            }
            Err(err) => TierError::RemoteUnavailable(err),
        };

        warn!(user = %user_id, error = %err, "reading progress from local cache");
        self.load_cached(user_id, now).await
    }

    async fn load_cached(&self, user_id: &UserId, now: DateTime<Utc>) -> Loaded {
        let fallback = || Loaded {
            progress: UserProgress::new(now),
            source: LoadSource::Default,
        };

        let blob = match self.secondary.get_item(&cache_key(user_id)).await {
            Ok(Some(blob)) => blob,
            Ok(None) => {
                debug!(user = %user_id, "no cached progress; using defaults");
                return fallback();
            }
            Err(err) => {
                let err = TierError::CacheUnavailable(err);
                warn!(user = %user_id, error = %err, "using unpersisted default progress");
                return fallback();
            }
        };

        match progress_from_json(&blob) {
            Ok(progress) => Loaded {
                progress,
                source: LoadSource::Cache,
            },
            Err(err) => {
                warn!(user = %user_id, error = %err, "cached progress is unreadable; using defaults");
                fallback()
            }
        }
    }

    /// Write `progress` to both tiers. Last write wins.
    pub async fn store(&self, user_id: &UserId, progress: &UserProgress) -> PersistOutcome {
        let remote = match self.primary.update_progress(user_id, progress).await {
            Err(StorageError::NotFound) => self.primary.create_progress(user_id, progress).await,
            other => other,
        };
        let remote_ok = match remote {
            Ok(()) => true,
            Err(err) => {
                let err = TierError::RemoteUnavailable(err);
                warn!(user = %user_id, error = %err, "progress saved locally only");
                false
            }
        };

        let cache = match progress_to_json(progress) {
            Ok(blob) => self.secondary.set_item(&cache_key(user_id), &blob).await,
            Err(err) => Err(err),
        };
        let cache_ok = match cache {
            Ok(()) => true,
            Err(err) => {
                let err = TierError::CacheUnavailable(err);
                warn!(user = %user_id, error = %err, "progress cache write failed");
                false
            }
        };

        let outcome = PersistOutcome::from_tiers(remote_ok, cache_ok);
        debug!(user = %user_id, ?outcome, "stored progress");
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryCache, InMemoryRepository};
    use lingo_core::model::LessonId;
    use lingo_core::time::{fixed_now, utc_offset};

    fn user() -> UserId {
        UserId::new("learner-1").unwrap()
    }

    fn store() -> (TieredProgressStore, InMemoryRepository, InMemoryCache) {
        let repo = InMemoryRepository::new();
        let cache = InMemoryCache::new();
        let store = TieredProgressStore::new(Arc::new(repo.clone()), Arc::new(cache.clone()));
        (store, repo, cache)
    }

    fn with_lesson(progress: &UserProgress, id: &str) -> UserProgress {
        progress
            .completing_lesson(&LessonId::new(id).unwrap(), fixed_now(), utc_offset())
            .unwrap()
            .progress
    }

    #[test]
    fn cache_key_uses_progress_prefix() {
        assert_eq!(cache_key(&user()), "progress_learner-1");
    }

    #[tokio::test]
    async fn first_load_creates_remote_default() {
        let (store, repo, _) = store();
        let loaded = store.load(&user(), fixed_now()).await;
        assert_eq!(loaded.source, LoadSource::Created);
        assert_eq!(loaded.progress, UserProgress::new(fixed_now()));
        assert!(repo.get_progress(&user()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn second_load_reads_remote() {
        let (store, _, _) = store();
        store.load(&user(), fixed_now()).await;
        let loaded = store.load(&user(), fixed_now()).await;
        assert_eq!(loaded.source, LoadSource::Remote);
    }

    #[tokio::test]
    async fn remote_outage_falls_back_to_cache() {
        let (store, repo, _) = store();
        let progress = with_lesson(&UserProgress::new(fixed_now()), "1");
        assert_eq!(store.store(&user(), &progress).await, PersistOutcome::Synced);

        repo.set_offline(true);
        let loaded = store.load(&user(), fixed_now()).await;
        assert_eq!(loaded.source, LoadSource::Cache);
        assert_eq!(loaded.progress, progress);
    }

    #[tokio::test]
    async fn both_tiers_down_yields_default() {
        let (store, repo, cache) = store();
        repo.set_offline(true);
        cache.set_offline(true);
        let loaded = store.load(&user(), fixed_now()).await;
        assert_eq!(loaded.source, LoadSource::Default);
        assert!(loaded.progress.completed_lessons().is_empty());
    }

    #[tokio::test]
    async fn unreadable_cache_blob_yields_default() {
        let (store, repo, cache) = store();
        cache.set_item(&cache_key(&user()), "{oops").await.unwrap();
        repo.set_offline(true);
        let loaded = store.load(&user(), fixed_now()).await;
        assert_eq!(loaded.source, LoadSource::Default);
    }

    #[tokio::test]
    async fn store_without_remote_is_cached_only() {
        let (store, repo, cache) = store();
        repo.set_offline(true);
        let progress = UserProgress::new(fixed_now());
        let outcome = store.store(&user(), &progress).await;
        assert_eq!(outcome, PersistOutcome::CachedOnly);
        assert!(outcome.is_persisted());
        let blob = cache.get_item(&cache_key(&user())).await.unwrap().unwrap();
        assert_eq!(progress_from_json(&blob).unwrap(), progress);
    }

    #[tokio::test]
    async fn store_creates_missing_remote_record() {
        let (store, repo, _) = store();
        let progress = UserProgress::new(fixed_now());
        assert_eq!(store.store(&user(), &progress).await, PersistOutcome::Synced);
        assert_eq!(repo.get_progress(&user()).await.unwrap(), Some(progress));
    }

    #[tokio::test]
    async fn store_with_both_tiers_down_is_not_persisted() {
        let (store, repo, cache) = store();
        repo.set_offline(true);
        cache.set_offline(true);
        let outcome = store.store(&user(), &UserProgress::new(fixed_now())).await;
        assert_eq!(outcome, PersistOutcome::NotPersisted);
        assert!(!outcome.is_persisted());
    }

    #[tokio::test]
    async fn store_with_cache_down_is_remote_only() {
        let (store, _, cache) = store();
        cache.set_offline(true);
        let outcome = store.store(&user(), &UserProgress::new(fixed_now())).await;
        assert_eq!(outcome, PersistOutcome::RemoteOnly);
    }
}
