use async_trait::async_trait;
use lingo_core::model::{UserId, UserProgress};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::catalog::{ContentCatalog, InMemoryCatalog};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Encode progress as the JSON document stored remotely and in the cache.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if encoding fails.
pub fn progress_to_json(progress: &UserProgress) -> Result<String, StorageError> {
    serde_json::to_string(progress).map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Decode a progress JSON document.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if the blob is not a progress document.
pub fn progress_from_json(raw: &str) -> Result<UserProgress, StorageError> {
    serde_json::from_str(raw).map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Remote document store holding one progress record per user.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Fetch the progress document for a user.
    ///
    /// Returns `Ok(None)` when the user has no record yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be reached or the record is unreadable.
    async fn get_progress(&self, user_id: &UserId) -> Result<Option<UserProgress>, StorageError>;

    /// Create the first progress document for a user.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if a record already exists.
    async fn create_progress(
        &self,
        user_id: &UserId,
        progress: &UserProgress,
    ) -> Result<(), StorageError>;

    /// Replace an existing progress document.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the user has no record.
    async fn update_progress(
        &self,
        user_id: &UserId,
        progress: &UserProgress,
    ) -> Result<(), StorageError>;
}

/// Local string blob cache keyed by arbitrary strings.
#[async_trait]
pub trait KeyValueCache: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the cache cannot be read.
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the cache cannot be written.
    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

fn offline_error() -> StorageError {
    StorageError::Connection("offline".into())
}

/// Simple in-memory document store for testing and prototyping.
///
/// `set_offline(true)` makes every call fail with a connection error.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    documents: Arc<Mutex<HashMap<UserId, UserProgress>>>,
    offline: Arc<AtomicBool>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), StorageError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(offline_error());
        }
        Ok(())
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn get_progress(&self, user_id: &UserId) -> Result<Option<UserProgress>, StorageError> {
        self.check_online()?;
        let guard = self
            .documents
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(user_id).cloned())
    }

    async fn create_progress(
        &self,
        user_id: &UserId,
        progress: &UserProgress,
    ) -> Result<(), StorageError> {
        self.check_online()?;
        let mut guard = self
            .documents
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        if guard.contains_key(user_id) {
            return Err(StorageError::Conflict);
        }
        guard.insert(user_id.clone(), progress.clone());
        Ok(())
    }

    async fn update_progress(
        &self,
        user_id: &UserId,
        progress: &UserProgress,
    ) -> Result<(), StorageError> {
        self.check_online()?;
        let mut guard = self
            .documents
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let slot = guard.get_mut(user_id).ok_or(StorageError::NotFound)?;
        *slot = progress.clone();
        Ok(())
    }
}

/// In-memory stand-in for the device-local cache.
#[derive(Clone, Default)]
pub struct InMemoryCache {
    entries: Arc<Mutex<HashMap<String, String>>>,
    offline: Arc<AtomicBool>,
}

impl InMemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }
}

#[async_trait]
impl KeyValueCache for InMemoryCache {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(offline_error());
        }
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(offline_error());
        }
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Aggregates the persistence collaborators behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
    pub cache: Arc<dyn KeyValueCache>,
    pub catalog: Arc<dyn ContentCatalog>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let progress: Arc<dyn ProgressRepository> = Arc::new(InMemoryRepository::new());
        let cache: Arc<dyn KeyValueCache> = Arc::new(InMemoryCache::new());
        let catalog: Arc<dyn ContentCatalog> = Arc::new(InMemoryCatalog::new());
        Self {
            progress,
            cache,
            catalog,
        }
    }

    /// Replace the content catalog.
    #[must_use]
    pub fn with_catalog(mut self, catalog: Arc<dyn ContentCatalog>) -> Self {
        self.catalog = catalog;
        self
    }
}
