use std::sync::Arc;
use std::time::Duration;

use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use thiserror::Error;

use crate::catalog::{ContentCatalog, InMemoryCatalog};
use crate::repository::{KeyValueCache, ProgressRepository, Storage};

mod cache_repo;
mod mapping;
mod migrate;
mod progress_repo;

#[derive(Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SqliteInitError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl SqliteRepository {
    /// Connect to `SQLite` using the given URL.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the connection cannot be established or if
    /// the connection pragmas fail during setup.
    pub async fn connect(database_url: &str) -> Result<Self, SqliteInitError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(5))
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    sqlx::query("PRAGMA journal_mode = WAL;")
                        .execute(&mut *conn)
                        .await?;
                    sqlx::query("PRAGMA busy_timeout = 5000;")
                        .execute(&mut *conn)
                        .await?;
                    Ok(())
                })
            })
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    /// Create tables if they do not exist.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if migration queries fail.
    pub async fn migrate(&self) -> Result<(), SqliteInitError> {
        migrate::run_migrations(&self.pool).await
    }
}

impl Storage {
    /// Build a `Storage` whose progress documents live in `remote_url` and
    /// whose cache lives in `cache_url`. Equal URLs share one pool.
    ///
    /// The catalog starts empty; attach one with `Storage::with_catalog`.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if connection or migrations cannot be
    /// completed.
    pub async fn sqlite(remote_url: &str, cache_url: &str) -> Result<Self, SqliteInitError> {
        let remote = SqliteRepository::connect(remote_url).await?;
        remote.migrate().await?;
        let local = if cache_url == remote_url {
            remote.clone()
        } else {
            let local = SqliteRepository::connect(cache_url).await?;
            local.migrate().await?;
            local
        };

        let progress: Arc<dyn ProgressRepository> = Arc::new(remote);
        let cache: Arc<dyn KeyValueCache> = Arc::new(local);
        let catalog: Arc<dyn ContentCatalog> = Arc::new(InMemoryCatalog::new());
        Ok(Self {
            progress,
            cache,
            catalog,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SqliteRepository>();
    }
}
