use lingo_core::model::UserProgress;
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::{StorageError, progress_from_json};

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

pub(crate) fn map_progress_row(row: &SqliteRow) -> Result<UserProgress, StorageError> {
    let raw: String = row.try_get("progress").map_err(ser)?;
    progress_from_json(&raw)
}

pub(crate) fn map_cache_row(row: &SqliteRow) -> Result<String, StorageError> {
    row.try_get("value").map_err(ser)
}
