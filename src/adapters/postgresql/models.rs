//! PostgreSQL row mapping
//!
//! Maps `bookmarks` rows and driver errors onto the storage port types.

use crate::adapters::store::StoredBookmark;
use crate::domain::{PoiId, StoreError};
use chrono::{DateTime, Utc};
use tokio_postgres::error::SqlState;
use tokio_postgres::Row;

/// Columns selected for a bookmark row, in order
pub const BOOKMARK_COLUMNS: &str = "point_of_interest_id, created_at";

/// Decodes a row selected with [`BOOKMARK_COLUMNS`]
pub fn bookmark_from_row(row: &Row) -> Result<StoredBookmark, StoreError> {
    let poi_id: String = row
        .try_get(0)
        .map_err(|e| StoreError::Backend(format!("Invalid point_of_interest_id column: {e}")))?;
    let created_at: DateTime<Utc> = row
        .try_get(1)
        .map_err(|e| StoreError::Backend(format!("Invalid created_at column: {e}")))?;

    Ok(StoredBookmark {
        poi_id: PoiId::new(poi_id).map_err(StoreError::Backend)?,
        created_at,
    })
}

/// Maps a driver error, keeping the uniqueness signal distinguishable
pub fn map_pg_error(context: &str, err: tokio_postgres::Error) -> StoreError {
    if err.code() == Some(&SqlState::UNIQUE_VIOLATION) {
        let detail = err
            .as_db_error()
            .and_then(|db| db.constraint().map(str::to_string))
            .unwrap_or_else(|| "unique constraint".to_string());
        return StoreError::UniqueViolation(format!("{context}: {detail}"));
    }
    StoreError::Backend(format!("{context}: {err}"))
}

/// Maps a pool checkout failure
pub fn map_pool_error(err: deadpool_postgres::PoolError) -> StoreError {
    StoreError::Backend(format!("Failed to get connection from pool: {err}"))
}
