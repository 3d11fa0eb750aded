//! PostgreSQL adapter implementing the durable bookmark store
//!
//! Uniqueness of `(user_id, point_of_interest_id)` is left to the table
//! constraint; SQLSTATE 23505 surfaces as [`StoreError::UniqueViolation`].

use super::client::PostgreSQLClient;
use super::models::{bookmark_from_row, map_pg_error, map_pool_error, BOOKMARK_COLUMNS};
use crate::adapters::store::{DurableStore, StoreResult, StoredBookmark};
use crate::domain::{PoiId, StoreError, SubjectId, UserId};
use async_trait::async_trait;
use std::sync::Arc;

/// PostgreSQL implementation of [`DurableStore`]
pub struct PostgreSQLAdapter {
    client: Arc<PostgreSQLClient>,
}

impl PostgreSQLAdapter {
    /// Create a new PostgreSQL adapter
    pub fn new(client: PostgreSQLClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    async fn connection(&self) -> StoreResult<deadpool_postgres::Object> {
        self.client.pool().get().await.map_err(map_pool_error)
    }
}

#[async_trait]
impl DurableStore for PostgreSQLAdapter {
    async fn resolve_user(&self, subject: &SubjectId) -> StoreResult<Option<UserId>> {
        let conn = self.connection().await?;
        let row = conn
            .query_opt(
                "SELECT id FROM users WHERE external_subject_id = $1",
                &[&subject.as_str()],
            )
            .await
            .map_err(|e| map_pg_error("resolve user", e))?;

        row.map(|row| {
            row.try_get::<_, i64>(0)
                .map(UserId)
                .map_err(|e| StoreError::Backend(format!("Invalid users.id column: {e}")))
        })
        .transpose()
    }

    async fn find_bookmark(
        &self,
        user: UserId,
        poi_id: &PoiId,
    ) -> StoreResult<Option<StoredBookmark>> {
        let conn = self.connection().await?;
        let query = format!(
            "SELECT {BOOKMARK_COLUMNS} FROM bookmarks \
             WHERE user_id = $1 AND point_of_interest_id = $2"
        );
        let row = conn
            .query_opt(query.as_str(), &[&user.0, &poi_id.as_str()])
            .await
            .map_err(|e| map_pg_error("find bookmark", e))?;

        row.as_ref().map(bookmark_from_row).transpose()
    }

    async fn insert_bookmark(&self, user: UserId, poi_id: &PoiId) -> StoreResult<StoredBookmark> {
        let conn = self.connection().await?;
        let query = format!(
            "INSERT INTO bookmarks (user_id, point_of_interest_id) VALUES ($1, $2) \
             RETURNING {BOOKMARK_COLUMNS}"
        );
        let row = conn
            .query_one(query.as_str(), &[&user.0, &poi_id.as_str()])
            .await
            .map_err(|e| map_pg_error("insert bookmark", e))?;

        tracing::debug!(user_id = %user, poi_id = %poi_id, "Bookmark row inserted");
        bookmark_from_row(&row)
    }

    async fn delete_bookmark(&self, user: UserId, poi_id: &PoiId) -> StoreResult<bool> {
        let conn = self.connection().await?;
        let deleted = conn
            .execute(
                "DELETE FROM bookmarks WHERE user_id = $1 AND point_of_interest_id = $2",
                &[&user.0, &poi_id.as_str()],
            )
            .await
            .map_err(|e| map_pg_error("delete bookmark", e))?;

        Ok(deleted > 0)
    }

    async fn delete_many(&self, user: UserId, poi_ids: &[PoiId]) -> StoreResult<u64> {
        if poi_ids.is_empty() {
            return Ok(0);
        }

        let ids: Vec<String> = poi_ids.iter().map(|id| id.as_str().to_string()).collect();
        let mut conn = self.connection().await?;
        let tx = conn
            .transaction()
            .await
            .map_err(|e| map_pg_error("begin batch delete", e))?;

        let deleted = tx
            .execute(
                "DELETE FROM bookmarks WHERE user_id = $1 AND point_of_interest_id = ANY($2)",
                &[&user.0, &ids],
            )
            .await
            .map_err(|e| map_pg_error("batch delete", e))?;

        tx.commit()
            .await
            .map_err(|e| map_pg_error("commit batch delete", e))?;

        tracing::debug!(
            user_id = %user,
            requested = ids.len(),
            deleted = deleted,
            "Bookmark batch deleted"
        );
        Ok(deleted)
    }

    async fn list_bookmarks(&self, user: UserId) -> StoreResult<Vec<StoredBookmark>> {
        let conn = self.connection().await?;
        let query = format!(
            "SELECT {BOOKMARK_COLUMNS} FROM bookmarks \
             WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        );
        let rows = conn
            .query(query.as_str(), &[&user.0])
            .await
            .map_err(|e| map_pg_error("list bookmarks", e))?;

        rows.iter().map(bookmark_from_row).collect()
    }
}
