//! Bookmark storage ports
//!
//! This module defines the two stores the bookmark engine works against: the
//! durable relational store for identified sessions and the ephemeral local
//! store for anonymous ones.

use crate::domain::{PoiId, StoreError, SubjectId, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Result type of the storage ports
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// A bookmark row as held by the durable store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBookmark {
    pub poi_id: PoiId,
    pub created_at: DateTime<Utc>,
}

/// Durable bookmark store
///
/// Uniqueness of `(user, poi_id)` is enforced by the store itself; a duplicate
/// insert must fail with [`StoreError::UniqueViolation`].
#[async_trait]
pub trait DurableStore: Send + Sync {
    /// Looks up the user row of an identity-provider subject
    ///
    /// `Ok(None)` means the subject has no user row.
    async fn resolve_user(&self, subject: &SubjectId) -> StoreResult<Option<UserId>>;

    /// Finds the bookmark of `user` for `poi_id`
    async fn find_bookmark(
        &self,
        user: UserId,
        poi_id: &PoiId,
    ) -> StoreResult<Option<StoredBookmark>>;

    /// Inserts a bookmark, stamping `created_at`
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UniqueViolation`] if the row already exists.
    async fn insert_bookmark(&self, user: UserId, poi_id: &PoiId) -> StoreResult<StoredBookmark>;

    /// Deletes a bookmark; `false` if there was none
    async fn delete_bookmark(&self, user: UserId, poi_id: &PoiId) -> StoreResult<bool>;

    /// Deletes several bookmarks as one all-or-nothing batch
    ///
    /// Ids without a row are skipped. Returns the number of rows deleted; on
    /// error nothing was deleted.
    async fn delete_many(&self, user: UserId, poi_ids: &[PoiId]) -> StoreResult<u64>;

    /// All bookmarks of `user`, most recent first
    async fn list_bookmarks(&self, user: UserId) -> StoreResult<Vec<StoredBookmark>>;
}

/// Ephemeral, namespaced string-list store
#[async_trait]
pub trait LocalStore: Send + Sync {
    /// Reads the list under `namespace`; empty if never written
    async fn get_list(&self, namespace: &str) -> StoreResult<Vec<String>>;

    /// Replaces the list under `namespace`; an empty list removes it
    async fn set_list(&self, namespace: &str, values: &[String]) -> StoreResult<()>;
}
