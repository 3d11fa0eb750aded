//! In-memory store implementations
//!
//! Used by tests and by embedders that do not need persistence. The durable
//! store mirrors the relational constraints: one row per `(user, poi_id)`,
//! rows listed newest first, batch deletes applied atomically.

use super::traits::{DurableStore, LocalStore, StoreResult, StoredBookmark};
use crate::domain::{PoiId, StoreError, SubjectId, UserId};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug)]
struct Row {
    id: u64,
    user: UserId,
    bookmark: StoredBookmark,
}

#[derive(Debug, Default)]
struct DurableState {
    users: HashMap<SubjectId, UserId>,
    rows: Vec<Row>,
    next_user_id: i64,
    next_row_id: u64,
}

/// In-memory [`DurableStore`]
#[derive(Debug, Default)]
pub struct MemoryDurableStore {
    state: Mutex<DurableState>,
}

impl MemoryDurableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the user row for `subject`, or returns the existing one
    pub fn register_user(&self, subject: &SubjectId) -> UserId {
        let mut state = self.lock();
        if let Some(user) = state.users.get(subject) {
            return *user;
        }
        state.next_user_id += 1;
        let user = UserId(state.next_user_id);
        state.users.insert(subject.clone(), user);
        user
    }

    /// Number of bookmark rows across all users
    pub fn row_count(&self) -> usize {
        self.lock().rows.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DurableState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl DurableStore for MemoryDurableStore {
    async fn resolve_user(&self, subject: &SubjectId) -> StoreResult<Option<UserId>> {
        Ok(self.lock().users.get(subject).copied())
    }

    async fn find_bookmark(
        &self,
        user: UserId,
        poi_id: &PoiId,
    ) -> StoreResult<Option<StoredBookmark>> {
        Ok(self
            .lock()
            .rows
            .iter()
            .find(|row| row.user == user && &row.bookmark.poi_id == poi_id)
            .map(|row| row.bookmark.clone()))
    }

    async fn insert_bookmark(&self, user: UserId, poi_id: &PoiId) -> StoreResult<StoredBookmark> {
        let mut state = self.lock();
        if state
            .rows
            .iter()
            .any(|row| row.user == user && &row.bookmark.poi_id == poi_id)
        {
            return Err(StoreError::UniqueViolation(format!(
                "bookmark ({user}, {poi_id}) already exists"
            )));
        }

        state.next_row_id += 1;
        let bookmark = StoredBookmark {
            poi_id: poi_id.clone(),
            created_at: Utc::now(),
        };
        let id = state.next_row_id;
        state.rows.push(Row {
            id,
            user,
            bookmark: bookmark.clone(),
        });
        Ok(bookmark)
    }

    async fn delete_bookmark(&self, user: UserId, poi_id: &PoiId) -> StoreResult<bool> {
        let mut state = self.lock();
        let before = state.rows.len();
        state
            .rows
            .retain(|row| !(row.user == user && &row.bookmark.poi_id == poi_id));
        Ok(state.rows.len() < before)
    }

    async fn delete_many(&self, user: UserId, poi_ids: &[PoiId]) -> StoreResult<u64> {
        let mut state = self.lock();
        let before = state.rows.len();
        state
            .rows
            .retain(|row| !(row.user == user && poi_ids.contains(&row.bookmark.poi_id)));
        Ok((before - state.rows.len()) as u64)
    }

    async fn list_bookmarks(&self, user: UserId) -> StoreResult<Vec<StoredBookmark>> {
        let state = self.lock();
        let mut rows: Vec<&Row> = state.rows.iter().filter(|row| row.user == user).collect();
        rows.sort_by(|a, b| {
            b.bookmark
                .created_at
                .cmp(&a.bookmark.created_at)
                .then(b.id.cmp(&a.id))
        });
        Ok(rows.into_iter().map(|row| row.bookmark.clone()).collect())
    }
}

/// In-memory [`LocalStore`]
#[derive(Debug, Default)]
pub struct MemoryLocalStore {
    lists: Mutex<HashMap<String, Vec<String>>>,
}

impl MemoryLocalStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LocalStore for MemoryLocalStore {
    async fn get_list(&self, namespace: &str) -> StoreResult<Vec<String>> {
        let lists = self.lists.lock().unwrap_or_else(|e| e.into_inner());
        Ok(lists.get(namespace).cloned().unwrap_or_default())
    }

    async fn set_list(&self, namespace: &str, values: &[String]) -> StoreResult<()> {
        let mut lists = self.lists.lock().unwrap_or_else(|e| e.into_inner());
        if values.is_empty() {
            lists.remove(namespace);
        } else {
            lists.insert(namespace.to_string(), values.to_vec());
        }
        Ok(())
    }
}
