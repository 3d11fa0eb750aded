//! Per-session bookmark state machine
//!
//! A session starts `Unauthenticated`, with the ephemeral local set as the
//! source of truth. The first call carrying an established identity runs the
//! merge (`Merging`) and then the durable store takes over (`Authenticated`).
//! An anonymous call while authenticated resets the session; nothing is
//! restored into the local set.

use super::merge::{merge_anonymous, MergeReport};
use crate::adapters::store::{DurableStore, LocalStore};
use crate::config::{BookmarksConfig, MergePolicy};
use crate::domain::{
    Bookmark, Identity, PoiId, Result, SubjectId, ToggleOutcome, TourmarkError, UserId,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Observable phase of a [`BookmarkSession`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    /// Held only while the merge runs
    Merging,
    Authenticated {
        subject: SubjectId,
        merge: MergeReport,
    },
}

/// Where an operation is served from once the session state is settled
enum Backing {
    Local,
    Durable { subject: SubjectId, user: UserId },
}

/// Bookmark operations for one caller session
///
/// Identity is passed into every call. Calls of one session that need a
/// state transition are serialized behind the session lock, so no
/// operation observes a half-finished merge.
pub struct BookmarkSession {
    durable: Arc<dyn DurableStore + Send + Sync>,
    local: Arc<dyn LocalStore + Send + Sync>,
    namespace: String,
    policy: MergePolicy,
    session_id: Uuid,
    state: Mutex<SessionState>,
}

impl BookmarkSession {
    /// Create a new session over the given stores
    pub fn new(
        durable: Arc<dyn DurableStore + Send + Sync>,
        local: Arc<dyn LocalStore + Send + Sync>,
        config: &BookmarksConfig,
    ) -> Self {
        let session_id = Uuid::new_v4();
        tracing::debug!(
            session_id = %session_id,
            namespace = %config.local_namespace,
            merge_policy = %config.merge_policy,
            "Bookmark session created"
        );

        Self {
            durable,
            local,
            namespace: config.local_namespace.clone(),
            policy: config.merge_policy,
            session_id,
            state: Mutex::new(SessionState::Unauthenticated),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Snapshot of the current state
    pub async fn state(&self) -> SessionState {
        self.state.lock().await.clone()
    }

    /// Whether `poi_id` is bookmarked for `identity`
    ///
    /// # Errors
    ///
    /// Returns [`TourmarkError::UnresolvedIdentity`] if an established
    /// identity has no durable user row.
    pub async fn is_bookmarked(&self, identity: &Identity, poi_id: &PoiId) -> Result<bool> {
        match self.enter(identity).await? {
            Backing::Local => Ok(self.local_ids().await?.contains(poi_id)),
            Backing::Durable { user, .. } => {
                Ok(self.durable.find_bookmark(user, poi_id).await?.is_some())
            }
        }
    }

    /// Flips the bookmark state of `poi_id`
    ///
    /// Adding a row that already exists reports `bookmarked: true`; removing
    /// a row that does not exist reports `bookmarked: false`.
    ///
    /// Two adds count as concurrent only when their existence checks overlap:
    /// both see no row, one insert wins and the other's uniqueness violation
    /// is reported as success. A toggle whose check runs after another add
    /// has committed sees the row and removes it.
    pub async fn toggle(&self, identity: &Identity, poi_id: &PoiId) -> Result<ToggleOutcome> {
        let bookmarked = match self.enter(identity).await? {
            Backing::Local => {
                let mut ids = self.local_ids().await?;
                let bookmarked = match ids.iter().position(|id| id == poi_id) {
                    Some(index) => {
                        ids.remove(index);
                        false
                    }
                    None => {
                        ids.push(poi_id.clone());
                        true
                    }
                };
                self.write_local(&ids).await?;
                bookmarked
            }
            Backing::Durable { user, .. } => {
                if self.durable.find_bookmark(user, poi_id).await?.is_some() {
                    self.durable.delete_bookmark(user, poi_id).await?;
                    false
                } else {
                    match self.durable.insert_bookmark(user, poi_id).await {
                        Ok(_) => true,
                        Err(e) if e.is_unique_violation() => {
                            tracing::debug!(
                                session_id = %self.session_id,
                                poi_id = %poi_id,
                                "Concurrent insert already stored the bookmark"
                            );
                            true
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
            }
        };

        tracing::debug!(
            session_id = %self.session_id,
            poi_id = %poi_id,
            bookmarked = bookmarked,
            "Bookmark toggled"
        );
        Ok(ToggleOutcome { bookmarked })
    }

    /// All bookmarks visible to `identity`
    ///
    /// Anonymous bookmarks come back in insertion order without a timestamp;
    /// durable bookmarks newest first.
    pub async fn list_mine(&self, identity: &Identity) -> Result<Vec<Bookmark>> {
        match self.enter(identity).await? {
            Backing::Local => Ok(self
                .local_ids()
                .await?
                .into_iter()
                .map(Bookmark::anonymous)
                .collect()),
            Backing::Durable { subject, user } => Ok(self
                .durable
                .list_bookmarks(user)
                .await?
                .into_iter()
                .map(|row| Bookmark::durable(subject.clone(), row.poi_id, row.created_at))
                .collect()),
        }
    }

    /// Removes every listed bookmark, returning how many existed
    ///
    /// # Errors
    ///
    /// A store failure aborts the whole batch; nothing was deleted.
    pub async fn delete_many(&self, identity: &Identity, poi_ids: &[PoiId]) -> Result<u64> {
        if poi_ids.is_empty() {
            return Ok(0);
        }

        let deleted = match self.enter(identity).await? {
            Backing::Local => {
                let mut ids = self.local_ids().await?;
                let before = ids.len();
                ids.retain(|id| !poi_ids.contains(id));
                let removed = before - ids.len();
                if removed > 0 {
                    self.write_local(&ids).await?;
                }
                removed as u64
            }
            Backing::Durable { user, .. } => {
                match self.durable.delete_many(user, poi_ids).await {
                    Ok(count) => count,
                    Err(e) => {
                        let error = TourmarkError::from(e);
                        crate::log_error_with_context!(&error, "Bookmark batch delete aborted");
                        return Err(error);
                    }
                }
            }
        };

        tracing::debug!(
            session_id = %self.session_id,
            requested = poi_ids.len(),
            deleted = deleted,
            "Bookmarks deleted"
        );
        Ok(deleted)
    }

    /// Settles the session state for `identity`
    ///
    /// Runs the merge on the first established identity. A merge that fails
    /// leaves the session unauthenticated and the local set untouched.
    async fn enter(&self, identity: &Identity) -> Result<Backing> {
        let mut state = self.state.lock().await;

        let subject = match identity {
            Identity::Anonymous => {
                if !matches!(*state, SessionState::Unauthenticated) {
                    tracing::info!(session_id = %self.session_id, "Identity cleared, session reset");
                    *state = SessionState::Unauthenticated;
                }
                return Ok(Backing::Local);
            }
            Identity::Established(subject) => subject,
        };

        let user = self.resolve_user(subject).await?;

        let current = matches!(
            &*state,
            SessionState::Authenticated { subject: active, .. } if active == subject
        );
        if !current {
            *state = SessionState::Merging;
            let merged = merge_anonymous(
                self.durable.as_ref(),
                self.local.as_ref(),
                &self.namespace,
                user,
                self.policy,
            )
            .await;

            match merged {
                Ok(report) => {
                    crate::log_merge_complete!(
                        self.session_id,
                        report.merged,
                        report.already_present,
                        report.failed.len()
                    );
                    *state = SessionState::Authenticated {
                        subject: subject.clone(),
                        merge: report,
                    };
                }
                Err(e) => {
                    *state = SessionState::Unauthenticated;
                    crate::log_error_with_context!(&e, "Bookmark merge aborted");
                    return Err(e);
                }
            }
        }

        Ok(Backing::Durable {
            subject: subject.clone(),
            user,
        })
    }

    async fn resolve_user(&self, subject: &SubjectId) -> Result<UserId> {
        match self.durable.resolve_user(subject).await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => Err(TourmarkError::UnresolvedIdentity(format!(
                "No user row for subject {subject}"
            ))),
            Err(e) => Err(TourmarkError::UnresolvedIdentity(format!(
                "Identity lookup for subject {subject} failed: {e}"
            ))),
        }
    }

    async fn local_ids(&self) -> Result<Vec<PoiId>> {
        Ok(self
            .local
            .get_list(&self.namespace)
            .await?
            .into_iter()
            .filter_map(|raw| PoiId::new(raw).ok())
            .collect())
    }

    async fn write_local(&self, ids: &[PoiId]) -> Result<()> {
        let values: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
        self.local.set_list(&self.namespace, &values).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::store::{MemoryDurableStore, MemoryLocalStore};
    use crate::domain::ErrorKind;

    fn poi(id: &str) -> PoiId {
        PoiId::new(id).unwrap()
    }

    fn signed_in(subject: &str) -> Identity {
        Identity::Established(SubjectId::new(subject).unwrap())
    }

    fn session(durable: Arc<MemoryDurableStore>, local: Arc<MemoryLocalStore>) -> BookmarkSession {
        BookmarkSession::new(durable, local, &BookmarksConfig::default())
    }

    #[tokio::test]
    async fn test_anonymous_toggle_flips() {
        let session = session(
            Arc::new(MemoryDurableStore::new()),
            Arc::new(MemoryLocalStore::new()),
        );
        let id = poi("126508");

        assert!(session.toggle(&Identity::Anonymous, &id).await.unwrap().bookmarked);
        assert!(session.is_bookmarked(&Identity::Anonymous, &id).await.unwrap());
        assert!(!session.toggle(&Identity::Anonymous, &id).await.unwrap().bookmarked);
        assert!(!session.is_bookmarked(&Identity::Anonymous, &id).await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_subject_is_unresolved() {
        let local = Arc::new(MemoryLocalStore::new());
        let session = session(Arc::new(MemoryDurableStore::new()), local.clone());
        session.toggle(&Identity::Anonymous, &poi("A")).await.unwrap();

        let err = session
            .is_bookmarked(&signed_in("ghost"), &poi("A"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnresolvedIdentity);
        assert_eq!(session.state().await, SessionState::Unauthenticated);
        assert_eq!(local.get_list("tourmark.bookmarks").await.unwrap(), vec!["A"]);
    }

    #[tokio::test]
    async fn test_first_identified_call_merges_once() {
        let durable = Arc::new(MemoryDurableStore::new());
        let subject = SubjectId::new("sub").unwrap();
        durable.register_user(&subject);
        let session = session(durable.clone(), Arc::new(MemoryLocalStore::new()));

        session.toggle(&Identity::Anonymous, &poi("A")).await.unwrap();
        let identity = Identity::Established(subject.clone());
        assert!(session.is_bookmarked(&identity, &poi("A")).await.unwrap());

        match session.state().await {
            SessionState::Authenticated { subject: active, merge } => {
                assert_eq!(active, subject);
                assert_eq!(merge.merged, 1);
            }
            other => panic!("unexpected state {other:?}"),
        }

        session.list_mine(&identity).await.unwrap();
        assert_eq!(durable.row_count(), 1);
    }

    #[tokio::test]
    async fn test_sign_out_does_not_restore() {
        let durable = Arc::new(MemoryDurableStore::new());
        durable.register_user(&SubjectId::new("sub").unwrap());
        let session = session(durable, Arc::new(MemoryLocalStore::new()));

        session.toggle(&signed_in("sub"), &poi("A")).await.unwrap();
        assert!(session.list_mine(&Identity::Anonymous).await.unwrap().is_empty());
        assert_eq!(session.state().await, SessionState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_anonymous_delete_many() {
        let session = session(
            Arc::new(MemoryDurableStore::new()),
            Arc::new(MemoryLocalStore::new()),
        );
        for id in ["x", "z"] {
            session.toggle(&Identity::Anonymous, &poi(id)).await.unwrap();
        }

        let deleted = session
            .delete_many(&Identity::Anonymous, &[poi("x"), poi("y"), poi("z")])
            .await
            .unwrap();
        assert_eq!(deleted, 2);
        assert!(session.list_mine(&Identity::Anonymous).await.unwrap().is_empty());
    }
}
