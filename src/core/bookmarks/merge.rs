//! One-shot merge of anonymous bookmarks into the durable store
//!
//! Every anonymous id is toggle-added for the resolved user. A uniqueness
//! violation means the row is already there and counts as success. What
//! happens to the local set afterwards depends on the [`MergePolicy`].

use crate::adapters::store::{DurableStore, LocalStore};
use crate::config::MergePolicy;
use crate::domain::{PoiId, Result, UserId};
use serde::Serialize;

/// Result of a merge pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    /// Ids newly written to the durable store
    pub merged: usize,
    /// Ids the durable store already held
    pub already_present: usize,
    /// Ids whose insert failed
    pub failed: Vec<PoiId>,
}

impl MergeReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_merged(&mut self) {
        self.merged += 1;
    }

    pub fn add_already_present(&mut self) {
        self.already_present += 1;
    }

    pub fn add_failure(&mut self, poi_id: PoiId) {
        self.failed.push(poi_id);
    }

    /// Number of ids that reached the durable store
    pub fn succeeded(&self) -> usize {
        self.merged + self.already_present
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Moves the anonymous set under `namespace` into `user`'s durable bookmarks
///
/// Stored entries that are not valid ids are dropped. With
/// [`MergePolicy::Lossy`] the local set is cleared unconditionally; with
/// [`MergePolicy::Strict`] the failed ids are written back.
///
/// # Errors
///
/// Only local store failures abort the merge. Durable insert failures are
/// recorded in the report.
pub async fn merge_anonymous(
    durable: &dyn DurableStore,
    local: &dyn LocalStore,
    namespace: &str,
    user: UserId,
    policy: MergePolicy,
) -> Result<MergeReport> {
    let stored = local.get_list(namespace).await?;
    let mut report = MergeReport::new();

    for raw in stored {
        let poi_id = match PoiId::new(raw) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(namespace = namespace, error = %e, "Dropping invalid local bookmark");
                continue;
            }
        };

        match durable.insert_bookmark(user, &poi_id).await {
            Ok(_) => report.add_merged(),
            Err(e) if e.is_unique_violation() => report.add_already_present(),
            Err(e) => {
                tracing::warn!(
                    user_id = %user,
                    poi_id = %poi_id,
                    error = %e,
                    "Failed to merge bookmark"
                );
                report.add_failure(poi_id);
            }
        }
    }

    let remaining: Vec<String> = match policy {
        MergePolicy::Lossy => Vec::new(),
        MergePolicy::Strict => report.failed.iter().map(|id| id.to_string()).collect(),
    };
    local.set_list(namespace, &remaining).await?;

    Ok(report)
}
