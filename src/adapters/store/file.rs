//! JSON-file backed local store
//!
//! All namespaces live in one JSON object (`{"namespace": ["id", ...]}`).
//! Writes go to a sibling temp file that is renamed over the original.

use super::traits::{LocalStore, StoreResult};
use crate::domain::StoreError;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

type Lists = BTreeMap<String, Vec<String>>;

/// [`LocalStore`] persisted to a single JSON file
#[derive(Debug)]
pub struct FileLocalStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileLocalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> StoreResult<Lists> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) if contents.trim().is_empty() => Ok(Lists::new()),
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
                StoreError::Backend(format!(
                    "Corrupt local store {}: {}",
                    self.path.display(),
                    e
                ))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Lists::new()),
            Err(e) => Err(StoreError::Backend(format!(
                "Failed to read local store {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    async fn write_all(&self, lists: &Lists) -> StoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StoreError::Backend(format!(
                    "Failed to create local store directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let contents = serde_json::to_string_pretty(lists)
            .map_err(|e| StoreError::Backend(format!("Failed to encode local store: {e}")))?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, contents).await.map_err(|e| {
            StoreError::Backend(format!("Failed to write {}: {}", tmp.display(), e))
        })?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            StoreError::Backend(format!(
                "Failed to replace local store {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}

#[async_trait]
impl LocalStore for FileLocalStore {
    async fn get_list(&self, namespace: &str) -> StoreResult<Vec<String>> {
        let mut lists = self.read_all().await?;
        Ok(lists.remove(namespace).unwrap_or_default())
    }

    async fn set_list(&self, namespace: &str, values: &[String]) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut lists = self.read_all().await?;
        if values.is_empty() {
            lists.remove(namespace);
        } else {
            lists.insert(namespace.to_string(), values.to_vec());
        }
        self.write_all(&lists).await?;

        tracing::debug!(
            path = %self.path.display(),
            namespace = namespace,
            entries = values.len(),
            "Local store updated"
        );
        Ok(())
    }
}
