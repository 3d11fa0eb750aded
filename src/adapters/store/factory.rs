//! Store factory
//!
//! Builds the configured durable and local stores.

use super::file::FileLocalStore;
use super::traits::{DurableStore, LocalStore};
use crate::adapters::postgresql::{PostgreSQLAdapter, PostgreSQLClient};
use crate::config::schema::TourmarkConfig;
use crate::domain::{Result, TourmarkError};
use std::sync::Arc;

/// Create the durable bookmark store
///
/// # Errors
///
/// Returns [`TourmarkError::Configuration`] if no `[postgresql]` section is
/// configured, or an error if the pool cannot be built.
pub async fn create_durable_store(
    config: &TourmarkConfig,
) -> Result<Arc<dyn DurableStore + Send + Sync>> {
    let pg_config = config.postgresql.as_ref().ok_or_else(|| {
        TourmarkError::Configuration(
            "Identified bookmark operations require a [postgresql] section".to_string(),
        )
    })?;

    tracing::info!("Creating PostgreSQL bookmark store");
    let client = PostgreSQLClient::new(pg_config.clone())?;
    client.test_connection().await?;
    client.ensure_schema().await?;

    Ok(Arc::new(PostgreSQLAdapter::new(client)) as Arc<dyn DurableStore + Send + Sync>)
}

/// Create the ephemeral local store
pub fn create_local_store(config: &TourmarkConfig) -> Arc<dyn LocalStore + Send + Sync> {
    tracing::debug!(path = %config.local_store.path, "Using file-backed local store");
    Arc::new(FileLocalStore::new(&config.local_store.path))
}
