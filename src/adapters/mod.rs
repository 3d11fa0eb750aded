//! External system integrations for Tourmark.
//!
//! - [`registry`] - Tourism registry HTTP client and record normalization
//! - [`store`] - Bookmark storage ports with in-memory and file implementations
//! - [`postgresql`] - PostgreSQL durable bookmark store
//!
//! # Registry Client
//!
//! ```rust,no_run
//! use tourmark::adapters::registry::RegistryClient;
//! use tourmark::config::RegistryConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RegistryConfig {
//!     service_key_env: Some("TOURMARK_SERVICE_KEY".to_string()),
//!     ..RegistryConfig::default()
//! };
//!
//! let client = RegistryClient::new(config)?;
//! let page = client.list_by_area_and_category(Some("1"), Some("12"), 21, 1).await?;
//! println!("{} of {} records", page.records.len(), page.total_count);
//! # Ok(())
//! # }
//! ```

pub mod postgresql;
pub mod registry;
pub mod store;
