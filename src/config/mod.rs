//! Configuration management for Tourmark.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! Tourmark uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `TOURMARK_*` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use tourmark::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("tourmark.toml")?;
//!
//! println!("Registry: {}", config.registry.base_url);
//! println!("Merge policy: {}", config.bookmarks.merge_policy);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Application settings (log level)
//! - [`RegistryConfig`] - Tourism registry endpoint, client identity, cache and retry
//! - [`BookmarksConfig`] - Merge policy and local namespace
//! - [`PostgreSQLConfig`] - Durable bookmark store
//! - [`LocalStoreConfig`] - Ephemeral bookmark file
//! - [`LoggingConfig`] - Logging configuration
//!
//! # Example Configuration
//!
//! ```toml
//! environment = "production"
//!
//! [application]
//! log_level = "info"
//!
//! [registry]
//! base_url = "https://apis.data.go.kr/B551011/KorService1"
//! mobile_app = "tourmark"
//! service_key_env = "TOURMARK_SERVICE_KEY"
//! cache_ttl_seconds = 3600
//!
//! [bookmarks]
//! merge_policy = "lossy"
//!
//! [postgresql]
//! connection_string = "${TOURMARK_PG_URL}"
//! ```
//!
//! # Credentials
//!
//! The registry service key is never required at load time. It is read from
//! the variable named by `service_key_env` on every registry call, falling back
//! to an inline `service_key`.

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, BookmarksConfig, Environment, LocalStoreConfig, LoggingConfig,
    MergePolicy, PostgreSQLConfig, RegistryConfig, RetryConfig, TourmarkConfig,
};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
