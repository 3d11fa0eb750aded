//! Tourism registry adapter
//!
//! This module provides the registry HTTP client, the wire models it decodes,
//! the normalization into domain records, the response cache and the
//! credential providers.

pub mod cache;
pub mod client;
pub mod credential;
pub mod directory;
pub mod models;
pub mod normalize;

pub use cache::{CacheKey, ResponseCache};
pub use client::{endpoints, RegistryClient};
pub use credential::{ConfiguredCredential, CredentialSource, EnvCredential, StaticCredential};
pub use directory::PlaceDirectory;
pub use models::{Items, RawPlace, SUCCESS_CODE};
pub use normalize::{normalize, resolve_items};
