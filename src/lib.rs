// Tourmark - Tourism Registry Browser with Bookmark Sync
// Copyright (c) 2025 Tourmark Contributors
// Licensed under the MIT License

//! # Tourmark - Tourism Registry Client and Bookmark Sync
//!
//! Tourmark talks to a public tourism registry, turns its loosely shaped
//! responses into strongly typed points of interest, and keeps a user's
//! bookmarks consistent between an anonymous device-local store and a durable
//! PostgreSQL store.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Fetching** area listings, keyword searches, details, operating info and
//!   images from the registry, with a TTL response cache and bounded retry
//! - **Normalizing** the registry's single-or-array item payloads and
//!   fixed-point coordinates into [`domain::PointOfInterest`] records
//! - **Reconciling** bookmarks across sign-in with a one-shot merge
//! - **Sorting and paging** listings deterministically
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (listing sort and pagination, bookmark sessions)
//! - [`adapters`] - External integrations (registry, PostgreSQL, local store)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tourmark::adapters::registry::RegistryClient;
//! use tourmark::config::load_config;
//! use tourmark::core::listing::{sort_records, SortKey};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("tourmark.toml")?;
//!     let client = RegistryClient::new(config.registry)?;
//!
//!     let page = client.search_by_keyword("palace", None, Some("12"), 21, 1).await?;
//!     for place in sort_records(page.records, &SortKey::Name) {
//!         println!("{} {}", place.id, place.title);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Bookmarks
//!
//! Identity is an explicit argument of every bookmark operation. The first
//! call with an established identity merges the anonymous bookmarks into the
//! durable store:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tourmark::adapters::store::{MemoryDurableStore, MemoryLocalStore};
//! use tourmark::config::BookmarksConfig;
//! use tourmark::core::bookmarks::BookmarkSession;
//! use tourmark::domain::{Identity, PoiId, SubjectId};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let durable = Arc::new(MemoryDurableStore::new());
//! let subject = SubjectId::new("kakao|1093")?;
//! durable.register_user(&subject);
//!
//! let session = BookmarkSession::new(
//!     durable,
//!     Arc::new(MemoryLocalStore::new()),
//!     &BookmarksConfig::default(),
//! );
//! let id = PoiId::new("126508")?;
//! session.toggle(&Identity::Anonymous, &id).await?;
//!
//! // Merges the anonymous bookmark, then answers from the durable store
//! assert!(session.is_bookmarked(&Identity::Established(subject), &id).await?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Every fallible operation returns [`domain::TourmarkError`], whose
//! [`kind`](domain::TourmarkError::kind) classifies the failure:
//!
//! ```rust
//! use tourmark::domain::{ErrorKind, TourmarkError};
//!
//! let err = TourmarkError::InvalidInput("keyword".to_string());
//! assert_eq!(err.kind(), ErrorKind::InvalidInput);
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
