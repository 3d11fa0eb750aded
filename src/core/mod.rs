//! Core business logic for Tourmark.
//!
//! # Modules
//!
//! - [`listing`] - Sorting and pagination of normalized registry records
//! - [`bookmarks`] - Bookmark session state machine, merge and resolution
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tourmark::adapters::store::{MemoryDurableStore, MemoryLocalStore};
//! use tourmark::config::BookmarksConfig;
//! use tourmark::core::bookmarks::BookmarkSession;
//! use tourmark::domain::{Identity, PoiId};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let session = BookmarkSession::new(
//!     Arc::new(MemoryDurableStore::new()),
//!     Arc::new(MemoryLocalStore::new()),
//!     &BookmarksConfig::default(),
//! );
//!
//! let outcome = session.toggle(&Identity::Anonymous, &PoiId::new("126508")?).await?;
//! println!("Bookmarked: {}", outcome.bookmarked);
//! # Ok(())
//! # }
//! ```

pub mod bookmarks;
pub mod listing;
