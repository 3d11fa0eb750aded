//! Bookmark reconciliation engine
//!
//! [`BookmarkSession`] keeps the anonymous local set and the durable store in
//! step for one caller session. [`resolve_bookmarks`] turns bookmark ids into
//! display records through a [`crate::adapters::registry::PlaceDirectory`].

pub mod merge;
pub mod resolve;
pub mod session;

pub use merge::{merge_anonymous, MergeReport};
pub use resolve::{resolve_bookmarks, BookmarkedPlace};
pub use session::{BookmarkSession, SessionState};
