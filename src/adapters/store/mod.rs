//! Bookmark storage layer
//!
//! Trait-based ports for the durable and ephemeral bookmark stores, with
//! in-memory and file implementations. The PostgreSQL implementation lives in
//! [`crate::adapters::postgresql`].

pub mod factory;
pub mod file;
pub mod memory;
pub mod traits;

pub use factory::{create_durable_store, create_local_store};
pub use file::FileLocalStore;
pub use memory::{MemoryDurableStore, MemoryLocalStore};
pub use traits::{DurableStore, LocalStore, StoreResult, StoredBookmark};
