//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod bookmarks;
pub mod init;
pub mod places;
pub mod validate;
