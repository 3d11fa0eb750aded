//! PostgreSQL durable bookmark store
//!
//! This module provides the pooled client, row mapping and the
//! [`crate::adapters::store::DurableStore`] implementation.

pub mod adapter;
pub mod client;
pub mod models;

pub use adapter::PostgreSQLAdapter;
pub use client::PostgreSQLClient;
