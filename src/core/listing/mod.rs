//! Listing sort and pagination
//!
//! Pure functions over normalized records: ordering by [`SortKey`] and page
//! arithmetic driven by the registry's `total_count`.

pub mod pagination;
pub mod sort;

pub use pagination::{clamp_page, slice_page, total_pages, validate_page, PageInfo};
pub use sort::{collation_key, parse_modified_time, sort_records, SortKey};
