//! Page arithmetic and slicing
//!
//! `total_count` always comes from the registry's paging metadata. A single
//! page of records says nothing about the total.

use crate::domain::{Result, TourmarkError};
use serde::Serialize;

/// Number of pages needed for `total_count` records
///
/// Zero records (or a zero page size) means zero pages.
pub fn total_pages(total_count: u64, page_size: u32) -> u32 {
    if page_size == 0 || total_count == 0 {
        return 0;
    }
    let pages = total_count.div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Clamps a requested page into `[1, total_pages]`
///
/// With no pages at all the only servable page is 1.
pub fn clamp_page(page: u32, total_pages: u32) -> u32 {
    page.clamp(1, total_pages.max(1))
}

/// Rejects a page outside `[1, total_pages]`
///
/// # Errors
///
/// Returns [`TourmarkError::InvalidInput`] for page 0 or a page past the end.
pub fn validate_page(page: u32, total_pages: u32) -> Result<u32> {
    let last = total_pages.max(1);
    if page == 0 || page > last {
        return Err(TourmarkError::InvalidInput(format!(
            "Page {page} is out of range (1..={last})"
        )));
    }
    Ok(page)
}

/// The records of `page` within an in-memory list
///
/// Pages past the end yield an empty slice.
pub fn slice_page<T>(records: &[T], page: u32, page_size: u32) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let size = page_size as usize;
    let start = (page as usize - 1).saturating_mul(size);
    if start >= records.len() {
        return &[];
    }
    let end = start.saturating_add(size).min(records.len());
    &records[start..end]
}

/// Paging summary handed to renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: u32,
    pub page_size: u32,
    pub total_count: u64,
    pub total_pages: u32,
}

impl PageInfo {
    /// Builds the summary, clamping `requested` into range
    pub fn clamped(total_count: u64, page_size: u32, requested: u32) -> Self {
        let total_pages = total_pages(total_count, page_size);
        Self {
            page: clamp_page(requested, total_pages),
            page_size,
            total_count,
            total_pages,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;
    use test_case::test_case;

    #[test_case(45, 21, 3)]
    #[test_case(42, 21, 2)]
    #[test_case(1, 12, 1)]
    #[test_case(0, 12, 0)]
    #[test_case(10, 0, 0)]
    fn test_total_pages(total: u64, size: u32, expected: u32) {
        assert_eq!(total_pages(total, size), expected);
    }

    #[test]
    fn test_out_of_range_pages_are_clamped() {
        assert_eq!(clamp_page(0, 3), 1);
        assert_eq!(clamp_page(4, 3), 3);
        assert_eq!(clamp_page(2, 3), 2);
        assert_eq!(clamp_page(5, 0), 1);
    }

    #[test]
    fn test_out_of_range_pages_are_rejected() {
        assert_eq!(validate_page(0, 3).unwrap_err().kind(), ErrorKind::InvalidInput);
        assert_eq!(validate_page(4, 3).unwrap_err().kind(), ErrorKind::InvalidInput);
        assert_eq!(validate_page(3, 3).unwrap(), 3);
        assert_eq!(validate_page(1, 0).unwrap(), 1);
        assert!(validate_page(2, 0).is_err());
    }

    #[test]
    fn test_slice_page() {
        let records: Vec<u32> = (1..=45).collect();
        assert_eq!(slice_page(&records, 1, 21).len(), 21);
        assert_eq!(slice_page(&records, 3, 21), &[43, 44, 45]);
        assert!(slice_page(&records, 4, 21).is_empty());
        assert!(slice_page(&records, 0, 21).is_empty());
    }

    #[test]
    fn test_page_info() {
        let info = PageInfo::clamped(45, 21, 9);
        assert_eq!(info.page, 3);
        assert_eq!(info.total_pages, 3);
        assert!(info.has_previous());
        assert!(!info.has_next());

        let empty = PageInfo::clamped(0, 21, 1);
        assert_eq!(empty.page, 1);
        assert!(!empty.has_next());
    }
}
