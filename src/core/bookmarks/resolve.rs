//! Bookmark resolution into display records

use crate::adapters::registry::PlaceDirectory;
use crate::domain::{Bookmark, PointOfInterest, Result};
use futures::future::join_all;
use serde::Serialize;

/// A bookmark paired with its registry record
///
/// `place` is `None` when the registry no longer knows the id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookmarkedPlace {
    pub bookmark: Bookmark,
    pub place: Option<PointOfInterest>,
}

/// Looks up every bookmark concurrently, keeping bookmark order
///
/// # Errors
///
/// Fails with the first lookup error in bookmark order.
pub async fn resolve_bookmarks(
    bookmarks: Vec<Bookmark>,
    directory: &dyn PlaceDirectory,
) -> Result<Vec<BookmarkedPlace>> {
    let lookups = bookmarks.iter().map(|b| directory.lookup(&b.poi_id));
    let places = join_all(lookups).await;

    let mut resolved = Vec::with_capacity(bookmarks.len());
    for (bookmark, place) in bookmarks.into_iter().zip(places) {
        let place = place?;
        if place.is_none() {
            tracing::debug!(poi_id = %bookmark.poi_id, "Bookmarked place not found in registry");
        }
        resolved.push(BookmarkedPlace { bookmark, place });
    }
    Ok(resolved)
}
