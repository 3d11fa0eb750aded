//! Domain models and types for Tourmark.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`PoiId`], [`SubjectId`], [`UserId`])
//! - **Place models** ([`PointOfInterest`], [`PlacePage`], [`OperatingInfo`], [`PoiImage`])
//! - **Bookmark models** ([`Bookmark`], [`Identity`], [`ToggleOutcome`])
//! - **Error types** ([`TourmarkError`], [`ErrorKind`], [`StoreError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! Identifiers are newtypes so a subject id can never be passed where a point
//! of interest id is expected:
//!
//! ```rust
//! use tourmark::domain::{PoiId, SubjectId};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let poi = PoiId::new("126508")?;
//! let subject = SubjectId::new("google-oauth2|1093")?;
//! // let wrong: PoiId = subject;  // Compile error!
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, TourmarkError>`]; use
//! [`TourmarkError::kind`] to branch on the failure class.

pub mod bookmark;
pub mod errors;
pub mod ids;
pub mod place;
pub mod result;

// Re-export commonly used types for convenience
pub use bookmark::{Bookmark, Identity, ToggleOutcome};
pub use errors::{ErrorKind, StoreError, TourmarkError};
pub use ids::{PoiId, SubjectId, UserId};
pub use place::{
    convert_coordinates, Address, Coordinates, LngLat, OperatingInfo, PlacePage, PoiImage,
    PointOfInterest,
};
pub use result::Result;
