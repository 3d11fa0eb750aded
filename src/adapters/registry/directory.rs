//! Place lookup seam used by bookmark resolution

use crate::domain::{PoiId, PointOfInterest, Result};
use async_trait::async_trait;

/// Resolves a point-of-interest id into a display record
///
/// Implemented by [`super::RegistryClient`]; tests provide in-memory
/// directories.
#[async_trait]
pub trait PlaceDirectory: Send + Sync {
    /// Looks up a single record; `Ok(None)` if the registry has no such id
    async fn lookup(&self, id: &PoiId) -> Result<Option<PointOfInterest>>;
}
