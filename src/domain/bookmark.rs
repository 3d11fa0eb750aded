//! Bookmark and identity types

use super::ids::{PoiId, SubjectId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The identity signal supplied by the external identity provider
///
/// Passed explicitly into every bookmark operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Identity {
    /// No identity established for this session
    Anonymous,
    /// Authenticated with the given subject id
    Established(SubjectId),
}

impl Identity {
    /// Builds an identity from an optional subject string
    ///
    /// A missing or blank subject means anonymous.
    pub fn from_subject(subject: Option<&str>) -> Self {
        match subject.and_then(|s| SubjectId::new(s).ok()) {
            Some(subject) => Identity::Established(subject),
            None => Identity::Anonymous,
        }
    }

    /// The subject, if established
    pub fn subject(&self) -> Option<&SubjectId> {
        match self {
            Identity::Established(subject) => Some(subject),
            Identity::Anonymous => None,
        }
    }

    pub fn is_established(&self) -> bool {
        matches!(self, Identity::Established(_))
    }
}

/// A bookmarked point of interest
///
/// `created_at` is assigned by the durable store on insert and is `None` for
/// bookmarks held only in the ephemeral local store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub subject: Option<SubjectId>,
    pub poi_id: PoiId,
    pub created_at: Option<DateTime<Utc>>,
}

impl Bookmark {
    /// A bookmark held in the ephemeral store
    pub fn anonymous(poi_id: PoiId) -> Self {
        Self {
            subject: None,
            poi_id,
            created_at: None,
        }
    }

    /// A bookmark row read from the durable store
    pub fn durable(subject: SubjectId, poi_id: PoiId, created_at: DateTime<Utc>) -> Self {
        Self {
            subject: Some(subject),
            poi_id,
            created_at: Some(created_at),
        }
    }
}

/// Outcome of a toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleOutcome {
    pub bookmarked: bool,
}
