//! Domain identifier types with validation
//!
//! Newtype wrappers keep point-of-interest ids, identity-provider subjects and
//! durable user rows from being mixed up. Text ids reject blank input.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Point-of-interest identifier newtype wrapper
///
/// The registry's `contentid`: opaque, stable across calls, never empty.
///
/// # Examples
///
/// ```
/// use tourmark::domain::ids::PoiId;
/// use std::str::FromStr;
///
/// let id = PoiId::from_str("126508").unwrap();
/// assert_eq!(id.as_str(), "126508");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PoiId(String);

impl PoiId {
    /// Creates a new PoiId from a string
    ///
    /// Surrounding whitespace is trimmed; blank input is rejected.
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err("Point of interest ID cannot be empty".to_string());
        }
        if trimmed.len() == id.len() {
            Ok(Self(id))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    /// Returns the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PoiId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PoiId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for PoiId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PoiId> for String {
    fn from(id: PoiId) -> Self {
        id.0
    }
}

impl AsRef<str> for PoiId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Identity-provider subject newtype wrapper
///
/// The opaque subject id handed over by the external identity provider once a
/// session is authenticated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubjectId(String);

impl SubjectId {
    /// Creates a new SubjectId from a string
    pub fn new(subject: impl Into<String>) -> Result<Self, String> {
        let subject = subject.into();
        if subject.trim().is_empty() {
            return Err("Subject ID cannot be empty".to_string());
        }
        Ok(Self(subject))
    }

    /// Returns the subject as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SubjectId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Durable store user row id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
