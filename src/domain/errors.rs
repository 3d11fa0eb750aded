//! Domain error types
//!
//! This module defines the error hierarchy for Tourmark. Every error carries a
//! machine-readable [`ErrorKind`] plus a message (and a status or registry code
//! where one exists), so callers can build user-facing messaging without
//! inspecting third-party error types.

use std::fmt;
use thiserror::Error;

/// Main Tourmark error type
///
/// This is the primary error type used throughout the library. Storage ports
/// report [`StoreError`], which is converted at the engine boundary.
#[derive(Debug, Error)]
pub enum TourmarkError {
    /// Configuration-related errors, including a missing registry credential
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The registry answered with a non-success HTTP status
    #[error("Transport error: HTTP {status} - {message}")]
    Transport { status: u16, message: String },

    /// The registry could not be reached at all (connect failure, timeout)
    #[error("Connection error: {0}")]
    Connection(String),

    /// The registry envelope reported a failure result code
    #[error("Registry error [{code}]: {message}")]
    Domain { code: String, message: String },

    /// A required parameter was empty or blank
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An identity token is present but has no durable user row
    #[error("Unresolved identity: {0}")]
    UnresolvedIdentity(String),

    /// A uniqueness violation reported by the durable store
    #[error("Store conflict: {0}")]
    StoreConflict(String),

    /// Any other durable or local store failure
    #[error("Store error: {0}")]
    Store(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Anything else, wrapped with the original message
    #[error("{0}")]
    Failure(String),
}

/// Coarse classification of a [`TourmarkError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    Transport,
    Connection,
    Domain,
    InvalidInput,
    UnresolvedIdentity,
    StoreConflict,
    Store,
    Serialization,
    Io,
    Failure,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::Transport => "transport",
            ErrorKind::Connection => "connection",
            ErrorKind::Domain => "domain",
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::UnresolvedIdentity => "unresolved_identity",
            ErrorKind::StoreConflict => "store_conflict",
            ErrorKind::Store => "store",
            ErrorKind::Serialization => "serialization",
            ErrorKind::Io => "io",
            ErrorKind::Failure => "failure",
        };
        f.write_str(name)
    }
}

impl TourmarkError {
    /// Returns the kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            TourmarkError::Configuration(_) => ErrorKind::Configuration,
            TourmarkError::Transport { .. } => ErrorKind::Transport,
            TourmarkError::Connection(_) => ErrorKind::Connection,
            TourmarkError::Domain { .. } => ErrorKind::Domain,
            TourmarkError::InvalidInput(_) => ErrorKind::InvalidInput,
            TourmarkError::UnresolvedIdentity(_) => ErrorKind::UnresolvedIdentity,
            TourmarkError::StoreConflict(_) => ErrorKind::StoreConflict,
            TourmarkError::Store(_) => ErrorKind::Store,
            TourmarkError::Serialization(_) => ErrorKind::Serialization,
            TourmarkError::Io(_) => ErrorKind::Io,
            TourmarkError::Failure(_) => ErrorKind::Failure,
        }
    }

    /// HTTP status carried by a transport error
    pub fn status(&self) -> Option<u16> {
        match self {
            TourmarkError::Transport { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Result code carried by a registry domain error
    pub fn code(&self) -> Option<&str> {
        match self {
            TourmarkError::Domain { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Whether a retry of the same request may succeed
    ///
    /// Only connection failures, 429 and 5xx responses qualify. Registry
    /// domain errors are never transient.
    pub fn is_transient(&self) -> bool {
        match self {
            TourmarkError::Connection(_) => true,
            TourmarkError::Transport { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Errors reported by the bookmark storage ports
///
/// Adapters map their native failures onto these variants. A uniqueness
/// violation must be reported as [`StoreError::UniqueViolation`] so the
/// engine can treat it as an already-present row.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The `(user, point of interest)` pair already exists
    #[error("uniqueness violation: {0}")]
    UniqueViolation(String),

    /// A referenced row does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Connection, query or serialization failure inside the store
    #[error("backend failure: {0}")]
    Backend(String),
}

impl StoreError {
    /// Whether this error is the store's uniqueness signal
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, StoreError::UniqueViolation(_))
    }
}

impl From<StoreError> for TourmarkError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation(msg) => TourmarkError::StoreConflict(msg),
            other => TourmarkError::Store(other.to_string()),
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for TourmarkError {
    fn from(err: std::io::Error) -> Self {
        TourmarkError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for TourmarkError {
    fn from(err: serde_json::Error) -> Self {
        TourmarkError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for TourmarkError {
    fn from(err: toml::de::Error) -> Self {
        TourmarkError::Configuration(format!("TOML parse error: {err}"))
    }
}
