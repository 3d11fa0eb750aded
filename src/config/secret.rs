//! Secret configuration values
//!
//! Two values in the configuration are sensitive: the registry service key
//! and the PostgreSQL connection string (which embeds a password). Both are
//! held as [`SecretString`], so `{:?}` on any config struct prints
//! `[REDACTED]` and the backing buffer is zeroed on drop.
//!
//! ```rust
//! use secrecy::ExposeSecret;
//! use tourmark::config::secret_string;
//!
//! let service_key = secret_string("abc%2Bdef".to_string());
//! assert_eq!(service_key.expose_secret().as_str(), "abc%2Bdef");
//! assert!(!format!("{service_key:?}").contains("abc"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// String payload stored inside a [`SecretString`]
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
// Config sections derive Serialize; a dumped config carries the raw value.
impl SerializableSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(value: String) -> Self {
        SecretValue(value)
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl SecretValue {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for an empty or whitespace-only value
    ///
    /// A blank service key is treated the same as a missing one.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Serialize for SecretValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// Service key or connection string, redacted in debug output
pub type SecretString = Secret<SecretValue>;

pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue(value))
}

/// Wraps an optional value, as read from `TOURMARK_REGISTRY_SERVICE_KEY`
pub fn secret_string_opt(value: Option<String>) -> Option<SecretString> {
    value.map(secret_string)
}
