//! Registry credential providers
//!
//! The service key is resolved on every registry call, never cached by the
//! client, so rotating the key in the environment takes effect without a
//! restart.

use crate::config::{secret_string, RegistryConfig, SecretString};
use crate::domain::{Result, TourmarkError};
use secrecy::ExposeSecret;

/// Source of the registry service key
pub trait CredentialSource: Send + Sync {
    /// Resolves the current service key
    ///
    /// # Errors
    ///
    /// Returns [`TourmarkError::Configuration`] if no usable key is available.
    fn resolve(&self) -> Result<SecretString>;

    /// Short description for logs; never includes the key itself
    fn describe(&self) -> String;
}

/// Reads the key from an environment variable on every call
#[derive(Debug, Clone)]
pub struct EnvCredential {
    var: String,
}

impl EnvCredential {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    /// Name of the environment variable
    pub fn var(&self) -> &str {
        &self.var
    }

    fn lookup(&self) -> Option<SecretString> {
        match std::env::var(&self.var) {
            Ok(value) if !value.trim().is_empty() => Some(secret_string(value)),
            _ => None,
        }
    }
}

impl CredentialSource for EnvCredential {
    fn resolve(&self) -> Result<SecretString> {
        self.lookup().ok_or_else(|| {
            TourmarkError::Configuration(format!(
                "Registry service key is not set (expected environment variable {})",
                self.var
            ))
        })
    }

    fn describe(&self) -> String {
        format!("env:{}", self.var)
    }
}

/// A fixed key, mostly useful in tests and embedders
#[derive(Debug, Clone)]
pub struct StaticCredential {
    key: SecretString,
}

impl StaticCredential {
    pub fn new(key: SecretString) -> Self {
        Self { key }
    }
}

impl CredentialSource for StaticCredential {
    fn resolve(&self) -> Result<SecretString> {
        if self.key.expose_secret().is_blank() {
            return Err(TourmarkError::Configuration(
                "Registry service key is empty".to_string(),
            ));
        }
        Ok(self.key.clone())
    }

    fn describe(&self) -> String {
        "static".to_string()
    }
}

/// The configured lookup order: environment variable first, then the inline key
#[derive(Debug, Clone)]
pub struct ConfiguredCredential {
    env: Option<EnvCredential>,
    inline: Option<SecretString>,
}

impl ConfiguredCredential {
    /// Builds the lookup chain from the registry configuration
    pub fn from_config(config: &RegistryConfig) -> Self {
        Self {
            env: config
                .service_key_env
                .as_deref()
                .filter(|var| !var.trim().is_empty())
                .map(EnvCredential::new),
            inline: config.service_key.clone(),
        }
    }
}

impl CredentialSource for ConfiguredCredential {
    fn resolve(&self) -> Result<SecretString> {
        if let Some(key) = self.env.as_ref().and_then(EnvCredential::lookup) {
            return Ok(key);
        }

        match &self.inline {
            Some(key) if !key.expose_secret().is_blank() => Ok(key.clone()),
            _ => {
                let hint = match &self.env {
                    Some(env) => format!("set {} or registry.service_key", env.var()),
                    None => "set registry.service_key".to_string(),
                };
                Err(TourmarkError::Configuration(format!(
                    "Registry service key is not configured ({hint})"
                )))
            }
        }
    }

    fn describe(&self) -> String {
        match (&self.env, &self.inline) {
            (Some(env), Some(_)) => format!("env:{} then inline", env.var()),
            (Some(env), None) => format!("env:{}", env.var()),
            (None, Some(_)) => "inline".to_string(),
            (None, None) => "none".to_string(),
        }
    }
}
