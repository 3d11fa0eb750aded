//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{MergePolicy, PostgreSQLConfig, TourmarkConfig};
use super::secret::{secret_string, secret_string_opt};
use crate::domain::errors::TourmarkError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into TourmarkConfig
/// 4. Applies environment variable overrides (TOURMARK_* prefix)
/// 5. Validates the configuration
///
/// The registry service key is deliberately not required here; it is resolved
/// on every registry call.
///
/// # Errors
///
/// Returns [`TourmarkError::Configuration`] if the file cannot be read or
/// parsed, a referenced variable is unset, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use tourmark::config::loader::load_config;
///
/// let config = load_config("tourmark.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<TourmarkConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(TourmarkError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        TourmarkError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses configuration from TOML text
///
/// Same pipeline as [`load_config`] minus the file read.
pub fn parse_config(contents: &str) -> Result<TourmarkConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: TourmarkConfig = toml::from_str(&contents)
        .map_err(|e| TourmarkError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        TourmarkError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| TourmarkError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(TourmarkError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using TOURMARK_* prefix
///
/// Environment variables follow the pattern: TOURMARK_<SECTION>_<KEY>
/// For example: TOURMARK_REGISTRY_BASE_URL, TOURMARK_BOOKMARKS_MERGE_POLICY
fn apply_env_overrides(config: &mut TourmarkConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("TOURMARK_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Registry overrides
    if let Ok(val) = std::env::var("TOURMARK_REGISTRY_BASE_URL") {
        config.registry.base_url = val;
    }
    if let Ok(val) = std::env::var("TOURMARK_REGISTRY_MOBILE_APP") {
        config.registry.mobile_app = val;
    }
    if let Ok(val) = std::env::var("TOURMARK_REGISTRY_SERVICE_KEY_ENV") {
        config.registry.service_key_env = Some(val);
    }
    if let Ok(val) = std::env::var("TOURMARK_REGISTRY_CACHE_TTL_SECONDS") {
        if let Ok(ttl) = val.parse() {
            config.registry.cache_ttl_seconds = ttl;
        }
    }
    if let Ok(val) = std::env::var("TOURMARK_REGISTRY_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.registry.timeout_seconds = timeout;
        }
    }

    // Bookmark overrides
    if let Ok(val) = std::env::var("TOURMARK_BOOKMARKS_MERGE_POLICY") {
        config.bookmarks.merge_policy = match val.to_lowercase().as_str() {
            "lossy" => MergePolicy::Lossy,
            "strict" => MergePolicy::Strict,
            other => {
                return Err(TourmarkError::Configuration(format!(
                    "Invalid TOURMARK_BOOKMARKS_MERGE_POLICY '{other}'. Must be one of: lossy, strict"
                )))
            }
        };
    }

    // PostgreSQL overrides
    if let Ok(val) = std::env::var("TOURMARK_POSTGRESQL_CONNECTION_STRING") {
        match config.postgresql {
            Some(ref mut pg) => pg.connection_string = secret_string(val),
            None => {
                config.postgresql = Some(PostgreSQLConfig::from_connection_string(
                    secret_string(val),
                ))
            }
        }
    }

    // Local store overrides
    if let Ok(val) = std::env::var("TOURMARK_LOCAL_STORE_PATH") {
        config.local_store.path = val;
    }

    // Logging overrides
    if let Ok(val) = std::env::var("TOURMARK_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("TOURMARK_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    // An inline key from the environment, for deployments without a key file
    if config.registry.service_key.is_none() {
        config.registry.service_key =
            secret_string_opt(std::env::var("TOURMARK_REGISTRY_SERVICE_KEY").ok());
    }

    Ok(())
}
