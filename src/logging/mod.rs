//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - JSON-formatted file logs with rotation
//! - Configurable log levels, overridable through `RUST_LOG`
//! - Console output
//!
//! # Example
//!
//! ```no_run
//! use tourmark::logging::init_logging;
//! use tourmark::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! tracing::error!(error = "Something went wrong", "Error occurred");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log a registry call with its cache outcome
///
/// # Example
///
/// ```no_run
/// use tourmark::log_registry_call;
///
/// log_registry_call!("areaBasedList1", false, 2048usize);
/// ```
#[macro_export]
macro_rules! log_registry_call {
    ($endpoint:expr, $cache_hit:expr, $response_bytes:expr) => {
        tracing::debug!(
            endpoint = $endpoint,
            cache_hit = $cache_hit,
            response_bytes = $response_bytes,
            "Registry call completed"
        );
    };
}

/// Log the outcome of a bookmark merge
///
/// # Example
///
/// ```no_run
/// use tourmark::log_merge_complete;
///
/// log_merge_complete!("session-1", 3, 1, 0);
/// ```
#[macro_export]
macro_rules! log_merge_complete {
    ($session_id:expr, $merged:expr, $already_present:expr, $failed:expr) => {
        tracing::info!(
            session_id = %$session_id,
            merged = $merged,
            already_present = $already_present,
            failed = $failed,
            "Anonymous bookmarks merged"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use tourmark::log_error_with_context;
/// use tourmark::domain::TourmarkError;
///
/// let error = TourmarkError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            kind = %$error.kind(),
            context = $context,
            "Error occurred"
        );
    };
}

/// Log a retry attempt
///
/// # Example
///
/// ```no_run
/// use tourmark::log_retry_attempt;
///
/// log_retry_attempt!(2, 3, 1000u64, "HTTP 503");
/// ```
#[macro_export]
macro_rules! log_retry_attempt {
    ($attempt:expr, $max_attempts:expr, $delay_ms:expr, $reason:expr) => {
        tracing::warn!(
            attempt = $attempt,
            max_attempts = $max_attempts,
            delay_ms = $delay_ms,
            reason = %$reason,
            "Retrying registry request"
        );
    };
}
