//! Result type alias for Tourmark
//!
//! This module provides a convenient Result type alias that uses TourmarkError
//! as the error type.

use super::errors::TourmarkError;

/// Result type alias for Tourmark operations
///
/// # Examples
///
/// ```
/// use tourmark::domain::result::Result;
/// use tourmark::domain::errors::TourmarkError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(TourmarkError::InvalidInput("keyword cannot be blank".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, TourmarkError>;
