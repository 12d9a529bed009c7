//! Result type alias for glip-export

use super::errors::GlipError;

/// Result type alias for glip-export operations
///
/// # Examples
///
/// ```
/// use glip_export::domain::result::Result;
/// use glip_export::domain::errors::GlipError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(GlipError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, GlipError>;
