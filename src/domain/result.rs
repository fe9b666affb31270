//! Result type alias for Scrubline

use super::errors::ScrublineError;

/// Result type alias for Scrubline operations
///
/// # Examples
///
/// ```
/// use scrubline::domain::result::Result;
/// use scrubline::domain::errors::ScrublineError;
///
/// fn failing_function() -> Result<()> {
///     Err(ScrublineError::Setup("output directory is read-only".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, ScrublineError>;
