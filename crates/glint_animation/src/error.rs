//! Animation error types

use thiserror::Error;

/// Errors raised when constructing animations from invalid settings.
///
/// Ticking never fails; malformed timings are rejected up front instead.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum AnimationError {
    /// Delay was negative, NaN or infinite
    #[error("invalid animation delay: {0} (must be finite and non-negative)")]
    InvalidDelay(f32),

    /// Duration was negative, NaN or infinite
    #[error("invalid animation duration: {0} (must be finite and non-negative)")]
    InvalidDuration(f32),
}

/// Result type for animation construction
pub type Result<T> = std::result::Result<T, AnimationError>;
