//! Error types for centerbox.

use thiserror::Error;

/// Result alias for centerbox operations.
pub type CenterBoxResult<T> = std::result::Result<T, CenterBoxError>;

/// Errors raised when inputs violate the pipeline's preconditions.
///
/// Geometric edge cases (degenerate or duplicate boxes) are handled by
/// filtering and never surface here; an empty detection list is a normal
/// result, not an error.
#[derive(Debug, Error, PartialEq)]
pub enum CenterBoxError {
    /// A spatial dimension is zero.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// The backing buffer is shorter than the declared shape requires.
    #[error("buffer too small: needed {needed} elements, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// The channel count cannot hold a category block plus the four
    /// regression channels.
    #[error("channel mismatch: need at least {needed} channels, got {got}")]
    ChannelMismatch { needed: usize, got: usize },
    /// The grid's spatial shape differs from the configured resolution.
    #[error(
        "grid size mismatch: expected {expected_width}x{expected_height}, got {width}x{height}"
    )]
    GridSizeMismatch {
        expected_width: usize,
        expected_height: usize,
        width: usize,
        height: usize,
    },
    /// A threshold parameter lies outside its valid range.
    #[error("invalid {name} threshold: {value}")]
    InvalidThreshold { name: &'static str, value: f32 },
    /// Reading an image file failed.
    #[cfg(feature = "image-io")]
    #[error("image io error: {reason}")]
    ImageIo { reason: String },
}
