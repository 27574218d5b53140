//! Error types for aquamark-core operations.
//!
//! # Overview
//!
//! The [`Error`] enum covers the failure modes of the raster layer:
//! - Pixel access outside the canvas
//! - Raw buffers whose length does not match the declared dimensions
//! - Zero-sized or overflowing dimensions
//! - Native operations a backend does not provide
//!
//! # Usage
//!
//! ```rust
//! use aquamark_core::{Error, Result};
//!
//! fn check(x: u32, y: u32, width: u32, height: u32) -> Result<()> {
//!     if x >= width || y >= height {
//!         return Err(Error::OutOfBounds { x, y, width, height });
//!     }
//!     Ok(())
//! }
//! assert!(check(4, 0, 4, 4).is_err());
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading, writing or resampling raster images.
#[derive(Debug, Error)]
pub enum Error {
    /// Pixel coordinates are outside image bounds.
    ///
    /// # Example
    ///
    /// ```rust
    /// use aquamark_core::Error;
    ///
    /// let err = Error::OutOfBounds { x: 100, y: 50, width: 80, height: 60 };
    /// assert!(err.to_string().contains("100"));
    /// ```
    #[error("pixel ({x}, {y}) out of bounds for {width}x{height} image")]
    OutOfBounds {
        /// X coordinate that was accessed.
        x: u32,
        /// Y coordinate that was accessed.
        y: u32,
        /// Image width.
        width: u32,
        /// Image height.
        height: u32,
    },

    /// Raw buffer length does not match `width * height * 4`.
    #[error("buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSize {
        /// Expected byte count.
        expected: usize,
        /// Actual byte count.
        actual: usize,
    },

    /// Dimensions are zero or overflow the addressable range.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// The backend does not implement the requested operation.
    #[error("unsupported operation: {0}")]
    Unsupported(String),
}
