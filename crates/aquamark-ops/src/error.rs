//! Error types for watermark operations.

use aquamark_core::Backend;
use thiserror::Error;

/// Error type for watermark operations.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Blend mode key is not one of the registered modes.
    #[error("unsupported blend mode: \"{0}\"")]
    UnsupportedBlendMode(String),

    /// Base and watermark come from raster backends that cannot be mixed.
    #[error("unsupported backend combination: base is {base}, watermark is {watermark}")]
    UnsupportedBackendCombination {
        /// Backend of the base image.
        base: Backend,
        /// Backend of the watermark.
        watermark: Backend,
    },

    /// Sizing produced or received a degenerate dimension.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Settings document could not be parsed.
    #[error("invalid settings: {0}")]
    Settings(String),

    /// Raster-level failure from the image handle.
    #[error(transparent)]
    Image(#[from] aquamark_core::Error),
}

/// Result type for watermark operations.
pub type OpsResult<T> = Result<T, OpsError>;
