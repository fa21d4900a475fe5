//! Error types for spanbitmap-transform

use thiserror::Error;

/// Errors that can occur during raster transforms and resizing
#[derive(Debug, Error)]
pub enum TransformError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] spanbitmap_core::Error),

    /// Singular matrix (non-invertible)
    #[error("singular transformation matrix")]
    SingularMatrix,

    /// Opacity outside `0.0..=1.0` or not finite
    #[error("invalid opacity: {0}")]
    InvalidOpacity(f32),

    /// Raster with no pixels where pixels are required
    #[error("empty raster: {width}x{height}")]
    EmptyRaster { width: u32, height: u32 },

    /// Invalid transformation parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Result type for transform operations
pub type TransformResult<T> = Result<T, TransformError>;
