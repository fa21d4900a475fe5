//! Error types for spanbitmap-core
//!
//! Provides a unified error type for raster construction, pixel access and
//! format conversion. Each variant captures enough context for diagnostics
//! without exposing buffer internals.

use crate::format::PixelFormat;
use thiserror::Error;

/// spanbitmap core error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Row stride shorter than one row of pixels
    #[error("invalid row stride: {stride} bytes, need at least {min}")]
    InvalidStride { stride: usize, min: usize },

    /// Backing buffer cannot hold the described raster
    #[error("buffer too small: need {required} bytes, got {actual}")]
    BufferTooSmall { required: usize, actual: usize },

    /// No converter registered between two formats
    #[error("unsupported format pair: {src} -> {dst}")]
    UnsupportedFormatPair { src: PixelFormat, dst: PixelFormat },

    /// Format has no registered codec
    #[error("unsupported pixel format: {0}")]
    UnsupportedFormat(PixelFormat),

    /// Typed access with a codec that does not match the raster format
    #[error("format mismatch: expected {expected}, got {actual}")]
    FormatMismatch {
        expected: PixelFormat,
        actual: PixelFormat,
    },

    /// Raster dimension mismatch
    #[error("dimension mismatch: expected {}x{}, got {}x{}", .expected.0, .expected.1, .actual.0, .actual.1)]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// Index out of bounds
    #[error("index out of bounds: {index} >= {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for spanbitmap core operations
pub type Result<T> = std::result::Result<T, Error>;
