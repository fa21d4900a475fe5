//! Error types for the test framework

use thiserror::Error;

/// Errors that can occur during regression testing
#[derive(Debug, Error)]
pub enum TestError {
    /// Value comparison failed
    #[error(
        "value comparison failed at index {index}: expected {expected}, got {actual}, delta {delta}"
    )]
    ValueMismatch {
        index: usize,
        expected: f64,
        actual: f64,
        delta: f64,
    },

    /// Raster comparison failed
    #[error("raster comparison failed at index {index}: first difference at ({x}, {y})")]
    RasterMismatch { index: usize, x: u32, y: u32 },

    /// Raster geometry or format differs
    #[error("raster comparison failed at index {index}: {message}")]
    RasterShape { index: usize, message: String },

    /// Fixture could not be built
    #[error("fixture error: {0}")]
    Fixture(#[from] spanbitmap_core::Error),
}

/// Result type for test operations
pub type TestResult<T> = Result<T, TestError>;
