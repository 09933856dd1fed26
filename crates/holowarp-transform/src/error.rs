//! Error types for holowarp-transform

use thiserror::Error;

/// Errors that can occur while building or applying a warp
#[derive(Debug, Error)]
pub enum TransformError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] holowarp_core::Error),

    /// Coefficient list is empty or has an odd number of entries
    #[error("invalid coefficients: {0}")]
    InvalidCoefficients(String),

    /// Zero or unaddressable image dimensions
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Source image does not match the dimensions a warp map was built for
    #[error("dimension mismatch: expected {}x{}, got {}x{}", .expected.0, .expected.1, .actual.0, .actual.1)]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
}

/// Result type for transform operations
pub type TransformResult<T> = Result<T, TransformError>;
