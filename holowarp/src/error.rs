//! Error type for the transform boundary

use holowarp_io::IoError;
use holowarp_transform::TransformError;
use thiserror::Error;

/// Failure of a [`transform`](crate::transform) call.
///
/// Every variant aborts the whole call; no partial output is returned.
#[derive(Debug, Error)]
pub enum Error {
    /// Coefficient list is empty or has odd length
    #[error("invalid coefficients: {0}")]
    InvalidCoefficients(String),

    /// Requested output size is zero or unaddressable
    #[error("invalid output dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Source bytes are malformed, truncated or in an unsupported format
    #[error("failed to decode image: {0}")]
    Decode(#[source] IoError),

    /// Warped image could not be serialized
    #[error("failed to encode image: {0}")]
    Encode(#[source] IoError),
}

impl From<TransformError> for Error {
    fn from(err: TransformError) -> Self {
        match err {
            TransformError::InvalidCoefficients(msg) => Error::InvalidCoefficients(msg),
            TransformError::InvalidDimensions { width, height }
            | TransformError::Core(holowarp_core::Error::InvalidDimension { width, height }) => {
                Error::InvalidDimensions { width, height }
            }
            TransformError::DimensionMismatch {
                actual: (width, height),
                ..
            } => Error::InvalidDimensions { width, height },
            // the output raster could not be produced
            TransformError::Core(e) => Error::Encode(IoError::Core(e)),
        }
    }
}

/// Result type for boundary operations
pub type Result<T> = std::result::Result<T, Error>;
