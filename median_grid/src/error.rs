//! Error types for the reducer and its image adapters.
//!
//! Two layers, following the same split the rest of the crate uses between
//! pure computation and I/O:
//!
//! - **`ValidationError`**: a configuration was rejected before any pixel was
//!   touched. Non-positive or oversized dimensions, a target grid larger than
//!   its source, or a raw buffer whose length does not match its shape.
//! - **`MedianGridError`**: everything that can go wrong end to end. Wraps
//!   `ValidationError` and adds decode/encode failures from the `image` crate,
//!   failures writing the output file, and worker failures from the parallel
//!   reducer.
//!
//! Nothing here is retried. Every variant's message names the constraint that
//! was violated so it can be shown to a user unchanged.

use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias for results using the crate error type.
pub type GridResult<T> = std::result::Result<T, MedianGridError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} must be one or more, got {value}")]
    NonPositive { field: &'static str, value: i64 },

    #[error("{field} must fit in an unsigned 32-bit integer, got {value}")]
    OutOfRange { field: &'static str, value: i64 },

    #[error("target {field} ({target}) must not exceed source {field} ({limit})")]
    ExceedsSource {
        field: &'static str,
        target: u32,
        limit: u32,
    },

    #[error("pixel buffer holds {actual} bytes, expected {expected} for a {width}x{height} RGB grid")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("cannot build an RGB pixel from {0} bytes")]
    ChannelCount(usize),
}

#[derive(Error, Debug)]
pub enum MedianGridError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Failed to decode image {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to encode image {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Reducer worker failed: {0}")]
    Worker(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_name_the_field() {
        let err = ValidationError::NonPositive {
            field: "width",
            value: 0,
        };
        assert_eq!(err.to_string(), "width must be one or more, got 0");

        let err = ValidationError::ExceedsSource {
            field: "height",
            target: 9,
            limit: 4,
        };
        assert_eq!(
            err.to_string(),
            "target height (9) must not exceed source height (4)"
        );
    }

    #[test]
    fn validation_error_converts_into_crate_error() {
        let err: MedianGridError = ValidationError::ChannelCount(4).into();
        assert!(matches!(
            err,
            MedianGridError::Validation(ValidationError::ChannelCount(4))
        ));
        assert!(err.to_string().contains("4 bytes"));
    }
}
