//! Error types for background swap operations

use thiserror::Error;

/// Result type alias for background swap operations
pub type Result<T> = std::result::Result<T, BgSwapError>;

/// Comprehensive error types for background swap operations
#[derive(Error, Debug)]
pub enum BgSwapError {
    /// Input/output errors (file not found, permission denied, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image format or processing errors
    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    /// Mask and image spatial dimensions differ
    ///
    /// The inference collaborator and the source image have become
    /// desynchronized. Never reconciled by cropping or resampling.
    #[error("dimension mismatch: image is {expected_width}x{expected_height}, mask is {actual_width}x{actual_height}")]
    DimensionMismatch {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    /// Resolved print-size target has a non-positive dimension
    #[error("invalid size spec: target {width}x{height} has a non-positive dimension")]
    InvalidSizeSpec { width: i32, height: i32 },

    /// Background color label absent from the configured palette
    #[error("unknown color name: '{0}'")]
    UnknownColorName(String),

    /// Print-size label absent from the configured size chart
    #[error("unknown size name: '{0}'")]
    UnknownSizeName(String),

    /// Backend inference errors
    #[error("Inference error: {0}")]
    Inference(String),

    /// Invalid configuration or parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Memory allocation or processing errors
    #[error("Processing error: {0}")]
    Processing(String),
}

impl BgSwapError {
    /// Create a new invalid configuration error
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a new processing error
    pub fn processing<S: Into<String>>(msg: S) -> Self {
        Self::Processing(msg.into())
    }

    /// Create a new inference error
    pub fn inference<S: Into<String>>(msg: S) -> Self {
        Self::Inference(msg.into())
    }

    /// Create a dimension mismatch error from image and mask dimensions
    #[must_use]
    pub fn dimension_mismatch(expected: (u32, u32), actual: (u32, u32)) -> Self {
        Self::DimensionMismatch {
            expected_width: expected.0,
            expected_height: expected.1,
            actual_width: actual.0,
            actual_height: actual.1,
        }
    }

    /// Create file I/O error with operation context
    pub fn file_io_error<P: AsRef<std::path::Path>>(
        operation: &str,
        path: P,
        error: &std::io::Error,
    ) -> Self {
        let path_display = path.as_ref().display();
        Self::Io(std::io::Error::new(
            error.kind(),
            format!("Failed to {} '{}': {}", operation, path_display, error),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_error_creation() {
        let err = BgSwapError::invalid_config("test config error");
        assert!(matches!(err, BgSwapError::InvalidConfig(_)));

        let err = BgSwapError::UnknownColorName("magenta".to_string());
        assert!(matches!(err, BgSwapError::UnknownColorName(_)));
    }

    #[test]
    fn test_error_display() {
        let err = BgSwapError::invalid_config("missing palette");
        assert_eq!(err.to_string(), "Invalid configuration: missing palette");

        let err = BgSwapError::dimension_mismatch((100, 100), (100, 99));
        assert_eq!(
            err.to_string(),
            "dimension mismatch: image is 100x100, mask is 100x99"
        );

        let err = BgSwapError::InvalidSizeSpec {
            width: 0,
            height: 413,
        };
        assert!(err.to_string().contains("non-positive"));
    }

    #[test]
    fn test_file_io_error_context() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = BgSwapError::file_io_error("read image file", Path::new("/photos/in.jpg"), &io_error);
        let error_string = err.to_string();
        assert!(error_string.contains("read image file"));
        assert!(error_string.contains("/photos/in.jpg"));
    }
}
