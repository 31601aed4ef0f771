//! Error types for the skycast pipeline

use thiserror::Error;

/// Result type alias for skycast operations
pub type Result<T> = std::result::Result<T, SkycastError>;

/// Main error type for the skycast pipeline
#[derive(Error, Debug)]
pub enum SkycastError {
    #[error("Data error: {0}")]
    DataError(String),

    /// A prediction request is missing a required feature. Carries the
    /// name of the first missing field in schema order.
    #[error("Missing required field: {0}")]
    ValidationError(String),

    #[error("Training error: {0}")]
    TrainingError(String),

    #[error("Inference error: {0}")]
    InferenceError(String),

    /// Artifact storage missing or corrupt at load. Fatal: a service must
    /// refuse to start without a complete artifact.
    #[error("Artifact load error: {0}")]
    ArtifactLoadError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<polars::error::PolarsError> for SkycastError {
    fn from(err: polars::error::PolarsError) -> Self {
        SkycastError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for SkycastError {
    fn from(err: serde_json::Error) -> Self {
        SkycastError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for SkycastError {
    fn from(err: ndarray::ShapeError) -> Self {
        SkycastError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SkycastError::ValidationError("humidity".to_string());
        assert_eq!(err.to_string(), "Missing required field: humidity");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: SkycastError = io_err.into();
        assert!(matches!(err, SkycastError::IoError(_)));
    }
}
