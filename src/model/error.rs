//! Error types for model fitting and inference.

use thiserror::Error;

/// Error type for estimators and fitted models.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Empty data provided where non-empty was required.
    #[error("Empty data: {0}")]
    EmptyData(String),
    /// Samples in `x` and `y` disagree.
    #[error("Length mismatch: {x_rows} rows in X, {y_len} targets")]
    LengthMismatch { x_rows: usize, y_len: usize },
    /// Invalid hyperparameter or non-finite input.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    /// The normal equations could not be factorized.
    #[error("Singular system: {0}")]
    Singular(String),
    /// Feature dimension mismatch between fit and inference.
    #[error("Feature mismatch: expected {expected_features} features, got {got_features}")]
    FeatureMismatch {
        expected_features: usize,
        got_features: usize,
    },
    /// Serialization or deserialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for ModelError {
    fn from(err: std::io::Error) -> Self {
        ModelError::IoError(err.to_string())
    }
}

impl From<bincode::Error> for ModelError {
    fn from(err: bincode::Error) -> Self {
        ModelError::SerializationError(err.to_string())
    }
}
