//! Error types for the kinelag library.

use thiserror::Error;

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors that can occur during motion influence analysis.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Dataset is structurally invalid (ragged rows, duplicate channels, ...).
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Insufficient observations for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Scaler used before `fit` was called.
    #[error("scaler must be fitted before transforming data")]
    NotFitted,

    /// Model used before `fit` was called.
    #[error("model must be trained before prediction")]
    ModelNotTrained,

    /// Prediction input length does not match the coefficient vector.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Metric inputs are misaligned.
    #[error("length mismatch: expected {expected}, got {got}")]
    LengthMismatch { expected: usize, got: usize },

    /// Requested channel is absent from the dataset.
    #[error("channel '{0}' not found in dataset channels")]
    ChannelNotFound(String),

    /// Irrecoverable numerical failure.
    #[error("computation error: {0}")]
    Computation(String),
}
