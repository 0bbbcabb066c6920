use thiserror::Error;

/// Result type for navigator operations
pub type Result<T> = std::result::Result<T, NavigatorError>;

/// Main error type for the navigator crate
#[derive(Debug, Error)]
pub enum NavigatorError {
    /// Invalid dimensions for operations
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        expected: String,
        actual: String,
    },

    /// Invalid parameter value
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        name: String,
        reason: String,
    },

    /// Replay memory sampled before it holds a full batch
    #[error("Insufficient data: requested {requested} samples but only {available} stored")]
    InsufficientData {
        requested: usize,
        available: usize,
    },

    /// Invalid action
    #[error("Invalid action {action}: must be less than {max_actions}")]
    InvalidAction {
        action: usize,
        max_actions: usize,
    },

    /// Numerical computation errors (NaN, infinities)
    #[error("Numerical error: {0}")]
    NumericalError(String),

    /// IO errors (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Checkpoint serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    /// Config file errors
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}

// Helper functions for common error patterns
impl NavigatorError {
    pub fn dimension_mismatch<S: Into<String>>(expected: S, actual: S) -> Self {
        NavigatorError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn invalid_parameter<S: Into<String>>(name: S, reason: S) -> Self {
        NavigatorError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
