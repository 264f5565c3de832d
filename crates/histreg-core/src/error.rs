//! Error types for volumes and transforms.

use thiserror::Error;

/// Errors raised by the core volume and transform types.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// A parameter vector does not match the transform model.
    #[error("Invalid parameter vector for {model} transform: expected {expected} values, got {actual}")]
    InvalidParameter {
        model: &'static str,
        expected: usize,
        actual: usize,
    },

    /// An argument is outside its valid domain.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A matrix that must be inverted is singular.
    #[error("Singular matrix: {0}")]
    SingularMatrix(String),

    /// Two shapes that must agree do not.
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// Tensor data could not be read back to the host.
    #[error("Tensor data error: {0}")]
    TensorData(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Create an invalid argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a singular matrix error.
    pub fn singular(msg: impl Into<String>) -> Self {
        Self::SingularMatrix(msg.into())
    }
}
