//! Error types for registration operations.
//!
//! Argument errors are reported before any histogram work starts, so a failed
//! call leaves the registration session unchanged.

use histreg_core::CoreError;
use thiserror::Error;

/// Main error type for registration operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistrationError {
    /// An argument is outside its valid domain.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The similarity measure identifier is not known.
    #[error("Unsupported similarity measure: {0}")]
    UnsupportedMeasure(String),

    /// Shape mismatch.
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// A transform parameter reference or value is invalid.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error raised by the core volume and transform types.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Numerical instability detected.
    #[error("Numerical instability: {0}")]
    NumericalInstability(String),
}

/// Result type for registration operations.
pub type Result<T> = std::result::Result<T, RegistrationError>;

impl RegistrationError {
    /// Create an invalid argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create an unsupported measure error.
    pub fn unsupported_measure(name: impl Into<String>) -> Self {
        Self::UnsupportedMeasure(name.into())
    }

    /// Create an invalid parameter error.
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Create a numerical instability error.
    pub fn numerical_instability(msg: impl Into<String>) -> Self {
        Self::NumericalInstability(msg.into())
    }

    /// Whether the error stems from a bad argument, here or in the core crate.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument(_)
                | Self::InvalidParameter(_)
                | Self::Core(CoreError::InvalidArgument(_))
                | Self::Core(CoreError::InvalidParameter { .. })
        )
    }
}
