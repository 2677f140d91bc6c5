//! Error types for trajectory evaluation.
//!
//! Construction of an evaluator either succeeds completely or fails with one
//! of these errors; there is no partially fitted state.

use thiserror::Error;

/// Main error type for safetraj operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SafeTrajError {
    /// Configuration validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Training corpus is too small to fit a model.
    #[error("Too few training samples: need at least {min}, got {actual}")]
    TooFewSamples { min: usize, actual: usize },

    /// Covariance estimate cannot be inverted reliably.
    #[error("Degenerate covariance: {0}")]
    DegenerateCovariance(String),

    /// Command vector has the wrong number of components.
    #[error("Dimension mismatch: expected {expected} components, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Command holds a NaN or infinite component.
    #[error("Non-finite input: {context}")]
    NonFiniteInput { context: String },
}

/// Result type alias for safetraj operations.
pub type Result<T> = std::result::Result<T, SafeTrajError>;

impl SafeTrajError {
    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a too-few-samples error.
    #[must_use]
    pub const fn too_few_samples(min: usize, actual: usize) -> Self {
        Self::TooFewSamples { min, actual }
    }

    /// Create a degenerate covariance error.
    #[must_use]
    pub fn degenerate_covariance(msg: impl Into<String>) -> Self {
        Self::DegenerateCovariance(msg.into())
    }

    /// Create a dimension mismatch error.
    #[must_use]
    pub const fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }

    /// Create a non-finite input error.
    #[must_use]
    pub fn non_finite_input(context: impl Into<String>) -> Self {
        Self::NonFiniteInput {
            context: context.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SafeTrajError::too_few_samples(4, 2);
        assert!(err.to_string().contains('4'));
        assert!(err.to_string().contains('2'));

        let err = SafeTrajError::dimension_mismatch(3, 5);
        assert_eq!(
            err.to_string(),
            "Dimension mismatch: expected 3 components, got 5"
        );
    }

    #[test]
    fn test_error_constructors() {
        assert!(matches!(
            SafeTrajError::invalid_config("num_steps"),
            SafeTrajError::InvalidConfig(_)
        ));
        assert!(matches!(
            SafeTrajError::degenerate_covariance("singular"),
            SafeTrajError::DegenerateCovariance(_)
        ));
        assert_eq!(
            SafeTrajError::non_finite_input("v_lin = inf").to_string(),
            "Non-finite input: v_lin = inf"
        );
    }
}
