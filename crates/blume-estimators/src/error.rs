//! Estimator errors

use blume_math::LinalgError;
use thiserror::Error;

/// Errors that can occur while estimating beta on a window
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EstimatorError {
    /// Window too short for the requested computation
    #[error("Insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData {
        /// Required number of observations
        required: usize,
        /// Actual number of observations
        actual: usize,
    },

    /// Market and asset series do not line up
    #[error("Length mismatch: exog has {exog} observations, endog has {endog}")]
    LengthMismatch {
        /// Market series length
        exog: usize,
        /// Asset series length
        endog: usize,
    },

    /// Return series contains NaN or infinity
    #[error("Non-finite return at index {index}")]
    NonFiniteReturn {
        /// Position of the offending observation
        index: usize,
    },

    /// Invalid parameter or estimator set
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Data admits no finite estimate (zero variance, vanishing denominator)
    #[error("Degenerate data: {0}")]
    Degenerate(&'static str),

    /// Regression failed, typically a singular `XᵀWX`
    #[error("Linear algebra error: {0}")]
    Linalg(#[from] LinalgError),
}

impl EstimatorError {
    /// Whether the error came from a singular design matrix
    pub const fn is_singular(&self) -> bool {
        matches!(self, Self::Linalg(LinalgError::SingularMatrix { .. }))
    }
}
