//! Combiner errors

use blume_estimators::EstimatorError;
use blume_math::LinalgError;
use thiserror::Error;

/// Errors that can occur while fitting or applying a combiner
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CombineError {
    /// Estimating the per-window betas failed
    #[error("Estimator error: {0}")]
    Estimator(#[from] EstimatorError),

    /// A combination regression failed
    #[error("Linear algebra error: {0}")]
    Linalg(#[from] LinalgError),

    /// Series too short to produce enough estimation windows
    #[error("Insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData {
        /// Required number of observations
        required: usize,
        /// Actual number of observations
        actual: usize,
    },

    /// Invalid combiner parameter
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Weights requested before a successful fit
    #[error("Combiner has not been fitted")]
    NotFitted,

    /// Estimator vector does not match the fitted weights
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension
        actual: usize,
    },
}
