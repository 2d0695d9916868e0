//! Linear algebra errors

use thiserror::Error;

/// Errors raised by the dense linear algebra primitives
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LinalgError {
    /// Matrix has no inverse (zero pivot after partial pivoting)
    #[error("Singular matrix: {size}x{size} system has no unique inverse")]
    SingularMatrix {
        /// Dimension of the square matrix
        size: usize,
    },

    /// Operand shapes do not line up
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension
        actual: usize,
    },

    /// Operation requires at least one element
    #[error("Empty input: {0}")]
    Empty(&'static str),
}
