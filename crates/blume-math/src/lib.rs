#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/blume/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod matrix;
pub mod stats;
pub mod svd;

pub use error::LinalgError;
pub use matrix::{LeastSquares, add_intercept, inverse, least_squares, pseudo_inverse};
pub use stats::{autocorrelation, mean, pearson_correlation, std_dev};
pub use svd::{SingularValueDecomposition, jacobi_svd};
