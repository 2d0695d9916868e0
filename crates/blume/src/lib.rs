#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/blume/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export sub-crates
pub use blume_combine as combine;
pub use blume_estimators as estimators;
pub use blume_math as math;

// Re-export common types
pub use blume_combine::{
    BmaCombiner, BmaConfig, BmaEstimate, CombineError, CombinerConfig, ForecastCombiner,
};
pub use blume_estimators::{
    BetaMethod, EstimatorConfig, EstimatorError, EstimatorSet, EstimatorVector, ReturnSeries,
};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
