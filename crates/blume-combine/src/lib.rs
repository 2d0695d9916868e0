#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/blume/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod bma;
pub mod config;
pub mod error;
pub mod stacking;
pub mod subsets;

pub use bma::{BmaCombiner, BmaEstimate, SubsetModel};
pub use config::{BmaConfig, CombinerConfig};
pub use error::CombineError;
pub use stacking::ForecastCombiner;
pub use subsets::{Subsets, binomial};
