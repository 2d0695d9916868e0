#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/blume/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod beta;
pub mod config;
pub mod error;
pub mod matrix;
pub mod method;
pub mod series;
pub mod window;
pub mod wls;

pub use beta::{ScholesWilliamsComponents, WindowBeta};
pub use config::{BlumeConfig, EstimatorConfig, RobecoConfig, VasicekConfig, WelchConfig};
pub use error::EstimatorError;
pub use matrix::{EstimatorMatrix, EstimatorSet, EstimatorVector, OLS_INDEX};
pub use method::BetaMethod;
pub use series::{ReturnSeries, ReturnWindow};
pub use window::ExpandingWindows;
pub use wls::weighted_ols;
