//! Closed set of beta estimation methods

use crate::{EstimatorConfig, EstimatorError, WindowBeta, beta::MIN_OBSERVATIONS};
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// A beta estimation method with a uniform `estimate` entry point
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BetaMethod {
    /// Ordinary least squares slope
    #[display("ols")]
    Ols,
    /// Blume-adjusted OLS
    #[display("adjusted_ols")]
    AdjustedOls,
    /// Vasicek Bayesian shrinkage
    #[display("vasicek")]
    Vasicek,
    /// Welch slope winsorization
    #[display("welch")]
    Welch,
    /// Welch with exponential recency weights
    #[display("aged_welch")]
    AgedWelch,
    /// Robeco correlation / volatility shrinkage
    #[display("robeco")]
    Robeco,
    /// Scholes-Williams nonsynchronous trading correction
    #[display("scholes_williams")]
    ScholesWilliams,
}

impl BetaMethod {
    /// Every available method
    pub const ALL: [Self; 7] = [
        Self::Ols,
        Self::AdjustedOls,
        Self::Vasicek,
        Self::Welch,
        Self::AgedWelch,
        Self::Robeco,
        Self::ScholesWilliams,
    ];

    /// Smallest window the method can be evaluated on
    pub const fn min_observations(self) -> usize {
        match self {
            Self::Vasicek | Self::ScholesWilliams => 3,
            _ => MIN_OBSERVATIONS,
        }
    }

    /// Evaluate the method on one window
    pub fn estimate(
        self,
        window: &WindowBeta<'_>,
        config: &EstimatorConfig,
    ) -> Result<f64, EstimatorError> {
        match self {
            Self::Ols => window.ols(),
            Self::AdjustedOls => window.adjusted_ols(&config.blume),
            Self::Vasicek => window.vasicek(&config.vasicek),
            Self::Welch => window.welch(&config.welch),
            Self::AgedWelch => window.welch(&config.aged_welch),
            Self::Robeco => window.robeco(&config.robeco),
            Self::ScholesWilliams => window.scholes_williams(),
        }
    }
}
