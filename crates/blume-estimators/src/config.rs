//! Estimator configuration
//!
//! Every parameter of the estimator suite lives here with its documented
//! default, so a run is fully described by one [`EstimatorConfig`] value.

use crate::EstimatorError;
use serde::{Deserialize, Serialize};

/// Blume (1975) adjustment: `weight · β + (1 - weight) · target`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlumeConfig {
    /// Weight on the raw OLS beta (default: 0.67)
    pub weight: f64,
    /// Beta the estimate is pulled toward (default: 1.0, the market)
    pub target: f64,
}

impl Default for BlumeConfig {
    fn default() -> Self {
        Self {
            weight: 0.67,
            target: 1.0,
        }
    }
}

/// Vasicek (1973) prior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VasicekConfig {
    /// Prior mean of beta (default: 1.0)
    pub prior_beta: f64,
    /// Prior standard error (default: 0.5)
    pub prior_se: f64,
}

impl Default for VasicekConfig {
    fn default() -> Self {
        Self {
            prior_beta: 1.0,
            prior_se: 0.5,
        }
    }
}

/// Welch (2021) slope winsorization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WelchConfig {
    /// Winsorization band: asset returns are clipped to
    /// `[(1 - delta)·x, (1 + delta)·x]` (default: 3.0)
    pub delta: f64,
    /// Exponential decay applied to older observations (default: 0.0, no decay)
    pub rho: f64,
}

impl WelchConfig {
    /// Decay used by the aged Welch estimator, as in the paper
    pub const AGED_RHO: f64 = 2.0 / 256.0;

    /// Welch configuration with the paper's recency decay
    pub const fn aged() -> Self {
        Self {
            delta: 3.0,
            rho: Self::AGED_RHO,
        }
    }
}

impl Default for WelchConfig {
    fn default() -> Self {
        Self {
            delta: 3.0,
            rho: 0.0,
        }
    }
}

/// Blitz et al. (2022) correlation / volatility shrinkage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobecoConfig {
    /// Cross-sectional mean correlation (default: 0.5)
    pub corr_target: f64,
    /// Cross-sectional mean volatility ratio (default: 2.0)
    pub vol_target: f64,
    /// Shrinkage of the correlation toward its target (default: 0.5)
    pub gamma: f64,
    /// Shrinkage of the volatility ratio toward its target (default: 0.2)
    pub phi: f64,
}

impl Default for RobecoConfig {
    fn default() -> Self {
        Self {
            corr_target: 0.5,
            vol_target: 2.0,
            gamma: 0.5,
            phi: 0.2,
        }
    }
}

/// Parameters for the full estimator suite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Adjusted OLS
    pub blume: BlumeConfig,
    /// Vasicek prior
    pub vasicek: VasicekConfig,
    /// Plain Welch estimator
    pub welch: WelchConfig,
    /// Recency-weighted Welch estimator
    pub aged_welch: WelchConfig,
    /// Robeco shrinkage
    pub robeco: RobecoConfig,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            blume: BlumeConfig::default(),
            vasicek: VasicekConfig::default(),
            welch: WelchConfig::default(),
            aged_welch: WelchConfig::aged(),
            robeco: RobecoConfig::default(),
        }
    }
}

impl EstimatorConfig {
    /// Check every parameter is finite and within its admissible range
    pub fn validate(&self) -> Result<(), EstimatorError> {
        let finite = [
            ("blume.weight", self.blume.weight),
            ("blume.target", self.blume.target),
            ("vasicek.prior_beta", self.vasicek.prior_beta),
            ("robeco.corr_target", self.robeco.corr_target),
            ("robeco.vol_target", self.robeco.vol_target),
        ];
        if let Some((name, value)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(EstimatorError::InvalidConfiguration(format!(
                "{name} must be finite, got {value}"
            )));
        }

        if !(self.vasicek.prior_se > 0.0 && self.vasicek.prior_se.is_finite()) {
            return Err(EstimatorError::InvalidConfiguration(format!(
                "vasicek.prior_se must be positive, got {}",
                self.vasicek.prior_se
            )));
        }

        for (name, welch) in [("welch", &self.welch), ("aged_welch", &self.aged_welch)] {
            if !(welch.delta >= 0.0 && welch.delta.is_finite()) {
                return Err(EstimatorError::InvalidConfiguration(format!(
                    "{name}.delta must be non-negative, got {}",
                    welch.delta
                )));
            }
            if !(welch.rho >= 0.0 && welch.rho.is_finite()) {
                return Err(EstimatorError::InvalidConfiguration(format!(
                    "{name}.rho must be non-negative, got {}",
                    welch.rho
                )));
            }
        }

        for (name, value) in [
            ("robeco.gamma", self.robeco.gamma),
            ("robeco.phi", self.robeco.phi),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(EstimatorError::InvalidConfiguration(format!(
                    "{name} must lie in [0, 1], got {value}"
                )));
            }
        }

        Ok(())
    }
}
