//! Combiner configuration

use crate::CombineError;
use blume_estimators::EstimatorConfig;
use serde::{Deserialize, Serialize};

/// Configuration shared by both combiners
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombinerConfig {
    /// Length of the shortest expanding window, and of the held-out test
    /// window for stacking (default: 21, about one trading month)
    pub window_size: usize,

    /// Parameters of the per-window estimators
    pub estimators: EstimatorConfig,
}

impl Default for CombinerConfig {
    fn default() -> Self {
        Self {
            window_size: 21,
            estimators: EstimatorConfig::default(),
        }
    }
}

impl CombinerConfig {
    /// Reject a zero window and invalid estimator parameters
    pub fn validate(&self) -> Result<(), CombineError> {
        if self.window_size == 0 {
            return Err(CombineError::InvalidConfiguration(
                "window_size must be positive".to_string(),
            ));
        }
        self.estimators.validate()?;
        Ok(())
    }
}

/// Bayesian model averaging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BmaConfig {
    /// Window and estimator parameters
    #[serde(flatten)]
    pub combiner: CombinerConfig,

    /// Lag of the restricted autoregression of OLS beta on itself (default: 1)
    pub dof_r: usize,

    /// Explicit g-prior value. When `None` (the default) `g` is
    /// `1 / min(number of windows, number of subsets)`.
    pub shrinkage: Option<f64>,
}

impl Default for BmaConfig {
    fn default() -> Self {
        Self {
            combiner: CombinerConfig::default(),
            dof_r: 1,
            shrinkage: None,
        }
    }
}

impl BmaConfig {
    /// Checks that do not depend on the data
    pub fn validate(&self) -> Result<(), CombineError> {
        self.combiner.validate()?;
        if self.dof_r == 0 {
            return Err(CombineError::InvalidConfiguration(
                "dof_r must be at least 1".to_string(),
            ));
        }
        if let Some(g) = self.shrinkage
            && !(g > 0.0 && g.is_finite())
        {
            return Err(CombineError::InvalidConfiguration(format!(
                "shrinkage must be positive and finite, got {g}"
            )));
        }
        Ok(())
    }
}
