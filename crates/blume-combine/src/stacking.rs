//! Stacking forecast combiner
//!
//! The series is split into a training part and a held-out test window of
//! `window_size` observations. Estimator vectors are computed on expanding
//! windows over the training part, and the next window's OLS beta is
//! regressed on the current window's full vector:
//!
//! ```text
//! B[1.., OLS] ≈ [1, B[..-1, :]] · w
//! ```
//!
//! The forecast applies `w` to the estimator vector of the test window.

use crate::{CombineError, CombinerConfig};
use blume_estimators::{EstimatorSet, EstimatorVector, ExpandingWindows, ReturnSeries};
use blume_math::{add_intercept, least_squares};
use ndarray::{Array1, ArrayView1, s};
use tracing::{debug, warn};

/// Intercept plus linear combination of an estimator vector
pub(crate) fn apply_weights(weights: ArrayView1<'_, f64>, vector: ArrayView1<'_, f64>) -> f64 {
    weights[0] + weights.slice(s![1..]).dot(&vector)
}

/// Stacking combiner of the estimator suite
#[derive(Debug, Clone)]
pub struct ForecastCombiner {
    config: CombinerConfig,
    estimators: EstimatorSet,
    weights: Option<Array1<f64>>,
}

impl ForecastCombiner {
    /// Combiner over the default six-method suite
    pub fn new(config: CombinerConfig) -> Self {
        Self::with_estimators(config, EstimatorSet::default())
    }

    /// Combiner over a custom estimator set
    pub const fn with_estimators(config: CombinerConfig, estimators: EstimatorSet) -> Self {
        Self {
            config,
            estimators,
            weights: None,
        }
    }

    /// Configuration in use
    pub const fn config(&self) -> &CombinerConfig {
        &self.config
    }

    /// Estimators whose outputs are combined
    pub const fn estimators(&self) -> &EstimatorSet {
        &self.estimators
    }

    /// Weights from the last successful fit: intercept first, then one entry
    /// per estimator
    pub fn weights(&self) -> Option<ArrayView1<'_, f64>> {
        self.weights.as_ref().map(|w| w.view())
    }

    /// Fit the stacking weights and forecast beta for the held-out window
    ///
    /// Requires at least `2 * window_size + 2` observations so that the
    /// training part yields two or more windows. The stored weights are only
    /// replaced once the whole fit succeeds.
    ///
    /// # Errors
    /// [`CombineError::InvalidConfiguration`] for a zero window,
    /// [`CombineError::InsufficientData`] for a short series or a window
    /// shorter than the estimators accept, and any error raised by the
    /// per-window estimators.
    pub fn fit(&mut self, series: &ReturnSeries) -> Result<f64, CombineError> {
        self.config.validate()?;
        let window_size = self.config.window_size;
        let min_obs = self.estimators.min_observations();
        if window_size < min_obs {
            return Err(CombineError::InsufficientData {
                required: min_obs,
                actual: window_size,
            });
        }

        let required = 2 * window_size + 2;
        if series.len() < required {
            return Err(CombineError::InsufficientData {
                required,
                actual: series.len(),
            });
        }

        let (train, test) = series.view().split_at(series.len() - window_size);
        let windows = ExpandingWindows::new(train, window_size)?;
        debug!(
            observations = series.len(),
            windows = windows.len(),
            methods = self.estimators.len(),
            "fitting stacking combiner"
        );

        let estimates = self
            .estimators
            .estimate_windows(windows, &self.config.estimators)?;
        let n_windows = estimates.n_windows();
        let design = add_intercept(estimates.values().slice(s![..n_windows - 1, ..]));
        let target = estimates.ols_column().slice_move(s![1..]);

        let fit = least_squares(&design, target)?;
        if fit.is_rank_deficient() {
            warn!(
                rank = fit.rank,
                columns = design.ncols(),
                "stacking design is rank deficient, using minimum-norm weights"
            );
        }

        let test_vector = self.estimators.estimate(test, &self.config.estimators)?;
        let forecast = apply_weights(fit.coefficients.view(), test_vector.values());
        debug!(forecast, ssr = fit.ssr, "stacking combiner fitted");

        self.weights = Some(fit.coefficients);
        Ok(forecast)
    }

    /// Apply the fitted weights to an estimator vector
    ///
    /// # Errors
    /// [`CombineError::NotFitted`] before a successful [`fit`](Self::fit) and
    /// [`CombineError::DimensionMismatch`] when `vector` comes from a
    /// different estimator set.
    pub fn forecast(&self, vector: &EstimatorVector) -> Result<f64, CombineError> {
        let weights = self.weights.as_ref().ok_or(CombineError::NotFitted)?;
        if vector.len() + 1 != weights.len() {
            return Err(CombineError::DimensionMismatch {
                expected: weights.len() - 1,
                actual: vector.len(),
            });
        }
        Ok(apply_weights(weights.view(), vector.values()))
    }
}
