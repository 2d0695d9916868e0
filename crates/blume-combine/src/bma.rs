//! Bayesian model averaging over estimator subsets
//!
//! Each proper subset `C` of the estimator columns defines a lag-one model of
//! the next window's OLS beta:
//!
//! ```text
//! B[t+1, OLS] = a + B[t, C] · b + e
//! ```
//!
//! Models are weighted with Zellner g-prior Bayes factors against a
//! restricted autoregression of OLS beta on its own `dof_r`-th lag:
//!
//! ```text
//! w_C ∝ (g / (1 + g))^(|C| / 2) · (1 + SSR_C / (g · SSR_r))^(-dof_r / 2)
//! ```
//!
//! Every model is applied to the estimator vector of the whole series and the
//! combined forecast is the posterior-weighted mean.

use crate::{BmaConfig, CombineError, Subsets, stacking::apply_weights};
use blume_estimators::{
    EstimatorMatrix, EstimatorSet, EstimatorVector, ExpandingWindows, OLS_INDEX, ReturnSeries,
};
use blume_math::{add_intercept, least_squares};
use ndarray::{Array1, Axis, s};
use tracing::{debug, trace, warn};

/// One fitted subset model
#[derive(Debug, Clone, PartialEq)]
pub struct SubsetModel {
    /// Estimator columns used as regressors, ascending
    pub subset: Vec<usize>,
    /// Full-length weights: intercept first, zero for excluded estimators
    pub weights: Array1<f64>,
    /// Residual sum of squares of the lag-one regression
    pub ssr: f64,
    /// Beta forecast of this model on the whole-series estimator vector
    pub forecast: f64,
}

impl SubsetModel {
    /// Number of regressors, excluding the intercept
    pub fn size(&self) -> usize {
        self.subset.len()
    }
}

/// Detailed result of a BMA fit
#[derive(Debug, Clone, PartialEq)]
pub struct BmaEstimate {
    /// Posterior-weighted beta forecast
    pub forecast: f64,
    /// Subset models in enumeration order
    pub models: Vec<SubsetModel>,
    /// Normalized posterior weight of each model, summing to one
    pub posterior: Array1<f64>,
    /// g-prior value used
    pub g: f64,
    /// Residual sum of squares of the restricted model
    pub ssr_restricted: f64,
}

/// Bayesian model averaging combiner
#[derive(Debug, Clone)]
pub struct BmaCombiner {
    config: BmaConfig,
    estimators: EstimatorSet,
}

impl BmaCombiner {
    /// Combiner over the default six-method suite
    pub fn new(config: BmaConfig) -> Self {
        Self::with_estimators(config, EstimatorSet::default())
    }

    /// Combiner over a custom estimator set
    pub const fn with_estimators(config: BmaConfig, estimators: EstimatorSet) -> Self {
        Self { config, estimators }
    }

    /// Configuration in use
    pub const fn config(&self) -> &BmaConfig {
        &self.config
    }

    /// Estimators whose outputs are combined
    pub const fn estimators(&self) -> &EstimatorSet {
        &self.estimators
    }

    /// BMA beta forecast
    pub fn fit(&self, series: &ReturnSeries) -> Result<f64, CombineError> {
        self.fit_detailed(series).map(|estimate| estimate.forecast)
    }

    /// BMA forecast together with every subset model and its posterior weight
    ///
    /// # Errors
    /// [`CombineError::InvalidConfiguration`] for invalid parameters or when
    /// `dof_r` leaves no observations for the restricted model,
    /// [`CombineError::InsufficientData`] when the series yields fewer than two
    /// windows or the window is shorter than the estimators accept, and any
    /// error raised by the per-window estimators.
    pub fn fit_detailed(&self, series: &ReturnSeries) -> Result<BmaEstimate, CombineError> {
        self.config.validate()?;
        let window_size = self.config.combiner.window_size;
        let min_obs = self.estimators.min_observations();
        if window_size < min_obs {
            return Err(CombineError::InsufficientData {
                required: min_obs,
                actual: window_size,
            });
        }

        let required = window_size + 2;
        if series.len() < required {
            return Err(CombineError::InsufficientData {
                required,
                actual: series.len(),
            });
        }
        let windows = ExpandingWindows::new(series.view(), window_size)?;
        let n_windows = windows.len();
        let dof_r = self.config.dof_r;
        if dof_r >= n_windows {
            return Err(CombineError::InvalidConfiguration(format!(
                "dof_r {dof_r} leaves no observations across {n_windows} windows"
            )));
        }

        let subsets = Subsets::proper(self.estimators.len());
        let n_subsets = subsets.len();
        let g = self
            .config
            .shrinkage
            .unwrap_or_else(|| 1.0 / n_windows.min(n_subsets).max(1) as f64);
        debug!(
            windows = n_windows,
            subsets = n_subsets,
            g,
            dof_r,
            "fitting bma combiner"
        );

        let estimates = self
            .estimators
            .estimate_windows(windows, &self.config.combiner.estimators)?;
        let full = self
            .estimators
            .estimate(series.view(), &self.config.combiner.estimators)?;
        let ssr_restricted = restricted_ssr(&estimates, dof_r)?;

        let models = subsets
            .map(|subset| fit_subset(&estimates, subset, &full))
            .collect::<Result<Vec<_>, _>>()?;

        let posterior = posterior_weights(&models, g, ssr_restricted, dof_r);
        let forecast: f64 = models
            .iter()
            .zip(posterior.iter())
            .map(|(model, weight)| weight * model.forecast)
            .sum();
        debug!(forecast, ssr_restricted, "bma combiner fitted");

        Ok(BmaEstimate {
            forecast,
            models,
            posterior,
            g,
            ssr_restricted,
        })
    }
}

/// SSR of `B[dof_r.., OLS]` regressed on `[1, B[..-dof_r, OLS]]`
fn restricted_ssr(estimates: &EstimatorMatrix, dof_r: usize) -> Result<f64, CombineError> {
    let n = estimates.n_windows();
    let values = estimates.values();
    let design = add_intercept(values.slice(s![..n - dof_r, OLS_INDEX..=OLS_INDEX]));
    let target = values.slice(s![dof_r.., OLS_INDEX]);
    Ok(least_squares(&design, target)?.ssr)
}

fn fit_subset(
    estimates: &EstimatorMatrix,
    subset: Vec<usize>,
    full: &EstimatorVector,
) -> Result<SubsetModel, CombineError> {
    let n = estimates.n_windows();
    let values = estimates.values();
    let lagged = values.slice(s![..n - 1, ..]).select(Axis(1), &subset);
    let design = add_intercept(lagged.view());
    let target = values.slice(s![1.., OLS_INDEX]);
    let fit = least_squares(&design, target)?;

    let mut weights = Array1::zeros(estimates.n_methods() + 1);
    weights[0] = fit.coefficients[0];
    for (coefficient, &column) in fit.coefficients.iter().skip(1).zip(&subset) {
        weights[column + 1] = *coefficient;
    }
    let forecast = apply_weights(weights.view(), full.values());
    trace!(?subset, ssr = fit.ssr, forecast, "subset model fitted");

    Ok(SubsetModel {
        subset,
        weights,
        ssr: fit.ssr,
        forecast,
    })
}

/// Normalized g-prior weights, computed in log space
///
/// A restricted model with zero residuals leaves the fit ratio undefined; the
/// weights then reduce to the complexity penalty alone.
fn posterior_weights(
    models: &[SubsetModel],
    g: f64,
    ssr_restricted: f64,
    dof_r: usize,
) -> Array1<f64> {
    let log_shrink = (g / (1.0 + g)).ln();
    let exact_restricted = ssr_restricted <= f64::EPSILON * f64::EPSILON;
    if exact_restricted {
        warn!(
            ssr_restricted,
            "restricted model fits exactly, weighting by model size only"
        );
    }

    let log_weights: Array1<f64> = models
        .iter()
        .map(|model| {
            let complexity = 0.5 * model.size() as f64 * log_shrink;
            if exact_restricted {
                complexity
            } else {
                let ratio = model.ssr / (g * ssr_restricted);
                complexity - 0.5 * dof_r as f64 * ratio.ln_1p()
            }
        })
        .collect();

    let max = log_weights.fold(f64::NEG_INFINITY, |a, &b| a.max(b));
    let unnormalized = log_weights.mapv(|l| (l - max).exp());
    let total = unnormalized.sum();
    unnormalized / total
}
