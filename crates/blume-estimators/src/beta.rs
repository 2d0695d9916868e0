//! Market beta estimators over a single window
//!
//! Every estimator regresses (some transformation of) the asset returns on
//! the market returns of the same window:
//!
//! - OLS: slope of `endog ~ 1 + exog`
//! - Adjusted OLS (Blume, 1975): `0.67·β + 0.33`
//! - Vasicek (1973): precision-weighted blend of a prior and the OLS slope
//! - Welch (2021): OLS on slope-winsorized asset returns, optionally with
//!   exponential recency weights
//! - Robeco (Blitz et al., 2022): shrunk correlation × shrunk volatility ratio
//! - Scholes-Williams (1977): lead, lag and contemporaneous slopes corrected
//!   for market autocorrelation
//!
//! # References
//! - Blume, M. E. (1975). "Betas and Their Regression Tendencies."
//!   The Journal of Finance, 30(3), 785-795.
//! - Vasicek, O. A. (1973). "A Note on Using Cross-Sectional Information in
//!   Bayesian Estimation of Security Betas." The Journal of Finance, 28(5).
//! - Welch, I. (2021). "Simply Better Market Betas." SSRN.
//! - Blitz, D., Swinkels, L., Ūsaitė, K., & van Vliet, P. (2022).
//!   "Shrinking Beta." SSRN.
//! - Scholes, M., & Williams, J. (1977). "Estimating Betas from
//!   Nonsynchronous Data." Journal of Financial Economics, 5(3), 309-327.

use crate::{
    BlumeConfig, EstimatorError, RobecoConfig, ReturnWindow, VasicekConfig, WelchConfig,
    weighted_ols,
};
use blume_math::{add_intercept, autocorrelation, pearson_correlation, std_dev};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis, Zip, s};

/// Smallest window any estimator accepts
pub const MIN_OBSERVATIONS: usize = 2;

/// The three slopes and the autocorrelation behind a Scholes-Williams beta
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScholesWilliamsComponents {
    /// Slope of `endog[t]` on `exog[t + 1]`
    pub lead: f64,
    /// Contemporaneous OLS slope
    pub contemporaneous: f64,
    /// Slope of `endog[t + 1]` on `exog[t]`
    pub lag: f64,
    /// First-order autocorrelation of the market returns
    pub autocorr: f64,
}

impl ScholesWilliamsComponents {
    /// Combined beta: `(lag + contemporaneous + lead) / (1 + 2·autocorr)`
    pub fn beta(&self) -> f64 {
        (self.lag + self.contemporaneous + self.lead) / (1.0 + 2.0 * self.autocorr)
    }
}

/// Beta estimators bound to one window of paired returns
///
/// The `[1, exog]` design matrix is built once and shared by every
/// regression-based estimator.
#[derive(Debug, Clone)]
pub struct WindowBeta<'a> {
    window: ReturnWindow<'a>,
    design: Array2<f64>,
}

impl<'a> WindowBeta<'a> {
    /// Bind the estimators to `window`
    ///
    /// # Errors
    /// [`EstimatorError::InsufficientData`] for windows shorter than two
    /// observations.
    pub fn new(window: ReturnWindow<'a>) -> Result<Self, EstimatorError> {
        if window.len() < MIN_OBSERVATIONS {
            return Err(EstimatorError::InsufficientData {
                required: MIN_OBSERVATIONS,
                actual: window.len(),
            });
        }
        let design = add_intercept(window.exog().insert_axis(Axis(1)));
        Ok(Self { window, design })
    }

    /// Number of observations in the window
    pub fn n_obs(&self) -> usize {
        self.window.len()
    }

    /// The underlying window
    pub const fn window(&self) -> &ReturnWindow<'a> {
        &self.window
    }

    fn require(&self, required: usize) -> Result<(), EstimatorError> {
        if self.n_obs() < required {
            return Err(EstimatorError::InsufficientData {
                required,
                actual: self.n_obs(),
            });
        }
        Ok(())
    }

    /// Slope of `y` on `design`, optionally weighted
    fn slope(
        design: ArrayView2<'_, f64>,
        y: ArrayView1<'_, f64>,
        weights: Option<ArrayView1<'_, f64>>,
    ) -> Result<f64, EstimatorError> {
        let coefficients = weighted_ols(design, y, weights, false)?;
        Ok(coefficients[coefficients.len() - 1])
    }

    /// Classic OLS beta
    pub fn ols(&self) -> Result<f64, EstimatorError> {
        Self::slope(self.design.view(), self.window.endog(), None)
    }

    /// OLS beta shrunk toward the market (Blume / Merrill Lynch adjustment)
    pub fn adjusted_ols(&self, config: &BlumeConfig) -> Result<f64, EstimatorError> {
        let beta = self.ols()?;
        Ok(config.weight * beta + (1.0 - config.weight) * config.target)
    }

    /// Vasicek posterior mean of beta
    ///
    /// The OLS standard error is `sqrt((SSR / (n - 2)) / Σ(x - x̄)²)`. A window
    /// fitted exactly has zero standard error, in which case the data
    /// dominate the prior completely and the OLS slope is returned.
    pub fn vasicek(&self, config: &VasicekConfig) -> Result<f64, EstimatorError> {
        self.require(3)?;
        let n = self.n_obs() as f64;
        let exog = self.window.exog();
        let endog = self.window.endog();

        let coefficients = weighted_ols(self.design.view(), endog, None, false)?;
        let beta = coefficients[1];

        let residuals = &endog - &self.design.dot(&coefficients);
        let s_yy = residuals.dot(&residuals) / (n - 2.0);
        let x_mean = exog.mean().unwrap_or(0.0);
        let s_xx = exog.iter().map(|x| (x - x_mean).powi(2)).sum::<f64>();
        let se_sq = s_yy / s_xx;

        if se_sq == 0.0 {
            return Ok(beta);
        }

        let prior_precision = 1.0 / config.prior_se.powi(2);
        let sample_precision = 1.0 / se_sq;
        Ok(
            (config.prior_beta * prior_precision + beta * sample_precision)
                / (prior_precision + sample_precision),
        )
    }

    /// Welch slope-winsorized beta
    ///
    /// Asset returns are clipped into the band spanned by `(1 - δ)·x` and
    /// `(1 + δ)·x`, whichever order the sign of `x` puts them in. With
    /// `rho > 0` observation `t` gets weight `exp(-ρ·(n - 1 - t))`, so the most
    /// recent observation always has weight one.
    pub fn welch(&self, config: &WelchConfig) -> Result<f64, EstimatorError> {
        let n = self.n_obs();
        let mut winsorized = Array1::<f64>::zeros(n);
        Zip::from(&mut winsorized)
            .and(self.window.exog())
            .and(self.window.endog())
            .for_each(|out, &x, &y| {
                let a = (1.0 - config.delta) * x;
                let b = (1.0 + config.delta) * x;
                *out = y.max(a.min(b)).min(a.max(b));
            });

        let weights =
            Array1::from_iter((0..n).map(|t| (-config.rho * (n - 1 - t) as f64).exp()));
        Self::slope(self.design.view(), winsorized.view(), Some(weights.view()))
    }

    /// Robeco beta: shrunk correlation times shrunk volatility ratio
    ///
    /// Both ingredients are pulled linearly toward cross-sectional targets:
    /// `shrunk = (1 - w)·raw + w·target`.
    pub fn robeco(&self, config: &RobecoConfig) -> Result<f64, EstimatorError> {
        let exog = self.window.exog();
        let endog = self.window.endog();

        let exog_vol = std_dev(exog, 0)?;
        if exog_vol == 0.0 {
            return Err(EstimatorError::Degenerate("market returns have zero variance"));
        }
        let corr = pearson_correlation(exog, endog)?;
        if corr.is_nan() {
            return Err(EstimatorError::Degenerate("asset returns have zero variance"));
        }

        let corr_shrunk = (1.0 - config.gamma) * corr + config.gamma * config.corr_target;
        let vol_ratio = std_dev(endog, 0)? / exog_vol;
        let vol_shrunk = (1.0 - config.phi) * vol_ratio + config.phi * config.vol_target;
        Ok(corr_shrunk * vol_shrunk)
    }

    /// Lead, lag and contemporaneous slopes plus market autocorrelation
    pub fn scholes_williams_components(&self) -> Result<ScholesWilliamsComponents, EstimatorError> {
        self.require(3)?;
        let n = self.n_obs();
        let endog = self.window.endog();

        let lead = Self::slope(
            self.design.slice(s![1.., ..]),
            endog.slice(s![..n - 1]),
            None,
        )?;
        let lag = Self::slope(
            self.design.slice(s![..n - 1, ..]),
            endog.slice(s![1..]),
            None,
        )?;
        let contemporaneous = self.ols()?;
        let autocorr = autocorrelation(self.window.exog(), 1)?;

        Ok(ScholesWilliamsComponents {
            lead,
            contemporaneous,
            lag,
            autocorr,
        })
    }

    /// Scholes-Williams beta for nonsynchronous trading
    pub fn scholes_williams(&self) -> Result<f64, EstimatorError> {
        let components = self.scholes_williams_components()?;
        if components.autocorr.is_nan() {
            return Err(EstimatorError::Degenerate(
                "market autocorrelation is undefined",
            ));
        }
        let beta = components.beta();
        if !beta.is_finite() {
            return Err(EstimatorError::Degenerate(
                "market autocorrelation of -0.5 leaves no Scholes-Williams denominator",
            ));
        }
        Ok(beta)
    }
}
