//! Estimator vectors and matrices
//!
//! An [`EstimatorSet`] fixes which methods are run and in which column order.
//! Downstream combiners refer to the OLS column by position, so the set keeps
//! OLS at [`OLS_INDEX`] and refuses to be built otherwise.

use crate::{BetaMethod, EstimatorConfig, EstimatorError, ReturnWindow, WindowBeta};
use derive_more::{From, Into};
use ndarray::{Array1, Array2, ArrayView1};

/// Column holding the OLS estimate in every estimator vector and matrix
pub const OLS_INDEX: usize = 0;

/// Beta estimates for one window, ordered like the producing [`EstimatorSet`]
#[derive(Debug, Clone, PartialEq, From, Into)]
pub struct EstimatorVector(Array1<f64>);

impl EstimatorVector {
    /// Estimates as a view
    pub fn values(&self) -> ArrayView1<'_, f64> {
        self.0.view()
    }

    /// Number of estimates
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the vector is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The OLS estimate
    pub fn ols(&self) -> f64 {
        self.0[OLS_INDEX]
    }
}

/// Beta estimates over a sequence of windows: rows are windows in
/// chronological order, columns are methods
#[derive(Debug, Clone, PartialEq)]
pub struct EstimatorMatrix {
    values: Array2<f64>,
}

impl EstimatorMatrix {
    /// Raw `windows × methods` matrix
    pub const fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Number of windows
    pub fn n_windows(&self) -> usize {
        self.values.nrows()
    }

    /// Number of methods
    pub fn n_methods(&self) -> usize {
        self.values.ncols()
    }

    /// OLS estimates across windows
    pub fn ols_column(&self) -> ArrayView1<'_, f64> {
        self.values.column(OLS_INDEX)
    }
}

/// Ordered list of beta methods with OLS first
#[derive(Debug, Clone, PartialEq)]
pub struct EstimatorSet {
    methods: Vec<BetaMethod>,
}

impl Default for EstimatorSet {
    /// The six-method suite used for forecast combination. Scholes-Williams
    /// is available but not included.
    fn default() -> Self {
        Self {
            methods: vec![
                BetaMethod::Ols,
                BetaMethod::AdjustedOls,
                BetaMethod::Vasicek,
                BetaMethod::Welch,
                BetaMethod::AgedWelch,
                BetaMethod::Robeco,
            ],
        }
    }
}

impl EstimatorSet {
    /// Build a custom set
    ///
    /// # Errors
    /// [`EstimatorError::InvalidConfiguration`] unless the set has at least two
    /// distinct methods with [`BetaMethod::Ols`] at [`OLS_INDEX`].
    pub fn new(methods: Vec<BetaMethod>) -> Result<Self, EstimatorError> {
        if methods.len() < 2 {
            return Err(EstimatorError::InvalidConfiguration(format!(
                "an estimator set needs at least two methods, got {}",
                methods.len()
            )));
        }
        if methods[OLS_INDEX] != BetaMethod::Ols {
            return Err(EstimatorError::InvalidConfiguration(format!(
                "ols must occupy column {OLS_INDEX}, found {}",
                methods[OLS_INDEX]
            )));
        }
        for (i, method) in methods.iter().enumerate() {
            if methods[..i].contains(method) {
                return Err(EstimatorError::InvalidConfiguration(format!(
                    "duplicate method {method}"
                )));
            }
        }
        Ok(Self { methods })
    }

    /// Methods in column order
    pub fn methods(&self) -> &[BetaMethod] {
        &self.methods
    }

    /// Number of methods
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Always false; a set holds at least two methods
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Shortest window every method in the set accepts
    pub fn min_observations(&self) -> usize {
        self.methods
            .iter()
            .map(|m| m.min_observations())
            .max()
            .unwrap_or(0)
    }

    /// Evaluate every method on one window
    pub fn estimate(
        &self,
        window: ReturnWindow<'_>,
        config: &EstimatorConfig,
    ) -> Result<EstimatorVector, EstimatorError> {
        let required = self.min_observations();
        if window.len() < required {
            return Err(EstimatorError::InsufficientData {
                required,
                actual: window.len(),
            });
        }
        let beta = WindowBeta::new(window)?;
        let values = self
            .methods
            .iter()
            .map(|method| method.estimate(&beta, config))
            .collect::<Result<Array1<f64>, _>>()?;
        Ok(EstimatorVector(values))
    }

    /// Evaluate every method on each window, one row per window
    pub fn estimate_windows<'a, I>(
        &self,
        windows: I,
        config: &EstimatorConfig,
    ) -> Result<EstimatorMatrix, EstimatorError>
    where
        I: IntoIterator<Item = ReturnWindow<'a>>,
    {
        let mut flat = Vec::new();
        let mut n_windows = 0;
        for window in windows {
            flat.extend(self.estimate(window, config)?.0.iter().copied());
            n_windows += 1;
        }
        tracing::trace!(
            windows = n_windows,
            methods = self.len(),
            "estimator matrix built"
        );

        let values = Array2::from_shape_vec((n_windows, self.len()), flat)
            .map_err(|e| EstimatorError::InvalidConfiguration(e.to_string()))?;
        Ok(EstimatorMatrix { values })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ExpandingWindows, ReturnSeries};
    use approx::assert_abs_diff_eq;

    fn series() -> ReturnSeries {
        let exog: Vec<f64> = (0..40)
            .map(|t| 0.01 * ((t as f64) * 0.7).sin() + 0.002)
            .collect();
        let endog = exog
            .iter()
            .enumerate()
            .map(|(t, x)| 1.3 * x + 0.001 * ((t as f64) * 1.9).cos())
            .collect();
        ReturnSeries::from_vecs(exog, endog).unwrap()
    }

    #[test]
    fn test_default_set_order() {
        let set = EstimatorSet::default();
        assert_eq!(set.len(), 6);
        assert_eq!(set.methods()[OLS_INDEX], BetaMethod::Ols);
        assert_eq!(set.methods()[5], BetaMethod::Robeco);
        assert!(!set.methods().contains(&BetaMethod::ScholesWilliams));
        assert_eq!(set.min_observations(), 3);
    }

    #[test]
    fn test_ols_must_come_first() {
        let err = EstimatorSet::new(vec![BetaMethod::Vasicek, BetaMethod::Ols]).unwrap_err();
        assert!(matches!(err, EstimatorError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_duplicates_rejected() {
        let err = EstimatorSet::new(vec![BetaMethod::Ols, BetaMethod::Welch, BetaMethod::Welch])
            .unwrap_err();
        assert!(matches!(err, EstimatorError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_single_method_rejected() {
        assert!(EstimatorSet::new(vec![BetaMethod::Ols]).is_err());
    }

    #[test]
    fn test_vector_matches_methods() {
        let series = series();
        let set = EstimatorSet::default();
        let config = EstimatorConfig::default();
        let vector = set.estimate(series.view(), &config).unwrap();
        let beta = WindowBeta::new(series.view()).unwrap();

        assert_eq!(vector.len(), 6);
        assert_abs_diff_eq!(vector.ols(), beta.ols().unwrap());
        assert_abs_diff_eq!(vector.values()[2], beta.vasicek(&config.vasicek).unwrap());
        assert_abs_diff_eq!(vector.values()[5], beta.robeco(&config.robeco).unwrap());
    }

    #[test]
    fn test_matrix_rows_follow_windows() {
        let series = series();
        let set = EstimatorSet::default();
        let config = EstimatorConfig::default();
        let windows = ExpandingWindows::new(series.view(), 21).unwrap();
        let matrix = set.estimate_windows(windows, &config).unwrap();

        assert_eq!(matrix.n_windows(), 19);
        assert_eq!(matrix.n_methods(), 6);

        let last = set.estimate(series.view().prefix(39), &config).unwrap();
        assert_eq!(matrix.values().row(18), last.values());
        assert_eq!(matrix.ols_column()[18], last.ols());
    }

    #[test]
    fn test_short_window_rejected_before_regression() {
        let series = ReturnSeries::from_vecs(vec![0.01, 0.02], vec![0.01, 0.03]).unwrap();
        let err = EstimatorSet::default()
            .estimate(series.view(), &EstimatorConfig::default())
            .unwrap_err();
        assert_eq!(
            err,
            EstimatorError::InsufficientData {
                required: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn test_custom_set_with_scholes_williams() {
        let series = series();
        let set = EstimatorSet::new(vec![BetaMethod::Ols, BetaMethod::ScholesWilliams]).unwrap();
        let vector = set
            .estimate(series.view(), &EstimatorConfig::default())
            .unwrap();
        let expected = WindowBeta::new(series.view())
            .unwrap()
            .scholes_williams()
            .unwrap();
        assert_abs_diff_eq!(vector.values()[1], expected);
    }
}
