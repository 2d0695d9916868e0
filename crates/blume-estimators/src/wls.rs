//! Weighted least squares through the normal equations

use crate::EstimatorError;
use blume_math::inverse;
use ndarray::{Array1, ArrayView1, ArrayView2, Axis};

/// Solve `(XᵀWX)⁻¹ XᵀWy` for a diagonal weight matrix `W`
///
/// # Arguments
/// * `design` - Design matrix whose first column is the intercept
/// * `y` - Dependent variable
/// * `weights` - Diagonal of `W`; `None` means unit weights
/// * `demean` - Center every regressor column except the leading intercept
///
/// # Errors
/// A singular `XᵀWX` (zero-variance regressor, fewer observations than
/// columns) surfaces as [`EstimatorError::Linalg`].
pub fn weighted_ols(
    design: ArrayView2<'_, f64>,
    y: ArrayView1<'_, f64>,
    weights: Option<ArrayView1<'_, f64>>,
    demean: bool,
) -> Result<Array1<f64>, EstimatorError> {
    let n = design.nrows();
    if y.len() != n {
        return Err(EstimatorError::LengthMismatch {
            exog: n,
            endog: y.len(),
        });
    }
    if let Some(w) = weights
        && w.len() != n
    {
        return Err(EstimatorError::InvalidConfiguration(format!(
            "expected {n} regression weights, got {}",
            w.len()
        )));
    }

    let mut x = design.to_owned();
    if demean {
        for mut column in x.columns_mut().into_iter().skip(1) {
            let mu = column.mean().unwrap_or(0.0);
            column.mapv_inplace(|v| v - mu);
        }
    }

    let xw = match weights {
        Some(w) => &x * &w.insert_axis(Axis(1)),
        None => x.clone(),
    };

    let xtwx = x.t().dot(&xw);
    let xtwy = xw.t().dot(&y);
    Ok(inverse(&xtwx)?.dot(&xtwy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use blume_math::add_intercept;
    use ndarray::{Array2, array};

    fn design(x: &Array1<f64>) -> Array2<f64> {
        add_intercept(x.view().insert_axis(Axis(1)))
    }

    #[test]
    fn test_exact_line() {
        let x = array![1.0, 2.0, 3.0, 4.0, 5.0];
        let y = x.mapv(|v| 0.5 + 1.5 * v);
        let beta = weighted_ols(design(&x).view(), y.view(), None, false).unwrap();

        assert_abs_diff_eq!(beta[0], 0.5, epsilon = 1e-10);
        assert_abs_diff_eq!(beta[1], 1.5, epsilon = 1e-10);
    }

    #[test]
    fn test_weights_ignore_zero_weighted_outlier() {
        let x = array![1.0, 2.0, 3.0, 4.0, 5.0];
        let mut y = x.mapv(|v| 2.0 * v);
        y[4] = 100.0;
        let w = array![1.0, 1.0, 1.0, 1.0, 0.0];
        let beta = weighted_ols(design(&x).view(), y.view(), Some(w.view()), false).unwrap();

        assert_abs_diff_eq!(beta[1], 2.0, epsilon = 1e-10);
    }

    #[test]
    fn test_demean_keeps_slope() {
        let x = array![0.01, -0.02, 0.03, 0.00, 0.015];
        let y = array![0.012, -0.018, 0.041, 0.002, 0.010];
        let raw = weighted_ols(design(&x).view(), y.view(), None, false).unwrap();
        let centered = weighted_ols(design(&x).view(), y.view(), None, true).unwrap();

        assert_abs_diff_eq!(raw[1], centered[1], epsilon = 1e-12);
        // With a centered regressor the intercept is the mean of y
        assert_abs_diff_eq!(centered[0], y.mean().unwrap(), epsilon = 1e-12);
    }

    #[test]
    fn test_tiny_returns_are_not_singular() {
        let x = array![1e-7, -2e-7, 3e-7, 0.5e-7, -1.5e-7];
        let y = x.mapv(|v| 2e-8 + 1.5 * v);
        let beta = weighted_ols(design(&x).view(), y.view(), None, false).unwrap();

        assert_abs_diff_eq!(beta[1], 1.5, epsilon = 1e-6);
    }

    #[test]
    fn test_constant_regressor_is_singular() {
        let x = array![0.01, 0.01, 0.01, 0.01];
        let y = array![0.02, 0.01, 0.03, 0.00];
        let err = weighted_ols(design(&x).view(), y.view(), None, false).unwrap_err();
        assert!(err.is_singular());
    }

    #[test]
    fn test_weight_length_mismatch() {
        let x = array![1.0, 2.0, 3.0];
        let y = array![1.0, 2.0, 3.0];
        let w = array![1.0, 1.0];
        assert!(matches!(
            weighted_ols(design(&x).view(), y.view(), Some(w.view()), false),
            Err(EstimatorError::InvalidConfiguration(_))
        ));
    }
}
