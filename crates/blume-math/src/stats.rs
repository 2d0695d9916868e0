//! Summary statistics over return windows

use crate::LinalgError;
use ndarray::ArrayView1;

/// Arithmetic mean
pub fn mean(x: ArrayView1<'_, f64>) -> Result<f64, LinalgError> {
    x.mean().ok_or(LinalgError::Empty("mean of an empty series"))
}

/// Standard deviation with `ddof` delta degrees of freedom
///
/// `ddof = 0` gives the population estimator, `ddof = 1` the sample one.
pub fn std_dev(x: ArrayView1<'_, f64>, ddof: usize) -> Result<f64, LinalgError> {
    if x.len() <= ddof {
        return Err(LinalgError::DimensionMismatch {
            expected: ddof + 1,
            actual: x.len(),
        });
    }
    let mu = mean(x)?;
    let ss = x.iter().map(|v| (v - mu).powi(2)).sum::<f64>();
    Ok((ss / (x.len() - ddof) as f64).sqrt())
}

/// Pearson correlation of two equally long series
///
/// Returns NaN when either series has zero variance.
pub fn pearson_correlation(
    x: ArrayView1<'_, f64>,
    y: ArrayView1<'_, f64>,
) -> Result<f64, LinalgError> {
    if x.len() != y.len() {
        return Err(LinalgError::DimensionMismatch {
            expected: x.len(),
            actual: y.len(),
        });
    }
    let (mx, my) = (mean(x)?, mean(y)?);

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (a, b) in x.iter().zip(y.iter()) {
        let (dx, dy) = (a - mx, b - my);
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    Ok(sxy / (sxx * syy).sqrt())
}

/// Correlation between a series and itself shifted by `lag` periods
///
/// Computed as the Pearson correlation of `x[lag..]` against `x[..n - lag]`.
pub fn autocorrelation(x: ArrayView1<'_, f64>, lag: usize) -> Result<f64, LinalgError> {
    let n = x.len();
    if n < lag + 2 {
        return Err(LinalgError::DimensionMismatch {
            expected: lag + 2,
            actual: n,
        });
    }
    pearson_correlation(x.slice(ndarray::s![lag..]), x.slice(ndarray::s![..n - lag]))
}
