//! Paired market / asset return series
//!
//! Element `i` of `exog` (market) and `endog` (asset) always refer to the same
//! period. The owning [`ReturnSeries`] validates this once at construction;
//! every [`ReturnWindow`] derived from it is a borrowed contiguous slice and
//! inherits the alignment.

use crate::EstimatorError;
use ndarray::{Array1, ArrayView1, Axis, s};

/// Owned pair of aligned, finite return series
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnSeries {
    exog: Array1<f64>,
    endog: Array1<f64>,
}

impl ReturnSeries {
    /// Build a series from market returns (`exog`) and asset returns (`endog`)
    ///
    /// # Errors
    /// [`EstimatorError::LengthMismatch`] for unequal lengths and
    /// [`EstimatorError::NonFiniteReturn`] for NaN or infinite values.
    pub fn new(exog: Array1<f64>, endog: Array1<f64>) -> Result<Self, EstimatorError> {
        if exog.len() != endog.len() {
            return Err(EstimatorError::LengthMismatch {
                exog: exog.len(),
                endog: endog.len(),
            });
        }
        if let Some(index) = exog
            .iter()
            .zip(endog.iter())
            .position(|(x, y)| !x.is_finite() || !y.is_finite())
        {
            return Err(EstimatorError::NonFiniteReturn { index });
        }
        Ok(Self { exog, endog })
    }

    /// Convenience constructor from plain vectors
    pub fn from_vecs(exog: Vec<f64>, endog: Vec<f64>) -> Result<Self, EstimatorError> {
        Self::new(Array1::from_vec(exog), Array1::from_vec(endog))
    }

    /// Number of periods
    pub fn len(&self) -> usize {
        self.exog.len()
    }

    /// Whether the series holds no observations
    pub fn is_empty(&self) -> bool {
        self.exog.is_empty()
    }

    /// Market returns
    pub fn exog(&self) -> ArrayView1<'_, f64> {
        self.exog.view()
    }

    /// Asset returns
    pub fn endog(&self) -> ArrayView1<'_, f64> {
        self.endog.view()
    }

    /// Borrow the whole series as a window
    pub fn view(&self) -> ReturnWindow<'_> {
        ReturnWindow {
            exog: self.exog.view(),
            endog: self.endog.view(),
        }
    }
}

/// Borrowed contiguous slice of a [`ReturnSeries`]
#[derive(Debug, Clone, Copy)]
pub struct ReturnWindow<'a> {
    exog: ArrayView1<'a, f64>,
    endog: ArrayView1<'a, f64>,
}

impl<'a> ReturnWindow<'a> {
    /// Wrap two aligned views
    ///
    /// Values are not re-checked for finiteness; prefer [`ReturnSeries::view`].
    pub fn new(
        exog: ArrayView1<'a, f64>,
        endog: ArrayView1<'a, f64>,
    ) -> Result<Self, EstimatorError> {
        if exog.len() != endog.len() {
            return Err(EstimatorError::LengthMismatch {
                exog: exog.len(),
                endog: endog.len(),
            });
        }
        Ok(Self { exog, endog })
    }

    /// Number of periods in the window
    pub fn len(&self) -> usize {
        self.exog.len()
    }

    /// Whether the window is empty
    pub fn is_empty(&self) -> bool {
        self.exog.is_empty()
    }

    /// Market returns
    pub const fn exog(&self) -> ArrayView1<'a, f64> {
        self.exog
    }

    /// Asset returns
    pub const fn endog(&self) -> ArrayView1<'a, f64> {
        self.endog
    }

    /// First `len` observations (clamped to the window length)
    pub fn prefix(&self, len: usize) -> Self {
        let len = len.min(self.len());
        Self {
            exog: self.exog.slice_move(s![..len]),
            endog: self.endog.slice_move(s![..len]),
        }
    }

    /// Split into `[..at]` and `[at..]` (with `at` clamped to the window length)
    pub fn split_at(&self, at: usize) -> (Self, Self) {
        let at = at.min(self.len());
        let (exog_head, exog_tail) = self.exog.split_at(Axis(0), at);
        let (endog_head, endog_tail) = self.endog.split_at(Axis(0), at);
        (
            Self {
                exog: exog_head,
                endog: endog_head,
            },
            Self {
                exog: exog_tail,
                endog: endog_tail,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series() -> ReturnSeries {
        ReturnSeries::from_vecs(vec![0.1, 0.2, 0.3, 0.4], vec![1.0, 2.0, 3.0, 4.0]).unwrap()
    }

    #[test]
    fn test_length_mismatch() {
        let err = ReturnSeries::from_vecs(vec![0.1, 0.2], vec![0.1]).unwrap_err();
        assert_eq!(err, EstimatorError::LengthMismatch { exog: 2, endog: 1 });
    }

    #[test]
    fn test_non_finite_rejected() {
        let err = ReturnSeries::from_vecs(vec![0.1, f64::NAN], vec![0.1, 0.2]).unwrap_err();
        assert_eq!(err, EstimatorError::NonFiniteReturn { index: 1 });
    }

    #[test]
    fn test_prefix_and_split() {
        let series = series();
        let window = series.view();

        let prefix = window.prefix(3);
        assert_eq!(prefix.len(), 3);
        assert_eq!(prefix.endog().to_vec(), vec![1.0, 2.0, 3.0]);

        let (head, tail) = window.split_at(1);
        assert_eq!(head.exog().to_vec(), vec![0.1]);
        assert_eq!(tail.exog().to_vec(), vec![0.2, 0.3, 0.4]);
        assert_eq!(tail.endog().to_vec(), vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_window_from_views() {
        let exog = ndarray::array![0.01, -0.02, 0.03];
        let endog = ndarray::array![0.02, -0.01, 0.04];
        let window = ReturnWindow::new(exog.view(), endog.view()).unwrap();
        assert_eq!(window.len(), 3);
        assert_eq!(window.endog(), endog.view());

        let err = ReturnWindow::new(exog.view(), endog.slice(s![..2])).unwrap_err();
        assert_eq!(err, EstimatorError::LengthMismatch { exog: 3, endog: 2 });
    }

    #[test]
    fn test_prefix_clamps() {
        let series = series();
        assert_eq!(series.view().prefix(10).len(), 4);
        assert_eq!(series.view().split_at(10).1.len(), 0);
    }
}
