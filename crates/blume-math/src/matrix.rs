//! Design matrices, inverses and least squares
//!
//! Two flavours of solver are provided because the estimators and the
//! combiners want different failure behaviour:
//! - [`inverse`] is strict and reports a singular system as an error. Beta
//!   regressions on a single window use it through the normal equations.
//! - [`pseudo_inverse`] and [`least_squares`] never fail on rank deficiency and
//!   fall back to the minimum-norm solution, which the stacking and model
//!   averaging regressions rely on when estimator columns are collinear.

use crate::{LinalgError, svd::jacobi_svd};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis, s};

/// Pivots smaller than this fraction of their column's largest entry are
/// treated as zero
const SINGULAR_RTOL: f64 = 1e-12;

/// Singular values below this fraction of the largest are treated as zero
const SINGULAR_VALUE_RTOL: f64 = 1e-12;

/// Jacobi sweep limit for the pseudo-inverse
const MAX_SWEEPS: usize = 60;

/// Result of a pseudo-inverse least squares fit
#[derive(Debug, Clone)]
pub struct LeastSquares {
    /// Minimum-norm coefficient vector, one entry per design column
    pub coefficients: Array1<f64>,
    /// Residual sum of squares
    pub ssr: f64,
    /// Numerical rank of the design matrix
    pub rank: usize,
}

impl LeastSquares {
    /// Whether the design had fewer independent columns than columns
    pub fn is_rank_deficient(&self) -> bool {
        self.rank < self.coefficients.len()
    }
}

/// Prepend a column of ones to `x`
///
/// The result is the design matrix `[1, x]` with shape `n × (k + 1)`.
pub fn add_intercept(x: ArrayView2<'_, f64>) -> Array2<f64> {
    let (n, k) = x.dim();
    let mut design = Array2::<f64>::ones((n, k + 1));
    design.slice_mut(s![.., 1..]).assign(&x);
    design
}

/// Invert a square matrix with Gauss-Jordan elimination and partial pivoting
///
/// Each pivot is compared with the largest entry of its own column, so the
/// test does not depend on how the columns are scaled.
///
/// # Errors
/// [`LinalgError::SingularMatrix`] when a pivot vanishes relative to its
/// column of `matrix`.
pub fn inverse(matrix: &Array2<f64>) -> Result<Array2<f64>, LinalgError> {
    let n = matrix.nrows();
    if n != matrix.ncols() {
        return Err(LinalgError::DimensionMismatch {
            expected: n,
            actual: matrix.ncols(),
        });
    }
    if n == 0 {
        return Err(LinalgError::Empty("cannot invert a 0x0 matrix"));
    }

    let column_scale: Vec<f64> = matrix
        .columns()
        .into_iter()
        .map(|c| c.fold(0.0_f64, |acc, v| acc.max(v.abs())))
        .collect();
    if column_scale.iter().any(|s| *s == 0.0 || !s.is_finite()) {
        return Err(LinalgError::SingularMatrix { size: n });
    }

    let mut a = matrix.clone();
    let mut inv = Array2::<f64>::eye(n);

    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&i, &j| a[[i, col]].abs().total_cmp(&a[[j, col]].abs()))
            .unwrap_or(col);
        if a[[pivot_row, col]].abs() <= SINGULAR_RTOL * column_scale[col] {
            return Err(LinalgError::SingularMatrix { size: n });
        }
        if pivot_row != col {
            for k in 0..n {
                a.swap([pivot_row, k], [col, k]);
                inv.swap([pivot_row, k], [col, k]);
            }
        }

        let pivot = a[[col, col]];
        a.row_mut(col).mapv_inplace(|v| v / pivot);
        inv.row_mut(col).mapv_inplace(|v| v / pivot);

        for row in 0..n {
            if row == col {
                continue;
            }
            let factor = a[[row, col]];
            if factor == 0.0 {
                continue;
            }
            for k in 0..n {
                a[[row, k]] -= factor * a[[col, k]];
                inv[[row, k]] -= factor * inv[[col, k]];
            }
        }
    }

    Ok(inv)
}

/// Moore-Penrose pseudo-inverse of an `m × n` matrix
///
/// Computed as `V Σ⁺ Uᵀ` from a one-sided Jacobi SVD of the matrix itself.
/// Singular values below `σ_max · 1e-12` are treated as zero, so collinear
/// columns produce the minimum-norm solution instead of an error.
pub fn pseudo_inverse(matrix: &Array2<f64>) -> Result<Array2<f64>, LinalgError> {
    pseudo_inverse_with_rank(matrix).map(|(pinv, _)| pinv)
}

fn pseudo_inverse_with_rank(matrix: &Array2<f64>) -> Result<(Array2<f64>, usize), LinalgError> {
    if matrix.ncols() == 0 {
        return Err(LinalgError::Empty("pseudo-inverse needs at least one column"));
    }

    let tolerance = matrix.nrows().max(1) as f64 * f64::EPSILON;
    let svd = jacobi_svd(matrix, MAX_SWEEPS, tolerance)?;

    let cutoff = svd.max_singular_value() * SINGULAR_VALUE_RTOL;
    let mut rank = 0;
    // U Σ is stored directly, hence 1/σ² rather than 1/σ
    let inv_squares = svd.singular_values.mapv(|sigma| {
        if sigma > cutoff && sigma > 0.0 {
            rank += 1;
            1.0 / (sigma * sigma)
        } else {
            0.0
        }
    });

    let v = &svd.right_vectors;
    let pinv = (v * &inv_squares.insert_axis(Axis(0))).dot(&svd.scaled_left_vectors.t());
    Ok((pinv, rank))
}

/// Least squares fit `y ≈ X b` through the pseudo-inverse
///
/// # Errors
/// [`LinalgError::DimensionMismatch`] when `y` and `design` disagree on the
/// number of observations.
pub fn least_squares(
    design: &Array2<f64>,
    y: ArrayView1<'_, f64>,
) -> Result<LeastSquares, LinalgError> {
    if design.nrows() != y.len() {
        return Err(LinalgError::DimensionMismatch {
            expected: design.nrows(),
            actual: y.len(),
        });
    }

    let (pinv, rank) = pseudo_inverse_with_rank(design)?;
    let coefficients = pinv.dot(&y);
    let residuals = &y - &design.dot(&coefficients);
    let ssr = residuals.dot(&residuals);

    Ok(LeastSquares {
        coefficients,
        ssr,
        rank,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use ndarray::array;

    #[test]
    fn test_add_intercept() {
        let x = array![[2.0, 3.0], [4.0, 5.0], [6.0, 7.0]];
        let design = add_intercept(x.view());

        assert_eq!(design.dim(), (3, 3));
        assert_eq!(design.column(0).to_vec(), vec![1.0, 1.0, 1.0]);
        assert_eq!(design.column(2).to_vec(), vec![3.0, 5.0, 7.0]);
    }

    #[test]
    fn test_inverse_round_trip() {
        let matrix = array![[4.0, 7.0, 2.0], [3.0, 6.0, 1.0], [2.0, 5.0, 3.0]];
        let inv = inverse(&matrix).unwrap();
        let identity = matrix.dot(&inv);

        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(identity[[i, j]], expected, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_inverse_needs_pivoting() {
        let matrix = array![[0.0, 1.0], [1.0, 0.0]];
        let inv = inverse(&matrix).unwrap();
        assert_abs_diff_eq!(inv[[0, 1]], 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(inv[[1, 0]], 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_inverse_singular() {
        let matrix = array![[1.0, 2.0], [2.0, 4.0]];
        assert_eq!(
            inverse(&matrix).unwrap_err(),
            LinalgError::SingularMatrix { size: 2 }
        );
    }

    #[test]
    fn test_inverse_of_small_scale_normal_equations() {
        // XᵀX for returns of order 1e-7: the intercept entry dwarfs the rest
        let x = array![1e-7, -2e-7, 3e-7, 0.5e-7, -1.5e-7];
        let design = add_intercept(x.view().insert_axis(Axis(1)));
        let xtx = design.t().dot(&design);
        let inv = inverse(&xtx).unwrap();

        let (a, b, d) = (xtx[[0, 0]], xtx[[0, 1]], xtx[[1, 1]]);
        let det = a * d - b * b;
        assert_relative_eq!(inv[[0, 0]], d / det, max_relative = 1e-9);
        assert_relative_eq!(inv[[0, 1]], -b / det, max_relative = 1e-9);
        assert_relative_eq!(inv[[1, 1]], a / det, max_relative = 1e-9);
    }

    #[test]
    fn test_inverse_zero_column_is_singular() {
        let matrix = array![[1.0, 0.0], [2.0, 0.0]];
        assert!(matches!(
            inverse(&matrix),
            Err(LinalgError::SingularMatrix { size: 2 })
        ));
    }

    #[test]
    fn test_pseudo_inverse_matches_inverse_when_full_rank() {
        let matrix = array![[2.0, 1.0], [1.0, 3.0]];
        let pinv = pseudo_inverse(&matrix).unwrap();
        let inv = inverse(&matrix).unwrap();

        for i in 0..2 {
            for j in 0..2 {
                assert_abs_diff_eq!(pinv[[i, j]], inv[[i, j]], epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_pseudo_inverse_penrose_conditions() {
        // Third column duplicates the second
        let a = array![[1.0, 2.0, 2.0], [1.0, 3.0, 3.0], [1.0, 5.0, 5.0], [1.0, 7.0, 7.0]];
        let pinv = pseudo_inverse(&a).unwrap();

        let apa = a.dot(&pinv).dot(&a);
        let pap = pinv.dot(&a).dot(&pinv);
        for (x, y) in apa.iter().zip(a.iter()) {
            assert_abs_diff_eq!(*x, *y, epsilon = 1e-9);
        }
        for (x, y) in pap.iter().zip(pinv.iter()) {
            assert_abs_diff_eq!(*x, *y, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_least_squares_exact_line() {
        let design = add_intercept(array![[1.0], [2.0], [3.0], [4.0]].view());
        let y = array![3.0, 5.0, 7.0, 9.0];
        let fit = least_squares(&design, y.view()).unwrap();

        assert_abs_diff_eq!(fit.coefficients[0], 1.0, epsilon = 1e-10);
        assert_abs_diff_eq!(fit.coefficients[1], 2.0, epsilon = 1e-10);
        assert_abs_diff_eq!(fit.ssr, 0.0, epsilon = 1e-18);
        assert_eq!(fit.rank, 2);
        assert!(!fit.is_rank_deficient());
    }

    #[test]
    fn test_least_squares_minimum_norm_on_duplicate_columns() {
        let design = add_intercept(array![[1.0, 1.0], [2.0, 2.0], [3.0, 3.0]].view());
        let y = array![2.0, 4.0, 6.0];
        let fit = least_squares(&design, y.view()).unwrap();

        // The slope of 2 is split evenly across the duplicated columns
        assert_eq!(fit.rank, 2);
        assert!(fit.is_rank_deficient());
        assert_abs_diff_eq!(fit.coefficients[1], fit.coefficients[2], epsilon = 1e-9);
        assert_abs_diff_eq!(fit.coefficients[1] + fit.coefficients[2], 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(fit.ssr, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_least_squares_keeps_nearly_collinear_columns() {
        // Condition number around 1e9, far inside double precision
        let x = array![0.1, 0.2, 0.3, 0.4, 0.5];
        let z = array![1.0, -1.0, 1.0, -1.0, 0.5];
        let mut design = Array2::<f64>::ones((5, 3));
        design.column_mut(1).assign(&x);
        design.column_mut(2).assign(&(&x + &(&z * 1e-9)));
        let y = design.dot(&array![0.5, 2.0, 3.0]);

        let fit = least_squares(&design, y.view()).unwrap();

        assert_eq!(fit.rank, 3);
        assert!(!fit.is_rank_deficient());
        assert_abs_diff_eq!(fit.coefficients[0], 0.5, epsilon = 1e-4);
        assert_abs_diff_eq!(fit.coefficients[1], 2.0, epsilon = 1e-4);
        assert_abs_diff_eq!(fit.coefficients[2], 3.0, epsilon = 1e-4);
        assert_abs_diff_eq!(fit.ssr, 0.0, epsilon = 1e-20);
    }

    #[test]
    fn test_least_squares_wide_design() {
        let design = array![[1.0, 2.0, 3.0]];
        let y = array![14.0];
        let fit = least_squares(&design, y.view()).unwrap();

        // Minimum-norm solution lies along the single row
        assert_eq!(fit.rank, 1);
        assert_abs_diff_eq!(fit.coefficients[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(fit.coefficients[1], 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(fit.coefficients[2], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_least_squares_dimension_mismatch() {
        let design = Array2::<f64>::ones((3, 2));
        let y = array![1.0, 2.0];
        assert!(matches!(
            least_squares(&design, y.view()),
            Err(LinalgError::DimensionMismatch { expected: 3, actual: 2 })
        ));
    }
}
