//! Singular value decomposition
//!
//! One-sided (Hestenes) Jacobi: plane rotations are applied to pairs of
//! columns of `A` until every pair is numerically orthogonal. The rotated
//! matrix is then `A V = U Σ`, so the singular values are its column norms.
//! Working on `A` itself keeps small singular values accurate; the normal
//! equations `AᵀA` would square the condition number.

use crate::LinalgError;
use ndarray::{Array1, Array2};

/// Thin singular value decomposition `A = (A V) Vᵀ`
#[derive(Debug, Clone)]
pub struct SingularValueDecomposition {
    /// Singular values sorted in descending order
    pub singular_values: Array1<f64>,
    /// Right singular vectors stored as columns, aligned with `singular_values`
    pub right_vectors: Array2<f64>,
    /// `A V`: left singular vectors scaled by their singular values
    pub scaled_left_vectors: Array2<f64>,
}

impl SingularValueDecomposition {
    /// Largest singular value, or zero for an empty decomposition
    pub fn max_singular_value(&self) -> f64 {
        self.singular_values.first().copied().unwrap_or(0.0)
    }
}

/// One-sided Jacobi SVD of an `m × n` matrix
///
/// # Arguments
/// * `matrix` - Any non-empty matrix
/// * `max_sweeps` - Upper bound on passes over all column pairs
/// * `tolerance` - A pair is orthogonal once `|aᵢ·aⱼ| ≤ tolerance·‖aᵢ‖‖aⱼ‖`;
///   columns shorter than `tolerance·‖A‖` are left alone as numerically zero
pub fn jacobi_svd(
    matrix: &Array2<f64>,
    max_sweeps: usize,
    tolerance: f64,
) -> Result<SingularValueDecomposition, LinalgError> {
    let (m, n) = matrix.dim();
    if m == 0 || n == 0 {
        return Err(LinalgError::Empty(
            "singular value decomposition needs a non-empty matrix",
        ));
    }

    let mut a = matrix.clone();
    let mut v = Array2::<f64>::eye(n);
    // Columns this small are rounding noise and never settle into orthogonality
    let frobenius = matrix.iter().map(|x| x * x).sum::<f64>().sqrt();
    let negligible = (tolerance.max(f64::EPSILON) * frobenius).powi(2);

    for _ in 0..max_sweeps {
        let mut rotated = false;
        for p in 0..n {
            for q in (p + 1)..n {
                rotated |= orthogonalize(&mut a, &mut v, (p, q), tolerance, negligible);
            }
        }
        if !rotated {
            break;
        }
    }

    let norms: Vec<f64> = a.columns().into_iter().map(|c| c.dot(&c).sqrt()).collect();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| norms[j].total_cmp(&norms[i]));

    let singular_values = order.iter().map(|&i| norms[i]).collect::<Array1<f64>>();
    let mut right_vectors = Array2::<f64>::zeros((n, n));
    let mut scaled_left_vectors = Array2::<f64>::zeros((m, n));
    for (dst, &src) in order.iter().enumerate() {
        right_vectors.column_mut(dst).assign(&v.column(src));
        scaled_left_vectors.column_mut(dst).assign(&a.column(src));
    }

    Ok(SingularValueDecomposition {
        singular_values,
        right_vectors,
        scaled_left_vectors,
    })
}

/// Rotate columns `p` and `q` of `a` until they are orthogonal, accumulating
/// the rotation into `v`. Returns whether a rotation was applied.
fn orthogonalize(
    a: &mut Array2<f64>,
    v: &mut Array2<f64>,
    (p, q): (usize, usize),
    tolerance: f64,
    negligible: f64,
) -> bool {
    let (col_p, col_q) = (a.column(p), a.column(q));
    let alpha = col_p.dot(&col_p);
    let beta = col_q.dot(&col_q);
    if alpha <= negligible || beta <= negligible {
        return false;
    }
    let gamma = col_p.dot(&col_q);
    if gamma.abs() <= tolerance * (alpha * beta).sqrt() {
        return false;
    }

    let zeta = (beta - alpha) / (2.0 * gamma);
    let t = zeta.signum() / (zeta.abs() + (1.0 + zeta * zeta).sqrt());
    let c = 1.0 / (1.0 + t * t).sqrt();
    let s = t * c;

    rotate_columns(a, p, q, c, s);
    rotate_columns(v, p, q, c, s);
    true
}

fn rotate_columns(matrix: &mut Array2<f64>, p: usize, q: usize, c: f64, s: f64) {
    for k in 0..matrix.nrows() {
        let (xp, xq) = (matrix[[k, p]], matrix[[k, q]]);
        matrix[[k, p]] = c * xp - s * xq;
        matrix[[k, q]] = s * xp + c * xq;
    }
}
