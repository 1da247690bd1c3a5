//! Ridge solve through the thin SVD of the design matrix.
//!
//! With `X = U S Vᵀ` the ridge weights are `V diag(s / (s² + alpha)) Uᵀ y`.
//! Working on `X` directly keeps the conditioning of the polynomial design
//! instead of squaring it as `XᵀX` would. Singular values below the rank
//! tolerance are dropped, which gives the minimum-norm solution for
//! rank-deficient designs (a constant or duplicated column).

use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, Array2};

/// Minimize `||y - X w||² + alpha ||w||²`.
///
/// Returns `None` on a shape mismatch, non-finite input, or when the
/// decomposition does not produce a finite solution.
pub fn solve_ridge(design: &Array2<f64>, targets: &Array1<f64>, alpha: f64) -> Option<Array1<f64>> {
    let (rows, cols) = design.dim();
    if rows != targets.len() || !alpha.is_finite() {
        return None;
    }
    if rows == 0 || cols == 0 {
        return Some(Array1::zeros(cols));
    }
    if design.iter().chain(targets.iter()).any(|v| !v.is_finite()) {
        return None;
    }

    let x = DMatrix::from_fn(rows, cols, |i, j| design[[i, j]]);
    let y = DVector::from_iterator(rows, targets.iter().copied());

    let svd = x.svd(true, true);
    let (u, v_t) = (svd.u?, svd.v_t?);
    let s = svd.singular_values;

    let s_max = s.amax();
    let tolerance = f64::EPSILON * rows.max(cols) as f64 * s_max;

    let mut projected = u.transpose() * y;
    for (p, &sigma) in projected.iter_mut().zip(s.iter()) {
        *p *= if sigma > tolerance {
            sigma / (sigma * sigma + alpha)
        } else {
            0.0
        };
    }

    let weights = v_t.transpose() * projected;
    if weights.iter().all(|w| w.is_finite()) {
        Some(Array1::from_iter(weights.iter().copied()))
    } else {
        None
    }
}
