//! Dense solves behind the surface and curve fits.

use crib_core::{CribError, Result};
use nalgebra::{Matrix4, Matrix4x2, SMatrix};

use crate::uv::ParamPoint;

/// 16×16 design matrix of bicubic monomials, one row per sample.
pub type DesignMatrix = SMatrix<f64, 16, 16>;

/// Right-hand sides for the x, y, and z coordinates.
pub type AxisColumns = SMatrix<f64, 16, 3>;

/// Pivots smaller than this fraction of the largest pivot mark the system singular.
const RELATIVE_PIVOT_EPSILON: f64 = 1e-12;

/// Powers `[t³, t², t, 1]`.
pub fn cubic_powers(t: f64) -> [f64; 4] {
    [t * t * t, t * t, t, 1.0]
}

/// Derivative powers `[3t², 2t, 1, 0]`.
pub fn cubic_slopes(t: f64) -> [f64; 4] {
    [3.0 * t * t, 2.0 * t, 1.0, 0.0]
}

/// Monomial row for one parameter pair; column `4 * i + j` holds `u^(3-i) v^(3-j)`.
pub fn monomial_row(p: ParamPoint) -> [f64; 16] {
    let su = cubic_powers(p.u);
    let sv = cubic_powers(p.v);
    let mut row = [0.0; 16];
    for i in 0..4 {
        for j in 0..4 {
            row[4 * i + j] = su[i] * sv[j];
        }
    }
    row
}

pub fn design_matrix(params: &[ParamPoint; 16]) -> DesignMatrix {
    let mut m = DesignMatrix::zeros();
    for (r, &p) in params.iter().enumerate() {
        for (c, value) in monomial_row(p).into_iter().enumerate() {
            m[(r, c)] = value;
        }
    }
    m
}

fn ensure_regular(pivots: impl Iterator<Item = f64>) -> Result<()> {
    let (smallest, largest) = pivots.fold((f64::INFINITY, 0.0_f64), |(lo, hi), p| {
        (lo.min(p.abs()), hi.max(p.abs()))
    });
    if largest == 0.0 || smallest <= largest * RELATIVE_PIVOT_EPSILON {
        return Err(CribError::SingularSystem);
    }
    Ok(())
}

/// Solve `A X = B` for all three coordinate columns at once (LU with partial pivoting).
pub fn solve_design(a: &DesignMatrix, rhs: &AxisColumns) -> Result<AxisColumns> {
    let lu = (*a).lu();
    ensure_regular(lu.u().diagonal().iter().copied())?;
    lu.solve(rhs).ok_or(CribError::SingularSystem)
}

/// Solve a 4×4 system for the u and v columns of a cubic curve fit.
pub fn solve_cubic(a: &Matrix4<f64>, rhs: &Matrix4x2<f64>) -> Result<Matrix4x2<f64>> {
    let lu = (*a).lu();
    ensure_regular(lu.u().diagonal().iter().copied())?;
    lu.solve(rhs).ok_or(CribError::SingularSystem)
}
