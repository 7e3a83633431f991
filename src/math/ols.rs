//! Least squares solver.
//!
//! Two places in this crate solve small linear least-squares problems:
//!
//! - the Levenberg-Marquardt step, as the augmented system
//!   `[J; √λ·D] δ = [r; 0]` (4 columns)
//! - the secondary measured-vs-fitted regression `θ_meas ≈ a·θ_fit + b`
//!   (2 columns: intercept + slope)
//!
//! Implementation choices:
//! - SVD solves the problem robustly even when the design matrix is tall
//!   (more rows than columns). (Nalgebra's `QR::solve` is intended for
//!   square systems and will panic for non-square matrices.)
//! - Because the parameter dimension is tiny (2-4 columns), SVD performance
//!   is a non-issue.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    // SVD solve with a relaxed tolerance to handle near-singular matrices.
    // A nearly converged fit makes the damped Jacobian columns almost
    // collinear, so we use a tolerance ladder that balances numerical
    // stability with solution acceptance.
    let svd = x.clone().svd(true, true);

    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}
