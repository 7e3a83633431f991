//! Evaluation of the van Genuchten retention curve.
//!
//! The fitter relies on two primitive operations:
//! - evaluate θ(h) at a single head (for residuals/Jacobian columns)
//! - evaluate θ(h) over a head series (for fitted values/plots)
//!
//! Numerical domain:
//! - `m = 1 − 1/n` is undefined at `n = 0` and negative for `0 < n < 1`,
//!   which inverts the curve's expected monotone shape. The evaluator does
//!   not guard this; pipeline entry points reject `n ≤ 0` up front and the
//!   box bounds are the only constraint below `n = 1`.
//! - `(α·h)^n` with `α·h < 0` and non-integer `n` is NaN. `h ≥ 0` is a
//!   caller precondition; this function does not clamp, it NaN-propagates.

use crate::domain::VgParams;

/// Water content θ(h) at a single pressure head.
///
/// θ(h) = θ_r + (θ_s − θ_r) / (1 + (α·h)^n)^m with m = 1 − 1/n.
///
/// At h = 0 the denominator is 1 and θ(0) = θ_s exactly; as h → ∞ (with
/// n > 1) θ approaches θ_r.
pub fn water_content(h: f64, p: &VgParams) -> f64 {
    let m = p.m();
    p.theta_r + (p.theta_s - p.theta_r) / (1.0 + (p.alpha * h).powf(p.n)).powf(m)
}

/// Evaluate θ(h) elementwise over a head series.
///
/// Returns a vector index-aligned with `heads`.
pub fn predict_series(heads: &[f64], p: &VgParams) -> Vec<f64> {
    heads.iter().map(|&h| water_content(h, p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params() -> VgParams {
        VgParams {
            theta_r: 0.05,
            theta_s: 0.45,
            alpha: 0.01,
            n: 1.5,
        }
    }

    #[test]
    fn saturated_at_zero_head() {
        let p = params();
        assert_relative_eq!(water_content(0.0, &p), p.theta_s);
    }

    #[test]
    fn approaches_residual_at_large_head() {
        let p = params();
        let theta = water_content(1e9, &p);
        assert!((theta - p.theta_r).abs() < 1e-3, "got {theta}");
    }

    #[test]
    fn monotone_non_increasing_for_n_above_one() {
        let p = params();
        let heads: Vec<f64> = (0..200).map(|i| i as f64 * 25.0).collect();
        let theta = predict_series(&heads, &p);
        for w in theta.windows(2) {
            assert!(w[1] <= w[0] + 1e-12, "curve increased: {} -> {}", w[0], w[1]);
        }
    }

    #[test]
    fn series_is_index_aligned() {
        let p = params();
        let heads = [100.0, 0.0, 10.0];
        let theta = predict_series(&heads, &p);
        assert_eq!(theta.len(), heads.len());
        for (i, &h) in heads.iter().enumerate() {
            assert_relative_eq!(theta[i], water_content(h, &p));
        }
    }

    #[test]
    fn non_finite_outside_domain() {
        // n = 0 makes m = 1 - 1/n undefined.
        let p = VgParams {
            n: 0.0,
            ..params()
        };
        assert!(!water_content(10.0, &p).is_finite());

        // Negative head raised to a non-integer exponent is NaN.
        assert!(water_content(-10.0, &params()).is_nan());
    }
}
