//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting
//! - exported to JSON/CSV
//! - reloaded later for plotting without refitting

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, ErrorKind};

/// Measured soil-water-retention observations.
///
/// `head[i]` pairs with `theta[i]`; the input order is preserved end to end
/// (the result table is index-aligned with it). No ordering of heads is
/// required for fitting; sorting happens only in derived plotting views.
#[derive(Debug, Clone)]
pub struct RetentionSeries {
    /// Pressure head values (h ≥ 0).
    pub head: Vec<f64>,
    /// Volumetric water content values (typically in [0, 1]).
    pub theta: Vec<f64>,
}

impl RetentionSeries {
    /// Build a series, validating shape and numeric domain.
    pub fn new(head: Vec<f64>, theta: Vec<f64>) -> Result<Self, AppError> {
        if head.len() != theta.len() {
            return Err(AppError::new(
                ErrorKind::InputShape,
                format!(
                    "Mismatched series lengths: {} head values vs {} water contents.",
                    head.len(),
                    theta.len()
                ),
            ));
        }
        if let Some(h) = head.iter().find(|h| !h.is_finite() || **h < 0.0) {
            return Err(AppError::new(
                ErrorKind::NumericDomain,
                format!("Pressure head must be finite and non-negative, got {h}."),
            ));
        }
        if let Some(t) = theta.iter().find(|t| !t.is_finite()) {
            return Err(AppError::new(
                ErrorKind::NumericDomain,
                format!("Water content must be finite, got {t}."),
            ));
        }
        Ok(Self { head, theta })
    }

    pub fn len(&self) -> usize {
        self.head.len()
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_empty()
    }
}

/// van Genuchten parameter vector (θ_r, θ_s, α, n).
///
/// θ_r/θ_s are the residual and saturated water contents (the asymptotic
/// bounds of the curve), α the inverse air-entry parameter, n the shape
/// parameter. 0 ≤ θ_r ≤ θ_s ≤ 1 is physically expected but not enforced
/// beyond the optimizer's box bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VgParams {
    pub theta_r: f64,
    pub theta_s: f64,
    pub alpha: f64,
    pub n: f64,
}

impl VgParams {
    /// Number of free parameters (the identifiability floor for fitting).
    pub const COUNT: usize = 4;

    pub fn from_array(v: [f64; 4]) -> Self {
        Self {
            theta_r: v[0],
            theta_s: v[1],
            alpha: v[2],
            n: v[3],
        }
    }

    pub fn to_array(self) -> [f64; 4] {
        [self.theta_r, self.theta_s, self.alpha, self.n]
    }

    /// Derived exponent m = 1 − 1/n.
    ///
    /// Undefined at n = 0 and negative for 0 < n < 1, where the retention
    /// curve loses its expected monotone shape. See `models::water_content`.
    pub fn m(&self) -> f64 {
        1.0 - 1.0 / self.n
    }
}

/// Box bounds for the four parameters, index-aligned with
/// `VgParams::to_array`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamBounds {
    pub lower: [f64; 4],
    pub upper: [f64; 4],
}

impl Default for ParamBounds {
    /// The conventional fitting box: each parameter in [0, 1] except n in
    /// [0, 10].
    fn default() -> Self {
        Self {
            lower: [0.0; 4],
            upper: [1.0, 1.0, 1.0, 10.0],
        }
    }
}

impl ParamBounds {
    pub fn validate(&self) -> Result<(), AppError> {
        for i in 0..4 {
            let (lo, hi) = (self.lower[i], self.upper[i]);
            if !(lo.is_finite() && hi.is_finite() && lo <= hi) {
                return Err(AppError::new(
                    ErrorKind::Convergence,
                    format!("Malformed bounds for parameter {i}: [{lo}, {hi}]."),
                ));
            }
        }
        Ok(())
    }

    pub fn contains(&self, p: &[f64; 4]) -> bool {
        (0..4).all(|i| p[i] >= self.lower[i] && p[i] <= self.upper[i])
    }

    /// Clamp a candidate point onto the box.
    pub fn project(&self, p: &mut [f64; 4]) {
        for i in 0..4 {
            p[i] = p[i].clamp(self.lower[i], self.upper[i]);
        }
    }
}

/// Goodness-of-fit bundle.
///
/// `r2_model` is the direct coefficient of determination of the fit.
/// `slope`/`intercept`/`r2_linear` come from the secondary OLS regression
/// θ_measured ≈ a·θ_fitted + b, which checks that the relationship between
/// measured and fitted values is proportionally unbiased (a ≈ 1, b ≈ 0).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FitQuality {
    pub r2_model: f64,
    pub slope: f64,
    pub intercept: f64,
    pub r2_linear: f64,
}

/// Fitted parameters plus optimizer diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VgFit {
    pub params: VgParams,
    /// Sum of squared residuals at the solution.
    pub sse: f64,
    /// Root mean squared residual at the solution.
    pub rmse: f64,
    /// Iterations the optimizer actually used.
    pub iterations: usize,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct FitConfig {
    pub input: PathBuf,

    /// Initial guess (θ_r, θ_s, α, n).
    pub initial_guess: [f64; 4],
    pub bounds: ParamBounds,
    pub max_iter: usize,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    /// Stem for `<stem>_fitted.csv` / `<stem>_parameters.csv`.
    pub export_tables: Option<PathBuf>,
    pub export_curve: Option<PathBuf>,
    /// Stem for `<stem>_fit.svg` / `<stem>_correlation.svg`.
    pub export_svg: Option<PathBuf>,
}

/// A saved curve file (JSON).
///
/// The portable representation of a fitted curve: parameters, quality, and a
/// precomputed grid for quick re-plotting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveFile {
    pub tool: String,
    pub params: VgParams,
    pub quality: FitQuality,
    pub sse: f64,
    pub rmse: f64,
    pub grid: CurveGrid,
}

/// Fitted curve sampled on an ascending head grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveGrid {
    pub head: Vec<f64>,
    pub theta: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_rejects_mismatched_lengths() {
        let err = RetentionSeries::new(vec![0.0, 1.0], vec![0.3]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InputShape);
    }

    #[test]
    fn series_rejects_negative_head() {
        let err = RetentionSeries::new(vec![-1.0, 1.0], vec![0.3, 0.2]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NumericDomain);
    }

    #[test]
    fn default_bounds_match_convention() {
        let b = ParamBounds::default();
        assert_eq!(b.lower, [0.0; 4]);
        assert_eq!(b.upper, [1.0, 1.0, 1.0, 10.0]);
        assert!(b.validate().is_ok());
    }

    #[test]
    fn bounds_projection_clamps() {
        let b = ParamBounds::default();
        let mut p = [-0.5, 1.5, 0.3, 12.0];
        b.project(&mut p);
        assert_eq!(p, [0.0, 1.0, 0.3, 10.0]);
        assert!(b.contains(&p));
    }

    #[test]
    fn params_round_trip_through_array() {
        let p = VgParams::from_array([0.05, 0.45, 0.01, 1.5]);
        assert_eq!(p.to_array(), [0.05, 0.45, 0.01, 1.5]);
        assert!((p.m() - (1.0 - 1.0 / 1.5)).abs() < 1e-15);
    }
}
