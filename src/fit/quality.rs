//! Goodness-of-fit evaluation.
//!
//! Two complementary diagnostics over the (measured, fitted) series:
//!
//! - `r_squared`: the coefficient of determination of the fit itself,
//!   R² = 1 − SS_res/SS_tot
//! - `linear_check`: an ordinary least-squares regression
//!   θ_measured ≈ a·θ_fitted + b, with its own R². Slope ≈ 1 and
//!   intercept ≈ 0 indicate the fit is proportionally unbiased; the two R²
//!   values coincide only for a perfect fit.

use nalgebra::{DMatrix, DVector};

use crate::domain::FitQuality;
use crate::error::{AppError, ErrorKind};
use crate::math::solve_least_squares;

/// Coefficient of determination, R² = 1 − SS_res/SS_tot.
///
/// A zero-variance measured series leaves SS_tot = 0 and R² undefined;
/// that is a `DegenerateMetric` error, never a silent NaN.
pub fn r_squared(measured: &[f64], fitted: &[f64]) -> Result<f64, AppError> {
    check_lengths(measured, fitted)?;

    let n = measured.len() as f64;
    let mean = measured.iter().sum::<f64>() / n;
    let ss_res: f64 = measured
        .iter()
        .zip(fitted.iter())
        .map(|(m, f)| (m - f).powi(2))
        .sum();
    let ss_tot: f64 = measured.iter().map(|m| (m - mean).powi(2)).sum();

    if ss_tot == 0.0 {
        return Err(AppError::new(
            ErrorKind::DegenerateMetric,
            "Measured water contents have zero variance; R² is undefined.",
        ));
    }

    Ok(1.0 - ss_res / ss_tot)
}

/// Result of the secondary measured-vs-fitted regression.
#[derive(Debug, Clone, Copy)]
pub struct LinearCheck {
    pub slope: f64,
    pub intercept: f64,
    pub r2: f64,
}

/// OLS regression θ_measured ≈ a·θ_fitted + b, with θ_fitted as the
/// independent variable. The intercept column comes first in the design
/// matrix.
pub fn linear_check(fitted: &[f64], measured: &[f64]) -> Result<LinearCheck, AppError> {
    check_lengths(measured, fitted)?;

    let n = fitted.len();
    let mut design = DMatrix::<f64>::zeros(n, 2);
    for (i, &f) in fitted.iter().enumerate() {
        design[(i, 0)] = 1.0;
        design[(i, 1)] = f;
    }
    let y = DVector::from_row_slice(measured);

    let beta = solve_least_squares(&design, &y).ok_or_else(|| {
        AppError::new(
            ErrorKind::DegenerateMetric,
            "Measured-vs-fitted regression could not be solved.",
        )
    })?;
    let (intercept, slope) = (beta[0], beta[1]);

    let predicted: Vec<f64> = fitted.iter().map(|&f| slope * f + intercept).collect();
    let r2 = r_squared(measured, &predicted)?;

    Ok(LinearCheck {
        slope,
        intercept,
        r2,
    })
}

/// Bundle both diagnostics for a fitted series.
pub fn evaluate_fit(measured: &[f64], fitted: &[f64]) -> Result<FitQuality, AppError> {
    let r2_model = r_squared(measured, fitted)?;
    let check = linear_check(fitted, measured)?;
    Ok(FitQuality {
        r2_model,
        slope: check.slope,
        intercept: check.intercept,
        r2_linear: check.r2,
    })
}

fn check_lengths(measured: &[f64], fitted: &[f64]) -> Result<(), AppError> {
    if measured.len() != fitted.len() {
        return Err(AppError::new(
            ErrorKind::InputShape,
            format!(
                "Mismatched series lengths: {} measured vs {} fitted.",
                measured.len(),
                fitted.len()
            ),
        ));
    }
    if measured.is_empty() {
        return Err(AppError::new(
            ErrorKind::InputShape,
            "Empty series; nothing to evaluate.",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn perfect_fit_scores_one_on_both_metrics() {
        let measured = [0.45, 0.40, 0.20, 0.06];
        let q = evaluate_fit(&measured, &measured).unwrap();
        assert_relative_eq!(q.r2_model, 1.0);
        assert_relative_eq!(q.r2_linear, 1.0, epsilon = 1e-12);
        assert_relative_eq!(q.slope, 1.0, epsilon = 1e-10);
        assert!(q.intercept.abs() < 1e-10);
    }

    #[test]
    fn constant_measured_series_is_degenerate() {
        let measured = [0.30, 0.30, 0.30, 0.30];
        let fitted = [0.30, 0.29, 0.31, 0.30];
        let err = r_squared(&measured, &fitted).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DegenerateMetric);

        let err = evaluate_fit(&measured, &fitted).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DegenerateMetric);
    }

    #[test]
    fn linear_check_recovers_exact_affine_relation() {
        let fitted = [0.1, 0.2, 0.3, 0.4];
        let measured: Vec<f64> = fitted.iter().map(|f| 2.0 * f + 1.0).collect();
        let check = linear_check(&fitted, &measured).unwrap();
        assert_relative_eq!(check.slope, 2.0, epsilon = 1e-10);
        assert_relative_eq!(check.intercept, 1.0, epsilon = 1e-10);
        assert_relative_eq!(check.r2, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn r_squared_of_mean_prediction_is_zero() {
        let measured = [1.0, 2.0, 3.0, 4.0];
        let fitted = [2.5; 4];
        let r2 = r_squared(&measured, &fitted).unwrap();
        assert_relative_eq!(r2, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let err = r_squared(&[0.1, 0.2], &[0.1]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InputShape);
        let err = linear_check(&[0.1], &[0.1, 0.2]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InputShape);
    }
}
