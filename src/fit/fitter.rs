//! Bounded nonlinear least-squares fit of the van Genuchten parameters.
//!
//! Given:
//! - measured (h, θ) pairs
//! - an initial guess (θ_r⁰, θ_s⁰, α⁰, n⁰)
//! - box bounds on each parameter
//!
//! we minimize Σ (θ_i − θ(h_i; p))² with a Levenberg-Marquardt iteration
//! that keeps every iterate inside the bounds:
//!
//! - the Jacobian is forward-difference (flipping to backward at the upper
//!   bound so probe points stay inside the box)
//! - each damped step solves the augmented least-squares system
//!   `[J; √λ·D] δ = [r; 0]` with D the Marquardt column scaling,
//!   via the shared SVD solver
//! - the candidate `x + δ` is projected onto the bounds and accepted only
//!   if it reduces the cost; λ shrinks on accept and grows on reject
//!
//! The iteration is deterministic: no randomness, fixed evaluation order,
//! same inputs give the same parameter vector.

use nalgebra::{DMatrix, DVector};

use crate::domain::{ParamBounds, RetentionSeries, VgFit, VgParams};
use crate::error::{AppError, ErrorKind};
use crate::math::solve_least_squares;
use crate::models::water_content;

const LAMBDA_INIT: f64 = 1e-3;
const LAMBDA_UP: f64 = 10.0;
const LAMBDA_DOWN: f64 = 0.1;
const LAMBDA_MIN: f64 = 1e-12;
const LAMBDA_MAX: f64 = 1e10;

/// Floor for the Marquardt diagonal scaling, so a flat Jacobian column
/// cannot zero out its damping term.
const DIAG_FLOOR: f64 = 1e-12;

/// Relative cost-improvement threshold below which an accepted step counts
/// as converged.
const REL_COST_TOL: f64 = 1e-10;

/// Tolerances and budgets for a fit.
#[derive(Debug, Clone)]
pub struct FitOptions {
    /// Iteration budget; exceeding it is a convergence failure.
    pub max_iter: usize,
    /// Absolute SSE below which the fit is accepted outright.
    pub cost_tol: f64,
    /// Gradient ∞-norm below which the iterate is stationary.
    pub grad_tol: f64,
    /// Accepted-step norm below which the iterate has stopped moving.
    pub step_tol: f64,
    /// Base relative step for the finite-difference Jacobian.
    pub fd_eps: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            max_iter: 200,
            cost_tol: 1e-12,
            grad_tol: 1e-10,
            step_tol: 1e-10,
            fd_eps: 1e-8,
        }
    }
}

/// Fit the van Genuchten parameters to a measured series.
///
/// Returns the estimated parameters with SSE/RMSE diagnostics. Fails with a
/// `Convergence` error when the system is underdetermined (N < 4), the
/// guess lies outside the bounds, the bounds are malformed, or the budget
/// runs out; with `NumericDomain` when the model cannot be evaluated at the
/// initial guess.
pub fn fit_retention(
    series: &RetentionSeries,
    guess: [f64; 4],
    bounds: &ParamBounds,
    opts: &FitOptions,
) -> Result<VgFit, AppError> {
    let n_obs = series.len();
    if n_obs < VgParams::COUNT {
        return Err(AppError::new(
            ErrorKind::Convergence,
            format!("Underdetermined fit: {n_obs} observations for {} parameters.", VgParams::COUNT),
        ));
    }
    bounds.validate()?;
    if guess.iter().any(|v| !v.is_finite()) || !bounds.contains(&guess) {
        return Err(AppError::new(
            ErrorKind::Convergence,
            format!(
                "Initial guess {guess:?} lies outside bounds {:?}..{:?}.",
                bounds.lower, bounds.upper
            ),
        ));
    }

    let mut x = guess;
    let mut r = residuals(series, &x);
    if r.iter().any(|v| !v.is_finite()) {
        return Err(AppError::new(
            ErrorKind::NumericDomain,
            format!("Model evaluation is non-finite at the initial guess {guess:?}."),
        ));
    }
    let mut cost = r.norm_squared();
    let mut lambda = LAMBDA_INIT;

    for iter in 1..=opts.max_iter {
        if cost < opts.cost_tol {
            return Ok(finish(x, cost, n_obs, iter));
        }

        let jac = jacobian(series, &x, bounds, opts.fd_eps);
        let grad = jac.transpose() * &r;
        if grad.amax() < opts.grad_tol {
            return Ok(finish(x, cost, n_obs, iter));
        }

        // Marquardt scaling: damp each column by its own magnitude so the
        // step is well-conditioned across the very different parameter
        // scales (α vs n).
        let mut scale = [0.0; 4];
        for j in 0..4 {
            scale[j] = jac.column(j).norm_squared().max(DIAG_FLOOR).sqrt();
        }

        let mut aug = DMatrix::<f64>::zeros(n_obs + 4, 4);
        aug.view_mut((0, 0), (n_obs, 4)).copy_from(&jac);
        let sqrt_lambda = lambda.sqrt();
        for j in 0..4 {
            aug[(n_obs + j, j)] = sqrt_lambda * scale[j];
        }
        let mut rhs = DVector::<f64>::zeros(n_obs + 4);
        rhs.rows_mut(0, n_obs).copy_from(&r);

        let Some(delta) = solve_least_squares(&aug, &rhs) else {
            lambda = (lambda * LAMBDA_UP).min(LAMBDA_MAX);
            continue;
        };

        let mut x_new = [
            x[0] + delta[0],
            x[1] + delta[1],
            x[2] + delta[2],
            x[3] + delta[3],
        ];
        bounds.project(&mut x_new);

        // The projected step can collapse even while the raw gradient stays
        // large (optimum pinned on a bound); a vanishing step means the
        // iterate cannot move any further.
        let step = (0..4)
            .map(|j| (x_new[j] - x[j]).powi(2))
            .sum::<f64>()
            .sqrt();
        if step < opts.step_tol {
            return Ok(finish(x, cost, n_obs, iter));
        }

        let r_new = residuals(series, &x_new);
        let cost_new = r_new.norm_squared();

        // A non-finite trial cost fails this comparison and is rejected
        // like any worse step.
        if cost_new < cost {
            let improvement = cost - cost_new;

            x = x_new;
            r = r_new;
            cost = cost_new;
            lambda = (lambda * LAMBDA_DOWN).max(LAMBDA_MIN);

            if improvement <= REL_COST_TOL * cost.max(opts.cost_tol) {
                return Ok(finish(x, cost, n_obs, iter));
            }
        } else {
            lambda = (lambda * LAMBDA_UP).min(LAMBDA_MAX);
        }
    }

    Err(AppError::new(
        ErrorKind::Convergence,
        format!(
            "Fit did not converge within {} iterations (SSE {:.3e}).",
            opts.max_iter, cost
        ),
    ))
}

fn finish(x: [f64; 4], sse: f64, n_obs: usize, iterations: usize) -> VgFit {
    VgFit {
        params: VgParams::from_array(x),
        sse,
        rmse: (sse / n_obs as f64).sqrt(),
        iterations,
    }
}

/// Residual vector r_i = θ_measured,i − θ(h_i; x).
fn residuals(series: &RetentionSeries, x: &[f64; 4]) -> DVector<f64> {
    let p = VgParams::from_array(*x);
    DVector::from_iterator(
        series.len(),
        series
            .head
            .iter()
            .zip(series.theta.iter())
            .map(|(&h, &t)| t - water_content(h, &p)),
    )
}

/// Forward-difference Jacobian of the model, J_ij = ∂θ(h_i)/∂x_j.
///
/// The probe step is scaled to the parameter magnitude and flips to a
/// backward difference when the forward probe would leave the box.
fn jacobian(series: &RetentionSeries, x: &[f64; 4], bounds: &ParamBounds, fd_eps: f64) -> DMatrix<f64> {
    let n_obs = series.len();
    let base = eval_series(series, x);

    let mut jac = DMatrix::<f64>::zeros(n_obs, 4);
    for j in 0..4 {
        let eps = fd_eps * (1.0 + x[j].abs());
        let mut probe = *x;
        let forward = x[j] + eps <= bounds.upper[j];
        if forward {
            probe[j] += eps;
        } else {
            probe[j] -= eps;
        }
        let shifted = eval_series(series, &probe);
        let sign = if forward { 1.0 } else { -1.0 };
        for i in 0..n_obs {
            jac[(i, j)] = sign * (shifted[i] - base[i]) / eps;
        }
    }
    jac
}

fn eval_series(series: &RetentionSeries, x: &[f64; 4]) -> Vec<f64> {
    let p = VgParams::from_array(*x);
    series.head.iter().map(|&h| water_content(h, &p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::predict_series;

    fn series(head: &[f64], theta: &[f64]) -> RetentionSeries {
        RetentionSeries::new(head.to_vec(), theta.to_vec()).unwrap()
    }

    #[test]
    fn recovers_parameters_from_clean_synthetic_data() {
        let truth = VgParams {
            theta_r: 0.08,
            theta_s: 0.42,
            alpha: 0.02,
            n: 1.8,
        };
        let heads = [0.0, 5.0, 20.0, 50.0, 100.0, 300.0, 1000.0, 5000.0];
        let theta = predict_series(&heads, &truth);
        let s = series(&heads, &theta);

        let fit = fit_retention(
            &s,
            [0.05, 0.45, 0.01, 1.5],
            &ParamBounds::default(),
            &FitOptions::default(),
        )
        .unwrap();

        assert!(fit.sse < 1e-8, "sse {}", fit.sse);
        assert!((fit.params.theta_r - truth.theta_r).abs() < 1e-2);
        assert!((fit.params.theta_s - truth.theta_s).abs() < 1e-2);
        assert!((fit.params.alpha - truth.alpha).abs() < 1e-2);
        assert!((fit.params.n - truth.n).abs() < 0.1);
    }

    #[test]
    fn measured_example_converges_with_plausible_saturation() {
        // h = 0 pins θ_s near the measured 0.45.
        let s = series(&[0.0, 10.0, 100.0, 1000.0], &[0.45, 0.40, 0.20, 0.06]);
        let fit = fit_retention(
            &s,
            [0.05, 0.45, 0.01, 1.5],
            &ParamBounds::default(),
            &FitOptions::default(),
        )
        .unwrap();

        assert!(ParamBounds::default().contains(&fit.params.to_array()));
        assert!((fit.params.theta_s - 0.45).abs() < 0.05, "theta_s {}", fit.params.theta_s);
        assert!(fit.params.theta_r < fit.params.theta_s);
        assert!(fit.sse < 5e-3, "sse {}", fit.sse);
    }

    #[test]
    fn fit_is_deterministic() {
        let s = series(&[0.0, 10.0, 100.0, 1000.0], &[0.45, 0.40, 0.20, 0.06]);
        let guess = [0.05, 0.45, 0.01, 1.5];
        let a = fit_retention(&s, guess, &ParamBounds::default(), &FitOptions::default()).unwrap();
        let b = fit_retention(&s, guess, &ParamBounds::default(), &FitOptions::default()).unwrap();
        assert_eq!(a.params.to_array(), b.params.to_array());
        assert_eq!(a.iterations, b.iterations);
    }

    #[test]
    fn parameters_stay_inside_bounds_even_for_unphysical_data() {
        // Water contents above 1 pull θ_s against its upper bound.
        let s = series(
            &[0.0, 10.0, 100.0, 1000.0, 10000.0],
            &[1.3, 1.25, 1.2, 1.1, 0.9],
        );
        let bounds = ParamBounds::default();
        let fit = fit_retention(&s, [0.05, 0.9, 0.01, 1.5], &bounds, &FitOptions::default()).unwrap();
        assert!(bounds.contains(&fit.params.to_array()));
        assert!(fit.params.theta_s > 0.95, "theta_s {}", fit.params.theta_s);
    }

    #[test]
    fn underdetermined_series_is_rejected() {
        let s = series(&[0.0, 100.0], &[0.45, 0.20]);
        let err = fit_retention(
            &s,
            [0.05, 0.45, 0.01, 1.5],
            &ParamBounds::default(),
            &FitOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Convergence);
    }

    #[test]
    fn guess_outside_bounds_is_rejected() {
        let s = series(&[0.0, 10.0, 100.0, 1000.0], &[0.45, 0.40, 0.20, 0.06]);
        let err = fit_retention(
            &s,
            [0.05, 0.45, 0.01, 11.0],
            &ParamBounds::default(),
            &FitOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Convergence);
    }
}
