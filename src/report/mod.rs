//! Result assembly: per-point table, parameter table, and plotting views.
//!
//! No computation happens here; inputs are structured into the two export
//! tables with fixed column names and row order, preserving input order and
//! numeric precision. Sorting for the correlation plot is a derived view,
//! never a mutation of the canonical series.

use crate::domain::{FitQuality, RetentionSeries, VgParams};
use crate::error::{AppError, ErrorKind};

pub mod format;

pub use format::*;

/// One row of the per-point result table, index-aligned with the input.
#[derive(Debug, Clone, Copy)]
pub struct ResultRow {
    pub head: f64,
    pub theta_obs: f64,
    pub theta_fit: f64,
}

/// Per-point results in input order.
#[derive(Debug, Clone)]
pub struct ResultTable {
    pub rows: Vec<ResultRow>,
}

/// Scalar parameters and metrics in the fixed export order.
#[derive(Debug, Clone)]
pub struct ParameterTable {
    pub entries: Vec<(&'static str, f64)>,
}

/// Row labels of the parameter table, in export order.
pub const PARAMETER_NAMES: [&str; 8] = [
    "theta_r",
    "theta_s",
    "alpha",
    "n",
    "R2 (model)",
    "a (linear)",
    "b (linear)",
    "R2 (linear)",
];

/// Pair each observation with its fitted value.
pub fn build_result_table(series: &RetentionSeries, fitted: &[f64]) -> Result<ResultTable, AppError> {
    if fitted.len() != series.len() {
        return Err(AppError::new(
            ErrorKind::InputShape,
            format!(
                "Fitted series length {} does not match {} observations.",
                fitted.len(),
                series.len()
            ),
        ));
    }
    let rows = series
        .head
        .iter()
        .zip(series.theta.iter())
        .zip(fitted.iter())
        .map(|((&head, &theta_obs), &theta_fit)| ResultRow {
            head,
            theta_obs,
            theta_fit,
        })
        .collect();
    Ok(ResultTable { rows })
}

/// Flatten parameters and metrics into the fixed 8-row order.
pub fn build_parameter_table(params: &VgParams, quality: &FitQuality) -> ParameterTable {
    let values = [
        params.theta_r,
        params.theta_s,
        params.alpha,
        params.n,
        quality.r2_model,
        quality.slope,
        quality.intercept,
        quality.r2_linear,
    ];
    ParameterTable {
        entries: PARAMETER_NAMES.into_iter().zip(values).collect(),
    }
}

/// (θ_fit, a·θ_fit + b) pairs sorted ascending by θ_fit.
///
/// Drawing the regression line over unsorted fitted values produces visual
/// artifacts, so the correlation plot consumes this view instead.
pub fn correlation_line_points(fitted: &[f64], slope: f64, intercept: f64) -> Vec<(f64, f64)> {
    let mut xs: Vec<f64> = fitted.to_vec();
    xs.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    xs.into_iter().map(|x| (x, slope * x + intercept)).collect()
}

/// (h, θ_fit) pairs sorted ascending by head, for drawing the fitted curve
/// as a connected line.
pub fn sorted_curve_points(series: &RetentionSeries, fitted: &[f64]) -> Vec<(f64, f64)> {
    let mut pts: Vec<(f64, f64)> = series
        .head
        .iter()
        .copied()
        .zip(fitted.iter().copied())
        .collect();
    pts.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
    pts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series() -> RetentionSeries {
        RetentionSeries::new(vec![100.0, 0.0, 10.0], vec![0.20, 0.45, 0.40]).unwrap()
    }

    #[test]
    fn result_table_preserves_input_order() {
        let fitted = [0.21, 0.44, 0.39];
        let table = build_result_table(&series(), &fitted).unwrap();
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0].head, 100.0);
        assert_eq!(table.rows[0].theta_fit, 0.21);
        assert_eq!(table.rows[1].head, 0.0);
        assert_eq!(table.rows[2].theta_obs, 0.40);
    }

    #[test]
    fn result_table_rejects_length_mismatch() {
        let err = build_result_table(&series(), &[0.2, 0.4]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InputShape);
    }

    #[test]
    fn parameter_table_has_fixed_row_order() {
        let params = VgParams {
            theta_r: 0.05,
            theta_s: 0.45,
            alpha: 0.01,
            n: 1.5,
        };
        let quality = FitQuality {
            r2_model: 0.99,
            slope: 1.01,
            intercept: -0.002,
            r2_linear: 0.98,
        };
        let table = build_parameter_table(&params, &quality);
        let names: Vec<&str> = table.entries.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, PARAMETER_NAMES);
        assert_eq!(table.entries[0].1, 0.05);
        assert_eq!(table.entries[4].1, 0.99);
        assert_eq!(table.entries[7].1, 0.98);
    }

    #[test]
    fn plotting_views_sort_without_touching_input() {
        let s = series();
        let fitted = [0.21, 0.44, 0.39];

        let curve = sorted_curve_points(&s, &fitted);
        assert_eq!(curve, vec![(0.0, 0.44), (10.0, 0.39), (100.0, 0.21)]);

        let line = correlation_line_points(&fitted, 1.0, 0.0);
        assert_eq!(line[0].0, 0.21);
        assert_eq!(line[2].0, 0.44);

        // Canonical order untouched.
        assert_eq!(s.head, vec![100.0, 0.0, 10.0]);
    }
}
