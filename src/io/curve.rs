//! Read/write curve JSON files.
//!
//! Curve JSON is the "portable" representation of a fitted retention curve:
//! - the four van Genuchten parameters
//! - fit quality and optimizer diagnostics
//! - a precomputed (head, θ) grid for quick re-plotting
//!
//! The schema is defined by `domain::CurveFile`.

use std::fs::File;
use std::path::Path;

use crate::domain::{CurveFile, CurveGrid, FitQuality, RetentionSeries, VgFit};
use crate::error::{AppError, ErrorKind};
use crate::models::water_content;

/// Number of grid samples precomputed for plotting.
const GRID_POINTS: usize = 101;

/// Write a curve JSON file.
pub fn write_curve_json(
    path: &Path,
    fit: &VgFit,
    quality: &FitQuality,
    series: &RetentionSeries,
) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(
            ErrorKind::Io,
            format!("Failed to create curve JSON '{}': {e}", path.display()),
        )
    })?;

    let head_min = series.head.iter().copied().fold(f64::INFINITY, f64::min);
    let head_max = series.head.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let grid = build_grid(fit, head_min, head_max, GRID_POINTS);

    let curve = CurveFile {
        tool: "swrc".to_string(),
        params: fit.params,
        quality: *quality,
        sse: fit.sse,
        rmse: fit.rmse,
        grid,
    };

    serde_json::to_writer_pretty(file, &curve).map_err(|e| {
        AppError::new(
            ErrorKind::Io,
            format!("Failed to write curve JSON '{}': {e}", path.display()),
        )
    })?;

    Ok(())
}

/// Read a curve JSON file.
pub fn read_curve_json(path: &Path) -> Result<CurveFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(
            ErrorKind::Io,
            format!("Failed to open curve JSON '{}': {e}", path.display()),
        )
    })?;
    let curve: CurveFile = serde_json::from_reader(file)
        .map_err(|e| AppError::new(ErrorKind::Io, format!("Invalid curve JSON: {e}")))?;
    Ok(curve)
}

/// Sample the fitted curve on an ascending head grid.
///
/// Heads ascend so the reloaded curve plots as a connected line.
fn build_grid(fit: &VgFit, head_min: f64, head_max: f64, n: usize) -> CurveGrid {
    let n = n.max(2);
    let mut h0 = head_min;
    let mut h1 = head_max;
    if !(h0.is_finite() && h1.is_finite()) || h1 < h0 {
        h0 = 0.0;
        h1 = 1000.0;
    }
    if (h1 - h0).abs() < 1e-9 {
        h0 = (h0 - 0.5).max(0.0);
        h1 += 0.5;
    }

    let mut head = Vec::with_capacity(n);
    let mut theta = Vec::with_capacity(n);
    for i in 0..n {
        let u = i as f64 / (n as f64 - 1.0);
        let h = h0 + u * (h1 - h0);
        head.push(h);
        theta.push(water_content(h, &fit.params));
    }

    CurveGrid { head, theta }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::VgParams;

    fn fit() -> VgFit {
        VgFit {
            params: VgParams {
                theta_r: 0.05,
                theta_s: 0.45,
                alpha: 0.01,
                n: 1.5,
            },
            sse: 1e-4,
            rmse: 5e-3,
            iterations: 17,
        }
    }

    #[test]
    fn grid_is_ascending_and_starts_at_saturation() {
        let grid = build_grid(&fit(), 0.0, 1000.0, 101);
        assert_eq!(grid.head.len(), 101);
        assert!(grid.head.windows(2).all(|w| w[0] < w[1]));
        assert!((grid.theta[0] - 0.45).abs() < 1e-12);
    }

    #[test]
    fn curve_json_round_trips() {
        let series =
            RetentionSeries::new(vec![0.0, 10.0, 100.0, 1000.0], vec![0.45, 0.40, 0.20, 0.06])
                .unwrap();
        let quality = FitQuality {
            r2_model: 0.99,
            slope: 1.0,
            intercept: 0.0,
            r2_linear: 0.99,
        };
        let path = std::env::temp_dir().join("swrc-curve-test.json");

        write_curve_json(&path, &fit(), &quality, &series).unwrap();
        let curve = read_curve_json(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(curve.tool, "swrc");
        assert_eq!(curve.params, fit().params);
        assert_eq!(curve.grid.head.len(), 101);
        assert!((curve.quality.r2_model - 0.99).abs() < 1e-12);
    }
}
