//! SVG figure rendering via Plotters.
//!
//! Two figures mirror the terminal plots:
//! - retention view: measured scatter + fitted curve, R² annotation
//! - correlation view: (θ_fit, θ_meas) scatter + regression line,
//!   regression-equation annotation

use std::path::Path;

use plotters::prelude::*;

use crate::domain::RetentionSeries;
use crate::error::{AppError, ErrorKind};

const FIGURE_SIZE: (u32, u32) = (800, 600);

/// Write the retention-fit figure.
///
/// `curve` must be sorted ascending by head so the fitted line draws
/// connected (see `report::sorted_curve_points`).
pub fn write_retention_svg(
    path: &Path,
    series: &RetentionSeries,
    curve: &[(f64, f64)],
    r2: f64,
) -> Result<(), AppError> {
    let (x_min, x_max) = padded_range(
        series
            .head
            .iter()
            .copied()
            .chain(curve.iter().map(|p| p.0)),
    );
    let (y_min, y_max) = padded_range(
        series
            .theta
            .iter()
            .copied()
            .chain(curve.iter().map(|p| p.1)),
    );

    let root = SVGBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| render_err(path, e))?;

    let mut chart = ChartBuilder::on(&root)
        .caption("van Genuchten Model Fit", ("sans-serif", 24))
        .margin(12)
        .x_label_area_size(44)
        .y_label_area_size(56)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(|e| render_err(path, e))?;

    chart
        .configure_mesh()
        .x_desc("Pressure head h")
        .y_desc("Water content theta")
        .draw()
        .map_err(|e| render_err(path, e))?;

    chart
        .draw_series(LineSeries::new(curve.iter().copied(), &RED))
        .map_err(|e| render_err(path, e))?
        .label("Fitted")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], RED));

    chart
        .draw_series(
            series
                .head
                .iter()
                .zip(series.theta.iter())
                .map(|(&h, &t)| Circle::new((h, t), 3, BLUE.filled())),
        )
        .map_err(|e| render_err(path, e))?
        .label("Measured")
        .legend(|(x, y)| Circle::new((x + 8, y), 3, BLUE.filled()));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(|e| render_err(path, e))?;

    root.draw(&Text::new(
        format!("R2 = {r2:.4}"),
        (70, 44),
        ("sans-serif", 16),
    ))
    .map_err(|e| render_err(path, e))?;

    root.present().map_err(|e| render_err(path, e))?;
    Ok(())
}

/// Write the measured-vs-fitted correlation figure.
///
/// `line` must be sorted ascending by θ_fit (see
/// `report::correlation_line_points`).
pub fn write_correlation_svg(
    path: &Path,
    pairs: &[(f64, f64)],
    line: &[(f64, f64)],
    slope: f64,
    intercept: f64,
    r2: f64,
) -> Result<(), AppError> {
    let (x_min, x_max) = padded_range(pairs.iter().map(|p| p.0).chain(line.iter().map(|p| p.0)));
    let (y_min, y_max) = padded_range(pairs.iter().map(|p| p.1).chain(line.iter().map(|p| p.1)));

    let root = SVGBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| render_err(path, e))?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Correlation: Measured vs Fitted theta", ("sans-serif", 24))
        .margin(12)
        .x_label_area_size(44)
        .y_label_area_size(56)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(|e| render_err(path, e))?;

    chart
        .configure_mesh()
        .x_desc("Fitted theta")
        .y_desc("Measured theta")
        .draw()
        .map_err(|e| render_err(path, e))?;

    chart
        .draw_series(LineSeries::new(line.iter().copied(), &BLACK))
        .map_err(|e| render_err(path, e))?
        .label("Linear fit")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], BLACK));

    chart
        .draw_series(
            pairs
                .iter()
                .map(|&(f, m)| Circle::new((f, m), 3, GREEN.filled())),
        )
        .map_err(|e| render_err(path, e))?
        .label("Measured vs fitted")
        .legend(|(x, y)| Circle::new((x + 8, y), 3, GREEN.filled()));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(|e| render_err(path, e))?;

    root.draw(&Text::new(
        format!("theta = {slope:.4} * theta_fit + {intercept:.4}   R2 = {r2:.4}"),
        (70, 44),
        ("sans-serif", 16),
    ))
    .map_err(|e| render_err(path, e))?;

    root.present().map_err(|e| render_err(path, e))?;
    Ok(())
}

fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        if v.is_finite() {
            min = min.min(v);
            max = max.max(v);
        }
    }
    if !(min.is_finite() && max.is_finite()) {
        return (0.0, 1.0);
    }
    if min == max {
        return (min - 0.5, max + 0.5);
    }
    let pad = (max - min) * 0.05;
    (min - pad, max + pad)
}

fn render_err(path: &Path, e: impl std::fmt::Display) -> AppError {
    AppError::new(
        ErrorKind::Io,
        format!("Failed to render SVG '{}': {e}", path.display()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retention_svg_is_written() {
        let series =
            RetentionSeries::new(vec![0.0, 10.0, 100.0, 1000.0], vec![0.45, 0.40, 0.20, 0.06])
                .unwrap();
        let curve: Vec<(f64, f64)> = (0..=100)
            .map(|i| {
                let h = i as f64 * 10.0;
                (h, 0.45 - 0.39 * (h / 1000.0))
            })
            .collect();

        let path = std::env::temp_dir().join("swrc-retention-test.svg");
        write_retention_svg(&path, &series, &curve, 0.99).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert!(text.contains("<svg"));
    }

    #[test]
    fn correlation_svg_is_written() {
        let pairs = [(0.07, 0.06), (0.19, 0.20), (0.41, 0.40), (0.45, 0.45)];
        let line = [(0.07, 0.07), (0.45, 0.45)];

        let path = std::env::temp_dir().join("swrc-correlation-test.svg");
        write_correlation_svg(&path, &pairs, &line, 1.0, 0.0, 0.99).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert!(text.contains("<svg"));
    }
}
