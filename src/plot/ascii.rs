//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observed points: `o`
//! - fitted curve / regression line: `-`

use crate::domain::CurveFile;

/// Render the retention fit: measured points over the fitted curve, with
/// the model R² in the header.
pub fn render_retention_plot(
    points: &[(f64, f64)],
    curve: &[(f64, f64)],
    r2: f64,
    width: usize,
    height: usize,
) -> String {
    render_plot(
        points,
        curve,
        &format!("van Genuchten fit  (R2 = {r2:.4})"),
        "h",
        "theta",
        width,
        height,
    )
}

/// Render the correlation view: (θ_fit, θ_meas) points over the regression
/// line, with the regression equation in the header.
pub fn render_correlation_plot(
    points: &[(f64, f64)],
    line: &[(f64, f64)],
    slope: f64,
    intercept: f64,
    r2: f64,
    width: usize,
    height: usize,
) -> String {
    render_plot(
        points,
        line,
        &format!("theta_meas = {slope:.4} * theta_fit + {intercept:+.4}  (R2 = {r2:.4})"),
        "theta_fit",
        "theta_meas",
        width,
        height,
    )
}

/// Render a saved curve JSON (curve only, no overlay points).
pub fn render_curve_file_plot(curve: &CurveFile, width: usize, height: usize) -> String {
    let pts: Vec<(f64, f64)> = curve
        .grid
        .head
        .iter()
        .zip(curve.grid.theta.iter())
        .map(|(&h, &t)| (h, t))
        .collect();
    render_plot(
        &[],
        &pts,
        &format!("van Genuchten curve  (R2 = {:.4})", curve.quality.r2_model),
        "h",
        "theta",
        width,
        height,
    )
}

fn render_plot(
    points: &[(f64, f64)],
    curve: &[(f64, f64)],
    title: &str,
    x_label: &str,
    y_label: &str,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (x_min, x_max) = pad_range(axis_range(points, curve, |p| p.0));
    let (y_min, y_max) = pad_range(axis_range(points, curve, |p| p.1));

    let mut grid = vec![vec![' '; width]; height];

    // Draw curve first (so points can overlay).
    draw_curve(&mut grid, curve, x_min, x_max, y_min, y_max);
    for &(x, y) in points {
        if let Some((r, c)) = to_cell(x, y, x_min, x_max, y_min, y_max, width, height) {
            grid[r][c] = 'o';
        }
    }

    let label_width = 9;
    let mut out = String::new();
    out.push_str(title);
    out.push('\n');

    for (r, row) in grid.iter().enumerate() {
        let label = if r == 0 {
            format!("{y_max:>8.4}")
        } else if r == height - 1 {
            format!("{y_min:>8.4}")
        } else if r == height / 2 {
            format!("{:>8.4}", (y_min + y_max) / 2.0)
        } else {
            " ".repeat(8)
        };
        out.push_str(&label);
        out.push('|');
        out.push_str(&row.iter().collect::<String>());
        out.push('\n');
    }

    out.push_str(&" ".repeat(label_width - 1));
    out.push('+');
    out.push_str(&"-".repeat(width));
    out.push('\n');

    let left = format!("{x_min:.2}");
    let right = format!("{x_max:.2}");
    let gap = width.saturating_sub(left.len() + right.len());
    out.push_str(&" ".repeat(label_width));
    out.push_str(&left);
    out.push_str(&" ".repeat(gap));
    out.push_str(&right);
    out.push_str(&format!("  [{x_label} vs {y_label}]\n"));

    out
}

fn axis_range(points: &[(f64, f64)], curve: &[(f64, f64)], pick: fn(&(f64, f64)) -> f64) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for p in points.iter().chain(curve.iter()) {
        let v = pick(p);
        if v.is_finite() {
            min = min.min(v);
            max = max.max(v);
        }
    }
    if !(min.is_finite() && max.is_finite()) {
        return (0.0, 1.0);
    }
    (min, max)
}

fn pad_range((min, max): (f64, f64)) -> (f64, f64) {
    if min == max {
        return (min - 0.5, max + 0.5);
    }
    let pad = (max - min) * 0.05;
    (min - pad, max + pad)
}

fn draw_curve(
    grid: &mut [Vec<char>],
    curve: &[(f64, f64)],
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
) {
    if curve.len() < 2 {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    // One sample per column, linearly interpolated between curve points.
    for c in 0..width {
        let x = x_min + (c as f64 + 0.5) / width as f64 * (x_max - x_min);
        let Some(y) = interpolate(curve, x) else {
            continue;
        };
        if let Some((r, cc)) = to_cell(x, y, x_min, x_max, y_min, y_max, width, height) {
            if grid[r][cc] == ' ' {
                grid[r][cc] = '-';
            }
        }
    }
}

fn interpolate(curve: &[(f64, f64)], x: f64) -> Option<f64> {
    let first = curve.first()?;
    let last = curve.last()?;
    if x < first.0 || x > last.0 {
        return None;
    }
    for w in curve.windows(2) {
        let (x0, y0) = w[0];
        let (x1, y1) = w[1];
        if x >= x0 && x <= x1 {
            if x1 == x0 {
                return Some(y0);
            }
            let u = (x - x0) / (x1 - x0);
            return Some(y0 + u * (y1 - y0));
        }
    }
    None
}

#[allow(clippy::too_many_arguments)]
fn to_cell(
    x: f64,
    y: f64,
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    width: usize,
    height: usize,
) -> Option<(usize, usize)> {
    if !(x.is_finite() && y.is_finite()) || x_max <= x_min || y_max <= y_min {
        return None;
    }
    let u = (x - x_min) / (x_max - x_min);
    let v = (y - y_min) / (y_max - y_min);
    if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) {
        return None;
    }
    let c = ((u * (width as f64 - 1.0)).round() as usize).min(width - 1);
    let r = (((1.0 - v) * (height as f64 - 1.0)).round() as usize).min(height - 1);
    Some((r, c))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_curve() -> Vec<(f64, f64)> {
        (0..=100)
            .map(|i| {
                let h = i as f64 * 10.0;
                (h, 0.45 - 0.39 * (h / 1000.0))
            })
            .collect()
    }

    #[test]
    fn render_is_deterministic() {
        let points = [(0.0, 0.45), (10.0, 0.40), (100.0, 0.20), (1000.0, 0.06)];
        let curve = sample_curve();
        let a = render_retention_plot(&points, &curve, 0.99, 60, 15);
        let b = render_retention_plot(&points, &curve, 0.99, 60, 15);
        assert_eq!(a, b);
    }

    #[test]
    fn render_contains_points_and_curve() {
        let points = [(0.0, 0.45), (10.0, 0.40), (100.0, 0.20), (1000.0, 0.06)];
        let plot = render_retention_plot(&points, &sample_curve(), 0.99, 60, 15);
        assert!(plot.contains('o'));
        assert!(plot.contains('-'));
        assert!(plot.contains("R2 = 0.9900"));
        // Title + grid rows + axis + x labels.
        assert_eq!(plot.lines().count(), 15 + 3);
    }

    #[test]
    fn correlation_header_carries_equation() {
        let points = [(0.1, 0.12), (0.2, 0.21), (0.3, 0.29)];
        let line = [(0.1, 0.1), (0.3, 0.3)];
        let plot = render_correlation_plot(&points, &line, 1.0, 0.0, 0.98, 40, 10);
        assert!(plot.contains("theta_meas = 1.0000"));
    }
}
