//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::domain::{FitQuality, VgFit};
use crate::io::ingest::IngestedData;
use crate::report::{ParameterTable, ResultTable};

/// Format the full run summary (dataset stats + fit diagnostics + quality).
pub fn format_run_summary(ingest: &IngestedData, fit: &VgFit, quality: &FitQuality) -> String {
    let mut out = String::new();

    out.push_str("=== swrc - van Genuchten Retention Fit ===\n");
    out.push_str(&format!(
        "Points: n={} | h=[{:.3}, {:.3}] | theta=[{:.4}, {:.4}]\n",
        ingest.stats.n_points,
        ingest.stats.head_min,
        ingest.stats.head_max,
        ingest.stats.theta_min,
        ingest.stats.theta_max
    ));
    if !ingest.row_errors.is_empty() {
        out.push_str(&format!(
            "Rows: read={} used={} skipped={}\n",
            ingest.rows_read,
            ingest.rows_used,
            ingest.row_errors.len()
        ));
        for e in &ingest.row_errors {
            out.push_str(&format!("  (line {}) {}\n", e.line, e.message));
        }
    }

    out.push_str("\nFit diagnostics:\n");
    out.push_str(&format!(
        "- SSE={:.6e} RMSE={:.6e} iterations={}\n",
        fit.sse, fit.rmse, fit.iterations
    ));
    out.push_str(&format!(
        "- theta_r={:.6} theta_s={:.6} alpha={:.6} n={:.6}\n",
        fit.params.theta_r, fit.params.theta_s, fit.params.alpha, fit.params.n
    ));

    out.push_str("\nGoodness of fit:\n");
    out.push_str(&format!("- R2 (model)  = {:.6}\n", quality.r2_model));
    out.push_str(&format!(
        "- linear check: theta_meas = {:.6} * theta_fit + {:.6}, R2 = {:.6}\n",
        quality.slope, quality.intercept, quality.r2_linear
    ));
    out.push('\n');

    out
}

/// Format the per-point result table.
pub fn format_result_table(table: &ResultTable) -> String {
    let mut out = String::new();

    out.push_str("Fitted data:\n");
    out.push_str(&format!(
        "{:>14} {:>14} {:>14}\n",
        "pressure_head", "theta_measured", "theta_fitted"
    ));
    out.push_str(&format!("{:->14} {:->14} {:->14}\n", "", "", ""));
    for row in &table.rows {
        out.push_str(&format!(
            "{:>14.4} {:>14.6} {:>14.6}\n",
            row.head, row.theta_obs, row.theta_fit
        ));
    }

    out
}

/// Format the parameter/metric table.
pub fn format_parameter_table(table: &ParameterTable) -> String {
    let mut out = String::new();

    out.push_str("Parameters:\n");
    for (name, value) in &table.entries {
        out.push_str(&format!("{name:<12} {value:>14.6}\n"));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FitQuality, VgParams};
    use crate::report::build_parameter_table;

    #[test]
    fn parameter_table_formats_all_rows() {
        let params = VgParams {
            theta_r: 0.05,
            theta_s: 0.45,
            alpha: 0.01,
            n: 1.5,
        };
        let quality = FitQuality {
            r2_model: 0.99,
            slope: 1.0,
            intercept: 0.0,
            r2_linear: 0.98,
        };
        let text = format_parameter_table(&build_parameter_table(&params, &quality));
        assert_eq!(text.lines().count(), 9);
        assert!(text.contains("theta_r"));
        assert!(text.contains("R2 (linear)"));
    }
}
