//! Shared "fit pipeline" logic used by the CLI front-end (and tests).
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! ingest -> fit -> fitted series -> quality -> tables
//!
//! The CLI can then focus on presentation (printing, plotting, exports).

use crate::domain::{FitConfig, FitQuality, ParamBounds, RetentionSeries, VgFit};
use crate::error::AppError;
use crate::fit::{FitOptions, evaluate_fit, fit_retention};
use crate::io::ingest::{IngestedData, load_retention_series};
use crate::models::predict_series;
use crate::report::{ParameterTable, ResultTable, build_parameter_table, build_result_table};

/// Everything derived from one fitted series.
#[derive(Debug, Clone)]
pub struct FitOutput {
    pub fit: VgFit,
    /// Fitted θ values, index-aligned with the input series.
    pub fitted: Vec<f64>,
    pub quality: FitQuality,
    pub result_table: ResultTable,
    pub parameter_table: ParameterTable,
}

/// All computed outputs of a single `swrc fit` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestedData,
    pub output: FitOutput,
}

/// Execute the full fitting pipeline and return the computed outputs.
pub fn run_fit(config: &FitConfig) -> Result<RunOutput, AppError> {
    let ingest = load_retention_series(&config.input)?;

    let opts = FitOptions {
        max_iter: config.max_iter,
        ..FitOptions::default()
    };
    let output = fit_series(&ingest.series, config.initial_guess, &config.bounds, &opts)?;

    Ok(RunOutput { ingest, output })
}

/// Fit one series and derive every downstream artifact.
///
/// This is the pure core of the pipeline: it takes the observation series,
/// initial guess, and bounds explicitly and performs no I/O.
pub fn fit_series(
    series: &RetentionSeries,
    guess: [f64; 4],
    bounds: &ParamBounds,
    opts: &FitOptions,
) -> Result<FitOutput, AppError> {
    let fit = fit_retention(series, guess, bounds, opts)?;
    let fitted = predict_series(&series.head, &fit.params);
    let quality = evaluate_fit(&series.theta, &fitted)?;
    let result_table = build_result_table(series, &fitted)?;
    let parameter_table = build_parameter_table(&fit.params, &quality);

    Ok(FitOutput {
        fit,
        fitted,
        quality,
        result_table,
        parameter_table,
    })
}
