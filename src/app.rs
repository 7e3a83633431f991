//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads the observation CSV
//! - runs the fit + quality pipeline
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;

use crate::cli::{Command, FitArgs, PlotArgs};
use crate::domain::{FitConfig, ParamBounds};
use crate::error::{AppError, ErrorKind};
use crate::io::export::stem_path;
use crate::report::{correlation_line_points, sorted_curve_points};

pub mod pipeline;

/// Entry point for the `swrc` binary.
pub fn run() -> Result<(), AppError> {
    // We want `swrc data.csv` to behave like `swrc fit data.csv`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Plot(args) => handle_plot(args),
    }
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = fit_config_from_args(&args)?;
    let run = pipeline::run_fit(&config)?;
    let out = &run.output;

    println!(
        "{}",
        crate::report::format_run_summary(&run.ingest, &out.fit, &out.quality)
    );
    println!("{}", crate::report::format_result_table(&out.result_table));
    println!("{}", crate::report::format_parameter_table(&out.parameter_table));

    let curve = sorted_curve_points(&run.ingest.series, &out.fitted);
    let corr_pairs: Vec<(f64, f64)> = out
        .fitted
        .iter()
        .copied()
        .zip(run.ingest.series.theta.iter().copied())
        .collect();
    let corr_line = correlation_line_points(&out.fitted, out.quality.slope, out.quality.intercept);

    if config.plot {
        let obs: Vec<(f64, f64)> = run
            .ingest
            .series
            .head
            .iter()
            .copied()
            .zip(run.ingest.series.theta.iter().copied())
            .collect();
        println!(
            "{}",
            crate::plot::render_retention_plot(
                &obs,
                &curve,
                out.quality.r2_model,
                config.plot_width,
                config.plot_height,
            )
        );
        println!(
            "{}",
            crate::plot::render_correlation_plot(
                &corr_pairs,
                &corr_line,
                out.quality.slope,
                out.quality.intercept,
                out.quality.r2_linear,
                config.plot_width,
                config.plot_height,
            )
        );
    }

    if let Some(stem) = &config.export_tables {
        crate::io::export::write_tables_csv(stem, &out.result_table, &out.parameter_table)?;
    }
    if let Some(path) = &config.export_curve {
        crate::io::curve::write_curve_json(path, &out.fit, &out.quality, &run.ingest.series)?;
    }
    if let Some(stem) = &config.export_svg {
        crate::plot::write_retention_svg(
            &stem_path(stem, "_fit.svg"),
            &run.ingest.series,
            &curve,
            out.quality.r2_model,
        )?;
        crate::plot::write_correlation_svg(
            &stem_path(stem, "_correlation.svg"),
            &corr_pairs,
            &corr_line,
            out.quality.slope,
            out.quality.intercept,
            out.quality.r2_linear,
        )?;
    }

    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let curve = crate::io::curve::read_curve_json(&args.curve)?;
    let plot = crate::plot::render_curve_file_plot(&curve, args.width, args.height);
    println!("{plot}");
    Ok(())
}

pub fn fit_config_from_args(args: &FitArgs) -> Result<FitConfig, AppError> {
    let initial_guess = four(&args.guess, "--guess")?;
    let upper = four(&args.upper, "--upper")?;

    Ok(FitConfig {
        input: args.input.clone(),
        initial_guess,
        bounds: ParamBounds {
            lower: [0.0; 4],
            upper,
        },
        max_iter: args.max_iter,
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_tables: args.export.clone(),
        export_curve: args.export_curve.clone(),
        export_svg: args.svg.clone(),
    })
}

fn four(values: &[f64], flag: &str) -> Result<[f64; 4], AppError> {
    values.try_into().map_err(|_| {
        AppError::new(
            ErrorKind::Io,
            format!("{flag} expects exactly 4 values, got {}.", values.len()),
        )
    })
}

/// Rewrite argv so `swrc <file>` defaults to `swrc fit <file>`.
///
/// Rules:
/// - `swrc data.csv ...`       -> `swrc fit data.csv ...`
/// - `swrc --help/--version`   -> unchanged
/// - explicit subcommands      -> unchanged
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "fit" | "plot");
    if is_subcommand {
        return argv;
    }

    if arg1.starts_with('-') {
        return argv;
    }

    argv.insert(1, "fit".to_string());
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_input_path_defaults_to_fit() {
        let out = rewrite_args(args(&["swrc", "data.csv"]));
        assert_eq!(out, args(&["swrc", "fit", "data.csv"]));
    }

    #[test]
    fn explicit_subcommands_and_help_pass_through() {
        let fit = args(&["swrc", "fit", "data.csv"]);
        assert_eq!(rewrite_args(fit.clone()), fit);

        let help = args(&["swrc", "--help"]);
        assert_eq!(rewrite_args(help.clone()), help);
    }

    #[test]
    fn guess_must_have_four_values() {
        let err = four(&[0.05, 0.45], "--guess").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
