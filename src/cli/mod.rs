//! Command-line parsing for the retention-curve fitter.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the modeling/math code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "swrc", version, about = "van Genuchten Soil-Water-Retention Curve Fitter")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit the retention model to a CSV, print diagnostics, and optionally
    /// plot/export.
    Fit(FitArgs),
    /// Plot a previously exported curve JSON.
    Plot(PlotArgs),
}

/// Options for fitting.
#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    /// Input CSV: pressure head in the first column, water content in the
    /// second. A header row is detected automatically.
    pub input: PathBuf,

    /// Initial guess: theta_r theta_s alpha n.
    #[arg(
        long,
        num_args = 4,
        value_names = ["THETA_R", "THETA_S", "ALPHA", "N"],
        default_values_t = [0.05, 0.45, 0.01, 1.5]
    )]
    pub guess: Vec<f64>,

    /// Upper bounds for theta_r theta_s alpha n (lower bounds are all 0).
    #[arg(
        long,
        num_args = 4,
        value_names = ["THETA_R", "THETA_S", "ALPHA", "N"],
        default_values_t = [1.0, 1.0, 1.0, 10.0]
    )]
    pub upper: Vec<f64>,

    /// Maximum optimizer iterations.
    #[arg(long, default_value_t = 200)]
    pub max_iter: usize,

    /// Render ASCII plots in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plots.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 90)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 22)]
    pub height: usize,

    /// Export result tables as <STEM>_fitted.csv and <STEM>_parameters.csv.
    #[arg(long, value_name = "STEM")]
    pub export: Option<PathBuf>,

    /// Export the fitted curve (params + quality + grid) to JSON.
    #[arg(long = "export-curve", value_name = "JSON")]
    pub export_curve: Option<PathBuf>,

    /// Write SVG figures as <STEM>_fit.svg and <STEM>_correlation.svg.
    #[arg(long, value_name = "STEM")]
    pub svg: Option<PathBuf>,
}

/// Options for plotting a saved curve.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Curve JSON file produced by `swrc fit --export-curve`.
    #[arg(long, value_name = "JSON")]
    pub curve: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 90)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 22)]
    pub height: usize,
}
