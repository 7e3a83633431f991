//! Export the result tables to CSV.
//!
//! One output stem produces two named files, easy to consume in
//! spreadsheets or downstream scripts:
//!
//! - `<stem>_fitted.csv`: per-point results, input order
//! - `<stem>_parameters.csv`: the fixed 8-row parameter/metric table

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{AppError, ErrorKind};
use crate::report::{ParameterTable, ResultTable};

/// Derive `<stem><suffix>` without touching any existing extension logic;
/// the stem is a plain prefix.
pub fn stem_path(stem: &Path, suffix: &str) -> PathBuf {
    let mut s = stem.as_os_str().to_os_string();
    s.push(suffix);
    PathBuf::from(s)
}

/// Write both tables next to each other under one stem.
pub fn write_tables_csv(
    stem: &Path,
    results: &ResultTable,
    parameters: &ParameterTable,
) -> Result<(), AppError> {
    write_fitted_csv(&stem_path(stem, "_fitted.csv"), results)?;
    write_parameters_csv(&stem_path(stem, "_parameters.csv"), parameters)?;
    Ok(())
}

/// Write the per-point result table.
pub fn write_fitted_csv(path: &Path, table: &ResultTable) -> Result<(), AppError> {
    let mut file = create(path)?;

    writeln!(file, "pressure_head,theta_measured,theta_fitted")
        .map_err(|e| write_err(path, e))?;
    for row in &table.rows {
        writeln!(
            file,
            "{:.10},{:.10},{:.10}",
            row.head, row.theta_obs, row.theta_fit
        )
        .map_err(|e| write_err(path, e))?;
    }

    Ok(())
}

/// Write the parameter/metric table in its fixed row order.
pub fn write_parameters_csv(path: &Path, table: &ParameterTable) -> Result<(), AppError> {
    let mut file = create(path)?;

    writeln!(file, "parameter,value").map_err(|e| write_err(path, e))?;
    for (name, value) in &table.entries {
        writeln!(file, "{name},{value:.10}").map_err(|e| write_err(path, e))?;
    }

    Ok(())
}

fn create(path: &Path) -> Result<File, AppError> {
    File::create(path).map_err(|e| {
        AppError::new(
            ErrorKind::Io,
            format!("Failed to create export CSV '{}': {e}", path.display()),
        )
    })
}

fn write_err(path: &Path, e: std::io::Error) -> AppError {
    AppError::new(
        ErrorKind::Io,
        format!("Failed to write export CSV '{}': {e}", path.display()),
    )
}
