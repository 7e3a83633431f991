//! CSV ingest and normalization.
//!
//! This module turns a two-column CSV (pressure head first, water content
//! second) into a validated `RetentionSeries`.
//!
//! Design goals:
//! - **Column order assumed** (h first, θ second); extra columns are ignored
//! - **Row-level validation** (skip malformed rows, but report what happened)
//! - **Deterministic behavior** (no hidden reordering; input order preserved)
//! - **Separation of concerns**: no fitting logic here

use std::fs::File;
use std::path::Path;

use crate::domain::RetentionSeries;
use crate::error::{AppError, ErrorKind};

/// Summary stats about the points actually used for fitting.
#[derive(Debug, Clone)]
pub struct DatasetStats {
    pub n_points: usize,
    pub head_min: f64,
    pub head_max: f64,
    pub theta_min: f64,
    pub theta_max: f64,
}

/// A row-level problem encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: the series + stats + row errors.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub series: RetentionSeries,
    pub stats: DatasetStats,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Load a retention series from a CSV file.
///
/// A leading header row is detected by its first field failing to parse as
/// a number. Rows with fewer than two fields or non-numeric fields are
/// skipped and reported; negative or non-finite parsed values are terminal
/// (`NumericDomain`), and fewer than 4 usable rows is terminal
/// (`InputShape`).
pub fn load_retention_series(path: &Path) -> Result<IngestedData, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(
            ErrorKind::Io,
            format!("Failed to open input CSV '{}': {e}", path.display()),
        )
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut head = Vec::new();
    let mut theta = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, record) in reader.records().enumerate() {
        let line = idx + 1;
        let record = record.map_err(|e| {
            AppError::new(ErrorKind::Io, format!("Failed to read CSV record at line {line}: {e}"))
        })?;
        rows_read += 1;

        if record.len() < 2 {
            row_errors.push(RowError {
                line,
                message: format!("expected 2 columns, found {}", record.len()),
            });
            continue;
        }

        let h = record[0].parse::<f64>();
        let t = record[1].parse::<f64>();
        let (h, t) = match (h, t) {
            (Ok(h), Ok(t)) => (h, t),
            _ => {
                // The first unparseable row is taken to be a header.
                if idx == 0 {
                    continue;
                }
                row_errors.push(RowError {
                    line,
                    message: format!(
                        "non-numeric fields '{}', '{}'",
                        &record[0], &record[1]
                    ),
                });
                continue;
            }
        };

        if !h.is_finite() || !t.is_finite() {
            return Err(AppError::new(
                ErrorKind::NumericDomain,
                format!("Non-finite value at line {line}: h={h}, theta={t}."),
            ));
        }
        if h < 0.0 {
            return Err(AppError::new(
                ErrorKind::NumericDomain,
                format!("Negative pressure head {h} at line {line}."),
            ));
        }

        head.push(h);
        theta.push(t);
    }

    let rows_used = head.len();
    if rows_used < 4 {
        return Err(AppError::new(
            ErrorKind::InputShape,
            format!(
                "Not enough usable data rows in '{}': found {rows_used}, need at least 4.",
                path.display()
            ),
        ));
    }

    let series = RetentionSeries::new(head, theta)?;
    let stats = compute_stats(&series)?;

    Ok(IngestedData {
        series,
        stats,
        row_errors,
        rows_read,
        rows_used,
    })
}

fn compute_stats(series: &RetentionSeries) -> Result<DatasetStats, AppError> {
    if series.is_empty() {
        return Err(AppError::new(
            ErrorKind::InputShape,
            "Empty series; nothing to summarize.",
        ));
    }
    let fold_min = |v: &[f64]| v.iter().copied().fold(f64::INFINITY, f64::min);
    let fold_max = |v: &[f64]| v.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Ok(DatasetStats {
        n_points: series.len(),
        head_min: fold_min(&series.head),
        head_max: fold_max(&series.head),
        theta_min: fold_min(&series.theta),
        theta_max: fold_max(&series.theta),
    })
}
