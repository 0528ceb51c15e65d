//! Read-back of result files.

use std::path::Path;

use cm_results::{Summary, SummaryMode, csv, is_aggregate_label, parse_header};

use crate::error::{AppError, AppResult};

/// Header and per-point reduction of one result file.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub header: String,
    /// Hour rows of a matrix file; `None` for summary files.
    pub hours: Option<usize>,
    pub summary: Summary,
}

/// Load a matrix or summary file written by a run.
///
/// Matrices are reduced with [`SummaryMode::Percent`], so flag and indicator
/// files report percentages and temperature files report means.
pub fn inspect_file(path: &Path) -> AppResult<FileReport> {
    let text = std::fs::read_to_string(path)?;
    let header = text
        .lines()
        .next()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .ok_or_else(|| AppError::InvalidInput(format!("{} is empty", path.display())))?
        .to_string();

    let is_summary = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with("summary_"));

    if is_summary {
        let summary = csv::summary_from_str(&text)?;
        return Ok(FileReport {
            header,
            hours: None,
            summary,
        });
    }

    let (label, _) = parse_header(&header)?;
    let matrix = csv::matrix_from_str(&text, is_aggregate_label(&label))?;
    let hours = matrix.hour_count();
    let summary = matrix.summarize(SummaryMode::Percent)?;
    Ok(FileReport {
        header,
        hours: Some(hours),
        summary,
    })
}
