//! Plain-text matrix files.
//!
//! Line 1 is the header; each following line is one comma-separated row
//! terminated by a newline. Summaries write their values as a single row,
//! with `undefined` for points that have no occupied hours.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::matrix::{ResultMatrix, Summary, parse_header};
use crate::types::MetricValue;
use crate::{ResultsError, ResultsResult};

fn join_row<T: std::fmt::Display>(out: &mut String, row: &[T]) {
    for (i, v) in row.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let _ = write!(out, "{v}");
    }
    out.push('\n');
}

fn parse_row<T: std::str::FromStr>(line: &str, line_no: usize) -> ResultsResult<Vec<T>>
where
    T::Err: std::fmt::Display,
{
    line.split(',')
        .map(|cell| {
            cell.trim().parse::<T>().map_err(|e| ResultsError::Parse {
                line: line_no,
                message: format!("'{}': {e}", cell.trim()),
            })
        })
        .collect()
}

fn data_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .skip(1)
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty())
}

fn first_line(text: &str) -> ResultsResult<&str> {
    text.lines().next().ok_or_else(|| ResultsError::Parse {
        line: 1,
        message: "file is empty".to_string(),
    })
}

pub fn matrix_to_string(matrix: &ResultMatrix) -> String {
    let mut out = matrix.header();
    out.push('\n');
    for row in &matrix.rows {
        join_row(&mut out, row);
    }
    if let Some(occ) = &matrix.occupied_hours {
        join_row(&mut out, occ);
    }
    out
}

/// Parse a matrix. When `has_occupied_row` is set the last data row is read
/// back as the occupied-hours row.
pub fn matrix_from_str(text: &str, has_occupied_row: bool) -> ResultsResult<ResultMatrix> {
    let (label, period) = parse_header(first_line(text)?)?;
    let mut rows = data_lines(text)
        .map(|(n, l)| parse_row::<f64>(l, n))
        .collect::<ResultsResult<Vec<_>>>()?;
    let occupied_hours = if has_occupied_row { rows.pop() } else { None };
    let matrix = ResultMatrix {
        label,
        period,
        rows,
        occupied_hours,
    };
    matrix.check_shape()?;
    Ok(matrix)
}

pub fn summary_to_string(summary: &Summary) -> String {
    let mut out = summary.header();
    out.push('\n');
    join_row(&mut out, &summary.values);
    if let Some(occ) = &summary.occupied_hours {
        join_row(&mut out, occ);
    }
    out
}

pub fn summary_from_str(text: &str) -> ResultsResult<Summary> {
    let (label, period) = parse_header(first_line(text)?)?;
    let mut lines = data_lines(text);
    let values = match lines.next() {
        Some((n, l)) => parse_row::<MetricValue>(l, n)?,
        None => Vec::new(),
    };
    let occupied_hours = lines.next().map(|(n, l)| parse_row::<f64>(l, n)).transpose()?;
    Ok(Summary {
        label,
        period,
        values,
        occupied_hours,
    })
}

pub fn write_matrix(path: &Path, matrix: &ResultMatrix) -> ResultsResult<()> {
    fs::write(path, matrix_to_string(matrix))?;
    Ok(())
}

pub fn read_matrix(path: &Path, has_occupied_row: bool) -> ResultsResult<ResultMatrix> {
    matrix_from_str(&fs::read_to_string(path)?, has_occupied_row)
}

pub fn write_summary(path: &Path, summary: &Summary) -> ResultsResult<()> {
    fs::write(path, summary_to_string(summary))?;
    Ok(())
}

pub fn read_summary(path: &Path) -> ResultsResult<Summary> {
    summary_from_str(&fs::read_to_string(path)?)
}

/// File name for a matrix label, e.g. `adaptive_thermal_autonomy.csv`.
pub fn file_name(label: &str) -> String {
    let mut name: String = label
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    while name.contains("__") {
        name = name.replace("__", "_");
    }
    format!("{}.csv", name.trim_matches('_'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cm_series::AnalysisPeriod;

    #[test]
    fn layout() {
        let m = ResultMatrix::new("Air Temperature", AnalysisPeriod::single_hour(1).unwrap())
            .with_rows(vec![vec![21.5, 22.0, 22.125]]);
        assert_eq!(
            matrix_to_string(&m),
            "Air Temperature;(1, 1, 1);(1, 1, 1)\n21.5,22,22.125\n"
        );
    }

    #[test]
    fn occupied_row_survives() {
        let m = ResultMatrix::new("PMV Thermal Autonomy", AnalysisPeriod::whole_year())
            .with_rows(vec![vec![1.0, 0.0], vec![0.0, 0.0]])
            .with_occupied_hours(vec![2.0, 0.0]);
        let back = matrix_from_str(&matrix_to_string(&m), true).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn summary_with_undefined() {
        let s = Summary {
            label: "Adaptive Thermal Autonomy".to_string(),
            period: AnalysisPeriod::whole_year(),
            values: vec![MetricValue::Value(50.0), MetricValue::Undefined],
            occupied_hours: Some(vec![10.0, 0.0]),
        };
        let text = summary_to_string(&s);
        assert!(text.lines().nth(1).unwrap().ends_with(",undefined"));
        assert_eq!(summary_from_str(&text).unwrap(), s);
    }

    #[test]
    fn bad_cell_reports_line() {
        let text = "Air Temperature;(1, 1, 1);(1, 1, 2)\n1,2\n3,x\n";
        let err = matrix_from_str(text, false).unwrap_err();
        assert!(matches!(err, ResultsError::Parse { line: 3, .. }));
    }

    #[test]
    fn file_names() {
        assert_eq!(file_name("Adaptive Thermal Autonomy"), "adaptive_thermal_autonomy.csv");
        assert_eq!(file_name("Degrees From Neutral UTCI"), "degrees_from_neutral_utci.csv");
    }
}
