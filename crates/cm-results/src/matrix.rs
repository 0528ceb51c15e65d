//! The result matrix contract shared with visualization and export.
//!
//! Row 0 of every exported matrix is `"<label>;<start>;<end>"`. Data rows
//! follow, one value per test point. Matrices normalized by occupancy carry a
//! final row with the occupied-hour count of each point.

use cm_series::{AnalysisPeriod, DateTuple};
use serde::{Deserialize, Serialize};

use crate::types::{MetricValue, SummaryMode};
use crate::{ResultsError, ResultsResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultMatrix {
    pub label: String,
    pub period: AnalysisPeriod,
    /// One row per hour of the period (or a single aggregate row).
    pub rows: Vec<Vec<f64>>,
    /// Per-point occupied-hour counts used as the aggregation denominator.
    #[serde(default)]
    pub occupied_hours: Option<Vec<f64>>,
}

/// Split a header line into label and period.
pub fn parse_header(line: &str) -> ResultsResult<(String, AnalysisPeriod)> {
    let bad = |message: String| ResultsError::Parse { line: 1, message };
    let mut parts = line.trim().rsplitn(3, ';');
    let (Some(end), Some(start), Some(label)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(bad(format!("expected '<label>;<start>;<end>', got '{line}'")));
    };
    let start: DateTuple = start.parse()?;
    let end: DateTuple = end.parse()?;
    Ok((label.to_string(), AnalysisPeriod::new(start, end)))
}

/// Label of a summary reported in hours rather than percent.
pub fn hours_label(label: &str) -> String {
    if label.contains("Percent") {
        label.replace("Percent", "Hours")
    } else {
        format!("{label} Hours")
    }
}

impl ResultMatrix {
    pub fn new(label: impl Into<String>, period: AnalysisPeriod) -> Self {
        Self {
            label: label.into(),
            period,
            rows: Vec::new(),
            occupied_hours: None,
        }
    }

    pub fn with_rows(mut self, rows: Vec<Vec<f64>>) -> Self {
        self.rows = rows;
        self
    }

    pub fn with_occupied_hours(mut self, occupied: Vec<f64>) -> Self {
        self.occupied_hours = Some(occupied);
        self
    }

    pub fn header(&self) -> String {
        format!("{};{}", self.label, self.period)
    }

    pub fn point_count(&self) -> usize {
        self.rows
            .first()
            .map(Vec::len)
            .or_else(|| self.occupied_hours.as_ref().map(Vec::len))
            .unwrap_or(0)
    }

    pub fn hour_count(&self) -> usize {
        self.rows.len()
    }

    /// Check every row (and the occupied row) has one value per point.
    pub fn check_shape(&self) -> ResultsResult<()> {
        let n = self.point_count();
        let ragged = self.rows.iter().position(|r| r.len() != n);
        if let Some(i) = ragged {
            return Err(ResultsError::Shape {
                what: format!(
                    "'{}' row {} has {} values, expected {n}",
                    self.label,
                    i + 1,
                    self.rows[i].len()
                ),
            });
        }
        match &self.occupied_hours {
            Some(occ) if occ.len() != n => Err(ResultsError::Shape {
                what: format!(
                    "'{}' occupied-hours row has {} values, expected {n}",
                    self.label,
                    occ.len()
                ),
            }),
            _ => Ok(()),
        }
    }

    fn column_sum(&self, p: usize) -> f64 {
        self.rows.iter().map(|r| r[p]).sum()
    }

    /// Reduce the hourly rows to one value per point.
    ///
    /// Occupancy-normalized matrices divide by the occupied-hour row; other
    /// "Percent" matrices by the number of hours; anything else is averaged.
    pub fn summarize(&self, mode: SummaryMode) -> ResultsResult<Summary> {
        self.check_shape()?;
        let n = self.point_count();
        let hours = self.rows.len() as f64;
        let is_rate = self.label.contains("Percent") || self.occupied_hours.is_some();

        let values = (0..n)
            .map(|p| {
                let total = self.column_sum(p);
                match (&self.occupied_hours, mode) {
                    (Some(_), SummaryMode::Hours) => MetricValue::Value(total),
                    (Some(occ), SummaryMode::Percent) => {
                        if occ[p] > 0.0 {
                            MetricValue::Value(total / occ[p] * 100.0)
                        } else {
                            MetricValue::Undefined
                        }
                    }
                    (None, _) if self.rows.is_empty() => MetricValue::Undefined,
                    (None, SummaryMode::Hours) if is_rate => MetricValue::Value(total),
                    (None, _) if is_rate => MetricValue::Value(total / hours * 100.0),
                    (None, _) => MetricValue::Value(total / hours),
                }
            })
            .collect();

        let label = if mode == SummaryMode::Hours && is_rate {
            hours_label(&self.label)
        } else {
            self.label.clone()
        };

        Ok(Summary {
            label,
            period: self.period,
            values,
            occupied_hours: self.occupied_hours.clone(),
        })
    }
}

/// One aggregate row per point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub label: String,
    pub period: AnalysisPeriod,
    pub values: Vec<MetricValue>,
    #[serde(default)]
    pub occupied_hours: Option<Vec<f64>>,
}

impl Summary {
    pub fn header(&self) -> String {
        format!("{};{}", self.label, self.period)
    }

    pub fn point_count(&self) -> usize {
        self.values.len()
    }

    pub fn undefined_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_undefined()).count()
    }

    /// Mean over points with a defined value.
    pub fn mean(&self) -> MetricValue {
        let defined: Vec<f64> = self.values.iter().filter_map(MetricValue::value).collect();
        if defined.is_empty() {
            MetricValue::Undefined
        } else {
            MetricValue::Value(defined.iter().sum::<f64>() / defined.len() as f64)
        }
    }
}
