//! Batch validation of headered series.
//!
//! Validation never returns early: every applicable problem category is
//! reported once so the caller can show the full list.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::SeriesResult;
use crate::header::{SeriesHeader, SeriesRecord, Timestep};
use crate::kind::{DataKind, units_match};
use crate::period::{AnalysisPeriod, PeriodIndex};
use crate::series::HourlySeries;
use cm_core::HOURS_PER_YEAR;

/// Problem category. At most one diagnostic per category per batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticKind {
    Empty,
    MissingHeader,
    Malformed,
    LengthMismatch,
    PeriodMismatch,
    TypeMismatch,
    NotHourly,
    UnitMismatch,
}

/// A human readable validation finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub input: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.input, self.message)
    }
}

/// Decoded data of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSeries {
    pub kind: DataKind,
    pub units: String,
    pub headers: Vec<SeriesHeader>,
    pub series: Vec<HourlySeries>,
    pub period: AnalysisPeriod,
    /// Accepted as a single headerless year of data.
    pub best_effort: bool,
}

impl ValidatedSeries {
    fn empty(kind: &DataKind) -> Self {
        Self {
            kind: kind.clone(),
            units: kind.expected_units().unwrap_or_default().to_string(),
            headers: Vec::new(),
            series: Vec::new(),
            period: AnalysisPeriod::whole_year(),
            best_effort: false,
        }
    }

    /// Position lookup for the recorded period.
    pub fn index(&self) -> SeriesResult<PeriodIndex> {
        PeriodIndex::new(&self.period)
    }
}

/// Result of [`validate_series`].
#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    pub ok: bool,
    pub diagnostics: Vec<Diagnostic>,
    pub data: ValidatedSeries,
}

impl ValidationOutcome {
    /// Check that the requested analysis period lies inside the data period.
    pub fn check_period(&mut self, input: &str, requested: &AnalysisPeriod) {
        let aligned = match (self.data.index(), requested.hoys()) {
            (Ok(index), Ok(hoys)) => index.aligns_with(&hoys),
            _ => false,
        };
        if !aligned {
            push(
                &mut self.diagnostics,
                DiagnosticKind::PeriodMismatch,
                input,
                format!(
                    "analysis period {requested} does not align with the data period {}",
                    self.data.period
                ),
            );
            self.ok = false;
        }
    }

    pub fn into_result(self) -> Result<ValidatedSeries, Vec<Diagnostic>> {
        if self.ok {
            Ok(self.data)
        } else {
            Err(self.diagnostics)
        }
    }
}

fn push(diags: &mut Vec<Diagnostic>, kind: DiagnosticKind, input: &str, message: String) {
    if diags.iter().any(|d| d.kind == kind) {
        return;
    }
    warn!(input, ?kind, "{message}");
    diags.push(Diagnostic {
        kind,
        input: input.to_string(),
        message,
    });
}

fn kind_matches(expected: &DataKind, actual: &DataKind, data_type: &str) -> bool {
    match expected {
        DataKind::Other(label) => data_type
            .to_ascii_lowercase()
            .contains(&label.to_ascii_lowercase()),
        _ => expected == actual,
    }
}

/// Validate a batch of records that must all be of `expected` kind.
///
/// `input` names the batch in diagnostics (e.g. `"surface temperatures"`).
pub fn validate_series(
    input: &str,
    records: &[SeriesRecord],
    expected: &DataKind,
) -> ValidationOutcome {
    let mut diags = Vec::new();
    let mut data = ValidatedSeries::empty(expected);

    if records.is_empty() || records.iter().all(SeriesRecord::is_empty) {
        push(
            &mut diags,
            DiagnosticKind::Empty,
            input,
            "no data was connected".to_string(),
        );
        return ValidationOutcome {
            ok: false,
            diagnostics: diags,
            data,
        };
    }

    let headerless = records.iter().filter(|r| !r.has_header()).count();
    if headerless > 0 {
        let single_year = records.len() == 1 && records[0].len() == HOURS_PER_YEAR;
        if single_year {
            debug!(input, "accepting headerless 8760 series in best-effort mode");
            match HourlySeries::from_record(&records[0], expected.clone()) {
                Ok(series) => {
                    data.series.push(series);
                    data.best_effort = true;
                }
                Err(e) => push(&mut diags, DiagnosticKind::Malformed, input, e.to_string()),
            }
        } else {
            push(
                &mut diags,
                DiagnosticKind::MissingHeader,
                input,
                format!(
                    "{headerless} series lack the '{}' header",
                    crate::header::HEADER_KEY
                ),
            );
        }
        let ok = diags.is_empty();
        return ValidationOutcome {
            ok,
            diagnostics: diags,
            data,
        };
    }

    for record in records {
        match HourlySeries::from_record(record, expected.clone()) {
            Ok(series) => data.series.push(series),
            Err(e) => push(&mut diags, DiagnosticKind::Malformed, input, e.to_string()),
        }
    }

    let headers: Vec<SeriesHeader> = data
        .series
        .iter()
        .filter_map(|s| s.header.clone())
        .collect();

    if let Some(first) = headers.first() {
        data.units = first.units.clone();
        data.period = first.period();

        let first_len = data.series[0].len();
        if data.series.iter().any(|s| s.len() != first_len) {
            push(
                &mut diags,
                DiagnosticKind::LengthMismatch,
                input,
                "series have different lengths".to_string(),
            );
        }
        if data.series.iter().any(|s| s.len() > HOURS_PER_YEAR) {
            push(
                &mut diags,
                DiagnosticKind::LengthMismatch,
                input,
                format!("series are longer than {HOURS_PER_YEAR} hours"),
            );
        }
        for s in &data.series {
            let declared = s.period().len().unwrap_or(0);
            if declared != s.len() {
                push(
                    &mut diags,
                    DiagnosticKind::LengthMismatch,
                    input,
                    format!(
                        "'{}' holds {} samples but its period spans {declared} hours",
                        s.name(),
                        s.len()
                    ),
                );
            }
        }

        if headers
            .iter()
            .any(|h| h.timestep != first.timestep || h.start != first.start || h.end != first.end)
        {
            push(
                &mut diags,
                DiagnosticKind::PeriodMismatch,
                input,
                "series do not share one timestep and analysis period".to_string(),
            );
        }

        if headers.iter().any(|h| h.timestep != Timestep::Hourly) {
            push(
                &mut diags,
                DiagnosticKind::NotHourly,
                input,
                "data must be hourly".to_string(),
            );
        }

        for s in &data.series {
            let data_type = s.header.as_ref().map(|h| h.data_type.as_str()).unwrap_or("");
            if !kind_matches(expected, &s.kind, data_type) {
                push(
                    &mut diags,
                    DiagnosticKind::TypeMismatch,
                    input,
                    format!("expected {expected} data but found '{data_type}'"),
                );
            }
        }

        let units_differ = headers.iter().any(|h| !units_match(&first.units, &h.units));
        let wrong_units = expected
            .expected_units()
            .is_some_and(|u| headers.iter().any(|h| !units_match(u, &h.units)));
        if units_differ || wrong_units {
            push(
                &mut diags,
                DiagnosticKind::UnitMismatch,
                input,
                format!(
                    "expected units '{}' but found '{}'",
                    expected.expected_units().unwrap_or(first.units.as_str()),
                    first.units
                ),
            );
        }
    }

    data.headers = headers;
    ValidationOutcome {
        ok: diags.is_empty(),
        diagnostics: diags,
        data,
    }
}
