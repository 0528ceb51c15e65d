//! Headered series records.
//!
//! A record is a flat list: the sentinel key, six metadata fields, then the
//! samples. Records arrive as mixed text/number arrays (JSON bundles, CSV
//! columns), so every element is a [`RecordValue`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{SeriesError, SeriesResult};
use crate::period::{AnalysisPeriod, DateTuple};

/// Sentinel string opening every headered record.
pub const HEADER_KEY: &str = "key:location/dataType/units/frequency/startsAt/endsAt";

/// Number of leading non-sample fields (sentinel included).
pub const HEADER_LEN: usize = 7;

/// One element of a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordValue {
    Number(f64),
    Text(String),
}

impl RecordValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RecordValue::Text(s) => Some(s.as_str()),
            RecordValue::Number(_) => None,
        }
    }

    /// Numeric value; text is accepted when it parses as a float.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RecordValue::Number(v) => Some(*v),
            RecordValue::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }
}

impl fmt::Display for RecordValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordValue::Number(v) => write!(f, "{v}"),
            RecordValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for RecordValue {
    fn from(v: f64) -> Self {
        RecordValue::Number(v)
    }
}

impl From<&str> for RecordValue {
    fn from(s: &str) -> Self {
        RecordValue::Text(s.to_string())
    }
}

impl From<String> for RecordValue {
    fn from(s: String) -> Self {
        RecordValue::Text(s)
    }
}

/// Reporting frequency of a series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timestep {
    Hourly,
    Daily,
    Monthly,
    Other(String),
}

impl Timestep {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "hourly" => Timestep::Hourly,
            "daily" => Timestep::Daily,
            "monthly" => Timestep::Monthly,
            _ => Timestep::Other(s.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Timestep::Hourly => "Hourly",
            Timestep::Daily => "Daily",
            Timestep::Monthly => "Monthly",
            Timestep::Other(s) => s.as_str(),
        }
    }
}

/// Metadata fields of a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesHeader {
    pub location: String,
    pub data_type: String,
    pub units: String,
    pub timestep: Timestep,
    pub start: DateTuple,
    pub end: DateTuple,
}

impl SeriesHeader {
    /// Parse the metadata fields following the sentinel.
    pub fn from_fields(fields: &[RecordValue]) -> SeriesResult<Self> {
        if fields.len() < HEADER_LEN - 1 {
            return Err(SeriesError::Length {
                what: "series header".to_string(),
                expected: HEADER_LEN - 1,
                actual: fields.len(),
            });
        }
        let text = |i: usize, field: &'static str| -> SeriesResult<String> {
            fields[i]
                .as_text()
                .map(str::to_string)
                .ok_or_else(|| SeriesError::Parse {
                    field,
                    value: fields[i].to_string(),
                })
        };

        Ok(Self {
            location: text(0, "location")?,
            data_type: text(1, "data type")?,
            units: text(2, "units")?,
            timestep: Timestep::parse(&text(3, "timestep")?),
            start: text(4, "start date")?.parse()?,
            end: text(5, "end date")?.parse()?,
        })
    }

    /// Full header including the sentinel, ready to prefix samples.
    pub fn to_fields(&self) -> Vec<RecordValue> {
        vec![
            HEADER_KEY.into(),
            self.location.clone().into(),
            self.data_type.clone().into(),
            self.units.clone().into(),
            self.timestep.as_str().into(),
            self.start.to_string().into(),
            self.end.to_string().into(),
        ]
    }

    /// Object name embedded in the data-type label, upper-cased.
    ///
    /// `"Inner Surface Temperature for WALL-01: Surface"` gives `"WALL-01"`.
    pub fn name(&self) -> String {
        let tail = match self.data_type.rfind(" for ") {
            Some(pos) => &self.data_type[pos + " for ".len()..],
            None => self.data_type.as_str(),
        };
        let name = tail.split(':').next().unwrap_or(tail);
        name.trim().to_uppercase()
    }

    pub fn period(&self) -> AnalysisPeriod {
        AnalysisPeriod::new(self.start, self.end)
    }
}

/// A raw record as exchanged with the engines.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeriesRecord(pub Vec<RecordValue>);

impl SeriesRecord {
    pub fn new(values: Vec<RecordValue>) -> Self {
        Self(values)
    }

    /// Build a headered record.
    pub fn from_parts(header: &SeriesHeader, samples: &[f64]) -> Self {
        let mut values = header.to_fields();
        values.extend(samples.iter().copied().map(RecordValue::Number));
        Self(values)
    }

    /// Headerless record.
    pub fn from_samples(samples: &[f64]) -> Self {
        Self(samples.iter().copied().map(RecordValue::Number).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn has_header(&self) -> bool {
        matches!(self.0.first(), Some(RecordValue::Text(s)) if s == HEADER_KEY)
    }

    /// Split into header (if any) and numeric samples.
    pub fn split(&self) -> SeriesResult<(Option<SeriesHeader>, Vec<f64>)> {
        if self.0.is_empty() {
            return Err(SeriesError::EmptyRecord);
        }
        let (header, body, offset) = if self.has_header() {
            let header = SeriesHeader::from_fields(&self.0[1..])?;
            (Some(header), &self.0[HEADER_LEN..], HEADER_LEN)
        } else {
            (None, &self.0[..], 0)
        };

        let samples = body
            .iter()
            .enumerate()
            .map(|(i, v)| {
                v.as_number().ok_or_else(|| SeriesError::NonNumeric {
                    index: i + offset,
                    value: v.to_string(),
                })
            })
            .collect::<SeriesResult<Vec<f64>>>()?;

        Ok((header, samples))
    }
}
