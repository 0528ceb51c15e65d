//! Result data types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub type RunId = String;

/// A per-point aggregate. Points with no occupied hours have no defined
/// percentage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MetricValue {
    Value(f64),
    Undefined,
}

impl MetricValue {
    pub fn value(&self) -> Option<f64> {
        match self {
            MetricValue::Value(v) => Some(*v),
            MetricValue::Undefined => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, MetricValue::Undefined)
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Value(v) => write!(f, "{v}"),
            MetricValue::Undefined => f.write_str("undefined"),
        }
    }
}

impl FromStr for MetricValue {
    type Err = std::num::ParseFloatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("undefined") {
            Ok(MetricValue::Undefined)
        } else {
            s.parse().map(MetricValue::Value)
        }
    }
}

/// How a summary reports its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryMode {
    #[default]
    Percent,
    Hours,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: RunId,
    pub project_name: String,
    pub timestamp: String,
    pub standard: String,
    pub analysis_period: String,
    pub points: usize,
    pub hours: usize,
    /// Result files written next to the manifest.
    #[serde(default)]
    pub files: Vec<String>,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_value_text() {
        assert_eq!(MetricValue::Undefined.to_string(), "undefined");
        assert_eq!("undefined".parse::<MetricValue>().unwrap(), MetricValue::Undefined);
        assert_eq!("42.5".parse::<MetricValue>().unwrap(), MetricValue::Value(42.5));
        assert!("abc".parse::<MetricValue>().is_err());
    }
}
