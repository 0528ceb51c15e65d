use serde::{Deserialize, Serialize};

use crate::error::{SeriesError, SeriesResult};
use crate::header::{SeriesHeader, SeriesRecord};
use crate::kind::DataKind;
use crate::period::{AnalysisPeriod, PeriodIndex};

/// Decoded series: optional header, resolved kind, numeric samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlySeries {
    pub header: Option<SeriesHeader>,
    pub kind: DataKind,
    pub values: Vec<f64>,
}

impl HourlySeries {
    /// Decode a record. Headerless records take `fallback` as their kind.
    pub fn from_record(record: &SeriesRecord, fallback: DataKind) -> SeriesResult<Self> {
        let (header, values) = record.split()?;
        let kind = header
            .as_ref()
            .map(|h| DataKind::from_data_type(&h.data_type))
            .unwrap_or(fallback);
        Ok(Self {
            header,
            kind,
            values,
        })
    }

    pub fn to_record(&self) -> SeriesRecord {
        match &self.header {
            Some(h) => SeriesRecord::from_parts(h, &self.values),
            None => SeriesRecord::from_samples(&self.values),
        }
    }

    /// Upper-cased object name, empty for headerless data.
    pub fn name(&self) -> String {
        self.header.as_ref().map(SeriesHeader::name).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Recorded period; headerless data is taken as the whole year.
    pub fn period(&self) -> AnalysisPeriod {
        self.header
            .as_ref()
            .map(SeriesHeader::period)
            .unwrap_or_else(AnalysisPeriod::whole_year)
    }

    /// Sample at a 1-based hour of year, given the data period's index.
    pub fn at(&self, index: &PeriodIndex, hoy: usize) -> SeriesResult<f64> {
        let pos = index.position(hoy).ok_or(SeriesError::InvalidHour { hoy })?;
        self.values
            .get(pos)
            .copied()
            .ok_or_else(|| SeriesError::Length {
                what: self.name(),
                expected: pos + 1,
                actual: self.values.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::Timestep;
    use crate::period::DateTuple;

    #[test]
    fn record_kind_from_header() {
        let header = SeriesHeader {
            location: "Site".into(),
            data_type: "Relative Humidity for ZONE2".into(),
            units: "%".into(),
            timestep: Timestep::Hourly,
            start: DateTuple::new(1, 1, 1).unwrap(),
            end: DateTuple::new(1, 1, 3).unwrap(),
        };
        let rec = SeriesRecord::from_parts(&header, &[40.0, 45.0, 50.0]);
        let s = HourlySeries::from_record(&rec, DataKind::AirTemp).unwrap();
        assert_eq!(s.kind, DataKind::RelativeHumidity);
        assert_eq!(s.name(), "ZONE2");
        assert_eq!(s.to_record(), rec);

        let idx = PeriodIndex::new(&s.period()).unwrap();
        assert_eq!(s.at(&idx, 2).unwrap(), 45.0);
        assert!(s.at(&idx, 4).is_err());
    }

    #[test]
    fn headerless_uses_fallback() {
        let rec = SeriesRecord::from_samples(&[1.0, 0.0]);
        let s = HourlySeries::from_record(&rec, DataKind::Occupancy).unwrap();
        assert_eq!(s.kind, DataKind::Occupancy);
        assert_eq!(s.name(), "");
        assert!(s.period().is_whole_year());
    }
}
