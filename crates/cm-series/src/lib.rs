//! cm-series: hourly data series as exchanged with the simulation engines.
//!
//! Provides:
//! - the headered record format (`key:location/dataType/...` sentinel)
//! - calendar helpers (hour of year, analysis periods)
//! - `DataKind` resolution from header data-type labels
//! - batch validation with per-category diagnostics
//! - prevailing outdoor temperature for adaptive comfort
//! - merging of curved-surface pieces

pub mod error;
pub mod header;
pub mod kind;
pub mod merge;
pub mod period;
pub mod prevailing;
pub mod series;
pub mod validate;

pub use error::{SeriesError, SeriesResult};
pub use header::{HEADER_KEY, HEADER_LEN, RecordValue, SeriesHeader, SeriesRecord, Timestep};
pub use kind::{DataKind, units_match};
pub use merge::{MergePolicy, merge_pieces};
pub use period::{AnalysisPeriod, DateTuple, PeriodIndex, hour_to_date};
pub use prevailing::{PrevailingBasis, PrevailingTemperature, prevailing_outdoor_temperature};
pub use series::HourlySeries;
pub use validate::{Diagnostic, DiagnosticKind, ValidatedSeries, ValidationOutcome, validate_series};
