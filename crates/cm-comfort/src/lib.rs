//! cm-comfort: thermal comfort standards evaluated per point-hour.
//!
//! Every standard answers two things for an air temperature / radiant
//! temperature pair: whether the point is comfortable, and a signed distance
//! from the target (positive = warmer than target).
//!
//! Bundled standards:
//! - Adaptive (ASHRAE-55 and EN-15251 correlations)
//! - PMV/PPD (ISO 7730 Fanger model)
//! - Outdoor (UTCI scale, pluggable index estimator)

pub mod adaptive;
pub mod error;
pub mod outdoor;
pub mod params;
pub mod pmv;
pub mod standard;

pub use adaptive::{Acceptability, Adaptive, AdaptiveMethod};
pub use error::{ComfortError, ComfortResult};
pub use outdoor::{Outdoor, OutdoorIndex, WindAdjustedOperative};
pub use params::ComfortStandardParams;
pub use pmv::{Pmv, pmv_ppd};
pub use standard::{ComfortInput, ComfortOutcome, ComfortStandard, StandardKind};
