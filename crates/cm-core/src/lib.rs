//! cm-core: stable foundation for comfortmap.
//!
//! Contains:
//! - units (uom SI types + constructors used at configuration boundaries)
//! - numeric (Real + tolerances + float helpers)
//! - timing (opt-in stage timers)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod timing;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use units::*;

/// Number of hourly samples in a non-leap year.
pub const HOURS_PER_YEAR: usize = 8760;
