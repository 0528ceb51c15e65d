//! cm-map: the hourly comfort-mapping pipeline.
//!
//! For every hour of the analysis period and every test point:
//! - mean radiant temperature from surface temperatures and view factors,
//!   raised by the solar flux on an occupant when the sun is up
//! - air temperature blended from zone air plus height stratification
//! - local air speed, when hourly speeds, air flow or station wind are given
//! - operative temperature and a comfort verdict from the chosen standard
//!
//! All inputs are validated and aligned once in [`RunContext::build`]; the
//! hour loop in [`run_map`] is read-only over the context and may run on the
//! rayon pool.

pub mod air;
pub mod context;
pub mod error;
pub mod inputs;
pub mod occlusion;
pub mod pipeline;
pub mod radiant;
pub mod solar;
pub mod wind;

pub use context::{RunContext, SolarSeries};
pub use error::{MapError, MapResult};
pub use inputs::{MapInputs, MapOptions};
pub use occlusion::{BlockedVectorOcclusion, SunOcclusion};
pub use pipeline::{
    CancelToken, HourRow, MapField, MapOutput, MapProgress, PointHourRecord, ProgressFn, map_hour,
    run_map,
};
pub use solar::{SiteContext, SolarPosition, sky_temperature};
pub use wind::{Terrain, WindProfile, flow_air_speed};
