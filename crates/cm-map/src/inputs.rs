//! Raw run inputs as handed over by the simulation engines.

use cm_series::{AnalysisPeriod, MergePolicy, SeriesRecord};
use serde::{Deserialize, Serialize};

use crate::solar::SiteContext;

/// Series records for one mapping run, in the engines' record format.
///
/// Lists hold one record per surface or zone. Single records are shared by
/// every zone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapInputs {
    pub surface_temps: Vec<SeriesRecord>,
    pub outdoor_surface_temps: Vec<SeriesRecord>,
    pub air_temps: Vec<SeriesRecord>,
    pub relative_humidity: Vec<SeriesRecord>,
    pub dry_bulb: Option<SeriesRecord>,
    pub direct_normal: Option<SeriesRecord>,
    pub diffuse_horizontal: Option<SeriesRecord>,
    pub global_horizontal: Option<SeriesRecord>,
    pub horizontal_infrared: Option<SeriesRecord>,
    pub window_transmittance: Option<SeriesRecord>,
    /// 1 at hours where the zone air is fully mixed.
    pub well_mixed: Option<SeriesRecord>,
    /// Hourly air speed, one record per indoor zone or one for all.
    pub air_speed: Vec<SeriesRecord>,
    /// Hourly zone air flow; turned into a speed with the zone volume.
    pub air_flow_volume: Vec<SeriesRecord>,
    /// Station wind speed at 10 m, scaled to outdoor point heights.
    pub wind_speed: Option<SeriesRecord>,
    /// Weather-file humidity used for the outdoor zone.
    pub outdoor_relative_humidity: Option<SeriesRecord>,
}

impl MapInputs {
    /// Solar correction needs both radiation components.
    pub fn has_solar(&self) -> bool {
        self.direct_normal.is_some() && self.diffuse_horizontal.is_some()
    }

    /// Any per-hour air speed source was supplied.
    pub fn has_air_speed(&self) -> bool {
        !self.air_speed.is_empty() || !self.air_flow_volume.is_empty() || self.wind_speed.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapOptions {
    pub period: AnalysisPeriod,
    pub site: SiteContext,
    pub merge_policy: MergePolicy,
    pub parallel: bool,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            period: AnalysisPeriod::whole_year(),
            site: SiteContext::default(),
            merge_policy: MergePolicy::default(),
            parallel: true,
        }
    }
}
