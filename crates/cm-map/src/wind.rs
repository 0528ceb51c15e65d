//! Air speed at test points.
//!
//! Indoor zones take an hourly air speed directly or derive one from the
//! zone air flow and volume. Outdoor points scale the station wind speed to
//! their height with a power-law boundary-layer profile.

use serde::{Deserialize, Serialize};

/// Height in metres at which station wind speed is recorded.
pub const STATION_HEIGHT: f64 = 10.0;

/// Profile of the open country around a weather station.
const STATION_PROFILE: WindProfile = WindProfile {
    boundary_layer: 270.0,
    exponent: 0.14,
};

/// Surroundings of the site, which set how quickly wind slows near the ground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Terrain {
    City,
    Suburban,
    #[default]
    Country,
    Water,
}

impl Terrain {
    pub fn profile(&self) -> WindProfile {
        let (boundary_layer, exponent) = match self {
            Terrain::City => (460.0, 0.33),
            Terrain::Suburban => (370.0, 0.22),
            Terrain::Country => (270.0, 0.14),
            Terrain::Water => (210.0, 0.10),
        };
        WindProfile {
            boundary_layer,
            exponent,
        }
    }
}

/// Power-law wind profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindProfile {
    /// Boundary-layer thickness in metres.
    pub boundary_layer: f64,
    pub exponent: f64,
}

impl WindProfile {
    /// Ratio between the speed at `height` and the station speed.
    pub fn factor(&self, height: f64) -> f64 {
        let gradient = (STATION_PROFILE.boundary_layer / STATION_HEIGHT)
            .powf(STATION_PROFILE.exponent);
        gradient * (height.max(0.0) / self.boundary_layer).powf(self.exponent)
    }

    /// Speed at `height` for a station reading of `station_speed`.
    pub fn speed_at(&self, station_speed: f64, height: f64) -> f64 {
        station_speed * self.factor(height)
    }
}

/// Mean speed of air flow `flow` (m³/s) through a zone of `volume` m³,
/// taking the zone as a cube and the flow through one face.
pub fn flow_air_speed(flow: f64, volume: f64) -> f64 {
    let face = volume.cbrt().powi(2);
    if face > 0.0 { flow / face } else { 0.0 }
}

/// Air speed source of one zone, aligned to the analysis hours.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ZoneAirSpeed {
    /// Same speed at every point of the zone.
    Hourly(Vec<f64>),
    /// Station speed scaled per point, factors indexed from the zone's
    /// first point.
    Profile { station: Vec<f64>, factors: Vec<f64> },
}

impl ZoneAirSpeed {
    /// Speed at the `offset`-th point of the zone and hour `i`.
    pub(crate) fn at(&self, offset: usize, i: usize) -> Option<f64> {
        match self {
            ZoneAirSpeed::Hourly(values) => values.get(i).copied(),
            ZoneAirSpeed::Profile { station, factors } => {
                Some(station.get(i)? * factors.get(offset)?)
            }
        }
    }
}
