//! Sun position for an hour of the year.
//!
//! Declination and equation of time use Spencer's Fourier series. Clock time
//! is corrected to solar time from longitude and the time zone's standard
//! meridian.

use std::f64::consts::PI;

use cm_core::constants::SIGMA;
use cm_core::{Angle, Temperature, deg, to_deg, to_degc};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use uom::si::angle::radian;
use uom::si::thermodynamic_temperature::kelvin;

use crate::error::{MapError, MapResult};
use crate::wind::Terrain;

/// Location and occupant parameters shared by every zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SiteContext {
    /// Degrees, positive north.
    pub latitude: f64,
    /// Degrees, positive east.
    pub longitude: f64,
    /// UTC offset in hours.
    pub time_zone: f64,
    #[serde(default = "default_clothing_absorptivity")]
    pub clothing_absorptivity: f64,
    #[serde(default = "default_floor_reflectivity")]
    pub floor_reflectivity: f64,
    /// Surroundings used to scale station wind to outdoor points.
    #[serde(default)]
    pub terrain: Terrain,
}

fn default_clothing_absorptivity() -> f64 {
    0.7
}

fn default_floor_reflectivity() -> f64 {
    0.25
}

impl Default for SiteContext {
    fn default() -> Self {
        Self {
            latitude: 0.0,
            longitude: 0.0,
            time_zone: 0.0,
            clothing_absorptivity: default_clothing_absorptivity(),
            floor_reflectivity: default_floor_reflectivity(),
            terrain: Terrain::default(),
        }
    }
}

impl SiteContext {
    pub fn new(latitude: f64, longitude: f64, time_zone: f64) -> Self {
        Self {
            latitude,
            longitude,
            time_zone,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> MapResult<()> {
        let bad = |what: String| Err(MapError::InvalidInput { what });
        if !(-90.0..=90.0).contains(&self.latitude) {
            return bad(format!("latitude {} outside [-90, 90]", self.latitude));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return bad(format!("longitude {} outside [-180, 180]", self.longitude));
        }
        if !(-12.0..=14.0).contains(&self.time_zone) {
            return bad(format!("time zone {} outside [-12, 14]", self.time_zone));
        }
        for (what, v) in [
            ("clothing absorptivity", self.clothing_absorptivity),
            ("floor reflectivity", self.floor_reflectivity),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return bad(format!("{what} {v} outside [0, 1]"));
            }
        }
        Ok(())
    }
}

/// Solar altitude and azimuth in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarPosition {
    /// 0 = horizon, 90 = zenith.
    pub altitude: f64,
    /// From north, clockwise (90 = east).
    pub azimuth: f64,
}

impl SolarPosition {
    /// Position at `clock_hour` (local standard time, 0..=24) of `day_of_year`.
    pub fn calculate(site: &SiteContext, day_of_year: u32, clock_hour: f64) -> Self {
        let lat = deg(site.latitude).get::<radian>();
        let gamma = 2.0 * PI * (day_of_year as f64 - 1.0) / 365.0;

        let declination = 0.006918 - 0.399912 * gamma.cos() + 0.070257 * gamma.sin()
            - 0.006758 * (2.0 * gamma).cos()
            + 0.000907 * (2.0 * gamma).sin()
            - 0.002697 * (3.0 * gamma).cos()
            + 0.00148 * (3.0 * gamma).sin();

        // Minutes.
        let equation_of_time = 229.18
            * (0.000075 + 0.001868 * gamma.cos()
                - 0.032077 * gamma.sin()
                - 0.014615 * (2.0 * gamma).cos()
                - 0.040849 * (2.0 * gamma).sin());

        let meridian = 15.0 * site.time_zone;
        let solar_hour =
            clock_hour + (4.0 * (site.longitude - meridian) + equation_of_time) / 60.0;
        let hour_angle = deg((solar_hour - 12.0) * 15.0).get::<radian>();

        let sin_alt =
            lat.sin() * declination.sin() + lat.cos() * declination.cos() * hour_angle.cos();
        let altitude = sin_alt.clamp(-1.0, 1.0).asin();

        let cos_azimuth = (declination.sin() * lat.cos()
            - declination.cos() * lat.sin() * hour_angle.cos())
            / altitude.cos().max(1e-10);
        let mut azimuth = to_deg(Angle::new::<radian>(cos_azimuth.clamp(-1.0, 1.0).acos()));
        if hour_angle.sin() > 0.0 {
            azimuth = 360.0 - azimuth;
        }

        Self {
            altitude: to_deg(Angle::new::<radian>(altitude)),
            azimuth,
        }
    }

    /// Position for a 1-based hour of year. Hour `h` of a day is evaluated at
    /// clock time `h`.
    pub fn for_hoy(site: &SiteContext, hoy: usize) -> Self {
        let day = ((hoy.max(1) - 1) / 24 + 1) as u32;
        let hour = ((hoy.max(1) - 1) % 24 + 1) as f64;
        Self::calculate(site, day, hour)
    }

    pub fn is_above_horizon(&self) -> bool {
        self.altitude > 0.0
    }

    /// Unit vector toward the sun (north = +Y, east = +X, up = +Z).
    pub fn to_direction(&self) -> Vector3<f64> {
        let alt = deg(self.altitude).get::<radian>();
        let azi = deg(self.azimuth).get::<radian>();
        Vector3::new(alt.cos() * azi.sin(), alt.cos() * azi.cos(), alt.sin())
    }
}

/// Effective sky temperature in °C from horizontal infrared radiation (W/m²).
pub fn sky_temperature(horizontal_infrared: f64) -> f64 {
    let t = (horizontal_infrared.max(0.0) / (0.95 * SIGMA)).powf(0.25);
    to_degc(Temperature::new::<kelvin>(t))
}
