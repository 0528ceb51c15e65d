//! Mean radiant temperature of a test point.
//!
//! The base MRT is the view-factor weighted mean of surrounding surface
//! temperatures. When the sun is up, the effective radiant flux absorbed by a
//! seated occupant raises it by `ERF / (f_eff * h_r)`.

use cm_geometry::projected_area_factor;
use nalgebra::Vector3;

use crate::solar::SolarPosition;

/// Fraction of the body surface exchanging radiation, seated.
pub const FRACTION_EXPOSED: f64 = 0.696;

/// Radiative heat transfer coefficient, W/(m² K).
pub const RADIATIVE_COEFF: f64 = 6.012;

/// Reference emissivity of the ERF model.
const BODY_EMISSIVITY: f64 = 0.95;

/// `Σ vf(s) * T(s)` over the zone's surfaces.
pub fn base_mrt(view_factors: &[f64], surface_temps: &[f64]) -> f64 {
    view_factors
        .iter()
        .zip(surface_temps)
        .map(|(vf, t)| vf * t)
        .sum()
}

/// Outdoor MRT: surfaces plus the non-surface view at air temperature,
/// normalized by the total view.
pub fn outdoor_base_mrt(
    view_factors: &[f64],
    surface_temps: &[f64],
    non_surface_view: f64,
    dry_bulb: f64,
) -> f64 {
    let total: f64 = view_factors.iter().sum::<f64>() + non_surface_view;
    if total <= 0.0 {
        return dry_bulb;
    }
    (base_mrt(view_factors, surface_temps) + non_surface_view * dry_bulb) / total
}

/// Solar conditions of one hour, shared by every point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunState {
    pub position: SolarPosition,
    /// Unit vector toward the sun.
    pub direction: Vector3<f64>,
    pub direct_normal: f64,
    pub diffuse_horizontal: f64,
    pub global_horizontal: f64,
    pub window_transmittance: f64,
    /// Seated projected-area factor for this sun position.
    pub projected_area: f64,
}

impl SunState {
    pub fn new(
        position: SolarPosition,
        direct_normal: f64,
        diffuse_horizontal: f64,
        global_horizontal: f64,
        window_transmittance: f64,
    ) -> Self {
        Self {
            position,
            direction: position.to_direction(),
            direct_normal,
            diffuse_horizontal,
            global_horizontal,
            window_transmittance,
            projected_area: projected_area_factor(position.altitude, position.azimuth),
        }
    }
}

/// Per-point solar exposure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exposure {
    pub sky_view: f64,
    /// Direct-sun transmittance from the occlusion test; 0 = blocked.
    pub sun_transmittance: f64,
    pub floor_reflectivity: f64,
    pub clothing_absorptivity: f64,
    /// Apply the window transmittance (indoor points).
    pub through_window: bool,
}

/// Effective radiant flux on the occupant, W/m².
pub fn effective_radiant_flux(sun: &SunState, exposure: &Exposure) -> f64 {
    let (direct, global) = if exposure.sun_transmittance <= 0.0 {
        (0.0, sun.diffuse_horizontal)
    } else {
        (
            sun.direct_normal * exposure.sun_transmittance,
            sun.global_horizontal,
        )
    };
    let diffuse_part = 0.5
        * FRACTION_EXPOSED
        * exposure.sky_view
        * (sun.diffuse_horizontal + global * exposure.floor_reflectivity);
    let direct_part = FRACTION_EXPOSED * sun.projected_area * direct;
    let window = if exposure.through_window {
        sun.window_transmittance
    } else {
        1.0
    };
    (diffuse_part + direct_part) * window * (exposure.clothing_absorptivity / BODY_EMISSIVITY)
}

/// MRT increase caused by an effective radiant flux.
pub fn mrt_delta(erf: f64) -> f64 {
    erf / (FRACTION_EXPOSED * RADIATIVE_COEFF)
}
