//! Point air temperature from zone air temperatures.

/// Weighted blend of zone air temperatures for a point.
pub fn blend_zone_air(zone_weights: &[f64], zone_air: &[f64]) -> f64 {
    zone_weights
        .iter()
        .zip(zone_air)
        .map(|(w, t)| w * t)
        .sum()
}

/// Add the height stratification term unless the air is well mixed.
pub fn stratify(air: f64, height_weight: f64, well_mixed: bool) -> f64 {
    if well_mixed { air } else { air + height_weight }
}

pub fn operative_temperature(air: f64, mrt: f64) -> f64 {
    (air + mrt) / 2.0
}
