//! Structural checks run when a model is built.

use std::collections::HashSet;

use crate::error::{GeometryError, GeometryResult};
use crate::mesh::ZoneMesh;

/// Validate per-point array lengths and zone layout.
pub(crate) fn validate_structure(zones: &[ZoneMesh]) -> GeometryResult<()> {
    let mut names = HashSet::new();
    for zone in zones {
        if !names.insert(zone.name.as_str()) {
            return Err(GeometryError::DuplicateZone {
                name: zone.name.clone(),
            });
        }
    }

    // The outdoor zone, if any, is last so indoor zone indices stay stable
    // when it is dropped.
    for zone in zones.iter().rev().skip(1) {
        if zone.outdoor {
            return Err(GeometryError::MisplacedOutdoorZone {
                name: zone.name.clone(),
            });
        }
    }

    let indoor = zones.iter().filter(|z| !z.outdoor).count();

    for zone in zones {
        if let Some(volume) = zone.volume {
            cm_core::ensure_in_range(volume, f64::MIN_POSITIVE, f64::MAX, "zone volume")?;
        }
        let blocked_len = zone.blocked_len();
        for (i, point) in zone.points.iter().enumerate() {
            let mismatch = |what: &'static str, expected: usize, actual: usize| {
                GeometryError::LengthMismatch {
                    zone: zone.name.clone(),
                    point: i,
                    what,
                    expected,
                    actual,
                }
            };

            if point.view_factors.len() != zone.surfaces.len() {
                return Err(mismatch(
                    "view factors",
                    zone.surfaces.len(),
                    point.view_factors.len(),
                ));
            }
            if !zone.outdoor
                && !point.zone_weights.is_empty()
                && point.zone_weights.len() != indoor
            {
                return Err(mismatch("zone weights", indoor, point.zone_weights.len()));
            }
            if let Some(expected) = blocked_len {
                if !point.blocked.is_empty() && point.blocked.len() != expected {
                    return Err(mismatch("blocked vector", expected, point.blocked.len()));
                }
            }

            cm_core::ensure_fraction(point.sky_view, "sky view factor")?;
            for vf in &point.view_factors {
                cm_core::ensure_fraction(*vf, "view factor")?;
            }
            for b in &point.blocked {
                cm_core::ensure_fraction(*b, "blocked-vector transmittance")?;
            }
            cm_core::ensure_finite(point.height_weight, "height weight")?;
            if let Some(position) = point.position {
                for c in position {
                    cm_core::ensure_finite(c, "point position")?;
                }
            }
        }
    }
    Ok(())
}
