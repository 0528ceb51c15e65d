//! Direct-sun visibility of a test point.

use cm_geometry::ViewFactorModel;
use nalgebra::Vector3;

/// Fraction of direct sun reaching a point; 0 means blocked.
pub trait SunOcclusion: Send + Sync {
    fn transmittance(&self, model: &ViewFactorModel, point: usize, sun: &Vector3<f64>) -> f64;
}

/// Reads the per-patch blocked vector precomputed with the view factors.
///
/// A sun outside every sky patch, or a zone without blocked vectors, counts
/// as blocked.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockedVectorOcclusion;

impl SunOcclusion for BlockedVectorOcclusion {
    fn transmittance(&self, model: &ViewFactorModel, point: usize, sun: &Vector3<f64>) -> f64 {
        let patch = model
            .zone_of(point)
            .and_then(|z| model.sky_patch_subdivision(z))
            .and_then(|res| res.patch_for_direction(sun));
        match (patch, model.blocked(point)) {
            (Some(patch), Some(blocked)) => blocked.get(patch).copied().unwrap_or(0.0),
            _ => 0.0,
        }
    }
}
