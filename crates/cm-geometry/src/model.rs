//! The view-factor model: zone meshes with flat point indexing.

use std::ops::Range;

use cm_core::{Tolerances, nearly_equal};
use tracing::{debug, info};

use crate::error::{GeometryError, GeometryResult};
use crate::mesh::{TestPoint, ZoneMesh};
use crate::sky::SkyResolution;
use crate::validate::validate_structure;

/// Validated, read-only view-factor data for one analysis.
///
/// Points are numbered across zones in zone order, so point `p` of the model
/// is point `p - offset(z)` of its zone mesh.
#[derive(Debug, Clone)]
pub struct ViewFactorModel {
    pub(crate) zones: Vec<ZoneMesh>,

    /// Zone `z` owns points `zone_offsets[z]..zone_offsets[z + 1]`.
    pub(crate) zone_offsets: Vec<usize>,

    pub(crate) point_zone: Vec<usize>,

    pub(crate) resolutions: Vec<Option<SkyResolution>>,
}

impl ViewFactorModel {
    /// Build and validate a model. Zone and surface names are upper-cased so
    /// they match series names.
    pub fn new(mut zones: Vec<ZoneMesh>) -> GeometryResult<Self> {
        for zone in &mut zones {
            zone.name = zone.name.trim().to_uppercase();
            for s in &mut zone.surfaces {
                *s = s.trim().to_uppercase();
            }
        }
        validate_structure(&zones)?;

        let resolutions = zones
            .iter()
            .map(|zone| match zone.blocked_len() {
                None => Ok(None),
                Some(len) => SkyResolution::from_patch_count(len).map(Some).ok_or_else(|| {
                    GeometryError::UnsupportedResolution {
                        zone: zone.name.clone(),
                        len,
                    }
                }),
            })
            .collect::<GeometryResult<Vec<_>>>()?;

        let indoor = zones.iter().filter(|z| !z.outdoor).count();
        for (z, zone) in zones.iter_mut().enumerate() {
            if zone.outdoor {
                continue;
            }
            for point in &mut zone.points {
                if point.zone_weights.is_empty() {
                    let mut weights = vec![0.0; indoor];
                    weights[z] = 1.0;
                    point.zone_weights = weights;
                }
            }
        }

        let model = Self::build_index(zones, resolutions);
        info!(
            zones = model.zone_count(),
            points = model.point_count(),
            "view-factor model ready"
        );
        Ok(model)
    }

    fn build_index(zones: Vec<ZoneMesh>, resolutions: Vec<Option<SkyResolution>>) -> Self {
        let mut zone_offsets = Vec::with_capacity(zones.len() + 1);
        let mut point_zone = Vec::new();
        zone_offsets.push(0);
        for (z, zone) in zones.iter().enumerate() {
            point_zone.extend(std::iter::repeat_n(z, zone.points.len()));
            zone_offsets.push(point_zone.len());
        }
        Self {
            zones,
            zone_offsets,
            point_zone,
            resolutions,
        }
    }

    pub fn zones(&self) -> &[ZoneMesh] {
        &self.zones
    }

    pub fn zone(&self, z: usize) -> Option<&ZoneMesh> {
        self.zones.get(z)
    }

    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    /// Zones other than the outdoor zone.
    pub fn indoor_zone_count(&self) -> usize {
        self.zones.iter().filter(|z| !z.outdoor).count()
    }

    pub fn point_count(&self) -> usize {
        self.point_zone.len()
    }

    /// Model point indices owned by zone `z`.
    pub fn points_of(&self, z: usize) -> Range<usize> {
        if z >= self.zones.len() {
            return 0..0;
        }
        self.zone_offsets[z]..self.zone_offsets[z + 1]
    }

    pub fn point(&self, p: usize) -> Option<&TestPoint> {
        let z = self.zone_of(p)?;
        self.zones[z].points.get(p - self.zone_offsets[z])
    }

    /// View factors of point `p` to the surfaces of its zone.
    pub fn view_factors(&self, p: usize) -> Option<&[f64]> {
        self.point(p).map(|pt| pt.view_factors.as_slice())
    }

    pub fn sky_view_factor(&self, p: usize) -> Option<f64> {
        self.point(p).map(|pt| pt.sky_view)
    }

    pub fn zone_of(&self, p: usize) -> Option<usize> {
        self.point_zone.get(p).copied()
    }

    pub fn height_weight(&self, p: usize) -> Option<f64> {
        self.point(p).map(|pt| pt.height_weight)
    }

    /// Air-temperature blend weights over the indoor zones.
    pub fn zone_weights(&self, p: usize) -> Option<&[f64]> {
        self.point(p).map(|pt| pt.zone_weights.as_slice())
    }

    /// Direct-sun transmittance per sky patch.
    pub fn blocked(&self, p: usize) -> Option<&[f64]> {
        self.point(p).map(|pt| pt.blocked.as_slice())
    }

    /// Sky-patch subdivision of zone `z`, if the zone carries blocked vectors.
    pub fn sky_patch_subdivision(&self, z: usize) -> Option<SkyResolution> {
        self.resolutions.get(z).copied().flatten()
    }

    pub fn has_windows(&self, z: usize) -> bool {
        self.zones.get(z).is_some_and(|zone| zone.has_windows)
    }

    pub fn outdoor_zone(&self) -> Option<usize> {
        self.zones.iter().position(|z| z.outdoor)
    }

    /// Drop the outdoor zone and its points.
    ///
    /// The row is removed rather than zero-filled so per-zone arrays built
    /// from the remaining model stay aligned with it.
    pub fn without_outdoor(self) -> Self {
        let Some(out) = self.outdoor_zone() else {
            return self;
        };
        debug!(zone = %self.zones[out].name, "dropping outdoor zone");
        let mut zones = self.zones;
        let mut resolutions = self.resolutions;
        zones.remove(out);
        resolutions.remove(out);
        Self::build_index(zones, resolutions)
    }

    /// Check that every indoor point's view factors plus sky view sum to one.
    pub fn check_normalization(&self, tol: Tolerances) -> GeometryResult<()> {
        for zone in self.zones.iter().filter(|z| !z.outdoor) {
            for (i, point) in zone.points.iter().enumerate() {
                let sum = point.total_view();
                if !nearly_equal(sum, 1.0, tol) {
                    return Err(GeometryError::NotNormalized {
                        zone: zone.name.clone(),
                        point: i,
                        sum,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_zone_model() -> ViewFactorModel {
        let a = ZoneMesh::indoor("office", vec!["wall".into(), "floor".into()])
            .with_windows(true)
            .with_points([
                TestPoint::new(vec![0.5, 0.4], 0.1).with_blocked(vec![1.0; 145]),
                TestPoint::new(vec![0.6, 0.4], 0.0).with_height_weight(0.3),
            ]);
        let b = ZoneMesh::indoor("corridor", vec!["ceiling".into()])
            .with_point(TestPoint::new(vec![1.0], 0.0).with_zone_weights(vec![0.5, 0.5]));
        let out = ZoneMesh::outdoor("outdoor", vec!["facade".into()])
            .with_point(TestPoint::new(vec![0.3], 0.7).with_non_surface_view(0.7));
        ViewFactorModel::new(vec![a, b, out]).unwrap()
    }

    #[test]
    fn flat_indexing_and_lookups() {
        let m = two_zone_model();
        assert_eq!(m.zone_count(), 3);
        assert_eq!(m.indoor_zone_count(), 2);
        assert_eq!(m.point_count(), 4);
        assert_eq!(m.points_of(0), 0..2);
        assert_eq!(m.points_of(1), 2..3);
        assert_eq!(m.points_of(9), 0..0);
        assert_eq!(m.zone_of(2), Some(1));
        assert_eq!(m.zone_of(4), None);
        assert_eq!(m.view_factors(1), Some(&[0.6, 0.4][..]));
        assert_eq!(m.sky_view_factor(0), Some(0.1));
        assert_eq!(m.height_weight(1), Some(0.3));
        assert_eq!(m.zone(0).unwrap().name, "OFFICE");
        assert_eq!(m.zone(0).unwrap().surfaces[1], "FLOOR");
    }

    #[test]
    fn default_zone_weights_are_one_hot() {
        let m = two_zone_model();
        assert_eq!(m.zone_weights(0), Some(&[1.0, 0.0][..]));
        assert_eq!(m.zone_weights(2), Some(&[0.5, 0.5][..]));
        assert_eq!(m.zone_weights(3), Some(&[] as &[f64]));
    }

    #[test]
    fn sky_subdivision_from_first_non_empty_list() {
        let m = two_zone_model();
        assert_eq!(m.sky_patch_subdivision(0), Some(SkyResolution::Tregenza));
        assert_eq!(m.sky_patch_subdivision(1), None);
        assert!(m.has_windows(0));
        assert!(!m.has_windows(1));
    }

    #[test]
    fn unsupported_resolution_is_an_error() {
        let zone = ZoneMesh::indoor("A", vec!["W".into()])
            .with_point(TestPoint::new(vec![1.0], 0.0).with_blocked(vec![1.0; 100]));
        let err = ViewFactorModel::new(vec![zone]).unwrap_err();
        assert_eq!(
            err,
            GeometryError::UnsupportedResolution {
                zone: "A".into(),
                len: 100
            }
        );
    }

    #[test]
    fn dropping_outdoor_zone_removes_rows() {
        let m = two_zone_model().without_outdoor();
        assert_eq!(m.zone_count(), 2);
        assert_eq!(m.point_count(), 3);
        assert_eq!(m.outdoor_zone(), None);
        assert_eq!(m.zone_of(2), Some(1));
        assert_eq!(m.sky_patch_subdivision(0), Some(SkyResolution::Tregenza));
    }

    #[test]
    fn normalization_guard() {
        let m = two_zone_model();
        assert!(m.check_normalization(Tolerances::view_factor()).is_ok());

        let bad =
            ZoneMesh::indoor("A", vec!["W".into()]).with_point(TestPoint::new(vec![0.5], 0.2));
        let m = ViewFactorModel::new(vec![bad]).unwrap();
        assert!(matches!(
            m.check_normalization(Tolerances::view_factor()),
            Err(GeometryError::NotNormalized { .. })
        ));
    }
}
