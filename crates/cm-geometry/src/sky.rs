//! Sky-patch resolutions and the patch containing a direction.
//!
//! Patches follow the Tregenza dome (145 patches) and its Reinhart
//! subdivisions. Rows run from the horizon upward in equal altitude bands;
//! within a row patches start at north and proceed clockwise (east = 90°).
//! The zenith cap is always a single patch and comes last.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Patches per row of the base Tregenza dome, horizon first.
const TREGENZA_ROWS: [usize; 7] = [30, 30, 24, 24, 18, 12, 6];

/// Altitude span of one Tregenza row in degrees.
const TREGENZA_BAND: f64 = 12.0;

/// Supported sky-patch subdivisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkyResolution {
    /// Level 0, 145 patches.
    Tregenza,
    /// Level 1, 577 patches.
    Reinhart2,
    /// Level 2, 1297 patches.
    Reinhart3,
    /// Level 3, 2305 patches.
    Reinhart4,
}

impl SkyResolution {
    /// Resolution from the length of a blocked-vector list.
    pub fn from_patch_count(len: usize) -> Option<Self> {
        match len {
            145 => Some(Self::Tregenza),
            577 => Some(Self::Reinhart2),
            1297 => Some(Self::Reinhart3),
            2305 => Some(Self::Reinhart4),
            _ => None,
        }
    }

    /// Subdivision level, 0..=3.
    pub fn level(&self) -> u8 {
        match self {
            Self::Tregenza => 0,
            Self::Reinhart2 => 1,
            Self::Reinhart3 => 2,
            Self::Reinhart4 => 3,
        }
    }

    /// Row and column multiplication factor of the subdivision.
    fn factor(&self) -> usize {
        self.level() as usize + 1
    }

    pub fn patch_count(&self) -> usize {
        let mf = self.factor();
        TREGENZA_ROWS.iter().sum::<usize>() * mf * mf + 1
    }

    fn row_count(&self) -> usize {
        TREGENZA_ROWS.len() * self.factor()
    }

    fn patches_in_row(&self, row: usize) -> usize {
        let mf = self.factor();
        TREGENZA_ROWS[row / mf] * mf
    }

    fn band(&self) -> f64 {
        TREGENZA_BAND / self.factor() as f64
    }

    /// Index of the patch containing the direction at `altitude`/`azimuth`
    /// (degrees). Directions below the horizon have no patch.
    pub fn patch_index(&self, altitude: f64, azimuth: f64) -> Option<usize> {
        if !altitude.is_finite() || !azimuth.is_finite() || altitude < 0.0 {
            return None;
        }
        let row = (altitude / self.band()).floor() as usize;
        if row >= self.row_count() {
            return Some(self.patch_count() - 1);
        }

        let start: usize = (0..row).map(|r| self.patches_in_row(r)).sum();
        let per_row = self.patches_in_row(row);
        let width = 360.0 / per_row as f64;
        let col = ((azimuth.rem_euclid(360.0) / width).floor() as usize).min(per_row - 1);
        Some(start + col)
    }

    /// Patch containing a direction vector (north = +Y, east = +X, up = +Z).
    pub fn patch_for_direction(&self, dir: &Vector3<f64>) -> Option<usize> {
        let norm = dir.norm();
        if norm == 0.0 || !norm.is_finite() {
            return None;
        }
        let altitude = (dir.z / norm).clamp(-1.0, 1.0).asin().to_degrees();
        let azimuth = dir.x.atan2(dir.y).to_degrees().rem_euclid(360.0);
        self.patch_index(altitude, azimuth)
    }

    /// Altitude and azimuth of a patch center, in degrees.
    pub fn patch_center(&self, index: usize) -> Option<(f64, f64)> {
        if index + 1 == self.patch_count() {
            return Some((90.0, 0.0));
        }
        let mut start = 0;
        for row in 0..self.row_count() {
            let per_row = self.patches_in_row(row);
            if index < start + per_row {
                let width = 360.0 / per_row as f64;
                let col = (index - start) as f64;
                return Some(((row as f64 + 0.5) * self.band(), (col + 0.5) * width));
            }
            start += per_row;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_counts_match_levels() {
        for (len, level) in [(145, 0), (577, 1), (1297, 2), (2305, 3)] {
            let res = SkyResolution::from_patch_count(len).unwrap();
            assert_eq!(res.level(), level);
            assert_eq!(res.patch_count(), len);
        }
        assert!(SkyResolution::from_patch_count(146).is_none());
        assert!(SkyResolution::from_patch_count(0).is_none());
    }

    #[test]
    fn tregenza_landmarks() {
        let res = SkyResolution::Tregenza;
        // Due north on the horizon.
        assert_eq!(res.patch_index(0.0, 0.0), Some(0));
        // Due east in the first row: 30 patches of 12°.
        assert_eq!(res.patch_index(5.0, 90.0), Some(7));
        // Second row starts after 30 patches.
        assert_eq!(res.patch_index(12.5, 0.0), Some(30));
        // Zenith cap.
        assert_eq!(res.patch_index(85.0, 200.0), Some(144));
        assert_eq!(res.patch_index(-1.0, 0.0), None);
        // 359.9° stays in the last patch of the row.
        assert_eq!(res.patch_index(1.0, 359.9), Some(29));
    }

    #[test]
    fn centers_map_back_to_their_patch() {
        for res in [
            SkyResolution::Tregenza,
            SkyResolution::Reinhart2,
            SkyResolution::Reinhart3,
            SkyResolution::Reinhart4,
        ] {
            for i in 0..res.patch_count() {
                let (alt, az) = res.patch_center(i).unwrap();
                assert_eq!(res.patch_index(alt, az), Some(i), "{res:?} patch {i}");
            }
            assert!(res.patch_center(res.patch_count()).is_none());
        }
    }

    #[test]
    fn direction_vector_lookup() {
        let res = SkyResolution::Tregenza;
        // Sun due south at 45°: row 3 (36..48), azimuth 180.
        let dir = Vector3::new(0.0, -1.0, 1.0);
        let idx = res.patch_for_direction(&dir).unwrap();
        assert_eq!(Some(idx), res.patch_index(45.0, 180.0));
        assert!(res.patch_for_direction(&Vector3::new(0.0, 1.0, -0.5)).is_none());
        assert!(res.patch_for_direction(&Vector3::zeros()).is_none());
    }
}
