//! Input records produced by the view-factor calculation.

use serde::{Deserialize, Serialize};

/// One test point of a zone mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestPoint {
    /// View factor to each surface of the owning zone, in surface order.
    pub view_factors: Vec<f64>,
    /// View factor to the sky (through windows for indoor zones).
    pub sky_view: f64,
    /// Direct-sun transmittance per sky patch (0 = blocked). Empty when the
    /// zone has no windows.
    #[serde(default)]
    pub blocked: Vec<f64>,
    /// Air-temperature blend weights over the indoor zones. Empty means the
    /// point takes its own zone's air temperature.
    #[serde(default)]
    pub zone_weights: Vec<f64>,
    /// Additive stratification term in °C.
    #[serde(default)]
    pub height_weight: f64,
    /// Outdoor points only: view to sky and ground not covered by surfaces.
    #[serde(default)]
    pub non_surface_view: Option<f64>,
    /// Point location in metres; the third coordinate is height above
    /// ground and drives the outdoor wind profile.
    #[serde(default)]
    pub position: Option<[f64; 3]>,
}

impl TestPoint {
    pub fn new(view_factors: Vec<f64>, sky_view: f64) -> Self {
        Self {
            view_factors,
            sky_view,
            blocked: Vec::new(),
            zone_weights: Vec::new(),
            height_weight: 0.0,
            non_surface_view: None,
            position: None,
        }
    }

    pub fn with_blocked(mut self, blocked: Vec<f64>) -> Self {
        self.blocked = blocked;
        self
    }

    pub fn with_zone_weights(mut self, weights: Vec<f64>) -> Self {
        self.zone_weights = weights;
        self
    }

    pub fn with_height_weight(mut self, weight: f64) -> Self {
        self.height_weight = weight;
        self
    }

    pub fn with_non_surface_view(mut self, view: f64) -> Self {
        self.non_surface_view = Some(view);
        self
    }

    pub fn with_position(mut self, position: [f64; 3]) -> Self {
        self.position = Some(position);
        self
    }

    /// Height above ground, when the point carries a position.
    pub fn height(&self) -> Option<f64> {
        self.position.map(|p| p[2])
    }

    /// Sum of surface view factors plus sky view.
    pub fn total_view(&self) -> f64 {
        self.view_factors.iter().sum::<f64>() + self.sky_view
    }
}

/// Mesh of test points belonging to one zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneMesh {
    pub name: String,
    /// Surface names in view-factor order.
    pub surfaces: Vec<String>,
    #[serde(default)]
    pub has_windows: bool,
    /// Exterior zone evaluated against outdoor surface temperatures.
    #[serde(default)]
    pub outdoor: bool,
    #[serde(default)]
    pub points: Vec<TestPoint>,
    /// Air volume in m³, used to turn air flow into a speed.
    #[serde(default)]
    pub volume: Option<f64>,
}

impl ZoneMesh {
    pub fn indoor(name: impl Into<String>, surfaces: Vec<String>) -> Self {
        Self {
            name: name.into(),
            surfaces,
            has_windows: false,
            outdoor: false,
            points: Vec::new(),
            volume: None,
        }
    }

    pub fn outdoor(name: impl Into<String>, surfaces: Vec<String>) -> Self {
        Self {
            outdoor: true,
            ..Self::indoor(name, surfaces)
        }
    }

    pub fn with_windows(mut self, has_windows: bool) -> Self {
        self.has_windows = has_windows;
        self
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    pub fn with_point(mut self, point: TestPoint) -> Self {
        self.points.push(point);
        self
    }

    pub fn with_points(mut self, points: impl IntoIterator<Item = TestPoint>) -> Self {
        self.points.extend(points);
        self
    }

    /// Length of the first non-empty blocked-vector list.
    pub fn blocked_len(&self) -> Option<usize> {
        self.points
            .iter()
            .map(|p| p.blocked.len())
            .find(|len| *len > 0)
    }
}
