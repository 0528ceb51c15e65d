//! The comfort-standard seam.

use crate::error::ComfortResult;

/// Conditions at one point and hour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComfortInput {
    pub air_temp: f64,
    pub mrt: f64,
    /// Relative humidity in percent.
    pub relative_humidity: Option<f64>,
    /// Prevailing outdoor temperature in °C.
    pub prevailing: Option<f64>,
    /// Local air speed in m/s. Overrides the standard's constant when set.
    pub air_speed: Option<f64>,
}

impl ComfortInput {
    pub fn new(air_temp: f64, mrt: f64) -> Self {
        Self {
            air_temp,
            mrt,
            relative_humidity: None,
            prevailing: None,
            air_speed: None,
        }
    }

    pub fn with_humidity(mut self, rh: f64) -> Self {
        self.relative_humidity = Some(rh);
        self
    }

    pub fn with_prevailing(mut self, t: f64) -> Self {
        self.prevailing = Some(t);
        self
    }

    pub fn with_air_speed(mut self, speed: f64) -> Self {
        self.air_speed = Some(speed);
        self
    }

    /// Mean of air and radiant temperature.
    pub fn operative(&self) -> f64 {
        (self.air_temp + self.mrt) / 2.0
    }
}

/// Classification of one point-hour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComfortOutcome {
    pub comfortable: bool,
    /// Positive when warmer than target, negative when cooler.
    pub degrees_from_target: f64,
    /// Comfort index the standard classifies on, when it has one of its own.
    pub index: Option<f64>,
}

/// Family of a standard; fixes result labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardKind {
    Adaptive,
    Pmv,
    Outdoor,
}

impl StandardKind {
    /// First word of the comfort matrix label.
    pub fn prefix(&self) -> &'static str {
        match self {
            StandardKind::Adaptive => "Adaptive",
            StandardKind::Pmv => "PMV",
            StandardKind::Outdoor => "Outdoor",
        }
    }

    pub fn comfort_label(&self) -> String {
        format!("{} Thermal Comfort Percent", self.prefix())
    }

    pub fn degrees_label(&self) -> &'static str {
        match self {
            StandardKind::Adaptive => "Degrees From Target",
            StandardKind::Pmv => "Predicted Mean Vote",
            StandardKind::Outdoor => "Degrees From Neutral UTCI",
        }
    }

    pub fn index_label(&self) -> Option<&'static str> {
        match self {
            StandardKind::Outdoor => Some("Universal Thermal Climate Index"),
            _ => None,
        }
    }
}

/// A comfort standard. Implementations are immutable for a run and shared
/// across worker threads.
pub trait ComfortStandard: Send + Sync {
    fn kind(&self) -> StandardKind;

    fn evaluate(&self, input: &ComfortInput) -> ComfortResult<ComfortOutcome>;

    /// Whether per-zone relative humidity must be supplied.
    fn needs_humidity(&self) -> bool {
        false
    }

    /// Whether a prevailing outdoor temperature must be supplied.
    fn needs_prevailing(&self) -> bool {
        false
    }
}
