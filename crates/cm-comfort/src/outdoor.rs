//! Outdoor comfort on the UTCI scale.

use std::fmt;
use std::sync::Arc;

use crate::error::ComfortResult;
use crate::standard::{ComfortInput, ComfortOutcome, ComfortStandard, StandardKind};

/// No-thermal-stress band of the UTCI scale, °C.
pub const NO_STRESS: (f64, f64) = (9.0, 26.0);

/// Neutral UTCI, °C.
pub const NEUTRAL_UTCI: f64 = 20.0;

/// Estimates an equivalent temperature on the UTCI scale.
pub trait OutdoorIndex: Send + Sync {
    fn index(&self, input: &ComfortInput, wind_speed: f64) -> f64;
}

/// Operative temperature lowered by wind above a calm reference speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindAdjustedOperative {
    /// Cooling in K per m/s above `calm`.
    pub cooling_per_mps: f64,
    pub calm: f64,
}

impl Default for WindAdjustedOperative {
    fn default() -> Self {
        Self {
            cooling_per_mps: 1.0,
            calm: 0.5,
        }
    }
}

impl OutdoorIndex for WindAdjustedOperative {
    fn index(&self, input: &ComfortInput, wind_speed: f64) -> f64 {
        input.operative() - self.cooling_per_mps * (wind_speed - self.calm).max(0.0)
    }
}

#[derive(Clone)]
pub struct Outdoor {
    pub wind_speed: f64,
    estimator: Arc<dyn OutdoorIndex>,
}

impl fmt::Debug for Outdoor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Outdoor")
            .field("wind_speed", &self.wind_speed)
            .finish_non_exhaustive()
    }
}

impl Default for Outdoor {
    fn default() -> Self {
        Self {
            wind_speed: 0.5,
            estimator: Arc::new(WindAdjustedOperative::default()),
        }
    }
}

impl Outdoor {
    pub fn new(wind_speed: f64) -> ComfortResult<Self> {
        cm_core::ensure_in_range(wind_speed, 0.0, 40.0, "wind speed")?;
        Ok(Self {
            wind_speed,
            ..Self::default()
        })
    }

    /// Swap in another index estimator.
    pub fn with_estimator(mut self, estimator: Arc<dyn OutdoorIndex>) -> Self {
        self.estimator = estimator;
        self
    }
}

impl ComfortStandard for Outdoor {
    fn kind(&self) -> StandardKind {
        StandardKind::Outdoor
    }

    fn evaluate(&self, input: &ComfortInput) -> ComfortResult<ComfortOutcome> {
        let wind = input.air_speed.unwrap_or(self.wind_speed);
        let utci = self.estimator.index(input, wind);
        cm_core::ensure_finite(utci, "UTCI estimate")?;
        Ok(ComfortOutcome {
            comfortable: (NO_STRESS.0..=NO_STRESS.1).contains(&utci),
            degrees_from_target: utci - NEUTRAL_UTCI,
            index: Some(utci),
        })
    }
}
