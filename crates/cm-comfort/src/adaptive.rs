//! Adaptive comfort: the acceptable operative-temperature band follows the
//! prevailing outdoor temperature.

use serde::{Deserialize, Serialize};

use crate::error::{ComfortError, ComfortResult};
use crate::standard::{ComfortInput, ComfortOutcome, ComfortStandard, StandardKind};

/// Correlation family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdaptiveMethod {
    #[default]
    Ashrae55,
    En15251,
}

/// Share of occupants the band is expected to satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Acceptability {
    #[default]
    Eighty,
    Ninety,
}

impl Acceptability {
    pub fn from_percentile(p: u8) -> ComfortResult<Self> {
        match p {
            80 => Ok(Self::Eighty),
            90 => Ok(Self::Ninety),
            other => Err(ComfortError::InvalidParam {
                what: format!("acceptability percentile must be 80 or 90, got {other}"),
            }),
        }
    }
}

/// Upper-limit offsets for elevated air speed (ASHRAE-55).
const AIR_SPEED_OFFSETS: [(f64, f64); 3] = [(1.2, 2.2), (0.9, 1.8), (0.6, 1.2)];

/// Operative temperature above which air movement widens the band.
const AIR_SPEED_MIN_OPERATIVE: f64 = 25.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Adaptive {
    pub method: AdaptiveMethod,
    pub acceptability: Acceptability,
    /// 0 = free running, 1 = fully conditioned.
    pub conditioning: f64,
    /// Air speed at the occupant, m/s.
    pub air_speed: f64,
}

impl Default for Adaptive {
    fn default() -> Self {
        Self {
            method: AdaptiveMethod::Ashrae55,
            acceptability: Acceptability::Eighty,
            conditioning: 0.0,
            air_speed: 0.05,
        }
    }
}

impl Adaptive {
    pub fn new(
        method: AdaptiveMethod,
        acceptability: Acceptability,
        conditioning: f64,
        air_speed: f64,
    ) -> ComfortResult<Self> {
        cm_core::ensure_fraction(conditioning, "level of conditioning")?;
        cm_core::ensure_in_range(air_speed, 0.0, 10.0, "air speed")?;
        Ok(Self {
            method,
            acceptability,
            conditioning,
            air_speed,
        })
    }

    /// Prevailing-temperature range the correlation was fitted over.
    fn prevailing_range(&self) -> (f64, f64) {
        match self.method {
            AdaptiveMethod::Ashrae55 => (10.0, 33.5),
            AdaptiveMethod::En15251 => (10.0, 30.0),
        }
    }

    /// Neutral operative temperature for a prevailing outdoor temperature.
    pub fn neutral_temperature(&self, prevailing: f64) -> f64 {
        let (lo, hi) = self.prevailing_range();
        let t = prevailing.clamp(lo, hi);
        let (free, conditioned) = match self.method {
            AdaptiveMethod::Ashrae55 => (0.31 * t + 17.8, 0.09 * t + 22.6),
            AdaptiveMethod::En15251 => (0.33 * t + 18.8, 0.06 * t + 22.6),
        };
        if self.conditioning == 0.0 {
            free
        } else {
            free * (1.0 - self.conditioning) + conditioned * self.conditioning
        }
    }

    /// Half-width of the acceptable band.
    pub fn band(&self) -> f64 {
        match (self.method, self.acceptability) {
            (AdaptiveMethod::Ashrae55, Acceptability::Eighty) => 3.5,
            (AdaptiveMethod::Ashrae55, Acceptability::Ninety) => 2.5,
            (AdaptiveMethod::En15251, Acceptability::Eighty) => 3.0,
            (AdaptiveMethod::En15251, Acceptability::Ninety) => 2.0,
        }
    }

    fn air_speed_offset(&self, air_speed: f64, operative: f64) -> f64 {
        if self.method != AdaptiveMethod::Ashrae55 || operative <= AIR_SPEED_MIN_OPERATIVE {
            return 0.0;
        }
        AIR_SPEED_OFFSETS
            .iter()
            .find(|(speed, _)| air_speed >= *speed)
            .map(|(_, offset)| *offset)
            .unwrap_or(0.0)
    }
}

impl ComfortStandard for Adaptive {
    fn kind(&self) -> StandardKind {
        StandardKind::Adaptive
    }

    fn needs_prevailing(&self) -> bool {
        true
    }

    fn evaluate(&self, input: &ComfortInput) -> ComfortResult<ComfortOutcome> {
        let prevailing = input.prevailing.ok_or(ComfortError::MissingInput {
            what: "prevailing outdoor temperature",
        })?;
        let operative = input.operative();
        let neutral = self.neutral_temperature(prevailing);
        let band = self.band();
        let lower = neutral - band;
        let speed = input.air_speed.unwrap_or(self.air_speed);
        let upper = neutral + band + self.air_speed_offset(speed, operative);

        Ok(ComfortOutcome {
            comfortable: operative >= lower && operative <= upper,
            degrees_from_target: operative - neutral,
            index: None,
        })
    }
}
