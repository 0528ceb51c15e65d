//! Run-level comfort configuration.

use std::sync::Arc;

use cm_series::PrevailingBasis;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::adaptive::{Acceptability, Adaptive, AdaptiveMethod};
use crate::error::ComfortResult;
use crate::outdoor::Outdoor;
use crate::pmv::Pmv;
use crate::standard::{ComfortStandard, StandardKind};

fn default_percentile() -> u8 {
    80
}

fn default_air_speed() -> f64 {
    0.05
}

fn default_clothing() -> f64 {
    0.85
}

fn default_metabolic_rate() -> f64 {
    1.1
}

fn default_ppd_threshold() -> f64 {
    10.0
}

fn default_wind_speed() -> f64 {
    0.5
}

/// Which standard to evaluate and its parameters. Immutable per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ComfortStandardParams {
    Adaptive {
        #[serde(default)]
        method: AdaptiveMethod,
        #[serde(default = "default_percentile")]
        percentile: u8,
        #[serde(default)]
        prevailing_basis: PrevailingBasis,
        #[serde(default)]
        conditioning: f64,
        #[serde(default = "default_air_speed")]
        air_speed: f64,
    },
    Pmv {
        #[serde(default = "default_clothing")]
        clothing: f64,
        #[serde(default = "default_metabolic_rate")]
        metabolic_rate: f64,
        #[serde(default = "default_air_speed")]
        air_speed: f64,
        #[serde(default = "default_ppd_threshold")]
        ppd_threshold: f64,
    },
    Outdoor {
        #[serde(default = "default_wind_speed")]
        wind_speed: f64,
    },
}

impl Default for ComfortStandardParams {
    fn default() -> Self {
        ComfortStandardParams::Adaptive {
            method: AdaptiveMethod::default(),
            percentile: default_percentile(),
            prevailing_basis: PrevailingBasis::default(),
            conditioning: 0.0,
            air_speed: default_air_speed(),
        }
    }
}

impl ComfortStandardParams {
    pub fn kind(&self) -> StandardKind {
        match self {
            ComfortStandardParams::Adaptive { .. } => StandardKind::Adaptive,
            ComfortStandardParams::Pmv { .. } => StandardKind::Pmv,
            ComfortStandardParams::Outdoor { .. } => StandardKind::Outdoor,
        }
    }

    /// Prevailing-temperature basis, for standards that use one.
    pub fn prevailing_basis(&self) -> Option<PrevailingBasis> {
        match self {
            ComfortStandardParams::Adaptive {
                prevailing_basis, ..
            } => Some(*prevailing_basis),
            _ => None,
        }
    }

    /// Validate parameters and build the standard.
    pub fn build(&self) -> ComfortResult<Arc<dyn ComfortStandard>> {
        debug!(params = ?self, "building comfort standard");
        Ok(match self {
            ComfortStandardParams::Adaptive {
                method,
                percentile,
                conditioning,
                air_speed,
                ..
            } => Arc::new(Adaptive::new(
                *method,
                Acceptability::from_percentile(*percentile)?,
                *conditioning,
                *air_speed,
            )?),
            ComfortStandardParams::Pmv {
                clothing,
                metabolic_rate,
                air_speed,
                ppd_threshold,
            } => Arc::new(Pmv::new(
                *clothing,
                *metabolic_rate,
                *air_speed,
                *ppd_threshold,
            )?),
            ComfortStandardParams::Outdoor { wind_speed } => Arc::new(Outdoor::new(*wind_speed)?),
        })
    }
}
