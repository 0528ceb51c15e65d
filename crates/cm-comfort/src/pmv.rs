//! Fanger PMV/PPD (ISO 7730).

use tracing::warn;

use crate::error::{ComfortError, ComfortResult};
use crate::standard::{ComfortInput, ComfortOutcome, ComfortStandard, StandardKind};

const MAX_ITERATIONS: usize = 150;
const TOLERANCE: f64 = 0.00015;

/// Predicted mean vote and predicted percentage dissatisfied.
///
/// `ta`/`tr` in °C, `vel` in m/s, `rh` in %, `met` in met, `clo` in clo,
/// `wme` external work in met.
pub fn pmv_ppd(
    ta: f64,
    tr: f64,
    vel: f64,
    rh: f64,
    met: f64,
    clo: f64,
    wme: f64,
) -> ComfortResult<(f64, f64)> {
    // Water vapour pressure, Pa.
    let pa = rh * 10.0 * (16.6536 - 4030.183 / (ta + 235.0)).exp();

    let icl = 0.155 * clo;
    let m = met * 58.15;
    let w = wme * 58.15;
    let mw = m - w;

    let fcl = if icl <= 0.078 {
        1.0 + 1.29 * icl
    } else {
        1.05 + 0.645 * icl
    };

    let hcf = 12.1 * vel.sqrt();
    let taa = ta + 273.0;
    let tra = tr + 273.0;
    let tcla = taa + (35.5 - ta) / (3.5 * icl + 0.1);

    let p1 = icl * fcl;
    let p2 = p1 * 3.96;
    let p3 = p1 * 100.0;
    let p4 = p1 * taa;
    let p5 = 308.7 - 0.028 * mw + p2 * (tra / 100.0).powi(4);

    let mut xn = tcla / 100.0;
    let mut xf = tcla / 50.0;
    let mut hc = hcf;
    let mut n = 0;
    while (xn - xf).abs() > TOLERANCE {
        xf = (xf + xn) / 2.0;
        let hcn = 2.38 * (100.0 * xf - taa).abs().powf(0.25);
        hc = hcf.max(hcn);
        xn = (p5 + p4 * hc - p2 * xf.powi(4)) / (100.0 + p3 * hc);
        n += 1;
        if n > MAX_ITERATIONS {
            warn!(ta, tr, iterations = n, "clothing surface temperature did not converge");
            return Err(ComfortError::NoConvergence { iterations: n });
        }
    }
    let tcl = 100.0 * xn - 273.0;

    // Heat loss components.
    let hl1 = 3.05e-3 * (5733.0 - 6.99 * mw - pa);
    let hl2 = if mw > 58.15 { 0.42 * (mw - 58.15) } else { 0.0 };
    let hl3 = 1.7e-5 * m * (5867.0 - pa);
    let hl4 = 0.0014 * m * (34.0 - ta);
    let hl5 = 3.96 * fcl * (xn.powi(4) - (tra / 100.0).powi(4));
    let hl6 = fcl * hc * (tcl - ta);

    let ts = 0.303 * (-0.036 * m).exp() + 0.028;
    let pmv = ts * (mw - hl1 - hl2 - hl3 - hl4 - hl5 - hl6);
    let ppd = 100.0 - 95.0 * (-0.03353 * pmv.powi(4) - 0.2179 * pmv.powi(2)).exp();
    Ok((pmv, ppd))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pmv {
    pub clothing: f64,
    pub metabolic_rate: f64,
    pub air_speed: f64,
    /// Highest acceptable PPD in percent.
    pub ppd_threshold: f64,
}

impl Default for Pmv {
    fn default() -> Self {
        Self {
            clothing: 0.85,
            metabolic_rate: 1.1,
            air_speed: 0.05,
            ppd_threshold: 10.0,
        }
    }
}

impl Pmv {
    pub fn new(
        clothing: f64,
        metabolic_rate: f64,
        air_speed: f64,
        ppd_threshold: f64,
    ) -> ComfortResult<Self> {
        cm_core::ensure_in_range(clothing, 0.0, 4.0, "clothing level")?;
        cm_core::ensure_in_range(metabolic_rate, 0.5, 6.0, "metabolic rate")?;
        cm_core::ensure_in_range(air_speed, 0.0, 10.0, "air speed")?;
        cm_core::ensure_in_range(ppd_threshold, 5.0, 100.0, "PPD threshold")?;
        Ok(Self {
            clothing,
            metabolic_rate,
            air_speed,
            ppd_threshold,
        })
    }
}

impl ComfortStandard for Pmv {
    fn kind(&self) -> StandardKind {
        StandardKind::Pmv
    }

    fn needs_humidity(&self) -> bool {
        true
    }

    fn evaluate(&self, input: &ComfortInput) -> ComfortResult<ComfortOutcome> {
        let rh = input.relative_humidity.ok_or(ComfortError::MissingInput {
            what: "relative humidity",
        })?;
        let (pmv, ppd) = pmv_ppd(
            input.air_temp,
            input.mrt,
            input.air_speed.unwrap_or(self.air_speed),
            rh,
            self.metabolic_rate,
            self.clothing,
            0.0,
        )?;
        Ok(ComfortOutcome {
            comfortable: ppd <= self.ppd_threshold,
            degrees_from_target: pmv,
            index: None,
        })
    }
}
