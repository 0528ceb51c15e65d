//! Prevailing outdoor temperature for adaptive comfort.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SeriesError, SeriesResult};
use cm_core::HOURS_PER_YEAR;

/// Hours in each month of a non-leap year.
pub const HOURS_IN_MONTH: [usize; 12] =
    [744, 672, 744, 720, 744, 720, 744, 744, 720, 744, 720, 744];

/// Running-mean decay constant.
const ALPHA: f64 = 0.8;

/// Prevailing temperatures below this fall outside the adaptive models'
/// calibration range.
pub const COLD_LIMIT: f64 = 10.0;

/// How the prevailing temperature is computed from dry-bulb data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrevailingBasis {
    /// Each hour takes the mean of its month.
    #[default]
    MonthlyAverage,
    /// Exponentially weighted daily running mean.
    RunningMean,
}

/// Hourly prevailing temperature plus the periods that fell below
/// [`COLD_LIMIT`].
#[derive(Debug, Clone, PartialEq)]
pub struct PrevailingTemperature {
    pub basis: PrevailingBasis,
    /// 8760 values, one per hour of year.
    pub hourly: Vec<f64>,
    /// 0-based months (monthly basis) or days (running mean) that were cold.
    pub cold_periods: Vec<usize>,
}

impl PrevailingTemperature {
    /// Value at a 1-based hour of year.
    pub fn at(&self, hoy: usize) -> Option<f64> {
        hoy.checked_sub(1).and_then(|i| self.hourly.get(i)).copied()
    }

    /// Cold periods touched by the given hours of year.
    pub fn cold_in(&self, hoys: &[usize]) -> Vec<usize> {
        let mut out: Vec<usize> = hoys
            .iter()
            .filter_map(|&hoy| {
                let period = match self.basis {
                    PrevailingBasis::MonthlyAverage => month_of_hour(hoy),
                    PrevailingBasis::RunningMean => hoy.checked_sub(1).map(|h| h / 24),
                }?;
                self.cold_periods.contains(&period).then_some(period)
            })
            .collect();
        out.dedup();
        out
    }
}

/// 0-based month of a 1-based hour of year.
fn month_of_hour(hoy: usize) -> Option<usize> {
    let mut end = 0;
    for (m, hours) in HOURS_IN_MONTH.iter().enumerate() {
        end += hours;
        if hoy >= 1 && hoy <= end {
            return Some(m);
        }
    }
    None
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Compute the prevailing outdoor temperature from a full year of dry-bulb.
pub fn prevailing_outdoor_temperature(
    dry_bulb: &[f64],
    basis: PrevailingBasis,
) -> SeriesResult<PrevailingTemperature> {
    if dry_bulb.len() != HOURS_PER_YEAR {
        return Err(SeriesError::Length {
            what: "prevailing outdoor temperature".to_string(),
            expected: HOURS_PER_YEAR,
            actual: dry_bulb.len(),
        });
    }

    let mut hourly = Vec::with_capacity(HOURS_PER_YEAR);
    let mut cold_periods = Vec::new();

    match basis {
        PrevailingBasis::MonthlyAverage => {
            let mut start = 0;
            for (month, &hours) in HOURS_IN_MONTH.iter().enumerate() {
                let avg = mean(&dry_bulb[start..start + hours]);
                hourly.extend(std::iter::repeat_n(avg, hours));
                if avg < COLD_LIMIT {
                    cold_periods.push(month);
                }
                start += hours;
            }
        }
        PrevailingBasis::RunningMean => {
            let daily: Vec<f64> = dry_bulb.chunks(24).map(mean).collect();

            // Seed from the last six days of the year, newest weighted most.
            let mut dividend = 0.0;
            let mut divisor = 0.0;
            for k in 0..6 {
                let w = ALPHA.powi(k as i32);
                dividend += w * daily[daily.len() - 1 - k];
                divisor += w;
            }
            let mut run_mean = dividend / divisor;

            for (day, _) in daily.iter().enumerate() {
                if day > 0 {
                    run_mean = (1.0 - ALPHA) * daily[day - 1] + ALPHA * run_mean;
                }
                if run_mean < COLD_LIMIT {
                    cold_periods.push(day);
                }
                hourly.extend(std::iter::repeat_n(run_mean, 24));
            }
        }
    }

    debug!(?basis, cold = cold_periods.len(), "computed prevailing outdoor temperature");
    Ok(PrevailingTemperature {
        basis,
        hourly,
        cold_periods,
    })
}
