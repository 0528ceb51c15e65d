//! Temporal aggregation of per-hour comfort results.
//!
//! Each hour of the comfort matrix is classified per point into occupied,
//! comfortable, passively comfortable, over-heated and under-heated flags.
//! Hours are independent, so the flags are computed in parallel and reduced
//! by summing [`PointCounters`].

use std::iter::Sum;
use std::ops::{Add, AddAssign};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::matrix::{ResultMatrix, Summary};
use crate::types::SummaryMode;
use crate::{ResultsError, ResultsResult};

/// Per-point hour counts. A single hour's flags are counters of 0 or 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointCounters {
    pub occupied: u32,
    pub comfortable: u32,
    pub passive: u32,
    pub over: u32,
    pub under: u32,
}

impl Add for PointCounters {
    type Output = PointCounters;

    fn add(self, rhs: Self) -> Self::Output {
        PointCounters {
            occupied: self.occupied + rhs.occupied,
            comfortable: self.comfortable + rhs.comfortable,
            passive: self.passive + rhs.passive,
            over: self.over + rhs.over,
            under: self.under + rhs.under,
        }
    }
}

impl AddAssign for PointCounters {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for PointCounters {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(PointCounters::default(), Add::add)
    }
}

/// Aggregated indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    OccTcp,
    ThermalAutonomy,
    OverHeated,
    UnderHeated,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::OccTcp,
        Metric::ThermalAutonomy,
        Metric::OverHeated,
        Metric::UnderHeated,
    ];

    pub fn label(&self, prefix: &str) -> String {
        let name = match self {
            Metric::OccTcp => "Occupied Thermal Comfort Percent",
            Metric::ThermalAutonomy => "Thermal Autonomy",
            Metric::OverHeated => "Over-Heated Percent",
            Metric::UnderHeated => "Under-Heated Percent",
        };
        format!("{prefix} {name}")
    }

    pub fn count(&self, c: &PointCounters) -> u32 {
        match self {
            Metric::OccTcp => c.comfortable,
            Metric::ThermalAutonomy => c.passive,
            Metric::OverHeated => c.over,
            Metric::UnderHeated => c.under,
        }
    }
}

/// Borrowed inputs for one aggregation pass.
///
/// `occupancy[z]` and `conditioning[z]` are aligned with the rows of the
/// comfort matrix. A zone with no conditioning series is passive.
#[derive(Debug, Clone, Copy)]
pub struct AggregationInputs<'a> {
    pub comfort: &'a ResultMatrix,
    pub degrees: &'a ResultMatrix,
    pub point_zones: &'a [usize],
    pub occupancy: &'a [Vec<f64>],
    pub conditioning: &'a [Option<Vec<f64>>],
    /// Points of this zone are always occupied and never conditioned.
    pub outdoor_zone: Option<usize>,
}

impl AggregationInputs<'_> {
    /// First word of the comfort matrix label, e.g. `Adaptive`.
    pub fn comfort_type(&self) -> &str {
        self.comfort.label.split_whitespace().next().unwrap_or("")
    }

    fn check(&self) -> ResultsResult<()> {
        self.comfort.check_shape()?;
        self.degrees.check_shape()?;
        let shape = |what: String| Err(ResultsError::Shape { what });

        let hours = self.comfort.hour_count();
        let points = self.comfort.point_count();
        if self.degrees.hour_count() != hours || self.degrees.point_count() != points {
            return shape(format!(
                "'{}' is {}x{} but '{}' is {hours}x{points}",
                self.degrees.label,
                self.degrees.hour_count(),
                self.degrees.point_count(),
                self.comfort.label
            ));
        }
        if self.point_zones.len() != points {
            return shape(format!(
                "{} point zones for {points} points",
                self.point_zones.len()
            ));
        }
        for &z in self.point_zones {
            if Some(z) == self.outdoor_zone {
                continue;
            }
            match self.occupancy.get(z) {
                Some(occ) if occ.len() == hours => {}
                Some(occ) => {
                    return shape(format!(
                        "occupancy of zone {z} has {} hours, expected {hours}",
                        occ.len()
                    ));
                }
                None => return shape(format!("no occupancy for zone {z}")),
            }
            if let Some(Some(energy)) = self.conditioning.get(z) {
                if energy.len() != hours {
                    return shape(format!(
                        "conditioning of zone {z} has {} hours, expected {hours}",
                        energy.len()
                    ));
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemporalAggregator {
    /// A zone is occupied when its schedule value exceeds this.
    pub occupancy_threshold: f64,
    pub parallel: bool,
}

impl Default for TemporalAggregator {
    fn default() -> Self {
        Self {
            occupancy_threshold: 0.0,
            parallel: true,
        }
    }
}

impl TemporalAggregator {
    pub fn new(occupancy_threshold: f64) -> Self {
        Self {
            occupancy_threshold,
            ..Self::default()
        }
    }

    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Flags of every point at row `h`.
    pub fn hour_flags(&self, inputs: &AggregationInputs<'_>, h: usize) -> Vec<PointCounters> {
        let comfort = &inputs.comfort.rows[h];
        let degrees = &inputs.degrees.rows[h];

        inputs
            .point_zones
            .iter()
            .enumerate()
            .map(|(p, &z)| {
                let outdoor = Some(z) == inputs.outdoor_zone;
                let occupied =
                    outdoor || inputs.occupancy[z][h] > self.occupancy_threshold;
                if !occupied {
                    return PointCounters::default();
                }
                let energy = if outdoor {
                    0.0
                } else {
                    match inputs.conditioning.get(z) {
                        Some(Some(series)) => series[h],
                        _ => 0.0,
                    }
                };

                let mut flags = PointCounters {
                    occupied: 1,
                    ..PointCounters::default()
                };
                if comfort[p] > 0.0 {
                    flags.comfortable = 1;
                    if energy <= 0.0 {
                        flags.passive = 1;
                    }
                } else if degrees[p] > 0.0 {
                    flags.over = 1;
                } else {
                    flags.under = 1;
                }
                flags
            })
            .collect()
    }

    pub fn aggregate(&self, inputs: &AggregationInputs<'_>) -> ResultsResult<AggregateResult> {
        inputs.check()?;
        let hours = inputs.comfort.hour_count();
        let points = inputs.comfort.point_count();
        debug!(hours, points, parallel = self.parallel, "Aggregating comfort");

        let flags: Vec<Vec<PointCounters>> = if self.parallel {
            (0..hours)
                .into_par_iter()
                .map(|h| self.hour_flags(inputs, h))
                .collect()
        } else {
            (0..hours).map(|h| self.hour_flags(inputs, h)).collect()
        };

        let totals: Vec<PointCounters> = (0..points)
            .map(|p| flags.iter().map(|row| row[p]).sum())
            .collect();

        let prefix = inputs.comfort_type().to_string();
        let occupied: Vec<f64> = totals.iter().map(|c| c.occupied as f64).collect();
        let matrices = Metric::ALL
            .iter()
            .map(|metric| {
                let rows = flags
                    .iter()
                    .map(|row| row.iter().map(|c| metric.count(c) as f64).collect())
                    .collect();
                ResultMatrix::new(metric.label(&prefix), inputs.comfort.period)
                    .with_rows(rows)
                    .with_occupied_hours(occupied.clone())
            })
            .collect();

        let unoccupied = totals.iter().filter(|c| c.occupied == 0).count();
        info!(points, unoccupied, "Aggregation complete");

        Ok(AggregateResult {
            prefix,
            totals,
            matrices,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggregateResult {
    pub prefix: String,
    pub totals: Vec<PointCounters>,
    /// Indicator matrices in [`Metric::ALL`] order.
    pub matrices: Vec<ResultMatrix>,
}

impl AggregateResult {
    pub fn matrix(&self, metric: Metric) -> Option<&ResultMatrix> {
        let i = Metric::ALL.iter().position(|m| *m == metric)?;
        self.matrices.get(i)
    }

    pub fn summary(&self, metric: Metric, mode: SummaryMode) -> ResultsResult<Summary> {
        let matrix = self.matrix(metric).ok_or_else(|| ResultsError::Shape {
            what: format!("missing matrix for {metric:?}"),
        })?;
        matrix.summarize(mode)
    }

    pub fn summaries(&self, mode: SummaryMode) -> ResultsResult<Vec<Summary>> {
        self.matrices.iter().map(|m| m.summarize(mode)).collect()
    }
}
