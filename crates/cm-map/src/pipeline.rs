//! The hourly mapping loop.
//!
//! Hours are independent: each one reads the shared [`RunContext`] and yields
//! one [`HourRow`]. With `parallel` set the hours are mapped on the rayon
//! pool; the output is identical either way.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use cm_comfort::{ComfortInput, StandardKind};
use cm_core::round_to;
use cm_core::timing::Timer;
use cm_results::ResultMatrix;
use cm_series::AnalysisPeriod;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::air::{blend_zone_air, operative_temperature, stratify};
use crate::context::RunContext;
use crate::error::{MapError, MapResult};
use crate::radiant::{
    Exposure, SunState, base_mrt, effective_radiant_flux, mrt_delta, outdoor_base_mrt,
};
use crate::solar::sky_temperature;

/// Shared flag to stop a run between hours.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapProgress {
    pub completed: usize,
    pub total: usize,
    pub hoy: usize,
}

/// Progress callback. Called from worker threads in parallel runs.
pub type ProgressFn<'a> = &'a (dyn Fn(MapProgress) + Sync);

/// Values of one point at one hour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointHourRecord {
    pub point: usize,
    pub zone: usize,
    pub mrt: f64,
    pub air_temp: f64,
    pub operative: f64,
    pub comfortable: bool,
    pub degrees_from_target: f64,
    pub comfort_index: Option<f64>,
}

/// All points of one hour, column-wise.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HourRow {
    pub hoy: usize,
    pub mrt: Vec<f64>,
    pub air_temp: Vec<f64>,
    pub operative: Vec<f64>,
    pub comfortable: Vec<bool>,
    pub degrees_from_target: Vec<f64>,
    pub comfort_index: Vec<Option<f64>>,
}

impl HourRow {
    fn with_capacity(hoy: usize, n: usize) -> Self {
        Self {
            hoy,
            mrt: Vec::with_capacity(n),
            air_temp: Vec::with_capacity(n),
            operative: Vec::with_capacity(n),
            comfortable: Vec::with_capacity(n),
            degrees_from_target: Vec::with_capacity(n),
            comfort_index: Vec::with_capacity(n),
        }
    }

    fn push(&mut self, r: PointHourRecord) {
        self.mrt.push(r.mrt);
        self.air_temp.push(r.air_temp);
        self.operative.push(r.operative);
        self.comfortable.push(r.comfortable);
        self.degrees_from_target.push(r.degrees_from_target);
        self.comfort_index.push(r.comfort_index);
    }
}

/// Solar state of hour `i`, if the sun is up and radiation data was given.
fn sun_at(ctx: &RunContext, i: usize) -> Option<SunState> {
    let solar = ctx.solar.as_ref()?;
    let pos = solar.positions.get(i)?;
    if !pos.is_above_horizon() {
        return None;
    }
    Some(SunState::new(
        *pos,
        solar.direct_normal[i],
        solar.diffuse_horizontal[i],
        solar.global_horizontal[i],
        solar.window_transmittance[i],
    ))
}

/// Radiant temperature of point `p` at hour `i`.
pub fn point_mrt(ctx: &RunContext, p: usize, i: usize, sun: Option<&SunState>) -> MapResult<f64> {
    let model = &ctx.model;
    let (Some(z), Some(point)) = (model.zone_of(p), model.point(p)) else {
        return Err(MapError::InvalidInput {
            what: format!("point {p} is not in the model"),
        });
    };
    let temps: Vec<f64> = ctx.surface_temps[z].iter().map(|col| col[i]).collect();
    let outdoor = Some(z) == model.outdoor_zone();

    let base = if outdoor {
        let dry_bulb = ctx.dry_bulb.as_ref().map(|d| d[i]).unwrap_or_default();
        let non_surface = point.non_surface_view.unwrap_or(point.sky_view);
        outdoor_base_mrt(&point.view_factors, &temps, non_surface, dry_bulb)
    } else {
        base_mrt(&point.view_factors, &temps)
    };

    let Some(sun) = sun else {
        return Ok(base);
    };
    if !outdoor && !model.has_windows(z) {
        return Ok(base);
    }

    let exposure = Exposure {
        sky_view: point.sky_view,
        sun_transmittance: ctx.occlusion.transmittance(model, p, &sun.direction),
        floor_reflectivity: ctx.site.floor_reflectivity,
        clothing_absorptivity: ctx.site.clothing_absorptivity,
        through_window: !outdoor,
    };
    let delta = mrt_delta(effective_radiant_flux(sun, &exposure));

    if outdoor {
        let blended = match &ctx.horizontal_infrared {
            Some(ir) => {
                let half_sky = point.sky_view / 2.0;
                sky_temperature(ir[i]) * half_sky + base * (1.0 - half_sky)
            }
            None => base,
        };
        Ok(blended + delta)
    } else {
        Ok(base + delta)
    }
}

/// Air temperature of point `p` at hour `i`.
pub fn point_air_temperature(ctx: &RunContext, p: usize, i: usize) -> MapResult<f64> {
    let model = &ctx.model;
    let (Some(z), Some(point)) = (model.zone_of(p), model.point(p)) else {
        return Err(MapError::InvalidInput {
            what: format!("point {p} is not in the model"),
        });
    };
    if Some(z) == model.outdoor_zone() {
        return ctx.dry_bulb.as_ref().map(|d| d[i]).ok_or_else(|| MapError::Match {
            what: "outdoor dry bulb temperature".to_string(),
        });
    }
    let zone_air: Vec<f64> = ctx.air_temps.iter().map(|col| col[i]).collect();
    let mixed = ctx.well_mixed.as_ref().is_some_and(|m| m[i] >= 1.0);
    Ok(stratify(
        blend_zone_air(&point.zone_weights, &zone_air),
        point.height_weight,
        mixed,
    ))
}

/// Air speed at point `p` and hour `i`, when a source covers its zone.
pub fn point_air_speed(ctx: &RunContext, p: usize, i: usize) -> Option<f64> {
    let z = ctx.model.zone_of(p)?;
    let offset = p.checked_sub(ctx.model.points_of(z).start)?;
    ctx.air_speed.get(z)?.as_ref()?.at(offset, i)
}

/// Evaluate every point at analysis hour `i`.
pub fn map_hour(ctx: &RunContext, i: usize) -> MapResult<HourRow> {
    let hoy = ctx.hoys[i];
    let n = ctx.model.point_count();
    let sun = sun_at(ctx, i);
    let mut row = HourRow::with_capacity(hoy, n);

    for p in 0..n {
        let zone = ctx.model.zone_of(p).unwrap_or(0);
        let mrt = point_mrt(ctx, p, i, sun.as_ref())?;
        let air_temp = point_air_temperature(ctx, p, i)?;

        let mut input = ComfortInput::new(air_temp, mrt);
        if let Some(rh) = &ctx.humidity {
            input = input.with_humidity(rh[zone][i]);
        }
        if let Some(prevailing) = &ctx.prevailing {
            input = input.with_prevailing(prevailing[i]);
        }
        if let Some(speed) = point_air_speed(ctx, p, i) {
            input = input.with_air_speed(speed);
        }
        let outcome = ctx.standard.evaluate(&input)?;

        row.push(PointHourRecord {
            point: p,
            zone,
            mrt,
            air_temp,
            operative: operative_temperature(air_temp, mrt),
            comfortable: outcome.comfortable,
            degrees_from_target: outcome.degrees_from_target,
            comfort_index: outcome.index,
        });
    }
    Ok(row)
}

/// Map every hour of the analysis period.
pub fn run_map(
    ctx: &RunContext,
    cancel: &CancelToken,
    progress: Option<ProgressFn<'_>>,
) -> MapResult<MapOutput> {
    let total = ctx.hour_count();
    info!(
        hours = total,
        points = ctx.model.point_count(),
        standard = ctx.standard.kind().prefix(),
        parallel = ctx.parallel,
        "Starting comfort map"
    );
    let timer = Timer::start("map");
    let completed = AtomicUsize::new(0);

    let step = |i: usize| -> MapResult<HourRow> {
        if cancel.is_cancelled() {
            return Err(MapError::Cancelled { at_hour: ctx.hoys[i] });
        }
        let row = map_hour(ctx, i)?;
        let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(cb) = progress {
            cb(MapProgress {
                completed: done,
                total,
                hoy: row.hoy,
            });
        }
        Ok(row)
    };

    let hours = if ctx.parallel {
        (0..total).into_par_iter().map(step).collect::<MapResult<Vec<_>>>()?
    } else {
        (0..total).map(step).collect::<MapResult<Vec<_>>>()?
    };

    timer.stop_and_log();
    debug!(hours = hours.len(), "Comfort map complete");

    Ok(MapOutput {
        kind: ctx.standard.kind(),
        period: ctx.period,
        point_zones: ctx.point_zones(),
        outdoor_zone: ctx.model.outdoor_zone(),
        hours,
    })
}

/// Per-hour result matrices a map run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapField {
    Radiant,
    Air,
    Operative,
    Index,
    Comfort,
    Degrees,
}

impl MapField {
    pub fn label(&self, kind: StandardKind) -> Option<String> {
        match self {
            MapField::Radiant => Some("Radiant Temperature".to_string()),
            MapField::Air => Some("Air Temperature".to_string()),
            MapField::Operative => Some("Operative Temperature".to_string()),
            MapField::Index => kind.index_label().map(str::to_string),
            MapField::Comfort => Some(kind.comfort_label()),
            MapField::Degrees => Some(kind.degrees_label().to_string()),
        }
    }

    fn values(&self, row: &HourRow) -> Vec<f64> {
        match self {
            MapField::Radiant => row.mrt.clone(),
            MapField::Air => row.air_temp.clone(),
            MapField::Operative => row.operative.clone(),
            MapField::Index => row.comfort_index.iter().map(|v| v.unwrap_or(f64::NAN)).collect(),
            MapField::Comfort => row
                .comfortable
                .iter()
                .map(|&c| if c { 1.0 } else { 0.0 })
                .collect(),
            MapField::Degrees => row.degrees_from_target.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapOutput {
    pub kind: StandardKind,
    pub period: AnalysisPeriod,
    pub point_zones: Vec<usize>,
    pub outdoor_zone: Option<usize>,
    pub hours: Vec<HourRow>,
}

impl MapOutput {
    pub fn hoys(&self) -> Vec<usize> {
        self.hours.iter().map(|h| h.hoy).collect()
    }

    /// One field as a matrix, values rounded to 3 decimals.
    pub fn matrix(&self, field: MapField) -> Option<ResultMatrix> {
        let label = field.label(self.kind)?;
        let rows = self
            .hours
            .iter()
            .map(|h| field.values(h).into_iter().map(|v| round_to(v, 3)).collect())
            .collect();
        Some(ResultMatrix::new(label, self.period).with_rows(rows))
    }

    pub fn comfort_matrix(&self) -> ResultMatrix {
        self.matrix(MapField::Comfort)
            .unwrap_or_else(|| ResultMatrix::new(self.kind.comfort_label(), self.period))
    }

    pub fn degrees_matrix(&self) -> ResultMatrix {
        self.matrix(MapField::Degrees)
            .unwrap_or_else(|| ResultMatrix::new(self.kind.degrees_label(), self.period))
    }

    /// Every matrix of the run, in output order.
    pub fn matrices(&self) -> Vec<ResultMatrix> {
        [
            MapField::Radiant,
            MapField::Air,
            MapField::Operative,
            MapField::Index,
            MapField::Comfort,
            MapField::Degrees,
        ]
        .iter()
        .filter_map(|f| self.matrix(*f))
        .collect()
    }
}
