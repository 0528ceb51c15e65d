//! Everything one mapping run reads, resolved and aligned up front.
//!
//! Building a [`RunContext`] validates every supplied series, matches series
//! names to mesh surfaces and zones, and re-indexes all data onto the hours of
//! the analysis period. The hour loop then only does array lookups.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use cm_comfort::{ComfortStandard, ComfortStandardParams};
use cm_geometry::ViewFactorModel;
use cm_series::{
    AnalysisPeriod, DataKind, Diagnostic, MergePolicy, PeriodIndex, SeriesRecord,
    ValidatedSeries, merge_pieces, prevailing_outdoor_temperature, validate_series,
};
use tracing::{debug, info, warn};

use crate::error::{MapError, MapResult};
use crate::inputs::{MapInputs, MapOptions};
use crate::occlusion::{BlockedVectorOcclusion, SunOcclusion};
use crate::solar::{SiteContext, SolarPosition};
use crate::wind::{ZoneAirSpeed, flow_air_speed};

/// Radiation data and sun positions for every analysis hour.
#[derive(Debug, Clone)]
pub struct SolarSeries {
    pub direct_normal: Vec<f64>,
    pub diffuse_horizontal: Vec<f64>,
    pub global_horizontal: Vec<f64>,
    pub window_transmittance: Vec<f64>,
    pub positions: Vec<SolarPosition>,
}

/// Read-only state shared by every hour of a run.
pub struct RunContext {
    pub model: ViewFactorModel,
    pub standard: Arc<dyn ComfortStandard>,
    pub site: SiteContext,
    pub period: AnalysisPeriod,
    pub hoys: Vec<usize>,
    pub parallel: bool,

    /// `[zone][surface][hour]`, surfaces in mesh order.
    pub(crate) surface_temps: Vec<Vec<Vec<f64>>>,
    /// `[indoor zone][hour]`.
    pub(crate) air_temps: Vec<Vec<f64>>,
    /// `[zone][hour]`, present when the standard needs humidity.
    pub(crate) humidity: Option<Vec<Vec<f64>>>,
    pub(crate) prevailing: Option<Vec<f64>>,
    pub(crate) dry_bulb: Option<Vec<f64>>,
    pub(crate) horizontal_infrared: Option<Vec<f64>>,
    pub(crate) well_mixed: Option<Vec<f64>>,
    /// `[zone]`; `None` leaves the standard's constant air speed.
    pub(crate) air_speed: Vec<Option<ZoneAirSpeed>>,
    pub(crate) solar: Option<SolarSeries>,
    pub(crate) occlusion: Arc<dyn SunOcclusion>,
}

impl fmt::Debug for RunContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunContext")
            .field("standard", &self.standard.kind())
            .field("period", &self.period)
            .field("hours", &self.hoys.len())
            .field("points", &self.model.point_count())
            .field("solar", &self.solar.is_some())
            .field("air_speed", &self.air_speed.iter().any(Option::is_some))
            .field("parallel", &self.parallel)
            .finish()
    }
}

/// Validated inputs, before name matching.
struct Checked {
    surfaces: ValidatedSeries,
    outdoor_surfaces: Option<ValidatedSeries>,
    air: ValidatedSeries,
    humidity: Option<ValidatedSeries>,
    dry_bulb: Option<ValidatedSeries>,
    direct: Option<ValidatedSeries>,
    diffuse: Option<ValidatedSeries>,
    global: Option<ValidatedSeries>,
    infrared: Option<ValidatedSeries>,
    transmittance: Option<ValidatedSeries>,
    well_mixed: Option<ValidatedSeries>,
    air_speed: Option<ValidatedSeries>,
    air_flow: Option<ValidatedSeries>,
    wind: Option<ValidatedSeries>,
    outdoor_humidity: Option<ValidatedSeries>,
}

fn check(
    input: &str,
    records: &[SeriesRecord],
    kind: DataKind,
    period: &AnalysisPeriod,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<ValidatedSeries> {
    let mut outcome = validate_series(input, records, &kind);
    if outcome.ok {
        outcome.check_period(input, period);
    }
    match outcome.into_result() {
        Ok(data) => Some(data),
        Err(diags) => {
            diagnostics.extend(diags);
            None
        }
    }
}

fn check_batch(
    input: &str,
    records: &[SeriesRecord],
    kind: DataKind,
    period: &AnalysisPeriod,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<ValidatedSeries> {
    if records.is_empty() {
        None
    } else {
        check(input, records, kind, period, diagnostics)
    }
}

fn check_optional(
    input: &str,
    record: Option<&SeriesRecord>,
    kind: DataKind,
    period: &AnalysisPeriod,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<ValidatedSeries> {
    record.and_then(|r| check(input, std::slice::from_ref(r), kind, period, diagnostics))
}

/// Validate every supplied input, collecting all diagnostics before failing.
fn check_inputs(inputs: &MapInputs, period: &AnalysisPeriod) -> MapResult<Checked> {
    let mut diags = Vec::new();

    let surfaces = check(
        "surface temperatures",
        &inputs.surface_temps,
        DataKind::SurfaceTempIn,
        period,
        &mut diags,
    );
    let outdoor_surfaces = check_batch(
        "outdoor surface temperatures",
        &inputs.outdoor_surface_temps,
        DataKind::SurfaceTempOut,
        period,
        &mut diags,
    );
    let air = check("air temperatures", &inputs.air_temps, DataKind::AirTemp, period, &mut diags);
    let humidity = check_batch(
        "relative humidity",
        &inputs.relative_humidity,
        DataKind::RelativeHumidity,
        period,
        &mut diags,
    );
    let outdoor_humidity = check_optional(
        "outdoor relative humidity",
        inputs.outdoor_relative_humidity.as_ref(),
        DataKind::RelativeHumidity,
        period,
        &mut diags,
    );

    let dry_bulb = check_optional(
        "dry bulb temperature",
        inputs.dry_bulb.as_ref(),
        DataKind::DryBulb,
        period,
        &mut diags,
    );
    let direct = check_optional(
        "direct normal radiation",
        inputs.direct_normal.as_ref(),
        DataKind::SolarDirect,
        period,
        &mut diags,
    );
    let diffuse = check_optional(
        "diffuse horizontal radiation",
        inputs.diffuse_horizontal.as_ref(),
        DataKind::SolarDiffuse,
        period,
        &mut diags,
    );
    let global = check_optional(
        "global horizontal radiation",
        inputs.global_horizontal.as_ref(),
        DataKind::SolarGlobal,
        period,
        &mut diags,
    );
    let infrared = check_optional(
        "horizontal infrared radiation",
        inputs.horizontal_infrared.as_ref(),
        DataKind::Other("Horizontal Infrared".to_string()),
        period,
        &mut diags,
    );
    let transmittance = check_optional(
        "window transmittance",
        inputs.window_transmittance.as_ref(),
        DataKind::WindowTransmittance,
        period,
        &mut diags,
    );
    let well_mixed = check_optional(
        "well-mixed override",
        inputs.well_mixed.as_ref(),
        DataKind::Other("Mixed".to_string()),
        period,
        &mut diags,
    );
    let air_speed = check_batch(
        "air speed",
        &inputs.air_speed,
        DataKind::WindSpeed,
        period,
        &mut diags,
    );
    let air_flow = check_batch(
        "air flow volume",
        &inputs.air_flow_volume,
        DataKind::AirFlowVolume,
        period,
        &mut diags,
    );
    let wind = check_optional(
        "wind speed",
        inputs.wind_speed.as_ref(),
        DataKind::WindSpeed,
        period,
        &mut diags,
    );

    match (surfaces, air) {
        (Some(surfaces), Some(air)) if diags.is_empty() => Ok(Checked {
            surfaces,
            outdoor_surfaces,
            air,
            humidity,
            dry_bulb,
            direct,
            diffuse,
            global,
            infrared,
            transmittance,
            well_mixed,
            air_speed,
            air_flow,
            wind,
            outdoor_humidity,
        }),
        _ => Err(MapError::Validation { diagnostics: diags }),
    }
}

/// Re-index samples recorded over `index` onto the analysis hours.
fn align(values: &[f64], index: &PeriodIndex, hoys: &[usize], what: &str) -> MapResult<Vec<f64>> {
    hoys.iter()
        .map(|&hoy| {
            index
                .position(hoy)
                .and_then(|pos| values.get(pos))
                .copied()
                .ok_or_else(|| MapError::InvalidInput {
                    what: format!("{what} has no sample for hour {hoy}"),
                })
        })
        .collect()
}

fn align_single(
    data: Option<&ValidatedSeries>,
    hoys: &[usize],
    what: &str,
) -> MapResult<Option<Vec<f64>>> {
    let Some(data) = data else {
        return Ok(None);
    };
    let Some(series) = data.series.first() else {
        return Ok(None);
    };
    align(&series.values, &data.index()?, hoys, what).map(Some)
}

/// Named, aligned columns of a batch. Pieces of one surface are merged.
fn named_columns(
    data: &ValidatedSeries,
    known: &HashSet<&str>,
    policy: MergePolicy,
    hoys: &[usize],
) -> MapResult<HashMap<String, Vec<f64>>> {
    let index = data.index()?;
    merge_pieces(&data.series, |n| known.contains(n), policy)?
        .into_iter()
        .map(|(name, values)| {
            let column = align(&values, &index, hoys, &name)?;
            Ok((name, column))
        })
        .collect()
}

/// Radiation columns and sun positions over the analysis hours.
fn solar_series(
    direct: &ValidatedSeries,
    diffuse: &ValidatedSeries,
    checked: &Checked,
    hoys: &[usize],
    site: &SiteContext,
) -> MapResult<SolarSeries> {
    let direct = align_single(Some(direct), hoys, "direct normal radiation")?.unwrap_or_default();
    let diffuse =
        align_single(Some(diffuse), hoys, "diffuse horizontal radiation")?.unwrap_or_default();
    let positions: Vec<SolarPosition> =
        hoys.iter().map(|&h| SolarPosition::for_hoy(site, h)).collect();
    let global = match align_single(checked.global.as_ref(), hoys, "global horizontal radiation")? {
        Some(g) => g,
        None => positions
            .iter()
            .zip(direct.iter().zip(&diffuse))
            .map(|(pos, (dir, dif))| dif + dir * pos.altitude.to_radians().sin().max(0.0))
            .collect(),
    };
    let window_transmittance =
        align_single(checked.transmittance.as_ref(), hoys, "window transmittance")?
            .unwrap_or_else(|| vec![1.0; hoys.len()]);
    Ok(SolarSeries {
        direct_normal: direct,
        diffuse_horizontal: diffuse,
        global_horizontal: global,
        window_transmittance,
        positions,
    })
}

/// Air speed source per zone.
///
/// A single air speed record not named after a zone is shared by every
/// indoor zone; otherwise records are matched by zone name. Zones without a
/// speed use their air flow over the zone volume. Once either input is given
/// every indoor zone must be covered.
/// The outdoor zone scales station wind to each point's height.
fn resolve_air_speed(
    model: &ViewFactorModel,
    checked: &Checked,
    hoys: &[usize],
    site: &SiteContext,
    missing: &mut Vec<String>,
) -> MapResult<Vec<Option<ZoneAirSpeed>>> {
    let zone_names: HashSet<&str> = model.zones().iter().map(|z| z.name.as_str()).collect();
    let shared = match &checked.air_speed {
        Some(data)
            if data.series.len() == 1
                && !zone_names.contains(data.series[0].name().as_str()) =>
        {
            align_single(Some(data), hoys, "air speed")?
        }
        _ => None,
    };
    let speed_cols = match &checked.air_speed {
        Some(data) if shared.is_none() => {
            named_columns(data, &zone_names, MergePolicy::Average, hoys)?
        }
        _ => HashMap::new(),
    };
    let flow_cols = match &checked.air_flow {
        Some(data) => named_columns(data, &zone_names, MergePolicy::Average, hoys)?,
        None => HashMap::new(),
    };
    let indoor_required = checked.air_speed.is_some() || checked.air_flow.is_some();
    let wind = align_single(checked.wind.as_ref(), hoys, "wind speed")?;
    let profile = site.terrain.profile();

    let mut sources = Vec::with_capacity(model.zone_count());
    for zone in model.zones() {
        if zone.outdoor {
            let Some(station) = &wind else {
                sources.push(None);
                continue;
            };
            let mut factors = Vec::with_capacity(zone.points.len());
            for (k, point) in zone.points.iter().enumerate() {
                match point.height() {
                    Some(h) => factors.push(profile.factor(h)),
                    None => {
                        missing.push(format!("position of point {k} of zone '{}'", zone.name));
                        factors.push(0.0);
                    }
                }
            }
            sources.push(Some(ZoneAirSpeed::Profile {
                station: station.clone(),
                factors,
            }));
            continue;
        }

        let speeds = if let Some(values) = &shared {
            Some(values.clone())
        } else if let Some(col) = speed_cols.get(&zone.name) {
            Some(col.clone())
        } else if let Some(flow) = flow_cols.get(&zone.name) {
            match zone.volume {
                Some(volume) => Some(flow.iter().map(|f| flow_air_speed(*f, volume)).collect()),
                None => {
                    missing.push(format!("volume of zone '{}' for its air flow", zone.name));
                    None
                }
            }
        } else {
            if indoor_required {
                missing.push(format!("air speed of zone '{}'", zone.name));
            }
            None
        };
        sources.push(speeds.map(ZoneAirSpeed::Hourly));
    }
    Ok(sources)
}

impl RunContext {
    /// Validate and resolve all inputs for `model`.
    pub fn build(
        model: ViewFactorModel,
        inputs: &MapInputs,
        params: &ComfortStandardParams,
        options: &MapOptions,
    ) -> MapResult<Self> {
        options.site.validate()?;
        let standard = params.build()?;
        let period = options.period;
        let hoys = period.hoys()?;
        if hoys.is_empty() {
            return Err(MapError::InvalidInput {
                what: format!("analysis period {period} has no hours"),
            });
        }

        let checked = check_inputs(inputs, &period)?;

        let mut model = model;
        if model.outdoor_zone().is_some() && checked.outdoor_surfaces.is_none() {
            info!("no outdoor surface temperatures supplied; outdoor zone dropped");
            model = model.without_outdoor();
        }
        let outdoor = model.outdoor_zone();

        let mut missing = Vec::new();

        // Surface temperatures, indoor and outdoor.
        let indoor_names: HashSet<&str> = model
            .zones()
            .iter()
            .filter(|z| !z.outdoor)
            .flat_map(|z| z.surfaces.iter().map(String::as_str))
            .collect();
        let indoor_cols =
            named_columns(&checked.surfaces, &indoor_names, options.merge_policy, &hoys)?;
        let outdoor_cols = match (&checked.outdoor_surfaces, outdoor) {
            (Some(data), Some(z)) => {
                let names: HashSet<&str> =
                    model.zones()[z].surfaces.iter().map(String::as_str).collect();
                named_columns(data, &names, options.merge_policy, &hoys)?
            }
            _ => HashMap::new(),
        };

        let mut surface_temps = Vec::with_capacity(model.zone_count());
        for zone in model.zones() {
            let cols = if zone.outdoor { &outdoor_cols } else { &indoor_cols };
            let mut temps = Vec::with_capacity(zone.surfaces.len());
            for surface in &zone.surfaces {
                match cols.get(surface) {
                    Some(col) => temps.push(col.clone()),
                    None => missing.push(format!("surface '{surface}' of zone '{}'", zone.name)),
                }
            }
            surface_temps.push(temps);
        }

        // Zone air temperatures.
        let zone_names: HashSet<&str> = model.zones().iter().map(|z| z.name.as_str()).collect();
        let air_cols = named_columns(&checked.air, &zone_names, MergePolicy::Average, &hoys)?;
        let mut air_temps = Vec::with_capacity(model.indoor_zone_count());
        for zone in model.zones().iter().filter(|z| !z.outdoor) {
            match air_cols.get(&zone.name) {
                Some(col) => air_temps.push(col.clone()),
                None => missing.push(format!("air temperature of zone '{}'", zone.name)),
            }
        }

        let humidity = if standard.needs_humidity() {
            let cols = match &checked.humidity {
                Some(data) => named_columns(data, &zone_names, MergePolicy::Average, &hoys)?,
                None => HashMap::new(),
            };
            // The outdoor zone falls back to the weather file humidity.
            let outdoor_rh = align_single(
                checked.outdoor_humidity.as_ref(),
                &hoys,
                "outdoor relative humidity",
            )?;
            let mut per_zone = Vec::with_capacity(model.zone_count());
            for zone in model.zones() {
                let fallback = if zone.outdoor { outdoor_rh.as_ref() } else { None };
                match cols.get(&zone.name).or(fallback) {
                    Some(col) => per_zone.push(col.clone()),
                    None => missing.push(format!("relative humidity of zone '{}'", zone.name)),
                }
            }
            Some(per_zone)
        } else {
            None
        };

        let dry_bulb = align_single(checked.dry_bulb.as_ref(), &hoys, "dry bulb temperature")?;
        if outdoor.is_some() && dry_bulb.is_none() {
            missing.push("outdoor dry bulb temperature".to_string());
        }

        let prevailing = match (standard.needs_prevailing(), &checked.dry_bulb) {
            (false, _) => None,
            (true, None) => {
                missing.push(
                    "dry bulb temperature for the prevailing outdoor temperature".to_string(),
                );
                None
            }
            (true, Some(data)) => {
                let values = data
                    .series
                    .first()
                    .map(|s| s.values.as_slice())
                    .unwrap_or_default();
                let basis = params.prevailing_basis().unwrap_or_default();
                let prevailing = prevailing_outdoor_temperature(values, basis)?;
                let cold = prevailing.cold_in(&hoys);
                if !cold.is_empty() {
                    warn!(
                        ?basis,
                        periods = cold.len(),
                        "prevailing outdoor temperature below 10 C; \
                         adaptive comfort is outside its range"
                    );
                }
                let aligned = hoys
                    .iter()
                    .map(|&h| {
                        prevailing.at(h).ok_or_else(|| MapError::InvalidInput {
                            what: format!("no prevailing outdoor temperature for hour {h}"),
                        })
                    })
                    .collect::<MapResult<Vec<_>>>()?;
                Some(aligned)
            }
        };

        let solar = match (&checked.direct, &checked.diffuse) {
            (Some(direct), Some(diffuse)) => Some(solar_series(
                direct,
                diffuse,
                &checked,
                &hoys,
                &options.site,
            )?),
            (None, None) => None,
            (Some(_), None) => {
                missing.push("diffuse horizontal radiation to pair with direct normal".to_string());
                None
            }
            (None, Some(_)) => {
                missing.push("direct normal radiation to pair with diffuse horizontal".to_string());
                None
            }
        };

        let air_speed = resolve_air_speed(&model, &checked, &hoys, &options.site, &mut missing)?;

        if !missing.is_empty() {
            warn!(count = missing.len(), "unmatched mesh inputs");
            return Err(MapError::Match {
                what: missing.join(", "),
            });
        }

        let horizontal_infrared =
            align_single(checked.infrared.as_ref(), &hoys, "horizontal infrared radiation")?;
        let well_mixed = align_single(checked.well_mixed.as_ref(), &hoys, "well-mixed override")?;

        debug!(
            zones = model.zone_count(),
            points = model.point_count(),
            hours = hoys.len(),
            solar = solar.is_some(),
            air_speed_zones = air_speed.iter().filter(|s| s.is_some()).count(),
            "run context resolved"
        );

        Ok(Self {
            model,
            standard,
            site: options.site,
            period,
            hoys,
            parallel: options.parallel,
            surface_temps,
            air_temps,
            humidity,
            prevailing,
            dry_bulb,
            horizontal_infrared,
            well_mixed,
            air_speed,
            solar,
            occlusion: Arc::new(BlockedVectorOcclusion),
        })
    }

    /// Replace the sun-visibility test.
    pub fn with_occlusion(mut self, occlusion: Arc<dyn SunOcclusion>) -> Self {
        self.occlusion = occlusion;
        self
    }

    pub fn hour_count(&self) -> usize {
        self.hoys.len()
    }

    pub fn has_solar(&self) -> bool {
        self.solar.is_some()
    }

    /// Zone index of every point.
    pub fn point_zones(&self) -> Vec<usize> {
        (0..self.model.point_count())
            .map(|p| self.model.zone_of(p).unwrap_or(0))
            .collect()
    }
}
