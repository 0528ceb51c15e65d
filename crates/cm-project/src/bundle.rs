//! Input bundles: zone meshes plus every hourly series a run consumes.

use std::collections::HashMap;
use std::path::Path;

use cm_geometry::{ViewFactorModel, ZoneMesh};
use cm_map::MapInputs;
use cm_series::{
    AnalysisPeriod, DataKind, HourlySeries, SeriesRecord, SeriesResult, validate_series,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{ProjectError, ProjectResult};

/// JSON document produced by the simulation and view-factor engines.
///
/// Map series sit at the top level next to `zones`. Occupancy and
/// conditioning energy are named per zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputBundle {
    pub zones: Vec<ZoneMesh>,
    #[serde(flatten)]
    pub series: MapInputs,
    #[serde(default)]
    pub occupancy: Vec<SeriesRecord>,
    #[serde(default)]
    pub conditioning: Vec<SeriesRecord>,
}

impl InputBundle {
    pub fn new(zones: Vec<ZoneMesh>, series: MapInputs) -> Self {
        Self {
            zones,
            series,
            occupancy: Vec::new(),
            conditioning: Vec::new(),
        }
    }

    pub fn model(&self) -> ProjectResult<ViewFactorModel> {
        Ok(ViewFactorModel::new(self.zones.clone())?)
    }

    /// Occupancy and conditioning per zone of `model`, over `period`.
    ///
    /// Without any occupancy records every zone is always occupied. Once
    /// records are given, each indoor zone needs one. The outdoor zone is
    /// always occupied and never conditioned.
    pub fn schedules(
        &self,
        model: &ViewFactorModel,
        period: &AnalysisPeriod,
    ) -> ProjectResult<ZoneSchedules> {
        let names: Vec<String> = model.zones().iter().map(|z| z.name.clone()).collect();
        let hours = period.len()?;
        let outdoor = model.outdoor_zone();

        let occupancy =
            zone_series("occupancy", &self.occupancy, DataKind::Occupancy, &names, period)?;
        let mut conditioning = zone_series(
            "conditioning",
            &self.conditioning,
            DataKind::ThermalEnergy,
            &names,
            period,
        )?;

        if self.occupancy.is_empty() {
            info!("no occupancy schedules supplied; zones are taken as always occupied");
        }
        let mut missing = Vec::new();
        let occupancy = occupancy
            .into_iter()
            .enumerate()
            .map(|(z, series)| match series {
                Some(values) if Some(z) != outdoor => values,
                None if Some(z) != outdoor && !self.occupancy.is_empty() => {
                    missing.push(names[z].clone());
                    Vec::new()
                }
                _ => vec![1.0; hours],
            })
            .collect();
        if !missing.is_empty() {
            return Err(ProjectError::Missing {
                what: format!("occupancy for zone(s) {}", missing.join(", ")),
            });
        }
        if let Some(z) = outdoor {
            conditioning[z] = None;
        }

        Ok(ZoneSchedules {
            occupancy,
            conditioning,
        })
    }
}

/// Zone schedules aligned with the hours of an analysis period.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneSchedules {
    pub occupancy: Vec<Vec<f64>>,
    /// Heating or cooling energy; `None` for passive zones.
    pub conditioning: Vec<Option<Vec<f64>>>,
}

pub fn load_bundle(path: &Path) -> ProjectResult<InputBundle> {
    let content = std::fs::read_to_string(path)?;
    let bundle: InputBundle = serde_json::from_str(&content)?;
    debug!(
        path = %path.display(),
        zones = bundle.zones.len(),
        surfaces = bundle.series.surface_temps.len(),
        "loaded input bundle"
    );
    Ok(bundle)
}

pub fn save_bundle(path: &Path, bundle: &InputBundle) -> ProjectResult<()> {
    let content = serde_json::to_string(bundle)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Per-zone values of a zone-named series at every hour of `period`.
///
/// Zones with no matching series get `None`. A single headerless record is
/// shared by every zone. No records at all yields `None` everywhere.
pub fn zone_series(
    input: &str,
    records: &[SeriesRecord],
    kind: DataKind,
    zone_names: &[String],
    period: &AnalysisPeriod,
) -> ProjectResult<Vec<Option<Vec<f64>>>> {
    if records.is_empty() {
        return Ok(vec![None; zone_names.len()]);
    }

    let mut outcome = validate_series(input, records, &kind);
    if outcome.ok {
        outcome.check_period(input, period);
    }
    let data = outcome.into_result().map_err(|diagnostics| {
        for d in &diagnostics {
            warn!(input = %d.input, "{}", d.message);
        }
        ProjectError::InvalidSeries {
            input: input.to_string(),
            diagnostics,
        }
    })?;

    let index = data.index()?;
    let hoys = period.hoys()?;
    let shared = match data.series.as_slice() {
        [only] if only.header.is_none() => Some(only),
        _ => None,
    };
    let by_name: HashMap<String, &HourlySeries> =
        data.series.iter().map(|s| (s.name(), s)).collect();

    zone_names
        .iter()
        .map(|zone| {
            let series = shared.or_else(|| by_name.get(&zone.to_uppercase()).copied());
            series
                .map(|s| {
                    hoys.iter()
                        .map(|&hoy| s.at(&index, hoy))
                        .collect::<SeriesResult<Vec<f64>>>()
                })
                .transpose()
                .map_err(ProjectError::from)
        })
        .collect()
}
