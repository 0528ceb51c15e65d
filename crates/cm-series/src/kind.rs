//! Closed set of data kinds, resolved once from header labels.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What a series measures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataKind {
    AirTemp,
    SurfaceTempIn,
    SurfaceTempOut,
    RelativeHumidity,
    AirFlowVolume,
    /// Air or wind speed, m/s.
    WindSpeed,
    ThermalEnergy,
    WindowTransmittance,
    SolarDirect,
    SolarDiffuse,
    SolarGlobal,
    DryBulb,
    Occupancy,
    Other(String),
}

/// Label fragments in match order. More specific fragments come first.
const PATTERNS: &[(&str, DataKind)] = &[
    ("inner surface temperature", DataKind::SurfaceTempIn),
    ("outer surface temperature", DataKind::SurfaceTempOut),
    ("relative humidity", DataKind::RelativeHumidity),
    ("air flow volume", DataKind::AirFlowVolume),
    ("wind speed", DataKind::WindSpeed),
    ("air speed", DataKind::WindSpeed),
    ("transmittance", DataKind::WindowTransmittance),
    ("direct normal radiation", DataKind::SolarDirect),
    ("diffuse horizontal radiation", DataKind::SolarDiffuse),
    ("global horizontal radiation", DataKind::SolarGlobal),
    ("dry bulb temperature", DataKind::DryBulb),
    ("air temperature", DataKind::AirTemp),
    ("thermal energy", DataKind::ThermalEnergy),
    ("heating energy", DataKind::ThermalEnergy),
    ("cooling energy", DataKind::ThermalEnergy),
    ("occupancy", DataKind::Occupancy),
    ("people", DataKind::Occupancy),
];

impl DataKind {
    /// Resolve a header data-type label.
    pub fn from_data_type(label: &str) -> Self {
        let lower = label.to_ascii_lowercase();
        PATTERNS
            .iter()
            .find(|(fragment, _)| lower.contains(fragment))
            .map(|(_, kind)| kind.clone())
            .unwrap_or_else(|| DataKind::Other(label.trim().to_string()))
    }

    /// Units a series of this kind must carry.
    pub fn expected_units(&self) -> Option<&'static str> {
        match self {
            DataKind::AirTemp
            | DataKind::SurfaceTempIn
            | DataKind::SurfaceTempOut
            | DataKind::DryBulb => Some("C"),
            DataKind::RelativeHumidity => Some("%"),
            DataKind::WindowTransmittance | DataKind::Occupancy => Some("Fraction"),
            DataKind::ThermalEnergy => Some("kWh"),
            DataKind::AirFlowVolume => Some("m3/s"),
            DataKind::WindSpeed => Some("m/s"),
            DataKind::SolarDirect | DataKind::SolarDiffuse | DataKind::SolarGlobal => {
                Some("Wh/m2")
            }
            DataKind::Other(_) => None,
        }
    }

    /// Human readable label used in diagnostics.
    pub fn label(&self) -> &str {
        match self {
            DataKind::AirTemp => "Air Temperature",
            DataKind::SurfaceTempIn => "Inner Surface Temperature",
            DataKind::SurfaceTempOut => "Outer Surface Temperature",
            DataKind::RelativeHumidity => "Relative Humidity",
            DataKind::AirFlowVolume => "Air Flow Volume",
            DataKind::WindSpeed => "Wind Speed",
            DataKind::ThermalEnergy => "Thermal Energy",
            DataKind::WindowTransmittance => "Window Transmittance",
            DataKind::SolarDirect => "Direct Normal Radiation",
            DataKind::SolarDiffuse => "Diffuse Horizontal Radiation",
            DataKind::SolarGlobal => "Global Horizontal Radiation",
            DataKind::DryBulb => "Dry Bulb Temperature",
            DataKind::Occupancy => "Occupancy",
            DataKind::Other(s) => s.as_str(),
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Unit strings compare without degree signs, spaces or case.
pub fn units_match(expected: &str, actual: &str) -> bool {
    fn norm(s: &str) -> String {
        s.chars()
            .filter(|c| *c != '°' && !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect()
    }
    norm(expected) == norm(actual)
}
