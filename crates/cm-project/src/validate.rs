//! Project validation logic.

use cm_comfort::ComfortStandardParams;

use crate::schema::Project;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Missing field: {field}")]
    MissingField { field: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported feature: {feature} - {reason}")]
    Unsupported { feature: String, reason: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn check_range(field: &str, value: f64, lo: f64, hi: f64) -> Result<(), ValidationError> {
    if value.is_finite() && (lo..=hi).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, value, &format!("must be within [{lo}, {hi}]")))
    }
}

fn check_fraction(field: &str, value: f64) -> Result<(), ValidationError> {
    check_range(field, value, 0.0, 1.0)
}

/// Check the project and return the first violation found.
pub fn validate_project(project: &Project) -> Result<(), ValidationError> {
    if project.version > crate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: project.version,
        });
    }
    if project.name.trim().is_empty() {
        return Err(ValidationError::MissingField {
            field: "name".to_string(),
        });
    }
    if project.inputs.as_os_str().is_empty() {
        return Err(ValidationError::MissingField {
            field: "inputs".to_string(),
        });
    }

    let site = &project.site;
    check_range("site.latitude", site.latitude, -90.0, 90.0)?;
    check_range("site.longitude", site.longitude, -180.0, 180.0)?;
    check_range("site.time_zone", site.time_zone, -12.0, 14.0)?;
    check_fraction("site.clothing_absorptivity", site.clothing_absorptivity)?;
    check_fraction("site.floor_reflectivity", site.floor_reflectivity)?;

    let period = project.analysis_period;
    match period.hoys() {
        Ok(hoys) if !hoys.is_empty() => {}
        Ok(_) => return Err(invalid("analysis_period", period, "covers no hours")),
        Err(e) => return Err(invalid("analysis_period", period, &e.to_string())),
    }

    check_fraction(
        "aggregation.occupancy_threshold",
        project.aggregation.occupancy_threshold,
    )?;

    validate_standard(&project.standard)
}

fn validate_standard(params: &ComfortStandardParams) -> Result<(), ValidationError> {
    match params {
        ComfortStandardParams::Adaptive {
            percentile,
            conditioning,
            air_speed,
            ..
        } => {
            if !matches!(percentile, 80 | 90) {
                return Err(ValidationError::Unsupported {
                    feature: format!("adaptive percentile {percentile}"),
                    reason: "only 80 and 90 are defined".to_string(),
                });
            }
            check_fraction("standard.conditioning", *conditioning)?;
            check_range("standard.air_speed", *air_speed, 0.0, 10.0)
        }
        ComfortStandardParams::Pmv {
            clothing,
            metabolic_rate,
            air_speed,
            ppd_threshold,
        } => {
            check_range("standard.clothing", *clothing, 0.0, 4.0)?;
            check_range("standard.metabolic_rate", *metabolic_rate, 0.5, 6.0)?;
            check_range("standard.air_speed", *air_speed, 0.0, 10.0)?;
            check_range("standard.ppd_threshold", *ppd_threshold, 5.0, 100.0)
        }
        ComfortStandardParams::Outdoor { wind_speed } => {
            check_range("standard.wind_speed", *wind_speed, 0.0, 40.0)
        }
    }
}
