use cm_comfort::ComfortStandardParams;
use cm_project::{Project, ValidationError, validate_project};
use proptest::prelude::*;

fn adaptive(percentile: u8, conditioning: f64, air_speed: f64) -> ComfortStandardParams {
    ComfortStandardParams::Adaptive {
        method: Default::default(),
        percentile,
        prevailing_basis: Default::default(),
        conditioning,
        air_speed,
    }
}

#[test]
fn unsupported_percentile() {
    let mut project = Project::new("P", "bundle.json");
    project.standard = adaptive(85, 0.0, 0.1);
    assert!(matches!(
        validate_project(&project),
        Err(ValidationError::Unsupported { .. })
    ));
}

#[test]
fn missing_name() {
    let project = Project::new("  ", "bundle.json");
    assert_eq!(
        validate_project(&project),
        Err(ValidationError::MissingField {
            field: "name".to_string()
        })
    );
}

proptest! {
    #[test]
    fn fractions_inside_unit_interval_pass(c in 0.0f64..=1.0, t in 0.0f64..=1.0) {
        let mut project = Project::new("P", "bundle.json");
        project.standard = adaptive(90, c, 0.2);
        project.aggregation.occupancy_threshold = t;
        prop_assert!(validate_project(&project).is_ok());
    }

    #[test]
    fn fractions_above_one_fail(c in 1.0001f64..100.0) {
        let mut project = Project::new("P", "bundle.json");
        project.standard = adaptive(80, c, 0.2);
        prop_assert!(validate_project(&project).is_err());
    }

    #[test]
    fn negative_air_speed_fails(v in -5.0f64..-1e-6) {
        let mut project = Project::new("P", "bundle.json");
        project.standard = adaptive(80, 0.0, v);
        prop_assert!(validate_project(&project).is_err());
    }

    #[test]
    fn valid_air_speed_builds_the_standard(v in 0.0f64..=10.0) {
        let mut project = Project::new("P", "bundle.json");
        project.standard = adaptive(80, 0.0, v);
        prop_assert!(validate_project(&project).is_ok());
        prop_assert!(project.standard.build().is_ok());
    }
}
