use std::path::PathBuf;

use cm_comfort::ComfortStandardParams;
use cm_geometry::{TestPoint, ZoneMesh};
use cm_map::MapInputs;
use cm_project::*;
use cm_series::{AnalysisPeriod, DateTuple, SeriesRecord};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("cm_project_{}_{name}", std::process::id()))
}

fn summer_pmv_project() -> Project {
    let mut project = Project::new("Summer Office", "bundle.json");
    project.standard = ComfortStandardParams::Pmv {
        clothing: 0.5,
        metabolic_rate: 1.2,
        air_speed: 0.1,
        ppd_threshold: 15.0,
    };
    project.analysis_period = AnalysisPeriod::new(
        DateTuple::new(6, 1, 9).unwrap(),
        DateTuple::new(8, 31, 17).unwrap(),
    );
    project.aggregation.occupancy_threshold = 0.1;
    project.aggregation.output_dir = Some(PathBuf::from("results"));
    project.parallel = false;
    project
}

#[test]
fn roundtrip_yaml_project() {
    let project = summer_pmv_project();
    let path = temp_path("summer.yaml");

    save_yaml(&path, &project).unwrap();
    let loaded = load_project(&path).unwrap();

    assert_eq!(project, loaded);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn roundtrip_json_project() {
    let project = Project::new("Default", "inputs/bundle.json");
    let path = temp_path("default.json");

    save_json(&path, &project).unwrap();
    let loaded = load_project(&path).unwrap();

    assert_eq!(project, loaded);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn invalid_project_is_not_saved() {
    let mut project = Project::new("Bad", "bundle.json");
    project.site.clothing_absorptivity = 1.4;
    let path = temp_path("bad.yaml");

    let err = save_yaml(&path, &project).unwrap_err();
    assert!(matches!(err, ProjectError::Validation(_)));
    assert!(!path.exists());
}

#[test]
fn roundtrip_bundle() {
    let zone = ZoneMesh::indoor("Office", vec!["Wall".to_string(), "Floor".to_string()])
        .with_point(TestPoint::new(vec![0.6, 0.4], 0.0));
    let mut series = MapInputs::default();
    series.air_temps = vec![SeriesRecord::from_samples(&vec![21.5; 8760])];
    let mut bundle = InputBundle::new(vec![zone], series);
    bundle.occupancy = vec![SeriesRecord::from_samples(&vec![1.0; 8760])];
    let path = temp_path("bundle.json");

    save_bundle(&path, &bundle).unwrap();
    let loaded = load_bundle(&path).unwrap();

    assert_eq!(bundle, loaded);
    assert_eq!(loaded.model().unwrap().point_count(), 1);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn bundle_series_sit_at_top_level() {
    let json = r#"{
        "zones": [],
        "surface_temps": [],
        "dry_bulb": [20.0, 21.0],
        "occupancy": []
    }"#;
    let bundle: InputBundle = serde_json::from_str(json).unwrap();
    assert_eq!(bundle.series.dry_bulb.map(|r| r.len()), Some(2));
    assert!(bundle.conditioning.is_empty());
}
