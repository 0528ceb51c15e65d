//! Full runs through the service layer against files on disk.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use cm_app::*;
use cm_geometry::{TestPoint, ZoneMesh};
use cm_map::{CancelToken, MapError, MapInputs};
use cm_project::{InputBundle, Project, save_bundle, save_yaml};
use cm_results::{Metric, MetricValue, SummaryMode};
use cm_series::{AnalysisPeriod, DateTuple, SeriesHeader, SeriesRecord, Timestep};

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("cm_app_{}_{tag}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn record(data_type: &str, value: f64) -> SeriesRecord {
    let header = SeriesHeader {
        location: "Test Site".into(),
        data_type: data_type.into(),
        units: "C".into(),
        timestep: Timestep::Hourly,
        start: DateTuple::new(1, 1, 1).unwrap(),
        end: DateTuple::new(12, 31, 24).unwrap(),
    };
    SeriesRecord::from_parts(&header, &vec![value; 8760])
}

fn write_project(dir: &Path, air_zone: &str) -> PathBuf {
    let zone = ZoneMesh::indoor("Office", vec!["Wall-01".into()])
        .with_points([TestPoint::new(vec![1.0], 0.0), TestPoint::new(vec![1.0], 0.0)]);
    let series = MapInputs {
        surface_temps: vec![record("Inner Surface Temperature for WALL-01: Surface", 24.0)],
        air_temps: vec![record(&format!("Zone Mean Air Temperature for {air_zone}"), 24.0)],
        dry_bulb: Some(record("Dry Bulb Temperature", 20.0)),
        ..MapInputs::default()
    };
    save_bundle(&dir.join("bundle.json"), &InputBundle::new(vec![zone], series)).unwrap();

    let mut project = Project::new("Test Office", "bundle.json");
    project.analysis_period = AnalysisPeriod::new(
        DateTuple::new(1, 1, 1).unwrap(),
        DateTuple::new(1, 2, 24).unwrap(),
    );
    let path = dir.join("project.yaml");
    save_yaml(&path, &project).unwrap();
    path
}

fn request(path: &Path, mode: RunMode) -> RunRequest<'_> {
    RunRequest {
        project_path: path,
        mode,
        options: RunOptions::default(),
    }
}

#[test]
fn aggregate_run_writes_results_and_hits_cache() {
    let dir = unique_temp_dir("aggregate");
    let path = write_project(&dir, "OFFICE");

    let first = ensure_run(&request(&path, RunMode::Aggregate)).unwrap();
    assert!(!first.loaded_from_cache);
    assert_eq!(first.manifest.hours, 48);
    assert_eq!(first.manifest.points, 2);
    assert!(
        first
            .manifest
            .files
            .iter()
            .any(|f| f == "adaptive_occupied_thermal_comfort_percent.csv")
    );

    let occ_tcp = Metric::OccTcp.label("Adaptive");
    let summary = first.summaries.iter().find(|s| s.label == occ_tcp).unwrap();
    assert_eq!(summary.values, vec![MetricValue::Value(100.0); 2]);

    let second = ensure_run(&request(&path, RunMode::Aggregate)).unwrap();
    assert!(second.loaded_from_cache);
    assert_eq!(second.run_id, first.run_id);

    let runs = list_runs(&path).unwrap();
    assert_eq!(runs.len(), 1);
}

#[test]
fn summary_mode_override_is_a_separate_run() {
    let dir = unique_temp_dir("summary_mode");
    let path = write_project(&dir, "OFFICE");

    let percent = ensure_run(&request(&path, RunMode::Aggregate)).unwrap();
    let mut hours_request = request(&path, RunMode::Aggregate);
    hours_request.options.summary_mode = Some(SummaryMode::Hours);
    let hours = ensure_run(&hours_request).unwrap();

    assert!(!hours.loaded_from_cache);
    assert_ne!(hours.run_id, percent.run_id);
    let comfort = hours
        .summaries
        .iter()
        .find(|s| s.label == "Adaptive Thermal Comfort Hours")
        .unwrap();
    assert_eq!(comfort.values, vec![MetricValue::Value(48.0); 2]);

    let again = ensure_run(&hours_request).unwrap();
    assert!(again.loaded_from_cache);
    assert_eq!(again.run_id, hours.run_id);
    assert_eq!(list_runs(&path).unwrap().len(), 2);
}

#[test]
fn map_and_aggregate_runs_are_distinct() {
    let dir = unique_temp_dir("modes");
    let path = write_project(&dir, "OFFICE");

    let map = ensure_run(&request(&path, RunMode::Map)).unwrap();
    let aggregate = ensure_run(&request(&path, RunMode::Aggregate)).unwrap();
    assert_ne!(map.run_id, aggregate.run_id);
    assert!(map.manifest.files.len() < aggregate.manifest.files.len());

    let radiant = map.manifest.files.iter().find(|f| f.as_str() == "radiant_temperature.csv");
    let run_dir = dir.join(".comfortmap/runs").join(&map.run_id);
    let report = inspect_file(&run_dir.join(radiant.unwrap())).unwrap();
    assert_eq!(report.hours, Some(48));
    assert_eq!(report.summary.mean(), MetricValue::Value(24.0));
}

#[test]
fn progress_is_reported_in_stage_order() {
    let dir = unique_temp_dir("progress");
    let path = write_project(&dir, "OFFICE");
    let stages = Mutex::new(Vec::new());
    let sink = |e: RunProgressEvent| stages.lock().unwrap().push(e.stage);

    ensure_run_with_progress(&request(&path, RunMode::Map), Some(&sink), &CancelToken::new())
        .unwrap();

    let stages = stages.into_inner().unwrap();
    assert_eq!(stages.first(), Some(&RunStage::LoadingProject));
    assert_eq!(stages.last(), Some(&RunStage::Completed));
    assert_eq!(stages.iter().filter(|s| **s == RunStage::Mapping).count(), 49);
}

#[test]
fn cancelled_run_writes_nothing() {
    let dir = unique_temp_dir("cancel");
    let path = write_project(&dir, "OFFICE");
    let cancel = CancelToken::new();
    cancel.cancel();

    let err = ensure_run_with_progress(&request(&path, RunMode::Aggregate), None, &cancel)
        .unwrap_err();
    assert!(matches!(err, AppError::Map(MapError::Cancelled { .. })));
    let runs = list_runs(&path).unwrap();
    assert!(runs.is_empty());
}

#[test]
fn check_reports_unmatched_air_temperatures() {
    let dir = unique_temp_dir("check");
    let path = write_project(&dir, "LOBBY");

    let report = check_project(&path).unwrap();
    assert!(!report.is_ok());
    assert_eq!(report.points, 2);
    assert!(report.problems.iter().any(|p| p.contains("OFFICE")), "{:?}", report.problems);
}
