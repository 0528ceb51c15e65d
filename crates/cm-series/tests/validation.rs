//! End-to-end checks over the public series API.

use cm_series::{
    AnalysisPeriod, DataKind, DateTuple, DiagnosticKind, MergePolicy, SeriesHeader, SeriesRecord,
    Timestep, merge_pieces, validate_series,
};
use proptest::prelude::*;

fn surface_record(name: &str, value: f64) -> SeriesRecord {
    let header = SeriesHeader {
        location: "Boston Logan Intl".into(),
        data_type: format!("Inner Surface Temperature for {name}: Surface"),
        units: "C".into(),
        timestep: Timestep::Hourly,
        start: DateTuple::new(1, 1, 1).unwrap(),
        end: DateTuple::new(12, 31, 24).unwrap(),
    };
    SeriesRecord::from_parts(&header, &vec![value; 8760])
}

#[test]
fn surface_batch_validates_and_merges() {
    let records = vec![
        surface_record("WALL-01_0", 20.0),
        surface_record("WALL-01_1", 22.0),
        surface_record("FLOOR", 19.0),
    ];
    let outcome = validate_series("surface temperatures", &records, &DataKind::SurfaceTempIn);
    assert!(outcome.ok, "{:?}", outcome.diagnostics);

    let data = outcome.into_result().unwrap();
    assert!(data.period.is_whole_year());
    let known = |n: &str| n == "WALL-01" || n == "FLOOR";
    let merged = merge_pieces(&data.series, known, MergePolicy::Average).unwrap();
    assert_eq!(merged.len(), 2);
    assert_eq!(merged[0].0, "WALL-01");
    assert!(merged[0].1.iter().all(|v| *v == 21.0));
}

#[test]
fn mixed_bundle_reports_every_category_once() {
    let mut records = vec![surface_record("A", 20.0), surface_record("B", 20.0)];
    // Headerless record mixed with headered ones.
    records.push(SeriesRecord::from_samples(&[1.0, 2.0]));
    let outcome = validate_series("surfaces", &records, &DataKind::SurfaceTempIn);
    assert!(!outcome.ok);
    assert_eq!(outcome.diagnostics.len(), 1);
    assert_eq!(outcome.diagnostics[0].kind, DiagnosticKind::MissingHeader);
    assert!(outcome.into_result().is_err());
}

#[test]
fn json_bundle_records_decode() {
    let json = r#"[
        ["key:location/dataType/units/frequency/startsAt/endsAt", "Site",
         "Air Temperature for ZONE1", "C", "Hourly", "(6, 21, 1)", "(6, 21, 3)", 24.0, 25.0, "26.5"]
    ]"#;
    let records: Vec<SeriesRecord> = serde_json::from_str(json).unwrap();
    let outcome = validate_series("air", &records, &DataKind::AirTemp);
    assert!(outcome.ok, "{:?}", outcome.diagnostics);
    assert_eq!(outcome.data.series[0].values, vec![24.0, 25.0, 26.5]);
    assert_eq!(outcome.data.series[0].name(), "ZONE1");
}

proptest! {
    #[test]
    fn period_length_is_days_times_hours(
        sm in 1u32..=12, sd in 1u32..=28, sh in 1u32..=24,
        em in 1u32..=12, ed in 1u32..=28, eh in 1u32..=24,
    ) {
        let start = DateTuple::new(sm, sd, sh).unwrap();
        let end = DateTuple::new(em, ed, eh).unwrap();
        let period = AnalysisPeriod::new(start, end);
        let hoys = period.hoys().unwrap();

        let (d0, d1) = (start.day_of_year().unwrap(), end.day_of_year().unwrap());
        let days = if d0 <= d1 { d1 - d0 + 1 } else { 365 - d0 + 1 + d1 };
        let hours = if sh <= eh { eh - sh + 1 } else { 24 - sh + 1 + eh };
        prop_assert_eq!(hoys.len(), (days * hours) as usize);
        prop_assert!(hoys.iter().all(|h| (1..=8760).contains(h)));
        prop_assert_eq!(hoys[0], start.hoy().unwrap());
    }
}
