//! End-to-end runs of the mapping pipeline on small synthetic models.

use cm_comfort::ComfortStandardParams;
use cm_geometry::{TestPoint, ViewFactorModel, ZoneMesh};
use cm_map::*;
use cm_series::{AnalysisPeriod, DateTuple, SeriesHeader, SeriesRecord, Timestep};
use proptest::prelude::*;

fn record(data_type: &str, units: &str, values: &[f64]) -> SeriesRecord {
    let header = SeriesHeader {
        location: "Boston Logan Intl".into(),
        data_type: data_type.into(),
        units: units.into(),
        timestep: Timestep::Hourly,
        start: DateTuple::new(1, 1, 1).unwrap(),
        end: DateTuple::new(12, 31, 24).unwrap(),
    };
    SeriesRecord::from_parts(&header, values)
}

fn year(v: f64) -> Vec<f64> {
    vec![v; 8760]
}

fn surface(name: &str, v: f64) -> SeriesRecord {
    record(&format!("Inner Surface Temperature for {name}: Surface"), "C", &year(v))
}

fn air(zone: &str, v: f64) -> SeriesRecord {
    record(&format!("Zone Mean Air Temperature for {zone}"), "C", &year(v))
}

fn dry_bulb(v: f64) -> SeriesRecord {
    record("Dry Bulb Temperature", "C", &year(v))
}

fn one_point_office(has_windows: bool) -> ViewFactorModel {
    let zone = ZoneMesh::indoor("OFFICE", vec!["WALL-01".into()])
        .with_windows(has_windows)
        .with_point(TestPoint::new(vec![0.8], 0.2).with_blocked(vec![1.0; 145]));
    ViewFactorModel::new(vec![zone]).unwrap()
}

fn june_21() -> AnalysisPeriod {
    AnalysisPeriod::new(DateTuple::new(6, 21, 1).unwrap(), DateTuple::new(6, 21, 24).unwrap())
}

fn boston() -> SiteContext {
    SiteContext::new(42.37, -71.02, -5.0)
}

#[test]
fn constant_surfaces_give_constant_radiant_temperature() {
    let zone = ZoneMesh::indoor("OFFICE", vec!["WALL-01".into()])
        .with_point(TestPoint::new(vec![1.0], 0.0));
    let model = ViewFactorModel::new(vec![zone]).unwrap();
    let inputs = MapInputs {
        surface_temps: vec![surface("WALL-01", 22.0)],
        air_temps: vec![air("OFFICE", 22.0)],
        dry_bulb: Some(dry_bulb(20.0)),
        ..MapInputs::default()
    };
    let options = MapOptions {
        parallel: false,
        ..MapOptions::default()
    };
    let params = ComfortStandardParams::default();
    let ctx = RunContext::build(model, &inputs, &params, &options).unwrap();
    assert!(!ctx.has_solar());

    let out = run_map(&ctx, &CancelToken::new(), None).unwrap();
    assert_eq!(out.hours.len(), 8760);
    assert!(out.hours.iter().all(|h| h.mrt == vec![22.0]));
    assert!(out.hours.iter().all(|h| h.operative == vec![22.0]));
}

#[test]
fn missing_surface_series_is_a_match_error() {
    let model = one_point_office(false);
    let inputs = MapInputs {
        surface_temps: vec![surface("WALL-02", 22.0)],
        air_temps: vec![air("OFFICE", 22.0)],
        dry_bulb: Some(dry_bulb(20.0)),
        ..MapInputs::default()
    };
    let params = ComfortStandardParams::default();
    let err = RunContext::build(model, &inputs, &params, &MapOptions::default()).unwrap_err();
    match err {
        MapError::Match { what } => assert!(what.contains("WALL-01"), "{what}"),
        other => panic!("expected a match error, got {other:?}"),
    }
}

#[test]
fn validation_reports_every_input() {
    let model = one_point_office(false);
    let inputs = MapInputs {
        surface_temps: vec![surface("WALL-01", 22.0), SeriesRecord::from_samples(&[1.0, 2.0])],
        air_temps: vec![record("Zone Mean Air Temperature for OFFICE", "F", &year(70.0))],
        dry_bulb: Some(dry_bulb(20.0)),
        ..MapInputs::default()
    };
    let params = ComfortStandardParams::default();
    let err = RunContext::build(model, &inputs, &params, &MapOptions::default()).unwrap_err();
    let MapError::Validation { diagnostics } = err else {
        panic!("expected validation failure");
    };
    assert!(diagnostics.iter().any(|d| d.input == "surface temperatures"));
    assert!(diagnostics.iter().any(|d| d.input == "air temperatures"));
}

#[test]
fn adaptive_without_dry_bulb_is_a_match_error() {
    let inputs = MapInputs {
        surface_temps: vec![surface("WALL-01", 22.0)],
        air_temps: vec![air("OFFICE", 22.0)],
        ..MapInputs::default()
    };
    let err = RunContext::build(
        one_point_office(false),
        &inputs,
        &ComfortStandardParams::default(),
        &MapOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, MapError::Match { .. }));
}

fn solar_inputs() -> MapInputs {
    MapInputs {
        surface_temps: vec![surface("WALL-01", 22.0)],
        air_temps: vec![air("OFFICE", 23.0)],
        dry_bulb: Some(dry_bulb(24.0)),
        direct_normal: Some(record("Direct Normal Radiation", "Wh/m2", &year(600.0))),
        diffuse_horizontal: Some(record("Diffuse Horizontal Radiation", "Wh/m2", &year(120.0))),
        ..MapInputs::default()
    }
}

#[test]
fn no_solar_correction_at_night() {
    let options = MapOptions {
        period: june_21(),
        site: boston(),
        parallel: false,
        ..MapOptions::default()
    };
    let params = ComfortStandardParams::default();
    let with_sun =
        RunContext::build(one_point_office(true), &solar_inputs(), &params, &options).unwrap();
    let mut dark_inputs = solar_inputs();
    dark_inputs.direct_normal = None;
    dark_inputs.diffuse_horizontal = None;
    let without_sun =
        RunContext::build(one_point_office(true), &dark_inputs, &params, &options).unwrap();

    let sunny = run_map(&with_sun, &CancelToken::new(), None).unwrap();
    let dark = run_map(&without_sun, &CancelToken::new(), None).unwrap();

    let mut day_hours = 0;
    for (a, b) in sunny.hours.iter().zip(&dark.hours) {
        let pos = SolarPosition::for_hoy(&boston(), a.hoy);
        if pos.is_above_horizon() {
            day_hours += 1;
            assert!(a.mrt[0] > b.mrt[0], "hour {}", a.hoy);
        } else {
            assert_eq!(a.mrt[0], b.mrt[0], "hour {}", a.hoy);
            assert_eq!(a.mrt[0], 0.8 * 22.0);
        }
    }
    assert!(day_hours > 10);
}

#[test]
fn zone_without_windows_skips_solar() {
    let options = MapOptions {
        period: june_21(),
        site: boston(),
        ..MapOptions::default()
    };
    let ctx = RunContext::build(
        one_point_office(false),
        &solar_inputs(),
        &ComfortStandardParams::default(),
        &options,
    )
    .unwrap();
    let out = run_map(&ctx, &CancelToken::new(), None).unwrap();
    assert!(out.hours.iter().all(|h| h.mrt[0] == 0.8 * 22.0));
}

struct FullShade;

impl SunOcclusion for FullShade {
    fn transmittance(&self, _: &ViewFactorModel, _: usize, _: &nalgebra::Vector3<f64>) -> f64 {
        0.0
    }
}

#[test]
fn custom_occlusion_removes_direct_sun() {
    let options = MapOptions {
        period: june_21(),
        site: boston(),
        parallel: false,
        ..MapOptions::default()
    };
    let params = ComfortStandardParams::default();
    let open =
        RunContext::build(one_point_office(true), &solar_inputs(), &params, &options).unwrap();
    let shaded = RunContext::build(one_point_office(true), &solar_inputs(), &params, &options)
        .unwrap()
        .with_occlusion(std::sync::Arc::new(FullShade));

    let open = run_map(&open, &CancelToken::new(), None).unwrap();
    let shaded = run_map(&shaded, &CancelToken::new(), None).unwrap();

    let mut brighter = 0;
    for (a, b) in open.hours.iter().zip(&shaded.hours) {
        assert!(a.mrt[0] >= b.mrt[0], "hour {}", a.hoy);
        assert!(b.mrt[0] >= 0.8 * 22.0, "hour {}", a.hoy);
        if a.mrt[0] > b.mrt[0] {
            brighter += 1;
        }
    }
    assert!(brighter > 0);
}

fn two_zone_model() -> ViewFactorModel {
    let blocked = vec![1.0; 145];
    let east = ZoneMesh::indoor("EAST", vec!["E-WALL".into(), "E-FLOOR".into()])
        .with_windows(true)
        .with_points([
            TestPoint::new(vec![0.5, 0.4], 0.1).with_blocked(blocked.clone()),
            TestPoint::new(vec![0.3, 0.6], 0.1)
                .with_blocked(vec![0.0; 145])
                .with_zone_weights(vec![0.5, 0.5])
                .with_height_weight(0.4),
        ]);
    let west = ZoneMesh::indoor("WEST", vec!["W-WALL".into()])
        .with_point(TestPoint::new(vec![1.0], 0.0).with_height_weight(-0.2));
    ViewFactorModel::new(vec![east, west]).unwrap()
}

fn two_zone_inputs() -> MapInputs {
    let ramp: Vec<f64> = (0..8760).map(|h| 18.0 + (h % 24) as f64 * 0.5).collect();
    MapInputs {
        surface_temps: vec![
            record("Inner Surface Temperature for E-WALL: Surface", "C", &ramp),
            surface("E-FLOOR", 21.0),
            surface("W-WALL_0", 20.0),
            surface("W-WALL_1", 24.0),
        ],
        air_temps: vec![air("EAST", 23.0), air("WEST", 21.0)],
        dry_bulb: Some(dry_bulb(22.0)),
        direct_normal: Some(record("Direct Normal Radiation", "Wh/m2", &year(500.0))),
        diffuse_horizontal: Some(record("Diffuse Horizontal Radiation", "Wh/m2", &year(100.0))),
        ..MapInputs::default()
    }
}

#[test]
fn parallel_and_sequential_runs_agree() {
    let params = ComfortStandardParams::default();
    let mut options = MapOptions {
        period: june_21(),
        site: boston(),
        parallel: true,
        ..MapOptions::default()
    };
    let par = RunContext::build(two_zone_model(), &two_zone_inputs(), &params, &options).unwrap();
    options.parallel = false;
    let seq = RunContext::build(two_zone_model(), &two_zone_inputs(), &params, &options).unwrap();

    let a = run_map(&par, &CancelToken::new(), None).unwrap();
    let b = run_map(&seq, &CancelToken::new(), None).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.matrices(), b.matrices());
}

#[test]
fn air_blends_zones_and_merges_pieces() {
    let options = MapOptions {
        period: june_21(),
        site: boston(),
        ..MapOptions::default()
    };
    let ctx = RunContext::build(
        two_zone_model(),
        &two_zone_inputs(),
        &ComfortStandardParams::default(),
        &options,
    )
    .unwrap();
    let out = run_map(&ctx, &CancelToken::new(), None).unwrap();
    let night = &out.hours[0];
    assert_eq!(night.air_temp[0], 23.0);
    assert!((night.air_temp[1] - (22.0 + 0.4)).abs() < 1e-12);
    assert!((night.air_temp[2] - 20.8).abs() < 1e-12);
    // WEST's wall pieces average to 22.
    assert_eq!(night.mrt[2], 22.0);
}

#[test]
fn matrices_carry_labels_and_period() {
    let options = MapOptions {
        period: june_21(),
        site: boston(),
        ..MapOptions::default()
    };
    let ctx = RunContext::build(
        two_zone_model(),
        &two_zone_inputs(),
        &ComfortStandardParams::default(),
        &options,
    )
    .unwrap();
    let out = run_map(&ctx, &CancelToken::new(), None).unwrap();
    let labels: Vec<String> = out.matrices().into_iter().map(|m| m.label).collect();
    assert_eq!(
        labels,
        vec![
            "Radiant Temperature",
            "Air Temperature",
            "Operative Temperature",
            "Adaptive Thermal Comfort Percent",
            "Degrees From Target",
        ]
    );
    let comfort = out.comfort_matrix();
    assert_eq!(comfort.header(), "Adaptive Thermal Comfort Percent;(6, 21, 1);(6, 21, 24)");
    assert_eq!(comfort.hour_count(), 24);
    assert_eq!(comfort.point_count(), 3);
    assert!(comfort.rows.iter().flatten().all(|v| *v == 0.0 || *v == 1.0));
}

#[test]
fn cancelled_run_returns_no_output() {
    let ctx = RunContext::build(
        two_zone_model(),
        &two_zone_inputs(),
        &ComfortStandardParams::default(),
        &MapOptions {
            period: june_21(),
            ..MapOptions::default()
        },
    )
    .unwrap();
    let cancel = CancelToken::new();
    cancel.cancel();
    assert!(matches!(run_map(&ctx, &cancel, None), Err(MapError::Cancelled { .. })));
}

#[test]
fn progress_reaches_total() {
    use std::sync::atomic::{AtomicUsize, Ordering};

    let ctx = RunContext::build(
        two_zone_model(),
        &two_zone_inputs(),
        &ComfortStandardParams::default(),
        &MapOptions {
            period: june_21(),
            ..MapOptions::default()
        },
    )
    .unwrap();
    let seen = AtomicUsize::new(0);
    let cb = |p: MapProgress| {
        assert_eq!(p.total, 24);
        seen.fetch_max(p.completed, Ordering::Relaxed);
    };
    run_map(&ctx, &CancelToken::new(), Some(&cb)).unwrap();
    assert_eq!(seen.load(Ordering::Relaxed), 24);
}

fn with_outdoor_zone() -> ViewFactorModel {
    let office = ZoneMesh::indoor("OFFICE", vec!["WALL-01".into()])
        .with_point(TestPoint::new(vec![1.0], 0.0));
    let outdoor = ZoneMesh::outdoor("OUTDOOR", vec!["GROUND".into()])
        .with_point(TestPoint::new(vec![0.5], 0.5).with_non_surface_view(0.5));
    ViewFactorModel::new(vec![office, outdoor]).unwrap()
}

#[test]
fn outdoor_zone_dropped_without_outdoor_surfaces() {
    let inputs = MapInputs {
        surface_temps: vec![surface("WALL-01", 22.0)],
        air_temps: vec![air("OFFICE", 22.0)],
        dry_bulb: Some(dry_bulb(20.0)),
        ..MapInputs::default()
    };
    let ctx = RunContext::build(
        with_outdoor_zone(),
        &inputs,
        &ComfortStandardParams::default(),
        &MapOptions {
            period: june_21(),
            ..MapOptions::default()
        },
    )
    .unwrap();
    assert_eq!(ctx.model.zone_count(), 1);
    assert_eq!(ctx.model.point_count(), 1);
}

#[test]
fn outdoor_points_use_dry_bulb() {
    let inputs = MapInputs {
        surface_temps: vec![surface("WALL-01", 22.0)],
        outdoor_surface_temps: vec![record(
            "Outer Surface Temperature for GROUND: Surface",
            "C",
            &year(30.0),
        )],
        air_temps: vec![air("OFFICE", 22.0)],
        dry_bulb: Some(dry_bulb(20.0)),
        ..MapInputs::default()
    };
    let ctx = RunContext::build(
        with_outdoor_zone(),
        &inputs,
        &ComfortStandardParams::Outdoor { wind_speed: 0.5 },
        &MapOptions {
            period: june_21(),
            ..MapOptions::default()
        },
    )
    .unwrap();
    let out = run_map(&ctx, &CancelToken::new(), None).unwrap();
    assert_eq!(out.outdoor_zone, Some(1));
    let h = &out.hours[0];
    assert_eq!(h.air_temp[1], 20.0);
    assert!((h.mrt[1] - 25.0).abs() < 1e-12);
    assert!(h.comfort_index[1].is_some());
    assert!(out.matrix(MapField::Index).is_some());
}

#[test]
fn one_sided_solar_radiation_is_a_match_error() {
    let mut inputs = solar_inputs();
    inputs.diffuse_horizontal = None;
    let err = RunContext::build(
        one_point_office(true),
        &inputs,
        &ComfortStandardParams::default(),
        &MapOptions {
            period: june_21(),
            ..MapOptions::default()
        },
    )
    .unwrap_err();
    match err {
        MapError::Match { what } => assert!(what.contains("diffuse horizontal"), "{what}"),
        other => panic!("expected a match error, got {other:?}"),
    }
}

fn pmv() -> ComfortStandardParams {
    ComfortStandardParams::Pmv {
        clothing: 0.5,
        metabolic_rate: 1.2,
        air_speed: 0.05,
        ppd_threshold: 10.0,
    }
}

fn warm_office() -> (ViewFactorModel, MapInputs) {
    let zone = ZoneMesh::indoor("OFFICE", vec!["WALL-01".into()])
        .with_volume(27.0)
        .with_point(TestPoint::new(vec![1.0], 0.0));
    let inputs = MapInputs {
        surface_temps: vec![surface("WALL-01", 28.0)],
        air_temps: vec![air("OFFICE", 28.0)],
        relative_humidity: vec![record("Relative Humidity for OFFICE", "%", &year(50.0))],
        ..MapInputs::default()
    };
    (ViewFactorModel::new(vec![zone]).unwrap(), inputs)
}

fn first_vote(model: ViewFactorModel, inputs: &MapInputs) -> f64 {
    let options = MapOptions {
        period: june_21(),
        parallel: false,
        ..MapOptions::default()
    };
    let ctx = RunContext::build(model, inputs, &pmv(), &options).unwrap();
    run_map(&ctx, &CancelToken::new(), None).unwrap().hours[0].degrees_from_target[0]
}

#[test]
fn hourly_air_speed_cools_the_vote() {
    let (model, still) = warm_office();
    let mut breezy = still.clone();
    breezy.air_speed = vec![record("Air Speed", "m/s", &year(1.0))];
    assert!(breezy.has_air_speed());
    let still_vote = first_vote(model.clone(), &still);
    let breezy_vote = first_vote(model, &breezy);
    assert!(breezy_vote < still_vote, "{breezy_vote} vs {still_vote}");
}

#[test]
fn air_flow_over_volume_matches_the_equivalent_speed() {
    let (model, base) = warm_office();
    let mut by_speed = base.clone();
    by_speed.air_speed = vec![record("Air Speed for OFFICE", "m/s", &year(1.0))];
    // 27 m3 cube: 9 m2 face.
    let mut by_flow = base;
    by_flow.air_flow_volume = vec![record("Zone Air Flow Volume for OFFICE", "m3/s", &year(9.0))];
    let a = first_vote(model.clone(), &by_speed);
    let b = first_vote(model, &by_flow);
    assert!((a - b).abs() < 1e-6, "{a} vs {b}");
}

#[test]
fn air_flow_needs_zone_volume() {
    let (_, mut inputs) = warm_office();
    inputs.air_flow_volume = vec![record("Zone Air Flow Volume for OFFICE", "m3/s", &year(9.0))];
    let model = one_point_office(false);
    let err = RunContext::build(model, &inputs, &pmv(), &MapOptions::default()).unwrap_err();
    match err {
        MapError::Match { what } => assert!(what.contains("volume of zone 'OFFICE'"), "{what}"),
        other => panic!("expected a match error, got {other:?}"),
    }
}

#[test]
fn per_zone_air_speed_must_cover_every_zone() {
    let mut inputs = two_zone_inputs();
    inputs.air_speed = vec![
        record("Air Speed for EAST", "m/s", &year(0.3)),
        record("Air Speed for NORTH", "m/s", &year(0.3)),
    ];
    let err = RunContext::build(
        two_zone_model(),
        &inputs,
        &ComfortStandardParams::default(),
        &MapOptions {
            period: june_21(),
            ..MapOptions::default()
        },
    )
    .unwrap_err();
    match err {
        MapError::Match { what } => {
            assert!(what.contains("air speed of zone 'WEST'"), "{what}");
            assert!(!what.contains("EAST"), "{what}");
        }
        other => panic!("expected a match error, got {other:?}"),
    }
}

fn outdoor_inputs() -> MapInputs {
    MapInputs {
        surface_temps: vec![surface("WALL-01", 22.0)],
        outdoor_surface_temps: vec![record(
            "Outer Surface Temperature for GROUND: Surface",
            "C",
            &year(30.0),
        )],
        air_temps: vec![air("OFFICE", 22.0)],
        dry_bulb: Some(dry_bulb(20.0)),
        ..MapInputs::default()
    }
}

fn tall_outdoor_zone() -> ViewFactorModel {
    let office = ZoneMesh::indoor("OFFICE", vec!["WALL-01".into()])
        .with_point(TestPoint::new(vec![1.0], 0.0));
    let low = TestPoint::new(vec![0.5], 0.5)
        .with_non_surface_view(0.5)
        .with_position([0.0, 0.0, 1.0]);
    let high = TestPoint::new(vec![0.5], 0.5)
        .with_non_surface_view(0.5)
        .with_position([0.0, 0.0, 20.0]);
    let outdoor = ZoneMesh::outdoor("OUTDOOR", vec!["GROUND".into()]).with_points([low, high]);
    ViewFactorModel::new(vec![office, outdoor]).unwrap()
}

#[test]
fn station_wind_scales_with_point_height() {
    let mut inputs = outdoor_inputs();
    inputs.wind_speed = Some(record("Wind Speed", "m/s", &year(6.0)));
    let options = MapOptions {
        period: june_21(),
        site: SiteContext {
            terrain: Terrain::City,
            ..boston()
        },
        ..MapOptions::default()
    };
    let params = ComfortStandardParams::Outdoor { wind_speed: 0.5 };
    let ctx = RunContext::build(tall_outdoor_zone(), &inputs, &params, &options).unwrap();
    let out = run_map(&ctx, &CancelToken::new(), None).unwrap();
    let h = &out.hours[0];
    assert_eq!(h.mrt[1], h.mrt[2]);
    let (low, high) = (h.comfort_index[1].unwrap(), h.comfort_index[2].unwrap());
    assert!(high < low, "{high} vs {low}");

    let calm =
        RunContext::build(tall_outdoor_zone(), &outdoor_inputs(), &params, &options).unwrap();
    let calm = run_map(&calm, &CancelToken::new(), None).unwrap();
    assert_eq!(calm.hours[0].comfort_index[1], calm.hours[0].comfort_index[2]);
}

#[test]
fn station_wind_needs_outdoor_point_positions() {
    let mut inputs = outdoor_inputs();
    inputs.wind_speed = Some(record("Wind Speed", "m/s", &year(6.0)));
    let err = RunContext::build(
        with_outdoor_zone(),
        &inputs,
        &ComfortStandardParams::Outdoor { wind_speed: 0.5 },
        &MapOptions::default(),
    )
    .unwrap_err();
    match err {
        MapError::Match { what } => assert!(what.contains("position of point 0"), "{what}"),
        other => panic!("expected a match error, got {other:?}"),
    }
}

#[test]
fn outdoor_zone_humidity_falls_back_to_weather() {
    let mut inputs = outdoor_inputs();
    inputs.relative_humidity = vec![record("Relative Humidity for OFFICE", "%", &year(50.0))];
    let options = MapOptions {
        period: june_21(),
        ..MapOptions::default()
    };
    let err = RunContext::build(with_outdoor_zone(), &inputs, &pmv(), &options).unwrap_err();
    match err {
        MapError::Match { what } => {
            assert!(what.contains("relative humidity of zone 'OUTDOOR'"), "{what}")
        }
        other => panic!("expected a match error, got {other:?}"),
    }

    inputs.outdoor_relative_humidity = Some(record("Relative Humidity", "%", &year(70.0)));
    let ctx = RunContext::build(with_outdoor_zone(), &inputs, &pmv(), &options).unwrap();
    let out = run_map(&ctx, &CancelToken::new(), None).unwrap();
    assert_eq!(out.hours.len(), 24);
    assert!(out.hours[0].degrees_from_target[1].is_finite());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn operative_lies_between_air_and_radiant(
        wall in 10.0f64..35.0,
        floor in 10.0f64..35.0,
        east_air in 15.0f64..30.0,
        west_air in 15.0f64..30.0,
    ) {
        let mut inputs = two_zone_inputs();
        inputs.surface_temps[1] = surface("E-FLOOR", floor);
        inputs.surface_temps[2] = surface("W-WALL_0", wall);
        inputs.air_temps = vec![air("EAST", east_air), air("WEST", west_air)];
        let ctx = RunContext::build(
            two_zone_model(),
            &inputs,
            &ComfortStandardParams::default(),
            &MapOptions { period: june_21(), site: boston(), ..MapOptions::default() },
        ).unwrap();
        let out = run_map(&ctx, &CancelToken::new(), None).unwrap();
        for h in &out.hours {
            for p in 0..h.mrt.len() {
                let lo = h.air_temp[p].min(h.mrt[p]);
                let hi = h.air_temp[p].max(h.mrt[p]);
                prop_assert!(lo - 1e-9 <= h.operative[p] && h.operative[p] <= hi + 1e-9);
            }
        }
    }
}
