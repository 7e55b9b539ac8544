#![warn(clippy::pedantic)]

use approx::assert_relative_eq;
use soilx::{
    build_view, porosity_from_void_ratio, ruler_ticks, sample_lines, CompactionChart, Config,
    CriticalStateParams, PhaseError, PhaseRelations, PhaseVolumes, RulerKind, Sampling,
    SigmaScale, SoilConstants, StressState, View,
};

fn saturated_sample() -> PhaseRelations {
    PhaseRelations::compute(PhaseVolumes::new(30.0, 0.0, 70.0), SoilConstants::default())
        .expect("saturated sample is valid")
}

#[test]
fn saturated_sample_sits_on_the_no_air_voids_line() {
    let relations = saturated_sample();
    let constants = SoilConstants::default();

    assert_relative_eq!(relations.saturation.expect("voids present"), 1.0);
    assert_relative_eq!(relations.air_content.expect("voids present"), 0.0);
    assert_relative_eq!(
        relations.dry_density,
        constants.no_air_voids_density(relations.moisture_content),
        epsilon = 1.0e-12
    );
    assert_relative_eq!(
        relations.bulk_density,
        relations.saturated_density,
        epsilon = 1.0e-12
    );
}

#[test]
fn porosity_matches_ruler_conversion() {
    for volumes in [
        PhaseVolumes::new(20.0, 10.0, 70.0),
        PhaseVolumes::new(5.0, 45.0, 50.0),
        PhaseVolumes::new(0.0, 0.0, 10.0),
    ] {
        let relations =
            PhaseRelations::compute(volumes, SoilConstants::default()).expect("valid sample");
        assert_relative_eq!(
            porosity_from_void_ratio(relations.void_ratio).expect("valid void ratio"),
            relations.porosity,
            epsilon = 1.0e-12
        );
    }
}

#[test]
fn sample_without_solids_is_rejected() {
    assert_eq!(
        PhaseRelations::compute(PhaseVolumes::new(10.0, 10.0, 0.0), SoilConstants::default()),
        Err(PhaseError::NoSolids)
    );
}

#[test]
fn compaction_chart_stacks_every_phase() {
    let relations = saturated_sample();
    let chart = CompactionChart::new(&relations, SoilConstants::default());

    let total: f64 = chart.volume_bars.iter().map(|bar| bar.volume).sum();
    assert_relative_eq!(total, relations.total_volume);
    assert_eq!(chart.no_air_voids.moisture_content.len(), 21);
    assert_relative_eq!(chart.current_state.1, relations.dry_density);
}

#[test]
fn compression_line_lies_above_critical_state_line() {
    let params = CriticalStateParams::default();
    let data = sample_lines(&params, SigmaScale::Linear, 50).expect("valid parameters");

    assert_eq!(data.e[0], None);
    assert_eq!(data.e_ncl[0], None);
    for (csl, ncl) in data.e.iter().zip(&data.e_ncl).skip(1) {
        let (csl, ncl) = (csl.expect("positive stress"), ncl.expect("positive stress"));
        assert_relative_eq!(ncl - csl, params.n - params.gamma, epsilon = 1.0e-12);
    }
}

#[test]
fn three_dimensional_view_has_surface_and_camera() {
    let params = CriticalStateParams::default();
    let data = sample_lines(&params, SigmaScale::Log, 100).expect("valid parameters");
    let plot = build_view(View::ThreeD, &params, &data, Sampling::default()).expect("3D view");

    let names: Vec<_> = plot.traces.iter().map(|trace| trace.name).collect();
    assert_eq!(
        names,
        [
            "Critical State Line",
            "Normal Compression Line",
            "Critical State Surface"
        ]
    );
    let surface = &plot.traces[2];
    assert_eq!(surface.x.len(), 20);
    assert!(plot.camera.is_some());
    assert_eq!(plot.x_axis.kind, "log");
}

#[test]
fn void_ratio_ruler_agrees_with_porosity_ruler() {
    let void_ratios = ruler_ticks(RulerKind::VoidRatio, 8).expect("divisions");
    let porosities = ruler_ticks(RulerKind::Porosity, 8).expect("divisions");

    for (e, n) in void_ratios.iter().zip(&porosities).skip(1) {
        let e = e.value.expect("bounded void ratio");
        let n = n.value.expect("porosity");
        assert_relative_eq!(
            porosity_from_void_ratio(e).expect("valid void ratio"),
            n,
            epsilon = 1.0e-12
        );
    }
}

#[test]
fn configuration_feeds_the_calculators() {
    let config = Config::from_json_str(
        r#"{
            "mohr": { "sigma1": 300.0, "theta": 30.0 },
            "compaction": { "air": 0.0, "water": 30.0 },
            "ruler": { "divisions": 4 }
        }"#,
    )
    .expect("valid configuration");

    let state = StressState::from(config.mohr);
    assert_eq!(state, StressState::new(300.0, 50.0, 30.0, 10.0, 30.0));

    let relations = PhaseRelations::compute(config.compaction.into(), config.soil)
        .expect("valid sample");
    assert_eq!(relations, saturated_sample());

    let ticks = ruler_ticks(RulerKind::SolidFraction, config.ruler.divisions).expect("divisions");
    assert_eq!(ticks.len(), 5);
}
