#![warn(clippy::pedantic)]

use approx::assert_relative_eq;
use soilx::{
    analyse, factor_of_safety, failure_envelope, mohr_circle_geometry, render_mohr_diagram,
    transform_stress, CommandRecorder, DrawCommand, MohrCoulomb, Safety, SafetyError,
    SigmaRange, StressInputError, StressState, Verdict, Viewport,
};

/// Fail when any recorded shape or label has a non-finite coordinate.
fn assert_finite_drawing(canvas: &CommandRecorder) {
    for command in &canvas.commands {
        let finite = match command {
            DrawCommand::Line { from, to, .. } => [from.x, from.y, to.x, to.y]
                .iter()
                .all(|value| value.is_finite()),
            DrawCommand::Circle { center, radius, .. } => {
                center.x.is_finite() && center.y.is_finite() && radius.is_finite()
            }
            DrawCommand::Text { at, .. } => at.x.is_finite() && at.y.is_finite(),
            DrawCommand::Polygon { points, .. } => points
                .iter()
                .all(|point| point.x.is_finite() && point.y.is_finite()),
        };
        assert!(finite, "{command:?}");
    }
}

/// Principal stress pairs covering compression, tension and equal stresses.
const STRESS_PAIRS: [(f64, f64); 5] = [
    (100.0, 50.0),
    (300.0, 50.0),
    (-40.0, 120.0),
    (75.0, 75.0),
    (0.0, -25.0),
];

#[test]
fn plane_stress_repeats_every_half_turn() {
    for (sigma1, sigma2) in STRESS_PAIRS {
        for theta in [0.0, 17.5, 45.0, 90.0, 133.0] {
            let first = transform_stress(sigma1, sigma2, theta);
            let second = transform_stress(sigma1, sigma2, theta + 180.0);
            assert_relative_eq!(first.sigma, second.sigma, epsilon = 1.0e-9);
            assert_relative_eq!(first.tau, second.tau, epsilon = 1.0e-9);
        }
    }
}

#[test]
fn plane_stress_lies_on_the_circle() {
    for (sigma1, sigma2) in STRESS_PAIRS {
        let circle = mohr_circle_geometry(sigma1, sigma2);
        for theta in (0..36).map(|step| f64::from(step) * 10.0) {
            let point = transform_stress(sigma1, sigma2, theta);
            assert_relative_eq!(circle.distance_to(point), 0.0, epsilon = 1.0e-9);
        }
    }
}

#[test]
fn failure_threshold_grows_with_strength() {
    let thresholds = |cohesion: f64| {
        [0.0, 10.0, 25.0, 40.0, 60.0, 89.0].map(|phi| {
            MohrCoulomb::new(cohesion, phi)
                .expect("admissible strength")
                .sigma1_threshold(50.0)
        })
    };

    for cohesion in [1.0, 10.0, 50.0] {
        let by_phi = thresholds(cohesion);
        assert!(by_phi.windows(2).all(|pair| pair[1] > pair[0]), "c = {cohesion}");

        let stronger = thresholds(cohesion * 2.0);
        for (weak, strong) in by_phi.iter().zip(&stronger) {
            assert!(strong > weak, "c = {cohesion}");
        }
    }
}

#[test]
fn failure_threshold_grows_with_confinement() {
    for phi in [0.0, 15.0, 30.0, 45.0] {
        let mut previous = f64::NEG_INFINITY;
        for sigma2 in [-50.0, 0.0, 25.0, 50.0, 200.0] {
            // With σ1 = 1 the factor equals the σ1 threshold.
            let fos = factor_of_safety(1.0, sigma2, 10.0, phi).expect("defined");
            assert!(fos.value() > previous, "phi = {phi}, sigma2 = {sigma2}");
            previous = fos.value();
        }
    }
}

#[test]
fn default_page_state_is_safe() {
    let analysis = analyse(&StressState::default()).expect("valid state");

    assert_relative_eq!(analysis.sigma_n, 100.0, epsilon = 1.0e-9);
    assert_relative_eq!(analysis.tau, 0.0, epsilon = 1.0e-9);
    let fos = analysis.safety.factor_of_safety().expect("defined");
    assert_relative_eq!(fos.value(), 1.846, epsilon = 1.0e-3);
    assert_eq!(fos.verdict(), Verdict::Safe);
}

#[test]
fn high_major_stress_predicts_failure() {
    let fos = factor_of_safety(300.0, 50.0, 10.0, 30.0).expect("defined");
    assert_relative_eq!(fos.value(), 0.615, epsilon = 1.0e-3);
    assert_eq!(fos.verdict(), Verdict::Failure);
    assert!(!fos.is_safe());
}

#[test]
fn frictionless_envelope_is_horizontal() {
    let range = SigmaRange::around(100.0, 50.0);
    let envelope = failure_envelope(10.0, 0.0, range).expect("valid parameters");

    assert_eq!(envelope.intercept, None);
    for point in envelope.upper {
        assert_relative_eq!(point.tau, 10.0);
    }
    for point in envelope.lower {
        assert_relative_eq!(point.tau, -10.0);
    }
    assert_relative_eq!(envelope.upper[0].sigma, range.start());
    assert_relative_eq!(envelope.upper[1].sigma, range.end());
    assert_eq!(envelope.failure_zone().len(), 4);
}

#[test]
fn vertical_envelope_is_rejected() {
    assert_eq!(
        factor_of_safety(100.0, 50.0, 10.0, 90.0),
        Err(SafetyError::InvalidInput(
            StressInputError::FrictionAngleOutOfRange(90.0)
        ))
    );
    assert_eq!(
        analyse(&StressState::new(100.0, 50.0, 0.0, 10.0, 90.0)),
        Err(StressInputError::FrictionAngleOutOfRange(90.0))
    );
}

#[test]
fn zero_major_stress_is_drawn_without_numbers() {
    let analysis = analyse(&StressState::new(0.0, 50.0, 0.0, 10.0, 30.0)).expect("valid state");
    assert_eq!(
        analysis.safety,
        Safety::Undefined {
            reason: SafetyError::ZeroMajorStress
        }
    );

    let mut canvas = CommandRecorder::new();
    render_mohr_diagram(&analysis, Viewport::default(), &mut canvas);

    assert!(canvas
        .texts()
        .any(|text| text.contains("undefined / invalid input")));
    assert_finite_drawing(&canvas);
}

#[test]
fn extreme_opposite_stresses_are_drawn_finitely() {
    let analysis =
        analyse(&StressState::new(1.0e308, -1.0e308, 30.0, 10.0, 30.0)).expect("representable");
    assert_relative_eq!(analysis.circle.radius, 1.0e308);
    assert_relative_eq!(analysis.circle.center, 0.0);
    assert!(analysis.plane_stress().is_finite());

    let mut canvas = CommandRecorder::new();
    render_mohr_diagram(&analysis, Viewport::default(), &mut canvas);
    assert_finite_drawing(&canvas);
}

#[test]
fn overflowing_envelope_is_rejected() {
    let state = StressState::new(f64::MAX, -f64::MAX, 0.0, 10.0, 60.0);
    assert_eq!(
        analyse(&state),
        Err(StressInputError::Unrepresentable {
            quantity: "failure envelope"
        })
    );
}

#[test]
fn near_vertical_envelope_leaves_safety_undefined() {
    assert_eq!(
        factor_of_safety(100.0, 50.0, 10.0, 89.999_999_999_999_99),
        Err(SafetyError::NonFinite)
    );

    let analysis = analyse(&StressState::new(100.0, 50.0, 0.0, 10.0, 89.999_999_999_999_99))
        .expect("admissible friction angle");
    assert_eq!(
        analysis.safety,
        Safety::Undefined {
            reason: SafetyError::NonFinite
        }
    );

    let mut canvas = CommandRecorder::new();
    render_mohr_diagram(&analysis, Viewport::default(), &mut canvas);
    assert!(canvas
        .texts()
        .any(|text| text.contains("undefined / invalid input")));
    assert_finite_drawing(&canvas);
}

#[test]
fn analysis_serializes_for_front_ends() {
    let analysis = analyse(&StressState::new(300.0, 50.0, 30.0, 10.0, 30.0)).expect("valid state");
    let value = serde_json::to_value(analysis).expect("serializable");

    assert_eq!(value["safety"]["status"], "assessed");
    assert_eq!(value["safety"]["verdict"], "failure");
    assert_eq!(value["state"]["sigma1"], 300.0);
}
