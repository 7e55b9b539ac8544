//! Stress transformation and Mohr–Coulomb failure checks.

use std::fmt;

use serde::{Deserialize, Serialize};
use uom::si::angle::{degree, radian};
use uom::si::f64::Angle;

use crate::errors::{SafetyError, StressInputError};
use crate::geometry::{MohrCircle, StressPoint};

/// Factor of safety at or above which a stress state is considered stable.
pub const SAFETY_THRESHOLD: f64 = 1.0;

/// Padding added to the largest principal stress when sizing a plot.
pub const PLOT_MARGIN: f64 = 20.0;

/// Convert an angle in degrees to radians.
pub(crate) fn to_radians(degrees: f64) -> f64 {
    Angle::new::<degree>(degrees).get::<radian>()
}

/// Reject NaN and infinite inputs with the name of the offending field.
fn ensure_finite(name: &'static str, value: f64) -> Result<f64, StressInputError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(StressInputError::NonFinite { name, value })
    }
}

/// Principal stresses, plane orientation and strength parameters at a point.
///
/// Angles are expressed in degrees. The struct is a plain snapshot of the
/// inputs; every derived quantity is recomputed from it on demand.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StressState {
    /// Major principal stress.
    pub sigma1: f64,
    /// Minor principal stress.
    pub sigma2: f64,
    /// Orientation of the cutting plane in degrees.
    pub theta: f64,
    /// Cohesion intercept of the failure envelope.
    pub cohesion: f64,
    /// Internal friction angle in degrees.
    pub friction_angle: f64,
}

impl Default for StressState {
    fn default() -> Self {
        Self::new(100.0, 50.0, 0.0, 10.0, 30.0)
    }
}

impl StressState {
    /// Create a stress state from raw inputs.
    #[must_use]
    pub const fn new(
        sigma1: f64,
        sigma2: f64,
        theta: f64,
        cohesion: f64,
        friction_angle: f64,
    ) -> Self {
        Self {
            sigma1,
            sigma2,
            theta,
            cohesion,
            friction_angle,
        }
    }

    /// Check that every input is finite and the strength parameters are admissible.
    ///
    /// # Errors
    ///
    /// Returns [`StressInputError::NonFinite`] for NaN or infinite inputs and the
    /// errors of [`MohrCoulomb::new`] for inadmissible strength parameters.
    pub fn validate(&self) -> Result<(), StressInputError> {
        ensure_finite("sigma1", self.sigma1)?;
        ensure_finite("sigma2", self.sigma2)?;
        ensure_finite("theta", self.theta)?;
        self.strength().map(|_| ())
    }

    /// Build the failure criterion described by this state.
    ///
    /// # Errors
    ///
    /// See [`MohrCoulomb::new`].
    pub fn strength(&self) -> Result<MohrCoulomb, StressInputError> {
        MohrCoulomb::new(self.cohesion, self.friction_angle)
    }

    /// Normal and shear stress on the plane at `theta`.
    #[must_use]
    pub fn plane_stress(&self) -> StressPoint {
        transform_stress(self.sigma1, self.sigma2, self.theta)
    }

    /// Mohr's circle for the principal stresses.
    #[must_use]
    pub fn circle(&self) -> MohrCircle {
        mohr_circle_geometry(self.sigma1, self.sigma2)
    }

    /// Symmetric σ range that comfortably contains the circle.
    #[must_use]
    pub fn plot_range(&self) -> SigmaRange {
        SigmaRange::around(self.sigma1, self.sigma2)
    }
}

/// Rotate the principal stresses onto the plane inclined at `theta` degrees.
///
/// Returns the normal stress as `sigma` and the shear stress as `tau`. Non-finite
/// inputs propagate as NaN.
///
/// # Examples
/// ```
/// use soilx::transform_stress;
///
/// let stress = transform_stress(100.0, 50.0, 45.0);
/// assert!((stress.sigma - 75.0).abs() < 1.0e-9);
/// assert!((stress.tau - 25.0).abs() < 1.0e-9);
/// ```
#[must_use]
pub fn transform_stress(sigma1: f64, sigma2: f64, theta: f64) -> StressPoint {
    let double_angle = 2.0 * to_radians(theta);
    let mean = sigma1 / 2.0 + sigma2 / 2.0;
    let deviator = sigma1 / 2.0 - sigma2 / 2.0;
    StressPoint::new(
        mean + deviator * double_angle.cos(),
        deviator * double_angle.sin(),
    )
}

/// Centre and radius of Mohr's circle for two principal stresses.
#[must_use]
pub fn mohr_circle_geometry(sigma1: f64, sigma2: f64) -> MohrCircle {
    MohrCircle::from_principal(sigma1, sigma2)
}

/// Outcome of comparing a factor of safety with [`SAFETY_THRESHOLD`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The stress state lies inside the failure envelope.
    Safe,
    /// The stress state reaches or exceeds the failure envelope.
    Failure,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Safe => f.write_str("Material is in safe condition."),
            Verdict::Failure => f.write_str("Failure predicted!"),
        }
    }
}

/// A finite factor of safety and its classification.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FactorOfSafety {
    /// Ratio of the failure stress to the applied major stress.
    value: f64,
    /// Classification of `value`.
    verdict: Verdict,
}

impl FactorOfSafety {
    /// Classify a finite ratio.
    ///
    /// # Errors
    ///
    /// Returns [`SafetyError::NonFinite`] when `value` is NaN or infinite.
    pub fn new(value: f64) -> Result<Self, SafetyError> {
        if !value.is_finite() {
            return Err(SafetyError::NonFinite);
        }
        let verdict = if value >= SAFETY_THRESHOLD {
            Verdict::Safe
        } else {
            Verdict::Failure
        };
        Ok(Self { value, verdict })
    }

    /// Numeric factor of safety.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Classification against [`SAFETY_THRESHOLD`].
    #[must_use]
    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    /// Return `true` when no failure is predicted.
    #[must_use]
    pub fn is_safe(&self) -> bool {
        self.verdict == Verdict::Safe
    }
}

/// Validated Mohr–Coulomb strength parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MohrCoulomb {
    /// Shear strength at zero normal stress.
    cohesion: f64,
    /// Friction angle in degrees, within `[0, 90)`.
    friction_angle: f64,
}

impl MohrCoulomb {
    /// Create a failure criterion.
    ///
    /// # Errors
    ///
    /// Returns [`StressInputError::NonFinite`] for NaN or infinite inputs,
    /// [`StressInputError::NegativeCohesion`] when `cohesion < 0` and
    /// [`StressInputError::FrictionAngleOutOfRange`] unless `0 ≤ friction_angle < 90`.
    pub fn new(cohesion: f64, friction_angle: f64) -> Result<Self, StressInputError> {
        ensure_finite("cohesion", cohesion)?;
        ensure_finite("friction_angle", friction_angle)?;
        if cohesion < 0.0 {
            return Err(StressInputError::NegativeCohesion(cohesion));
        }
        if !(0.0..90.0).contains(&friction_angle) {
            return Err(StressInputError::FrictionAngleOutOfRange(friction_angle));
        }
        Ok(Self {
            cohesion,
            friction_angle,
        })
    }

    /// Shear strength at zero normal stress.
    #[must_use]
    pub fn cohesion(&self) -> f64 {
        self.cohesion
    }

    /// Friction angle in degrees.
    #[must_use]
    pub fn friction_angle(&self) -> f64 {
        self.friction_angle
    }

    /// Slope of the envelope, `tan φ`.
    #[must_use]
    pub fn tan_phi(&self) -> f64 {
        to_radians(self.friction_angle).tan()
    }

    /// Passive stress ratio `(1 + sin φ) / (1 − sin φ)`.
    #[must_use]
    pub fn n_phi(&self) -> f64 {
        let sin_phi = to_radians(self.friction_angle).sin();
        (1.0 + sin_phi) / (1.0 - sin_phi)
    }

    /// Major principal stress at failure for a given minor principal stress.
    #[must_use]
    pub fn sigma1_threshold(&self, sigma2: f64) -> f64 {
        let n_phi = self.n_phi();
        sigma2 * n_phi + 2.0 * self.cohesion * n_phi.sqrt()
    }

    /// Shear strength `c + σ tan φ` at normal stress `sigma`.
    #[must_use]
    pub fn shear_strength(&self, sigma: f64) -> f64 {
        self.cohesion + sigma * self.tan_phi()
    }

    /// Normal stress where the envelope meets the σ axis.
    ///
    /// Absent when `φ = 0`, or when `φ` is so small that `−c / tan φ` is not
    /// representable.
    #[must_use]
    pub fn sigma_intercept(&self) -> Option<f64> {
        let tan_phi = self.tan_phi();
        if tan_phi == 0.0 {
            return None;
        }
        Some(-self.cohesion / tan_phi).filter(|sigma| sigma.is_finite())
    }

    /// Factor of safety `σ1,threshold / σ1` for the principal stress pair.
    ///
    /// # Errors
    ///
    /// Returns [`SafetyError::InvalidInput`] when a stress is not finite,
    /// [`SafetyError::ZeroMajorStress`] when `sigma1 == 0` and
    /// [`SafetyError::NonFinite`] if the ratio still overflows.
    pub fn factor_of_safety(&self, sigma1: f64, sigma2: f64) -> Result<FactorOfSafety, SafetyError> {
        ensure_finite("sigma1", sigma1)?;
        ensure_finite("sigma2", sigma2)?;
        if sigma1 == 0.0 {
            return Err(SafetyError::ZeroMajorStress);
        }
        FactorOfSafety::new(self.sigma1_threshold(sigma2) / sigma1)
    }

    /// Upper and lower envelope lines over `range`.
    ///
    /// The lines start at the σ-axis intercept when it lies inside `range`,
    /// otherwise at the lower bound of `range`.
    #[must_use]
    pub fn envelope(&self, range: SigmaRange) -> FailureEnvelope {
        let intercept = self.sigma_intercept();
        let start = match intercept {
            Some(sigma) if range.contains(sigma) => sigma,
            _ => range.start(),
        };
        let end = range.end();
        let upper = [
            StressPoint::new(start, self.shear_strength(start)),
            StressPoint::new(end, self.shear_strength(end)),
        ];
        let lower = upper.map(|point| StressPoint::new(point.sigma, -point.tau));
        FailureEnvelope {
            upper,
            lower,
            intercept,
        }
    }
}

/// Factor of safety for a principal stress pair and strength parameters.
///
/// # Errors
///
/// Returns [`SafetyError::InvalidInput`] for inadmissible strength parameters
/// (including `friction_angle = 90`) and the errors of
/// [`MohrCoulomb::factor_of_safety`].
///
/// # Examples
/// ```
/// use soilx::{factor_of_safety, Verdict};
///
/// let fos = factor_of_safety(100.0, 50.0, 10.0, 30.0).expect("defined");
/// assert!((fos.value() - 1.8464).abs() < 1.0e-4);
/// assert_eq!(fos.verdict(), Verdict::Safe);
/// ```
pub fn factor_of_safety(
    sigma1: f64,
    sigma2: f64,
    cohesion: f64,
    friction_angle: f64,
) -> Result<FactorOfSafety, SafetyError> {
    MohrCoulomb::new(cohesion, friction_angle)?.factor_of_safety(sigma1, sigma2)
}

/// Mohr–Coulomb envelope over a σ range.
///
/// # Errors
///
/// See [`MohrCoulomb::new`].
pub fn failure_envelope(
    cohesion: f64,
    friction_angle: f64,
    range: SigmaRange,
) -> Result<FailureEnvelope, StressInputError> {
    Ok(MohrCoulomb::new(cohesion, friction_angle)?.envelope(range))
}

/// Non-empty interval of normal stress used to draw an envelope.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SigmaRange {
    /// Lower bound.
    start: f64,
    /// Upper bound.
    end: f64,
}

impl SigmaRange {
    /// Create a range.
    ///
    /// # Errors
    ///
    /// Returns [`StressInputError::EmptyRange`] unless both bounds are finite and
    /// `start < end`.
    pub fn new(start: f64, end: f64) -> Result<Self, StressInputError> {
        if start.is_finite() && end.is_finite() && start < end {
            Ok(Self { start, end })
        } else {
            Err(StressInputError::EmptyRange { start, end })
        }
    }

    /// Symmetric range `[−m, m]` with `m = max(|σ1|, |σ2|) + PLOT_MARGIN`.
    ///
    /// Non-finite stresses fall back to `[−PLOT_MARGIN, PLOT_MARGIN]`.
    #[must_use]
    pub fn around(sigma1: f64, sigma2: f64) -> Self {
        let extent = sigma1.abs().max(sigma2.abs());
        let extent = if extent.is_finite() { extent } else { 0.0 };
        let half_width = extent + PLOT_MARGIN;
        Self {
            start: -half_width,
            end: half_width,
        }
    }

    /// Lower bound.
    #[must_use]
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Upper bound.
    #[must_use]
    pub fn end(&self) -> f64 {
        self.end
    }

    /// Return `true` when `sigma` lies inside the closed interval.
    #[must_use]
    pub fn contains(&self, sigma: f64) -> bool {
        (self.start..=self.end).contains(&sigma)
    }

    /// Largest absolute bound, used to size plots.
    #[must_use]
    pub fn extent(&self) -> f64 {
        self.start.abs().max(self.end.abs())
    }
}

/// Upper and mirrored lower Mohr–Coulomb lines, each given by two endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FailureEnvelope {
    /// `τ = c + σ tan φ` from the start point to the end of the range.
    pub upper: [StressPoint; 2],
    /// `τ = −(c + σ tan φ)` over the same σ values.
    pub lower: [StressPoint; 2],
    /// σ-axis intercept `−c / tan φ`, absent for a horizontal envelope.
    pub intercept: Option<f64>,
}

impl FailureEnvelope {
    /// All sampled points, upper line first.
    #[must_use]
    pub fn points(&self) -> Vec<StressPoint> {
        self.upper.iter().chain(self.lower.iter()).copied().collect()
    }

    /// Closed outline of the region between the two lines.
    ///
    /// The lines share their start point when they meet on the σ axis, so the
    /// outline is a triangle there and a quadrilateral otherwise.
    #[must_use]
    pub fn failure_zone(&self) -> Vec<StressPoint> {
        let mut outline = vec![self.upper[0], self.upper[1], self.lower[1]];
        if self.lower[0] != self.upper[0] {
            outline.push(self.lower[0]);
        }
        outline
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn plane_at_zero_degrees_carries_major_stress() {
        let stress = transform_stress(100.0, 50.0, 0.0);
        assert_relative_eq!(stress.sigma, 100.0);
        assert_relative_eq!(stress.tau, 0.0);
    }

    #[test]
    fn plane_at_ninety_degrees_carries_minor_stress() {
        let stress = transform_stress(100.0, 50.0, 90.0);
        assert_relative_eq!(stress.sigma, 50.0, epsilon = 1.0e-9);
        assert_relative_eq!(stress.tau, 0.0, epsilon = 1.0e-9);
    }

    #[test]
    fn nan_inputs_propagate() {
        let stress = transform_stress(f64::NAN, 50.0, 10.0);
        assert!(stress.sigma.is_nan());
        assert!(stress.tau.is_nan());
    }

    #[test]
    fn n_phi_matches_closed_form_at_thirty_degrees() {
        let strength = MohrCoulomb::new(10.0, 30.0).expect("valid parameters");
        assert_relative_eq!(strength.n_phi(), 3.0, epsilon = 1.0e-12);
        assert_relative_eq!(
            strength.sigma1_threshold(50.0),
            150.0 + 20.0 * 3.0_f64.sqrt(),
            epsilon = 1.0e-9
        );
    }

    #[test]
    fn threshold_is_exactly_one() {
        let fos = FactorOfSafety::new(1.0).expect("finite");
        assert_eq!(fos.verdict(), Verdict::Safe);
        let fos = FactorOfSafety::new(0.999_999_999).expect("finite");
        assert_eq!(fos.verdict(), Verdict::Failure);
    }

    #[test]
    fn strength_parameters_are_validated() {
        assert_eq!(
            MohrCoulomb::new(-1.0, 30.0),
            Err(StressInputError::NegativeCohesion(-1.0))
        );
        assert_eq!(
            MohrCoulomb::new(10.0, -5.0),
            Err(StressInputError::FrictionAngleOutOfRange(-5.0))
        );
        assert_eq!(
            MohrCoulomb::new(10.0, 90.0),
            Err(StressInputError::FrictionAngleOutOfRange(90.0))
        );
        assert!(matches!(
            MohrCoulomb::new(f64::NAN, 30.0),
            Err(StressInputError::NonFinite { name: "cohesion", .. })
        ));
    }

    #[test]
    fn zero_major_stress_is_undefined() {
        let error = factor_of_safety(0.0, 50.0, 10.0, 30.0).expect_err("undefined");
        assert_eq!(error, SafetyError::ZeroMajorStress);
    }

    #[test]
    fn vertical_envelope_is_rejected_before_division() {
        let error = factor_of_safety(100.0, 50.0, 10.0, 90.0).expect_err("rejected");
        assert_eq!(
            error,
            SafetyError::InvalidInput(StressInputError::FrictionAngleOutOfRange(90.0))
        );
    }

    #[test]
    fn envelope_starts_at_axis_intercept() {
        let range = SigmaRange::around(100.0, 50.0);
        let envelope = failure_envelope(10.0, 30.0, range).expect("valid parameters");
        let intercept = envelope.intercept.expect("sloped envelope");
        assert_relative_eq!(intercept, -10.0 * 3.0_f64.sqrt(), epsilon = 1.0e-9);
        assert_eq!(envelope.upper[0], envelope.lower[0]);
        assert_relative_eq!(envelope.upper[0].tau, 0.0, epsilon = 1.0e-12);
        assert_eq!(envelope.upper[1].sigma, 120.0);
        assert_relative_eq!(envelope.lower[1].tau, -envelope.upper[1].tau);
        assert_eq!(envelope.failure_zone().len(), 3);
    }

    #[test]
    fn vanishing_friction_angle_has_no_intercept() {
        let range = SigmaRange::new(-100.0, 100.0).expect("valid range");
        let envelope = failure_envelope(10.0, 1.0e-320, range).expect("valid parameters");
        assert_eq!(envelope.intercept, None);
        assert_eq!(envelope.upper[0].sigma, -100.0);
        assert!(envelope.points().iter().all(|point| point.is_finite()));
    }

    #[test]
    fn near_vertical_envelope_has_no_factor() {
        assert_eq!(
            factor_of_safety(100.0, 50.0, 10.0, 89.999_999_999_999_99),
            Err(SafetyError::NonFinite)
        );
    }

    #[test]
    fn intercept_outside_range_is_clipped() {
        let range = SigmaRange::new(-50.0, 50.0).expect("valid range");
        let envelope = failure_envelope(10.0, 1.0, range).expect("valid parameters");
        assert_eq!(envelope.upper[0].sigma, -50.0);
        assert!(envelope.intercept.expect("sloped envelope") < -50.0);
        assert_eq!(envelope.failure_zone().len(), 4);
    }

    #[test]
    fn range_must_be_non_empty() {
        assert_eq!(
            SigmaRange::new(5.0, 5.0),
            Err(StressInputError::EmptyRange {
                start: 5.0,
                end: 5.0
            })
        );
        assert!(SigmaRange::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn plot_range_pads_largest_stress() {
        let range = StressState::new(-150.0, 40.0, 0.0, 0.0, 0.0).plot_range();
        assert_eq!(range.start(), -170.0);
        assert_eq!(range.end(), 170.0);
        assert_eq!(range.extent(), 170.0);
    }

    #[test]
    fn default_state_matches_reset_values() {
        let state = StressState::default();
        assert_eq!(state, StressState::new(100.0, 50.0, 0.0, 10.0, 30.0));
        state.validate().expect("defaults are valid");
    }
}
