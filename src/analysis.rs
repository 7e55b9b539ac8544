//! One recompute pass of the Mohr's circle page.

use serde::Serialize;
use tracing::{debug, warn};

use crate::errors::{SafetyError, StressInputError};
use crate::geometry::{MohrCircle, StressPoint};
use crate::mohr::{FactorOfSafety, FailureEnvelope, SigmaRange, StressState};

/// Factor of safety of a stress state, or the reason it has none.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Safety {
    /// A finite, classified factor of safety.
    Assessed(FactorOfSafety),
    /// The ratio is undefined and must not be displayed as a number.
    Undefined {
        /// Why no factor of safety exists.
        #[serde(serialize_with = "serialize_reason")]
        reason: SafetyError,
    },
}

impl Safety {
    /// Return the factor of safety when it is defined.
    #[must_use]
    pub fn factor_of_safety(&self) -> Option<FactorOfSafety> {
        match self {
            Safety::Assessed(fos) => Some(*fos),
            Safety::Undefined { .. } => None,
        }
    }
}

/// Serialize an undefined-safety reason as its message.
fn serialize_reason<S: serde::Serializer>(
    reason: &SafetyError,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(reason)
}

/// Everything a renderer needs to draw the current stress state.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MohrAnalysis {
    /// Inputs the analysis was computed from.
    pub state: StressState,
    /// Normal stress on the plane at `theta`.
    pub sigma_n: f64,
    /// Shear stress on the plane at `theta`.
    pub tau: f64,
    /// Factor of safety against Mohr–Coulomb failure.
    pub safety: Safety,
    /// Mohr's circle of the principal stresses.
    pub circle: MohrCircle,
    /// Failure envelope over `range`.
    pub envelope: FailureEnvelope,
    /// σ interval the envelope was sampled over.
    pub range: SigmaRange,
}

impl MohrAnalysis {
    /// Stress on the cutting plane as a point.
    #[must_use]
    pub fn plane_stress(&self) -> StressPoint {
        StressPoint::new(self.sigma_n, self.tau)
    }
}

/// Evaluate a stress state over its default plot range.
///
/// # Errors
///
/// Returns [`StressInputError`] when the state is not admissible, including
/// [`StressInputError::Unrepresentable`] when finite inputs overflow the circle,
/// the plane stress or the envelope. A zero major principal stress is not an
/// error; it is reported as [`Safety::Undefined`].
///
/// # Examples
/// ```
/// use soilx::{analyse, StressState, Verdict};
///
/// let analysis = analyse(&StressState::new(300.0, 50.0, 0.0, 10.0, 30.0))
///     .expect("valid state");
/// let fos = analysis.safety.factor_of_safety().expect("defined");
/// assert_eq!(fos.verdict(), Verdict::Failure);
/// ```
pub fn analyse(state: &StressState) -> Result<MohrAnalysis, StressInputError> {
    analyse_over(state, state.plot_range())
}

/// Evaluate a stress state with the envelope sampled over `range`.
///
/// # Errors
///
/// See [`analyse`].
pub fn analyse_over(
    state: &StressState,
    range: SigmaRange,
) -> Result<MohrAnalysis, StressInputError> {
    if let Err(error) = state.validate() {
        warn!(%error, "rejected stress state");
        return Err(error);
    }
    let strength = state.strength()?;
    let plane = state.plane_stress();
    let safety = match strength.factor_of_safety(state.sigma1, state.sigma2) {
        Ok(fos) => Safety::Assessed(fos),
        Err(reason) => {
            warn!(%reason, sigma1 = state.sigma1, "factor of safety undefined");
            Safety::Undefined { reason }
        }
    };
    let circle = state.circle();
    let envelope = strength.envelope(range);
    if let Err(error) = ensure_representable(plane, circle, &envelope) {
        warn!(%error, "rejected stress state");
        return Err(error);
    }
    debug!(
        sigma_n = plane.sigma,
        tau = plane.tau,
        ?safety,
        "evaluated stress state"
    );
    Ok(MohrAnalysis {
        state: *state,
        sigma_n: plane.sigma,
        tau: plane.tau,
        safety,
        circle,
        envelope,
        range,
    })
}

/// Reject derived geometry that overflowed while the inputs were finite.
fn ensure_representable(
    plane: StressPoint,
    circle: MohrCircle,
    envelope: &FailureEnvelope,
) -> Result<(), StressInputError> {
    let checks = [
        ("plane stress", plane.is_finite()),
        (
            "Mohr's circle",
            circle.center.is_finite() && circle.radius.is_finite(),
        ),
        (
            "failure envelope",
            envelope.points().iter().all(|point| point.is_finite()),
        ),
    ];
    match checks.into_iter().find(|(_, finite)| !finite) {
        Some((quantity, _)) => Err(StressInputError::Unrepresentable { quantity }),
        None => Ok(()),
    }
}
