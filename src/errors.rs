//! Error types produced while validating inputs or evaluating soil calculators.

use thiserror::Error;

/// Error returned when a stress state cannot be evaluated.
///
/// # Examples
///
/// ```
/// use soilx::{StressInputError, StressState};
///
/// let state = StressState::new(100.0, 50.0, 0.0, 10.0, 90.0);
/// let error = state.validate().expect_err("vertical envelope is rejected");
/// assert_eq!(error, StressInputError::FrictionAngleOutOfRange(90.0));
/// ```
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum StressInputError {
    /// Returned when an input is NaN or infinite.
    #[error("{name} must be finite (received {value})")]
    NonFinite {
        /// Name of the offending input.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// Returned when the cohesion is negative.
    #[error("cohesion must not be negative (received {0})")]
    NegativeCohesion(f64),
    /// Returned when the friction angle lies outside `[0, 90)` degrees.
    #[error("friction angle must lie in [0, 90) degrees (received {0})")]
    FrictionAngleOutOfRange(f64),
    /// Returned when a stress range is empty or reversed.
    #[error("stress range [{start}, {end}] is empty")]
    EmptyRange {
        /// Lower bound of the rejected range.
        start: f64,
        /// Upper bound of the rejected range.
        end: f64,
    },
    /// Returned when finite inputs produce a quantity that overflows `f64`.
    #[error("{quantity} is not representable for these stresses")]
    Unrepresentable {
        /// Name of the derived quantity.
        quantity: &'static str,
    },
}

/// Reason a factor of safety has no meaningful value.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum SafetyError {
    /// Returned when the major principal stress is zero.
    #[error("major principal stress is zero")]
    ZeroMajorStress,
    /// Returned when the ratio evaluates to NaN or infinity.
    #[error("factor of safety is not finite")]
    NonFinite,
    /// Returned when the strength parameters are rejected.
    #[error("{0}")]
    InvalidInput(StressInputError),
}

impl From<StressInputError> for SafetyError {
    fn from(value: StressInputError) -> Self {
        Self::InvalidInput(value)
    }
}

/// Error returned when phase volumes describe an impossible soil sample.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum PhaseError {
    /// Returned when a volume is negative or not finite.
    #[error("{phase} volume must be a non-negative number (received {volume})")]
    InvalidVolume {
        /// Name of the phase (water, air or solids).
        phase: &'static str,
        /// Rejected volume.
        volume: f64,
    },
    /// Returned when the sample contains no solids.
    #[error("sample must contain solids; void ratio is undefined")]
    NoSolids,
    /// Returned when a soil constant is zero, negative or not finite.
    #[error("{name} must be positive (received {value})")]
    InvalidConstant {
        /// Name of the constant.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },
}

/// Error returned when critical state parameters cannot be sampled.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum CriticalStateError {
    /// Returned when a parameter is NaN or infinite.
    #[error("{name} must be finite (received {value})")]
    NonFinite {
        /// Name of the offending parameter.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// Returned when the compression index is negative.
    #[error("lambda must not be negative (received {0})")]
    NegativeLambda(f64),
    /// Returned when fewer than two samples are requested.
    #[error("at least two samples are required (received {0})")]
    TooFewSamples(usize),
}

/// Error returned when converting between void measures.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum RulerError {
    /// Returned when a ruler has no divisions.
    #[error("ruler needs at least one division")]
    NoDivisions,
    /// Returned when a void ratio is negative or not finite.
    #[error("void ratio must be a non-negative number (received {0})")]
    InvalidVoidRatio(f64),
    /// Returned when a porosity lies outside `[0, 1)`.
    #[error("porosity must lie in [0, 1) (received {0})")]
    InvalidPorosity(f64),
    /// Returned when a solid fraction lies outside `(0, 1]`.
    #[error("solid fraction must lie in (0, 1] (received {0})")]
    InvalidSolidFraction(f64),
}

/// Error returned when loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Returned when the file cannot be read.
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    /// Returned when the file is not valid JSON for [`Config`](crate::Config).
    #[error("cannot parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}
