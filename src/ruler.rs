//! Conversions between void ratio, porosity and solid fraction.

use serde::{Deserialize, Serialize};

use crate::errors::RulerError;

/// Default number of intervals on a ruler.
pub const DEFAULT_DIVISIONS: usize = 10;

/// Porosity `n = e / (1 + e)` for a void ratio.
///
/// # Errors
///
/// Returns [`RulerError::InvalidVoidRatio`] unless `void_ratio` is finite and
/// non-negative.
///
/// # Examples
/// ```
/// use soilx::porosity_from_void_ratio;
///
/// assert_eq!(porosity_from_void_ratio(1.0), Ok(0.5));
/// ```
pub fn porosity_from_void_ratio(void_ratio: f64) -> Result<f64, RulerError> {
    if !(void_ratio.is_finite() && void_ratio >= 0.0) {
        return Err(RulerError::InvalidVoidRatio(void_ratio));
    }
    Ok(void_ratio / (1.0 + void_ratio))
}

/// Void ratio `e = n / (1 − n)` for a porosity.
///
/// # Errors
///
/// Returns [`RulerError::InvalidPorosity`] unless `0 ≤ porosity < 1`.
pub fn void_ratio_from_porosity(porosity: f64) -> Result<f64, RulerError> {
    if !(0.0..1.0).contains(&porosity) {
        return Err(RulerError::InvalidPorosity(porosity));
    }
    Ok(porosity / (1.0 - porosity))
}

/// Void ratio `e = 1/ν − 1` for a solid fraction.
///
/// # Errors
///
/// Returns [`RulerError::InvalidSolidFraction`] unless `0 < solid_fraction ≤ 1`.
pub fn void_ratio_from_solid_fraction(solid_fraction: f64) -> Result<f64, RulerError> {
    if !(solid_fraction > 0.0 && solid_fraction <= 1.0) {
        return Err(RulerError::InvalidSolidFraction(solid_fraction));
    }
    Ok(1.0 / solid_fraction - 1.0)
}

/// Solid fraction `ν = 1 − n` for a porosity.
///
/// # Errors
///
/// Returns [`RulerError::InvalidPorosity`] unless `0 ≤ porosity ≤ 1`.
pub fn solid_fraction_from_porosity(porosity: f64) -> Result<f64, RulerError> {
    if !(0.0..=1.0).contains(&porosity) {
        return Err(RulerError::InvalidPorosity(porosity));
    }
    Ok(1.0 - porosity)
}

/// Quantity labelled along a ruler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RulerKind {
    /// ν from 0 to 1.
    SolidFraction,
    /// n from 1 to 0.
    Porosity,
    /// e from ∞ to 0.
    VoidRatio,
}

impl RulerKind {
    /// All rulers in display order.
    pub const ALL: [RulerKind; 3] = [
        RulerKind::SolidFraction,
        RulerKind::Porosity,
        RulerKind::VoidRatio,
    ];

    /// Human readable name.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            RulerKind::SolidFraction => "Solid fraction",
            RulerKind::Porosity => "Porosity",
            RulerKind::VoidRatio => "Void ratio",
        }
    }
}

/// A mark on a ruler.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RulerTick {
    /// Position along the ruler in percent.
    pub position: f64,
    /// Value at the mark; absent where it is unbounded.
    pub value: Option<f64>,
    /// Label with two decimals, or `∞`.
    pub label: String,
}

/// Marks of one ruler.
///
/// Tick `i` sits at `i / divisions` of the length, where the solid fraction is
/// `i / divisions`. The void ratio is unbounded at zero solid fraction and is
/// labelled `∞` there.
///
/// # Errors
///
/// Returns [`RulerError::NoDivisions`] when `divisions == 0`.
pub fn ruler_ticks(kind: RulerKind, divisions: usize) -> Result<Vec<RulerTick>, RulerError> {
    if divisions == 0 {
        return Err(RulerError::NoDivisions);
    }
    let ticks = (0..=divisions)
        .map(|i| {
            let solid_fraction = i as f64 / divisions as f64;
            let porosity = 1.0 - solid_fraction;
            let value = match kind {
                RulerKind::SolidFraction => Some(solid_fraction),
                RulerKind::Porosity => Some(porosity),
                RulerKind::VoidRatio => void_ratio_from_solid_fraction(solid_fraction).ok(),
            };
            let label = value.map_or_else(|| "∞".to_owned(), |value| format!("{value:.2}"));
            RulerTick {
                position: solid_fraction * 100.0,
                value,
                label,
            }
        })
        .collect();
    Ok(ticks)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn conversions_are_consistent() {
        let e = 0.6;
        let n = porosity_from_void_ratio(e).expect("valid void ratio");
        assert_relative_eq!(n, 0.375, epsilon = 1.0e-12);
        assert_relative_eq!(
            void_ratio_from_porosity(n).expect("valid porosity"),
            e,
            epsilon = 1.0e-12
        );
        let nu = solid_fraction_from_porosity(n).expect("valid porosity");
        assert_relative_eq!(
            void_ratio_from_solid_fraction(nu).expect("valid solid fraction"),
            e,
            epsilon = 1.0e-12
        );
    }

    #[test]
    fn out_of_range_inputs_are_rejected() {
        assert_eq!(
            porosity_from_void_ratio(-0.1),
            Err(RulerError::InvalidVoidRatio(-0.1))
        );
        assert_eq!(
            void_ratio_from_porosity(1.0),
            Err(RulerError::InvalidPorosity(1.0))
        );
        assert_eq!(
            void_ratio_from_solid_fraction(0.0),
            Err(RulerError::InvalidSolidFraction(0.0))
        );
        assert!(void_ratio_from_porosity(f64::NAN).is_err());
    }

    #[test]
    fn void_ratio_ruler_starts_unbounded() {
        let ticks = ruler_ticks(RulerKind::VoidRatio, DEFAULT_DIVISIONS).expect("divisions");
        assert_eq!(ticks.len(), 11);
        assert_eq!(ticks[0].value, None);
        assert_eq!(ticks[0].label, "∞");
        assert_eq!(ticks[1].label, "9.00");
        assert_eq!(ticks[5].label, "1.00");
        assert_eq!(ticks[10].label, "0.00");
        assert_eq!(ticks[10].position, 100.0);
    }

    #[test]
    fn porosity_ruler_runs_backwards() {
        let ticks = ruler_ticks(RulerKind::Porosity, 4).expect("divisions");
        let labels: Vec<_> = ticks.iter().map(|tick| tick.label.as_str()).collect();
        assert_eq!(labels, ["1.00", "0.75", "0.50", "0.25", "0.00"]);
    }

    #[test]
    fn zero_divisions_is_rejected() {
        assert_eq!(
            ruler_ticks(RulerKind::SolidFraction, 0),
            Err(RulerError::NoDivisions)
        );
    }
}
