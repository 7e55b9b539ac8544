//! Fundamental geometric types for plotting in stress space.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Point in the (normal stress, shear stress) plane.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StressPoint {
    /// Normal stress, plotted along the horizontal axis.
    pub sigma: f64,
    /// Shear stress, plotted along the vertical axis.
    pub tau: f64,
}

impl StressPoint {
    /// Create a [`StressPoint`] with explicit coordinates.
    #[must_use]
    pub const fn new(sigma: f64, tau: f64) -> Self {
        Self { sigma, tau }
    }

    /// Convert the point into an algebraic vector.
    #[must_use]
    pub fn to_vector(self) -> Vector2<f64> {
        Vector2::new(self.sigma, self.tau)
    }

    /// Return `true` when both coordinates are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.sigma.is_finite() && self.tau.is_finite()
    }
}

impl From<Vector2<f64>> for StressPoint {
    fn from(value: Vector2<f64>) -> Self {
        Self::new(value.x, value.y)
    }
}

impl From<StressPoint> for Vector2<f64> {
    fn from(value: StressPoint) -> Self {
        value.to_vector()
    }
}

/// Mohr's circle described by its centre on the σ axis and its radius.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MohrCircle {
    /// Mean principal stress, `(σ1 + σ2) / 2`.
    pub center: f64,
    /// Maximum shear stress, `|σ1 − σ2| / 2`.
    pub radius: f64,
}

impl MohrCircle {
    /// Create a circle from the two principal stresses.
    ///
    /// # Examples
    /// ```
    /// use soilx::MohrCircle;
    ///
    /// let circle = MohrCircle::from_principal(50.0, 100.0);
    /// assert_eq!(circle.center, 75.0);
    /// assert_eq!(circle.radius, 25.0);
    /// ```
    #[must_use]
    pub fn from_principal(sigma1: f64, sigma2: f64) -> Self {
        Self {
            center: sigma1 / 2.0 + sigma2 / 2.0,
            radius: (sigma1 / 2.0 - sigma2 / 2.0).abs(),
        }
    }

    /// Centre of the circle as a point on the σ axis.
    #[must_use]
    pub fn center_point(&self) -> StressPoint {
        StressPoint::new(self.center, 0.0)
    }

    /// Signed distance from `point` to the circumference; zero on the circle.
    #[must_use]
    pub fn distance_to(&self, point: StressPoint) -> f64 {
        (point.to_vector() - self.center_point().to_vector()).norm() - self.radius
    }

    /// Left and right intersections with the σ axis (the principal stresses).
    #[must_use]
    pub fn principal_points(&self) -> [StressPoint; 2] {
        [
            StressPoint::new(self.center - self.radius, 0.0),
            StressPoint::new(self.center + self.radius, 0.0),
        ]
    }
}

/// Convenience helper for creating [`StressPoint`] instances.
///
/// # Examples
/// ```
/// use soilx::stress_point;
///
/// let point = stress_point(80.0, 12.5);
/// assert_eq!(point.tau, 12.5);
/// ```
#[must_use]
pub const fn stress_point(sigma: f64, tau: f64) -> StressPoint {
    StressPoint::new(sigma, tau)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn point_to_vector_roundtrip() {
        let point = StressPoint::new(1.0, -2.0);
        let vector: Vector2<f64> = point.into();
        assert_eq!(vector, Vector2::new(1.0, -2.0));
        assert_eq!(StressPoint::from(vector), point);
    }

    #[test]
    fn circle_is_symmetric_in_principal_order() {
        assert_eq!(
            MohrCircle::from_principal(100.0, 50.0),
            MohrCircle::from_principal(50.0, 100.0)
        );
    }

    #[test]
    fn principal_points_lie_on_circle() {
        let circle = MohrCircle::from_principal(-20.0, 60.0);
        for point in circle.principal_points() {
            assert_relative_eq!(circle.distance_to(point), 0.0, epsilon = 1.0e-12);
        }
        assert_eq!(circle.principal_points()[0].sigma, -20.0);
    }

    #[test]
    fn non_finite_points_are_detected() {
        assert!(!StressPoint::new(f64::NAN, 0.0).is_finite());
        assert!(!StressPoint::new(0.0, f64::INFINITY).is_finite());
        assert!(stress_point(1.0, 1.0).is_finite());
    }
}
