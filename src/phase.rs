//! Phase relations of a three-phase soil sample and compaction chart data.

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::PhaseError;

/// Number of intervals used to sample the no-air-voids line.
pub const NO_AIR_VOIDS_INTERVALS: usize = 20;

/// Moisture content range used when the current one is not finite.
pub const FALLBACK_MOISTURE_RANGE: f64 = 20.0;

/// Physical constants shared by the phase relation formulas.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoilConstants {
    /// Density of water.
    pub water_density: f64,
    /// Specific gravity of the soil solids.
    pub specific_gravity: f64,
    /// Gravitational acceleration used for unit weights.
    pub gravity: f64,
}

impl Default for SoilConstants {
    fn default() -> Self {
        Self {
            water_density: 1.0,
            specific_gravity: 2.7,
            gravity: 9.81,
        }
    }
}

impl SoilConstants {
    /// Check that every constant is a positive finite number.
    ///
    /// # Errors
    ///
    /// Returns [`PhaseError::InvalidConstant`] naming the first offending constant.
    pub fn validate(&self) -> Result<(), PhaseError> {
        for (name, value) in [
            ("water density", self.water_density),
            ("specific gravity", self.specific_gravity),
            ("gravity", self.gravity),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(PhaseError::InvalidConstant { name, value });
            }
        }
        Ok(())
    }

    /// Maximum possible dry density, reached with no voids at all.
    #[must_use]
    pub fn solids_density(&self) -> f64 {
        self.water_density * self.specific_gravity
    }

    /// Dry density on the no-air-voids line at `moisture_content`.
    #[must_use]
    pub fn no_air_voids_density(&self, moisture_content: f64) -> f64 {
        self.solids_density() / (1.0 + moisture_content * self.specific_gravity)
    }
}

/// Volumes of the three phases in a sample.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhaseVolumes {
    /// Volume of water.
    pub water: f64,
    /// Volume of air.
    pub air: f64,
    /// Volume of solids.
    pub solids: f64,
}

impl Default for PhaseVolumes {
    fn default() -> Self {
        Self::new(20.0, 10.0, 70.0)
    }
}

impl PhaseVolumes {
    /// Create a sample from its phase volumes.
    #[must_use]
    pub const fn new(water: f64, air: f64, solids: f64) -> Self {
        Self { water, air, solids }
    }

    /// Check that all volumes are non-negative and some solids are present.
    ///
    /// # Errors
    ///
    /// Returns [`PhaseError::InvalidVolume`] for a negative or non-finite volume
    /// and [`PhaseError::NoSolids`] when `solids == 0`.
    pub fn validate(&self) -> Result<(), PhaseError> {
        for (phase, volume) in [
            ("water", self.water),
            ("air", self.air),
            ("solids", self.solids),
        ] {
            if !(volume.is_finite() && volume >= 0.0) {
                return Err(PhaseError::InvalidVolume { phase, volume });
            }
        }
        if self.solids == 0.0 {
            return Err(PhaseError::NoSolids);
        }
        Ok(())
    }
}

/// Every mass, volume and density ratio derived from a sample.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PhaseRelations {
    /// Input volumes.
    pub volumes: PhaseVolumes,
    /// Total volume.
    pub total_volume: f64,
    /// Volume of voids (air and water).
    pub void_volume: f64,
    /// Mass of water.
    pub water_mass: f64,
    /// Mass of solids.
    pub solids_mass: f64,
    /// Moisture content, water mass over solids mass.
    pub moisture_content: f64,
    /// Total mass.
    pub total_mass: f64,
    /// Void ratio.
    pub void_ratio: f64,
    /// Degree of saturation; absent when there are no voids.
    pub saturation: Option<f64>,
    /// Air content of the voids; absent when there are no voids.
    pub air_content: Option<f64>,
    /// Dry density.
    pub dry_density: f64,
    /// Bulk density.
    pub bulk_density: f64,
    /// Density when every void is filled with water.
    pub saturated_density: f64,
    /// Fraction of the volume taken by solids.
    pub solid_fraction: f64,
    /// Fraction of the volume taken by voids.
    pub porosity: f64,
    /// Dry unit weight.
    pub dry_unit_weight: f64,
    /// Bulk unit weight.
    pub bulk_unit_weight: f64,
    /// Saturated unit weight.
    pub saturated_unit_weight: f64,
}

impl PhaseRelations {
    /// Derive all phase relations of a sample.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`PhaseVolumes::validate`] and
    /// [`SoilConstants::validate`].
    ///
    /// # Examples
    /// ```
    /// use soilx::{PhaseRelations, PhaseVolumes, SoilConstants};
    ///
    /// let relations = PhaseRelations::compute(
    ///     PhaseVolumes::new(20.0, 10.0, 70.0),
    ///     SoilConstants::default(),
    /// )
    /// .expect("valid sample");
    /// assert!((relations.void_ratio - 30.0 / 70.0).abs() < 1.0e-12);
    /// ```
    pub fn compute(volumes: PhaseVolumes, constants: SoilConstants) -> Result<Self, PhaseError> {
        volumes.validate()?;
        constants.validate()?;

        let total_volume = volumes.solids + volumes.air + volumes.water;
        let void_volume = volumes.air + volumes.water;
        let water_mass = volumes.water * constants.water_density;
        let solids_mass = volumes.solids * constants.solids_density();
        let total_mass = solids_mass + water_mass;
        let void_ratio = void_volume / volumes.solids;
        let (saturation, air_content) = if void_volume > 0.0 {
            (
                Some(volumes.water / void_volume),
                Some(volumes.air / void_volume),
            )
        } else {
            (None, None)
        };
        let dry_density = solids_mass / total_volume;
        let bulk_density = total_mass / total_volume;
        let saturated_density =
            (constants.specific_gravity + void_ratio) * constants.water_density / (1.0 + void_ratio);
        let solid_fraction = volumes.solids / total_volume;

        let relations = Self {
            volumes,
            total_volume,
            void_volume,
            water_mass,
            solids_mass,
            moisture_content: water_mass / solids_mass,
            total_mass,
            void_ratio,
            saturation,
            air_content,
            dry_density,
            bulk_density,
            saturated_density,
            solid_fraction,
            porosity: 1.0 - solid_fraction,
            dry_unit_weight: dry_density * constants.gravity,
            bulk_unit_weight: bulk_density * constants.gravity,
            saturated_unit_weight: saturated_density * constants.gravity,
        };
        debug!(
            void_ratio = relations.void_ratio,
            moisture_content = relations.moisture_content,
            "computed phase relations"
        );
        Ok(relations)
    }
}

/// Sampled no-air-voids (zero air content) line.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NoAirVoidsLine {
    /// Moisture contents, evenly spaced from zero.
    pub moisture_content: Vec<f64>,
    /// Dry density at each moisture content.
    pub dry_density: Vec<f64>,
}

/// Sample the no-air-voids line over `[0, max_moisture]`.
///
/// A non-finite `max_moisture` falls back to [`FALLBACK_MOISTURE_RANGE`].
#[must_use]
pub fn no_air_voids_line(max_moisture: f64, constants: SoilConstants) -> NoAirVoidsLine {
    let max_moisture = if max_moisture.is_finite() {
        max_moisture
    } else {
        FALLBACK_MOISTURE_RANGE
    };
    let moisture = Array1::linspace(0.0, max_moisture, NO_AIR_VOIDS_INTERVALS + 1);
    let density = moisture.mapv(|mc| constants.no_air_voids_density(mc));
    NoAirVoidsLine {
        moisture_content: moisture.to_vec(),
        dry_density: density.to_vec(),
    }
}

/// One bar segment of the stacked volume chart.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VolumeBar {
    /// Legend entry.
    pub name: &'static str,
    /// Height of the segment.
    pub volume: f64,
    /// Fill colour name.
    pub color: &'static str,
}

/// Numeric content of both compaction charts.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CompactionChart {
    /// Dashed reference line.
    pub no_air_voids: NoAirVoidsLine,
    /// Marker for the current sample, `(moisture content, dry density)`.
    pub current_state: (f64, f64),
    /// Horizontal axis range of the dry density chart.
    pub moisture_range: (f64, f64),
    /// Vertical axis range of the dry density chart.
    pub density_range: (f64, f64),
    /// Stacked bars, soil first.
    pub volume_bars: Vec<VolumeBar>,
    /// Vertical axis range of the volume chart.
    pub volume_range: (f64, f64),
}

impl CompactionChart {
    /// Build both charts for a set of phase relations.
    #[must_use]
    pub fn new(relations: &PhaseRelations, constants: SoilConstants) -> Self {
        let max_moisture = relations.moisture_content.max(1.0);
        let volumes = relations.volumes;
        Self {
            no_air_voids: no_air_voids_line(max_moisture, constants),
            current_state: (relations.moisture_content, relations.dry_density),
            moisture_range: (0.0, max_moisture),
            density_range: (0.0, constants.solids_density()),
            volume_bars: vec![
                VolumeBar {
                    name: "Soil",
                    volume: volumes.solids,
                    color: "brown",
                },
                VolumeBar {
                    name: "Water",
                    volume: volumes.water,
                    color: "blue",
                },
                VolumeBar {
                    name: "Air",
                    volume: volumes.air,
                    color: "lightgrey",
                },
            ],
            volume_range: (0.0, relations.total_volume),
        }
    }
}
