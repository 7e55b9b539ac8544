//! Default inputs for every calculator, optionally loaded from a JSON file.
//!
//! `Config::default()` reproduces the reset values of each page. A config file
//! only needs the fields it overrides:
//!
//! ```
//! use soilx::Config;
//!
//! let config = Config::from_json_str(r#"{ "mohr": { "sigma1": 250.0 } }"#).expect("valid");
//! assert_eq!(config.mohr.sigma1, 250.0);
//! assert_eq!(config.mohr.sigma2, 50.0);
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::critical_state::{CameraEye, CriticalStateParams, Sampling, SigmaScale, View};
use crate::drawing::Viewport;
use crate::errors::ConfigError;
use crate::mohr::StressState;
use crate::phase::{PhaseVolumes, SoilConstants};
use crate::ruler::DEFAULT_DIVISIONS;

/// Inputs of the Mohr's circle page, every field optional in a file.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MohrDefaults {
    /// Major principal stress.
    pub sigma1: f64,
    /// Minor principal stress.
    pub sigma2: f64,
    /// Plane orientation in degrees.
    pub theta: f64,
    /// Cohesion.
    pub cohesion: f64,
    /// Friction angle in degrees.
    pub friction_angle: f64,
}

impl Default for MohrDefaults {
    fn default() -> Self {
        let state = StressState::default();
        Self {
            sigma1: state.sigma1,
            sigma2: state.sigma2,
            theta: state.theta,
            cohesion: state.cohesion,
            friction_angle: state.friction_angle,
        }
    }
}

impl From<MohrDefaults> for StressState {
    fn from(value: MohrDefaults) -> Self {
        StressState::new(
            value.sigma1,
            value.sigma2,
            value.theta,
            value.cohesion,
            value.friction_angle,
        )
    }
}

/// Inputs of the compaction page.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompactionDefaults {
    /// Volume of water.
    pub water: f64,
    /// Volume of air.
    pub air: f64,
    /// Volume of solids.
    pub solids: f64,
}

impl Default for CompactionDefaults {
    fn default() -> Self {
        let volumes = PhaseVolumes::default();
        Self {
            water: volumes.water,
            air: volumes.air,
            solids: volumes.solids,
        }
    }
}

impl From<CompactionDefaults> for PhaseVolumes {
    fn from(value: CompactionDefaults) -> Self {
        PhaseVolumes::new(value.water, value.air, value.solids)
    }
}

/// Inputs of the critical state page.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CriticalStateDefaults {
    /// Model parameters.
    #[serde(flatten)]
    pub params: CriticalStateParams,
    /// σ spacing.
    pub scale: SigmaScale,
    /// Initial view.
    pub view: View,
    /// Sample counts.
    pub sampling: Sampling,
    /// Initial camera of the 3D view.
    pub camera: CameraEye,
}

impl Default for CriticalStateDefaults {
    fn default() -> Self {
        Self {
            params: CriticalStateParams::default(),
            scale: SigmaScale::default(),
            view: View::default(),
            sampling: Sampling::default(),
            camera: CameraEye::default(),
        }
    }
}

/// Inputs of the ruler page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulerDefaults {
    /// Number of intervals per ruler.
    pub divisions: usize,
}

impl Default for RulerDefaults {
    fn default() -> Self {
        Self {
            divisions: DEFAULT_DIVISIONS,
        }
    }
}

/// Complete configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Mohr's circle inputs.
    pub mohr: MohrDefaults,
    /// Compaction inputs.
    pub compaction: CompactionDefaults,
    /// Physical constants.
    pub soil: SoilConstants,
    /// Critical state inputs.
    pub critical_state: CriticalStateDefaults,
    /// Ruler inputs.
    pub ruler: RulerDefaults,
    /// Size of rendered diagrams.
    pub render: Viewport,
    /// Log filter used when `RUST_LOG` is not set.
    pub log_level: Option<String>,
}

impl Config {
    /// Parse a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the text is not a valid configuration.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be opened and
    /// [`ConfigError::Parse`] when it is not a valid configuration.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let config = serde_json::from_reader(reader)?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_page_reset_values() {
        let config = Config::default();
        assert_eq!(StressState::from(config.mohr), StressState::default());
        assert_eq!(config.critical_state.params.m, 1.2);
        assert_eq!(config.critical_state.view, View::ThreeD);
        assert_eq!(config.critical_state.scale, SigmaScale::Linear);
        assert_eq!(config.ruler.divisions, 10);
        assert_eq!(config.soil.specific_gravity, 2.7);
    }

    #[test]
    fn empty_document_is_all_defaults() {
        assert_eq!(Config::from_json_str("{}").expect("valid"), Config::default());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = Config::from_json_str(
            r#"{
                "critical_state": { "M": 0.9, "scale": "log", "view": "e-sigma" },
                "soil": { "specific_gravity": 2.65 },
                "log_level": "debug"
            }"#,
        )
        .expect("valid");
        assert_eq!(config.critical_state.params.m, 0.9);
        assert_eq!(config.critical_state.params.lambda, 0.15);
        assert_eq!(config.critical_state.scale, SigmaScale::Log);
        assert_eq!(config.critical_state.view, View::ESigma);
        assert_eq!(config.soil.specific_gravity, 2.65);
        assert_eq!(config.soil.gravity, 9.81);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn malformed_document_is_rejected() {
        assert!(matches!(
            Config::from_json_str("{ \"mohr\": 3 }"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            Config::from_path("does/not/exist.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
