#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_doc_code_examples)]
#![warn(clippy::missing_docs_in_private_items)]
#![doc = include_str!("../README.md")]

pub mod analysis;
pub mod config;
pub mod critical_state;
pub mod drawing;
pub mod errors;
pub mod geometry;
pub mod mohr;
pub mod phase;
pub mod report;
pub mod ruler;

pub use analysis::{analyse, analyse_over, MohrAnalysis, Safety};
pub use config::Config;
pub use critical_state::{
    build_view, clicked_axis, sample_lines, snap_camera, CameraEye, CriticalStateData,
    CriticalStateParams, CriticalStateSurface, PlotSpec, Sampling, SceneAxis, SigmaScale, View,
};
pub use drawing::{
    render_mohr_diagram, render_rejected, Canvas, Color, CommandRecorder, DrawCommand, Paint,
    Pixel, SvgCanvas, Viewport,
};
pub use errors::{
    ConfigError, CriticalStateError, PhaseError, RulerError, SafetyError, StressInputError,
};
pub use geometry::{stress_point, MohrCircle, StressPoint};
pub use mohr::{
    factor_of_safety, failure_envelope, mohr_circle_geometry, transform_stress, FactorOfSafety,
    FailureEnvelope, MohrCoulomb, SigmaRange, StressState, Verdict,
};
pub use phase::{
    no_air_voids_line, CompactionChart, NoAirVoidsLine, PhaseRelations, PhaseVolumes,
    SoilConstants,
};
pub use report::{render_mohr_summary, render_phase_summary, render_ruler};
pub use ruler::{
    porosity_from_void_ratio, ruler_ticks, solid_fraction_from_porosity,
    void_ratio_from_porosity, void_ratio_from_solid_fraction, RulerKind, RulerTick,
};
