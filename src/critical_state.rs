//! Critical state and normal compression lines in (σ, τ, e) space.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::CriticalStateError;

/// Spacing of the sampled normal stresses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SigmaScale {
    /// Evenly spaced over `[0, 500]`.
    #[default]
    Linear,
    /// Logarithmically spaced over `[1, 1000]`.
    Log,
}

impl SigmaScale {
    /// Sampled σ interval.
    #[must_use]
    pub fn bounds(self) -> (f64, f64) {
        match self {
            SigmaScale::Linear => (0.0, 500.0),
            SigmaScale::Log => (1.0, 1000.0),
        }
    }

    /// Axis title for σ on this scale.
    #[must_use]
    pub fn axis_title(self) -> &'static str {
        match self {
            SigmaScale::Linear => "σ (kPa)",
            SigmaScale::Log => "σ (kPa) - Log Scale",
        }
    }

    /// Axis type understood by plotting front ends.
    #[must_use]
    pub fn axis_type(self) -> &'static str {
        match self {
            SigmaScale::Linear => "linear",
            SigmaScale::Log => "log",
        }
    }
}

/// Material constants of the critical state model.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CriticalStateParams {
    /// Slope of the critical state line in stress space.
    #[serde(rename = "M")]
    pub m: f64,
    /// Void ratio of the critical state line at unit stress.
    #[serde(rename = "Gamma")]
    pub gamma: f64,
    /// Slope of both lines against `ln σ`.
    pub lambda: f64,
    /// Void ratio of the normal compression line at unit stress.
    #[serde(rename = "N")]
    pub n: f64,
}

impl Default for CriticalStateParams {
    fn default() -> Self {
        Self {
            m: 1.2,
            gamma: 2.0,
            lambda: 0.15,
            n: 2.5,
        }
    }
}

impl CriticalStateParams {
    /// Check that every parameter is finite and `lambda` is not negative.
    ///
    /// # Errors
    ///
    /// Returns [`CriticalStateError::NonFinite`] or
    /// [`CriticalStateError::NegativeLambda`].
    pub fn validate(&self) -> Result<(), CriticalStateError> {
        for (name, value) in [
            ("M", self.m),
            ("Gamma", self.gamma),
            ("lambda", self.lambda),
            ("N", self.n),
        ] {
            if !value.is_finite() {
                return Err(CriticalStateError::NonFinite { name, value });
            }
        }
        if self.lambda < 0.0 {
            return Err(CriticalStateError::NegativeLambda(self.lambda));
        }
        Ok(())
    }

    /// Shear stress on the critical state line.
    #[must_use]
    pub fn critical_shear(&self, sigma: f64) -> f64 {
        self.m * sigma
    }

    /// Void ratio on the critical state line; absent where `ln σ` is undefined.
    #[must_use]
    pub fn critical_void_ratio(&self, sigma: f64) -> Option<f64> {
        log_line(self.gamma, self.lambda, sigma)
    }

    /// Void ratio on the normal compression line; absent where `ln σ` is undefined.
    #[must_use]
    pub fn compression_void_ratio(&self, sigma: f64) -> Option<f64> {
        log_line(self.n, self.lambda, sigma)
    }
}

/// Evaluate `intercept − slope·ln σ` for positive σ.
fn log_line(intercept: f64, slope: f64, sigma: f64) -> Option<f64> {
    (sigma > 0.0).then(|| intercept - slope * sigma.ln())
}

/// Sample counts for the lines and the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sampling {
    /// Points along each line.
    pub points: usize,
    /// Rows and columns of the surface grid.
    pub grid: usize,
}

impl Default for Sampling {
    fn default() -> Self {
        Self {
            points: 100,
            grid: 20,
        }
    }
}

/// Sampled critical state and normal compression lines.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CriticalStateData {
    /// Scale the samples were taken on.
    pub scale: SigmaScale,
    /// Normal stress samples.
    pub sigma: Vec<f64>,
    /// Shear stress on the critical state line.
    pub tau: Vec<f64>,
    /// Void ratio on the critical state line.
    pub e: Vec<Option<f64>>,
    /// Void ratio on the normal compression line.
    pub e_ncl: Vec<Option<f64>>,
}

/// Sample both lines on `scale`.
///
/// # Errors
///
/// Returns [`CriticalStateError`] for invalid parameters or fewer than two points.
///
/// # Examples
/// ```
/// use soilx::{sample_lines, CriticalStateParams, SigmaScale};
///
/// let data = sample_lines(&CriticalStateParams::default(), SigmaScale::Log, 100)
///     .expect("valid parameters");
/// assert_eq!(data.sigma.len(), 100);
/// assert!((data.sigma[99] - 1000.0).abs() < 1.0e-9);
/// ```
pub fn sample_lines(
    params: &CriticalStateParams,
    scale: SigmaScale,
    points: usize,
) -> Result<CriticalStateData, CriticalStateError> {
    params.validate()?;
    let sigma = sigma_samples(scale, points)?;
    let data = CriticalStateData {
        scale,
        tau: sigma.iter().map(|&s| params.critical_shear(s)).collect(),
        e: sigma.iter().map(|&s| params.critical_void_ratio(s)).collect(),
        e_ncl: sigma
            .iter()
            .map(|&s| params.compression_void_ratio(s))
            .collect(),
        sigma: sigma.to_vec(),
    };
    debug!(?scale, points, "sampled critical state lines");
    Ok(data)
}

/// Normal stresses spaced according to `scale`.
fn sigma_samples(scale: SigmaScale, points: usize) -> Result<Array1<f64>, CriticalStateError> {
    if points < 2 {
        return Err(CriticalStateError::TooFewSamples(points));
    }
    let (start, end) = scale.bounds();
    Ok(match scale {
        SigmaScale::Linear => Array1::linspace(start, end, points),
        SigmaScale::Log => Array1::logspace(10.0, start.log10(), end.log10(), points),
    })
}

/// Surface spanned by the critical state line as τ grows from zero.
#[derive(Clone, Debug, PartialEq)]
pub struct CriticalStateSurface {
    /// Normal stress at each grid node.
    pub sigma: Array2<f64>,
    /// Shear stress at each grid node.
    pub tau: Array2<f64>,
    /// Void ratio at each grid node; NaN where `ln σ` is undefined.
    pub e: Array2<f64>,
}

impl CriticalStateSurface {
    /// Build a `size × size` grid over the sampled σ range.
    ///
    /// Row `i` holds one normal stress; column `j` scales the critical shear by
    /// `j / (size − 1)`.
    ///
    /// # Errors
    ///
    /// Returns [`CriticalStateError`] for invalid parameters or `size < 2`.
    pub fn new(
        params: &CriticalStateParams,
        data: &CriticalStateData,
        size: usize,
    ) -> Result<Self, CriticalStateError> {
        params.validate()?;
        if size < 2 {
            return Err(CriticalStateError::TooFewSamples(size));
        }
        let first = data.sigma.first().copied().unwrap_or(0.0);
        let last = data.sigma.last().copied().unwrap_or(first);
        let span = (size - 1) as f64;
        let sigma = Array2::from_shape_fn((size, size), |(i, _)| {
            first + (last - first) * i as f64 / span
        });
        let tau = Array2::from_shape_fn((size, size), |(i, j)| {
            params.critical_shear(sigma[[i, 0]]) * j as f64 / span
        });
        let e = sigma.mapv(|s| params.critical_void_ratio(s).unwrap_or(f64::NAN));
        Ok(Self { sigma, tau, e })
    }

    /// Rows of a grid with undefined entries replaced by `None`.
    fn rows(grid: &Array2<f64>) -> Vec<Vec<Option<f64>>> {
        grid.rows()
            .into_iter()
            .map(|row| row.iter().map(|v| v.is_finite().then_some(*v)).collect())
            .collect()
    }
}

/// One series of a plot.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Trace {
    /// Legend entry.
    pub name: &'static str,
    /// Series kind: `line`, `line3d` or `surface`.
    pub kind: &'static str,
    /// Horizontal values, one row per series row.
    pub x: Vec<Vec<Option<f64>>>,
    /// Vertical values.
    pub y: Vec<Vec<Option<f64>>>,
    /// Depth values for 3D series.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z: Option<Vec<Vec<Option<f64>>>>,
    /// Line colour.
    pub color: &'static str,
    /// Line width in pixels.
    pub width: f64,
    /// Draw dashed.
    pub dashed: bool,
}

/// A titled axis.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Axis {
    /// Axis title.
    pub title: &'static str,
    /// `linear` or `log`.
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl Axis {
    /// Linear axis with a title.
    fn linear(title: &'static str) -> Self {
        Self {
            title,
            kind: "linear",
        }
    }

    /// σ axis for a scale.
    fn sigma(scale: SigmaScale) -> Self {
        Self {
            title: scale.axis_title(),
            kind: scale.axis_type(),
        }
    }
}

/// Camera eye position for the 3D view.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraEye {
    /// Along σ.
    pub x: f64,
    /// Along τ.
    pub y: f64,
    /// Along e.
    pub z: f64,
}

impl Default for CameraEye {
    fn default() -> Self {
        Self {
            x: 1.5,
            y: 1.5,
            z: 1.5,
        }
    }
}

/// Which projection of the model to plot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum View {
    /// Critical state line in stress space.
    TauSigma,
    /// Both lines in void ratio space.
    ESigma,
    /// Both lines and the critical state surface.
    #[default]
    #[serde(rename = "3d")]
    ThreeD,
}

/// Everything a plotting front end needs to draw one view.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlotSpec {
    /// Plot title.
    pub title: &'static str,
    /// Series in drawing order.
    pub traces: Vec<Trace>,
    /// Horizontal axis.
    pub x_axis: Axis,
    /// Vertical axis.
    pub y_axis: Axis,
    /// Depth axis for the 3D view.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_axis: Option<Axis>,
    /// Initial camera for the 3D view.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera: Option<CameraEye>,
}

/// Colour of the critical state line.
const CSL_COLOR: &str = "#646ef6";
/// Colour of the normal compression line.
const NCL_COLOR: &str = "#ff9800";

/// Wrap a single series as one trace row.
fn row(values: impl IntoIterator<Item = Option<f64>>) -> Vec<Vec<Option<f64>>> {
    vec![values.into_iter().collect()]
}

/// Wrap a fully defined series as one trace row.
fn defined_row(values: &[f64]) -> Vec<Vec<Option<f64>>> {
    row(values.iter().copied().map(Some))
}

/// Build the plot for `view`.
///
/// # Errors
///
/// Returns [`CriticalStateError`] when the surface of the 3D view cannot be built.
pub fn build_view(
    view: View,
    params: &CriticalStateParams,
    data: &CriticalStateData,
    sampling: Sampling,
) -> Result<PlotSpec, CriticalStateError> {
    let csl_2d = |x, y| Trace {
        name: "Critical State Line",
        kind: "line",
        x,
        y,
        z: None,
        color: CSL_COLOR,
        width: 3.0,
        dashed: false,
    };
    let plot = match view {
        View::TauSigma => PlotSpec {
            title: "Critical State Line - Stress Space (τ vs σ)",
            traces: vec![csl_2d(defined_row(&data.sigma), defined_row(&data.tau))],
            x_axis: Axis::sigma(data.scale),
            y_axis: Axis::linear("τ (kPa)"),
            z_axis: None,
            camera: None,
        },
        View::ESigma => PlotSpec {
            title: "Critical State Line - Void Ratio Space (e vs ln σ)",
            traces: vec![
                csl_2d(defined_row(&data.sigma), row(data.e.iter().copied())),
                Trace {
                    name: "Normal Compression Line",
                    kind: "line",
                    x: defined_row(&data.sigma),
                    y: row(data.e_ncl.iter().copied()),
                    z: None,
                    color: NCL_COLOR,
                    width: 3.0,
                    dashed: true,
                },
            ],
            x_axis: Axis::sigma(data.scale),
            y_axis: Axis::linear("Void Ratio e"),
            z_axis: None,
            camera: None,
        },
        View::ThreeD => {
            let surface = CriticalStateSurface::new(params, data, sampling.grid)?;
            PlotSpec {
                title: "Critical State Line in 3D Space",
                traces: vec![
                    Trace {
                        name: "Critical State Line",
                        kind: "line3d",
                        x: defined_row(&data.sigma),
                        y: defined_row(&data.tau),
                        z: Some(row(data.e.iter().copied())),
                        color: CSL_COLOR,
                        width: 6.0,
                        dashed: false,
                    },
                    Trace {
                        name: "Normal Compression Line",
                        kind: "line3d",
                        x: defined_row(&data.sigma),
                        y: row(data.sigma.iter().map(|_| Some(0.0))),
                        z: Some(row(data.e_ncl.iter().copied())),
                        color: NCL_COLOR,
                        width: 4.0,
                        dashed: true,
                    },
                    Trace {
                        name: "Critical State Surface",
                        kind: "surface",
                        x: CriticalStateSurface::rows(&surface.sigma),
                        y: CriticalStateSurface::rows(&surface.tau),
                        z: Some(CriticalStateSurface::rows(&surface.e)),
                        color: "Viridis",
                        width: 0.0,
                        dashed: false,
                    },
                ],
                x_axis: Axis::sigma(data.scale),
                y_axis: Axis::linear("τ (kPa)"),
                z_axis: Some(Axis::linear("Void Ratio e")),
                camera: Some(CameraEye::default()),
            }
        }
    };
    Ok(plot)
}

/// Axis of the 3D scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneAxis {
    /// Normal stress.
    X,
    /// Shear stress.
    Y,
    /// Void ratio.
    Z,
}

/// Fraction of the data extent within which a click counts as "on" an axis.
const AXIS_SNAP_FRACTION: f64 = 0.1;

/// Guess which axis a click in the 3D view landed on.
///
/// A coordinate is near zero when it is within 10 % of the largest sampled
/// value along that axis; the void ratio uses an absolute 0.1 tolerance.
#[must_use]
pub fn clicked_axis(x: f64, y: f64, z: f64, data: &CriticalStateData) -> Option<SceneAxis> {
    let max_of = |values: &[f64]| values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let tau_tolerance = AXIS_SNAP_FRACTION * max_of(&data.tau);
    let sigma_tolerance = AXIS_SNAP_FRACTION * max_of(&data.sigma);

    if y.abs() < tau_tolerance && z.abs() < AXIS_SNAP_FRACTION {
        Some(SceneAxis::X)
    } else if x.abs() < sigma_tolerance && z.abs() < AXIS_SNAP_FRACTION {
        Some(SceneAxis::Y)
    } else if x.abs() < sigma_tolerance && y.abs() < AXIS_SNAP_FRACTION {
        Some(SceneAxis::Z)
    } else {
        None
    }
}

/// Camera that looks straight along `axis`.
#[must_use]
pub fn snap_camera(axis: SceneAxis) -> CameraEye {
    let (x, y, z) = match axis {
        SceneAxis::X => (2.5, 0.0, 0.0),
        SceneAxis::Y => (0.0, 2.5, 0.0),
        SceneAxis::Z => (0.0, 0.0, 2.5),
    };
    CameraEye { x, y, z }
}
