//! Render-agnostic drawing of Mohr's circle diagrams.
//!
//! Calculators never touch a display. They describe a diagram through the
//! [`Canvas`] trait, which can be recorded for tests ([`CommandRecorder`]) or
//! written out as a standalone SVG document ([`SvgCanvas`]).

use std::fmt::Write;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::analysis::{MohrAnalysis, Safety};
use crate::geometry::StressPoint;
use crate::mohr::StressState;

/// Spacing between axis ticks in stress units.
pub const AXIS_TICK_SPACING: f64 = 20.0;

/// Number of ticks drawn on each side of the origin.
pub const AXIS_TICKS: i32 = 5;

/// Radius of the marker for the stress on the cutting plane, in pixels.
pub const STRESS_POINT_RADIUS: f64 = 5.0;

/// Position on the drawing surface in pixels, `y` growing downwards.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pixel {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

impl Pixel {
    /// Create a pixel position.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<Vector2<f64>> for Pixel {
    fn from(value: Vector2<f64>) -> Self {
        Self::new(value.x, value.y)
    }
}

/// RGBA colour.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Opacity in `[0, 1]`.
    pub alpha: f64,
}

impl Color {
    /// Outline of Mohr's circle and text.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Axes and ticks.
    pub const GREY: Self = Self::rgb(0x88, 0x88, 0x88);
    /// Stress on the cutting plane.
    pub const RED: Self = Self::rgb(0xff, 0, 0);
    /// Failure envelope.
    pub const BLUE: Self = Self::rgb(0, 0, 0xff);
    /// Shading of the failure zone.
    pub const FAILURE_ZONE: Self = Self {
        alpha: 0.1,
        ..Self::BLUE
    };

    /// Opaque colour from its channels.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, alpha: 1.0 }
    }

    /// CSS/SVG colour string.
    #[must_use]
    pub fn to_css(&self) -> String {
        if self.alpha >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.alpha)
        }
    }
}

/// How a closed shape is painted.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "color", rename_all = "snake_case")]
pub enum Paint {
    /// Outline only.
    Stroke(Color),
    /// Solid interior.
    Fill(Color),
}

/// Minimal set of primitives a diagram is built from.
pub trait Canvas {
    /// Draw a straight segment.
    fn draw_line(&mut self, from: Pixel, to: Pixel, color: Color);

    /// Draw a circle.
    fn draw_circle(&mut self, center: Pixel, radius: f64, paint: Paint);

    /// Draw a text label anchored at its baseline start.
    fn draw_text(&mut self, at: Pixel, text: &str, color: Color);

    /// Fill a closed polygon.
    fn fill_polygon(&mut self, points: &[Pixel], color: Color);
}

/// A single recorded drawing call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    /// See [`Canvas::draw_line`].
    Line {
        /// Start of the segment.
        from: Pixel,
        /// End of the segment.
        to: Pixel,
        /// Stroke colour.
        color: Color,
    },
    /// See [`Canvas::draw_circle`].
    Circle {
        /// Centre of the circle.
        center: Pixel,
        /// Radius in pixels.
        radius: f64,
        /// Stroke or fill.
        paint: Paint,
    },
    /// See [`Canvas::draw_text`].
    Text {
        /// Anchor of the label.
        at: Pixel,
        /// Label content.
        text: String,
        /// Fill colour.
        color: Color,
    },
    /// See [`Canvas::fill_polygon`].
    Polygon {
        /// Vertices in drawing order.
        points: Vec<Pixel>,
        /// Fill colour.
        color: Color,
    },
}

/// Canvas that stores every call, for inspection and serialization.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CommandRecorder {
    /// Recorded calls in order.
    pub commands: Vec<DrawCommand>,
}

impl CommandRecorder {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded text labels, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Canvas for CommandRecorder {
    fn draw_line(&mut self, from: Pixel, to: Pixel, color: Color) {
        self.commands.push(DrawCommand::Line { from, to, color });
    }

    fn draw_circle(&mut self, center: Pixel, radius: f64, paint: Paint) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            paint,
        });
    }

    fn draw_text(&mut self, at: Pixel, text: &str, color: Color) {
        self.commands.push(DrawCommand::Text {
            at,
            text: text.to_owned(),
            color,
        });
    }

    fn fill_polygon(&mut self, points: &[Pixel], color: Color) {
        self.commands.push(DrawCommand::Polygon {
            points: points.to_vec(),
            color,
        });
    }
}

/// Escape the characters SVG text content cannot hold literally.
fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Canvas that accumulates an SVG document.
#[derive(Clone, Debug)]
pub struct SvgCanvas {
    /// Document width in pixels.
    width: f64,
    /// Document height in pixels.
    height: f64,
    /// Serialized elements.
    body: String,
}

impl SvgCanvas {
    /// Create an empty document of the viewport's size.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            width: viewport.width,
            height: viewport.height,
            body: String::new(),
        }
    }

    /// Close the document and return it.
    #[must_use]
    pub fn finish(self) -> String {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n{body}</svg>\n",
            w = self.width,
            h = self.height,
            body = self.body
        )
    }
}

impl Canvas for SvgCanvas {
    fn draw_line(&mut self, from: Pixel, to: Pixel, color: Color) {
        writeln!(
            &mut self.body,
            "  <line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\"/>",
            from.x,
            from.y,
            to.x,
            to.y,
            color.to_css()
        )
        .expect("writing to string cannot fail");
    }

    fn draw_circle(&mut self, center: Pixel, radius: f64, paint: Paint) {
        let style = match paint {
            Paint::Stroke(color) => format!("fill=\"none\" stroke=\"{}\"", color.to_css()),
            Paint::Fill(color) => format!("fill=\"{}\"", color.to_css()),
        };
        writeln!(
            &mut self.body,
            "  <circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" {style}/>",
            center.x, center.y, radius
        )
        .expect("writing to string cannot fail");
    }

    fn draw_text(&mut self, at: Pixel, text: &str, color: Color) {
        writeln!(
            &mut self.body,
            "  <text x=\"{:.2}\" y=\"{:.2}\" fill=\"{}\" font-size=\"10\">{}</text>",
            at.x,
            at.y,
            color.to_css(),
            escape_xml(text)
        )
        .expect("writing to string cannot fail");
    }

    fn fill_polygon(&mut self, points: &[Pixel], color: Color) {
        let vertices = points
            .iter()
            .map(|point| format!("{:.2},{:.2}", point.x, point.y))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(
            &mut self.body,
            "  <polygon points=\"{vertices}\" fill=\"{}\"/>",
            color.to_css()
        )
        .expect("writing to string cannot fail");
    }
}

/// Size of the drawing surface in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(600.0, 600.0)
    }
}

impl Viewport {
    /// Create a viewport.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Centre of the surface, where the stress origin is drawn.
    #[must_use]
    pub fn origin(&self) -> Vector2<f64> {
        Vector2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Map stress space onto the surface with equal scaling on both axes so
    /// that `[−extent, extent]` spans the shorter side.
    #[must_use]
    pub fn stress_transform(&self, extent: f64) -> StressTransform {
        StressTransform {
            origin: self.origin(),
            scale: self.width.min(self.height) / 2.0 / extent,
        }
    }
}

/// Affine map from stress coordinates to pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StressTransform {
    /// Pixel position of `σ = 0, τ = 0`.
    origin: Vector2<f64>,
    /// Pixels per stress unit.
    scale: f64,
}

impl StressTransform {
    /// Pixels per stress unit.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Pixel position of a stress point; τ is drawn upwards.
    #[must_use]
    pub fn map(&self, point: StressPoint) -> Pixel {
        let offset = Vector2::new(point.sigma, -point.tau) * self.scale;
        Pixel::from(self.origin + offset)
    }
}

/// Draw both axes with their labels and ticks.
fn draw_axes(canvas: &mut impl Canvas, viewport: Viewport, transform: &StressTransform) {
    let origin = viewport.origin();
    let (cx, cy) = (origin.x, origin.y);

    canvas.draw_line(Pixel::new(0.0, cy), Pixel::new(viewport.width, cy), Color::GREY);
    canvas.draw_line(Pixel::new(cx, 0.0), Pixel::new(cx, viewport.height), Color::GREY);
    canvas.draw_text(
        Pixel::new(viewport.width - 50.0, cy - 10.0),
        "σ (Stress)",
        Color::BLACK,
    );
    canvas.draw_text(Pixel::new(cx + 10.0, 20.0), "τ (Shear)", Color::BLACK);

    let step = AXIS_TICK_SPACING * transform.scale();
    for i in -AXIS_TICKS..=AXIS_TICKS {
        let value = f64::from(i) * AXIS_TICK_SPACING;
        let label = format!("{value}");

        let x = cx + f64::from(i) * step;
        canvas.draw_line(Pixel::new(x, cy - 5.0), Pixel::new(x, cy + 5.0), Color::GREY);
        canvas.draw_text(Pixel::new(x - 10.0, cy + 20.0), &label, Color::BLACK);

        let y = cy - f64::from(i) * step;
        canvas.draw_line(Pixel::new(cx - 5.0, y), Pixel::new(cx + 5.0, y), Color::GREY);
        canvas.draw_text(Pixel::new(cx + 10.0, y + 5.0), &label, Color::BLACK);
    }
}

/// Label shown instead of a number when a result is not defined.
pub const UNDEFINED_LABEL: &str = "undefined / invalid input";

/// Draw a complete Mohr's circle diagram for an analysis.
///
/// The circle, axes, plane stress marker, both envelope lines and the shaded
/// failure zone are drawn in that order. An undefined factor of safety adds a
/// text label; no shape is ever drawn from a non-finite coordinate.
///
/// # Examples
/// ```
/// use soilx::{analyse, render_mohr_diagram, CommandRecorder, StressState, Viewport};
///
/// let analysis = analyse(&StressState::default()).expect("valid state");
/// let mut canvas = CommandRecorder::new();
/// render_mohr_diagram(&analysis, Viewport::default(), &mut canvas);
/// assert!(!canvas.commands.is_empty());
/// ```
pub fn render_mohr_diagram(analysis: &MohrAnalysis, viewport: Viewport, canvas: &mut impl Canvas) {
    let transform = viewport.stress_transform(analysis.range.extent());

    let circle = analysis.circle;
    canvas.draw_circle(
        transform.map(circle.center_point()),
        circle.radius * transform.scale(),
        Paint::Stroke(Color::BLACK),
    );
    draw_axes(canvas, viewport, &transform);

    canvas.draw_circle(
        transform.map(analysis.plane_stress()),
        STRESS_POINT_RADIUS,
        Paint::Fill(Color::RED),
    );

    let envelope = &analysis.envelope;
    let upper = envelope.upper.map(|point| transform.map(point));
    let lower = envelope.lower.map(|point| transform.map(point));
    canvas.draw_line(upper[0], upper[1], Color::BLUE);
    canvas.draw_line(lower[0], lower[1], Color::BLUE);
    let zone: Vec<Pixel> = envelope
        .failure_zone()
        .into_iter()
        .map(|point| transform.map(point))
        .collect();
    canvas.fill_polygon(&zone, Color::FAILURE_ZONE);

    if let Safety::Undefined { reason } = analysis.safety {
        canvas.draw_text(
            Pixel::new(10.0, 40.0),
            &format!("Factor of safety: {UNDEFINED_LABEL} ({reason})"),
            Color::RED,
        );
    }
}

/// Draw the axes and an explanation for a state that could not be analysed.
pub fn render_rejected(
    state: &StressState,
    reason: &impl std::fmt::Display,
    viewport: Viewport,
    canvas: &mut impl Canvas,
) {
    let transform = viewport.stress_transform(state.plot_range().extent());
    draw_axes(canvas, viewport, &transform);
    canvas.draw_text(
        Pixel::new(10.0, 40.0),
        &format!("{UNDEFINED_LABEL}: {reason}"),
        Color::RED,
    );
}
