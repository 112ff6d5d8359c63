//! Pattern rendering.
//!
//! The drawing sequence ([`draw_pattern`]) is written against the
//! [`Surface`] trait only. The three encoders then decide where those
//! drawing commands go:
//!
//! - `raster` - recorded as SVG, rasterised with resvg to a 1000x1000 PNG
//! - `document` - recorded as SVG on a Letter page, converted to PDF
//! - `text` - no drawing at all, one `"w offset"` line per sample
//!
//! ## Rust Lesson #12: Traits
//!
//! A trait is an interface: any type that implements `Surface` can be
//! handed to `draw_pattern`. The renderer never learns which one it got.

pub mod document;
pub mod raster;
pub mod svg;
pub mod text;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CopingError, Result};
use crate::generator::CopingPattern;
use crate::geometry::{Line, Point};

pub use document::{Orientation, render_document};
pub use raster::render_raster;
pub use svg::SvgSurface;
pub use text::render_text;

/// An opaque RGB stroke/fill color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::gray(0x00);
    /// Used for the inner (inside wall) profile.
    pub const LIGHT_GRAY: Color = Color::gray(0xaa);

    pub const fn gray(level: u8) -> Self {
        Self { r: level, g: level, b: level }
    }

    /// `#rrggbb` form for SVG attributes.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A 2D line-drawing backend.
///
/// Coordinates passed to `move_to`, `line_to` and `draw_text` are in the
/// current user space; `translate` and `scale` modify that space and
/// `save`/`restore` push and pop it along with color and line width.
pub trait Surface {
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    /// Stroke and clear the current path.
    fn stroke(&mut self);
    fn set_color(&mut self, color: Color);
    /// Line width in user-space units.
    fn set_line_width(&mut self, width: f64);
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, dx: f64, dy: f64);
    fn scale(&mut self, sx: f64, sy: f64);
    /// Draw `text` with its baseline starting at `(x, y)`.
    fn draw_text(&mut self, x: f64, y: f64, size: f64, text: &str);
}

/// Requested output encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Raster,
    Document,
}

impl OutputFormat {
    /// Get all output formats.
    pub fn all() -> &'static [OutputFormat] {
        &[OutputFormat::Text, OutputFormat::Raster, OutputFormat::Document]
    }

    /// Parse format from string.
    pub fn from_name(name: &str) -> Option<OutputFormat> {
        match name.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(OutputFormat::Text),
            "png" | "raster" => Some(OutputFormat::Raster),
            "pdf" | "document" => Some(OutputFormat::Document),
            _ => None,
        }
    }

    /// Like [`OutputFormat::from_name`] but with an error for the caller.
    pub fn parse(name: &str) -> Result<OutputFormat> {
        Self::from_name(name).ok_or_else(|| CopingError::UnsupportedFormat(name.to_string()))
    }

    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Raster => "png",
            OutputFormat::Document => "pdf",
        }
    }

    /// File extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Text => "txt",
            OutputFormat::Raster => "png",
            OutputFormat::Document => "pdf",
        }
    }

    /// MIME type of the encoded bytes.
    pub fn content_type(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text/plain",
            OutputFormat::Raster => "image/png",
            OutputFormat::Document => "application/pdf",
        }
    }
}

/// Encoded pattern, ready to write or send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub format: OutputFormat,
    pub bytes: Vec<u8>,
}

impl Output {
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }

    pub fn extension(&self) -> &'static str {
        self.format.extension()
    }
}

/// Renderer settings. Every field has a default so partial config files work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Raster canvas edge length in pixels (square canvas)
    pub raster_size: u32,
    /// Pixels per pattern unit on the raster canvas
    pub raster_scale: f64,
    /// Raster translation in pixels, applied before scaling
    pub raster_margin: f64,
    /// Document page size in inches, portrait (width, height)
    pub page_size: (f64, f64),
    /// Document margin in inches
    pub page_margin: f64,
    /// Stroke width in pattern units
    pub line_width: f64,
    /// Length of alignment notch ticks in pattern units
    pub notch_length: f64,
    /// Caption font size in pixels/points
    pub caption_size: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            raster_size: 1000,
            raster_scale: 100.0,
            raster_margin: 40.0,
            page_size: (8.5, 11.0), // US Letter
            page_margin: 0.5,
            line_width: 0.02,
            notch_length: 0.15,
            caption_size: 12.0,
        }
    }
}

/// Turns a [`CopingPattern`] into bytes.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Encode `pattern` in the requested format.
    pub fn render(&self, pattern: &CopingPattern, format: OutputFormat) -> Result<Output> {
        let bytes = match format {
            OutputFormat::Text => render_text(pattern),
            OutputFormat::Raster => render_raster(
                pattern,
                &self.config,
                self.config.raster_scale,
                Point::new(self.config.raster_margin, self.config.raster_margin),
            )?,
            OutputFormat::Document => render_document(pattern, &self.config)?,
        };

        debug!(format = format.name(), bytes = bytes.len(), "rendered pattern");
        Ok(Output { format, bytes })
    }
}

/// Caption printed above the pattern.
pub fn caption(pattern: &CopingPattern) -> String {
    format!(
        "Edge of pattern is {:.2}in from center of tube",
        pattern.layout.pattern_width
    )
}

/// Arc-length positions of the quarter marks: `0, C/4, C/2, 3C/4, C`.
pub fn quarter_positions(pattern: &CopingPattern) -> [f64; 5] {
    let c = pattern.layout.height;
    [0.0, c / 4.0, c / 2.0, 3.0 * c / 4.0, c]
}

/// Quarter marks joining the left edge to the outer edge at each quarter row.
pub fn quarter_marks(pattern: &CopingPattern) -> Vec<Line> {
    quarter_positions(pattern)
        .iter()
        .map(|&w| {
            let row = pattern.row_at(w);
            Line::new(row.left, w, row.outer, w)
        })
        .collect()
}

/// Alignment notches: a short tick at every whole unit along the top and
/// bottom edges of the pattern box.
pub fn notch_ticks(pattern: &CopingPattern, length: f64) -> Vec<Line> {
    let layout = &pattern.layout;
    let count = layout.width.floor() as usize;

    let mut ticks = Vec::with_capacity((count + 1) * 2);
    for i in 0..=count {
        let x = i as f64;
        ticks.push(Line::new(x, 0.0, x, length));
        ticks.push(Line::new(x, layout.height - length, x, layout.height));
    }
    ticks
}

/// Draw the full pattern in pattern units (1 unit = 1 inch of pipe).
///
/// Callers set up the transform first; this only draws. Order: outer
/// profile, inner profile, left edge (edge-offset only), quarter marks,
/// alignment notches.
pub fn draw_pattern<S: Surface + ?Sized>(surface: &mut S, pattern: &CopingPattern, config: &RenderConfig) {
    surface.save();
    surface.set_line_width(config.line_width);

    // outside profile
    surface.set_color(Color::BLACK);
    trace(surface, pattern.points.iter().map(|p| Point::new(p.outer, p.position)));
    surface.stroke();

    // inside profile
    surface.set_color(Color::LIGHT_GRAY);
    trace(surface, pattern.points.iter().map(|p| Point::new(p.inner, p.position)));
    surface.stroke();

    surface.set_color(Color::BLACK);
    if pattern.config.refinement.has_left_edge() {
        trace(surface, pattern.points.iter().map(|p| Point::new(p.left, p.position)));
        surface.stroke();
    }

    for line in quarter_marks(pattern) {
        surface.move_to(line.x1, line.y1);
        surface.line_to(line.x2, line.y2);
    }
    surface.stroke();

    for tick in notch_ticks(pattern, config.notch_length) {
        surface.move_to(tick.x1, tick.y1);
        surface.line_to(tick.x2, tick.y2);
    }
    surface.stroke();

    surface.restore();
}

/// Caption in the surface's current user space.
pub fn draw_caption<S: Surface + ?Sized>(surface: &mut S, pattern: &CopingPattern, at: Point, size: f64) {
    surface.save();
    surface.set_color(Color::BLACK);
    surface.draw_text(at.x, at.y, size, &caption(pattern));
    surface.restore();
}

/// Connected polyline through `points`.
fn trace<S, I>(surface: &mut S, points: I)
where
    S: Surface + ?Sized,
    I: IntoIterator<Item = Point>,
{
    let mut points = points.into_iter();
    if let Some(first) = points.next() {
        surface.move_to(first.x, first.y);
        for p in points {
            surface.line_to(p.x, p.y);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::generator::{Generator, GeneratorConfig, Refinement};
    use crate::params::JointParameters;
    use approx::assert_relative_eq;

    /// Records every call so tests can inspect the drawing sequence.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingSurface {
        pub commands: Vec<Command>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub(crate) enum Command {
        MoveTo(f64, f64),
        LineTo(f64, f64),
        Stroke,
        Color(Color),
        LineWidth(f64),
        Save,
        Restore,
        Translate(f64, f64),
        Scale(f64, f64),
        Text(String),
    }

    impl RecordingSurface {
        pub fn strokes(&self) -> usize {
            self.commands.iter().filter(|c| **c == Command::Stroke).count()
        }
    }

    impl Surface for RecordingSurface {
        fn move_to(&mut self, x: f64, y: f64) {
            self.commands.push(Command::MoveTo(x, y));
        }
        fn line_to(&mut self, x: f64, y: f64) {
            self.commands.push(Command::LineTo(x, y));
        }
        fn stroke(&mut self) {
            self.commands.push(Command::Stroke);
        }
        fn set_color(&mut self, color: Color) {
            self.commands.push(Command::Color(color));
        }
        fn set_line_width(&mut self, width: f64) {
            self.commands.push(Command::LineWidth(width));
        }
        fn save(&mut self) {
            self.commands.push(Command::Save);
        }
        fn restore(&mut self) {
            self.commands.push(Command::Restore);
        }
        fn translate(&mut self, dx: f64, dy: f64) {
            self.commands.push(Command::Translate(dx, dy));
        }
        fn scale(&mut self, sx: f64, sy: f64) {
            self.commands.push(Command::Scale(sx, sy));
        }
        fn draw_text(&mut self, _x: f64, _y: f64, _size: f64, text: &str) {
            self.commands.push(Command::Text(text.to_string()));
        }
    }

    pub(crate) fn pattern(refinement: Refinement) -> CopingPattern {
        let params = JointParameters::from_diameters(3.0, 4.0, 0.125, 60.0).unwrap();
        let config = GeneratorConfig::default().with_step(0.1).with_refinement(refinement);
        Generator::new(config).unwrap().generate(&params).unwrap()
    }

    #[test]
    fn format_names() {
        assert_eq!(OutputFormat::from_name("text"), Some(OutputFormat::Text));
        assert_eq!(OutputFormat::from_name("PNG"), Some(OutputFormat::Raster));
        assert_eq!(OutputFormat::from_name("raster"), Some(OutputFormat::Raster));
        assert_eq!(OutputFormat::from_name("pdf"), Some(OutputFormat::Document));
        assert_eq!(OutputFormat::from_name("document"), Some(OutputFormat::Document));
        assert_eq!(OutputFormat::from_name("svg"), None);
    }

    #[test]
    fn unsupported_format_error() {
        let err = OutputFormat::parse("svg").unwrap_err();
        assert!(matches!(err, CopingError::UnsupportedFormat(ref f) if f == "svg"));
    }

    #[test]
    fn content_types() {
        assert_eq!(OutputFormat::Text.content_type(), "text/plain");
        assert_eq!(OutputFormat::Raster.content_type(), "image/png");
        assert_eq!(OutputFormat::Document.content_type(), "application/pdf");
        assert_eq!(OutputFormat::Text.extension(), "txt");
        assert_eq!(OutputFormat::Raster.extension(), "png");
        assert_eq!(OutputFormat::Document.extension(), "pdf");
        for format in OutputFormat::all() {
            assert_eq!(OutputFormat::from_name(format.name()), Some(*format));
        }
    }

    #[test]
    fn color_hex() {
        assert_eq!(Color::BLACK.to_hex(), "#000000");
        assert_eq!(Color::LIGHT_GRAY.to_hex(), "#aaaaaa");
    }

    #[test]
    fn caption_reports_pattern_width() {
        let pattern = pattern(Refinement::EdgeOffset);
        assert_eq!(caption(&pattern), "Edge of pattern is 6.00in from center of tube");
    }

    #[test]
    fn five_quarter_marks_span_the_circumference() {
        let pattern = pattern(Refinement::Clamped);
        let marks = quarter_marks(&pattern);
        assert_eq!(marks.len(), 5);
        assert_eq!(marks[0].y1, 0.0);
        assert_relative_eq!(marks[4].y1, pattern.layout.height);
        for mark in &marks {
            assert_eq!(mark.y1, mark.y2); // horizontal
        }
    }

    #[test]
    fn quarter_marks_join_left_and_outer_edge() {
        let pattern = pattern(Refinement::EdgeOffset);
        for (mark, &w) in quarter_marks(&pattern).iter().zip(quarter_positions(&pattern).iter()) {
            let row = pattern.row_at(w);
            assert_eq!(mark.x1, row.left);
            assert_eq!(mark.x2, row.outer);
        }
    }

    #[test]
    fn notches_at_every_whole_unit() {
        // Clamped: width 6 -> ticks at 0..=6 on both edges
        let pattern = pattern(Refinement::Clamped);
        let ticks = notch_ticks(&pattern, 0.15);
        assert_eq!(ticks.len(), 14);
        for tick in &ticks {
            assert_eq!(tick.x1, tick.x1.round());
            assert_eq!(tick.x1, tick.x2);
            assert_relative_eq!(tick.y2 - tick.y1, 0.15, epsilon = 1e-9);
        }
        assert!(ticks.iter().any(|t| t.y1 == 0.0));
        assert!(ticks.iter().any(|t| (t.y2 - pattern.layout.height).abs() < 1e-12));
    }

    #[test]
    fn draw_sequence_for_edge_offset() {
        let pattern = pattern(Refinement::EdgeOffset);
        let mut surface = RecordingSurface::default();
        draw_pattern(&mut surface, &pattern, &RenderConfig::default());

        // outer, inner, left edge, quarter marks, notches
        assert_eq!(surface.strokes(), 5);
        assert_eq!(surface.commands.first(), Some(&Command::Save));
        assert_eq!(surface.commands.last(), Some(&Command::Restore));
        assert!(surface.commands.contains(&Command::Color(Color::LIGHT_GRAY)));

        let first_move = surface.commands.iter().find_map(|c| match c {
            Command::MoveTo(x, y) => Some((*x, *y)),
            _ => None,
        });
        assert_eq!(first_move, Some((pattern.points[0].outer, 0.0)));
    }

    #[test]
    fn additive_policies_skip_left_edge() {
        let pattern = pattern(Refinement::Clamped);
        let mut surface = RecordingSurface::default();
        draw_pattern(&mut surface, &pattern, &RenderConfig::default());
        assert_eq!(surface.strokes(), 4);
    }

    #[test]
    fn profiles_visit_every_sample() {
        let pattern = pattern(Refinement::Unclamped);
        let mut surface = RecordingSurface::default();
        draw_pattern(&mut surface, &pattern, &RenderConfig::default());

        let line_tos = surface
            .commands
            .iter()
            .filter(|c| matches!(c, Command::LineTo(..)))
            .count();
        let n = pattern.points.len();
        let marks = 5;
        let notches = notch_ticks(&pattern, 0.15).len();
        // (n - 1) segments per profile, two profiles
        assert_eq!(line_tos, 2 * (n - 1) + marks + notches);
    }

    #[test]
    fn caption_is_drawn_as_text() {
        let pattern = pattern(Refinement::EdgeOffset);
        let mut surface = RecordingSurface::default();
        draw_caption(&mut surface, &pattern, Point::new(10.0, 20.0), 12.0);
        assert!(surface.commands.contains(&Command::Text(caption(&pattern))));
    }

    #[test]
    fn text_render_does_not_draw() {
        let pattern = pattern(Refinement::EdgeOffset);
        let output = Renderer::default().render(&pattern, OutputFormat::Text).unwrap();
        assert_eq!(output.content_type(), "text/plain");
        assert_eq!(String::from_utf8(output.bytes).unwrap().lines().count(), pattern.points.len());
    }
}
