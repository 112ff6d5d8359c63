//! SVG drawing surface.
//!
//! Records drawing commands as an SVG document in device units. The
//! transform stack is kept on the CPU side (a `tiny_skia::Transform`), so
//! every emitted coordinate is already final and the document has no
//! nested `transform` attributes.

use tiny_skia::Transform;

use super::{Color, Surface};

/// Graphics state saved and restored by `save`/`restore`.
#[derive(Debug, Clone, Copy)]
struct State {
    transform: Transform,
    color: Color,
    line_width: f64,
}

impl Default for State {
    fn default() -> Self {
        Self {
            transform: Transform::identity(),
            color: Color::BLACK,
            line_width: 1.0,
        }
    }
}

/// A [`Surface`] that builds an SVG string.
#[derive(Debug)]
pub struct SvgSurface {
    width: f64,
    height: f64,
    body: String,
    path: String,
    state: State,
    stack: Vec<State>,
}

impl SvgSurface {
    /// New white canvas of `width` x `height` device units.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            body: String::new(),
            path: String::new(),
            state: State::default(),
            stack: Vec::new(),
        }
    }

    /// Close the document and return the SVG text.
    ///
    /// Any path that was never stroked is dropped.
    pub fn finish(self) -> String {
        let mut svg = String::with_capacity(self.body.len() + 256);
        svg.push_str(&format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">
<rect width="100%" height="100%" fill="white"/>
"#,
            self.width, self.height, self.width, self.height
        ));
        svg.push_str(&self.body);
        svg.push_str("</svg>\n");
        svg
    }

    fn map(&self, x: f64, y: f64) -> (f64, f64) {
        let ts = &self.state.transform;
        let (x, y) = (x as f32, y as f32);
        (
            (x * ts.sx + y * ts.kx + ts.tx) as f64,
            (x * ts.ky + y * ts.sy + ts.ty) as f64,
        )
    }

    /// Length scale of the current transform (for stroke widths, font sizes).
    fn scale_factor(&self) -> f64 {
        let ts = &self.state.transform;
        ((ts.sx * ts.sx + ts.ky * ts.ky) as f64).sqrt()
    }
}

impl Surface for SvgSurface {
    fn move_to(&mut self, x: f64, y: f64) {
        let (x, y) = self.map(x, y);
        if !self.path.is_empty() {
            self.path.push(' ');
        }
        self.path.push_str(&format!("M{:.2},{:.2}", x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        let (x, y) = self.map(x, y);
        self.path.push_str(&format!(" L{:.2},{:.2}", x, y));
    }

    fn stroke(&mut self) {
        if self.path.is_empty() {
            return;
        }
        let width = self.state.line_width * self.scale_factor();
        self.body.push_str(&format!(
            "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{:.3}\" stroke-linecap=\"round\" stroke-linejoin=\"round\"/>\n",
            self.path,
            self.state.color.to_hex(),
            width
        ));
        self.path.clear();
    }

    fn set_color(&mut self, color: Color) {
        self.state.color = color;
    }

    fn set_line_width(&mut self, width: f64) {
        self.state.line_width = width;
    }

    fn save(&mut self) {
        self.stack.push(self.state);
    }

    fn restore(&mut self) {
        // Unbalanced restore keeps the current state
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.state.transform = self.state.transform.pre_translate(dx as f32, dy as f32);
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.state.transform = self.state.transform.pre_scale(sx as f32, sy as f32);
    }

    fn draw_text(&mut self, x: f64, y: f64, size: f64, text: &str) {
        let (x, y) = self.map(x, y);
        self.body.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" font-family=\"monospace\" font-weight=\"bold\" font-size=\"{:.2}\" fill=\"{}\">{}</text>\n",
            x,
            y,
            size * self.scale_factor(),
            self.state.color.to_hex(),
            escape(text)
        ));
    }
}

/// Escape text content for XML.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document() {
        let svg = SvgSurface::new(100.0, 50.0).finish();
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains(r#"viewBox="0 0 100 50""#));
        assert!(svg.contains("fill=\"white\""));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(!svg.contains("<path"));
    }

    #[test]
    fn stroke_emits_path() {
        let mut surface = SvgSurface::new(100.0, 100.0);
        surface.move_to(1.0, 2.0);
        surface.line_to(3.0, 4.0);
        surface.stroke();
        let svg = surface.finish();
        assert!(svg.contains(r#"d="M1.00,2.00 L3.00,4.00""#));
    }

    #[test]
    fn transform_is_applied_to_coordinates() {
        let mut surface = SvgSurface::new(1000.0, 1000.0);
        surface.translate(40.0, 40.0);
        surface.scale(100.0, 100.0);
        surface.set_line_width(0.02);
        surface.move_to(0.0, 0.0);
        surface.line_to(1.5, 2.0);
        surface.stroke();
        let svg = surface.finish();
        assert!(svg.contains("M40.00,40.00 L190.00,240.00"), "{}", svg);
        assert!(svg.contains(r#"stroke-width="2.000""#));
    }

    #[test]
    fn restore_pops_transform_and_color() {
        let mut surface = SvgSurface::new(100.0, 100.0);
        surface.save();
        surface.translate(10.0, 10.0);
        surface.set_color(Color::LIGHT_GRAY);
        surface.restore();
        surface.move_to(0.0, 0.0);
        surface.line_to(1.0, 0.0);
        surface.stroke();
        let svg = surface.finish();
        assert!(svg.contains("M0.00,0.00 L1.00,0.00"));
        assert!(svg.contains(r##"stroke="#000000""##));
    }

    #[test]
    fn unbalanced_restore_is_ignored() {
        let mut surface = SvgSurface::new(10.0, 10.0);
        surface.scale(2.0, 2.0);
        surface.restore();
        surface.move_to(1.0, 1.0);
        surface.line_to(2.0, 2.0);
        surface.stroke();
        assert!(surface.finish().contains("M2.00,2.00 L4.00,4.00"));
    }

    #[test]
    fn stroke_without_path_is_noop() {
        let mut surface = SvgSurface::new(10.0, 10.0);
        surface.stroke();
        assert!(!surface.finish().contains("<path"));
    }

    #[test]
    fn text_is_escaped() {
        let mut surface = SvgSurface::new(100.0, 100.0);
        surface.draw_text(10.0, 20.0, 12.0, "a < b & c");
        let svg = surface.finish();
        assert!(svg.contains("a &lt; b &amp; c"));
        assert!(svg.contains(r#"font-size="12.00""#));
    }

    #[test]
    fn generated_svg_parses() {
        let mut surface = SvgSurface::new(200.0, 100.0);
        surface.scale(10.0, 10.0);
        surface.move_to(1.0, 1.0);
        surface.line_to(5.0, 5.0);
        surface.stroke();
        let svg = surface.finish();
        let tree = usvg::Tree::from_str(&svg, &usvg::Options::default()).unwrap();
        assert_eq!(tree.size().width(), 200.0);
    }
}
