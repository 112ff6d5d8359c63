//! PNG output.
//!
//! The pattern is drawn onto an [`SvgSurface`], parsed back with usvg and
//! rasterised with resvg onto a white `tiny_skia::Pixmap`.

use std::sync::{Arc, OnceLock};

use tiny_skia::Pixmap;
use tracing::debug;

use super::{RenderConfig, Surface, SvgSurface, draw_caption, draw_pattern};
use crate::error::{CopingError, Result};
use crate::generator::CopingPattern;
use crate::geometry::Point;

/// Caption baseline on the raster canvas, in pixels.
const CAPTION_POSITION: Point = Point { x: 10.0, y: 24.0 };

static FONTS: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();

/// usvg options with the system fonts loaded (once per process).
///
/// The caption asks for the generic `monospace` family. fontdb maps that to
/// "Courier New" unless told otherwise, so when that face is missing the
/// first installed monospaced family (or failing that, any family) takes
/// its place.
pub(crate) fn svg_options() -> usvg::Options<'static> {
    let fonts = FONTS.get_or_init(|| {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        if let Some(family) = monospace_fallback(&db) {
            debug!(family = %family, "using installed face for monospace");
            db.set_monospace_family(family);
        }
        debug!(faces = db.len(), "loaded system fonts");
        Arc::new(db)
    });

    let mut options = usvg::Options::default();
    options.fontdb = Arc::clone(fonts);
    options
}

/// Replacement for the generic monospace family, or `None` when the
/// default already resolves.
fn monospace_fallback(db: &usvg::fontdb::Database) -> Option<String> {
    let query = usvg::fontdb::Query {
        families: &[usvg::fontdb::Family::Monospace],
        ..Default::default()
    };
    if db.query(&query).is_some() {
        return None;
    }

    let first_family = |monospaced: bool| {
        db.faces()
            .filter(|face| face.monospaced == monospaced)
            .filter_map(|face| face.families.first().map(|(name, _)| name.clone()))
            .min()
    };
    first_family(true).or_else(|| first_family(false))
}

/// True when any text node survived parsing under `group`.
pub(crate) fn contains_text(group: &usvg::Group) -> bool {
    group.children().iter().any(|node| match node {
        usvg::Node::Text(_) => true,
        usvg::Node::Group(child) => contains_text(child),
        _ => false,
    })
}

/// Parse SVG text produced by an [`SvgSurface`].
///
/// usvg drops `<text>` it cannot lay out. A caption that vanishes that way
/// is an error rather than a silently blank header.
pub(crate) fn parse_svg(svg: &str) -> Result<usvg::Tree> {
    let tree = usvg::Tree::from_str(svg, &svg_options())
        .map_err(|e| CopingError::Encoding(e.to_string()))?;

    if svg.contains("<text") && !contains_text(tree.root()) {
        return Err(CopingError::Encoding(
            "caption could not be laid out: no usable font face".into(),
        ));
    }
    Ok(tree)
}

/// Draw `pattern` on the square raster canvas and encode it as PNG.
///
/// Pattern coordinates are multiplied by `scale` (pixels per unit) and then
/// shifted by `margin` pixels.
pub fn render_raster(
    pattern: &CopingPattern,
    config: &RenderConfig,
    scale: f64,
    margin: Point,
) -> Result<Vec<u8>> {
    let size = config.raster_size;
    let mut surface = SvgSurface::new(size as f64, size as f64);

    surface.save();
    surface.translate(margin.x, margin.y);
    surface.scale(scale, scale);
    draw_pattern(&mut surface, pattern, config);
    surface.restore();

    draw_caption(&mut surface, pattern, CAPTION_POSITION, config.caption_size);

    rasterize(&surface.finish(), size, size)
}

/// Render SVG text to PNG bytes at its native size.
pub fn rasterize(svg: &str, width: u32, height: u32) -> Result<Vec<u8>> {
    let tree = parse_svg(svg)?;

    let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
        CopingError::Encoding(format!("could not create {}x{} pixmap", width, height))
    })?;

    // Fill with white background
    pixmap.fill(tiny_skia::Color::WHITE);
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    pixmap.encode_png().map_err(|e| CopingError::Encoding(e.to_string()))
}
