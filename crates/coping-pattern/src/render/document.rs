//! PDF output on a printable page.
//!
//! The page is recorded as SVG in points (svg2pdf maps 1 SVG pixel to 1pt
//! at its default 72 dpi) and converted with svg2pdf. The pattern is drawn
//! at true size: one pattern unit is one inch on paper.

use svg2pdf::{ConversionOptions, PageOptions};

use super::raster::parse_svg;
use super::{RenderConfig, Surface, SvgSurface, draw_caption, draw_pattern};
use crate::error::{CopingError, Result};
use crate::generator::{CopingPattern, Layout};
use crate::geometry::Point;

pub const POINTS_PER_INCH: f64 = 72.0;

/// Page orientation, picked from the pattern's aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    /// Landscape when the pattern box is wider than tall.
    pub fn for_layout(layout: &Layout) -> Orientation {
        if layout.width > layout.height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }

    /// Page size in inches for a portrait `(width, height)` page.
    pub fn page_size(&self, portrait: (f64, f64)) -> (f64, f64) {
        let (w, h) = portrait;
        match self {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }
}

/// Draw `pattern` on a single page and encode it as PDF.
pub fn render_document(pattern: &CopingPattern, config: &RenderConfig) -> Result<Vec<u8>> {
    let tree = page_tree(pattern, config)?;
    svg2pdf::to_pdf(&tree, ConversionOptions::default(), PageOptions::default())
        .map_err(|e| CopingError::Encoding(e.to_string()))
}

/// The page as a usvg tree, ready for conversion.
pub(crate) fn page_tree(pattern: &CopingPattern, config: &RenderConfig) -> Result<usvg::Tree> {
    let orientation = Orientation::for_layout(&pattern.layout);
    let (page_w, page_h) = orientation.page_size(config.page_size);

    let mut surface = SvgSurface::new(page_w * POINTS_PER_INCH, page_h * POINTS_PER_INCH);

    let margin = config.page_margin * POINTS_PER_INCH;
    draw_caption(
        &mut surface,
        pattern,
        Point::new(margin, margin + config.caption_size),
        config.caption_size,
    );

    // Pattern starts one caption line below the caption baseline
    let top = config.page_margin + 2.0 * config.caption_size / POINTS_PER_INCH;
    surface.save();
    surface.scale(POINTS_PER_INCH, POINTS_PER_INCH);
    surface.translate(config.page_margin, top);
    draw_pattern(&mut surface, pattern, config);
    surface.restore();

    parse_svg(&surface.finish())
}
