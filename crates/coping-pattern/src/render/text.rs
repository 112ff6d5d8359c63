//! Plain numeric listing: `"<position> <offset>\n"` per sample, six decimals.

use crate::generator::CopingPattern;

pub fn render_text(pattern: &CopingPattern) -> Vec<u8> {
    let refinement = pattern.config.refinement;
    let mut out = String::with_capacity(pattern.points.len() * 20);
    for point in &pattern.points {
        out.push_str(&format!(
            "{:.6} {:.6}\n",
            point.position,
            point.combined_offset(refinement)
        ));
    }
    out.into_bytes()
}
