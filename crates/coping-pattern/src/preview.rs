//! 3D preview of the coped tube end.
//!
//! A parametric surface over `(u, v)` in `[0, 1]^2`: `v` goes once around the
//! tube, `u` runs along it. The first half of `u` climbs the inside wall to
//! the cut, the second half comes back down the outside wall, so the mesh is
//! a closed sleeve whose rim is the saddle the pattern produces.
//!
//! Heights use the versine form of the skew (`(r - r cos theta) / tan phi`),
//! which is zero at `theta = 0` and keeps every vertex at or below the fixed
//! [`PREVIEW_LENGTH`].

use std::f64::consts::PI;
use std::fmt::Write as _;

use tracing::debug;

use crate::error::{CopingError, Result};
use crate::generator::{angle_displacement, cutting_displacement};
use crate::params::JointParameters;

/// Grid resolution used when none is given.
pub const DEFAULT_SEGMENTS: usize = 50;

/// Length of uncut tube shown in the preview.
pub const PREVIEW_LENGTH: f64 = 4.0;

/// Quad mesh of the coped tube end.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewMesh {
    /// `(segments + 1)^2` vertices, row-major in `u` then `v`.
    pub vertices: Vec<[f64; 3]>,
    /// Quads as zero-based vertex indices, counter-clockwise.
    pub faces: Vec<[usize; 4]>,
    pub segments: usize,
}

impl PreviewMesh {
    /// Wavefront OBJ text (1-based face indices).
    pub fn to_obj(&self, name: &str) -> String {
        let mut out = String::with_capacity(self.vertices.len() * 40 + self.faces.len() * 24);
        // Writing into a String cannot fail
        let _ = writeln!(out, "# coping preview, {} segments", self.segments);
        let _ = writeln!(out, "o {}", name);
        for [x, y, z] in &self.vertices {
            let _ = writeln!(out, "v {:.6} {:.6} {:.6}", x, y, z);
        }
        for [a, b, c, d] in &self.faces {
            let _ = writeln!(out, "f {} {} {} {}", a + 1, b + 1, c + 1, d + 1);
        }
        out
    }

    /// Axis-aligned bounds as `(min, max)`.
    pub fn bounds(&self) -> ([f64; 3], [f64; 3]) {
        let mut min = [f64::INFINITY; 3];
        let mut max = [f64::NEG_INFINITY; 3];
        for v in &self.vertices {
            for k in 0..3 {
                min[k] = min[k].min(v[k]);
                max[k] = max[k].max(v[k]);
            }
        }
        (min, max)
    }
}

/// Build the preview mesh on a `segments x segments` grid.
///
/// # Errors
/// [`CopingError::Validation`] when `segments` is 0.
pub fn build_preview(params: &JointParameters, segments: usize) -> Result<PreviewMesh> {
    if segments == 0 {
        return Err(CopingError::validation("segments", "must be at least 1"));
    }

    let n = segments + 1;
    let mut vertices = Vec::with_capacity(n * n);
    for i in 0..n {
        let u = i as f64 / segments as f64;
        for j in 0..n {
            let v = j as f64 / segments as f64;
            vertices.push(surface_point(params, u, v));
        }
    }

    let mut faces = Vec::with_capacity(segments * segments);
    for i in 0..segments {
        for j in 0..segments {
            let a = i * n + j;
            let b = (i + 1) * n + j;
            faces.push([a, b, b + 1, a + 1]);
        }
    }

    debug!(vertices = vertices.len(), faces = faces.len(), "built preview mesh");

    Ok(PreviewMesh {
        vertices,
        faces,
        segments,
    })
}

fn surface_point(params: &JointParameters, u: f64, v: f64) -> [f64; 3] {
    if u < 0.5 {
        wall_point(params, params.inner_radius(), 2.0 * u, v)
    } else {
        wall_point(params, params.cut_radius(), 2.0 * (1.0 - u), v)
    }
}

/// Point on a wall of radius `radius`, `along` of the way to the cut.
fn wall_point(params: &JointParameters, radius: f64, along: f64, v: f64) -> [f64; 3] {
    let theta = v * 2.0 * PI;
    let phi = params.joint_angle_deg();

    let depth = cutting_displacement(radius, params.other_radius(), theta).unwrap_or(0.0);
    let skew = angle_displacement(phi, radius, 0.0) - angle_displacement(phi, radius, theta);
    let height = (PREVIEW_LENGTH - depth + skew).min(PREVIEW_LENGTH);

    [radius * theta.sin(), radius * theta.cos(), along * height]
}
