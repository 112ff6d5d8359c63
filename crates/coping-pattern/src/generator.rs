//! Cut-curve generation.
//!
//! The cut tube is unrolled: walking around its circumference by arc length
//! `w` sweeps the angle `theta = w / r`. At each angle two things push the
//! cut line sideways:
//!
//! 1. **Cutting displacement** - the other tube's round surface. At lateral
//!    offset `x = r * sin(theta)` from the cut tube's axis the other tube
//!    recedes by the half-chord `sqrt(R^2 - x^2)`.
//! 2. **Angle displacement** - the skew of a non-perpendicular joint, the
//!    rise of a plane tilted at `phi`: `r * cos(theta) / tan(phi)`.
//!
//! How the two are combined into printable edges is a [`Refinement`]
//! policy. The generator is a pure function of its inputs; a fresh sample
//! sequence is produced for every call.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CopingError, Result};
use crate::params::JointParameters;

/// Default arc-length sampling step, about 380 samples around a tube of radius 1.5.
pub const DEFAULT_STEP: f64 = 0.025;

/// Upper bound on samples per pattern. A step this fine is far below
/// anything a printer can resolve.
pub const MAX_SAMPLES: usize = 1_000_000;

/// How displacement terms are combined into pattern edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Refinement {
    /// `d = (D - cutting) + angle`, no bounds applied.
    Unclamped,
    /// Like `Unclamped` but every edge is held inside `[0, D]`.
    Clamped,
    /// Separate left and right edges, both shifted by a layout margin
    /// (`D / 4`) reserved for the skew, and held inside the pattern box.
    #[default]
    EdgeOffset,
}

impl Refinement {
    /// Get all refinement policies.
    pub fn all() -> &'static [Refinement] {
        &[Refinement::Unclamped, Refinement::Clamped, Refinement::EdgeOffset]
    }

    /// Get policy name as string.
    pub fn name(&self) -> &'static str {
        match self {
            Refinement::Unclamped => "unclamped",
            Refinement::Clamped => "clamped",
            Refinement::EdgeOffset => "edge-offset",
        }
    }

    /// Brief description for listings.
    pub fn description(&self) -> &'static str {
        match self {
            Refinement::Unclamped => "Additive profile, may run off the pattern",
            Refinement::Clamped => "Additive profile held inside the pattern width",
            Refinement::EdgeOffset => "Separate left/right edges with a skew margin",
        }
    }

    /// Parse policy from string.
    pub fn from_name(name: &str) -> Option<Refinement> {
        match name.to_lowercase().as_str() {
            "unclamped" | "additive" => Some(Refinement::Unclamped),
            "clamped" => Some(Refinement::Clamped),
            "edge-offset" | "edge_offset" | "edge" => Some(Refinement::EdgeOffset),
            _ => None,
        }
    }

    /// Whether the left edge moves with the skew (and is worth drawing).
    pub fn has_left_edge(&self) -> bool {
        matches!(self, Refinement::EdgeOffset)
    }
}

/// What the cutting displacement is where the tubes do not overlap
/// (`|r * sin(theta)| >= R`, only possible when the cut tube is the larger).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NonOverlap {
    /// No displacement: the edge sits at the full pattern width.
    #[default]
    Flush,
    /// Displacement equals the pattern width: the edge falls back to zero.
    FullWidth,
}

impl NonOverlap {
    pub fn name(&self) -> &'static str {
        match self {
            NonOverlap::Flush => "flush",
            NonOverlap::FullWidth => "full-width",
        }
    }

    pub fn from_name(name: &str) -> Option<NonOverlap> {
        match name.to_lowercase().as_str() {
            "flush" | "zero" => Some(NonOverlap::Flush),
            "full-width" | "full_width" | "width" => Some(NonOverlap::FullWidth),
            _ => None,
        }
    }

    /// Turn an optional intersection depth into a displacement.
    #[inline]
    pub fn resolve(&self, depth: Option<f64>, pattern_width: f64) -> f64 {
        match (depth, self) {
            (Some(depth), _) => depth,
            (None, NonOverlap::Flush) => 0.0,
            (None, NonOverlap::FullWidth) => pattern_width,
        }
    }
}

/// Generator settings. Every field has a default so partial config files work.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Arc-length distance between samples. Smaller = smoother, more points.
    pub step: f64,
    pub refinement: Refinement,
    pub non_overlap: NonOverlap,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            step: DEFAULT_STEP,
            refinement: Refinement::default(),
            non_overlap: NonOverlap::default(),
        }
    }
}

impl GeneratorConfig {
    /// Create a new config with specified step.
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    /// Create a new config with specified refinement policy.
    pub fn with_refinement(mut self, refinement: Refinement) -> Self {
        self.refinement = refinement;
        self
    }

    /// Create a new config with specified non-overlap policy.
    pub fn with_non_overlap(mut self, non_overlap: NonOverlap) -> Self {
        self.non_overlap = non_overlap;
        self
    }
}

/// One row of the pattern.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SamplePoint {
    /// Arc length around the cut tube, `[0, 2*pi*r)`.
    pub position: f64,
    /// Horizontal position of the outer cut edge.
    pub outer: f64,
    /// Horizontal position of the inner cut edge.
    pub inner: f64,
    /// Skew-only component of the displacement.
    pub angle: f64,
    /// Horizontal position of the left (reference) edge.
    pub left: f64,
}

impl SamplePoint {
    /// Outer offset with the skew counted exactly once.
    ///
    /// The additive policies already add the skew into `outer`; the
    /// edge-offset policy subtracts it, so it is added back here.
    pub fn combined_offset(&self, refinement: Refinement) -> f64 {
        match refinement {
            Refinement::Unclamped | Refinement::Clamped => self.outer,
            Refinement::EdgeOffset => self.outer + self.angle,
        }
    }
}

/// The rectangle a pattern occupies, in pattern units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Layout {
    /// Nominal pattern width (D).
    pub pattern_width: f64,
    /// Margin reserved on each side for skew (0 for additive policies).
    pub offset: f64,
    /// Full horizontal extent: `D + 2 * offset`.
    pub width: f64,
    /// Unrolled circumference of the cut tube.
    pub height: f64,
}

/// A generated pattern: the inputs plus the ordered samples.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CopingPattern {
    pub params: JointParameters,
    pub config: GeneratorConfig,
    pub layout: Layout,
    pub points: Vec<SamplePoint>,
}

impl CopingPattern {
    /// Evaluate a single row at arc length `w`, outside the sampled grid.
    ///
    /// Used for the quarter marks, which must land on exact positions.
    pub fn row_at(&self, w: f64) -> SamplePoint {
        Generator {
            config: self.config,
        }
        .sample_at(&self.params, w)
    }
}

/// Half-chord depth of the other tube at this angle.
///
/// Returns `None` where the tubes do not overlap.
#[inline]
pub fn cutting_displacement(radius: f64, other_radius: f64, theta: f64) -> Option<f64> {
    let x = radius * theta.sin();
    if x.abs() < other_radius {
        Some((other_radius * other_radius - x * x).sqrt())
    } else {
        None
    }
}

/// Skew of a joint at `joint_angle_deg`, projected onto the circumference.
///
/// Zero for a perpendicular joint and at the quarter points
/// (`cos(theta) = 0`).
#[inline]
pub fn angle_displacement(joint_angle_deg: f64, radius: f64, theta: f64) -> f64 {
    if joint_angle_deg == 90.0 {
        return 0.0;
    }
    let phi = joint_angle_deg * PI / 180.0;
    radius * theta.cos() / phi.tan()
}

/// Maps [`JointParameters`] to a [`CopingPattern`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    /// # Errors
    /// [`CopingError::Validation`] when the step is not a positive finite
    /// number.
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        if !config.step.is_finite() || config.step <= 0.0 {
            return Err(CopingError::validation(
                "step",
                format!("must be a positive number, got {}", config.step),
            ));
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// The pattern box for these parameters under the current policy.
    pub fn layout(&self, params: &JointParameters) -> Layout {
        let pattern_width = params.pattern_width();
        let offset = match self.config.refinement {
            Refinement::EdgeOffset => pattern_width / 4.0,
            Refinement::Unclamped | Refinement::Clamped => 0.0,
        };
        Layout {
            pattern_width,
            offset,
            width: pattern_width + 2.0 * offset,
            height: params.circumference(),
        }
    }

    /// Number of samples around the circumference: `ceil(2*pi*r / step)`.
    ///
    /// # Errors
    /// [`CopingError::Validation`] on `step` when the count would exceed
    /// [`MAX_SAMPLES`].
    pub fn sample_count(&self, params: &JointParameters) -> Result<usize> {
        let count = (params.circumference() / self.config.step).ceil();
        if count > MAX_SAMPLES as f64 {
            return Err(CopingError::validation(
                "step",
                format!(
                    "{} is too fine for a circumference of {:.3} (more than {} samples)",
                    self.config.step,
                    params.circumference(),
                    MAX_SAMPLES
                ),
            ));
        }
        Ok(count as usize)
    }

    /// Whether the edge-offset margin is too narrow for this joint's skew.
    ///
    /// When it is, the left and outer edges are clamped to the pattern box
    /// and the printed cut length no longer equals `D - cutting`.
    pub fn skew_exceeds_margin(&self, params: &JointParameters) -> bool {
        if !self.config.refinement.has_left_edge() {
            return false;
        }
        let skew = angle_displacement(params.joint_angle_deg(), params.cut_radius(), 0.0).abs();
        skew > self.layout(params).offset
    }

    /// Evaluate one row at arc length `w`.
    pub fn sample_at(&self, params: &JointParameters, w: f64) -> SamplePoint {
        let layout = self.layout(params);
        self.row(params, &layout, w)
    }

    /// Generate the full sample sequence.
    ///
    /// # Errors
    /// [`CopingError::Validation`] when the step yields too many samples.
    pub fn generate(&self, params: &JointParameters) -> Result<CopingPattern> {
        let layout = self.layout(params);
        let count = self.sample_count(params)?;
        let circumference = params.circumference();

        // i * step rather than accumulating, so positions never drift
        let points: Vec<SamplePoint> = (0..count)
            .map(|i| i as f64 * self.config.step)
            .filter(|&w| w < circumference)
            .map(|w| self.row(params, &layout, w))
            .collect();

        debug!(
            samples = points.len(),
            refinement = self.config.refinement.name(),
            width = layout.width,
            height = layout.height,
            "generated coping pattern"
        );

        if self.skew_exceeds_margin(params) {
            warn!(
                joint_angle = params.joint_angle_deg(),
                margin = layout.offset,
                "skew is wider than the pattern margin; edges are clamped and the template is distorted"
            );
        }

        Ok(CopingPattern {
            params: *params,
            config: self.config,
            layout,
            points,
        })
    }

    fn row(&self, params: &JointParameters, layout: &Layout, w: f64) -> SamplePoint {
        let theta = w / params.cut_radius();
        let angle = angle_displacement(params.joint_angle_deg(), params.cut_radius(), theta);

        let outer_depth = self.depth(params, params.cut_radius(), theta, layout);
        let inner_depth = self.depth(params, params.inner_radius(), theta, layout);

        let d = layout.pattern_width;
        let (outer, inner, left) = match self.config.refinement {
            Refinement::Unclamped => (d - outer_depth + angle, d - inner_depth + angle, 0.0),
            Refinement::Clamped => {
                let edge = |depth: f64| ((d - depth).min(d) + angle).clamp(0.0, d);
                (edge(outer_depth), edge(inner_depth), 0.0)
            }
            Refinement::EdgeOffset => {
                let edge = |depth: f64| (d + layout.offset - angle - depth).clamp(0.0, layout.width);
                let left = (layout.offset - angle).clamp(0.0, layout.width);
                (edge(outer_depth), edge(inner_depth), left)
            }
        };

        SamplePoint {
            position: w,
            outer,
            inner,
            angle,
            left,
        }
    }

    fn depth(&self, params: &JointParameters, radius: f64, theta: f64, layout: &Layout) -> f64 {
        self.config.non_overlap.resolve(
            cutting_displacement(radius, params.other_radius(), theta),
            layout.pattern_width,
        )
    }
}
