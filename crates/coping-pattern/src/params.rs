//! Joint parameters: the two tubes and the angle they meet at.
//!
//! Parameters are validated once, at construction. Everything downstream
//! (generator, renderer, preview) can then assume the domain is sound:
//! positive radii, a wall thinner than the cut tube, and `0 < phi <= 90`.

use std::f64::consts::PI;

use serde::Serialize;

use crate::error::{CopingError, Result};

/// Extra room added to the other tube's radius when sizing the pattern.
///
/// Generous on purpose so the curve never runs off the printed pattern.
pub const PATTERN_WIDTH_ALLOWANCE: f64 = 4.0;

/// Input to a single pattern computation.
///
/// Fields are private so a `JointParameters` value is always valid;
/// build one with [`JointParameters::new`] or
/// [`JointParameters::from_diameters`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct JointParameters {
    cut_radius: f64,
    other_radius: f64,
    wall_thickness: f64,
    joint_angle_deg: f64,
}

impl JointParameters {
    /// Build parameters from radii.
    ///
    /// # Errors
    /// [`CopingError::Validation`] when any value is non-finite or out of
    /// range. A joint angle of 0 is rejected here because the skew term
    /// divides by `tan(phi)`.
    pub fn new(
        cut_radius: f64,
        other_radius: f64,
        wall_thickness: f64,
        joint_angle_deg: f64,
    ) -> Result<Self> {
        require_finite("cut_radius", cut_radius)?;
        require_finite("other_radius", other_radius)?;
        require_finite("wall_thickness", wall_thickness)?;
        require_finite("joint_angle", joint_angle_deg)?;

        if cut_radius <= 0.0 {
            return Err(CopingError::validation(
                "cut_radius",
                format!("must be greater than 0, got {}", cut_radius),
            ));
        }
        if other_radius <= 0.0 {
            return Err(CopingError::validation(
                "other_radius",
                format!("must be greater than 0, got {}", other_radius),
            ));
        }
        if wall_thickness < 0.0 || wall_thickness >= cut_radius {
            return Err(CopingError::validation(
                "wall_thickness",
                format!(
                    "must be in [0, {}) for a cut tube of radius {}, got {}",
                    cut_radius, cut_radius, wall_thickness
                ),
            ));
        }
        if joint_angle_deg == 0.0 {
            return Err(CopingError::validation(
                "joint_angle",
                "must be greater than 0 degrees (tan(0) is undefined)",
            ));
        }
        if !(0.0..=90.0).contains(&joint_angle_deg) {
            return Err(CopingError::validation(
                "joint_angle",
                format!("must be in (0, 90] degrees, got {}", joint_angle_deg),
            ));
        }

        Ok(Self {
            cut_radius,
            other_radius,
            wall_thickness,
            joint_angle_deg,
        })
    }

    /// Build parameters from tube diameters, the way they are measured in
    /// the shop. Both diameters are halved; the wall thickness is taken as-is.
    pub fn from_diameters(
        cut_diameter: f64,
        other_diameter: f64,
        wall_thickness: f64,
        joint_angle_deg: f64,
    ) -> Result<Self> {
        Self::new(
            cut_diameter / 2.0,
            other_diameter / 2.0,
            wall_thickness,
            joint_angle_deg,
        )
    }

    /// Radius of the tube being marked and cut (r).
    #[inline]
    pub fn cut_radius(&self) -> f64 {
        self.cut_radius
    }

    /// Radius of the tube it has to fit against (R).
    #[inline]
    pub fn other_radius(&self) -> f64 {
        self.other_radius
    }

    #[inline]
    pub fn wall_thickness(&self) -> f64 {
        self.wall_thickness
    }

    /// Angle between the two tube axes in degrees.
    #[inline]
    pub fn joint_angle_deg(&self) -> f64 {
        self.joint_angle_deg
    }

    /// Radius of the cut tube's inside wall.
    #[inline]
    pub fn inner_radius(&self) -> f64 {
        self.cut_radius - self.wall_thickness
    }

    /// Nominal flattened pattern width (D): `truncate(R + 4)`.
    #[inline]
    pub fn pattern_width(&self) -> f64 {
        (self.other_radius + PATTERN_WIDTH_ALLOWANCE).trunc()
    }

    /// Circumference of the cut tube, i.e. the unrolled pattern height.
    #[inline]
    pub fn circumference(&self) -> f64 {
        2.0 * PI * self.cut_radius
    }
}

fn require_finite(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CopingError::validation(
            field,
            format!("must be a finite number, got {}", value),
        ))
    }
}
