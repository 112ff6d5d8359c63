//! # coping-pattern
//!
//! Coping patterns for pipe-to-pipe saddle joints: given two tube sizes and
//! the angle they meet at, compute the curve to cut on the end of one tube
//! so it sits flush against the other, then print it as a wrap-around
//! template (PNG, PDF or a plain numeric listing).
//!
//! ```no_run
//! use coping_pattern::{Generator, JointParameters, OutputFormat, Renderer};
//!
//! let params = JointParameters::from_diameters(1.5, 2.0, 0.065, 60.0)?;
//! let pattern = Generator::default().generate(&params)?;
//! let png = Renderer::default().render(&pattern, OutputFormat::Raster)?;
//! # Ok::<(), coping_pattern::CopingError>(())
//! ```
//!
//! ## Rust Lesson #7: Modules
//!
//! Rust modules are like ES6 modules but more explicit:
//! - `mod foo;` = load from `foo.rs` or `foo/mod.rs`
//! - `pub mod foo;` = also export it publicly
//! - `pub use foo::Bar;` = re-export Bar at this level

pub mod config;
pub mod error;
pub mod generator;
pub mod geometry;
pub mod params;
pub mod preview;
pub mod render;
pub mod service;

// Re-export common types at crate root for convenience.
pub use config::CopingConfig;
pub use error::{CopingError, Result};
pub use generator::{
    CopingPattern, Generator, GeneratorConfig, Layout, NonOverlap, Refinement, SamplePoint,
    angle_displacement, cutting_displacement,
};
pub use geometry::{Line, Point};
pub use params::JointParameters;
pub use preview::{PreviewMesh, build_preview};
pub use render::{Output, OutputFormat, RenderConfig, Renderer, Surface, SvgSurface};
pub use service::{PatternService, parse_query};
