//! CLI command implementations.
//!
//! - `pattern` - Generate and encode a coping pattern
//! - `query` - Serve a web-form query string
//! - `preview` - Export a 3D preview mesh

pub mod common;
pub mod pattern;
pub mod preview;
pub mod query;

pub use pattern::cmd_pattern;
pub use preview::cmd_preview;
pub use query::cmd_query;
