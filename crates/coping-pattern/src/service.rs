//! Request adapter: query string in, encoded pattern out.
//!
//! Accepts the web form's query (`f=png&R=4&r=3&phi=60&t=0.125`). `R` and
//! `r` are diameters; `t` and `phi` are used as given. The service owns its
//! generator and renderer, handed in at construction.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::error::{CopingError, Result};
use crate::generator::Generator;
use crate::params::JointParameters;
use crate::render::{Output, OutputFormat, Renderer};

/// Format used when the request has no `f` key.
pub const DEFAULT_FORMAT: OutputFormat = OutputFormat::Raster;

#[derive(Debug, Clone, Default)]
pub struct PatternService {
    generator: Generator,
    renderer: Renderer,
}

impl PatternService {
    pub fn new(generator: Generator, renderer: Renderer) -> Self {
        Self { generator, renderer }
    }

    /// Parse a `key=value&...` query and serve it.
    pub fn handle_query(&self, query: &str) -> Result<Output> {
        self.handle(&parse_query(query))
    }

    /// Serve already-split request fields.
    ///
    /// The output format is checked before any numbers are parsed, so an
    /// unsupported format never costs a generation.
    pub fn handle(&self, fields: &HashMap<String, String>) -> Result<Output> {
        let format = match fields.get("f") {
            Some(name) => OutputFormat::parse(name)?,
            None => DEFAULT_FORMAT,
        };

        let other_diameter = required_number(fields, "R")?;
        let cut_diameter = required_number(fields, "r")?;
        let joint_angle = required_number(fields, "phi")?;
        let wall_thickness = required_number(fields, "t")?;
        let params =
            JointParameters::from_diameters(cut_diameter, other_diameter, wall_thickness, joint_angle)?;

        let generator = match optional_number(fields, "step")? {
            Some(step) => Generator::new(self.generator.config().with_step(step))?,
            None => self.generator,
        };

        info!(
            format = format.name(),
            other_diameter, cut_diameter, joint_angle, wall_thickness, "serving pattern request"
        );

        let pattern = generator.generate(&params)?;
        self.renderer.render(&pattern, format)
    }
}

/// Split a query string into fields. A leading `?` is ignored; later
/// duplicates win; `+` decodes to a space.
pub fn parse_query(query: &str) -> HashMap<String, String> {
    let query = query.trim().trim_start_matches('?');
    let fields: HashMap<String, String> = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => (key.to_string(), value.replace('+', " ")),
            None => (pair.to_string(), String::new()),
        })
        .collect();

    debug!(fields = fields.len(), "parsed query");
    fields
}

fn required_number(fields: &HashMap<String, String>, key: &'static str) -> Result<f64> {
    optional_number(fields, key)?.ok_or_else(|| CopingError::validation(key, "missing"))
}

fn optional_number(fields: &HashMap<String, String>, key: &'static str) -> Result<Option<f64>> {
    match fields.get(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| CopingError::validation(key, format!("'{}' is not a number", raw))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{GeneratorConfig, Refinement};

    fn service() -> PatternService {
        let config = GeneratorConfig::default().with_step(0.1);
        PatternService::new(Generator::new(config).unwrap(), Renderer::default())
    }

    #[test]
    fn parse_query_splits_pairs() {
        let fields = parse_query("?f=png&R=4&r=3&phi=60&t=0.125");
        assert_eq!(fields.len(), 5);
        assert_eq!(fields["f"], "png");
        assert_eq!(fields["R"], "4");
        assert_eq!(fields["r"], "3");
        assert_eq!(fields["t"], "0.125");
    }

    #[test]
    fn parse_query_tolerates_odd_input() {
        let fields = parse_query("a&&b=1&b=2&");
        assert_eq!(fields["a"], "");
        assert_eq!(fields["b"], "2");
        assert!(parse_query("").is_empty());
    }

    #[test]
    fn text_request() {
        let output = service().handle_query("f=text&R=4&r=3&phi=90&t=0.125").unwrap();
        assert_eq!(output.format, OutputFormat::Text);
        let text = String::from_utf8(output.bytes).unwrap();
        assert_eq!(text.lines().count(), 95);
        // Edge-offset tee at theta = 0: 6 + 1.5 - 2
        assert_eq!(text.lines().next(), Some("0.000000 5.500000"));
    }

    #[test]
    fn default_format_is_png() {
        let output = service().handle_query("R=4&r=3&phi=60&t=0.125").unwrap();
        assert_eq!(output.content_type(), "image/png");
        assert!(output.bytes.starts_with(b"\x89PNG"));
    }

    #[test]
    fn pdf_request() {
        let output = service().handle_query("f=pdf&R=4&r=3&phi=60&t=0.125").unwrap();
        assert_eq!(output.content_type(), "application/pdf");
        assert!(output.bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn zero_angle_is_a_validation_error() {
        let err = service().handle_query("f=text&R=4&r=3&phi=0&t=0.125").unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn svg_is_unsupported() {
        let err = service().handle_query("f=svg&R=4&r=3&phi=60&t=0.125").unwrap_err();
        assert!(matches!(err, CopingError::UnsupportedFormat(ref f) if f == "svg"));
    }

    #[test]
    fn format_checked_before_numbers() {
        // Bad format wins over missing parameters
        let err = service().handle_query("f=gif").unwrap_err();
        assert!(matches!(err, CopingError::UnsupportedFormat(_)));
    }

    #[test]
    fn missing_field() {
        let err = service().handle_query("f=text&R=4&r=3&phi=60").unwrap_err();
        assert!(matches!(err, CopingError::Validation { field: "t", .. }));
    }

    #[test]
    fn unparseable_field() {
        let err = service().handle_query("f=text&R=four&r=3&phi=60&t=0").unwrap_err();
        assert!(matches!(err, CopingError::Validation { field: "R", .. }));
        assert!(err.to_string().contains("four"));
    }

    #[test]
    fn step_override() {
        let output = service()
            .handle_query("f=text&R=4&r=3&phi=90&t=0.125&step=0.005")
            .unwrap();
        assert_eq!(String::from_utf8(output.bytes).unwrap().lines().count(), 1885);

        let err = service().handle_query("f=text&R=4&r=3&phi=90&t=0&step=0").unwrap_err();
        assert!(matches!(err, CopingError::Validation { field: "step", .. }));
    }

    #[test]
    fn step_too_fine_is_rejected() {
        // Would otherwise ask for usize::MAX samples
        let err = service()
            .handle_query("f=text&R=4&r=3&phi=90&t=0.125&step=1e-300")
            .unwrap_err();
        assert!(matches!(err, CopingError::Validation { field: "step", .. }));

        let err = service()
            .handle_query("f=png&R=4&r=3&phi=90&t=0.125&step=1e-9")
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn injected_generator_is_used() {
        let config = GeneratorConfig::default()
            .with_step(0.1)
            .with_refinement(Refinement::Clamped);
        let service = PatternService::new(Generator::new(config).unwrap(), Renderer::default());
        let output = service.handle_query("f=text&R=4&r=3&phi=90&t=0.125").unwrap();
        let text = String::from_utf8(output.bytes).unwrap();
        assert_eq!(text.lines().next(), Some("0.000000 4.000000"));
    }
}
