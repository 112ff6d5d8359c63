//! YAML configuration.
//!
//! Both sections are optional and every key inside them has a default:
//!
//! ```yaml
//! generator:
//!   step: 0.01
//!   refinement: clamped
//!   non_overlap: full-width
//! render:
//!   raster_scale: 80
//!   page_margin: 0.75
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CopingError, Result};
use crate::generator::{Generator, GeneratorConfig};
use crate::render::{RenderConfig, Renderer};
use crate::service::PatternService;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CopingConfig {
    pub generator: GeneratorConfig,
    pub render: RenderConfig,
}

impl CopingConfig {
    /// Load a config from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            CopingError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        debug!(path = %path.display(), "loading config");
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty file is a valid, all-default config
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
            .map_err(|e| CopingError::Config(format!("failed to parse YAML: {}", e)))
    }

    /// Generator built from the `generator` section.
    pub fn generator(&self) -> Result<Generator> {
        Generator::new(self.generator)
    }

    pub fn renderer(&self) -> Renderer {
        Renderer::new(self.render.clone())
    }

    /// Request adapter wired with this config's generator and renderer.
    pub fn service(&self) -> Result<PatternService> {
        Ok(PatternService::new(self.generator()?, self.renderer()))
    }
}
