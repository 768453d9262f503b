//! Pre-rendering of dynamic context files.

use templer_core::{TemplateEngine, UndefinedMode};
use tracing::debug;

use crate::error::ContextResult;
use crate::namespace::Namespace;

/// Renders context file text as a template before it is parsed as YAML.
///
/// Only the environment is available while rendering; the defaults of a
/// document cannot be used inside that same document.
pub struct ContextRenderer {
    engine: TemplateEngine,
    enabled: bool,
}

impl ContextRenderer {
    pub fn new(mode: UndefinedMode, enabled: bool) -> Self {
        Self {
            engine: TemplateEngine::new(mode),
            enabled,
        }
    }

    /// Return the text to parse for a context file.
    pub fn render(&self, name: &str, raw: &str, env: &Namespace) -> ContextResult<String> {
        if !self.enabled {
            return Ok(raw.to_string());
        }
        debug!("Rendering context file {}", name);
        Ok(self.engine.render(name, raw, env)?)
    }
}
