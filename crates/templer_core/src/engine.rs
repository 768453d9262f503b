//! Templating engine facade.
//!
//! Template syntax and evaluation are delegated to MiniJinja. This module only
//! fixes the knobs templer cares about: how undefined values behave, that
//! trailing newlines survive rendering, and which custom filters exist.

use minijinja::{Environment, ErrorKind, UndefinedBehavior};
use serde::Serialize;
use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::filters::{self, MandatoryViolation};

/// How references to undefined variables are treated while rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UndefinedMode {
    /// Any use of an undefined value is a fatal error.
    #[default]
    Strict,
    /// Undefined values render as empty text.
    Lenient,
}

impl UndefinedMode {
    pub fn from_ignore_flag(ignore_undefined: bool) -> Self {
        if ignore_undefined {
            UndefinedMode::Lenient
        } else {
            UndefinedMode::Strict
        }
    }

    fn behavior(self) -> UndefinedBehavior {
        match self {
            UndefinedMode::Strict => UndefinedBehavior::Strict,
            UndefinedMode::Lenient => UndefinedBehavior::Chainable,
        }
    }
}

/// A configured templating environment.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new(UndefinedMode::default())
    }
}

impl TemplateEngine {
    /// Create an engine with the given undefined handling.
    pub fn new(mode: UndefinedMode) -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(mode.behavior());
        env.set_keep_trailing_newline(true);
        env.add_filter("mandatory", filters::mandatory);

        Self { env }
    }

    /// Render `source` with `ctx` as the variable mapping.
    ///
    /// `name` only shows up in diagnostics.
    pub fn render<S: Serialize>(&self, name: &str, source: &str, ctx: S) -> CoreResult<String> {
        debug!("Rendering {}", name);
        self.env
            .render_named_str(name, source, ctx)
            .map_err(classify)
    }
}

/// Map an engine error onto the core error taxonomy.
fn classify(err: minijinja::Error) -> CoreError {
    if let Some(violation) = mandatory_violation(&err) {
        return CoreError::Mandatory(violation.message.clone());
    }

    let message = err.to_string();
    match err.kind() {
        ErrorKind::SyntaxError | ErrorKind::BadEscape => CoreError::Syntax(message),
        ErrorKind::UndefinedError => CoreError::Undefined(message),
        _ => CoreError::Render(message),
    }
}

fn mandatory_violation(err: &minijinja::Error) -> Option<&MandatoryViolation> {
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        if let Some(violation) = cause.downcast_ref::<MandatoryViolation>() {
            return Some(violation);
        }
        source = cause.source();
    }
    None
}
