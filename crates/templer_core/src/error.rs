//! Error types for the core module.

use thiserror::Error;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while rendering text through the templating engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Template syntax error: {0}")]
    Syntax(String),

    #[error("Undefined variable: {0}")]
    Undefined(String),

    #[error("Required variable is missing: {0}")]
    Mandatory(String),

    #[error("Template rendering failed: {0}")]
    Render(String),
}

impl CoreError {
    /// Whether the error was signalled explicitly through the `mandatory` filter.
    pub fn is_mandatory(&self) -> bool {
        matches!(self, CoreError::Mandatory(_))
    }
}
