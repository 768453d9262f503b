//! Error types for templates.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Errors that can occur while discovering and rendering templates.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Templates must be specified")]
    NoTemplatePaths,

    #[error("Template file not found: {0}")]
    NotFound(PathBuf),

    #[error("No template files (*.j2, *.jinja2) found in given path(s)")]
    NoTemplates,

    #[error("Destination exists and is not a directory. When multiple templates are specified the destination must be a directory: {0}")]
    DestinationNotDirectory(PathBuf),

    #[error("Destination already exists. Use '-f' flag to overwrite the file: {0}")]
    DestinationExists(PathBuf),

    #[error("Destination exists and is not a file: {0}")]
    DestinationNotFile(PathBuf),

    #[error("{source}\n  Scope: Template File\n  Path:  {}", .path.display())]
    Render {
        path: PathBuf,
        #[source]
        source: templer_core::CoreError,
    },

    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TemplateError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| TemplateError::Io { path, source }
    }
}
