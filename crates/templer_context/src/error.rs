//! Error types for context resolution.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for context operations.
pub type ContextResult<T> = Result<T, ContextError>;

/// Errors that can occur while loading and resolving context files.
#[derive(Error, Debug)]
pub enum ContextError {
    #[error("Context file not found: {0}")]
    NotFound(PathBuf),

    #[error("No context files (*.yml, *.yaml) found in given path(s)")]
    NoContextFiles,

    #[error("YAML parsing error at line {line} column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Invalid context document: {0}")]
    InvalidDocument(String),

    #[error("Variable '{variable}' must be of type '{expected}', got '{value}'")]
    TypeMismatch {
        variable: String,
        expected: &'static str,
        value: String,
    },

    #[error("Variable '{variable}': Your choice '{value}' is not available. The available choices are: {}", .choices.join(", "))]
    InvalidChoice {
        variable: String,
        value: String,
        choices: Vec<String>,
    },

    #[error("Variable '{variable}': Unknown special default type '{kind}'. Available types are: choice, list, variation")]
    UnknownDefaultType { variable: String, kind: String },

    #[error("Variable '{0}': When using a special default the 'type' is required")]
    MissingDefaultType(String),

    #[error("Variable '{0}' must not be of type 'None'")]
    NullDefault(String),

    #[error("Variable '{variable}': {message}")]
    InvalidDefault { variable: String, message: String },

    #[error("Context rendering failed: {0}")]
    Render(#[from] templer_core::CoreError),

    #[error("{source}\n  Scope: Context File\n  Path:  {}", .path.display())]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<ContextError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContextError {
    /// Attach the context file the error originated from.
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        match self {
            already @ ContextError::InFile { .. } => already,
            other => ContextError::InFile {
                path: path.into(),
                source: Box::new(other),
            },
        }
    }

    /// The error without any file attribution.
    pub fn root(&self) -> &ContextError {
        match self {
            ContextError::InFile { source, .. } => source.root(),
            other => other,
        }
    }
}

impl From<serde_yaml::Error> for ContextError {
    fn from(err: serde_yaml::Error) -> Self {
        let (line, column) = err
            .location()
            .map(|loc| (loc.line(), loc.column()))
            .unwrap_or((0, 0));
        ContextError::Parse {
            line,
            column,
            message: err.to_string(),
        }
    }
}
