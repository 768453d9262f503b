//! # templer_templates
//!
//! Template discovery and rendering for templer.
//!
//! Templates are found either as single files or recursively inside
//! directories (`*.j2`, `*.jinja2`). Each template is rendered against a
//! resolved [`templer_context::Namespace`] and written to a destination that
//! mirrors its relative path, without the template extension.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::{Path, PathBuf};
//! use templer_context::{process_env, ContextLoader, ResolveOptions};
//! use templer_templates::{render_templates, RenderOptions};
//!
//! let env = process_env();
//! let ns = ContextLoader::new(ResolveOptions::new())
//!     .load(&[PathBuf::from("context.yml")], &env)
//!     .unwrap();
//!
//! let created = render_templates(
//!     &[PathBuf::from("templates")],
//!     Path::new("out"),
//!     &ns,
//!     &RenderOptions::new().force_overwrite(true),
//! )
//! .unwrap();
//! ```

pub mod discovery;
pub mod error;
pub mod renderer;

pub use discovery::{discover_jobs, find_templates, TemplateJob, TEMPLATE_EXTENSIONS};
pub use error::{TemplateError, TemplateResult};
pub use renderer::{render_templates, RenderOptions, TemplateRenderer};
