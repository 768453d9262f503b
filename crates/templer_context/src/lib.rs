//! # templer_context
//!
//! Context resolution for templer.
//!
//! A context file is a YAML document with up to three recognized sections:
//!
//! - `static`: literal values
//! - `dynamic`: literal values, usually produced by pre-rendering the file
//! - `defaults`: fallbacks for environment variables, optionally typed
//!   (`choice`, `list`, `variation`)
//!
//! Resolution merges these with the environment into a single [`Namespace`].
//!
//! ## Example
//!
//! ```rust
//! use templer_context::{merge, ContextDocument, EnvVars};
//! use templer_core::VarValue;
//!
//! let doc = ContextDocument::parse("defaults:\n  NOUN: bar\n").unwrap();
//! let mut env = EnvVars::new();
//! env.insert("NOUN".into(), "fool".into());
//!
//! let ns = merge(&doc, &env, false).unwrap();
//! assert_eq!(ns.get("NOUN"), Some(VarValue::from("fool")));
//! ```

pub mod coerce;
pub mod defaults;
pub mod document;
pub mod env;
pub mod error;
pub mod loader;
pub mod merge;
pub mod namespace;
pub mod render;

pub use coerce::coerce;
pub use defaults::{ChoiceSpec, DefaultSpec, DefaultsSection, ListSpec, VariationSpec};
pub use document::{ContextDocument, Section, SectionKind};
pub use env::{parse_assignment, process_env, EnvVars};
pub use error::{ContextError, ContextResult};
pub use loader::{ContextLoader, ResolveOptions, CONTEXT_EXTENSIONS};
pub use merge::{merge, resolve_document};
pub use namespace::Namespace;
pub use render::ContextRenderer;
