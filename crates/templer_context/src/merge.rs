//! Merging a context document with the environment.
//!
//! Precedence, lowest first:
//!
//! 1. environment variables
//! 2. the `defaults` section (each entry already prefers the environment)
//! 3. `static` and `dynamic`, in the order they appear in the document
//!
//! The ordering is kept by [`Namespace`], so it also holds across files.

use tracing::debug;

use crate::document::{ContextDocument, Section, SectionKind};
use crate::env::EnvVars;
use crate::error::ContextResult;
use crate::namespace::Namespace;

/// Resolve the layers contributed by one document, without the environment.
pub fn resolve_document(
    document: &ContextDocument,
    env: &EnvVars,
    strict: bool,
) -> ContextResult<Namespace> {
    let mut ns = Namespace::new();

    if let Some(defaults) = document.defaults() {
        let bindings = defaults.resolve(env, strict)?;
        debug!("Resolved {} default(s)", bindings.len());
        ns.push(SectionKind::Defaults, bindings);
    }

    for section in &document.sections {
        match section {
            Section::Static(values) => ns.push(SectionKind::Static, values.clone()),
            Section::Dynamic(values) => ns.push(SectionKind::Dynamic, values.clone()),
            Section::Defaults(_) => {}
        }
    }

    Ok(ns)
}

/// Merge a document with the environment into a complete namespace.
pub fn merge(document: &ContextDocument, env: &EnvVars, strict: bool) -> ContextResult<Namespace> {
    let mut ns = Namespace::from_env(env);
    ns.extend(resolve_document(document, env, strict)?);
    Ok(ns)
}
