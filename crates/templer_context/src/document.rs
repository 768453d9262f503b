//! Parsed context documents.

use std::fmt;

use serde_yaml::Value;
use tracing::warn;

use templer_core::value::yaml_key;
use templer_core::{Bindings, VarValue};

use crate::defaults::DefaultsSection;
use crate::error::{ContextError, ContextResult};

/// The recognized top-level keys of a context document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SectionKind {
    Env,
    Defaults,
    Static,
    Dynamic,
}

impl SectionKind {
    pub const ALL: [SectionKind; 4] = [
        SectionKind::Env,
        SectionKind::Defaults,
        SectionKind::Static,
        SectionKind::Dynamic,
    ];

    pub fn key(self) -> &'static str {
        match self {
            SectionKind::Env => "env",
            SectionKind::Defaults => "defaults",
            SectionKind::Static => "static",
            SectionKind::Dynamic => "dynamic",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One section of a context document.
#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    Defaults(DefaultsSection),
    Static(Bindings),
    Dynamic(Bindings),
}

/// A context document, sections in document order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContextDocument {
    pub sections: Vec<Section>,
}

impl ContextDocument {
    /// Parse YAML text into a context document.
    ///
    /// An empty document is valid and has no sections. Unknown top-level keys
    /// are skipped with a warning.
    pub fn parse(text: &str) -> ContextResult<Self> {
        let root: Value = serde_yaml::from_str(text)?;
        let map = match root {
            Value::Null => return Ok(Self::default()),
            Value::Mapping(map) => map,
            other => {
                return Err(ContextError::InvalidDocument(format!(
                    "top level must be a mapping, got '{}'",
                    VarValue::from(other).type_name()
                )))
            }
        };

        let mut sections = Vec::new();
        for (key, value) in map {
            let key = yaml_key(key);
            match key.as_str() {
                "defaults" => sections.push(Section::Defaults(DefaultsSection::parse(value)?)),
                "static" => sections.push(Section::Static(literal_section(&key, value)?)),
                "dynamic" => sections.push(Section::Dynamic(literal_section(&key, value)?)),
                _ => warn!("Ignoring unknown top-level key '{}' in context document", key),
            }
        }

        Ok(Self { sections })
    }

    pub fn defaults(&self) -> Option<&DefaultsSection> {
        self.sections.iter().find_map(|s| match s {
            Section::Defaults(d) => Some(d),
            _ => None,
        })
    }
}

fn literal_section(key: &str, value: Value) -> ContextResult<Bindings> {
    match VarValue::from(value) {
        VarValue::Null => Ok(Bindings::new()),
        VarValue::Map(map) => Ok(map),
        other => Err(ContextError::InvalidDocument(format!(
            "'{}' must be of type 'dict', got '{}'",
            key,
            other.type_name()
        ))),
    }
}
