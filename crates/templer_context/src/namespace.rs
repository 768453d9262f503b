//! The variable namespace handed to templates.
//!
//! Values are stored once, as layers tagged with the section they came from.
//! Layers are kept ordered by section precedence: the environment first, then
//! every `defaults` layer, then `static` and `dynamic` layers in the order
//! they were added. Templates see two projections of those layers:
//!
//! - flat names, where later layers win (nested mappings merge recursively)
//! - one mapping per section (`env`, `defaults`, `static`, `dynamic`) so a
//!   template can still reach a value that was shadowed in the flat view
//!
//! A section mirror takes priority over a flat variable of the same name.
//! Both projections are rebuilt when a layer is added and reused for every
//! lookup and render.

use serde::ser::{Serialize, Serializer};

use templer_core::{merge_maps, Bindings, VarValue};

use crate::document::SectionKind;
use crate::env::EnvVars;

#[derive(Debug, Clone, PartialEq)]
struct Layer {
    kind: SectionKind,
    values: Bindings,
}

/// Resolved variables of one rendering run.
#[derive(Debug, Clone, PartialEq)]
pub struct Namespace {
    layers: Vec<Layer>,
    flat: Bindings,
    view: Bindings,
}

impl Default for Namespace {
    fn default() -> Self {
        Self::new()
    }
}

fn precedence(kind: SectionKind) -> u8 {
    match kind {
        SectionKind::Env => 0,
        SectionKind::Defaults => 1,
        SectionKind::Static | SectionKind::Dynamic => 2,
    }
}

impl Namespace {
    pub fn new() -> Self {
        let mut ns = Self {
            layers: Vec::new(),
            flat: Bindings::new(),
            view: Bindings::new(),
        };
        ns.rebuild();
        ns
    }

    /// A namespace holding only the environment.
    pub fn from_env(env: &EnvVars) -> Self {
        let mut ns = Self::new();
        ns.push(
            SectionKind::Env,
            env.iter()
                .map(|(k, v)| (k.clone(), VarValue::from(v.as_str())))
                .collect(),
        );
        ns
    }

    /// Add a layer above every layer of equal or lower precedence.
    pub fn push(&mut self, kind: SectionKind, values: Bindings) {
        self.insert_layer(Layer { kind, values });
        self.rebuild();
    }

    /// Add every layer of `other`, keeping section precedence.
    pub fn extend(&mut self, other: Namespace) {
        for layer in other.layers {
            self.insert_layer(layer);
        }
        self.rebuild();
    }

    fn insert_layer(&mut self, layer: Layer) {
        let rank = precedence(layer.kind);
        let at = self
            .layers
            .iter()
            .position(|l| precedence(l.kind) > rank)
            .unwrap_or(self.layers.len());
        self.layers.insert(at, layer);
    }

    fn rebuild(&mut self) {
        let mut flat = Bindings::new();
        for layer in &self.layers {
            merge_maps(&mut flat, layer.values.clone());
        }

        let mut view = flat.clone();
        for kind in SectionKind::ALL {
            let mut values = Bindings::new();
            for layer in self.layers.iter().filter(|l| l.kind == kind) {
                merge_maps(&mut values, layer.values.clone());
            }
            view.insert(kind.key().to_string(), VarValue::Map(values));
        }

        self.flat = flat;
        self.view = view;
    }

    /// Flat projection: every name bound to its highest-precedence value.
    pub fn flat(&self) -> &Bindings {
        &self.flat
    }

    /// Projection of a single section.
    pub fn section(&self, kind: SectionKind) -> Bindings {
        match self.view.get(kind.key()) {
            Some(VarValue::Map(values)) => values.clone(),
            _ => Bindings::new(),
        }
    }

    /// Look up a flat name.
    pub fn get(&self, name: &str) -> Option<VarValue> {
        self.flat.get(name).cloned()
    }

    /// Names of all flat variables.
    pub fn names(&self) -> Vec<String> {
        self.flat.keys().cloned().collect()
    }
}

impl Serialize for Namespace {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.view.serialize(serializer)
    }
}
