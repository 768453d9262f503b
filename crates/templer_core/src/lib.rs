//! # templer_core
//!
//! Shared building blocks for templer.
//!
//! - [`VarValue`]: the value model every resolved variable is expressed in
//! - [`TemplateEngine`]: a thin facade over MiniJinja with the undefined
//!   handling mode and the `mandatory` filter preconfigured
//!
//! ## Example
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use templer_core::{TemplateEngine, UndefinedMode, VarValue};
//!
//! let engine = TemplateEngine::new(UndefinedMode::Strict);
//! let mut vars = BTreeMap::new();
//! vars.insert("NOUN".to_string(), VarValue::from("fool"));
//!
//! let out = engine.render("greeting", "Hello {{ NOUN }}!", &vars).unwrap();
//! assert_eq!(out, "Hello fool!");
//! ```

pub mod engine;
pub mod error;
pub mod filters;
pub mod value;

pub use engine::{TemplateEngine, UndefinedMode};
pub use error::{CoreError, CoreResult};
pub use filters::MandatoryViolation;
pub use value::{merge_maps, Bindings, VarValue};
