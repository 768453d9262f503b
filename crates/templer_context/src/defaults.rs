//! Default specifications.
//!
//! An entry of a `defaults` section is either a plain value or a mapping with
//! a `type` discriminator:
//!
//! ```yaml
//! defaults:
//!   NOUN: bar                      # simple default
//!   REPLICAS: 1                    # typed simple default
//!   LEVEL:
//!     type: choice
//!     default: info
//!     choices: [debug, info, warn]
//!   HOSTS:
//!     type: list
//!     default: [localhost]
//!     delimiter: ","
//!   LARGE:
//!     type: variation
//!     defaults:
//!       REPLICAS: 5
//! ```
//!
//! Entries are validated when the section is parsed; resolving them against
//! the environment only checks the environment values.

use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use tracing::debug;

use templer_core::value::yaml_key;
use templer_core::{Bindings, VarValue};

use crate::coerce::coerce;
use crate::env::EnvVars;
use crate::error::{ContextError, ContextResult};

/// One entry of a `defaults` section.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultSpec {
    /// A literal default; environment values are coerced to its type.
    Simple(VarValue),
    Choice(ChoiceSpec),
    List(ListSpec),
    Variation(VariationSpec),
}

/// A value restricted to a fixed set of choices.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChoiceSpec {
    #[serde(deserialize_with = "scalar_string")]
    pub default: String,
    #[serde(deserialize_with = "scalar_strings")]
    pub choices: Vec<String>,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default = "default_strip")]
    pub strip: bool,
}

/// A list read from a delimited environment value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListSpec {
    pub default: Vec<Value>,
    pub delimiter: String,
    #[serde(default = "default_strip")]
    pub strip: bool,
}

/// A group of defaults applied when the entry's name is set in the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct VariationSpec {
    pub defaults: DefaultsSection,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawVariation {
    defaults: Mapping,
}

/// Wrapper that lets serde check the field set of each special kind.
#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum SpecialDefault {
    Choice(ChoiceSpec),
    List(ListSpec),
    Variation(RawVariation),
}

const SPECIAL_TYPES: &[&str] = &["choice", "list", "variation"];

fn default_strip() -> bool {
    true
}

fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    to_scalar_string(value).map_err(serde::de::Error::custom)
}

fn scalar_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Vec::<Value>::deserialize(deserializer)?
        .into_iter()
        .map(|v| to_scalar_string(v).map_err(serde::de::Error::custom))
        .collect()
}

fn to_scalar_string(value: Value) -> Result<String, String> {
    match VarValue::from(value) {
        VarValue::Null => Err("expected a scalar value, got null".to_string()),
        other => other
            .scalar_string()
            .ok_or_else(|| format!("expected a scalar value, got {}", other.type_name())),
    }
}

impl DefaultSpec {
    /// Parse one `defaults` entry.
    pub fn parse(name: &str, value: Value) -> ContextResult<Self> {
        let value = match value {
            Value::Tagged(tagged) => tagged.value,
            other => other,
        };

        match value {
            Value::Null => Err(ContextError::NullDefault(name.to_string())),
            Value::Mapping(map) => Self::parse_special(name, map),
            other => Ok(DefaultSpec::Simple(VarValue::from(other))),
        }
    }

    fn parse_special(name: &str, map: Mapping) -> ContextResult<Self> {
        let kind = match map.get("type") {
            None => return Err(ContextError::MissingDefaultType(name.to_string())),
            Some(Value::String(kind)) => kind.clone(),
            Some(other) => {
                return Err(ContextError::UnknownDefaultType {
                    variable: name.to_string(),
                    kind: VarValue::from(other.clone()).to_string(),
                })
            }
        };
        if !SPECIAL_TYPES.contains(&kind.as_str()) {
            return Err(ContextError::UnknownDefaultType {
                variable: name.to_string(),
                kind,
            });
        }

        let invalid = |message: String| ContextError::InvalidDefault {
            variable: name.to_string(),
            message: format!("{} ('{}')", message, kind),
        };

        let special: SpecialDefault =
            serde_yaml::from_value(Value::Mapping(map)).map_err(|e| invalid(e.to_string()))?;

        match special {
            SpecialDefault::Choice(choice) => {
                if choice.choices.is_empty() {
                    return Err(invalid("a non-empty list of 'choices' must be specified".into()));
                }
                Ok(DefaultSpec::Choice(choice))
            }
            SpecialDefault::List(list) => Ok(DefaultSpec::List(list)),
            SpecialDefault::Variation(raw) => Ok(DefaultSpec::Variation(VariationSpec {
                defaults: DefaultsSection::parse_mapping(raw.defaults)?,
            })),
        }
    }

    /// Resolve this entry against the environment.
    ///
    /// Returns one binding for simple, choice and list entries. A variation
    /// yields the bindings of its nested defaults when `name` is present in
    /// the environment, and nothing otherwise.
    pub fn resolve(&self, name: &str, env: &EnvVars, strict: bool) -> ContextResult<Bindings> {
        let mut bindings = Bindings::new();
        match self {
            DefaultSpec::Simple(default) => {
                let value = match env.get(name) {
                    Some(raw) => coerce(name, raw, default, strict)?,
                    None => default.clone(),
                };
                bindings.insert(name.to_string(), value);
            }
            DefaultSpec::Choice(choice) => {
                bindings.insert(name.to_string(), choice.resolve(name, env)?);
            }
            DefaultSpec::List(list) => {
                bindings.insert(name.to_string(), list.resolve(name, env));
            }
            DefaultSpec::Variation(variation) => {
                if env.contains_key(name) {
                    debug!("Applying variation '{}'", name);
                    bindings = variation.defaults.resolve(env, strict)?;
                }
            }
        }
        Ok(bindings)
    }
}

impl ChoiceSpec {
    fn normalize(&self, value: &str) -> String {
        let value = if self.strip { value.trim() } else { value };
        if self.case_sensitive {
            value.to_string()
        } else {
            value.to_lowercase()
        }
    }

    /// The canonical choice matching `value`, if any.
    pub fn find(&self, value: &str) -> Option<&str> {
        let wanted = self.normalize(value);
        self.choices
            .iter()
            .find(|choice| self.normalize(choice) == wanted)
            .map(String::as_str)
    }

    fn resolve(&self, name: &str, env: &EnvVars) -> ContextResult<VarValue> {
        let value = env.get(name).unwrap_or(&self.default);
        match self.find(value) {
            Some(choice) => Ok(VarValue::from(choice)),
            None => Err(ContextError::InvalidChoice {
                variable: name.to_string(),
                value: value.clone(),
                choices: self.choices.clone(),
            }),
        }
    }
}

impl ListSpec {
    fn resolve(&self, name: &str, env: &EnvVars) -> VarValue {
        match env.get(name) {
            Some(raw) if raw.is_empty() => VarValue::List(Vec::new()),
            Some(raw) => VarValue::List(
                raw.split(self.delimiter.as_str())
                    .map(|item| if self.strip { item.trim() } else { item })
                    .map(VarValue::from)
                    .collect(),
            ),
            None => VarValue::List(self.default.iter().cloned().map(VarValue::from).collect()),
        }
    }
}

/// A parsed `defaults` mapping, in document order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DefaultsSection {
    entries: Vec<(String, DefaultSpec)>,
}

impl DefaultsSection {
    /// Parse the value of a `defaults` key.
    pub fn parse(value: Value) -> ContextResult<Self> {
        match value {
            Value::Mapping(map) => Self::parse_mapping(map),
            _ => Err(ContextError::InvalidDocument(
                "'defaults' must be of type 'dict' and contain at least one key".to_string(),
            )),
        }
    }

    fn parse_mapping(map: Mapping) -> ContextResult<Self> {
        if map.is_empty() {
            return Err(ContextError::InvalidDocument(
                "'defaults' must be of type 'dict' and contain at least one key".to_string(),
            ));
        }

        let entries = map
            .into_iter()
            .map(|(key, value)| {
                let name = yaml_key(key);
                let spec = DefaultSpec::parse(&name, value)?;
                Ok((name, spec))
            })
            .collect::<ContextResult<Vec<_>>>()?;

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[(String, DefaultSpec)] {
        &self.entries
    }

    /// Resolve every entry against the environment.
    ///
    /// All variation entries of one section form a mutually exclusive group:
    /// only the first one (in document order) whose name is present in the
    /// environment is applied, and its bindings overwrite any other entry of
    /// the section. Plain, choice and list entries only bind names that are
    /// still unbound.
    pub fn resolve(&self, env: &EnvVars, strict: bool) -> ContextResult<Bindings> {
        let mut bindings = Bindings::new();
        let mut variation = None;

        for (name, spec) in &self.entries {
            if let DefaultSpec::Variation(_) = spec {
                if variation.is_none() && env.contains_key(name) {
                    variation = Some(spec.resolve(name, env, strict)?);
                }
                continue;
            }
            for (key, value) in spec.resolve(name, env, strict)? {
                bindings.entry(key).or_insert(value);
            }
        }

        if let Some(selected) = variation {
            bindings.extend(selected);
        }
        Ok(bindings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(yaml: &str) -> DefaultsSection {
        DefaultsSection::parse(serde_yaml::from_str(yaml).unwrap()).unwrap()
    }

    fn parse_err(yaml: &str) -> ContextError {
        DefaultsSection::parse(serde_yaml::from_str(yaml).unwrap()).unwrap_err()
    }

    fn env(pairs: &[(&str, &str)]) -> EnvVars {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_simple_default_without_env() {
        let s = section("{NOUN: bar, COUNT: 3}");
        let b = s.resolve(&env(&[]), true).unwrap();
        assert_eq!(b["NOUN"], VarValue::from("bar"));
        assert_eq!(b["COUNT"], VarValue::Integer(3));
    }

    #[test]
    fn test_simple_default_coerces_env() {
        let s = section("{COUNT: 3, DEBUG: false}");
        let b = s.resolve(&env(&[("COUNT", "7"), ("DEBUG", "yes")]), true).unwrap();
        assert_eq!(b["COUNT"], VarValue::Integer(7));
        assert_eq!(b["DEBUG"], VarValue::Bool(true));
    }

    #[test]
    fn test_choice_case_insensitive() {
        let s = section("{X: {type: choice, default: a, choices: [a, b, c]}}");
        let b = s.resolve(&env(&[("X", "B")]), true).unwrap();
        assert_eq!(b["X"], VarValue::from("b"));
    }

    #[test]
    fn test_choice_strips_by_default() {
        let s = section("{X: {type: choice, default: a, choices: [a, b]}}");
        let b = s.resolve(&env(&[("X", "  b ")]), true).unwrap();
        assert_eq!(b["X"], VarValue::from("b"));
    }

    #[test]
    fn test_choice_case_sensitive() {
        let s = section("{X: {type: choice, default: a, choices: [a, b], case_sensitive: true}}");
        assert!(s.resolve(&env(&[("X", "B")]), true).is_err());
        assert_eq!(s.resolve(&env(&[("X", "b")]), true).unwrap()["X"], VarValue::from("b"));
    }

    #[test]
    fn test_choice_rejects_unknown_value() {
        let s = section("{X: {type: choice, default: a, choices: [a, b, c]}}");
        let err = s.resolve(&env(&[("X", "z")]), false).unwrap_err();
        match err {
            ContextError::InvalidChoice { variable, value, choices } => {
                assert_eq!(variable, "X");
                assert_eq!(value, "z");
                assert_eq!(choices, vec!["a", "b", "c"]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_choice_validates_default() {
        let s = section("{X: {type: choice, default: z, choices: [a, b]}}");
        assert!(matches!(
            s.resolve(&env(&[]), true).unwrap_err(),
            ContextError::InvalidChoice { .. }
        ));
    }

    #[test]
    fn test_choice_numeric_choices() {
        let s = section("{X: {type: choice, default: 1, choices: [1, 2]}}");
        assert_eq!(s.resolve(&env(&[("X", "2")]), true).unwrap()["X"], VarValue::from("2"));
    }

    #[test]
    fn test_choice_requires_choices() {
        assert!(matches!(
            parse_err("{X: {type: choice, default: a, choices: []}}"),
            ContextError::InvalidDefault { .. }
        ));
        assert!(matches!(
            parse_err("{X: {type: choice, default: a}}"),
            ContextError::InvalidDefault { .. }
        ));
    }

    #[test]
    fn test_list_split() {
        let s = section(r#"{L: {type: list, default: [x], delimiter: ","}}"#);
        let b = s.resolve(&env(&[("L", "1, 2,3")]), true).unwrap();
        assert_eq!(b["L"], VarValue::from(vec!["1", "2", "3"]));
    }

    #[test]
    fn test_list_without_strip() {
        let s = section(r#"{L: {type: list, default: [], delimiter: ";", strip: false}}"#);
        let b = s.resolve(&env(&[("L", "a; b")]), true).unwrap();
        assert_eq!(b["L"], VarValue::from(vec!["a", " b"]));
    }

    #[test]
    fn test_list_default_and_empty() {
        let s = section(r#"{L: {type: list, default: [x, y], delimiter: ","}}"#);
        assert_eq!(s.resolve(&env(&[]), true).unwrap()["L"], VarValue::from(vec!["x", "y"]));
        assert_eq!(
            s.resolve(&env(&[("L", "")]), true).unwrap()["L"],
            VarValue::List(vec![])
        );
    }

    #[test]
    fn test_list_requires_delimiter() {
        assert!(matches!(
            parse_err("{L: {type: list, default: [x]}}"),
            ContextError::InvalidDefault { .. }
        ));
    }

    const SIZES: &str = r#"
CPU: 1
SMALL:
  type: variation
  defaults:
    CPU: 1
    MEM: 1G
MEDIUM:
  type: variation
  defaults:
    CPU: 2
    MEM: 4G
LARGE:
  type: variation
  defaults:
    CPU: 8
    MEM: 16G
"#;

    #[test]
    fn test_variation_selected_by_presence() {
        let s = section(SIZES);
        let b = s.resolve(&env(&[("MEDIUM", "")]), true).unwrap();
        assert_eq!(b["CPU"], VarValue::Integer(2));
        assert_eq!(b["MEM"], VarValue::from("4G"));
        assert!(!b.contains_key("SMALL"));
        assert!(!b.contains_key("MEDIUM"));
    }

    #[test]
    fn test_variation_first_present_wins() {
        let s = section(SIZES);
        let b = s
            .resolve(&env(&[("LARGE", "1"), ("MEDIUM", "1")]), true)
            .unwrap();
        assert_eq!(b["CPU"], VarValue::Integer(2));
    }

    #[test]
    fn test_variation_none_present() {
        let s = section(SIZES);
        let b = s.resolve(&env(&[]), true).unwrap();
        assert_eq!(b["CPU"], VarValue::Integer(1));
        assert!(!b.contains_key("MEM"));
    }

    #[test]
    fn test_variation_env_still_wins() {
        let s = section(SIZES);
        let b = s.resolve(&env(&[("LARGE", ""), ("CPU", "4")]), true).unwrap();
        assert_eq!(b["CPU"], VarValue::Integer(4));
        assert_eq!(b["MEM"], VarValue::from("16G"));
    }

    #[test]
    fn test_variation_wins_over_later_plain_default() {
        let s = section(
            r#"
LARGE:
  type: variation
  defaults:
    CPU: 8
CPU: 1
"#,
        );
        let b = s.resolve(&env(&[("LARGE", "")]), true).unwrap();
        assert_eq!(b["CPU"], VarValue::Integer(8));

        let b = s.resolve(&env(&[]), true).unwrap();
        assert_eq!(b["CPU"], VarValue::Integer(1));
    }

    #[test]
    fn test_nested_variation() {
        let s = section(
            r#"
PROD:
  type: variation
  defaults:
    TIER: prod
    EU:
      type: variation
      defaults:
        REGION: eu-west-1
"#,
        );
        let b = s.resolve(&env(&[("PROD", ""), ("EU", "")]), true).unwrap();
        assert_eq!(b["TIER"], VarValue::from("prod"));
        assert_eq!(b["REGION"], VarValue::from("eu-west-1"));
    }

    #[test]
    fn test_unknown_type() {
        match parse_err("{X: {type: enum, default: a}}") {
            ContextError::UnknownDefaultType { variable, kind } => {
                assert_eq!(variable, "X");
                assert_eq!(kind, "enum");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_missing_type_and_null() {
        assert!(matches!(
            parse_err("{X: {default: a}}"),
            ContextError::MissingDefaultType(_)
        ));
        assert!(matches!(parse_err("{X: ~}"), ContextError::NullDefault(_)));
    }

    #[test]
    fn test_empty_section_rejected() {
        assert!(matches!(parse_err("{}"), ContextError::InvalidDocument(_)));
        assert!(matches!(parse_err("[a]"), ContextError::InvalidDocument(_)));
    }

    #[test]
    fn test_document_order_kept() {
        let s = section("{B: 1, A: 2, C: 3}");
        let names: Vec<_> = s.entries().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
    }
}
