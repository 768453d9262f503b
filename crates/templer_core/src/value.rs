//! Resolved variable values.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Name to value bindings produced by one resolution step.
pub type Bindings = BTreeMap<String, VarValue>;

/// A resolved variable value as exposed to templates.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum VarValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<VarValue>),
    Map(Bindings),
}

impl VarValue {
    /// Human readable type name used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            VarValue::Null => "null",
            VarValue::Bool(_) => "bool",
            VarValue::Integer(_) => "int",
            VarValue::Float(_) => "float",
            VarValue::String(_) => "str",
            VarValue::List(_) => "list",
            VarValue::Map(_) => "dict",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            VarValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Bindings> {
        match self {
            VarValue::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, VarValue::Null)
    }

    /// Textual form of a scalar, `None` for sequences and mappings.
    pub fn scalar_string(&self) -> Option<String> {
        match self {
            VarValue::Null => Some(String::new()),
            VarValue::Bool(b) => Some(b.to_string()),
            VarValue::Integer(i) => Some(i.to_string()),
            VarValue::Float(f) => Some(f.to_string()),
            VarValue::String(s) => Some(s.clone()),
            VarValue::List(_) | VarValue::Map(_) => None,
        }
    }
}

impl fmt::Display for VarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            VarValue::Map(map) => {
                f.write_str("{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                f.write_str("}")
            }
            scalar => f.write_str(&scalar.scalar_string().unwrap_or_default()),
        }
    }
}

impl From<&str> for VarValue {
    fn from(s: &str) -> Self {
        VarValue::String(s.to_string())
    }
}

impl From<String> for VarValue {
    fn from(s: String) -> Self {
        VarValue::String(s)
    }
}

impl From<bool> for VarValue {
    fn from(b: bool) -> Self {
        VarValue::Bool(b)
    }
}

impl From<i64> for VarValue {
    fn from(i: i64) -> Self {
        VarValue::Integer(i)
    }
}

impl From<f64> for VarValue {
    fn from(f: f64) -> Self {
        VarValue::Float(f)
    }
}

impl<T: Into<VarValue>> From<Vec<T>> for VarValue {
    fn from(items: Vec<T>) -> Self {
        VarValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<serde_yaml::Value> for VarValue {
    fn from(value: serde_yaml::Value) -> Self {
        use serde_yaml::Value;

        match value {
            Value::Null => VarValue::Null,
            Value::Bool(b) => VarValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => VarValue::Integer(i),
                None => VarValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => VarValue::String(s),
            Value::Sequence(seq) => VarValue::List(seq.into_iter().map(Into::into).collect()),
            Value::Mapping(map) => VarValue::Map(
                map.into_iter()
                    .map(|(k, v)| (yaml_key(k), VarValue::from(v)))
                    .collect(),
            ),
            Value::Tagged(tagged) => VarValue::from(tagged.value),
        }
    }
}

impl From<serde_json::Value> for VarValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => VarValue::Null,
            Value::Bool(b) => VarValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => VarValue::Integer(i),
                None => VarValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => VarValue::String(s),
            Value::Array(items) => VarValue::List(items.into_iter().map(Into::into).collect()),
            Value::Object(map) => {
                VarValue::Map(map.into_iter().map(|(k, v)| (k, VarValue::from(v))).collect())
            }
        }
    }
}

/// Render a YAML mapping key as a variable name.
pub fn yaml_key(key: serde_yaml::Value) -> String {
    match VarValue::from(key) {
        VarValue::String(s) => s,
        other => other.to_string(),
    }
}

/// Recursively merge `other` into `target`.
///
/// When a key exists in both, the value of `other` wins unless both values are
/// mappings, in which case they are merged key by key.
pub fn merge_maps(target: &mut Bindings, other: Bindings) {
    for (key, value) in other {
        match (target.get_mut(&key), value) {
            (Some(VarValue::Map(existing)), VarValue::Map(incoming)) => {
                merge_maps(existing, incoming);
            }
            (_, value) => {
                target.insert(key, value);
            }
        }
    }
}
