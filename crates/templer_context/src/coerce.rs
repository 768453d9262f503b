//! Type coercion of raw environment values.
//!
//! A raw string is converted into the type of a reference default. In strict
//! mode a value that does not fit is an error; in lenient mode it is kept as
//! the raw string.

use templer_core::VarValue;

use crate::error::{ContextError, ContextResult};

const BOOL_TRUE: &[&str] = &["true", "1", "t", "y", "yes"];
const BOOL_FALSE: &[&str] = &["false", "0", "f", "n", "no"];

/// Coerce `raw` into the type of `reference`.
///
/// `name` is only used to label a [`ContextError::TypeMismatch`].
pub fn coerce(name: &str, raw: &str, reference: &VarValue, strict: bool) -> ContextResult<VarValue> {
    let (parsed, expected) = match reference {
        VarValue::Bool(_) => (parse_bool(raw), "bool"),
        VarValue::Integer(_) => (raw.trim().parse::<i64>().ok().map(VarValue::Integer), "int"),
        VarValue::Float(_) => (raw.trim().parse::<f64>().ok().map(VarValue::Float), "float"),
        VarValue::List(_) => (parse_json_list(raw), "list"),
        _ => return Ok(VarValue::String(raw.to_string())),
    };

    match parsed {
        Some(value) => Ok(value),
        None if strict => Err(ContextError::TypeMismatch {
            variable: name.to_string(),
            expected,
            value: raw.to_string(),
        }),
        None => Ok(VarValue::String(raw.to_string())),
    }
}

fn parse_bool(raw: &str) -> Option<VarValue> {
    let token = raw.trim().to_lowercase();
    if BOOL_TRUE.contains(&token.as_str()) {
        Some(VarValue::Bool(true))
    } else if BOOL_FALSE.contains(&token.as_str()) {
        Some(VarValue::Bool(false))
    } else {
        None
    }
}

fn parse_json_list(raw: &str) -> Option<VarValue> {
    match serde_json::from_str::<serde_json::Value>(raw.trim()) {
        Ok(value @ serde_json::Value::Array(_)) => Some(VarValue::from(value)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_ref() -> VarValue {
        VarValue::List(vec![])
    }

    #[test]
    fn test_bool_tokens() {
        for raw in ["true", "YES", " y ", "1", "T"] {
            assert_eq!(coerce("B", raw, &VarValue::Bool(false), true).unwrap(), VarValue::Bool(true));
        }
        for raw in ["false", "No", "n", "0", "F"] {
            assert_eq!(coerce("B", raw, &VarValue::Bool(true), true).unwrap(), VarValue::Bool(false));
        }
    }

    #[test]
    fn test_bool_lenient_never_fails() {
        for raw in ["maybe", "", "  ", "2", "on"] {
            let value = coerce("B", raw, &VarValue::Bool(true), false).unwrap();
            assert_eq!(value, VarValue::String(raw.to_string()));
        }
    }

    #[test]
    fn test_bool_strict_mismatch() {
        let err = coerce("B", "maybe", &VarValue::Bool(true), true).unwrap_err();
        assert!(matches!(err, ContextError::TypeMismatch { expected: "bool", .. }));
    }

    #[test]
    fn test_numbers() {
        assert_eq!(coerce("N", " 42 ", &VarValue::Integer(0), true).unwrap(), VarValue::Integer(42));
        assert_eq!(coerce("N", "2.5", &VarValue::Float(0.0), true).unwrap(), VarValue::Float(2.5));
        assert_eq!(coerce("N", "3", &VarValue::Float(0.0), true).unwrap(), VarValue::Float(3.0));
        assert!(coerce("N", "2.5", &VarValue::Integer(0), true).is_err());
        assert_eq!(
            coerce("N", "abc", &VarValue::Integer(0), false).unwrap(),
            VarValue::from("abc")
        );
    }

    #[test]
    fn test_json_list() {
        assert_eq!(
            coerce("L", r#"["a", 1]"#, &list_ref(), true).unwrap(),
            VarValue::List(vec![VarValue::from("a"), VarValue::Integer(1)])
        );
        assert!(coerce("L", "a,b", &list_ref(), true).is_err());
        assert!(coerce("L", r#"{"a": 1}"#, &list_ref(), true).is_err());
        assert_eq!(coerce("L", "a,b", &list_ref(), false).unwrap(), VarValue::from("a,b"));
    }

    #[test]
    fn test_string_passthrough() {
        assert_eq!(
            coerce("S", " keep spaces ", &VarValue::from("x"), true).unwrap(),
            VarValue::from(" keep spaces ")
        );
    }
}
