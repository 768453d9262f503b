//! Custom template filters.

use std::fmt;

use minijinja::{Error, ErrorKind, Value};

/// Marker attached to engine errors raised by the `mandatory` filter.
///
/// The engine reports the failure as an undefined-value error; the marker lets
/// callers tell an explicit requirement apart from an ordinary undefined
/// lookup in strict mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MandatoryViolation {
    pub message: String,
}

impl fmt::Display for MandatoryViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for MandatoryViolation {}

/// `{{ value | mandatory("message") }}`
///
/// Passes `value` through unchanged, or fails rendering with `message` when
/// `value` is undefined. Always fatal, regardless of the undefined mode.
pub fn mandatory(value: &Value, message: Option<String>) -> Result<Value, Error> {
    if value.is_undefined() {
        let message = message.unwrap_or_default();
        return Err(Error::new(ErrorKind::UndefinedError, message.clone())
            .with_source(MandatoryViolation { message }));
    }
    Ok(value.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mandatory_passes_defined_values() {
        let value = Value::from("x");
        assert_eq!(mandatory(&value, None).unwrap(), value);
    }

    #[test]
    fn test_mandatory_rejects_undefined() {
        let err = mandatory(&Value::UNDEFINED, Some("need x".into())).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UndefinedError);
        let source = std::error::Error::source(&err)
            .and_then(|s| s.downcast_ref::<MandatoryViolation>())
            .unwrap();
        assert_eq!(source.message, "need x");
    }

    #[test]
    fn test_mandatory_accepts_none() {
        // none is a defined value
        assert!(mandatory(&Value::from(()), Some("msg".into())).is_ok());
    }
}
