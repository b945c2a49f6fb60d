//! The `Error` family.
//!
//! Arguments are `(message, stack, fileName, lineNumber, columnNumber)`; trailing
//! fields that are absent are left out when writing.

use super::{arg, slot_materializer, slot_of};
use crate::class::{Class, TypeToken};
use crate::registry::ConstructionSpec;
use crate::{Object, Slot, Value};

pub static ERROR: Class = Class::new("Error");
pub static EVAL_ERROR: Class = Class::new("EvalError");
pub static RANGE_ERROR: Class = Class::new("RangeError");
pub static REFERENCE_ERROR: Class = Class::new("ReferenceError");
pub static SYNTAX_ERROR: Class = Class::new("SyntaxError");
pub static TYPE_ERROR: Class = Class::new("TypeError");
pub static URI_ERROR: Class = Class::new("URIError");

/// Which member of the error family an error object belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Error,
    EvalError,
    RangeError,
    ReferenceError,
    SyntaxError,
    TypeError,
    UriError,
}

impl ErrorKind {
    #[must_use]
    pub fn class(self) -> TypeToken {
        TypeToken::of(match self {
            ErrorKind::Error => &ERROR,
            ErrorKind::EvalError => &EVAL_ERROR,
            ErrorKind::RangeError => &RANGE_ERROR,
            ErrorKind::ReferenceError => &REFERENCE_ERROR,
            ErrorKind::SyntaxError => &SYNTAX_ERROR,
            ErrorKind::TypeError => &TYPE_ERROR,
            ErrorKind::UriError => &URI_ERROR,
        })
    }
}

/// The state of an error object.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ErrorData {
    pub message: String,
    pub stack: Option<String>,
    pub file_name: Option<String>,
    pub line_number: Option<u32>,
    pub column_number: Option<u32>,
}

impl ErrorData {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        ErrorData {
            message: message.into(),
            ..Self::default()
        }
    }

    fn to_args(&self) -> Vec<Value> {
        // Absent fields are `null` so they never meet the undefined policy.
        let text = |field: &Option<String>| field.clone().map_or(Value::Null, Value::String);
        let number = |field: Option<u32>| field.map_or(Value::Null, Value::from);

        let mut args = vec![
            Value::String(self.message.clone()),
            text(&self.stack),
            text(&self.file_name),
            number(self.line_number),
            number(self.column_number),
        ];
        while args.len() > 1 && args.last().is_some_and(Value::is_null) {
            args.pop();
        }
        args
    }

    fn from_args(args: &[Value]) -> Self {
        let text = |value: Value| match value {
            Value::Undefined | Value::Null => None,
            other => Some(other.to_display_string()),
        };
        let number = |value: Value| {
            let n = value.to_number();
            (n.is_finite() && n >= 0.0 && n <= f64::from(u32::MAX)).then(|| n as u32)
        };

        ErrorData {
            message: text(arg(args, 0)).unwrap_or_default(),
            stack: text(arg(args, 1)),
            file_name: text(arg(args, 2)),
            line_number: number(arg(args, 3)),
            column_number: number(arg(args, 4)),
        }
    }
}

pub(super) fn spec(kind: ErrorKind) -> ConstructionSpec {
    let class = kind.class();
    let spec = ConstructionSpec::new(class)
        .with_serializer(move |value| match slot_of(value, class)? {
            Slot::Error(data) => Ok(data.to_args()),
            _ => Ok(vec![Value::from("")]),
        })
        .with_materializer(move |placeholder, args| {
            slot_materializer(class, placeholder, args, |args| {
                Ok(Slot::Error(ErrorData::from_args(&args)))
            })
        });
    match kind {
        ErrorKind::Error => spec,
        _ => spec.with_include("Error"),
    }
}

impl Value {
    /// An error object of `kind`.
    ///
    /// ```rust
    /// use serde_construct::library::ErrorKind;
    /// use serde_construct::Value;
    ///
    /// let err = Value::error(ErrorKind::RangeError, "out of range");
    /// assert_eq!(err.kind(), "RangeError");
    /// ```
    pub fn error(kind: ErrorKind, message: impl Into<String>) -> Value {
        Value::error_with(kind, ErrorData::new(message))
    }

    /// An error object of `kind` carrying all of `data`.
    #[must_use]
    pub fn error_with(kind: ErrorKind, data: ErrorData) -> Value {
        Value::Object(Object::with_slot(kind.class(), Slot::Error(data)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_absent_fields_are_dropped() {
        assert_eq!(ErrorData::new("boom").to_args(), vec![Value::from("boom")]);

        let data = ErrorData {
            line_number: Some(3),
            ..ErrorData::new("boom")
        };
        let args = data.to_args();
        assert_eq!(args.len(), 4);
        assert!(args[1].is_null() && args[2].is_null());
        assert_eq!(ErrorData::from_args(&args), data);
    }

    #[test]
    fn test_from_args_tolerates_odd_input() {
        let data = ErrorData::from_args(&[Value::from(5), Value::Null, Value::from("f.js"), Value::from(-1)]);
        assert_eq!(data.message, "5");
        assert_eq!(data.stack, None);
        assert_eq!(data.file_name.as_deref(), Some("f.js"));
        assert_eq!(data.line_number, None);
    }

    #[test]
    fn test_subtypes_depend_on_error() {
        let mut registry = crate::Registry::new();
        registry.include(spec(ErrorKind::TypeError)).unwrap();
        assert_eq!(registry.identifiers(), vec!["Error", "TypeError"]);
    }
}
