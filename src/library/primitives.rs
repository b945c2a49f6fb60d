//! `Object`, `Array`, boxed primitives and `BigInt`.

use super::{arg, slot_materializer, slot_of};
use crate::class::{Class, TypeToken, ARRAY, BIGINT, OBJECT};
use crate::registry::ConstructionSpec;
use crate::{Array, Error, Result, Slot, Value};
use num_bigint::BigInt;

pub static BOOLEAN: Class = Class::new("Boolean");
pub static NUMBER: Class = Class::new("Number");
pub static STRING: Class = Class::new("String");

pub(super) fn object() -> ConstructionSpec {
    ConstructionSpec::generic(TypeToken::of(&OBJECT))
}

pub(super) fn array() -> ConstructionSpec {
    ConstructionSpec::new(TypeToken::of(&ARRAY))
        .with_serializer(|value| match value {
            Value::Array(array) => Ok(array.to_vec()),
            other => Err(Error::custom(format!(
                "expected array, found {}",
                other.kind()
            ))),
        })
        .with_materializer(|placeholder, args| {
            let array = match placeholder {
                None => Array::new(),
                Some(Value::Array(array)) => array,
                Some(other) => {
                    return Err(Error::custom(format!(
                        "placeholder for `Array` must be an array, found {}",
                        other.kind()
                    )))
                }
            };
            for item in args.unwrap_or_default() {
                array.push(item);
            }
            Ok(Value::Array(array))
        })
}

pub(super) fn boolean() -> ConstructionSpec {
    let class = TypeToken::of(&BOOLEAN);
    ConstructionSpec::new(class)
        .with_serializer(move |value| match slot_of(value, class)? {
            Slot::Boolean(b) => Ok(vec![Value::Bool(b)]),
            _ => Ok(vec![Value::Bool(false)]),
        })
        .with_materializer(move |placeholder, args| {
            slot_materializer(class, placeholder, args, |args| {
                Ok(Slot::Boolean(arg(&args, 0).truthy()))
            })
        })
}

pub(super) fn number() -> ConstructionSpec {
    let class = TypeToken::of(&NUMBER);
    ConstructionSpec::new(class)
        .with_serializer(move |value| match slot_of(value, class)? {
            Slot::Number(n) => Ok(vec![Value::Number(n)]),
            _ => Ok(vec![Value::Number(0.0)]),
        })
        .with_materializer(move |placeholder, args| {
            slot_materializer(class, placeholder, args, |args| {
                Ok(Slot::Number(args.first().map_or(0.0, Value::to_number)))
            })
        })
}

pub(super) fn string() -> ConstructionSpec {
    let class = TypeToken::of(&STRING);
    ConstructionSpec::new(class)
        .with_serializer(move |value| match slot_of(value, class)? {
            Slot::String(s) => Ok(vec![Value::String(s)]),
            _ => Ok(vec![Value::String(String::new())]),
        })
        .with_materializer(move |placeholder, args| {
            slot_materializer(class, placeholder, args, |args| {
                Ok(Slot::String(
                    args.first()
                        .map(Value::to_display_string)
                        .unwrap_or_default(),
                ))
            })
        })
}

pub(super) fn bigint() -> ConstructionSpec {
    ConstructionSpec::new(TypeToken::of(&BIGINT))
        .with_serializer(|value| match value {
            Value::BigInt(b) => Ok(vec![Value::String(b.to_string())]),
            other => Err(Error::custom(format!(
                "expected bigint, found {}",
                other.kind()
            ))),
        })
        // No placeholder can stand in for a primitive, so a bound `BigInt(..)`
        // finalizes to a different value and is rejected.
        .with_materializer(|_, args| match args {
            None => Ok(Value::Undefined),
            Some(args) => to_bigint(&arg(&args, 0)).map(Value::BigInt),
        })
}

fn to_bigint(value: &Value) -> Result<BigInt> {
    match value {
        Value::BigInt(b) => Ok(b.clone()),
        Value::Bool(b) => Ok(BigInt::from(u8::from(*b))),
        Value::Number(n) if n.is_finite() && n.fract() == 0.0 => format!("{:.0}", n)
            .parse()
            .map_err(|_| Error::custom(format!("cannot convert {} to a BigInt", n))),
        Value::String(s) => {
            let digits = s.trim();
            let digits = if digits.is_empty() { "0" } else { digits };
            digits
                .parse()
                .map_err(|_| Error::custom(format!("cannot convert {:?} to a BigInt", s)))
        }
        other => Err(Error::custom(format!(
            "cannot convert {} to a BigInt",
            other.kind()
        ))),
    }
}

impl Value {
    /// A boxed boolean, number or string object for `primitive`.
    ///
    /// ```rust
    /// use serde_construct::{Slot, Value};
    ///
    /// let boxed = Value::boxed(Value::from(1.5)).unwrap();
    /// assert!(matches!(*boxed.as_object().unwrap().slot(), Slot::Number(n) if n == 1.5));
    /// assert!(Value::boxed(Value::Null).is_none());
    /// ```
    #[must_use]
    pub fn boxed(primitive: Value) -> Option<Value> {
        let (class, slot) = match primitive {
            Value::Bool(b) => (TypeToken::of(&BOOLEAN), Slot::Boolean(b)),
            Value::Number(n) => (TypeToken::of(&NUMBER), Slot::Number(n)),
            Value::String(s) => (TypeToken::of(&STRING), Slot::String(s)),
            _ => return None,
        };
        Some(Value::Object(crate::Object::with_slot(class, slot)))
    }
}
