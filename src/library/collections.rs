//! `Set` and `Map`, keyed by SameValueZero identity.

use super::{slot_materializer, slot_of};
use crate::class::{Class, TypeToken};
use crate::registry::ConstructionSpec;
use crate::{Error, Object, Slot, Value};

pub static SET: Class = Class::new("Set");
pub static MAP: Class = Class::new("Map");

pub(super) fn set() -> ConstructionSpec {
    let class = TypeToken::of(&SET);
    ConstructionSpec::new(class)
        .with_serializer(move |value| match slot_of(value, class)? {
            Slot::Set(values) => Ok(values),
            _ => Ok(Vec::new()),
        })
        .with_materializer(move |placeholder, args| {
            slot_materializer(class, placeholder, args, |args| Ok(Slot::Set(dedupe(args))))
        })
}

pub(super) fn map() -> ConstructionSpec {
    let class = TypeToken::of(&MAP);
    ConstructionSpec::new(class)
        .with_serializer(move |value| match slot_of(value, class)? {
            Slot::Map(entries) => Ok(entries
                .into_iter()
                .map(|(key, value)| Value::array([key, value]))
                .collect()),
            _ => Ok(Vec::new()),
        })
        .with_materializer(move |placeholder, args| {
            slot_materializer(class, placeholder, args, |args| {
                let mut entries = Vec::with_capacity(args.len());
                for entry in args {
                    let pair = match entry {
                        Value::Array(pair) => pair,
                        other => {
                            return Err(Error::custom(format!(
                                "Map entries must be arrays, found {}",
                                other.kind()
                            )))
                        }
                    };
                    entries.push((
                        pair.get(0).unwrap_or_default(),
                        pair.get(1).unwrap_or_default(),
                    ));
                }
                Ok(Slot::Map(merge(entries)))
            })
        })
}

/// Keeps the first occurrence of each value.
fn dedupe(values: Vec<Value>) -> Vec<Value> {
    let mut out: Vec<Value> = Vec::with_capacity(values.len());
    for value in values {
        if !out.iter().any(|seen| seen.same_value_zero(&value)) {
            out.push(value);
        }
    }
    out
}

/// Later entries overwrite the value of an earlier equal key in place.
fn merge(entries: Vec<(Value, Value)>) -> Vec<(Value, Value)> {
    let mut out: Vec<(Value, Value)> = Vec::with_capacity(entries.len());
    for (key, value) in entries {
        match out.iter_mut().find(|(seen, _)| seen.same_value_zero(&key)) {
            Some(slot) => slot.1 = value,
            None => out.push((key, value)),
        }
    }
    out
}

impl Value {
    /// A `Set` object holding `values` without duplicates.
    ///
    /// ```rust
    /// use serde_construct::{Slot, Value};
    ///
    /// let set = Value::set([Value::from(1), Value::from(1.0), Value::from("1")]);
    /// assert!(matches!(&*set.as_object().unwrap().slot(), Slot::Set(values) if values.len() == 2));
    /// ```
    pub fn set<I: IntoIterator<Item = Value>>(values: I) -> Value {
        Value::Object(Object::with_slot(
            TypeToken::of(&SET),
            Slot::Set(dedupe(values.into_iter().collect())),
        ))
    }

    /// A `Map` object holding `entries`; a repeated key keeps its last value.
    pub fn map<I: IntoIterator<Item = (Value, Value)>>(entries: I) -> Value {
        Value::Object(Object::with_slot(
            TypeToken::of(&MAP),
            Slot::Map(merge(entries.into_iter().collect())),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedupe_uses_same_value_zero() {
        let object = Value::Object(Object::new());
        let values = dedupe(vec![
            Value::from(0.0),
            Value::from(-0.0),
            Value::from(f64::NAN),
            Value::from(f64::NAN),
            object.clone(),
            object,
            Value::Object(Object::new()),
        ]);
        assert_eq!(values.len(), 4);
    }

    #[test]
    fn test_merge_keeps_first_position() {
        let entries = merge(vec![
            (Value::from("a"), Value::from(1)),
            (Value::from("b"), Value::from(2)),
            (Value::from("a"), Value::from(3)),
        ]);
        assert_eq!(
            entries,
            vec![
                (Value::from("a"), Value::from(3)),
                (Value::from("b"), Value::from(2)),
            ]
        );
    }

    #[test]
    fn test_map_rejects_non_array_entries() {
        let mut registry = crate::Registry::new();
        let construction = registry.register(map()).unwrap();
        assert!(construction.construct(vec![Value::from(1)]).is_err());

        let value = construction
            .construct(vec![Value::array([Value::from("k")])])
            .unwrap();
        assert!(matches!(
            &*value.as_object().unwrap().slot(),
            Slot::Map(entries) if entries[0].1.is_undefined()
        ));
    }
}
