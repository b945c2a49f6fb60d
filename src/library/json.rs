//! `JSON`: an opaque JSON document carried as a single string argument.

use super::{arg, slot_materializer, slot_of};
use crate::class::{Class, TypeToken};
use crate::registry::ConstructionSpec;
use crate::{Error, Object, Slot, Value};

pub static JSON: Class = Class::new("JSON");

pub(super) fn spec() -> ConstructionSpec {
    let class = TypeToken::of(&JSON);
    ConstructionSpec::new(class)
        .with_serializer(move |value| match slot_of(value, class)? {
            Slot::Json(payload) => Ok(vec![Value::String(
                serde_json::to_string(&payload).map_err(Error::serialization)?,
            )]),
            _ => Ok(vec![Value::from("null")]),
        })
        .with_materializer(move |placeholder, args| {
            slot_materializer(class, placeholder, args, |args| {
                let payload = match arg(&args, 0) {
                    Value::Undefined => serde_json::Value::Null,
                    Value::String(text) => serde_json::from_str(&text)
                        .map_err(|e| Error::custom(format!("invalid JSON payload: {}", e)))?,
                    other => {
                        return Err(Error::custom(format!(
                            "JSON payload must be a string, found {}",
                            other.kind()
                        )))
                    }
                };
                Ok(Slot::Json(payload))
            })
        })
}

impl Value {
    /// A `JSON` object wrapping `payload`.
    ///
    /// ```rust
    /// use serde_construct::{Slot, Value};
    ///
    /// let wrapped = Value::json(serde_json::json!({"id": 7}));
    /// assert!(matches!(&*wrapped.as_object().unwrap().slot(), Slot::Json(p) if p["id"] == 7));
    /// ```
    #[must_use]
    pub fn json(payload: serde_json::Value) -> Value {
        Value::Object(Object::with_slot(TypeToken::of(&JSON), Slot::Json(payload)))
    }
}
