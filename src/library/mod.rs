//! Built-in constructions and the default catalogue.
//!
//! The catalogue is an immutable table of functions, each producing a fresh
//! [`ConstructionSpec`] for one built-in type. Registries pick entries out of it
//! with [`Registry::include`](crate::Registry::include) by name; nothing a
//! registry does changes the table.
//!
//! | Identifier | Arguments |
//! |---|---|
//! | `Object` | objects whose members are assigned in order |
//! | `Array` | the elements |
//! | `Boolean`, `Number`, `String` | the primitive |
//! | `BigInt` | decimal digits as a string |
//! | `Date` | year, 0-based month, day, hour, minute, second, millisecond (UTC) |
//! | `RegExp` | source, flags |
//! | `Set` | the values |
//! | `Map` | `[key, value]` arrays |
//! | `Error`, `EvalError`, `RangeError`, `ReferenceError`, `SyntaxError`, `TypeError`, `URIError` | message, stack, file name, line, column |
//! | `Int8Array` ... `Float64Array` | the elements |
//! | `Function` | source text (opt-in) |
//! | `JSON` | one JSON document as a string |
//!
//! Every built-in follows the two-call protocol: `(None, None)` returns a
//! placeholder and `(Some(placeholder), Some(args))` finalizes that same
//! placeholder. `BigInt` values are primitives without identity, so a bound
//! `BigInt(..)` cannot be finalized and fails with a consistency error.

mod collections;
mod date;
mod errors;
mod function;
mod json;
mod primitives;
mod regexp;
mod typed_array;

pub use collections::{MAP, SET};
pub use date::{timestamp, DATE};
pub use errors::{
    ErrorData, ErrorKind, ERROR, EVAL_ERROR, RANGE_ERROR, REFERENCE_ERROR, SYNTAX_ERROR,
    TYPE_ERROR, URI_ERROR,
};
pub use function::FUNCTION;
pub use json::JSON;
pub use primitives::{BOOLEAN, NUMBER, STRING};
pub use regexp::{RegExp, REGEXP};
pub use typed_array::{
    TypedArray, TypedArrayKind, FLOAT32_ARRAY, FLOAT64_ARRAY, INT16_ARRAY, INT32_ARRAY,
    INT8_ARRAY, UINT16_ARRAY, UINT32_ARRAY, UINT8_ARRAY, UINT8_CLAMPED_ARRAY,
};

use crate::class::TypeToken;
use crate::registry::ConstructionSpec;
use crate::{Error, Object, Result, Slot, Value};

type Factory = fn() -> ConstructionSpec;

static CATALOGUE: &[(&str, Factory)] = &[
    ("Object", primitives::object),
    ("Array", primitives::array),
    ("Boolean", primitives::boolean),
    ("Number", primitives::number),
    ("String", primitives::string),
    ("BigInt", primitives::bigint),
    ("Date", date::spec),
    ("RegExp", regexp::spec),
    ("Set", collections::set),
    ("Map", collections::map),
    ("Error", || errors::spec(ErrorKind::Error)),
    ("EvalError", || errors::spec(ErrorKind::EvalError)),
    ("RangeError", || errors::spec(ErrorKind::RangeError)),
    ("ReferenceError", || errors::spec(ErrorKind::ReferenceError)),
    ("SyntaxError", || errors::spec(ErrorKind::SyntaxError)),
    ("TypeError", || errors::spec(ErrorKind::TypeError)),
    ("URIError", || errors::spec(ErrorKind::UriError)),
    ("Int8Array", || typed_array::spec(TypedArrayKind::Int8)),
    ("Uint8Array", || typed_array::spec(TypedArrayKind::Uint8)),
    ("Uint8ClampedArray", || typed_array::spec(TypedArrayKind::Uint8Clamped)),
    ("Int16Array", || typed_array::spec(TypedArrayKind::Int16)),
    ("Uint16Array", || typed_array::spec(TypedArrayKind::Uint16)),
    ("Int32Array", || typed_array::spec(TypedArrayKind::Int32)),
    ("Uint32Array", || typed_array::spec(TypedArrayKind::Uint32)),
    ("Float32Array", || typed_array::spec(TypedArrayKind::Float32)),
    ("Float64Array", || typed_array::spec(TypedArrayKind::Float64)),
    ("Function", function::spec),
    ("JSON", json::spec),
];

/// Catalogue entries that [`Registry::with_defaults`](crate::Registry::with_defaults)
/// registers: everything except the opt-in `Function`.
pub const DEFAULTS: &[&str] = &[
    "Object",
    "Array",
    "Boolean",
    "Number",
    "String",
    "BigInt",
    "Date",
    "RegExp",
    "Set",
    "Map",
    "Error",
    "EvalError",
    "RangeError",
    "ReferenceError",
    "SyntaxError",
    "TypeError",
    "URIError",
    "Int8Array",
    "Uint8Array",
    "Uint8ClampedArray",
    "Int16Array",
    "Uint16Array",
    "Int32Array",
    "Uint32Array",
    "Float32Array",
    "Float64Array",
    "JSON",
];

/// Returns a fresh description of the built-in named `name`.
///
/// ```rust
/// use serde_construct::library::default_spec;
///
/// assert_eq!(default_spec("Date").unwrap().identifier(), "Date");
/// assert!(default_spec("Widget").is_none());
/// ```
#[must_use]
pub fn default_spec(name: &str) -> Option<ConstructionSpec> {
    CATALOGUE
        .iter()
        .find(|(entry, _)| *entry == name)
        .map(|(_, factory)| factory())
}

/// Every name in the catalogue, opt-in entries included.
pub fn catalogue() -> impl Iterator<Item = &'static str> {
    CATALOGUE.iter().map(|(name, _)| *name)
}

/// The instance to finalize: the given placeholder, or a fresh one.
pub(crate) fn instance_or_placeholder(class: TypeToken, placeholder: Option<Value>) -> Result<Object> {
    match placeholder {
        None => Ok(Object::instance(class)),
        Some(Value::Object(object)) => Ok(object),
        Some(other) => Err(Error::custom(format!(
            "placeholder for `{}` must be an object, found {}",
            class.name(),
            other.kind()
        ))),
    }
}

/// Materializer body shared by built-ins whose state lives in the slot: the
/// placeholder is an empty instance and finalizing fills in the slot.
pub(crate) fn slot_materializer(
    class: TypeToken,
    placeholder: Option<Value>,
    args: Option<Vec<Value>>,
    build: impl FnOnce(Vec<Value>) -> Result<Slot>,
) -> Result<Value> {
    let instance = instance_or_placeholder(class, placeholder)?;
    if let Some(args) = args {
        instance.replace_slot(build(args)?);
    }
    Ok(Value::Object(instance))
}

/// The slot of `value` when it is an instance of `class`.
pub(crate) fn slot_of(value: &Value, class: TypeToken) -> Result<Slot> {
    match value {
        Value::Object(object) if object.class() == class => Ok(object.slot().clone()),
        other => Err(Error::custom(format!(
            "expected {} instance, found {}",
            class.name(),
            other.kind()
        ))),
    }
}

/// Argument `index`, or undefined when missing.
pub(crate) fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or_default()
}
