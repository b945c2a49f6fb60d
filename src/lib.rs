//! # serde_construct
//!
//! A text notation for object graphs: shared and circular references, class
//! instances rebuilt through registered constructions, prototypes, and the
//! values JSON cannot carry (`undefined`, `NaN`, `Infinity`, `-0`, big
//! integers, dates, regular expressions, sets, maps, errors, typed arrays).
//!
//! ## What does it look like?
//!
//! The notation is a superset of JSON with bare keys, constructions and
//! bindings:
//!
//! ```text
//! $0={name:"root", created:Date(2024,0,31,0,0,0,0), self:$0, tags:Set("a","b")}
//! ```
//!
//! - `Identifier(args...)` rebuilds an instance through the [`Registry`]
//! - `$name=value` binds a value, `$name` refers back to it
//! - `void` is `undefined`; `NaN`, `Infinity` and `-0` are written as such
//!
//! See the [`format`] module for the grammar.
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_construct::{materialize, serialize, Value};
//!
//! let value = Value::object([
//!     ("when", Value::date_from_millis(1_700_000_000_000.0)),
//!     ("ratio", Value::from(f64::NAN)),
//! ]);
//!
//! let text = serialize(&value).unwrap();
//! assert_eq!(text, "{when:Date(2023,10,14,22,13,20,0),ratio:NaN}");
//! assert_eq!(materialize(&text).unwrap(), value);
//! ```
//!
//! ### Shared and circular references
//!
//! ```rust
//! use serde_construct::{Mode, Notation, Object, Options, Value};
//!
//! let node = Object::new();
//! node.set("next", node.clone());
//!
//! let mut notation = Notation::new();
//! let text = notation
//!     .serialize_with(&Value::Object(node), Options::new().with_mode(Mode::Circular))
//!     .unwrap();
//! assert_eq!(text, "$0={next:$0}");
//!
//! let back = notation.materialize(&text).unwrap();
//! let next = back.as_object().unwrap().get("next").unwrap();
//! assert!(next.same(&back));
//! ```
//!
//! ### Your own classes
//!
//! ```rust
//! use serde_construct::{Class, ConstructionSpec, Notation, Object, TypeToken, Value};
//!
//! static POINT: Class = Class::new("Point").with_constructor(|this, args| {
//!     this.set("x", args.first().cloned().unwrap_or_default());
//!     this.set("y", args.get(1).cloned().unwrap_or_default());
//!     Ok(())
//! });
//!
//! let mut notation = Notation::new();
//! notation
//!     .registry_mut()
//!     .register(ConstructionSpec::new(TypeToken::of(&POINT)).with_serializer(|value| {
//!         let point = value.as_object().unwrap();
//!         Ok(vec![point.get("x").unwrap_or_default(), point.get("y").unwrap_or_default()])
//!     }))
//!     .unwrap();
//!
//! let point = Object::instance(TypeToken::of(&POINT));
//! point.set("x", 1);
//! point.set("y", 2);
//! let text = notation.serialize(&Value::Object(point.clone())).unwrap();
//! assert_eq!(text, "Point(1,2)");
//! assert_eq!(notation.materialize(&text).unwrap(), Value::Object(point));
//! ```
//!
//! ### Serde data
//!
//! Types implementing `Serialize` and `Deserialize` go through a [`Value`] tree:
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_construct::{from_str, to_string};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct User {
//!     id: u64,
//!     name: String,
//!     nickname: Option<String>,
//! }
//!
//! let user = User { id: 7, name: "Ada".into(), nickname: None };
//! let text = to_string(&user).unwrap();
//! assert_eq!(text, r#"{id:7,name:"Ada",nickname:null}"#);
//! assert_eq!(from_str::<User>(&text).unwrap(), user);
//! ```
//!
//! ## Threading
//!
//! Values share structure through `Rc` and are not `Send`. A [`Registry`] is
//! plain data mutated through `&mut`; there is no global registry.
//!
//! ## Logging
//!
//! Registry changes are reported at `debug` level and bindings made while
//! materializing at `trace` level through `tracing`. No subscriber is installed.
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`simple.rs`** - serializing and materializing a value
//! - **`circular.rs`** - the four reference modes
//! - **`custom_types.rs`** - registering constructions for your own classes
//! - **`dynamic_values.rs`** - building and inspecting values, the `value!` macro
//!
//! Run any example with: `cargo run --example <name>`

pub mod class;
pub mod de;
pub mod error;
pub mod format;
pub mod lexer;
pub mod library;
pub mod macros;
pub mod map;
pub mod options;
pub mod registry;
pub mod ser;
pub mod value;

pub use class::{Class, TypeToken};
pub use de::{from_value, Materializer, ValueDeserializer};
pub use error::{Error, Result};
pub use map::Members;
pub use options::{Mode, OnUndefined, Options};
pub use registry::{Construction, ConstructionSpec, Include, Key, Registry};
pub use ser::{to_value, Serializer, ValueSerializer};
pub use value::{Array, Object, Slot, Value};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;

/// A registry together with the operations that use it.
///
/// ```rust
/// use serde_construct::{Notation, Value};
///
/// let mut notation = Notation::new();
/// let text = notation.serialize(&Value::set([Value::from(1)])).unwrap();
/// assert_eq!(text, "Set(1)");
/// ```
#[derive(Debug, Clone)]
pub struct Notation {
    registry: Registry,
}

impl Default for Notation {
    fn default() -> Self {
        Self::new()
    }
}

impl Notation {
    /// Uses a registry holding the default constructions.
    #[must_use]
    pub fn new() -> Self {
        Self::with_registry(Registry::with_defaults())
    }

    /// Uses a registry with no constructions at all.
    #[must_use]
    pub fn empty() -> Self {
        Self::with_registry(Registry::new())
    }

    #[must_use]
    pub fn with_registry(registry: Registry) -> Self {
        Notation { registry }
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Serializes with default [`Options`].
    ///
    /// # Errors
    ///
    /// See [`Notation::serialize_with`].
    pub fn serialize(&mut self, value: &Value) -> Result<String> {
        self.serialize_with(value, Options::default())
    }

    /// Serializes `value` as text.
    ///
    /// Takes `&mut self` because `auto_include` may register constructions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] when the mode forbids a repeated or
    /// circular reference, or when an undefined value meets a failing policy,
    /// and [`Error::Lookup`] for instances without a construction.
    pub fn serialize_with(&mut self, value: &Value, options: Options) -> Result<String> {
        let mut serializer = Serializer::new(&mut self.registry, options);
        serializer.serialize(value)?;
        Ok(serializer.into_inner())
    }

    /// Parses `text` into a value.
    ///
    /// # Errors
    ///
    /// See [`Materializer::parse`].
    pub fn materialize(&self, text: &str) -> Result<Value> {
        Materializer::new(text, &self.registry).parse()
    }
}

/// Serializes `value` with the default constructions and options.
///
/// # Errors
///
/// See [`Notation::serialize_with`].
pub fn serialize(value: &Value) -> Result<String> {
    Notation::new().serialize(value)
}

/// Serializes `value` with the default constructions.
///
/// # Errors
///
/// See [`Notation::serialize_with`].
pub fn serialize_with_options(value: &Value, options: Options) -> Result<String> {
    Notation::new().serialize_with(value, options)
}

/// Parses `text` with the default constructions.
///
/// # Errors
///
/// See [`Materializer::parse`].
///
/// ```rust
/// use serde_construct::{materialize, Error};
///
/// assert!(matches!(materialize("[1,]"), Err(Error::Syntax { .. })));
/// assert!(materialize("Map([1, 2])").unwrap().is_object());
/// ```
pub fn materialize(text: &str) -> Result<Value> {
    Notation::new().materialize(text)
}

/// Serialize any `T: Serialize` as text.
///
/// # Examples
///
/// ```rust
/// use serde_construct::to_string;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// assert_eq!(to_string(&Point { x: 1, y: 2 }).unwrap(), "{x:1,y:2}");
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be converted or serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, Options::default())
}

/// Serialize any `T: Serialize` as pretty-printed text.
///
/// # Examples
///
/// ```rust
/// use serde_construct::to_string_pretty;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let text = to_string_pretty(&Point { x: 1, y: 2 }).unwrap();
/// assert_eq!(text, "{\n  x: 1,\n  y: 2\n}");
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be converted or serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_pretty<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, Options::pretty())
}

/// Serialize any `T: Serialize` as text with custom options.
///
/// # Errors
///
/// Returns an error if the value cannot be converted or serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, options: Options) -> Result<String>
where
    T: ?Sized + Serialize,
{
    serialize_with_options(&to_value(value)?, options)
}

/// Serialize any `T: Serialize` to a writer.
///
/// # Examples
///
/// ```rust
/// use serde_construct::to_writer;
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &vec![1, 2, 3]).unwrap();
/// assert_eq!(buffer, b"[1,2,3]");
/// ```
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    to_writer_with_options(writer, value, Options::default())
}

/// Serialize any `T: Serialize` to a writer with custom options.
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W, T>(mut writer: W, value: &T, options: Options) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let text = to_string_with_options(value, options)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Deserialize an instance of type `T` from text.
///
/// # Examples
///
/// ```rust
/// use serde_construct::from_str;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_str("{x: 1, y: 2}").unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if the text does not materialize, the value is cyclic, or
/// it cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    from_value(materialize(s)?)
}

/// Deserialize an instance of type `T` from an I/O stream.
///
/// # Examples
///
/// ```rust
/// use serde_construct::from_reader;
/// use std::io::Cursor;
///
/// let numbers: Vec<u8> = from_reader(Cursor::new(b"[1, 2, 3]")).unwrap();
/// assert_eq!(numbers, vec![1, 2, 3]);
/// ```
///
/// # Errors
///
/// Returns an error if reading from the reader fails or [`from_str`] fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(mut reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut string = String::new();
    reader
        .read_to_string(&mut string)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_str(&string)
}

/// Deserialize an instance of type `T` from bytes of text.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8 or [`from_str`] fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(v: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    let s = std::str::from_utf8(v).map_err(|e| Error::custom(e.to_string()))?;
    from_str(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::collections::BTreeMap;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct User {
        id: u32,
        name: String,
        active: bool,
        tags: Vec<String>,
        scores: BTreeMap<String, f64>,
    }

    fn user() -> User {
        User {
            id: 123,
            name: "Alice".to_string(),
            active: true,
            tags: vec!["admin".to_string(), "user".to_string()],
            scores: BTreeMap::from([("math".to_string(), 9.5), ("art".to_string(), -0.25)]),
        }
    }

    #[test]
    fn test_serialize_deserialize_point() {
        let point = Point { x: 1, y: 2 };
        let text = to_string(&point).unwrap();
        let point_back: Point = from_str(&text).unwrap();
        assert_eq!(point, point_back);
    }

    #[test]
    fn test_serialize_deserialize_user() {
        let text = to_string(&user()).unwrap();
        let user_back: User = from_str(&text).unwrap();
        assert_eq!(user(), user_back);
    }

    #[test]
    fn test_pretty_printing() {
        let text = to_string_pretty(&user()).unwrap();
        assert!(text.contains('\n'));
        let user_back: User = from_str(&text).unwrap();
        assert_eq!(user(), user_back);
    }

    #[test]
    fn test_large_integers_survive() {
        let big = u64::MAX - 1;
        let text = to_string(&big).unwrap();
        assert_eq!(text, r#"BigInt("18446744073709551614")"#);
        assert_eq!(from_str::<u64>(&text).unwrap(), big);
    }

    #[test]
    fn test_bytes_become_typed_array() {
        let value = serde::Serializer::serialize_bytes(ValueSerializer, &[1, 2, 255]).unwrap();
        assert_eq!(serialize(&value).unwrap(), "Uint8Array(1,2,255)");
    }

    #[test]
    fn test_from_slice_rejects_invalid_utf8() {
        assert!(matches!(from_slice::<u8>(&[0xff]), Err(Error::Custom(_))));
    }

    #[test]
    fn test_notation_keeps_auto_included_constructions() {
        static THING: Class = Class::new("Thing");

        let mut notation = Notation::empty();
        let thing = Value::Object(Object::instance(TypeToken::of(&THING)));
        let options = Options::new().with_auto_include(true);
        assert_eq!(notation.serialize_with(&thing, options).unwrap(), "Thing({})");
        assert!(notation.registry().record("Thing").is_some());
        assert_eq!(notation.materialize("Thing({})").unwrap(), thing);
    }
}
