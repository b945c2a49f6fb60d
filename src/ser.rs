//! Serialization.
//!
//! This module provides the [`Serializer`] that writes a [`Value`] graph as
//! text, and [`ValueSerializer`], a `serde` serializer that turns Rust data into
//! a [`Value`] tree.
//!
//! ## Overview
//!
//! - **Literals**: `null`, booleans, numbers (`NaN`, `Infinity`, `-0` included)
//!   and JSON-quoted strings
//! - **Plain objects**: `{key:value}` with keys bare whenever they are valid
//!   identifiers
//! - **Instances**: `Identifier(args...)` through the registry
//! - **References**: governed by [`Mode`]
//!
//! ## Usage
//!
//! Most users should go through [`Notation`](crate::Notation) or the functions in
//! the crate root:
//!
//! ```rust
//! use serde_construct::{serialize, Value};
//!
//! let value = Value::object([("name", Value::from("Ada")), ("tags", Value::array(["x"]))]);
//! assert_eq!(serialize(&value).unwrap(), r#"{name:"Ada",tags:["x"]}"#);
//! ```
//!
//! ## Direct Serializer Usage
//!
//! ```rust
//! use serde_construct::{Mode, Object, Options, Registry, Serializer, Value};
//!
//! let node = Object::new();
//! node.set("x", node.clone());
//!
//! let mut registry = Registry::with_defaults();
//! let mut serializer = Serializer::new(&mut registry, Options::new().with_mode(Mode::Circular));
//! serializer.serialize(&Value::Object(node)).unwrap();
//! assert_eq!(serializer.into_inner(), "$0={x:$0}");
//! ```

use crate::class::{TypeToken, BIGINT};
use crate::library::TypedArray;
use crate::options::{Mode, OnUndefined, Options};
use crate::registry::{is_identifier, Construction, Registry};
use crate::{Array, Error, Object, Result, Value};
use indexmap::IndexMap;
use num_bigint::BigInt;
use serde::{ser, Serialize};
use std::rc::Rc;
use tracing::trace;

/// Largest integer magnitude a `Number` holds exactly.
const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

/// Writes value graphs as text.
///
/// One serializer handles one top-level value; the reference bookkeeping it
/// keeps is discarded with it.
pub struct Serializer<'r> {
    output: String,
    options: Options,
    registry: &'r mut Registry,
    indent_level: usize,
    /// Addresses of the compound values currently being written.
    parents: Vec<usize>,
    /// Every compound value written so far, by address, in order of first sight.
    /// Holding the value keeps its address from being reused during the call.
    visited: IndexMap<usize, Value>,
    replacing: bool,
}

impl<'r> Serializer<'r> {
    pub fn new(registry: &'r mut Registry, options: Options) -> Self {
        Serializer {
            output: String::with_capacity(256),
            options,
            registry,
            indent_level: 0,
            parents: Vec::new(),
            visited: IndexMap::new(),
            replacing: false,
        }
    }

    pub fn into_inner(self) -> String {
        self.output
    }

    /// Writes `value` to the output.
    ///
    /// # Errors
    ///
    /// Returns a serialization error when the mode forbids a repeated or circular
    /// reference or the undefined policy fails, and a lookup error for instances
    /// of unregistered classes.
    pub fn serialize(&mut self, value: &Value) -> Result<()> {
        self.write_value(value)
    }

    fn write_newline(&mut self) {
        if self.options.pretty {
            self.output.push('\n');
            for _ in 0..self.indent_level * self.options.indent {
                self.output.push(' ');
            }
        }
    }

    fn write_value(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Undefined => self.write_undefined(),
            Value::Null => {
                self.output.push_str("null");
                Ok(())
            }
            Value::Bool(b) => {
                self.output.push_str(if *b { "true" } else { "false" });
                Ok(())
            }
            Value::Number(n) => {
                self.output.push_str(&format_number(*n));
                Ok(())
            }
            Value::String(s) => self.write_string(s),
            Value::BigInt(_) => {
                let construction = self.construction_for(TypeToken::of(&BIGINT))?;
                let args = construction.serialize(value)?;
                self.write_construction(construction.identifier(), &args)
            }
            Value::Type(type_token) => {
                let construction = self.registry.record(*type_token).ok_or_else(|| {
                    Error::lookup(format!(
                        "no construction registered for type `{}`",
                        type_token.name()
                    ))
                })?;
                self.output.push('$');
                self.output.push_str(construction.identifier());
                Ok(())
            }
            Value::Array(_) | Value::Object(_) => self.write_compound(value),
        }
    }

    fn write_undefined(&mut self) -> Result<()> {
        if self.replacing {
            self.output.push_str("void");
            return Ok(());
        }
        let replacement = match &self.options.on_undefined {
            OnUndefined::Fail(msg) => return Err(Error::serialization(msg)),
            OnUndefined::Replace(value) => value.clone(),
            OnUndefined::Call(callback) => callback(),
        };
        if replacement.is_undefined() {
            self.output.push_str("void");
            return Ok(());
        }
        self.replacing = true;
        let result = self.write_value(&replacement);
        self.replacing = false;
        result
    }

    fn write_string(&mut self, s: &str) -> Result<()> {
        let quoted = serde_json::to_string(s).map_err(Error::serialization)?;
        self.output.push_str(&quoted);
        Ok(())
    }

    fn write_key(&mut self, key: &str) -> Result<()> {
        if is_identifier(key) && key != "__proto__" {
            self.output.push_str(key);
            Ok(())
        } else {
            self.write_string(key)
        }
    }

    fn write_colon(&mut self) {
        self.output.push(':');
        if self.options.pretty {
            self.output.push(' ');
        }
    }

    /// Applies the reference policy, then writes the body.
    fn write_compound(&mut self, value: &Value) -> Result<()> {
        let Some(address) = value.address() else {
            return self.write_value(value);
        };
        let mode = self.options.mode;

        if self.parents.contains(&address) {
            if mode == Mode::Circular {
                return self.write_reference(address);
            }
            return Err(Error::serialization(format!(
                "circular reference to {} is not allowed in {:?} mode",
                value.kind(),
                mode
            )));
        }

        // Undefined fillers are written afresh at every hole, outside the
        // visited set.
        if mode.tracks_visited() && !self.replacing {
            if self.visited.contains_key(&address) {
                if mode == Mode::Basic {
                    return Err(Error::serialization(format!(
                        "repeated reference to {} is not allowed in Basic mode",
                        value.kind()
                    )));
                }
                return self.write_reference(address);
            }
            let index = self.visited.len();
            self.visited.insert(address, value.clone());
            if mode.binds() {
                self.output.push('$');
                self.output.push_str(&index.to_string());
                self.output.push('=');
            }
        }

        self.parents.push(address);
        let result = match value {
            Value::Array(array) => self.write_array(array),
            Value::Object(object) => self.write_object(object),
            _ => Ok(()),
        };
        self.parents.pop();
        result
    }

    fn write_reference(&mut self, address: usize) -> Result<()> {
        let index = self
            .visited
            .get_index_of(&address)
            .ok_or_else(|| Error::serialization("reference to a value that was never written"))?;
        trace!(index, "wrote back-reference");
        self.output.push('$');
        self.output.push_str(&index.to_string());
        Ok(())
    }

    fn write_array(&mut self, array: &Array) -> Result<()> {
        let items = array.to_vec();
        self.output.push('[');
        if !items.is_empty() {
            self.indent_level += 1;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    self.output.push(',');
                }
                self.write_newline();
                self.write_value(item)?;
            }
            self.indent_level -= 1;
            self.write_newline();
        }
        self.output.push(']');
        Ok(())
    }

    fn write_object(&mut self, object: &Object) -> Result<()> {
        if self.options.use_constructions && !object.is_plain() {
            let construction = self.construction_for(object.class())?;
            let args = construction.serialize(&Value::Object(object.clone()))?;
            return self.write_construction(construction.identifier(), &args);
        }

        let proto = object.proto();
        let entries = object.entries();
        self.output.push('{');
        if proto.is_some() || !entries.is_empty() {
            self.indent_level += 1;
            let mut first = true;
            if let Some(proto) = proto {
                self.write_newline();
                self.output.push_str("__proto__");
                self.write_colon();
                self.write_value(&Value::Object(proto))?;
                first = false;
            }
            for (key, value) in &entries {
                if !first {
                    self.output.push(',');
                }
                first = false;
                self.write_newline();
                self.write_key(key)?;
                self.write_colon();
                self.write_value(value)?;
            }
            self.indent_level -= 1;
            self.write_newline();
        }
        self.output.push('}');
        Ok(())
    }

    fn write_construction(&mut self, identifier: &str, args: &[Value]) -> Result<()> {
        if is_identifier(identifier) {
            self.output.push_str(identifier);
        } else {
            self.write_string(identifier)?;
        }
        self.output.push('(');
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                self.output.push(',');
                if self.options.pretty {
                    self.output.push(' ');
                }
            }
            self.write_value(arg)?;
        }
        self.output.push(')');
        Ok(())
    }

    fn construction_for(&mut self, class: TypeToken) -> Result<Rc<Construction>> {
        match self.registry.record(class) {
            Some(construction) => Ok(construction),
            None if self.options.auto_include => self.registry.auto_register(class),
            None => Err(Error::lookup(format!(
                "no construction registered for class `{}`",
                class.name()
            ))),
        }
    }
}

/// Formats a number the way it is written in text: `NaN`, `Infinity` and `-0`
/// spelled out, exponent notation below `1e-6` and from `1e21` up.
///
/// ```rust
/// use serde_construct::ser::format_number;
///
/// assert_eq!(format_number(1.5), "1.5");
/// assert_eq!(format_number(-0.0), "-0");
/// assert_eq!(format_number(1e21), "1e+21");
/// assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
/// ```
#[must_use]
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return if n.is_sign_negative() { "-0" } else { "0" }.to_string();
    }
    let magnitude = n.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let formatted = format!("{:e}", n);
        match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => formatted,
        }
    } else {
        format!("{}", n)
    }
}

/// Converts Rust values implementing `Serialize` into [`Value`] trees.
///
/// Integers beyond ±(2^53 - 1) become big integers, byte strings become a
/// `Uint8Array`, and enum variants with data are written externally tagged, as
/// `{variant: data}`.
pub struct ValueSerializer;

pub struct SerializeVec {
    vec: Vec<Value>,
    variant: Option<&'static str>,
}

pub struct SerializeMap {
    object: Object,
    current_key: Option<String>,
    variant: Option<&'static str>,
}

fn integer(v: i128) -> Value {
    if v.unsigned_abs() <= u128::from(MAX_SAFE_INTEGER) {
        Value::Number(v as f64)
    } else {
        Value::BigInt(BigInt::from(v))
    }
}

fn tagged(variant: &'static str, value: Value) -> Value {
    let object = Object::new();
    object.set(variant, value);
    Value::Object(object)
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeVec;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeMap;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(integer(i128::from(v)))
    }

    fn serialize_i128(self, v: i128) -> Result<Value> {
        Ok(integer(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        Ok(integer(i128::from(v)))
    }

    fn serialize_u128(self, v: u128) -> Result<Value> {
        match i128::try_from(v) {
            Ok(v) => Ok(integer(v)),
            Err(_) => Ok(Value::BigInt(BigInt::from(v))),
        }
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(Value::Number(f64::from(v)))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::Number(v))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(Value::typed_array(TypedArray::Uint8(v.to_vec())))
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        Ok(tagged(variant, to_value(value)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len.unwrap_or(0), None))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, None))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, None))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, Some(variant)))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::new(None))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap::new(None))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<SerializeMap> {
        Ok(SerializeMap::new(Some(variant)))
    }
}

impl SerializeVec {
    fn new(capacity: usize, variant: Option<&'static str>) -> Self {
        SerializeVec {
            vec: Vec::with_capacity(capacity),
            variant,
        }
    }

    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn finish(self) -> Value {
        let array = Value::Array(Array::from_vec(self.vec));
        match self.variant {
            Some(variant) => tagged(variant, array),
            None => array,
        }
    }
}

impl SerializeMap {
    fn new(variant: Option<&'static str>) -> Self {
        SerializeMap {
            object: Object::new(),
            current_key: None,
            variant,
        }
    }

    fn finish(self) -> Value {
        let object = Value::Object(self.object);
        match self.variant {
            Some(variant) => tagged(variant, object),
            None => object,
        }
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleVariant for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = match to_value(key)? {
            Value::String(s) => s,
            Value::Number(n) => format_number(n),
            Value::Bool(b) => b.to_string(),
            Value::BigInt(b) => b.to_string(),
            other => {
                return Err(Error::custom(format!(
                    "map keys must be strings or numbers, found {}",
                    other.kind()
                )))
            }
        };
        self.current_key = Some(key);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.object.set(key, to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.object.set(key, to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeStructVariant for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.object.set(key, to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

/// Converts `value` into a [`Value`] tree.
///
/// # Errors
///
/// Returns an error if `value`'s `Serialize` implementation fails or produces a
/// map key that is not a string, number or boolean.
///
/// ```rust
/// use serde::Serialize;
/// use serde_construct::{to_value, Value};
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let value = to_value(&Point { x: 1, y: 2 }).unwrap();
/// assert_eq!(value, Value::object([("x", 1), ("y", 2)]));
/// ```
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    value.serialize(ValueSerializer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::ErrorKind;
    use crate::{Class, ConstructionSpec};
    use std::collections::BTreeMap;

    fn write(value: &Value, options: Options) -> Result<String> {
        let mut registry = Registry::with_defaults();
        let mut serializer = Serializer::new(&mut registry, options);
        serializer.serialize(value)?;
        Ok(serializer.into_inner())
    }

    fn basic(value: &Value) -> String {
        write(value, Options::new()).unwrap()
    }

    #[test]
    fn test_primitives() {
        assert_eq!(basic(&Value::Null), "null");
        assert_eq!(basic(&Value::Bool(true)), "true");
        assert_eq!(basic(&Value::from(42)), "42");
        assert_eq!(basic(&Value::from(f64::NAN)), "NaN");
        assert_eq!(basic(&Value::from("a\"b\\c\n")), r#""a\"b\\c\n""#);
        assert_eq!(basic(&Value::Undefined), "void");
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(format_number(100.0), "100");
        assert_eq!(format_number(0.000001), "0.000001");
        assert_eq!(format_number(1.5e-7), "1.5e-7");
        assert_eq!(format_number(-2.5e22), "-2.5e+22");
        assert_eq!(format_number(123456789012345680000.0), "123456789012345680000");
    }

    #[test]
    fn test_keys_are_quoted_when_needed() {
        let value = Value::object([
            ("plain", 1),
            ("with space", 2),
            ("null", 3),
            ("__proto__", 4),
            ("a.b-c", 5),
            ("1x", 6),
        ]);
        assert_eq!(
            basic(&value),
            r#"{plain:1,"with space":2,"null":3,"__proto__":4,a.b-c:5,"1x":6}"#
        );
    }

    #[test]
    fn test_prototype_is_written_first() {
        let parent = Object::new();
        parent.set("kind", "base");
        let child = Object::new();
        child.set("own", true);
        child.set_proto(Some(parent)).unwrap();
        assert_eq!(
            basic(&Value::Object(child)),
            r#"{__proto__:{kind:"base"},own:true}"#
        );
    }

    #[test]
    fn test_sparse_arrays_use_undefined_policy() {
        let array = Array::with_len(3);
        array.set(1, 7);
        let value = Value::Array(array);
        assert_eq!(basic(&value), "[void,7,void]");

        let options = Options::new().with_on_undefined(OnUndefined::Replace(Value::Null));
        assert_eq!(write(&value, options).unwrap(), "[null,7,null]");

        let options = Options::new().with_on_undefined(OnUndefined::Fail("no holes".into()));
        assert!(matches!(write(&value, options), Err(Error::Serialization(msg)) if msg == "no holes"));
    }

    #[test]
    fn test_compound_filler_is_written_at_every_hole() {
        let value = Value::Array(Array::with_len(2));
        let filler = OnUndefined::Replace(Value::array([0]));

        let options = Options::new().with_on_undefined(filler.clone());
        assert_eq!(write(&value, options).unwrap(), "[[0],[0]]");

        let options = Options::new().with_on_undefined(filler).with_mode(Mode::Binding);
        assert_eq!(write(&value, options).unwrap(), "$0=[[0],[0]]");
    }

    #[test]
    fn test_undefined_callback_is_not_reentered() {
        let options = Options::new().with_on_undefined(OnUndefined::Call(Rc::new(|| {
            Value::array([Value::Undefined, Value::from(0)])
        })));
        assert_eq!(write(&Value::Undefined, options).unwrap(), "[void,0]");

        let options = Options::new().with_on_undefined(OnUndefined::Call(Rc::new(|| Value::Undefined)));
        assert_eq!(write(&Value::Undefined, options).unwrap(), "void");
    }

    #[test]
    fn test_mode_table() {
        let shared = Value::Object(Object::new());
        let list = Value::array([shared.clone(), shared]);

        assert!(matches!(write(&list, Options::new()), Err(Error::Serialization(_))));
        assert_eq!(write(&list, Options::new().with_mode(Mode::Repeat)).unwrap(), "[{},{}]");
        assert_eq!(
            write(&list, Options::new().with_mode(Mode::Binding)).unwrap(),
            "$0=[$1={},$1]"
        );
        assert_eq!(
            write(&list, Options::new().with_mode(Mode::Circular)).unwrap(),
            "$0=[$1={},$1]"
        );

        let cyclic = Array::new();
        cyclic.push(cyclic.clone());
        let cyclic = Value::Array(cyclic);
        for mode in [Mode::Basic, Mode::Repeat, Mode::Binding] {
            assert!(matches!(
                write(&cyclic, Options::new().with_mode(mode)),
                Err(Error::Serialization(_))
            ));
        }
        assert_eq!(write(&cyclic, Options::new().with_mode(Mode::Circular)).unwrap(), "$0=[$0]");
    }

    #[test]
    fn test_builtin_constructions() {
        assert_eq!(
            basic(&Value::date_from_millis(86_400_000.0 + 1.0)),
            "Date(1970,0,2,0,0,0,1)"
        );
        assert_eq!(basic(&Value::regexp("a+", "g").unwrap()), r#"RegExp("a+","g")"#);
        assert_eq!(basic(&Value::BigInt(BigInt::from(-5))), r#"BigInt("-5")"#);
        assert_eq!(
            basic(&Value::error(ErrorKind::TypeError, "bad")),
            r#"TypeError("bad")"#
        );
        assert_eq!(
            basic(&Value::map([(Value::from("k"), Value::from(1))])),
            r#"Map(["k",1])"#
        );
    }

    #[test]
    fn test_type_tokens() {
        let date = Registry::with_defaults().record("Date").unwrap().type_token();
        assert_eq!(basic(&Value::Type(date)), "$Date");
    }

    #[test]
    fn test_constructions_can_be_disabled() {
        let date = Value::date_from_millis(0.0);
        let options = Options::new().with_constructions(false);
        assert_eq!(write(&date, options).unwrap(), "{}");
    }

    static WIDGET: Class = Class::new("Widget");

    #[test]
    fn test_unknown_class() {
        let widget = Object::instance(TypeToken::of(&WIDGET));
        widget.set("size", 3);
        let widget = Value::Object(widget);

        assert!(matches!(write(&widget, Options::new()), Err(Error::Lookup(_))));
        assert_eq!(
            write(&widget, Options::new().with_auto_include(true)).unwrap(),
            "Widget({size:3})"
        );
    }

    #[test]
    fn test_identifier_quoting() {
        let mut registry = Registry::new();
        registry
            .register(
                ConstructionSpec::generic(TypeToken::of(&WIDGET)).with_identifier("ui.Widget-v2"),
            )
            .unwrap();
        let mut serializer = Serializer::new(&mut registry, Options::new());
        serializer
            .serialize(&Value::Object(Object::instance(TypeToken::of(&WIDGET))))
            .unwrap();
        assert_eq!(serializer.into_inner(), "ui.Widget-v2({})");
    }

    #[test]
    fn test_pretty_layout() {
        let value = Value::object([
            ("a", Value::array([1, 2])),
            ("b", Value::Object(Object::new())),
            ("c", Value::date_from_millis(0.0)),
        ]);
        assert_eq!(
            write(&value, Options::pretty()).unwrap(),
            "{\n  a: [\n    1,\n    2\n  ],\n  b: {},\n  c: Date(1970, 0, 1, 0, 0, 0, 0)\n}"
        );
    }

    #[test]
    fn test_to_value() {
        assert_eq!(to_value(&(1u8, "x")).unwrap(), Value::array([Value::from(1), Value::from("x")]));
        assert_eq!(to_value(&u64::MAX).unwrap(), Value::BigInt(BigInt::from(u64::MAX)));
        assert_eq!(to_value(&(1i64 << 53)).unwrap(), Value::BigInt(BigInt::from(1i64 << 53)));
        assert_eq!(to_value(&Option::<i32>::None).unwrap(), Value::Null);

        let mut map = BTreeMap::new();
        map.insert(1, "one");
        assert_eq!(to_value(&map).unwrap(), Value::object([("1", "one")]));
    }

    #[test]
    fn test_to_value_enums() {
        #[derive(Serialize)]
        enum Shape {
            Dot,
            Circle(f64),
            Rect { w: u32, h: u32 },
        }

        assert_eq!(to_value(&Shape::Dot).unwrap(), Value::from("Dot"));
        assert_eq!(
            to_value(&Shape::Circle(1.5)).unwrap(),
            Value::object([("Circle", 1.5)])
        );
        assert_eq!(
            to_value(&Shape::Rect { w: 2, h: 3 }).unwrap(),
            Value::object([("Rect", Value::object([("w", 2), ("h", 3)]))])
        );
    }
}
