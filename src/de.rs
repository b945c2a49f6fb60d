//! Materialization.
//!
//! This module provides the [`Materializer`] that parses text back into a
//! [`Value`] graph, and [`ValueDeserializer`], a `serde` deserializer that reads
//! Rust data out of an acyclic [`Value`].
//!
//! ## Overview
//!
//! The materializer is a recursive descent parser over the [`Lexer`]:
//!
//! - **Bindings**: `$name=value` binds, `$name` refers back; arrays, objects
//!   and constructions are bound before their contents are parsed so they can
//!   contain themselves
//! - **Constructions**: `Identifier(args...)` is resolved through the registry
//! - **Type tokens**: `$Identifier` of a registered construction that is not
//!   bound yields its type
//! - **Prototypes**: a bare `__proto__` member sets the prototype; a quoted one
//!   is an ordinary member
//!
//! ## Usage
//!
//! ```rust
//! use serde_construct::materialize;
//!
//! let value = materialize("$0={self:$0, when:Date(2024, 0, 31)}").unwrap();
//! let object = value.as_object().unwrap();
//! assert!(object.get("self").unwrap().same(&value));
//! assert_eq!(object.get("when").unwrap().kind(), "Date");
//! ```

use crate::lexer::{Atom, Lexeme, Lexer, Token, TokenKind};
use crate::registry::Registry;
use crate::{Array, Error, Object, Result, Slot, Value};
use num_bigint::BigInt;
use serde::de::{self, DeserializeOwned};
use serde::forward_to_deserialize_any;
use std::collections::HashMap;
use tracing::trace;

/// Nesting limit applied unless [`Materializer::with_max_depth`] says otherwise.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Parses one value from text.
///
/// A materializer is used once: [`Materializer::parse`] consumes it together
/// with its bindings.
pub struct Materializer<'a, 'r> {
    lexer: Lexer<'a>,
    registry: &'r Registry,
    bindings: HashMap<String, Value>,
    depth: usize,
    max_depth: usize,
}

impl<'a, 'r> Materializer<'a, 'r> {
    #[must_use]
    pub fn new(input: &'a str, registry: &'r Registry) -> Self {
        Materializer {
            lexer: Lexer::new(input),
            registry,
            bindings: HashMap::new(),
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parses the whole input as exactly one value.
    ///
    /// # Errors
    ///
    /// - [`Error::Syntax`] for malformed input, trailing tokens or nesting beyond
    ///   the depth limit
    /// - [`Error::Reference`] for rebinding a name or using an unbound one
    /// - [`Error::Lookup`] for an unknown construction identifier
    /// - [`Error::Consistency`] when a bound construction does not finalize its
    ///   placeholder
    pub fn parse(mut self) -> Result<Value> {
        let value = self.parse_value()?;
        if let Some(token) = self.lexer.peek(None)?.cloned() {
            return Err(self.unexpected(&token, "after the value"));
        }
        Ok(value)
    }

    fn unexpected(&self, token: &Token, context: &str) -> Error {
        self.lexer
            .error(token.offset, &format!("unexpected {} {}", token, context))
    }

    fn parse_value(&mut self) -> Result<Value> {
        let token = self.lexer.shift(None)?;
        self.parse_token(token, None)
    }

    /// Parses the value starting with `token`. A `binding` name is bound to the
    /// value as early as its kind allows.
    fn parse_token(&mut self, token: Token, binding: Option<String>) -> Result<Value> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(self.lexer.error(
                token.offset,
                &format!("nesting deeper than {} levels", self.max_depth),
            ));
        }
        let result = self.parse_token_unguarded(token, binding);
        self.depth -= 1;
        result
    }

    fn parse_token_unguarded(&mut self, token: Token, binding: Option<String>) -> Result<Value> {
        let value = match token.lexeme {
            Lexeme::Symbol('[') => {
                let array = Array::new();
                self.bind(binding, Value::Array(array.clone()));
                self.parse_array_body(&array)?;
                return Ok(Value::Array(array));
            }
            Lexeme::Symbol('{') => {
                let object = Object::new();
                self.bind(binding, Value::Object(object.clone()));
                self.parse_object_body(&object)?;
                return Ok(Value::Object(object));
            }
            Lexeme::Identifier(identifier) => {
                self.lexer.shift(Some(TokenKind::Symbol('(')))?;
                return self.parse_construction(&identifier, binding);
            }
            Lexeme::String(s) => {
                if self.lexer.peek(Some(TokenKind::Symbol('(')))?.is_some() {
                    self.lexer.shift(None)?;
                    return self.parse_construction(&s, binding);
                }
                Value::String(s)
            }
            Lexeme::Binding(name) => self.parse_binding(name)?,
            Lexeme::Atom(Atom::True) => Value::Bool(true),
            Lexeme::Atom(Atom::False) => Value::Bool(false),
            Lexeme::Atom(Atom::Null) => Value::Null,
            Lexeme::Atom(Atom::Void) => Value::Undefined,
            Lexeme::Numeral(n) => Value::Number(n),
            Lexeme::Template(s) => Value::String(s),
            Lexeme::Symbol(_) => {
                return Err(self.unexpected(&token, "where a value was expected"));
            }
        };
        self.bind(binding, value.clone());
        Ok(value)
    }

    fn bind(&mut self, binding: Option<String>, value: Value) {
        if let Some(name) = binding {
            trace!(name = %name, kind = value.kind(), "bound");
            self.bindings.insert(name, value);
        }
    }

    /// `$name=value` or `$name`; the `$name` token is already consumed.
    fn parse_binding(&mut self, name: String) -> Result<Value> {
        if self.lexer.peek(Some(TokenKind::Symbol('=')))?.is_some() {
            self.lexer.shift(None)?;
            if self.bindings.contains_key(&name) {
                return Err(Error::reference(&name, "is already bound"));
            }
            let token = self.lexer.shift(None)?;
            return self.parse_token(token, Some(name));
        }

        if let Some(value) = self.bindings.get(&name) {
            return Ok(value.clone());
        }
        match self.registry.record(name.as_str()) {
            Some(construction) => Ok(Value::Type(construction.type_token())),
            None => Err(Error::reference(&name, "is not bound")),
        }
    }

    /// The opening `[` is already consumed.
    fn parse_array_body(&mut self, array: &Array) -> Result<()> {
        if self.lexer.peek(Some(TokenKind::Symbol(']')))?.is_some() {
            self.lexer.shift(None)?;
            return Ok(());
        }
        loop {
            let item = self.parse_value()?;
            array.push(item);
            let token = self.lexer.shift(None)?;
            match token.lexeme {
                Lexeme::Symbol(',') => continue,
                Lexeme::Symbol(']') => return Ok(()),
                _ => return Err(self.unexpected(&token, "in array, expected `,` or `]`")),
            }
        }
    }

    /// The opening `{` is already consumed.
    fn parse_object_body(&mut self, object: &Object) -> Result<()> {
        if self.lexer.peek(Some(TokenKind::Symbol('}')))?.is_some() {
            self.lexer.shift(None)?;
            return Ok(());
        }
        loop {
            let token = self.lexer.shift(None)?;
            let (key, bare) = match token.lexeme {
                Lexeme::Identifier(key) => (key, true),
                Lexeme::String(key) => (key, false),
                _ => return Err(self.unexpected(&token, "where a member name was expected")),
            };
            self.lexer.shift(Some(TokenKind::Symbol(':')))?;
            let value = self.parse_value()?;

            if bare && key == "__proto__" {
                match value {
                    Value::Object(proto) => object.set_proto(Some(proto))?,
                    Value::Null => object.set_proto(None)?,
                    _ => {}
                }
            } else {
                object.set(key, value);
            }

            let token = self.lexer.shift(None)?;
            match token.lexeme {
                Lexeme::Symbol(',') => continue,
                Lexeme::Symbol('}') => return Ok(()),
                _ => return Err(self.unexpected(&token, "in object, expected `,` or `}`")),
            }
        }
    }

    /// `identifier(` is already consumed.
    fn parse_construction(&mut self, identifier: &str, binding: Option<String>) -> Result<Value> {
        let construction = self
            .registry
            .record(identifier)
            .ok_or_else(|| Error::lookup(format!("unknown construction `{}`", identifier)))?;

        let Some(name) = binding else {
            let args = self.parse_args()?;
            return construction.construct(args);
        };

        let placeholder = construction.placeholder()?;
        trace!(name = %name, identifier, "bound placeholder");
        self.bindings.insert(name, placeholder.clone());
        let args = self.parse_args()?;
        let value = construction.finalize(placeholder.clone(), args)?;
        if !value.same(&placeholder) {
            return Err(Error::consistency(construction.identifier()));
        }
        Ok(value)
    }

    /// Arguments up to and including the closing `)`.
    fn parse_args(&mut self) -> Result<Vec<Value>> {
        let mut args = Vec::new();
        if self.lexer.peek(Some(TokenKind::Symbol(')')))?.is_some() {
            self.lexer.shift(None)?;
            return Ok(args);
        }
        loop {
            args.push(self.parse_value()?);
            let token = self.lexer.shift(None)?;
            match token.lexeme {
                Lexeme::Symbol(',') => continue,
                Lexeme::Symbol(')') => return Ok(args),
                _ => return Err(self.unexpected(&token, "in arguments, expected `,` or `)`")),
            }
        }
    }
}

struct SeqDeserializer {
    iter: std::vec::IntoIter<Value>,
}

impl SeqDeserializer {
    fn new(vec: Vec<Value>) -> Self {
        SeqDeserializer {
            iter: vec.into_iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

/// Entries of a plain object (string keys) or of a `Map` (any keys).
struct MapDeserializer {
    iter: std::vec::IntoIter<(Value, Value)>,
    value: Option<Value>,
}

impl MapDeserializer {
    fn new(entries: Vec<(Value, Value)>) -> Self {
        MapDeserializer {
            iter: entries.into_iter(),
            value: None,
        }
    }

    fn members(object: &Object) -> Self {
        Self::new(
            object
                .entries()
                .into_iter()
                .map(|(key, value)| (Value::String(key), value))
                .collect(),
        )
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(ValueDeserializer::new(key)).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct EnumDeserializer {
    variant: String,
    value: Option<Value>,
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = VariantDeserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(ValueDeserializer::new(Value::String(self.variant)))?;
        Ok((variant, VariantDeserializer { value: self.value }))
    }
}

struct VariantDeserializer {
    value: Option<Value>,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            None | Some(Value::Null) | Some(Value::Undefined) => Ok(()),
            Some(other) => Err(Error::custom(format!(
                "expected unit variant, found {}",
                other.kind()
            ))),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.value {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(Error::custom("expected newtype variant, found unit variant")),
        }
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Some(Value::Array(array)) => visitor.visit_seq(SeqDeserializer::new(array.to_vec())),
            _ => Err(Error::custom("expected tuple variant")),
        }
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Some(Value::Object(object)) => visitor.visit_map(MapDeserializer::members(&object)),
            _ => Err(Error::custom("expected struct variant")),
        }
    }
}

/// Reads Rust data out of a [`Value`].
///
/// Instances of built-in classes are presented by their state: boxed primitives
/// as the primitive, dates as RFC 3339 strings, sets and typed arrays as
/// sequences, maps as maps, errors by their message. Other instances are
/// presented by their own members.
pub struct ValueDeserializer {
    value: Value,
}

impl ValueDeserializer {
    #[must_use]
    pub fn new(value: Value) -> Self {
        ValueDeserializer { value }
    }
}

fn visit_number<'de, V: de::Visitor<'de>>(n: f64, visitor: V) -> Result<V::Value> {
    const MAX_SAFE: f64 = 9_007_199_254_740_991.0;
    let negative_zero = n == 0.0 && n.is_sign_negative();
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE && !negative_zero {
        if n >= 0.0 {
            visitor.visit_u64(n as u64)
        } else {
            visitor.visit_i64(n as i64)
        }
    } else {
        visitor.visit_f64(n)
    }
}

fn visit_bigint<'de, V: de::Visitor<'de>>(b: &BigInt, visitor: V) -> Result<V::Value> {
    if let Ok(v) = u64::try_from(b) {
        visitor.visit_u64(v)
    } else if let Ok(v) = i64::try_from(b) {
        visitor.visit_i64(v)
    } else if let Ok(v) = u128::try_from(b) {
        visitor.visit_u128(v)
    } else if let Ok(v) = i128::try_from(b) {
        visitor.visit_i128(v)
    } else {
        visitor.visit_string(b.to_string())
    }
}

fn visit_instance<'de, V: de::Visitor<'de>>(object: &Object, visitor: V) -> Result<V::Value> {
    let slot = object.slot().clone();
    match slot {
        Slot::None => visitor.visit_map(MapDeserializer::members(object)),
        Slot::Boolean(b) => visitor.visit_bool(b),
        Slot::Number(n) => visit_number(n, visitor),
        Slot::String(s) | Slot::Function(s) => visitor.visit_string(s),
        Slot::Date(Some(dt)) => {
            visitor.visit_string(dt.to_rfc3339_opts(chrono::SecondsFormat::Millis, true))
        }
        Slot::Date(None) => visitor.visit_unit(),
        Slot::RegExp(regexp) => visitor.visit_string(regexp.to_string()),
        Slot::Set(values) => visitor.visit_seq(SeqDeserializer::new(values)),
        Slot::Map(entries) => visitor.visit_map(MapDeserializer::new(entries)),
        Slot::Error(data) => visitor.visit_string(data.message),
        Slot::TypedArray(array) => visitor.visit_seq(SeqDeserializer::new(
            array.to_numbers().into_iter().map(Value::Number).collect(),
        )),
        Slot::Json(payload) => {
            de::Deserializer::deserialize_any(payload, visitor).map_err(Error::custom)
        }
    }
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Undefined | Value::Null => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Number(n) => visit_number(n, visitor),
            Value::BigInt(b) => visit_bigint(&b, visitor),
            Value::String(s) => visitor.visit_string(s),
            Value::Type(type_token) => visitor.visit_str(type_token.name()),
            Value::Array(array) => visitor.visit_seq(SeqDeserializer::new(array.to_vec())),
            Value::Object(object) => visit_instance(&object, visitor),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Undefined | Value::Null => visitor.visit_none(),
            value => visitor.visit_some(ValueDeserializer::new(value)),
        }
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if let Value::Object(object) = &self.value {
            if let Slot::TypedArray(crate::library::TypedArray::Uint8(bytes)) = &*object.slot() {
                return visitor.visit_byte_buf(bytes.clone());
            }
        }
        self.deserialize_any(visitor)
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::String(variant) => visitor.visit_enum(EnumDeserializer {
                variant,
                value: None,
            }),
            Value::Object(object) if object.is_plain() && object.len() == 1 => {
                let mut entries = object.entries();
                let (variant, value) = entries.remove(0);
                visitor.visit_enum(EnumDeserializer {
                    variant,
                    value: Some(value),
                })
            }
            other => Err(Error::custom(format!(
                "expected a string or a single-member object for an enum, found {}",
                other.kind()
            ))),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        unit unit_struct seq tuple tuple_struct map struct identifier ignored_any
    }
}

/// Converts a [`Value`] into Rust data.
///
/// # Errors
///
/// Returns an error if `value` contains a cycle or does not have the shape `T`
/// expects.
///
/// ```rust
/// use serde::Deserialize;
/// use serde_construct::{from_value, Value};
///
/// #[derive(Deserialize, Debug, PartialEq)]
/// struct Point { x: i32, y: i32 }
///
/// let value = Value::object([("x", 1), ("y", 2)]);
/// assert_eq!(from_value::<Point>(value).unwrap(), Point { x: 1, y: 2 });
/// ```
pub fn from_value<T: DeserializeOwned>(value: Value) -> Result<T> {
    if !value.is_acyclic() {
        return Err(Error::custom("cannot deserialize a cyclic value"));
    }
    T::deserialize(ValueDeserializer::new(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::TypeToken;
    use crate::library::DATE;
    use serde::Deserialize;
    use std::collections::{BTreeMap, HashSet};

    fn parse(input: &str) -> Result<Value> {
        let registry = Registry::with_defaults();
        Materializer::new(input, &registry).parse()
    }

    #[test]
    fn test_literals() {
        assert_eq!(parse("null").unwrap(), Value::Null);
        assert_eq!(parse("void").unwrap(), Value::Undefined);
        assert_eq!(parse("-Infinity").unwrap(), Value::Number(f64::NEG_INFINITY));
        assert!(parse("NaN").unwrap().as_f64().unwrap().is_nan());
        assert_eq!(parse("`a``b\nc`").unwrap(), Value::from("a`b\nc"));
        assert_eq!(
            parse(r#"[1, "two", {three: 3}]"#).unwrap(),
            Value::array([
                Value::from(1),
                Value::from("two"),
                Value::object([("three", 3)])
            ])
        );
    }

    #[test]
    fn test_syntax_errors() {
        for input in ["{a:1,}", "[1,]", "1 2", "\"a", "", "{a 1}", "foo", "(", "[1 2]"] {
            assert!(
                matches!(parse(input), Err(Error::Syntax { .. })),
                "{input:?} should be a syntax error"
            );
        }
    }

    #[test]
    fn test_self_containing_array() {
        let value = parse("$a=[1,$a]").unwrap();
        let array = value.as_array().unwrap();
        assert!(array.get(1).unwrap().same(&value));
    }

    #[test]
    fn test_shared_references() {
        let value = parse("[$x={n:1},$x]").unwrap();
        let array = value.as_array().unwrap();
        assert!(array.get(0).unwrap().same(&array.get(1).unwrap()));
    }

    #[test]
    fn test_rebinding_is_rejected_before_the_value() {
        let err = parse("[$x=1,$x=[").expect_err("rebinding must fail");
        assert!(matches!(err, Error::Reference { name, .. } if name == "x"));
    }

    #[test]
    fn test_unbound_reference() {
        assert!(matches!(parse("$nope"), Err(Error::Reference { .. })));
    }

    #[test]
    fn test_registered_identifier_is_a_type() {
        assert_eq!(parse("$Date").unwrap(), Value::Type(TypeToken::of(&DATE)));
        // a binding shadows the type
        let value = parse("[$Date=1,$Date]").unwrap();
        assert_eq!(value, Value::array([1, 1]));
    }

    #[test]
    fn test_unknown_construction() {
        assert!(matches!(parse("Widget({})"), Err(Error::Lookup(_))));
    }

    #[test]
    fn test_quoted_construction_identifier() {
        let value = parse(r#""Set"(1, 1, 2)"#).unwrap();
        assert_eq!(value, Value::set([Value::from(1), Value::from(2)]));
        assert_eq!(parse(r#""Set""#).unwrap(), Value::from("Set"));
    }

    #[test]
    fn test_bound_construction_sees_itself() {
        let value = parse("$s=Set(1,$s)").unwrap();
        let object = value.as_object().unwrap();
        match &*object.slot() {
            Slot::Set(values) => assert!(values[1].same(&value)),
            other => panic!("unexpected slot {other:?}"),
        };
    }

    #[test]
    fn test_bound_bigint_is_inconsistent() {
        assert!(matches!(parse(r#"$a=BigInt("1")"#), Err(Error::Consistency(id)) if id == "BigInt"));
        assert_eq!(parse(r#"BigInt("12")"#).unwrap(), Value::BigInt(BigInt::from(12)));
    }

    #[test]
    fn test_prototype_members() {
        let value = parse(r#"{__proto__:{a:1},b:2}"#).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.lookup("a"), Some(Value::from(1)));
        assert_eq!(object.keys(), vec!["b".to_string()]);

        let value = parse(r#"{"__proto__":{a:1}}"#).unwrap();
        let object = value.as_object().unwrap();
        assert!(object.proto().is_none());
        assert!(object.get("__proto__").is_some());

        let value = parse(r#"{__proto__:5}"#).unwrap();
        assert!(value.as_object().unwrap().is_empty());
    }

    fn nested(levels: usize) -> String {
        format!("{}{}", "[".repeat(levels), "]".repeat(levels))
    }

    #[test]
    fn test_depth_limit() {
        assert!(parse(&nested(DEFAULT_MAX_DEPTH)).is_ok());
        assert!(matches!(
            parse(&nested(DEFAULT_MAX_DEPTH + 1)),
            Err(Error::Syntax { .. })
        ));
        assert!(matches!(parse(&nested(100_000)), Err(Error::Syntax { .. })));

        let levels = DEFAULT_MAX_DEPTH + 1;
        let nested_constructions = format!("{}1{}", "Set(".repeat(levels), ")".repeat(levels));
        assert!(matches!(parse(&nested_constructions), Err(Error::Syntax { .. })));
    }

    #[test]
    fn test_custom_depth_limit() {
        let registry = Registry::with_defaults();
        let deep = nested(20);
        assert!(Materializer::new(&deep, &registry).with_max_depth(10).parse().is_err());
        assert!(Materializer::new(&deep, &registry).with_max_depth(20).parse().is_ok());
    }

    #[test]
    fn test_from_value_shapes() {
        #[derive(Deserialize, Debug, PartialEq)]
        enum Shape {
            Dot,
            Circle(f64),
            Rect { w: u32, h: u32 },
        }

        assert_eq!(from_value::<Shape>(Value::from("Dot")).unwrap(), Shape::Dot);
        assert_eq!(
            from_value::<Shape>(Value::object([("Circle", 1.5)])).unwrap(),
            Shape::Circle(1.5)
        );
        assert_eq!(
            from_value::<Shape>(Value::object([("Rect", Value::object([("w", 2), ("h", 3)]))]))
                .unwrap(),
            Shape::Rect { w: 2, h: 3 }
        );
        assert_eq!(from_value::<Option<u8>>(Value::Null).unwrap(), None);
        assert_eq!(from_value::<u64>(Value::BigInt(BigInt::from(u64::MAX))).unwrap(), u64::MAX);
    }

    #[test]
    fn test_from_value_builtins() {
        let set = parse("Set(1,2,3)").unwrap();
        assert_eq!(from_value::<HashSet<u8>>(set).unwrap(), HashSet::from([1, 2, 3]));

        let map = parse(r#"Map(["a",1],["b",2])"#).unwrap();
        let map: BTreeMap<String, i32> = from_value(map).unwrap();
        assert_eq!(map.get("b"), Some(&2));

        let date = parse("Date(2024,1,29,12,30,0,250)").unwrap();
        assert_eq!(from_value::<String>(date).unwrap(), "2024-02-29T12:30:00.250Z");
    }

    #[test]
    fn test_from_value_rejects_cycles() {
        let value = parse("$0=[$0]").unwrap();
        assert!(from_value::<Vec<Vec<u8>>>(value).is_err());
    }
}
