//! The value graph this format reads and writes.
//!
//! [`Value`] is a dynamically-typed value: primitives are stored inline, while
//! arrays and objects are shared handles ([`Array`], [`Object`]) with pointer
//! identity. Cloning a handle shares the referent, which is how repeated and
//! circular references are expressed.
//!
//! ## Core Types
//!
//! - [`Value`]: undefined, null, booleans, numbers, big integers, strings, arrays,
//!   objects and type tokens
//! - [`Array`]: a shared, growable list of values
//! - [`Object`]: a shared object with a class, an optional prototype, ordered own
//!   members and an internal [`Slot`] for built-in state
//!
//! ## Identity and Equality
//!
//! `==` compares structure: two distinct objects with equal members are equal,
//! cycles included. Use [`Value::same`] to ask whether two values are the *same*
//! reference.
//!
//! ```rust
//! use serde_construct::{Object, Value};
//!
//! let a = Value::Object(Object::new());
//! let b = Value::Object(Object::new());
//!
//! assert_eq!(a, b);
//! assert!(!a.same(&b));
//! assert!(a.same(&a.clone()));
//! ```
//!
//! ## Cycles
//!
//! ```rust
//! use serde_construct::{Object, Value};
//!
//! let node = Object::new();
//! node.set("next", node.clone());
//!
//! let value = Value::Object(node.clone());
//! assert!(!value.is_acyclic());
//! assert!(node.get("next").unwrap().same(&value));
//! ```
//!
//! Handles are reference counted, so a cyclic graph stays allocated until one of
//! its links is removed.

use crate::class::{TypeToken, ARRAY, BIGINT, OBJECT};
use crate::library::{ErrorData, RegExp, TypedArray};
use crate::{Error, Members, Result};
use chrono::{DateTime, Utc};
use num_bigint::BigInt;
use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

/// A dynamically-typed value.
///
/// # Examples
///
/// ```rust
/// use serde_construct::Value;
///
/// let text = Value::from("hello");
/// let number = Value::from(42);
/// let list = Value::array([Value::from(1), Value::from(2)]);
///
/// assert!(text.is_string());
/// assert_eq!(number.as_f64(), Some(42.0));
/// assert_eq!(list.as_array().map(|a| a.len()), Some(2));
/// ```
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    BigInt(BigInt),
    String(String),
    Array(Array),
    Object(Object),
    /// A reference to a registered type, written `$Identifier`.
    Type(TypeToken),
}

/// A shared, growable list of values.
///
/// Slots holding [`Value::Undefined`] are the sparse entries of the list.
#[derive(Clone, Default)]
pub struct Array(Rc<RefCell<Vec<Value>>>);

impl Array {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_vec(values: Vec<Value>) -> Self {
        Array(Rc::new(RefCell::new(values)))
    }

    /// Creates a sparse array of `len` undefined slots.
    #[must_use]
    pub fn with_len(len: usize) -> Self {
        Self::from_vec(vec![Value::Undefined; len])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.borrow().get(index).cloned()
    }

    pub fn push(&self, value: impl Into<Value>) {
        self.0.borrow_mut().push(value.into());
    }

    /// Stores `value` at `index`, padding with undefined slots as needed.
    pub fn set(&self, index: usize, value: impl Into<Value>) {
        let mut items = self.0.borrow_mut();
        if index >= items.len() {
            items.resize(index + 1, Value::Undefined);
        }
        items[index] = value.into();
    }

    /// Returns a snapshot of the elements. Elements themselves stay shared.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Value> {
        self.0.borrow().clone()
    }

    pub fn borrow(&self) -> Ref<'_, Vec<Value>> {
        self.0.borrow()
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Array) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn address(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

/// Built-in state attached to an object, next to its members.
#[derive(Clone, Default)]
pub enum Slot {
    #[default]
    None,
    Boolean(bool),
    Number(f64),
    String(String),
    /// `None` is an invalid date.
    Date(Option<DateTime<Utc>>),
    RegExp(RegExp),
    Set(Vec<Value>),
    Map(Vec<(Value, Value)>),
    Error(ErrorData),
    TypedArray(TypedArray),
    Function(String),
    Json(serde_json::Value),
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::None => write!(f, "None"),
            Slot::Boolean(b) => f.debug_tuple("Boolean").field(b).finish(),
            Slot::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Slot::String(s) => f.debug_tuple("String").field(s).finish(),
            Slot::Date(dt) => f.debug_tuple("Date").field(dt).finish(),
            Slot::RegExp(re) => f.debug_tuple("RegExp").field(re).finish(),
            Slot::Set(values) => write!(f, "Set({} entries)", values.len()),
            Slot::Map(entries) => write!(f, "Map({} entries)", entries.len()),
            Slot::Error(data) => f.debug_tuple("Error").field(data).finish(),
            Slot::TypedArray(array) => f.debug_tuple("TypedArray").field(array).finish(),
            Slot::Function(source) => f.debug_tuple("Function").field(source).finish(),
            Slot::Json(payload) => f.debug_tuple("Json").field(payload).finish(),
        }
    }
}

struct ObjectData {
    class: TypeToken,
    proto: Option<Object>,
    members: Members,
    slot: Slot,
}

/// A shared object: class, optional prototype, ordered members and a slot.
///
/// # Examples
///
/// ```rust
/// use serde_construct::{Object, Value};
///
/// let parent = Object::new();
/// parent.set("greeting", "hi");
///
/// let child = Object::new();
/// child.set_proto(Some(parent)).unwrap();
///
/// assert_eq!(child.get("greeting"), None);
/// assert_eq!(child.lookup("greeting"), Some(Value::from("hi")));
/// ```
#[derive(Clone)]
pub struct Object(Rc<RefCell<ObjectData>>);

impl Object {
    /// Creates an empty plain object.
    #[must_use]
    pub fn new() -> Self {
        Self::instance(TypeToken::of(&OBJECT))
    }

    /// Allocates an empty instance of `class`.
    #[must_use]
    pub fn instance(class: TypeToken) -> Self {
        Self::with_slot(class, Slot::None)
    }

    /// Allocates an instance of `class` carrying built-in state.
    #[must_use]
    pub fn with_slot(class: TypeToken, slot: Slot) -> Self {
        Object(Rc::new(RefCell::new(ObjectData {
            class,
            proto: None,
            members: Members::new(),
            slot,
        })))
    }

    /// Creates a plain object owning `members`.
    #[must_use]
    pub fn from_members(members: Members) -> Self {
        let object = Self::new();
        object.0.borrow_mut().members = members;
        object
    }

    #[must_use]
    pub fn class(&self) -> TypeToken {
        self.0.borrow().class
    }

    /// Returns `true` for objects of the generic `Object` class.
    #[must_use]
    pub fn is_plain(&self) -> bool {
        self.class() == TypeToken::of(&OBJECT)
    }

    /// Reads an own member.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.0.borrow().members.get(key).cloned()
    }

    /// Reads a member, following the prototype chain.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<Value> {
        let mut current = Some(self.clone());
        while let Some(object) = current {
            if let Some(value) = object.get(key) {
                return Some(value);
            }
            current = object.proto();
        }
        None
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.borrow_mut().members.insert(key.into(), value.into())
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        self.0.borrow_mut().members.remove(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.borrow().members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.borrow().members.is_empty()
    }

    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.0.borrow().members.keys().cloned().collect()
    }

    pub fn members(&self) -> Ref<'_, Members> {
        Ref::map(self.0.borrow(), |data| &data.members)
    }

    /// Returns a snapshot of the members in order.
    #[must_use]
    pub fn entries(&self) -> Vec<(String, Value)> {
        self.0
            .borrow()
            .members
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    #[must_use]
    pub fn proto(&self) -> Option<Object> {
        self.0.borrow().proto.clone()
    }

    /// Replaces the prototype.
    ///
    /// # Errors
    ///
    /// Returns an error if `proto` would make the prototype chain cyclic.
    pub fn set_proto(&self, proto: Option<Object>) -> Result<()> {
        let mut current = proto.clone();
        while let Some(object) = current {
            if object.ptr_eq(self) {
                return Err(Error::custom("cyclic prototype chain"));
            }
            current = object.proto();
        }
        self.0.borrow_mut().proto = proto;
        Ok(())
    }

    pub fn slot(&self) -> Ref<'_, Slot> {
        Ref::map(self.0.borrow(), |data| &data.slot)
    }

    /// Swaps in new built-in state, returning the old one.
    pub fn replace_slot(&self, slot: Slot) -> Slot {
        std::mem::replace(&mut self.0.borrow_mut().slot, slot)
    }

    /// Runs `f` with mutable access to the built-in state.
    pub fn with_slot_mut<R>(&self, f: impl FnOnce(&mut Slot) -> R) -> R {
        f(&mut self.0.borrow_mut().slot)
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Object) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn address(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

impl Default for Object {
    fn default() -> Self {
        Self::new()
    }
}

impl Value {
    /// Creates an array value.
    pub fn array<I, T>(items: I) -> Value
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Value::Array(Array::from_vec(items.into_iter().map(Into::into).collect()))
    }

    /// Creates a plain object value from key-value pairs.
    pub fn object<I, K, T>(entries: I) -> Value
    where
        I: IntoIterator<Item = (K, T)>,
        K: Into<String>,
        T: Into<Value>,
    {
        Value::Object(Object::from_members(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        ))
    }

    #[inline]
    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Returns `true` for values with reference identity (arrays and objects).
    #[inline]
    #[must_use]
    pub const fn is_compound(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Object(_))
    }

    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_bigint(&self) -> Option<&BigInt> {
        match self {
            Value::BigInt(b) => Some(b),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_type(&self) -> Option<TypeToken> {
        match self {
            Value::Type(t) => Some(*t),
            _ => None,
        }
    }

    /// The class a construction for this value is registered under.
    #[must_use]
    pub fn class(&self) -> Option<TypeToken> {
        match self {
            Value::Array(_) => Some(TypeToken::of(&ARRAY)),
            Value::Object(o) => Some(o.class()),
            Value::BigInt(_) => Some(TypeToken::of(&BIGINT)),
            _ => None,
        }
    }

    /// A short description of the value's kind, for error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::BigInt(_) => "bigint",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(o) => o.class().name(),
            Value::Type(_) => "type",
        }
    }

    pub(crate) fn address(&self) -> Option<usize> {
        match self {
            Value::Array(a) => Some(a.address()),
            Value::Object(o) => Some(o.address()),
            _ => None,
        }
    }

    /// Identity comparison: the same reference for arrays and objects, the same
    /// value otherwise (`NaN` is the same as `NaN`, `0` is not the same as `-0`).
    #[must_use]
    pub fn same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => {
                (a.is_nan() && b.is_nan())
                    || (a == b && a.is_sign_negative() == b.is_sign_negative())
            }
            _ => self.same_value_zero(other),
        }
    }

    /// Identity comparison used for set membership and map keys: like
    /// [`Value::same`], but `0` and `-0` match.
    #[must_use]
    pub fn same_value_zero(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a.ptr_eq(b),
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Type(a), Value::Type(b)) => a == b,
            _ => false,
        }
    }

    /// Boolean coercion.
    #[must_use]
    pub fn truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::BigInt(b) => b != &BigInt::default(),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) | Value::Type(_) => true,
        }
    }

    /// Numeric coercion of primitives. Compound values coerce to `NaN`.
    #[must_use]
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Null => 0.0,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Number(n) => *n,
            Value::BigInt(b) => b.to_string().parse().unwrap_or(f64::NAN),
            Value::String(s) => {
                let trimmed = s.trim();
                match trimmed {
                    "" => 0.0,
                    "Infinity" | "+Infinity" => f64::INFINITY,
                    "-Infinity" => f64::NEG_INFINITY,
                    _ if trimmed.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') => {
                        f64::NAN
                    }
                    _ => trimmed.parse().unwrap_or(f64::NAN),
                }
            }
            Value::Undefined | Value::Array(_) | Value::Object(_) | Value::Type(_) => f64::NAN,
        }
    }

    /// String coercion of primitives.
    #[must_use]
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => crate::ser::format_number(*n),
            Value::BigInt(b) => b.to_string(),
            Value::String(s) => s.clone(),
            Value::Array(a) => a
                .to_vec()
                .iter()
                .map(|v| match v {
                    Value::Undefined | Value::Null => String::new(),
                    other => other.to_display_string(),
                })
                .collect::<Vec<_>>()
                .join(","),
            Value::Object(o) => format!("[object {}]", o.class().name()),
            Value::Type(t) => t.name().to_string(),
        }
    }

    /// Returns `true` if no array or object is reachable from itself.
    #[must_use]
    pub fn is_acyclic(&self) -> bool {
        fn walk(value: &Value, parents: &mut Vec<usize>) -> bool {
            let Some(address) = value.address() else {
                return true;
            };
            if parents.contains(&address) {
                return false;
            }
            parents.push(address);
            let acyclic = children(value).iter().all(|child| walk(child, parents));
            parents.pop();
            acyclic
        }

        walk(self, &mut Vec::new())
    }
}

/// Values directly reachable from `value`: elements, prototype, members and slot
/// contents, in that order.
pub(crate) fn children(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(a) => a.to_vec(),
        Value::Object(o) => {
            let mut out: Vec<Value> = o.proto().map(Value::Object).into_iter().collect();
            out.extend(o.members().values().cloned());
            match &*o.slot() {
                Slot::Set(values) => out.extend(values.iter().cloned()),
                Slot::Map(entries) => {
                    for (k, v) in entries {
                        out.push(k.clone());
                        out.push(v.clone());
                    }
                }
                _ => {}
            }
            out
        }
        _ => Vec::new(),
    }
}

/// Structural comparison that assumes already-paired references are equal, so
/// cyclic graphs compare in finite time.
#[derive(Default)]
struct Equality {
    assumed: Vec<(usize, usize)>,
}

impl Equality {
    fn values(&mut self, a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(x), Value::Bool(y)) => x == y,
            (Value::Number(x), Value::Number(y)) => x == y || (x.is_nan() && y.is_nan()),
            (Value::BigInt(x), Value::BigInt(y)) => x == y,
            (Value::String(x), Value::String(y)) => x == y,
            (Value::Type(x), Value::Type(y)) => x == y,
            (Value::Array(x), Value::Array(y)) => {
                if x.ptr_eq(y) || !self.assume(x.address(), y.address()) {
                    return true;
                }
                let (xs, ys) = (x.to_vec(), y.to_vec());
                xs.len() == ys.len() && xs.iter().zip(&ys).all(|(p, q)| self.values(p, q))
            }
            (Value::Object(x), Value::Object(y)) => {
                if x.ptr_eq(y) || !self.assume(x.address(), y.address()) {
                    return true;
                }
                self.objects(x, y)
            }
            _ => false,
        }
    }

    /// Records the pair, returning `false` if it was already assumed equal.
    fn assume(&mut self, a: usize, b: usize) -> bool {
        if self.assumed.contains(&(a, b)) {
            return false;
        }
        self.assumed.push((a, b));
        true
    }

    fn objects(&mut self, x: &Object, y: &Object) -> bool {
        if x.class() != y.class() {
            return false;
        }
        let protos_equal = match (x.proto(), y.proto()) {
            (None, None) => true,
            (Some(p), Some(q)) => self.values(&Value::Object(p), &Value::Object(q)),
            _ => false,
        };
        if !protos_equal {
            return false;
        }
        let (xm, ym) = (x.entries(), y.entries());
        if xm.len() != ym.len() {
            return false;
        }
        for (key, value) in &xm {
            match y.get(key) {
                Some(other) if self.values(value, &other) => {}
                _ => return false,
            }
        }
        let (xs, ys) = (x.slot().clone(), y.slot().clone());
        self.slots(&xs, &ys)
    }

    fn slots(&mut self, a: &Slot, b: &Slot) -> bool {
        match (a, b) {
            (Slot::None, Slot::None) => true,
            (Slot::Boolean(x), Slot::Boolean(y)) => x == y,
            (Slot::Number(x), Slot::Number(y)) => x == y || (x.is_nan() && y.is_nan()),
            (Slot::String(x), Slot::String(y)) => x == y,
            (Slot::Date(x), Slot::Date(y)) => x == y,
            (Slot::RegExp(x), Slot::RegExp(y)) => x == y,
            (Slot::Set(xs), Slot::Set(ys)) => {
                xs.len() == ys.len() && xs.iter().zip(ys).all(|(p, q)| self.values(p, q))
            }
            (Slot::Map(xs), Slot::Map(ys)) => {
                xs.len() == ys.len()
                    && xs
                        .iter()
                        .zip(ys)
                        .all(|((pk, pv), (qk, qv))| self.values(pk, qk) && self.values(pv, qv))
            }
            (Slot::Error(x), Slot::Error(y)) => x == y,
            (Slot::TypedArray(x), Slot::TypedArray(y)) => x == y,
            (Slot::Function(x), Slot::Function(y)) => x == y,
            (Slot::Json(x), Slot::Json(y)) => x == y,
            _ => false,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        Equality::default().values(self, other)
    }
}

impl PartialEq for Array {
    fn eq(&self, other: &Self) -> bool {
        Value::Array(self.clone()) == Value::Array(other.clone())
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        Value::Object(self.clone()) == Value::Object(other.clone())
    }
}

/// Debug view of a value that prints `<cycle>` instead of revisiting an ancestor.
struct Graph<'a> {
    value: &'a Value,
    path: &'a RefCell<Vec<usize>>,
}

impl fmt::Debug for Graph<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let address = self.value.address();
        if let Some(address) = address {
            if self.path.borrow().contains(&address) {
                return write!(f, "<cycle>");
            }
            self.path.borrow_mut().push(address);
        }

        let result = match self.value {
            Value::Undefined => write!(f, "Undefined"),
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Value::BigInt(b) => f.debug_tuple("BigInt").field(b).finish(),
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::Type(t) => write!(f, "Type({})", t.name()),
            Value::Array(a) => {
                let items = a.to_vec();
                f.debug_list()
                    .entries(items.iter().map(|value| Graph {
                        value,
                        path: self.path,
                    }))
                    .finish()
            }
            Value::Object(o) => {
                let entries = o.entries();
                let slot = o.slot().clone();
                write!(f, "{} ", o.class().name())?;
                if !matches!(slot, Slot::None) {
                    write!(f, "{:?} ", slot)?;
                }
                f.debug_map()
                    .entries(entries.iter().map(|(k, value)| {
                        (
                            k,
                            Graph {
                                value,
                                path: self.path,
                            },
                        )
                    }))
                    .finish()
            }
        };

        if address.is_some() {
            self.path.borrow_mut().pop();
        }
        result
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = RefCell::new(Vec::new());
        Graph { value: self, path: &path }.fmt(f)
    }
}

impl fmt::Debug for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Value::Array(self.clone()).fmt(f)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Value::Object(self.clone()).fmt(f)
    }
}

// TryFrom implementations for extracting values
impl TryFrom<Value> for f64 {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Number(n) => Ok(n),
            other => Err(Error::custom(format!(
                "expected number, found {}",
                other.kind()
            ))),
        }
    }
}

impl TryFrom<Value> for i64 {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Number(n) if n.fract() == 0.0 && n >= i64::MIN as f64 && n <= i64::MAX as f64 => {
                Ok(n as i64)
            }
            Value::BigInt(ref b) => {
                i64::try_from(b).map_err(|_| Error::custom(format!("{} does not fit in i64", b)))
            }
            other => Err(Error::custom(format!(
                "expected integer, found {}",
                other.kind()
            ))),
        }
    }
}

impl TryFrom<Value> for bool {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(Error::custom(format!(
                "expected boolean, found {}",
                other.kind()
            ))),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(Error::custom(format!(
                "expected string, found {}",
                other.kind()
            ))),
        }
    }
}

// From implementations for creating values from primitives
impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

macro_rules! from_lossless_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Number(f64::from(value))
                }
            }
        )*
    };
}

from_lossless_number!(i8, i16, i32, u8, u16, u32, f32, f64);

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value as f64)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Number(value as f64)
    }
}

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        Value::BigInt(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(Array::from_vec(value))
    }
}

impl From<Members> for Value {
    fn from(value: Members) -> Self {
        Value::Object(Object::from_members(value))
    }
}

impl From<Array> for Value {
    fn from(value: Array) -> Self {
        Value::Array(value)
    }
}

impl From<Object> for Value {
    fn from(value: Object) -> Self {
        Value::Object(value)
    }
}

impl From<TypeToken> for Value {
    fn from(value: TypeToken) -> Self {
        Value::Type(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::TryFrom;

    #[test]
    fn test_tryfrom_i64() {
        assert_eq!(i64::try_from(Value::from(42)).unwrap(), 42);
        assert_eq!(i64::try_from(Value::BigInt(BigInt::from(7))).unwrap(), 7);
        assert!(i64::try_from(Value::from(42.5)).is_err());
        assert!(i64::try_from(Value::from("test")).is_err());
    }

    #[test]
    fn test_tryfrom_primitives() {
        assert_eq!(f64::try_from(Value::from(3.5)).unwrap(), 3.5);
        assert!(bool::try_from(Value::Bool(true)).unwrap());
        assert!(bool::try_from(Value::from(1)).is_err());
        assert_eq!(String::try_from(Value::from("hello")).unwrap(), "hello");
        assert!(String::try_from(Value::Null).is_err());
    }

    #[test]
    fn test_from_option() {
        assert!(Value::from(None::<i32>).is_null());
        assert_eq!(Value::from(Some("x")), Value::from("x"));
    }

    #[test]
    fn test_same_distinguishes_signed_zero() {
        assert!(Value::from(f64::NAN).same(&Value::from(f64::NAN)));
        assert!(!Value::from(0.0).same(&Value::from(-0.0)));
        assert!(Value::from(0.0).same_value_zero(&Value::from(-0.0)));
    }

    #[test]
    fn test_structural_equality_of_distinct_objects() {
        let a = Value::object([("x", 1), ("y", 2)]);
        let b = Value::object([("y", 2), ("x", 1)]);
        assert_eq!(a, b);
        assert!(!a.same(&b));
        assert_ne!(a, Value::object([("x", 1)]));
    }

    #[test]
    fn test_equality_of_cyclic_graphs() {
        let a = Object::new();
        a.set("self", a.clone());
        let b = Object::new();
        b.set("self", b.clone());
        assert_eq!(Value::Object(a.clone()), Value::Object(b));

        let c = Object::new();
        c.set("self", Object::new());
        assert_ne!(Value::Object(a), Value::Object(c));
    }

    #[test]
    fn test_array_set_pads_with_undefined() {
        let array = Array::new();
        array.set(2, "x");
        assert_eq!(array.len(), 3);
        assert!(array.get(0).unwrap().is_undefined());
        assert_eq!(array.get(2), Some(Value::from("x")));
    }

    #[test]
    fn test_cyclic_prototype_is_rejected() {
        let a = Object::new();
        let b = Object::new();
        b.set_proto(Some(a.clone())).unwrap();
        assert!(a.set_proto(Some(b)).is_err());
        assert!(a.set_proto(Some(a.clone())).is_err());
    }

    #[test]
    fn test_debug_marks_cycles() {
        let array = Array::new();
        array.push(array.clone());
        let debug = format!("{:?}", Value::Array(array));
        assert_eq!(debug, "[<cycle>]");
    }

    #[test]
    fn test_coercions() {
        assert_eq!(Value::from(" 12 ").to_number(), 12.0);
        assert_eq!(Value::from("").to_number(), 0.0);
        assert!(Value::from("abc").to_number().is_nan());
        assert!(Value::Undefined.to_number().is_nan());
        assert!(!Value::from("").truthy());
        assert!(Value::array([0]).truthy());
        assert_eq!(Value::array([1, 2]).to_display_string(), "1,2");
    }
}
