//! The construction registry.
//!
//! A [`Registry`] maps textual identifiers and [`TypeToken`]s to the
//! [`Construction`] that encodes and decodes instances of that type. Both
//! directions are unique: one identifier names one type and one type is written
//! under one identifier.
//!
//! Entries change only through [`Registry::register`], [`Registry::include`],
//! [`Registry::remove`] and [`Registry::exclude`]. Lookups never register
//! anything on their own.
//!
//! ## Examples
//!
//! ```rust
//! use serde_construct::{Class, ConstructionSpec, Object, Registry, TypeToken, Value};
//!
//! static POINT: Class = Class::new("Point").with_constructor(|this, args| {
//!     this.set("x", args.first().cloned().unwrap_or_default());
//!     this.set("y", args.get(1).cloned().unwrap_or_default());
//!     Ok(())
//! });
//!
//! let mut registry = Registry::new();
//! registry
//!     .register(ConstructionSpec::new(TypeToken::of(&POINT)).with_serializer(|value| {
//!         let point = value.as_object().cloned().unwrap_or_default();
//!         Ok(vec![
//!             point.get("x").unwrap_or_default(),
//!             point.get("y").unwrap_or_default(),
//!         ])
//!     }))
//!     .unwrap();
//!
//! let construction = registry.record("Point").unwrap();
//! let point = construction.construct(vec![Value::from(1), Value::from(2)]).unwrap();
//! assert_eq!(point.as_object().unwrap().get("x"), Some(Value::from(1)));
//! ```

use crate::class::{Class, TypeToken};
use crate::library;
use crate::{Error, Object, Result, Value};
use indexmap::IndexMap;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::LazyLock;
use tracing::debug;

/// Atom words that can never be used as identifiers.
pub const RESERVED: [&str; 6] = ["true", "false", "null", "void", "NaN", "Infinity"];

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*(?:[.-][a-zA-Z0-9_]+)*$").expect("identifier pattern")
});

/// Returns `true` if `text` can be written bare as an identifier.
///
/// ```rust
/// use serde_construct::registry::is_identifier;
///
/// assert!(is_identifier("my.type-v2"));
/// assert!(!is_identifier("2fast"));
/// assert!(!is_identifier("null"));
/// ```
#[must_use]
pub fn is_identifier(text: &str) -> bool {
    IDENTIFIER.is_match(text) && !RESERVED.contains(&text)
}

/// Turns an instance into the argument list of its construction.
pub type SerializeFn = Rc<dyn Fn(&Value) -> Result<Vec<Value>>>;

/// Builds an instance. Called as `(None, None)` for a placeholder,
/// `(Some(placeholder), Some(args))` to finalize one, and `(None, Some(args))`
/// to construct directly.
pub type MaterializeFn = Rc<dyn Fn(Option<Value>, Option<Vec<Value>>) -> Result<Value>>;

/// An unvalidated description of a construction, consumed by
/// [`Registry::register`] and [`Registry::include`].
#[derive(Clone)]
pub struct ConstructionSpec {
    type_token: TypeToken,
    identifier: Option<String>,
    serializer: Option<SerializeFn>,
    materializer: Option<MaterializeFn>,
    include: Vec<Include>,
}

impl ConstructionSpec {
    /// Starts a description for `type_token`. The identifier defaults to the
    /// class name.
    #[must_use]
    pub fn new(type_token: TypeToken) -> Self {
        ConstructionSpec {
            type_token,
            identifier: None,
            serializer: None,
            materializer: None,
            include: Vec::new(),
        }
    }

    /// A construction that writes an instance's members as one object argument
    /// and copies them back onto a fresh instance.
    #[must_use]
    pub fn generic(type_token: TypeToken) -> Self {
        Self::new(type_token)
            .with_serializer(|value| {
                let members = value
                    .as_object()
                    .map(|object| Object::from_members(object.members().clone()))
                    .ok_or_else(|| Error::custom(format!("expected object, found {}", value.kind())))?;
                Ok(vec![Value::Object(members)])
            })
            .with_materializer(move |placeholder, args| {
                let instance = library::instance_or_placeholder(type_token, placeholder)?;
                for arg in args.unwrap_or_default() {
                    if let Value::Object(source) = arg {
                        for (key, value) in source.entries() {
                            instance.set(key, value);
                        }
                    }
                }
                Ok(Value::Object(instance))
            })
    }

    #[must_use]
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    #[must_use]
    pub fn with_serializer(mut self, f: impl Fn(&Value) -> Result<Vec<Value>> + 'static) -> Self {
        self.serializer = Some(Rc::new(f));
        self
    }

    #[must_use]
    pub fn with_materializer(
        mut self,
        f: impl Fn(Option<Value>, Option<Vec<Value>>) -> Result<Value> + 'static,
    ) -> Self {
        self.materializer = Some(Rc::new(f));
        self
    }

    /// Adds a dependency that [`Registry::include`] includes first.
    #[must_use]
    pub fn with_include(mut self, item: impl Into<Include>) -> Self {
        self.include.push(item.into());
        self
    }

    /// The identifier this description registers under.
    #[must_use]
    pub fn identifier(&self) -> &str {
        self.identifier
            .as_deref()
            .unwrap_or_else(|| self.type_token.name())
    }

    #[must_use]
    pub fn type_token(&self) -> TypeToken {
        self.type_token
    }
}

impl fmt::Debug for ConstructionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructionSpec")
            .field("type_token", &self.type_token)
            .field("identifier", &self.identifier())
            .field("include", &self.include)
            .finish_non_exhaustive()
    }
}

/// A registered, immutable codec for one type.
pub struct Construction {
    identifier: String,
    type_token: TypeToken,
    serializer: SerializeFn,
    materializer: MaterializeFn,
}

impl Construction {
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    #[must_use]
    pub fn type_token(&self) -> TypeToken {
        self.type_token
    }

    /// Produces the argument list for `value`.
    pub fn serialize(&self, value: &Value) -> Result<Vec<Value>> {
        (self.serializer)(value)
    }

    /// Obtains an instance to bind before the arguments are known.
    pub fn placeholder(&self) -> Result<Value> {
        (self.materializer)(None, None)
    }

    /// Completes a placeholder with its arguments.
    pub fn finalize(&self, placeholder: Value, args: Vec<Value>) -> Result<Value> {
        (self.materializer)(Some(placeholder), Some(args))
    }

    /// Builds an instance directly from its arguments.
    pub fn construct(&self, args: Vec<Value>) -> Result<Value> {
        (self.materializer)(None, Some(args))
    }
}

impl fmt::Debug for Construction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Construction")
            .field("identifier", &self.identifier)
            .field("type_token", &self.type_token)
            .finish_non_exhaustive()
    }
}

/// Something [`Registry::include`] or [`Registry::exclude`] accepts.
#[derive(Debug, Clone)]
pub enum Include {
    /// A type; included through its attached descriptor.
    Type(TypeToken),
    /// A default catalogue name when including, any identifier when excluding.
    Name(String),
    Spec(ConstructionSpec),
    List(Vec<Include>),
}

impl From<TypeToken> for Include {
    fn from(value: TypeToken) -> Self {
        Include::Type(value)
    }
}

impl From<&'static Class> for Include {
    fn from(value: &'static Class) -> Self {
        Include::Type(TypeToken::of(value))
    }
}

impl From<&str> for Include {
    fn from(value: &str) -> Self {
        Include::Name(value.to_string())
    }
}

impl From<String> for Include {
    fn from(value: String) -> Self {
        Include::Name(value)
    }
}

impl From<ConstructionSpec> for Include {
    fn from(value: ConstructionSpec) -> Self {
        Include::Spec(value)
    }
}

impl<T: Into<Include>> From<Vec<T>> for Include {
    fn from(value: Vec<T>) -> Self {
        Include::List(value.into_iter().map(Into::into).collect())
    }
}

/// A lookup key for [`Registry::record`].
#[derive(Debug, Clone, Copy)]
pub enum Key<'a> {
    Identifier(&'a str),
    Type(TypeToken),
}

impl<'a> From<&'a str> for Key<'a> {
    fn from(value: &'a str) -> Self {
        Key::Identifier(value)
    }
}

impl From<TypeToken> for Key<'_> {
    fn from(value: TypeToken) -> Self {
        Key::Type(value)
    }
}

/// Identifier ⇄ type ⇄ construction mapping owned by one caller.
#[derive(Clone, Default)]
pub struct Registry {
    by_identifier: IndexMap<String, Rc<Construction>>,
    by_type: HashMap<TypeToken, Rc<Construction>>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the default catalogue. Opt-in entries such as
    /// `Function` are left out.
    ///
    /// ```rust
    /// use serde_construct::Registry;
    ///
    /// let registry = Registry::with_defaults();
    /// assert!(registry.record("Date").is_some());
    /// assert!(registry.record("Function").is_none());
    /// ```
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::try_with_defaults().expect("default catalogue registers cleanly")
    }

    /// Like [`Registry::with_defaults`], returning the first include failure.
    ///
    /// # Errors
    ///
    /// Returns the error of the first catalogue entry that cannot be included.
    pub fn try_with_defaults() -> Result<Self> {
        let mut registry = Self::new();
        for name in library::DEFAULTS {
            registry.include(*name)?;
        }
        Ok(registry)
    }

    /// Validates `spec` and stores it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Registration`] when the identifier is malformed or reserved,
    /// when the identifier or type is already registered, when no serializer was
    /// given, or when no materializer was given for a class without a constructor.
    pub fn register(&mut self, spec: ConstructionSpec) -> Result<Rc<Construction>> {
        let identifier = spec.identifier().to_string();
        let type_token = spec.type_token;

        if RESERVED.contains(&identifier.as_str()) {
            return Err(Error::registration(&identifier, "identifier is a reserved word"));
        }
        if !IDENTIFIER.is_match(&identifier) {
            return Err(Error::registration(&identifier, "not a valid identifier"));
        }
        if self.by_identifier.contains_key(&identifier) {
            return Err(Error::registration(&identifier, "identifier is already registered"));
        }
        if let Some(existing) = self.by_type.get(&type_token) {
            return Err(Error::registration(
                &identifier,
                &format!("type is already registered as `{}`", existing.identifier),
            ));
        }
        let serializer = spec
            .serializer
            .ok_or_else(|| Error::registration(&identifier, "missing serializer"))?;
        let materializer = match spec.materializer {
            Some(materializer) => materializer,
            None if type_token.is_constructible() => default_materializer(type_token),
            None => {
                return Err(Error::registration(
                    &identifier,
                    "class has no constructor and no materializer was given",
                ))
            }
        };

        let construction = Rc::new(Construction {
            identifier: identifier.clone(),
            type_token,
            serializer,
            materializer,
        });
        self.by_identifier
            .insert(identifier.clone(), Rc::clone(&construction));
        self.by_type.insert(type_token, Rc::clone(&construction));
        debug!(identifier = %identifier, "registered construction");
        Ok(construction)
    }

    /// Looks up a construction by identifier or type.
    pub fn record<'a>(&self, key: impl Into<Key<'a>>) -> Option<Rc<Construction>> {
        match key.into() {
            Key::Identifier(identifier) => self.by_identifier.get(identifier).cloned(),
            Key::Type(type_token) => self.by_type.get(&type_token).cloned(),
        }
    }

    /// Registers types, catalogue entries, specs or lists of them, along with
    /// their dependencies. Already registered identifiers and types are skipped,
    /// as are types without an attached descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Lookup`] for a name the default catalogue does not have,
    /// or any error [`Registry::register`] reports.
    ///
    /// ```rust
    /// use serde_construct::Registry;
    ///
    /// let mut registry = Registry::new();
    /// registry.include(vec!["Date", "RangeError"]).unwrap();
    /// registry.include("Date").unwrap();
    ///
    /// assert_eq!(registry.identifiers(), vec!["Date", "Error", "RangeError"]);
    /// assert!(registry.include("Nope").is_err());
    /// ```
    pub fn include(&mut self, item: impl Into<Include>) -> Result<()> {
        match item.into() {
            Include::Type(type_token) => match type_token.descriptor() {
                Some(descriptor) => self.include_spec(descriptor()),
                None => {
                    debug!(class = type_token.name(), "skipped include of class without descriptor");
                    Ok(())
                }
            },
            Include::Name(name) => {
                let spec = library::default_spec(&name).ok_or_else(|| {
                    Error::lookup(format!("no default construction named `{}`", name))
                })?;
                self.include_spec(spec)
            }
            Include::Spec(spec) => self.include_spec(spec),
            Include::List(items) => items.into_iter().try_for_each(|item| self.include(item)),
        }
    }

    fn include_spec(&mut self, mut spec: ConstructionSpec) -> Result<()> {
        for dependency in std::mem::take(&mut spec.include) {
            self.include(dependency)?;
        }
        if self.by_identifier.contains_key(spec.identifier())
            || self.by_type.contains_key(&spec.type_token)
        {
            return Ok(());
        }
        self.register(spec).map(|_| ())
    }

    /// Registers a class met during serialization: through its descriptor when
    /// it has one, otherwise with a [`ConstructionSpec::generic`] construction.
    pub(crate) fn auto_register(&mut self, type_token: TypeToken) -> Result<Rc<Construction>> {
        debug!(class = type_token.name(), "auto-including class");
        match type_token.descriptor() {
            Some(descriptor) => self.include_spec(descriptor())?,
            None => {
                self.register(ConstructionSpec::generic(type_token))?;
            }
        }
        self.record(type_token).ok_or_else(|| {
            Error::lookup(format!(
                "descriptor of `{}` does not describe its own class",
                type_token.name()
            ))
        })
    }

    /// Removes the construction registered under `identifier`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Lookup`] if nothing is registered under `identifier`.
    pub fn remove(&mut self, identifier: &str) -> Result<Rc<Construction>> {
        let construction = self
            .by_identifier
            .shift_remove(identifier)
            .ok_or_else(|| Error::lookup(format!("no construction registered as `{}`", identifier)))?;
        self.by_type.remove(&construction.type_token);
        debug!(identifier, "removed construction");
        Ok(construction)
    }

    /// Removes every matching construction, returning how many were removed.
    ///
    /// ```rust
    /// use serde_construct::Registry;
    ///
    /// let mut registry = Registry::with_defaults();
    /// assert_eq!(registry.exclude(vec!["Date", "Date", "Unknown"]), 1);
    /// assert_eq!(registry.exclude("Date"), 0);
    /// ```
    pub fn exclude(&mut self, item: impl Into<Include>) -> usize {
        match item.into() {
            Include::Type(type_token) => {
                let identifier = self
                    .by_type
                    .get(&type_token)
                    .map(|construction| construction.identifier.clone());
                identifier.map_or(0, |identifier| usize::from(self.remove(&identifier).is_ok()))
            }
            Include::Name(identifier) => usize::from(self.remove(&identifier).is_ok()),
            Include::Spec(spec) => {
                let registered_as_spec = self
                    .by_identifier
                    .get(spec.identifier())
                    .is_some_and(|construction| construction.type_token == spec.type_token);
                if registered_as_spec {
                    usize::from(self.remove(spec.identifier()).is_ok())
                } else {
                    self.exclude(spec.type_token)
                }
            }
            Include::List(items) => items.into_iter().map(|item| self.exclude(item)).sum(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_identifier.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_identifier.is_empty()
    }

    /// Registered identifiers in registration order.
    #[must_use]
    pub fn identifiers(&self) -> Vec<&str> {
        self.by_identifier.keys().map(String::as_str).collect()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.by_identifier.keys()).finish()
    }
}

/// Allocates an instance of the class (or reuses the placeholder) and applies
/// the arguments through the class constructor.
fn default_materializer(type_token: TypeToken) -> MaterializeFn {
    Rc::new(move |placeholder, args| {
        let instance = library::instance_or_placeholder(type_token, placeholder)?;
        if let Some(args) = args {
            type_token.construct(&instance, args)?;
        }
        Ok(Value::Object(instance))
    })
}
