//! Type identity for objects and constructions.
//!
//! Every [`Object`](crate::Object) belongs to a [`Class`]: a `'static` descriptor
//! holding the type's name, an optional constructor used to apply arguments to a
//! freshly allocated instance, and an optional attached descriptor that
//! [`Registry::include`](crate::Registry::include) reads to register the type.
//!
//! A [`TypeToken`] is a copyable handle to a class. Two tokens are equal only when
//! they point at the same `static`, so classes with the same name stay distinct.
//!
//! ```rust
//! use serde_construct::{Class, Object, TypeToken, Value};
//!
//! static POINT: Class = Class::new("Point").with_constructor(|this, args| {
//!     this.set("x", args.first().cloned().unwrap_or_default());
//!     this.set("y", args.get(1).cloned().unwrap_or_default());
//!     Ok(())
//! });
//!
//! let point = TypeToken::of(&POINT);
//! assert_eq!(point.name(), "Point");
//!
//! let instance = Object::instance(point);
//! point.construct(&instance, vec![Value::from(1), Value::from(2)]).unwrap();
//! assert_eq!(instance.get("y"), Some(Value::from(2)));
//! ```

use crate::registry::ConstructionSpec;
use crate::{Error, Object, Result, Value};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ptr;

/// Applies constructor arguments to an allocated instance.
pub type ConstructorFn = fn(&Object, Vec<Value>) -> Result<()>;

/// Produces the construction a class describes itself with.
pub type DescriptorFn = fn() -> ConstructionSpec;

/// A type descriptor. Declare classes as `static` items and refer to them through
/// [`TypeToken::of`].
pub struct Class {
    name: &'static str,
    constructor: Option<ConstructorFn>,
    descriptor: Option<DescriptorFn>,
}

impl Class {
    /// Creates a class with no constructor and no attached descriptor.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Class {
            name,
            constructor: None,
            descriptor: None,
        }
    }

    /// Attaches the constructor that applies materialized arguments to an instance.
    #[must_use]
    pub const fn with_constructor(self, constructor: ConstructorFn) -> Self {
        Class {
            constructor: Some(constructor),
            ..self
        }
    }

    /// Attaches a self-description consumed by `Registry::include`.
    #[must_use]
    pub const fn with_descriptor(self, descriptor: DescriptorFn) -> Self {
        Class {
            descriptor: Some(descriptor),
            ..self
        }
    }
}

/// Identity of a class, compared by address.
#[derive(Clone, Copy)]
pub struct TypeToken(&'static Class);

impl TypeToken {
    /// Returns the token for `class`.
    #[inline]
    #[must_use]
    pub const fn of(class: &'static Class) -> Self {
        TypeToken(class)
    }

    /// The class name, used as the inferred construction identifier.
    #[inline]
    #[must_use]
    pub fn name(self) -> &'static str {
        self.0.name
    }

    /// Returns `true` if instances can be built by applying arguments.
    #[inline]
    #[must_use]
    pub fn is_constructible(self) -> bool {
        self.0.constructor.is_some()
    }

    /// The attached descriptor, if the class carries one.
    #[inline]
    #[must_use]
    pub fn descriptor(self) -> Option<DescriptorFn> {
        self.0.descriptor
    }

    /// Runs the class constructor against `instance`.
    ///
    /// # Errors
    ///
    /// Returns a registration error if the class has no constructor, or whatever
    /// the constructor itself reports.
    pub fn construct(self, instance: &Object, args: Vec<Value>) -> Result<()> {
        match self.0.constructor {
            Some(constructor) => constructor(instance, args),
            None => Err(Error::registration(self.name(), "class has no constructor")),
        }
    }
}

impl PartialEq for TypeToken {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.0, other.0)
    }
}

impl Eq for TypeToken {}

impl Hash for TypeToken {
    fn hash<H: Hasher>(&self, state: &mut H) {
        ptr::hash(self.0, state);
    }
}

impl fmt::Debug for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeToken({})", self.0.name)
    }
}

/// The class of plain objects.
pub static OBJECT: Class = Class::new("Object");

/// The class of arrays.
pub static ARRAY: Class = Class::new("Array");

/// The class of big integer primitives.
pub static BIGINT: Class = Class::new("BigInt");

#[cfg(test)]
mod tests {
    use super::*;

    static FIRST: Class = Class::new("Twin");
    static SECOND: Class = Class::new("Twin");

    #[test]
    fn test_tokens_compare_by_address() {
        assert_eq!(TypeToken::of(&FIRST), TypeToken::of(&FIRST));
        assert_ne!(TypeToken::of(&FIRST), TypeToken::of(&SECOND));
        assert_eq!(TypeToken::of(&FIRST).name(), TypeToken::of(&SECOND).name());
    }

    #[test]
    fn test_construct_without_constructor_fails() {
        let token = TypeToken::of(&FIRST);
        assert!(!token.is_constructible());
        let err = token.construct(&Object::instance(token), vec![]).unwrap_err();
        assert!(matches!(err, Error::Registration { .. }));
    }
}
