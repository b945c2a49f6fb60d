//! `Function`: source text that is checked but never evaluated.
//!
//! Not part of the default set. A registry that should accept it calls
//! `include("Function")`.

use super::{arg, slot_materializer, slot_of};
use crate::class::{Class, TypeToken};
use crate::registry::ConstructionSpec;
use crate::{Error, Object, Result, Slot, Value};
use regex::Regex;
use std::sync::LazyLock;

pub static FUNCTION: Class = Class::new("Function");

static SOURCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^\s*(?:",
        // function declarations and expressions, generators included
        r"(?:async\s+)?function\b\s*\*?\s*[A-Za-z_$][\w$]*\s*\([^)]*\)\s*\{[\s\S]*\}",
        r"|(?:async\s+)?function\s*\*?\s*\([^)]*\)\s*\{[\s\S]*\}",
        // arrow functions
        r"|(?:async\s*)?(?:\([^)]*\)|[A-Za-z_$][\w$]*)\s*=>\s*[\s\S]+",
        r")\s*$",
    ))
    .expect("function source pattern")
});

fn check(source: &str) -> Result<()> {
    if SOURCE.is_match(source) {
        Ok(())
    } else {
        Err(Error::custom(format!("not a function source: {:?}", source)))
    }
}

pub(super) fn spec() -> ConstructionSpec {
    let class = TypeToken::of(&FUNCTION);
    ConstructionSpec::new(class)
        .with_serializer(move |value| match slot_of(value, class)? {
            Slot::Function(source) => Ok(vec![Value::String(source)]),
            _ => Err(Error::custom("function object has no source")),
        })
        .with_materializer(move |placeholder, args| {
            slot_materializer(class, placeholder, args, |args| {
                let source = match arg(&args, 0) {
                    Value::String(source) => source,
                    other => {
                        return Err(Error::custom(format!(
                            "function source must be a string, found {}",
                            other.kind()
                        )))
                    }
                };
                check(&source)?;
                Ok(Slot::Function(source))
            })
        })
}

impl Value {
    /// A `Function` object holding `source`.
    ///
    /// # Errors
    ///
    /// Returns an error if `source` does not look like a function or arrow
    /// function.
    ///
    /// ```rust
    /// use serde_construct::Value;
    ///
    /// assert!(Value::function("(a, b) => a + b").is_ok());
    /// assert!(Value::function("function add(a, b) { return a + b }").is_ok());
    /// assert!(Value::function("alert(1)").is_err());
    /// ```
    pub fn function(source: impl Into<String>) -> Result<Value> {
        let source = source.into();
        check(&source)?;
        Ok(Value::Object(Object::with_slot(
            TypeToken::of(&FUNCTION),
            Slot::Function(source),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_sources() {
        for source in [
            "function () {}",
            "function* gen() { yield 1 }",
            "async function f(x) {\n  return x\n}",
            "x => x * 2",
            "async (a) => { await a }",
        ] {
            assert!(check(source).is_ok(), "{source}");
        }
    }

    #[test]
    fn test_rejected_sources() {
        for source in ["", "1 + 1", "function", "=> 1", "class A {}"] {
            assert!(check(source).is_err(), "{source}");
        }
    }

    #[test]
    fn test_missing_source_is_rejected() {
        let mut registry = crate::Registry::new();
        let function = registry.register(spec()).unwrap();
        assert!(function.construct(vec![]).is_err());
        assert!(function.construct(vec![Value::from("() => 1")]).is_ok());
    }
}
