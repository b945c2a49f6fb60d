//! `RegExp`: a pattern source and its flags, written `RegExp("a+b","gi")`.

use super::{arg, slot_materializer, slot_of};
use crate::class::{Class, TypeToken};
use crate::registry::ConstructionSpec;
use crate::{Error, Object, Result, Slot, Value};
use regex::{Regex, RegexBuilder};
use std::fmt;
use std::sync::LazyLock;

pub static REGEXP: Class = Class::new("RegExp");

static LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/(?:[^\\/\[\r\n]|\\[^\r\n]|\[(?:[^\\\]\r\n]|\\[^\r\n])*\])+/[dgimsuvy]*$")
        .expect("regexp literal pattern")
});

/// A regular expression as source text plus flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegExp {
    source: String,
    flags: String,
}

impl RegExp {
    /// Validates that `/source/flags` is a well-formed literal.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown or repeated flag, or a source that does not
    /// form a literal (unescaped `/`, line breaks, unbalanced classes).
    ///
    /// ```rust
    /// use serde_construct::library::RegExp;
    ///
    /// let re = RegExp::new("ab+c", "gi").unwrap();
    /// assert_eq!(re.to_string(), "/ab+c/gi");
    /// assert!(RegExp::new("a/b", "").is_err());
    /// assert!(RegExp::new("a", "gg").is_err());
    /// ```
    pub fn new(source: impl Into<String>, flags: impl Into<String>) -> Result<Self> {
        let mut source = source.into();
        let flags = flags.into();
        if source.is_empty() {
            source = "(?:)".to_string();
        }

        let mut seen = String::new();
        for flag in flags.chars() {
            if !"dgimsuvy".contains(flag) || seen.contains(flag) {
                return Err(Error::custom(format!("invalid regular expression flags {:?}", flags)));
            }
            seen.push(flag);
        }

        let regexp = RegExp { source, flags };
        if !LITERAL.is_match(&regexp.to_string()) {
            return Err(Error::custom(format!("invalid regular expression {}", regexp)));
        }
        Ok(regexp)
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn flags(&self) -> &str {
        &self.flags
    }

    /// Compiles the pattern, honouring the `i`, `m` and `s` flags.
    ///
    /// # Errors
    ///
    /// Returns an error when the source uses syntax the `regex` crate does not
    /// support, such as look-around or back-references.
    pub fn to_regex(&self) -> Result<Regex> {
        RegexBuilder::new(&self.source)
            .case_insensitive(self.flags.contains('i'))
            .multi_line(self.flags.contains('m'))
            .dot_matches_new_line(self.flags.contains('s'))
            .build()
            .map_err(|e| Error::custom(format!("cannot compile {}: {}", self, e)))
    }
}

impl fmt::Display for RegExp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.source, self.flags)
    }
}

pub(super) fn spec() -> ConstructionSpec {
    let class = TypeToken::of(&REGEXP);
    ConstructionSpec::new(class)
        .with_serializer(move |value| match slot_of(value, class)? {
            Slot::RegExp(re) => Ok(vec![Value::String(re.source), Value::String(re.flags)]),
            _ => Ok(vec![Value::from("(?:)"), Value::from("")]),
        })
        .with_materializer(move |placeholder, args| {
            slot_materializer(class, placeholder, args, |args| {
                let text = |value: Value| match value {
                    Value::Undefined => String::new(),
                    other => other.to_display_string(),
                };
                let regexp = RegExp::new(text(arg(&args, 0)), text(arg(&args, 1)))?;
                Ok(Slot::RegExp(regexp))
            })
        })
}

impl Value {
    /// A `RegExp` object.
    ///
    /// # Errors
    ///
    /// Fails under the same conditions as [`RegExp::new`].
    pub fn regexp(source: impl Into<String>, flags: impl Into<String>) -> Result<Value> {
        let regexp = RegExp::new(source, flags)?;
        Ok(Value::Object(Object::with_slot(
            TypeToken::of(&REGEXP),
            Slot::RegExp(regexp),
        )))
    }
}
