//! Error types for serialization, materialization and registry management.
//!
//! Every failure the crate reports is one variant of [`Error`]. Errors are raised
//! synchronously with the offending identifier, name or source position attached,
//! and are never retried or partially recovered from.
//!
//! ## Error Categories
//!
//! - **Registration**: bad or duplicate identifiers, missing serializer, classes
//!   that cannot be constructed without an explicit materializer
//! - **Lookup**: unknown type or identifier
//! - **Syntax**: grammar violations, with offset, line and column
//! - **Reference**: unbound or re-bound `$name`
//! - **Consistency**: a two-phase construction finalized a different object than
//!   the placeholder it handed out
//! - **Serialization**: undefined-value policy violations, disallowed repeated or
//!   circular references
//!
//! ## Examples
//!
//! ```rust
//! use serde_construct::{materialize, Error};
//!
//! let result = materialize("{a:1,}");
//! assert!(matches!(result, Err(Error::Syntax { line: 1, .. })));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors raised by this crate.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// A construction could not be registered.
    #[error("Registration error for `{identifier}`: {reason}")]
    Registration { identifier: String, reason: String },

    /// No construction exists for a type or identifier.
    #[error("Lookup error: {0}")]
    Lookup(String),

    /// Grammar violation while materializing text.
    #[error("Syntax error at line {line}, column {col}: {msg}\n{context}")]
    Syntax {
        offset: usize,
        line: usize,
        col: usize,
        msg: String,
        context: String,
    },

    /// A `$name` reference could not be resolved, or a name was bound twice.
    #[error("Reference error: `${name}` {reason}")]
    Reference { name: String, reason: String },

    /// A bound construction returned a value other than its placeholder.
    #[error("Consistency error: construction `{0}` did not finalize its placeholder")]
    Consistency(String),

    /// The value graph cannot be written under the requested options.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a registration error for `identifier`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_construct::Error;
    ///
    /// let err = Error::registration("true", "reserved word");
    /// assert!(err.to_string().contains("reserved word"));
    /// ```
    pub fn registration(identifier: &str, reason: &str) -> Self {
        Error::Registration {
            identifier: identifier.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates a lookup error.
    pub fn lookup<T: fmt::Display>(what: T) -> Self {
        Error::Lookup(what.to_string())
    }

    /// Creates a syntax error at byte `offset` of `input`.
    ///
    /// Line and column are 1-based and computed by scanning the input up to the
    /// offset; the error also carries the text of the offending line.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_construct::Error;
    ///
    /// let err = Error::syntax("[1,\n 2,]", 7, "unexpected `]`");
    /// match err {
    ///     Error::Syntax { line, col, .. } => assert_eq!((line, col), (2, 4)),
    ///     _ => unreachable!(),
    /// }
    /// ```
    pub fn syntax(input: &str, offset: usize, msg: &str) -> Self {
        let offset = offset.min(input.len());
        let consumed = &input[..offset];
        let line = consumed.matches('\n').count() + 1;
        let line_start = consumed.rfind('\n').map_or(0, |i| i + 1);
        let col = consumed[line_start..].chars().count() + 1;
        let line_end = input[offset..]
            .find('\n')
            .map_or(input.len(), |i| offset + i);

        Error::Syntax {
            offset,
            line,
            col,
            msg: msg.to_string(),
            context: input[line_start..line_end].trim_end_matches('\r').to_string(),
        }
    }

    /// Creates a reference error for `$name`.
    pub fn reference(name: &str, reason: &str) -> Self {
        Error::Reference {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates a consistency error for the construction `identifier`.
    pub fn consistency(identifier: &str) -> Self {
        Error::Consistency(identifier.to_string())
    }

    /// Creates a serialization error.
    pub fn serialization<T: fmt::Display>(msg: T) -> Self {
        Error::Serialization(msg.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_construct::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_position_first_line() {
        match Error::syntax("{a:1,}", 5, "unexpected `}`") {
            Error::Syntax {
                offset,
                line,
                col,
                context,
                ..
            } => {
                assert_eq!(offset, 5);
                assert_eq!(line, 1);
                assert_eq!(col, 6);
                assert_eq!(context, "{a:1,}");
            }
            other => panic!("Expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_syntax_position_counts_characters() {
        match Error::syntax("\"é\"\n  x", 7, "unexpected identifier") {
            Error::Syntax { line, col, context, .. } => {
                assert_eq!(line, 2);
                assert_eq!(col, 3);
                assert_eq!(context, "  x");
            }
            other => panic!("Expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_syntax_offset_past_end_is_clamped() {
        match Error::syntax("[1,", 99, "unexpected end of input") {
            Error::Syntax { offset, col, .. } => {
                assert_eq!(offset, 3);
                assert_eq!(col, 4);
            }
            other => panic!("Expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_display_messages() {
        assert!(Error::reference("x", "is not bound")
            .to_string()
            .contains("`$x` is not bound"));
        assert!(Error::consistency("BigInt").to_string().contains("BigInt"));
        assert!(Error::lookup("no construction for `Point`")
            .to_string()
            .contains("Point"));
    }
}
