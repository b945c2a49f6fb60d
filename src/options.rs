//! Configuration options for serialization.
//!
//! - [`Options`]: the per-call configuration
//! - [`Mode`]: how repeated and circular references are written
//! - [`OnUndefined`]: what to write for undefined values
//!
//! ## Examples
//!
//! ```rust
//! use serde_construct::{Mode, Notation, Object, Options, Value};
//!
//! let shared = Value::Object(Object::new());
//! let list = Value::array([shared.clone(), shared]);
//! let mut notation = Notation::new();
//!
//! let text = notation
//!     .serialize_with(&list, Options::new().with_mode(Mode::Repeat))
//!     .unwrap();
//! assert_eq!(text, "[{},{}]");
//!
//! let text = notation
//!     .serialize_with(&list, Options::new().with_mode(Mode::Binding))
//!     .unwrap();
//! assert_eq!(text, "$0=[$1={},$1]");
//! ```

use crate::Value;
use std::fmt;
use std::rc::Rc;

/// Reference-sharing discipline.
///
/// | Mode | Repeated value | Value inside itself |
/// |---|---|---|
/// | `Basic` | error | error |
/// | `Repeat` | written again in full | error |
/// | `Binding` | `$n` reference | error |
/// | `Circular` | `$n` reference | `$n` reference |
///
/// In `Binding` and `Circular` modes the first occurrence of every array and
/// object is written as `$n=value`, `n` counting from 0 in order of first sight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Basic,
    Repeat,
    Binding,
    Circular,
}

impl Mode {
    /// Whether already written values are remembered.
    #[must_use]
    pub const fn tracks_visited(self) -> bool {
        !matches!(self, Mode::Repeat)
    }

    /// Whether values are written with `$n=` and referenced with `$n`.
    #[must_use]
    pub const fn binds(self) -> bool {
        matches!(self, Mode::Binding | Mode::Circular)
    }
}

/// Policy for undefined values, including sparse array slots.
#[derive(Clone)]
pub enum OnUndefined {
    /// Fail with a serialization error carrying this message.
    Fail(String),
    /// Write this value instead. An undefined replacement is written as `void`;
    /// a compound one is written in full at every use and never bound.
    Replace(Value),
    /// Write whatever the callback returns. An undefined result is written as
    /// `void` without calling back again.
    Call(Rc<dyn Fn() -> Value>),
}

impl Default for OnUndefined {
    fn default() -> Self {
        OnUndefined::Replace(Value::Undefined)
    }
}

impl fmt::Debug for OnUndefined {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OnUndefined::Fail(msg) => f.debug_tuple("Fail").field(msg).finish(),
            OnUndefined::Replace(value) => f.debug_tuple("Replace").field(value).finish(),
            OnUndefined::Call(_) => write!(f, "Call(..)"),
        }
    }
}

/// Configuration for one serialization call.
///
/// # Examples
///
/// ```rust
/// use serde_construct::{Mode, Options};
///
/// // Default compact options
/// let options = Options::new();
/// assert_eq!(options.mode, Mode::Basic);
///
/// // Pretty-printed with 4-space indentation, sharing references
/// let options = Options::pretty()
///     .with_indent(4)
///     .with_mode(Mode::Circular);
/// assert!(options.pretty);
/// ```
#[derive(Clone, Debug)]
pub struct Options {
    pub mode: Mode,
    pub on_undefined: OnUndefined,
    pub pretty: bool,
    pub indent: usize,
    /// When `false`, every object is written as a plain `{...}` literal.
    pub use_constructions: bool,
    /// Register unknown classes on the fly instead of failing.
    pub auto_include: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            mode: Mode::default(),
            on_undefined: OnUndefined::default(),
            pretty: false,
            indent: 2,
            use_constructions: true,
            auto_include: false,
        }
    }
}

impl Options {
    /// Creates default options: `Basic` mode, compact, constructions enabled.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_construct::Options;
    ///
    /// let options = Options::new();
    /// assert_eq!(options.indent, 2);
    /// assert!(!options.pretty);
    /// assert!(options.use_constructions);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options for output with newlines and indentation.
    #[must_use]
    pub fn pretty() -> Self {
        Options {
            pretty: true,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_on_undefined(mut self, on_undefined: OnUndefined) -> Self {
        self.on_undefined = on_undefined;
        self
    }

    #[must_use]
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Sets the indentation size (number of spaces per level).
    ///
    /// Default is 2. Only affects pretty-printed output.
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    #[must_use]
    pub fn with_constructions(mut self, use_constructions: bool) -> Self {
        self.use_constructions = use_constructions;
        self
    }

    #[must_use]
    pub fn with_auto_include(mut self, auto_include: bool) -> Self {
        self.auto_include = auto_include;
        self
    }
}
