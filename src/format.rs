//! The text format.
//!
//! This module documents the notation read by [`Materializer`](crate::Materializer)
//! and written by [`Serializer`](crate::Serializer).
//!
//! # Overview
//!
//! The notation is a superset of JSON. On top of JSON it has:
//!
//! - bare object keys
//! - the literals `void`, `NaN`, `Infinity` and `-0`
//! - constructions, `Identifier(args...)`, that rebuild class instances
//! - bindings, `$name=value` and `$name`, that share and close cycles
//! - backtick templates and `/* block comments */`
//!
//! # Grammar
//!
//! ```text
//! value        := atom | numeral | string | template | array | object | binding | construction
//! array        := '[' (value (',' value)*)? ']'
//! object       := '{' (member (',' member)*)? '}'
//! member       := (identifier | string) ':' value
//! binding      := '$' name ('=' value)?
//! construction := (identifier | string) '(' (value (',' value)*)? ')'
//! ```
//!
//! Exactly one value makes up the input. Trailing commas are not allowed.
//!
//! # Lexemes
//!
//! | Lexeme | Pattern | Example |
//! |---|---|---|
//! | Atom | `true`, `false`, `null`, `void` | `void` |
//! | Identifier | `[a-zA-Z_][a-zA-Z0-9_]*` segments joined by `.` or `-` | `geo.Point-v2` |
//! | Binding | `$` then `[a-zA-Z0-9_]+` segments joined by `.` or `-` | `$0`, `$Date` |
//! | Numeral | optional sign, then `Infinity`, `NaN` or a decimal with optional exponent | `-1.5e+3` |
//! | String | JSON string literal | `"a\"b"` |
//! | Template | backtick delimited, raw line breaks, ` `` ` for a backtick | `` `two
//! lines` `` |
//! | Symbol | one of `[ ] { } ( ) : , =` | |
//!
//! Whitespace and block comments may appear between any two lexemes.
//!
//! `true`, `false`, `null`, `void`, `NaN` and `Infinity` are reserved: they are
//! never identifiers, so object keys spelled like them are quoted and no
//! construction can be registered under them.
//!
//! # Objects
//!
//! ```text
//! {name:"Ada", "full name":"Ada Lovelace", __proto__:{kind:"person"}}
//! ```
//!
//! - Keys are written bare when they are identifiers, quoted otherwise
//! - A bare `__proto__` key sets the prototype of the object to the value when
//!   it is an object, clears it when it is `null`, and is ignored otherwise
//! - A quoted `"__proto__"` key is an ordinary member
//!
//! The serializer writes the prototype first, then the members in insertion
//! order.
//!
//! # Numbers
//!
//! | Value | Written as |
//! |---|---|
//! | not a number | `NaN` |
//! | infinities | `Infinity`, `-Infinity` |
//! | negative zero | `-0` |
//! | magnitude at least `1e21` or below `1e-6` | exponent form, `1e+21`, `1.5e-7` |
//! | anything else | shortest decimal that reads back to the same number |
//!
//! # Constructions
//!
//! ```text
//! Date(2024,0,31,12,0,0,0)
//! "my app.Widget"({size:3})
//! ```
//!
//! The identifier selects a construction in the [`Registry`](crate::Registry);
//! the arguments are passed to its materializer. An identifier that is not a
//! valid bare identifier is written as a string. An identifier the registry does
//! not know is a lookup error.
//!
//! # Bindings
//!
//! ```text
//! $0=[$1={}, $1, $0]
//! ```
//!
//! - `$name=value` binds `name`; binding a name twice is a reference error
//! - Arrays, objects and constructions are bound before their contents are
//!   read, so `$0=[$0]` is an array containing itself
//! - `$name` is the bound value; when nothing is bound under `name` but a
//!   construction is registered as `name`, it is that construction's type
//!
//! The serializer names values `$0`, `$1`, ... in the order it first meets
//! them, in [`Mode::Binding`](crate::Mode::Binding) and
//! [`Mode::Circular`](crate::Mode::Circular).
//!
//! # Undefined
//!
//! `void` is the undefined value. Holes in sparse arrays are undefined, so
//! `[void,1]` keeps the index of `1`. The serializer consults
//! [`OnUndefined`](crate::OnUndefined) for every undefined value it meets.
//!
//! # Pretty Printing
//!
//! Pretty output puts each element and member on its own line, indents nested
//! levels and adds a space after `:` and between construction arguments. It reads
//! back to the same value as compact output.
//!
//! ```text
//! {
//!   a: [
//!     1,
//!     2
//!   ],
//!   when: Date(2024, 0, 31, 0, 0, 0, 0)
//! }
//! ```
