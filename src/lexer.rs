//! Tokenizer for the text format.
//!
//! The [`Lexer`] scans its input on demand, one token ahead of the parser.
//! Whitespace and `/* block comments */` between tokens are skipped. Each token
//! remembers the byte offset it started at so errors can point back into the
//! source.
//!
//! ```rust
//! use serde_construct::lexer::{Lexeme, Lexer, TokenKind};
//!
//! let mut lexer = Lexer::new("$0=Date(2024, /* month */ 0)");
//! assert_eq!(lexer.shift(None).unwrap().lexeme, Lexeme::Binding("0".into()));
//! assert_eq!(lexer.shift(Some(TokenKind::Symbol('='))).unwrap().offset, 2);
//! assert!(lexer.peek(Some(TokenKind::Identifier)).unwrap().is_some());
//! ```

use crate::{Error, Result};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static SKIP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\s+|/\*[\s\S]*?\*/)+").expect("skip pattern"));

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*(?:[.-][a-zA-Z0-9_]+)*").expect("identifier pattern")
});

static BINDING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\$([a-zA-Z0-9_]+(?:[.-][a-zA-Z0-9_]+)*)").expect("binding pattern")
});

static NUMERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:Infinity|NaN|(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)")
        .expect("numeral pattern")
});

static STRING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^"(?:[^"\\]|\\[\s\S])*""#).expect("string pattern"));

static TEMPLATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^`((?:[^`]|``)*)`").expect("template pattern"));

const SYMBOLS: &str = "[]{}():,=";

/// Keyword literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Atom {
    True,
    False,
    Null,
    Void,
}

/// What a token is, together with its decoded content.
#[derive(Debug, Clone, PartialEq)]
pub enum Lexeme {
    Atom(Atom),
    Identifier(String),
    /// A `$name`, without the `$`.
    Binding(String),
    Numeral(f64),
    /// A double-quoted string, unescaped.
    String(String),
    /// A backtick template, with doubled backticks collapsed.
    Template(String),
    Symbol(char),
}

/// The kind of a token, used to state what the parser expects next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Atom,
    Identifier,
    Binding,
    Numeral,
    String,
    Template,
    Symbol(char),
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Atom => write!(f, "literal"),
            TokenKind::Identifier => write!(f, "identifier"),
            TokenKind::Binding => write!(f, "binding"),
            TokenKind::Numeral => write!(f, "number"),
            TokenKind::String => write!(f, "string"),
            TokenKind::Template => write!(f, "template"),
            TokenKind::Symbol(c) => write!(f, "`{}`", c),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub lexeme: Lexeme,
    /// Byte offset of the first character.
    pub offset: usize,
}

impl Token {
    #[must_use]
    pub fn kind(&self) -> TokenKind {
        match self.lexeme {
            Lexeme::Atom(_) => TokenKind::Atom,
            Lexeme::Identifier(_) => TokenKind::Identifier,
            Lexeme::Binding(_) => TokenKind::Binding,
            Lexeme::Numeral(_) => TokenKind::Numeral,
            Lexeme::String(_) => TokenKind::String,
            Lexeme::Template(_) => TokenKind::Template,
            Lexeme::Symbol(c) => TokenKind::Symbol(c),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.lexeme {
            Lexeme::Identifier(name) => write!(f, "identifier `{}`", name),
            Lexeme::Binding(name) => write!(f, "binding `${}`", name),
            _ => self.kind().fmt(f),
        }
    }
}

/// An on-demand tokenizer with one token of lookahead.
pub struct Lexer<'a> {
    input: &'a str,
    offset: usize,
    lookahead: Option<Token>,
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input,
            offset: 0,
            lookahead: None,
        }
    }

    /// The text being tokenized.
    #[must_use]
    pub fn input(&self) -> &'a str {
        self.input
    }

    /// Offset of the next unconsumed token, or the end of input.
    pub fn position(&mut self) -> Result<usize> {
        self.fill()?;
        Ok(self
            .lookahead
            .as_ref()
            .map_or(self.input.len(), |token| token.offset))
    }

    /// Builds a syntax error pointing at `offset`.
    #[must_use]
    pub fn error(&self, offset: usize, msg: &str) -> Error {
        Error::syntax(self.input, offset, msg)
    }

    /// Returns the next token without consuming it. Yields `None` at the end of
    /// input, or when `expected` is given and the next token is of another kind.
    ///
    /// # Errors
    ///
    /// Returns a syntax error if the input at the current position is not a token.
    pub fn peek(&mut self, expected: Option<TokenKind>) -> Result<Option<&Token>> {
        self.fill()?;
        Ok(self
            .lookahead
            .as_ref()
            .filter(|token| expected.map_or(true, |kind| token.kind() == kind)))
    }

    /// Consumes the next token.
    ///
    /// # Errors
    ///
    /// Returns a syntax error at the end of input, when the next token is not of
    /// the `expected` kind, or when the input is not a token.
    pub fn shift(&mut self, expected: Option<TokenKind>) -> Result<Token> {
        self.fill()?;
        let Some(token) = self.lookahead.take() else {
            let msg = match expected {
                Some(kind) => format!("expected {}, found end of input", kind),
                None => "unexpected end of input".to_string(),
            };
            return Err(self.error(self.input.len(), &msg));
        };
        match expected {
            Some(kind) if token.kind() != kind => {
                let err = self.error(token.offset, &format!("expected {}, found {}", kind, token));
                self.lookahead = Some(token);
                Err(err)
            }
            _ => Ok(token),
        }
    }

    fn fill(&mut self) -> Result<()> {
        if self.lookahead.is_none() {
            self.lookahead = self.scan()?;
        }
        Ok(())
    }

    fn scan(&mut self) -> Result<Option<Token>> {
        let input = self.input;
        if let Some(skipped) = SKIP.find(&input[self.offset..]) {
            self.offset += skipped.end();
        }
        let rest = &input[self.offset..];
        let start = self.offset;
        let Some(first) = rest.chars().next() else {
            return Ok(None);
        };

        let (lexeme, len) = match first {
            '/' if rest.starts_with("/*") => {
                return Err(self.error(start, "unterminated comment"));
            }
            c if SYMBOLS.contains(c) => (Lexeme::Symbol(c), c.len_utf8()),
            '$' => {
                let captures = BINDING
                    .captures(rest)
                    .ok_or_else(|| self.error(start, "invalid binding name"))?;
                (Lexeme::Binding(captures[1].to_string()), captures[0].len())
            }
            '"' => {
                let literal = STRING
                    .find(rest)
                    .ok_or_else(|| self.error(start, "unterminated string"))?
                    .as_str();
                let decoded: String = serde_json::from_str(literal)
                    .map_err(|e| self.error(start, &format!("invalid string literal: {}", e)))?;
                (Lexeme::String(decoded), literal.len())
            }
            '`' => {
                let captures = TEMPLATE
                    .captures(rest)
                    .ok_or_else(|| self.error(start, "unterminated template"))?;
                (
                    Lexeme::Template(captures[1].replace("``", "`")),
                    captures[0].len(),
                )
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let word = IDENTIFIER
                    .find(rest)
                    .ok_or_else(|| self.error(start, "invalid identifier"))?
                    .as_str();
                let lexeme = match word {
                    "true" => Lexeme::Atom(Atom::True),
                    "false" => Lexeme::Atom(Atom::False),
                    "null" => Lexeme::Atom(Atom::Null),
                    "void" => Lexeme::Atom(Atom::Void),
                    "NaN" => Lexeme::Numeral(f64::NAN),
                    "Infinity" => Lexeme::Numeral(f64::INFINITY),
                    _ => Lexeme::Identifier(word.to_string()),
                };
                (lexeme, word.len())
            }
            c if c.is_ascii_digit() || matches!(c, '+' | '-' | '.') => {
                let text = NUMERAL
                    .find(rest)
                    .ok_or_else(|| self.error(start, "invalid number"))?
                    .as_str();
                (Lexeme::Numeral(parse_numeral(text)), text.len())
            }
            c => {
                return Err(self.error(start, &format!("unexpected character `{}`", c)));
            }
        };

        self.offset += len;
        Ok(Some(Token {
            lexeme,
            offset: start,
        }))
    }
}

fn parse_numeral(text: &str) -> f64 {
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let magnitude = match digits {
        "Infinity" => f64::INFINITY,
        "NaN" => f64::NAN,
        _ => digits.parse().unwrap_or(f64::NAN),
    };
    if negative {
        -magnitude
    } else {
        magnitude
    }
}

/// Tokenizes all of `input`.
///
/// # Errors
///
/// Returns the first syntax error encountered.
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    while lexer.peek(None)?.is_some() {
        tokens.push(lexer.shift(None)?);
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexemes(input: &str) -> Vec<Lexeme> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|token| token.lexeme)
            .collect()
    }

    fn syntax_offset(input: &str) -> usize {
        match tokenize(input) {
            Err(Error::Syntax { offset, .. }) => offset,
            other => panic!("Expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_symbols_and_atoms() {
        assert_eq!(
            lexemes("[true,false]{null:void}"),
            vec![
                Lexeme::Symbol('['),
                Lexeme::Atom(Atom::True),
                Lexeme::Symbol(','),
                Lexeme::Atom(Atom::False),
                Lexeme::Symbol(']'),
                Lexeme::Symbol('{'),
                Lexeme::Atom(Atom::Null),
                Lexeme::Symbol(':'),
                Lexeme::Atom(Atom::Void),
                Lexeme::Symbol('}'),
            ]
        );
    }

    #[test]
    fn test_numerals() {
        assert_eq!(
            lexemes("1 -2.5 +.5 1e3 1.E-2 Infinity -Infinity"),
            vec![
                Lexeme::Numeral(1.0),
                Lexeme::Numeral(-2.5),
                Lexeme::Numeral(0.5),
                Lexeme::Numeral(1000.0),
                Lexeme::Numeral(0.01),
                Lexeme::Numeral(f64::INFINITY),
                Lexeme::Numeral(f64::NEG_INFINITY),
            ]
        );
        match &lexemes("-NaN")[..] {
            [Lexeme::Numeral(n)] => assert!(n.is_nan()),
            other => panic!("unexpected {:?}", other),
        }
        match &lexemes("-0")[..] {
            [Lexeme::Numeral(n)] => assert!(n.is_sign_negative() && *n == 0.0),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_identifiers_and_bindings() {
        assert_eq!(
            lexemes("my.type-2 $0 $a.b-c"),
            vec![
                Lexeme::Identifier("my.type-2".into()),
                Lexeme::Binding("0".into()),
                Lexeme::Binding("a.b-c".into()),
            ]
        );
        assert_eq!(syntax_offset("  $"), 2);
    }

    #[test]
    fn test_strings_use_json_escapes() {
        assert_eq!(
            lexemes(r#""a\"b\\c\né""#),
            vec![Lexeme::String("a\"b\\c\né".into())]
        );
        assert_eq!(syntax_offset("\"a"), 0);
        assert_eq!(syntax_offset(r#" "\x""#), 1);
    }

    #[test]
    fn test_templates() {
        assert_eq!(
            lexemes("`line one\nline ``two```"),
            vec![Lexeme::Template("line one\nline `two`".into())]
        );
        assert_eq!(syntax_offset("`open"), 0);
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            lexemes("/* a */ 1 /* b\n c */ /**/"),
            vec![Lexeme::Numeral(1.0)]
        );
        assert_eq!(syntax_offset("1 /* open"), 2);
    }

    #[test]
    fn test_unexpected_character() {
        assert_eq!(syntax_offset("[1, #]"), 4);
    }

    #[test]
    fn test_peek_and_shift_expectations() {
        let mut lexer = Lexer::new("a:");
        assert!(lexer.peek(Some(TokenKind::String)).unwrap().is_none());
        assert!(lexer.shift(Some(TokenKind::Symbol(':'))).is_err());
        assert_eq!(
            lexer.shift(Some(TokenKind::Identifier)).unwrap().lexeme,
            Lexeme::Identifier("a".into())
        );
        lexer.shift(Some(TokenKind::Symbol(':'))).unwrap();
        assert!(lexer.peek(None).unwrap().is_none());
        assert!(matches!(
            lexer.shift(None),
            Err(Error::Syntax { offset: 2, .. })
        ));
    }
}
