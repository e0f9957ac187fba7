//! Parse errors.

use thiserror::Error;

use crate::Span;

/// A syntax error with its location. Parsing stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at {span}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Parse error kinds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// A token that does not fit the grammar at this point.
    #[error("unexpected {found}, expected {expected}")]
    UnexpectedToken {
        found: &'static str,
        expected: &'static str,
    },
    /// Missing `}`.
    #[error("unclosed object")]
    UnclosedObject,
    /// Missing `]`.
    #[error("unclosed list")]
    UnclosedList,
    /// `}` or `]` without a matching opener.
    #[error("unmatched '{0}'")]
    Unmatched(char),
    /// String without a closing quote.
    #[error("unterminated string")]
    UnterminatedString,
    /// Code block without `;;`.
    #[error("code block is missing its terminating ';;'")]
    UnterminatedCode,
    /// Unknown backslash escape in a quoted string.
    #[error("invalid escape sequence '{0}'")]
    InvalidEscape(String),
    /// Malformed number literal such as `12abc`.
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
    /// A character that cannot start any token.
    #[error("unexpected character '{0}'")]
    InvalidCharacter(String),
    /// Objects and lists nested beyond [`crate::MAX_DEPTH`].
    #[error("nesting deeper than {0} levels")]
    TooDeep(usize),
}
