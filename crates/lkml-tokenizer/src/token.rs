//! Token types for the LookML lexer.

use crate::Span;

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Structural tokens
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `:`
    Colon,
    /// `,`
    Comma,

    // Scalar tokens
    /// Bare identifier: `orders`, `orders.id`, `yes`
    Identifier,
    /// Bare number: `42`, `-1.5`, `1e3`
    Number,
    /// Quoted string: `"hello world"`
    QuotedString,
    /// Raw code text up to (not including) `;;`
    Code,

    // Trivia
    /// Comment: `# ...` up to end of line
    Comment,
    /// Horizontal whitespace: spaces and tabs
    Whitespace,
    /// Newline: `\n` or `\r\n`
    Newline,

    // Special tokens
    /// End of file
    Eof,
    /// Lexer error (unrecognized or unterminated input)
    Error,
}

impl TokenKind {
    /// Whether this token is whitespace. Comments are not whitespace: they
    /// are delivered to consumers.
    pub fn is_whitespace(&self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Newline)
    }

    /// Human-readable description used in parse errors.
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::Colon => "':'",
            TokenKind::Comma => "','",
            TokenKind::Identifier => "identifier",
            TokenKind::Number => "number",
            TokenKind::QuotedString => "string",
            TokenKind::Code => "code block",
            TokenKind::Comment => "comment",
            TokenKind::Whitespace => "whitespace",
            TokenKind::Newline => "newline",
            TokenKind::Eof => "end of input",
            TokenKind::Error => "invalid token",
        }
    }
}

/// A token with its kind, span, and source text slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub span: Span,
    /// The source text of this token.
    pub text: &'src str,
}

impl<'src> Token<'src> {
    pub fn new(kind: TokenKind, span: Span, text: &'src str) -> Self {
        Self { kind, span, text }
    }
}
