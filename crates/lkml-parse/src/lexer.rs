//! Lexer: turns tokens into whitespace-free lexemes with resolved values.

use std::borrow::Cow;

use crate::{ParseError, ParseErrorKind, Span, TokenKind, Tokenizer};

/// A significant unit of input. Whitespace and newlines never appear;
/// comments do, because they are delivered to consumers.
#[derive(Debug, Clone, PartialEq)]
pub enum Lexeme<'src> {
    LBrace { span: Span },
    RBrace { span: Span },
    LBracket { span: Span },
    RBracket { span: Span },
    Colon { span: Span },
    Comma { span: Span },
    Identifier { span: Span, text: &'src str },
    Number { span: Span, value: f64 },
    /// Quoted string, escapes resolved.
    String { span: Span, value: Cow<'src, str> },
    /// Comment text after the `#`.
    Comment { span: Span, text: &'src str },
    Eof { span: Span },
    Error { span: Span, kind: ParseErrorKind },
}

impl Lexeme<'_> {
    pub fn span(&self) -> Span {
        match self {
            Lexeme::LBrace { span }
            | Lexeme::RBrace { span }
            | Lexeme::LBracket { span }
            | Lexeme::RBracket { span }
            | Lexeme::Colon { span }
            | Lexeme::Comma { span }
            | Lexeme::Identifier { span, .. }
            | Lexeme::Number { span, .. }
            | Lexeme::String { span, .. }
            | Lexeme::Comment { span, .. }
            | Lexeme::Eof { span }
            | Lexeme::Error { span, .. } => *span,
        }
    }

    /// Human-readable description used in parse errors.
    pub fn describe(&self) -> &'static str {
        match self {
            Lexeme::LBrace { .. } => TokenKind::LBrace.describe(),
            Lexeme::RBrace { .. } => TokenKind::RBrace.describe(),
            Lexeme::LBracket { .. } => TokenKind::LBracket.describe(),
            Lexeme::RBracket { .. } => TokenKind::RBracket.describe(),
            Lexeme::Colon { .. } => TokenKind::Colon.describe(),
            Lexeme::Comma { .. } => TokenKind::Comma.describe(),
            Lexeme::Identifier { .. } => TokenKind::Identifier.describe(),
            Lexeme::Number { .. } => TokenKind::Number.describe(),
            Lexeme::String { .. } => TokenKind::QuotedString.describe(),
            Lexeme::Comment { .. } => TokenKind::Comment.describe(),
            Lexeme::Eof { .. } => TokenKind::Eof.describe(),
            Lexeme::Error { .. } => TokenKind::Error.describe(),
        }
    }
}

/// Lexer with a single lookahead slot.
#[derive(Clone)]
pub struct Lexer<'src> {
    tokenizer: Tokenizer<'src>,
    pending: Option<Lexeme<'src>>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            tokenizer: Tokenizer::new(source),
            pending: None,
        }
    }

    /// Next lexeme, consuming it.
    pub fn next_lexeme(&mut self) -> Lexeme<'src> {
        if let Some(lexeme) = self.pending.take() {
            return lexeme;
        }
        self.lex()
    }

    /// Next lexeme without consuming it.
    pub fn peek(&mut self) -> &Lexeme<'src> {
        let lexeme = match self.pending.take() {
            Some(lexeme) => lexeme,
            None => self.lex(),
        };
        self.pending.insert(lexeme)
    }

    /// Read a code block up to its `;;` terminator, returning the trimmed text.
    ///
    /// Must be called with nothing peeked: the code text starts right where
    /// the previous lexeme ended.
    pub fn next_code(&mut self) -> Result<(&'src str, Span), ParseError> {
        debug_assert!(self.pending.is_none(), "next_code called after peek");
        let token = self.tokenizer.next_code();
        match token.kind {
            TokenKind::Code => Ok((token.text.trim(), token.span)),
            _ => Err(ParseError::new(ParseErrorKind::UnterminatedCode, token.span)),
        }
    }

    fn lex(&mut self) -> Lexeme<'src> {
        loop {
            let token = self.tokenizer.next_token();
            let span = token.span;
            return match token.kind {
                TokenKind::Whitespace | TokenKind::Newline => continue,
                TokenKind::LBrace => Lexeme::LBrace { span },
                TokenKind::RBrace => Lexeme::RBrace { span },
                TokenKind::LBracket => Lexeme::LBracket { span },
                TokenKind::RBracket => Lexeme::RBracket { span },
                TokenKind::Colon => Lexeme::Colon { span },
                TokenKind::Comma => Lexeme::Comma { span },
                TokenKind::Identifier => Lexeme::Identifier {
                    span,
                    text: token.text,
                },
                TokenKind::Number => match token.text.parse::<f64>() {
                    Ok(value) => Lexeme::Number { span, value },
                    Err(_) => Lexeme::Error {
                        span,
                        kind: ParseErrorKind::InvalidNumber(token.text.to_owned()),
                    },
                },
                TokenKind::QuotedString => {
                    let inner = &token.text[1..token.text.len() - 1];
                    match unescape(inner) {
                        Ok(value) => Lexeme::String { span, value },
                        Err(kind) => Lexeme::Error { span, kind },
                    }
                }
                TokenKind::Comment => Lexeme::Comment {
                    span,
                    text: &token.text[1..],
                },
                TokenKind::Eof => Lexeme::Eof { span },
                TokenKind::Code => Lexeme::Error {
                    span,
                    kind: ParseErrorKind::UnexpectedToken {
                        found: TokenKind::Code.describe(),
                        expected: "a value",
                    },
                },
                TokenKind::Error => Lexeme::Error {
                    span,
                    kind: classify_error(token.text),
                },
            };
        }
    }
}

fn classify_error(text: &str) -> ParseErrorKind {
    match text.chars().next() {
        Some('"') => ParseErrorKind::UnterminatedString,
        Some(c) if c.is_ascii_digit() || c == '-' || c == '.' => {
            ParseErrorKind::InvalidNumber(text.to_owned())
        }
        _ => ParseErrorKind::InvalidCharacter(text.to_owned()),
    }
}

/// Resolve backslash escapes in the content of a quoted string.
pub(crate) fn unescape(s: &str) -> Result<Cow<'_, str>, ParseErrorKind> {
    if !s.contains('\\') {
        return Ok(Cow::Borrowed(s));
    }

    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => result.push('"'),
            Some('\\') => result.push('\\'),
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some(other) => return Err(ParseErrorKind::InvalidEscape(format!("\\{other}"))),
            None => return Err(ParseErrorKind::InvalidEscape("\\".to_owned())),
        }
    }
    Ok(Cow::Owned(result))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_all(source: &str) -> Vec<Lexeme<'_>> {
        let mut lexer = Lexer::new(source);
        let mut out = Vec::new();
        loop {
            let lexeme = lexer.next_lexeme();
            let done = matches!(lexeme, Lexeme::Eof { .. } | Lexeme::Error { .. });
            out.push(lexeme);
            if done {
                return out;
            }
        }
    }

    #[test]
    fn test_whitespace_is_dropped() {
        let lexemes = lex_all("  a :\n 1 ");
        assert!(matches!(lexemes[0], Lexeme::Identifier { text: "a", .. }));
        assert!(matches!(lexemes[1], Lexeme::Colon { .. }));
        assert!(matches!(lexemes[2], Lexeme::Number { value, .. } if value == 1.0));
        assert!(matches!(lexemes[3], Lexeme::Eof { .. }));
    }

    #[test]
    fn test_string_escapes() {
        let lexemes = lex_all(r#""say \"hi\" \\ now""#);
        match &lexemes[0] {
            Lexeme::String { value, .. } => assert_eq!(value, "say \"hi\" \\ now"),
            other => panic!("expected string, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_escape() {
        let lexemes = lex_all(r#""bad \q""#);
        assert!(matches!(
            &lexemes[0],
            Lexeme::Error { kind: ParseErrorKind::InvalidEscape(seq), .. } if seq == "\\q"
        ));
    }

    #[test]
    fn test_comment_text_excludes_hash() {
        let lexemes = lex_all("# hello");
        assert!(matches!(lexemes[0], Lexeme::Comment { text: " hello", .. }));
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut lexer = Lexer::new("a {");
        assert!(matches!(lexer.next_lexeme(), Lexeme::Identifier { .. }));
        assert!(matches!(lexer.peek(), Lexeme::LBrace { .. }));
        assert!(matches!(lexer.next_lexeme(), Lexeme::LBrace { .. }));
        assert!(matches!(lexer.next_lexeme(), Lexeme::Eof { .. }));
    }

    #[test]
    fn test_code_is_trimmed() {
        let mut lexer = Lexer::new("sql: ${TABLE}.id ;;");
        lexer.next_lexeme();
        lexer.next_lexeme();
        let (text, _) = lexer.next_code().unwrap();
        assert_eq!(text, "${TABLE}.id");
    }

    #[test]
    fn test_unterminated_string() {
        let lexemes = lex_all("\"open");
        assert!(matches!(
            lexemes[0],
            Lexeme::Error {
                kind: ParseErrorKind::UnterminatedString,
                ..
            }
        ));
    }
}
