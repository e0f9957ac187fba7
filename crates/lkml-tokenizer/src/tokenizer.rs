//! Tokenizer for LookML-like documents.

use crate::{Span, Token, TokenKind};
use tracing::trace;

/// Terminator of a code block.
const CODE_END: &str = ";;";

/// A tokenizer that produces tokens from LookML source text.
///
/// Code blocks are not lexically delimited at their start, so the tokenizer
/// never produces [`TokenKind::Code`] on its own: the parser asks for one with
/// [`Tokenizer::next_code`] right after the colon of a code property.
#[derive(Clone)]
pub struct Tokenizer<'src> {
    source: &'src str,
    /// The remaining source text (suffix of `source`).
    remaining: &'src str,
    /// Current byte position in `source`.
    pos: u32,
}

impl<'src> Tokenizer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            remaining: source,
            pos: 0,
        }
    }

    #[inline]
    pub fn position(&self) -> u32 {
        self.pos
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.remaining.is_empty()
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.remaining.chars().next()
    }

    #[inline]
    fn peek_nth(&self, n: usize) -> Option<char> {
        self.remaining.chars().nth(n)
    }

    #[inline]
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.advance_by(c.len_utf8());
        Some(c)
    }

    #[inline]
    fn advance_by(&mut self, n: usize) {
        self.pos += n as u32;
        self.remaining = &self.remaining[n..];
    }

    fn advance_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.advance();
        }
    }

    fn token(&self, kind: TokenKind, start: u32) -> Token<'src> {
        let span = Span::new(start, self.pos);
        let text = span.slice(self.source);
        trace!("Token {:?} at {}: {:?}", kind, span, text);
        Token::new(kind, span, text)
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Token<'src> {
        let start = self.pos;
        let Some(c) = self.peek() else {
            return self.token(TokenKind::Eof, start);
        };

        match c {
            '{' => self.single(TokenKind::LBrace),
            '}' => self.single(TokenKind::RBrace),
            '[' => self.single(TokenKind::LBracket),
            ']' => self.single(TokenKind::RBracket),
            ':' => self.single(TokenKind::Colon),
            ',' => self.single(TokenKind::Comma),
            '"' => self.tokenize_quoted_string(),
            '#' => {
                self.advance_while(|c| c != '\n' && c != '\r');
                self.token(TokenKind::Comment, start)
            }
            ' ' | '\t' => {
                self.advance_while(|c| c == ' ' || c == '\t');
                self.token(TokenKind::Whitespace, start)
            }
            '\n' => self.single(TokenKind::Newline),
            '\r' if self.peek_nth(1) == Some('\n') => {
                self.advance_by(2);
                self.token(TokenKind::Newline, start)
            }
            c if is_identifier_start(c) => {
                self.advance_while(is_identifier_char);
                self.token(TokenKind::Identifier, start)
            }
            c if c.is_ascii_digit()
                || (matches!(c, '-' | '.') && matches!(self.peek_nth(1), Some(d) if d.is_ascii_digit())) =>
            {
                self.tokenize_number()
            }
            _ => self.single(TokenKind::Error),
        }
    }

    fn single(&mut self, kind: TokenKind) -> Token<'src> {
        let start = self.pos;
        self.advance();
        self.token(kind, start)
    }

    /// Tokenize a number: `-?digits[.digits][(e|E)[+-]digits]`.
    ///
    /// A number immediately followed by identifier characters (`12abc`) is an
    /// error token covering the whole word.
    fn tokenize_number(&mut self) -> Token<'src> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.advance();
        }
        self.advance_while(|c| c.is_ascii_digit());
        if self.peek() == Some('.') && matches!(self.peek_nth(1), Some(d) if d.is_ascii_digit()) {
            self.advance();
            self.advance_while(|c| c.is_ascii_digit());
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            let digits_at = if matches!(self.peek_nth(1), Some('+' | '-')) { 2 } else { 1 };
            if matches!(self.peek_nth(digits_at), Some(d) if d.is_ascii_digit()) {
                self.advance_by(digits_at);
                self.advance_while(|c| c.is_ascii_digit());
            }
        }
        if matches!(self.peek(), Some(c) if is_identifier_char(c)) {
            self.advance_while(is_identifier_char);
            return self.token(TokenKind::Error, start);
        }
        self.token(TokenKind::Number, start)
    }

    /// Tokenize a quoted string, quotes included. Escapes are skipped over
    /// here and resolved by the parser.
    fn tokenize_quoted_string(&mut self) -> Token<'src> {
        let start = self.pos;
        self.advance();

        loop {
            match self.advance() {
                None => return self.token(TokenKind::Error, start),
                Some('"') => break,
                Some('\\') => {
                    self.advance();
                }
                Some(_) => {}
            }
        }

        self.token(TokenKind::QuotedString, start)
    }

    /// Read a code block: everything up to the next `;;`.
    ///
    /// The returned token's text excludes the terminator, which is consumed.
    /// A missing terminator yields an error token spanning the rest of input.
    pub fn next_code(&mut self) -> Token<'src> {
        let start = self.pos;
        match self.remaining.find(CODE_END) {
            Some(len) => {
                self.advance_by(len);
                let token = self.token(TokenKind::Code, start);
                self.advance_by(CODE_END.len());
                token
            }
            None => {
                self.advance_by(self.remaining.len());
                self.token(TokenKind::Error, start)
            }
        }
    }
}

impl<'src> Iterator for Tokenizer<'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            None
        } else {
            Some(token)
        }
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.'
}

/// Whether `s` can be written without quotes as a name or reference.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if is_identifier_start(c) => chars.all(is_identifier_char),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(source: &str) -> Vec<(TokenKind, &str)> {
        Tokenizer::new(source).map(|t| (t.kind, t.text)).collect()
    }

    #[test]
    fn test_structural_tokens() {
        assert_eq!(tokenize("{"), vec![(TokenKind::LBrace, "{")]);
        assert_eq!(tokenize("}"), vec![(TokenKind::RBrace, "}")]);
        assert_eq!(tokenize("["), vec![(TokenKind::LBracket, "[")]);
        assert_eq!(tokenize("]"), vec![(TokenKind::RBracket, "]")]);
        assert_eq!(tokenize(":"), vec![(TokenKind::Colon, ":")]);
        assert_eq!(tokenize(","), vec![(TokenKind::Comma, ",")]);
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(tokenize("orders"), vec![(TokenKind::Identifier, "orders")]);
        assert_eq!(
            tokenize("orders.created_at"),
            vec![(TokenKind::Identifier, "orders.created_at")]
        );
        assert_eq!(tokenize("_x1"), vec![(TokenKind::Identifier, "_x1")]);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(tokenize("42"), vec![(TokenKind::Number, "42")]);
        assert_eq!(tokenize("-1.5"), vec![(TokenKind::Number, "-1.5")]);
        assert_eq!(tokenize("1e3"), vec![(TokenKind::Number, "1e3")]);
        assert_eq!(tokenize("2.5E-2"), vec![(TokenKind::Number, "2.5E-2")]);
        assert_eq!(tokenize("12abc"), vec![(TokenKind::Error, "12abc")]);
    }

    #[test]
    fn test_quoted_string() {
        assert_eq!(
            tokenize(r#""hello world""#),
            vec![(TokenKind::QuotedString, r#""hello world""#)]
        );
        assert_eq!(
            tokenize(r#""with \"escapes\"""#),
            vec![(TokenKind::QuotedString, r#""with \"escapes\"""#)]
        );
        assert_eq!(tokenize("\"open"), vec![(TokenKind::Error, "\"open")]);
    }

    #[test]
    fn test_comment_stops_at_newline() {
        assert_eq!(
            tokenize("# note\nx"),
            vec![
                (TokenKind::Comment, "# note"),
                (TokenKind::Newline, "\n"),
                (TokenKind::Identifier, "x"),
            ]
        );
    }

    #[test]
    fn test_property() {
        assert_eq!(
            tokenize("label: \"Orders\""),
            vec![
                (TokenKind::Identifier, "label"),
                (TokenKind::Colon, ":"),
                (TokenKind::Whitespace, " "),
                (TokenKind::QuotedString, "\"Orders\""),
            ]
        );
    }

    #[test]
    fn test_code_block() {
        let mut tokenizer = Tokenizer::new("sql: ${TABLE}.id ;; x");
        assert_eq!(tokenizer.next_token().kind, TokenKind::Identifier);
        assert_eq!(tokenizer.next_token().kind, TokenKind::Colon);
        let code = tokenizer.next_code();
        assert_eq!(code.kind, TokenKind::Code);
        assert_eq!(code.text, " ${TABLE}.id ");
        assert_eq!(tokenizer.next_token().kind, TokenKind::Whitespace);
        assert_eq!(tokenizer.next_token().text, "x");
    }

    #[test]
    fn test_unterminated_code_block() {
        let mut tokenizer = Tokenizer::new("SELECT 1");
        assert_eq!(tokenizer.next_code().kind, TokenKind::Error);
        assert!(tokenizer.is_eof());
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("orders"));
        assert!(is_identifier("orders.id"));
        assert!(!is_identifier("1abc"));
        assert!(!is_identifier("has space"));
        assert!(!is_identifier(""));
    }
}
