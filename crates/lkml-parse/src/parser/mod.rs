//! Recursive-descent parser that drives the event protocol.

use std::borrow::Cow;
use std::collections::HashSet;

use tracing::{debug, trace};

use crate::{Lexeme, Lexer, ListEvents, ObjectEvents, ParseError, ParseErrorKind, Span};

#[cfg(test)]
mod tests;

/// Maximum nesting of objects and lists.
pub const MAX_DEPTH: usize = 128;

/// Parser for LookML-like documents.
///
/// The document root is an implicit object. Every scope the parser opens is
/// closed again before `parse` returns, including when a syntax error stops
/// the parse.
pub struct Parser<'src> {
    source: &'src str,
    lexer: Lexer<'src>,
    code_properties: HashSet<String>,
    depth: usize,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            lexer: Lexer::new(source),
            code_properties: HashSet::new(),
            depth: 0,
        }
    }

    /// Property names whose values are code blocks terminated by `;;`.
    pub fn with_code_properties<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.code_properties.extend(names.into_iter().map(Into::into));
        self
    }

    /// Parse the whole document into `root`, closing it at the end.
    pub fn parse(mut self, mut root: Box<dyn ObjectEvents + '_>) -> Result<(), ParseError> {
        debug!(len = self.source.len(), "parsing document");
        let result = self.parse_members(root.as_mut(), None);
        root.close();
        if let Err(error) = &result {
            debug!(%error, "parse failed");
        }
        result
    }

    /// Parse properties until `}` (when `open` is the span of the opening
    /// brace) or end of input (at the root).
    fn parse_members(
        &mut self,
        sink: &mut dyn ObjectEvents,
        open: Option<Span>,
    ) -> Result<(), ParseError> {
        loop {
            match self.lexer.next_lexeme() {
                Lexeme::Comment { text, .. } => sink.comment(text),
                Lexeme::Comma { .. } => {}
                Lexeme::Identifier { text, span } => {
                    self.parse_property(sink, Cow::Borrowed(text), span)?
                }
                Lexeme::String { value, span } => self.parse_property(sink, value, span)?,
                Lexeme::RBrace { span } => {
                    return match open {
                        Some(_) => Ok(()),
                        None => Err(ParseError::new(ParseErrorKind::Unmatched('}'), span)),
                    };
                }
                Lexeme::Eof { span } => {
                    return match open {
                        Some(open) => Err(ParseError::new(
                            ParseErrorKind::UnclosedObject,
                            open.to(span),
                        )),
                        None => Ok(()),
                    };
                }
                Lexeme::Error { span, kind } => return Err(ParseError::new(kind, span)),
                Lexeme::RBracket { span } => {
                    return Err(ParseError::new(ParseErrorKind::Unmatched(']'), span));
                }
                other => return Err(unexpected(&other, "a property name")),
            }
        }
    }

    fn parse_property(
        &mut self,
        sink: &mut dyn ObjectEvents,
        name: Cow<'src, str>,
        name_span: Span,
    ) -> Result<(), ParseError> {
        let mut comments = Vec::new();
        self.peek_past_comments(&mut comments);
        for comment in comments {
            sink.comment(comment);
        }
        match self.lexer.next_lexeme() {
            Lexeme::Colon { .. } => {}
            Lexeme::Error { span, kind } => return Err(ParseError::new(kind, span)),
            other => return Err(unexpected(&other, "':'")),
        }
        trace!(name = %name, "property");

        if self.code_properties.contains(name.as_ref()) {
            let (text, _) = self.lexer.next_code()?;
            sink.code(&name, text);
            return Ok(());
        }

        let lexeme = self.next_value(|comment| sink.comment(comment));
        match lexeme {
            Lexeme::Number { value, .. } => sink.number(&name, value),
            Lexeme::String { value, .. } => sink.string(&name, &value),
            Lexeme::Identifier { text, span } => {
                let mut comments = Vec::new();
                if let Lexeme::LBrace { .. } = self.peek_past_comments(&mut comments) {
                    for comment in comments {
                        sink.comment(comment);
                    }
                    self.lexer.next_lexeme();
                    self.enter(span)?;
                    let mut child = sink.named_obj_open(&name, text);
                    let result = self.parse_members(child.as_mut(), Some(span));
                    child.close();
                    self.depth -= 1;
                    result?;
                } else {
                    match text {
                        "yes" => sink.bool(&name, true),
                        "no" => sink.bool(&name, false),
                        _ => sink.identifier(&name, text),
                    }
                    for comment in comments {
                        sink.comment(comment);
                    }
                }
            }
            Lexeme::LBrace { span } => {
                self.enter(span)?;
                let mut child = sink.obj_open(&name);
                let result = self.parse_members(child.as_mut(), Some(span));
                child.close();
                self.depth -= 1;
                result?;
            }
            Lexeme::LBracket { span } => {
                self.enter(span)?;
                let mut child = sink.list_open(&name);
                let result = self.parse_elements(child.as_mut(), span);
                child.close();
                self.depth -= 1;
                result?;
            }
            Lexeme::Error { span, kind } => return Err(ParseError::new(kind, span)),
            Lexeme::Eof { span } => {
                return Err(ParseError::new(
                    ParseErrorKind::UnexpectedToken {
                        found: "end of input",
                        expected: "a value",
                    },
                    name_span.to(span),
                ));
            }
            other => return Err(unexpected(&other, "a value")),
        }
        Ok(())
    }

    /// Parse list elements up to the closing `]`.
    fn parse_elements(&mut self, sink: &mut dyn ListEvents, open: Span) -> Result<(), ParseError> {
        loop {
            match self.lexer.next_lexeme() {
                Lexeme::Comment { text, .. } => sink.comment(text),
                Lexeme::Comma { .. } => {}
                Lexeme::RBracket { .. } => return Ok(()),
                Lexeme::Number { value, .. } => sink.number(value),
                Lexeme::String { value, .. } => sink.string(&value),
                Lexeme::Identifier { text, .. } => {
                    let mut comments = Vec::new();
                    if let Lexeme::Colon { .. } = self.peek_past_comments(&mut comments) {
                        for comment in comments.drain(..) {
                            sink.comment(comment);
                        }
                        self.lexer.next_lexeme();
                        match self.next_value(|comment| sink.comment(comment)) {
                            Lexeme::String { value, .. } => sink.pair(text, &value),
                            Lexeme::Error { span, kind } => {
                                return Err(ParseError::new(kind, span));
                            }
                            other => return Err(unexpected(&other, "a quoted string")),
                        }
                    } else {
                        match text {
                            "yes" => sink.bool(true),
                            "no" => sink.bool(false),
                            _ => sink.identifier(text),
                        }
                    }
                    for comment in comments {
                        sink.comment(comment);
                    }
                }
                Lexeme::LBracket { span } => {
                    self.enter(span)?;
                    let mut child = sink.list_open();
                    let result = self.parse_elements(child.as_mut(), span);
                    child.close();
                    self.depth -= 1;
                    result?;
                }
                Lexeme::Eof { span } => {
                    return Err(ParseError::new(ParseErrorKind::UnclosedList, open.to(span)));
                }
                Lexeme::Error { span, kind } => return Err(ParseError::new(kind, span)),
                other => return Err(unexpected(&other, "a list element")),
            }
        }
    }

    /// Peek at the next lexeme that is not a comment. Comments passed on
    /// the way are consumed and collected into `comments`.
    fn peek_past_comments(&mut self, comments: &mut Vec<&'src str>) -> &Lexeme<'src> {
        while let Lexeme::Comment { text, .. } = *self.lexer.peek() {
            comments.push(text);
            self.lexer.next_lexeme();
        }
        self.lexer.peek()
    }

    /// Next lexeme that is not a comment. Comments met on the way are handed
    /// to `on_comment`, which delivers them to the enclosing scope.
    fn next_value(&mut self, mut on_comment: impl FnMut(&str)) -> Lexeme<'src> {
        loop {
            match self.lexer.next_lexeme() {
                Lexeme::Comment { text, .. } => on_comment(text),
                other => return other,
            }
        }
    }

    fn enter(&mut self, span: Span) -> Result<(), ParseError> {
        if self.depth >= MAX_DEPTH {
            return Err(ParseError::new(ParseErrorKind::TooDeep(MAX_DEPTH), span));
        }
        self.depth += 1;
        Ok(())
    }
}

fn unexpected(lexeme: &Lexeme<'_>, expected: &'static str) -> ParseError {
    ParseError::new(
        ParseErrorKind::UnexpectedToken {
            found: lexeme.describe(),
            expected,
        },
        lexeme.span(),
    )
}
