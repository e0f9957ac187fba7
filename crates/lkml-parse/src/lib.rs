//! Event protocol and parser for LookML-like documents.
//!
//! A document is delivered as a tree of calls against [`ObjectEvents`] and
//! [`ListEvents`]. Opening an object or list returns a handler for the child
//! scope which borrows its parent, so a parent cannot see another event until
//! the child has been closed.

pub use lkml_tokenizer::{Span, Token, TokenKind, Tokenizer, is_identifier};

mod error;
pub use error::{ParseError, ParseErrorKind};

mod events;
pub use events::{Event, EventRecorder, ListEvents, NullSink, ObjectEvents, replay};

mod log;
pub use log::EventLogger;

mod lexer;
pub use lexer::{Lexeme, Lexer};

mod parser;
pub use parser::{MAX_DEPTH, Parser};
