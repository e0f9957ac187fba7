//! Value-tree representation of LookML-like documents.
//!
//! [`ObjectBuilder`] and [`ListBuilder`] materialize an event stream into an
//! ordered, duplicate-preserving [`Object`]. A tree can be replayed as events
//! again with [`Object::emit`].

mod builder;
mod diagnostic;
mod value;

pub use builder::{ListBuilder, ObjectBuilder, build};
pub use diagnostic::RenderDiagnostic;
pub use lkml_parse::{ParseError, ParseErrorKind, Span};
pub use value::{Entry, Item, List, Object, Value};

/// Parse a document into a tree.
pub fn parse(source: &str) -> Result<Object, ParseError> {
    parse_with_code_properties(source, std::iter::empty::<&str>())
}

/// Parse a document whose code properties are `code_properties`.
pub fn parse_with_code_properties<I, S>(
    source: &str,
    code_properties: I,
) -> Result<Object, ParseError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut document = None;
    lkml_parse::Parser::new(source)
        .with_code_properties(code_properties)
        .parse(Box::new(ObjectBuilder::new(|object| document = Some(object))))?;
    Ok(document.unwrap_or_default())
}

#[cfg(test)]
mod tests;
