//! Format value trees and source text.

use lkml_parse::{ParseError, Parser};
use lkml_tree::Object;

use crate::{DocumentWriter, FormatOptions, LookmlWriter, write_document};

/// Format an object as a document.
///
/// The object is the document root, so it is written without braces.
pub fn format_object(obj: &Object, options: FormatOptions) -> String {
    write_document(options, |root| obj.emit(root))
}

/// Format an object as a document with default options.
pub fn format_object_default(obj: &Object) -> String {
    format_object(obj, FormatOptions::default())
}

/// Re-format source text, keeping comments.
///
/// Parsing events go straight to the writer; no tree is built.
pub fn format_source<I, S>(
    source: &str,
    code_properties: I,
    options: FormatOptions,
) -> Result<String, ParseError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut writer = LookmlWriter::with_options(options);
    Parser::new(source)
        .with_code_properties(code_properties)
        .parse(Box::new(DocumentWriter::new(&mut writer)))?;
    Ok(writer.finish())
}
