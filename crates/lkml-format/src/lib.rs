//! Document output for LookML-like documents.
//!
//! [`LookmlWriter`] is the low-level writer. [`DocumentWriter`] puts it
//! behind the event protocol so live event streams can be rendered, and
//! [`format_object`] renders a value tree.

mod document;
mod options;
mod scalar;
mod value_format;
mod writer;

pub use document::{DocumentWriter, write_document};
pub use options::FormatOptions;
pub use scalar::{can_be_bare, escape_quoted, format_number};
pub use value_format::{format_object, format_object_default, format_source};
pub use writer::LookmlWriter;
