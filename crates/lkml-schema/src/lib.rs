//! Schemas for LookML-like documents.
//!
//! A [`Schema`] says which properties a document may have, what kind of
//! value each one takes and which of them hold code. Schemas are built with
//! [`SchemaBuilder`] or loaded from a schema document with [`load_schema`].
//!
//! [`ValidatingHandler`] checks a live event stream against a schema and
//! forwards what it accepts to any consumer; [`Pipeline`] assembles it with
//! the other decorators.

mod builder;
mod error;
mod lookml;
mod meta;
mod pipeline;
mod types;
mod validate;

pub use builder::{ObjectTypeBuilder, SchemaBuilder};
pub use error::SchemaError;
pub use lookml::{LOOKML_SCHEMA_SOURCE, lookml_schema};
pub use meta::{META_SCHEMA_SOURCE, load_schema, meta_schema};
pub use pipeline::Pipeline;
pub use types::{EnumType, ObjectType, Property, Schema, Type, ValueKind};
pub use validate::{
    ErrorHandler, TracingErrorHandler, ValidatingHandler, ValidationError, ValidationResult,
    parse_validated, validate,
};
