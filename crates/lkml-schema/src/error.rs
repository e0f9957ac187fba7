//! Schema construction and loading errors.

use lkml_parse::ParseError;
use thiserror::Error;

use crate::Type;
use crate::validate::ValidationError;

/// A schema could not be built or loaded.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("property '{property}' refers to undeclared enum type '{enum_type}'")]
    UnknownEnumType { property: String, enum_type: String },

    #[error("property '{property}' refers to undeclared object type '{object_type}'")]
    UnknownObjectType {
        property: String,
        object_type: String,
    },

    /// A schema document names neither a built-in type nor a declared enum.
    #[error("property '{property}' has unknown type '{name}'")]
    UnknownType { property: String, name: String },

    #[error("property '{property}' has no type")]
    MissingType { property: String },

    #[error("enum type '{0}' is declared twice")]
    DuplicateEnumType(String),

    #[error("object type '{0}' is declared twice")]
    DuplicateObjectType(String),

    #[error("property '{property}' is declared twice in '{parent}'")]
    DuplicateProperty { property: String, parent: String },

    /// A code property name also used for a property of another type.
    #[error("property '{property}' is CODE in '{code_in}' but {kind} in '{other_in}'")]
    CodeClash {
        property: String,
        code_in: String,
        other_in: String,
        kind: Type,
    },

    #[error("document declares no schema")]
    NoSchema,

    #[error("schema document does not validate: {}", summarize(errors))]
    InvalidDocument { errors: Vec<ValidationError> },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
