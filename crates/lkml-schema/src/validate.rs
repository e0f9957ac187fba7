//! Schema validation of live event streams.
//!
//! [`ValidatingHandler`] sits in front of any [`ObjectEvents`] consumer. It
//! checks every event against a [`Schema`], reports problems to an
//! [`ErrorHandler`] and forwards only what the schema accepts. Invalid
//! subtrees are pruned as a whole; validation itself never stops early.

use std::collections::HashSet;
use std::fmt;

use lkml_parse::{ListEvents, NullSink, ObjectEvents, ParseError};
use lkml_tree::{Object, ObjectBuilder};
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::types::{ObjectType, Property, Schema, Type, ValueKind};

/// A problem found while validating a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("'{name}' is not a valid top-level property")]
    InvalidRootProperty { name: String },

    #[error("'{name}' is not a valid property of '{parent_type}'")]
    InvalidPropertyOfParent { name: String, parent_type: String },

    #[error("'{name}' needs an instance name")]
    NameRequired { name: String },

    #[error("'{name}' should be {expected}, found {actual}")]
    InvalidPropertyType {
        name: String,
        expected: Type,
        actual: ValueKind,
    },

    #[error("'{value}' is not a valid {enum_type} for '{name}' of '{parent_type}'")]
    InvalidEnumValue {
        parent_type: String,
        name: String,
        enum_type: String,
        value: String,
    },

    #[error("{actual} is not a valid element of '{name}' ({list_kind})")]
    InvalidListElement {
        name: String,
        actual: ValueKind,
        list_kind: Type,
    },

    #[error("'{name}' is already set")]
    DuplicateProperty { name: String },

    #[error("'{name}: {instance}' is already defined")]
    DuplicateNamedProperty { name: String, instance: String },
}

/// Receives validation errors as they are found.
///
/// Each error kind has its own method; all of them default to
/// [`report`](Self::report).
pub trait ErrorHandler {
    fn report(&mut self, error: ValidationError);

    fn invalid_root_property(&mut self, name: &str) {
        self.report(ValidationError::InvalidRootProperty {
            name: name.to_owned(),
        });
    }

    fn invalid_property_of_parent(&mut self, name: &str, parent_type: &str) {
        self.report(ValidationError::InvalidPropertyOfParent {
            name: name.to_owned(),
            parent_type: parent_type.to_owned(),
        });
    }

    fn name_required(&mut self, name: &str) {
        self.report(ValidationError::NameRequired {
            name: name.to_owned(),
        });
    }

    fn invalid_property_type(&mut self, name: &str, expected: Type, actual: ValueKind) {
        self.report(ValidationError::InvalidPropertyType {
            name: name.to_owned(),
            expected,
            actual,
        });
    }

    fn invalid_enum_value(&mut self, parent_type: &str, name: &str, enum_type: &str, value: &str) {
        self.report(ValidationError::InvalidEnumValue {
            parent_type: parent_type.to_owned(),
            name: name.to_owned(),
            enum_type: enum_type.to_owned(),
            value: value.to_owned(),
        });
    }

    fn invalid_list_element(&mut self, name: &str, actual: ValueKind, list_kind: Type) {
        self.report(ValidationError::InvalidListElement {
            name: name.to_owned(),
            actual,
            list_kind,
        });
    }

    fn duplicate_property(&mut self, name: &str) {
        self.report(ValidationError::DuplicateProperty {
            name: name.to_owned(),
        });
    }

    fn duplicate_named_property(&mut self, name: &str, instance: &str) {
        self.report(ValidationError::DuplicateNamedProperty {
            name: name.to_owned(),
            instance: instance.to_owned(),
        });
    }
}

impl ErrorHandler for Vec<ValidationError> {
    fn report(&mut self, error: ValidationError) {
        self.push(error);
    }
}

/// Errors collected from one validation run, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    /// Create an empty (passing) result.
    pub fn ok() -> Self {
        Self::default()
    }

    /// Check if validation passed (no errors).
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Merge another result into this one.
    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
    }
}

impl ErrorHandler for ValidationResult {
    fn report(&mut self, error: ValidationError) {
        self.errors.push(error);
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for error in &self.errors {
            writeln!(f, "{error}")?;
        }
        Ok(())
    }
}

/// Logs every error at `warn` level and counts them.
#[derive(Debug, Default)]
pub struct TracingErrorHandler {
    count: usize,
}

impl TracingErrorHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of errors seen so far.
    pub fn count(&self) -> usize {
        self.count
    }
}

impl ErrorHandler for TracingErrorHandler {
    fn report(&mut self, error: ValidationError) {
        self.count += 1;
        warn!(%error, "validation error");
    }
}

/// What governs the properties of a scope.
#[derive(Clone, Copy)]
enum Scope<'s> {
    Root,
    Object {
        type_name: &'s str,
        object_type: &'s ObjectType,
    },
}

/// Validates object-scope events and forwards the accepted ones to a
/// consumer.
pub struct ValidatingHandler<'a> {
    schema: &'a Schema,
    scope: Scope<'a>,
    consumer: Box<dyn ObjectEvents + 'a>,
    errors: &'a mut dyn ErrorHandler,
    seen: HashSet<String>,
}

impl<'a> ValidatingHandler<'a> {
    /// A handler for the document root.
    pub fn new(
        schema: &'a Schema,
        consumer: Box<dyn ObjectEvents + 'a>,
        errors: &'a mut dyn ErrorHandler,
    ) -> Self {
        Self {
            schema,
            scope: Scope::Root,
            consumer,
            errors,
            seen: HashSet::new(),
        }
    }

    /// Look `name` up in the current object type. Reports and returns
    /// `None` when there is no such property.
    fn property(&mut self, name: &str) -> Option<&'a Property> {
        match self.scope {
            Scope::Root => {
                self.errors.invalid_root_property(name);
                None
            }
            Scope::Object {
                type_name,
                object_type,
            } => {
                let property = object_type.property(name);
                if property.is_none() {
                    self.errors.invalid_property_of_parent(name, type_name);
                }
                property
            }
        }
    }

    fn parent_type(&self) -> &'a str {
        match self.scope {
            Scope::Root => "",
            Scope::Object { type_name, .. } => type_name,
        }
    }

    /// Record `name` as set in this scope. Reports and returns `false` when
    /// it already was.
    fn first_occurrence(&mut self, name: &str) -> bool {
        if self.seen.insert(name.to_owned()) {
            true
        } else {
            self.errors.duplicate_property(name);
            false
        }
    }

    /// Check a scalar event of kind `actual` against the property `name`.
    fn accept_scalar(&mut self, name: &str, expected: Type, actual: ValueKind) -> bool {
        let Some(property) = self.property(name) else {
            return false;
        };
        if property.kind != expected {
            self.errors.invalid_property_type(name, property.kind, actual);
            return false;
        }
        self.first_occurrence(name)
    }

    /// Check an identifier or boolean literal. Booleans need an enum whose
    /// values look boolean; identifiers also fit `ref` properties.
    fn accept_enum(&mut self, name: &str, literal: &str, is_bool: bool) -> bool {
        let Some(property) = self.property(name) else {
            return false;
        };
        let actual = if is_bool {
            ValueKind::Boolean
        } else {
            ValueKind::Identifier
        };
        match property.kind {
            Type::Ref if !is_bool => {}
            Type::Enum => {
                let enum_name = property.type_name().unwrap_or_default();
                let allowed = self.schema.enum_type(enum_name).is_some_and(|e| {
                    if is_bool {
                        e.is_boolean()
                    } else {
                        e.contains(literal)
                    }
                });
                if !allowed {
                    let parent_type = self.parent_type();
                    self.errors
                        .invalid_enum_value(parent_type, name, enum_name, literal);
                    return false;
                }
            }
            kind => {
                self.errors.invalid_property_type(name, kind, actual);
                return false;
            }
        }
        self.first_occurrence(name)
    }

    /// A child handler for the object type `type_name`.
    fn descend<'c>(
        schema: &'c Schema,
        type_name: &'c str,
        consumer: Box<dyn ObjectEvents + 'c>,
        errors: &'c mut dyn ErrorHandler,
    ) -> Box<dyn ObjectEvents + 'c> {
        let Some(object_type) = schema.object_type(type_name) else {
            return Box::new(NullSink);
        };
        debug!(type_name, "descend");
        Box::new(ValidatingHandler {
            schema,
            scope: Scope::Object {
                type_name,
                object_type,
            },
            consumer,
            errors,
            seen: HashSet::new(),
        })
    }
}

impl ObjectEvents for ValidatingHandler<'_> {
    fn number(&mut self, name: &str, value: f64) {
        if self.accept_scalar(name, Type::Number, ValueKind::Number) {
            self.consumer.number(name, value);
        }
    }

    fn bool(&mut self, name: &str, value: bool) {
        let literal = if value { "yes" } else { "no" };
        if self.accept_enum(name, literal, true) {
            self.consumer.bool(name, value);
        }
    }

    fn string(&mut self, name: &str, value: &str) {
        if self.accept_scalar(name, Type::String, ValueKind::String) {
            self.consumer.string(name, value);
        }
    }

    fn identifier(&mut self, name: &str, value: &str) {
        if self.accept_enum(name, value, false) {
            self.consumer.identifier(name, value);
        }
    }

    fn code(&mut self, name: &str, value: &str) {
        if self.accept_scalar(name, Type::Code, ValueKind::Code) {
            self.consumer.code(name, value);
        }
    }

    fn list_open(&mut self, name: &str) -> Box<dyn ListEvents + '_> {
        let Some(property) = self.property(name) else {
            return Box::new(NullSink);
        };
        if !property.kind.is_list() {
            self.errors
                .invalid_property_type(name, property.kind, ValueKind::List);
            return Box::new(NullSink);
        }
        if !self.first_occurrence(name) {
            return Box::new(NullSink);
        }
        Box::new(ValidatingList {
            name: name.to_owned(),
            list_kind: property.kind,
            consumer: self.consumer.list_open(name),
            errors: &mut *self.errors,
        })
    }

    /// An anonymous object needs an `object` property. Given to a
    /// `named_object` property it reports `NameRequired` at any depth, not
    /// only at the root.
    fn obj_open(&mut self, name: &str) -> Box<dyn ObjectEvents + '_> {
        if let Scope::Root = self.scope {
            if self.schema.root_property(name).is_some() {
                self.errors.name_required(name);
            } else {
                self.errors.invalid_root_property(name);
            }
            return Box::new(NullSink);
        }
        let Some(property) = self.property(name) else {
            return Box::new(NullSink);
        };
        match property.kind {
            Type::Object => {}
            Type::NamedObject => {
                self.errors.name_required(name);
                return Box::new(NullSink);
            }
            kind => {
                self.errors
                    .invalid_property_type(name, kind, ValueKind::Object);
                return Box::new(NullSink);
            }
        }
        if !self.first_occurrence(name) {
            return Box::new(NullSink);
        }
        let type_name = property.type_name().unwrap_or_default();
        Self::descend(
            self.schema,
            type_name,
            self.consumer.obj_open(name),
            &mut *self.errors,
        )
    }

    fn named_obj_open(&mut self, name: &str, instance: &str) -> Box<dyn ObjectEvents + '_> {
        let property = match self.scope {
            Scope::Root => match self.schema.root_property(name) {
                Some(property) => property,
                None => {
                    self.errors.invalid_root_property(name);
                    return Box::new(NullSink);
                }
            },
            Scope::Object { .. } => match self.property(name) {
                Some(property) if property.kind == Type::NamedObject => property,
                Some(property) => {
                    self.errors
                        .invalid_property_type(name, property.kind, ValueKind::NamedObject);
                    return Box::new(NullSink);
                }
                None => return Box::new(NullSink),
            },
        };
        if !self.seen.insert(format!("{name}:{instance}")) {
            self.errors.duplicate_named_property(name, instance);
            return Box::new(NullSink);
        }
        let type_name = property.type_name().unwrap_or_default();
        Self::descend(
            self.schema,
            type_name,
            self.consumer.named_obj_open(name, instance),
            &mut *self.errors,
        )
    }

    fn comment(&mut self, text: &str) {
        self.consumer.comment(text);
    }

    fn close(self: Box<Self>) {
        self.consumer.close();
    }
}

/// Validates the elements of one list property.
struct ValidatingList<'a> {
    name: String,
    list_kind: Type,
    consumer: Box<dyn ListEvents + 'a>,
    errors: &'a mut dyn ErrorHandler,
}

impl ValidatingList<'_> {
    fn accept(&mut self, actual: ValueKind) -> bool {
        let accepted = matches!(
            (self.list_kind, actual),
            (Type::StringList, ValueKind::String)
                | (Type::RefList, ValueKind::Identifier)
                | (Type::RefStringMap, ValueKind::Pair)
        );
        if !accepted {
            trace!(name = %self.name, %actual, "element rejected");
            self.errors
                .invalid_list_element(&self.name, actual, self.list_kind);
        }
        accepted
    }
}

impl ListEvents for ValidatingList<'_> {
    fn number(&mut self, value: f64) {
        if self.accept(ValueKind::Number) {
            self.consumer.number(value);
        }
    }

    fn bool(&mut self, value: bool) {
        if self.accept(ValueKind::Boolean) {
            self.consumer.bool(value);
        }
    }

    fn string(&mut self, value: &str) {
        if self.accept(ValueKind::String) {
            self.consumer.string(value);
        }
    }

    fn identifier(&mut self, value: &str) {
        if self.accept(ValueKind::Identifier) {
            self.consumer.identifier(value);
        }
    }

    fn pair(&mut self, reference: &str, value: &str) {
        if self.accept(ValueKind::Pair) {
            self.consumer.pair(reference, value);
        }
    }

    fn comment(&mut self, text: &str) {
        self.consumer.comment(text);
    }

    fn list_open(&mut self) -> Box<dyn ListEvents + '_> {
        self.accept(ValueKind::List);
        Box::new(NullSink)
    }

    fn close(self: Box<Self>) {
        self.consumer.close();
    }
}

/// Validate `source` against `schema`, discarding the document itself.
pub fn validate(source: &str, schema: &Schema) -> Result<ValidationResult, ParseError> {
    let mut result = ValidationResult::ok();
    schema.parser(source).parse(Box::new(ValidatingHandler::new(
        schema,
        Box::new(NullSink),
        &mut result,
    )))?;
    Ok(result)
}

/// Parse `source` into a tree holding only what `schema` accepts, along
/// with the errors found.
pub fn parse_validated(
    source: &str,
    schema: &Schema,
) -> Result<(Object, ValidationResult), ParseError> {
    let mut result = ValidationResult::ok();
    let mut document = None;
    schema.parser(source).parse(Box::new(ValidatingHandler::new(
        schema,
        Box::new(ObjectBuilder::new(|object| document = Some(object))),
        &mut result,
    )))?;
    Ok((document.unwrap_or_default(), result))
}
