//! Schemas as documents.
//!
//! A schema document has one root property, `schema`, whose body declares
//! `enum_type`s, `object_type`s and the `root_properties` list:
//!
//! ```text
//! schema: example {
//!   enum_type: boolean {
//!     values: ["yes", "no"]
//!   }
//!   object_type: view {
//!     property: label { type: string }
//!     property: hidden { type: boolean }
//!     property: dimension { type: named_object }
//!   }
//!   object_type: dimension {
//!     property: sql { type: code }
//!   }
//!   root_properties: [view]
//! }
//! ```
//!
//! A property's `type` is a type keyword or the name of an enum declared in
//! the same document. Enum and object properties may name their type
//! explicitly with `type_name`; it defaults to the property name. The
//! format is described by [`META_SCHEMA_SOURCE`], which validates against
//! itself.

use lkml_parse::ObjectEvents;
use lkml_tree::{Object, ObjectBuilder, Value};
use tracing::{debug, trace};

use crate::builder::{ObjectTypeBuilder, SchemaBuilder};
use crate::error::SchemaError;
use crate::types::{Property, Schema, Type};
use crate::validate::{ValidatingHandler, ValidationResult};

/// The schema of schema documents, as a schema document.
pub const META_SCHEMA_SOURCE: &str = include_str!("../schema/meta.lkml");

/// The schema of schema documents, built in code.
pub fn meta_schema() -> Result<Schema, SchemaError> {
    let mut builder = SchemaBuilder::new("schema");
    builder
        .add_named_object_property_with("schema", |schema| {
            schema
                .add_named_object_property("enum_type")
                .add_named_object_property("object_type")
                .add_ref_list_property("root_properties");
            Ok(())
        })?
        .add_object_type("enum_type", |enum_type| {
            enum_type.add_string_list_property("values");
            Ok(())
        })?
        .add_object_type("object_type", |object_type| {
            object_type.add_named_object_property("property");
            Ok(())
        })?
        .add_object_type("property", |property| {
            property
                .add_ref_property("type")
                .add_ref_property("type_name");
            Ok(())
        })?;
    builder.build()
}

/// Load a schema from a schema document.
///
/// The document is validated against the meta schema first; any
/// validation error fails the load.
pub fn load_schema(source: &str) -> Result<Schema, SchemaError> {
    let meta = meta_schema()?;
    let mut result = ValidationResult::ok();
    let mut document = None;
    meta.parser(source).parse(Box::new(ValidatingHandler::new(
        &meta,
        Box::new(ObjectBuilder::new(|object| document = Some(object))),
        &mut result,
    )))?;
    if !result.is_valid() {
        return Err(SchemaError::InvalidDocument {
            errors: result.errors,
        });
    }
    let document = document.unwrap_or_default();

    let Some((name, body)) = document.get_all("schema").find_map(|value| match value {
        Value::NamedObject(name, body) => Some((name.as_str(), body)),
        _ => None,
    }) else {
        return Err(SchemaError::NoSchema);
    };
    debug!(name, "loading schema");

    let mut builder = SchemaBuilder::new(name);
    for (enum_name, enum_body) in named_children(body, "enum_type") {
        let values = enum_body
            .get("values")
            .and_then(Value::as_list)
            .into_iter()
            .flat_map(|list| list.values())
            .filter_map(Value::as_str);
        builder.add_enum(enum_name, values)?;
    }

    // Properties are declared per object type; object types may refer to
    // each other in any order.
    let enum_names: Vec<String> = named_children(body, "enum_type")
        .map(|(enum_name, _)| enum_name.to_owned())
        .collect();
    for (type_name, type_body) in named_children(body, "object_type") {
        builder.add_object_type(type_name, |object_type| {
            for (property_name, property_body) in named_children(type_body, "property") {
                declare_property(object_type, &enum_names, property_name, property_body)?;
            }
            Ok(())
        })?;
    }

    let roots = body
        .get("root_properties")
        .and_then(Value::as_list)
        .into_iter()
        .flat_map(|list| list.values())
        .filter_map(Value::as_identifier);
    for root in roots {
        builder.add_named_object_property(root)?;
    }
    builder.build()
}

/// The `name: instance { ... }` children of `object`.
fn named_children<'o>(
    object: &'o Object,
    name: &'o str,
) -> impl Iterator<Item = (&'o str, &'o Object)> + 'o {
    object.get_all(name).filter_map(|value| match value {
        Value::NamedObject(instance, body) => Some((instance.as_str(), body)),
        _ => None,
    })
}

fn declare_property(
    object_type: &mut ObjectTypeBuilder<'_>,
    enum_names: &[String],
    name: &str,
    body: &Object,
) -> Result<(), SchemaError> {
    let Some(keyword) = body.get("type").and_then(Value::as_identifier) else {
        return Err(SchemaError::MissingType {
            property: name.to_owned(),
        });
    };
    let type_name = body
        .get("type_name")
        .and_then(Value::as_identifier)
        .unwrap_or(name);
    trace!(name, keyword, type_name, "property");

    match Type::from_keyword(keyword) {
        Some(Type::Number) => object_type.add_number_property(name),
        Some(Type::String) => object_type.add_string_property(name),
        Some(Type::Code) => object_type.add_code_property(name),
        Some(Type::Enum) => object_type.add_enum_property(name, type_name)?,
        Some(Type::Object) => object_type.add_object_property_of(name, type_name),
        Some(Type::NamedObject) => object_type.add_named_object_property_of(name, type_name),
        Some(Type::Ref) => object_type.add_ref_property(name),
        Some(Type::RefList) => object_type.add_ref_list_property(name),
        Some(Type::StringList) => object_type.add_string_list_property(name),
        Some(Type::RefStringMap) => object_type.add_ref_string_map_property(name),
        Some(Type::RefString) | None => {
            if !enum_names.iter().any(|e| e == keyword) {
                return Err(SchemaError::UnknownType {
                    property: name.to_owned(),
                    name: keyword.to_owned(),
                });
            }
            object_type.add_enum_property(name, keyword)?
        }
    };
    Ok(())
}

impl Schema {
    /// Write this schema as a schema document into `sink`, which is not
    /// closed. [`load_schema`] reads the output back as an equal schema.
    pub fn emit(&self, sink: &mut dyn ObjectEvents) {
        let mut schema = sink.named_obj_open("schema", &self.name);

        for (name, enum_type) in self.enum_types() {
            let mut body = schema.named_obj_open("enum_type", name);
            let mut values = body.list_open("values");
            for value in enum_type.values() {
                values.string(value);
            }
            values.close();
            body.close();
        }

        for (type_name, object_type) in self.object_types() {
            let mut body = schema.named_obj_open("object_type", type_name);
            for property in object_type.properties() {
                let mut declaration = body.named_obj_open("property", property.name());
                emit_type(property, declaration.as_mut());
                declaration.close();
            }
            body.close();
        }

        let mut roots = schema.list_open("root_properties");
        for property in self.root_properties() {
            roots.identifier(property.name());
        }
        roots.close();

        schema.close();
    }

    /// This schema as a schema document tree.
    pub fn to_document(&self) -> Object {
        lkml_tree::build(|sink| self.emit(sink))
    }
}

fn emit_type(property: &Property, sink: &mut dyn ObjectEvents) {
    sink.identifier("type", property.kind().keyword());
    match property.type_name() {
        Some(type_name) if property.kind() == Type::Enum || type_name != property.name() => {
            sink.identifier("type_name", type_name);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_schema_shape() {
        let meta = meta_schema().unwrap();
        assert_eq!(meta.name(), "schema");
        let property = meta.object_type("property").unwrap();
        assert_eq!(property.property("type").unwrap().kind(), Type::Ref);
        assert!(meta.code_property_names().next().is_none());
    }

    #[test]
    fn test_load_small_schema() {
        let schema = load_schema(
            r#"
            schema: example {
              enum_type: boolean {
                values: ["yes", "no"]
              }
              object_type: view {
                property: label { type: string }
                property: hidden { type: boolean }
                property: dimension { type: named_object }
                property: derived { type: object type_name: derived_table }
              }
              object_type: dimension {
                property: sql { type: code }
              }
              object_type: derived_table {
                property: sql { type: code }
              }
              root_properties: [view]
            }
            "#,
        )
        .unwrap();

        assert_eq!(schema.name(), "example");
        let view = schema.object_type("view").unwrap();
        assert_eq!(view.property("hidden").unwrap().kind(), Type::Enum);
        assert_eq!(view.property("hidden").unwrap().type_name(), Some("boolean"));
        assert_eq!(
            view.property("derived").unwrap().type_name(),
            Some("derived_table")
        );
        assert!(schema.is_code_property("sql"));
        assert_eq!(schema.root_property("view").unwrap().kind(), Type::NamedObject);
    }

    #[test]
    fn test_unknown_type_keyword() {
        let err = load_schema(
            "schema: s {\n  object_type: t {\n    property: p { type: colour }\n  }\n}\n",
        )
        .unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnknownType {
                property: "p".into(),
                name: "colour".into(),
            }
        );
    }

    #[test]
    fn test_ref_string_is_not_a_property_type() {
        let err = load_schema(
            "schema: s {\n  object_type: t {\n    property: p { type: ref_string }\n  }\n}\n",
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::UnknownType { .. }), "{err}");
    }

    #[test]
    fn test_invalid_schema_document() {
        let err = load_schema("schema: s {\n  object_type: t {\n    colour: red\n  }\n}\n")
            .unwrap_err();
        let SchemaError::InvalidDocument { errors } = err else {
            panic!("expected InvalidDocument, got {err:?}");
        };
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_missing_schema() {
        assert_eq!(load_schema("").unwrap_err(), SchemaError::NoSchema);
    }

    #[test]
    fn test_missing_type() {
        let err =
            load_schema("schema: s {\n  object_type: t {\n    property: p {}\n  }\n}\n").unwrap_err();
        assert_eq!(
            err,
            SchemaError::MissingType {
                property: "p".into()
            }
        );
    }
}
