//! Programmatic schema construction.
//!
//! Enum types must be declared before a property uses them; that lookup
//! fails at the call site. Object types may be referenced before they are
//! declared, so type-reference closure and the code-property rule are
//! checked by [`SchemaBuilder::build`].

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::error::SchemaError;
use crate::types::{EnumType, ObjectType, Property, Schema, Type};

/// Display name of the document root in schema errors.
pub(crate) const ROOT: &str = "(root)";

/// Builds a [`Schema`].
///
/// ```
/// use lkml_schema::SchemaBuilder;
///
/// let mut builder = SchemaBuilder::new("example");
/// builder.add_enum("boolean", ["yes", "no"])?;
/// builder.add_named_object_property_with("view", |view| {
///     view.add_string_property("label")
///         .add_code_property("sql_table_name")
///         .add_enum_property("hidden", "boolean")?;
///     Ok(())
/// })?;
/// let schema = builder.build()?;
/// assert!(schema.is_code_property("sql_table_name"));
/// # Ok::<(), lkml_schema::SchemaError>(())
/// ```
#[derive(Debug)]
pub struct SchemaBuilder {
    name: String,
    enum_types: BTreeMap<String, EnumType>,
    object_types: BTreeMap<String, ObjectType>,
    root_properties: BTreeMap<String, Property>,
}

impl SchemaBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enum_types: BTreeMap::new(),
            object_types: BTreeMap::new(),
            root_properties: BTreeMap::new(),
        }
    }

    /// Declare an enum type. Values are sorted and deduplicated.
    pub fn add_enum<I, S>(&mut self, name: &str, values: I) -> Result<&mut Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.enum_types.contains_key(name) {
            return Err(SchemaError::DuplicateEnumType(name.to_owned()));
        }
        let enum_type = EnumType {
            values: values.into_iter().map(Into::into).collect(),
        };
        debug!(name, values = enum_type.values.len(), "enum type");
        self.enum_types.insert(name.to_owned(), enum_type);
        Ok(self)
    }

    /// Declare an object type, configuring its properties with `configure`.
    pub fn add_object_type(
        &mut self,
        name: &str,
        configure: impl FnOnce(&mut ObjectTypeBuilder<'_>) -> Result<(), SchemaError>,
    ) -> Result<&mut Self, SchemaError> {
        if self.object_types.contains_key(name) {
            return Err(SchemaError::DuplicateObjectType(name.to_owned()));
        }
        let mut builder = ObjectTypeBuilder {
            enums: &self.enum_types,
            type_name: name,
            properties: BTreeMap::new(),
            duplicate: None,
        };
        configure(&mut builder)?;
        let object_type = builder.finish()?;
        debug!(name, properties = object_type.len(), "object type");
        self.object_types.insert(name.to_owned(), object_type);
        Ok(self)
    }

    /// Declare a root property `name: instance { ... }` whose object type is
    /// also called `name`.
    pub fn add_named_object_property(&mut self, name: &str) -> Result<&mut Self, SchemaError> {
        let property = Property {
            name: name.to_owned(),
            kind: Type::NamedObject,
            type_name: Some(name.to_owned()),
        };
        if self.root_properties.insert(name.to_owned(), property).is_some() {
            return Err(SchemaError::DuplicateProperty {
                property: name.to_owned(),
                parent: ROOT.to_owned(),
            });
        }
        Ok(self)
    }

    /// [`add_named_object_property`](Self::add_named_object_property),
    /// declaring the object type in the same call.
    pub fn add_named_object_property_with(
        &mut self,
        name: &str,
        configure: impl FnOnce(&mut ObjectTypeBuilder<'_>) -> Result<(), SchemaError>,
    ) -> Result<&mut Self, SchemaError> {
        self.add_object_type(name, configure)?;
        self.add_named_object_property(name)
    }

    /// Check the whole type graph and produce the schema.
    pub fn build(self) -> Result<Schema, SchemaError> {
        let SchemaBuilder {
            name,
            enum_types,
            object_types,
            root_properties,
        } = self;

        let all_properties = || {
            root_properties
                .values()
                .map(|p| (ROOT, p))
                .chain(object_types.iter().flat_map(|(owner, t)| {
                    t.properties().map(move |p| (owner.as_str(), p))
                }))
        };

        for (_, property) in all_properties() {
            let Some(type_name) = property.type_name() else {
                continue;
            };
            let resolves = match property.kind {
                Type::Enum => enum_types.contains_key(type_name),
                _ => object_types.contains_key(type_name),
            };
            if resolves {
                continue;
            }
            return Err(match property.kind {
                Type::Enum => SchemaError::UnknownEnumType {
                    property: property.name.clone(),
                    enum_type: type_name.to_owned(),
                },
                _ => SchemaError::UnknownObjectType {
                    property: property.name.clone(),
                    object_type: type_name.to_owned(),
                },
            });
        }

        let mut code_in: BTreeMap<&str, &str> = BTreeMap::new();
        for (owner, property) in all_properties() {
            if property.kind == Type::Code {
                code_in.entry(property.name()).or_insert(owner);
            }
        }
        for (owner, property) in all_properties() {
            if property.kind == Type::Code {
                continue;
            }
            if let Some(code_owner) = code_in.get(property.name()) {
                return Err(SchemaError::CodeClash {
                    property: property.name.clone(),
                    code_in: (*code_owner).to_owned(),
                    other_in: owner.to_owned(),
                    kind: property.kind,
                });
            }
        }
        let code_property_names: BTreeSet<String> =
            code_in.keys().map(|name| (*name).to_owned()).collect();

        debug!(
            name = %name,
            object_types = object_types.len(),
            enum_types = enum_types.len(),
            code_properties = code_property_names.len(),
            "schema built"
        );
        Ok(Schema {
            name,
            root_properties,
            object_types,
            enum_types,
            code_property_names,
        })
    }
}

/// Declares the properties of one object type.
///
/// Methods that cannot fail return `&mut Self` for chaining. A property
/// declared twice is reported when the configuring closure returns.
pub struct ObjectTypeBuilder<'b> {
    enums: &'b BTreeMap<String, EnumType>,
    type_name: &'b str,
    properties: BTreeMap<String, Property>,
    duplicate: Option<String>,
}

impl ObjectTypeBuilder<'_> {
    /// Name of the object type being declared.
    pub fn type_name(&self) -> &str {
        self.type_name
    }

    fn add(&mut self, name: &str, kind: Type, type_name: Option<&str>) -> &mut Self {
        let property = Property {
            name: name.to_owned(),
            kind,
            type_name: type_name.map(str::to_owned),
        };
        if self.properties.insert(name.to_owned(), property).is_some() && self.duplicate.is_none() {
            self.duplicate = Some(name.to_owned());
        }
        self
    }

    pub fn add_number_property(&mut self, name: &str) -> &mut Self {
        self.add(name, Type::Number, None)
    }

    pub fn add_string_property(&mut self, name: &str) -> &mut Self {
        self.add(name, Type::String, None)
    }

    /// A property whose value is one of the literals of enum `enum_type`.
    /// The enum must already be declared.
    pub fn add_enum_property(
        &mut self,
        name: &str,
        enum_type: &str,
    ) -> Result<&mut Self, SchemaError> {
        if !self.enums.contains_key(enum_type) {
            return Err(SchemaError::UnknownEnumType {
                property: name.to_owned(),
                enum_type: enum_type.to_owned(),
            });
        }
        Ok(self.add(name, Type::Enum, Some(enum_type)))
    }

    /// A property whose value is `;;`-terminated code.
    pub fn add_code_property(&mut self, name: &str) -> &mut Self {
        self.add(name, Type::Code, None)
    }

    /// An anonymous object property whose object type is also called `name`.
    pub fn add_object_property(&mut self, name: &str) -> &mut Self {
        self.add(name, Type::Object, Some(name))
    }

    pub fn add_object_property_of(&mut self, name: &str, object_type: &str) -> &mut Self {
        self.add(name, Type::Object, Some(object_type))
    }

    /// A named object property whose object type is also called `name`.
    pub fn add_named_object_property(&mut self, name: &str) -> &mut Self {
        self.add(name, Type::NamedObject, Some(name))
    }

    pub fn add_named_object_property_of(&mut self, name: &str, object_type: &str) -> &mut Self {
        self.add(name, Type::NamedObject, Some(object_type))
    }

    pub fn add_ref_property(&mut self, name: &str) -> &mut Self {
        self.add(name, Type::Ref, None)
    }

    pub fn add_ref_list_property(&mut self, name: &str) -> &mut Self {
        self.add(name, Type::RefList, None)
    }

    pub fn add_string_list_property(&mut self, name: &str) -> &mut Self {
        self.add(name, Type::StringList, None)
    }

    /// A list of `reference: "string"` pairs.
    pub fn add_ref_string_map_property(&mut self, name: &str) -> &mut Self {
        self.add(name, Type::RefStringMap, None)
    }

    fn finish(self) -> Result<ObjectType, SchemaError> {
        if let Some(property) = self.duplicate {
            return Err(SchemaError::DuplicateProperty {
                property,
                parent: self.type_name.to_owned(),
            });
        }
        Ok(ObjectType {
            properties: self.properties,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model_schema() -> SchemaBuilder {
        let mut builder = SchemaBuilder::new("test");
        builder.add_enum("boolean", ["false", "true"]).unwrap();
        builder
    }

    #[test]
    fn test_build_simple_schema() {
        let mut builder = model_schema();
        builder
            .add_named_object_property_with("model", |model| {
                model
                    .add_number_property("x")
                    .add_named_object_property("explore")
                    .add_enum_property("hidden", "boolean")?;
                Ok(())
            })
            .unwrap()
            .add_object_type("explore", |explore| {
                explore.add_code_property("sql_always_where");
                Ok(())
            })
            .unwrap();
        let schema = builder.build().unwrap();

        assert_eq!(schema.name(), "test");
        let model = schema.object_type("model").unwrap();
        assert_eq!(model.property("x").unwrap().kind(), Type::Number);
        assert_eq!(
            model.property("explore").unwrap().type_name(),
            Some("explore")
        );
        assert_eq!(model.property("hidden").unwrap().type_name(), Some("boolean"));
        assert_eq!(
            schema.code_property_names().collect::<Vec<_>>(),
            ["sql_always_where"]
        );
        assert_eq!(
            schema.root_property("model").unwrap().kind(),
            Type::NamedObject
        );
    }

    #[test]
    fn test_enum_values_sorted_and_deduplicated() {
        let mut builder = SchemaBuilder::new("test");
        builder.add_enum("e", ["b", "a", "b"]).unwrap();
        let schema = builder.build().unwrap();
        let values: Vec<_> = schema.enum_type("e").unwrap().values().collect();
        assert_eq!(values, ["a", "b"]);
    }

    #[test]
    fn test_undeclared_enum_fails_at_call_site() {
        let mut builder = SchemaBuilder::new("test");
        let err = builder
            .add_object_type("view", |view| {
                view.add_enum_property("hidden", "boolean")?;
                Ok(())
            })
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnknownEnumType {
                property: "hidden".into(),
                enum_type: "boolean".into(),
            }
        );
    }

    #[test]
    fn test_dangling_object_reference_fails_build() {
        let mut builder = SchemaBuilder::new("test");
        builder
            .add_named_object_property_with("model", |model| {
                model.add_named_object_property("explore");
                Ok(())
            })
            .unwrap();
        let err = builder.build().unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnknownObjectType {
                property: "explore".into(),
                object_type: "explore".into(),
            }
        );
    }

    #[test]
    fn test_root_without_object_type_fails_build() {
        let mut builder = SchemaBuilder::new("test");
        builder.add_named_object_property("view").unwrap();
        assert!(matches!(
            builder.build(),
            Err(SchemaError::UnknownObjectType { property, .. }) if property == "view"
        ));
    }

    #[test]
    fn test_code_clash_names_the_property() {
        let mut builder = SchemaBuilder::new("test");
        builder
            .add_object_type("a", |a| {
                a.add_code_property("sql");
                Ok(())
            })
            .unwrap()
            .add_object_type("b", |b| {
                b.add_string_property("sql");
                Ok(())
            })
            .unwrap();
        let err = builder.build().unwrap_err();
        assert_eq!(
            err,
            SchemaError::CodeClash {
                property: "sql".into(),
                code_in: "a".into(),
                other_in: "b".into(),
                kind: Type::String,
            }
        );
        assert!(err.to_string().contains("'sql'"));
    }

    #[test]
    fn test_duplicate_declarations() {
        let mut builder = model_schema();
        assert_eq!(
            builder.add_enum("boolean", ["yes", "no"]).unwrap_err(),
            SchemaError::DuplicateEnumType("boolean".into())
        );

        let err = builder
            .add_object_type("view", |view| {
                view.add_string_property("label").add_number_property("label");
                Ok(())
            })
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateProperty {
                property: "label".into(),
                parent: "view".into(),
            }
        );

        builder.add_object_type("view", |_| Ok(())).unwrap();
        assert_eq!(
            builder.add_object_type("view", |_| Ok(())).unwrap_err(),
            SchemaError::DuplicateObjectType("view".into())
        );
    }

    #[test]
    fn test_reachable_object_types() {
        let mut builder = SchemaBuilder::new("test");
        builder
            .add_named_object_property_with("model", |model| {
                model.add_named_object_property("explore");
                Ok(())
            })
            .unwrap()
            .add_object_type("explore", |explore| {
                explore.add_named_object_property_of("join", "explore");
                Ok(())
            })
            .unwrap()
            .add_object_type("unused", |_| Ok(()))
            .unwrap();
        let schema = builder.build().unwrap();
        let reached: Vec<_> = schema.reachable_object_types().into_iter().collect();
        assert_eq!(reached, ["explore", "model"]);
    }
}
