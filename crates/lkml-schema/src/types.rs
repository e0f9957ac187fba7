//! Schema model types.
//!
//! Everything here is immutable once built. Construct schemas with
//! [`SchemaBuilder`](crate::SchemaBuilder) or load them from a document with
//! [`load_schema`](crate::load_schema).

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use lkml_parse::Parser;

/// The type tag of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Type {
    Number,
    String,
    Enum,
    Code,
    Object,
    NamedObject,
    Ref,
    RefList,
    StringList,
    RefStringMap,
    /// Element type of a [`Type::RefStringMap`] list. Never labels a
    /// property.
    RefString,
}

impl Type {
    pub const ALL: [Type; 11] = [
        Type::Number,
        Type::String,
        Type::Enum,
        Type::Code,
        Type::Object,
        Type::NamedObject,
        Type::Ref,
        Type::RefList,
        Type::StringList,
        Type::RefStringMap,
        Type::RefString,
    ];

    /// The keyword naming this type in schema documents.
    pub fn keyword(self) -> &'static str {
        match self {
            Type::Number => "number",
            Type::String => "string",
            Type::Enum => "enum",
            Type::Code => "code",
            Type::Object => "object",
            Type::NamedObject => "named_object",
            Type::Ref => "ref",
            Type::RefList => "ref_list",
            Type::StringList => "string_list",
            Type::RefStringMap => "ref_string_map",
            Type::RefString => "ref_string",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Type> {
        Type::ALL.into_iter().find(|t| t.keyword() == keyword)
    }

    /// Whether properties of this type reference an enum or object type.
    pub fn has_type_name(self) -> bool {
        matches!(self, Type::Enum | Type::Object | Type::NamedObject)
    }

    /// Whether properties of this type hold a list.
    pub fn is_list(self) -> bool {
        matches!(self, Type::RefList | Type::StringList | Type::RefStringMap)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.keyword().to_ascii_uppercase())
    }
}

/// The kind of value an incoming event carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Number,
    String,
    Boolean,
    Identifier,
    Code,
    Pair,
    List,
    Object,
    NamedObject,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValueKind::Number => "NUMBER",
            ValueKind::String => "STRING",
            ValueKind::Boolean => "BOOLEAN",
            ValueKind::Identifier => "IDENTIFIER",
            ValueKind::Code => "CODE",
            ValueKind::Pair => "REF_STRING",
            ValueKind::List => "LIST",
            ValueKind::Object => "OBJECT",
            ValueKind::NamedObject => "NAMED_OBJECT",
        })
    }
}

/// A declared property of an object type or of the document root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub(crate) name: String,
    pub(crate) kind: Type,
    pub(crate) type_name: Option<String>,
}

impl Property {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> Type {
        self.kind
    }

    /// The referenced enum or object type, for [`Type::Enum`],
    /// [`Type::Object`] and [`Type::NamedObject`] properties.
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }
}

/// An enum type: a sorted set of allowed literals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumType {
    pub(crate) values: BTreeSet<String>,
}

impl EnumType {
    pub fn contains(&self, value: &str) -> bool {
        self.values.contains(value)
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }

    /// Whether the allowed values are exactly a pair of boolean literals,
    /// `true`/`false` or `yes`/`no`.
    pub fn is_boolean(&self) -> bool {
        let values: Vec<&str> = self.values().collect();
        values == ["false", "true"] || values == ["no", "yes"]
    }
}

/// An object type: its properties, sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectType {
    pub(crate) properties: BTreeMap<String, Property>,
}

impl ObjectType {
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    pub fn properties(&self) -> impl Iterator<Item = &Property> {
        self.properties.values()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// A built schema.
///
/// Every type reference resolves and no property name is code in one place
/// and something else in another. A schema is immutable and can be shared
/// between threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub(crate) name: String,
    pub(crate) root_properties: BTreeMap<String, Property>,
    pub(crate) object_types: BTreeMap<String, ObjectType>,
    pub(crate) enum_types: BTreeMap<String, EnumType>,
    pub(crate) code_property_names: BTreeSet<String>,
}

impl Schema {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root_property(&self, name: &str) -> Option<&Property> {
        self.root_properties.get(name)
    }

    pub fn root_properties(&self) -> impl Iterator<Item = &Property> {
        self.root_properties.values()
    }

    pub fn object_type(&self, name: &str) -> Option<&ObjectType> {
        self.object_types.get(name)
    }

    pub fn object_types(&self) -> impl Iterator<Item = (&str, &ObjectType)> {
        self.object_types.iter().map(|(name, t)| (name.as_str(), t))
    }

    pub fn enum_type(&self, name: &str) -> Option<&EnumType> {
        self.enum_types.get(name)
    }

    pub fn enum_types(&self) -> impl Iterator<Item = (&str, &EnumType)> {
        self.enum_types.iter().map(|(name, t)| (name.as_str(), t))
    }

    /// Names of the properties whose values are `;;`-terminated code.
    pub fn code_property_names(&self) -> impl Iterator<Item = &str> {
        self.code_property_names.iter().map(String::as_str)
    }

    pub fn is_code_property(&self, name: &str) -> bool {
        self.code_property_names.contains(name)
    }

    /// Object type names reachable from the root properties, in sorted order.
    pub fn reachable_object_types(&self) -> BTreeSet<&str> {
        let mut reached = BTreeSet::new();
        let mut pending: Vec<&str> = self
            .root_properties()
            .filter_map(Property::type_name)
            .collect();
        while let Some(name) = pending.pop() {
            if !reached.insert(name) {
                continue;
            }
            if let Some(object_type) = self.object_type(name) {
                pending.extend(
                    object_type
                        .properties()
                        .filter(|p| matches!(p.kind, Type::Object | Type::NamedObject))
                        .filter_map(Property::type_name),
                );
            }
        }
        reached
    }

    /// A parser that knows this schema's code properties.
    pub fn parser<'src>(&self, source: &'src str) -> Parser<'src> {
        Parser::new(source).with_code_properties(self.code_property_names())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_round_trip() {
        for t in Type::ALL {
            assert_eq!(Type::from_keyword(t.keyword()), Some(t));
        }
        assert_eq!(Type::from_keyword("boolean"), None);
    }

    #[test]
    fn test_display_is_upper_case() {
        assert_eq!(Type::NamedObject.to_string(), "NAMED_OBJECT");
        assert_eq!(Type::StringList.to_string(), "STRING_LIST");
        assert_eq!(ValueKind::Number.to_string(), "NUMBER");
    }

    #[test]
    fn test_boolean_enums() {
        let yes_no = EnumType {
            values: ["yes", "no"].map(String::from).into(),
        };
        let true_false = EnumType {
            values: ["true", "false"].map(String::from).into(),
        };
        let other = EnumType {
            values: ["yes", "no", "maybe"].map(String::from).into(),
        };
        assert!(yes_no.is_boolean());
        assert!(true_false.is_boolean());
        assert!(!other.is_boolean());
    }

    #[test]
    fn test_schema_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Schema>();
    }
}
