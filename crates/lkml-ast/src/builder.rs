//! The typed AST builder.
//!
//! [`AstBuilder`] is an [`ObjectEvents`] consumer. Each object it sees gets
//! a [`NodeBuilder`] from the registry; when the object closes, the built
//! node is handed to the enclosing builder, or to the root consumer for
//! top-level objects. Comments are ignored.

use lkml_parse::{ListEvents, NullSink, ObjectEvents, ParseError};
use lkml_schema::{ErrorHandler, ObjectType, Pipeline, Schema};
use lkml_tree::{ListBuilder, Value};
use tracing::{debug, trace};

use crate::node::{Field, NodeBuilder};
use crate::registry::TypeRegistry;

/// Root consumer of a typed build: receives each top-level node with the
/// property name it appeared under.
pub struct AstBuilder<'a, T> {
    schema: &'a Schema,
    registry: &'a TypeRegistry<T>,
    consumer: Box<dyn FnMut(&str, T) + 'a>,
}

impl<'a, T: 'static> AstBuilder<'a, T> {
    pub fn new(
        schema: &'a Schema,
        registry: &'a TypeRegistry<T>,
        consumer: impl FnMut(&str, T) + 'a,
    ) -> Self {
        Self {
            schema,
            registry,
            consumer: Box::new(consumer),
        }
    }
}

/// A scope for the node builder of type `type_name`.
fn open_node<'c, T: 'static>(
    schema: &'c Schema,
    registry: &'c TypeRegistry<T>,
    type_name: &str,
    instance: Option<&str>,
    deliver: Box<dyn FnOnce(T) + 'c>,
) -> Box<dyn ObjectEvents + 'c> {
    let (Some(object_type), Some(builder)) = (
        schema.object_type(type_name),
        registry.create(type_name, instance),
    ) else {
        debug!(type_name, "no object type or factory, subtree skipped");
        return Box::new(NullSink);
    };
    trace!(type_name, instance, "open node");
    Box::new(NodeScope {
        schema,
        registry,
        object_type,
        builder,
        deliver,
    })
}

impl<T: 'static> ObjectEvents for AstBuilder<'_, T> {
    fn number(&mut self, name: &str, _value: f64) {
        trace!(name, "scalar at root ignored");
    }

    fn bool(&mut self, name: &str, _value: bool) {
        trace!(name, "scalar at root ignored");
    }

    fn string(&mut self, name: &str, _value: &str) {
        trace!(name, "scalar at root ignored");
    }

    fn identifier(&mut self, name: &str, _value: &str) {
        trace!(name, "scalar at root ignored");
    }

    fn code(&mut self, name: &str, _value: &str) {
        trace!(name, "scalar at root ignored");
    }

    fn list_open(&mut self, name: &str) -> Box<dyn ListEvents + '_> {
        trace!(name, "list at root ignored");
        Box::new(NullSink)
    }

    fn obj_open(&mut self, name: &str) -> Box<dyn ObjectEvents + '_> {
        trace!(name, "anonymous object at root ignored");
        Box::new(NullSink)
    }

    fn named_obj_open(&mut self, name: &str, instance: &str) -> Box<dyn ObjectEvents + '_> {
        let Some(type_name) = self
            .schema
            .root_property(name)
            .and_then(|property| property.type_name())
        else {
            return Box::new(NullSink);
        };
        let consumer = &mut self.consumer;
        let name = name.to_owned();
        open_node(
            self.schema,
            self.registry,
            type_name,
            Some(instance),
            Box::new(move |node| consumer(&name, node)),
        )
    }

    fn comment(&mut self, _text: &str) {}

    fn close(self: Box<Self>) {}
}

/// An open object: events become fields of its node builder.
struct NodeScope<'a, T> {
    schema: &'a Schema,
    registry: &'a TypeRegistry<T>,
    object_type: &'a ObjectType,
    builder: Box<dyn NodeBuilder<T>>,
    deliver: Box<dyn FnOnce(T) + 'a>,
}

impl<T: 'static> NodeScope<'_, T> {
    fn value(&mut self, name: &str, value: Value) {
        self.builder.accept(name, Field::Value(value));
    }

    /// Open the child object `name`, whose node goes to this builder.
    fn child(&mut self, name: &str, instance: Option<&str>) -> Box<dyn ObjectEvents + '_> {
        let Some(type_name) = self
            .object_type
            .property(name)
            .and_then(|property| property.type_name())
        else {
            debug!(name, "no object property, subtree skipped");
            return Box::new(NullSink);
        };
        let builder = &mut self.builder;
        let name = name.to_owned();
        open_node(
            self.schema,
            self.registry,
            type_name,
            instance,
            Box::new(move |node| builder.accept(&name, Field::Node(node))),
        )
    }
}

impl<T: 'static> ObjectEvents for NodeScope<'_, T> {
    fn number(&mut self, name: &str, value: f64) {
        self.value(name, Value::Number(value));
    }

    fn bool(&mut self, name: &str, value: bool) {
        self.value(name, Value::Boolean(value));
    }

    fn string(&mut self, name: &str, value: &str) {
        self.value(name, Value::String(value.to_owned()));
    }

    fn identifier(&mut self, name: &str, value: &str) {
        self.value(name, Value::Identifier(value.to_owned()));
    }

    fn code(&mut self, name: &str, value: &str) {
        self.value(name, Value::Code(value.to_owned()));
    }

    fn list_open(&mut self, name: &str) -> Box<dyn ListEvents + '_> {
        let builder = &mut self.builder;
        let name = name.to_owned();
        Box::new(ListBuilder::new(move |list| {
            builder.accept(&name, Field::Value(Value::List(list)))
        }))
    }

    fn obj_open(&mut self, name: &str) -> Box<dyn ObjectEvents + '_> {
        self.child(name, None)
    }

    fn named_obj_open(&mut self, name: &str, instance: &str) -> Box<dyn ObjectEvents + '_> {
        self.child(name, Some(instance))
    }

    fn comment(&mut self, _text: &str) {}

    fn close(self: Box<Self>) {
        let NodeScope {
            builder, deliver, ..
        } = *self;
        deliver(builder.build());
    }
}

/// Parse `source` through a validating [`Pipeline`] into typed nodes.
///
/// Top-level nodes are returned with their property names, in document
/// order. Validation errors go to `errors`; whatever the schema rejects
/// never reaches a node builder.
pub fn build_nodes<T: 'static>(
    source: &str,
    schema: &Schema,
    registry: &TypeRegistry<T>,
    errors: &mut dyn ErrorHandler,
) -> Result<Vec<(String, T)>, ParseError> {
    let mut nodes = Vec::new();
    Pipeline::new(schema).run(
        source,
        Box::new(AstBuilder::new(schema, registry, |name, node| {
            nodes.push((name.to_owned(), node))
        })),
        errors,
    )?;
    Ok(nodes)
}
