//! Value types for LookML-like documents.
//!
//! A document materializes as an [`Object`]: an ordered list of
//! `name: value` entries. Names may repeat; the tree keeps whatever the event
//! stream delivered, in order. Comments are kept next to the entry they
//! precede so a tree can be written back out without losing them.

use lkml_parse::{ListEvents, ObjectEvents};
use tracing::trace;

/// A document value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    /// A quoted string, escapes resolved.
    String(String),
    /// `yes` / `no`.
    Boolean(bool),
    /// A bare identifier (enum literal or reference).
    Identifier(String),
    /// Code block text without the `;;` terminator.
    Code(String),
    /// A `reference: "string"` list element.
    Pair(String, String),
    List(List),
    Object(Object),
    /// An object carrying an instance name, e.g. `view: orders { ... }`.
    NamedObject(String, Object),
}

/// An ordered association list of properties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Object {
    pub entries: Vec<Entry>,
    /// Comments after the last entry.
    pub trailing_comments: Vec<String>,
}

/// A property of an object.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub name: String,
    pub value: Value,
    /// Comments that preceded this entry, in order.
    pub comments: Vec<String>,
}

/// An ordered sequence of list elements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct List {
    pub items: Vec<Item>,
    pub trailing_comments: Vec<String>,
}

/// An element of a list.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub value: Value,
    pub comments: Vec<String>,
}

impl Value {
    /// Short name of the variant, for messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Boolean(_) => "boolean",
            Value::Identifier(_) => "identifier",
            Value::Code(_) => "code",
            Value::Pair(..) => "pair",
            Value::List(_) => "list",
            Value::Object(_) => "object",
            Value::NamedObject(..) => "named object",
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// The text of a string, identifier or code value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Identifier(s) | Value::Code(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            Value::Identifier(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    /// The properties of an anonymous or named object.
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(obj) | Value::NamedObject(_, obj) => Some(obj),
            _ => None,
        }
    }

    /// The instance name of a named object.
    pub fn instance_name(&self) -> Option<&str> {
        match self {
            Value::NamedObject(name, _) => Some(name),
            _ => None,
        }
    }

    /// Deliver this value as property `name` of `sink`.
    pub fn emit_property(&self, name: &str, sink: &mut dyn ObjectEvents) {
        match self {
            Value::Number(n) => sink.number(name, *n),
            Value::String(s) => sink.string(name, s),
            Value::Boolean(b) => sink.bool(name, *b),
            Value::Identifier(s) => sink.identifier(name, s),
            Value::Code(s) => sink.code(name, s),
            Value::List(list) => {
                let mut child = sink.list_open(name);
                list.emit(child.as_mut());
                child.close();
            }
            Value::Object(obj) => {
                let mut child = sink.obj_open(name);
                obj.emit(child.as_mut());
                child.close();
            }
            Value::NamedObject(instance, obj) => {
                let mut child = sink.named_obj_open(name, instance);
                obj.emit(child.as_mut());
                child.close();
            }
            Value::Pair(..) => trace!(name, "pair cannot be an object property, skipped"),
        }
    }

    /// Deliver this value as an element of `sink`.
    pub fn emit_element(&self, sink: &mut dyn ListEvents) {
        match self {
            Value::Number(n) => sink.number(*n),
            Value::String(s) => sink.string(s),
            Value::Boolean(b) => sink.bool(*b),
            Value::Identifier(s) => sink.identifier(s),
            Value::Pair(reference, s) => sink.pair(reference, s),
            Value::List(list) => {
                let mut child = sink.list_open();
                list.emit(child.as_mut());
                child.close();
            }
            other => trace!(kind = other.kind_name(), "not a list element, skipped"),
        }
    }
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    /// First value of property `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.get_all(name).next()
    }

    /// Every value of property `name`, in document order.
    pub fn get_all<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Value> {
        self.entries
            .iter()
            .filter(move |e| e.name == name)
            .map(|e| &e.value)
    }

    /// The named object `name: instance { ... }`.
    pub fn get_named(&self, name: &str, instance: &str) -> Option<&Object> {
        self.get_all(name).find_map(|value| match value {
            Value::NamedObject(n, obj) if n == instance => Some(obj),
            _ => None,
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|e| (e.name.as_str(), &e.value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append a property. Existing properties with the same name are kept.
    pub fn push(&mut self, name: impl Into<String>, value: Value) {
        self.entries.push(Entry {
            name: name.into(),
            value,
            comments: Vec::new(),
        });
    }

    /// Builder-style [`Object::push`].
    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.push(name, value);
        self
    }

    /// Replay this object's contents into `sink`. `sink` is not closed.
    pub fn emit(&self, sink: &mut dyn ObjectEvents) {
        for entry in &self.entries {
            for comment in &entry.comments {
                sink.comment(comment);
            }
            entry.value.emit_property(&entry.name, sink);
        }
        for comment in &self.trailing_comments {
            sink.comment(comment);
        }
    }

    /// A copy of this tree with every comment removed.
    pub fn without_comments(&self) -> Object {
        Object {
            entries: self
                .entries
                .iter()
                .map(|e| Entry {
                    name: e.name.clone(),
                    value: strip_comments(&e.value),
                    comments: Vec::new(),
                })
                .collect(),
            trailing_comments: Vec::new(),
        }
    }
}

impl List {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index).map(|item| &item.value)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.items.iter().map(|item| &item.value)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, value: Value) {
        self.items.push(Item {
            value,
            comments: Vec::new(),
        });
    }

    /// Replay this list's elements into `sink`. `sink` is not closed.
    pub fn emit(&self, sink: &mut dyn ListEvents) {
        for item in &self.items {
            for comment in &item.comments {
                sink.comment(comment);
            }
            item.value.emit_element(sink);
        }
        for comment in &self.trailing_comments {
            sink.comment(comment);
        }
    }
}

impl FromIterator<Value> for List {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let mut list = List::new();
        for value in iter {
            list.push(value);
        }
        list
    }
}

fn strip_comments(value: &Value) -> Value {
    match value {
        Value::Object(obj) => Value::Object(obj.without_comments()),
        Value::NamedObject(name, obj) => Value::NamedObject(name.clone(), obj.without_comments()),
        Value::List(list) => Value::List(list.values().map(strip_comments).collect()),
        other => other.clone(),
    }
}
