//! Value-tree builders driven by the event protocol.
//!
//! There is one builder per open scope. A child builder appends its finished
//! value to the parent's entries when it is closed; the root builder hands
//! its finished [`Object`] to a caller-supplied continuation.

use std::mem;

use lkml_parse::{ListEvents, ObjectEvents};
use tracing::trace;

use crate::value::{Entry, Item, List, Object, Value};

/// Builds an [`Object`] from object-scope events.
///
/// No uniqueness check is done: repeated names are appended like any other
/// property. Wrap the builder in a validating handler when that matters.
pub struct ObjectBuilder<'a> {
    object: Object,
    pending_comments: Vec<String>,
    on_close: Box<dyn FnOnce(Object) + 'a>,
}

impl<'a> ObjectBuilder<'a> {
    /// A builder that calls `on_close` with the finished object.
    pub fn new(on_close: impl FnOnce(Object) + 'a) -> Self {
        Self {
            object: Object::new(),
            pending_comments: Vec::new(),
            on_close: Box::new(on_close),
        }
    }

    fn push(&mut self, name: &str, value: Value) {
        trace!(name, kind = value.kind_name(), "entry");
        self.object.entries.push(Entry {
            name: name.to_owned(),
            value,
            comments: mem::take(&mut self.pending_comments),
        });
    }
}

impl ObjectEvents for ObjectBuilder<'_> {
    fn number(&mut self, name: &str, value: f64) {
        self.push(name, Value::Number(value));
    }

    fn bool(&mut self, name: &str, value: bool) {
        self.push(name, Value::Boolean(value));
    }

    fn string(&mut self, name: &str, value: &str) {
        self.push(name, Value::String(value.to_owned()));
    }

    fn identifier(&mut self, name: &str, value: &str) {
        self.push(name, Value::Identifier(value.to_owned()));
    }

    fn code(&mut self, name: &str, value: &str) {
        self.push(name, Value::Code(value.to_owned()));
    }

    fn list_open(&mut self, name: &str) -> Box<dyn ListEvents + '_> {
        let slot = self.child_slot(name);
        Box::new(ListBuilder::new(move |list| slot.fill(Value::List(list))))
    }

    fn obj_open(&mut self, name: &str) -> Box<dyn ObjectEvents + '_> {
        let slot = self.child_slot(name);
        Box::new(ObjectBuilder::new(move |object| {
            slot.fill(Value::Object(object))
        }))
    }

    fn named_obj_open(&mut self, name: &str, instance: &str) -> Box<dyn ObjectEvents + '_> {
        let instance = instance.to_owned();
        let slot = self.child_slot(name);
        Box::new(ObjectBuilder::new(move |object| {
            slot.fill(Value::NamedObject(instance, object))
        }))
    }

    fn comment(&mut self, text: &str) {
        self.pending_comments.push(text.to_owned());
    }

    fn close(self: Box<Self>) {
        let ObjectBuilder {
            mut object,
            pending_comments,
            on_close,
        } = *self;
        object.trailing_comments = pending_comments;
        on_close(object);
    }
}

impl ObjectBuilder<'_> {
    /// Reserve the entry a child scope will fill in when it closes. The
    /// comments seen so far belong to that entry.
    fn child_slot(&mut self, name: &str) -> Slot<'_> {
        trace!(name, "open child scope");
        Slot {
            entries: &mut self.object.entries,
            name: name.to_owned(),
            comments: mem::take(&mut self.pending_comments),
        }
    }
}

struct Slot<'p> {
    entries: &'p mut Vec<Entry>,
    name: String,
    comments: Vec<String>,
}

impl Slot<'_> {
    fn fill(self, value: Value) {
        self.entries.push(Entry {
            name: self.name,
            value,
            comments: self.comments,
        });
    }
}

/// Builds a [`List`] from list-scope events.
pub struct ListBuilder<'a> {
    list: List,
    pending_comments: Vec<String>,
    on_close: Box<dyn FnOnce(List) + 'a>,
}

impl<'a> ListBuilder<'a> {
    /// A builder that calls `on_close` with the finished list.
    pub fn new(on_close: impl FnOnce(List) + 'a) -> Self {
        Self {
            list: List::new(),
            pending_comments: Vec::new(),
            on_close: Box::new(on_close),
        }
    }

    fn push(&mut self, value: Value) {
        self.list.items.push(Item {
            value,
            comments: mem::take(&mut self.pending_comments),
        });
    }
}

impl ListEvents for ListBuilder<'_> {
    fn number(&mut self, value: f64) {
        self.push(Value::Number(value));
    }

    fn bool(&mut self, value: bool) {
        self.push(Value::Boolean(value));
    }

    fn string(&mut self, value: &str) {
        self.push(Value::String(value.to_owned()));
    }

    fn identifier(&mut self, value: &str) {
        self.push(Value::Identifier(value.to_owned()));
    }

    fn pair(&mut self, reference: &str, value: &str) {
        self.push(Value::Pair(reference.to_owned(), value.to_owned()));
    }

    fn comment(&mut self, text: &str) {
        self.pending_comments.push(text.to_owned());
    }

    fn list_open(&mut self) -> Box<dyn ListEvents + '_> {
        let comments = mem::take(&mut self.pending_comments);
        let items = &mut self.list.items;
        Box::new(ListBuilder::new(move |list| {
            items.push(Item {
                value: Value::List(list),
                comments,
            })
        }))
    }

    fn close(self: Box<Self>) {
        let ListBuilder {
            mut list,
            pending_comments,
            on_close,
        } = *self;
        list.trailing_comments = pending_comments;
        on_close(list);
    }
}

/// Run `produce` against a fresh root builder and return the finished tree.
///
/// `produce` must not close the sink it is given.
pub fn build(produce: impl FnOnce(&mut dyn ObjectEvents)) -> Object {
    let mut document = None;
    {
        let mut root: Box<dyn ObjectEvents + '_> =
            Box::new(ObjectBuilder::new(|object| document = Some(object)));
        produce(root.as_mut());
        root.close();
    }
    document.unwrap_or_default()
}
