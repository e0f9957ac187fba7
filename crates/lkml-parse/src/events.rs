//! The push-style event protocol.

use std::slice;

use tracing::trace;

/// Events delivered inside an object scope (including the document root).
///
/// Every `*_open` call returns a handler for the child scope. The child must
/// be closed before the parent receives anything else; the returned box
/// borrows `self`, which makes that ordering a compile-time property.
pub trait ObjectEvents {
    /// A numeric property: `name: 42`.
    fn number(&mut self, name: &str, value: f64);
    /// A boolean property: `name: yes`.
    fn bool(&mut self, name: &str, value: bool);
    /// A quoted string property: `name: "text"`.
    fn string(&mut self, name: &str, value: &str);
    /// An unquoted identifier property: `name: orders`.
    fn identifier(&mut self, name: &str, value: &str);
    /// A code property: `name: text ;;`. `value` excludes the terminator.
    fn code(&mut self, name: &str, value: &str);
    /// A list property: `name: [ ... ]`.
    fn list_open(&mut self, name: &str) -> Box<dyn ListEvents + '_>;
    /// An anonymous object property: `name: { ... }`.
    fn obj_open(&mut self, name: &str) -> Box<dyn ObjectEvents + '_>;
    /// A named object property: `name: instance { ... }`.
    fn named_obj_open(&mut self, name: &str, instance: &str) -> Box<dyn ObjectEvents + '_>;
    /// A `#` comment; `text` is everything after the `#`.
    fn comment(&mut self, text: &str);
    /// End of this scope.
    fn close(self: Box<Self>);
}

/// Events delivered inside a list scope.
pub trait ListEvents {
    fn number(&mut self, value: f64);
    fn bool(&mut self, value: bool);
    fn string(&mut self, value: &str);
    fn identifier(&mut self, value: &str);
    /// A `reference: "string"` element.
    fn pair(&mut self, reference: &str, value: &str);
    fn comment(&mut self, text: &str);
    /// A nested list element.
    fn list_open(&mut self) -> Box<dyn ListEvents + '_>;
    fn close(self: Box<Self>);
}

/// A sink that accepts and discards everything, including whole subtrees.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ObjectEvents for NullSink {
    fn number(&mut self, _name: &str, _value: f64) {}
    fn bool(&mut self, _name: &str, _value: bool) {}
    fn string(&mut self, _name: &str, _value: &str) {}
    fn identifier(&mut self, _name: &str, _value: &str) {}
    fn code(&mut self, _name: &str, _value: &str) {}

    fn list_open(&mut self, _name: &str) -> Box<dyn ListEvents + '_> {
        Box::new(NullSink)
    }

    fn obj_open(&mut self, _name: &str) -> Box<dyn ObjectEvents + '_> {
        Box::new(NullSink)
    }

    fn named_obj_open(&mut self, _name: &str, _instance: &str) -> Box<dyn ObjectEvents + '_> {
        Box::new(NullSink)
    }

    fn comment(&mut self, _text: &str) {}
    fn close(self: Box<Self>) {}
}

impl ListEvents for NullSink {
    fn number(&mut self, _value: f64) {}
    fn bool(&mut self, _value: bool) {}
    fn string(&mut self, _value: &str) {}
    fn identifier(&mut self, _value: &str) {}
    fn pair(&mut self, _reference: &str, _value: &str) {}
    fn comment(&mut self, _text: &str) {}

    fn list_open(&mut self) -> Box<dyn ListEvents + '_> {
        Box::new(NullSink)
    }

    fn close(self: Box<Self>) {}
}

/// One protocol call, as recorded by [`EventRecorder`].
///
/// `name` is `None` for list elements.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Number { name: Option<String>, value: f64 },
    Bool { name: Option<String>, value: bool },
    String { name: Option<String>, value: String },
    Identifier { name: Option<String>, value: String },
    Code { name: String, value: String },
    Pair { reference: String, value: String },
    ListOpen { name: Option<String> },
    ObjectOpen { name: String },
    NamedObjectOpen { name: String, instance: String },
    Comment { text: String },
    Close,
}

impl Event {
    pub fn is_comment(&self) -> bool {
        matches!(self, Event::Comment { .. })
    }
}

/// Records every call it receives into a `Vec<Event>`.
///
/// The recorder handed to a producer as the root does not record its own
/// `close`, so a document with nothing in it records nothing.
pub struct EventRecorder<'a> {
    events: &'a mut Vec<Event>,
    root: bool,
}

impl<'a> EventRecorder<'a> {
    /// A root recorder appending to `events`.
    pub fn new(events: &'a mut Vec<Event>) -> Self {
        Self { events, root: true }
    }

    fn child(&mut self) -> EventRecorder<'_> {
        EventRecorder {
            events: &mut *self.events,
            root: false,
        }
    }
}

impl ObjectEvents for EventRecorder<'_> {
    fn number(&mut self, name: &str, value: f64) {
        self.events.push(Event::Number {
            name: Some(name.to_owned()),
            value,
        });
    }

    fn bool(&mut self, name: &str, value: bool) {
        self.events.push(Event::Bool {
            name: Some(name.to_owned()),
            value,
        });
    }

    fn string(&mut self, name: &str, value: &str) {
        self.events.push(Event::String {
            name: Some(name.to_owned()),
            value: value.to_owned(),
        });
    }

    fn identifier(&mut self, name: &str, value: &str) {
        self.events.push(Event::Identifier {
            name: Some(name.to_owned()),
            value: value.to_owned(),
        });
    }

    fn code(&mut self, name: &str, value: &str) {
        self.events.push(Event::Code {
            name: name.to_owned(),
            value: value.to_owned(),
        });
    }

    fn list_open(&mut self, name: &str) -> Box<dyn ListEvents + '_> {
        self.events.push(Event::ListOpen {
            name: Some(name.to_owned()),
        });
        Box::new(self.child())
    }

    fn obj_open(&mut self, name: &str) -> Box<dyn ObjectEvents + '_> {
        self.events.push(Event::ObjectOpen {
            name: name.to_owned(),
        });
        Box::new(self.child())
    }

    fn named_obj_open(&mut self, name: &str, instance: &str) -> Box<dyn ObjectEvents + '_> {
        self.events.push(Event::NamedObjectOpen {
            name: name.to_owned(),
            instance: instance.to_owned(),
        });
        Box::new(self.child())
    }

    fn comment(&mut self, text: &str) {
        self.events.push(Event::Comment {
            text: text.to_owned(),
        });
    }

    fn close(self: Box<Self>) {
        if !self.root {
            self.events.push(Event::Close);
        }
    }
}

impl ListEvents for EventRecorder<'_> {
    fn number(&mut self, value: f64) {
        self.events.push(Event::Number { name: None, value });
    }

    fn bool(&mut self, value: bool) {
        self.events.push(Event::Bool { name: None, value });
    }

    fn string(&mut self, value: &str) {
        self.events.push(Event::String {
            name: None,
            value: value.to_owned(),
        });
    }

    fn identifier(&mut self, value: &str) {
        self.events.push(Event::Identifier {
            name: None,
            value: value.to_owned(),
        });
    }

    fn pair(&mut self, reference: &str, value: &str) {
        self.events.push(Event::Pair {
            reference: reference.to_owned(),
            value: value.to_owned(),
        });
    }

    fn comment(&mut self, text: &str) {
        self.events.push(Event::Comment {
            text: text.to_owned(),
        });
    }

    fn list_open(&mut self) -> Box<dyn ListEvents + '_> {
        self.events.push(Event::ListOpen { name: None });
        Box::new(self.child())
    }

    fn close(self: Box<Self>) {
        if !self.root {
            self.events.push(Event::Close);
        }
    }
}

/// Re-emit a recorded stream into `sink`.
///
/// The stream is delivered as the contents of `sink`'s scope; `sink` itself
/// is not closed. Events that cannot occur in the scope they appear in (a
/// pair directly in an object, an unnamed scalar in an object, a code event
/// in a list) are skipped.
pub fn replay(events: &[Event], sink: &mut dyn ObjectEvents) {
    replay_object(&mut events.iter(), sink);
}

fn replay_object(events: &mut slice::Iter<'_, Event>, sink: &mut dyn ObjectEvents) {
    while let Some(event) = events.next() {
        match event {
            Event::Number {
                name: Some(name),
                value,
            } => sink.number(name, *value),
            Event::Bool {
                name: Some(name),
                value,
            } => sink.bool(name, *value),
            Event::String {
                name: Some(name),
                value,
            } => sink.string(name, value),
            Event::Identifier {
                name: Some(name),
                value,
            } => sink.identifier(name, value),
            Event::Code { name, value } => sink.code(name, value),
            Event::ListOpen { name: Some(name) } => {
                let mut child = sink.list_open(name);
                replay_list(events, child.as_mut());
                child.close();
            }
            Event::ObjectOpen { name } => {
                let mut child = sink.obj_open(name);
                replay_object(events, child.as_mut());
                child.close();
            }
            Event::NamedObjectOpen { name, instance } => {
                let mut child = sink.named_obj_open(name, instance);
                replay_object(events, child.as_mut());
                child.close();
            }
            Event::Comment { text } => sink.comment(text),
            Event::Close => return,
            other => trace!(?other, "skipping event outside of its scope"),
        }
    }
}

fn replay_list(events: &mut slice::Iter<'_, Event>, sink: &mut dyn ListEvents) {
    while let Some(event) = events.next() {
        match event {
            Event::Number { value, .. } => sink.number(*value),
            Event::Bool { value, .. } => sink.bool(*value),
            Event::String { value, .. } => sink.string(value),
            Event::Identifier { value, .. } => sink.identifier(value),
            Event::Pair { reference, value } => sink.pair(reference, value),
            Event::ListOpen { .. } => {
                let mut child = sink.list_open();
                replay_list(events, child.as_mut());
                child.close();
            }
            Event::Comment { text } => sink.comment(text),
            Event::Close => return,
            other => trace!(?other, "skipping event outside of its scope"),
        }
    }
}
