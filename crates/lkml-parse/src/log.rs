//! Tracing decorator for event streams.

use tracing::debug;

use crate::{ListEvents, ObjectEvents};

/// Logs every event at `debug` level, then forwards it unchanged.
pub struct EventLogger<'a> {
    inner: Box<dyn ObjectEvents + 'a>,
    depth: usize,
}

impl<'a> EventLogger<'a> {
    pub fn new(inner: Box<dyn ObjectEvents + 'a>) -> Self {
        Self { inner, depth: 0 }
    }
}

impl ObjectEvents for EventLogger<'_> {
    fn number(&mut self, name: &str, value: f64) {
        debug!(depth = self.depth, name, value, "number");
        self.inner.number(name, value);
    }

    fn bool(&mut self, name: &str, value: bool) {
        debug!(depth = self.depth, name, value, "bool");
        self.inner.bool(name, value);
    }

    fn string(&mut self, name: &str, value: &str) {
        debug!(depth = self.depth, name, value, "string");
        self.inner.string(name, value);
    }

    fn identifier(&mut self, name: &str, value: &str) {
        debug!(depth = self.depth, name, value, "identifier");
        self.inner.identifier(name, value);
    }

    fn code(&mut self, name: &str, value: &str) {
        debug!(depth = self.depth, name, len = value.len(), "code");
        self.inner.code(name, value);
    }

    fn list_open(&mut self, name: &str) -> Box<dyn ListEvents + '_> {
        debug!(depth = self.depth, name, "list open");
        Box::new(ListLogger {
            inner: self.inner.list_open(name),
            depth: self.depth + 1,
        })
    }

    fn obj_open(&mut self, name: &str) -> Box<dyn ObjectEvents + '_> {
        debug!(depth = self.depth, name, "object open");
        Box::new(EventLogger {
            inner: self.inner.obj_open(name),
            depth: self.depth + 1,
        })
    }

    fn named_obj_open(&mut self, name: &str, instance: &str) -> Box<dyn ObjectEvents + '_> {
        debug!(depth = self.depth, name, instance, "named object open");
        Box::new(EventLogger {
            inner: self.inner.named_obj_open(name, instance),
            depth: self.depth + 1,
        })
    }

    fn comment(&mut self, text: &str) {
        debug!(depth = self.depth, text, "comment");
        self.inner.comment(text);
    }

    fn close(self: Box<Self>) {
        debug!(depth = self.depth, "close");
        self.inner.close();
    }
}

struct ListLogger<'a> {
    inner: Box<dyn ListEvents + 'a>,
    depth: usize,
}

impl ListEvents for ListLogger<'_> {
    fn number(&mut self, value: f64) {
        debug!(depth = self.depth, value, "list number");
        self.inner.number(value);
    }

    fn bool(&mut self, value: bool) {
        debug!(depth = self.depth, value, "list bool");
        self.inner.bool(value);
    }

    fn string(&mut self, value: &str) {
        debug!(depth = self.depth, value, "list string");
        self.inner.string(value);
    }

    fn identifier(&mut self, value: &str) {
        debug!(depth = self.depth, value, "list identifier");
        self.inner.identifier(value);
    }

    fn pair(&mut self, reference: &str, value: &str) {
        debug!(depth = self.depth, reference, value, "list pair");
        self.inner.pair(reference, value);
    }

    fn comment(&mut self, text: &str) {
        debug!(depth = self.depth, text, "list comment");
        self.inner.comment(text);
    }

    fn list_open(&mut self) -> Box<dyn ListEvents + '_> {
        debug!(depth = self.depth, "nested list open");
        Box::new(ListLogger {
            inner: self.inner.list_open(),
            depth: self.depth + 1,
        })
    }

    fn close(self: Box<Self>) {
        debug!(depth = self.depth, "list close");
        self.inner.close();
    }
}
