//! Event-protocol sinks that write document text.

use lkml_parse::{ListEvents, ObjectEvents};
use tracing::warn;

use crate::{FormatOptions, LookmlWriter};

/// An [`ObjectEvents`] sink that renders every event through a
/// [`LookmlWriter`].
///
/// The root sink owns the root object of the writer: it is begun on creation
/// and ended on `close`.
pub struct DocumentWriter<'w> {
    writer: &'w mut LookmlWriter,
}

impl<'w> DocumentWriter<'w> {
    /// Start a document in `writer`.
    pub fn new(writer: &'w mut LookmlWriter) -> Self {
        writer.begin_object(true);
        Self { writer }
    }

    fn key(&mut self, name: &str) {
        check(self.writer.key(name));
    }
}

/// Log writer misuse and keep going.
fn check(result: Result<(), &'static str>) {
    if let Err(message) = result {
        warn!(error = message, "document writer out of step with its writer");
    }
}

impl ObjectEvents for DocumentWriter<'_> {
    fn number(&mut self, name: &str, value: f64) {
        self.key(name);
        self.writer.write_number(value);
    }

    fn bool(&mut self, name: &str, value: bool) {
        self.key(name);
        self.writer.write_bool(value);
    }

    fn string(&mut self, name: &str, value: &str) {
        self.key(name);
        self.writer.write_string(value);
    }

    fn identifier(&mut self, name: &str, value: &str) {
        self.key(name);
        self.writer.write_identifier(value);
    }

    fn code(&mut self, name: &str, value: &str) {
        self.key(name);
        self.writer.write_code(value);
    }

    fn list_open(&mut self, name: &str) -> Box<dyn ListEvents + '_> {
        self.key(name);
        self.writer.begin_list();
        Box::new(ListWriter {
            writer: &mut *self.writer,
        })
    }

    fn obj_open(&mut self, name: &str) -> Box<dyn ObjectEvents + '_> {
        self.key(name);
        self.writer.begin_object(false);
        Box::new(DocumentWriter {
            writer: &mut *self.writer,
        })
    }

    fn named_obj_open(&mut self, name: &str, instance: &str) -> Box<dyn ObjectEvents + '_> {
        self.key(name);
        self.writer.begin_named_object(instance);
        Box::new(DocumentWriter {
            writer: &mut *self.writer,
        })
    }

    fn comment(&mut self, text: &str) {
        self.writer.comment(text);
    }

    fn close(self: Box<Self>) {
        check(self.writer.end_object());
    }
}

struct ListWriter<'w> {
    writer: &'w mut LookmlWriter,
}

impl ListWriter<'_> {
    fn element(&mut self) {
        check(self.writer.element());
    }
}

impl ListEvents for ListWriter<'_> {
    fn number(&mut self, value: f64) {
        self.element();
        self.writer.write_number(value);
    }

    fn bool(&mut self, value: bool) {
        self.element();
        self.writer.write_bool(value);
    }

    fn string(&mut self, value: &str) {
        self.element();
        self.writer.write_string(value);
    }

    fn identifier(&mut self, value: &str) {
        self.element();
        self.writer.write_identifier(value);
    }

    fn pair(&mut self, reference: &str, value: &str) {
        self.element();
        self.writer.write_pair(reference, value);
    }

    fn comment(&mut self, text: &str) {
        self.writer.comment(text);
    }

    fn list_open(&mut self) -> Box<dyn ListEvents + '_> {
        self.element();
        self.writer.begin_list();
        Box::new(ListWriter {
            writer: &mut *self.writer,
        })
    }

    fn close(self: Box<Self>) {
        check(self.writer.end_list());
    }
}

/// Render whatever `produce` delivers to a root sink.
///
/// `produce` must not close the sink it is given.
pub fn write_document(
    options: FormatOptions,
    produce: impl FnOnce(&mut dyn ObjectEvents),
) -> String {
    let mut writer = LookmlWriter::with_options(options);
    {
        let mut root: Box<dyn ObjectEvents + '_> = Box::new(DocumentWriter::new(&mut writer));
        produce(root.as_mut());
        root.close();
    }
    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_live_events() {
        let out = write_document(FormatOptions::default(), |root| {
            root.comment(" generated");
            let mut explore = root.named_obj_open("explore", "orders");
            explore.code("sql_always_where", "${created_date} > '2020-01-01'");
            let mut join = explore.named_obj_open("join", "users");
            join.identifier("relationship", "many_to_one");
            join.close();
            explore.close();
        });

        insta::assert_snapshot!(out, @r"
        # generated
        explore: orders {
          sql_always_where: ${created_date} > '2020-01-01' ;;
          join: users {
            relationship: many_to_one
          }
        }
        ");
    }

    #[test]
    fn test_list_comment_suppresses_comma() {
        let out = write_document(FormatOptions::default(), |root| {
            let mut list = root.list_open("fields");
            list.identifier("a");
            list.comment(" b is gone");
            list.identifier("c");
            list.close();
        });

        insta::assert_snapshot!(out, @r"
        fields: [
          a,
          # b is gone
          c
        ]
        ");
    }
}
