//! Low-level document writer.
//!
//! [`LookmlWriter`] knows about layout (separators, newlines, indentation)
//! and spelling (quoting, escaping, booleans). It knows nothing about schemas.

use crate::options::FormatOptions;
use crate::scalar::{can_be_bare, escape_quoted, format_number};

/// Context for tracking output state.
#[derive(Debug, Clone)]
enum Context {
    /// Inside an object. The root object has no braces.
    Object {
        first: bool,
        is_root: bool,
        needs_separator: bool,
    },
    /// Inside a list.
    List { first: bool, needs_separator: bool },
}

/// Low-level document writer.
///
/// Call sequences mirror the document: `key` then a value for properties,
/// `element` then a value for list elements, `begin_*` / `end_*` around
/// nested scopes.
pub struct LookmlWriter {
    out: String,
    stack: Vec<Context>,
    options: FormatOptions,
}

impl Default for LookmlWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl LookmlWriter {
    /// Create a new writer with default options.
    pub fn new() -> Self {
        Self::with_options(FormatOptions::default())
    }

    /// Create a new writer with the given options.
    pub fn with_options(options: FormatOptions) -> Self {
        Self {
            out: String::new(),
            stack: Vec::new(),
            options,
        }
    }

    pub fn options(&self) -> &FormatOptions {
        &self.options
    }

    /// Consume the writer and return the output.
    pub fn finish(self) -> String {
        self.out
    }

    /// Output written so far.
    pub fn as_str(&self) -> &str {
        &self.out
    }

    /// Current nesting depth, root included.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Indentation depth: the root object does not indent.
    fn indent_depth(&self) -> usize {
        self.stack
            .iter()
            .filter(|ctx| !matches!(ctx, Context::Object { is_root: true, .. }))
            .count()
    }

    fn write_newline_indent(&mut self, depth: usize) {
        self.out.push('\n');
        for _ in 0..depth {
            self.out.push_str(self.options.indent);
        }
    }

    /// Layout before a new item (property, element or comment) of the
    /// current scope.
    fn before_item(&mut self, is_comment: bool) {
        let depth = self.indent_depth();
        let pretty = self.options.pretty;
        let Some(ctx) = self.stack.last_mut() else {
            return;
        };
        let (first, needs_separator, is_root, is_list) = match ctx {
            Context::Object {
                first,
                is_root,
                needs_separator,
            } => (first, needs_separator, *is_root, false),
            Context::List {
                first,
                needs_separator,
            } => (first, needs_separator, false, true),
        };
        let was_first = std::mem::replace(first, false);
        let separate = std::mem::replace(needs_separator, !is_comment);

        if pretty {
            // Commas are optional; pretty output only uses them in lists.
            if separate && is_list {
                self.out.push(',');
            }
            if !(was_first && is_root && self.out.is_empty()) {
                self.write_newline_indent(depth);
            }
        } else if separate {
            self.out.push_str(", ");
        }
    }

    /// Begin an object.
    ///
    /// If `is_root` is true, no braces are written (implicit root object).
    pub fn begin_object(&mut self, is_root: bool) {
        if !is_root {
            self.out.push('{');
        }
        self.stack.push(Context::Object {
            first: true,
            is_root,
            needs_separator: false,
        });
    }

    /// Begin the body of a named object: `instance {`.
    pub fn begin_named_object(&mut self, instance: &str) {
        self.out.push_str(instance);
        if self.options.pretty {
            self.out.push(' ');
        }
        self.begin_object(false);
    }

    /// End an object.
    ///
    /// Returns an error message if called without a matching begin_object.
    pub fn end_object(&mut self) -> Result<(), &'static str> {
        match self.stack.pop() {
            Some(Context::Object { first, is_root, .. }) => {
                if is_root {
                    if self.options.pretty && !first {
                        self.out.push('\n');
                    }
                } else {
                    self.close_scope(first, '}');
                }
                Ok(())
            }
            Some(other) => {
                self.stack.push(other);
                Err("end_object called inside a list")
            }
            None => Err("end_object called without begin_object"),
        }
    }

    /// Begin a list.
    pub fn begin_list(&mut self) {
        self.out.push('[');
        self.stack.push(Context::List {
            first: true,
            needs_separator: false,
        });
    }

    /// End a list.
    pub fn end_list(&mut self) -> Result<(), &'static str> {
        match self.stack.pop() {
            Some(Context::List { first, .. }) => {
                self.close_scope(first, ']');
                Ok(())
            }
            Some(other) => {
                self.stack.push(other);
                Err("end_list called inside an object")
            }
            None => Err("end_list called without begin_list"),
        }
    }

    fn close_scope(&mut self, empty: bool, closer: char) {
        if empty {
            self.out.push(closer);
            return;
        }
        if self.options.pretty {
            let depth = self.indent_depth();
            self.write_newline_indent(depth);
        }
        self.out.push(closer);
    }

    /// Write a property name and its colon.
    ///
    /// Returns an error message if called outside of an object.
    pub fn key(&mut self, name: &str) -> Result<(), &'static str> {
        if !matches!(self.stack.last(), Some(Context::Object { .. })) {
            return Err("key called outside of object");
        }
        self.before_item(false);
        self.write_name(name);
        self.out.push(':');
        if self.options.pretty {
            self.out.push(' ');
        }
        Ok(())
    }

    /// Start a list element.
    ///
    /// Returns an error message if called outside of a list.
    pub fn element(&mut self) -> Result<(), &'static str> {
        if !matches!(self.stack.last(), Some(Context::List { .. })) {
            return Err("element called outside of list");
        }
        self.before_item(false);
        Ok(())
    }

    /// Write a `#` comment as an item of the current scope.
    pub fn comment(&mut self, text: &str) {
        self.before_item(true);
        self.out.push('#');
        // A comment runs to end of line.
        self.out.push_str(&text.replace(['\n', '\r'], " "));
        if !self.options.pretty {
            self.out.push('\n');
        }
    }

    fn write_name(&mut self, name: &str) {
        if can_be_bare(name) {
            self.out.push_str(name);
        } else {
            self.write_quoted(name);
        }
    }

    fn write_quoted(&mut self, s: &str) {
        self.out.push('"');
        self.out.push_str(&escape_quoted(s));
        self.out.push('"');
    }

    pub fn write_number(&mut self, value: f64) {
        self.out.push_str(&format_number(value));
    }

    /// Booleans are spelled `yes` / `no`.
    pub fn write_bool(&mut self, value: bool) {
        self.out.push_str(if value { "yes" } else { "no" });
    }

    pub fn write_string(&mut self, value: &str) {
        if self.options.bare_strings && can_be_bare(value) {
            self.out.push_str(value);
        } else {
            self.write_quoted(value);
        }
    }

    pub fn write_identifier(&mut self, value: &str) {
        self.out.push_str(value);
    }

    /// Code text followed by the `;;` terminator.
    pub fn write_code(&mut self, text: &str) {
        self.out.push_str(text);
        self.out.push_str(" ;;");
    }

    /// A `reference: "string"` list element body.
    pub fn write_pair(&mut self, reference: &str, value: &str) {
        self.out.push_str(reference);
        self.out.push(':');
        if self.options.pretty {
            self.out.push(' ');
        }
        self.write_quoted(value);
    }
}
