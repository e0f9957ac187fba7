//! Formatting options for document output.

/// Options for writing documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    /// One property or element per line, indented by nesting level
    /// (default: true). When false, everything goes on one line as
    /// `name:value, name:value`.
    pub pretty: bool,

    /// Indentation string for pretty output (default: two spaces).
    pub indent: &'static str,

    /// Write strings that match the identifier pattern without quotes
    /// (default: false). Such strings read back as identifiers.
    pub bare_strings: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: "  ",
            bare_strings: false,
        }
    }
}

impl FormatOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Multi-line, indented output.
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Single-line output.
    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }

    /// Set a custom indentation string.
    pub fn indent(mut self, indent: &'static str) -> Self {
        self.indent = indent;
        self
    }

    /// Leave identifier-like strings unquoted.
    pub fn bare_strings(mut self, bare: bool) -> Self {
        self.bare_strings = bare;
        self
    }
}
