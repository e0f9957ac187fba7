//! Diagnostic rendering for parse errors.

use std::io::Write;
use std::ops::Range;

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use lkml_parse::{ParseError, ParseErrorKind};

/// Get ariadne config, respecting NO_COLOR env var.
fn ariadne_config() -> Config {
    if std::env::var("NO_COLOR").is_ok() {
        Config::default().with_color(false)
    } else {
        Config::default()
    }
}

/// Source-annotated rendering of a [`ParseError`].
pub trait RenderDiagnostic {
    /// Render this error with ariadne.
    fn render(&self, filename: &str, source: &str) -> String;

    /// Write the error report to a writer.
    fn write_report<W: Write>(&self, filename: &str, source: &str, writer: W);
}

impl RenderDiagnostic for ParseError {
    fn render(&self, filename: &str, source: &str) -> String {
        let mut output = Vec::new();
        self.write_report(filename, source, &mut output);
        String::from_utf8(output).unwrap_or_else(|_| self.to_string())
    }

    fn write_report<W: Write>(&self, filename: &str, source: &str, writer: W) {
        let _ = build_report(self, filename, source.len())
            .with_config(ariadne_config())
            .finish()
            .write((filename, Source::from(source)), writer);
    }
}

fn build_report<'a>(
    error: &ParseError,
    filename: &'a str,
    source_len: usize,
) -> ariadne::ReportBuilder<'static, (&'a str, Range<usize>)> {
    let mut range: Range<usize> = error.span.into();
    if range.is_empty() {
        // Point at something visible, even at end of input.
        let start = range.start.min(source_len.saturating_sub(1));
        range = start..start + 1;
    }
    let report = Report::build(ReportKind::Error, (filename, range.clone()))
        .with_message(error.kind.to_string());

    let (label, help) = match &error.kind {
        ParseErrorKind::UnexpectedToken { expected, .. } => (format!("expected {expected}"), None),
        ParseErrorKind::UnclosedObject => ("object opened here".into(), Some("add a closing '}'")),
        ParseErrorKind::UnclosedList => ("list opened here".into(), Some("add a closing ']'")),
        ParseErrorKind::Unmatched(_) => ("nothing to close here".into(), None),
        ParseErrorKind::UnterminatedString => {
            ("string starts here".into(), Some("add a closing '\"'"))
        }
        ParseErrorKind::UnterminatedCode => (
            "code block starts here".into(),
            Some("code properties end with ';;'"),
        ),
        ParseErrorKind::InvalidEscape(_) => (
            "invalid escape".into(),
            Some("valid escapes are: \\\\, \\\", \\n, \\r, \\t"),
        ),
        ParseErrorKind::InvalidNumber(_) => ("not a number".into(), None),
        ParseErrorKind::InvalidCharacter(_) => ("unexpected character".into(), None),
        ParseErrorKind::TooDeep(_) => ("nesting limit reached here".into(), None),
    };

    let report = report.with_label(
        Label::new((filename, range))
            .with_message(label)
            .with_color(Color::Red),
    );
    match help {
        Some(help) => report.with_help(help),
        None => report,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(source: &str) -> String {
        let error = crate::parse(source).expect_err("expected a parse error");
        let rendered = error.render("test.lkml", source);
        String::from_utf8(strip_ansi_escapes::strip(rendered.as_bytes())).unwrap()
    }

    #[test]
    fn test_invalid_escape_diagnostic() {
        let out = render(r#"label: "hello\qworld""#);
        assert!(out.contains("invalid escape sequence '\\q'"), "{out}");
        assert!(out.contains("test.lkml"), "{out}");
        assert!(out.contains("valid escapes are"), "{out}");
    }

    #[test]
    fn test_unclosed_object_diagnostic() {
        let out = render("view: orders {\n  label: \"x\"");
        assert!(out.contains("unclosed object"), "{out}");
        assert!(out.contains("object opened here"), "{out}");
        assert!(out.contains("add a closing '}'"), "{out}");
    }

    #[test]
    fn test_unexpected_token_diagnostic() {
        let out = render("label \"x\"");
        assert!(out.contains("unexpected string, expected ':'"), "{out}");
    }

    #[test]
    fn test_error_at_end_of_input_renders() {
        let out = render("label:");
        assert!(out.contains("end of input"), "{out}");
    }
}
