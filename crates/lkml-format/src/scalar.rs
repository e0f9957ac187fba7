//! Scalar handling utilities.
//!
//! Decides how names and values are spelled (bare or quoted) and escapes
//! string content.

use std::borrow::Cow;

use lkml_parse::is_identifier;

/// Check if a string can be written without quotes.
///
/// A bare word must match the identifier pattern `[A-Za-z_][A-Za-z0-9_.]*`
/// and must not be one of the boolean literals `yes` / `no`, which would
/// read back as booleans.
pub fn can_be_bare(s: &str) -> bool {
    is_identifier(s) && s != "yes" && s != "no"
}

/// Escape a string for quoted output.
///
/// Returns the escaped content (without surrounding quotes).
pub fn escape_quoted(s: &str) -> Cow<'_, str> {
    if !s.chars().any(|c| matches!(c, '"' | '\\' | '\n' | '\r' | '\t')) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            c => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Spell a number so that it reads back as the same value.
///
/// Integral values are written without a fractional part.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_be_bare() {
        assert!(can_be_bare("orders"));
        assert!(can_be_bare("_private"));
        assert!(can_be_bare("users.id"));
        assert!(can_be_bare("created_date"));

        assert!(!can_be_bare(""));
        assert!(!can_be_bare("hello world"));
        assert!(!can_be_bare("1st"));
        assert!(!can_be_bare("a-b"));
        assert!(!can_be_bare("yes"));
        assert!(!can_be_bare("no"));
    }

    #[test]
    fn test_escape_quoted() {
        assert_eq!(escape_quoted("hello"), "hello");
        assert_eq!(escape_quoted("hello world"), "hello world");
        assert_eq!(escape_quoted("say \"hi\""), "say \\\"hi\\\"");
        assert_eq!(escape_quoted("line1\nline2"), "line1\\nline2");
        assert_eq!(escape_quoted("path\\to\\file"), "path\\\\to\\\\file");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(42.0), "42");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(0.1), "0.1");
    }
}
