use super::*;
use crate::{Event, EventRecorder};

fn parse(source: &str) -> Vec<Event> {
    parse_with(source, &[])
}

fn parse_with(source: &str, code: &[&str]) -> Vec<Event> {
    let mut events = Vec::new();
    Parser::new(source)
        .with_code_properties(code.iter().copied())
        .parse(Box::new(EventRecorder::new(&mut events)))
        .unwrap_or_else(|e| panic!("parse failed for {source:?}: {e}"));
    events
}

fn parse_err(source: &str) -> ParseError {
    let mut events = Vec::new();
    Parser::new(source)
        .parse(Box::new(EventRecorder::new(&mut events)))
        .expect_err("expected a parse error")
}

fn named(name: &str) -> Option<String> {
    Some(name.to_owned())
}

#[test]
fn test_empty_document() {
    assert!(parse("").is_empty());
    assert!(parse("  \n\n ").is_empty());
}

#[test]
fn test_scalars() {
    let events = parse("a: 1\nb: \"two\"\nc: three\nd: yes\ne: no");
    assert_eq!(
        events,
        vec![
            Event::Number {
                name: named("a"),
                value: 1.0
            },
            Event::String {
                name: named("b"),
                value: "two".into()
            },
            Event::Identifier {
                name: named("c"),
                value: "three".into()
            },
            Event::Bool {
                name: named("d"),
                value: true
            },
            Event::Bool {
                name: named("e"),
                value: false
            },
        ]
    );
}

#[test]
fn test_quoted_property_name() {
    let events = parse("\"odd name\": 1");
    assert_eq!(
        events,
        vec![Event::Number {
            name: named("odd name"),
            value: 1.0
        }]
    );
}

#[test]
fn test_named_and_anonymous_objects() {
    let events = parse("model: m {\n  derived: { x: 1 }\n}");
    assert_eq!(
        events,
        vec![
            Event::NamedObjectOpen {
                name: "model".into(),
                instance: "m".into()
            },
            Event::ObjectOpen {
                name: "derived".into()
            },
            Event::Number {
                name: named("x"),
                value: 1.0
            },
            Event::Close,
            Event::Close,
        ]
    );
}

#[test]
fn test_lists_and_pairs() {
    let events = parse("filters: [status: \"done\", region: \"eu\"]\ntags: [\"a\", b, 3, [no]]");
    assert_eq!(
        events,
        vec![
            Event::ListOpen {
                name: named("filters")
            },
            Event::Pair {
                reference: "status".into(),
                value: "done".into()
            },
            Event::Pair {
                reference: "region".into(),
                value: "eu".into()
            },
            Event::Close,
            Event::ListOpen {
                name: named("tags")
            },
            Event::String {
                name: None,
                value: "a".into()
            },
            Event::Identifier {
                name: None,
                value: "b".into()
            },
            Event::Number {
                name: None,
                value: 3.0
            },
            Event::ListOpen { name: None },
            Event::Bool {
                name: None,
                value: false
            },
            Event::Close,
            Event::Close,
        ]
    );
}

#[test]
fn test_code_properties_are_schema_defined() {
    let events = parse_with("sql: SELECT 1 ; -- not the end\n ;; label: \"x\"", &["sql"]);
    assert_eq!(
        events,
        vec![
            Event::Code {
                name: "sql".into(),
                value: "SELECT 1 ; -- not the end".into()
            },
            Event::String {
                name: named("label"),
                value: "x".into()
            },
        ]
    );

    // Without the declaration the same text is not a code block.
    assert!(
        Parser::new("sql: SELECT 1 ;;")
            .parse(Box::new(crate::NullSink))
            .is_err()
    );
}

#[test]
fn test_comments_keep_their_position() {
    let events = parse("# top\nview: v {\n  # inside\n  x: 1 # trailing\n}\n");
    assert_eq!(
        events,
        vec![
            Event::Comment {
                text: " top".into()
            },
            Event::NamedObjectOpen {
                name: "view".into(),
                instance: "v".into()
            },
            Event::Comment {
                text: " inside".into()
            },
            Event::Number {
                name: named("x"),
                value: 1.0
            },
            Event::Comment {
                text: " trailing".into()
            },
            Event::Close,
        ]
    );
}

#[test]
fn test_comments_before_brace_and_colon() {
    let events = parse("view: orders # note\n{ label: \"x\" }\nf: [k # c\n: \"v\", id # d\n]");
    assert_eq!(
        events,
        vec![
            Event::Comment {
                text: " note".into()
            },
            Event::NamedObjectOpen {
                name: "view".into(),
                instance: "orders".into()
            },
            Event::String {
                name: named("label"),
                value: "x".into()
            },
            Event::Close,
            Event::ListOpen { name: named("f") },
            Event::Comment { text: " c".into() },
            Event::Pair {
                reference: "k".into(),
                value: "v".into()
            },
            Event::Identifier {
                name: None,
                value: "id".into()
            },
            Event::Comment { text: " d".into() },
            Event::Close,
        ]
    );
}

#[test]
fn test_comment_after_identifier_value_follows_it() {
    let events = parse_with("a: b # c\nsql # d\n: x ;;", &["sql"]);
    assert_eq!(
        events,
        vec![
            Event::Identifier {
                name: named("a"),
                value: "b".into()
            },
            Event::Comment { text: " c".into() },
            Event::Comment { text: " d".into() },
            Event::Code {
                name: "sql".into(),
                value: "x".into()
            },
        ]
    );
}

#[test]
fn test_commas_between_properties_are_optional() {
    assert_eq!(parse("a: 1, b: 2"), parse("a: 1\nb: 2"));
    assert_eq!(parse("l: [1 2]"), parse("l: [1, 2,]"));
}

#[test]
fn test_unclosed_object_closes_open_scopes() {
    let mut events = Vec::new();
    let err = Parser::new("view: v { dimension: d { x: 1")
        .parse(Box::new(EventRecorder::new(&mut events)))
        .unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnclosedObject);
    // Both open scopes were closed while unwinding.
    assert_eq!(
        events.iter().filter(|e| matches!(e, Event::Close)).count(),
        2
    );
}

#[test]
fn test_unclosed_list() {
    assert_eq!(parse_err("tags: [\"a\"").kind, ParseErrorKind::UnclosedList);
}

#[test]
fn test_unmatched_closers() {
    assert_eq!(parse_err("}").kind, ParseErrorKind::Unmatched('}'));
    assert_eq!(parse_err("a: 1 ]").kind, ParseErrorKind::Unmatched(']'));
}

#[test]
fn test_missing_colon() {
    let err = parse_err("label \"x\"");
    assert_eq!(
        err.kind,
        ParseErrorKind::UnexpectedToken {
            found: "string",
            expected: "':'"
        }
    );
    assert_eq!(err.span, Span::new(6, 9));
}

#[test]
fn test_missing_value() {
    let err = parse_err("label:");
    assert!(matches!(
        err.kind,
        ParseErrorKind::UnexpectedToken {
            found: "end of input",
            ..
        }
    ));
}

#[test]
fn test_pair_needs_string() {
    let err = parse_err("filters: [status: 1]");
    assert_eq!(
        err.kind,
        ParseErrorKind::UnexpectedToken {
            found: "number",
            expected: "a quoted string"
        }
    );
}

#[test]
fn test_unterminated_code() {
    let mut events = Vec::new();
    let err = Parser::new("sql: SELECT 1")
        .with_code_properties(["sql"])
        .parse(Box::new(EventRecorder::new(&mut events)))
        .unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnterminatedCode);
}

#[test]
fn test_nesting_limit() {
    let source = format!(
        "a: {}{}",
        "[".repeat(MAX_DEPTH + 1),
        "]".repeat(MAX_DEPTH + 1)
    );
    assert_eq!(parse_err(&source).kind, ParseErrorKind::TooDeep(MAX_DEPTH));
}
