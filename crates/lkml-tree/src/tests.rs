use super::*;

#[test]
fn test_parse_simple() {
    let doc = parse("label: \"Orders\"\ncount: 30\nhidden: yes").unwrap();
    assert_eq!(doc.get("label").and_then(Value::as_str), Some("Orders"));
    assert_eq!(doc.get("count").and_then(Value::as_f64), Some(30.0));
    assert_eq!(doc.get("hidden").and_then(Value::as_bool), Some(true));
}

#[test]
fn test_parse_empty() {
    assert!(parse("").unwrap().is_empty());
}

#[test]
fn test_parse_view() {
    let source = r#"
# Orders placed on the storefront.
view: orders {
  sql_table_name: public.orders ;;

  dimension: id {
    primary_key: yes
    type: number
    sql: ${TABLE}.id ;;
  }

  measure: count {
    type: count
    drill_fields: [id, created_date]
    filters: [status: "complete"]
  }
}
"#;
    let doc = parse_with_code_properties(source, ["sql", "sql_table_name"]).unwrap();
    assert_eq!(doc.entries[0].comments, [" Orders placed on the storefront."]);

    let view = doc.get_named("view", "orders").unwrap();
    assert_eq!(
        view.get("sql_table_name"),
        Some(&Value::Code("public.orders".into()))
    );

    let id = view.get_named("dimension", "id").unwrap();
    assert_eq!(id.get("primary_key"), Some(&Value::Boolean(true)));
    assert_eq!(id.get("type"), Some(&Value::Identifier("number".into())));
    assert_eq!(id.get("sql"), Some(&Value::Code("${TABLE}.id".into())));

    let count = view.get_named("measure", "count").unwrap();
    let drill: Vec<_> = count
        .get("drill_fields")
        .and_then(Value::as_list)
        .unwrap()
        .values()
        .filter_map(Value::as_identifier)
        .collect();
    assert_eq!(drill, ["id", "created_date"]);
    assert_eq!(
        count.get("filters").and_then(Value::as_list).and_then(|l| l.get(0)),
        Some(&Value::Pair("status".into(), "complete".into()))
    );
}

#[test]
fn test_emit_reproduces_parsed_events() {
    use lkml_parse::{EventRecorder, ObjectEvents, Parser};

    let source = "# a\nmodel: m { explore: e { joins: [x] } # b\n }\nlabel: \"l\"";
    let mut direct = Vec::new();
    Parser::new(source)
        .parse(Box::new(EventRecorder::new(&mut direct)))
        .unwrap();

    let tree = parse(source).unwrap();
    let mut replayed = Vec::new();
    let mut root: Box<dyn ObjectEvents + '_> = Box::new(EventRecorder::new(&mut replayed));
    tree.emit(root.as_mut());
    root.close();

    assert_eq!(direct, replayed);
}

#[test]
fn test_parse_error_is_returned() {
    let err = parse("view: v {").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnclosedObject);
}
