//! Typed AST builder tests.

use lkml_ast::lookml::{self, LookmlError, LookmlNode, parse_lookml};
use lkml_ast::{AstBuilder, Field, NodeBuilder, RegistryError, TypeRegistry, build_nodes};
use lkml_schema::{Schema, SchemaBuilder, ValidationResult, lookml_schema};
use lkml_tree::Value;

const PROJECT: &str = r#"
model: ecommerce {
  label: "E-commerce"
  connection: "warehouse"
  include: ["*.view.lkml"]
  explore: orders {
    hidden: yes
    fields: [orders.id, users.name]
    sql_always_where: ${orders.created_date} > '2020-01-01' ;;
    always_filter: {
      filters: [orders.status: "complete"]
    }
    join: users {
      type: left_outer
      relationship: many_to_one
      sql_on: ${orders.user_id} = ${users.id} ;;
    }
  }
}

# Orders with their totals.
view: orders {
  derived_table: {
    sql: SELECT 1 ;;
    persist_for: "24 hours"
    indexes: ["id"]
  }
  dimension: id {
    primary_key: yes
    type: number
    sql: ${TABLE}.id ;;
  }
  dimension_group: created {
    type: time
    timeframes: [date, week]
  }
  measure: total {
    type: sum
    sql: ${TABLE}.amount ;;
    precision: 2
    filters: [status: "complete"]
  }
}
"#;

#[test]
fn test_parse_project() {
    let project = parse_lookml(PROJECT).unwrap();

    let model = project.model("ecommerce").unwrap();
    assert_eq!(model.label.as_deref(), Some("E-commerce"));
    assert_eq!(model.includes, ["*.view.lkml"]);

    let explore = &model.explores[0];
    assert_eq!(explore.name, "orders");
    assert!(explore.hidden);
    assert_eq!(explore.fields, ["orders.id", "users.name"]);
    assert_eq!(
        explore.sql_always_where.as_deref(),
        Some("${orders.created_date} > '2020-01-01'")
    );
    assert_eq!(
        explore.always_filter,
        [("orders.status".to_owned(), "complete".to_owned())]
    );

    let join = &explore.joins[0];
    assert_eq!(join.name, "users");
    assert_eq!(join.join_type.as_deref(), Some("left_outer"));
    assert_eq!(join.relationship.as_deref(), Some("many_to_one"));

    let view = project.view("orders").unwrap();
    assert_eq!(view.dimensions.len(), 1);
    assert!(view.dimensions[0].primary_key);
    assert_eq!(view.dimensions[0].kind.as_deref(), Some("number"));
    assert_eq!(view.dimension_groups[0].timeframes, ["date", "week"]);
    assert_eq!(view.measures[0].precision, Some(2.0));
    assert_eq!(
        view.measures[0].filters,
        [("status".to_owned(), "complete".to_owned())]
    );
    insta::assert_debug_snapshot!(view.derived_table.as_ref().unwrap(), @r#"
    DerivedTable {
        sql: Some(
            "SELECT 1",
        ),
        persist_for: Some(
            "24 hours",
        ),
        indexes: [
            "id",
        ],
    }
    "#);
}

#[test]
fn test_invalid_document_is_rejected() {
    let err = parse_lookml("view: v {\n  dimension: d { type: colour }\n}\n").unwrap_err();
    let LookmlError::Invalid { errors } = err else {
        panic!("expected validation errors, got {err:?}");
    };
    assert_eq!(errors.len(), 1);
}

#[test]
fn test_registry_must_cover_reachable_types() {
    let schema = lookml_schema().unwrap();
    let err = TypeRegistry::<LookmlNode>::builder()
        .register("model", |_| unreachable!())
        .build(&schema)
        .unwrap_err();
    assert_eq!(
        err,
        RegistryError::MissingFactory {
            object_type: "derived_table".into()
        }
    );
    assert!(lookml::registry(&schema).is_ok());
}

/// A generic node: its scalar fields as text and its children.
#[derive(Debug, PartialEq)]
struct Node {
    kind: &'static str,
    name: Option<String>,
    fields: Vec<(String, String)>,
    children: Vec<(String, Node)>,
}

struct GenericBuilder(Node);

impl NodeBuilder<Node> for GenericBuilder {
    fn accept(&mut self, name: &str, field: Field<Node>) {
        match field {
            Field::Node(node) => self.0.children.push((name.to_owned(), node)),
            Field::Value(Value::List(list)) => self
                .0
                .fields
                .push((name.to_owned(), format!("{} items", list.len()))),
            Field::Value(value) => {
                let text = value
                    .as_str()
                    .map(str::to_owned)
                    .or_else(|| value.as_f64().map(|n| n.to_string()))
                    .unwrap_or_default();
                self.0.fields.push((name.to_owned(), text));
            }
        }
    }

    fn build(self: Box<Self>) -> Node {
        self.0
    }
}

fn factory(kind: &'static str) -> impl Fn(Option<&str>) -> Box<dyn NodeBuilder<Node>> {
    move |name| {
        Box::new(GenericBuilder(Node {
            kind,
            name: name.map(str::to_owned),
            fields: Vec::new(),
            children: Vec::new(),
        }))
    }
}

fn tree_schema() -> Schema {
    let mut builder = SchemaBuilder::new("tree");
    builder
        .add_named_object_property_with("model", |model| {
            model
                .add_number_property("x")
                .add_named_object_property("explore");
            Ok(())
        })
        .unwrap()
        .add_object_type("explore", |explore| {
            explore
                .add_code_property("sql")
                .add_object_property_of("options", "options")
                .add_ref_list_property("fields");
            Ok(())
        })
        .unwrap()
        .add_object_type("options", |options| {
            options.add_string_property("label");
            Ok(())
        })
        .unwrap();
    builder.build().unwrap()
}

fn tree_registry(schema: &Schema) -> TypeRegistry<Node> {
    TypeRegistry::builder()
        .register("model", factory("model"))
        .register("explore", factory("explore"))
        .register("options", factory("options"))
        .build(schema)
        .unwrap()
}

#[test]
fn test_nodes_are_built_bottom_up() {
    let schema = tree_schema();
    let registry = tree_registry(&schema);
    let mut result = ValidationResult::ok();
    let nodes = build_nodes(
        "model: m {\n  x: 1\n  explore: e {\n    sql: a = b ;;\n    options: { label: \"L\" }\n    fields: [a, b]\n  }\n  bogus: 2\n}\n",
        &schema,
        &registry,
        &mut result,
    )
    .unwrap();

    assert_eq!(result.errors.len(), 1, "{result}");
    assert_eq!(nodes.len(), 1);
    let (name, model) = &nodes[0];
    assert_eq!(name, "model");
    assert_eq!(
        model,
        &Node {
            kind: "model",
            name: Some("m".into()),
            fields: vec![("x".into(), "1".into())],
            children: vec![(
                "explore".into(),
                Node {
                    kind: "explore",
                    name: Some("e".into()),
                    fields: vec![
                        ("sql".into(), "a = b".into()),
                        ("fields".into(), "2 items".into()),
                    ],
                    children: vec![(
                        "options".into(),
                        Node {
                            kind: "options",
                            name: None,
                            fields: vec![("label".into(), "L".into())],
                            children: Vec::new(),
                        }
                    )],
                }
            )],
        }
    );
}

#[test]
fn test_unvalidated_stream_skips_unknown_objects() {
    let schema = tree_schema();
    let registry = tree_registry(&schema);
    let mut nodes = Vec::new();
    schema
        .parser("view: v { a: 1 }\nmodel: m { other: o { x: 1 } }\n")
        .parse(Box::new(AstBuilder::new(&schema, &registry, |name, node| {
            nodes.push((name.to_owned(), node))
        })))
        .unwrap();

    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].1.name.as_deref(), Some("m"));
    assert!(nodes[0].1.children.is_empty());
}
