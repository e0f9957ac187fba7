//! Typed LookML projects.
//!
//! Node builders for every object type of
//! [`lookml_schema`](lkml_schema::lookml_schema), and [`parse_lookml`],
//! which turns a LookML document into a [`Project`].

use lkml_parse::ParseError;
use lkml_schema::{Schema, SchemaError, ValidationError, ValidationResult, lookml_schema};
use thiserror::Error;
use tracing::trace;

use crate::builder::build_nodes;
use crate::node::{Field, NodeBuilder};
use crate::registry::{RegistryError, TypeRegistry};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Project {
    pub models: Vec<Model>,
    pub views: Vec<View>,
}

impl Project {
    pub fn model(&self, name: &str) -> Option<&Model> {
        self.models.iter().find(|m| m.name == name)
    }

    pub fn view(&self, name: &str) -> Option<&View> {
        self.views.iter().find(|v| v.name == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    pub name: String,
    pub label: Option<String>,
    pub connection: Option<String>,
    pub includes: Vec<String>,
    pub explores: Vec<Explore>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Explore {
    pub name: String,
    pub label: Option<String>,
    pub description: Option<String>,
    /// The view the explore is based on, when it differs from its name.
    pub view_name: Option<String>,
    pub from: Option<String>,
    pub hidden: bool,
    pub fields: Vec<String>,
    pub sql_always_where: Option<String>,
    /// `field: "filter expression"` pairs.
    pub always_filter: Vec<(String, String)>,
    pub joins: Vec<Join>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Join {
    pub name: String,
    pub join_type: Option<String>,
    pub relationship: Option<String>,
    pub from: Option<String>,
    pub view_label: Option<String>,
    pub sql_on: Option<String>,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct View {
    pub name: String,
    pub label: Option<String>,
    pub sql_table_name: Option<String>,
    pub extends: Vec<String>,
    pub drill_fields: Vec<String>,
    pub derived_table: Option<DerivedTable>,
    pub dimensions: Vec<Dimension>,
    pub dimension_groups: Vec<Dimension>,
    pub measures: Vec<Measure>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedTable {
    pub sql: Option<String>,
    pub persist_for: Option<String>,
    pub indexes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dimension {
    pub name: String,
    pub kind: Option<String>,
    pub label: Option<String>,
    pub description: Option<String>,
    pub sql: Option<String>,
    pub html: Option<String>,
    pub primary_key: bool,
    pub hidden: bool,
    pub value_format_name: Option<String>,
    pub timeframes: Vec<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Measure {
    pub name: String,
    pub kind: Option<String>,
    pub label: Option<String>,
    pub description: Option<String>,
    pub sql: Option<String>,
    pub html: Option<String>,
    pub hidden: bool,
    pub value_format_name: Option<String>,
    pub precision: Option<f64>,
    pub drill_fields: Vec<String>,
    pub filters: Vec<(String, String)>,
}

/// Any node of a LookML project.
#[derive(Debug, Clone, PartialEq)]
pub enum LookmlNode {
    Model(Model),
    Explore(Explore),
    Join(Join),
    /// The body of an `always_filter`.
    Filters(Vec<(String, String)>),
    View(View),
    DerivedTable(DerivedTable),
    Dimension(Dimension),
    Measure(Measure),
}

impl LookmlNode {
    /// Short name of the variant, for messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            LookmlNode::Model(_) => "model",
            LookmlNode::Explore(_) => "explore",
            LookmlNode::Join(_) => "join",
            LookmlNode::Filters(_) => "filters",
            LookmlNode::View(_) => "view",
            LookmlNode::DerivedTable(_) => "derived_table",
            LookmlNode::Dimension(_) => "dimension",
            LookmlNode::Measure(_) => "measure",
        }
    }
}

/// Why a LookML document could not be turned into a [`Project`].
#[derive(Debug, Error)]
pub enum LookmlError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("document has {} validation error(s)", errors.len())]
    Invalid { errors: Vec<ValidationError> },
}

fn ignored(owner: &str, name: &str, field: &Field<LookmlNode>) {
    let kind = match field {
        Field::Value(value) => value.kind_name(),
        Field::Node(node) => node.kind_name(),
    };
    trace!(owner, name, kind, "field not used");
}

fn instance_name(instance: Option<&str>) -> String {
    instance.unwrap_or_default().to_owned()
}

struct ModelBuilder(Model);

impl NodeBuilder<LookmlNode> for ModelBuilder {
    fn accept(&mut self, name: &str, field: Field<LookmlNode>) {
        let model = &mut self.0;
        match (name, field) {
            ("label", field) => model.label = field.into_text(),
            ("connection", field) => model.connection = field.into_text(),
            ("include", field) => model.includes = field.into_texts(),
            ("explore", Field::Node(LookmlNode::Explore(explore))) => model.explores.push(explore),
            (name, field) => ignored("model", name, &field),
        }
    }

    fn build(self: Box<Self>) -> LookmlNode {
        LookmlNode::Model(self.0)
    }
}

struct ExploreBuilder(Explore);

impl NodeBuilder<LookmlNode> for ExploreBuilder {
    fn accept(&mut self, name: &str, field: Field<LookmlNode>) {
        let explore = &mut self.0;
        match (name, field) {
            ("label", field) => explore.label = field.into_text(),
            ("description", field) => explore.description = field.into_text(),
            ("view_name", field) => explore.view_name = field.into_text(),
            ("from", field) => explore.from = field.into_text(),
            ("hidden", field) => explore.hidden = field.as_bool().unwrap_or_default(),
            ("fields", field) => explore.fields = field.into_texts(),
            ("sql_always_where", field) => explore.sql_always_where = field.into_text(),
            ("always_filter", Field::Node(LookmlNode::Filters(filters))) => {
                explore.always_filter = filters
            }
            ("join", Field::Node(LookmlNode::Join(join))) => explore.joins.push(join),
            (name, field) => ignored("explore", name, &field),
        }
    }

    fn build(self: Box<Self>) -> LookmlNode {
        LookmlNode::Explore(self.0)
    }
}

struct JoinBuilder(Join);

impl NodeBuilder<LookmlNode> for JoinBuilder {
    fn accept(&mut self, name: &str, field: Field<LookmlNode>) {
        let join = &mut self.0;
        match name {
            "type" => join.join_type = field.into_text(),
            "relationship" => join.relationship = field.into_text(),
            "from" => join.from = field.into_text(),
            "view_label" => join.view_label = field.into_text(),
            "sql_on" => join.sql_on = field.into_text(),
            "fields" => join.fields = field.into_texts(),
            _ => ignored("join", name, &field),
        }
    }

    fn build(self: Box<Self>) -> LookmlNode {
        LookmlNode::Join(self.0)
    }
}

#[derive(Default)]
struct FiltersBuilder(Vec<(String, String)>);

impl NodeBuilder<LookmlNode> for FiltersBuilder {
    fn accept(&mut self, name: &str, field: Field<LookmlNode>) {
        match name {
            "filters" => self.0.extend(field.into_pairs()),
            _ => ignored("filters", name, &field),
        }
    }

    fn build(self: Box<Self>) -> LookmlNode {
        LookmlNode::Filters(self.0)
    }
}

struct ViewBuilder(View);

impl NodeBuilder<LookmlNode> for ViewBuilder {
    fn accept(&mut self, name: &str, field: Field<LookmlNode>) {
        let view = &mut self.0;
        match (name, field) {
            ("label", field) => view.label = field.into_text(),
            ("sql_table_name", field) => view.sql_table_name = field.into_text(),
            ("extends", field) => view.extends = field.into_texts(),
            ("drill_fields", field) => view.drill_fields = field.into_texts(),
            ("derived_table", Field::Node(LookmlNode::DerivedTable(table))) => {
                view.derived_table = Some(table)
            }
            ("dimension", Field::Node(LookmlNode::Dimension(dimension))) => {
                view.dimensions.push(dimension)
            }
            ("dimension_group", Field::Node(LookmlNode::Dimension(group))) => {
                view.dimension_groups.push(group)
            }
            ("measure", Field::Node(LookmlNode::Measure(measure))) => view.measures.push(measure),
            (name, field) => ignored("view", name, &field),
        }
    }

    fn build(self: Box<Self>) -> LookmlNode {
        LookmlNode::View(self.0)
    }
}

#[derive(Default)]
struct DerivedTableBuilder(DerivedTable);

impl NodeBuilder<LookmlNode> for DerivedTableBuilder {
    fn accept(&mut self, name: &str, field: Field<LookmlNode>) {
        let table = &mut self.0;
        match name {
            "sql" => table.sql = field.into_text(),
            "persist_for" => table.persist_for = field.into_text(),
            "indexes" => table.indexes = field.into_texts(),
            _ => ignored("derived_table", name, &field),
        }
    }

    fn build(self: Box<Self>) -> LookmlNode {
        LookmlNode::DerivedTable(self.0)
    }
}

struct DimensionBuilder(Dimension);

impl NodeBuilder<LookmlNode> for DimensionBuilder {
    fn accept(&mut self, name: &str, field: Field<LookmlNode>) {
        let dimension = &mut self.0;
        match name {
            "type" => dimension.kind = field.into_text(),
            "label" => dimension.label = field.into_text(),
            "description" => dimension.description = field.into_text(),
            "sql" => dimension.sql = field.into_text(),
            "html" => dimension.html = field.into_text(),
            "primary_key" => dimension.primary_key = field.as_bool().unwrap_or_default(),
            "hidden" => dimension.hidden = field.as_bool().unwrap_or_default(),
            "value_format_name" => dimension.value_format_name = field.into_text(),
            "timeframes" => dimension.timeframes = field.into_texts(),
            "tags" => dimension.tags = field.into_texts(),
            _ => ignored("dimension", name, &field),
        }
    }

    fn build(self: Box<Self>) -> LookmlNode {
        LookmlNode::Dimension(self.0)
    }
}

struct MeasureBuilder(Measure);

impl NodeBuilder<LookmlNode> for MeasureBuilder {
    fn accept(&mut self, name: &str, field: Field<LookmlNode>) {
        let measure = &mut self.0;
        match name {
            "type" => measure.kind = field.into_text(),
            "label" => measure.label = field.into_text(),
            "description" => measure.description = field.into_text(),
            "sql" => measure.sql = field.into_text(),
            "html" => measure.html = field.into_text(),
            "hidden" => measure.hidden = field.as_bool().unwrap_or_default(),
            "value_format_name" => measure.value_format_name = field.into_text(),
            "precision" => measure.precision = field.as_f64(),
            "drill_fields" => measure.drill_fields = field.into_texts(),
            "filters" => measure.filters = field.into_pairs(),
            _ => ignored("measure", name, &field),
        }
    }

    fn build(self: Box<Self>) -> LookmlNode {
        LookmlNode::Measure(self.0)
    }
}

/// Node builders for every object type of the LookML schema.
pub fn registry(schema: &Schema) -> Result<TypeRegistry<LookmlNode>, RegistryError> {
    TypeRegistry::<LookmlNode>::builder()
        .register("model", |name| {
            Box::new(ModelBuilder(Model {
                name: instance_name(name),
                ..Model::default()
            }))
        })
        .register("explore", |name| {
            Box::new(ExploreBuilder(Explore {
                name: instance_name(name),
                ..Explore::default()
            }))
        })
        .register("join", |name| {
            Box::new(JoinBuilder(Join {
                name: instance_name(name),
                ..Join::default()
            }))
        })
        .register("filters", |_| Box::new(FiltersBuilder::default()))
        .register("view", |name| {
            Box::new(ViewBuilder(View {
                name: instance_name(name),
                ..View::default()
            }))
        })
        .register("derived_table", |_| Box::new(DerivedTableBuilder::default()))
        .register("dimension", |name| {
            Box::new(DimensionBuilder(Dimension {
                name: instance_name(name),
                ..Dimension::default()
            }))
        })
        .register("measure", |name| {
            Box::new(MeasureBuilder(Measure {
                name: instance_name(name),
                ..Measure::default()
            }))
        })
        .build(schema)
}

/// Parse and validate a LookML document into a [`Project`].
///
/// Any validation error fails the whole document.
pub fn parse_lookml(source: &str) -> Result<Project, LookmlError> {
    let schema = lookml_schema()?;
    let registry = registry(&schema)?;
    let mut result = ValidationResult::ok();
    let nodes = build_nodes(source, &schema, &registry, &mut result)?;
    if !result.is_valid() {
        return Err(LookmlError::Invalid {
            errors: result.errors,
        });
    }

    let mut project = Project::default();
    for (_, node) in nodes {
        match node {
            LookmlNode::Model(model) => project.models.push(model),
            LookmlNode::View(view) => project.views.push(view),
            other => trace!(kind = other.kind_name(), "not a top-level node"),
        }
    }
    Ok(project)
}
