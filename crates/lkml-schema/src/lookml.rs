//! A bundled schema for LookML projects.

use crate::error::SchemaError;
use crate::meta::load_schema;
use crate::types::Schema;

/// Models with their explores and joins, and views with their dimensions,
/// measures and derived tables.
pub const LOOKML_SCHEMA_SOURCE: &str = include_str!("../schema/lookml.lkml");

/// Load [`LOOKML_SCHEMA_SOURCE`].
pub fn lookml_schema() -> Result<Schema, SchemaError> {
    load_schema(LOOKML_SCHEMA_SOURCE)
}
