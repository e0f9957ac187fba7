//! Typed AST building for schema-validated documents.
//!
//! A [`TypeRegistry`] maps object type names to [`NodeBuilder`] factories.
//! [`AstBuilder`] consumes the event protocol, usually behind a validating
//! handler, and assembles domain nodes bottom-up: a child node is built when
//! its object closes and handed to the builder of the enclosing object.
//!
//! The [`lookml`] module is a complete example for LookML projects.

mod builder;
pub mod lookml;
mod node;
mod registry;

pub use builder::{AstBuilder, build_nodes};
pub use node::{Field, NodeBuilder};
pub use registry::{Factory, RegistryBuilder, RegistryError, TypeRegistry};
