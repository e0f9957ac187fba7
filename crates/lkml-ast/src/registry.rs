//! Node builder factories by object type name.

use std::collections::HashMap;
use std::fmt;

use lkml_schema::Schema;
use thiserror::Error;
use tracing::{debug, warn};

use crate::node::NodeBuilder;

/// Creates a node builder for an object, given its instance name (`None`
/// for anonymous objects).
pub type Factory<T> = Box<dyn Fn(Option<&str>) -> Box<dyn NodeBuilder<T>> + Send + Sync>;

/// A registry does not fit its schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("no node builder registered for object type '{object_type}'")]
    MissingFactory { object_type: String },
}

/// Node builder factories for every object type a schema can reach.
pub struct TypeRegistry<T> {
    factories: HashMap<String, Factory<T>>,
}

impl<T> TypeRegistry<T> {
    pub fn builder() -> RegistryBuilder<T> {
        RegistryBuilder {
            factories: HashMap::new(),
        }
    }

    /// A fresh builder for an object of type `type_name`.
    pub fn create(&self, type_name: &str, instance: Option<&str>) -> Option<Box<dyn NodeBuilder<T>>> {
        self.factories.get(type_name).map(|factory| factory(instance))
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.factories.contains_key(type_name)
    }
}

impl<T> fmt::Debug for TypeRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("TypeRegistry").field("types", &names).finish()
    }
}

/// Collects factories for a [`TypeRegistry`].
pub struct RegistryBuilder<T> {
    factories: HashMap<String, Factory<T>>,
}

impl<T> RegistryBuilder<T> {
    /// Register the factory for object type `type_name`, replacing any
    /// earlier one.
    pub fn register<F>(mut self, type_name: &str, factory: F) -> Self
    where
        F: Fn(Option<&str>) -> Box<dyn NodeBuilder<T>> + Send + Sync + 'static,
    {
        self.factories.insert(type_name.to_owned(), Box::new(factory));
        self
    }

    /// Check that every object type reachable from `schema`'s root has a
    /// factory.
    pub fn build(self, schema: &Schema) -> Result<TypeRegistry<T>, RegistryError> {
        let reachable = schema.reachable_object_types();
        if let Some(missing) = reachable
            .iter()
            .find(|name| !self.factories.contains_key(**name))
        {
            return Err(RegistryError::MissingFactory {
                object_type: (*missing).to_owned(),
            });
        }
        for name in self.factories.keys() {
            if !reachable.contains(name.as_str()) {
                warn!(object_type = %name, schema = schema.name(), "factory for unreachable object type");
            }
        }
        debug!(
            schema = schema.name(),
            types = self.factories.len(),
            "type registry ready"
        );
        Ok(TypeRegistry {
            factories: self.factories,
        })
    }
}
