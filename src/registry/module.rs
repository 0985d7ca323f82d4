//! Modules: named, flat collections of datatypes
//!
//! Declarative form:
//!
//! ```json
//! {
//!   "name": "web",
//!   "namespace": "acme",
//!   "datatypes": {
//!     "url": {"type": "string", "regex": "https?://"}
//!   }
//! }
//! ```
//!
//! Every key is optional. Datatype mappings are promoted when the module is
//! built, unlike nested `items`/`fields` mappings.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::errors::{LookupError, LookupResult};
use crate::datatype::{Datatype, DefinitionError, DefinitionResult, NestedDef};
use crate::observability::{Event, Logger};

pub const NAME_KEY: &str = "name";
pub const NAMESPACE_KEY: &str = "namespace";
pub const DATATYPES_KEY: &str = "datatypes";

/// A named collection of datatypes, read-only once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Module {
    name: Option<String>,
    namespace: Option<String>,
    datatypes: BTreeMap<String, Datatype>,
}

impl Module {
    /// Creates an empty module.
    pub fn new(name: Option<String>) -> Self {
        Self {
            name,
            namespace: None,
            datatypes: BTreeMap::new(),
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::new(Some(name.into()))
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Adds a datatype under a local name, replacing any previous one.
    pub fn with_datatype(mut self, name: impl Into<String>, datatype: Datatype) -> Self {
        self.datatypes.insert(name.into(), datatype);
        self
    }

    /// Builds a module from entries that are datatypes or datatype mappings.
    pub fn from_definitions<I, K, D>(name: Option<String>, entries: I) -> DefinitionResult<Self>
    where
        I: IntoIterator<Item = (K, D)>,
        K: Into<String>,
        D: Into<NestedDef>,
    {
        let mut module = Self::new(name);
        for (key, entry) in entries {
            let nested: NestedDef = entry.into();
            let datatype = nested.promote()?.into_owned();
            module.datatypes.insert(key.into(), datatype);
        }
        Ok(module)
    }

    /// Builds a module from its declarative mapping.
    ///
    /// # Errors
    ///
    /// - `MalformedModule` if the mapping, its name, namespace or datatypes
    ///   section has the wrong shape, or an entry is not a mapping
    /// - any datatype definition error from an entry
    pub fn from_mapping(definition: &Value) -> DefinitionResult<Self> {
        let map = definition
            .as_object()
            .ok_or_else(|| DefinitionError::MalformedModule(definition.to_string()))?;

        let name = optional_string(map, NAME_KEY)?;
        let namespace = optional_string(map, NAMESPACE_KEY)?;

        let mut datatypes = BTreeMap::new();
        match map.get(DATATYPES_KEY) {
            None | Some(Value::Null) => {}
            Some(Value::Object(entries)) => {
                for (key, entry) in entries {
                    let datatype = match entry {
                        Value::Object(def) => Datatype::from_map(def)?,
                        other => {
                            return Err(DefinitionError::MalformedModule(format!(
                                "datatype '{}': {}",
                                key, other
                            )))
                        }
                    };
                    datatypes.insert(key.clone(), datatype);
                }
            }
            Some(other) => {
                return Err(DefinitionError::MalformedModule(format!(
                    "'{}' section {}",
                    DATATYPES_KEY, other
                )))
            }
        }

        Logger::trace(
            Event::ModuleLoaded,
            &[
                ("datatypes", &datatypes.len().to_string()),
                ("name", name.as_deref().unwrap_or("")),
            ],
        );

        Ok(Self {
            name,
            namespace,
            datatypes,
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Looks up a datatype by its exact local name.
    pub fn get_datatype(&self, name: &str) -> LookupResult<&Datatype> {
        self.datatypes
            .get(name)
            .ok_or_else(|| LookupError::not_found(name))
    }

    /// Looks up several datatypes, preserving order. The first miss fails the batch.
    pub fn get_datatypes<I, S>(&self, names: I) -> LookupResult<Vec<&Datatype>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .map(|name| self.get_datatype(name.as_ref()))
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.datatypes.contains_key(name)
    }

    /// Local datatype names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.datatypes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.datatypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datatypes.is_empty()
    }
}

fn optional_string(map: &Map<String, Value>, key: &str) -> DefinitionResult<Option<String>> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(DefinitionError::MalformedModule(format!(
            "'{}' must be a string, got {}",
            key, other
        ))),
    }
}

/// Builds a module from its declarative mapping.
pub fn module_from_mapping(definition: &Value) -> DefinitionResult<Module> {
    Module::from_mapping(definition)
}

/// Alias of [`module_from_mapping`].
pub fn load_module(definition: &Value) -> DefinitionResult<Module> {
    Module::from_mapping(definition)
}
