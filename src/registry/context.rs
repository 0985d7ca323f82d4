//! Context: an ordered registry of modules
//!
//! Resolution rules:
//! - Names are `[namespace:][module:]datatype`
//! - Modules are filtered by the qualifiers that are present
//! - Remaining modules are scanned in registration order
//! - The first module holding the local name wins
//!
//! A later module therefore acts as a fallback for names an earlier one
//! does not define, and never shadows an earlier definition.

use serde_json::{Map, Value};

use super::errors::{LookupError, LookupResult};
use super::module::{Module, DATATYPES_KEY};
use super::name::QualifiedName;
use crate::datatype::{Datatype, DefinitionError, DefinitionResult};
use crate::observability::{Event, Logger};

/// A module definition: either built already or a declarative mapping.
#[derive(Debug, Clone)]
pub enum ModuleDef {
    Module(Module),
    Mapping(Value),
}

impl ModuleDef {
    fn instantiate(self) -> DefinitionResult<Module> {
        match self {
            ModuleDef::Module(module) => Ok(module),
            ModuleDef::Mapping(definition) => Module::from_mapping(&definition),
        }
    }
}

impl From<Module> for ModuleDef {
    fn from(module: Module) -> Self {
        ModuleDef::Module(module)
    }
}

impl From<Value> for ModuleDef {
    fn from(definition: Value) -> Self {
        ModuleDef::Mapping(definition)
    }
}

/// Ordered collection of modules with qualified-name resolution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    modules: Vec<Module>,
}

impl Context {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a context, instantiating every module definition in order.
    pub fn load<I, D>(definitions: I) -> DefinitionResult<Self>
    where
        I: IntoIterator<Item = D>,
        D: Into<ModuleDef>,
    {
        let modules = definitions
            .into_iter()
            .map(|definition| ModuleDef::instantiate(definition.into()))
            .collect::<DefinitionResult<Vec<_>>>()?;

        Logger::info(
            Event::ContextLoaded,
            &[("modules", &modules.len().to_string())],
        );

        Ok(Self { modules })
    }

    /// Builds a context from a JSON array of module mappings.
    pub fn from_mapping(definitions: &Value) -> DefinitionResult<Self> {
        match definitions {
            Value::Array(items) => Self::load(items.iter().cloned()),
            other => Err(DefinitionError::MalformedModule(format!(
                "expected a list of modules, got {}",
                other
            ))),
        }
    }

    /// Appends a module; it resolves after every module already registered.
    pub fn push_module(&mut self, module: Module) {
        self.modules.push(module);
    }

    /// Modules in registration order
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Resolves a possibly qualified datatype name.
    ///
    /// # Errors
    ///
    /// - `LookupError::MalformedName` for more than three segments
    /// - `LookupError::NotFound` if no matching module defines the name
    pub fn get_datatype(&self, name: &str) -> LookupResult<&Datatype> {
        let qualified = QualifiedName::parse(name)?;

        self.modules
            .iter()
            .filter(|module| accepts(module, &qualified))
            .find_map(|module| module.get_datatype(qualified.datatype).ok())
            .ok_or_else(|| {
                Logger::trace(Event::DatatypeLookupFailed, &[("name", name)]);
                LookupError::not_found(name)
            })
    }

    /// Resolves several names in order. The first failure fails the batch.
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
}

fn accepts(module: &Module, name: &QualifiedName<'_>) -> bool {
    let namespace_ok = name
        .namespace
        .map_or(true, |namespace| module.namespace() == Some(namespace));
    let module_ok = name
        .module
        .map_or(true, |module_name| module.name() == Some(module_name));
    namespace_ok && module_ok
}

/// Builds a context from module definitions.
pub fn load_datatypes<I, D>(definitions: I) -> DefinitionResult<Context>
where
    I: IntoIterator<Item = D>,
    D: Into<ModuleDef>,
{
    Context::load(definitions)
}

/// Builds a context holding one anonymous module from a flat
/// `{name: definition}` mapping.
pub fn define_datatypes(definitions: &Value) -> DefinitionResult<Context> {
    let mut module = Map::new();
    module.insert(DATATYPES_KEY.to_string(), definitions.clone());
    Context::load([Value::Object(module)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatype::Kind;
    use serde_json::json;

    fn two_modules() -> Context {
        Context::load([
            json!({
                "name": "first",
                "datatypes": {"x": {"type": "string"}, "only_first": {"type": "dict"}}
            }),
            json!({
                "name": "second",
                "namespace": "acme",
                "datatypes": {"x": {"type": "number"}, "y": {"type": "list"}}
            }),
        ])
        .unwrap()
    }

    #[test]
    fn test_first_registered_wins() {
        let ctx = two_modules();
        for _ in 0..10 {
            assert_eq!(ctx.get_datatype("x").unwrap().kind(), Kind::String);
        }
    }

    #[test]
    fn test_later_module_is_fallback() {
        let ctx = two_modules();
        assert_eq!(ctx.get_datatype("y").unwrap().kind(), Kind::List);
        assert_eq!(ctx.get_datatype("only_first").unwrap().kind(), Kind::Dict);
    }

    #[test]
    fn test_module_qualifier() {
        let ctx = two_modules();
        assert_eq!(ctx.get_datatype("second:x").unwrap().kind(), Kind::Number);
        assert_eq!(ctx.get_datatype("first:x").unwrap().kind(), Kind::String);
        assert!(ctx.get_datatype("first:y").is_err());
    }

    #[test]
    fn test_namespace_qualifier() {
        let ctx = two_modules();
        assert_eq!(ctx.get_datatype("acme:second:x").unwrap().kind(), Kind::Number);
        // Modules without a namespace never match an explicit one
        assert!(ctx.get_datatype("acme:first:x").is_err());
    }

    #[test]
    fn test_lookup_errors() {
        let ctx = two_modules();
        let err = ctx.get_datatype("no:such:name").unwrap_err();
        assert_eq!(err.code(), "DT_DATATYPE_NOT_FOUND");
        assert_eq!(err.name(), "no:such:name");

        let err = ctx.get_datatype("a:b:c:d").unwrap_err();
        assert_eq!(err.code(), "DT_MALFORMED_DATATYPE_NAME");
    }

    #[test]
    fn test_get_datatypes_batch() {
        let ctx = two_modules();
        let found = ctx.get_datatypes(["y", "second:x"]).unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[1].kind(), Kind::Number);

        assert!(ctx.get_datatypes(Vec::<&str>::new()).unwrap().is_empty());
        assert!(ctx.get_datatypes(["x", "missing", "y"]).is_err());
    }

    #[test]
    fn test_load_mixes_modules_and_mappings() {
        let built = Module::named("built").with_datatype("z", Datatype::new(Kind::Integer));
        let ctx = Context::load([
            ModuleDef::from(built),
            ModuleDef::from(json!({"name": "raw", "datatypes": {"z": {"type": "string"}}})),
        ])
        .unwrap();
        assert_eq!(ctx.len(), 2);
        assert_eq!(ctx.get_datatype("z").unwrap().kind(), Kind::Integer);
    }

    #[test]
    fn test_load_rejects_malformed_module() {
        let err = Context::load([json!("not a module")]).unwrap_err();
        assert!(err.is_module_error());

        let err = Context::from_mapping(&json!({"name": "m"})).unwrap_err();
        assert!(err.is_module_error());
    }

    #[test]
    fn test_push_module_appends() {
        let mut ctx = two_modules();
        ctx.push_module(Module::named("third").with_datatype("x", Datatype::new(Kind::Dict)));
        assert_eq!(ctx.get_datatype("x").unwrap().kind(), Kind::String);
        assert_eq!(ctx.get_datatype("third:x").unwrap().kind(), Kind::Dict);
    }

    #[test]
    fn test_define_datatypes() {
        let ctx = define_datatypes(&json!({
            "positive": {"type": "number", "gt": 0}
        }))
        .unwrap();
        assert_eq!(ctx.len(), 1);
        assert_eq!(ctx.modules()[0].name(), None);
        assert_eq!(ctx.get_datatype("positive").unwrap().kind(), Kind::Number);
    }
}
