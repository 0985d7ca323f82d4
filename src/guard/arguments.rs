//! Argument guard
//!
//! Declares a datatype per parameter and validates a call's arguments before
//! the wrapped function runs. A parameter's datatype is given inline, as a
//! declarative mapping, or by name resolved through a [`DatatypeSource`].
//!
//! Names and mappings are resolved once, when the guard is built.

use serde_json::{Map, Value};

use super::errors::{GuardError, GuardResult};
use crate::datatype::Datatype;
use crate::fulfill::Validator;
use crate::observability::{Event, Logger};
use crate::registry::{DatatypeSource, LookupError};

/// Arguments of a guarded call, by parameter name
pub type Arguments = Map<String, Value>;

/// How a parameter's datatype is declared.
#[derive(Debug, Clone)]
pub enum DatatypeRef {
    /// Resolved through the guard's source
    Named(String),
    Inline(Datatype),
    /// A `{"type": ...}` mapping
    Mapping(Value),
}

impl From<&str> for DatatypeRef {
    fn from(name: &str) -> Self {
        DatatypeRef::Named(name.to_string())
    }
}

impl From<String> for DatatypeRef {
    fn from(name: String) -> Self {
        DatatypeRef::Named(name)
    }
}

impl From<Datatype> for DatatypeRef {
    fn from(datatype: Datatype) -> Self {
        DatatypeRef::Inline(datatype)
    }
}

impl From<Value> for DatatypeRef {
    fn from(definition: Value) -> Self {
        DatatypeRef::Mapping(definition)
    }
}

/// Validates arguments against per-parameter datatypes.
#[derive(Debug, Clone)]
pub struct ArgumentGuard {
    params: Vec<(String, Datatype)>,
    validator: Validator,
}

impl ArgumentGuard {
    /// Builds a guard without a lookup source; named references fail.
    pub fn new<I, K, R>(params: I) -> GuardResult<Self>
    where
        I: IntoIterator<Item = (K, R)>,
        K: Into<String>,
        R: Into<DatatypeRef>,
    {
        Self::build(None, params)
    }

    /// Builds a guard resolving named references through `source`.
    pub fn with_source<S, I, K, R>(source: &S, params: I) -> GuardResult<Self>
    where
        S: DatatypeSource,
        I: IntoIterator<Item = (K, R)>,
        K: Into<String>,
        R: Into<DatatypeRef>,
    {
        Self::build(Some(source as &dyn DatatypeSource), params)
    }

    fn build<I, K, R>(source: Option<&dyn DatatypeSource>, params: I) -> GuardResult<Self>
    where
        I: IntoIterator<Item = (K, R)>,
        K: Into<String>,
        R: Into<DatatypeRef>,
    {
        let params = params
            .into_iter()
            .map(|(param, reference)| -> GuardResult<(String, Datatype)> {
                let datatype = resolve(source, reference.into())?;
                Ok((param.into(), datatype))
            })
            .collect::<GuardResult<Vec<_>>>()?;

        Ok(Self {
            params,
            validator: Validator::default(),
        })
    }

    /// Replaces the validator used for checks.
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    /// Guarded parameter names in declaration order
    pub fn params(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|(param, _)| param.as_str())
    }

    /// Validates every guarded parameter present in `args`.
    ///
    /// Absent parameters and undeclared arguments are not checked.
    pub fn check(&self, args: &Arguments) -> GuardResult<()> {
        for (param, datatype) in &self.params {
            let Some(value) = args.get(param) else {
                continue;
            };
            if let Err(error) = self.validator.fulfill(value, datatype) {
                Logger::info(
                    Event::GuardRejected,
                    &[("code", error.code()), ("param", param.as_str())],
                );
                return Err(GuardError::Rejected {
                    param: param.clone(),
                    error,
                });
            }
        }
        Ok(())
    }

    /// Checks `args`, then calls `f` with them.
    pub fn call<F, T>(&self, args: &Arguments, f: F) -> GuardResult<T>
    where
        F: FnOnce(&Arguments) -> T,
    {
        self.check(args)?;
        Ok(f(args))
    }
}

fn resolve(source: Option<&dyn DatatypeSource>, reference: DatatypeRef) -> GuardResult<Datatype> {
    match reference {
        DatatypeRef::Inline(datatype) => Ok(datatype),
        DatatypeRef::Mapping(definition) => Ok(Datatype::from_mapping(&definition)?),
        DatatypeRef::Named(name) => match source {
            Some(source) => Ok(source.get_datatype(&name)?.clone()),
            None => Err(LookupError::not_found(name).into()),
        },
    }
}
