//! The datatype value object
//!
//! A datatype is a base [`Kind`] plus a set of typed constraints. Every
//! constraint name is checked against the kind when the datatype is built;
//! after that the datatype is immutable.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

use super::constraint::{Constraint, ConstraintName, Param};
use super::errors::{DefinitionError, DefinitionResult};
use super::kind::Kind;
use crate::observability::{Event, Logger};

/// Key holding the kind in a declarative datatype mapping
pub const TYPE_KEY: &str = "type";

/// An immutable validation rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Datatype {
    kind: Kind,
    constraints: BTreeMap<ConstraintName, Constraint>,
}

impl Datatype {
    /// Creates a datatype with no constraints.
    pub fn new(kind: Kind) -> Self {
        Self {
            kind,
            constraints: BTreeMap::new(),
        }
    }

    /// Defines a datatype from a kind and named constraint values.
    ///
    /// # Errors
    ///
    /// Returns `DefinitionError` if:
    /// - a name is not a known constraint (DT_UNKNOWN_CONSTRAINT)
    /// - a constraint is not allowed for `kind` (DT_CONSTRAINT_NOT_ALLOWED)
    /// - a constraint value has the wrong shape (DT_INVALID_PARAM)
    pub fn define<I, K, P>(kind: Kind, params: I) -> DefinitionResult<Self>
    where
        I: IntoIterator<Item = (K, P)>,
        K: AsRef<str>,
        P: Into<Param>,
    {
        let mut constraints = BTreeMap::new();

        for (key, param) in params {
            let name: ConstraintName = key.as_ref().parse()?;
            if !kind.allows(name) {
                return Err(DefinitionError::ConstraintNotAllowed {
                    constraint: name,
                    kind,
                });
            }
            constraints.insert(name, Constraint::parse(name, kind, param.into())?);
        }

        Logger::trace(
            Event::DatatypeDefined,
            &[
                ("constraints", &constraints.len().to_string()),
                ("kind", kind.as_str()),
            ],
        );

        Ok(Self { kind, constraints })
    }

    /// Builds a datatype from a declarative mapping such as
    /// `{"type": "string", "length_min": 1}`.
    pub fn from_mapping(definition: &Value) -> DefinitionResult<Self> {
        match definition {
            Value::Object(map) => Self::from_map(map),
            other => Err(DefinitionError::MalformedDatatype(other.to_string())),
        }
    }

    /// Same as [`Datatype::from_mapping`] for an already unwrapped object.
    pub fn from_map(map: &Map<String, Value>) -> DefinitionResult<Self> {
        let kind = match map.get(TYPE_KEY) {
            Some(Value::String(name)) => name.parse::<Kind>()?,
            Some(other) => return Err(DefinitionError::UnknownKind(other.to_string())),
            None => {
                return Err(DefinitionError::MalformedDatatype(format!(
                    "{} (missing '{}')",
                    Value::Object(map.clone()),
                    TYPE_KEY
                )))
            }
        };

        let params = map
            .iter()
            .filter(|(key, _)| key.as_str() != TYPE_KEY)
            .map(|(key, value)| (key.as_str(), Param::Value(value.clone())));

        Self::define(kind, params)
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Returns constraints in evaluation order.
    pub fn constraints(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints.values()
    }

    pub fn constraint(&self, name: ConstraintName) -> Option<&Constraint> {
        self.constraints.get(&name)
    }

    pub fn has_constraints(&self) -> bool {
        !self.constraints.is_empty()
    }
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Datatype(\"{}\", {{", self.kind)?;
        for (i, constraint) in self.constraints.values().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", constraint.name(), constraint.expected())?;
        }
        write!(f, "}})")
    }
}
