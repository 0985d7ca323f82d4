//! Base kinds a datatype can declare
//!
//! Each kind fixes the runtime shape a value must have and the set of
//! constraints a definition may attach to it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::constraint::ConstraintName;
use super::errors::DefinitionError;

/// Base kind of a datatype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// UTF-8 text
    String,
    /// Whole number (whole-valued floats included)
    Integer,
    /// Any numeric value
    Number,
    /// Ordered sequence
    List,
    /// String-keyed mapping
    Dict,
}

const NUMERIC_CONSTRAINTS: &[ConstraintName] = &[
    ConstraintName::Eq,
    ConstraintName::Ne,
    ConstraintName::Gt,
    ConstraintName::Lt,
    ConstraintName::Gte,
    ConstraintName::Lte,
    ConstraintName::In,
    ConstraintName::NotIn,
];

const STRING_CONSTRAINTS: &[ConstraintName] = &[
    ConstraintName::Eq,
    ConstraintName::Ne,
    ConstraintName::Length,
    ConstraintName::LengthMin,
    ConstraintName::LengthMax,
    ConstraintName::Regex,
    ConstraintName::In,
    ConstraintName::NotIn,
    ConstraintName::Contains,
    ConstraintName::NotContains,
];

const LIST_CONSTRAINTS: &[ConstraintName] = &[
    ConstraintName::Length,
    ConstraintName::LengthMin,
    ConstraintName::LengthMax,
    ConstraintName::Items,
    ConstraintName::Contains,
    ConstraintName::NotContains,
];

const DICT_CONSTRAINTS: &[ConstraintName] = &[ConstraintName::Fields, ConstraintName::Required];

impl Kind {
    /// Returns the declarative name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::String => "string",
            Kind::Integer => "integer",
            Kind::Number => "number",
            Kind::List => "list",
            Kind::Dict => "dict",
        }
    }

    /// Constraints a definition of this kind may declare
    pub fn allowed_constraints(&self) -> &'static [ConstraintName] {
        match self {
            Kind::Integer | Kind::Number => NUMERIC_CONSTRAINTS,
            Kind::String => STRING_CONSTRAINTS,
            Kind::List => LIST_CONSTRAINTS,
            Kind::Dict => DICT_CONSTRAINTS,
        }
    }

    pub fn allows(&self, name: ConstraintName) -> bool {
        self.allowed_constraints().contains(&name)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Kind::Integer | Kind::Number)
    }
}

impl FromStr for Kind {
    type Err = DefinitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(Kind::String),
            "integer" => Ok(Kind::Integer),
            "number" => Ok(Kind::Number),
            "list" => Ok(Kind::List),
            "dict" => Ok(Kind::Dict),
            other => Err(DefinitionError::UnknownKind(other.to_string())),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
