//! Datatype model
//!
//! A datatype pairs a base kind with named constraints.
//!
//! # Design Principles
//!
//! - Constraint names are checked against the kind at definition time
//! - Constraint values are typed once, when defined
//! - Datatypes are immutable after construction
//! - Nested `items`/`fields` mappings are promoted lazily, per use

mod constraint;
mod errors;
mod kind;
pub mod relations;
mod types;

pub use constraint::{Constraint, ConstraintName, NestedDef, Param, Pattern, RegexMode};
pub use errors::{DefinitionError, DefinitionResult};
pub use kind::Kind;
pub use types::{Datatype, TYPE_KEY};

use serde_json::Value;

/// Defines a datatype from a kind and named constraint values.
pub fn define_datatype<I, K, P>(kind: Kind, params: I) -> DefinitionResult<Datatype>
where
    I: IntoIterator<Item = (K, P)>,
    K: AsRef<str>,
    P: Into<Param>,
{
    Datatype::define(kind, params)
}

/// Builds a datatype from a `{"type": ..., ...}` mapping.
pub fn datatype_from_mapping(definition: &Value) -> DefinitionResult<Datatype> {
    Datatype::from_mapping(definition)
}
