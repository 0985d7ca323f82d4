//! Fulfillment engine
//!
//! Checks whether a concrete value satisfies a datatype: first the kind,
//! then every constraint, recursing into list items and dict fields.
//!
//! # Error semantics
//!
//! - Validation failures propagate unless the catching form is used
//! - Definition errors from lazily promoted mappings always propagate
//! - No partial success: any failing sub-check fails the whole value

mod config;
mod errors;
mod validator;

pub use config::{EngineConfig, RegexMode};
pub use errors::{Found, FulfillError, FulfillResult, ValidationError};
pub use validator::{Fulfillment, Validator};

use serde_json::Value;

use crate::datatype::{Datatype, DefinitionResult};

/// Checks `value` against `datatype` with the default configuration.
///
/// Returns `Ok(true)` when every check holds.
pub fn fulfill(value: &Value, datatype: &Datatype) -> FulfillResult<bool> {
    Validator::default().fulfill(value, datatype)
}

/// Checks `value` against `datatype`, returning validation failures as a value.
pub fn fulfill_catching(value: &Value, datatype: &Datatype) -> DefinitionResult<Fulfillment> {
    Validator::default().fulfill_catching(value, datatype)
}
