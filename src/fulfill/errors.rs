//! Validation-time error types
//!
//! Error codes:
//! - DT_TYPE_MISMATCH
//! - DT_INVALID_INTEGER
//! - DT_INVALID_VALUE
//! - DT_DEPTH_EXCEEDED

use serde_json::Value;
use std::fmt;
use thiserror::Error;

use crate::datatype::{ConstraintName, DefinitionError, Kind};

/// Result type for fulfillment
pub type FulfillResult<T> = Result<T, FulfillError>;

/// The value found where a type was expected
#[derive(Debug, Clone, PartialEq)]
pub enum Found {
    Value(Value),
    /// A declared dict field absent from the mapping
    Missing,
}

impl From<Option<&Value>> for Found {
    fn from(value: Option<&Value>) -> Self {
        match value {
            Some(v) => Found::Value(v.clone()),
            None => Found::Missing,
        }
    }
}

impl fmt::Display for Found {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Found::Value(v) => write!(f, "{}", v),
            Found::Missing => write!(f, "<missing>"),
        }
    }
}

/// A value that does not fulfill a datatype
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("invalid value for {expected} at {path}: {found} (type mismatch)")]
    TypeMismatch {
        path: String,
        expected: Kind,
        found: Found,
    },

    #[error("{value} is not an integer (at {path})")]
    InvalidInteger { path: String, value: Value },

    #[error("invalid value {value} for definition {constraint} {expected} (at {path})")]
    InvalidValue {
        path: String,
        value: Value,
        constraint: ConstraintName,
        expected: String,
    },

    #[error("nesting deeper than {limit} levels at {path}")]
    DepthExceeded { path: String, limit: usize },
}

impl ValidationError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::TypeMismatch { .. } => "DT_TYPE_MISMATCH",
            ValidationError::InvalidInteger { .. } => "DT_INVALID_INTEGER",
            ValidationError::InvalidValue { .. } => "DT_INVALID_VALUE",
            ValidationError::DepthExceeded { .. } => "DT_DEPTH_EXCEEDED",
        }
    }

    /// Location of the failing value, `$` being the root
    pub fn path(&self) -> &str {
        match self {
            ValidationError::TypeMismatch { path, .. }
            | ValidationError::InvalidInteger { path, .. }
            | ValidationError::InvalidValue { path, .. }
            | ValidationError::DepthExceeded { path, .. } => path,
        }
    }

    /// The violated constraint, for `InvalidValue`
    pub fn constraint(&self) -> Option<ConstraintName> {
        match self {
            ValidationError::InvalidValue { constraint, .. } => Some(*constraint),
            _ => None,
        }
    }
}

/// Failure of a fulfillment call.
///
/// A `Definition` error comes from promoting a nested mapping that turns out
/// to be malformed; it is a programmer error and is never captured.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FulfillError {
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl FulfillError {
    pub fn code(&self) -> &'static str {
        match self {
            FulfillError::Definition(e) => e.code(),
            FulfillError::Validation(e) => e.code(),
        }
    }

    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            FulfillError::Validation(e) => Some(e),
            FulfillError::Definition(_) => None,
        }
    }
}
