//! Argument guard errors

use thiserror::Error;

use crate::datatype::DefinitionError;
use crate::fulfill::{FulfillError, ValidationError};
use crate::registry::LookupError;

/// Result type for guard operations
pub type GuardResult<T> = Result<T, GuardError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GuardError {
    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error("argument '{param}' rejected: {error}")]
    Rejected { param: String, error: FulfillError },
}

impl GuardError {
    pub fn code(&self) -> &'static str {
        match self {
            GuardError::Lookup(e) => e.code(),
            GuardError::Definition(e) => e.code(),
            GuardError::Rejected { error, .. } => error.code(),
        }
    }

    /// The rejected parameter, if an argument failed validation
    pub fn param(&self) -> Option<&str> {
        match self {
            GuardError::Rejected { param, .. } => Some(param),
            _ => None,
        }
    }

    pub fn validation_error(&self) -> Option<&ValidationError> {
        match self {
            GuardError::Rejected { error, .. } => error.as_validation(),
            _ => None,
        }
    }
}
