//! Lookup error types
//!
//! Error codes:
//! - DT_DATATYPE_NOT_FOUND
//! - DT_MALFORMED_DATATYPE_NAME

use thiserror::Error;

/// Result type for lookups
pub type LookupResult<T> = Result<T, LookupError>;

/// A datatype name that cannot be resolved
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("datatype {name} not found")]
    NotFound { name: String },

    #[error("bad key for datatype: {name} ({segments} segments)")]
    MalformedName { name: String, segments: usize },
}

impl LookupError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            LookupError::NotFound { .. } => "DT_DATATYPE_NOT_FOUND",
            LookupError::MalformedName { .. } => "DT_MALFORMED_DATATYPE_NAME",
        }
    }

    /// The name as requested by the caller
    pub fn name(&self) -> &str {
        match self {
            LookupError::NotFound { name } | LookupError::MalformedName { name, .. } => name,
        }
    }

    pub(crate) fn not_found(name: impl Into<String>) -> Self {
        LookupError::NotFound { name: name.into() }
    }
}
