//! Definition-time error types
//!
//! Error codes:
//! - DT_UNKNOWN_KIND
//! - DT_UNKNOWN_CONSTRAINT
//! - DT_CONSTRAINT_NOT_ALLOWED
//! - DT_INVALID_PARAM
//! - DT_INVALID_DATATYPE_DEFINITION
//! - DT_INVALID_MODULE_DEFINITION
//!
//! These are programmer errors in a declaration. They surface immediately
//! and are never captured by fulfillment's error-capture mode.

use thiserror::Error;

use super::constraint::ConstraintName;
use super::kind::Kind;

/// Result type for definition operations
pub type DefinitionResult<T> = Result<T, DefinitionError>;

/// Errors raised while building datatypes, modules or contexts
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    #[error("unknown datatype kind '{0}'")]
    UnknownKind(String),

    #[error("unknown constraint '{0}'")]
    UnknownConstraint(String),

    #[error("invalid argument {constraint} for datatype {kind}")]
    ConstraintNotAllowed {
        constraint: ConstraintName,
        kind: Kind,
    },

    #[error("invalid value for {constraint}: {reason}")]
    InvalidParam {
        constraint: ConstraintName,
        reason: String,
    },

    #[error("cannot create datatype from {0}")]
    MalformedDatatype(String),

    #[error("cannot instantiate module from {0}")]
    MalformedModule(String),
}

impl DefinitionError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            DefinitionError::UnknownKind(_) => "DT_UNKNOWN_KIND",
            DefinitionError::UnknownConstraint(_) => "DT_UNKNOWN_CONSTRAINT",
            DefinitionError::ConstraintNotAllowed { .. } => "DT_CONSTRAINT_NOT_ALLOWED",
            DefinitionError::InvalidParam { .. } => "DT_INVALID_PARAM",
            DefinitionError::MalformedDatatype(_) => "DT_INVALID_DATATYPE_DEFINITION",
            DefinitionError::MalformedModule(_) => "DT_INVALID_MODULE_DEFINITION",
        }
    }

    /// True for errors in a module declaration rather than a datatype declaration
    pub fn is_module_error(&self) -> bool {
        matches!(self, DefinitionError::MalformedModule(_))
    }

    pub(crate) fn invalid_param(constraint: ConstraintName, reason: impl Into<String>) -> Self {
        DefinitionError::InvalidParam {
            constraint,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(DefinitionError::UnknownKind("x".into()).code(), "DT_UNKNOWN_KIND");
        assert_eq!(
            DefinitionError::MalformedModule("x".into()).code(),
            "DT_INVALID_MODULE_DEFINITION"
        );
        assert_eq!(
            DefinitionError::ConstraintNotAllowed {
                constraint: ConstraintName::Regex,
                kind: Kind::Integer,
            }
            .code(),
            "DT_CONSTRAINT_NOT_ALLOWED"
        );
    }

    #[test]
    fn test_not_allowed_display() {
        let err = DefinitionError::ConstraintNotAllowed {
            constraint: ConstraintName::LengthMin,
            kind: Kind::Number,
        };
        assert_eq!(err.to_string(), "invalid argument length_min for datatype number");
    }

    #[test]
    fn test_module_error_family() {
        assert!(DefinitionError::MalformedModule("1".into()).is_module_error());
        assert!(!DefinitionError::MalformedDatatype("1".into()).is_module_error());
    }
}
