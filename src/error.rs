//! Crate-wide error type
//!
//! The three families stay distinct; this enum only lets callers carry any
//! of them through one `?` chain.

use thiserror::Error;

use crate::datatype::DefinitionError;
use crate::fulfill::{FulfillError, ValidationError};
use crate::guard::GuardError;
use crate::registry::LookupError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Guard(#[from] GuardError),
}

impl From<FulfillError> for Error {
    fn from(e: FulfillError) -> Self {
        match e {
            FulfillError::Definition(e) => Error::Definition(e),
            FulfillError::Validation(e) => Error::Validation(e),
        }
    }
}

impl Error {
    pub fn code(&self) -> &'static str {
        match self {
            Error::Definition(e) => e.code(),
            Error::Validation(e) => e.code(),
            Error::Lookup(e) => e.code(),
            Error::Guard(e) => e.code(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fulfill::Found;
    use crate::Kind;

    #[test]
    fn test_fulfill_error_splits_into_families() {
        let validation = ValidationError::TypeMismatch {
            path: "$".into(),
            expected: Kind::Dict,
            found: Found::Missing,
        };
        let err: Error = FulfillError::from(validation).into();
        assert!(err.is_validation());

        let err: Error = FulfillError::from(DefinitionError::UnknownKind("x".into())).into();
        assert_eq!(err.code(), "DT_UNKNOWN_KIND");
    }

    #[test]
    fn test_lookup_through_question_mark() {
        fn resolve(ctx: &crate::Context) -> Result<Kind> {
            Ok(ctx.get_datatype("missing")?.kind())
        }
        let err = resolve(&crate::Context::new()).unwrap_err();
        assert_eq!(err.code(), "DT_DATATYPE_NOT_FOUND");
    }
}
