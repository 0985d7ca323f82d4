//! Qualified datatype names
//!
//! Syntax: `[namespace:][module:]datatype`

use std::fmt;

use super::errors::{LookupError, LookupResult};

pub const NAME_SEPARATOR: char = ':';

/// A parsed datatype name with its optional qualifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualifiedName<'a> {
    pub namespace: Option<&'a str>,
    pub module: Option<&'a str>,
    pub datatype: &'a str,
}

impl<'a> QualifiedName<'a> {
    /// Splits a name into one to three segments.
    ///
    /// # Errors
    ///
    /// Returns `LookupError::MalformedName` for any other segment count.
    pub fn parse(name: &'a str) -> LookupResult<Self> {
        let segments: Vec<&str> = name.split(NAME_SEPARATOR).collect();
        match segments[..] {
            [datatype] => Ok(Self {
                namespace: None,
                module: None,
                datatype,
            }),
            [module, datatype] => Ok(Self {
                namespace: None,
                module: Some(module),
                datatype,
            }),
            [namespace, module, datatype] => Ok(Self {
                namespace: Some(namespace),
                module: Some(module),
                datatype,
            }),
            _ => Err(LookupError::MalformedName {
                name: name.to_string(),
                segments: segments.len(),
            }),
        }
    }
}

impl fmt::Display for QualifiedName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(namespace) = self.namespace {
            write!(f, "{}{}", namespace, NAME_SEPARATOR)?;
        }
        if let Some(module) = self.module {
            write!(f, "{}{}", module, NAME_SEPARATOR)?;
        }
        write!(f, "{}", self.datatype)
    }
}
