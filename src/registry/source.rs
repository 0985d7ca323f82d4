//! Lookup seam shared by modules and contexts

use super::context::Context;
use super::errors::LookupResult;
use super::module::Module;
use crate::datatype::Datatype;

/// Anything that resolves datatype names.
pub trait DatatypeSource {
    /// Resolves a single name.
    fn get_datatype(&self, name: &str) -> LookupResult<&Datatype>;
}

impl DatatypeSource for Module {
    fn get_datatype(&self, name: &str) -> LookupResult<&Datatype> {
        Module::get_datatype(self, name)
    }
}

impl DatatypeSource for Context {
    fn get_datatype(&self, name: &str) -> LookupResult<&Datatype> {
        Context::get_datatype(self, name)
    }
}
