//! Observable engine events
//!
//! Events are explicit and typed.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A datatype was built from a definition
    DatatypeDefined,
    /// A module was built from a definition
    ModuleLoaded,
    /// A context was built from module definitions
    ContextLoaded,
    /// A datatype name could not be resolved
    DatatypeLookupFailed,
    /// A value did not fulfill a datatype
    FulfillRejected,
    /// An argument guard rejected an argument
    GuardRejected,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::DatatypeDefined => "DATATYPE_DEFINED",
            Event::ModuleLoaded => "MODULE_LOADED",
            Event::ContextLoaded => "CONTEXT_LOADED",
            Event::DatatypeLookupFailed => "DATATYPE_LOOKUP_FAILED",
            Event::FulfillRejected => "FULFILL_REJECTED",
            Event::GuardRejected => "GUARD_REJECTED",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
