//! Datatype registry
//!
//! Modules group datatypes under local names; a context orders modules and
//! resolves `[namespace:][module:]datatype` names with first-match-wins
//! shadowing.
//!
//! Modules and contexts are immutable once built and can be shared
//! read-only without synchronization.

mod context;
mod errors;
mod module;
mod name;
mod source;

pub use context::{define_datatypes, load_datatypes, Context, ModuleDef};
pub use errors::{LookupError, LookupResult};
pub use module::{load_module, module_from_mapping, Module};
pub use name::QualifiedName;
pub use source::DatatypeSource;
