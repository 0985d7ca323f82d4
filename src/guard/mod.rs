//! Argument validation adapter
//!
//! Thin glue over the engine: resolves one datatype per parameter and runs
//! fulfillment on each argument before a wrapped function is called.

mod arguments;
mod errors;

pub use arguments::{ArgumentGuard, Arguments, DatatypeRef};
pub use errors::{GuardError, GuardResult};
