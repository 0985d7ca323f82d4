//! datatypes - A strict, declarative runtime validation engine
//!
//! Callers define named datatypes (string, integer, number, list, dict) with
//! constraints, group them into modules, register modules in a context, and
//! ask whether a value fulfills a datatype.
//!
//! ```
//! use datatypes::{define_datatypes, fulfill};
//! use serde_json::json;
//!
//! fn main() -> datatypes::Result<()> {
//!     let ctx = define_datatypes(&json!({
//!         "positive": {"type": "number", "gt": 0}
//!     }))?;
//!     let positive = ctx.get_datatype("positive")?;
//!
//!     assert!(fulfill(&json!(3), positive)?);
//!     assert!(fulfill(&json!(-3), positive).is_err());
//!     Ok(())
//! }
//! ```

pub mod datatype;
pub mod error;
pub mod fulfill;
pub mod guard;
pub mod observability;
pub mod registry;

pub use datatype::{
    datatype_from_mapping, define_datatype, Constraint, ConstraintName, Datatype, DefinitionError,
    DefinitionResult, Kind, NestedDef, Param, RegexMode,
};
pub use error::{Error, Result};
pub use fulfill::{
    fulfill, fulfill_catching, EngineConfig, Found, FulfillError, FulfillResult, Fulfillment,
    ValidationError, Validator,
};
pub use guard::{ArgumentGuard, Arguments, DatatypeRef, GuardError, GuardResult};
pub use registry::{
    define_datatypes, load_datatypes, load_module, module_from_mapping, Context, DatatypeSource,
    LookupError, LookupResult, Module, ModuleDef, QualifiedName,
};
