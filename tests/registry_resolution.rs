//! Registry Resolution Tests
//!
//! - First registered module wins for an unqualified name
//! - Later modules serve as fallbacks, never as overrides
//! - Module and namespace qualifiers filter the scan
//! - Four or more name segments are malformed, distinct from not-found

use datatypes::{
    define_datatypes, fulfill, load_datatypes, Context, Datatype, DefinitionError, Kind,
    LookupError, Module,
};
use serde_json::json;

// =============================================================================
// Helper Functions
// =============================================================================

fn layered_context() -> Context {
    load_datatypes([
        json!({
            "name": "app",
            "namespace": "acme",
            "datatypes": {
                "x": {"type": "string"},
                "id": {"type": "integer", "gt": 0}
            }
        }),
        json!({
            "name": "base",
            "datatypes": {
                "x": {"type": "number"},
                "email": {"type": "string", "regex": "[^@]+@"}
            }
        }),
    ])
    .unwrap()
}

// =============================================================================
// Shadowing Tests
// =============================================================================

/// The first-registered module's datatype is returned, every time.
#[test]
fn test_first_registration_wins() {
    let ctx = layered_context();

    for _ in 0..20 {
        assert_eq!(ctx.get_datatype("x").unwrap().kind(), Kind::String);
    }
}

#[test]
fn test_later_module_is_fallback() {
    let ctx = layered_context();

    let email = ctx.get_datatype("email").unwrap();
    assert_eq!(fulfill(&json!("a@b.c"), email), Ok(true));
    assert!(fulfill(&json!("nobody"), email).is_err());
}

#[test]
fn test_pushed_module_goes_last() {
    let mut ctx = layered_context();
    ctx.push_module(
        Module::named("late")
            .with_datatype("x", Datatype::new(Kind::Dict))
            .with_datatype("flag", Datatype::new(Kind::Integer)),
    );

    assert_eq!(ctx.len(), 3);
    assert_eq!(ctx.get_datatype("x").unwrap().kind(), Kind::String);
    assert_eq!(ctx.get_datatype("late:x").unwrap().kind(), Kind::Dict);
    assert!(ctx.get_datatype("flag").is_ok());
}

// =============================================================================
// Qualified Name Tests
// =============================================================================

#[test]
fn test_module_qualifier_selects_module() {
    let ctx = layered_context();

    assert_eq!(ctx.get_datatype("base:x").unwrap().kind(), Kind::Number);
    assert_eq!(ctx.get_datatype("app:x").unwrap().kind(), Kind::String);
}

#[test]
fn test_namespace_qualifier() {
    let ctx = layered_context();

    assert_eq!(ctx.get_datatype("acme:app:id").unwrap().kind(), Kind::Integer);

    let err = ctx.get_datatype("other:app:id").unwrap_err();
    assert_eq!(err.code(), "DT_DATATYPE_NOT_FOUND");
    assert_eq!(err.name(), "other:app:id");
}

#[test]
fn test_not_found_versus_malformed() {
    let ctx = layered_context();

    let err = ctx.get_datatype("no:such:name").unwrap_err();
    assert!(matches!(err, LookupError::NotFound { .. }));

    let err = ctx.get_datatype("a:b:c:d").unwrap_err();
    assert_eq!(
        err,
        LookupError::MalformedName {
            name: "a:b:c:d".into(),
            segments: 4
        }
    );
    assert_eq!(err.code(), "DT_MALFORMED_DATATYPE_NAME");
}

#[test]
fn test_batch_lookup_fails_on_first_missing() {
    let ctx = layered_context();

    let found = ctx.get_datatypes(["x", "email"]).unwrap();
    assert_eq!(found.len(), 2);

    let err = ctx.get_datatypes(["x", "phone", "email"]).unwrap_err();
    assert_eq!(err.name(), "phone");
}

// =============================================================================
// Construction Tests
// =============================================================================

#[test]
fn test_define_datatypes_builds_single_module() {
    let ctx = define_datatypes(&json!({
        "positive": {"type": "number", "gt": 0},
        "tags": {"type": "list", "items": {"type": "string"}}
    }))
    .unwrap();

    assert_eq!(ctx.len(), 1);
    let tags = ctx.get_datatype("tags").unwrap();
    assert_eq!(fulfill(&json!(["a", "b"]), tags), Ok(true));
    assert!(fulfill(&json!(["a", 1]), tags).is_err());
}

#[test]
fn test_bad_module_definitions_rejected() {
    let err = load_datatypes([json!({"datatypes": {"x": "string"}})]).unwrap_err();
    assert!(matches!(err, DefinitionError::MalformedModule(_)));

    let err = load_datatypes([json!({"datatypes": {"x": {"type": "text"}}})]).unwrap_err();
    assert_eq!(err, DefinitionError::UnknownKind("text".into()));

    let err = Context::from_mapping(&json!({"not": "a list"})).unwrap_err();
    assert_eq!(err.code(), "DT_INVALID_MODULE_DEFINITION");
}
