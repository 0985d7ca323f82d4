//! Recursive fulfillment of datatypes
//!
//! Fulfillment semantics:
//! - The value's shape must match the datatype's kind
//! - Every constraint must hold, in constraint order
//! - `items` and `fields` recurse into nested values
//! - The first failing check aborts the whole fulfillment
//!
//! Fulfillment is a pure function of `(value, datatype)`: nothing is cached
//! and nothing is mutated.

use serde_json::{Number, Value};

use super::config::EngineConfig;
use super::errors::{Found, FulfillError, FulfillResult, ValidationError};
use crate::datatype::relations;
use crate::datatype::{Constraint, Datatype, DefinitionResult, Kind};
use crate::observability::{Event, Logger};

const ROOT_PATH: &str = "$";

/// Outcome of an error-capturing fulfillment.
#[derive(Debug, Clone, PartialEq)]
pub enum Fulfillment {
    Fulfilled,
    Rejected(ValidationError),
}

impl Fulfillment {
    pub fn is_fulfilled(&self) -> bool {
        matches!(self, Fulfillment::Fulfilled)
    }

    pub fn error(&self) -> Option<&ValidationError> {
        match self {
            Fulfillment::Fulfilled => None,
            Fulfillment::Rejected(e) => Some(e),
        }
    }

    /// Converts back to the propagating form
    pub fn into_result(self) -> Result<bool, ValidationError> {
        match self {
            Fulfillment::Fulfilled => Ok(true),
            Fulfillment::Rejected(e) => Err(e),
        }
    }
}

/// Validator that checks values against datatypes.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: EngineConfig,
}

impl Validator {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Checks that `value` fulfills `datatype`.
    ///
    /// Returns `Ok(true)` on success.
    ///
    /// # Errors
    ///
    /// - `FulfillError::Validation` with the first failing check
    /// - `FulfillError::Definition` if a nested mapping cannot be promoted
    pub fn fulfill(&self, value: &Value, datatype: &Datatype) -> FulfillResult<bool> {
        let result = self.check(Some(value), datatype, ROOT_PATH, 0);

        if let Err(FulfillError::Validation(ref e)) = result {
            if self.config.log_rejections {
                Logger::info(
                    Event::FulfillRejected,
                    &[
                        ("code", e.code()),
                        ("kind", datatype.kind().as_str()),
                        ("path", e.path()),
                    ],
                );
            }
        }

        result.map(|()| true)
    }

    /// Like [`Validator::fulfill`], but returns validation failures as a value.
    ///
    /// Definition errors still propagate.
    pub fn fulfill_catching(
        &self,
        value: &Value,
        datatype: &Datatype,
    ) -> DefinitionResult<Fulfillment> {
        match self.fulfill(value, datatype) {
            Ok(_) => Ok(Fulfillment::Fulfilled),
            Err(FulfillError::Validation(e)) => Ok(Fulfillment::Rejected(e)),
            Err(FulfillError::Definition(e)) => Err(e),
        }
    }

    fn check(
        &self,
        value: Option<&Value>,
        datatype: &Datatype,
        path: &str,
        depth: usize,
    ) -> FulfillResult<()> {
        if let Some(limit) = self.config.max_depth {
            if depth > limit {
                return Err(ValidationError::DepthExceeded {
                    path: path.to_string(),
                    limit,
                }
                .into());
            }
        }

        let value = check_type(value, datatype.kind(), path)?;

        for constraint in datatype.constraints() {
            self.check_constraint(value, constraint, path, depth)?;
        }

        Ok(())
    }

    fn check_constraint(
        &self,
        value: &Value,
        constraint: &Constraint,
        path: &str,
        depth: usize,
    ) -> FulfillResult<()> {
        let holds = match constraint {
            Constraint::Eq(expected) => relations::equal(value, expected),
            Constraint::Ne(expected) => relations::not_equal(value, expected),
            Constraint::Gt(bound) => relations::greater_than(value, bound),
            Constraint::Lt(bound) => relations::less_than(value, bound),
            Constraint::Gte(bound) => relations::greater_or_equal(value, bound),
            Constraint::Lte(bound) => relations::less_or_equal(value, bound),
            Constraint::Length(n) => relations::length_equal(value, *n),
            Constraint::LengthMin(n) => relations::length_at_least(value, *n),
            Constraint::LengthMax(n) => relations::length_at_most(value, *n),
            Constraint::Regex(pattern) => {
                relations::regex_matches(value, pattern, self.config.regex_mode)
            }
            Constraint::In(options) => relations::one_of(value, options),
            Constraint::NotIn(options) => !relations::one_of(value, options),
            Constraint::Contains(needle) => relations::contains(value, needle),
            Constraint::NotContains(needle) => {
                // Only meaningful where `contains` is
                relations::length_of(value).is_some() && !relations::contains(value, needle)
            }
            Constraint::Required(keys) => relations::has_keys(value, keys),
            Constraint::Items(nested) => match value.as_array() {
                Some(items) => {
                    for (i, item) in items.iter().enumerate() {
                        // Promoted per element: an empty list never builds the item type
                        let item_type = nested.promote()?;
                        self.check(Some(item), &item_type, &item_path(path, i), depth + 1)?;
                    }
                    true
                }
                None => false,
            },
            Constraint::Fields(fields) => match value.as_object() {
                Some(map) => {
                    for (key, nested) in fields {
                        let field_type = nested.promote()?;
                        self.check(map.get(key), &field_type, &field_path(path, key), depth + 1)?;
                    }
                    true
                }
                None => false,
            },
        };

        if holds {
            Ok(())
        } else {
            Err(ValidationError::InvalidValue {
                path: path.to_string(),
                value: value.clone(),
                constraint: constraint.name(),
                expected: constraint.expected(),
            }
            .into())
        }
    }
}

/// Checks that `value` has the runtime shape of `kind`.
fn check_type<'v>(
    value: Option<&'v Value>,
    kind: Kind,
    path: &str,
) -> Result<&'v Value, ValidationError> {
    let matches = match (kind, value) {
        (Kind::String, Some(Value::String(_)))
        | (Kind::Number, Some(Value::Number(_)))
        | (Kind::List, Some(Value::Array(_)))
        | (Kind::Dict, Some(Value::Object(_))) => true,
        (Kind::Integer, Some(Value::Number(n))) => {
            check_integer(n, path)?;
            true
        }
        _ => false,
    };

    match value {
        Some(v) if matches => Ok(v),
        _ => Err(ValidationError::TypeMismatch {
            path: path.to_string(),
            expected: kind,
            found: Found::from(value),
        }),
    }
}

/// Accepts integers and whole-valued floats.
fn check_integer(n: &Number, path: &str) -> Result<(), ValidationError> {
    if n.is_i64() || n.is_u64() {
        return Ok(());
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 => Ok(()),
        _ => Err(ValidationError::InvalidInteger {
            path: path.to_string(),
            value: Value::Number(n.clone()),
        }),
    }
}

fn item_path(prefix: &str, index: usize) -> String {
    format!("{}[{}]", prefix, index)
}

fn field_path(prefix: &str, key: &str) -> String {
    format!("{}.{}", prefix, key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatype::{ConstraintName, RegexMode};
    use crate::observability::capture_events;
    use serde_json::json;

    fn dt(definition: Value) -> Datatype {
        Datatype::from_mapping(&definition).unwrap()
    }

    fn validation_error(result: FulfillResult<bool>) -> ValidationError {
        match result {
            Err(FulfillError::Validation(e)) => e,
            other => panic!("expected a validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_string_length_min() {
        let v = Validator::default();
        let datatype = dt(json!({"type": "string", "length_min": 1}));

        assert_eq!(v.fulfill(&json!("abc"), &datatype).unwrap(), true);

        let err = validation_error(v.fulfill(&json!(""), &datatype));
        assert_eq!(err.code(), "DT_INVALID_VALUE");
        assert_eq!(err.constraint(), Some(ConstraintName::LengthMin));
    }

    #[test]
    fn test_type_mismatch_carries_kind_and_value() {
        let v = Validator::default();
        let err = validation_error(v.fulfill(&json!(1), &Datatype::new(Kind::String)));
        assert_eq!(
            err,
            ValidationError::TypeMismatch {
                path: "$".into(),
                expected: Kind::String,
                found: Found::Value(json!(1)),
            }
        );
    }

    #[test]
    fn test_integer_accepts_whole_float() {
        let v = Validator::default();
        let integer = Datatype::new(Kind::Integer);

        assert!(v.fulfill(&json!(3), &integer).is_ok());
        assert!(v.fulfill(&json!(3.0), &integer).is_ok());
        assert!(v.fulfill(&json!(-7.0), &integer).is_ok());

        let err = validation_error(v.fulfill(&json!(3.5), &integer));
        assert_eq!(err.code(), "DT_INVALID_INTEGER");
    }

    #[test]
    fn test_number_accepts_int_and_float() {
        let v = Validator::default();
        let number = Datatype::new(Kind::Number);
        assert!(v.fulfill(&json!(3), &number).is_ok());
        assert!(v.fulfill(&json!(3.5), &number).is_ok());
        assert_eq!(validation_error(v.fulfill(&json!("3"), &number)).code(), "DT_TYPE_MISMATCH");
    }

    #[test]
    fn test_booleans_and_null_match_nothing() {
        let v = Validator::default();
        for kind in [Kind::String, Kind::Integer, Kind::Number, Kind::List, Kind::Dict] {
            assert!(v.fulfill(&json!(true), &Datatype::new(kind)).is_err());
            assert!(v.fulfill(&json!(null), &Datatype::new(kind)).is_err());
        }
    }

    #[test]
    fn test_list_and_dict_shapes() {
        let v = Validator::default();
        assert!(v.fulfill(&json!([]), &Datatype::new(Kind::List)).is_ok());
        assert!(v.fulfill(&json!({}), &Datatype::new(Kind::List)).is_err());
        assert!(v.fulfill(&json!({}), &Datatype::new(Kind::Dict)).is_ok());
        assert!(v.fulfill(&json!([]), &Datatype::new(Kind::Dict)).is_err());
    }

    #[test]
    fn test_items_recurse() {
        let v = Validator::default();
        let item = dt(json!({"type": "integer", "gt": 0}));
        let list = Datatype::define(Kind::List, [("items", item)]).unwrap();

        assert!(v.fulfill(&json!([1, 2, 3]), &list).is_ok());
        assert!(v.fulfill(&json!([]), &list).is_ok());

        let err = validation_error(v.fulfill(&json!([1, 0, 3]), &list));
        assert_eq!(err.path(), "$[1]");
        assert_eq!(err.constraint(), Some(ConstraintName::Gt));
    }

    #[test]
    fn test_fields_missing_key_fails() {
        let v = Validator::default();
        let datatype = dt(json!({
            "type": "dict",
            "fields": {"a": {"type": "number", "gte": 0}}
        }));

        assert!(v.fulfill(&json!({"a": 5}), &datatype).is_ok());
        assert!(v.fulfill(&json!({"a": 5, "extra": "ok"}), &datatype).is_ok());

        let err = validation_error(v.fulfill(&json!({"b": 5}), &datatype));
        assert_eq!(
            err,
            ValidationError::TypeMismatch {
                path: "$.a".into(),
                expected: Kind::Number,
                found: Found::Missing,
            }
        );
    }

    #[test]
    fn test_nested_paths() {
        let v = Validator::default();
        let datatype = dt(json!({
            "type": "dict",
            "fields": {
                "users": {
                    "type": "list",
                    "items": {
                        "type": "dict",
                        "fields": {"email": {"type": "string", "regex": "[^@]+@"}}
                    }
                }
            }
        }));

        let value = json!({"users": [{"email": "a@x"}, {"email": "nope"}]});
        let err = validation_error(v.fulfill(&value, &datatype));
        assert_eq!(err.path(), "$.users[1].email");
    }

    #[test]
    fn test_lazy_promotion_error_propagates() {
        let v = Validator::default();
        let datatype = dt(json!({
            "type": "list",
            "items": {"type": "integer", "regex": "x"}
        }));

        // Nothing to promote for an empty list
        assert!(v.fulfill(&json!([]), &datatype).is_ok());

        let err = v.fulfill(&json!([1]), &datatype).unwrap_err();
        assert!(matches!(err, FulfillError::Definition(_)));

        let err = v.fulfill_catching(&json!([1]), &datatype).unwrap_err();
        assert_eq!(err.code(), "DT_CONSTRAINT_NOT_ALLOWED");
    }

    #[test]
    fn test_regex_prefix_semantics() {
        let v = Validator::default();
        let datatype = dt(json!({"type": "string", "regex": "[0-9]+"}));
        assert!(v.fulfill(&json!("123abc"), &datatype).is_ok());
        assert!(v.fulfill(&json!("abc123"), &datatype).is_err());

        let strict = Validator::new(EngineConfig::default().with_regex_mode(RegexMode::Full));
        assert!(strict.fulfill(&json!("123abc"), &datatype).is_err());
        assert!(strict.fulfill(&json!("123"), &datatype).is_ok());
    }

    #[test]
    fn test_depth_limit() {
        let v = Validator::new(EngineConfig::default().with_max_depth(1));
        let datatype = dt(json!({
            "type": "list",
            "items": {"type": "list", "items": {"type": "integer"}}
        }));

        assert!(v.fulfill(&json!([[]]), &datatype).is_ok());

        let err = validation_error(v.fulfill(&json!([[1]]), &datatype));
        assert_eq!(err.code(), "DT_DEPTH_EXCEEDED");
        assert_eq!(err.path(), "$[0][0]");
    }

    #[test]
    fn test_unlimited_depth_by_default() {
        let mut definition = json!({"type": "integer"});
        let mut value = json!(1);
        for _ in 0..100 {
            definition = json!({"type": "list", "items": definition});
            value = json!([value]);
        }
        let datatype = dt(definition);

        assert!(Validator::default().fulfill(&value, &datatype).is_ok());
    }

    fn rejected_events(lines: &[String]) -> Vec<Value> {
        lines
            .iter()
            .map(|line| serde_json::from_str::<Value>(line).unwrap())
            .filter(|event| event["event"] == "FULFILL_REJECTED")
            .collect()
    }

    #[test]
    fn test_rejection_logged_when_enabled() {
        let v = Validator::new(EngineConfig::default().with_log_rejections(true));
        let datatype = dt(json!({"type": "list", "items": {"type": "string"}}));

        let lines = capture_events(|| {
            assert!(v.fulfill(&json!(["a", 2]), &datatype).is_err());
        });
        let events = rejected_events(&lines);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0]["severity"], "INFO");
        assert_eq!(events[0]["code"], "DT_TYPE_MISMATCH");
        assert_eq!(events[0]["kind"], "list");
        assert_eq!(events[0]["path"], "$[1]");
    }

    #[test]
    fn test_rejection_silent_by_default() {
        let v = Validator::default();
        let datatype = dt(json!({"type": "integer", "gt": 0}));

        let lines = capture_events(|| {
            assert!(v.fulfill(&json!(0), &datatype).is_err());
            assert!(!v.fulfill_catching(&json!(-1), &datatype).unwrap().is_fulfilled());
        });
        assert!(rejected_events(&lines).is_empty());
    }

    #[test]
    fn test_fulfilled_value_never_logged() {
        let v = Validator::new(EngineConfig::default().with_log_rejections(true));
        let datatype = dt(json!({"type": "integer", "gt": 0}));

        let lines = capture_events(|| {
            assert!(v.fulfill(&json!(5), &datatype).is_ok());
        });
        assert!(rejected_events(&lines).is_empty());
    }

    #[test]
    fn test_catching_mode() {
        let v = Validator::default();
        let datatype = dt(json!({"type": "integer", "lt": 10}));

        assert_eq!(v.fulfill_catching(&json!(5), &datatype).unwrap(), Fulfillment::Fulfilled);

        let outcome = v.fulfill_catching(&json!(50), &datatype).unwrap();
        assert!(!outcome.is_fulfilled());
        assert_eq!(outcome.error().unwrap().code(), "DT_INVALID_VALUE");
        assert!(outcome.into_result().is_err());
    }

    #[test]
    fn test_supplemented_constraints() {
        let v = Validator::default();

        let color = dt(json!({"type": "string", "in": ["red", "green"]}));
        assert!(v.fulfill(&json!("red"), &color).is_ok());
        assert!(v.fulfill(&json!("blue"), &color).is_err());

        let not_zero = dt(json!({"type": "integer", "not_in": [0]}));
        assert!(v.fulfill(&json!(0.0), &not_zero).is_err());

        let tags = dt(json!({"type": "list", "contains": "rust", "not_contains": "java"}));
        assert!(v.fulfill(&json!(["rust", "go"]), &tags).is_ok());
        assert!(v.fulfill(&json!(["go"]), &tags).is_err());
        assert!(v.fulfill(&json!(["rust", "java"]), &tags).is_err());

        let record = dt(json!({"type": "dict", "required": ["id"]}));
        assert!(v.fulfill(&json!({"id": null}), &record).is_ok());
        assert!(v.fulfill(&json!({}), &record).is_err());
    }
}
