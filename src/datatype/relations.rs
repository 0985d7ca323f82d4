//! Scalar constraint evaluators
//!
//! Pure predicates over `(value, expected)`. A predicate whose operands do not
//! fit the relation returns `false`; nothing here panics or passes silently.

use serde_json::{Number, Value};
use std::cmp::Ordering;

use super::constraint::{Pattern, RegexMode};

/// Orders two JSON numbers exactly, including integers against floats.
pub fn compare_numbers(a: &Number, b: &Number) -> Option<Ordering> {
    match (as_integer(a), as_integer(b)) {
        (Some(x), Some(y)) => Some(x.cmp(&y)),
        (Some(x), None) => compare_integer_float(x, b.as_f64()?),
        (None, Some(y)) => compare_integer_float(y, a.as_f64()?).map(Ordering::reverse),
        (None, None) => a.as_f64()?.partial_cmp(&b.as_f64()?),
    }
}

fn as_integer(n: &Number) -> Option<i128> {
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
}

/// 2^127, the first float above every `i128`
const I128_BOUND: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;

/// Orders an integer against a float without rounding the integer.
fn compare_integer_float(x: i128, f: f64) -> Option<Ordering> {
    if f.is_nan() {
        return None;
    }
    if f >= I128_BOUND {
        return Some(Ordering::Less);
    }
    if f < -I128_BOUND {
        return Some(Ordering::Greater);
    }

    // |whole| <= 2^127 and integral, so the cast is exact
    let whole = f.trunc();
    match x.cmp(&(whole as i128)) {
        Ordering::Equal => 0.0_f64.partial_cmp(&(f - whole)),
        unequal => Some(unequal),
    }
}

/// Equality with numeric coercion, so `3` equals `3.0`.
pub fn equal(value: &Value, expected: &Value) -> bool {
    match (value, expected) {
        (Value::Number(a), Value::Number(b)) => compare_numbers(a, b) == Some(Ordering::Equal),
        _ => value == expected,
    }
}

pub fn not_equal(value: &Value, expected: &Value) -> bool {
    !equal(value, expected)
}

fn ordering(value: &Value, bound: &Number) -> Option<Ordering> {
    match value {
        Value::Number(n) => compare_numbers(n, bound),
        _ => None,
    }
}

pub fn greater_than(value: &Value, bound: &Number) -> bool {
    ordering(value, bound) == Some(Ordering::Greater)
}

pub fn less_than(value: &Value, bound: &Number) -> bool {
    ordering(value, bound) == Some(Ordering::Less)
}

pub fn greater_or_equal(value: &Value, bound: &Number) -> bool {
    matches!(ordering(value, bound), Some(Ordering::Greater | Ordering::Equal))
}

pub fn less_or_equal(value: &Value, bound: &Number) -> bool {
    matches!(ordering(value, bound), Some(Ordering::Less | Ordering::Equal))
}

/// Size of a value: characters of a string, elements of a list, entries of a mapping.
pub fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        Value::Object(map) => Some(map.len()),
        _ => None,
    }
}

pub fn length_equal(value: &Value, expected: usize) -> bool {
    length_of(value) == Some(expected)
}

pub fn length_at_least(value: &Value, min: usize) -> bool {
    length_of(value).is_some_and(|len| len >= min)
}

pub fn length_at_most(value: &Value, max: usize) -> bool {
    length_of(value).is_some_and(|len| len <= max)
}

pub fn regex_matches(value: &Value, pattern: &Pattern, mode: RegexMode) -> bool {
    value.as_str().is_some_and(|text| pattern.matches(text, mode))
}

pub fn one_of(value: &Value, options: &[Value]) -> bool {
    options.iter().any(|option| equal(value, option))
}

/// Substring test for strings, membership test for lists.
pub fn contains(value: &Value, needle: &Value) -> bool {
    match (value, needle) {
        (Value::String(text), Value::String(part)) => text.contains(part.as_str()),
        (Value::Array(items), _) => items.iter().any(|item| equal(item, needle)),
        _ => false,
    }
}

pub fn has_keys(value: &Value, keys: &[String]) -> bool {
    value
        .as_object()
        .is_some_and(|map| keys.iter().all(|key| map.contains_key(key)))
}
