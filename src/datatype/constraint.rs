//! Constraint definitions attached to a datatype
//!
//! A definition names constraints by string (`"gt"`, `"length_min"`, ...).
//! Names are resolved to [`ConstraintName`] and their values are checked and
//! converted into a typed [`Constraint`] payload when the datatype is built,
//! so evaluation is an exhaustive match rather than a name lookup.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::errors::{DefinitionError, DefinitionResult};
use super::kind::Kind;
use super::types::Datatype;

/// Name of a constraint relation.
///
/// Declaration order is evaluation order: scalar relations run before the
/// structural ones that recurse into nested values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConstraintName {
    Eq,
    Ne,
    Gt,
    Lt,
    Gte,
    Lte,
    Length,
    LengthMin,
    LengthMax,
    Regex,
    In,
    NotIn,
    Contains,
    NotContains,
    Required,
    Items,
    Fields,
}

impl ConstraintName {
    /// Returns the declarative name of the constraint
    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintName::Eq => "eq",
            ConstraintName::Ne => "ne",
            ConstraintName::Gt => "gt",
            ConstraintName::Lt => "lt",
            ConstraintName::Gte => "gte",
            ConstraintName::Lte => "lte",
            ConstraintName::Length => "length",
            ConstraintName::LengthMin => "length_min",
            ConstraintName::LengthMax => "length_max",
            ConstraintName::Regex => "regex",
            ConstraintName::In => "in",
            ConstraintName::NotIn => "not_in",
            ConstraintName::Contains => "contains",
            ConstraintName::NotContains => "not_contains",
            ConstraintName::Required => "required",
            ConstraintName::Items => "items",
            ConstraintName::Fields => "fields",
        }
    }

    /// True for constraints whose evaluation recurses into nested datatypes
    pub fn is_structural(&self) -> bool {
        matches!(self, ConstraintName::Items | ConstraintName::Fields)
    }
}

impl FromStr for ConstraintName {
    type Err = DefinitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = match s {
            "eq" => ConstraintName::Eq,
            "ne" => ConstraintName::Ne,
            "gt" => ConstraintName::Gt,
            "lt" => ConstraintName::Lt,
            "gte" => ConstraintName::Gte,
            "lte" => ConstraintName::Lte,
            "length" => ConstraintName::Length,
            "length_min" => ConstraintName::LengthMin,
            "length_max" => ConstraintName::LengthMax,
            "regex" => ConstraintName::Regex,
            "in" | "enum" => ConstraintName::In,
            "not_in" => ConstraintName::NotIn,
            "contains" => ConstraintName::Contains,
            "not_contains" => ConstraintName::NotContains,
            "required" => ConstraintName::Required,
            "items" => ConstraintName::Items,
            "fields" => ConstraintName::Fields,
            other => return Err(DefinitionError::UnknownConstraint(other.to_string())),
        };
        Ok(name)
    }
}

impl fmt::Display for ConstraintName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a `regex` constraint is applied to a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegexMode {
    /// The pattern must match at the start of the string
    #[default]
    Prefix,
    /// The pattern must match the whole string
    Full,
}

/// A compiled `regex` constraint value.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    prefix: Regex,
    full: Regex,
}

impl Pattern {
    /// Compiles a pattern. The source is checked on its own first so a
    /// pattern cannot escape the anchoring group.
    pub fn compile(source: &str) -> Result<Self, regex::Error> {
        Regex::new(source)?;
        Ok(Self {
            source: source.to_string(),
            prefix: Regex::new(&format!(r"\A(?:{})", source))?,
            full: Regex::new(&format!(r"\A(?:{})\z", source))?,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, text: &str, mode: RegexMode) -> bool {
        match mode {
            RegexMode::Prefix => self.prefix.is_match(text),
            RegexMode::Full => self.full.is_match(text),
        }
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// A nested datatype held by `items` or `fields`.
///
/// Mappings are promoted on every use and never cached, so the owning
/// datatype stays immutable.
#[derive(Debug, Clone, PartialEq)]
pub enum NestedDef {
    Datatype(Box<Datatype>),
    Mapping(Map<String, Value>),
}

impl NestedDef {
    /// Returns the nested datatype, building it from the mapping if needed.
    pub fn promote(&self) -> DefinitionResult<Cow<'_, Datatype>> {
        match self {
            NestedDef::Datatype(datatype) => Ok(Cow::Borrowed(datatype.as_ref())),
            NestedDef::Mapping(mapping) => Datatype::from_map(mapping).map(Cow::Owned),
        }
    }
}

impl From<Datatype> for NestedDef {
    fn from(datatype: Datatype) -> Self {
        NestedDef::Datatype(Box::new(datatype))
    }
}

impl From<Map<String, Value>> for NestedDef {
    fn from(mapping: Map<String, Value>) -> Self {
        NestedDef::Mapping(mapping)
    }
}

impl fmt::Display for NestedDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NestedDef::Datatype(datatype) => write!(f, "{}", datatype),
            NestedDef::Mapping(mapping) => write!(f, "{}", Value::Object(mapping.clone())),
        }
    }
}

/// Untyped constraint value as supplied by a caller.
#[derive(Debug, Clone)]
pub enum Param {
    /// A literal, or a mapping for `items`/`fields`
    Value(Value),
    /// An item datatype for `items`
    Nested(NestedDef),
    /// Field datatypes for `fields`
    Fields(BTreeMap<String, NestedDef>),
}

impl From<Value> for Param {
    fn from(value: Value) -> Self {
        Param::Value(value)
    }
}

impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Param::Value(Value::from(value))
    }
}

impl From<String> for Param {
    fn from(value: String) -> Self {
        Param::Value(Value::from(value))
    }
}

impl From<i64> for Param {
    fn from(value: i64) -> Self {
        Param::Value(Value::from(value))
    }
}

impl From<f64> for Param {
    fn from(value: f64) -> Self {
        Param::Value(Value::from(value))
    }
}

impl From<Datatype> for Param {
    fn from(datatype: Datatype) -> Self {
        Param::Nested(datatype.into())
    }
}

impl From<NestedDef> for Param {
    fn from(nested: NestedDef) -> Self {
        Param::Nested(nested)
    }
}

impl From<BTreeMap<String, NestedDef>> for Param {
    fn from(fields: BTreeMap<String, NestedDef>) -> Self {
        Param::Fields(fields)
    }
}

impl From<BTreeMap<String, Datatype>> for Param {
    fn from(fields: BTreeMap<String, Datatype>) -> Self {
        Param::Fields(fields.into_iter().map(|(k, dt)| (k, dt.into())).collect())
    }
}

/// A typed constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    Eq(Value),
    Ne(Value),
    Gt(Number),
    Lt(Number),
    Gte(Number),
    Lte(Number),
    Length(usize),
    LengthMin(usize),
    LengthMax(usize),
    Regex(Pattern),
    In(Vec<Value>),
    NotIn(Vec<Value>),
    Contains(Value),
    NotContains(Value),
    Required(Vec<String>),
    Items(NestedDef),
    Fields(BTreeMap<String, NestedDef>),
}

impl Constraint {
    /// Checks `param` against what `name` expects on a datatype of `kind`.
    pub(crate) fn parse(name: ConstraintName, kind: Kind, param: Param) -> DefinitionResult<Self> {
        let constraint = match name {
            ConstraintName::Eq => Constraint::Eq(literal(name, kind, param)?),
            ConstraintName::Ne => Constraint::Ne(literal(name, kind, param)?),
            ConstraintName::Gt => Constraint::Gt(number(name, param)?),
            ConstraintName::Lt => Constraint::Lt(number(name, param)?),
            ConstraintName::Gte => Constraint::Gte(number(name, param)?),
            ConstraintName::Lte => Constraint::Lte(number(name, param)?),
            ConstraintName::Length => Constraint::Length(size(name, param)?),
            ConstraintName::LengthMin => Constraint::LengthMin(size(name, param)?),
            ConstraintName::LengthMax => Constraint::LengthMax(size(name, param)?),
            ConstraintName::Regex => Constraint::Regex(pattern(name, param)?),
            ConstraintName::In => Constraint::In(literals(name, kind, param)?),
            ConstraintName::NotIn => Constraint::NotIn(literals(name, kind, param)?),
            ConstraintName::Contains => Constraint::Contains(needle(name, kind, param)?),
            ConstraintName::NotContains => Constraint::NotContains(needle(name, kind, param)?),
            ConstraintName::Required => Constraint::Required(keys(name, param)?),
            ConstraintName::Items => Constraint::Items(nested(name, param)?),
            ConstraintName::Fields => Constraint::Fields(fields(name, param)?),
        };
        Ok(constraint)
    }

    pub fn name(&self) -> ConstraintName {
        match self {
            Constraint::Eq(_) => ConstraintName::Eq,
            Constraint::Ne(_) => ConstraintName::Ne,
            Constraint::Gt(_) => ConstraintName::Gt,
            Constraint::Lt(_) => ConstraintName::Lt,
            Constraint::Gte(_) => ConstraintName::Gte,
            Constraint::Lte(_) => ConstraintName::Lte,
            Constraint::Length(_) => ConstraintName::Length,
            Constraint::LengthMin(_) => ConstraintName::LengthMin,
            Constraint::LengthMax(_) => ConstraintName::LengthMax,
            Constraint::Regex(_) => ConstraintName::Regex,
            Constraint::In(_) => ConstraintName::In,
            Constraint::NotIn(_) => ConstraintName::NotIn,
            Constraint::Contains(_) => ConstraintName::Contains,
            Constraint::NotContains(_) => ConstraintName::NotContains,
            Constraint::Required(_) => ConstraintName::Required,
            Constraint::Items(_) => ConstraintName::Items,
            Constraint::Fields(_) => ConstraintName::Fields,
        }
    }

    /// Renders the expected value for error messages
    pub fn expected(&self) -> String {
        match self {
            Constraint::Eq(v) | Constraint::Ne(v) => v.to_string(),
            Constraint::Contains(v) | Constraint::NotContains(v) => v.to_string(),
            Constraint::Gt(n) | Constraint::Lt(n) | Constraint::Gte(n) | Constraint::Lte(n) => {
                n.to_string()
            }
            Constraint::Length(n) | Constraint::LengthMin(n) | Constraint::LengthMax(n) => {
                n.to_string()
            }
            Constraint::Regex(p) => Value::from(p.as_str()).to_string(),
            Constraint::In(values) | Constraint::NotIn(values) => {
                Value::Array(values.clone()).to_string()
            }
            Constraint::Required(keys) => format!("[{}]", keys.join(", ")),
            Constraint::Items(nested) => nested.to_string(),
            Constraint::Fields(fields) => {
                let rendered: Vec<String> = fields
                    .iter()
                    .map(|(key, nested)| format!("{}: {}", key, nested))
                    .collect();
                format!("{{{}}}", rendered.join(", "))
            }
        }
    }
}

fn value(name: ConstraintName, param: Param) -> DefinitionResult<Value> {
    match param {
        Param::Value(v) => Ok(v),
        _ => Err(DefinitionError::invalid_param(name, "expected a literal value")),
    }
}

fn check_literal(name: ConstraintName, kind: Kind, v: &Value) -> DefinitionResult<()> {
    let ok = match kind {
        Kind::String => v.is_string(),
        Kind::Integer | Kind::Number => v.is_number(),
        Kind::List | Kind::Dict => false,
    };
    if ok {
        Ok(())
    } else {
        Err(DefinitionError::invalid_param(
            name,
            format!("{} is not a {} literal", v, kind),
        ))
    }
}

fn literal(name: ConstraintName, kind: Kind, param: Param) -> DefinitionResult<Value> {
    let v = value(name, param)?;
    check_literal(name, kind, &v)?;
    Ok(v)
}

fn number(name: ConstraintName, param: Param) -> DefinitionResult<Number> {
    match value(name, param)? {
        Value::Number(n) => Ok(n),
        other => Err(DefinitionError::invalid_param(
            name,
            format!("{} is not a number", other),
        )),
    }
}

fn size(name: ConstraintName, param: Param) -> DefinitionResult<usize> {
    let v = value(name, param)?;
    v.as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| {
            DefinitionError::invalid_param(name, format!("{} is not a non-negative integer", v))
        })
}

fn pattern(name: ConstraintName, param: Param) -> DefinitionResult<Pattern> {
    match value(name, param)? {
        Value::String(source) => Pattern::compile(&source)
            .map_err(|e| DefinitionError::invalid_param(name, e.to_string())),
        other => Err(DefinitionError::invalid_param(
            name,
            format!("{} is not a pattern string", other),
        )),
    }
}

fn literals(name: ConstraintName, kind: Kind, param: Param) -> DefinitionResult<Vec<Value>> {
    match value(name, param)? {
        Value::Array(items) => {
            for item in &items {
                check_literal(name, kind, item)?;
            }
            Ok(items)
        }
        other => Err(DefinitionError::invalid_param(
            name,
            format!("{} is not a list of literals", other),
        )),
    }
}

fn needle(name: ConstraintName, kind: Kind, param: Param) -> DefinitionResult<Value> {
    match kind {
        Kind::List => value(name, param),
        _ => literal(name, kind, param),
    }
}

fn keys(name: ConstraintName, param: Param) -> DefinitionResult<Vec<String>> {
    let v = value(name, param)?;
    let invalid = || DefinitionError::invalid_param(name, format!("{} is not a list of keys", v));
    let items = v.as_array().ok_or_else(invalid)?;
    items
        .iter()
        .map(|item| item.as_str().map(str::to_string).ok_or_else(invalid))
        .collect()
}

fn nested(name: ConstraintName, param: Param) -> DefinitionResult<NestedDef> {
    match param {
        Param::Nested(nested) => Ok(nested),
        Param::Value(Value::Object(mapping)) => Ok(NestedDef::Mapping(mapping)),
        _ => Err(DefinitionError::invalid_param(
            name,
            "expected a datatype or a datatype mapping",
        )),
    }
}

fn fields(name: ConstraintName, param: Param) -> DefinitionResult<BTreeMap<String, NestedDef>> {
    match param {
        Param::Fields(fields) => Ok(fields),
        Param::Value(Value::Object(mapping)) => mapping
            .into_iter()
            .map(|(key, def)| match def {
                Value::Object(def) => Ok((key, NestedDef::Mapping(def))),
                other => Err(DefinitionError::invalid_param(
                    name,
                    format!("field '{}' is not a datatype mapping: {}", key, other),
                )),
            })
            .collect(),
        _ => Err(DefinitionError::invalid_param(
            name,
            "expected a mapping of field names to datatypes",
        )),
    }
}
