// crates/domain/src/value.rs

use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Number, Value as Json};

use crate::error::{Error, Result};
use crate::field::{FieldType, ScalarType};

/// ISO-8601 layout used when writing date-times. `%.f` omits a zero fraction.
const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Naive layouts accepted on input, tried in order after RFC 3339.
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

// ─────────────────────────────────────────────────────────────────────────────
// Typed field values
// ─────────────────────────────────────────────────────────────────────────────

/// Runtime value of an entity field. Absent values are `Option::None`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    DateTime(NaiveDateTime),
    List(Vec<Value>),
}

impl Value {
    /// The scalar type of this value; `None` for lists.
    pub fn scalar_type(&self) -> Option<ScalarType> {
        match self {
            Value::String(_) => Some(ScalarType::String),
            Value::Integer(_) => Some(ScalarType::Integer),
            Value::Float(_) => Some(ScalarType::Float),
            Value::Boolean(_) => Some(ScalarType::Boolean),
            Value::DateTime(_) => Some(ScalarType::DateTime),
            Value::List(_) => None,
        }
    }

    /// True if the value is of the declared field type.
    pub fn conforms_to(&self, ty: FieldType) -> bool {
        match (self, ty) {
            (Value::List(items), FieldType::List(elem)) => {
                items.iter().all(|v| v.scalar_type() == Some(elem))
            }
            (Value::List(_), FieldType::Scalar(_)) => false,
            (v, FieldType::Scalar(t)) => v.scalar_type() == Some(t),
            (_, FieldType::List(_)) => false,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Boolean(_) => "boolean",
            Value::DateTime(_) => "date-time",
            Value::List(_) => "list",
        }
    }
}

/// Only values of the same scalar kind are ordered; everything else is
/// incomparable.
impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Value::String(a), Value::String(b)) => a.partial_cmp(b),
            (Value::Integer(a), Value::Integer(b)) => a.partial_cmp(b),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Boolean(a), Value::Boolean(b)) => a.partial_cmp(b),
            (Value::DateTime(a), Value::DateTime(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s:?}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::DateTime(dt) => write!(f, "{}", dt.format(ISO_FORMAT)),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Conversions into / out of Value
// ─────────────────────────────────────────────────────────────────────────────

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::DateTime(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

fn wrong_variant(expected: &str, got: &Value) -> Error {
    Error::type_mismatch(format!("expected {expected}, got {} {got}", got.kind()))
}

/// Extraction of a concrete Rust type from a [`Value`].
pub trait FromValue: Sized {
    fn from_value(v: Value) -> Result<Self>;
}

impl FromValue for String {
    fn from_value(v: Value) -> Result<Self> {
        match v {
            Value::String(s) => Ok(s),
            other => Err(wrong_variant("string", &other)),
        }
    }
}

impl FromValue for i64 {
    fn from_value(v: Value) -> Result<Self> {
        match v {
            Value::Integer(i) => Ok(i),
            other => Err(wrong_variant("integer", &other)),
        }
    }
}

impl FromValue for f64 {
    fn from_value(v: Value) -> Result<Self> {
        match v {
            Value::Float(x) => Ok(x),
            other => Err(wrong_variant("float", &other)),
        }
    }
}

impl FromValue for bool {
    fn from_value(v: Value) -> Result<Self> {
        match v {
            Value::Boolean(b) => Ok(b),
            other => Err(wrong_variant("boolean", &other)),
        }
    }
}

impl FromValue for NaiveDateTime {
    fn from_value(v: Value) -> Result<Self> {
        match v {
            Value::DateTime(dt) => Ok(dt),
            other => Err(wrong_variant("date-time", &other)),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(v: Value) -> Result<Self> {
        match v {
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(wrong_variant("list", &other)),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Parsing raw JSON into typed values
// ─────────────────────────────────────────────────────────────────────────────

/// Parse a raw value into the declared field type.
///
/// - `null` parses to `None`.
/// - An array parses element-wise: against the element type for list fields,
///   and against the scalar type for scalar fields (membership operands).
/// - Date-time strings are read as ISO-8601.
/// - Anything else goes through a narrow coercion table; values the target
///   cannot represent fail with `TypeMismatch`.
pub fn parse(ty: FieldType, raw: &Json) -> Result<Option<Value>> {
    match raw {
        Json::Null => Ok(None),
        Json::Array(items) => items
            .iter()
            .map(|item| parse_element(ty.element(), item))
            .collect::<Result<Vec<_>>>()
            .map(|items| Some(Value::List(items))),
        other => parse_scalar(ty.element(), other).map(Some),
    }
}

fn parse_element(ty: ScalarType, raw: &Json) -> Result<Value> {
    match raw {
        Json::Null => Err(Error::type_mismatch(format!(
            "null is not a valid {ty} list element"
        ))),
        Json::Array(_) => parse(FieldType::Scalar(ty), raw)?
            .ok_or_else(|| Error::type_mismatch("empty nested list")),
        other => parse_scalar(ty, other),
    }
}

fn parse_scalar(ty: ScalarType, raw: &Json) -> Result<Value> {
    let mismatch = || Error::type_mismatch(format!("cannot represent {raw} as {ty}"));

    match ty {
        ScalarType::String => match raw {
            Json::String(s) => Ok(Value::String(s.clone())),
            Json::Number(n) => Ok(Value::String(n.to_string())),
            Json::Bool(b) => Ok(Value::String(b.to_string())),
            _ => Err(mismatch()),
        },
        ScalarType::Integer => match raw {
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Value::Integer(i))
                } else {
                    n.as_f64()
                        .filter(|x| x.fract() == 0.0 && x.abs() < i64::MAX as f64)
                        .map(|x| Value::Integer(x as i64))
                        .ok_or_else(mismatch)
                }
            }
            Json::String(s) => s.trim().parse::<i64>().map(Value::Integer).map_err(|_| mismatch()),
            _ => Err(mismatch()),
        },
        ScalarType::Float => match raw {
            Json::Number(n) => n.as_f64(),
            Json::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
        // NaN and infinities have no JSON form.
        .filter(|x| x.is_finite())
        .map(Value::Float)
        .ok_or_else(mismatch),
        ScalarType::Boolean => match raw {
            Json::Bool(b) => Ok(Value::Boolean(*b)),
            Json::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(Value::Boolean(true)),
                "false" | "0" => Ok(Value::Boolean(false)),
                _ => Err(mismatch()),
            },
            Json::Number(n) => match n.as_i64() {
                Some(1) => Ok(Value::Boolean(true)),
                Some(0) => Ok(Value::Boolean(false)),
                _ => Err(mismatch()),
            },
            _ => Err(mismatch()),
        },
        ScalarType::DateTime => match raw {
            Json::String(s) => parse_datetime(s).map(Value::DateTime),
            _ => Err(mismatch()),
        },
    }
}

/// Read an ISO-8601 timestamp. Offsets are normalised to UTC.
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_utc());
    }
    for layout in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, layout) {
            return Ok(dt);
        }
    }
    if let Some(midnight) = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(midnight);
    }

    Err(Error::parse_error(format!("`{s}` is not an ISO-8601 date-time")))
}

/// Bring an already-typed value to the declared field type.
///
/// Conforming values are returned unchanged; anything else is coerced through
/// its JSON form with the same table as [`parse`].
pub fn coerce(ty: FieldType, value: Value) -> Result<Value> {
    if value.conforms_to(ty) {
        return Ok(value);
    }

    let coerced = match (ty, value) {
        (FieldType::List(elem), Value::List(items)) => items
            .into_iter()
            .map(|item| coerce(FieldType::Scalar(elem), item))
            .collect::<Result<Vec<_>>>()
            .map(Value::List)?,
        (_, other) => parse(ty, &serialize(&other))?
            .ok_or_else(|| Error::type_mismatch(format!("cannot represent {other} as {ty}")))?,
    };

    if coerced.conforms_to(ty) {
        Ok(coerced)
    } else {
        Err(Error::type_mismatch(format!("cannot represent {coerced} as {ty}")))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Serializing typed values back to JSON
// ─────────────────────────────────────────────────────────────────────────────

/// Inverse of [`parse`]: date-times become ISO-8601 strings, lists are
/// serialized element-wise, everything else passes through.
pub fn serialize(value: &Value) -> Json {
    match value {
        Value::String(s) => Json::String(s.clone()),
        Value::Integer(i) => Json::Number((*i).into()),
        Value::Float(x) => Number::from_f64(*x).map(Json::Number).unwrap_or(Json::Null),
        Value::Boolean(b) => Json::Bool(*b),
        Value::DateTime(dt) => Json::String(dt.format(ISO_FORMAT).to_string()),
        Value::List(items) => Json::Array(items.iter().map(serialize).collect()),
    }
}

/// Serialize an optional value; absent becomes `null`.
pub fn serialize_opt(value: Option<&Value>) -> Json {
    value.map(serialize).unwrap_or(Json::Null)
}
