//! Value - the dynamic values checkers are applied to.
//!
//! A `Value` is a tagged sum over the shapes a dynamic value can take at
//! runtime. It is a superset of JSON: it distinguishes `Undefined` from
//! `Null`, and carries host shapes (dates, regexps, byte buffers, symbols,
//! callables) that JSON cannot express. Checkers recognize these shapes by
//! tag, never by provenance, so values converted from any source validate
//! the same way.

use indexmap::IndexMap;

/// A dynamic value to be validated.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The absent value. A missing object property reads as `Undefined`.
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    /// An opaque symbol, identified by its description.
    Symbol(String),
    /// A timestamp in milliseconds since the Unix epoch.
    Date(i64),
    /// A regular expression, stored as its source pattern.
    Regex(String),
    /// A byte buffer. Covers buffers and typed-array views alike.
    Bytes(Vec<u8>),
    Array(Vec<Value>),
    /// An object with ordered properties.
    Object(IndexMap<String, Value>),
    /// A callable. Signatures are not represented; only callability is
    /// observable at validation time. Carries an optional name for
    /// debugging.
    Function(Option<String>),
}

impl Value {
    /// Whether this value is `Undefined`.
    #[inline]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Whether this value is `Null` or `Undefined`.
    #[inline]
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Null | Value::Undefined)
    }

    /// Whether this value has an object tag in the host sense: anything
    /// that is not a primitive and not null. Arrays, dates, regexps,
    /// buffers and plain objects all qualify.
    #[inline]
    pub fn is_object_like(&self) -> bool {
        matches!(
            self,
            Value::Object(_) | Value::Array(_) | Value::Date(_) | Value::Regex(_) | Value::Bytes(_)
        )
    }

    /// A short tag name for this value's shape, for debugging output.
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Date(_) => "Date",
            Value::Regex(_) => "RegExp",
            Value::Bytes(_) => "Buffer",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Function(_) => "function",
        }
    }

    /// Look up a property, treating absence as `Undefined`.
    ///
    /// Returns `None` when the value is not an object at all.
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Object(map) => Some(map.get(name).unwrap_or(&Value::Undefined)),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Number(v as f64)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

impl From<serde_json::Value> for Value {
    /// Convert from JSON. JSON never produces `Undefined`, `Symbol`,
    /// `Date`, `Regex`, `Bytes` or `Function` values.
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(k, item)| (k, Value::from(item)))
                    .collect(),
            ),
        }
    }
}
