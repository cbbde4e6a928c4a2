//! Canonical runtime values for Funson evaluation.
//!
//! [`Value`] covers exactly the JSON shapes and is the only thing that may
//! appear in a program or its output. [`Output`] is what an evaluation step
//! hands back: either a single `Value` or a spread sequence of values produced
//! by a function invocation, which the caller must splice into surrounding
//! structure or reduce before it reaches the host.

use std::fmt;

use serde::{ser, Deserialize, Deserializer, Serialize, Serializer};

use crate::diagnostics::{ErrorKind, FunResult, FunsonError};

/// String-keyed object storage.
pub type Map = im::HashMap<String, Value>;

/// Largest magnitude at which every integral `f64` is exactly representable.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A JSON-shaped value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(Map),
}

/// Value kinds, also used as parameter kinds in function descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Parameter kind accepting every value without evaluation.
    Any,
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl Kind {
    /// Returns true if a value of this shape can fill a slot of this kind.
    pub fn accepts(self, value: &Value) -> bool {
        self == Kind::Any || self == value.kind()
    }

    pub fn name(self) -> &'static str {
        match self {
            Kind::Any => "any",
            Kind::Null => "null",
            Kind::Bool => "bool",
            Kind::Number => "number",
            Kind::String => "string",
            Kind::Array => "array",
            Kind::Object => "object",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Bool,
            Value::Number(_) => Kind::Number,
            Value::String(_) => Kind::String,
            Value::Array(_) => Kind::Array,
            Value::Object(_) => Kind::Object,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Plain-text rendering used for prompts and option labels: strings are
    /// written bare, everything else as compact JSON.
    pub fn to_text(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// Converts to a `serde_json::Value`, rejecting non-finite numbers.
    pub fn to_json(&self) -> FunResult<serde_json::Value> {
        Ok(match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Value::Number(json_number(*n)?),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => serde_json::Value::Array(
                items.iter().map(Value::to_json).collect::<FunResult<_>>()?,
            ),
            Value::Object(map) => {
                let mut object = serde_json::Map::new();
                for (key, value) in map {
                    object.insert(key.clone(), value.to_json()?);
                }
                serde_json::Value::Object(object)
            }
        })
    }
}

/// Integral values that fit losslessly are emitted as JSON integers.
fn json_number(n: f64) -> FunResult<serde_json::Number> {
    if n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        return Ok(serde_json::Number::from(n as i64));
    }
    serde_json::Number::from_f64(n).ok_or_else(|| {
        FunsonError::new(ErrorKind::NotSerializable {
            value: format_number(n),
        })
    })
}

/// Shortest decimal rendering, integral values without a fraction.
pub(crate) fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::String(s) => write!(f, "{}", serde_json::Value::String(s.clone())),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Object(map) => {
                let mut entries: Vec<(&String, &Value)> = map.iter().collect();
                entries.sort_by(|a, b| a.0.cmp(b.0));
                f.write_str("{")?;
                for (i, (key, value)) in entries.into_iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}:{value}", serde_json::Value::String(key.clone()))?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map(Value::Number).unwrap_or(Value::Null),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(object) => {
                Value::Object(object.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Object(map)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json()
            .map_err(ser::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

// ============================================================================
// EVALUATION OUTPUT
// ============================================================================

/// The outcome of one evaluation step.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Value(Value),
    /// A multi-value result; never part of serialized output.
    Spread(Vec<Value>),
}

impl Output {
    /// An empty spread, which vanishes when spliced.
    pub fn nothing() -> Self {
        Output::Spread(Vec::new())
    }

    /// Normalizes to a sequence: a single value becomes a one-element sequence.
    pub fn into_values(self) -> Vec<Value> {
        match self {
            Output::Value(v) => vec![v],
            Output::Spread(values) => values,
        }
    }

    /// Appends this output to `out`, splicing spreads.
    pub fn splice_into(self, out: &mut Vec<Value>) {
        match self {
            Output::Value(v) => out.push(v),
            Output::Spread(values) => out.extend(values),
        }
    }
}

impl From<Value> for Output {
    fn from(value: Value) -> Self {
        Output::Value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integral_numbers_serialize_as_integers() {
        let value = Value::Array(vec![Value::Number(3.0), Value::Number(1.5)]);
        assert_eq!(value.to_json().ok(), Some(json!([3, 1.5])));
        assert_eq!(serde_json::to_string(&value).ok().as_deref(), Some("[3,1.5]"));
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        let err = Value::Number(f64::INFINITY).to_json().unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::NotSerializable { .. }));
        assert!(serde_json::to_string(&Value::Number(f64::NAN)).is_err());
    }

    #[test]
    fn json_round_trip_keeps_shapes() {
        let source = json!({"a": [1, "x", null, true], "b": {"c": 2.5}});
        let value = Value::from(source.clone());
        assert_eq!(value.kind(), Kind::Object);
        assert_eq!(value.to_json().ok(), Some(source));
    }

    #[test]
    fn display_is_compact_json_with_sorted_keys() {
        let value: Value = serde_json::from_str(r#"{"b": 1, "a": ["x", 2.5]}"#).unwrap();
        assert_eq!(value.to_string(), r#"{"a":["x",2.5],"b":1}"#);
        assert_eq!(Value::from("hi").to_text(), "hi");
        assert_eq!(Value::from("hi").to_string(), "\"hi\"");
    }

    #[test]
    fn any_accepts_everything() {
        assert!(Kind::Any.accepts(&Value::Null));
        assert!(Kind::Number.accepts(&Value::Number(1.0)));
        assert!(!Kind::Number.accepts(&Value::from("1")));
    }

    #[test]
    fn output_normalizes_and_splices() {
        assert_eq!(Output::from(Value::Bool(true)).into_values(), vec![Value::Bool(true)]);
        let mut out = vec![Value::Number(0.0)];
        Output::Spread(vec![Value::Number(1.0), Value::Number(2.0)]).splice_into(&mut out);
        Output::nothing().splice_into(&mut out);
        assert_eq!(out.len(), 3);
    }
}
