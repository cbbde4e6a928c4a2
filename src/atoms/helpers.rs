//! # Atom Helper Infrastructure
//!
//! Shared pieces used by the builtin implementations: collapsing an
//! evaluation output to one value, reading typed option fields, and the
//! integer checks several builtins need.

use crate::diagnostics::{ErrorKind, FunResult, FunsonError};
use crate::err_msg;
use crate::value::{Map, Output, Value};

/// Convenient alias for builtin return values.
pub type AtomResult = FunResult<Vec<Output>>;

/// Wraps a single value as a builtin result.
pub fn one(value: impl Into<Value>) -> AtomResult {
    Ok(vec![Output::Value(value.into())])
}

/// Collapses `output` to exactly one value.
pub fn single_value(output: Output, what: &str) -> FunResult<Value> {
    match output {
        Output::Value(value) => Ok(value),
        Output::Spread(mut values) if values.len() == 1 => Ok(values.remove(0)),
        Output::Spread(values) => Err(err_msg!(
            "{what}: want exactly one value, got {}",
            Value::Array(values)
        )),
    }
}

/// Normalizes `output` to a sequence of booleans.
pub fn booleans(output: Output, what: &str) -> FunResult<Vec<bool>> {
    output
        .into_values()
        .into_iter()
        .map(|value| match value {
            Value::Bool(b) => Ok(b),
            other => Err(err_msg!(
                "{what}: result is not a boolean: {} {other}",
                other.kind()
            )),
        })
        .collect()
}

/// Reads an optional string field of an options object.
pub fn string_field<'m>(options: &'m Map, key: &str, func: &str) -> FunResult<Option<&'m str>> {
    match options.get(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(err_msg!(
            "{func}: want string type for \"{key}\", got {}",
            other.kind()
        )),
    }
}

/// Converts an integral number to `i64`.
pub fn integer(n: f64) -> FunResult<i64> {
    if !n.is_finite() || n.fract() != 0.0 || n.abs() > i64::MAX as f64 {
        return Err(FunsonError::new(ErrorKind::NotAnInteger { value: n }));
    }
    Ok(n as i64)
}
