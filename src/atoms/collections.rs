//! # Collection Operations
//!
//! - `item`: indexes into an (evaluated) array
//! - `pairsToMap`: builds an object from `[key, value]` pairs, exposing the
//!   partially built object as `:` while each value is evaluated

use crate::atoms::helpers::{integer, one};
use crate::diagnostics::{ErrorKind, FunsonError};
use crate::err_msg;
use crate::runtime::frame::MAP_CONTEXT;
use crate::runtime::registry::{FunctionDescriptor, NativeFn, Registry};
use crate::value::{Kind, Map, Output, Value};

/// Returns the element at `index`.
///
/// Usage: ["!item", <index>, <array>]
///   - <index>: integer, zero-based
///   - <array>: any array expression; it is evaluated and has to produce
///     exactly one array
///
/// Example:
///   ["!item", 1, ["!split", ",", "a,b,c"]] ; => "b"
pub const ATOM_ITEM: NativeFn = |frame, args| {
    let index = integer(args.get(0)?)?;
    let items = match frame.process(args.value(1)?)? {
        Output::Value(Value::Array(items)) => items,
        Output::Spread(mut values) if values.len() == 1 => match values.remove(0) {
            Value::Array(items) => items,
            other => {
                return Err(err_msg!(
                    "item: processed array output is not an array, got {}",
                    other.kind()
                ))
            }
        },
        Output::Spread(values) => {
            return Err(err_msg!(
                "item: processed array needs exactly 1 output, got {}: {}",
                values.len(),
                Value::Array(values)
            ))
        }
        Output::Value(other) => {
            return Err(err_msg!(
                "item: processed array is not an array, got {}",
                other.kind()
            ))
        }
    };
    let found = usize::try_from(index).ok().and_then(|i| items.get(i));
    match found {
        Some(value) => one(value.clone()),
        None => Err(FunsonError::new(ErrorKind::PathNotFound {
            key: index.to_string(),
            container: Value::Array(items),
        })),
    }
};

/// Builds an object from two-element pairs.
///
/// Usage: ["!pairsToMap", [<key>, <value>], ...]
///   - <key>: a literal string, unique within the call
///   - <value>: evaluated with `:` bound to the object built so far; no
///     result stores `null`, more than one is an error
///
/// Example:
///   ["!pairsToMap", ["a", 1], ["b", ["!add", ["!env", ":a"], 1]]] ; => {"a": 1, "b": 2}
pub const ATOM_PAIRS_TO_MAP: NativeFn = |frame, args| {
    let mut out = Map::new();
    for (i, raw) in args.rest_values().iter().enumerate() {
        let (key, expr) = match raw.as_array() {
            Some([Value::String(key), expr]) => (key, expr),
            Some([other, _]) => {
                return Err(err_msg!(
                    "pairsToMap: item #{i} is not valid pair: first item has to be string, not: {other}"
                ))
            }
            _ => {
                return Err(err_msg!(
                    "pairsToMap: item #{i} is not valid pair: pair has to be array of length 2, not: {raw}"
                ))
            }
        };
        if out.contains_key(key) {
            return Err(err_msg!(
                "pairsToMap: item #{i} is not valid pair: duplicate pair key: {key}"
            ));
        }
        frame.bind(MAP_CONTEXT, Value::Object(out.clone()));
        let value = match frame
            .process(expr)
            .map_err(|e| e.within(format!("pairsToMap: can not compute value for key {key}")))?
        {
            Output::Value(value) => value,
            Output::Spread(mut values) => match values.len() {
                0 => Value::Null,
                1 => values.remove(0),
                _ => {
                    return Err(err_msg!(
                        "pairsToMap: too many results for key {key}: {}",
                        Value::Array(values)
                    ))
                }
            },
        };
        out.insert(key.clone(), value);
    }
    one(out)
};

pub fn register_collection_atoms(registry: &mut Registry) {
    registry.define(
        "item",
        FunctionDescriptor::new(ATOM_ITEM).params(&[Kind::Number, Kind::Array]),
    );
    registry.define(
        "pairsToMap",
        FunctionDescriptor::new(ATOM_PAIRS_TO_MAP).variadic(Kind::Any),
    );
}
