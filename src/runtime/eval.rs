//! # Evaluator
//!
//! `process(value, frame)` decides call-vs-data at every array:
//!
//! - a **call form** (`["!name", args...]`) runs through the dispatcher in a
//!   fresh call frame and yields a spread of everything the function returned;
//! - any other array is a **list form**: elements are evaluated in order in a
//!   fresh list frame, spreads are spliced in, and the accumulator key is
//!   rebound to the output so far before each element;
//! - a string starting with `!!` in first position of a list loses one `!`;
//! - everything else, objects included, is returned unchanged.
//!
//! A spread that reaches the root frame is reduced: nothing becomes `null`,
//! one value becomes that value, more than one is an error.
//!
//! Every nesting level passes through `process`, which grows the native stack
//! on demand, so only the configured `max_depth` bounds how deep a program may go.

use std::rc::Rc;

use tracing::trace;

use crate::diagnostics::{ErrorKind, FunResult, FunsonError};
use crate::runtime::dispatch;
use crate::runtime::frame::{Frame, FrameKind, ACCUMULATOR};
use crate::value::{Output, Value};

/// Marker character that tags a call form.
pub const CALL_MARKER: char = '!';

/// Stack left below which `process` switches to a fresh segment (100KB).
const RED_ZONE: usize = 100 * 1024;

/// Size of each additional stack segment (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

#[inline]
fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// Splits a call form into its function name and raw arguments.
pub fn call_form(items: &[Value]) -> Option<(&str, &[Value])> {
    let (head, args) = items.split_first()?;
    let name = head.as_str()?.strip_prefix(CALL_MARKER)?;
    if name.is_empty() || name.starts_with(CALL_MARKER) {
        return None;
    }
    Some((name, args))
}

/// True if `value` is an array in call form.
pub fn is_call_form(value: &Value) -> bool {
    value.as_array().and_then(call_form).is_some()
}

/// Evaluates `value` in `frame`.
pub fn process(value: &Value, frame: &Frame<'_>) -> FunResult<Output> {
    ensure_sufficient_stack(|| process_value(value, frame))
}

fn process_value(value: &Value, frame: &Frame<'_>) -> FunResult<Output> {
    match value {
        Value::Array(items) => {
            let output = match call_form(items) {
                Some((name, args)) => {
                    trace!(function = name, depth = frame.depth(), "call form");
                    let call = frame.child(FrameKind::Call {
                        name: name.to_string(),
                    })?;
                    Output::Spread(dispatch::invoke(name, args, &call)?)
                }
                None => {
                    trace!(len = items.len(), depth = frame.depth(), "list form");
                    let list = frame.child(FrameKind::List)?;
                    Output::Value(Value::Array(process_list(items, &list)?))
                }
            };
            if frame.is_root() {
                return reduce(output).map(Output::Value);
            }
            Ok(output)
        }
        Value::String(s) if frame.at_list_start() && s.starts_with("!!") => {
            Ok(Output::Value(Value::String(s[1..].to_string())))
        }
        other => Ok(Output::Value(other.clone())),
    }
}

fn process_list(items: &[Value], frame: &Frame<'_>) -> FunResult<Vec<Value>> {
    let mut out = Rc::new(Vec::with_capacity(items.len()));
    for (i, item) in items.iter().enumerate() {
        frame.bind_shared(ACCUMULATOR, &out, false);
        let output = process(item, frame).map_err(|e| e.within(format!("processing item {i}")))?;
        frame.unbind(ACCUMULATOR);
        output.splice_into(Rc::make_mut(&mut out));
    }
    Ok(Rc::try_unwrap(out).unwrap_or_else(|shared| shared.to_vec()))
}

/// Reduces an output at the program boundary.
pub fn reduce(output: Output) -> FunResult<Value> {
    match output {
        Output::Value(value) => Ok(value),
        Output::Spread(mut values) => match values.len() {
            0 => Ok(Value::Null),
            1 => Ok(values.remove(0)),
            _ => Err(FunsonError::new(ErrorKind::TooManyTopLevelResults {
                values,
            })),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn call_form_detection() {
        let is_call = |v: serde_json::Value| is_call_form(&Value::from(v));
        assert!(is_call(json!(["!add", 1, 2])));
        assert!(is_call(json!(["!x"])));
        assert!(!is_call(json!(["!!x"])));
        assert!(!is_call(json!(["!"])));
        assert!(!is_call(json!([1, 2, 3])));
        assert!(!is_call(json!([])));
        assert!(!is_call(json!("!add")));
    }

    #[test]
    fn call_form_splits_name_and_args() {
        let Value::Array(items) = Value::from(json!(["!concat", "a", "b"])) else {
            unreachable!()
        };
        let (name, args) = call_form(&items).unwrap();
        assert_eq!(name, "concat");
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn reduce_at_boundary() {
        assert_eq!(reduce(Output::nothing()).unwrap(), Value::Null);
        assert_eq!(
            reduce(Output::Spread(vec![Value::Bool(true)])).unwrap(),
            Value::Bool(true)
        );
        let err = reduce(Output::Spread(vec![Value::Bool(false), Value::Bool(true)])).unwrap_err();
        assert_eq!(
            err.kind(),
            &ErrorKind::TooManyTopLevelResults {
                values: vec![Value::Bool(false), Value::Bool(true)]
            }
        );
    }
}
