//! # Argument Dispatch
//!
//! Binds the raw, unevaluated arguments of a call form to a descriptor's
//! parameter slots and runs the native implementation.
//!
//! Binding walks the slots in declaration order. Each slot is filled from the
//! pending queue first (values already produced by an earlier argument but not
//! yet consumed) and only then from the next raw argument:
//!
//! - a pending value must already have the slot's kind;
//! - a raw argument whose literal kind matches is bound as-is, unevaluated;
//! - anything else is evaluated; an empty spread leaves the slot open for the
//!   next raw argument, a non-empty spread fills the slot with its first value
//!   and queues the rest for the following slots.
//!
//! The variadic tail drains whatever remains the same way.

use std::collections::VecDeque;
use std::slice;

use tracing::{debug, warn};

use crate::diagnostics::{ErrorKind, FunResult, FunsonError};
use crate::runtime::eval;
use crate::runtime::frame::Frame;
use crate::runtime::registry::Args;
use crate::value::{Kind, Output, Value};

/// Invokes `name` with `raw` arguments in `frame` (the invocation's own frame).
///
/// Returns the flattened outputs of the native implementation.
pub fn invoke(name: &str, raw: &[Value], frame: &Frame<'_>) -> FunResult<Vec<Value>> {
    let descriptor = frame.registry().get(name).ok_or_else(|| {
        FunsonError::new(ErrorKind::UndefinedFunction {
            name: name.to_string(),
        })
    })?;
    let native = descriptor.native().ok_or_else(|| {
        FunsonError::new(ErrorKind::MissingImplementation {
            name: name.to_string(),
        })
    })?;

    let mut binder = Binder {
        name,
        frame,
        raw: raw.iter(),
        pending: VecDeque::new(),
    };

    let mut values = Vec::with_capacity(descriptor.required().len());
    for (i, kind) in descriptor.required().iter().enumerate() {
        let slot = i + 1;
        let value = binder.next(slot, *kind)?.ok_or_else(|| {
            FunsonError::new(ErrorKind::NotEnoughArguments {
                name: name.to_string(),
                slot,
            })
        })?;
        values.push(value);
    }

    let mut rest = Vec::new();
    if let Some(kind) = descriptor.tail() {
        while let Some(value) = binder.next(values.len() + rest.len() + 1, kind)? {
            rest.push(value);
        }
    } else if binder.has_surplus() {
        warn!(
            function = name,
            unused = binder.surplus(),
            "surplus arguments ignored"
        );
    }

    debug!(
        function = name,
        bound = values.len(),
        variadic = rest.len(),
        "invoking"
    );
    let outputs = native(frame, Args::new(name, values, rest))
        .map_err(|e| e.within(format!("function {name}")))?;

    let mut result = Vec::with_capacity(outputs.len());
    for output in outputs {
        output.splice_into(&mut result);
    }
    Ok(result)
}

struct Binder<'r, 'f, 'a> {
    name: &'r str,
    frame: &'f Frame<'a>,
    raw: slice::Iter<'r, Value>,
    pending: VecDeque<Value>,
}

impl Binder<'_, '_, '_> {
    /// Produces the value for `slot`, or `None` once every source is drained.
    fn next(&mut self, slot: usize, kind: Kind) -> FunResult<Option<Value>> {
        if let Some(value) = self.pending.pop_front() {
            return self.check(slot, kind, value).map(Some);
        }
        loop {
            let Some(arg) = self.raw.next() else {
                return Ok(None);
            };
            if kind.accepts(arg) {
                return Ok(Some(arg.clone()));
            }
            let output = eval::process(arg, self.frame)
                .map_err(|e| e.within(format!("argument {slot} of function {}", self.name)))?;
            match output {
                Output::Value(value) => return self.check(slot, kind, value).map(Some),
                Output::Spread(values) => {
                    let mut values = values.into_iter();
                    if let Some(first) = values.next() {
                        self.pending.extend(values);
                        return self.check(slot, kind, first).map(Some);
                    }
                }
            }
        }
    }

    fn check(&self, slot: usize, kind: Kind, value: Value) -> FunResult<Value> {
        if kind.accepts(&value) {
            return Ok(value);
        }
        Err(FunsonError::new(ErrorKind::ArgumentTypeMismatch {
            name: self.name.to_string(),
            slot,
            got: value.kind(),
            want: kind,
        }))
    }

    fn has_surplus(&self) -> bool {
        !self.pending.is_empty() || self.raw.len() > 0
    }

    fn surplus(&self) -> usize {
        self.pending.len() + self.raw.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ClosedConsole;
    use crate::engine::EngineConfig;
    use crate::runtime::frame::{FrameKind, Runtime};
    use crate::runtime::registry::{FunctionDescriptor, NativeFn, Registry};
    use serde_json::json;

    /// Echoes every bound value back, required slots first.
    const ATOM_ECHO: NativeFn = |_, args| {
        let mut out: Vec<Output> = (0..)
            .map_while(|i| args.value(i).ok().cloned())
            .map(Output::Value)
            .collect();
        out.push(Output::Spread(args.rest_values().to_vec()));
        Ok(out)
    };

    const ATOM_SPREAD: NativeFn = |_, args| Ok(vec![Output::Spread(args.rest_values().to_vec())]);

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry
            .register(
                "pair",
                FunctionDescriptor::new(ATOM_ECHO).params(&[Kind::Number, Kind::Number]),
            )
            .unwrap();
        registry
            .register(
                "spread",
                FunctionDescriptor::new(ATOM_SPREAD).variadic(Kind::Any),
            )
            .unwrap();
        registry
            .register(
                "strings",
                FunctionDescriptor::new(ATOM_ECHO)
                    .param(Kind::String)
                    .variadic(Kind::String),
            )
            .unwrap();
        registry
    }

    fn call(name: &str, raw: serde_json::Value) -> FunResult<Vec<Value>> {
        let registry = registry();
        let config = EngineConfig::default();
        let rt = Runtime {
            registry: &registry,
            console: &ClosedConsole,
            config: &config,
        };
        let root = Frame::root(rt);
        let frame = root.child(FrameKind::Call { name: name.into() })?;
        let Value::Array(raw) = Value::from(raw) else {
            unreachable!("test arguments are an array")
        };
        invoke(name, &raw, &frame)
    }

    fn numbers(values: &[f64]) -> Vec<Value> {
        values.iter().copied().map(Value::Number).collect()
    }

    #[test]
    fn spread_fills_following_slots() {
        assert_eq!(call("pair", json!([["!spread", 1, 2]])).unwrap(), numbers(&[1.0, 2.0]));
    }

    #[test]
    fn empty_spread_retries_the_same_slot() {
        assert_eq!(
            call("pair", json!([["!spread"], 1, ["!spread"], 2])).unwrap(),
            numbers(&[1.0, 2.0])
        );
    }

    #[test]
    fn pending_values_are_not_re_evaluated() {
        let err = call("pair", json!([["!spread", 1, "x"]])).unwrap_err();
        assert_eq!(
            err.kind(),
            &ErrorKind::ArgumentTypeMismatch {
                name: "pair".into(),
                slot: 2,
                got: Kind::String,
                want: Kind::Number,
            }
        );
    }

    #[test]
    fn missing_argument_reports_slot() {
        let err = call("pair", json!([1])).unwrap_err();
        assert_eq!(
            err.kind(),
            &ErrorKind::NotEnoughArguments {
                name: "pair".into(),
                slot: 2
            }
        );
    }

    #[test]
    fn variadic_tail_drains_pending_then_raw() {
        assert_eq!(
            call("strings", json!([["!spread", "a", "b"], "c"])).unwrap(),
            vec![Value::from("a"), Value::from("b"), Value::from("c")]
        );
    }

    #[test]
    fn surplus_arguments_are_ignored() {
        assert_eq!(call("pair", json!([1, 2, 3])).unwrap(), numbers(&[1.0, 2.0]));
    }

    #[test]
    fn unknown_function_is_reported() {
        let err = call("nope", json!([])).unwrap_err();
        assert_eq!(
            err.kind(),
            &ErrorKind::UndefinedFunction {
                name: "nope".into()
            }
        );
    }

    #[test]
    fn evaluation_errors_carry_the_argument() {
        let err = call("pair", json!([["!nope"], 1])).unwrap_err();
        assert_eq!(err.trail(), ["argument 1 of function pair"]);
    }
}
