//! # Control Flow
//!
//! `comment`, `if` and `for`. All three receive raw expressions and decide
//! themselves what gets evaluated.

use std::rc::Rc;

use tracing::trace;

use crate::atoms::helpers::single_value;
use crate::err_msg;
use crate::runtime::eval::is_call_form;
use crate::runtime::frame::{FrameKind, ACCUMULATOR, LOCALS};
use crate::runtime::registry::{FunctionDescriptor, NativeFn, Registry};
use crate::value::{Kind, Map, Output, Value};

/// Ignores its arguments and vanishes from the surrounding list.
///
/// Example:
///   [1, ["!comment", "anything", ["!div", 1, 0]], 2] ; => [1, 2]
pub const ATOM_COMMENT: NativeFn = |_, _| Ok(vec![Output::nothing()]);

/// Evaluates exactly one branch.
///
/// Usage: ["!if", <cond>, <then>, <else>]
///   - <cond>: Bool (evaluated)
///   - <then>, <else>: any expression; the other one is never evaluated
pub const ATOM_IF: NativeFn = |frame, args| {
    let branch = if args.get::<bool>(0)? {
        args.value(1)?
    } else {
        args.value(2)?
    };
    Ok(vec![frame.process(branch)?])
};

/// Bounded loop.
///
/// Usage: ["!for", <cond>, <body>...]
///   - <cond>: a call form, evaluated before every iteration with `\` bound
///     to `{"i": k}`; it has to yield exactly one boolean
///   - <body>: evaluated in order with `.` bound to everything produced so far
///
///   Returns the concatenation of every body result of every iteration.
///
/// Example:
///   [["!for",
///     ["!?or", false, ["!?eq", ["!env", "\\i"], 0], ["!?eq", ["!env", "\\i"], 1]],
///     ["!env", "\\i"]]] ; => [0, 1]
///
/// A condition that never turns false never returns.
pub const ATOM_FOR: NativeFn = |frame, args| {
    let cond = args.value(0)?;
    if !is_call_form(cond) {
        return Err(err_msg!("for: condition has to be a function: {cond}"));
    }
    let body = args.rest_values();
    let mut results: Rc<Vec<Value>> = Rc::new(Vec::new());

    for k in 0u64.. {
        let mut locals = Map::new();
        locals.insert("i".to_string(), Value::Number(k as f64));
        let iteration = frame.scope_with(LOCALS, Value::Object(locals))?;

        let verdict = iteration
            .process(cond)
            .and_then(|out| single_value(out, "for: condition"))
            .map_err(|e| e.within(format!("for: [{k}]")))?;
        let proceed = match verdict {
            Value::Bool(b) => b,
            other => {
                return Err(err_msg!(
                    "for: [{k}]: condition's result has to be boolean: {} {other}",
                    other.kind()
                ))
            }
        };
        if !proceed {
            trace!(iterations = k, produced = results.len(), "for: done");
            break;
        }

        for (f, expr) in body.iter().enumerate() {
            let output = {
                let step = iteration.child(FrameKind::Scope)?;
                step.bind_shared(ACCUMULATOR, &results, true);
                step.process(expr)
                    .map_err(|e| e.within(format!("for: [{k}]: body {f}")))?
            };
            output.splice_into(Rc::make_mut(&mut results));
        }
    }
    let results = Rc::try_unwrap(results).unwrap_or_else(|shared| shared.to_vec());
    Ok(vec![Output::Spread(results)])
};

pub fn register_control_atoms(registry: &mut Registry) {
    registry.define("comment", FunctionDescriptor::new(ATOM_COMMENT).variadic(Kind::Any));
    registry.define(
        "if",
        FunctionDescriptor::new(ATOM_IF).params(&[Kind::Bool, Kind::Any, Kind::Any]),
    );
    registry.define(
        "for",
        FunctionDescriptor::new(ATOM_FOR)
            .param(Kind::Any)
            .variadic(Kind::Any),
    );
}
