//! # Logic and Comparison
//!
//! `not` is eager. `?and`, `?or` and `?eq` take `any` parameters, so their
//! raw arguments reach the builtin unevaluated and are only processed as far
//! as needed. Each is also registered without the `?`.

use crate::atoms::helpers::{booleans, one, AtomResult};
use crate::runtime::frame::Frame;
use crate::runtime::registry::{Args, FunctionDescriptor, NativeFn, Registry};
use crate::value::{Kind, Output, Value};

/// Negates every argument.
///
/// Usage: ["!not", <a>, ...]
///
/// Example:
///   [0, ["!not", true, false], 9] ; => [0, false, true, 9]
pub const ATOM_NOT: NativeFn = |_, args| {
    let first: bool = args.get(0)?;
    let negated = std::iter::once(first)
        .chain(args.rest::<bool>()?)
        .map(|b| Value::Bool(!b))
        .collect();
    Ok(vec![Output::Spread(negated)])
};

/// Short-circuiting conjunction. Every evaluated operand may yield several
/// booleans; all of them count.
pub const ATOM_AND: NativeFn = |frame, args| junction(frame, &args, false);

/// Short-circuiting disjunction.
pub const ATOM_OR: NativeFn = |frame, args| junction(frame, &args, true);

/// Stops at the first boolean equal to `decisive` and returns it.
fn junction(frame: &Frame<'_>, args: &Args, decisive: bool) -> AtomResult {
    if args.get::<bool>(0)? == decisive {
        return one(decisive);
    }
    for (i, raw) in args.rest_values().iter().enumerate() {
        let output = frame
            .process(raw)
            .map_err(|e| e.within(format!("{}: operand {}", args.name(), i + 2)))?;
        if booleans(output, args.name())?.contains(&decisive) {
            return one(decisive);
        }
    }
    one(!decisive)
}

/// Deep equality of two evaluated expressions, each normalized to a sequence.
///
/// Example:
///   ["!?eq", ["!not", true, false], [false, true]] ; => false
///   ["!?eq", [["!not", true, false]], [false, true]] ; => true
pub const ATOM_EQ: NativeFn = |frame, args| {
    let left = frame.process(args.value(0)?)?.into_values();
    let right = frame.process(args.value(1)?)?.into_values();
    one(left == right)
};

pub fn register_logic_atoms(registry: &mut Registry) {
    registry.define(
        "not",
        FunctionDescriptor::new(ATOM_NOT)
            .param(Kind::Bool)
            .variadic(Kind::Bool),
    );
    let junction = [Kind::Bool];
    for name in ["?and", "and"] {
        registry.define(
            name,
            FunctionDescriptor::new(ATOM_AND)
                .params(&junction)
                .variadic(Kind::Any),
        );
    }
    for name in ["?or", "or"] {
        registry.define(
            name,
            FunctionDescriptor::new(ATOM_OR)
                .params(&junction)
                .variadic(Kind::Any),
        );
    }
    for name in ["?eq", "eq"] {
        registry.define(
            name,
            FunctionDescriptor::new(ATOM_EQ).params(&[Kind::Any, Kind::Any]),
        );
    }
}
