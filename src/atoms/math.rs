//! # Mathematical Operations
//!
//! Eager numeric builtins. Every parameter is a number, so arguments arrive
//! already evaluated by the dispatcher.
//!
//! ## Atoms Provided
//!
//! - **Arithmetic**: `add`, `sub`, `mul`, `div`, `sum`
//! - **Rounding**: `ceil`, `floor`, `round`, `roundN`
//!
//! Rounding is half away from zero.

use crate::atoms::helpers::{integer, one};
use crate::diagnostics::{ErrorKind, FunsonError};
use crate::runtime::registry::{FunctionDescriptor, NativeFn, Registry};
use crate::value::Kind;

// ============================================================================
// ARITHMETIC OPERATIONS
// ============================================================================

/// Adds two numbers.
///
/// Usage: ["!add", <a>, <b>]
///
/// Example:
///   ["!add", 1, 2] ; => 3
pub const ATOM_ADD: NativeFn = |_, args| one(args.get::<f64>(0)? + args.get::<f64>(1)?);

/// Subtracts `b` from `a`.
pub const ATOM_SUB: NativeFn = |_, args| one(args.get::<f64>(0)? - args.get::<f64>(1)?);

/// Multiplies two numbers.
pub const ATOM_MUL: NativeFn = |_, args| one(args.get::<f64>(0)? * args.get::<f64>(1)?);

/// Divides `a` by `b`.
///
/// Usage: ["!div", <a>, <b>]
///
///   Errors on division by zero.
///
/// Example:
///   ["!div", 9, 2] ; => 4.5
pub const ATOM_DIV: NativeFn = |_, args| {
    let a: f64 = args.get(0)?;
    let b: f64 = args.get(1)?;
    if b == 0.0 {
        return Err(FunsonError::new(ErrorKind::DivisionByZero));
    }
    one(a / b)
};

/// Sums any number of numbers; `["!sum"]` is 0.
pub const ATOM_SUM: NativeFn = |_, args| one(args.rest::<f64>()?.into_iter().sum::<f64>());

// ============================================================================
// ROUNDING
// ============================================================================

pub const ATOM_CEIL: NativeFn = |_, args| one(args.get::<f64>(0)?.ceil());

pub const ATOM_FLOOR: NativeFn = |_, args| one(args.get::<f64>(0)?.floor());

pub const ATOM_ROUND: NativeFn = |_, args| one(args.get::<f64>(0)?.round());

/// Rounds to `n` decimal places; a negative `n` rounds to tens, hundreds, ...
///
/// Usage: ["!roundN", <f>, <n>]
///   - <n>: must be an integer
///
/// Example:
///   ["!roundN", 1.23456, 2] ; => 1.23
///   ["!roundN", 1250, -2]   ; => 1300
pub const ATOM_ROUND_N: NativeFn = |_, args| {
    let f: f64 = args.get(0)?;
    let n = integer(args.get(1)?)?;
    if n == 0 {
        return one(f.round());
    }
    // 10^400 is already infinite
    let exp = (0..n.unsigned_abs().min(400)).fold(1.0_f64, |e, _| e * 10.0);
    let exp = if n < 0 { 1.0 / exp } else { exp };
    one((f * exp).round() / exp)
};

// ============================================================================
// REGISTRATION
// ============================================================================

pub fn register_math_atoms(registry: &mut Registry) {
    let binary = [Kind::Number, Kind::Number];
    registry.define("add", FunctionDescriptor::new(ATOM_ADD).params(&binary));
    registry.define("sub", FunctionDescriptor::new(ATOM_SUB).params(&binary));
    registry.define("mul", FunctionDescriptor::new(ATOM_MUL).params(&binary));
    registry.define("div", FunctionDescriptor::new(ATOM_DIV).params(&binary));
    registry.define("sum", FunctionDescriptor::new(ATOM_SUM).variadic(Kind::Number));
    registry.define("ceil", FunctionDescriptor::new(ATOM_CEIL).param(Kind::Number));
    registry.define("floor", FunctionDescriptor::new(ATOM_FLOOR).param(Kind::Number));
    registry.define("round", FunctionDescriptor::new(ATOM_ROUND).param(Kind::Number));
    registry.define("roundN", FunctionDescriptor::new(ATOM_ROUND_N).params(&binary));
}
