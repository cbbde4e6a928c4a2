//! String builtins: `concat`, `split`, `replacePrefix`.

use crate::atoms::helpers::one;
use crate::runtime::registry::{FunctionDescriptor, NativeFn, Registry};
use crate::value::{Kind, Value};

/// Joins any number of strings.
///
/// Example:
///   ["!concat", "a", "b", "c"] ; => "abc"
pub const ATOM_CONCAT: NativeFn = |_, args| one(args.rest::<&str>()?.concat());

/// Splits `where` on every occurrence of `by`; an empty `by` splits into characters.
///
/// Usage: ["!split", <by>, <where>]
///
/// Example:
///   ["!split", ",", "a,b,,c"] ; => ["a", "b", "", "c"]
pub const ATOM_SPLIT: NativeFn = |_, args| {
    let by: &str = args.get(0)?;
    let target: &str = args.get(1)?;
    let parts: Vec<Value> = if by.is_empty() {
        target.chars().map(|c| Value::String(c.to_string())).collect()
    } else {
        target.split(by).map(Value::from).collect()
    };
    one(parts)
};

/// Replaces `find` with `replace` if `where` starts with it.
///
/// Usage: ["!replacePrefix", <find>, <replace>, <where>]
pub const ATOM_REPLACE_PREFIX: NativeFn = |_, args| {
    let find: &str = args.get(0)?;
    let replace: &str = args.get(1)?;
    let target: &str = args.get(2)?;
    match target.strip_prefix(find) {
        Some(rest) => one(format!("{replace}{rest}")),
        None => one(target),
    }
};

pub fn register_string_atoms(registry: &mut Registry) {
    registry.define("concat", FunctionDescriptor::new(ATOM_CONCAT).variadic(Kind::String));
    registry.define(
        "split",
        FunctionDescriptor::new(ATOM_SPLIT).params(&[Kind::String, Kind::String]),
    );
    registry.define(
        "replacePrefix",
        FunctionDescriptor::new(ATOM_REPLACE_PREFIX).params(&[
            Kind::String,
            Kind::String,
            Kind::String,
        ]),
    );
}
