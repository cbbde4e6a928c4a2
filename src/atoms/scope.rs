//! Scoped path lookup: `env` and `?env`.
//!
//! A path starts with the reserved key to look up (`.`, `:` or `\`) and
//! continues with a dot-separated walk through the bound value, e.g. `\i`,
//! `:name`, `.items.price`.

use crate::atoms::helpers::one;
use crate::diagnostics::{ErrorKind, FunResult, FunsonError};
use crate::err_msg;
use crate::runtime::frame::{Frame, ACCUMULATOR, LOCALS, MAP_CONTEXT};
use crate::runtime::path;
use crate::runtime::registry::{FunctionDescriptor, NativeFn, Registry};
use crate::value::{Kind, Output, Value};

/// Splits a trimmed path into its reserved key and the remaining walk.
fn split_path<'p>(path: &'p str, func: &str) -> FunResult<(&'static str, &'p str)> {
    let path = path.trim();
    let mut chars = path.chars();
    let key = match chars.next() {
        Some('.') => ACCUMULATOR,
        Some(':') => MAP_CONTEXT,
        Some('\\') => LOCALS,
        Some(other) => return Err(err_msg!("{func}: unknown path prefix \"{other}\"")),
        None => return Err(err_msg!("{func}: empty path")),
    };
    Ok((key, chars.as_str()))
}

/// Resolves `path` from `frame`.
pub fn lookup(frame: &Frame<'_>, path: &str) -> FunResult<Output> {
    let (key, walk) = split_path(path, "env")?;
    let binding = frame.first_key(key).ok_or_else(|| {
        FunsonError::new(ErrorKind::PathNotFound {
            key: key.to_string(),
            container: Value::Null,
        })
    })?;
    path::resolve(&binding, walk).map_err(|e| e.within(format!("env \"{}\"", path.trim())))
}

/// Reads a value from the environment.
///
/// Usage: ["!env", <path>]
///
///   Returns every value the path reaches; walking an array visits each element.
///
/// Example:
///   ["!for", <cond>, ["!env", "\\i"]] ; the loop index
pub const ATOM_ENV: NativeFn = |frame, args| Ok(vec![lookup(frame, args.get(0)?)?]);

/// Whether `env` would succeed for the same path.
pub const ATOM_HAS_ENV: NativeFn = |frame, args| {
    let (key, walk) = split_path(args.get(0)?, "?env")?;
    let found = frame
        .first_key(key)
        .is_some_and(|binding| path::exists(&binding, walk));
    one(found)
};

pub fn register_scope_atoms(registry: &mut Registry) {
    registry.define("env", FunctionDescriptor::new(ATOM_ENV).param(Kind::String));
    registry.define("?env", FunctionDescriptor::new(ATOM_HAS_ENV).param(Kind::String));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ClosedConsole;
    use crate::engine::Engine;
    use serde_json::{json, Value as Json};

    fn run(program: Json) -> FunResult<Json> {
        Engine::new()
            .with_registry(Registry::standard())
            .with_console(ClosedConsole)
            .evaluate_json(&program)
    }

    #[test]
    fn accumulator_is_the_list_so_far() {
        assert_eq!(run(json!([1, 2, ["!env", "."]])).unwrap(), json!([1, 2, [1, 2]]));
        assert_eq!(run(json!([{"a": 1}, {"a": 2}, ["!env", ".a"]])).unwrap(), json!([{"a": 1}, {"a": 2}, 1, 2]));
    }

    #[test]
    fn has_env_checks_resolution() {
        assert_eq!(run(json!([{"a": 1}, ["!?env", ".a"], ["!?env", ".b"]])).unwrap(), json!([{"a": 1}, true, false]));
        assert_eq!(run(json!(["!?env", ":x"])).unwrap(), json!(false));
    }

    #[test]
    fn missing_paths_fail() {
        let err = run(json!([{"a": 1}, ["!env", ".b"]])).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::PathNotFound { key, .. } if key == "b"));
        let err = run(json!(["!env", "\\i"])).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::PathNotFound { .. }));
    }

    #[test]
    fn prefix_must_be_reserved() {
        for path in ["x.y", "", "   "] {
            let err = run(json!(["!env", path])).unwrap_err();
            assert!(matches!(err.kind(), ErrorKind::UserAssertion { .. }), "{path:?}");
            let err = run(json!(["!?env", path])).unwrap_err();
            assert!(matches!(err.kind(), ErrorKind::UserAssertion { .. }), "{path:?}");
        }
    }

    #[test]
    fn split_path_trims() {
        assert_eq!(split_path("  :a.b ", "env").unwrap(), (MAP_CONTEXT, "a.b"));
        assert_eq!(split_path("\\", "env").unwrap(), (LOCALS, ""));
    }
}
