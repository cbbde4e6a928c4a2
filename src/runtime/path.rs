//! Dot-separated path walking over frame bindings.
//!
//! Objects are walked by key. Arrays (and spread bindings) broadcast the
//! remaining path over every element and concatenate what each element yields,
//! so the result of a walk can hold any number of values.

use crate::diagnostics::{ErrorKind, FunResult, FunsonError};
use crate::value::{Output, Value};

/// Resolves `path` against a binding. An empty path yields the binding itself.
pub fn resolve(binding: &Output, path: &str) -> FunResult<Output> {
    if path.is_empty() {
        return Ok(binding.clone());
    }
    match binding {
        Output::Value(value) => resolve_value(value, path),
        Output::Spread(items) => broadcast(items, path),
    }
}

/// Whether `resolve` would succeed. Arrays need only one element to resolve.
pub fn exists(binding: &Output, path: &str) -> bool {
    if path.is_empty() {
        return true;
    }
    match binding {
        Output::Value(value) => exists_value(value, path),
        Output::Spread(items) => items.iter().any(|item| exists_value(item, path)),
    }
}

fn split(path: &str) -> (&str, &str) {
    path.split_once('.').unwrap_or((path, ""))
}

fn resolve_value(value: &Value, path: &str) -> FunResult<Output> {
    if path.is_empty() {
        return Ok(Output::Value(value.clone()));
    }
    let (head, tail) = split(path);
    match value {
        Value::Object(map) => match map.get(head) {
            Some(next) => resolve_value(next, tail),
            None => Err(not_found(head, value)),
        },
        Value::Array(items) => broadcast(items, path),
        _ => Err(not_found(head, value)),
    }
}

fn broadcast(items: &[Value], path: &str) -> FunResult<Output> {
    let mut out = Vec::new();
    for item in items {
        resolve_value(item, path)?.splice_into(&mut out);
    }
    Ok(Output::Spread(out))
}

fn exists_value(value: &Value, path: &str) -> bool {
    if path.is_empty() {
        return true;
    }
    let (head, tail) = split(path);
    match value {
        Value::Object(map) => map.get(head).is_some_and(|next| exists_value(next, tail)),
        Value::Array(items) => items.iter().any(|item| exists_value(item, path)),
        _ => false,
    }
}

fn not_found(key: &str, container: &Value) -> FunsonError {
    FunsonError::new(ErrorKind::PathNotFound {
        key: key.to_string(),
        container: container.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn binding(json: serde_json::Value) -> Output {
        Output::Value(Value::from(json))
    }

    #[test]
    fn walks_nested_objects() {
        let b = binding(json!({"a": {"b": 3}}));
        assert_eq!(resolve(&b, "a.b").unwrap(), Output::Value(Value::Number(3.0)));
        assert!(exists(&b, "a.b"));
        assert!(!exists(&b, "a.c"));
    }

    #[test]
    fn arrays_broadcast_the_whole_path() {
        let b = binding(json!([{"n": 1}, {"n": 2}, [{"n": 3}]]));
        assert_eq!(
            resolve(&b, "n").unwrap(),
            Output::Spread(vec![Value::Number(1.0), Value::Number(2.0), Value::Number(3.0)])
        );
    }

    #[test]
    fn empty_path_returns_binding_unchanged() {
        let spread = Output::Spread(vec![Value::Bool(true)]);
        assert_eq!(resolve(&spread, "").unwrap(), spread);
        assert!(exists(&spread, ""));
    }

    #[test]
    fn missing_key_reports_container() {
        let b = binding(json!({"a": 1}));
        let err = resolve(&b, "a.b").unwrap_err();
        assert_eq!(
            err.kind(),
            &ErrorKind::PathNotFound {
                key: "b".into(),
                container: Value::Number(1.0),
            }
        );
        assert!(!exists(&binding(json!([{"x": 1}, {"y": 2}])), "z"));
        assert!(exists(&binding(json!([{"x": 1}, {"y": 2}])), "y"));
    }
}
