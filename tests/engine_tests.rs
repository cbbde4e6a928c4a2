//! Evaluation semantics through the public embedding API.

mod common;

use common::run;
use funson::{evaluate, Engine, EngineConfig, ErrorKind, Registry, Value};
use serde_json::{json, Value as Json};

/// `i < bound` as a `for` condition.
fn below(bound: u32) -> Json {
    let mut cond = vec![json!("!?or"), json!(false)];
    cond.extend((0..bound).map(|n| json!(["!?eq", ["!env", "\\i"], n])));
    Json::Array(cond)
}

#[test]
fn literals_pass_through() {
    for literal in [json!(1), json!(2.5), json!(true), json!(null), json!("x"), json!("!!x")] {
        assert_eq!(run(literal.clone()).unwrap(), literal);
    }
}

#[test]
fn arrays_that_are_not_calls_are_lists() {
    assert_eq!(run(json!([1, 2, 3])).unwrap(), json!([1, 2, 3]));
    assert_eq!(run(json!(["!"])).unwrap(), json!(["!"]));
    assert_eq!(run(json!(["!!x"])).unwrap(), json!(["!x"]));
}

#[test]
fn escape_only_applies_at_list_start() {
    assert_eq!(run(json!(["!!x", "y"])).unwrap(), json!(["!x", "y"]));
    assert_eq!(run(json!(["a", "!!x"])).unwrap(), json!(["a", "!!x"]));
    assert_eq!(run(json!([1, ["!!x", "!!y"]])).unwrap(), json!([1, ["!x", "!!y"]]));
    assert_eq!(run(json!(["!!!x"])).unwrap(), json!(["!!x"]));
}

#[test]
fn nested_calls_inside_lists() {
    assert_eq!(run(json!(["!add", 1, 2])).unwrap(), json!(3));
    assert_eq!(run(json!([1, ["!add", 2, 3], 4])).unwrap(), json!([1, 5, 4]));
    assert_eq!(run(json!(["!add", ["!mul", 2, 3], ["!sub", 10, 4]])).unwrap(), json!(12));
}

#[test]
fn spreads_splice_into_lists() {
    assert_eq!(
        run(json!([0, ["!not", true, false], 9])).unwrap(),
        json!([0, false, true, 9])
    );
    assert_eq!(run(json!([["!not", true, false]])).unwrap(), json!([false, true]));
    assert_eq!(run(json!([1, ["!comment", "gone"], 2])).unwrap(), json!([1, 2]));
}

#[test]
fn top_level_spread_is_reduced() {
    assert_eq!(run(json!(["!comment"])).unwrap(), json!(null));
    assert_eq!(run(json!(["!not", true])).unwrap(), json!(false));
    let err = run(json!(["!not", true, false])).unwrap_err();
    assert_eq!(
        err.kind(),
        &ErrorKind::TooManyTopLevelResults {
            values: vec![Value::Bool(false), Value::Bool(true)]
        }
    );
}

#[test]
fn spreads_fill_argument_slots() {
    let indexes = json!(["!for", below(3), ["!env", "\\i"]]);
    assert_eq!(run(json!(["!sum", indexes.clone()])).unwrap(), json!(3));
    // the third value has no slot left
    assert_eq!(run(json!(["!add", indexes.clone()])).unwrap(), json!(1));
    assert_eq!(run(json!([indexes])).unwrap(), json!([0, 1, 2]));
}

#[test]
fn only_the_taken_branch_runs() {
    assert_eq!(run(json!(["!if", false, ["!div", 1, 0], 7])).unwrap(), json!(7));
    assert_eq!(run(json!(["!if", true, "yes", ["!div", 1, 0]])).unwrap(), json!("yes"));
}

#[test]
fn division_by_zero_is_reported_with_context() {
    let err = run(json!([1, ["!add", 1, ["!div", 1, 0]]])).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::DivisionByZero);
    assert_eq!(
        err.to_string(),
        "processing item 1: argument 2 of function add: function div: division by 0"
    );
}

#[test]
fn undefined_functions_are_reported() {
    let err = run(json!([1, ["!nope", 2]])).unwrap_err();
    assert_eq!(
        err.kind(),
        &ErrorKind::UndefinedFunction {
            name: "nope".into()
        }
    );
}

#[test]
fn objects_are_data() {
    let program = json!({"total": ["!add", 1, 2], "list": [["!add", 1, 2]]});
    assert_eq!(run(program.clone()).unwrap(), program);
}

#[test]
fn accumulator_paths_broadcast() {
    let program = json!([{"price": 2}, {"price": 3}, ["!sum", ["!env", ".price"]]]);
    assert_eq!(run(program).unwrap(), json!([{"price": 2}, {"price": 3}, 5]));
}

#[test]
fn map_context_is_nearest_frame() {
    let program = json!([
        "!pairsToMap",
        ["outer", 1],
        ["inner", ["!pairsToMap", ["x", ["!?env", ":outer"]]]],
        ["seen", ["!?env", ":inner"]]
    ]);
    assert_eq!(
        run(program).unwrap(),
        json!({"outer": 1, "inner": {"x": false}, "seen": true})
    );
}

#[test]
fn loop_collects_body_results() {
    let program = json!([["!for", below(3), ["!env", "\\i"]]]);
    assert_eq!(run(program).unwrap(), json!([0, 1, 2]));

    let squares = json!([["!for", below(4), ["!mul", ["!env", "\\i"], ["!env", "\\i"]]]]);
    assert_eq!(run(squares).unwrap(), json!([0, 1, 4, 9]));
}

#[test]
fn string_builtins() {
    assert_eq!(run(json!(["!concat", "fun", "son"])).unwrap(), json!("funson"));
    assert_eq!(run(json!(["!split", "-", "a-b"])).unwrap(), json!(["a", "b"]));
    assert_eq!(
        run(json!(["!replacePrefix", "http:", "https:", "http://x"])).unwrap(),
        json!("https://x")
    );
}

#[test]
fn recursion_limit_stops_deep_programs() {
    let mut program = json!(1);
    for _ in 0..40 {
        program = json!([program]);
    }
    let engine = Engine::new()
        .with_registry(Registry::standard())
        .with_config(EngineConfig {
            max_depth: 32,
            ..EngineConfig::default()
        });
    let err = engine.evaluate_json(&program).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::RecursionLimit { depth: 32 });
}

#[test]
fn nesting_up_to_the_default_limit_runs() {
    let nested_calls = |depth: usize| {
        let mut program = json!(0);
        for _ in 0..depth {
            program = json!(["!add", program, 1]);
        }
        program
    };
    assert_eq!(run(nested_calls(500)).unwrap(), json!(500));
    let err = run(nested_calls(600)).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::RecursionLimit { depth: 512 });

    let mut lists = json!(1);
    for _ in 0..500 {
        lists = json!([lists]);
    }
    assert_eq!(run(lists.clone()).unwrap(), lists);
}

#[test]
fn long_lists_evaluate_in_linear_time() {
    let mut items: Vec<Json> = (0..50_000).map(|n| json!([n, ["!add", n, 1]])).collect();
    let mut expected: Vec<Json> = (0..50_000).map(|n| json!([n, n + 1])).collect();
    items.push(json!(["!?env", "."]));
    expected.push(json!(true));
    assert_eq!(run(Json::Array(items)).unwrap(), Json::Array(expected));
}

#[test]
fn free_function_uses_the_process_registry() {
    let program: Value = serde_json::from_str(r#"["!roundN", 1.23456, 2]"#).unwrap();
    assert_eq!(evaluate(&program).unwrap(), Value::Number(1.23));
}
