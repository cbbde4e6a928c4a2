//! # Funson Test Helpers
//!
//! Shared by the integration tests: engines over an isolated standard
//! registry, fed either no console input or a scripted one.

#![allow(dead_code)]

use funson::{ClosedConsole, Engine, FunResult, Registry, ScriptedConsole};
use serde_json::Value as Json;

/// Evaluates `program` with no console input available.
pub fn run(program: Json) -> FunResult<Json> {
    Engine::new()
        .with_registry(Registry::standard())
        .with_console(ClosedConsole)
        .evaluate_json(&program)
}

/// Evaluates `program` answering prompts from `answers` (one per line).
/// Returns the result and everything the program showed.
pub fn run_scripted(program: Json, answers: &str) -> (FunResult<Json>, String) {
    let console = ScriptedConsole::new(answers);
    let result = Engine::new()
        .with_registry(Registry::standard())
        .with_console(console.clone())
        .evaluate_json(&program);
    (result, console.transcript())
}
