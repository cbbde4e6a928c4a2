//! # Embedding API
//!
//! An [`Engine`] bundles a registry snapshot, a console device and the
//! evaluation settings. [`evaluate`] is the one-call convenience entry point
//! using the process-wide registry and the terminal console.
//!
//! ```rust
//! use funson::{Engine, Value};
//!
//! let program: Value = serde_json::from_str(r#"[1, ["!add", 2, 3], 4]"#).unwrap();
//! let result = Engine::new().evaluate(&program).unwrap();
//! assert_eq!(result.to_string(), "[1,5,4]");
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::console::{Console, StdConsole};
use crate::diagnostics::FunResult;
use crate::runtime::eval;
use crate::runtime::frame::{Frame, Runtime};
use crate::runtime::registry::{global_registry, Registry};
use crate::value::Value;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Evaluation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EngineConfig {
    /// Deepest frame nesting allowed before evaluation fails.
    pub max_depth: usize,
    /// strftime pattern `input` parses datetimes with unless the call overrides it.
    pub datetime_input_format: String,
    /// strftime pattern `input` renders datetimes with unless the call overrides it.
    pub datetime_output_format: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: 512,
            datetime_input_format: "%d %b %y %H:%M %Z".to_string(),
            datetime_output_format: "%d %b %y %H:%M %Z".to_string(),
        }
    }
}

// ============================================================================
// ENGINE
// ============================================================================

/// A configured evaluator.
pub struct Engine {
    registry: Registry,
    console: Box<dyn Console>,
    config: EngineConfig,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// An engine over a snapshot of the process-wide registry, prompting on the terminal.
    pub fn new() -> Self {
        Self {
            registry: global_registry(),
            console: Box::new(StdConsole),
            config: EngineConfig::default(),
        }
    }

    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_console(mut self, console: impl Console + 'static) -> Self {
        self.console = Box::new(console);
        self
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluates a program in a fresh root frame.
    pub fn evaluate(&self, program: &Value) -> FunResult<Value> {
        let rt = Runtime {
            registry: &self.registry,
            console: self.console.as_ref(),
            config: &self.config,
        };
        let root = Frame::root(rt);
        debug!(max_depth = self.config.max_depth, "evaluating program");
        eval::process(program, &root).and_then(eval::reduce)
    }

    /// Evaluates a `serde_json` document and converts the result back.
    pub fn evaluate_json(&self, program: &serde_json::Value) -> FunResult<serde_json::Value> {
        self.evaluate(&Value::from(program.clone()))?.to_json()
    }
}

/// Evaluates `program` with a default [`Engine`].
pub fn evaluate(program: &Value) -> FunResult<Value> {
    Engine::new().evaluate(program)
}
