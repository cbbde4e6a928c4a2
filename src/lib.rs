//! # Funson
//!
//! An embeddable scripting engine whose programs are JSON documents. An array
//! whose first element is a string `"!name"` is a function call; every other
//! array is a list whose elements are evaluated in order; everything else is
//! data.
//!
//! ```rust
//! use funson::{evaluate, Value};
//!
//! let program: Value = serde_json::from_str(r#"["!concat", "fun", "son"]"#).unwrap();
//! assert_eq!(evaluate(&program).unwrap(), Value::from("funson"));
//! ```

pub use crate::console::{ClosedConsole, Console, ScriptedConsole, StdConsole};
pub use crate::diagnostics::{ErrorKind, FunResult, FunsonError};
pub use crate::engine::{evaluate, Engine, EngineConfig};
pub use crate::runtime::{
    global_registry, register_function, Args, Extract, Frame, FunctionDescriptor, NativeFn,
    Registry,
};
pub use crate::value::{Kind, Map, Output, Value};

pub mod atoms;
pub mod cli;
pub mod console;
pub mod diagnostics;
pub mod engine;
pub mod runtime;
pub mod value;
