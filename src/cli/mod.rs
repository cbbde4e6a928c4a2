//! The Funson Command-Line Interface.
//!
//! `funson SOURCE` reads SOURCE as JSON, evaluates it and prints the result
//! as a single JSON line. Every failure stage has its own exit code:
//!
//! | code | stage                  |
//! |------|------------------------|
//! | 0    | success                |
//! | 1    | usage                  |
//! | 2    | reading SOURCE         |
//! | 3    | parsing JSON           |
//! | 4    | evaluation             |
//! | 5    | serializing the result |

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use miette::{Diagnostic, Report};
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cli::args::FunsonArgs;
use crate::diagnostics::FunsonError;
use crate::engine::{Engine, EngineConfig};
use crate::value::Value;

pub mod args;
pub mod output;

/// Exit code for command-line usage errors.
pub const EXIT_USAGE: u8 = 1;

/// A failed CLI run, one variant per stage.
#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("can not read {}", .path.display())]
    #[diagnostic(code(funson::cli::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("source is not valid JSON")]
    #[diagnostic(code(funson::cli::parse))]
    Parse(#[source] serde_json::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Evaluate(FunsonError),

    #[error("result can not be serialized")]
    #[diagnostic(code(funson::cli::serialize))]
    Serialize(#[source] FunsonError),
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Read { .. } => 2,
            CliError::Parse(_) => 3,
            CliError::Evaluate(_) => 4,
            CliError::Serialize(_) => 5,
        }
    }

    fn stage(&self) -> &'static str {
        match self {
            CliError::Read { .. } => "reading",
            CliError::Parse(_) => "parsing",
            CliError::Evaluate(_) => "evaluation",
            CliError::Serialize(_) => "serialization",
        }
    }
}

/// Reads, evaluates and serializes one program.
pub fn execute(args: &FunsonArgs) -> Result<String, CliError> {
    let source = fs::read_to_string(&args.source).map_err(|source| CliError::Read {
        path: args.source.clone(),
        source,
    })?;
    let program: Value = serde_json::from_str(&source).map_err(CliError::Parse)?;

    let mut config = EngineConfig::default();
    if let Some(depth) = args.max_depth {
        config.max_depth = depth;
    }
    debug!(source = %args.source.display(), max_depth = config.max_depth, "running");
    let result = Engine::new()
        .with_config(config)
        .evaluate(&program)
        .map_err(CliError::Evaluate)?;

    let json = result.to_json().map_err(CliError::Serialize)?;
    Ok(json.to_string())
}

/// Log filter from `FUNSON_LOG`, then `RUST_LOG`, defaulting to `warn`.
fn init_logging() {
    let filter = EnvFilter::try_from_env("FUNSON_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// The main entry point for the CLI.
pub fn run() -> ExitCode {
    init_logging();
    let args = match FunsonArgs::try_parse() {
        Ok(args) => args,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(EXIT_USAGE);
        }
    };

    match execute(&args) {
        Ok(json) => {
            output::print_result(&json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            let code = e.exit_code();
            output::print_failure(e.stage(), Report::new(e));
            ExitCode::from(code)
        }
    }
}
