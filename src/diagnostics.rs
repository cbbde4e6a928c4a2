//! # Funson Diagnostics
//!
//! The unified, `miette`-based error type for the engine. Every failure raised
//! while binding arguments, evaluating expressions, running builtins or talking
//! to the console device is a [`FunsonError`]. The evaluation boundary is the
//! single place these surface to the host.
//!
//! A `FunsonError` is an [`ErrorKind`] (what went wrong) plus a trail of
//! context frames (where it went wrong). The trail is recorded innermost first
//! as the error travels outwards through list items, arguments and builtins;
//! it never changes the kind, so callers can always match on [`FunsonError::kind`].
//!
//! Use [`err_msg!`](crate::err_msg) for builtin-raised assertion failures:
//! ```rust
//! use funson::{err_msg, ErrorKind};
//! let err = err_msg!("for: condition has to be a function: {}", 1);
//! assert!(matches!(err.kind(), ErrorKind::UserAssertion { .. }));
//! ```

use std::fmt;

use miette::Diagnostic;
use thiserror::Error;

use crate::value::{Kind, Value};

/// Convenient alias used by every fallible engine operation.
pub type FunResult<T> = Result<T, FunsonError>;

// ============================================================================
// ERROR KINDS
// ============================================================================

/// The closed taxonomy of engine failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErrorKind {
    // Dispatch
    #[error("no function found: {name}")]
    UndefinedFunction { name: String },
    #[error("not enough arguments for function {name}: argument {slot} is missing")]
    NotEnoughArguments { name: String, slot: usize },
    #[error("argument {slot} type mismatch for function {name}: got {got}, want {want}")]
    ArgumentTypeMismatch {
        name: String,
        slot: usize,
        got: Kind,
        want: Kind,
    },

    // Evaluation
    #[error("multiple values returned: {}", Value::Array(values.clone()))]
    TooManyTopLevelResults { values: Vec<Value> },
    #[error("no \"{key}\" in {container}")]
    PathNotFound { key: String, container: Value },
    #[error("{value} is not an integer")]
    NotAnInteger { value: f64 },
    #[error("division by 0")]
    DivisionByZero,
    #[error("invalid regular expression: {message}")]
    InvalidRegularExpression { message: String },
    #[error("{message}")]
    UserAssertion { message: String },
    #[error("evaluation nested deeper than {depth} levels")]
    RecursionLimit { depth: usize },

    // Registration
    #[error("function \"{name}\" has no implementation")]
    MissingImplementation { name: String },
    #[error("duplicate function name: {name}")]
    DuplicateFunction { name: String },

    // JSON boundary
    #[error("{value} can not be represented as JSON")]
    NotSerializable { value: String },

    // Console input
    #[error("\"{input}\" is not a number")]
    NotANumber { input: String },
    #[error("\"{input}\" is not an integer")]
    NotAnIntegerInput { input: String },
    #[error("\"{input}\" is not a date in format \"{format}\"")]
    InvalidDate { input: String, format: String },
    #[error("input ended while waiting for an answer")]
    EndOfInput,
    #[error("console I/O failed: {message}")]
    Io { message: String },
}

impl ErrorKind {
    /// Stable suffix used to build diagnostic codes.
    pub fn code_suffix(&self) -> &'static str {
        match self {
            ErrorKind::UndefinedFunction { .. } => "undefined_function",
            ErrorKind::NotEnoughArguments { .. } => "not_enough_arguments",
            ErrorKind::ArgumentTypeMismatch { .. } => "argument_type_mismatch",
            ErrorKind::TooManyTopLevelResults { .. } => "too_many_top_level_results",
            ErrorKind::PathNotFound { .. } => "path_not_found",
            ErrorKind::NotAnInteger { .. } => "not_an_integer",
            ErrorKind::DivisionByZero => "division_by_zero",
            ErrorKind::InvalidRegularExpression { .. } => "invalid_regular_expression",
            ErrorKind::UserAssertion { .. } => "assertion",
            ErrorKind::RecursionLimit { .. } => "recursion_limit",
            ErrorKind::MissingImplementation { .. } => "missing_implementation",
            ErrorKind::DuplicateFunction { .. } => "duplicate_function",
            ErrorKind::NotSerializable { .. } => "not_serializable",
            ErrorKind::NotANumber { .. } => "not_a_number",
            ErrorKind::NotAnIntegerInput { .. } => "not_an_integer",
            ErrorKind::InvalidDate { .. } => "invalid_date",
            ErrorKind::EndOfInput => "end_of_input",
            ErrorKind::Io { .. } => "io",
        }
    }

    /// The phase of the pipeline the error belongs to.
    pub fn phase(&self) -> &'static str {
        match self {
            ErrorKind::UndefinedFunction { .. }
            | ErrorKind::NotEnoughArguments { .. }
            | ErrorKind::ArgumentTypeMismatch { .. } => "dispatch",
            ErrorKind::MissingImplementation { .. } | ErrorKind::DuplicateFunction { .. } => {
                "registry"
            }
            ErrorKind::NotSerializable { .. } => "json",
            ErrorKind::NotANumber { .. }
            | ErrorKind::NotAnIntegerInput { .. }
            | ErrorKind::InvalidDate { .. }
            | ErrorKind::EndOfInput
            | ErrorKind::Io { .. } => "input",
            _ => "eval",
        }
    }

    fn help(&self) -> Option<String> {
        match self {
            ErrorKind::UndefinedFunction { name } => Some(format!(
                "register \"{name}\" before evaluating, or escape the string as \"!!{name}\" to keep it as data"
            )),
            ErrorKind::TooManyTopLevelResults { .. } => Some(
                "wrap the top-level call in a list to keep every value, e.g. [[\"!fn\", ...]]"
                    .to_string(),
            ),
            ErrorKind::RecursionLimit { .. } => {
                Some("raise EngineConfig::max_depth or flatten the program".to_string())
            }
            ErrorKind::PathNotFound { .. } => {
                Some("use ?env to test whether a path resolves before reading it".to_string())
            }
            _ => None,
        }
    }
}

// ============================================================================
// THE ERROR TYPE
// ============================================================================

/// An engine error: a kind plus the context trail it was raised through.
#[derive(Debug, Clone, PartialEq)]
pub struct FunsonError {
    kind: ErrorKind,
    trail: Vec<String>,
}

impl FunsonError {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            trail: Vec::new(),
        }
    }

    /// Shorthand for a builtin-raised assertion failure.
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UserAssertion {
            message: message.into(),
        })
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn into_kind(self) -> ErrorKind {
        self.kind
    }

    /// Context frames, innermost first.
    pub fn trail(&self) -> &[String] {
        &self.trail
    }

    /// Records one more (outer) context frame.
    pub fn within(mut self, context: impl Into<String>) -> Self {
        self.trail.push(context.into());
        self
    }

    /// Diagnostic code, e.g. `funson::dispatch::undefined_function`.
    pub fn diagnostic_code(&self) -> String {
        format!("funson::{}::{}", self.kind.phase(), self.kind.code_suffix())
    }
}

impl From<ErrorKind> for FunsonError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl From<std::io::Error> for FunsonError {
    fn from(err: std::io::Error) -> Self {
        Self::new(ErrorKind::Io {
            message: err.to_string(),
        })
    }
}

impl fmt::Display for FunsonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for context in self.trail.iter().rev() {
            write!(f, "{context}: ")?;
        }
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for FunsonError {}

impl Diagnostic for FunsonError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.diagnostic_code()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.kind
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display + 'a>)
    }
}

/// Constructs a `UserAssertion` [`FunsonError`] from a format string.
#[macro_export]
macro_rules! err_msg {
    ($($arg:tt)*) => {
        $crate::FunsonError::assertion(format!($($arg)*))
    };
}
