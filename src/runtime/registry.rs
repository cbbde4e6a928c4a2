//! # Function Registry
//!
//! Maps function names to [`FunctionDescriptor`]s: the ordered parameter kinds
//! the dispatcher binds, an optional variadic tail kind, and the native
//! implementation.
//!
//! There is one process-wide registry, seeded with the standard library the
//! first time it is touched. Hosts add their own functions with
//! [`register_function`] before evaluating; every [`Engine`](crate::Engine)
//! takes a snapshot of it when constructed. Tests and embedders that want
//! isolation build a local [`Registry`] and hand it to the engine directly.
//!
//! ```rust
//! use funson::{FunctionDescriptor, Kind, Output, Registry, Value};
//!
//! let mut registry = Registry::standard();
//! registry
//!     .register(
//!         "twice",
//!         FunctionDescriptor::new(|_, args| {
//!             let n: f64 = args.get(0)?;
//!             Ok(vec![Output::Value(Value::Number(n * 2.0))])
//!         })
//!         .param(Kind::Number),
//!     )
//!     .unwrap();
//! assert!(registry.contains("twice"));
//! assert!(registry.register("twice", FunctionDescriptor::empty()).is_err());
//! ```

use std::fmt;
use std::sync::{PoisonError, RwLock};

use im::HashMap;
use once_cell::sync::Lazy;

use crate::atoms;
use crate::diagnostics::{ErrorKind, FunResult, FunsonError};
use crate::runtime::frame::Frame;
use crate::value::{Kind, Map, Output, Value};

// ============================================================================
// NATIVE FUNCTIONS AND DESCRIPTORS
// ============================================================================

/// Native implementation: receives the invocation frame and the bound
/// arguments, returns any number of outputs (each spliced by the caller).
pub type NativeFn = fn(&Frame<'_>, Args) -> FunResult<Vec<Output>>;

/// A registered function's signature plus implementation.
#[derive(Clone, Default)]
pub struct FunctionDescriptor {
    params: Vec<Kind>,
    variadic: Option<Kind>,
    native: Option<NativeFn>,
}

impl FunctionDescriptor {
    pub fn new(native: NativeFn) -> Self {
        Self {
            native: Some(native),
            ..Self::default()
        }
    }

    /// A descriptor without an implementation; registering it is rejected.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Appends one required parameter.
    pub fn param(mut self, kind: Kind) -> Self {
        self.params.push(kind);
        self
    }

    pub fn params(mut self, kinds: &[Kind]) -> Self {
        self.params.extend_from_slice(kinds);
        self
    }

    /// Sets the variadic tail kind.
    pub fn variadic(mut self, kind: Kind) -> Self {
        self.variadic = Some(kind);
        self
    }

    pub fn required(&self) -> &[Kind] {
        &self.params
    }

    pub fn tail(&self) -> Option<Kind> {
        self.variadic
    }

    pub fn native(&self) -> Option<NativeFn> {
        self.native
    }

    /// Human-readable signature, e.g. `(number, number, ...string)`.
    pub fn signature(&self) -> String {
        let mut parts: Vec<String> = self.params.iter().map(|k| k.to_string()).collect();
        if let Some(tail) = self.variadic {
            parts.push(format!("...{tail}"));
        }
        format!("({})", parts.join(", "))
    }
}

impl fmt::Debug for FunctionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionDescriptor")
            .field("params", &self.params)
            .field("variadic", &self.variadic)
            .field("native", &self.native.is_some())
            .finish()
    }
}

impl PartialEq for FunctionDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.params == other.params
            && self.variadic == other.variadic
            && self.native.map(|f| f as usize) == other.native.map(|f| f as usize)
    }
}

// ============================================================================
// BOUND ARGUMENTS
// ============================================================================

/// Arguments bound by the dispatcher for one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    name: String,
    values: Vec<Value>,
    rest: Vec<Value>,
}

impl Args {
    pub fn new(name: impl Into<String>, values: Vec<Value>, rest: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
            rest,
        }
    }

    /// Name the function was invoked under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The required argument at `index` (0-based).
    pub fn value(&self, index: usize) -> FunResult<&Value> {
        self.values.get(index).ok_or_else(|| {
            FunsonError::new(ErrorKind::NotEnoughArguments {
                name: self.name.clone(),
                slot: index + 1,
            })
        })
    }

    /// The required argument at `index`, extracted as `T`.
    pub fn get<'v, T: Extract<'v>>(&'v self, index: usize) -> FunResult<T> {
        let value = self.value(index)?;
        T::extract(value).ok_or_else(|| self.mismatch(index + 1, value, T::KIND))
    }

    /// The variadic tail as raw values.
    pub fn rest_values(&self) -> &[Value] {
        &self.rest
    }

    /// The variadic tail, each element extracted as `T`.
    pub fn rest<'v, T: Extract<'v>>(&'v self) -> FunResult<Vec<T>> {
        let offset = self.values.len() + 1;
        self.rest
            .iter()
            .enumerate()
            .map(|(i, value)| {
                T::extract(value).ok_or_else(|| self.mismatch(offset + i, value, T::KIND))
            })
            .collect()
    }

    fn mismatch(&self, slot: usize, value: &Value, want: Kind) -> FunsonError {
        FunsonError::new(ErrorKind::ArgumentTypeMismatch {
            name: self.name.clone(),
            slot,
            got: value.kind(),
            want,
        })
    }
}

/// Typed extraction from a bound argument.
pub trait Extract<'v>: Sized {
    const KIND: Kind;
    fn extract(value: &'v Value) -> Option<Self>;
}

impl<'v> Extract<'v> for f64 {
    const KIND: Kind = Kind::Number;
    fn extract(value: &'v Value) -> Option<Self> {
        value.as_f64()
    }
}

impl<'v> Extract<'v> for bool {
    const KIND: Kind = Kind::Bool;
    fn extract(value: &'v Value) -> Option<Self> {
        value.as_bool()
    }
}

impl<'v> Extract<'v> for &'v str {
    const KIND: Kind = Kind::String;
    fn extract(value: &'v Value) -> Option<Self> {
        value.as_str()
    }
}

impl<'v> Extract<'v> for &'v [Value] {
    const KIND: Kind = Kind::Array;
    fn extract(value: &'v Value) -> Option<Self> {
        value.as_array()
    }
}

impl<'v> Extract<'v> for &'v Map {
    const KIND: Kind = Kind::Object;
    fn extract(value: &'v Value) -> Option<Self> {
        value.as_object()
    }
}

impl<'v> Extract<'v> for &'v Value {
    const KIND: Kind = Kind::Any;
    fn extract(value: &'v Value) -> Option<Self> {
        Some(value)
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Name → descriptor table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registry {
    functions: HashMap<String, FunctionDescriptor>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the standard library.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        atoms::register_all_atoms(&mut registry);
        registry
    }

    /// Adds `name`. Fails without touching the registry when the descriptor
    /// has no implementation or the name is taken.
    pub fn register(&mut self, name: &str, descriptor: FunctionDescriptor) -> FunResult<()> {
        if descriptor.native.is_none() {
            return Err(FunsonError::new(ErrorKind::MissingImplementation {
                name: name.to_string(),
            }));
        }
        if self.functions.contains_key(name) {
            return Err(FunsonError::new(ErrorKind::DuplicateFunction {
                name: name.to_string(),
            }));
        }
        self.functions.insert(name.to_string(), descriptor);
        Ok(())
    }

    /// Infallible registration for the standard library; later definitions win.
    pub(crate) fn define(&mut self, name: &str, descriptor: FunctionDescriptor) {
        self.functions.insert(name.to_string(), descriptor);
    }

    pub fn get(&self, name: &str) -> Option<&FunctionDescriptor> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.functions.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

// ============================================================================
// PROCESS-WIDE REGISTRY
// ============================================================================

static GLOBAL_REGISTRY: Lazy<RwLock<Registry>> = Lazy::new(|| RwLock::new(Registry::standard()));

/// Registers a function in the process-wide registry.
///
/// Engines created afterwards see it; engines created earlier keep their snapshot.
pub fn register_function(name: &str, descriptor: FunctionDescriptor) -> FunResult<()> {
    GLOBAL_REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register(name, descriptor)
}

/// A snapshot of the process-wide registry.
pub fn global_registry() -> Registry {
    GLOBAL_REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}
