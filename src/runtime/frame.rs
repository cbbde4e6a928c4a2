//! # Environment Frames
//!
//! Every evaluation step runs inside a [`Frame`]: a small mutable key→value
//! table with a borrowed link to its parent. Frames live on the Rust call
//! stack, so a child can never outlive the step that created it, and the chain
//! of parents doubles as the interpreted program's call stack.
//!
//! Bindings are held in a `RefCell` because builtins update the frame they are
//! running in while sibling expressions are still being evaluated against it
//! (the list accumulator and the map context are both observed this way).
//!
//! An accumulator is bound as a shared [`Rc`] of the items produced so far
//! ([`Frame::bind_shared`]). The producer unbinds it before appending, so
//! `Rc::make_mut` finds the only reference and rebinding stays O(1) per step.
//!
//! Three keys carry structural meaning:
//!
//! | key  | meaning                                              |
//! |------|------------------------------------------------------|
//! | `.`  | list accumulator, the output built so far            |
//! | `:`  | map context, the value a map-building builtin is on  |
//! | `\`  | local bindings, e.g. `{"i": 3}` inside `for`         |

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::console::Console;
use crate::diagnostics::{ErrorKind, FunResult, FunsonError};
use crate::engine::EngineConfig;
use crate::runtime::eval;
use crate::runtime::registry::Registry;
use crate::value::{Output, Value};

/// List accumulator key.
pub const ACCUMULATOR: &str = ".";
/// Map value context key.
pub const MAP_CONTEXT: &str = ":";
/// Local bindings key.
pub const LOCALS: &str = "\\";

/// Services shared by every frame of one evaluation.
#[derive(Clone, Copy)]
pub struct Runtime<'a> {
    pub registry: &'a Registry,
    pub console: &'a dyn Console,
    pub config: &'a EngineConfig,
}

/// What created a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameKind {
    /// The program boundary; the only frame without a parent.
    Root,
    /// An array evaluated element by element.
    List,
    /// A function invocation.
    Call { name: String },
    /// A scope opened by a builtin to bind locals.
    Scope,
}

/// A frame binding.
#[derive(Debug, Clone)]
enum Binding {
    Owned(Output),
    /// Items still being appended to by a list form (`spread: false`) or a
    /// loop body (`spread: true`).
    Shared { items: Rc<Vec<Value>>, spread: bool },
}

impl Binding {
    fn to_output(&self) -> Output {
        match self {
            Binding::Owned(output) => output.clone(),
            Binding::Shared { items, spread: true } => Output::Spread(items.to_vec()),
            Binding::Shared { items, spread: false } => Output::Value(Value::Array(items.to_vec())),
        }
    }

    fn is_empty_sequence(&self) -> bool {
        match self {
            Binding::Owned(Output::Value(Value::Array(items))) => items.is_empty(),
            Binding::Owned(Output::Spread(items)) => items.is_empty(),
            Binding::Owned(_) => false,
            Binding::Shared { items, .. } => items.is_empty(),
        }
    }
}

/// One scope record in the environment chain.
pub struct Frame<'a> {
    rt: Runtime<'a>,
    parent: Option<&'a Frame<'a>>,
    kind: FrameKind,
    depth: usize,
    vars: RefCell<HashMap<String, Binding>>,
}

impl<'a> Frame<'a> {
    /// The frame a whole program is evaluated in.
    pub fn root(rt: Runtime<'a>) -> Self {
        Self {
            rt,
            parent: None,
            kind: FrameKind::Root,
            depth: 0,
            vars: RefCell::new(HashMap::new()),
        }
    }

    /// Opens a nested frame, failing once the configured nesting depth is exceeded.
    pub fn child(&self, kind: FrameKind) -> FunResult<Frame<'_>> {
        let depth = self.depth + 1;
        if depth > self.rt.config.max_depth {
            return Err(FunsonError::new(ErrorKind::RecursionLimit {
                depth: self.rt.config.max_depth,
            }));
        }
        Ok(Frame {
            rt: self.rt,
            parent: Some(self),
            kind,
            depth,
            vars: RefCell::new(HashMap::new()),
        })
    }

    /// Opens a [`FrameKind::Scope`] child with one binding already in place.
    pub fn scope_with(&self, key: &str, value: impl Into<Output>) -> FunResult<Frame<'_>> {
        let scope = self.child(FrameKind::Scope)?;
        scope.bind(key, value);
        Ok(scope)
    }

    pub fn kind(&self) -> &FrameKind {
        &self.kind
    }

    pub fn parent(&self) -> Option<&Frame<'a>> {
        self.parent
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn registry(&self) -> &'a Registry {
        self.rt.registry
    }

    pub fn console(&self) -> &'a dyn Console {
        self.rt.console
    }

    pub fn config(&self) -> &'a EngineConfig {
        self.rt.config
    }

    /// Sets `key` in this frame, replacing any previous binding.
    pub fn bind(&self, key: &str, value: impl Into<Output>) {
        self.vars
            .borrow_mut()
            .insert(key.to_string(), Binding::Owned(value.into()));
    }

    /// Binds `key` to items the caller keeps appending to. Lookups see an
    /// array, or a spread when `spread` is set.
    pub fn bind_shared(&self, key: &str, items: &Rc<Vec<Value>>, spread: bool) {
        let binding = Binding::Shared {
            items: Rc::clone(items),
            spread,
        };
        self.vars.borrow_mut().insert(key.to_string(), binding);
    }

    /// Removes `key` from this frame.
    pub fn unbind(&self, key: &str) {
        self.vars.borrow_mut().remove(key);
    }

    /// Looks `key` up in this frame only.
    pub fn get(&self, key: &str) -> Option<Output> {
        self.vars.borrow().get(key).map(Binding::to_output)
    }

    /// Nearest-frame lookup: the first frame up the chain that defines `key`.
    pub fn first_key(&self, key: &str) -> Option<Output> {
        let mut frame = Some(self);
        while let Some(current) = frame {
            if let Some(found) = current.get(key) {
                return Some(found);
            }
            frame = current.parent;
        }
        None
    }

    /// True when this is a list frame that has produced nothing yet.
    pub(crate) fn at_list_start(&self) -> bool {
        if self.kind != FrameKind::List {
            return false;
        }
        self.vars
            .borrow()
            .get(ACCUMULATOR)
            .is_some_and(Binding::is_empty_sequence)
    }

    /// Evaluates `value` in this frame.
    pub fn process(&self, value: &Value) -> FunResult<Output> {
        eval::process(value, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ClosedConsole;

    fn with_root<R>(max_depth: usize, f: impl FnOnce(&Frame<'_>) -> R) -> R {
        let registry = Registry::new();
        let config = EngineConfig {
            max_depth,
            ..EngineConfig::default()
        };
        let rt = Runtime {
            registry: &registry,
            console: &ClosedConsole,
            config: &config,
        };
        f(&Frame::root(rt))
    }

    #[test]
    fn first_key_finds_nearest_definition() {
        with_root(8, |root| {
            root.bind(LOCALS, Value::from("outer"));
            let middle = root.child(FrameKind::List).unwrap();
            middle.bind(ACCUMULATOR, Value::Array(vec![]));
            let inner = middle.scope_with(LOCALS, Value::from("inner")).unwrap();
            assert_eq!(inner.first_key(LOCALS), Some(Output::Value(Value::from("inner"))));
            assert_eq!(middle.first_key(LOCALS), Some(Output::Value(Value::from("outer"))));
            assert_eq!(inner.first_key(MAP_CONTEXT), None);
        });
    }

    #[test]
    fn rebinding_is_visible_to_later_lookups() {
        with_root(8, |root| {
            let list = root.child(FrameKind::List).unwrap();
            list.bind(ACCUMULATOR, Value::Array(vec![]));
            assert!(list.at_list_start());
            list.bind(ACCUMULATOR, Value::Array(vec![Value::Null]));
            assert!(!list.at_list_start());
            let call = list.child(FrameKind::Call { name: "x".into() }).unwrap();
            assert!(!call.at_list_start());
            assert_eq!(call.parent().map(|p| p.depth()), Some(1));
        });
    }

    #[test]
    fn shared_bindings_follow_the_producer() {
        with_root(8, |root| {
            let list = root.child(FrameKind::List).unwrap();
            let mut items = Rc::new(Vec::new());
            list.bind_shared(ACCUMULATOR, &items, false);
            assert!(list.at_list_start());
            list.unbind(ACCUMULATOR);
            Rc::make_mut(&mut items).push(Value::Bool(true));
            assert_eq!(Rc::strong_count(&items), 1);

            list.bind_shared(ACCUMULATOR, &items, false);
            assert!(!list.at_list_start());
            assert_eq!(
                list.get(ACCUMULATOR),
                Some(Output::Value(Value::Array(vec![Value::Bool(true)])))
            );
            let scope = list.child(FrameKind::Scope).unwrap();
            scope.bind_shared(ACCUMULATOR, &items, true);
            assert_eq!(
                scope.first_key(ACCUMULATOR),
                Some(Output::Spread(vec![Value::Bool(true)]))
            );
        });
    }

    #[test]
    fn nesting_beyond_max_depth_fails() {
        with_root(1, |root| {
            let child = root.child(FrameKind::Scope).unwrap();
            assert!(!child.is_root());
            let err = child.child(FrameKind::Scope).err().unwrap();
            assert_eq!(err.kind(), &ErrorKind::RecursionLimit { depth: 1 });
        });
    }
}
