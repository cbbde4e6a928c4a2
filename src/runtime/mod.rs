//! The evaluation core: environment frames, the function registry, argument
//! dispatch, the recursive evaluator and path resolution.

pub mod dispatch;
pub mod eval;
pub mod frame;
pub mod path;
pub mod registry;

pub use eval::{call_form, is_call_form, process, reduce};
pub use frame::{Frame, FrameKind, Runtime, ACCUMULATOR, LOCALS, MAP_CONTEXT};
pub use registry::{
    global_registry, register_function, Args, Extract, FunctionDescriptor, NativeFn, Registry,
};
