//! # Funson Builtins
//!
//! The standard library every [`Registry::standard`] starts with.
//!
//! ## Module Structure
//!
//! - **`helpers`**: shared infrastructure for all builtins
//! - **`math`**: `add`, `sub`, `mul`, `div`, `sum`, rounding
//! - **`string`**: `concat`, `split`, `replacePrefix`
//! - **`logic`**: `not`, `?and`, `?or`, `?eq`
//! - **`control`**: `comment`, `if`, `for`
//! - **`scope`**: `env`, `?env`
//! - **`collections`**: `item`, `pairsToMap`
//! - **`interactive`**: `input`, `choose`
//!
//! Every builtin is a [`NativeFn`](crate::runtime::registry::NativeFn) and
//! each module exposes one `register_*_atoms` function.

use crate::runtime::registry::Registry;

pub mod collections;
pub mod control;
pub mod helpers;
pub mod interactive;
pub mod logic;
pub mod math;
pub mod scope;
pub mod string;

pub use collections::register_collection_atoms;
pub use control::register_control_atoms;
pub use interactive::register_interactive_atoms;
pub use logic::register_logic_atoms;
pub use math::register_math_atoms;
pub use scope::register_scope_atoms;
pub use string::register_string_atoms;

/// Registers the whole standard library.
pub fn register_all_atoms(registry: &mut Registry) {
    register_math_atoms(registry);
    register_string_atoms(registry);
    register_logic_atoms(registry);
    register_control_atoms(registry);
    register_scope_atoms(registry);
    register_collection_atoms(registry);
    register_interactive_atoms(registry);
}
