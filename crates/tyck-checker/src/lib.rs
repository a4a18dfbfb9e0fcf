//! Checker compilation and the user-facing facade.
//!
//! This crate is organized into several submodules:
//! - `context` - diagnostic contexts: failure frames, forks, union
//!   resolution and error rendering
//! - `compile` - `Compiler`, turning type nodes into checker closures
//! - `facade` - `Checker` and `create_checkers`, the public entry points

pub mod compile;
pub mod context;
pub mod facade;

// Re-export key types
pub use compile::{CheckFn, CompileFlags};
pub use context::{Ctx, Key, UnionResolver};
pub use facade::{Checker, create_checkers};
