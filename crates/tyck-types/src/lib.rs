//! Type-node algebra for the tyck structural validator.
//!
//! This crate is organized into several submodules:
//! - `node` - the `TType` tagged sum and its per-variant payloads
//! - `basics` - the built-in suite of primitive and native types
//! - `suite` - `TypeSuite`, the name-resolution environment
//! - `builders` - free-function constructors for assembling type graphs

pub mod basics;
pub mod builders;
pub mod node;
pub mod suite;

// Re-export key types
pub use basics::builtin_suite;
pub use builders::{
    INDEX_KEY, array, enumlit, enumtype, func, iface, intersection, lit, name, opt, param,
    partial, prop, rest, tuple, union,
};
pub use node::{
    Lit, TArray, TBasic, TEnum, TEnumLiteral, TFunc, TIface, TIntersection, TLiteral, TName,
    TOptional, TParam, TParamList, TPartial, TProp, TRest, TTuple, TType, TUnion,
};
pub use suite::TypeSuite;
