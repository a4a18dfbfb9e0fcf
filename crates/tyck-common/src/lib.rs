//! Common types for the tyck structural validator.
//!
//! This crate provides the foundational types shared by the other tyck
//! crates:
//! - The dynamic value model (`Value`)
//! - Validation error records (`ErrorDetail`, `ValidationError`)
//! - Fatal error enums (`CompileError`, `FacadeError`)

// Dynamic values - what checkers are applied to
pub mod value;
pub use value::Value;

// Error records and fatal error enums
pub mod error;
pub use error::{CompileError, ErrorDetail, FacadeError, ValidationError};
