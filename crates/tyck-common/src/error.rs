//! Error types for validation failures and fatal misuse.
//!
//! Two distinct categories:
//! - `ErrorDetail` / `ValidationError` describe a *value* failing a check;
//!   they are ordinary data, produced by `validate` and `check`.
//! - `CompileError` / `FacadeError` are fatal to the caller: a malformed
//!   type graph or a navigation call that makes no sense for the bound
//!   type.

use serde::Serialize;
use thiserror::Error;

/// One failure location: the path of the offending sub-value and what is
/// wrong with it, e.g. `value.addresses[2].zip` / `is not a string`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDetail {
    pub path: String,
    pub message: String,
}

impl ErrorDetail {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        ErrorDetail {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// The error raised by `check` when a value does not conform.
///
/// `path` and `message` describe the best single diagnostic; `details`
/// lists every reported failure location (parallel union branches and
/// sibling property failures included).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{path} {message}")]
pub struct ValidationError {
    pub path: String,
    pub message: String,
    pub details: Vec<ErrorDetail>,
}

/// Fatal problems in the type graph itself, reported when checkers are
/// compiled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// A `Name` node does not resolve within the merged suite
    #[error("unknown type {0}")]
    UnknownType(String),

    /// An enum literal names a type that is not an enum
    #[error("type {0} is not an enum type")]
    NotAnEnumType(String),

    /// An enum literal names a member the enum does not have
    #[error("unknown enum member {enum_name}.{member}")]
    UnknownEnumMember { enum_name: String, member: String },

    /// A rest element appeared outside the last position of a tuple
    #[error("rest element is only allowed in the last position of a tuple")]
    MisplacedRest,

    /// Interface bases form a cycle
    #[error("circular reference in bases of interface {0}")]
    CircularBases(String),
}

/// Misuse of the checker facade: navigation calls that do not apply to
/// the bound type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FacadeError {
    #[error("type has no property {0}")]
    NoSuchProperty(String),

    #[error("property {0} is not a method")]
    NotAMethod(String),

    #[error("type is not an interface")]
    NotAnInterface,

    #[error("type is not a function")]
    NotAFunction,

    #[error(transparent)]
    Compile(#[from] CompileError),
}
