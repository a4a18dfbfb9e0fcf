//! Runtime structural type checking for dynamic values.
//!
//! Build a [`TypeSuite`] describing interfaces, unions, tuples, enums and
//! the rest of the type algebra, create checkers for its named types, and
//! test arbitrary dynamic [`Value`]s against them. On failure, checkers
//! report the offending sub-path, e.g. `person.addresses[2].zip is not a
//! string`.
//!
//! ```
//! use tyck::{TypeSuite, Value, create_checkers, iface, prop};
//!
//! let suite = TypeSuite::new().define(
//!     "Person",
//!     iface(&[], [prop("name", "string"), prop("age", "number")]),
//! );
//! let checkers = create_checkers(&[suite]).unwrap();
//! let person = &checkers["Person"];
//!
//! let good = Value::from(serde_json::json!({"name": "Ann", "age": 34}));
//! assert!(person.test(&good));
//!
//! let bad = Value::from(serde_json::json!({"name": "Ann"}));
//! let details = person.validate(&bad).unwrap();
//! assert_eq!(details[0].path, "value.age");
//! assert_eq!(details[0].message, "is missing");
//! ```

pub use tyck_common::{CompileError, ErrorDetail, FacadeError, ValidationError, Value};
pub use tyck_types::{
    INDEX_KEY, Lit, TType, TypeSuite, array, builtin_suite, enumlit, enumtype, func, iface,
    intersection, lit, name, opt, param, partial, prop, rest, tuple, union,
};
pub use tyck_checker::{CheckFn, Checker, CompileFlags, Ctx, Key, UnionResolver, create_checkers};
