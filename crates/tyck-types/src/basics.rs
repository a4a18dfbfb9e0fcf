//! The built-in type suite: primitives and host-native shapes.
//!
//! Every recognizer is a structural tag test on `Value`, never an
//! identity or provenance check, so values converted from any source
//! (JSON, hand-built, another runtime realm) validate identically.

use once_cell::sync::Lazy;
use tyck_common::Value;

use crate::node::{TBasic, TType};
use crate::suite::TypeSuite;

fn is_any(_: &Value) -> bool {
    true
}

fn is_never(_: &Value) -> bool {
    false
}

fn is_number(v: &Value) -> bool {
    matches!(v, Value::Number(_))
}

fn is_string(v: &Value) -> bool {
    matches!(v, Value::String(_))
}

fn is_boolean(v: &Value) -> bool {
    matches!(v, Value::Bool(_))
}

fn is_symbol(v: &Value) -> bool {
    matches!(v, Value::Symbol(_))
}

fn is_object(v: &Value) -> bool {
    v.is_object_like()
}

fn is_void(v: &Value) -> bool {
    v.is_nullish()
}

fn is_undefined(v: &Value) -> bool {
    matches!(v, Value::Undefined)
}

fn is_null(v: &Value) -> bool {
    matches!(v, Value::Null)
}

fn is_date(v: &Value) -> bool {
    matches!(v, Value::Date(_))
}

fn is_regexp(v: &Value) -> bool {
    matches!(v, Value::Regex(_))
}

fn is_bytes(v: &Value) -> bool {
    matches!(v, Value::Bytes(_))
}

const BASIC_TYPES: &[(&str, fn(&Value) -> bool, &str)] = &[
    ("any", is_any, "is invalid"),
    ("unknown", is_any, "is invalid"),
    ("never", is_never, "is unexpected"),
    ("number", is_number, "is not a number"),
    ("string", is_string, "is not a string"),
    ("boolean", is_boolean, "is not a boolean"),
    ("symbol", is_symbol, "is not a symbol"),
    ("object", is_object, "is not an object"),
    ("void", is_void, "is not void"),
    ("undefined", is_undefined, "is not undefined"),
    ("null", is_null, "is not null"),
    ("Date", is_date, "is not a Date"),
    ("RegExp", is_regexp, "is not a RegExp"),
];

// Buffers and typed-array views all share the byte-buffer shape; they are
// registered under each native name so suites written against the
// upstream tooling keep resolving.
const BYTES_TYPES: &[(&str, &str)] = &[
    ("Buffer", "is not a Buffer"),
    ("ArrayBuffer", "is not an ArrayBuffer"),
    ("Int8Array", "is not an Int8Array"),
    ("Uint8Array", "is not a Uint8Array"),
    ("Uint8ClampedArray", "is not a Uint8ClampedArray"),
    ("Int16Array", "is not an Int16Array"),
    ("Uint16Array", "is not a Uint16Array"),
    ("Int32Array", "is not an Int32Array"),
    ("Uint32Array", "is not a Uint32Array"),
    ("Float32Array", "is not a Float32Array"),
    ("Float64Array", "is not a Float64Array"),
];

static BUILTINS: Lazy<TypeSuite> = Lazy::new(|| {
    let mut suite = TypeSuite::new();
    for &(name, pred, message) in BASIC_TYPES {
        suite.insert(name, TType::Basic(TBasic { name, pred, message }));
    }
    for &(name, message) in BYTES_TYPES {
        suite.insert(
            name,
            TType::Basic(TBasic {
                name,
                pred: is_bytes,
                message,
            }),
        );
    }
    suite
});

/// The suite of built-in types. User suites are layered on top of this
/// when checkers are created.
pub fn builtin_suite() -> &'static TypeSuite {
    &BUILTINS
}
