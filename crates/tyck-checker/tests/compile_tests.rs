//! Compilation failures and mode propagation.

use serde_json::json;
use tyck_checker::{Checker, create_checkers};
use tyck_common::{CompileError, Value};
use tyck_types::{TypeSuite, array, enumlit, enumtype, iface, name, partial, prop, rest, tuple};

fn v(json: serde_json::Value) -> Value {
    Value::from(json)
}

#[test]
fn test_unknown_type_name_fails_compilation() {
    let suite = TypeSuite::new().define("Holder", iface(&[], [prop("x", "Missing")]));
    let err = create_checkers(&[suite]).unwrap_err();
    assert_eq!(err, CompileError::UnknownType("Missing".to_string()));
}

#[test]
fn test_unknown_base_fails_compilation() {
    let suite = TypeSuite::new().define("Derived", iface(&["NoSuchBase"], [prop("x", "number")]));
    let err = create_checkers(&[suite]).unwrap_err();
    assert_eq!(err, CompileError::UnknownType("NoSuchBase".to_string()));
}

#[test]
fn test_enum_literal_requires_an_enum() {
    let suite = TypeSuite::new()
        .define("NotEnum", iface(&[], [prop("x", "number")]))
        .define("Bad", enumlit("NotEnum", "X"));
    let err = create_checkers(&[suite]).unwrap_err();
    assert_eq!(err, CompileError::NotAnEnumType("NotEnum".to_string()));
}

#[test]
fn test_enum_literal_requires_the_member() {
    let suite = TypeSuite::new()
        .define("Color", enumtype([("Red", 0i64)]))
        .define("Bad", enumlit("Color", "Mauve"));
    let err = create_checkers(&[suite]).unwrap_err();
    assert_eq!(
        err,
        CompileError::UnknownEnumMember {
            enum_name: "Color".to_string(),
            member: "Mauve".to_string(),
        }
    );
}

#[test]
fn test_circular_bases_are_rejected() {
    let suite = TypeSuite::new()
        .define("A", iface(&["B"], [prop("a", "number")]))
        .define("B", iface(&["A"], [prop("b", "number")]));
    let err = create_checkers(&[suite]).unwrap_err();
    assert!(matches!(err, CompileError::CircularBases(_)));
}

#[test]
fn test_rest_outside_tuple_tail_is_rejected() {
    // a rest element anywhere but the tuple tail survives construction
    // and is caught at compile time
    let suite = TypeSuite::new().define(
        "Bad",
        tuple([rest(array("number")), name("string")]),
    );
    let err = create_checkers(&[suite]).unwrap_err();
    assert_eq!(err, CompileError::MisplacedRest);

    let err = Checker::new(&[], rest(array("number"))).unwrap_err();
    assert_eq!(err, CompileError::MisplacedRest);
}

#[test]
fn test_partial_propagates_into_nested_interfaces() {
    let suite = TypeSuite::new()
        .define("Inner", iface(&[], [prop("x", "number")]))
        .define("Outer", iface(&[], [prop("inner", "Inner"), prop("id", "number")]))
        .define("Sketch", partial("Outer"));
    let checkers = create_checkers(&[suite]).unwrap();
    let sketch = &checkers["Sketch"];

    // nested interfaces become missing-tolerant too
    assert!(sketch.test(&v(json!({"inner": {}}))));
    // but present values must still have the right shape
    assert!(!sketch.test(&v(json!({"inner": {"x": "no"}}))));
}

#[test]
fn test_later_suite_overrides_earlier_definition() {
    let first = TypeSuite::new().define("Id", name("number"));
    let second = TypeSuite::new().define("Id", name("string"));
    let checkers = create_checkers(&[first, second]).unwrap();
    let id = &checkers["Id"];

    assert!(id.test(&v(json!("abc"))));
    assert!(!id.test(&v(json!(42))));
}

#[test]
fn test_adhoc_checker_compiles_against_builtins() {
    let list = Checker::new(&[], array("number")).unwrap();
    assert!(list.test(&v(json!([1, 2, 3]))));
    let details = list.validate(&v(json!([1, "two"]))).unwrap();
    assert_eq!(details[0].path, "value[1]");
    assert_eq!(details[0].message, "is not a number");
}
