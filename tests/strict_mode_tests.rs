//! Strict-mode behavior: extraneous keys, excess tuple elements, index
//! signatures, and the strict ⇒ plain implication.

use serde_json::json;
use tyck::{
    INDEX_KEY, TypeSuite, Value, array, create_checkers, iface, intersection, prop, rest, tuple,
};

fn v(json: serde_json::Value) -> Value {
    Value::from(json)
}

fn person_suite() -> TypeSuite {
    TypeSuite::new().define(
        "Person",
        iface(&[], [prop("name", "string"), prop("age", "number")]),
    )
}

#[test]
fn test_strict_rejects_extraneous_keys() {
    let checkers = create_checkers(&[person_suite()]).unwrap();
    let person = &checkers["Person"];

    let value = v(json!({"name": "A", "age": 3, "nick": "x"}));
    // plain mode tolerates the unknown key
    assert_eq!(person.validate(&value), None);
    assert!(!person.strict_test(&value));
    let details = person.strict_validate(&value).unwrap();
    assert_eq!(details.len(), 1);
    assert_eq!(details[0].path, "value.nick");
    assert_eq!(details[0].message, "is extraneous");
}

#[test]
fn test_strict_lists_every_extraneous_key() {
    let checkers = create_checkers(&[person_suite()]).unwrap();
    let person = &checkers["Person"];

    let value = v(json!({"name": "A", "age": 3, "nick": "x", "alias": "y"}));
    let details = person.strict_validate(&value).unwrap();
    let paths: Vec<&str> = details.iter().map(|d| d.path.as_str()).collect();
    assert_eq!(paths, ["value.nick", "value.alias"]);
}

#[test]
fn test_strict_implies_plain() {
    let checkers = create_checkers(&[person_suite()]).unwrap();
    let person = &checkers["Person"];

    let values = [
        v(json!({"name": "A", "age": 3})),
        v(json!({"name": "A", "age": 3, "nick": "x"})),
        v(json!({"name": "A"})),
        v(json!(7)),
        Value::Undefined,
    ];
    for value in &values {
        if person.strict_test(value) {
            assert!(person.test(value), "strict acceptance implies plain");
        }
    }
}

#[test]
fn test_tuple_with_rest() {
    let suite =
        TypeSuite::new().define("Row", tuple([tyck::name("string"), rest(array("number"))]));
    let checkers = create_checkers(&[suite]).unwrap();
    let row = &checkers["Row"];

    assert!(row.test(&v(json!(["a"]))));
    assert!(row.test(&v(json!(["a", 1, 2, 3]))));
    // the rest tail absorbs excess elements even in strict mode
    assert!(row.strict_test(&v(json!(["a", 1, 2]))));

    assert!(!row.test(&v(json!(["a", "b"]))));
    let details = row.validate(&v(json!(["a", "b"]))).unwrap();
    assert_eq!(details[0].path, "value[1]");
    assert_eq!(details[0].message, "is not a number");
}

#[test]
fn test_tuple_without_rest_rejects_excess_in_strict() {
    let suite = TypeSuite::new().define("Pair", tuple([tyck::name("string"), tyck::name("number")]));
    let checkers = create_checkers(&[suite]).unwrap();
    let pair = &checkers["Pair"];

    assert!(pair.test(&v(json!(["a", 1]))));
    // plain mode tolerates excess elements
    assert!(pair.test(&v(json!(["a", 1, 2]))));
    assert!(!pair.strict_test(&v(json!(["a", 1, 2]))));
    let details = pair.strict_validate(&v(json!(["a", 1, 2]))).unwrap();
    assert_eq!(details[0].path, "value[2]");
    assert_eq!(details[0].message, "is extraneous");
}

#[test]
fn test_index_signature_replaces_extraneous_check() {
    let suite = TypeSuite::new().define(
        "Counters",
        iface(&[], [prop("id", "string"), prop(INDEX_KEY, "number")]),
    );
    let checkers = create_checkers(&[suite]).unwrap();
    let counters = &checkers["Counters"];

    let ok = v(json!({"id": "c", "hits": 3, "misses": 0}));
    // extra keys are validated, never flagged, regardless of strictness
    assert!(counters.test(&ok));
    assert!(counters.strict_test(&ok));

    let bad = v(json!({"id": "c", "hits": "three"}));
    for details in [
        counters.validate(&bad).unwrap(),
        counters.strict_validate(&bad).unwrap(),
    ] {
        assert_eq!(details[0].path, "value.hits");
        assert_eq!(details[0].message, "is not a number");
    }
}

#[test]
fn test_inherited_properties_are_admitted_in_strict() {
    let suite = TypeSuite::new()
        .define("Base", iface(&[], [prop("id", "number")]))
        .define("Derived", iface(&["Base"], [prop("name", "string")]));
    let checkers = create_checkers(&[suite]).unwrap();
    let derived = &checkers["Derived"];

    // id comes from the base and must not be reported extraneous
    assert!(derived.strict_test(&v(json!({"id": 1, "name": "x"}))));
    let details = derived
        .strict_validate(&v(json!({"id": 1, "name": "x", "zap": true})))
        .unwrap();
    assert_eq!(details[0].path, "value.zap");
    assert_eq!(details[0].message, "is extraneous");

    // base failures surface under their own property path
    let details = derived.validate(&v(json!({"name": "x"}))).unwrap();
    assert_eq!(details[0].path, "value.id");
    assert_eq!(details[0].message, "is missing");
}

#[test]
fn test_intersection_conjuncts_share_strict_allowance() {
    let suite = TypeSuite::new()
        .define("WithA", iface(&[], [prop("a", "string")]))
        .define("WithB", iface(&[], [prop("b", "number")]))
        .define("Both", intersection(["WithA", "WithB"]));
    let checkers = create_checkers(&[suite]).unwrap();
    let both = &checkers["Both"];

    // each conjunct's properties are legal for the other
    assert!(both.strict_test(&v(json!({"a": "x", "b": 1}))));
    let details = both
        .strict_validate(&v(json!({"a": "x", "b": 1, "c": 2})))
        .unwrap();
    assert_eq!(details[0].path, "value.c");
    assert_eq!(details[0].message, "is extraneous");
}

#[test]
fn test_strict_nested_objects_are_strict_too() {
    let suite = TypeSuite::new()
        .define("Inner", iface(&[], [prop("x", "number")]))
        .define("Outer", iface(&[], [prop("inner", "Inner")]));
    let checkers = create_checkers(&[suite]).unwrap();
    let outer = &checkers["Outer"];

    let value = v(json!({"inner": {"x": 1, "y": 2}}));
    assert!(outer.test(&value));
    let details = outer.strict_validate(&value).unwrap();
    assert_eq!(details[0].path, "value.inner.y");
    assert_eq!(details[0].message, "is extraneous");
}
