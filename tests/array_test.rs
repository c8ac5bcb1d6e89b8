//! Tests for arrays and tuples, from expressions and from descriptions.

use inquest::{compile, RuleKind, Schema, SchemaDescription, SchemaError};
use serde_json::json;

#[test]
fn test_expression_array() {
    let validator = compile(&"string[]".into()).unwrap();

    assert!(validator.allows(&json!([])));
    assert!(validator.allows(&json!(["a", "b"])));
    assert!(!validator.allows(&json!(["a", 1])));
    assert!(!validator.allows(&json!("a")));
}

#[test]
fn test_every_bad_element_is_reported() {
    let validator = compile(&"number.integer[]".into()).unwrap();

    let report = validator
        .validate(&json!([1, "two", 3, 4.5, null]))
        .into_result()
        .unwrap_err();

    let paths: Vec<String> = report.iter().map(|v| v.path.to_string()).collect();
    assert_eq!(paths, vec!["1", "3", "4"]);
    assert!(report.iter().all(|v| v.rule == RuleKind::TypeMismatch));
}

#[test]
fn test_not_an_array() {
    let validator = compile(&"string[]".into()).unwrap();
    let report = validator
        .validate(&json!({ "a": 1 }))
        .into_result()
        .unwrap_err();

    assert_eq!(report.len(), 1);
    assert_eq!(report.first().expected, "string[]");
    assert_eq!(report.first().actual, "{\"a\":1}");
}

#[test]
fn test_union_element_array() {
    let validator = compile(&"(string | number)[]".into()).unwrap();
    assert!(validator.allows(&json!(["a", 1, "b", 2.5])));
    assert!(!validator.allows(&json!(["a", true])));
}

#[test]
fn test_nested_arrays() {
    let validator = compile(&"number[][]".into()).unwrap();
    assert!(validator.allows(&json!([[1, 2], [], [3]])));

    let report = validator
        .validate(&json!([[1], [2, "x"]]))
        .into_result()
        .unwrap_err();
    assert_eq!(report.first().path.to_string(), "1.1");
}

#[test]
fn test_array_of_objects() {
    let validator = compile(&Schema::array(
        Schema::object().field("id", "number.integer > 0"),
    ))
    .unwrap();

    assert!(validator.allows(&json!([{ "id": 1 }, { "id": 2 }])));

    let report = validator
        .validate(&json!([{ "id": 1 }, {}, { "id": 0 }]))
        .into_result()
        .unwrap_err();
    let paths: Vec<String> = report.iter().map(|v| v.path.to_string()).collect();
    assert_eq!(paths, vec!["1.id", "2.id"]);
    assert_eq!(
        report.rules(),
        vec![RuleKind::MissingRequiredField, RuleKind::RangeViolation]
    );
}

#[test]
fn test_expression_tuple() {
    let validator = compile(&"[string, number, boolean]".into()).unwrap();

    assert!(validator.allows(&json!(["a", 1, true])));
    assert!(!validator.allows(&json!(["a", 1])));
    assert!(!validator.allows(&json!(["a", 1, true, null])));

    let report = validator
        .validate(&json!([1, "a", true]))
        .into_result()
        .unwrap_err();
    let paths: Vec<String> = report.iter().map(|v| v.path.to_string()).collect();
    assert_eq!(paths, vec!["0", "1"]);
}

#[test]
fn test_tuple_length_mismatch_is_one_violation() {
    let validator = compile(&Schema::tuple(["number", "number"])).unwrap();

    let report = validator
        .validate(&json!([1, "x", 3]))
        .into_result()
        .unwrap_err();

    assert_eq!(report.len(), 1);
    let violation = report.first();
    assert!(violation.path.is_root());
    assert_eq!(violation.rule, RuleKind::TypeMismatch);
    assert_eq!(violation.expected, "tuple of length 2");
    assert_eq!(violation.actual, "array of length 3");
}

#[test]
fn test_description_tuple_with_object() {
    let validator = compile(&SchemaDescription::tuple([
        SchemaDescription::from("string.uuid"),
        SchemaDescription::from([("x", "number"), ("y", "number")]),
    ]))
    .unwrap();

    assert!(validator.allows(&json!([
        "123e4567-e89b-12d3-a456-426614174000",
        { "x": 1, "y": 2 }
    ])));

    let report = validator
        .validate(&json!(["nope", { "x": 1 }]))
        .into_result()
        .unwrap_err();
    let paths: Vec<String> = report.iter().map(|v| v.path.to_string()).collect();
    assert_eq!(paths, vec!["0", "1.y"]);
}

#[test]
fn test_normalized_arrays_strip_nested_extras() {
    let compiler = inquest::Compiler::new(
        inquest::CompileOptions::new().with_extra_fields(inquest::ExtraFields::Strip),
    );
    let validator = compiler
        .compile(&Schema::array(SchemaDescription::from([("id", "number")])))
        .unwrap();

    let clean = validator
        .validate(&json!([{ "id": 1, "tmp": true }, { "id": 2 }]))
        .into_result()
        .unwrap();
    assert_eq!(clean, json!([{ "id": 1 }, { "id": 2 }]));
}

#[test]
fn test_optional_marker_inside_array_is_rejected() {
    let err = compile(&Schema::array("string?")).unwrap_err();
    assert!(matches!(err, SchemaError::MisplacedOptional { path } if path.is_root()));

    let err = compile(&Schema::tuple(["string", "number?"])).unwrap_err();
    assert!(matches!(err, SchemaError::MisplacedOptional { path } if path.to_string() == "1"));
}
