//! Integration tests for ValuePath.

use inquest::{compile, PathSegment, SchemaDescription, ValuePath};
use serde_json::json;

#[test]
fn test_path_construction_and_display() {
    assert_eq!(ValuePath::root().to_string(), "");
    assert_eq!(ValuePath::root().push_key("name").to_string(), "name");
    assert_eq!(ValuePath::root().push_index(0).to_string(), "0");

    let path = ValuePath::root()
        .push_key("users")
        .push_index(0)
        .push_key("address")
        .push_key("city");
    assert_eq!(path.to_string(), "users.0.address.city");
}

#[test]
fn test_path_segments_preserved() {
    let path = ValuePath::root()
        .push_key("data")
        .push_index(42)
        .push_key("value");

    let segments: Vec<&PathSegment> = path.segments().collect();
    assert_eq!(
        segments,
        vec![
            &PathSegment::key("data"),
            &PathSegment::index(42),
            &PathSegment::key("value"),
        ]
    );
}

#[test]
fn test_path_is_immutable() {
    let base = ValuePath::root().push_key("users");
    let first = base.push_index(0);
    let second = base.push_index(1);

    assert_eq!(base.to_string(), "users");
    assert_eq!(first.to_string(), "users.0");
    assert_eq!(second.to_string(), "users.1");
}

#[test]
fn test_from_segments_matches_pushes() {
    let built = ValuePath::from_segments([PathSegment::key("a"), PathSegment::index(3)]);
    assert_eq!(built, ValuePath::root().push_key("a").push_index(3));
    assert_eq!(built.parent(), Some(ValuePath::root().push_key("a")));
    assert_eq!(built.last(), Some(&PathSegment::index(3)));
}

#[test]
fn test_violation_paths_follow_the_input() {
    let validator = compile(&SchemaDescription::from([(
        "users",
        SchemaDescription::array(SchemaDescription::from([("email", "string.email")])),
    )]))
    .unwrap();

    let report = validator
        .validate(&json!({ "users": [{ "email": "a@b.com" }, { "email": "bad" }] }))
        .into_result()
        .unwrap_err();

    let violation = report.first();
    assert_eq!(violation.path.to_string(), "users.1.email");
    assert_eq!(
        violation.segments(),
        vec![
            &PathSegment::key("users"),
            &PathSegment::index(1),
            &PathSegment::key("email"),
        ]
    );
}
