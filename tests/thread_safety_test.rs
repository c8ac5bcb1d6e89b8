//! Tests for sharing compiled validators, scopes and compilers across threads.

use inquest::{compile, Compiler, Schema, SchemaDescription, Scope};
use serde_json::json;
use std::sync::Arc;
use std::thread;

#[test]
fn test_concurrent_validation() {
    let validator = compile(&SchemaDescription::from([
        ("name", "string >= 1"),
        ("age", "number.integer > 0"),
    ]))
    .unwrap();

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let validator = validator.clone();
            thread::spawn(move || {
                let result = validator.validate(&json!({
                    "name": format!("User{}", i),
                    "age": 20 + i
                }));
                assert!(result.is_success());
                assert!(!validator.allows(&json!({ "name": "", "age": i })));
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_concurrent_scope_access() {
    let scope = Arc::new(
        Scope::new()
            .define("UserId", Schema::integer().positive())
            .unwrap()
            .define(
                "User",
                Schema::object()
                    .field("id", "UserId")
                    .field("name", "string"),
            )
            .unwrap()
            .compile()
            .unwrap(),
    );

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let scope = Arc::clone(&scope);
            thread::spawn(move || {
                let result = scope
                    .validate("User", &json!({ "id": i + 1, "name": format!("User{}", i) }))
                    .unwrap();
                assert!(result.is_success());
                assert!(scope.validator("UserId").is_some());
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_concurrent_compilation_shares_cache() {
    let compiler = Arc::new(Compiler::default());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let compiler = Arc::clone(&compiler);
            thread::spawn(move || {
                let validator = compiler
                    .compile(&SchemaDescription::from([("email", "string.email")]))
                    .unwrap();
                assert!(validator.allows(&json!({ "email": format!("user{}@example.com", i) })));
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(compiler.cached_expressions(), 1);
}

#[test]
fn test_batch_validation_matches_sequential() {
    let validator = compile(&"0 <= number < 50".into()).unwrap();
    let values: Vec<_> = (0..100).map(|i| json!(i)).collect();

    let outcomes = validator.validate_batch(&values);
    assert_eq!(outcomes.len(), 100);
    for (value, outcome) in values.iter().zip(&outcomes) {
        assert_eq!(outcome.is_success(), validator.allows(value));
    }

    assert_eq!(validator.filter_allowed(&values).len(), 50);
}
