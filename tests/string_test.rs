//! Tests for string lengths and formats.

use inquest::{compile, RuleKind, Schema, StringFormat};
use serde_json::json;

#[test]
fn test_length_counts_characters() {
    let validator = compile(&"2 <= string <= 3".into()).unwrap();

    assert!(validator.allows(&json!("ab")));
    assert!(validator.allows(&json!("日本語")));
    assert!(!validator.allows(&json!("a")));
    assert!(!validator.allows(&json!("abcd")));
}

#[test]
fn test_exact_length() {
    let grammar = compile(&"string == 4".into()).unwrap();
    let builder = compile(&Schema::string().exact_len(4).into()).unwrap();

    for value in [json!("abcd"), json!("abc"), json!("abcde"), json!(4)] {
        assert_eq!(grammar.allows(&value), builder.allows(&value));
    }
    assert!(grammar.allows(&json!("abcd")));
}

#[test]
fn test_length_violation_describes_the_bound() {
    let validator = compile(&Schema::string().min_len(3).max_len(20).into()).unwrap();

    let report = validator.validate(&json!("al")).into_result().unwrap_err();
    assert_eq!(report.first().rule, RuleKind::RangeViolation);
    assert_eq!(report.first().expected, "3 <= string <= 20");
    assert_eq!(report.first().actual, "\"al\"");
}

#[test]
fn test_formats_reject_non_strings() {
    for format in StringFormat::ALL {
        let validator = compile(&Schema::format(format).into()).unwrap();
        assert!(!validator.allows(&json!(42)), "string.{}", format);
        assert!(!validator.allows(&json!(null)), "string.{}", format);
    }
}

#[test]
fn test_format_samples() {
    let cases = [
        ("string.email", "ada@example.com", "ada.example.com"),
        ("string.url", "https://example.com", "example.com"),
        ("string.uuid", "123e4567-e89b-12d3-a456-426614174000", "123e4567"),
        ("string.alpha", "Ada", "Ada1"),
        ("string.alphanumeric", "Ada1", "Ada-1"),
        ("string.digits", "0042", "42a"),
        ("string.lowercase", "ada", "Ada"),
        ("string.uppercase", "ADA", "Ada"),
        ("string.date", "2024-01-15", "15/01/2024"),
        ("string.datetime", "2024-01-15T10:30:00+02:00", "2024-01-15 10:30"),
    ];

    let loose_dates = ["2024-2-9", "24-02-09", " 2024-02-09", "+12024-02-09", "2023-02-29"];
    let date = compile(&"string.date".into()).unwrap();
    for bad in loose_dates {
        assert!(!date.allows(&json!(bad)), "string.date should reject {:?}", bad);
    }

    for (expression, good, bad) in cases {
        let validator = compile(&expression.into()).unwrap();
        assert!(validator.allows(&json!(good)), "{} should allow {}", expression, good);

        let report = validator.validate(&json!(bad)).into_result().unwrap_err();
        assert_eq!(report.first().rule, RuleKind::FormatViolation, "{}", expression);
        assert_eq!(report.first().expected, expression);
    }
}

#[test]
fn test_formats_combine_in_unions() {
    let validator = compile(&"string.email | string.uuid | null".into()).unwrap();

    assert!(validator.allows(&json!("a@b.com")));
    assert!(validator.allows(&json!("123e4567-e89b-12d3-a456-426614174000")));
    assert!(validator.allows(&json!(null)));

    let report = validator.validate(&json!("neither")).into_result().unwrap_err();
    assert_eq!(report.first().rule, RuleKind::UnionExhausted);
}
