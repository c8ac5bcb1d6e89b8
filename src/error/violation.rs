//! Validation-time diagnostics.
//!
//! This module provides [`Violation`] for a single failure found in input data and
//! [`Report`] for the ordered, non-empty collection produced by one validation call.

use std::fmt::{self, Display};

use serde_json::Value;
use stillwater::prelude::*;

use crate::path::{PathSegment, ValuePath};

/// Longest rendering of an offending value kept in a violation.
const MAX_ACTUAL_CHARS: usize = 64;

/// The rule a value broke.
///
/// Callers should branch on this tag rather than on rendered text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// The value has the wrong runtime kind, or a tuple has the wrong length.
    TypeMismatch,
    /// A numeric value or string length fell outside its bounds.
    RangeViolation,
    /// A string did not match its declared format.
    FormatViolation,
    /// A required object field is absent.
    MissingRequiredField,
    /// No literal or union alternative matched.
    UnionExhausted,
    /// An undeclared key was present and extra fields are rejected.
    ExtraField,
    /// Scope references nested deeper than the configured limit.
    DepthExceeded,
}

impl RuleKind {
    /// Returns the stable kebab-case code for this rule.
    pub fn code(&self) -> &'static str {
        match self {
            RuleKind::TypeMismatch => "type-mismatch",
            RuleKind::RangeViolation => "range-violation",
            RuleKind::FormatViolation => "format-violation",
            RuleKind::MissingRequiredField => "missing-required-field",
            RuleKind::UnionExhausted => "union-exhausted",
            RuleKind::ExtraField => "extra-field",
            RuleKind::DepthExceeded => "depth-exceeded",
        }
    }
}

impl Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A single validation failure with full context.
///
/// - **path**: where in the input the failure occurred
/// - **rule**: which kind of rule was broken
/// - **expected**: a human-readable summary of the constraint
/// - **actual**: the offending value, rendered and truncated for display
///
/// # Example
///
/// ```rust
/// use inquest::{RuleKind, ValuePath, Violation};
///
/// let violation = Violation::new(
///     ValuePath::root().push_key("email"),
///     RuleKind::FormatViolation,
///     "string.email",
///     "\"not-an-email\"",
/// );
///
/// assert_eq!(
///     violation.to_string(),
///     "email: expected string.email, got \"not-an-email\""
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// The path to the value that failed validation.
    pub path: ValuePath,
    /// The rule that was broken.
    pub rule: RuleKind,
    /// Description of what was expected.
    pub expected: String,
    /// The value that was received, rendered for display.
    pub actual: String,
}

impl Violation {
    /// Creates a violation from its four parts.
    pub fn new(
        path: ValuePath,
        rule: RuleKind,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            path,
            rule,
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Creates a violation whose `actual` part is a rendering of `value`.
    pub(crate) fn for_value(
        path: &ValuePath,
        rule: RuleKind,
        expected: impl Into<String>,
        value: &Value,
    ) -> Self {
        Self::new(path.clone(), rule, expected, render_value(value))
    }

    /// Returns the path segments from the root to the offending value.
    pub fn segments(&self) -> Vec<&PathSegment> {
        self.path.segments().collect()
    }

    /// Returns the `expected …, got …` part of the rendering.
    pub fn message(&self) -> String {
        format!("expected {}, got {}", self.expected, self.actual)
    }
}

impl Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            f.write_str("(root)")?;
        } else {
            write!(f, "{}", self.path)?;
        }
        write!(f, ": {}", self.message())
    }
}

impl std::error::Error for Violation {}

/// Renders an input value for display inside a violation.
///
/// Strings keep their JSON quoting so `"18"` and `18` stay distinguishable;
/// long renderings are cut at [`MAX_ACTUAL_CHARS`] characters.
pub(crate) fn render_value(value: &Value) -> String {
    let rendered = value.to_string();
    if rendered.chars().count() <= MAX_ACTUAL_CHARS {
        return rendered;
    }
    let mut cut: String = rendered.chars().take(MAX_ACTUAL_CHARS).collect();
    cut.push('…');
    cut
}

/// The non-empty, ordered set of violations from one validation call.
///
/// Violations appear depth-first, in field-declaration order within each object.
/// A report is never empty: a call that finds nothing wrong produces a valid
/// outcome instead of a report.
///
/// # Combining Reports
///
/// ```rust
/// use inquest::{Report, RuleKind, ValuePath, Violation};
/// use stillwater::prelude::*;
///
/// let name = Report::single(Violation::new(
///     ValuePath::root().push_key("name"),
///     RuleKind::MissingRequiredField,
///     "string",
///     "missing",
/// ));
/// let age = Report::single(Violation::new(
///     ValuePath::root().push_key("age"),
///     RuleKind::RangeViolation,
///     "17 < number.integer <= 120",
///     "17",
/// ));
///
/// let combined = name.combine(age);
/// assert_eq!(combined.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Report(NonEmptyVec<Violation>);

impl Report {
    /// Creates a report containing a single violation.
    pub fn single(violation: Violation) -> Self {
        Self(NonEmptyVec::singleton(violation))
    }

    /// Creates a report from a list of violations, or `None` when the list is empty.
    pub fn from_vec(violations: Vec<Violation>) -> Option<Self> {
        NonEmptyVec::from_vec(violations).map(Self)
    }

    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; present for API symmetry with collections.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns an iterator over the violations in report order.
    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }

    /// Returns the first violation.
    pub fn first(&self) -> &Violation {
        self.0.head()
    }

    /// Returns all violations at the given path.
    pub fn at_path(&self, path: &ValuePath) -> Vec<&Violation> {
        self.0.iter().filter(|v| &v.path == path).collect()
    }

    /// Returns all violations of the given rule kind.
    pub fn with_rule(&self, rule: RuleKind) -> Vec<&Violation> {
        self.0.iter().filter(|v| v.rule == rule).collect()
    }

    /// Returns the rule kinds in report order.
    pub fn rules(&self) -> Vec<RuleKind> {
        self.0.iter().map(|v| v.rule).collect()
    }

    /// Converts the report into a plain vector.
    pub fn into_vec(self) -> Vec<Violation> {
        self.0.into_vec()
    }

    /// Renders the report, one `<path>: expected <x>, got <y>` line per violation.
    pub fn describe(&self) -> String {
        self.0
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Semigroup for Report {
    fn combine(self, other: Self) -> Self {
        Report(self.0.combine(other.0))
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

impl std::error::Error for Report {}

impl IntoIterator for Report {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

/// Renders a report for display. Equivalent to [`Report::describe`].
pub fn describe(report: &Report) -> String {
    report.describe()
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Report>();
    assert_sync::<Report>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn at(key: &str, rule: RuleKind) -> Violation {
        Violation::new(ValuePath::root().push_key(key), rule, "x", "y")
    }

    #[test]
    fn test_rule_codes_are_kebab_case() {
        assert_eq!(RuleKind::TypeMismatch.code(), "type-mismatch");
        assert_eq!(RuleKind::MissingRequiredField.to_string(), "missing-required-field");
        assert_eq!(RuleKind::UnionExhausted.code(), "union-exhausted");
        assert_eq!(RuleKind::ExtraField.code(), "extra-field");
    }

    #[test]
    fn test_violation_display() {
        let violation = Violation::new(
            ValuePath::root().push_key("user").push_index(2),
            RuleKind::TypeMismatch,
            "string",
            "42",
        );
        assert_eq!(violation.to_string(), "user.2: expected string, got 42");
    }

    #[test]
    fn test_violation_display_root() {
        let violation = Violation::new(ValuePath::root(), RuleKind::TypeMismatch, "object", "null");
        assert_eq!(violation.to_string(), "(root): expected object, got null");
    }

    #[test]
    fn test_render_value_keeps_string_quotes() {
        assert_eq!(render_value(&json!("18")), "\"18\"");
        assert_eq!(render_value(&json!(18)), "18");
        assert_eq!(render_value(&json!(null)), "null");
    }

    #[test]
    fn test_render_value_truncates() {
        let long = json!("x".repeat(200));
        let rendered = render_value(&long);
        assert_eq!(rendered.chars().count(), MAX_ACTUAL_CHARS + 1);
        assert!(rendered.ends_with('…'));
    }

    #[test]
    fn test_report_from_empty_vec_is_none() {
        assert!(Report::from_vec(Vec::new()).is_none());
    }

    #[test]
    fn test_report_queries() {
        let report = Report::from_vec(vec![
            at("a", RuleKind::TypeMismatch),
            at("b", RuleKind::RangeViolation),
            at("a", RuleKind::RangeViolation),
        ])
        .unwrap();

        assert_eq!(report.len(), 3);
        assert_eq!(report.at_path(&ValuePath::root().push_key("a")).len(), 2);
        assert_eq!(report.with_rule(RuleKind::RangeViolation).len(), 2);
        assert_eq!(report.first().rule, RuleKind::TypeMismatch);
        assert_eq!(
            report.rules(),
            vec![
                RuleKind::TypeMismatch,
                RuleKind::RangeViolation,
                RuleKind::RangeViolation
            ]
        );
    }

    #[test]
    fn test_report_combine_preserves_order() {
        let left = Report::single(at("first", RuleKind::TypeMismatch));
        let right = Report::single(at("second", RuleKind::TypeMismatch));
        let paths: Vec<String> = left
            .combine(right)
            .into_iter()
            .map(|v| v.path.to_string())
            .collect();
        assert_eq!(paths, vec!["first", "second"]);
    }

    #[test]
    fn test_describe_one_line_per_violation() {
        let report = Report::from_vec(vec![
            Violation::new(
                ValuePath::root().push_key("age"),
                RuleKind::RangeViolation,
                "17 < number.integer <= 120",
                "17",
            ),
            Violation::new(
                ValuePath::root().push_key("name"),
                RuleKind::MissingRequiredField,
                "string",
                "missing",
            ),
        ])
        .unwrap();

        assert_eq!(
            describe(&report),
            "age: expected 17 < number.integer <= 120, got 17\nname: expected string, got missing"
        );
    }
}
