//! The constraint AST.
//!
//! A [`ConstraintNode`] is the parsed form of one constraint expression. Both the
//! string grammar and the fluent builders produce these nodes; the compiler turns
//! them into leaf validators.

use std::fmt::{self, Display};

use serde_json::Value;

use crate::error::GrammarError;
use crate::format::StringFormat;

/// The runtime kinds a primitive constraint can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// `string`
    String,
    /// `number`
    Number,
    /// `number.integer`: a number with no fractional part.
    Integer,
    /// `boolean`
    Boolean,
}

impl PrimitiveKind {
    /// Returns the grammar keyword for this kind.
    pub fn keyword(&self) -> &'static str {
        match self {
            PrimitiveKind::String => "string",
            PrimitiveKind::Number => "number",
            PrimitiveKind::Integer => "number.integer",
            PrimitiveKind::Boolean => "boolean",
        }
    }

    /// Returns true if ranges may bound this kind.
    pub fn is_boundable(&self) -> bool {
        !matches!(self, PrimitiveKind::Boolean)
    }

    /// Exact runtime-kind check. No coercion: `"18"` is not a number.
    pub(crate) fn admits(&self, value: &Value) -> bool {
        match self {
            PrimitiveKind::String => value.is_string(),
            PrimitiveKind::Number => value.is_number(),
            PrimitiveKind::Integer => is_integral(value),
            PrimitiveKind::Boolean => value.is_boolean(),
        }
    }

    /// The quantity a range over this kind compares: the number itself, or the
    /// string length in Unicode scalar values.
    pub(crate) fn measure(&self, value: &Value) -> Option<f64> {
        match self {
            PrimitiveKind::String => value.as_str().map(|s| s.chars().count() as f64),
            PrimitiveKind::Number => value.as_f64(),
            PrimitiveKind::Integer if is_integral(value) => value.as_f64(),
            PrimitiveKind::Integer | PrimitiveKind::Boolean => None,
        }
    }
}

impl Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

fn is_integral(value: &Value) -> bool {
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => true,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.fract() == 0.0),
        _ => false,
    }
}

/// One side of a range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bound {
    pub value: f64,
    pub inclusive: bool,
}

impl Bound {
    /// A bound the value may equal.
    pub fn inclusive(value: f64) -> Self {
        Self {
            value,
            inclusive: true,
        }
    }

    /// A bound the value must stay strictly beyond.
    pub fn exclusive(value: f64) -> Self {
        Self {
            value,
            inclusive: false,
        }
    }

    pub(crate) fn admits_above(&self, measured: f64) -> bool {
        if self.inclusive {
            measured >= self.value
        } else {
            measured > self.value
        }
    }

    pub(crate) fn admits_below(&self, measured: f64) -> bool {
        if self.inclusive {
            measured <= self.value
        } else {
            measured < self.value
        }
    }

    fn lower_op(&self) -> &'static str {
        if self.inclusive {
            "<="
        } else {
            "<"
        }
    }
}

/// A literal value, compared by strict equality.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Number(f64),
    Boolean(bool),
    Null,
}

impl Literal {
    /// Strict equality against an input value. Numbers compare numerically.
    pub(crate) fn admits(&self, value: &Value) -> bool {
        match (self, value) {
            (Literal::String(expected), Value::String(s)) => expected == s,
            (Literal::Number(expected), Value::Number(n)) => n.as_f64() == Some(*expected),
            (Literal::Boolean(expected), Value::Bool(b)) => expected == b,
            (Literal::Null, Value::Null) => true,
            _ => false,
        }
    }

    /// Returns the literal as a JSON value.
    pub fn to_value(&self) -> Value {
        match self {
            Literal::String(s) => Value::String(s.clone()),
            Literal::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Literal::Boolean(b) => Value::Bool(*b),
            Literal::Null => Value::Null,
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(s) => {
                f.write_str("'")?;
                for ch in s.chars() {
                    if ch == '\'' || ch == '\\' {
                        f.write_str("\\")?;
                    }
                    write!(f, "{}", ch)?;
                }
                f.write_str("'")
            }
            Literal::Number(n) => write!(f, "{}", n),
            Literal::Boolean(b) => write!(f, "{}", b),
            Literal::Null => f.write_str("null"),
        }
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::String(s.to_string())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Literal::String(s)
    }
}

impl From<f64> for Literal {
    fn from(n: f64) -> Self {
        Literal::Number(n)
    }
}

impl From<i64> for Literal {
    fn from(n: i64) -> Self {
        Literal::Number(n as f64)
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Boolean(b)
    }
}

/// The parsed form of a single constraint expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintNode {
    /// A bare runtime kind: `string`, `number`, `number.integer`, `boolean`.
    Primitive(PrimitiveKind),
    /// A numeric range, or a string length range, with per-side inclusivity.
    Range {
        kind: PrimitiveKind,
        min: Option<Bound>,
        max: Option<Bound>,
    },
    /// A string with a format suffix, e.g. `string.email`.
    StringFormat(StringFormat),
    /// A single literal, e.g. `'active'` or `42`.
    Literal(Literal),
    /// Ordered alternatives, at least two.
    Union(Vec<ConstraintNode>),
    /// `T[]`
    ArrayOf(Box<ConstraintNode>),
    /// `[A, B, ...]` of exactly that length.
    Tuple(Vec<ConstraintNode>),
    /// `T?`: may be absent when used as an object field.
    Optional(Box<ConstraintNode>),
    /// A named definition from the enclosing scope.
    Reference(String),
}

impl ConstraintNode {
    /// Builds a union, flattening nested unions and dropping duplicate branches.
    ///
    /// A union left with one branch collapses to that branch.
    pub fn union<I>(alternatives: I) -> ConstraintNode
    where
        I: IntoIterator<Item = ConstraintNode>,
    {
        let mut flat: Vec<ConstraintNode> = Vec::new();
        for alternative in alternatives {
            let branches = match alternative {
                ConstraintNode::Union(inner) => inner,
                other => vec![other],
            };
            for branch in branches {
                if !flat.contains(&branch) {
                    flat.push(branch);
                }
            }
        }

        if flat.len() == 1 {
            let only = flat.remove(0);
            tracing::warn!(branch = %only, "union collapsed to a single branch");
            return only;
        }
        ConstraintNode::Union(flat)
    }

    /// Wraps this node in `ArrayOf`.
    pub fn array(self) -> ConstraintNode {
        ConstraintNode::ArrayOf(Box::new(self))
    }

    /// Wraps this node in `Optional`.
    pub fn optional(self) -> ConstraintNode {
        ConstraintNode::Optional(Box::new(self))
    }

    /// Returns true if this node is an `Optional` marker.
    pub fn is_optional(&self) -> bool {
        matches!(self, ConstraintNode::Optional(_))
    }

    /// Removes an outer `Optional` marker, reporting whether one was present.
    pub fn split_optional(self) -> (ConstraintNode, bool) {
        match self {
            ConstraintNode::Optional(inner) => (*inner, true),
            other => (other, false),
        }
    }

    /// Checks the structural invariants: unions have two or more branches, ranges
    /// describe a non-empty interval, and `Optional` only appears outermost.
    pub fn check(&self) -> Result<(), GrammarError> {
        self.check_at(true)
    }

    fn check_at(&self, outermost: bool) -> Result<(), GrammarError> {
        match self {
            ConstraintNode::Range { kind, min, max } => check_range(*kind, *min, *max),
            ConstraintNode::Union(alternatives) => {
                if alternatives.len() < 2 {
                    return Err(GrammarError::DegenerateUnion {
                        count: alternatives.len(),
                    });
                }
                alternatives.iter().try_for_each(|a| a.check_at(false))
            }
            ConstraintNode::ArrayOf(inner) => inner.check_at(false),
            ConstraintNode::Tuple(items) => items.iter().try_for_each(|i| i.check_at(false)),
            ConstraintNode::Optional(inner) => {
                if !outermost {
                    return Err(GrammarError::MisplacedOptional { offset: 0 });
                }
                inner.check_at(false)
            }
            ConstraintNode::Primitive(_)
            | ConstraintNode::StringFormat(_)
            | ConstraintNode::Literal(_)
            | ConstraintNode::Reference(_) => Ok(()),
        }
    }

    /// Collects every scope name this node refers to.
    pub fn references(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_references(&mut names);
        names
    }

    fn collect_references<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            ConstraintNode::Reference(name) => names.push(name),
            ConstraintNode::Union(items) | ConstraintNode::Tuple(items) => {
                items.iter().for_each(|i| i.collect_references(names))
            }
            ConstraintNode::ArrayOf(inner) | ConstraintNode::Optional(inner) => {
                inner.collect_references(names)
            }
            _ => {}
        }
    }

    /// Scope names reachable from this node before any array or tuple.
    pub(crate) fn head_references(&self) -> Vec<&str> {
        match self {
            ConstraintNode::Reference(name) => vec![name.as_str()],
            ConstraintNode::Union(items) => {
                items.iter().flat_map(|i| i.head_references()).collect()
            }
            ConstraintNode::Optional(inner) => inner.head_references(),
            _ => Vec::new(),
        }
    }

    /// Whether this node must be parenthesized when followed by `[]`.
    fn needs_group(&self) -> bool {
        matches!(
            self,
            ConstraintNode::Union(_) | ConstraintNode::Range { .. } | ConstraintNode::Optional(_)
        )
    }
}

/// Validates range bounds for a kind.
pub(crate) fn check_range(
    kind: PrimitiveKind,
    min: Option<Bound>,
    max: Option<Bound>,
) -> Result<(), GrammarError> {
    if !kind.is_boundable() {
        return Err(GrammarError::UnboundableType {
            target: kind.keyword().to_string(),
            offset: 0,
        });
    }

    for bound in min.iter().chain(max.iter()) {
        if !bound.value.is_finite() {
            return Err(GrammarError::InvalidBound {
                kind: kind.keyword().to_string(),
                bound: bound.value,
                reason: "bounds must be finite",
            });
        }
        if kind == PrimitiveKind::String && (bound.value < 0.0 || bound.value.fract() != 0.0) {
            return Err(GrammarError::InvalidBound {
                kind: kind.keyword().to_string(),
                bound: bound.value,
                reason: "string length bounds must be non-negative integers",
            });
        }
    }

    if let (Some(lo), Some(hi)) = (min, max) {
        let empty = lo.value > hi.value
            || (lo.value == hi.value && !(lo.inclusive && hi.inclusive));
        if empty {
            return Err(GrammarError::InvalidRange {
                min: lo.value,
                max: hi.value,
            });
        }
    }
    Ok(())
}

impl Display for ConstraintNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintNode::Primitive(kind) => write!(f, "{}", kind),
            ConstraintNode::Range { kind, min, max } => match (min, max) {
                (Some(lo), Some(hi)) if lo.value == hi.value && lo.inclusive && hi.inclusive => {
                    write!(f, "{} == {}", kind, lo.value)
                }
                (Some(lo), Some(hi)) => write!(
                    f,
                    "{} {} {} {} {}",
                    lo.value,
                    lo.lower_op(),
                    kind,
                    hi.lower_op(),
                    hi.value
                ),
                (Some(lo), None) => {
                    let op = if lo.inclusive { ">=" } else { ">" };
                    write!(f, "{} {} {}", kind, op, lo.value)
                }
                (None, Some(hi)) => write!(f, "{} {} {}", kind, hi.lower_op(), hi.value),
                (None, None) => write!(f, "{}", kind),
            },
            ConstraintNode::StringFormat(format) => write!(f, "string.{}", format),
            ConstraintNode::Literal(literal) => write!(f, "{}", literal),
            ConstraintNode::Union(alternatives) => {
                for (i, alternative) in alternatives.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{}", alternative)?;
                }
                Ok(())
            }
            ConstraintNode::ArrayOf(inner) if inner.needs_group() => write!(f, "({})[]", inner),
            ConstraintNode::ArrayOf(inner) => write!(f, "{}[]", inner),
            ConstraintNode::Tuple(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            ConstraintNode::Optional(inner) => write!(f, "{}?", inner),
            ConstraintNode::Reference(name) => f.write_str(name),
        }
    }
}

impl From<PrimitiveKind> for ConstraintNode {
    fn from(kind: PrimitiveKind) -> Self {
        ConstraintNode::Primitive(kind)
    }
}

impl From<Literal> for ConstraintNode {
    fn from(literal: Literal) -> Self {
        ConstraintNode::Literal(literal)
    }
}

impl From<StringFormat> for ConstraintNode {
    fn from(format: StringFormat) -> Self {
        ConstraintNode::StringFormat(format)
    }
}
