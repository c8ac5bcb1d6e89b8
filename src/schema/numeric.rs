//! Numeric schemas.
//!
//! [`NumberSchema`] builds `number` and `number.integer` constraints with
//! per-side inclusive or exclusive bounds.

use crate::grammar::{Bound, ConstraintNode, PrimitiveKind};

/// A schema for numeric values.
///
/// Each side of the range keeps whichever bound was set last. Bounds that
/// leave no admissible value (`gt(5.0).lt(5.0)`) are rejected when the
/// schema is compiled.
///
/// # Example
///
/// ```rust
/// use inquest::{compile, Schema};
/// use serde_json::json;
///
/// let age = compile(&Schema::integer().gt(17.0).le(120.0).into()).unwrap();
///
/// assert!(age.allows(&json!(18)));
/// assert!(age.allows(&json!(120)));
/// assert!(!age.allows(&json!(17)));
/// assert!(!age.allows(&json!(18.5)));
/// ```
#[derive(Debug, Clone)]
pub struct NumberSchema {
    kind: PrimitiveKind,
    min: Option<Bound>,
    max: Option<Bound>,
}

impl NumberSchema {
    /// Creates an unbounded `number` schema.
    pub fn new() -> Self {
        Self {
            kind: PrimitiveKind::Number,
            min: None,
            max: None,
        }
    }

    /// Restricts the schema to numbers without a fractional part.
    pub fn integer(mut self) -> Self {
        self.kind = PrimitiveKind::Integer;
        self
    }

    /// Value must be strictly greater than `value`.
    pub fn gt(mut self, value: f64) -> Self {
        self.min = Some(Bound::exclusive(value));
        self
    }

    /// Value must be greater than or equal to `value`.
    pub fn ge(mut self, value: f64) -> Self {
        self.min = Some(Bound::inclusive(value));
        self
    }

    /// Value must be strictly less than `value`.
    pub fn lt(mut self, value: f64) -> Self {
        self.max = Some(Bound::exclusive(value));
        self
    }

    /// Value must be less than or equal to `value`.
    pub fn le(mut self, value: f64) -> Self {
        self.max = Some(Bound::inclusive(value));
        self
    }

    /// Value must lie in `min..=max`.
    pub fn range(self, min: f64, max: f64) -> Self {
        self.ge(min).le(max)
    }

    /// Value must be greater than zero.
    pub fn positive(self) -> Self {
        self.gt(0.0)
    }

    /// Value must be zero or greater.
    pub fn non_negative(self) -> Self {
        self.ge(0.0)
    }

    /// Value must be less than zero.
    pub fn negative(self) -> Self {
        self.lt(0.0)
    }

    /// Lowers the builder to a constraint node.
    pub fn into_node(self) -> ConstraintNode {
        match (self.min, self.max) {
            (None, None) => ConstraintNode::Primitive(self.kind),
            (min, max) => ConstraintNode::Range {
                kind: self.kind,
                min,
                max,
            },
        }
    }
}

impl Default for NumberSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl From<NumberSchema> for ConstraintNode {
    fn from(schema: NumberSchema) -> Self {
        schema.into_node()
    }
}
