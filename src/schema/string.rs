//! String length schemas.
//!
//! This module provides [`StringSchema`], a builder for `string` constraints
//! bounded by length. Formats (`string.email`, ...) come from
//! [`Schema::format`](super::Schema::format) instead, since a formatted string
//! cannot also carry a length range.

use crate::grammar::{Bound, ConstraintNode, PrimitiveKind};

/// A schema for string values with optional length bounds.
///
/// Lengths count Unicode scalar values, not bytes.
///
/// # Example
///
/// ```rust
/// use inquest::{compile, Schema};
/// use serde_json::json;
///
/// let validator = compile(&Schema::string().min_len(3).max_len(20).into()).unwrap();
///
/// assert!(validator.allows(&json!("alice")));
/// assert!(!validator.allows(&json!("al")));
/// assert!(!validator.allows(&json!(42)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct StringSchema {
    min: Option<Bound>,
    max: Option<Bound>,
}

impl StringSchema {
    /// Creates a string schema with no length bounds.
    pub fn new() -> Self {
        Self::default()
    }

    /// The string must have at least `min` characters.
    pub fn min_len(mut self, min: usize) -> Self {
        self.min = Some(Bound::inclusive(min as f64));
        self
    }

    /// The string must have at most `max` characters.
    pub fn max_len(mut self, max: usize) -> Self {
        self.max = Some(Bound::inclusive(max as f64));
        self
    }

    /// The string must have exactly `len` characters.
    pub fn exact_len(self, len: usize) -> Self {
        self.min_len(len).max_len(len)
    }

    /// Lowers the builder to a constraint node.
    ///
    /// Without bounds this is plain `string`; otherwise a length range.
    pub fn into_node(self) -> ConstraintNode {
        match (self.min, self.max) {
            (None, None) => ConstraintNode::Primitive(PrimitiveKind::String),
            (min, max) => ConstraintNode::Range {
                kind: PrimitiveKind::String,
                min,
                max,
            },
        }
    }
}

impl From<StringSchema> for ConstraintNode {
    fn from(schema: StringSchema) -> Self {
        schema.into_node()
    }
}
