//! Schema descriptions and the fluent builders that produce them.
//!
//! The builders are a second surface over the same constraint AST the string
//! grammar produces: `Schema::integer().gt(17.0).le(120.0)` and
//! `"17 < number.integer <= 120"` compile to identical validators.
//!
//! # Example
//!
//! ```rust
//! use inquest::{compile, Schema};
//! use serde_json::json;
//!
//! let schema = Schema::object()
//!     .field("email", Schema::email())
//!     .field("status", Schema::literals(["pending", "active", "inactive"]))
//!     .optional("tags", Schema::array("string >= 1"));
//!
//! let validator = compile(&schema.into()).unwrap();
//! assert!(validator.allows(&json!({ "email": "a@b.com", "status": "active" })));
//! ```

mod description;
mod numeric;
mod object;
mod string;

pub use description::SchemaDescription;
pub use numeric::NumberSchema;
pub use object::{ExtraFields, FieldDescription, ObjectSchema};
pub use string::StringSchema;

use crate::format::StringFormat;
use crate::grammar::{ConstraintNode, Literal, PrimitiveKind};

/// Entry point for building schemas in code.
pub struct Schema;

impl Schema {
    /// A string, optionally bounded by length.
    pub fn string() -> StringSchema {
        StringSchema::new()
    }

    /// Any number, optionally bounded.
    pub fn number() -> NumberSchema {
        NumberSchema::new()
    }

    /// A number with no fractional part, optionally bounded.
    pub fn integer() -> NumberSchema {
        NumberSchema::new().integer()
    }

    /// `true` or `false`.
    pub fn boolean() -> ConstraintNode {
        ConstraintNode::Primitive(PrimitiveKind::Boolean)
    }

    /// A string in the given format.
    pub fn format(format: StringFormat) -> ConstraintNode {
        ConstraintNode::StringFormat(format)
    }

    /// Shorthand for `Schema::format(StringFormat::Email)`.
    pub fn email() -> ConstraintNode {
        Self::format(StringFormat::Email)
    }

    /// Exactly this value.
    pub fn literal(value: impl Into<Literal>) -> ConstraintNode {
        ConstraintNode::Literal(value.into())
    }

    /// Any one of the given literal values.
    ///
    /// ```rust
    /// use inquest::Schema;
    ///
    /// let status = Schema::literals(["pending", "active"]);
    /// assert_eq!(status.to_string(), "'pending' | 'active'");
    /// ```
    pub fn literals<I, L>(values: I) -> ConstraintNode
    where
        I: IntoIterator<Item = L>,
        L: Into<Literal>,
    {
        ConstraintNode::union(values.into_iter().map(|v| ConstraintNode::Literal(v.into())))
    }

    /// Any one of the given alternatives, tried in order.
    pub fn union<I, N>(alternatives: I) -> ConstraintNode
    where
        I: IntoIterator<Item = N>,
        N: Into<ConstraintNode>,
    {
        ConstraintNode::union(alternatives.into_iter().map(Into::into))
    }

    /// A named definition from the enclosing [`Scope`](crate::Scope).
    pub fn reference(name: impl Into<String>) -> ConstraintNode {
        ConstraintNode::Reference(name.into())
    }

    /// An object with no fields yet.
    pub fn object() -> ObjectSchema {
        ObjectSchema::new()
    }

    /// An array whose elements all match `item`.
    pub fn array(item: impl Into<SchemaDescription>) -> SchemaDescription {
        SchemaDescription::array(item)
    }

    /// A fixed-length array, one description per position.
    pub fn tuple<I, D>(items: I) -> SchemaDescription
    where
        I: IntoIterator<Item = D>,
        D: Into<SchemaDescription>,
    {
        SchemaDescription::tuple(items)
    }

    /// A constraint expression, e.g. `Schema::expr("string.uuid")`.
    pub fn expr(expression: impl Into<String>) -> SchemaDescription {
        SchemaDescription::Expression(expression.into())
    }
}
