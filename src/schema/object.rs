//! Object descriptions.
//!
//! [`ObjectSchema`] lists fields in declaration order; the compiler checks
//! them in that order and reports violations in that order too.

use super::description::SchemaDescription;

/// What happens to keys an object schema does not declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtraFields {
    /// Undeclared keys pass through untouched.
    #[default]
    Allow,
    /// Each undeclared key is an `extra-field` violation.
    Reject,
    /// Undeclared keys are dropped from the normalized value.
    Strip,
}

/// One declared field of an object description.
#[derive(Debug, Clone)]
pub struct FieldDescription {
    name: String,
    description: SchemaDescription,
    optional: bool,
}

impl FieldDescription {
    /// The field name, without any `?` marker.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The description the field's value must match.
    pub fn description(&self) -> &SchemaDescription {
        &self.description
    }

    /// Whether the field may be absent.
    ///
    /// A field can also become optional through a trailing `?` in its
    /// expression; that is resolved at compile time.
    pub fn is_optional(&self) -> bool {
        self.optional
    }
}

/// A schema for JSON objects.
///
/// # Example
///
/// ```rust
/// use inquest::{compile, ExtraFields, Schema};
/// use serde_json::json;
///
/// let schema = Schema::object()
///     .field("name", Schema::string().min_len(1))
///     .field("age", Schema::integer().gt(17.0).le(120.0))
///     .optional("bio", "string")
///     .extra_fields(ExtraFields::Reject);
///
/// let validator = compile(&schema.into()).unwrap();
/// assert!(validator.allows(&json!({ "name": "Ada", "age": 36 })));
/// assert!(!validator.allows(&json!({ "name": "Ada", "age": 36, "admin": true })));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    fields: Vec<FieldDescription>,
    extra_fields: Option<ExtraFields>,
}

impl ObjectSchema {
    /// Creates an object schema with no fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a required field.
    ///
    /// Declaring the same name twice is reported by the compiler as a
    /// duplicate field.
    pub fn field(
        mut self,
        name: impl Into<String>,
        description: impl Into<SchemaDescription>,
    ) -> Self {
        self.fields.push(FieldDescription {
            name: name.into(),
            description: description.into(),
            optional: false,
        });
        self
    }

    /// Adds a field that may be absent. When present it must match.
    pub fn optional(
        mut self,
        name: impl Into<String>,
        description: impl Into<SchemaDescription>,
    ) -> Self {
        self.fields.push(FieldDescription {
            name: name.into(),
            description: description.into(),
            optional: true,
        });
        self
    }

    /// Overrides the compiler's extra-field policy for this object only.
    pub fn extra_fields(mut self, policy: ExtraFields) -> Self {
        self.extra_fields = Some(policy);
        self
    }

    /// The declared fields, in declaration order.
    pub fn fields(&self) -> &[FieldDescription] {
        &self.fields
    }

    /// The per-object policy override, if any.
    pub fn extra_fields_override(&self) -> Option<ExtraFields> {
        self.extra_fields
    }
}
