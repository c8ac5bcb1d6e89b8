//! Compiled validators and the two ways to run them.
//!
//! A [`CompiledValidator`] is produced once by [`compile`](crate::compile) and
//! then reused. [`CompiledValidator::allows`] answers yes or no as cheaply as
//! possible; [`CompiledValidator::validate`] reports every violation.

mod engine;
mod node;

use std::fmt;
use std::sync::Arc;

use rayon::prelude::*;
use serde::de::DeserializeOwned;
use serde_json::Value;
use stillwater::Validation;

use crate::error::ParseError;
use crate::path::ValuePath;
use crate::projection::{Projected, Shape};
use crate::validation::{Definitions, ValidationContext};
use crate::ValidationOutcome;

pub use node::{CompiledNode, FieldValidator, LeafValidator, ObjectValidator};

/// Reference depth limit used when none is configured.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// An immutable, compiled schema.
///
/// Cloning is cheap: the tree is shared behind an `Arc`.
///
/// # Example
///
/// ```rust
/// use inquest::{compile, SchemaDescription};
/// use serde_json::json;
///
/// let validator = compile(&SchemaDescription::from([
///     ("age", "17 < number.integer <= 120"),
/// ])).unwrap();
///
/// assert!(validator.allows(&json!({ "age": 18 })));
///
/// let report = validator.validate(&json!({ "age": 17 })).into_result().unwrap_err();
/// assert_eq!(report.describe(), "age: expected 17 < number.integer <= 120, got 17");
/// ```
#[derive(Clone)]
pub struct CompiledValidator {
    root: Arc<CompiledNode>,
    definitions: Option<Arc<Definitions>>,
    max_depth: usize,
}

impl CompiledValidator {
    pub(crate) fn new(
        root: Arc<CompiledNode>,
        definitions: Option<Arc<Definitions>>,
        max_depth: usize,
    ) -> Self {
        Self {
            root,
            definitions,
            max_depth,
        }
    }

    /// The root of the compiled tree.
    pub fn node(&self) -> &CompiledNode {
        &self.root
    }

    /// The reference depth limit applied during validation.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Whether this validator resolves references through scope definitions.
    pub fn has_definitions(&self) -> bool {
        self.definitions.is_some()
    }

    fn context(&self) -> ValidationContext {
        ValidationContext::new(self.definitions.clone(), self.max_depth)
    }

    /// Returns true if `value` satisfies the schema.
    ///
    /// Stops at the first failure and builds no diagnostics.
    pub fn allows(&self, value: &Value) -> bool {
        self.root.allows(value, &self.context())
    }

    /// Checks `value` in full.
    ///
    /// Returns `Success` with the normalized value (stripped keys removed), or
    /// `Failure` with every violation found. Sibling fields and array elements
    /// are all visited even after a failure.
    pub fn validate(&self, value: &Value) -> ValidationOutcome {
        let outcome = self.root.check(value, &ValuePath::root(), &self.context());
        match &outcome {
            Validation::Success(_) => tracing::trace!("value is valid"),
            Validation::Failure(report) => {
                tracing::trace!(violations = report.len(), "value is invalid")
            }
        }
        outcome
    }

    /// Validates every value in parallel, preserving input order.
    pub fn validate_batch(&self, values: &[Value]) -> Vec<ValidationOutcome> {
        values.par_iter().map(|value| self.validate(value)).collect()
    }

    /// Keeps the values that satisfy the schema, preserving input order.
    pub fn filter_allowed<'v>(&self, values: &'v [Value]) -> Vec<&'v Value> {
        values.par_iter().filter(|value| self.allows(value)).collect()
    }

    /// The type every valid value conforms to.
    pub fn shape(&self) -> Shape {
        Shape::of(self)
    }

    /// Returns true if every value this schema accepts is a value of `T`.
    ///
    /// ```rust
    /// use inquest::compile;
    ///
    /// let tags = compile(&"string[]".into()).unwrap();
    /// assert!(tags.projects_to::<Vec<String>>());
    /// assert!(!tags.projects_to::<Vec<i64>>());
    /// ```
    pub fn projects_to<T: Projected>(&self) -> bool {
        T::shape().accepts(&self.shape())
    }

    /// Validates `value`, then deserializes the normalized value into `T`.
    pub fn parse<T: DeserializeOwned>(&self, value: &Value) -> Result<T, ParseError> {
        let normalized = self.validate(value).into_result().map_err(ParseError::Invalid)?;
        Ok(serde_json::from_value(normalized)?)
    }
}

impl fmt::Debug for CompiledValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledValidator")
            .field("root", &self.root)
            .field(
                "definitions",
                &self
                    .definitions
                    .as_ref()
                    .map(|defs| defs.keys().collect::<Vec<_>>()),
            )
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

/// Returns true if `value` satisfies `validator`.
pub fn allows(validator: &CompiledValidator, value: &Value) -> bool {
    validator.allows(value)
}

/// Checks `value` against `validator`, collecting every violation.
pub fn validate(validator: &CompiledValidator, value: &Value) -> ValidationOutcome {
    validator.validate(value)
}
