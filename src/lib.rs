//! # Inquest
//!
//! Runtime schema validation with statically derivable types.
//!
//! A schema is described once (as constraint expressions, fluent builders,
//! JSON or the [`schema!`] macro), compiled into an immutable
//! [`CompiledValidator`], and then checked against any number of untyped
//! [`serde_json::Value`]s. Validation never stops at the first problem: every
//! violation is collected, with the path to the offending value.
//!
//! ## Core Types
//!
//! - [`SchemaDescription`]: what the caller writes
//! - [`CompiledValidator`]: what the compiler produces, cheap to clone and share
//! - [`Report`]: the non-empty list of [`Violation`]s from a failed validation
//! - [`Shape`]: the static type a schema's valid values conform to
//!
//! ## Example
//!
//! ```rust
//! use inquest::{compile, RuleKind, SchemaDescription};
//! use serde_json::json;
//!
//! let validator = compile(&SchemaDescription::from([
//!     ("name", "string >= 1"),
//!     ("email", "string.email"),
//!     ("age", "17 < number.integer <= 120"),
//!     ("status", "'pending' | 'active' | 'inactive'"),
//!     ("bio?", "string"),
//! ])).unwrap();
//!
//! assert!(validator.allows(&json!({
//!     "name": "Ada",
//!     "email": "ada@example.com",
//!     "age": 36,
//!     "status": "active"
//! })));
//!
//! let report = validator
//!     .validate(&json!({ "email": "nope", "age": 17, "status": "done" }))
//!     .into_result()
//!     .unwrap_err();
//!
//! assert_eq!(
//!     report.rules(),
//!     vec![
//!         RuleKind::MissingRequiredField,
//!         RuleKind::FormatViolation,
//!         RuleKind::RangeViolation,
//!         RuleKind::UnionExhausted,
//!     ]
//! );
//! println!("{}", report.describe());
//! ```

pub mod error;
pub mod format;
pub mod grammar;
pub mod path;
pub mod projection;
pub mod schema;
pub mod scope;
pub mod validator;

mod compiler;
mod macros;
mod validation;

pub use compiler::{compile, CompileOptions, Compiler};
pub use error::{describe, GrammarError, ParseError, Report, RuleKind, SchemaError, Violation};
pub use format::StringFormat;
pub use grammar::{parse, ConstraintNode};
pub use path::{PathSegment, ValuePath};
pub use projection::{Projected, Shape, ShapeField};
pub use schema::{
    ExtraFields, FieldDescription, NumberSchema, ObjectSchema, Schema, SchemaDescription,
    StringSchema,
};
pub use scope::{CompiledScope, Scope};
pub use validator::{allows, validate, CompiledValidator};

/// Outcome of [`validate`]: the normalized value, or every violation found.
pub type ValidationOutcome = stillwater::Validation<serde_json::Value, Report>;

const _: () = {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<CompiledValidator>();
    assert_send_sync::<CompiledScope>();
    assert_send_sync::<Compiler>();
};
