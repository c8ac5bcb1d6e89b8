//! Error types.
//!
//! Compile-time problems ([`GrammarError`], [`SchemaError`]) are Rust errors.
//! Problems found in input data are diagnostics ([`Violation`], [`Report`]) and are
//! returned as values, never raised.

mod compile_error;
mod violation;

pub use compile_error::{GrammarError, ParseError, SchemaError};
pub(crate) use violation::render_value;
pub use violation::{describe, Report, RuleKind, Violation};
