//! The constraint grammar.
//!
//! A constraint expression is a compact string such as `17 < number.integer <= 120`,
//! `string.email`, `'pending' | 'active'` or `(string | number)[]`. [`parse`] turns one
//! into a [`ConstraintNode`]; the node's `Display` impl renders it back.

mod ast;
mod lexer;
mod parser;

pub(crate) use ast::check_range;
pub use ast::{Bound, ConstraintNode, Literal, PrimitiveKind};
pub(crate) use parser::KEYWORDS;

use crate::error::GrammarError;
use parser::Parser;

/// Parses a constraint expression with no scope aliases in view.
///
/// # Example
///
/// ```rust
/// use inquest::grammar::{parse, ConstraintNode, PrimitiveKind};
///
/// let node = parse("string[]").unwrap();
/// assert_eq!(node, ConstraintNode::Primitive(PrimitiveKind::String).array());
/// ```
pub fn parse(expression: &str) -> Result<ConstraintNode, GrammarError> {
    parse_with_aliases(expression, |_| false)
}

/// Parses a constraint expression, resolving identifiers for which `is_alias`
/// returns true to [`ConstraintNode::Reference`].
pub fn parse_with_aliases<F>(expression: &str, is_alias: F) -> Result<ConstraintNode, GrammarError>
where
    F: Fn(&str) -> bool,
{
    Parser::new(expression, &is_alias)?.parse_expression()
}
