//! Compile-time errors.
//!
//! These signal a malformed schema. They are returned from parsing and
//! compilation; no partially built validator is ever produced alongside them.

use thiserror::Error;

use crate::path::ValuePath;

use super::violation::Report;

/// A constraint expression that does not match the grammar.
///
/// Every variant carrying an `offset` records the byte position in the
/// expression where the problem was detected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GrammarError {
    /// The expression is empty or only whitespace.
    #[error("empty expression")]
    Empty,

    /// A character that starts no token.
    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    /// A quoted literal without its closing quote.
    #[error("unterminated string literal starting at offset {offset}")]
    UnterminatedString { offset: usize },

    /// A well-formed token in a place the grammar does not allow it.
    #[error("expected {expected} at offset {offset}, found '{found}'")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
        offset: usize,
    },

    /// The expression stopped while more input was required.
    #[error("expected {expected} but the expression ended")]
    UnexpectedEnd { expected: &'static str },

    /// An identifier that is neither a type keyword nor a known alias.
    #[error("unknown type '{name}' at offset {offset}")]
    UnknownType { name: String, offset: usize },

    /// A `.suffix` that is not a supported format for its base type.
    #[error("unknown format '{base}.{format}' at offset {offset}")]
    UnknownFormat {
        base: String,
        format: String,
        offset: usize,
    },

    /// A `|` with nothing on one of its sides.
    #[error("empty union branch at offset {offset}")]
    EmptyUnionBranch { offset: usize },

    /// Comparators that do not describe a single interval.
    #[error("unbalanced range operators at offset {offset}: {reason}")]
    UnbalancedRange { reason: &'static str, offset: usize },

    /// Bounds that describe an empty interval.
    #[error("range {min} .. {max} is empty")]
    InvalidRange { min: f64, max: f64 },

    /// A bound that cannot apply to its type.
    #[error("invalid bound {bound} for {kind}: {reason}")]
    InvalidBound {
        kind: String,
        bound: f64,
        reason: &'static str,
    },

    /// A comparator applied to something that has no order or length.
    #[error("'{target}' cannot be bounded (offset {offset})")]
    UnboundableType { target: String, offset: usize },

    /// A bracket or parenthesis without its partner.
    #[error("unbalanced brackets at offset {offset}")]
    UnbalancedBrackets { offset: usize },

    /// A `?` that does not end the expression.
    #[error("optional marker '?' must end the expression (offset {offset})")]
    MisplacedOptional { offset: usize },

    /// A union with fewer than two alternatives built outside the parser.
    #[error("union needs at least two alternatives, got {count}")]
    DegenerateUnion { count: usize },
}

/// A schema description that cannot be compiled.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    /// A leaf expression or node failed grammar checks.
    #[error("invalid constraint at '{path}': {source}")]
    Grammar {
        path: ValuePath,
        #[source]
        source: GrammarError,
    },

    /// The same field name appears twice in one object.
    #[error("duplicate field '{name}' at '{path}'")]
    DuplicateField { path: ValuePath, name: String },

    /// An optional marker outside an object field.
    #[error("optional marker not allowed at '{path}' (only object fields may be optional)")]
    MisplacedOptional { path: ValuePath },

    /// An embedded compiled schema that depends on its own scope.
    #[error("compiled sub-schema at '{path}' references definitions from another scope")]
    ForeignScope { path: ValuePath },

    /// A JSON schema description that is neither a string, object nor array.
    #[error("unsupported schema description at '{path}': {found}")]
    Unsupported { path: ValuePath, found: String },

    /// A scope defines the same name twice.
    #[error("definition '{0}' already exists")]
    DuplicateDefinition(String),

    /// A scope definition uses a grammar keyword as its name.
    #[error("'{0}' is reserved and cannot name a definition")]
    ReservedName(String),

    /// Lookup of a name the scope does not define.
    #[error("definition '{0}' not found")]
    UnknownDefinition(String),

    /// Definitions that reach themselves through references and unions
    /// alone, with no array, tuple or object in between.
    #[error("definitions refer to themselves without nesting: {}", .cycle.join(" -> "))]
    UnguardedCycle { cycle: Vec<String> },
}

impl SchemaError {
    /// Wraps a grammar error with the path of the field that produced it.
    pub(crate) fn grammar(path: &ValuePath, source: GrammarError) -> Self {
        SchemaError::Grammar {
            path: path.clone(),
            source,
        }
    }
}

/// Failure of a typed parse: the value was invalid, or valid but not
/// representable as the requested type.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The value failed validation.
    #[error("validation failed:\n{0}")]
    Invalid(Report),

    /// The value passed validation but does not deserialize into the target type.
    #[error("validated value does not fit the target type: {0}")]
    Shape(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grammar_error_messages_carry_offsets() {
        let err = GrammarError::UnknownType {
            name: "strin".to_string(),
            offset: 4,
        };
        assert_eq!(err.to_string(), "unknown type 'strin' at offset 4");
    }

    #[test]
    fn test_schema_error_wraps_grammar_error_with_path() {
        let err = SchemaError::grammar(
            &ValuePath::root().push_key("user").push_key("age"),
            GrammarError::InvalidRange {
                min: 10.0,
                max: 5.0,
            },
        );
        assert_eq!(
            err.to_string(),
            "invalid constraint at 'user.age': range 10 .. 5 is empty"
        );
        assert!(std::error::Error::source(&err).is_some());
    }
}
