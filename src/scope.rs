//! Named, mutually referencing schema definitions.
//!
//! A [`Scope`] collects definitions under names that constraint expressions
//! can then use like types: `User[]`, `Tree | null`. Compiling the scope
//! compiles every definition with every name in view, so definitions may
//! refer to each other and to themselves.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::compiler::Compiler;
use crate::error::SchemaError;
use crate::grammar::KEYWORDS;
use crate::schema::SchemaDescription;
use crate::validation::Definitions;
use crate::validator::CompiledValidator;
use crate::ValidationOutcome;

/// Definitions waiting to be compiled together.
///
/// # Example
///
/// ```rust
/// use inquest::{Schema, Scope};
/// use serde_json::json;
///
/// let scope = Scope::new()
///     .define("User", Schema::object()
///         .field("name", "string >= 1")
///         .optional("friends", "User[]"))
///     .unwrap()
///     .compile()
///     .unwrap();
///
/// let user = scope.validator("User").unwrap();
/// assert!(user.allows(&json!({
///     "name": "Ada",
///     "friends": [{ "name": "Charles" }]
/// })));
/// assert!(!user.allows(&json!({ "name": "Ada", "friends": [{}] })));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Scope {
    definitions: IndexMap<String, SchemaDescription>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a definition.
    ///
    /// # Errors
    ///
    /// `DuplicateDefinition` if `name` is already defined, `ReservedName` if
    /// it is a grammar keyword such as `string` or `null`.
    pub fn define(
        mut self,
        name: impl Into<String>,
        description: impl Into<SchemaDescription>,
    ) -> Result<Self, SchemaError> {
        let name = name.into();
        if KEYWORDS.contains(&name.as_str()) {
            return Err(SchemaError::ReservedName(name));
        }
        if self.definitions.contains_key(&name) {
            return Err(SchemaError::DuplicateDefinition(name));
        }
        self.definitions.insert(name, description.into());
        Ok(self)
    }

    /// Defined names, in definition order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    /// Compiles every definition with default options.
    ///
    /// Fails with `UnguardedCycle` when definitions reach themselves through
    /// references and unions alone, such as `A: "B | null"` with `B: "A"`.
    pub fn compile(&self) -> Result<CompiledScope, SchemaError> {
        self.compile_with(&Compiler::default())
    }

    /// Compiles every definition with `compiler`'s options.
    pub fn compile_with(&self, compiler: &Compiler) -> Result<CompiledScope, SchemaError> {
        let definitions = compiler.compile_definitions(&self.definitions)?;
        tracing::debug!(definitions = definitions.len(), "compiled scope");
        Ok(CompiledScope {
            definitions: Arc::new(definitions),
            max_depth: compiler.options().max_depth,
        })
    }
}

/// A compiled scope: one validator per definition, sharing the definitions.
#[derive(Clone)]
pub struct CompiledScope {
    definitions: Arc<Definitions>,
    max_depth: usize,
}

impl CompiledScope {
    /// The validator for `name`, or `None` if the scope does not define it.
    pub fn validator(&self, name: &str) -> Option<CompiledValidator> {
        self.definitions.get(name).map(|root| {
            CompiledValidator::new(
                Arc::clone(root),
                Some(Arc::clone(&self.definitions)),
                self.max_depth,
            )
        })
    }

    /// Validates `value` against the definition called `name`.
    pub fn validate(&self, name: &str, value: &Value) -> Result<ValidationOutcome, SchemaError> {
        self.validator(name)
            .map(|validator| validator.validate(value))
            .ok_or_else(|| SchemaError::UnknownDefinition(name.to_string()))
    }

    /// Defined names, in definition order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for CompiledScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledScope")
            .field("names", &self.names().collect::<Vec<_>>())
            .field("max_depth", &self.max_depth)
            .finish()
    }
}
