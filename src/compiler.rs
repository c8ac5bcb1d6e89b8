//! The schema compiler.
//!
//! [`Compiler`] walks a [`SchemaDescription`] depth-first and produces a
//! [`CompiledValidator`]. Leaf expressions are parsed through a shared cache,
//! so a compiler reused across many schemas parses each distinct expression
//! once.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use indexmap::map::Entry;
use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::error::{GrammarError, SchemaError};
use crate::grammar::{parse, parse_with_aliases, ConstraintNode};
use crate::path::ValuePath;
use crate::schema::{ExtraFields, ObjectSchema, SchemaDescription};
use crate::validation::Definitions;
use crate::validator::{
    CompiledNode, CompiledValidator, FieldValidator, LeafValidator, ObjectValidator,
    DEFAULT_MAX_DEPTH,
};

/// Settings applied to every object and reference in a compiled schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    /// Policy for undeclared object keys, unless an object overrides it.
    pub extra_fields: ExtraFields,
    /// How many nested scope references a validation may follow.
    pub max_depth: usize,
}

impl CompileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extra_fields(mut self, extra_fields: ExtraFields) -> Self {
        self.extra_fields = extra_fields;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            extra_fields: ExtraFields::Allow,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Compiles schema descriptions with fixed options and a shared parse cache.
///
/// A `Compiler` is `Send + Sync`; one instance can serve many threads.
///
/// # Example
///
/// ```rust
/// use inquest::{CompileOptions, Compiler, ExtraFields, SchemaDescription};
/// use serde_json::json;
///
/// let compiler = Compiler::new(CompileOptions::new().with_extra_fields(ExtraFields::Strip));
/// let validator = compiler
///     .compile(&SchemaDescription::from([("id", "string.uuid")]))
///     .unwrap();
///
/// let clean = validator
///     .validate(&json!({ "id": "123e4567-e89b-12d3-a456-426614174000", "debug": true }))
///     .into_result()
///     .unwrap();
/// assert_eq!(clean, json!({ "id": "123e4567-e89b-12d3-a456-426614174000" }));
/// ```
#[derive(Debug, Default)]
pub struct Compiler {
    options: CompileOptions,
    cache: RwLock<HashMap<String, ConstraintNode>>,
}

impl Compiler {
    pub fn new(options: CompileOptions) -> Self {
        Self {
            options,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Number of distinct expressions parsed and cached so far.
    pub fn cached_expressions(&self) -> usize {
        self.cache.read().len()
    }

    /// Compiles a description that refers to no scope definitions.
    pub fn compile(
        &self,
        description: &SchemaDescription,
    ) -> Result<CompiledValidator, SchemaError> {
        let root = Lowering::new(self, None).lower(description, &ValuePath::root())?;
        tracing::debug!(root = root_kind(&root), "compiled schema");
        Ok(CompiledValidator::new(Arc::new(root), None, self.options.max_depth))
    }

    /// Compiles every scope definition with all of `names` in view.
    pub(crate) fn compile_definitions(
        &self,
        definitions: &IndexMap<String, SchemaDescription>,
    ) -> Result<Definitions, SchemaError> {
        let lowering = Lowering::new(self, Some(definitions));
        let mut compiled = Definitions::new();
        for (name, description) in definitions {
            let path = ValuePath::root().push_key(name.as_str());
            let node = lowering.lower(description, &path)?;
            tracing::debug!(definition = %name, root = root_kind(&node), "compiled definition");
            compiled.insert(name.clone(), Arc::new(node));
        }
        if let Some(cycle) = unguarded_cycle(&compiled) {
            return Err(SchemaError::UnguardedCycle { cycle });
        }
        Ok(compiled)
    }

    fn parse_cached(&self, expression: &str) -> Result<ConstraintNode, GrammarError> {
        if let Some(node) = self.cache.read().get(expression) {
            tracing::debug!(expression, "parse cache hit");
            return Ok(node.clone());
        }

        tracing::debug!(expression, "parse cache miss");
        let node = parse(expression)?;
        self.cache
            .write()
            .insert(expression.to_string(), node.clone());
        Ok(node)
    }
}

fn root_kind(node: &CompiledNode) -> &'static str {
    match node {
        CompiledNode::Leaf(_) => "leaf",
        CompiledNode::Object(_) => "object",
        CompiledNode::Array(_) => "array",
        CompiledNode::Tuple(_) => "tuple",
    }
}

/// Finds definitions that reach themselves without consuming any input,
/// returned as the chain of names ending where it started.
fn unguarded_cycle(definitions: &Definitions) -> Option<Vec<String>> {
    let mut finished = HashSet::new();
    let mut stack = Vec::new();
    definitions
        .keys()
        .find_map(|name| visit_heads(name, definitions, &mut finished, &mut stack))
}

fn visit_heads<'a>(
    name: &'a str,
    definitions: &'a Definitions,
    finished: &mut HashSet<&'a str>,
    stack: &mut Vec<&'a str>,
) -> Option<Vec<String>> {
    if finished.contains(name) {
        return None;
    }
    if let Some(start) = stack.iter().position(|open| *open == name) {
        let mut cycle: Vec<String> = stack[start..].iter().map(|n| n.to_string()).collect();
        cycle.push(name.to_string());
        return Some(cycle);
    }

    stack.push(name);
    let heads = definitions
        .get(name)
        .map(|node| node.head_references())
        .unwrap_or_default();
    for next in heads {
        if let Some(cycle) = visit_heads(next, definitions, finished, stack) {
            return Some(cycle);
        }
    }
    stack.pop();
    finished.insert(name);
    None
}

/// Compiles one description against a fixed set of scope names.
struct Lowering<'a> {
    compiler: &'a Compiler,
    scope: Option<&'a IndexMap<String, SchemaDescription>>,
}

impl<'a> Lowering<'a> {
    fn new(compiler: &'a Compiler, scope: Option<&'a IndexMap<String, SchemaDescription>>) -> Self {
        Self { compiler, scope }
    }

    fn is_defined(&self, name: &str) -> bool {
        self.scope.is_some_and(|scope| scope.contains_key(name))
    }

    fn lower(
        &self,
        description: &SchemaDescription,
        path: &ValuePath,
    ) -> Result<CompiledNode, SchemaError> {
        match description {
            SchemaDescription::Expression(expression) => {
                let node = match self.scope {
                    None => self.compiler.parse_cached(expression),
                    Some(_) => parse_with_aliases(expression, |name| self.is_defined(name)),
                }
                .map_err(|e| SchemaError::grammar(path, e))?;
                Ok(CompiledNode::Leaf(LeafValidator::new(node)))
            }
            SchemaDescription::Node(node) => {
                node.check().map_err(|e| SchemaError::grammar(path, e))?;
                if let Some(unknown) = node.references().into_iter().find(|n| !self.is_defined(n)) {
                    return Err(SchemaError::grammar(
                        path,
                        GrammarError::UnknownType {
                            name: unknown.to_string(),
                            offset: 0,
                        },
                    ));
                }
                Ok(CompiledNode::Leaf(LeafValidator::new(node.clone())))
            }
            SchemaDescription::Object(object) => self.lower_object(object, path),
            SchemaDescription::Array(item) => {
                let item = self.lower_element(item, path)?;
                Ok(CompiledNode::Array(Box::new(item)))
            }
            SchemaDescription::Tuple(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| self.lower_element(item, &path.push_index(i)))
                .collect::<Result<Vec<_>, _>>()
                .map(CompiledNode::Tuple),
            SchemaDescription::Compiled(validator) => {
                if validator.has_definitions() {
                    return Err(SchemaError::ForeignScope { path: path.clone() });
                }
                Ok(validator.node().clone())
            }
        }
    }

    fn lower_element(
        &self,
        description: &SchemaDescription,
        path: &ValuePath,
    ) -> Result<CompiledNode, SchemaError> {
        let node = self.lower(description, path)?;
        if node.is_optional() {
            return Err(SchemaError::MisplacedOptional { path: path.clone() });
        }
        Ok(node)
    }

    fn lower_object(
        &self,
        object: &ObjectSchema,
        path: &ValuePath,
    ) -> Result<CompiledNode, SchemaError> {
        let mut fields = IndexMap::with_capacity(object.fields().len());

        for field in object.fields() {
            let field_path = path.push_key(field.name());
            let (node, marked) = self.lower(field.description(), &field_path)?.split_optional();
            match fields.entry(field.name().to_string()) {
                Entry::Occupied(_) => {
                    return Err(SchemaError::DuplicateField {
                        path: path.clone(),
                        name: field.name().to_string(),
                    })
                }
                Entry::Vacant(slot) => {
                    slot.insert(FieldValidator {
                        node,
                        optional: field.is_optional() || marked,
                    });
                }
            }
        }

        let extra_fields = object
            .extra_fields_override()
            .unwrap_or(self.compiler.options.extra_fields);
        tracing::debug!(path = %path, fields = fields.len(), ?extra_fields, "compiled object");

        Ok(CompiledNode::Object(ObjectValidator {
            fields,
            extra_fields,
        }))
    }
}

/// Compiles `description` with default options.
///
/// # Example
///
/// ```rust
/// use inquest::compile;
/// use serde_json::json;
///
/// let status = compile(&"'pending' | 'active' | 'inactive'".into()).unwrap();
/// assert!(status.allows(&json!("active")));
/// assert!(!status.allows(&json!("completed")));
/// ```
pub fn compile(description: &SchemaDescription) -> Result<CompiledValidator, SchemaError> {
    Compiler::default().compile(description)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use serde_json::json;

    #[test]
    fn test_grammar_errors_carry_field_path() {
        let err = compile(&SchemaDescription::from([("age", "10 < number < 5")])).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::Grammar { ref path, source: GrammarError::InvalidRange { .. } }
                if path.to_string() == "age"
        ));
    }

    #[test]
    fn test_duplicate_field() {
        let schema = Schema::object().field("a", "string").optional("a", "number");
        let err = compile(&schema.into()).unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateField {
                path: ValuePath::root(),
                name: "a".to_string(),
            }
        );
    }

    #[test]
    fn test_optional_marker_becomes_field_flag() {
        let validator = compile(&SchemaDescription::from([("bio", "string?")])).unwrap();
        let CompiledNode::Object(object) = validator.node() else {
            panic!("expected object");
        };
        let bio = object.field("bio").unwrap();
        assert!(bio.is_optional());
        assert!(!bio.node().is_optional());
    }

    #[test]
    fn test_optional_inside_array_is_rejected() {
        let err = compile(&Schema::array("string?")).unwrap_err();
        assert!(matches!(err, SchemaError::MisplacedOptional { .. }));

        let err = compile(&Schema::tuple(["string", "number?"])).unwrap_err();
        assert_eq!(
            err,
            SchemaError::MisplacedOptional {
                path: ValuePath::root().push_index(1),
            }
        );
    }

    #[test]
    fn test_unknown_reference_in_node() {
        let err = compile(&Schema::reference("User").into()).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::Grammar {
                source: GrammarError::UnknownType { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_node_fails_compile() {
        let err = compile(&Schema::number().gt(5.0).lt(1.0).into()).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::Grammar {
                source: GrammarError::InvalidRange { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_parse_cache_reuses_expressions() {
        let compiler = Compiler::default();
        let description = SchemaDescription::from([
            ("a", "string.email"),
            ("b", "string.email"),
            ("c", "number"),
        ]);
        compiler.compile(&description).unwrap();
        compiler.compile(&description).unwrap();
        assert_eq!(compiler.cached_expressions(), 2);
    }

    #[test]
    fn test_embedded_compiled_schema() {
        let address = compile(&SchemaDescription::from([("city", "string")])).unwrap();
        let user = compile(&Schema::object().field("address", &address).into()).unwrap();
        assert!(user.allows(&json!({ "address": { "city": "Oslo" } })));
        assert!(!user.allows(&json!({ "address": {} })));
    }

    #[test]
    fn test_definitions_must_nest_before_recursing() {
        let definitions: IndexMap<String, SchemaDescription> = [
            ("Tree", SchemaDescription::from("Tree[] | number")),
            ("Loop", SchemaDescription::from("string | Again")),
            ("Again", SchemaDescription::from("Loop | null")),
        ]
        .into_iter()
        .map(|(name, description)| (name.to_string(), description))
        .collect();

        let err = Compiler::default().compile_definitions(&definitions).unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnguardedCycle {
                cycle: vec!["Loop".to_string(), "Again".to_string(), "Loop".to_string()],
            }
        );
    }

    #[test]
    fn test_options_default() {
        let options = CompileOptions::default();
        assert_eq!(options.extra_fields, ExtraFields::Allow);
        assert_eq!(options.max_depth, 100);
    }
}
