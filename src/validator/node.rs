//! The compiled validator tree.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::grammar::{Bound, ConstraintNode, PrimitiveKind};
use crate::schema::ExtraFields;
use crate::validation::{Resolution, ValidationContext};

/// A compiled boolean check over one value.
pub(crate) type Predicate = Arc<dyn Fn(&Value, &ValidationContext) -> bool + Send + Sync>;

fn predicate<F>(check: F) -> Predicate
where
    F: Fn(&Value, &ValidationContext) -> bool + Send + Sync + 'static,
{
    Arc::new(check)
}

/// One node of a compiled validator.
#[derive(Clone, Debug)]
pub enum CompiledNode {
    /// A constraint expression with its precompiled check.
    Leaf(LeafValidator),
    /// Declared fields plus the extra-field policy.
    Object(ObjectValidator),
    /// Every element must match the inner node.
    Array(Box<CompiledNode>),
    /// One node per position; the length must match.
    Tuple(Vec<CompiledNode>),
}

impl CompiledNode {
    /// Short human-readable summary of what this node accepts.
    pub(crate) fn expected(&self) -> String {
        match self {
            CompiledNode::Leaf(leaf) => leaf.node.to_string(),
            CompiledNode::Object(_) => "object".to_string(),
            CompiledNode::Array(_) => "array".to_string(),
            CompiledNode::Tuple(items) => tuple_expected(items.len()),
        }
    }

    /// Scope names this node may resolve without descending into the input.
    pub(crate) fn head_references(&self) -> Vec<&str> {
        match self {
            CompiledNode::Leaf(leaf) => leaf.node.head_references(),
            _ => Vec::new(),
        }
    }

    /// Whether this node is a leaf carrying an `Optional` marker.
    pub(crate) fn is_optional(&self) -> bool {
        matches!(self, CompiledNode::Leaf(leaf) if leaf.node.is_optional())
    }

    /// Moves an `Optional` marker off a leaf, reporting whether there was one.
    pub(crate) fn split_optional(self) -> (CompiledNode, bool) {
        match self {
            CompiledNode::Leaf(leaf) if leaf.node.is_optional() => {
                let (inner, _) = leaf.node.split_optional();
                (CompiledNode::Leaf(LeafValidator::new(inner)), true)
            }
            other => (other, false),
        }
    }
}

pub(crate) fn tuple_expected(len: usize) -> String {
    format!("tuple of length {}", len)
}

/// A leaf: one constraint node and the predicate compiled from it.
///
/// Composite constraints (`T[]`, tuples, unions, `T?`) keep a compiled child
/// per sub-node so diagnostics can descend without recompiling.
#[derive(Clone)]
pub struct LeafValidator {
    pub(crate) node: ConstraintNode,
    pub(crate) predicate: Predicate,
    pub(crate) children: Vec<LeafValidator>,
}

impl LeafValidator {
    pub(crate) fn new(node: ConstraintNode) -> Self {
        let (children, predicate) = match &node {
            ConstraintNode::Primitive(kind) => {
                let kind = *kind;
                (Vec::new(), predicate(move |v, _| kind.admits(v)))
            }
            ConstraintNode::Range { kind, min, max } => {
                let (kind, min, max) = (*kind, *min, *max);
                (Vec::new(), predicate(move |v, _| in_range(kind, min, max, v)))
            }
            ConstraintNode::StringFormat(format) => {
                let format = *format;
                (
                    Vec::new(),
                    predicate(move |v, _| v.as_str().is_some_and(|s| format.matches(s))),
                )
            }
            ConstraintNode::Literal(literal) => {
                let literal = literal.clone();
                (Vec::new(), predicate(move |v, _| literal.admits(v)))
            }
            ConstraintNode::Union(alternatives) => {
                let children: Vec<LeafValidator> =
                    alternatives.iter().cloned().map(LeafValidator::new).collect();
                let checks: Vec<Predicate> = children.iter().map(|c| c.predicate.clone()).collect();
                (
                    children,
                    predicate(move |v, ctx| checks.iter().any(|check| check(v, ctx))),
                )
            }
            ConstraintNode::ArrayOf(inner) => {
                let item = LeafValidator::new((**inner).clone());
                let check = item.predicate.clone();
                (
                    vec![item],
                    predicate(move |v, ctx| {
                        v.as_array()
                            .is_some_and(|items| items.iter().all(|x| check(x, ctx)))
                    }),
                )
            }
            ConstraintNode::Tuple(items) => {
                let children: Vec<LeafValidator> =
                    items.iter().cloned().map(LeafValidator::new).collect();
                let checks: Vec<Predicate> = children.iter().map(|c| c.predicate.clone()).collect();
                (
                    children,
                    predicate(move |v, ctx| {
                        v.as_array().is_some_and(|values| {
                            values.len() == checks.len()
                                && checks.iter().zip(values).all(|(check, x)| check(x, ctx))
                        })
                    }),
                )
            }
            ConstraintNode::Optional(inner) => {
                let inner = LeafValidator::new((**inner).clone());
                let check = inner.predicate.clone();
                (vec![inner], check)
            }
            ConstraintNode::Reference(name) => {
                let name = name.clone();
                (
                    Vec::new(),
                    predicate(move |v, ctx| match ctx.resolve(&name) {
                        Resolution::Found(node, next) => node.allows(v, &next),
                        Resolution::TooDeep | Resolution::Unknown => false,
                    }),
                )
            }
        };

        Self {
            node,
            predicate,
            children,
        }
    }

    /// The constraint this leaf checks.
    pub fn node(&self) -> &ConstraintNode {
        &self.node
    }
}

impl fmt::Debug for LeafValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LeafValidator")
            .field(&self.node.to_string())
            .finish()
    }
}

fn in_range(kind: PrimitiveKind, min: Option<Bound>, max: Option<Bound>, value: &Value) -> bool {
    kind.measure(value).is_some_and(|measured| {
        min.map_or(true, |b| b.admits_above(measured))
            && max.map_or(true, |b| b.admits_below(measured))
    })
}

/// A compiled object: fields in declaration order and the resolved policy
/// for undeclared keys.
#[derive(Clone, Debug)]
pub struct ObjectValidator {
    pub(crate) fields: IndexMap<String, FieldValidator>,
    pub(crate) extra_fields: ExtraFields,
}

impl ObjectValidator {
    /// Declared fields, in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValidator)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }

    /// Looks up a declared field.
    pub fn field(&self, name: &str) -> Option<&FieldValidator> {
        self.fields.get(name)
    }

    /// The policy applied to undeclared keys.
    pub fn extra_fields(&self) -> ExtraFields {
        self.extra_fields
    }
}

/// A declared object field.
#[derive(Clone, Debug)]
pub struct FieldValidator {
    pub(crate) node: CompiledNode,
    pub(crate) optional: bool,
}

impl FieldValidator {
    pub fn node(&self) -> &CompiledNode {
        &self.node
    }

    /// Whether the key may be absent.
    pub fn is_optional(&self) -> bool {
        self.optional
    }
}
