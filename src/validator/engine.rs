//! Evaluation of a compiled tree.
//!
//! `allows` walks the tree with precompiled predicates and stops at the first
//! failure. `check` walks it in full, accumulating every violation with its
//! path, and rebuilds the normalized value on the way back up.

use serde_json::{Map, Value};
use stillwater::Validation;

use crate::error::{render_value, Report, RuleKind, Violation};
use crate::grammar::{ConstraintNode, PrimitiveKind};
use crate::path::ValuePath;
use crate::schema::ExtraFields;
use crate::validation::{Resolution, ValidationContext};

use super::node::{tuple_expected, CompiledNode, LeafValidator, ObjectValidator};

type Checked = Validation<Value, Report>;

fn fail(violation: Violation) -> Checked {
    Validation::Failure(Report::single(violation))
}

fn finish(value: Value, errors: Vec<Violation>) -> Checked {
    match Report::from_vec(errors) {
        None => Validation::Success(value),
        Some(report) => Validation::Failure(report),
    }
}

fn collect(result: Checked, errors: &mut Vec<Violation>) -> Option<Value> {
    match result {
        Validation::Success(value) => Some(value),
        Validation::Failure(report) => {
            errors.extend(report);
            None
        }
    }
}

impl CompiledNode {
    pub(crate) fn allows(&self, value: &Value, ctx: &ValidationContext) -> bool {
        match self {
            CompiledNode::Leaf(leaf) => (leaf.predicate)(value, ctx),
            CompiledNode::Object(object) => object.allows(value, ctx),
            CompiledNode::Array(item) => value
                .as_array()
                .is_some_and(|values| values.iter().all(|x| item.allows(x, ctx))),
            CompiledNode::Tuple(items) => value.as_array().is_some_and(|values| {
                values.len() == items.len()
                    && items.iter().zip(values).all(|(item, x)| item.allows(x, ctx))
            }),
        }
    }

    pub(crate) fn check(
        &self,
        value: &Value,
        path: &ValuePath,
        ctx: &ValidationContext,
    ) -> Checked {
        match self {
            CompiledNode::Leaf(leaf) => leaf.check(value, path, ctx),
            CompiledNode::Object(object) => object.check(value, path, ctx),
            CompiledNode::Array(item) => match value.as_array() {
                Some(values) => check_elements(values, path, |x, p| item.check(x, p, ctx)),
                None => fail(Violation::for_value(
                    path,
                    RuleKind::TypeMismatch,
                    "array",
                    value,
                )),
            },
            CompiledNode::Tuple(items) => match value.as_array() {
                Some(values) if values.len() == items.len() => {
                    check_positions(values, path, |i, x, p| items[i].check(x, p, ctx))
                }
                _ => fail(tuple_mismatch(path, items.len(), value)),
            },
        }
    }
}

impl ObjectValidator {
    fn allows(&self, value: &Value, ctx: &ValidationContext) -> bool {
        let Some(map) = value.as_object() else {
            return false;
        };
        let declared_ok = self.fields.iter().all(|(name, field)| match map.get(name) {
            Some(v) => field.node.allows(v, ctx),
            None => field.optional,
        });
        declared_ok
            && (self.extra_fields != ExtraFields::Reject
                || map.keys().all(|key| self.fields.contains_key(key)))
    }

    fn check(&self, value: &Value, path: &ValuePath, ctx: &ValidationContext) -> Checked {
        let Some(map) = value.as_object() else {
            return fail(Violation::for_value(
                path,
                RuleKind::TypeMismatch,
                "object",
                value,
            ));
        };

        let mut errors = Vec::new();
        let mut validated = Map::new();

        for (name, field) in &self.fields {
            let field_path = path.push_key(name.as_str());
            match map.get(name) {
                Some(field_value) => {
                    let checked = field.node.check(field_value, &field_path, ctx);
                    if let Some(v) = collect(checked, &mut errors) {
                        validated.insert(name.clone(), v);
                    }
                }
                None if field.optional => {}
                None => errors.push(Violation::new(
                    field_path,
                    RuleKind::MissingRequiredField,
                    field.node.expected(),
                    "missing",
                )),
            }
        }

        for (key, extra) in map {
            if self.fields.contains_key(key) {
                continue;
            }
            match self.extra_fields {
                ExtraFields::Allow => {
                    validated.insert(key.clone(), extra.clone());
                }
                ExtraFields::Strip => {}
                ExtraFields::Reject => errors.push(Violation::for_value(
                    &path.push_key(key.as_str()),
                    RuleKind::ExtraField,
                    "absent (undeclared key)",
                    extra,
                )),
            }
        }

        if !errors.is_empty() {
            return finish(Value::Null, errors);
        }

        // Normalized output keeps the input's key order.
        let mut normalized = Map::new();
        for key in map.keys() {
            if let Some(v) = validated.remove(key) {
                normalized.insert(key.clone(), v);
            }
        }
        Validation::Success(Value::Object(normalized))
    }
}

impl LeafValidator {
    fn check(&self, value: &Value, path: &ValuePath, ctx: &ValidationContext) -> Checked {
        match &self.node {
            ConstraintNode::ArrayOf(_) => match (value.as_array(), self.children.first()) {
                (Some(values), Some(item)) => {
                    check_elements(values, path, |x, p| item.check(x, p, ctx))
                }
                _ => fail(Violation::for_value(
                    path,
                    RuleKind::TypeMismatch,
                    self.node.to_string(),
                    value,
                )),
            },
            ConstraintNode::Tuple(_) => match value.as_array() {
                Some(values) if values.len() == self.children.len() => {
                    check_positions(values, path, |i, x, p| self.children[i].check(x, p, ctx))
                }
                _ => fail(tuple_mismatch(path, self.children.len(), value)),
            },
            ConstraintNode::Optional(_) => match self.children.first() {
                Some(inner) => inner.check(value, path, ctx),
                None => Validation::Success(value.clone()),
            },
            ConstraintNode::Reference(name) => check_reference(name, value, path, ctx),
            node => {
                if (self.predicate)(value, ctx) {
                    Validation::Success(normalize_integer(node, value))
                } else {
                    fail(Violation::for_value(
                        path,
                        scalar_rule(node),
                        node.to_string(),
                        value,
                    ))
                }
            }
        }
    }
}

/// Rewrites an integral float such as `18.0` as `18` when the constraint
/// only admits integers, so typed parsing into integer fields succeeds.
fn normalize_integer(node: &ConstraintNode, value: &Value) -> Value {
    match value.as_f64() {
        Some(n)
            if value.is_f64()
                && (i64::MIN as f64..i64::MAX as f64).contains(&n)
                && integer_only(node) =>
        {
            Value::from(n as i64)
        }
        _ => value.clone(),
    }
}

fn integer_only(node: &ConstraintNode) -> bool {
    match node {
        ConstraintNode::Primitive(PrimitiveKind::Integer)
        | ConstraintNode::Range { kind: PrimitiveKind::Integer, .. } => true,
        ConstraintNode::Union(items) => {
            items.iter().any(integer_only)
                && !items.iter().any(|item| {
                    matches!(
                        item,
                        ConstraintNode::Primitive(PrimitiveKind::Number)
                            | ConstraintNode::Range { kind: PrimitiveKind::Number, .. }
                    )
                })
        }
        _ => false,
    }
}

/// The rule a failed scalar constraint reports.
fn scalar_rule(node: &ConstraintNode) -> RuleKind {
    match node {
        ConstraintNode::Range { .. } => RuleKind::RangeViolation,
        ConstraintNode::StringFormat(_) => RuleKind::FormatViolation,
        ConstraintNode::Literal(_) | ConstraintNode::Union(_) => RuleKind::UnionExhausted,
        _ => RuleKind::TypeMismatch,
    }
}

fn check_reference(
    name: &str,
    value: &Value,
    path: &ValuePath,
    ctx: &ValidationContext,
) -> Checked {
    match ctx.resolve(name) {
        Resolution::Found(node, next) => node.check(value, path, &next),
        Resolution::TooDeep => fail(Violation::new(
            path.clone(),
            RuleKind::DepthExceeded,
            format!("{} within {} nested references", name, ctx.max_depth()),
            format!("reference depth {}", ctx.depth() + 1),
        )),
        Resolution::Unknown => fail(Violation::for_value(
            path,
            RuleKind::TypeMismatch,
            format!("definition '{}'", name),
            value,
        )),
    }
}

fn check_elements<F>(values: &[Value], path: &ValuePath, check: F) -> Checked
where
    F: Fn(&Value, &ValuePath) -> Checked,
{
    check_positions(values, path, |_, x, p| check(x, p))
}

fn check_positions<F>(values: &[Value], path: &ValuePath, check: F) -> Checked
where
    F: Fn(usize, &Value, &ValuePath) -> Checked,
{
    let mut errors = Vec::new();
    let mut validated = Vec::with_capacity(values.len());
    for (i, x) in values.iter().enumerate() {
        if let Some(v) = collect(check(i, x, &path.push_index(i)), &mut errors) {
            validated.push(v);
        }
    }
    finish(Value::Array(validated), errors)
}

fn tuple_mismatch(path: &ValuePath, expected_len: usize, value: &Value) -> Violation {
    let actual = match value.as_array() {
        Some(values) => format!("array of length {}", values.len()),
        None => render_value(value),
    };
    Violation::new(
        path.clone(),
        RuleKind::TypeMismatch,
        tuple_expected(expected_len),
        actual,
    )
}
