//! Type projection.
//!
//! Every compiled validator has a [`Shape`]: the static type its valid values
//! conform to, with refinements such as ranges and formats dropped. Rust types
//! declare their own shape through [`Projected`], so a test can assert that a
//! struct and the schema guarding it agree:
//!
//! ```rust
//! use inquest::{compile, Projected, SchemaDescription, Shape, ShapeField};
//!
//! struct User {
//!     name: String,
//!     bio: Option<String>,
//! }
//!
//! impl Projected for User {
//!     fn shape() -> Shape {
//!         Shape::Object(vec![
//!             ShapeField::required("name", String::shape()),
//!             ShapeField::optional("bio", Option::<String>::shape()),
//!         ])
//!     }
//! }
//!
//! let schema = compile(&SchemaDescription::from([
//!     ("name", "string >= 1"),
//!     ("bio?", "string"),
//! ])).unwrap();
//!
//! assert_eq!(schema.shape().to_string(), "{ name: string; bio?: string }");
//! assert!(schema.projects_to::<User>());
//! ```

use std::fmt::{self, Display};

use serde_json::Value;

use crate::grammar::{ConstraintNode, Literal, PrimitiveKind};
use crate::validator::{CompiledNode, CompiledValidator};

/// A static type, rendered TypeScript-style.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Any JSON value.
    Unknown,
    String,
    Number,
    /// A number without a fractional part. Renders as `number`.
    Integer,
    Boolean,
    Null,
    /// Exactly one value.
    Literal(Literal),
    /// Any one of the alternatives.
    Union(Vec<Shape>),
    Array(Box<Shape>),
    Tuple(Vec<Shape>),
    /// Fields in declaration order.
    Object(Vec<ShapeField>),
    /// A scope definition, by name.
    Named(String),
}

/// One field of an object shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeField {
    pub name: String,
    pub shape: Shape,
    /// The key may be absent.
    pub optional: bool,
}

impl ShapeField {
    pub fn required(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            shape,
            optional: false,
        }
    }

    pub fn optional(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            shape,
            optional: true,
        }
    }
}

impl Shape {
    /// Derives the shape of a compiled validator.
    pub(crate) fn of(validator: &CompiledValidator) -> Shape {
        of_node(validator.node())
    }

    /// A union of `alternatives`, flattened and without duplicates.
    pub fn union<I>(alternatives: I) -> Shape
    where
        I: IntoIterator<Item = Shape>,
    {
        let mut flat: Vec<Shape> = Vec::new();
        for alternative in alternatives {
            let branches = match alternative {
                Shape::Union(inner) => inner,
                other => vec![other],
            };
            for branch in branches {
                if !flat.contains(&branch) {
                    flat.push(branch);
                }
            }
        }
        if flat.len() == 1 {
            return flat.remove(0);
        }
        Shape::Union(flat)
    }

    /// Returns true if every value of `other` is also a value of `self`.
    pub fn accepts(&self, other: &Shape) -> bool {
        match (self, other) {
            (Shape::Unknown, _) => true,
            (_, Shape::Union(alternatives)) => alternatives.iter().all(|a| self.accepts(a)),
            (Shape::Union(alternatives), _) => alternatives.iter().any(|a| a.accepts(other)),
            (Shape::Named(a), Shape::Named(b)) => a == b,
            (Shape::String, Shape::String)
            | (Shape::Number, Shape::Number | Shape::Integer)
            | (Shape::Integer, Shape::Integer)
            | (Shape::Boolean, Shape::Boolean)
            | (Shape::Null, Shape::Null) => true,
            (Shape::Literal(a), Shape::Literal(b)) => a == b,
            (Shape::String, Shape::Literal(Literal::String(_)))
            | (Shape::Number, Shape::Literal(Literal::Number(_)))
            | (Shape::Boolean, Shape::Literal(Literal::Boolean(_))) => true,
            (Shape::Integer, Shape::Literal(Literal::Number(n))) => n.fract() == 0.0,
            (Shape::Array(item), Shape::Array(theirs)) => item.accepts(theirs),
            (Shape::Array(item), Shape::Tuple(theirs)) => theirs.iter().all(|t| item.accepts(t)),
            (Shape::Tuple(mine), Shape::Tuple(theirs)) => {
                mine.len() == theirs.len() && mine.iter().zip(theirs).all(|(m, t)| m.accepts(t))
            }
            (Shape::Object(mine), Shape::Object(theirs)) => mine.iter().all(|field| {
                match theirs.iter().find(|t| t.name == field.name) {
                    Some(t) => field.shape.accepts(&t.shape) && (field.optional || !t.optional),
                    None => field.optional,
                }
            }),
            _ => false,
        }
    }

    fn needs_group(&self) -> bool {
        matches!(self, Shape::Union(_))
    }
}

fn of_node(node: &CompiledNode) -> Shape {
    match node {
        CompiledNode::Leaf(leaf) => of_constraint(leaf.node()),
        CompiledNode::Object(object) => Shape::Object(
            object
                .fields()
                .map(|(name, field)| ShapeField {
                    name: name.to_string(),
                    shape: of_node(field.node()),
                    optional: field.is_optional(),
                })
                .collect(),
        ),
        CompiledNode::Array(item) => Shape::Array(Box::new(of_node(item))),
        CompiledNode::Tuple(items) => Shape::Tuple(items.iter().map(of_node).collect()),
    }
}

fn of_constraint(node: &ConstraintNode) -> Shape {
    match node {
        ConstraintNode::Primitive(kind) | ConstraintNode::Range { kind, .. } => of_kind(*kind),
        ConstraintNode::StringFormat(_) => Shape::String,
        ConstraintNode::Literal(Literal::Null) => Shape::Null,
        ConstraintNode::Literal(literal) => Shape::Literal(literal.clone()),
        ConstraintNode::Union(alternatives) => Shape::union(alternatives.iter().map(of_constraint)),
        ConstraintNode::ArrayOf(inner) => Shape::Array(Box::new(of_constraint(inner))),
        ConstraintNode::Tuple(items) => Shape::Tuple(items.iter().map(of_constraint).collect()),
        ConstraintNode::Optional(inner) => of_constraint(inner),
        ConstraintNode::Reference(name) => Shape::Named(name.clone()),
    }
}

fn of_kind(kind: PrimitiveKind) -> Shape {
    match kind {
        PrimitiveKind::String => Shape::String,
        PrimitiveKind::Number => Shape::Number,
        PrimitiveKind::Integer => Shape::Integer,
        PrimitiveKind::Boolean => Shape::Boolean,
    }
}

impl Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Unknown => f.write_str("unknown"),
            Shape::String => f.write_str("string"),
            Shape::Number | Shape::Integer => f.write_str("number"),
            Shape::Boolean => f.write_str("boolean"),
            Shape::Null => f.write_str("null"),
            Shape::Literal(literal) => write!(f, "{}", literal),
            Shape::Union(alternatives) => write_joined(f, alternatives, " | "),
            Shape::Array(item) if item.needs_group() => write!(f, "({})[]", item),
            Shape::Array(item) => write!(f, "{}[]", item),
            Shape::Tuple(items) => {
                f.write_str("[")?;
                write_joined(f, items, ", ")?;
                f.write_str("]")
            }
            Shape::Object(fields) if fields.is_empty() => f.write_str("{}"),
            Shape::Object(fields) => {
                f.write_str("{ ")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    let marker = if field.optional { "?" } else { "" };
                    write!(f, "{}{}: {}", field.name, marker, field.shape)?;
                }
                f.write_str(" }")
            }
            Shape::Named(name) => f.write_str(name),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, shapes: &[Shape], separator: &str) -> fmt::Result {
    for (i, shape) in shapes.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{}", shape)?;
    }
    Ok(())
}

/// A Rust type with a known [`Shape`].
pub trait Projected {
    fn shape() -> Shape;
}

impl Projected for String {
    fn shape() -> Shape {
        Shape::String
    }
}

impl Projected for &str {
    fn shape() -> Shape {
        Shape::String
    }
}

impl Projected for bool {
    fn shape() -> Shape {
        Shape::Boolean
    }
}

impl Projected for Value {
    fn shape() -> Shape {
        Shape::Unknown
    }
}

macro_rules! projected_as {
    ($shape:expr => $($ty:ty),+) => {
        $(
            impl Projected for $ty {
                fn shape() -> Shape {
                    $shape
                }
            }
        )+
    };
}

projected_as!(Shape::Number => f32, f64);
projected_as!(Shape::Integer => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl<T: Projected> Projected for Vec<T> {
    fn shape() -> Shape {
        Shape::Array(Box::new(T::shape()))
    }
}

impl<T: Projected> Projected for Option<T> {
    fn shape() -> Shape {
        Shape::union([T::shape(), Shape::Null])
    }
}

impl<T: Projected> Projected for Box<T> {
    fn shape() -> Shape {
        T::shape()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile;

    fn shape_of(expression: &str) -> Shape {
        compile(&expression.into()).unwrap().shape()
    }

    #[test]
    fn test_refinements_project_to_base_types() {
        assert_eq!(shape_of("17 < number.integer <= 120"), Shape::Integer);
        assert_eq!(shape_of("string >= 1"), Shape::String);
        assert_eq!(shape_of("string.email"), Shape::String);
    }

    #[test]
    fn test_display() {
        assert_eq!(shape_of("'a' | 'b'").to_string(), "'a' | 'b'");
        assert_eq!(shape_of("(string | null)[]").to_string(), "(string | null)[]");
        assert_eq!(shape_of("[string, number.integer]").to_string(), "[string, number]");
    }

    #[test]
    fn test_primitive_acceptance() {
        assert!(Shape::Number.accepts(&Shape::Integer));
        assert!(!Shape::Integer.accepts(&Shape::Number));
        assert!(Shape::String.accepts(&Shape::Literal(Literal::from("a"))));
        assert!(Shape::Integer.accepts(&Shape::Literal(Literal::Number(3.0))));
        assert!(!Shape::Integer.accepts(&Shape::Literal(Literal::Number(3.5))));
        assert!(Shape::Unknown.accepts(&Shape::Object(vec![])));
    }

    #[test]
    fn test_union_acceptance() {
        let string_or_null = Option::<String>::shape();
        assert!(string_or_null.accepts(&Shape::String));
        assert!(string_or_null.accepts(&Shape::Null));
        assert!(!Shape::String.accepts(&string_or_null));
    }

    #[test]
    fn test_option_of_option_flattens() {
        assert_eq!(
            Option::<Option<bool>>::shape(),
            Shape::Union(vec![Shape::Boolean, Shape::Null])
        );
    }

    #[test]
    fn test_object_field_optionality() {
        let rust = Shape::Object(vec![
            ShapeField::required("name", Shape::String),
            ShapeField::optional("bio", Option::<String>::shape()),
        ]);
        let required_bio = Shape::Object(vec![
            ShapeField::required("name", Shape::String),
            ShapeField::required("bio", Shape::String),
        ]);
        let optional_name = Shape::Object(vec![ShapeField::optional("name", Shape::String)]);

        assert!(rust.accepts(&required_bio));
        assert!(!rust.accepts(&optional_name));
    }
}
