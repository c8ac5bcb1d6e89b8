//! The caller-authored schema tree handed to the compiler.

use serde_json::Value;

use crate::error::SchemaError;
use crate::grammar::ConstraintNode;
use crate::path::ValuePath;
use crate::validator::CompiledValidator;

use super::numeric::NumberSchema;
use super::object::ObjectSchema;
use super::string::StringSchema;

/// A schema description: constraint expressions at the leaves, objects,
/// arrays and tuples inside.
///
/// Descriptions are plain values. Build them from strings, builder types,
/// key/value pairs or JSON, then hand them to [`compile`](crate::compile).
///
/// # Example
///
/// ```rust
/// use inquest::{compile, SchemaDescription};
///
/// let description = SchemaDescription::from([
///     ("name", "string >= 1"),
///     ("age", "17 < number.integer <= 120"),
///     ("bio?", "string"),
/// ]);
/// let validator = compile(&description).unwrap();
/// # let _ = validator;
/// ```
#[derive(Debug, Clone)]
pub enum SchemaDescription {
    /// A constraint expression such as `string.email` or `'a' | 'b'`.
    Expression(String),
    /// A constraint built in code.
    Node(ConstraintNode),
    /// A mapping from field names to nested descriptions.
    Object(ObjectSchema),
    /// An array whose elements all match the inner description.
    Array(Box<SchemaDescription>),
    /// A fixed-length array with one description per position.
    Tuple(Vec<SchemaDescription>),
    /// A schema compiled earlier and embedded as-is.
    Compiled(CompiledValidator),
}

impl SchemaDescription {
    /// An array of `item`.
    pub fn array(item: impl Into<SchemaDescription>) -> Self {
        SchemaDescription::Array(Box::new(item.into()))
    }

    /// A tuple of the given positions.
    pub fn tuple<I, D>(items: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<SchemaDescription>,
    {
        SchemaDescription::Tuple(items.into_iter().map(Into::into).collect())
    }

    /// Builds an object description from `(key, description)` pairs.
    ///
    /// A key ending in `?` declares an optional field named without the `?`.
    pub fn from_pairs<I, K, D>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, D)>,
        K: AsRef<str>,
        D: Into<SchemaDescription>,
    {
        let object = pairs
            .into_iter()
            .fold(ObjectSchema::new(), |object, (key, description)| {
                match key.as_ref().strip_suffix('?') {
                    Some(name) => object.optional(name, description),
                    None => object.field(key.as_ref(), description),
                }
            });
        SchemaDescription::Object(object)
    }

    /// Reads a description from JSON.
    ///
    /// Strings are constraint expressions, objects are object descriptions
    /// (keys ending in `?` are optional fields) and arrays are tuples.
    ///
    /// ```rust
    /// use inquest::{compile, SchemaDescription};
    /// use serde_json::json;
    ///
    /// let description = SchemaDescription::from_json(&json!({
    ///     "user": { "email": "string.email", "tags?": "string[]" },
    ///     "point": ["number", "number"]
    /// })).unwrap();
    /// assert!(compile(&description).is_ok());
    /// ```
    pub fn from_json(value: &Value) -> Result<Self, SchemaError> {
        from_json_at(value, &ValuePath::root())
    }
}

fn from_json_at(value: &Value, path: &ValuePath) -> Result<SchemaDescription, SchemaError> {
    match value {
        Value::String(expression) => Ok(SchemaDescription::Expression(expression.clone())),
        Value::Object(map) => {
            let mut object = ObjectSchema::new();
            for (key, child) in map {
                let (name, optional) = match key.strip_suffix('?') {
                    Some(name) => (name, true),
                    None => (key.as_str(), false),
                };
                let description = from_json_at(child, &path.push_key(name))?;
                object = if optional {
                    object.optional(name, description)
                } else {
                    object.field(name, description)
                };
            }
            Ok(SchemaDescription::Object(object))
        }
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| from_json_at(item, &path.push_index(i)))
            .collect::<Result<Vec<_>, _>>()
            .map(SchemaDescription::Tuple),
        other => Err(SchemaError::Unsupported {
            path: path.clone(),
            found: other.to_string(),
        }),
    }
}

impl From<&str> for SchemaDescription {
    fn from(expression: &str) -> Self {
        SchemaDescription::Expression(expression.to_string())
    }
}

impl From<String> for SchemaDescription {
    fn from(expression: String) -> Self {
        SchemaDescription::Expression(expression)
    }
}

impl From<ConstraintNode> for SchemaDescription {
    fn from(node: ConstraintNode) -> Self {
        SchemaDescription::Node(node)
    }
}

impl From<StringSchema> for SchemaDescription {
    fn from(schema: StringSchema) -> Self {
        SchemaDescription::Node(schema.into_node())
    }
}

impl From<NumberSchema> for SchemaDescription {
    fn from(schema: NumberSchema) -> Self {
        SchemaDescription::Node(schema.into_node())
    }
}

impl From<ObjectSchema> for SchemaDescription {
    fn from(schema: ObjectSchema) -> Self {
        SchemaDescription::Object(schema)
    }
}

impl From<CompiledValidator> for SchemaDescription {
    fn from(validator: CompiledValidator) -> Self {
        SchemaDescription::Compiled(validator)
    }
}

impl From<&CompiledValidator> for SchemaDescription {
    fn from(validator: &CompiledValidator) -> Self {
        SchemaDescription::Compiled(validator.clone())
    }
}

impl<K, D, const N: usize> From<[(K, D); N]> for SchemaDescription
where
    K: AsRef<str>,
    D: Into<SchemaDescription>,
{
    fn from(pairs: [(K, D); N]) -> Self {
        SchemaDescription::from_pairs(pairs)
    }
}

impl<K, D> From<Vec<(K, D)>> for SchemaDescription
where
    K: AsRef<str>,
    D: Into<SchemaDescription>,
{
    fn from(pairs: Vec<(K, D)>) -> Self {
        SchemaDescription::from_pairs(pairs)
    }
}
