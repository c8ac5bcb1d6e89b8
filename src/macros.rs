/// Builds a [`SchemaDescription`](crate::SchemaDescription) with JSON-like syntax.
///
/// Objects are `{ "key": value, ... }` (a key ending in `?` is optional),
/// `[a, b]` is a tuple, and a string literal is a constraint expression.
/// Any other expression goes in parentheses and is converted with `From`.
///
/// # Example
///
/// ```rust
/// use inquest::{compile, schema, Schema};
/// use serde_json::json;
///
/// let description = schema!({
///     "name": (Schema::string().min_len(1)),
///     "age": "17 < number.integer <= 120",
///     "bio?": "string",
///     "address": { "city": "string", "zip": "string.digits" },
///     "location": ["number", "number"]
/// });
///
/// let validator = compile(&description).unwrap();
/// assert!(validator.allows(&json!({
///     "name": "Ada",
///     "age": 36,
///     "address": { "city": "London", "zip": "12345" },
///     "location": [51.5, -0.1]
/// })));
/// ```
#[macro_export]
macro_rules! schema {
    (@value { $($inner:tt)* }) => {
        $crate::schema!({ $($inner)* })
    };
    (@value [ $($inner:tt)* ]) => {
        $crate::schema!([ $($inner)* ])
    };
    (@value $other:tt) => {
        $crate::SchemaDescription::from($other)
    };
    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let pairs: ::std::vec::Vec<(&'static str, $crate::SchemaDescription)> =
            ::std::vec![$(($key, $crate::schema!(@value $value))),*];
        $crate::SchemaDescription::from_pairs(pairs)
    }};
    ([ $($item:tt),* $(,)? ]) => {{
        let items: ::std::vec::Vec<$crate::SchemaDescription> =
            ::std::vec![$($crate::schema!(@value $item)),*];
        $crate::SchemaDescription::Tuple(items)
    }};
    ($other:expr) => {
        $crate::SchemaDescription::from($other)
    };
}
