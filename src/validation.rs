//! Validation context for scope reference resolution.
//!
//! [`ValidationContext`] carries the definitions a validator may refer to by
//! name, plus the current reference depth. Following a reference increments
//! the depth; once it would pass the limit the reference fails instead of
//! recursing further.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::validator::CompiledNode;

/// Compiled scope definitions, in definition order.
pub(crate) type Definitions = IndexMap<String, Arc<CompiledNode>>;

/// Depth and definitions threaded through one validation call.
#[derive(Clone)]
pub(crate) struct ValidationContext {
    definitions: Option<Arc<Definitions>>,
    depth: usize,
    max_depth: usize,
}

/// Outcome of following a reference.
pub(crate) enum Resolution<'a> {
    /// The definition, and the context to validate it in.
    Found(&'a CompiledNode, ValidationContext),
    /// Following the reference would pass the depth limit.
    TooDeep,
    /// No definition with that name is in view.
    Unknown,
}

impl ValidationContext {
    pub(crate) fn new(definitions: Option<Arc<Definitions>>, max_depth: usize) -> Self {
        Self {
            definitions,
            depth: 0,
            max_depth,
        }
    }

    /// Returns a context one reference deeper.
    fn increment_depth(&self) -> Self {
        Self {
            definitions: self.definitions.clone(),
            depth: self.depth + 1,
            max_depth: self.max_depth,
        }
    }

    pub(crate) fn depth(&self) -> usize {
        self.depth
    }

    pub(crate) fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Looks `name` up and steps one level deeper.
    pub(crate) fn resolve(&self, name: &str) -> Resolution<'_> {
        let Some(node) = self.definitions.as_ref().and_then(|defs| defs.get(name)) else {
            return Resolution::Unknown;
        };
        if self.depth >= self.max_depth {
            return Resolution::TooDeep;
        }
        Resolution::Found(&**node, self.increment_depth())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{ConstraintNode, PrimitiveKind};
    use crate::validator::LeafValidator;

    fn definitions() -> Arc<Definitions> {
        let mut defs = Definitions::new();
        defs.insert(
            "Name".to_string(),
            Arc::new(CompiledNode::Leaf(LeafValidator::new(
                ConstraintNode::Primitive(PrimitiveKind::String),
            ))),
        );
        Arc::new(defs)
    }

    #[test]
    fn test_resolve_increments_depth() {
        let ctx = ValidationContext::new(Some(definitions()), 3);
        match ctx.resolve("Name") {
            Resolution::Found(_, next) => {
                assert_eq!(next.depth(), 1);
                assert_eq!(next.max_depth(), 3);
            }
            _ => panic!("expected definition"),
        }
    }

    #[test]
    fn test_resolve_stops_at_max_depth() {
        let mut ctx = ValidationContext::new(Some(definitions()), 2);
        for _ in 0..2 {
            let next = match ctx.resolve("Name") {
                Resolution::Found(_, next) => next,
                _ => panic!("expected definition"),
            };
            ctx = next;
        }
        assert!(matches!(ctx.resolve("Name"), Resolution::TooDeep));
    }

    #[test]
    fn test_unknown_name() {
        let ctx = ValidationContext::new(None, 10);
        assert!(matches!(ctx.resolve("Name"), Resolution::Unknown));
    }
}
