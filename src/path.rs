//! Locations of values inside nested input.
//!
//! This module provides [`ValuePath`] and [`PathSegment`], used by violations to
//! point at the offending value (`users.0.email`).

use std::fmt::{self, Display};

/// A segment of a value path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// An object key (e.g. `user`, `email`)
    Key(String),
    /// An array position (e.g. `0`, `42`)
    Index(usize),
}

impl PathSegment {
    /// Creates a new key segment.
    pub fn key(name: impl Into<String>) -> Self {
        PathSegment::Key(name.into())
    }

    /// Creates a new index segment.
    pub fn index(idx: usize) -> Self {
        PathSegment::Index(idx)
    }
}

impl Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(name) => f.write_str(name),
            PathSegment::Index(idx) => write!(f, "{}", idx),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(name: &str) -> Self {
        PathSegment::Key(name.to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(idx: usize) -> Self {
        PathSegment::Index(idx)
    }
}

/// A path from the root of an input value to one of its descendants.
///
/// Paths are built incrementally while the engine descends; every push returns
/// a new path and leaves the original untouched. The display form joins
/// segments with dots, indices included.
///
/// # Example
///
/// ```rust
/// use inquest::ValuePath;
///
/// let path = ValuePath::root()
///     .push_key("users")
///     .push_index(0)
///     .push_key("email");
///
/// assert_eq!(path.to_string(), "users.0.email");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ValuePath {
    segments: Vec<PathSegment>,
}

impl ValuePath {
    /// Creates an empty path representing the root value.
    pub fn root() -> Self {
        Self::default()
    }

    /// Builds a path from a sequence of segments.
    ///
    /// ```rust
    /// use inquest::{PathSegment, ValuePath};
    ///
    /// let path = ValuePath::from_segments([PathSegment::key("tags"), PathSegment::index(2)]);
    /// assert_eq!(path.to_string(), "tags.2");
    /// ```
    pub fn from_segments<I>(segments: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<PathSegment>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns a new path with a key segment appended.
    pub fn push_key(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Key(name.into()));
        Self { segments }
    }

    /// Returns a new path with an index segment appended.
    pub fn push_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    /// Returns true if this is the root path (no segments).
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the number of segments in this path.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if this path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns an iterator over the path segments.
    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.segments.iter()
    }

    /// Returns the parent path, or None if this is root.
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.segments.split_last()?;
        Some(Self {
            segments: rest.to_vec(),
        })
    }

    /// Returns the last segment, or None if this is root.
    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }
}

impl Display for ValuePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_path_is_empty() {
        let path = ValuePath::root();
        assert!(path.is_root());
        assert!(path.is_empty());
        assert_eq!(path.len(), 0);
        assert_eq!(path.to_string(), "");
    }

    #[test]
    fn test_keys_and_indices_join_with_dots() {
        let path = ValuePath::root()
            .push_key("body")
            .push_key("items")
            .push_index(42)
            .push_key("name");
        assert_eq!(path.to_string(), "body.items.42.name");
    }

    #[test]
    fn test_leading_index() {
        let path = ValuePath::root().push_index(3).push_key("id");
        assert_eq!(path.to_string(), "3.id");
    }

    #[test]
    fn test_push_leaves_original_untouched() {
        let base = ValuePath::root().push_key("users");
        let first = base.push_index(0);
        let second = base.push_index(1);

        assert_eq!(base.to_string(), "users");
        assert_eq!(first.to_string(), "users.0");
        assert_eq!(second.to_string(), "users.1");
    }

    #[test]
    fn test_parent_chain() {
        let path = ValuePath::root().push_key("a").push_index(0);
        let parent = path.parent().unwrap();
        assert_eq!(parent.to_string(), "a");
        let root = parent.parent().unwrap();
        assert!(root.is_root());
        assert!(root.parent().is_none());
    }

    #[test]
    fn test_from_segments_matches_pushes() {
        let built = ValuePath::from_segments([PathSegment::key("age")]);
        assert_eq!(built, ValuePath::root().push_key("age"));

        let keys = ValuePath::from_segments(["a", "b"]);
        assert_eq!(keys.to_string(), "a.b");
        assert_eq!(keys.last(), Some(&PathSegment::Key("b".to_string())));
    }
}
