//! Positional paths for navigating the editing tree.
//!
//! Paths are sequences of segments that describe a node's position relative
//! to the root. Each segment is either an array-child position or an
//! object-entry position. Addressing is positional rather than by label
//! because entry labels are free text with no uniqueness guarantee.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single segment in a node path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seg {
    /// Position in an array node's child list.
    Item(usize),
    /// Position in an object node's entry list.
    Entry(usize),
}

impl Seg {
    /// Create an array-child segment.
    #[inline]
    pub fn item(i: usize) -> Self {
        Seg::Item(i)
    }

    /// Create an object-entry segment.
    #[inline]
    pub fn entry(i: usize) -> Self {
        Seg::Entry(i)
    }

    /// Get the position regardless of segment kind.
    #[inline]
    pub fn position(&self) -> usize {
        match self {
            Seg::Item(i) | Seg::Entry(i) => *i,
        }
    }

    /// Returns true if this is an array-child segment.
    #[inline]
    pub fn is_item(&self) -> bool {
        matches!(self, Seg::Item(_))
    }

    /// Returns true if this is an object-entry segment.
    #[inline]
    pub fn is_entry(&self) -> bool {
        matches!(self, Seg::Entry(_))
    }
}

impl fmt::Display for Seg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seg::Item(i) => write!(f, "[{}]", i),
            Seg::Entry(i) => write!(f, ".{{{}}}", i),
        }
    }
}

impl From<usize> for Seg {
    fn from(i: usize) -> Self {
        Seg::Item(i)
    }
}

/// A complete path from the tree root to a node.
///
/// Paths are immutable sequences of segments. Use builder methods to construct
/// paths incrementally.
///
/// # Examples
///
/// ```
/// use value_editor::Path;
///
/// let path = Path::root().entry(0).item(2);
/// assert_eq!(path.len(), 2);
/// assert_eq!(path.to_string(), "$.{0}[2]");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Path(Vec<Seg>);

impl Path {
    /// Create an empty path (root).
    #[inline]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Create an empty path (alias for `new`).
    #[inline]
    pub fn root() -> Self {
        Self::new()
    }

    /// Create a path from a vector of segments.
    #[inline]
    pub fn from_segments(segments: Vec<Seg>) -> Self {
        Self(segments)
    }

    /// Append an array-child segment and return self (builder pattern).
    #[inline]
    pub fn item(mut self, i: usize) -> Self {
        self.0.push(Seg::Item(i));
        self
    }

    /// Append an object-entry segment and return self (builder pattern).
    #[inline]
    pub fn entry(mut self, i: usize) -> Self {
        self.0.push(Seg::Entry(i));
        self
    }

    /// Push a segment onto the path (mutating).
    #[inline]
    pub fn push(&mut self, seg: Seg) {
        self.0.push(seg);
    }

    /// Pop the last segment from the path.
    #[inline]
    pub fn pop(&mut self) -> Option<Seg> {
        self.0.pop()
    }

    /// Get the segments of this path.
    #[inline]
    pub fn segments(&self) -> &[Seg] {
        &self.0
    }

    /// Check if this path is empty (root).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the number of segments in this path.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Get the first segment.
    #[inline]
    pub fn first(&self) -> Option<&Seg> {
        self.0.first()
    }

    /// Get the last segment.
    #[inline]
    pub fn last(&self) -> Option<&Seg> {
        self.0.last()
    }

    /// Join this path with another path.
    #[inline]
    pub fn join(&self, other: &Path) -> Path {
        let mut result = self.clone();
        result.0.extend(other.0.iter().copied());
        result
    }

    /// Get the parent path (path without the last segment).
    #[inline]
    pub fn parent(&self) -> Option<Path> {
        if self.0.is_empty() {
            None
        } else {
            let mut p = self.clone();
            p.pop();
            Some(p)
        }
    }

    /// Check if this path starts with another path.
    #[inline]
    pub fn starts_with(&self, prefix: &Path) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// Iterate over the segments.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Seg> {
        self.0.iter()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        for seg in &self.0 {
            write!(f, "{}", seg)?;
        }
        Ok(())
    }
}

impl FromIterator<Seg> for Path {
    fn from_iter<I: IntoIterator<Item = Seg>>(iter: I) -> Self {
        Path(iter.into_iter().collect())
    }
}

impl IntoIterator for Path {
    type Item = Seg;
    type IntoIter = std::vec::IntoIter<Seg>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Seg;
    type IntoIter = std::slice::Iter<'a, Seg>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl std::ops::Index<usize> for Path {
    type Output = Seg;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

/// Construct a `Path` from a sequence of segments.
///
/// Bare numbers become array-child segments; use `Seg::entry` for
/// object-entry segments.
///
/// # Examples
///
/// ```
/// use value_editor::{path, Seg};
///
/// let p = path!(0, 2);
/// assert_eq!(p.to_string(), "$[0][2]");
///
/// let p = path!(Seg::entry(1), 0);
/// assert_eq!(p.to_string(), "$.{1}[0]");
/// ```
#[macro_export]
macro_rules! path {
    () => {
        $crate::Path::root()
    };
    ($($seg:expr),+ $(,)?) => {{
        let mut p = $crate::Path::root();
        $(
            p.push($crate::Seg::from($seg));
        )+
        p
    }};
}
