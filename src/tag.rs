//! The seven-way type discriminator and ordered tag sets.
//!
//! Every editable value carries exactly one `Tag`. Restriction rules and the
//! type-switch state machine operate on `TagSet`, an ordered subset of the
//! seven tags in canonical declaration order.

use crate::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The type discriminator for an editable value.
///
/// Declaration order is the canonical order: it drives `TagSet` iteration and
/// the "first allowed tag" fallback when a node's current tag is revoked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    /// Text value, edited through the string buffer.
    String,
    /// Numeric value, parsed from the number buffer.
    Number,
    /// Boolean value, edited through the boolean buffer.
    Boolean,
    /// Ordered sequence of child nodes.
    Array,
    /// Ordered sequence of labeled entry nodes.
    Object,
    /// Literal null.
    Null,
    /// Literal undefined (the default for a fresh node).
    Undefined,
}

impl Tag {
    /// All seven tags in canonical order.
    pub const ALL: [Tag; 7] = [
        Tag::String,
        Tag::Number,
        Tag::Boolean,
        Tag::Array,
        Tag::Object,
        Tag::Null,
        Tag::Undefined,
    ];

    /// Classify a value into its tag.
    ///
    /// Total over the representable value domain; there is no error case.
    #[inline]
    pub fn of(value: &Value) -> Tag {
        match value {
            Value::Undefined => Tag::Undefined,
            Value::Null => Tag::Null,
            Value::Bool(_) => Tag::Boolean,
            Value::Number(_) => Tag::Number,
            Value::String(_) => Tag::String,
            Value::Array(_) => Tag::Array,
            Value::Object(_) => Tag::Object,
        }
    }

    /// Get the tag name as it appears in restriction dictionaries.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Tag::String => "string",
            Tag::Number => "number",
            Tag::Boolean => "boolean",
            Tag::Array => "array",
            Tag::Object => "object",
            Tag::Null => "null",
            Tag::Undefined => "undefined",
        }
    }

    /// Parse a tag from its dictionary key name.
    pub fn from_name(name: &str) -> Option<Tag> {
        Tag::ALL.into_iter().find(|t| t.name() == name)
    }

    /// Returns true for the two container tags (`array`, `object`).
    #[inline]
    pub fn is_container(&self) -> bool {
        matches!(self, Tag::Array | Tag::Object)
    }

    #[inline]
    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An ordered set of tags, iterated in canonical order.
///
/// # Examples
///
/// ```
/// use value_editor::{Tag, TagSet};
///
/// let set: TagSet = [Tag::Number, Tag::String].into_iter().collect();
/// assert_eq!(set.first(), Some(Tag::String)); // canonical order, not insertion
/// assert!(!set.contains(Tag::Array));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TagSet(u8);

impl TagSet {
    /// The set of all seven tags.
    #[inline]
    pub fn all() -> Self {
        TagSet(0x7f)
    }

    /// The empty set.
    #[inline]
    pub fn empty() -> Self {
        TagSet(0)
    }

    /// Check whether a tag is in the set.
    #[inline]
    pub fn contains(&self, tag: Tag) -> bool {
        self.0 & tag.bit() != 0
    }

    /// Add a tag to the set.
    #[inline]
    pub fn insert(&mut self, tag: Tag) {
        self.0 |= tag.bit();
    }

    /// Remove a tag from the set.
    #[inline]
    pub fn remove(&mut self, tag: Tag) {
        self.0 &= !tag.bit();
    }

    /// The first tag of the set in canonical order.
    #[inline]
    pub fn first(&self) -> Option<Tag> {
        self.iter().next()
    }

    /// Clamp a tag into the set: identity when contained, otherwise the first
    /// tag of the set (falling back to `undefined` for an empty set).
    #[inline]
    pub fn clamp(&self, tag: Tag) -> Tag {
        if self.contains(tag) {
            tag
        } else {
            self.first().unwrap_or(Tag::Undefined)
        }
    }

    /// Iterate the set in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = Tag> {
        let set = *self;
        Tag::ALL.into_iter().filter(move |t| set.contains(*t))
    }

    /// Number of tags in the set.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Check if the set is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TagSet {
    fn default() -> Self {
        TagSet::all()
    }
}

impl FromIterator<Tag> for TagSet {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        let mut set = TagSet::empty();
        for tag in iter {
            set.insert(tag);
        }
        set
    }
}

impl fmt::Debug for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
