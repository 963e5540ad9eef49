//! Logical editing-surface handles for the rendering hand-off.
//!
//! The core never draws anything. It only tracks which surface is logically
//! active for a node: the compact label while collapsed, or the current tag's
//! editing surface while expanded. A rendering layer diffs `active_surface()`
//! before and after a mutation to decide what to attach or detach.

use crate::Tag;
use serde::{Deserialize, Serialize};

/// An opaque handle naming one editing surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    /// Compact literal-text label, shown while collapsed.
    Label,
    /// Free-text field for the string buffer.
    StringField,
    /// Numeric field for the number buffer.
    NumberField,
    /// Checkbox-style toggle for the boolean buffer.
    BooleanToggle,
    /// Ordered child list with add/remove controls.
    ArrayList,
    /// Ordered labeled-entry list with add/remove controls.
    ObjectList,
    /// Static `null` marker; no input widget.
    NullMarker,
    /// Static `undefined` marker; no input widget.
    UndefinedMarker,
}

impl Surface {
    /// The editing surface associated with a tag.
    pub fn for_tag(tag: Tag) -> Surface {
        match tag {
            Tag::String => Surface::StringField,
            Tag::Number => Surface::NumberField,
            Tag::Boolean => Surface::BooleanToggle,
            Tag::Array => Surface::ArrayList,
            Tag::Object => Surface::ObjectList,
            Tag::Null => Surface::NullMarker,
            Tag::Undefined => Surface::UndefinedMarker,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_tag_has_a_surface() {
        let surfaces: Vec<Surface> = Tag::ALL.into_iter().map(Surface::for_tag).collect();
        assert_eq!(surfaces.len(), 7);
        // Distinct per tag, and never the collapsed label.
        for (i, s) in surfaces.iter().enumerate() {
            assert_ne!(*s, Surface::Label);
            assert!(!surfaces[..i].contains(s));
        }
    }
}
