//! Edit operations: the mutation API as routable values.
//!
//! Each operation describes one user gesture against a single node. Paired
//! with a `Path`, an `EditOp` can be routed from the tree root to any nested
//! node (see `ValueNode::apply`), which keeps mutation entry points at the
//! externally owned root while notifications propagate back up.

use crate::restrict::Restriction;
use crate::{NodeId, Tag, Value};
use serde::{Deserialize, Serialize};

/// A single edit operation against one node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditOp {
    /// Replace the node's value wholesale, switching its tag to the
    /// classification of the new value (clamped into the allowed set).
    SetValue {
        /// The new value.
        value: Value,
    },

    /// Switch the node's tag. Ignored if the tag is outside the allowed set.
    /// Buffers and both container lists survive the switch.
    SetTag {
        /// The target tag.
        tag: Tag,
    },

    /// Replace the node's restriction dictionary, clamping the current tag
    /// and recursively re-restricting existing children and entries.
    SetRules {
        /// The new restriction dictionary.
        rules: Restriction,
    },

    /// Edit the string buffer.
    SetText {
        /// New buffer content.
        text: String,
    },

    /// Edit the number buffer. Non-numeric text aggregates to NaN.
    SetNumberText {
        /// New buffer content.
        text: String,
    },

    /// Edit the boolean buffer.
    SetBool {
        /// New buffer content.
        value: bool,
    },

    /// Append a child node to the array list.
    AddChild {
        /// Initial value for the child.
        value: Value,
    },

    /// Remove a child by identity. Ignored if the id is not present.
    RemoveChild {
        /// Identity of the child to remove.
        id: NodeId,
    },

    /// Clear the array list and rebuild it from the given values in order.
    SetChildren {
        /// Values for the new children.
        values: Vec<Value>,
    },

    /// Append a labeled entry to the object list.
    AddEntry {
        /// Entry label (free text, no uniqueness check).
        label: String,
        /// Initial value for the entry node.
        value: Value,
    },

    /// Remove an entry by its node's identity. Ignored if not present.
    RemoveEntry {
        /// Identity of the entry's node.
        id: NodeId,
    },

    /// Replace an entry's label. Ignored if the id is not present.
    RenameEntry {
        /// Identity of the entry's node.
        id: NodeId,
        /// The new label.
        label: String,
    },

    /// Clear the object list and rebuild it from the given pairs in order.
    SetEntries {
        /// Label/value pairs for the new entries.
        pairs: Vec<(String, Value)>,
    },

    /// Set the collapse view state. Never touches value state.
    SetCollapsed {
        /// Target collapse state.
        collapsed: bool,
    },

    /// Flip the collapse view state.
    ToggleCollapsed,
}

impl EditOp {
    // Convenience constructors

    /// Create a SetValue operation.
    #[inline]
    pub fn set_value(value: impl Into<Value>) -> Self {
        EditOp::SetValue {
            value: value.into(),
        }
    }

    /// Create a SetTag operation.
    #[inline]
    pub fn set_tag(tag: Tag) -> Self {
        EditOp::SetTag { tag }
    }

    /// Create a SetRules operation.
    #[inline]
    pub fn set_rules(rules: Restriction) -> Self {
        EditOp::SetRules { rules }
    }

    /// Create a SetText operation.
    #[inline]
    pub fn set_text(text: impl Into<String>) -> Self {
        EditOp::SetText { text: text.into() }
    }

    /// Create a SetNumberText operation.
    #[inline]
    pub fn set_number_text(text: impl Into<String>) -> Self {
        EditOp::SetNumberText { text: text.into() }
    }

    /// Create a SetBool operation.
    #[inline]
    pub fn set_bool(value: bool) -> Self {
        EditOp::SetBool { value }
    }

    /// Create an AddChild operation.
    #[inline]
    pub fn add_child(value: impl Into<Value>) -> Self {
        EditOp::AddChild {
            value: value.into(),
        }
    }

    /// Create a RemoveChild operation.
    #[inline]
    pub fn remove_child(id: NodeId) -> Self {
        EditOp::RemoveChild { id }
    }

    /// Create a SetChildren operation.
    #[inline]
    pub fn set_children<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        EditOp::SetChildren {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Create an AddEntry operation.
    #[inline]
    pub fn add_entry(label: impl Into<String>, value: impl Into<Value>) -> Self {
        EditOp::AddEntry {
            label: label.into(),
            value: value.into(),
        }
    }

    /// Create a RemoveEntry operation.
    #[inline]
    pub fn remove_entry(id: NodeId) -> Self {
        EditOp::RemoveEntry { id }
    }

    /// Create a RenameEntry operation.
    #[inline]
    pub fn rename_entry(id: NodeId, label: impl Into<String>) -> Self {
        EditOp::RenameEntry {
            id,
            label: label.into(),
        }
    }

    /// Create a SetEntries operation.
    #[inline]
    pub fn set_entries<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        EditOp::SetEntries {
            pairs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Create a SetCollapsed operation.
    #[inline]
    pub fn set_collapsed(collapsed: bool) -> Self {
        EditOp::SetCollapsed { collapsed }
    }

    /// Create a ToggleCollapsed operation.
    #[inline]
    pub fn toggle_collapsed() -> Self {
        EditOp::ToggleCollapsed
    }

    /// Get the operation name.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            EditOp::SetValue { .. } => "set_value",
            EditOp::SetTag { .. } => "set_tag",
            EditOp::SetRules { .. } => "set_rules",
            EditOp::SetText { .. } => "set_text",
            EditOp::SetNumberText { .. } => "set_number_text",
            EditOp::SetBool { .. } => "set_bool",
            EditOp::AddChild { .. } => "add_child",
            EditOp::RemoveChild { .. } => "remove_child",
            EditOp::SetChildren { .. } => "set_children",
            EditOp::AddEntry { .. } => "add_entry",
            EditOp::RemoveEntry { .. } => "remove_entry",
            EditOp::RenameEntry { .. } => "rename_entry",
            EditOp::SetEntries { .. } => "set_entries",
            EditOp::SetCollapsed { .. } => "set_collapsed",
            EditOp::ToggleCollapsed => "toggle_collapsed",
        }
    }
}
