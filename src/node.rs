//! The recursive editing node.
//!
//! A `ValueNode` represents one editable value at one position in the tree.
//! It owns its container sub-nodes, keeps one persistent edit buffer per
//! primitive tag, and recomputes its aggregate value bottom-up on every
//! mutation. Primitive buffers and both container lists survive arbitrary tag
//! switches: a user can explore several types and return to the original with
//! no data loss.
//!
//! Mutations enter either directly on a node or, for nested nodes, through
//! `apply` with a positional `Path`. Path routing recomputes every ancestor on
//! stack unwind, so change notification is strictly bottom-up and bounded by
//! tree depth.

use crate::notify::{SubscriberId, Subscribers};
use crate::restrict::Restriction;
use crate::{EditOp, EditorError, EditorResult, Path, Seg, Surface, Tag, TagSet, Value};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique node identity.
///
/// Used for removal by reference: container lists are mutated by the id of the
/// node they hold, never by a raw position that could go stale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u64);

impl NodeId {
    fn next() -> Self {
        NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One object entry: a free-text label paired with an owned value node.
///
/// Labels are not deduplicated; aggregation resolves duplicates
/// last-write-wins.
#[derive(Debug)]
pub struct Entry {
    label: String,
    node: ValueNode,
}

impl Entry {
    /// The entry's label buffer.
    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The entry's value node.
    #[inline]
    pub fn node(&self) -> &ValueNode {
        &self.node
    }

    /// The entry's identity (its node's id).
    #[inline]
    pub fn id(&self) -> NodeId {
        self.node.id
    }
}

/// Construction parameters for a `ValueNode`.
///
/// # Examples
///
/// ```
/// use value_editor::{NodeOptions, Restriction, Tag};
///
/// let node = NodeOptions::new()
///     .value("hello")
///     .collapsed(false)
///     .rules(Restriction::unrestricted().allow(Tag::String).allow(Tag::Null))
///     .build();
/// assert_eq!(node.tag(), Tag::String);
/// assert!(!node.is_collapsed());
/// ```
#[derive(Clone, Debug)]
pub struct NodeOptions {
    value: Value,
    collapsed: bool,
    rules: Restriction,
}

impl NodeOptions {
    /// Default options: undefined value, collapsed, unrestricted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial value.
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = value.into();
        self
    }

    /// Set the initial collapse state.
    pub fn collapsed(mut self, collapsed: bool) -> Self {
        self.collapsed = collapsed;
        self
    }

    /// Set the restriction dictionary.
    pub fn rules(mut self, rules: Restriction) -> Self {
        self.rules = rules;
        self
    }

    /// Build the node.
    pub fn build(self) -> ValueNode {
        ValueNode::with_options(self)
    }
}

impl Default for NodeOptions {
    fn default() -> Self {
        Self {
            value: Value::Undefined,
            collapsed: true,
            rules: Restriction::unrestricted(),
        }
    }
}

/// One recursive editing unit: a tagged value with persistent edit buffers,
/// owned container sub-nodes, and a change-subscriber list.
pub struct ValueNode {
    id: NodeId,
    tag: Tag,
    allowed: TagSet,
    rules: Restriction,
    item_rules: Restriction,
    entry_rules: Restriction,
    string_buf: String,
    number_buf: String,
    bool_buf: bool,
    children: Vec<ValueNode>,
    entries: Vec<Entry>,
    cached_value: Value,
    cached_text: String,
    collapsed: bool,
    initialized: bool,
    subscribers: Subscribers,
}

impl ValueNode {
    /// Create a node in the default state: undefined, collapsed, unrestricted.
    pub fn new() -> Self {
        NodeOptions::new().build()
    }

    /// Create an unrestricted, collapsed node holding the given value.
    pub fn with_value(value: impl Into<Value>) -> Self {
        NodeOptions::new().value(value).build()
    }

    /// Create a node from construction parameters.
    pub fn with_options(options: NodeOptions) -> Self {
        let allowed = options.rules.allowed_tags();
        let mut node = ValueNode {
            id: NodeId::next(),
            tag: allowed.clamp(Tag::Undefined),
            allowed,
            item_rules: options.rules.item_rules(),
            entry_rules: options.rules.entry_rules(),
            rules: options.rules,
            string_buf: String::new(),
            number_buf: String::new(),
            bool_buf: false,
            children: Vec::new(),
            entries: Vec::new(),
            cached_value: Value::Undefined,
            cached_text: String::new(),
            collapsed: options.collapsed,
            initialized: false,
            subscribers: Subscribers::new(),
        };
        // First computation is forced by the initialized flag, so the cache
        // and text are populated even when the value equals the default.
        node.set_value(options.value);
        node
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// The node's identity.
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The current tag.
    #[inline]
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// The set of tags selectable at this node.
    #[inline]
    pub fn allowed_tags(&self) -> TagSet {
        self.allowed
    }

    /// The restriction dictionary this node was given.
    #[inline]
    pub fn rules(&self) -> &Restriction {
        &self.rules
    }

    /// The last computed aggregate value.
    #[inline]
    pub fn value(&self) -> &Value {
        &self.cached_value
    }

    /// The last computed literal text rendering.
    #[inline]
    pub fn text(&self) -> &str {
        &self.cached_text
    }

    /// The current collapse view state.
    #[inline]
    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// The array-side child list, in aggregate order.
    #[inline]
    pub fn children(&self) -> &[ValueNode] {
        &self.children
    }

    /// The object-side entry list, in display order.
    #[inline]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// The string buffer, regardless of the current tag.
    #[inline]
    pub fn string_buffer(&self) -> &str {
        &self.string_buf
    }

    /// The number buffer, regardless of the current tag.
    #[inline]
    pub fn number_buffer(&self) -> &str {
        &self.number_buf
    }

    /// The boolean buffer, regardless of the current tag.
    #[inline]
    pub fn boolean_buffer(&self) -> bool {
        self.bool_buf
    }

    /// The logically active editing surface: the compact label while
    /// collapsed, otherwise the current tag's surface.
    #[inline]
    pub fn active_surface(&self) -> Surface {
        if self.collapsed {
            Surface::Label
        } else {
            Surface::for_tag(self.tag)
        }
    }

    /// Resolve a descendant node by path. Returns `None` for positions past
    /// the end of a container list.
    pub fn get(&self, path: &Path) -> Option<&ValueNode> {
        let mut node = self;
        for seg in path.iter() {
            node = match *seg {
                Seg::Item(i) => node.children.get(i)?,
                Seg::Entry(i) => node.entries.get(i).map(|e| &e.node)?,
            };
        }
        Some(node)
    }

    // ------------------------------------------------------------------
    // Notification
    // ------------------------------------------------------------------

    /// Register a change subscriber. It is invoked with `(old, new)` whenever
    /// this node's aggregate value changes.
    pub fn subscribe(&mut self, callback: impl FnMut(&Value, &Value) + 'static) -> SubscriberId {
        self.subscribers.subscribe(Box::new(callback))
    }

    /// Remove a change subscriber. Returns false for an unknown handle.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    /// Re-fire notification with `old == new == value()`.
    ///
    /// Lets a caller that just wired a subscriber observe the current value
    /// without waiting for a real change.
    pub fn force_notify(&mut self) {
        let value = self.cached_value.clone();
        self.subscribers.emit(&value, &value);
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    /// Replace the node's value wholesale.
    ///
    /// Populates the edit state for the value's classified tag (the primitive
    /// buffer, or a rebuilt container list), then switches to that tag clamped
    /// into the allowed set. Returns whether the aggregate changed.
    pub fn set_value(&mut self, value: impl Into<Value>) -> bool {
        let value = value.into();
        let tag = self.allowed.clamp(Tag::of(&value));
        match value {
            Value::String(s) => self.string_buf = s,
            Value::Number(n) => self.number_buf = format_number(n),
            Value::Bool(b) => self.bool_buf = b,
            Value::Array(items) => {
                self.children.clear();
                for item in items {
                    let child = Self::spawn(&self.item_rules, item);
                    self.children.push(child);
                }
            }
            Value::Object(pairs) => {
                self.entries.clear();
                for (label, item) in pairs {
                    let node = Self::spawn(&self.entry_rules, item);
                    self.entries.push(Entry { label, node });
                }
            }
            Value::Null | Value::Undefined => {}
        }
        self.switch_tag(tag)
    }

    /// Switch the current tag.
    ///
    /// Ignored (returns false) if the tag is outside the allowed set. Never
    /// clears buffers or either container list; each container tag keeps its
    /// own independent accumulated list.
    pub fn set_tag(&mut self, tag: Tag) -> bool {
        if !self.allowed.contains(tag) {
            tracing::trace!(node = %self.id, tag = tag.name(), "tag outside allowed set, ignoring");
            return false;
        }
        self.switch_tag(tag)
    }

    /// Replace the restriction dictionary.
    ///
    /// Re-derives the allowed set, falls the current tag back to the first
    /// allowed tag if it is no longer selectable, and recursively re-applies
    /// the derived item/entry rules to every existing child and entry.
    pub fn set_rules(&mut self, rules: &Restriction) -> bool {
        self.allowed = rules.allowed_tags();
        self.item_rules = rules.item_rules();
        self.entry_rules = rules.entry_rules();
        self.rules = rules.clone();
        for child in &mut self.children {
            child.set_rules(&self.item_rules);
        }
        for entry in &mut self.entries {
            entry.node.set_rules(&self.entry_rules);
        }
        let tag = self.allowed.clamp(self.tag);
        self.switch_tag(tag)
    }

    /// Replace the restriction dictionary from JSON, failing open on
    /// malformed input.
    pub fn set_rules_json(&mut self, json: &serde_json::Value) -> bool {
        self.set_rules(&Restriction::from_json(json))
    }

    /// Edit the string buffer. The buffer persists even while the current tag
    /// is not `string`.
    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        self.string_buf = text.into();
        self.recompute()
    }

    /// Edit the number buffer. Non-numeric text aggregates to NaN; an empty
    /// buffer aggregates to 0.
    pub fn set_number_text(&mut self, text: impl Into<String>) -> bool {
        self.number_buf = text.into();
        self.recompute()
    }

    /// Edit the boolean buffer.
    pub fn set_bool(&mut self, value: bool) -> bool {
        self.bool_buf = value;
        self.recompute()
    }

    /// Append a child node to the array list, constructed under the
    /// array-element restriction. Returns whether the aggregate changed.
    pub fn add_child(&mut self, value: impl Into<Value>) -> bool {
        let child = Self::spawn(&self.item_rules, value.into());
        self.children.push(child);
        self.recompute()
    }

    /// Remove a child by identity, destroying its subtree. Silently ignored
    /// if the id is not present.
    pub fn remove_child(&mut self, id: NodeId) -> bool {
        let before = self.children.len();
        self.children.retain(|c| c.id != id);
        if self.children.len() == before {
            return false;
        }
        self.recompute()
    }

    /// Clear the array list and rebuild it from the given values in order.
    pub fn set_children<I, V>(&mut self, values: I) -> bool
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.children.clear();
        for value in values {
            let child = Self::spawn(&self.item_rules, value.into());
            self.children.push(child);
        }
        self.recompute()
    }

    /// Append a labeled entry, constructed under the object-entry
    /// restriction. Labels are free text; duplicates are representable.
    pub fn add_entry(&mut self, label: impl Into<String>, value: impl Into<Value>) -> bool {
        let node = Self::spawn(&self.entry_rules, value.into());
        self.entries.push(Entry {
            label: label.into(),
            node,
        });
        self.recompute()
    }

    /// Remove an entry by its node's identity, destroying its subtree.
    /// Silently ignored if the id is not present.
    pub fn remove_entry(&mut self, id: NodeId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.node.id != id);
        if self.entries.len() == before {
            return false;
        }
        self.recompute()
    }

    /// Replace an entry's label. Silently ignored if the id is not present.
    pub fn rename_entry(&mut self, id: NodeId, label: impl Into<String>) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|e| e.node.id == id) else {
            return false;
        };
        entry.label = label.into();
        self.recompute()
    }

    /// Clear the object list and rebuild it from the given pairs in order.
    pub fn set_entries<I, K, V>(&mut self, pairs: I) -> bool
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.entries.clear();
        for (label, value) in pairs {
            let node = Self::spawn(&self.entry_rules, value.into());
            self.entries.push(Entry {
                label: label.into(),
                node,
            });
        }
        self.recompute()
    }

    /// Set the collapse view state. No-op when already in that state; never
    /// touches the tag, buffers, children, or cached value.
    pub fn set_collapsed(&mut self, collapsed: bool) {
        if collapsed == self.collapsed {
            return;
        }
        self.collapsed = collapsed;
    }

    /// Flip the collapse view state.
    pub fn toggle_collapsed(&mut self) {
        self.collapsed = !self.collapsed;
    }

    /// Route an edit operation to the node at `path` and recompute every
    /// ancestor on the way back up.
    ///
    /// Returns whether this (root) node's aggregate changed. Positions past
    /// the end of a container list are an addressing error; all op-level
    /// anomalies keep their silent no-op semantics.
    pub fn apply(&mut self, path: &Path, op: EditOp) -> EditorResult<bool> {
        tracing::trace!(node = %self.id, path = %path, op = op.name(), "applying edit");
        self.apply_inner(path.segments(), path, op)
    }

    fn apply_inner(&mut self, rest: &[Seg], full: &Path, op: EditOp) -> EditorResult<bool> {
        let Some((seg, tail)) = rest.split_first() else {
            return Ok(self.apply_here(op));
        };
        let child_changed = match *seg {
            Seg::Item(i) => {
                let len = self.children.len();
                self.children
                    .get_mut(i)
                    .ok_or_else(|| EditorError::index_out_of_bounds(full.clone(), i, len))?
                    .apply_inner(tail, full, op)?
            }
            Seg::Entry(i) => {
                let len = self.entries.len();
                self.entries
                    .get_mut(i)
                    .ok_or_else(|| EditorError::index_out_of_bounds(full.clone(), i, len))?
                    .node
                    .apply_inner(tail, full, op)?
            }
        };
        if child_changed {
            Ok(self.recompute())
        } else {
            Ok(false)
        }
    }

    fn apply_here(&mut self, op: EditOp) -> bool {
        match op {
            EditOp::SetValue { value } => self.set_value(value),
            EditOp::SetTag { tag } => self.set_tag(tag),
            EditOp::SetRules { rules } => self.set_rules(&rules),
            EditOp::SetText { text } => self.set_text(text),
            EditOp::SetNumberText { text } => self.set_number_text(text),
            EditOp::SetBool { value } => self.set_bool(value),
            EditOp::AddChild { value } => self.add_child(value),
            EditOp::RemoveChild { id } => self.remove_child(id),
            EditOp::SetChildren { values } => self.set_children(values),
            EditOp::AddEntry { label, value } => self.add_entry(label, value),
            EditOp::RemoveEntry { id } => self.remove_entry(id),
            EditOp::RenameEntry { id, label } => self.rename_entry(id, label),
            EditOp::SetEntries { pairs } => self.set_entries(pairs),
            EditOp::SetCollapsed { collapsed } => {
                self.set_collapsed(collapsed);
                false
            }
            EditOp::ToggleCollapsed => {
                self.toggle_collapsed();
                false
            }
        }
    }

    // ------------------------------------------------------------------
    // Aggregation
    // ------------------------------------------------------------------

    /// Swap the active tag and recompute. The caller has already validated
    /// the tag against the allowed set. Detach/attach of the old and new
    /// editing surfaces is the renderer's job; the core only records which
    /// surface is active through `tag` and `collapsed`.
    fn switch_tag(&mut self, tag: Tag) -> bool {
        self.tag = tag;
        self.recompute()
    }

    fn spawn(rules: &Restriction, value: Value) -> ValueNode {
        NodeOptions::new().value(value).rules(rules.clone()).build()
    }

    /// Recompute the aggregate value and text from the current tag, buffers,
    /// and container lists. Fires the subscriber list when the value changed,
    /// or unconditionally on the first computation.
    fn recompute(&mut self) -> bool {
        let next = self.aggregate();
        if self.initialized && next == self.cached_value {
            return false;
        }
        let old = std::mem::replace(&mut self.cached_value, next);
        self.cached_text = self.render_text();
        self.initialized = true;
        let new = self.cached_value.clone();
        self.subscribers.emit(&old, &new);
        true
    }

    fn aggregate(&self) -> Value {
        match self.tag {
            Tag::String => Value::String(self.string_buf.clone()),
            Tag::Number => Value::Number(parse_number(&self.number_buf)),
            Tag::Boolean => Value::Bool(self.bool_buf),
            Tag::Null => Value::Null,
            Tag::Undefined => Value::Undefined,
            Tag::Array => Value::Array(
                self.children
                    .iter()
                    .map(|c| c.cached_value.clone())
                    .collect(),
            ),
            Tag::Object => {
                let mut pairs: Vec<(String, Value)> = Vec::with_capacity(self.entries.len());
                for entry in &self.entries {
                    let value = entry.node.cached_value.clone();
                    match pairs.iter_mut().find(|(k, _)| *k == entry.label) {
                        // Last write wins; the label keeps its first position.
                        Some((_, slot)) => *slot = value,
                        None => pairs.push((entry.label.clone(), value)),
                    }
                }
                Value::Object(pairs)
            }
        }
    }

    fn render_text(&self) -> String {
        match self.tag {
            Tag::String => format!("\"{}\"", self.string_buf),
            Tag::Number => self.number_buf.clone(),
            Tag::Boolean => if self.bool_buf { "true" } else { "false" }.to_owned(),
            Tag::Null => "null".to_owned(),
            Tag::Undefined => "undefined".to_owned(),
            Tag::Array => {
                let inner: Vec<&str> = self.children.iter().map(|c| c.cached_text.as_str()).collect();
                format!("[{}]", inner.join(", "))
            }
            Tag::Object => {
                let inner: Vec<String> = self
                    .entries
                    .iter()
                    .map(|e| format!("\"{}\": {}", e.label, e.node.cached_text))
                    .collect();
                format!("{{{}}}", inner.join(", "))
            }
        }
    }
}

impl Default for ValueNode {
    fn default() -> Self {
        ValueNode::new()
    }
}

impl fmt::Debug for ValueNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueNode")
            .field("id", &self.id)
            .field("tag", &self.tag)
            .field("value", &self.cached_value)
            .field("collapsed", &self.collapsed)
            .finish_non_exhaustive()
    }
}

/// Render a number into buffer text: integral finite values without a
/// fractional part, everything else in shortest round-trip form.
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Parse buffer text into a number. Empty or blank text parses as 0;
/// unparseable text yields NaN, which is propagated as a value, not an error.
fn parse_number(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}
