//! Integration tests for the recursive editor core: aggregation, restriction
//! inheritance, notification counts, and path-routed edits.

use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;
use value_editor::{
    EditOp, NodeOptions, Path, Restriction, Surface, Tag, Value, ValueNode,
};

/// Subscribe a recording probe to a node, returning the shared list of
/// observed `(old, new)` pairs.
fn probe(node: &mut ValueNode) -> Rc<RefCell<Vec<(Value, Value)>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    node.subscribe(move |old, new| sink.borrow_mut().push((old.clone(), new.clone())));
    seen
}

// ============================================================================
// Round trips
// ============================================================================

#[test]
fn test_set_value_roundtrip() {
    let mut node = ValueNode::new();
    for value in [
        Value::Undefined,
        Value::Null,
        Value::Bool(false),
        Value::Number(-2.5),
        Value::String("hello".into()),
        Value::array([Value::Null, Value::from("x")]),
        Value::object([("a", Value::from(1i64)), ("b", Value::array(["y"]))]),
    ] {
        node.set_value(value.clone());
        assert_eq!(node.value(), &value);
    }
}

#[test]
fn test_roundtrip_through_json() {
    let json = json!({"user": {"name": "Alice", "admin": true}, "scores": [1.5, 2.5]});
    let mut node = ValueNode::new();
    node.set_value(Value::from(json.clone()));
    assert_eq!(node.value().to_json(), Some(json));
}

// ============================================================================
// Buffer retention across tag switches
// ============================================================================

#[test]
fn test_buffer_retention_on_tag_switch() {
    let mut node = ValueNode::with_value("abc");
    node.set_tag(Tag::Number);
    node.set_tag(Tag::String);
    assert_eq!(node.value(), &Value::String("abc".into()));
}

#[test]
fn test_container_retention_per_tag() {
    let mut node = ValueNode::new();
    node.set_children([1i64, 2, 3]);
    node.set_tag(Tag::Array);
    assert_eq!(node.value(), &Value::array([1i64, 2, 3]));

    node.set_tag(Tag::Object);
    node.add_entry("k", "v");
    node.set_tag(Tag::Null);

    // Both lists survived the detour through null.
    node.set_tag(Tag::Array);
    assert_eq!(node.value(), &Value::array([1i64, 2, 3]));
    node.set_tag(Tag::Object);
    assert_eq!(node.value(), &Value::object([("k", "v")]));
}

// ============================================================================
// Restriction rules
// ============================================================================

#[test]
fn test_restriction_fallback_on_rule_change() {
    let rules = Restriction::unrestricted()
        .allow(Tag::String)
        .allow(Tag::Number);
    let mut node = NodeOptions::new().value(5i64).rules(rules).build();
    assert_eq!(node.tag(), Tag::Number);

    node.set_rules(&Restriction::unrestricted().allow(Tag::String));
    // Never left in a now-disallowed state.
    assert_eq!(node.tag(), Tag::String);
    assert!(!node.allowed_tags().contains(Tag::Number));
}

#[test]
fn test_restrictions_inherited_by_children() {
    let rules = Restriction::unrestricted().nested(
        Tag::Array,
        Restriction::unrestricted().allow(Tag::Number),
    );
    let mut node = NodeOptions::new().rules(rules).build();
    node.set_tag(Tag::Array);
    node.add_child("text");

    // The child may only be a number: the string value was clamped.
    assert_eq!(node.children()[0].tag(), Tag::Number);
}

#[test]
fn test_rule_change_reapplies_to_existing_children() {
    let mut node = ValueNode::with_value(Value::array([Value::from(1i64), Value::from("x")]));
    node.set_rules(&Restriction::unrestricted().nested(
        Tag::Array,
        Restriction::unrestricted().allow(Tag::Number),
    ));

    // The string child fell back to number; its empty number buffer reads 0.
    assert_eq!(node.value(), &Value::array([1i64, 0]));
}

// ============================================================================
// Container aggregation
// ============================================================================

#[test]
fn test_array_aggregation_order() {
    let mut node = ValueNode::new();
    node.set_children([1i64, 2, 3]);
    assert_eq!(node.value(), &Value::array([1i64, 2, 3]));

    let middle = node.children()[1].id();
    node.remove_child(middle);
    assert_eq!(node.value(), &Value::array([1i64, 3]));
}

#[test]
fn test_object_last_write_wins() {
    let mut node = ValueNode::new();
    node.set_tag(Tag::Object);
    node.add_entry("k", 1i64);
    node.add_entry("k", 2i64);
    assert_eq!(node.value().get("k"), Some(&Value::Number(2.0)));
    // The duplicate label keeps its first position in the aggregate.
    assert_eq!(node.value(), &Value::object([("k", 2i64)]));
}

#[test]
fn test_set_entries_replaces_all() {
    let mut node = ValueNode::new();
    node.set_tag(Tag::Object);
    node.add_entry("old", 1i64);
    node.set_entries([("a", 1i64), ("b", 2i64)]);
    assert_eq!(
        node.value(),
        &Value::object([("a", 1i64), ("b", 2i64)])
    );
    assert_eq!(node.entries().len(), 2);
}

#[test]
fn test_rename_entry() {
    let mut node = ValueNode::new();
    node.set_tag(Tag::Object);
    node.add_entry("before", 1i64);
    let id = node.entries()[0].id();

    assert!(node.rename_entry(id, "after"));
    assert_eq!(node.value().get("after"), Some(&Value::Number(1.0)));
    assert_eq!(node.value().get("before"), None);
}

// ============================================================================
// Notification counts
// ============================================================================

#[test]
fn test_leaf_edit_notifies_exactly_once() {
    let mut node = ValueNode::with_value("start");
    let seen = probe(&mut node);

    node.set_text("changed");
    assert_eq!(seen.borrow().len(), 1);
    assert_eq!(
        seen.borrow()[0],
        (Value::String("start".into()), Value::String("changed".into()))
    );

    // Same value again: zero notifications.
    node.set_text("changed");
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn test_container_recompute_without_change_is_silent() {
    let mut node = ValueNode::new();
    node.set_children([1i64, 2]);
    let seen = probe(&mut node);

    // Re-selecting the current tag recomputes an equal aggregate.
    node.set_tag(Tag::Array);
    assert_eq!(seen.borrow().len(), 0);

    node.add_child(3i64);
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn test_force_notify_fires_with_equal_pair() {
    let mut node = ValueNode::with_value(7i64);
    let seen = probe(&mut node);

    node.force_notify();
    assert_eq!(seen.borrow().len(), 1);
    assert_eq!(seen.borrow()[0], (Value::Number(7.0), Value::Number(7.0)));
}

#[test]
fn test_unsubscribe_stops_notifications() {
    let mut node = ValueNode::with_value(1i64);
    let count = Rc::new(RefCell::new(0usize));
    let sink = count.clone();
    let id = node.subscribe(move |_, _| *sink.borrow_mut() += 1);

    node.set_number_text("2");
    assert!(node.unsubscribe(id));
    node.set_number_text("3");
    assert_eq!(*count.borrow(), 1);
}

// ============================================================================
// Path-routed edits and upward propagation
// ============================================================================

#[test]
fn test_deep_edit_propagates_to_root() {
    let mut root = ValueNode::with_value(Value::from(json!({"list": [1, 2, 3]})));
    let seen = probe(&mut root);

    let changed = root
        .apply(&Path::root().entry(0).item(2), EditOp::set_number_text("99"))
        .unwrap();
    assert!(changed);
    assert_eq!(seen.borrow().len(), 1);
    assert_eq!(
        root.value(),
        &Value::object([("list", Value::array([1i64, 2, 99]))])
    );
}

#[test]
fn test_view_state_edit_does_not_notify() {
    let mut root = ValueNode::with_value(Value::from(json!([true])));
    let seen = probe(&mut root);

    root.apply(&Path::root().item(0), EditOp::set_collapsed(false))
        .unwrap();
    root.apply(&Path::root().item(0), EditOp::toggle_collapsed())
        .unwrap();
    assert_eq!(seen.borrow().len(), 0);
    assert_eq!(root.value(), &Value::array([true]));
}

#[test]
fn test_child_add_through_path() {
    let mut root = ValueNode::with_value(Value::from(json!({"items": []})));
    root.apply(&Path::root().entry(0), EditOp::add_child("new"))
        .unwrap();
    assert_eq!(
        root.value().get("items"),
        Some(&Value::array(["new"]))
    );
}

// ============================================================================
// Collapse / expand
// ============================================================================

#[test]
fn test_collapse_toggle_restores_surface() {
    let mut node = ValueNode::with_value(42i64);
    node.set_collapsed(false);
    let before = node.active_surface();
    assert_eq!(before, Surface::NumberField);

    node.toggle_collapsed();
    assert_eq!(node.active_surface(), Surface::Label);
    node.toggle_collapsed();
    assert_eq!(node.active_surface(), before);

    assert_eq!(node.value(), &Value::Number(42.0));
    assert_eq!(node.tag(), Tag::Number);
}
