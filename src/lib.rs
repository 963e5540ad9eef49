//! # value-editor
//!
//! Recursive editor model for dynamically typed, arbitrarily nested values —
//! strings, numbers, booleans, arrays, objects, `null`, and `undefined` —
//! organized as a tree of editing nodes, one per value in the structure.
//!
//! The crate is the headless core of an interactive value editor: it owns the
//! per-node type-switching state machine, datatype restriction rules
//! (recursively inherited by container children), persistent primitive edit
//! buffers that survive tag switches, bottom-up value aggregation, and the
//! change-notification protocol. Rendering, widget wiring, and styling live
//! behind the [`Surface`] hand-off and are not part of this crate.
//!
//! ## Quick start
//!
//! ```rust
//! use value_editor::{EditOp, Path, Tag, Value, ValueNode};
//! use serde_json::json;
//!
//! let mut root = ValueNode::with_value(Value::from(json!({
//!     "name": "Alice",
//!     "tags": ["admin"]
//! })));
//! assert_eq!(root.tag(), Tag::Object);
//!
//! // Edit the nested string through a positional path; every ancestor
//! // recomputes on the way back up.
//! root.apply(&Path::root().entry(1).item(0), EditOp::set_text("ops")).unwrap();
//! assert_eq!(root.value().to_json(), Some(json!({"name": "Alice", "tags": ["ops"]})));
//!
//! // Switching tags never loses edit state.
//! root.apply(&Path::root().entry(0), EditOp::set_tag(Tag::Null)).unwrap();
//! root.apply(&Path::root().entry(0), EditOp::set_tag(Tag::String)).unwrap();
//! assert_eq!(root.value().get("name"), Some(&Value::String("Alice".into())));
//! ```
//!
//! ## Modules
//!
//! - [`tag`] — the seven-way type discriminator and ordered tag sets
//! - [`value`] — the tagged value representation
//! - [`restrict`] — per-node datatype restriction rules
//! - [`path`] — positional addressing into the tree
//! - [`op`] — edit operations routable by path
//! - [`node`] — the recursive `ValueNode` core
//! - [`notify`] — per-node change subscribers
//! - [`surface`] — logical editing-surface handles for renderers
//! - [`error`] — error types for structural addressing failures

pub mod error;
pub mod node;
pub mod notify;
pub mod op;
pub mod path;
pub mod restrict;
pub mod surface;
pub mod tag;
pub mod value;

pub use error::{EditorError, EditorResult};
pub use node::{Entry, NodeId, NodeOptions, ValueNode};
pub use notify::SubscriberId;
pub use op::EditOp;
pub use path::{Path, Seg};
pub use restrict::{Restriction, TagRule};
pub use surface::Surface;
pub use tag::{Tag, TagSet};
pub use value::Value;
