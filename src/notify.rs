//! Per-node subscriber lists for change notification.
//!
//! Each node carries its own typed callback list. When a recompute produces a
//! changed aggregate, the node invokes every subscriber with the immutable
//! `(old, new)` value pair. Propagation to ancestors is structural: path-routed
//! edits recompute each ancestor on stack unwind, and every ancestor whose own
//! aggregate changed fires its own list.

use crate::Value;
use std::fmt;

type Callback = Box<dyn FnMut(&Value, &Value)>;

/// Handle returned by `subscribe`, used to unsubscribe later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

/// An ordered list of change subscribers.
#[derive(Default)]
pub struct Subscribers {
    next_id: u64,
    slots: Vec<(SubscriberId, Callback)>,
}

impl Subscribers {
    /// Create an empty subscriber list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback, returning its handle.
    pub fn subscribe(&mut self, callback: Callback) -> SubscriberId {
        self.next_id += 1;
        let id = SubscriberId(self.next_id);
        self.slots.push((id, callback));
        id
    }

    /// Remove a callback by handle. Returns false if the handle is unknown.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.slots.len();
        self.slots.retain(|(sid, _)| *sid != id);
        self.slots.len() != before
    }

    /// Invoke every subscriber with the given value pair, in registration
    /// order.
    pub fn emit(&mut self, old: &Value, new: &Value) {
        for (_, callback) in &mut self.slots {
            callback(old, new);
        }
    }

    /// Number of registered subscribers.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if there are no subscribers.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("len", &self.slots.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_subscribe_and_emit() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();

        let mut subs = Subscribers::new();
        subs.subscribe(Box::new(move |old, new| {
            sink.borrow_mut().push((old.clone(), new.clone()));
        }));

        subs.emit(&Value::Undefined, &Value::Number(1.0));
        subs.emit(&Value::Number(1.0), &Value::Number(2.0));

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], (Value::Undefined, Value::Number(1.0)));
        assert_eq!(seen[1], (Value::Number(1.0), Value::Number(2.0)));
    }

    #[test]
    fn test_unsubscribe() {
        let count = Rc::new(RefCell::new(0usize));
        let sink = count.clone();

        let mut subs = Subscribers::new();
        let id = subs.subscribe(Box::new(move |_, _| *sink.borrow_mut() += 1));
        assert_eq!(subs.len(), 1);

        assert!(subs.unsubscribe(id));
        assert!(!subs.unsubscribe(id));
        subs.emit(&Value::Null, &Value::Null);
        assert_eq!(*count.borrow(), 0);
    }

    #[test]
    fn test_emit_order_is_registration_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut subs = Subscribers::new();
        for label in ["first", "second", "third"] {
            let sink = order.clone();
            subs.subscribe(Box::new(move |_, _| sink.borrow_mut().push(label)));
        }
        subs.emit(&Value::Null, &Value::Null);
        assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
    }
}
