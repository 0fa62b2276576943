//! Dialog stacking queue
//!
//! `StackingQueue` holds dialog ids from back to front. The last id in the
//! queue is the topmost (active) dialog, and an id's index in the queue is its
//! z-index.

use std::collections::HashMap;

use crate::dialog::DialogId;

/// Back-to-front ordering of dialog ids.
///
/// Index 0 is the bottom-most dialog and `len() - 1` is the topmost one.
///
/// # Examples
///
/// ```
/// use dialog_registry::stack::StackingQueue;
///
/// let mut queue = StackingQueue::new();
/// queue.push("a");
/// queue.push("b");
///
/// assert_eq!(queue.top(), Some("b"));
/// assert_eq!(queue.position("a"), Some(0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct StackingQueue {
    /// Ids ordered from back to front
    ids: Vec<DialogId>,

    /// Fast lookup: id → index in `ids`
    positions: HashMap<DialogId, usize>,
}

impl StackingQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an id at the front (top) of the stack.
    ///
    /// # Returns
    ///
    /// `true` if the id was added, `false` if it was already queued
    pub fn push(&mut self, id: impl Into<DialogId>) -> bool {
        let id = id.into();
        if self.positions.contains_key(&id) {
            return false;
        }

        self.positions.insert(id.clone(), self.ids.len());
        self.ids.push(id);
        true
    }

    /// Removes an id from the queue.
    ///
    /// # Returns
    ///
    /// `Some(index)` with the id's previous index if it was queued, `None` otherwise
    pub fn remove(&mut self, id: &str) -> Option<usize> {
        self.positions.remove(id)?;
        // Search from the back so the most recent occurrence goes first.
        let index = self.ids.iter().rposition(|queued| queued == id)?;
        self.ids.remove(index);
        self.rebuild_positions();
        Some(index)
    }

    /// Moves an id to the top of the stack.
    ///
    /// # Returns
    ///
    /// `true` if the id was raised, `false` if it wasn't queued
    pub fn raise_to_top(&mut self, id: &str) -> bool {
        if self.is_top(id) {
            return true;
        }
        match self.remove(id) {
            Some(_) => self.push(id),
            None => false,
        }
    }

    /// Returns `true` if `id` is the topmost entry.
    pub fn is_top(&self, id: &str) -> bool {
        self.top() == Some(id)
    }

    /// Returns the topmost id.
    pub fn top(&self) -> Option<&str> {
        self.ids.last().map(String::as_str)
    }

    /// Returns the index of `id`, where 0 is the bottom of the stack.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    /// Returns the ids in back-to-front order.
    pub fn as_slice(&self) -> &[DialogId] {
        &self.ids
    }

    /// Returns an iterator over ids in back-to-front order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.positions.clear();
    }

    fn rebuild_positions(&mut self) {
        self.positions.clear();
        for (index, id) in self.ids.iter().enumerate() {
            self.positions.insert(id.clone(), index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue_of(ids: &[&str]) -> StackingQueue {
        let mut queue = StackingQueue::new();
        for id in ids {
            queue.push(*id);
        }
        queue
    }

    #[test]
    fn test_new_queue_is_empty() {
        let queue = StackingQueue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.len(), 0);
        assert_eq!(queue.top(), None);
    }

    #[test]
    fn test_push_adds_to_top() {
        let queue = queue_of(&["a", "b", "c"]);

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.top(), Some("c"));
        assert_eq!(queue.position("a"), Some(0));
        assert_eq!(queue.as_slice(), &["a", "b", "c"]);
    }

    #[test]
    fn test_push_duplicate_is_noop() {
        let mut queue = StackingQueue::new();
        assert!(queue.push("a"));
        assert!(!queue.push("a"));

        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut queue = queue_of(&["a", "b", "c"]);

        assert_eq!(queue.remove("b"), Some(1));
        assert_eq!(queue.as_slice(), &["a", "c"]);
        assert_eq!(queue.position("b"), None);
        assert_eq!(queue.remove("b"), None);
    }

    #[test]
    fn test_raise_to_top() {
        let mut queue = queue_of(&["a", "b", "c"]);

        assert!(queue.raise_to_top("a"));
        assert_eq!(queue.as_slice(), &["b", "c", "a"]);
        assert!(queue.is_top("a"));
        assert_eq!(queue.position("a"), Some(2));
    }

    #[test]
    fn test_raise_top_is_stable() {
        let mut queue = queue_of(&["a", "b"]);

        assert!(queue.raise_to_top("b"));
        assert_eq!(queue.as_slice(), &["a", "b"]);
    }

    #[test]
    fn test_raise_unknown_id() {
        let mut queue = queue_of(&["a"]);

        assert!(!queue.raise_to_top("zz"));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_positions_stay_consistent() {
        let mut queue = queue_of(&["a", "b", "c", "d", "e"]);

        queue.raise_to_top("c");
        queue.remove("b");
        queue.raise_to_top("a");

        assert_eq!(queue.as_slice(), &["d", "e", "c", "a"]);
        for (index, id) in queue.iter().enumerate() {
            assert_eq!(queue.position(id), Some(index));
        }
    }

    #[test]
    fn test_clear() {
        let mut queue = queue_of(&["a", "b"]);
        queue.clear();

        assert!(queue.is_empty());
        assert_eq!(queue.position("a"), None);
    }
}
