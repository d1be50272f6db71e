//! Arena-backed doubly-linked list ordered by recency.
//!
//! Nodes live in a `Vec` of slots and link to each other by slot index, so
//! the store's hash index can hold a plain [`SlotId`] instead of a reference
//! into list storage. Vacated slots are recycled through a free list.
//!
//! Head is the most recently used node, tail the least recently used.

/// Index of a slot in a [`RecencyList`].
pub(crate) type SlotId = usize;

#[derive(Debug)]
struct Node<T> {
    value: T,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

/// Doubly-linked recency list with O(1) push, unlink and promote.
#[derive(Debug)]
pub(crate) struct RecencyList<T> {
    slots: Vec<Option<Node<T>>>,
    free: Vec<SlotId>,
    head: Option<SlotId>,
    tail: Option<SlotId>,
    len: usize,
}

impl<T> Default for RecencyList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RecencyList<T> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Number of linked nodes.
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of allocated slots, occupied or free.
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of vacated slots awaiting reuse.
    pub(crate) fn free_count(&self) -> usize {
        self.free.len()
    }

    pub(crate) fn get(&self, id: SlotId) -> Option<&T> {
        self.node(id).map(|n| &n.value)
    }

    pub(crate) fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.node_mut(id).map(|n| &mut n.value)
    }

    /// Least recently used node.
    pub(crate) fn back(&self) -> Option<(SlotId, &T)> {
        let id = self.tail?;
        self.get(id).map(|value| (id, value))
    }

    /// Insert a value at the head and return its slot.
    pub(crate) fn push_front(&mut self, value: T) -> SlotId {
        let node = Node {
            value,
            prev: None,
            next: None,
        };
        let id = match self.free.pop() {
            Some(id) => {
                self.slots[id] = Some(node);
                id
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };
        self.link_front(id);
        self.len += 1;
        id
    }

    /// Unlink and return the value in `id`, freeing the slot.
    pub(crate) fn remove(&mut self, id: SlotId) -> Option<T> {
        self.node(id)?;
        self.unlink(id);
        let node = self.slots.get_mut(id)?.take()?;
        self.free.push(id);
        self.len -= 1;
        Some(node.value)
    }

    /// Move `id` to the head. Returns false if the slot is vacant.
    pub(crate) fn move_to_front(&mut self, id: SlotId) -> bool {
        if self.node(id).is_none() {
            return false;
        }
        if self.head != Some(id) {
            self.unlink(id);
            self.link_front(id);
        }
        true
    }

    /// Iterate from head (most recent) to tail (least recent).
    pub(crate) fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    fn node(&self, id: SlotId) -> Option<&Node<T>> {
        self.slots.get(id).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: SlotId) -> Option<&mut Node<T>> {
        self.slots.get_mut(id).and_then(Option::as_mut)
    }

    fn set_prev(&mut self, id: SlotId, prev: Option<SlotId>) {
        if let Some(node) = self.node_mut(id) {
            node.prev = prev;
        }
    }

    fn set_next(&mut self, id: SlotId, next: Option<SlotId>) {
        if let Some(node) = self.node_mut(id) {
            node.next = next;
        }
    }

    fn unlink(&mut self, id: SlotId) {
        let Some((prev, next)) = self.node(id).map(|n| (n.prev, n.next)) else {
            return;
        };

        match prev {
            Some(p) => self.set_next(p, next),
            None => self.head = next,
        }
        match next {
            Some(n) => self.set_prev(n, prev),
            None => self.tail = prev,
        }

        if let Some(node) = self.node_mut(id) {
            node.prev = None;
            node.next = None;
        }
    }

    fn link_front(&mut self, id: SlotId) {
        let old_head = self.head;
        match self.node_mut(id) {
            Some(node) => {
                node.prev = None;
                node.next = old_head;
            }
            None => return,
        }

        match old_head {
            Some(h) => self.set_prev(h, Some(id)),
            None => self.tail = Some(id),
        }
        self.head = Some(id);
    }
}

/// Head-to-tail iterator over a [`RecencyList`].
pub(crate) struct Iter<'a, T> {
    list: &'a RecencyList<T>,
    cursor: Option<SlotId>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (SlotId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        let node = self.list.node(id)?;
        self.cursor = node.next;
        Some((id, &node.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(list: &RecencyList<&'static str>) -> Vec<&'static str> {
        list.iter().map(|(_, v)| *v).collect()
    }

    #[test]
    fn test_push_front_orders_newest_first() {
        let mut list = RecencyList::new();
        list.push_front("a");
        list.push_front("b");
        list.push_front("c");

        assert_eq!(values(&list), vec!["c", "b", "a"]);
        assert_eq!(list.back().map(|(_, v)| *v), Some("a"));
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_move_to_front() {
        let mut list = RecencyList::new();
        let a = list.push_front("a");
        list.push_front("b");
        list.push_front("c");

        assert!(list.move_to_front(a));
        assert_eq!(values(&list), vec!["a", "c", "b"]);
        assert_eq!(list.back().map(|(_, v)| *v), Some("b"));

        // Already at head
        assert!(list.move_to_front(a));
        assert_eq!(values(&list), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_remove_head_middle_tail() {
        let mut list = RecencyList::new();
        let a = list.push_front("a");
        let b = list.push_front("b");
        let c = list.push_front("c");
        let d = list.push_front("d");

        assert_eq!(list.remove(b), Some("b"));
        assert_eq!(values(&list), vec!["d", "c", "a"]);

        assert_eq!(list.remove(d), Some("d"));
        assert_eq!(values(&list), vec!["c", "a"]);

        assert_eq!(list.remove(a), Some("a"));
        assert_eq!(values(&list), vec!["c"]);
        assert_eq!(list.back().map(|(id, _)| id), Some(c));

        assert_eq!(list.remove(c), Some("c"));
        assert!(list.is_empty());
        assert!(list.back().is_none());
        assert_eq!(list.iter().count(), 0);
    }

    #[test]
    fn test_remove_vacant_slot_is_none() {
        let mut list = RecencyList::new();
        let a = list.push_front("a");

        assert_eq!(list.remove(a), Some("a"));
        assert_eq!(list.remove(a), None);
        assert_eq!(list.remove(42), None);
        assert!(!list.move_to_front(a));
        assert_eq!(list.len(), 0);
    }

    #[test]
    fn test_slots_are_reused() {
        let mut list = RecencyList::new();
        let a = list.push_front("a");
        list.push_front("b");

        list.remove(a);
        assert_eq!(list.free_count(), 1);

        let c = list.push_front("c");
        assert_eq!(c, a);
        assert_eq!(list.slot_count(), 2);
        assert_eq!(list.free_count(), 0);
        assert_eq!(values(&list), vec!["c", "b"]);
    }

    #[test]
    fn test_get_mut() {
        let mut list = RecencyList::new();
        let id = list.push_front(1);
        *list.get_mut(id).unwrap() += 41;
        assert_eq!(list.get(id), Some(&42));
    }
}
