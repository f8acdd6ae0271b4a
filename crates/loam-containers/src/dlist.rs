//! Doubly linked list over arena-backed node slots.
//!
//! Nodes live in a [`SlotPool`]; links are slot indices, with
//! [`NIL`](crate::node::NIL) standing in for "no node" at either end.
//! Removed nodes go back to the pool's free list and are reused by later
//! inserts, so a list that churns inside a frame does not grow its arena
//! beyond its high-water mark.
//!
//! The list deliberately has no length method. Wrap it in
//! [`Counted`](crate::Counted) when a cheap length is worth one extra
//! word of bookkeeping per list.

use loam_arena::{Arena, ArenaRef, SlotPool};

use crate::node::{NodeId, NIL};
use crate::query::{ListOps, Sequence, SequenceMut};

struct DNode<T> {
    value: T,
    prev: u32,
    next: u32,
}

/// Arena-backed doubly linked list.
pub struct DList<'a, T> {
    pool: SlotPool<'a, DNode<T>>,
    first: u32,
    last: u32,
}

impl<'a, T> DList<'a, T> {
    /// Empty list allocating nodes from the given arena.
    pub fn new(arena: impl Into<ArenaRef<'a>>) -> Self {
        Self {
            pool: SlotPool::new(arena),
            first: NIL,
            last: NIL,
        }
    }

    /// The arena nodes are carved from.
    #[must_use]
    pub fn arena(&self) -> &Arena {
        self.pool.arena()
    }

    /// Whether the list has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.first == NIL
    }

    /// Inserts `value` directly after the element at `pos`.
    pub fn insert_after(&mut self, pos: NodeId, value: T) -> NodeId {
        let next = self.pool.get(pos.index()).next;
        let id = self.pool.insert(DNode {
            value,
            prev: pos.index(),
            next,
        });
        self.pool.get_mut(pos.index()).next = id;
        if next == NIL {
            self.last = id;
        } else {
            self.pool.get_mut(next).prev = id;
        }
        NodeId(id)
    }

    /// Inserts `value` directly before the element at `pos`.
    pub fn insert_before(&mut self, pos: NodeId, value: T) -> NodeId {
        let prev = self.pool.get(pos.index()).prev;
        let id = self.pool.insert(DNode {
            value,
            prev,
            next: pos.index(),
        });
        self.pool.get_mut(pos.index()).prev = id;
        if prev == NIL {
            self.first = id;
        } else {
            self.pool.get_mut(prev).next = id;
        }
        NodeId(id)
    }

    /// Iterates from the back towards the front.
    pub fn entries_back(&self) -> EntriesBack<'_, 'a, T> {
        EntriesBack {
            pool: &self.pool,
            cursor: self.last,
        }
    }

    /// Mutable access to the element at `pos`.
    pub fn value_mut(&mut self, pos: NodeId) -> &mut T {
        &mut self.pool.get_mut(pos.index()).value
    }

    /// Walks the links in both directions and panics on any
    /// inconsistency. Meant for tests and debug builds.
    pub fn sanity_check(&self) {
        let mut forward = 0usize;
        let mut cursor = self.first;
        let mut prev = NIL;
        while cursor != NIL {
            let node = self.pool.get(cursor);
            assert!(
                node.prev == prev,
                "node {cursor} has prev {} but was reached from {prev}",
                node.prev
            );
            prev = cursor;
            cursor = node.next;
            forward += 1;
        }
        assert!(
            prev == self.last,
            "forward walk ended at {prev} but last is {}",
            self.last
        );
        let backward = self.entries_back().count();
        assert!(
            forward == backward,
            "forward walk saw {forward} nodes, backward walk saw {backward}"
        );
    }

    fn unlink(&mut self, id: u32) -> T {
        let node = self.pool.remove(id);
        if node.prev == NIL {
            self.first = node.next;
        } else {
            self.pool.get_mut(node.prev).next = node.next;
        }
        if node.next == NIL {
            self.last = node.prev;
        } else {
            self.pool.get_mut(node.next).prev = node.prev;
        }
        node.value
    }
}

impl<T> Sequence for DList<'_, T> {
    type Item = T;
    type Pos = NodeId;
    type Entries<'s>
        = Entries<'s, 's, T>
    where
        Self: 's;

    fn entries(&self) -> Self::Entries<'_> {
        Entries {
            pool: &self.pool,
            cursor: self.first,
        }
    }

    fn value(&self, pos: NodeId) -> &T {
        &self.pool.get(pos.index()).value
    }
}

impl<T> SequenceMut for DList<'_, T> {
    fn push_value(&mut self, value: T) -> NodeId {
        self.push_back(value)
    }

    fn remove_at(&mut self, pos: NodeId) -> T {
        self.unlink(pos.index())
    }
}

impl<T> ListOps for DList<'_, T> {
    fn push_front(&mut self, value: T) -> NodeId {
        let id = self.pool.insert(DNode {
            value,
            prev: NIL,
            next: self.first,
        });
        if self.first == NIL {
            self.last = id;
        } else {
            self.pool.get_mut(self.first).prev = id;
        }
        self.first = id;
        NodeId(id)
    }

    fn push_back(&mut self, value: T) -> NodeId {
        let id = self.pool.insert(DNode {
            value,
            prev: self.last,
            next: NIL,
        });
        if self.last == NIL {
            self.first = id;
        } else {
            self.pool.get_mut(self.last).next = id;
        }
        self.last = id;
        NodeId(id)
    }

    fn pop_front(&mut self) -> T {
        assert!(!self.is_empty(), "pop_front on an empty list");
        self.unlink(self.first)
    }

    fn pop_back(&mut self) -> T {
        assert!(!self.is_empty(), "pop_back on an empty list");
        self.unlink(self.last)
    }

    fn front(&self) -> &T {
        assert!(!self.is_empty(), "front of an empty list");
        &self.pool.get(self.first).value
    }

    fn back(&self) -> &T {
        assert!(!self.is_empty(), "back of an empty list");
        &self.pool.get(self.last).value
    }

    fn is_empty(&self) -> bool {
        DList::is_empty(self)
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for DList<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.entries().map(|(_, v)| v)).finish()
    }
}

/// Front-to-back iterator over a [`DList`].
pub struct Entries<'s, 'a, T> {
    pool: &'s SlotPool<'a, DNode<T>>,
    cursor: u32,
}

impl<'s, T> Iterator for Entries<'s, '_, T> {
    type Item = (NodeId, &'s T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == NIL {
            return None;
        }
        let id = self.cursor;
        let node = self.pool.get(id);
        self.cursor = node.next;
        Some((NodeId(id), &node.value))
    }
}

/// Back-to-front iterator over a [`DList`].
pub struct EntriesBack<'s, 'a, T> {
    pool: &'s SlotPool<'a, DNode<T>>,
    cursor: u32,
}

impl<'s, T> Iterator for EntriesBack<'s, '_, T> {
    type Item = (NodeId, &'s T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == NIL {
            return None;
        }
        let id = self.cursor;
        let node = self.pool.get(id);
        self.cursor = node.prev;
        Some((NodeId(id), &node.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Query, QueryMut};
    use loam_arena::Arena;

    fn collect<T: Clone>(list: &DList<'_, T>) -> Vec<T> {
        list.entries().map(|(_, v)| v.clone()).collect()
    }

    #[test]
    fn pushes_link_both_ends() {
        let arena = Arena::new(4096);
        let mut list = DList::new(&arena);
        list.push_back(2);
        list.push_front(1);
        list.push_back(3);
        assert_eq!(collect(&list), vec![1, 2, 3]);
        assert_eq!(*list.front(), 1);
        assert_eq!(*list.back(), 3);
        list.sanity_check();
    }

    #[test]
    fn insert_before_and_after_keep_links_consistent() {
        let arena = Arena::new(4096);
        let mut list = DList::new(&arena);
        let b = list.push_back("b");
        list.insert_before(b, "a");
        let d = list.insert_after(b, "d");
        list.insert_before(d, "c");
        assert_eq!(collect(&list), vec!["a", "b", "c", "d"]);
        assert_eq!(
            list.entries_back().map(|(_, v)| *v).collect::<Vec<_>>(),
            vec!["d", "c", "b", "a"]
        );
        list.sanity_check();
    }

    #[test]
    fn removal_keeps_other_positions_valid() {
        let arena = Arena::new(4096);
        let mut list = DList::new(&arena);
        let a = list.push_back(1);
        let b = list.push_back(2);
        let c = list.push_back(3);
        assert_eq!(list.remove_at(b), 2);
        assert_eq!(*list.value(a), 1);
        assert_eq!(*list.value(c), 3);
        assert_eq!(collect(&list), vec![1, 3]);
        list.sanity_check();
    }

    #[test]
    fn pops_work_from_both_ends() {
        let arena = Arena::new(4096);
        let mut list = DList::new(&arena);
        for i in 1..=4 {
            list.push_back(i);
        }
        assert_eq!(list.pop_front(), 1);
        assert_eq!(list.pop_back(), 4);
        assert_eq!(collect(&list), vec![2, 3]);
    }

    #[test]
    #[should_panic(expected = "pop_front on an empty list")]
    fn popping_an_empty_list_panics() {
        let arena = Arena::new(4096);
        let mut list: DList<'_, u8> = DList::new(&arena);
        list.pop_front();
    }

    #[test]
    #[should_panic(expected = "is not live")]
    fn stale_position_panics() {
        let arena = Arena::new(4096);
        let mut list = DList::new(&arena);
        let a = list.push_back(1);
        list.remove_at(a);
        let _ = list.value(a);
    }

    #[test]
    fn removed_nodes_are_recycled_not_leaked() {
        let arena = Arena::new(4096);
        let mut list = DList::new(&arena);
        for i in 0..100 {
            let id = list.push_back(i);
            list.remove_at(id);
        }
        // One slot serves the whole churn.
        assert!(arena.used_bytes() <= 64);
    }

    #[test]
    fn query_protocol_applies() {
        let arena = Arena::new(4096);
        let mut list = DList::new(&arena);
        for i in [5, 6, 5, 7] {
            list.push_back(i);
        }
        assert_eq!(list.count_eq(&5), 2);
        let pos = list.position_eq(&6).unwrap();
        assert_eq!(*list.value(pos), 6);
        assert_eq!(list.remove_all(|v| *v == 5), 2);
        assert_eq!(collect(&list), vec![6, 7]);
        list.sanity_check();
    }

    #[test]
    fn list_can_own_its_arena() {
        let mut list: DList<'static, u32> = DList::new(Arena::new(4096));
        list.push_back(1);
        list.push_back(2);
        assert_eq!(list.pop_back(), 2);
    }
}
