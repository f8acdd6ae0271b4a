//! Singly linked list over arena-backed node slots.
//!
//! Forward links only, with both ends tracked, so pushes at either end
//! and `pop_front` are constant time. `pop_back` and positional removal
//! have to walk to the predecessor and are linear; callers that pop from
//! the back in anger want [`DList`](crate::DList) instead.

use loam_arena::{Arena, ArenaRef, SlotPool};

use crate::node::{NodeId, NIL};
use crate::query::{ListOps, Sequence, SequenceMut};

struct SNode<T> {
    value: T,
    next: u32,
}

/// Arena-backed singly linked list.
pub struct SList<'a, T> {
    pool: SlotPool<'a, SNode<T>>,
    first: u32,
    last: u32,
}

impl<'a, T> SList<'a, T> {
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

    /// Mutable access to the element at `pos`.
    pub fn value_mut(&mut self, pos: NodeId) -> &mut T {
        &mut self.pool.get_mut(pos.index()).value
    }

    /// Slot index of the node linking to `id`, or `NIL` for the head.
    fn predecessor(&self, id: u32) -> u32 {
        if id == self.first {
            return NIL;
        }
        let mut cursor = self.first;
        while cursor != NIL {
            let next = self.pool.get(cursor).next;
            if next == id {
                return cursor;
            }
            cursor = next;
        }
        panic!("node {id} is not linked into this list");
    }

    fn unlink_after(&mut self, prev: u32, id: u32) -> T {
        let node = self.pool.remove(id);
        if prev == NIL {
            self.first = node.next;
        } else {
            self.pool.get_mut(prev).next = node.next;
        }
        if node.next == NIL {
            self.last = prev;
        }
        node.value
    }
}

impl<T> Sequence for SList<'_, T> {
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

impl<T> SequenceMut for SList<'_, T> {
    fn push_value(&mut self, value: T) -> NodeId {
        self.push_back(value)
    }

    /// Linear: walks from the head to find the predecessor.
    fn remove_at(&mut self, pos: NodeId) -> T {
        let prev = self.predecessor(pos.index());
        self.unlink_after(prev, pos.index())
    }
}

impl<T> ListOps for SList<'_, T> {
    fn push_front(&mut self, value: T) -> NodeId {
        let id = self.pool.insert(SNode {
            value,
            next: self.first,
        });
        if self.first == NIL {
            self.last = id;
        }
        self.first = id;
        NodeId(id)
    }

    fn push_back(&mut self, value: T) -> NodeId {
        let id = self.pool.insert(SNode { value, next: NIL });
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
        self.unlink_after(NIL, self.first)
    }

    /// Linear: walks the whole list to find the new tail.
    fn pop_back(&mut self) -> T {
        assert!(!self.is_empty(), "pop_back on an empty list");
        let prev = self.predecessor(self.last);
        self.unlink_after(prev, self.last)
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
        SList::is_empty(self)
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for SList<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.entries().map(|(_, v)| v)).finish()
    }
}

/// Front-to-back iterator over an [`SList`].
pub struct Entries<'s, 'a, T> {
    pool: &'s SlotPool<'a, SNode<T>>,
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
