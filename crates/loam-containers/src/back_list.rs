//! Backward singly linked list: a stack with the query protocol.
//!
//! Only the head is tracked and the cheap push goes to the front, so the
//! newest element is always first in iteration order. Tail operations
//! (`push_back`, `last`, `pop_last`) exist for completeness but walk the
//! whole list. This is the cheapest list flavour, one word of list state
//! and one link per node.

use loam_arena::{Arena, ArenaRef, SlotPool};

use crate::node::{NodeId, NIL};
use crate::query::{ListOps, Sequence, SequenceMut};

struct BNode<T> {
    value: T,
    next: u32,
}

/// Arena-backed backward list. Newest element first.
pub struct BackList<'a, T> {
    pool: SlotPool<'a, BNode<T>>,
    first: u32,
}

impl<'a, T> BackList<'a, T> {
    /// Empty list allocating nodes from the given arena.
    pub fn new(arena: impl Into<ArenaRef<'a>>) -> Self {
        Self {
            pool: SlotPool::new(arena),
            first: NIL,
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

    /// Adds an element at the front.
    pub fn push(&mut self, value: T) -> NodeId {
        let id = self.pool.insert(BNode {
            value,
            next: self.first,
        });
        self.first = id;
        NodeId(id)
    }

    /// Appends an element at the tail. Linear walk to find it.
    pub fn push_back(&mut self, value: T) -> NodeId {
        let id = self.pool.insert(BNode { value, next: NIL });
        if self.first == NIL {
            self.first = id;
        } else {
            let mut cursor = self.first;
            loop {
                let next = self.pool.get(cursor).next;
                if next == NIL {
                    break;
                }
                cursor = next;
            }
            self.pool.get_mut(cursor).next = id;
        }
        NodeId(id)
    }

    /// Removes and returns the front element. Panics when empty.
    pub fn pop(&mut self) -> T {
        assert!(!self.is_empty(), "pop on an empty list");
        let node = self.pool.remove(self.first);
        self.first = node.next;
        node.value
    }

    /// The front element. Panics when empty.
    #[must_use]
    pub fn first(&self) -> &T {
        assert!(!self.is_empty(), "first of an empty list");
        &self.pool.get(self.first).value
    }

    /// The oldest element. Linear walk; panics when empty.
    #[must_use]
    pub fn last(&self) -> &T {
        assert!(!self.is_empty(), "last of an empty list");
        let mut cursor = self.first;
        loop {
            let node = self.pool.get(cursor);
            if node.next == NIL {
                return &node.value;
            }
            cursor = node.next;
        }
    }

    /// Removes and returns the oldest element. Linear walk; panics when
    /// empty.
    pub fn pop_last(&mut self) -> T {
        assert!(!self.is_empty(), "pop_last on an empty list");
        let prev = self.predecessor_of_tail();
        let tail = if prev == NIL {
            self.first
        } else {
            self.pool.get(prev).next
        };
        let node = self.pool.remove(tail);
        if prev == NIL {
            self.first = NIL;
        } else {
            self.pool.get_mut(prev).next = NIL;
        }
        node.value
    }

    /// Mutable access to the element at `pos`.
    pub fn value_mut(&mut self, pos: NodeId) -> &mut T {
        &mut self.pool.get_mut(pos.index()).value
    }

    fn predecessor_of_tail(&self) -> u32 {
        let mut prev = NIL;
        let mut cursor = self.first;
        loop {
            let next = self.pool.get(cursor).next;
            if next == NIL {
                return prev;
            }
            prev = cursor;
            cursor = next;
        }
    }

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
}

impl<T> Sequence for BackList<'_, T> {
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

impl<T> SequenceMut for BackList<'_, T> {
    /// The growth end of a backward list is the front.
    fn push_value(&mut self, value: T) -> NodeId {
        self.push(value)
    }

    fn remove_at(&mut self, pos: NodeId) -> T {
        let prev = self.predecessor(pos.index());
        let node = self.pool.remove(pos.index());
        if prev == NIL {
            self.first = node.next;
        } else {
            self.pool.get_mut(prev).next = node.next;
        }
        node.value
    }
}

impl<T> ListOps for BackList<'_, T> {
    fn push_front(&mut self, value: T) -> NodeId {
        self.push(value)
    }

    /// Linear: walks the whole list to find the tail.
    fn push_back(&mut self, value: T) -> NodeId {
        BackList::push_back(self, value)
    }

    fn pop_front(&mut self) -> T {
        self.pop()
    }

    /// Linear: walks the whole list to find the new tail.
    fn pop_back(&mut self) -> T {
        self.pop_last()
    }

    fn front(&self) -> &T {
        self.first()
    }

    fn back(&self) -> &T {
        self.last()
    }

    fn is_empty(&self) -> bool {
        BackList::is_empty(self)
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for BackList<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.entries().map(|(_, v)| v)).finish()
    }
}

/// Newest-to-oldest iterator over a [`BackList`].
pub struct Entries<'s, 'a, T> {
    pool: &'s SlotPool<'a, BNode<T>>,
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
