//! Length bookkeeping as a decorator.
//!
//! The bare lists spend nothing on a count, and correspondingly have no
//! length method at all; asking for one is a compile error. [`Counted`]
//! wraps any list and maintains the count across every edit made through
//! the protocol traits. Read-only access to the wrapped list passes
//! through `Deref`; mutation is only possible through `Counted` itself,
//! so the count cannot drift.

use std::ops::Deref;

use crate::back_list::BackList;
use crate::dlist::DList;
use crate::query::{ListOps, Sequence, SequenceMut};
use crate::slist::SList;

/// A list decorated with an element count.
pub struct Counted<L> {
    inner: L,
    len: usize,
}

/// Doubly linked list with a count.
pub type CountedDList<'a, T> = Counted<DList<'a, T>>;
/// Singly linked list with a count.
pub type CountedSList<'a, T> = Counted<SList<'a, T>>;
/// Backward list with a count.
pub type CountedBackList<'a, T> = Counted<BackList<'a, T>>;

impl<L: Sequence> Counted<L> {
    /// Wraps a list, counting whatever it already holds.
    pub fn new(inner: L) -> Self {
        let len = inner.entries().count();
        Self { inner, len }
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the list holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Unwraps the list, discarding the count.
    pub fn into_inner(self) -> L {
        self.inner
    }
}

impl<L> Deref for Counted<L> {
    type Target = L;

    fn deref(&self) -> &L {
        &self.inner
    }
}

impl<L: Sequence> Sequence for Counted<L> {
    type Item = L::Item;
    type Pos = L::Pos;
    type Entries<'s>
        = L::Entries<'s>
    where
        Self: 's;

    fn entries(&self) -> Self::Entries<'_> {
        self.inner.entries()
    }

    fn value(&self, pos: Self::Pos) -> &Self::Item {
        self.inner.value(pos)
    }
}

impl<L: SequenceMut> SequenceMut for Counted<L> {
    fn push_value(&mut self, value: Self::Item) -> Self::Pos {
        let pos = self.inner.push_value(value);
        self.len += 1;
        pos
    }

    fn remove_at(&mut self, pos: Self::Pos) -> Self::Item {
        let value = self.inner.remove_at(pos);
        self.len -= 1;
        value
    }
}

impl<L: ListOps> ListOps for Counted<L> {
    fn push_front(&mut self, value: Self::Item) -> Self::Pos {
        let pos = self.inner.push_front(value);
        self.len += 1;
        pos
    }

    fn push_back(&mut self, value: Self::Item) -> Self::Pos {
        let pos = self.inner.push_back(value);
        self.len += 1;
        pos
    }

    fn pop_front(&mut self) -> Self::Item {
        let value = self.inner.pop_front();
        self.len -= 1;
        value
    }

    fn pop_back(&mut self) -> Self::Item {
        let value = self.inner.pop_back();
        self.len -= 1;
        value
    }

    fn front(&self) -> &Self::Item {
        self.inner.front()
    }

    fn back(&self) -> &Self::Item {
        self.inner.back()
    }

    fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<L: std::fmt::Debug> std::fmt::Debug for Counted<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Counted")
            .field("len", &self.len)
            .field("list", &self.inner)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{ListOps, QueryMut, SequenceMut};
    use loam_arena::Arena;

    #[test]
    fn count_tracks_every_protocol_edit() {
        let arena = Arena::new(4096);
        let mut list: CountedDList<'_, u32> = Counted::new(DList::new(&arena));
        assert!(list.is_empty());
        list.push_back(1);
        list.push_front(0);
        let mid = list.push_back(2);
        assert_eq!(list.len(), 3);
        list.remove_at(mid);
        assert_eq!(list.len(), 2);
        list.pop_front();
        list.pop_back();
        assert!(list.is_empty());
    }

    #[test]
    fn count_tracks_predicate_edits() {
        let arena = Arena::new(4096);
        let mut list: CountedSList<'_, u32> = Counted::new(SList::new(&arena));
        for i in [1, 2, 2, 3] {
            list.push_value(i);
        }
        assert_eq!(list.len(), 4);
        assert_eq!(list.remove_all(|v| *v == 2), 2);
        assert_eq!(list.len(), 2);
        assert_eq!(list.push_if_unique(3), None);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn wrapping_a_populated_list_counts_it() {
        let arena = Arena::new(4096);
        let mut inner = BackList::new(&arena);
        inner.push(1);
        inner.push(2);
        let list: CountedBackList<'_, u32> = Counted::new(inner);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn read_access_passes_through() {
        let arena = Arena::new(4096);
        let mut list: CountedDList<'_, u32> = Counted::new(DList::new(&arena));
        list.push_back(5);
        list.sanity_check();
        assert_eq!(*list.front(), 5);
    }
}
