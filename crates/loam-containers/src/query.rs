//! The query protocol shared by every container in this crate.
//!
//! A container exposes its elements through [`Sequence`] (positions and
//! iteration) and its structural edits through [`SequenceMut`]. The
//! search family ([`Query`]) and the edit-by-predicate family
//! ([`QueryMut`]) are blanket-implemented on top, so `find`, `has`,
//! `count_eq`, `remove_all`, and the rest behave identically on arrays
//! and on every list flavour. What a position *is* differs per container
//! (an index for arrays, a node id for lists); the protocol only asks
//! that it be copyable and comparable.

/// Read access to an ordered container.
pub trait Sequence {
    /// Element type.
    type Item;
    /// Position of an element: an index for arrays, a node id for lists.
    type Pos: Copy + Eq;
    /// Iterator over `(position, element)` pairs in container order.
    type Entries<'s>: Iterator<Item = (Self::Pos, &'s Self::Item)>
    where
        Self: 's;

    /// Iterates elements in container order.
    fn entries(&self) -> Self::Entries<'_>;

    /// The element at a position.
    ///
    /// Panics if the position is not occupied.
    fn value(&self, pos: Self::Pos) -> &Self::Item;
}

/// Structural edits on an ordered container.
pub trait SequenceMut: Sequence {
    /// Adds an element at the container's natural growth end and returns
    /// its position.
    fn push_value(&mut self, value: Self::Item) -> Self::Pos;

    /// Removes and returns the element at a position.
    ///
    /// Panics if the position is not occupied. Array positions after the
    /// removed one are invalidated; list positions of other elements
    /// stay valid.
    fn remove_at(&mut self, pos: Self::Pos) -> Self::Item;
}

/// Searches over any [`Sequence`]. Blanket-implemented; containers never
/// implement this directly.
pub trait Query: Sequence {
    /// First element matching a predicate.
    fn find(&self, mut pred: impl FnMut(&Self::Item) -> bool) -> Option<&Self::Item> {
        self.entries().map(|(_, v)| v).find(|v| pred(v))
    }

    /// First element equal to `needle`.
    fn find_eq(&self, needle: &Self::Item) -> Option<&Self::Item>
    where
        Self::Item: PartialEq,
    {
        self.find(|v| v == needle)
    }

    /// Whether any element matches a predicate.
    fn has(&self, pred: impl FnMut(&Self::Item) -> bool) -> bool {
        self.find(pred).is_some()
    }

    /// Whether any element equals `needle`.
    fn has_eq(&self, needle: &Self::Item) -> bool
    where
        Self::Item: PartialEq,
    {
        self.find_eq(needle).is_some()
    }

    /// Position of the first element matching a predicate.
    fn position(&self, mut pred: impl FnMut(&Self::Item) -> bool) -> Option<Self::Pos> {
        self.entries().find(|(_, v)| pred(v)).map(|(p, _)| p)
    }

    /// Position of the first element equal to `needle`.
    fn position_eq(&self, needle: &Self::Item) -> Option<Self::Pos>
    where
        Self::Item: PartialEq,
    {
        self.position(|v| v == needle)
    }

    /// First matching element together with its position.
    fn find_with_position(
        &self,
        mut pred: impl FnMut(&Self::Item) -> bool,
    ) -> Option<(Self::Pos, &Self::Item)> {
        self.entries().find(|(_, v)| pred(v))
    }

    /// Number of elements matching a predicate.
    fn count_matching(&self, mut pred: impl FnMut(&Self::Item) -> bool) -> usize {
        self.entries().filter(|(_, v)| pred(v)).count()
    }

    /// Number of elements equal to `needle`.
    fn count_eq(&self, needle: &Self::Item) -> usize
    where
        Self::Item: PartialEq,
    {
        self.count_matching(|v| v == needle)
    }
}

impl<S: Sequence + ?Sized> Query for S {}

/// Predicate-driven edits over any [`SequenceMut`]. Blanket-implemented.
pub trait QueryMut: SequenceMut {
    /// Pushes `value` unless an equal element already exists. Returns the
    /// new position, or `None` when the push was skipped.
    fn push_if_unique(&mut self, value: Self::Item) -> Option<Self::Pos>
    where
        Self::Item: PartialEq,
    {
        if self.has_eq(&value) {
            None
        } else {
            Some(self.push_value(value))
        }
    }

    /// Position of an element equal to `value`, pushing it first if
    /// absent.
    fn find_or_push(&mut self, value: Self::Item) -> Self::Pos
    where
        Self::Item: PartialEq,
    {
        match self.position_eq(&value) {
            Some(pos) => pos,
            None => self.push_value(value),
        }
    }

    /// Removes and returns the first element matching a predicate.
    fn remove_first(&mut self, mut pred: impl FnMut(&Self::Item) -> bool) -> Option<Self::Item> {
        let pos = self.position(&mut pred)?;
        Some(self.remove_at(pos))
    }

    /// Removes and returns the first element equal to `needle`.
    fn remove_first_eq(&mut self, needle: &Self::Item) -> Option<Self::Item>
    where
        Self::Item: PartialEq,
    {
        self.remove_first(|v| v == needle)
    }

    /// Removes every element matching a predicate; returns how many went.
    ///
    /// Re-scans after each removal, so it stays correct for containers
    /// whose positions shift on removal.
    fn remove_all(&mut self, mut pred: impl FnMut(&Self::Item) -> bool) -> usize {
        let mut removed = 0;
        while let Some(pos) = self.position(&mut pred) {
            self.remove_at(pos);
            removed += 1;
        }
        removed
    }
}

impl<S: SequenceMut + ?Sized> QueryMut for S {}

/// Deque-style operations shared by the linked lists.
///
/// All accessors and pops panic on an empty list; emptiness is a
/// programming error at these call sites, not a recoverable condition.
pub trait ListOps: SequenceMut {
    /// Adds an element at the front.
    fn push_front(&mut self, value: Self::Item) -> Self::Pos;
    /// Adds an element at the back.
    fn push_back(&mut self, value: Self::Item) -> Self::Pos;
    /// Removes and returns the front element.
    fn pop_front(&mut self) -> Self::Item;
    /// Removes and returns the back element.
    fn pop_back(&mut self) -> Self::Item;
    /// The front element.
    fn front(&self) -> &Self::Item;
    /// The back element.
    fn back(&self) -> &Self::Item;
    /// Whether the list has no elements.
    fn is_empty(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    // A deliberately minimal Sequence over a Vec, to pin down the blanket
    // behaviour independently of the real containers.
    struct Probe(Vec<i32>);

    impl Sequence for Probe {
        type Item = i32;
        type Pos = usize;
        type Entries<'s> = std::iter::Enumerate<std::slice::Iter<'s, i32>>;

        fn entries(&self) -> Self::Entries<'_> {
            self.0.iter().enumerate()
        }

        fn value(&self, pos: usize) -> &i32 {
            &self.0[pos]
        }
    }

    impl SequenceMut for Probe {
        fn push_value(&mut self, value: i32) -> usize {
            self.0.push(value);
            self.0.len() - 1
        }

        fn remove_at(&mut self, pos: usize) -> i32 {
            self.0.remove(pos)
        }
    }

    #[test]
    fn find_and_position_agree() {
        let probe = Probe(vec![4, 8, 15, 16, 23]);
        assert_eq!(probe.find(|v| *v > 10), Some(&15));
        assert_eq!(probe.position(|v| *v > 10), Some(2));
        assert_eq!(probe.find_with_position(|v| *v > 10), Some((2, &15)));
        assert!(probe.has_eq(&23));
        assert!(!probe.has_eq(&42));
    }

    #[test]
    fn count_family() {
        let probe = Probe(vec![1, 2, 1, 3, 1]);
        assert_eq!(probe.count_eq(&1), 3);
        assert_eq!(probe.count_matching(|v| *v > 1), 2);
    }

    #[test]
    fn push_if_unique_skips_duplicates() {
        let mut probe = Probe(vec![1, 2]);
        assert_eq!(probe.push_if_unique(2), None);
        assert_eq!(probe.push_if_unique(3), Some(2));
        assert_eq!(probe.0, vec![1, 2, 3]);
    }

    #[test]
    fn find_or_push_returns_the_existing_position() {
        let mut probe = Probe(vec![5, 6]);
        assert_eq!(probe.find_or_push(6), 1);
        assert_eq!(probe.find_or_push(7), 2);
        assert_eq!(probe.0, vec![5, 6, 7]);
    }

    #[test]
    fn remove_all_handles_shifting_positions() {
        let mut probe = Probe(vec![1, 1, 2, 1, 3, 1]);
        assert_eq!(probe.remove_all(|v| *v == 1), 4);
        assert_eq!(probe.0, vec![2, 3]);
    }

    #[test]
    fn remove_first_eq_removes_one_match_only() {
        let mut probe = Probe(vec![9, 7, 9]);
        assert_eq!(probe.remove_first_eq(&9), Some(9));
        assert_eq!(probe.0, vec![7, 9]);
        assert_eq!(probe.remove_first_eq(&4), None);
    }
}
