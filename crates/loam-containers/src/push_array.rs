//! A bounded push array with inline storage.
//!
//! `PushArray<T, N>` holds up to `N` elements without ever spilling to
//! the heap; pushing past capacity is a programming error and panics.
//! Removal swaps the last element into the hole, so it is constant time
//! and does not preserve order. [`PushArray::remove_preserving_order`]
//! shifts instead, for callers that rely on ordering.

use std::cmp::Ordering;
use std::ops::{Deref, DerefMut};

use smallvec::SmallVec;

use crate::query::{Sequence, SequenceMut};

/// A fixed-capacity array that fills from the front.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PushArray<T, const N: usize> {
    items: SmallVec<[T; N]>,
}

impl<T, const N: usize> PushArray<T, N> {
    /// An empty array.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: SmallVec::new(),
        }
    }

    /// Maximum number of elements, `N`.
    #[must_use]
    pub fn capacity(&self) -> usize {
        N
    }

    /// Current number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the array holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the array is at capacity.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.items.len() == N
    }

    /// Appends an element. Panics when the array is full.
    pub fn push(&mut self, value: T) -> usize {
        assert!(
            !self.is_full(),
            "push array overflow: capacity is {N} elements"
        );
        self.items.push(value);
        self.items.len() - 1
    }

    /// Removes the element at `index` by swapping the last element into
    /// its place. Constant time; does not preserve order.
    pub fn remove(&mut self, index: usize) -> T {
        self.items.swap_remove(index)
    }

    /// Removes the element at `index`, shifting everything after it down
    /// by one. Linear time; preserves order.
    pub fn remove_preserving_order(&mut self, index: usize) -> T {
        self.items.remove(index)
    }

    /// Removes and returns the first element. Panics when empty. The
    /// last element takes its place, so order is not preserved.
    pub fn pop_first(&mut self) -> T {
        assert!(!self.is_empty(), "pop_first on an empty push array");
        self.items.swap_remove(0)
    }

    /// Removes and returns the last element. Panics when empty.
    pub fn pop_last(&mut self) -> T {
        self.items.pop().expect("pop_last on an empty push array")
    }

    /// Drops every element.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sorts the elements in place. Not stable.
    pub fn sort(&mut self)
    where
        T: Ord,
    {
        self.items.sort_unstable();
    }

    /// Sorts with a comparator. Not stable.
    pub fn sort_unstable_by(&mut self, compare: impl FnMut(&T, &T) -> Ordering) {
        self.items.sort_unstable_by(compare);
    }

    /// Stable sort with a comparator; equal elements keep their relative
    /// order.
    pub fn sort_by(&mut self, compare: impl FnMut(&T, &T) -> Ordering) {
        self.items.sort_by(compare);
    }

    /// Sorts the elements in place by a key. Not stable.
    pub fn sort_by_key<K: Ord>(&mut self, key: impl FnMut(&T) -> K) {
        self.items.sort_unstable_by_key(key);
    }
}

impl<T, const N: usize> Deref for PushArray<T, N> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T, const N: usize> DerefMut for PushArray<T, N> {
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.items
    }
}

impl<'a, T, const N: usize> IntoIterator for &'a PushArray<T, N> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T, const N: usize> Sequence for PushArray<T, N> {
    type Item = T;
    type Pos = usize;
    type Entries<'s>
        = std::iter::Enumerate<std::slice::Iter<'s, T>>
    where
        Self: 's;

    fn entries(&self) -> Self::Entries<'_> {
        self.items.iter().enumerate()
    }

    fn value(&self, pos: usize) -> &T {
        &self.items[pos]
    }
}

impl<T, const N: usize> SequenceMut for PushArray<T, N> {
    fn push_value(&mut self, value: T) -> usize {
        self.push(value)
    }

    /// Swap removal: the position of the former last element moves to
    /// `pos`.
    fn remove_at(&mut self, pos: usize) -> T {
        self.remove(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Query, QueryMut};

    #[test]
    fn fills_to_capacity() {
        let mut array: PushArray<u32, 4> = PushArray::new();
        for i in 0..4 {
            assert_eq!(array.push(i), i as usize);
        }
        assert!(array.is_full());
        assert_eq!(&*array, &[0, 1, 2, 3]);
    }

    #[test]
    #[should_panic(expected = "push array overflow")]
    fn pushing_past_capacity_panics() {
        let mut array: PushArray<u8, 2> = PushArray::new();
        array.push(1);
        array.push(2);
        array.push(3);
    }

    #[test]
    fn swap_removal_moves_the_last_element_into_the_hole() {
        let mut array: PushArray<u32, 8> = PushArray::new();
        for i in [10, 20, 30, 40] {
            array.push(i);
        }
        assert_eq!(array.remove(1), 20);
        assert_eq!(&*array, &[10, 40, 30]);
    }

    #[test]
    fn ordered_removal_shifts() {
        let mut array: PushArray<u32, 8> = PushArray::new();
        for i in [10, 20, 30, 40] {
            array.push(i);
        }
        assert_eq!(array.remove_preserving_order(1), 20);
        assert_eq!(&*array, &[10, 30, 40]);
    }

    #[test]
    fn pop_first_swaps_from_the_back() {
        let mut array: PushArray<u32, 4> = PushArray::new();
        for i in [1, 2, 3] {
            array.push(i);
        }
        assert_eq!(array.pop_first(), 1);
        assert_eq!(&*array, &[3, 2]);
        assert_eq!(array.pop_last(), 2);
    }

    #[test]
    fn sort_orders_in_place() {
        let mut array: PushArray<u32, 8> = PushArray::new();
        for i in [5, 1, 4, 2] {
            array.push(i);
        }
        array.sort();
        assert_eq!(&*array, &[1, 2, 4, 5]);
    }

    #[test]
    fn stable_sort_keeps_equal_keys_in_push_order() {
        let mut array: PushArray<(u8, char), 8> = PushArray::new();
        for pair in [(2, 'a'), (1, 'x'), (2, 'b'), (1, 'y'), (2, 'c')] {
            array.push(pair);
        }
        array.sort_by(|a, b| a.0.cmp(&b.0));
        assert_eq!(
            &*array,
            &[(1, 'x'), (1, 'y'), (2, 'a'), (2, 'b'), (2, 'c')]
        );
    }

    #[test]
    fn comparator_sort_can_reverse() {
        let mut array: PushArray<u32, 8> = PushArray::new();
        for i in [3, 1, 2] {
            array.push(i);
        }
        array.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(&*array, &[3, 2, 1]);
    }

    #[test]
    fn query_protocol_applies() {
        let mut array: PushArray<u32, 8> = PushArray::new();
        for i in [7, 7, 9] {
            array.push(i);
        }
        assert_eq!(array.count_eq(&7), 2);
        assert_eq!(array.push_if_unique(9), None);
        assert_eq!(array.remove_all(|v| *v == 7), 2);
        assert_eq!(&*array, &[9]);
    }
}
