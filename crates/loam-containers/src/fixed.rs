//! Fixed-length arena arrays wired into the query protocol.
//!
//! The storage type itself lives in `loam-arena` as
//! [`ArenaArray`](loam_arena::ArenaArray); this module gives it the
//! container name used throughout this crate and implements [`Sequence`]
//! so the whole query family applies. [`Sequence`] is also implemented
//! for plain `[T; N]` arrays, which cover the compile-time-sized case
//! without touching an arena. Fixed arrays have no structural edits,
//! only element mutation through the slice view.

use loam_arena::ArenaArray;

use crate::query::Sequence;

/// An arena-backed array whose length is fixed at creation.
///
/// Positions are plain indices. Construction and the slice view are
/// documented on [`ArenaArray`].
pub type FixedArray<'a, T> = ArenaArray<'a, T>;

impl<T> Sequence for ArenaArray<'_, T> {
    type Item = T;
    type Pos = usize;
    type Entries<'s>
        = std::iter::Enumerate<std::slice::Iter<'s, T>>
    where
        Self: 's;

    fn entries(&self) -> Self::Entries<'_> {
        self.iter().enumerate()
    }

    fn value(&self, pos: usize) -> &T {
        &self[pos]
    }
}

/// Plain `[T; N]` arrays are the compile-time-sized fixed container, so
/// the query family applies to them directly.
impl<T, const N: usize> Sequence for [T; N] {
    type Item = T;
    type Pos = usize;
    type Entries<'s>
        = std::iter::Enumerate<std::slice::Iter<'s, T>>
    where
        Self: 's;

    fn entries(&self) -> Self::Entries<'_> {
        self.iter().enumerate()
    }

    fn value(&self, pos: usize) -> &T {
        &self[pos]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Query;
    use loam_arena::Arena;

    #[test]
    fn queries_work_over_the_fixed_view() {
        let arena = Arena::new(4096);
        let array = FixedArray::from_slice(&arena, &[10, 20, 20, 30]);
        assert_eq!(array.position_eq(&20), Some(1));
        assert_eq!(array.count_eq(&20), 2);
        assert_eq!(array.find(|v| *v > 25), Some(&30));
        assert_eq!(array.value(3), &30);
    }

    #[test]
    fn element_mutation_goes_through_the_slice() {
        let arena = Arena::new(4096);
        let mut array = FixedArray::filled(&arena, 3, 1u8);
        array[1] = 2;
        assert_eq!(array.count_eq(&1), 2);
    }

    #[test]
    fn plain_arrays_answer_queries_too() {
        let array = [3u32, 1, 4, 1, 5];
        assert_eq!(array.count_eq(&1), 2);
        assert_eq!(array.position(|v| *v > 3), Some(2));
        assert!(!array.has_eq(&9));
    }

    #[test]
    #[should_panic]
    fn out_of_bounds_position_panics() {
        let arena = Arena::new(4096);
        let array = FixedArray::filled(&arena, 2, 0u8);
        let _ = array.value(2);
    }
}
