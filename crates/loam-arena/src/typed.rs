//! Contiguous typed storage carved from an arena.
//!
//! [`ArenaArray`] is the typed counterpart of [`ArenaSlice`]: one
//! allocation holding `len` values of `T` back to back. It borrows the
//! arena for its lifetime, so the cursor cannot be rewound past the
//! storage while the array is alive, and it dereferences to a plain
//! slice for everything else.
//!
//! [`ArenaSlice`]: crate::ArenaSlice

use std::alloc::Layout;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;

use crate::arena::Arena;

/// A fixed-length run of `T` values inside an arena block.
pub struct ArenaArray<'a, T> {
    ptr: NonNull<T>,
    len: usize,
    _arena: PhantomData<&'a Arena>,
    _values: PhantomData<T>,
}

impl<'a, T> ArenaArray<'a, T> {
    /// Array of `len` values produced by calling `fill` with each index.
    pub fn from_fn(arena: &'a Arena, len: usize, mut fill: impl FnMut(usize) -> T) -> Self {
        let layout = Layout::array::<T>(len).expect("array layout overflow");
        let ptr = arena.alloc_raw(layout).cast::<T>();
        for i in 0..len {
            // SAFETY: i < len, so the write lands inside the allocation.
            unsafe { ptr.as_ptr().add(i).write(fill(i)) };
        }
        Self {
            ptr,
            len,
            _arena: PhantomData,
            _values: PhantomData,
        }
    }

    /// Array of `len` clones of `value`.
    pub fn filled(arena: &'a Arena, len: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::from_fn(arena, len, |_| value.clone())
    }

    /// Array copied from a slice.
    pub fn from_slice(arena: &'a Arena, values: &[T]) -> Self
    where
        T: Clone,
    {
        Self::from_fn(arena, values.len(), |i| values[i].clone())
    }

    /// Number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the array has zero values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<T> Deref for ArenaArray<'_, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        // SAFETY: the allocation holds `len` initialized values and the
        // arena cannot rewind past it while the borrow is held.
        unsafe { core::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl<T> DerefMut for ArenaArray<'_, T> {
    fn deref_mut(&mut self) -> &mut [T] {
        // SAFETY: as for `deref`, with `&mut self` ruling out aliases.
        unsafe { core::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl<T> Drop for ArenaArray<'_, T> {
    fn drop(&mut self) {
        // SAFETY: the values are initialized and never touched again; the
        // bytes themselves stay with the arena.
        unsafe { std::ptr::drop_in_place(self.deref_mut() as *mut [T]) };
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for ArenaArray<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loam_core::PAGE_SIZE;

    #[test]
    fn from_fn_initializes_every_element() {
        let arena = Arena::new(PAGE_SIZE);
        let array = ArenaArray::from_fn(&arena, 16, |i| i * i);
        assert_eq!(array.len(), 16);
        assert_eq!(array[3], 9);
        assert_eq!(array.iter().sum::<usize>(), (0..16).map(|i| i * i).sum());
    }

    #[test]
    fn elements_are_mutable_through_the_slice_view() {
        let arena = Arena::new(PAGE_SIZE);
        let mut array = ArenaArray::filled(&arena, 4, 0u32);
        array[2] = 9;
        array.sort_unstable();
        assert_eq!(&*array, &[0, 0, 0, 9]);
    }

    #[test]
    fn drop_runs_element_destructors() {
        use std::rc::Rc;
        let flag = Rc::new(());
        let arena = Arena::new(PAGE_SIZE);
        {
            let _array = ArenaArray::filled(&arena, 5, flag.clone());
            assert_eq!(Rc::strong_count(&flag), 6);
        }
        assert_eq!(Rc::strong_count(&flag), 1);
    }

    #[test]
    fn storage_comes_from_the_arena() {
        let arena = Arena::new(PAGE_SIZE);
        let before = arena.used_bytes();
        let _array = ArenaArray::filled(&arena, 8, 0u64);
        assert!(arena.used_bytes() >= before + 8 * 8);
    }
}
