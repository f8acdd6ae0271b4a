//! Typed slot storage carved out of an arena.
//!
//! A [`SlotPool`] hands out `u32` indices to values stored at stable
//! addresses inside an arena's blocks. Removed slots go onto an explicit
//! free list and are reused before new slots are carved. The linked
//! containers in `loam-containers` store their nodes here and link them by
//! index, which keeps the containers themselves free of raw pointers.
//!
//! The unsafe surface is small and local: writes into a slot happen only
//! when the slot is free, reads only while its `live` flag is set, and the
//! slot memory cannot be rewound out from under the pool because the pool
//! holds the arena (owned or borrowed) for its whole lifetime.

use std::alloc::Layout;
use std::marker::PhantomData;
use std::ptr::NonNull;

use smallvec::SmallVec;

use crate::arena::Arena;
use crate::arena_ref::ArenaRef;

/// Arena-backed typed slots with free-list recycling.
pub struct SlotPool<'a, T> {
    arena: ArenaRef<'a>,
    slots: Vec<NonNull<T>>,
    live: Vec<bool>,
    free: SmallVec<[u32; 16]>,
    _values: PhantomData<T>,
}

impl<'a, T> SlotPool<'a, T> {
    /// Pool allocating from the given arena.
    pub fn new(arena: impl Into<ArenaRef<'a>>) -> Self {
        Self {
            arena: arena.into(),
            slots: Vec::new(),
            live: Vec::new(),
            free: SmallVec::new(),
            _values: PhantomData,
        }
    }

    /// The arena backing this pool.
    #[must_use]
    pub fn arena(&self) -> &Arena {
        self.arena.get()
    }

    /// Stores a value, reusing a freed slot when one exists.
    pub fn insert(&mut self, value: T) -> u32 {
        if let Some(index) = self.free.pop() {
            debug_assert!(!self.live[index as usize]);
            // SAFETY: the slot came off the free list, so nothing reads it
            // and no live value occupies it.
            unsafe { self.slots[index as usize].as_ptr().write(value) };
            self.live[index as usize] = true;
            return index;
        }
        let index = u32::try_from(self.slots.len()).expect("slot pool exceeded u32 indices");
        let ptr = self.arena.get().alloc_raw(Layout::new::<T>()).cast::<T>();
        // SAFETY: freshly carved, correctly aligned, and unaliased.
        unsafe { ptr.as_ptr().write(value) };
        self.slots.push(ptr);
        self.live.push(true);
        index
    }

    /// Takes the value out of a slot and puts the slot on the free list.
    ///
    /// Panics if the slot is not live.
    pub fn remove(&mut self, index: u32) -> T {
        self.check_live(index);
        self.live[index as usize] = false;
        self.free.push(index);
        // SAFETY: the slot was live, so it holds an initialized value, and
        // the flag is already lowered so nothing reads it again.
        unsafe { self.slots[index as usize].as_ptr().read() }
    }

    /// Shared access to a live slot.
    #[must_use]
    pub fn get(&self, index: u32) -> &T {
        self.check_live(index);
        // SAFETY: live slots hold initialized values; the borrow of `self`
        // keeps `remove` and `get_mut` away while the reference lives.
        unsafe { &*self.slots[index as usize].as_ptr() }
    }

    /// Mutable access to a live slot.
    #[must_use]
    pub fn get_mut(&mut self, index: u32) -> &mut T {
        self.check_live(index);
        // SAFETY: as for `get`, with `&mut self` ruling out other views.
        unsafe { &mut *self.slots[index as usize].as_ptr() }
    }

    /// Whether `index` names a slot currently holding a value.
    #[must_use]
    pub fn is_live(&self, index: u32) -> bool {
        self.live.get(index as usize).copied().unwrap_or(false)
    }

    /// Number of live values.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Total slots ever carved from the arena.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    fn check_live(&self, index: u32) {
        assert!(
            self.is_live(index),
            "slot {index} is not live ({} slots carved)",
            self.slots.len()
        );
    }
}

impl<T> Drop for SlotPool<'_, T> {
    fn drop(&mut self) {
        for (index, ptr) in self.slots.iter().enumerate() {
            if self.live[index] {
                // SAFETY: live slots hold initialized values and are never
                // touched again after this.
                unsafe { ptr.as_ptr().drop_in_place() };
            }
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for SlotPool<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotPool")
            .field("live", &self.live_count())
            .field("carved", &self.slot_count())
            .finish()
    }
}
