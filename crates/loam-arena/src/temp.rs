//! Temporary memory: snapshot the arena, allocate freely, roll back.
//!
//! `begin_temp` records the current block and cursor. `end_temp` releases
//! every block allocated since, rewinds the cursor, and checks that scopes
//! close in strict LIFO order. [`TempScope`] wraps the pair in an RAII
//! guard. [`RevertPoint`] is the same snapshot without the LIFO
//! bookkeeping, for callers that rewind on an error path.
//!
//! Rolled-back bytes are not cleared. The block keeps its high-water mark,
//! and the zeroed allocation path clears exactly the bytes below it on
//! reuse.

use std::ops::Deref;

use loam_core::MemoryEvent;

use crate::arena::Arena;
use crate::block::Block;

/// Snapshot returned by [`Arena::begin_temp`].
///
/// Move-only: ending the scope consumes it, so a scope cannot be closed
/// twice.
#[derive(Debug)]
pub struct TempMemory {
    block: u32,
    used: usize,
    depth: u32,
}

/// Snapshot returned by [`Arena::revert_point`].
///
/// Unlike [`TempMemory`] it is `Copy` and carries no nesting bookkeeping;
/// the same point may be reverted to more than once.
#[derive(Clone, Copy, Debug)]
pub struct RevertPoint {
    block: u32,
    used: usize,
}

impl Arena {
    /// Opens a temporary-memory scope.
    pub fn begin_temp(&self) -> TempMemory {
        let chain = self.chain().borrow();
        let block = chain.len() - 1;
        let used = chain[block].used();
        drop(chain);
        let depth = self.temp_depth().get() + 1;
        self.temp_depth().set(depth);
        self.emit(MemoryEvent::TempBegin {
            arena: self.display_name(),
            depth,
        });
        TempMemory {
            block: block as u32,
            used,
            depth,
        }
    }

    /// Closes a temporary-memory scope, releasing everything allocated
    /// since the matching [`Arena::begin_temp`].
    ///
    /// Panics if an inner scope is still open.
    pub fn end_temp(&mut self, mark: TempMemory) {
        let depth = self.temp_depth().get();
        assert!(
            depth == mark.depth,
            "temporary memory closed out of order on arena '{}': ending depth {} at depth {depth}",
            self.display_name(),
            mark.depth
        );
        self.rewind_to(mark.block, mark.used);
        self.temp_depth().set(depth - 1);
        self.emit(MemoryEvent::TempEnd {
            arena: self.display_name(),
            depth,
        });
    }

    /// Opens a temporary scope that rolls back when the guard drops.
    pub fn temp_scope(&mut self) -> TempScope<'_> {
        let mark = self.begin_temp();
        TempScope {
            arena: self,
            mark: Some(mark),
        }
    }

    /// Captures the cursor for a later [`Arena::revert_to`].
    #[must_use]
    pub fn revert_point(&self) -> RevertPoint {
        let chain = self.chain().borrow();
        let block = chain.len() - 1;
        RevertPoint {
            block: block as u32,
            used: chain[block].used(),
        }
    }

    /// Rewinds the arena to a captured [`RevertPoint`].
    pub fn revert_to(&mut self, point: RevertPoint) {
        self.rewind_to(point.block, point.used);
    }

    fn rewind_to(&mut self, block: u32, used: usize) {
        let released = {
            let mut chain = self.chain().borrow_mut();
            assert!(
                (block as usize) < chain.len(),
                "rewind target block {block} is not in the chain"
            );
            let released: Vec<Block> = chain.drain(block as usize + 1..).collect();
            chain[block as usize].rewind(used);
            released
        };
        for freed in released {
            self.release_block(freed);
        }
    }
}

/// RAII wrapper around a temporary-memory scope.
///
/// Dereferences to the arena for allocation; rolling back happens on drop.
/// Holding the guard borrows the arena mutably, so nothing else can rewind
/// it underneath the scope.
pub struct TempScope<'a> {
    arena: &'a mut Arena,
    mark: Option<TempMemory>,
}

impl Deref for TempScope<'_> {
    type Target = Arena;

    fn deref(&self) -> &Arena {
        self.arena
    }
}

impl Drop for TempScope<'_> {
    fn drop(&mut self) {
        if let Some(mark) = self.mark.take() {
            self.arena.end_temp(mark);
        }
    }
}
