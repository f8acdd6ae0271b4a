//! The arena itself: a growable chain of bump-allocated blocks.
//!
//! Allocation takes `&self`. The chain lives behind a `RefCell`, so
//! containers that borrow the arena can keep allocating nodes. Everything
//! that rewinds the cursor (`clear`, `end_temp`, `revert_to`) takes
//! `&mut self` instead, which makes it impossible to invalidate a live
//! container or handle borrow at compile time.
//!
//! Allocations are returned as compact handles ([`ArenaSlice`],
//! [`ArenaStr`]) rather than references. A handle is resolved against the
//! arena on every access; one pointing into a block that a rewind has
//! released trips an assertion instead of reading freed memory. That
//! check is per block, so a handle whose block survived a rewind resolves
//! to whatever bytes later pushes put there.

use std::alloc::Layout;
use std::cell::{Cell, Ref, RefCell};
use std::ptr::NonNull;
use std::sync::Arc;

use loam_core::{
    MemoryEvent, MemoryProfiler, PageSource, PushKind, SystemPages, MIB, PAGE_SIZE,
};

use crate::block::Block;

/// Default size of every block after the first, one mebibyte.
pub const DEFAULT_MIN_BLOCK_SIZE: usize = MIB;

/// Construction parameters for an [`Arena`].
#[derive(Clone)]
pub struct ArenaConfig {
    /// Capacity of the first block in bytes (rounded up to whole pages).
    pub initial_size: usize,
    /// Minimum capacity of every growth block. Must be at least one page.
    pub min_block_size: usize,
    /// Name reported in profiling events and panic messages.
    pub name: Option<String>,
    /// Where blocks come from.
    pub pages: Arc<dyn PageSource>,
    /// Optional sink for memory events.
    pub profiler: Option<Arc<dyn MemoryProfiler>>,
}

impl ArenaConfig {
    /// Config with the given first-block size and all other fields at
    /// their defaults.
    #[must_use]
    pub fn new(initial_size: usize) -> Self {
        Self {
            initial_size,
            min_block_size: DEFAULT_MIN_BLOCK_SIZE,
            name: None,
            pages: Arc::new(SystemPages),
            profiler: None,
        }
    }

    /// Sets the arena name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the growth-block size floor.
    #[must_use]
    pub fn min_block_size(mut self, bytes: usize) -> Self {
        self.min_block_size = bytes;
        self
    }

    /// Attaches a profiler sink.
    #[must_use]
    pub fn profiler(mut self, profiler: Arc<dyn MemoryProfiler>) -> Self {
        self.profiler = Some(profiler);
        self
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_BLOCK_SIZE)
    }
}

/// Handle to a byte span allocated from an [`Arena`].
///
/// Accessing a handle whose backing block was released by a rewind
/// panics with a stale-handle message. A rewind that keeps the block
/// alive is not detected; the handle then reads whatever was pushed
/// there since.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArenaSlice {
    block: u32,
    offset: usize,
    len: usize,
}

impl ArenaSlice {
    /// Length of the span in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the span is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Handle to a UTF-8 string copied into an [`Arena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArenaStr {
    span: ArenaSlice,
}

impl ArenaStr {
    /// Length of the string in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.span.len()
    }

    /// Whether the string is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.span.is_empty()
    }
}

/// A growable bump allocator over a chain of page-backed blocks.
pub struct Arena {
    chain: RefCell<Vec<Block>>,
    temp_depth: Cell<u32>,
    min_block_size: usize,
    name: Option<String>,
    pages: Arc<dyn PageSource>,
    profiler: Option<Arc<dyn MemoryProfiler>>,
}

impl Arena {
    /// Arena with a first block of at least `initial_size` bytes and
    /// default settings otherwise.
    #[must_use]
    pub fn new(initial_size: usize) -> Self {
        Self::with_config(ArenaConfig::new(initial_size))
    }

    /// Arena built from an explicit [`ArenaConfig`].
    #[must_use]
    pub fn with_config(config: ArenaConfig) -> Self {
        assert!(
            config.min_block_size >= PAGE_SIZE,
            "min_block_size {} is smaller than a page",
            config.min_block_size
        );
        let ArenaConfig {
            initial_size,
            min_block_size,
            name,
            pages,
            profiler,
        } = config;
        let region = pages
            .page_alloc(initial_size.max(1))
            .unwrap_or_else(|| fatal_page_failure(&name, initial_size));
        let first = Block::new(region);
        let arena = Self {
            chain: RefCell::new(vec![first]),
            temp_depth: Cell::new(0),
            min_block_size,
            name,
            pages,
            profiler,
        };
        arena.emit(MemoryEvent::ArenaCreated {
            arena: arena.display_name(),
            master: None,
            initial_bytes: arena.chain.borrow()[0].capacity(),
        });
        arena
    }

    /// Creates a child arena that reports this arena as its master.
    ///
    /// The child owns its own block chain; dropping it returns the blocks
    /// to the shared page source independently of the parent. Panics if a
    /// temporary scope is open on the parent, since the usual reason to
    /// carve a sub-arena is to hand it off while the parent keeps a stable
    /// baseline.
    #[must_use]
    pub fn sub_arena(&self, initial_size: usize, name: impl Into<String>) -> Arena {
        assert!(
            self.temp_depth.get() == 0,
            "cannot create a sub-arena of '{}' while temporary memory is open",
            self.display_name()
        );
        let name = name.into();
        let region = self
            .pages
            .page_alloc(initial_size.max(1))
            .unwrap_or_else(|| fatal_page_failure(&Some(name.clone()), initial_size));
        let child = Arena {
            chain: RefCell::new(vec![Block::new(region)]),
            temp_depth: Cell::new(0),
            min_block_size: self.min_block_size,
            name: Some(name),
            pages: Arc::clone(&self.pages),
            profiler: self.profiler.clone(),
        };
        child.emit(MemoryEvent::ArenaCreated {
            arena: child.display_name(),
            master: Some(self.display_name()),
            initial_bytes: child.chain.borrow()[0].capacity(),
        });
        child
    }

    /// Name used in events and panic messages.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<anonymous>")
    }

    /// Bump-allocates `len` bytes without clearing them.
    ///
    /// The bytes may hold data left behind by an earlier rollback. Use
    /// [`Arena::alloc_zeroed`] when the caller reads before writing.
    pub fn alloc_uninit(&self, len: usize) -> ArenaSlice {
        let span = self.push_bytes(len, false);
        self.emit(MemoryEvent::Push {
            arena: self.display_name(),
            bytes: len,
            kind: PushKind::Uninitialized,
        });
        span
    }

    /// Bump-allocates `len` bytes guaranteed to read as zero.
    ///
    /// Only bytes that a rollback may have dirtied are cleared; bytes
    /// above the block's high-water mark come straight from freshly
    /// mapped pages and are skipped.
    pub fn alloc_zeroed(&self, len: usize) -> ArenaSlice {
        let span = self.push_bytes(len, true);
        self.emit(MemoryEvent::Push {
            arena: self.display_name(),
            bytes: len,
            kind: PushKind::Zeroed,
        });
        span
    }

    /// Copies a string into the arena.
    pub fn push_str(&self, value: &str) -> ArenaStr {
        let span = self.push_bytes(value.len(), false);
        if !value.is_empty() {
            let mut chain = self.chain.borrow_mut();
            chain[span.block as usize]
                .span_mut(span.offset, span.len)
                .copy_from_slice(value.as_bytes());
        }
        self.emit(MemoryEvent::Push {
            arena: self.display_name(),
            bytes: value.len(),
            kind: PushKind::StringCopy,
        });
        ArenaStr { span }
    }

    /// Resolves a handle to its bytes.
    ///
    /// The returned guard holds the arena's internal borrow; drop it
    /// before allocating again. Panics if the handle is stale.
    pub fn bytes(&self, span: ArenaSlice) -> Ref<'_, [u8]> {
        Ref::map(self.chain.borrow(), |chain| resolve(chain, span))
    }

    /// Resolves a handle to its bytes, mutably.
    ///
    /// Takes `&mut self` so no other handle view or container borrow can
    /// alias the span.
    pub fn bytes_mut(&mut self, span: ArenaSlice) -> &mut [u8] {
        let chain = self.chain.get_mut();
        check_handle(chain, span);
        chain[span.block as usize].span_mut(span.offset, span.len)
    }

    /// Resolves a string handle.
    pub fn str_at(&self, handle: ArenaStr) -> Ref<'_, str> {
        Ref::map(self.chain.borrow(), |chain| {
            let bytes = resolve(chain, handle.span);
            // The handle only ever comes out of `push_str`, which copied
            // valid UTF-8, and `bytes_mut` cannot reach it.
            std::str::from_utf8(bytes).expect("arena string is not valid UTF-8")
        })
    }

    /// Carves `layout.size()` bytes with `layout.align()` alignment and
    /// returns the raw pointer.
    ///
    /// This is the node-storage path used by [`SlotPool`](crate::SlotPool).
    /// The pointer stays valid until the arena rewinds past it; callers
    /// uphold that by borrowing the arena for as long as they hold the
    /// pointer.
    pub(crate) fn alloc_raw(&self, layout: Layout) -> NonNull<u8> {
        assert!(
            layout.align() <= PAGE_SIZE,
            "alignment {} exceeds the page size",
            layout.align()
        );
        let mut chain = self.chain.borrow_mut();
        let current = chain.len() - 1;
        let block = &mut chain[current];
        let misalign = (block.ptr_at(block.used()) as usize) % layout.align();
        let padding = if misalign == 0 {
            0
        } else {
            layout.align() - misalign
        };
        let total = padding + layout.size();
        let (block_index, offset) = if let Some((offset, _)) = block.try_bump(total) {
            (current, offset + padding)
        } else {
            let block = self.grow(&mut chain, layout.size());
            // A fresh block starts page-aligned, so offset zero satisfies
            // any alignment up to a page.
            let (offset, _) = chain[block]
                .try_bump(layout.size())
                .expect("fresh block cannot satisfy allocation");
            (block, offset)
        };
        let ptr = chain[block_index].ptr_at(offset);
        drop(chain);
        self.emit(MemoryEvent::Push {
            arena: self.display_name(),
            bytes: layout.size(),
            kind: PushKind::Node,
        });
        // SAFETY: block memory is never null.
        unsafe { NonNull::new_unchecked(ptr) }
    }

    /// Releases every block but the first and rewinds the cursor to zero.
    ///
    /// Panics if a temporary scope is still open.
    pub fn clear(&mut self) {
        assert!(
            self.temp_depth.get() == 0,
            "cannot clear arena '{}' while temporary memory is open",
            self.display_name()
        );
        let released = {
            let chain = self.chain.get_mut();
            let released: Vec<Block> = chain.drain(1..).collect();
            chain[0].rewind(0);
            released
        };
        for block in released {
            self.release_block(block);
        }
        self.emit(MemoryEvent::ArenaCleared {
            arena: self.display_name(),
        });
    }

    /// Bytes currently allocated across all blocks.
    #[must_use]
    pub fn used_bytes(&self) -> usize {
        self.chain.borrow().iter().map(Block::used).sum()
    }

    /// Total capacity of all blocks.
    #[must_use]
    pub fn allocated_bytes(&self) -> usize {
        self.chain.borrow().iter().map(Block::capacity).sum()
    }

    /// Number of blocks in the chain.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.chain.borrow().len()
    }

    fn push_bytes(&self, len: usize, zero: bool) -> ArenaSlice {
        let mut chain = self.chain.borrow_mut();
        let current = chain.len() - 1;
        let (block, offset, dirty) = match chain[current].try_bump(len) {
            Some((offset, dirty)) => (current, offset, dirty),
            None => {
                let block = self.grow(&mut chain, len);
                let (offset, dirty) = chain[block]
                    .try_bump(len)
                    .expect("fresh block cannot satisfy allocation");
                (block, offset, dirty)
            }
        };
        if zero && dirty > 0 {
            chain[block].span_mut(offset, dirty).fill(0);
        }
        ArenaSlice {
            block: block as u32,
            offset,
            len,
        }
    }

    /// Appends a block able to hold `len` bytes and returns its index.
    fn grow(&self, chain: &mut Vec<Block>, len: usize) -> usize {
        let want = len.max(self.min_block_size);
        let region = self
            .pages
            .page_alloc(want)
            .unwrap_or_else(|| fatal_page_failure(&self.name, want));
        let block = Block::new(region);
        self.emit(MemoryEvent::BlockAllocated {
            arena: self.display_name(),
            bytes: block.capacity(),
        });
        chain.push(block);
        chain.len() - 1
    }

    pub(crate) fn release_block(&self, block: Block) {
        let bytes = block.capacity();
        self.pages.page_free(block.into_region());
        self.emit(MemoryEvent::BlockReleased {
            arena: self.display_name(),
            bytes,
        });
    }

    pub(crate) fn emit(&self, event: MemoryEvent<'_>) {
        if let Some(profiler) = &self.profiler {
            profiler.record(event);
        }
    }

    pub(crate) fn chain(&self) -> &RefCell<Vec<Block>> {
        &self.chain
    }

    pub(crate) fn temp_depth(&self) -> &Cell<u32> {
        &self.temp_depth
    }
}

impl Drop for Arena {
    fn drop(&mut self) {
        let blocks: Vec<Block> = self.chain.get_mut().drain(..).collect();
        for block in blocks {
            let bytes = block.capacity();
            self.pages.page_free(block.into_region());
            self.emit(MemoryEvent::BlockReleased {
                arena: self.display_name(),
                bytes,
            });
        }
        self.emit(MemoryEvent::ArenaDropped {
            arena: self.display_name(),
        });
    }
}

impl std::fmt::Debug for Arena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arena")
            .field("name", &self.display_name())
            .field("blocks", &self.block_count())
            .field("used_bytes", &self.used_bytes())
            .finish()
    }
}

fn resolve(chain: &[Block], span: ArenaSlice) -> &[u8] {
    check_handle(chain, span);
    chain[span.block as usize].span(span.offset, span.len)
}

fn check_handle(chain: &[Block], span: ArenaSlice) {
    assert!(
        (span.block as usize) < chain.len(),
        "stale arena handle: block {} was released",
        span.block
    );
}

fn fatal_page_failure(name: &Option<String>, bytes: usize) -> ! {
    eprintln!(
        "loam: arena '{}' could not allocate {bytes} bytes of pages from the OS",
        name.as_deref().unwrap_or("<anonymous>")
    );
    std::process::abort()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocations_come_back_zeroed_in_fresh_blocks() {
        let arena = Arena::new(PAGE_SIZE);
        let span = arena.alloc_zeroed(512);
        assert!(arena.bytes(span).iter().all(|&b| b == 0));
    }

    #[test]
    fn growth_appends_blocks_sized_to_the_request() {
        let arena = Arena::with_config(ArenaConfig::new(PAGE_SIZE).min_block_size(PAGE_SIZE));
        assert_eq!(arena.block_count(), 1);
        // Larger than one block, so the chain must grow with a block big
        // enough for the whole request.
        let span = arena.alloc_uninit(3 * PAGE_SIZE);
        assert_eq!(arena.block_count(), 2);
        assert_eq!(span.len(), 3 * PAGE_SIZE);
        assert!(arena.allocated_bytes() >= 4 * PAGE_SIZE);
    }

    #[test]
    fn push_str_round_trips() {
        let arena = Arena::new(PAGE_SIZE);
        let handle = arena.push_str("arena-backed");
        assert_eq!(&*arena.str_at(handle), "arena-backed");
        assert_eq!(handle.len(), 12);
    }

    #[test]
    fn bytes_mut_writes_are_visible_through_the_handle() {
        let mut arena = Arena::new(PAGE_SIZE);
        let span = arena.alloc_zeroed(4);
        arena.bytes_mut(span).copy_from_slice(&[1, 2, 3, 4]);
        assert_eq!(&*arena.bytes(span), &[1, 2, 3, 4]);
    }

    #[test]
    fn clear_releases_growth_blocks() {
        let mut arena = Arena::with_config(ArenaConfig::new(PAGE_SIZE).min_block_size(PAGE_SIZE));
        for _ in 0..4 {
            arena.alloc_uninit(PAGE_SIZE);
        }
        assert!(arena.block_count() > 1);
        arena.clear();
        assert_eq!(arena.block_count(), 1);
        assert_eq!(arena.used_bytes(), 0);
    }

    #[test]
    #[should_panic(expected = "stale arena handle")]
    fn stale_handle_is_rejected() {
        let mut arena = Arena::with_config(ArenaConfig::new(PAGE_SIZE).min_block_size(PAGE_SIZE));
        arena.alloc_uninit(PAGE_SIZE);
        let span = arena.alloc_uninit(16);
        arena.clear();
        let _ = arena.bytes(span);
    }

    #[test]
    fn handle_into_a_surviving_block_reads_the_current_bytes() {
        let mut arena = Arena::new(PAGE_SIZE);
        let mark = arena.revert_point();
        let first = arena.alloc_zeroed(4);
        arena.revert_to(mark);
        let second = arena.alloc_uninit(4);
        arena.bytes_mut(second).copy_from_slice(&[1, 2, 3, 4]);
        // Same block, same offset: the rewound handle aliases the new push.
        assert_eq!(&*arena.bytes(first), &[1, 2, 3, 4]);
    }

    #[test]
    fn sub_arena_reports_its_master() {
        let profiler = Arc::new(loam_core::StatsProfiler::new());
        let parent = Arena::with_config(
            ArenaConfig::new(PAGE_SIZE)
                .named("parent")
                .profiler(profiler.clone()),
        );
        let child = parent.sub_arena(PAGE_SIZE, "child");
        assert_eq!(child.display_name(), "child");
        assert!(profiler.stats("child").is_some());
        assert!(profiler.stats("parent").is_some());
    }

    #[test]
    fn zero_length_allocations_never_grow_the_chain() {
        let arena = Arena::new(PAGE_SIZE);
        arena.alloc_uninit(PAGE_SIZE);
        let before = arena.block_count();
        let span = arena.alloc_uninit(0);
        assert!(span.is_empty());
        assert_eq!(arena.block_count(), before);
    }
}
