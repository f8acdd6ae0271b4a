//! The OS page boundary consumed by the arena.
//!
//! Arenas never call the system allocator directly; they go through a
//! [`PageSource`], which hands out zeroed, page-aligned [`PageRegion`]s and
//! takes them back whole. [`SystemPages`] is the default implementation over
//! `std::alloc`. Swapping in a different source (mmap, a test double that
//! counts allocations) is a constructor argument, not a rebuild.

use std::alloc::{alloc_zeroed, dealloc, Layout};
use std::ptr::NonNull;

use crate::mem::{align_up, PAGE_SIZE};

/// One contiguous OS-backed allocation, page-aligned and initially zeroed.
///
/// A region is created by [`PageSource::page_alloc`] and must be returned to
/// the same source via [`PageSource::page_free`]. Its length is always a
/// multiple of [`PAGE_SIZE`].
#[derive(Debug)]
pub struct PageRegion {
    ptr: NonNull<u8>,
    len: usize,
}

// SAFETY: a PageRegion is an exclusively owned allocation; moving it between
// threads moves ownership of the memory with it.
unsafe impl Send for PageRegion {}

impl PageRegion {
    /// Wrap a raw allocation.
    ///
    /// # Safety
    ///
    /// `ptr` must point to `len` bytes of writable memory owned by the
    /// caller's page source, and `len` must be the exact length that source
    /// will use to free it.
    pub unsafe fn from_raw(ptr: NonNull<u8>, len: usize) -> Self {
        Self { ptr, len }
    }

    /// Base address of the region.
    #[must_use]
    pub fn as_ptr(&self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    /// Length of the region in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the region is zero-length (never true for real allocations).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// A source of page-granularity memory.
///
/// Contract: returned regions are zero-initialized, aligned to [`PAGE_SIZE`],
/// and sized to `bytes` rounded up to page granularity. `None` means the OS
/// refused the allocation — the arena layer treats that as fatal, so
/// implementations should not panic themselves.
pub trait PageSource: Send + Sync {
    /// Reserve and commit at least `bytes` of zeroed memory.
    fn page_alloc(&self, bytes: usize) -> Option<PageRegion>;

    /// Release a region previously returned by [`PageSource::page_alloc`]
    /// on this source.
    fn page_free(&self, region: PageRegion);
}

/// Default [`PageSource`] over the process allocator.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemPages;

impl SystemPages {
    fn layout_for(bytes: usize) -> Layout {
        let size = align_up(bytes.max(1), PAGE_SIZE);
        // PAGE_SIZE is a power of two and size is a multiple of it.
        Layout::from_size_align(size, PAGE_SIZE).expect("page layout")
    }
}

impl PageSource for SystemPages {
    fn page_alloc(&self, bytes: usize) -> Option<PageRegion> {
        let layout = Self::layout_for(bytes);
        // SAFETY: layout has non-zero size.
        let ptr = unsafe { alloc_zeroed(layout) };
        let ptr = NonNull::new(ptr)?;
        // SAFETY: ptr owns layout.size() zeroed bytes; page_free recomputes
        // the identical layout from the stored length.
        Some(unsafe { PageRegion::from_raw(ptr, layout.size()) })
    }

    fn page_free(&self, region: PageRegion) {
        let layout = Self::layout_for(region.len());
        debug_assert_eq!(layout.size(), region.len());
        // SAFETY: the region came from page_alloc with this exact layout.
        unsafe { dealloc(region.as_ptr(), layout) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_rounds_up_to_page_granularity() {
        let pages = SystemPages;
        let region = pages.page_alloc(1).expect("tiny allocation");
        assert_eq!(region.len(), PAGE_SIZE);
        pages.page_free(region);
    }

    #[test]
    fn alloc_is_zeroed_and_page_aligned() {
        let pages = SystemPages;
        let region = pages.page_alloc(3 * PAGE_SIZE - 7).expect("allocation");
        assert_eq!(region.len(), 3 * PAGE_SIZE);
        assert_eq!(region.as_ptr() as usize % PAGE_SIZE, 0);
        // SAFETY: region owns len() bytes.
        let bytes = unsafe { std::slice::from_raw_parts(region.as_ptr(), region.len()) };
        assert!(bytes.iter().all(|&b| b == 0));
        pages.page_free(region);
    }

    #[test]
    fn exact_multiple_is_not_padded() {
        let pages = SystemPages;
        let region = pages.page_alloc(2 * PAGE_SIZE).expect("allocation");
        assert_eq!(region.len(), 2 * PAGE_SIZE);
        pages.page_free(region);
    }
}
