//! A single page-backed block in an arena's chain.
//!
//! Each block tracks two cursors: `used`, the current bump position, and
//! `peak`, the highest `used` has ever been. Rollback rewinds `used` but
//! never `peak`, so `peak` marks exactly how far the block's bytes may
//! have been dirtied. The zeroed allocation path in
//! [`Arena`](crate::Arena) uses that to clear only the overlap between a
//! new allocation and the dirtied range.

use loam_core::PageRegion;

/// One contiguous region in an arena's block chain.
pub(crate) struct Block {
    region: PageRegion,
    used: usize,
    peak: usize,
}

impl Block {
    pub(crate) fn new(region: PageRegion) -> Self {
        Self {
            region,
            used: 0,
            peak: 0,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.region.len()
    }

    pub(crate) fn used(&self) -> usize {
        self.used
    }

    pub(crate) fn remaining(&self) -> usize {
        self.capacity() - self.used
    }

    /// Consumes the block, returning its backing region for release.
    pub(crate) fn into_region(self) -> PageRegion {
        self.region
    }

    /// Bumps the cursor by `len` bytes if they fit.
    ///
    /// Returns the allocation offset and the number of leading bytes that
    /// fall below the high-water mark and therefore may hold stale data.
    pub(crate) fn try_bump(&mut self, len: usize) -> Option<(usize, usize)> {
        if len > self.remaining() {
            return None;
        }
        let offset = self.used;
        let dirty = self.peak.saturating_sub(offset).min(len);
        self.used += len;
        self.peak = self.peak.max(self.used);
        Some((offset, dirty))
    }

    /// Rewinds the cursor to an earlier snapshot. The high-water mark is
    /// left alone.
    pub(crate) fn rewind(&mut self, used: usize) {
        debug_assert!(
            used <= self.used,
            "rewind target {used} is past the current cursor {}",
            self.used
        );
        self.used = used;
    }

    /// Raw pointer to the byte at `offset`. The caller must keep the
    /// access within a single allocated span.
    pub(crate) fn ptr_at(&self, offset: usize) -> *mut u8 {
        debug_assert!(offset <= self.capacity());
        // SAFETY: offset is within the region, so the result stays inside
        // the same backing object.
        unsafe { self.region.as_ptr().add(offset) }
    }

    /// Shared view of an allocated span.
    pub(crate) fn span(&self, offset: usize, len: usize) -> &[u8] {
        self.check_span(offset, len);
        // SAFETY: the span lies below `used`, so it was handed out by
        // `try_bump` and is initialized from the caller's point of view.
        // Distinct spans never overlap, so no mutable alias exists.
        unsafe { core::slice::from_raw_parts(self.ptr_at(offset), len) }
    }

    /// Mutable view of an allocated span.
    pub(crate) fn span_mut(&mut self, offset: usize, len: usize) -> &mut [u8] {
        self.check_span(offset, len);
        // SAFETY: as for `span`, plus `&mut self` rules out a second view
        // of this block while the slice is live.
        unsafe { core::slice::from_raw_parts_mut(self.ptr_at(offset), len) }
    }

    fn check_span(&self, offset: usize, len: usize) {
        let end = offset.checked_add(len).expect("span length overflow");
        assert!(
            end <= self.used,
            "span {offset}..{end} is outside the allocated range 0..{}",
            self.used
        );
    }
}
