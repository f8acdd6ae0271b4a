//! Named memory fences.
//!
//! Thin wrappers over [`std::sync::atomic::fence`] with names that say
//! which reordering they forbid, matching how the rest of the workspace
//! talks about publication: write before publish, acquire before read.

use std::sync::atomic::{fence, Ordering};

/// Release fence: writes before this line are visible before any write
/// after it.
#[inline]
pub fn write_barrier() {
    fence(Ordering::Release);
}

/// Acquire fence: reads after this line see everything published before
/// the matching release.
#[inline]
pub fn read_barrier() {
    fence(Ordering::Acquire);
}

/// Full sequentially consistent fence.
#[inline]
pub fn read_write_barrier() {
    fence(Ordering::SeqCst);
}
