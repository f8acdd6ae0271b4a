//! Loam: arena allocation, arena-backed containers, and a worker pool
//! for frame-oriented programs.
//!
//! This is the top-level facade crate that re-exports the public API
//! from all Loam sub-crates. For most users, adding `loam` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use loam::prelude::*;
//!
//! // One arena per frame-lived subsystem.
//! let mut frame = Arena::new(1 << 20);
//!
//! // Containers carve their nodes out of the arena.
//! let mut pending = DList::new(&frame);
//! pending.push_back("load_mesh");
//! pending.push_back("load_audio");
//! assert!(pending.has_eq(&"load_audio"));
//! assert_eq!(pending.pop_front(), "load_mesh");
//! drop(pending);
//!
//! // Scratch work rolls back when the scope ends.
//! let used_before = frame.used_bytes();
//! {
//!     let scope = frame.temp_scope();
//!     scope.alloc_zeroed(64 * 1024);
//! }
//! assert_eq!(frame.used_bytes(), used_before);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in
//! the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`arena`] | `loam-arena` | `Arena`, temporary memory, `SlotPool`, `ArenaArray` |
//! | [`containers`] | `loam-containers` | Arrays, linked lists, the query protocol |
//! | [`base`] | `loam-core` | Page source, size helpers, profiling events |
//! | [`sync`] | `loam-sync` | Spin lock, semaphore, memory fences |
//! | [`pool`] | `loam-pool` | Worker thread pool over an arena-backed queue |
//!
//! The [`fs`] module is local to this crate: whole-file reads that land
//! in an arena.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod fs;

/// Arenas, temporary memory, and typed slot storage (`loam-arena`).
///
/// The heart of the workspace: [`arena::Arena`] with
/// [`arena::TempScope`] rollback, plus [`arena::SlotPool`] and
/// [`arena::ArenaArray`] for typed storage.
pub use loam_arena as arena;

/// Arena-backed containers and the query protocol (`loam-containers`).
///
/// [`containers::DList`], [`containers::SList`], [`containers::BackList`],
/// [`containers::FixedArray`], [`containers::PushArray`], and the
/// [`containers::Query`] family they all share.
pub use loam_containers as containers;

/// Page allocation boundary and profiling events (`loam-core`).
///
/// Swap the [`base::PageSource`] to intercept block allocation; attach a
/// [`base::MemoryProfiler`] to watch every arena in one place.
pub use loam_core as base;

/// Worker thread pool (`loam-pool`).
///
/// [`pool::ThreadPool`] drains an arena-backed FIFO job queue.
pub use loam_pool as pool;

/// Synchronization primitives (`loam-sync`).
///
/// [`sync::SpinMutex`], [`sync::Semaphore`], and named memory fences.
pub use loam_sync as sync;

/// Common imports for typical Loam usage.
///
/// ```rust
/// use loam::prelude::*;
/// ```
pub mod prelude {
    // Arena layer
    pub use loam_arena::{Arena, ArenaConfig, ArenaRef, ArenaSlice, ArenaStr, TempScope};

    // Containers and the query protocol
    pub use loam_containers::{
        BackList, Counted, DList, FixedArray, ListOps, NodeId, PushArray, Query, QueryMut, SList,
        Sequence, SequenceMut,
    };

    // Profiling
    pub use loam_core::{MemoryProfiler, StatsProfiler};

    // Threading
    pub use loam_pool::ThreadPool;
    pub use loam_sync::{Semaphore, SpinMutex};
}
