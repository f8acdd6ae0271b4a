//! Core boundary types for the Loam allocator workspace.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! OS page boundary the arena consumes ([`PageSource`], [`SystemPages`]),
//! size and alignment helpers, and the memory-profiling event sink
//! ([`MemoryProfiler`], [`StatsProfiler`]).
//!
//! This crate contains `unsafe` code in exactly one module ([`pages`]),
//! covering the raw `alloc_zeroed`/`dealloc` round-trip.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod mem;
pub mod pages;
pub mod profile;

pub use mem::{align_up, KIB, MIB, PAGE_SIZE};
pub use pages::{PageRegion, PageSource, SystemPages};
pub use profile::{ArenaStats, MemoryEvent, MemoryProfiler, PushKind, StatsProfiler};
