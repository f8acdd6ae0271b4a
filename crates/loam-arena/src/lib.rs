//! Block-chained bump arenas with temporary-memory rollback.
//!
//! An [`Arena`] owns a chain of page-backed blocks and bumps a cursor
//! through the current one; when a request does not fit, the chain grows
//! by a block of at least `min_block_size` bytes. On top of that sit:
//!
//! - [`TempMemory`] / [`TempScope`] / [`RevertPoint`]: snapshot the
//!   cursor, allocate freely, roll everything back.
//! - [`SlotPool`]: stable typed slots with free-list recycling, the node
//!   storage for the containers in `loam-containers`.
//! - [`ArenaArray`]: a contiguous typed run of values with a slice view.
//! - [`ArenaRef`]: owned-or-borrowed arena handles for containers.
//!
//! Allocation takes `&self`; every rewind takes `&mut self`, so the borrow
//! checker rejects code that would rewind an arena while a container or
//! byte handle borrowed from it is still alive.
//!
//! ```
//! use loam_arena::Arena;
//!
//! let mut arena = Arena::new(4096);
//! let keep = arena.push_str("kept");
//! let mark = arena.begin_temp();
//! arena.alloc_zeroed(1 << 20);
//! arena.end_temp(mark);
//! assert_eq!(&*arena.str_at(keep), "kept");
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_op_in_unsafe_fn)]

mod arena;
mod arena_ref;
mod block;
mod slots;
mod temp;
mod typed;

pub use arena::{Arena, ArenaConfig, ArenaSlice, ArenaStr, DEFAULT_MIN_BLOCK_SIZE};
pub use arena_ref::ArenaRef;
pub use slots::SlotPool;
pub use temp::{RevertPoint, TempMemory, TempScope};
pub use typed::ArenaArray;
