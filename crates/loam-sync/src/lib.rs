//! Synchronization primitives for the Loam workspace.
//!
//! - [`SpinMutex`]: a test-and-set spin lock for short critical sections
//!   such as job-queue links.
//! - [`Semaphore`]: a counting semaphore with batched release, used to
//!   park and wake thread-pool workers.
//! - [`write_barrier`] / [`read_barrier`] / [`read_write_barrier`]:
//!   named memory fences.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_op_in_unsafe_fn)]

mod fence;
mod semaphore;
mod spin;

pub use fence::{read_barrier, read_write_barrier, write_barrier};
pub use semaphore::Semaphore;
pub use spin::{SpinGuard, SpinMutex};
