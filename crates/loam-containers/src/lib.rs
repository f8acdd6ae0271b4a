//! Arena-backed containers sharing one query protocol.
//!
//! Every container here allocates from a `loam-arena` [`Arena`] and
//! speaks the same protocol: [`Sequence`] for reads, [`SequenceMut`] for
//! edits, with the [`Query`] and [`QueryMut`] search families blanket-
//! implemented on top. The flavours trade structure for cost:
//!
//! - [`FixedArray`]: contiguous, length fixed at creation, no edits.
//! - [`PushArray`]: bounded inline array, panics instead of spilling.
//! - [`DList`]: doubly linked, constant-time edits at both ends and at
//!   any position.
//! - [`SList`]: singly linked with a tail pointer; back pops are linear.
//! - [`BackList`]: head-only stack, newest element first.
//! - [`Counted`]: adds a length to any list; the bare lists have none.
//!
//! Node storage is recycled through the arena's slot pool, so churn
//! inside a frame does not grow the arena past its high-water mark.
//!
//! ```
//! use loam_arena::Arena;
//! use loam_containers::{DList, ListOps, Query};
//!
//! let arena = Arena::new(4096);
//! let mut open_jobs = DList::new(&arena);
//! open_jobs.push_back("mesh");
//! open_jobs.push_back("audio");
//! assert!(open_jobs.has_eq(&"audio"));
//! assert_eq!(open_jobs.pop_front(), "mesh");
//! ```
//!
//! [`Arena`]: loam_arena::Arena

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod back_list;
mod counted;
mod dlist;
mod fixed;
mod node;
mod push_array;
mod query;
mod slist;

pub use back_list::BackList;
pub use counted::{Counted, CountedBackList, CountedDList, CountedSList};
pub use dlist::DList;
pub use fixed::FixedArray;
pub use node::NodeId;
pub use push_array::PushArray;
pub use query::{ListOps, Query, QueryMut, Sequence, SequenceMut};
pub use slist::SList;
