//! The job queue behind the thread pool.
//!
//! Jobs are boxed closures linked into an arena-backed singly linked
//! list: push at the tail, take from the head, FIFO. The list recycles
//! its nodes through the arena's free list, so a pool that stays busy
//! reaches a steady state with zero allocation per job beyond the box.

use loam_arena::{Arena, ArenaConfig};
use loam_containers::{ListOps, SList};
use loam_core::KIB;

/// A queued unit of work.
pub(crate) type Job = Box<dyn FnOnce() + Send + 'static>;

/// FIFO queue of jobs over an owned arena.
pub(crate) struct JobQueue {
    jobs: SList<'static, Job>,
}

// SAFETY: the list owns its arena, so every node pointer in it targets
// memory that moves between threads together with the queue. Access is
// serialized by the pool's spin mutex.
unsafe impl Send for JobQueue {}

impl JobQueue {
    pub(crate) fn new(arena_config: ArenaConfig) -> Self {
        Self {
            jobs: SList::new(Arena::with_config(arena_config)),
        }
    }

    pub(crate) fn default_arena_config() -> ArenaConfig {
        ArenaConfig::new(64 * KIB).named("thread-pool-jobs")
    }

    pub(crate) fn push(&mut self, job: Job) {
        self.jobs.push_back(job);
    }

    pub(crate) fn take(&mut self) -> Option<Job> {
        if self.jobs.is_empty() {
            None
        } else {
            Some(self.jobs.pop_front())
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
