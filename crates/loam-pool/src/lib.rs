//! A fixed-size worker pool draining an arena-backed job queue.
//!
//! Workers park on a counting semaphore and wake when jobs arrive. The
//! queue itself sits behind a spin lock; a worker holds it only long
//! enough to unlink one job, then runs the job unlocked. Batched pushes
//! signal at most as many workers as there are new jobs, so a burst of
//! small jobs does not stampede the whole pool.
//!
//! Shutdown is explicit or on drop: the pool raises a flag, wakes every
//! worker, and joins them. Workers drain whatever is still queued before
//! exiting, so no accepted job is lost.
//!
//! ```
//! use std::sync::atomic::{AtomicU32, Ordering};
//! use std::sync::Arc;
//! use loam_pool::ThreadPool;
//!
//! let pool = ThreadPool::new(2);
//! let counter = Arc::new(AtomicU32::new(0));
//! for _ in 0..10 {
//!     let counter = Arc::clone(&counter);
//!     pool.push_job(move || {
//!         counter.fetch_add(1, Ordering::SeqCst);
//!     });
//! }
//! pool.shutdown();
//! assert_eq!(counter.load(Ordering::SeqCst), 10);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_op_in_unsafe_fn)]

mod queue;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use loam_arena::ArenaConfig;
use loam_sync::{Semaphore, SpinMutex};

use crate::queue::JobQueue;

struct Shared {
    queue: SpinMutex<JobQueue>,
    jobs_ready: Semaphore,
    shutting_down: AtomicBool,
}

/// A pool of worker threads consuming jobs in push order.
pub struct ThreadPool {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
}

impl ThreadPool {
    /// Pool with `thread_count` workers and a default job-queue arena.
    #[must_use]
    pub fn new(thread_count: usize) -> Self {
        Self::with_queue_arena(thread_count, JobQueue::default_arena_config())
    }

    /// Pool whose job-queue arena is built from `arena_config`, for
    /// callers that want to name it or attach a profiler.
    #[must_use]
    pub fn with_queue_arena(thread_count: usize, arena_config: ArenaConfig) -> Self {
        assert!(thread_count > 0, "a thread pool needs at least one worker");
        let shared = Arc::new(Shared {
            queue: SpinMutex::new(JobQueue::new(arena_config)),
            jobs_ready: Semaphore::new(0),
            shutting_down: AtomicBool::new(false),
        });
        let workers = (0..thread_count)
            .map(|index| {
                let shared = Arc::clone(&shared);
                thread::Builder::new()
                    .name(format!("loam-worker-{index}"))
                    .spawn(move || worker_loop(&shared))
                    .expect("failed to spawn worker thread")
            })
            .collect();
        Self { shared, workers }
    }

    /// Number of worker threads.
    #[must_use]
    pub fn thread_count(&self) -> usize {
        self.workers.len()
    }

    /// Queues one job and wakes one worker.
    pub fn push_job(&self, job: impl FnOnce() + Send + 'static) {
        self.shared.queue.lock().push(Box::new(job));
        self.shared.jobs_ready.release(1);
    }

    /// Queues a batch of jobs under one lock, then wakes at most as many
    /// workers as there are jobs.
    pub fn push_jobs<F>(&self, jobs: impl IntoIterator<Item = F>)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut queued = 0usize;
        {
            let mut queue = self.shared.queue.lock();
            for job in jobs {
                queue.push(Box::new(job));
                queued += 1;
            }
        }
        self.shared.jobs_ready.release(queued.min(self.workers.len()));
    }

    /// Stops accepting wake-ups, drains the queue, and joins every
    /// worker. Jobs already queued still run.
    pub fn shutdown(mut self) {
        self.shutdown_inner();
    }

    fn shutdown_inner(&mut self) {
        if self.workers.is_empty() {
            return;
        }
        self.shared.shutting_down.store(true, Ordering::Release);
        self.shared.jobs_ready.release(self.workers.len());
        for worker in self.workers.drain(..) {
            if let Err(panic) = worker.join() {
                std::panic::resume_unwind(panic);
            }
        }
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.shutdown_inner();
    }
}

impl std::fmt::Debug for ThreadPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadPool")
            .field("threads", &self.workers.len())
            .finish()
    }
}

fn worker_loop(shared: &Shared) {
    loop {
        shared.jobs_ready.acquire();
        // One wake-up may stand for several queued jobs; drain until the
        // queue is empty, holding the lock only per unlink.
        loop {
            let job = shared.queue.lock().take();
            match job {
                Some(job) => job(),
                None => break,
            }
        }
        if shared.shutting_down.load(Ordering::Acquire) {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;
    use std::time::Duration;

    #[test]
    fn jobs_queued_before_shutdown_all_run() {
        let pool = ThreadPool::new(3);
        let counter = Arc::new(AtomicU32::new(0));
        for _ in 0..50 {
            let counter = Arc::clone(&counter);
            pool.push_job(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        pool.shutdown();
        assert_eq!(counter.load(Ordering::SeqCst), 50);
    }

    #[test]
    fn batch_push_runs_every_job() {
        let pool = ThreadPool::new(2);
        let counter = Arc::new(AtomicU32::new(0));
        pool.push_jobs((0..20).map(|_| {
            let counter = Arc::clone(&counter);
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        }));
        pool.shutdown();
        assert_eq!(counter.load(Ordering::SeqCst), 20);
    }

    #[test]
    fn drop_joins_workers() {
        let counter = Arc::new(AtomicU32::new(0));
        {
            let pool = ThreadPool::new(2);
            for _ in 0..10 {
                let counter = Arc::clone(&counter);
                pool.push_job(move || {
                    thread::sleep(Duration::from_millis(1));
                    counter.fetch_add(1, Ordering::SeqCst);
                });
            }
        }
        assert_eq!(counter.load(Ordering::SeqCst), 10);
    }

    #[test]
    #[should_panic(expected = "at least one worker")]
    fn zero_workers_is_rejected() {
        let _ = ThreadPool::new(0);
    }
}
