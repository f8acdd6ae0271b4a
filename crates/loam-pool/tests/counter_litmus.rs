//! Integration test: the mutex-correctness litmus for the job queue.
//!
//! Four workers, one hundred jobs, each job atomically increments a
//! shared counter and reports completion over a channel. The counter
//! must land on exactly one hundred: no lost wake-ups, no duplicated
//! takes, no job dropped on the floor.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::bounded;
use loam_pool::ThreadPool;

#[test]
fn one_hundred_jobs_increment_exactly_once_each() {
    let pool = ThreadPool::new(4);
    let counter = Arc::new(AtomicU32::new(0));
    let (done, completions) = bounded(100);

    for _ in 0..100 {
        let counter = Arc::clone(&counter);
        let done = done.clone();
        pool.push_job(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            done.send(()).expect("completion channel closed early");
        });
    }

    for _ in 0..100 {
        completions
            .recv_timeout(Duration::from_secs(10))
            .expect("a job never completed");
    }
    assert_eq!(counter.load(Ordering::SeqCst), 100);

    pool.shutdown();
    assert_eq!(counter.load(Ordering::SeqCst), 100);
}

#[test]
fn repeated_batches_stay_exact() {
    let pool = ThreadPool::new(4);
    let counter = Arc::new(AtomicU32::new(0));

    for _ in 0..10 {
        pool.push_jobs((0..10).map(|_| {
            let counter = Arc::clone(&counter);
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        }));
    }

    pool.shutdown();
    assert_eq!(counter.load(Ordering::SeqCst), 100);
}
